use crate::device_camera::interface::RawFrame;
use crate::error::CaptureError;
use crate::frame_capture::convert::frame_from_raw;
use crate::frame_capture::point::PreviewPoint;
use chrono::Utc;
use image::GenericImageView;

fn raw(width: u32, height: u32, bgra: Vec<u8>) -> RawFrame {
    RawFrame {
        width,
        height,
        bgra,
        captured_at: Utc::now(),
    }
}

#[test]
fn test_bgra_is_reordered_to_rgb() {
    let frame = frame_from_raw(&raw(1, 1, vec![10, 20, 30, 255])).unwrap();

    let pixel = frame.image().get_pixel(0, 0);

    assert_eq!(&pixel.0[..3], &[30, 20, 10]);
}

#[test]
fn test_landscape_frame_is_rotated_clockwise() {
    // 2x1 landscape: left pixel blue, right pixel red (BGRA).
    let bgra = vec![255, 0, 0, 255, 0, 0, 255, 255];

    let frame = frame_from_raw(&raw(2, 1, bgra)).unwrap();

    assert_eq!((frame.width(), frame.height()), (1, 2));
    // After a clockwise turn the left pixel ends up on top.
    assert_eq!(&frame.image().get_pixel(0, 0).0[..3], &[0, 0, 255]);
    assert_eq!(&frame.image().get_pixel(0, 1).0[..3], &[255, 0, 0]);
}

#[test]
fn test_truncated_buffer_is_rejected() {
    let result = frame_from_raw(&raw(2, 2, vec![0; 15]));

    assert!(matches!(result, Err(CaptureError::FrameConversion(_))));
}

#[test]
fn test_empty_buffer_is_rejected() {
    let result = frame_from_raw(&raw(0, 0, vec![]));

    assert!(matches!(result, Err(CaptureError::FrameConversion(_))));
}

#[test]
fn test_frame_encodes_as_jpeg() {
    let frame = frame_from_raw(&raw(4, 4, vec![128; 64])).unwrap();

    let jpeg = frame.encode_jpeg().unwrap();

    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_preview_point_clamps_outside_taps() {
    let point = PreviewPoint::new(-10.0, 900.0, 400.0, 800.0).to_device();

    assert_eq!(point.x, 1.0);
    assert_eq!(point.y, 1.0);
}

#[test]
fn test_degenerate_preview_focuses_center() {
    let point = PreviewPoint::new(5.0, 5.0, 0.0, 0.0).to_device();

    assert_eq!((point.x, point.y), (0.5, 0.5));
}
