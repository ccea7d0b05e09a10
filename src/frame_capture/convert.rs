use crate::device_camera::interface::RawFrame;
use crate::error::CaptureError;
use crate::frame_capture::frame::Frame;
use image::{imageops, DynamicImage, RgbImage};

/// Converts a BGRA sensor frame into an upright RGB frame.
///
/// The back camera's sensor is landscape while the preview is portrait, so the
/// image is rotated 90 degrees clockwise.
pub fn frame_from_raw(raw: &RawFrame) -> Result<Frame, CaptureError> {
    let expected = raw.width as usize * raw.height as usize * 4;
    if raw.width == 0 || raw.height == 0 {
        return Err(CaptureError::FrameConversion("empty pixel buffer".to_string()));
    }
    if raw.bgra.len() != expected {
        return Err(CaptureError::FrameConversion(format!(
            "expected {} bytes for {}x{} BGRA, got {}",
            expected,
            raw.width,
            raw.height,
            raw.bgra.len()
        )));
    }

    let rgb: Vec<u8> = raw
        .bgra
        .chunks_exact(4)
        .flat_map(|px| [px[2], px[1], px[0]])
        .collect();

    let landscape = RgbImage::from_raw(raw.width, raw.height, rgb).ok_or_else(|| {
        CaptureError::FrameConversion("pixel buffer does not match dimensions".to_string())
    })?;

    let upright = imageops::rotate90(&landscape);

    Ok(Frame::new(DynamicImage::ImageRgb8(upright), raw.captured_at))
}
