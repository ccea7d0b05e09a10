use super::fixture::{wait_until, Fixture};
use crate::device_camera::impl_fake::DeviceCameraFakeConfig;
use crate::device_camera::interface::{
    DeviceCamera, DeviceKind, DevicePosition, ExposureMode, FocusMode, TorchMode,
};
use crate::error::CaptureError;
use crate::frame_capture::point::PreviewPoint;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::time::Duration;

#[test]
fn test_start_selects_back_wide_angle_camera() {
    let f = Fixture::new();

    f.adapter.start().unwrap();

    assert!(f.adapter.is_running());
    assert!(f.camera.is_streaming());
}

#[test]
fn test_start_without_compatible_device_fails() {
    let f = Fixture::with_config(DeviceCameraFakeConfig {
        position: DevicePosition::Front,
        ..Default::default()
    });

    let result = f.adapter.start();

    assert!(matches!(result, Err(CaptureError::DeviceUnavailable)));
    assert!(!f.adapter.is_running());
    assert!(f.logger.contains("start failed"));
}

#[test]
fn test_start_skips_telephoto_camera() {
    let f = Fixture::with_config(DeviceCameraFakeConfig {
        kind: DeviceKind::Telephoto,
        ..Default::default()
    });

    assert!(matches!(
        f.adapter.start(),
        Err(CaptureError::DeviceUnavailable)
    ));
}

#[test]
fn test_start_reports_device_input_failure() {
    let f = Fixture::new();
    f.camera.fail_open(true);

    let result = f.adapter.start();

    assert!(matches!(result, Err(CaptureError::DeviceConfiguration(_))));
    assert!(!f.adapter.is_running());
}

#[test]
fn test_stop_is_idempotent() {
    let f = Fixture::started();

    f.adapter.stop().unwrap();
    f.adapter.stop().unwrap();

    assert!(!f.adapter.is_running());
    assert!(!f.camera.is_streaming());
}

#[test]
fn test_frames_without_request_produce_nothing() {
    let f = Fixture::started();

    for _ in 0..5 {
        f.deliver_frame();
    }
    let receiver = f.adapter.request_still_frame().unwrap();

    assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn test_one_request_yields_exactly_one_frame() {
    let f = Fixture::started();

    let receiver = f.adapter.request_still_frame().unwrap();
    for _ in 0..10 {
        f.deliver_frame();
    }

    let frame = receiver.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!((frame.width(), frame.height()), (6, 8));
    assert!(matches!(
        receiver.try_recv(),
        Err(TryRecvError::Disconnected)
    ));
}

#[test]
fn test_burst_of_frames_yields_one_still() {
    let f = Fixture::started();

    let receiver = f.adapter.request_still_frame().unwrap();
    for _ in 0..50 {
        assert!(f.camera.emit_frame());
    }
    wait_until(|| f.adapter.frames_delivered() >= 50);

    assert_eq!(receiver.try_iter().count(), 1);
}

#[test]
fn test_capture_still_blocks_until_frame() {
    let f = Fixture::with_config(DeviceCameraFakeConfig {
        frame_interval: Some(Duration::from_millis(5)),
        ..Default::default()
    });
    f.adapter.start().unwrap();

    let frame = f.adapter.capture_still(Duration::from_secs(2)).unwrap();

    assert_eq!(frame.width(), 6);
}

#[test]
fn test_capture_still_times_out_without_frames() {
    let f = Fixture::started();

    let result = f.adapter.capture_still(Duration::from_millis(50));

    assert!(matches!(result, Err(CaptureError::FrameTimeout)));
}

#[test]
fn test_request_requires_running_session() {
    let f = Fixture::new();

    assert!(matches!(
        f.adapter.request_still_frame(),
        Err(CaptureError::NotRunning)
    ));
}

#[test]
fn test_stop_releases_pending_request() {
    let f = Fixture::started();
    let receiver = f.adapter.request_still_frame().unwrap();

    f.adapter.stop().unwrap();

    assert!(receiver.recv_timeout(Duration::from_secs(1)).is_err());
}

#[test]
fn test_second_request_replaces_the_first() {
    let f = Fixture::started();

    let first = f.adapter.request_still_frame().unwrap();
    let second = f.adapter.request_still_frame().unwrap();
    f.deliver_frame();
    f.deliver_frame();

    assert!(matches!(first.try_recv(), Err(TryRecvError::Disconnected)));
    assert!(second.recv_timeout(Duration::from_secs(1)).is_ok());
    assert!(matches!(
        second.recv_timeout(Duration::from_secs(1)),
        Err(RecvTimeoutError::Disconnected)
    ));
}

#[test]
fn test_capture_still_reports_dropped_when_replaced() {
    let f = Fixture::started();

    std::thread::scope(|scope| {
        let waiting = scope.spawn(|| f.adapter.capture_still(Duration::from_secs(5)));
        wait_until(|| f.logger.contains("Still frame requested"));

        let replacement = f.adapter.request_still_frame().unwrap();

        assert!(matches!(
            waiting.join().unwrap(),
            Err(CaptureError::FrameDropped)
        ));
        f.deliver_frame();
        assert!(replacement.recv_timeout(Duration::from_secs(1)).is_ok());
    });
}

#[test]
fn test_rearming_while_streaming_yields_at_most_one_frame_per_request() {
    let f = Fixture::with_config(DeviceCameraFakeConfig {
        frame_interval: Some(Duration::from_millis(1)),
        ..Default::default()
    });
    f.adapter.start().unwrap();

    let mut receivers = Vec::new();
    for i in 0..200 {
        receivers.push(f.adapter.request_still_frame().unwrap());
        if i % 3 == 0 {
            std::thread::sleep(Duration::from_micros(700));
        }
    }
    wait_until(|| f.camera.frames_emitted() >= 20);
    f.adapter.stop().unwrap();

    let counts: Vec<usize> = receivers.iter().map(|r| r.try_iter().count()).collect();
    assert!(counts.iter().all(|&count| count <= 1), "{:?}", counts);
    assert!(counts.iter().sum::<usize>() <= f.adapter.frames_delivered() as usize);
}

#[test]
fn test_torch_toggle_locks_and_unlocks() {
    let f = Fixture::started();

    f.adapter.set_torch(true).unwrap();

    assert_eq!(f.camera.torch_mode(), TorchMode::On);
    assert_eq!(f.camera.lock_count(), 1);
    assert!(!f.camera.is_configuration_locked());
}

#[test]
fn test_torch_already_in_target_state_is_noop() {
    let f = Fixture::started();

    f.adapter.set_torch(true).unwrap();
    f.adapter.set_torch(true).unwrap();
    f.adapter.set_torch(true).unwrap();

    assert_eq!(f.camera.torch_mode(), TorchMode::On);
    assert_eq!(f.camera.lock_count(), 1);
}

#[test]
fn test_torch_off_without_torch_hardware_is_noop() {
    let f = Fixture::with_config(DeviceCameraFakeConfig {
        has_torch: false,
        ..Default::default()
    });
    f.adapter.start().unwrap();

    f.adapter.set_torch(false).unwrap();

    assert!(matches!(
        f.adapter.set_torch(true),
        Err(CaptureError::TorchUnavailable)
    ));
}

#[test]
fn test_torch_lock_failure_leaves_device_unchanged() {
    let f = Fixture::started();
    f.camera.fail_configuration(true);

    let result = f.adapter.set_torch(true);

    assert!(matches!(result, Err(CaptureError::DeviceConfiguration(_))));
    assert_eq!(f.camera.torch_mode(), TorchMode::Off);
    assert!(!f.camera.is_configuration_locked());
    assert!(f.logger.contains("set_torch failed"));
}

#[test]
fn test_focus_uses_swapped_portrait_axes() {
    let f = Fixture::started();

    f.adapter
        .set_focus_and_exposure(PreviewPoint::new(100.0, 600.0, 400.0, 800.0))
        .unwrap();

    let (point, mode) = f.camera.focus().unwrap();
    assert_eq!(mode, FocusMode::AutoFocus);
    assert!((point.x - 0.75).abs() < 1e-9);
    assert!((point.y - 0.75).abs() < 1e-9);

    let (exposure_point, exposure_mode) = f.camera.exposure().unwrap();
    assert_eq!(exposure_mode, ExposureMode::ContinuousAutoExposure);
    assert_eq!(exposure_point, point);
    assert!(!f.camera.is_configuration_locked());
}

#[test]
fn test_focus_skips_unsupported_controls() {
    let f = Fixture::with_config(DeviceCameraFakeConfig {
        supports_focus_point: false,
        ..Default::default()
    });
    f.adapter.start().unwrap();

    f.adapter
        .set_focus_and_exposure(PreviewPoint::new(0.0, 0.0, 400.0, 800.0))
        .unwrap();

    assert!(f.camera.focus().is_none());
    assert!(f.camera.exposure().is_some());
}

#[test]
fn test_device_controls_require_running_session() {
    let f = Fixture::new();

    assert!(matches!(f.adapter.set_torch(true), Err(CaptureError::NotRunning)));
    assert!(matches!(
        f.adapter
            .set_focus_and_exposure(PreviewPoint::new(1.0, 1.0, 2.0, 2.0)),
        Err(CaptureError::NotRunning)
    ));
}
