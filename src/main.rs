use eyebot::capture_controller::main::CaptureController;
use eyebot::config::Config;
use eyebot::device_camera::impl_fake::{DeviceCameraFake, DeviceCameraFakeConfig};
use eyebot::device_camera::interface::DeviceCamera;
use eyebot::frame_capture::adapter::FrameCaptureAdapter;
use eyebot::frame_capture::point::PreviewPoint;
use eyebot::image_classifier::impl_fake::ImageClassifierFake;
use eyebot::image_classifier::impl_http::ImageClassifierHttp;
use eyebot::image_classifier::interface::ImageClassifier;
use eyebot::library::logger::impl_console::LoggerConsole;
use eyebot::library::logger::interface::Logger;
use eyebot::notifier::impl_console::NotifierConsole;
use eyebot::prediction_store::impl_file::PredictionStoreFile;
use eyebot::prediction_store::interface::PredictionStore;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let camera = Arc::new(DeviceCameraFake::new(
        DeviceCameraFakeConfig {
            frame_size: config.session_preset.dimensions(),
            frame_interval: Some(Duration::from_millis(33)),
            ..Default::default()
        },
        logger.clone(),
    ));
    let devices: Vec<Arc<dyn DeviceCamera + Send + Sync>> = vec![camera];
    let frame_capture = Arc::new(FrameCaptureAdapter::new(
        devices,
        config.session_preset,
        logger.clone(),
    ));

    let image_classifier: Arc<dyn ImageClassifier + Send + Sync> =
        match config.classifier.api_key {
            Some(_) => Arc::new(ImageClassifierHttp::new(&config.classifier, logger.clone())?),
            None => Arc::new(ImageClassifierFake::new(logger.clone())),
        };

    let prediction_store = Arc::new(PredictionStoreFile::open(&config.store_path, logger.clone())?);

    let controller = CaptureController::new(
        config.clone(),
        logger.clone(),
        frame_capture,
        image_classifier,
        prediction_store.clone(),
        Arc::new(NotifierConsole::new()),
    );
    let handle = controller.handle();
    let running = controller.spawn();

    std::thread::sleep(Duration::from_millis(500));
    handle.focus_at(PreviewPoint::new(187.0, 333.0, 375.0, 667.0))?;
    handle.toggle_flash()?;
    for _ in 0..3 {
        handle.trigger_capture()?;
        std::thread::sleep(Duration::from_secs(2));
    }
    handle.toggle_flash()?;
    handle.open_settings()?;
    std::thread::sleep(Duration::from_millis(200));

    handle.shutdown()?;
    if running.join().is_err() {
        let _ = logger.error("Controller thread panicked");
    }

    for prediction in prediction_store.list_all()? {
        println!(
            "#{} {} ({:.0}%) at {}",
            prediction.id,
            prediction.label,
            prediction.confidence * 100.0,
            prediction.created_at
        );
    }
    println!("History kept in {}", prediction_store.path().display());
    prediction_store.close()?;

    Ok(())
}
