pub mod capture_controller;
pub mod config;
pub mod device_camera;
pub mod error;
pub mod frame_capture;
pub mod image_classifier;
pub mod library;
pub mod notifier;
pub mod prediction_store;
