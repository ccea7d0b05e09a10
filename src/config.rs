use crate::device_camera::interface::SessionPreset;
use crate::image_classifier::interface::ModelId;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model_id: ModelId,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub logger_timezone: chrono::FixedOffset,
    pub session_preset: SessionPreset,
    pub still_frame_timeout: Duration,
    pub store_path: PathBuf,
    pub classifier: ClassifierConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger_timezone: mountain_standard_time(),
            session_preset: SessionPreset::High,
            still_frame_timeout: Duration::from_secs(5),
            store_path: PathBuf::from("predictions.json"),
            classifier: ClassifierConfig {
                base_url: "https://api.clarifai.com".to_string(),
                api_key: None,
                model_id: ModelId::general(),
                request_timeout: Duration::from_secs(30),
            },
        }
    }
}

impl Config {
    /// Overrides defaults with `EYEBOT_API_KEY`, `EYEBOT_API_URL` and `EYEBOT_STORE_PATH`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(api_key) = std::env::var("EYEBOT_API_KEY") {
            if !api_key.trim().is_empty() {
                config.classifier.api_key = Some(api_key);
            }
        }
        if let Ok(base_url) = std::env::var("EYEBOT_API_URL") {
            config.classifier.base_url = base_url;
        }
        if let Ok(store_path) = std::env::var("EYEBOT_STORE_PATH") {
            config.store_path = PathBuf::from(store_path);
        }

        config
    }
}

fn mountain_standard_time() -> chrono::FixedOffset {
    chrono::FixedOffset::west_opt(7 * 3600).unwrap()
}
