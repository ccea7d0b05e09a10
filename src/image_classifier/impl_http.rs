use crate::config::ClassifierConfig;
use crate::error::ClassifyError;
use crate::frame_capture::frame::Frame;
use crate::image_classifier::interface::{
    Classification, ClassificationResult, ImageClassifier, ModelId,
};
use crate::library::logger::interface::Logger;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const STATUS_SUCCESS: u32 = 10000;

#[derive(Debug, Serialize)]
pub struct PredictRequest {
    pub inputs: Vec<PredictInput>,
}

#[derive(Debug, Serialize)]
pub struct PredictInput {
    pub data: InputData,
}

#[derive(Debug, Serialize)]
pub struct InputData {
    pub image: InputImage,
}

#[derive(Debug, Serialize)]
pub struct InputImage {
    pub base64: String,
}

#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    pub status: Status,
    #[serde(default)]
    pub outputs: Vec<Output>,
}

#[derive(Debug, Deserialize)]
pub struct Status {
    pub code: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Output {
    pub data: OutputData,
}

#[derive(Debug, Deserialize)]
pub struct OutputData {
    #[serde(default)]
    pub concepts: Vec<Concept>,
}

#[derive(Debug, Deserialize)]
pub struct Concept {
    pub name: String,
    pub value: f32,
}

impl PredictRequest {
    pub fn from_jpeg(jpeg: &[u8]) -> Self {
        Self {
            inputs: vec![PredictInput {
                data: InputData {
                    image: InputImage {
                        base64: STANDARD.encode(jpeg),
                    },
                },
            }],
        }
    }
}

impl PredictResponse {
    pub fn into_result(self) -> Result<ClassificationResult, ClassifyError> {
        if self.status.code != STATUS_SUCCESS {
            let message = match self.status.details {
                Some(details) if !details.is_empty() => {
                    format!("{} ({})", self.status.description, details)
                }
                _ => self.status.description,
            };
            return Err(ClassifyError::Service(message));
        }

        let output = self
            .outputs
            .into_iter()
            .next()
            .ok_or_else(|| ClassifyError::InvalidResponse("response has no outputs".to_string()))?;

        Ok(ClassificationResult::new(
            output
                .data
                .concepts
                .into_iter()
                .map(|concept| Classification {
                    label: concept.name,
                    confidence: concept.value,
                })
                .collect(),
        ))
    }
}

/// Classifies frames with a hosted model over the `v2` predict endpoint.
pub struct ImageClassifierHttp {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierHttp {
    pub fn new(
        config: &ClassifierConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, ClassifyError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ClassifyError::Service("no API key configured".to_string()))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            logger: logger.with_namespace("classifier").with_namespace("http"),
        })
    }

    pub fn endpoint(&self, model: &ModelId) -> String {
        format!("{}/v2/models/{}/outputs", self.base_url, model)
    }
}

impl ImageClassifier for ImageClassifierHttp {
    fn classify(
        &self,
        frame: &Frame,
        model: &ModelId,
    ) -> Result<ClassificationResult, ClassifyError> {
        let jpeg = frame
            .encode_jpeg()
            .map_err(|e| ClassifyError::Encode(e.to_string()))?;

        let url = self.endpoint(model);
        let _ = self
            .logger
            .info(&format!("POST {} ({} bytes)", url, jpeg.len()));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&PredictRequest::from_jpeg(&jpeg))
            .send()?;

        let http_status = response.status();
        let body: PredictResponse = match response.json() {
            Ok(body) => body,
            Err(e) if !http_status.is_success() => {
                return Err(ClassifyError::Service(format!("HTTP {}: {}", http_status, e)));
            }
            Err(e) => return Err(e.into()),
        };

        let result = body.into_result()?;
        let _ = self.logger.info(&format!(
            "Received {} concepts, top: {:?}",
            result.len(),
            result.top().map(|c| c.label.as_str())
        ));
        Ok(result)
    }
}
