use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type PredictionId = u64;

/// What the capture pipeline hands to the store after a successful classification.
#[derive(Clone, PartialEq)]
pub struct NewPrediction {
    pub label: String,
    pub confidence: f32,
    pub image: Vec<u8>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPrediction {
    pub id: PredictionId,
    pub label: String,
    pub confidence: f32,
    #[serde(with = "base64_bytes")]
    pub image: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for NewPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPrediction")
            .field("label", &self.label)
            .field("confidence", &self.confidence)
            .field("image_bytes", &self.image.len())
            .finish()
    }
}

impl fmt::Debug for StoredPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredPrediction")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("confidence", &self.confidence)
            .field("image_bytes", &self.image.len())
            .field("created_at", &self.created_at)
            .finish()
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
