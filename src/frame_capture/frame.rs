use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat};
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

/// A still image taken from the live stream, already upright.
#[derive(Clone)]
pub struct Frame {
    image: Arc<DynamicImage>,
    pub captured_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(image: DynamicImage, captured_at: DateTime<Utc>) -> Self {
        Self {
            image: Arc::new(image),
            captured_at,
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn encode_jpeg(&self) -> image::ImageResult<Vec<u8>> {
        let mut bytes = Vec::new();
        // JPEG has no alpha channel.
        let rgb = DynamicImage::ImageRgb8(self.image.to_rgb8());
        rgb.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)?;
        Ok(bytes)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("captured_at", &self.captured_at)
            .finish()
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.captured_at == other.captured_at
            && self.image.as_bytes() == other.image.as_bytes()
    }
}
