use crate::device_camera::interface::DevicePoint;

/// A tap location in preview coordinates together with the preview size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewPoint {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PreviewPoint {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Maps the portrait preview onto the landscape sensor: the axes swap and
    /// the preview's x runs against the sensor's y.
    pub fn to_device(&self) -> DevicePoint {
        if self.width <= 0.0 || self.height <= 0.0 {
            return DevicePoint { x: 0.5, y: 0.5 };
        }
        DevicePoint {
            x: (self.y / self.height).clamp(0.0, 1.0),
            y: (1.0 - self.x / self.width).clamp(0.0, 1.0),
        }
    }
}
