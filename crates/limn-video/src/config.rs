use serde::{Deserialize, Serialize};

/// Which way the requested camera should face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    #[default]
    User,
    Environment,
}

/// What to ask a capture source for.
///
/// Width and height are ideal values: a backend may settle on the closest
/// size the hardware supports and reports it through `MediaStream::size`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConstraints {
    device: Option<String>,
    width: u32,
    height: u32,
    facing_mode: FacingMode,
    fps: u32,
    buffer_count: u32,
}

impl Default for VideoConstraints {
    fn default() -> Self {
        Self {
            device: None,
            width: 640,
            height: 480,
            facing_mode: FacingMode::User,
            fps: 30,
            buffer_count: 4,
        }
    }
}

impl VideoConstraints {
    /// Pin a device path (e.g., "/dev/video0"). Without one the first device found is used.
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Set the ideal capture width in pixels.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set the ideal capture height in pixels.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn with_facing_mode(mut self, facing_mode: FacingMode) -> Self {
        self.facing_mode = facing_mode;
        self
    }

    /// Set the frames per second.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the number of frames buffered between the device and the consumer.
    pub fn with_buffer_count(mut self, buffer_count: u32) -> Self {
        self.buffer_count = buffer_count;
        self
    }

    // Getters
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn facing_mode(&self) -> FacingMode {
        self.facing_mode
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn buffer_count(&self) -> u32 {
        self.buffer_count.max(1)
    }
}
