use crate::CaptureError;
use limn_base::Vec2;
use std::sync::Arc;
use tokio::sync::watch;

/// A decoded RGB8 frame, rows top to bottom, 3 bytes per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoFrame {
    size: Vec2<usize>,
    data: Vec<u8>,
}

impl VideoFrame {
    /// Wrap RGB8 pixel data. Fails if `data` does not hold exactly `size.x * size.y` pixels.
    pub fn new(size: Vec2<usize>, data: Vec<u8>) -> Result<Self, CaptureError> {
        let expected = size.area() * 3;
        if data.len() != expected {
            return Err(CaptureError::Stream(format!(
                "frame of {}x{} needs {} bytes, got {}",
                size.x,
                size.y,
                expected,
                data.len()
            )));
        }
        Ok(Self { size, data })
    }

    /// Solid-color frame, handy for tests and placeholders.
    pub fn filled(size: Vec2<usize>, color: [u8; 3]) -> Self {
        let data = color.iter().copied().cycle().take(size.area() * 3).collect();
        Self { size, data }
    }

    pub fn from_rgb_image(image: crates_image::RgbImage) -> Self {
        let size = Vec2::new(image.width() as usize, image.height() as usize);
        Self {
            size,
            data: image.into_raw(),
        }
    }

    /// Decode a JPEG (e.g. one MJPEG camera buffer) into RGB8.
    pub fn decode_jpeg(bytes: &[u8]) -> Result<Self, CaptureError> {
        let image =
            crates_image::load_from_memory_with_format(bytes, crates_image::ImageFormat::Jpeg)?;
        Ok(Self::from_rgb_image(image.to_rgb8()))
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.size.x || y >= self.size.y {
            return None;
        }
        let idx = (y * self.size.x + x) * 3;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }
}

/// Sending half of the newest-frame slot offered to a pose estimator.
pub type FrameSender = watch::Sender<Option<Arc<VideoFrame>>>;

/// Receiving half of the newest-frame slot. Readers only ever see the most recent frame.
pub type FrameReceiver = watch::Receiver<Option<Arc<VideoFrame>>>;

pub fn frame_channel() -> (FrameSender, FrameReceiver) {
    watch::channel(None)
}
