//! Camera capture for the limn pipeline.
//!
//! A `CaptureSource` turns `VideoConstraints` into a `MediaStream`: a
//! channel of decoded RGB frames plus the tracks that produce them.
//! Stopping the stream stops every track and releases the device.

pub mod config;
pub mod error;
pub mod stream;
pub mod traits;
pub mod videoframe;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::{FacingMode, VideoConstraints};
pub use error::CaptureError;
pub use stream::{FrameResult, MediaStream, Track};
pub use traits::CaptureSource;
pub use videoframe::{FrameReceiver, FrameSender, VideoFrame, frame_channel};

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Source;
