//! One camera, one pose estimator, one surface.
//!
//! A `Session` owns the capture stream, the running estimator and the render
//! surface. Detections land in a latest-results slot at the estimator's
//! pace; each display tick draws the newest frame with the newest poses.

pub mod config;
pub mod error;
pub mod feed;
pub mod latest;
pub mod session;

pub use config::{CanvasConfig, DetectorCommand, OverlayConfig, SessionConfig};
pub use error::SessionError;
pub use feed::DetectionFeed;
pub use latest::{Detections, PoseReader, PoseWriter, latest_poses};
pub use session::{Presenter, Session, TeardownReport};
