//! Pose data model and the boundary to pose estimators.
//!
//! Estimators are opaque: they take frames and emit pose sequences on
//! their own schedule. Everything they emit is validated here into
//! `Pose`/`Keypoint` records before the rest of the pipeline sees it.

pub mod boundary;
pub mod config;
pub mod error;
pub mod estimator;
pub mod process;
pub mod skeleton;
pub mod threshold;
pub mod types;

pub use boundary::{Parsed, parse_detections, poses_from_value};
pub use config::{EstimatorConfig, ModelVariant, MoveNetType};
pub use error::{EstimatorError, PoseError};
pub use estimator::{PoseCallback, PoseEstimator};
pub use process::ProcessEstimator;
pub use skeleton::{Bone, Skeleton};
pub use threshold::Threshold;
pub use types::{COCO_KEYPOINT_COUNT, COCO_KEYPOINT_NAMES, Keypoint, KeypointIndex, Pose};
