use crate::{Keypoint, PoseError};
use serde::{Deserialize, Serialize};

/// Minimum confidence a keypoint must exceed to be drawn.
///
/// The comparison is strict: a keypoint exactly at the threshold is not drawn.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Threshold(f32);

impl Threshold {
    pub const DEFAULT: f32 = 0.2;

    pub fn new(value: f32) -> Result<Self, PoseError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PoseError::InvalidThreshold(value))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// NaN never passes.
    pub fn passes(self, confidence: f32) -> bool {
        confidence > self.0
    }

    pub fn admits(self, keypoint: &Keypoint) -> bool {
        self.passes(keypoint.confidence)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<f32> for Threshold {
    type Error = PoseError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for f32 {
    fn from(threshold: Threshold) -> f32 {
        threshold.0
    }
}
