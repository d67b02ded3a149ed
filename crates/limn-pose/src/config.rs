use serde::{Deserialize, Serialize};

/// Model family the estimator runs. Decides the keypoint layout and topology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVariant {
    #[default]
    MoveNet,
    BlazePose,
}

/// MoveNet architecture: single- or multi-person, speed vs. accuracy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveNetType {
    #[serde(rename = "SINGLEPOSE_LIGHTNING")]
    SinglePoseLightning,
    #[serde(rename = "SINGLEPOSE_THUNDER")]
    SinglePoseThunder,
    #[default]
    #[serde(rename = "MULTIPOSE_LIGHTNING")]
    MultiPoseLightning,
}

impl MoveNetType {
    pub fn is_multi_pose(self) -> bool {
        matches!(self, MoveNetType::MultiPoseLightning)
    }
}

/// Options forwarded to the estimator. Their effect is up to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub model: ModelVariant,
    pub model_type: MoveNetType,
    pub enable_smoothing: bool,
    /// Poses scoring below this are dropped by the estimator.
    pub min_pose_score: f32,
    /// Keypoints scoring below this are reported with their score; drawing is gated separately.
    pub min_part_score: f32,
    pub max_poses: u32,
    /// Mirror coordinates horizontally (selfie view).
    pub flipped: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            model: ModelVariant::MoveNet,
            model_type: MoveNetType::MultiPoseLightning,
            enable_smoothing: true,
            min_pose_score: 0.25,
            min_part_score: 0.3,
            max_poses: 6,
            flipped: false,
        }
    }
}

impl EstimatorConfig {
    /// Pose count the estimator should report at most.
    pub fn effective_max_poses(&self) -> u32 {
        match self.model {
            ModelVariant::MoveNet if !self.model_type.is_multi_pose() => 1,
            ModelVariant::BlazePose => 1,
            _ => self.max_poses.max(1),
        }
    }
}
