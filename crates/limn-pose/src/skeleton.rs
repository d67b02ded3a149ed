use crate::{KeypointIndex, ModelVariant, PoseError};
use serde_json::Value;

/// A drawn connection between two keypoints of the same pose, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bone(pub usize, pub usize);

/// Bone topology. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

// MoveNet adjacent pairs over the 17 COCO keypoints
const COCO_BONES: [(KeypointIndex, KeypointIndex); 16] = {
    use KeypointIndex::*;
    [
        (Nose, LeftEye),
        (Nose, RightEye),
        (LeftEye, LeftEar),
        (RightEye, RightEar),
        (LeftShoulder, RightShoulder),
        (LeftShoulder, LeftElbow),
        (LeftShoulder, LeftHip),
        (RightShoulder, RightElbow),
        (RightShoulder, RightHip),
        (LeftElbow, LeftWrist),
        (RightElbow, RightWrist),
        (LeftHip, RightHip),
        (LeftHip, LeftKnee),
        (RightHip, RightKnee),
        (LeftKnee, LeftAnkle),
        (RightKnee, RightAnkle),
    ]
};

// BlazePose connections over its 33 landmarks
const BLAZEPOSE_BONES: [(usize, usize); 35] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 7),
    (0, 4),
    (4, 5),
    (5, 6),
    (6, 8),
    (9, 10),
    (11, 12),
    (11, 13),
    (13, 15),
    (15, 17),
    (15, 19),
    (15, 21),
    (17, 19),
    (12, 14),
    (14, 16),
    (16, 18),
    (16, 20),
    (16, 22),
    (18, 20),
    (11, 23),
    (12, 24),
    (23, 24),
    (23, 25),
    (24, 26),
    (25, 27),
    (26, 28),
    (27, 29),
    (28, 30),
    (29, 31),
    (30, 32),
    (27, 31),
    (28, 32),
];

impl Skeleton {
    pub fn new(bones: Vec<Bone>) -> Self {
        Self { bones }
    }

    /// MoveNet / COCO-17 topology.
    pub fn coco() -> Self {
        Self::new(
            COCO_BONES
                .iter()
                .map(|&(a, b)| Bone(a.into(), b.into()))
                .collect(),
        )
    }

    /// BlazePose-33 topology.
    pub fn blazepose() -> Self {
        Self::new(BLAZEPOSE_BONES.iter().map(|&(a, b)| Bone(a, b)).collect())
    }

    pub fn for_model(model: ModelVariant) -> Self {
        match model {
            ModelVariant::MoveNet => Self::coco(),
            ModelVariant::BlazePose => Self::blazepose(),
        }
    }

    /// Read a `[[i, j], ...]` list as reported by an estimator.
    pub fn from_json(value: &Value) -> Result<Self, PoseError> {
        let pairs = value
            .as_array()
            .ok_or_else(|| PoseError::InvalidBone(format!("expected a list of pairs, got {value}")))?;

        pairs
            .iter()
            .map(|pair| match pair.as_array().map(Vec::as_slice) {
                Some([a, b]) => match (a.as_u64(), b.as_u64()) {
                    (Some(a), Some(b)) => Ok(Bone(a as usize, b as usize)),
                    _ => Err(PoseError::InvalidBone(format!("non-index entry {pair}"))),
                },
                _ => Err(PoseError::InvalidBone(format!("expected [i, j], got {pair}"))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}
