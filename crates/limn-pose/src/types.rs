use limn_base::Vec2;

/// Number of keypoints in COCO pose format
pub const COCO_KEYPOINT_COUNT: usize = 17;

/// Keypoint names in COCO order, as MoveNet reports them.
pub const COCO_KEYPOINT_NAMES: [&str; COCO_KEYPOINT_COUNT] = [
    "nose",
    "left_eye",
    "right_eye",
    "left_ear",
    "right_ear",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
];

/// One detected landmark in frame-pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Keypoint {
    pub name: Option<String>,
    pub position: Vec2<f32>,
    /// Detection confidence in [0.0, 1.0]. Unknown confidence is stored as 0.0.
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(position: Vec2<f32>, confidence: f32) -> Self {
        Self {
            name: None,
            position,
            confidence,
        }
    }

    pub fn named(name: impl Into<String>, position: Vec2<f32>, confidence: f32) -> Self {
        Self {
            name: Some(name.into()),
            position,
            confidence,
        }
    }

    /// Stand-in for an entry the estimator left undefined. Never passes a threshold.
    pub fn missing() -> Self {
        Self::new(Vec2::zero(), 0.0)
    }
}

/// COCO keypoint indices for human pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const ALL: [KeypointIndex; COCO_KEYPOINT_COUNT] = [
        KeypointIndex::Nose,
        KeypointIndex::LeftEye,
        KeypointIndex::RightEye,
        KeypointIndex::LeftEar,
        KeypointIndex::RightEar,
        KeypointIndex::LeftShoulder,
        KeypointIndex::RightShoulder,
        KeypointIndex::LeftElbow,
        KeypointIndex::RightElbow,
        KeypointIndex::LeftWrist,
        KeypointIndex::RightWrist,
        KeypointIndex::LeftHip,
        KeypointIndex::RightHip,
        KeypointIndex::LeftKnee,
        KeypointIndex::RightKnee,
        KeypointIndex::LeftAnkle,
        KeypointIndex::RightAnkle,
    ];

    pub fn name(self) -> &'static str {
        COCO_KEYPOINT_NAMES[self as usize]
    }
}

impl From<KeypointIndex> for usize {
    fn from(index: KeypointIndex) -> usize {
        index as usize
    }
}

impl TryFrom<usize> for KeypointIndex {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        KeypointIndex::ALL.get(value).copied().ok_or_else(|| {
            format!(
                "Invalid keypoint index: {}. Must be in range 0-{}.",
                value,
                COCO_KEYPOINT_COUNT - 1
            )
        })
    }
}

/// All keypoints of one detected person, in topology order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
    /// Whole-pose score, when the estimator reports one.
    pub score: Option<f32>,
    /// Tracking id, when the estimator tracks people across frames.
    pub id: Option<u32>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self {
            keypoints,
            score: None,
            id: None,
        }
    }

    pub fn keypoint(&self, index: usize) -> Option<&Keypoint> {
        self.keypoints.get(index)
    }

    pub fn coco(&self, index: KeypointIndex) -> Option<&Keypoint> {
        self.keypoint(index.into())
    }

    pub fn keypoint_named(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints
            .iter()
            .find(|kp| kp.name.as_deref() == Some(name))
    }
}
