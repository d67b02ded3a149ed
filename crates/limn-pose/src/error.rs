use std::fmt;

/// Problems with pose data itself.
#[derive(Debug, Clone, PartialEq)]
pub enum PoseError {
    /// Estimator output that could not be read as detections at all.
    Malformed(String),
    InvalidThreshold(f32),
    InvalidBone(String),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoseError::Malformed(msg) => write!(f, "malformed detections: {msg}"),
            PoseError::InvalidThreshold(value) => {
                write!(f, "invalid confidence threshold {value}: must be within [0, 1]")
            }
            PoseError::InvalidBone(msg) => write!(f, "invalid bone: {msg}"),
        }
    }
}

impl std::error::Error for PoseError {}

/// Failures of an estimator backend.
#[derive(Debug)]
pub enum EstimatorError {
    /// The model could not be initialized.
    ModelLoad(String),
    Spawn(String),
    Protocol(String),
    Io(String),
    /// `detect_start` was called on an estimator that is already detecting.
    AlreadyStarted,
}

impl fmt::Display for EstimatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimatorError::ModelLoad(msg) => write!(f, "model load failed: {msg}"),
            EstimatorError::Spawn(msg) => write!(f, "failed to start estimator: {msg}"),
            EstimatorError::Protocol(msg) => write!(f, "estimator protocol error: {msg}"),
            EstimatorError::Io(msg) => write!(f, "estimator io error: {msg}"),
            EstimatorError::AlreadyStarted => write!(f, "detection already started"),
        }
    }
}

impl std::error::Error for EstimatorError {}

impl From<std::io::Error> for EstimatorError {
    fn from(err: std::io::Error) -> Self {
        EstimatorError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for EstimatorError {
    fn from(err: serde_json::Error) -> Self {
        EstimatorError::Protocol(err.to_string())
    }
}

impl From<PoseError> for EstimatorError {
    fn from(err: PoseError) -> Self {
        EstimatorError::Protocol(err.to_string())
    }
}
