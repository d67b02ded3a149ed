use limn_pose::{EstimatorError, PoseError};
use limn_render::RenderError;
use limn_video::CaptureError;
use std::fmt;

#[derive(Debug)]
pub enum SessionError {
    /// Camera request or stream failure. Terminal, never retried.
    Capture(CaptureError),
    /// Model load or detection start failure.
    Estimator(EstimatorError),
    Config(String),
    Io(String),
    /// The display rejected a frame.
    Present(String),
}

impl SessionError {
    /// One line for a person to read.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Capture(e) => format!("Camera access error: {}", e.reason()),
            SessionError::Estimator(e) => format!("Pose estimator error: {}", e),
            SessionError::Config(msg) => format!("Configuration error: {}", msg),
            SessionError::Io(msg) => format!("I/O error: {}", msg),
            SessionError::Present(msg) => format!("Display error: {}", msg),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Capture(e) => write!(f, "capture error: {}", e),
            SessionError::Estimator(e) => write!(f, "estimator error: {}", e),
            SessionError::Config(msg) => write!(f, "config error: {}", msg),
            SessionError::Io(msg) => write!(f, "I/O error: {}", msg),
            SessionError::Present(msg) => write!(f, "present error: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Capture(e) => Some(e),
            SessionError::Estimator(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CaptureError> for SessionError {
    fn from(err: CaptureError) -> Self {
        SessionError::Capture(err)
    }
}

impl From<EstimatorError> for SessionError {
    fn from(err: EstimatorError) -> Self {
        SessionError::Estimator(err)
    }
}

impl From<PoseError> for SessionError {
    fn from(err: PoseError) -> Self {
        SessionError::Config(err.to_string())
    }
}

impl From<RenderError> for SessionError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Io(msg) => SessionError::Io(msg),
            RenderError::Font(msg) => SessionError::Config(format!("font: {}", msg)),
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Config(err.to_string())
    }
}
