use std::fmt;

/// Capture failures. Every variant is terminal for the session that hit it.
#[derive(Debug)]
pub enum CaptureError {
    /// Access to the camera was refused.
    PermissionDenied(String),
    /// No capture hardware matched the request.
    NotFound(String),
    Device(String),
    Stream(String),
    Decode(String),
    Channel(String),
}

impl CaptureError {
    /// Short reason suitable for showing to a person.
    pub fn reason(&self) -> String {
        match self {
            CaptureError::PermissionDenied(msg) => format!("permission denied ({msg})"),
            CaptureError::NotFound(msg) => format!("no camera found ({msg})"),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::PermissionDenied(msg) => write!(f, "permission denied: {msg}"),
            CaptureError::NotFound(msg) => write!(f, "device not found: {msg}"),
            CaptureError::Device(msg) => write!(f, "device error: {msg}"),
            CaptureError::Stream(msg) => write!(f, "stream error: {msg}"),
            CaptureError::Decode(msg) => write!(f, "decode error: {msg}"),
            CaptureError::Channel(msg) => write!(f, "channel error: {msg}"),
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => CaptureError::PermissionDenied(err.to_string()),
            std::io::ErrorKind::NotFound => CaptureError::NotFound(err.to_string()),
            _ => CaptureError::Device(err.to_string()),
        }
    }
}

impl From<crates_image::ImageError> for CaptureError {
    fn from(err: crates_image::ImageError) -> Self {
        CaptureError::Decode(err.to_string())
    }
}
