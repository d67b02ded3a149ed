use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    Font(String),
    Io(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Font(msg) => write!(f, "font error: {}", msg),
            RenderError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err.to_string())
    }
}

impl From<ab_glyph::InvalidFont> for RenderError {
    fn from(err: ab_glyph::InvalidFont) -> Self {
        RenderError::Font(err.to_string())
    }
}
