use crate::SessionError;
use limn_base::{LogConfig, Vec2};
use limn_pose::{EstimatorConfig, Threshold};
use limn_render::{OverlayPolicy, OverlayStyle};
use limn_video::VideoConstraints;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Render surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// External detector program speaking the stdio detection protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for DetectorCommand {
    fn default() -> Self {
        Self {
            program: "limn-detector".to_string(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub threshold: Threshold,
    /// Draw keypoint names next to the markers.
    pub labels: bool,
    pub style: OverlayStyle,
    /// TTF/OTF font for labels. Labels are skipped without one.
    pub font: Option<PathBuf>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            labels: true,
            style: OverlayStyle::default(),
            font: None,
        }
    }
}

impl OverlayConfig {
    pub fn policy(&self) -> OverlayPolicy {
        OverlayPolicy::new(self.threshold)
            .with_labels(self.labels)
            .with_style(self.style.clone())
    }
}

/// Everything a session needs, loadable from JSON. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub canvas: CanvasConfig,
    /// Display ticks per second.
    pub fps: u32,
    pub capture: VideoConstraints,
    pub estimator: EstimatorConfig,
    pub detector: DetectorCommand,
    pub overlay: OverlayConfig,
    pub log: LogConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            fps: 30,
            capture: VideoConstraints::default(),
            estimator: EstimatorConfig::default(),
            detector: DetectorCommand::default(),
            overlay: OverlayConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SessionError::Io(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json(&text)?;
        log::debug!("loaded session config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, SessionError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.fps == 0 {
            return Err(SessionError::Config("fps must be at least 1".to_string()));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(SessionError::Config(format!(
                "canvas {}x{} has no pixels",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.detector.program.is_empty() {
            return Err(SessionError::Config("detector program is empty".to_string()));
        }
        Ok(())
    }

    pub fn canvas_size(&self) -> Vec2<usize> {
        Vec2::new(self.canvas.width, self.canvas.height)
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}
