//! Drawing for the limn pipeline.
//!
//! `OverlayPolicy` decides which keypoints and bones pass the confidence
//! threshold, `FrameRenderer` composes one display tick, and a `Surface`
//! receives the resulting primitives.

pub mod error;
pub mod policy;
pub mod renderer;
pub mod rgb;
pub mod style;
pub mod surface;

pub use error::RenderError;
pub use policy::{BoneSegment, Marker, OverlayItem, OverlayPlan, OverlayPolicy};
pub use renderer::{FrameRenderer, RenderStats};
pub use rgb::{RgbSurface, load_font};
pub use style::OverlayStyle;
pub use surface::{Color, DrawCommand, DrawList, Surface, TextStyle};
