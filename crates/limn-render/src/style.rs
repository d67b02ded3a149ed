use crate::{Color, TextStyle};
use limn_base::Vec2;
use serde::{Deserialize, Serialize};

/// Look of the pose overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub marker_diameter: f32,
    pub marker_color: Color,
    pub label_size: f32,
    pub label_color: Color,
    pub label_stroke: Color,
    pub label_stroke_width: u32,
    /// Label position relative to the keypoint, `[dx, dy]`.
    pub label_offset: [f32; 2],
    pub bone_weight: f32,
    pub bone_color: Color,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            marker_diameter: 15.0,
            marker_color: Color::RED,
            label_size: 14.0,
            label_color: Color::WHITE,
            label_stroke: Color::BLACK,
            label_stroke_width: 2,
            label_offset: [15.0, 0.0],
            bone_weight: 3.0,
            bone_color: Color::RED,
        }
    }
}

impl OverlayStyle {
    pub fn label_style(&self) -> TextStyle {
        TextStyle {
            size: self.label_size,
            fill: self.label_color,
            stroke: self.label_stroke,
            stroke_width: self.label_stroke_width,
        }
    }

    pub fn label_offset(&self) -> Vec2<f32> {
        Vec2::new(self.label_offset[0], self.label_offset[1])
    }
}
