use limn_base::Vec2;
use limn_video::VideoFrame;
use serde::{Deserialize, Serialize};

/// An RGB color, serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const RED: Color = Color([255, 0, 0]);

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }
}

/// Filled text with an outline drawn underneath.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Pixel height of the glyphs.
    pub size: f32,
    pub fill: Color,
    pub stroke: Color,
    /// Outline thickness in pixels, 0 for none.
    pub stroke_width: u32,
}

/// Something the renderer can draw onto.
///
/// Positions are in surface pixels with the origin at the top-left corner.
/// Drawing outside the surface is clipped, never an error.
pub trait Surface {
    fn size(&self) -> Vec2<usize>;

    /// Copy `frame` with its top-left corner at `at`.
    fn blit(&mut self, frame: &VideoFrame, at: Vec2<i32>);

    /// Filled ellipse centered on `center`, `diameter` wide and high.
    fn fill_ellipse(&mut self, center: Vec2<f32>, diameter: Vec2<f32>, color: Color);

    fn line(&mut self, from: Vec2<f32>, to: Vec2<f32>, weight: f32, color: Color);

    /// Text with its baseline starting at `at`.
    fn text(&mut self, text: &str, at: Vec2<f32>, style: &TextStyle);

    /// Drop the pixel storage. Drawing afterwards is a no-op.
    fn release(&mut self);
}

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Blit {
        size: Vec2<usize>,
        at: Vec2<i32>,
    },
    Ellipse {
        center: Vec2<f32>,
        diameter: Vec2<f32>,
        color: Color,
    },
    Line {
        from: Vec2<f32>,
        to: Vec2<f32>,
        weight: f32,
        color: Color,
    },
    Text {
        text: String,
        at: Vec2<f32>,
        style: TextStyle,
    },
}

/// A surface that records what was drawn instead of rasterizing it.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    size: Vec2<usize>,
    commands: Vec<DrawCommand>,
    released: bool,
}

impl DrawList {
    pub fn new(size: Vec2<usize>) -> Self {
        Self {
            size,
            commands: Vec::new(),
            released: false,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn blits(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Blit { .. }))
    }

    pub fn ellipses(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Ellipse { .. }))
    }

    pub fn lines(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    fn record(&mut self, command: DrawCommand) {
        if !self.released {
            self.commands.push(command);
        }
    }
}

impl Surface for DrawList {
    fn size(&self) -> Vec2<usize> {
        self.size
    }

    fn blit(&mut self, frame: &VideoFrame, at: Vec2<i32>) {
        self.record(DrawCommand::Blit {
            size: frame.size(),
            at,
        });
    }

    fn fill_ellipse(&mut self, center: Vec2<f32>, diameter: Vec2<f32>, color: Color) {
        self.record(DrawCommand::Ellipse {
            center,
            diameter,
            color,
        });
    }

    fn line(&mut self, from: Vec2<f32>, to: Vec2<f32>, weight: f32, color: Color) {
        self.record(DrawCommand::Line {
            from,
            to,
            weight,
            color,
        });
    }

    fn text(&mut self, text: &str, at: Vec2<f32>, style: &TextStyle) {
        self.record(DrawCommand::Text {
            text: text.to_string(),
            at,
            style: *style,
        });
    }

    fn release(&mut self) {
        self.released = true;
        self.commands.clear();
        self.size = Vec2::zero();
    }
}
