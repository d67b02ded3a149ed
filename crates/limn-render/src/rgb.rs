use crate::{Color, RenderError, Surface, TextStyle};
use ab_glyph::{FontVec, PxScale};
use crates_image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_ellipse_mut, draw_line_segment_mut, draw_polygon_mut,
    draw_text_mut,
};
use imageproc::point::Point;
use limn_base::Vec2;
use limn_video::VideoFrame;
use std::path::Path;

/// Load a TrueType/OpenType font for labels.
pub fn load_font(path: impl AsRef<Path>) -> Result<FontVec, RenderError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| RenderError::Io(format!("{}: {}", path.display(), e)))?;
    Ok(FontVec::try_from_vec(bytes)?)
}

/// An in-memory RGB8 canvas.
///
/// Labels need a font; without one, `text` draws nothing.
pub struct RgbSurface {
    image: RgbImage,
    font: Option<FontVec>,
    released: bool,
}

impl std::fmt::Debug for RgbSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbSurface")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("font", &self.font.is_some())
            .field("released", &self.released)
            .finish()
    }
}

impl RgbSurface {
    /// Black canvas of `size` pixels.
    pub fn new(size: Vec2<usize>) -> Self {
        Self {
            image: RgbImage::new(size.x as u32, size.y as u32),
            font: None,
            released: false,
        }
    }

    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.image
            .get_pixel_checked(x as u32, y as u32)
            .map(|p| Color(p.0))
    }

    /// Packed `0x00RRGGBB` pixels, the layout minifb expects.
    pub fn to_argb(&self) -> Vec<u32> {
        self.image
            .as_raw()
            .chunks_exact(3)
            .map(|px| ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32)
            .collect()
    }

    pub fn to_frame(&self) -> VideoFrame {
        VideoFrame::from_rgb_image(self.image.clone())
    }

    fn width(&self) -> i32 {
        self.image.width() as i32
    }

    fn height(&self) -> i32 {
        self.image.height() as i32
    }
}

impl Surface for RgbSurface {
    fn size(&self) -> Vec2<usize> {
        Vec2::new(self.image.width() as usize, self.image.height() as usize)
    }

    fn blit(&mut self, frame: &VideoFrame, at: Vec2<i32>) {
        let src = frame.size();
        let data = frame.data();
        let width = self.width();
        let height = self.height();

        for sy in 0..src.y as i32 {
            let y = at.y + sy;
            if y < 0 || y >= height {
                continue;
            }
            // clip the row horizontally
            let sx0 = (-at.x).max(0);
            let sx1 = (width - at.x).min(src.x as i32);
            if sx0 >= sx1 {
                return;
            }
            let src_start = (sy as usize * src.x + sx0 as usize) * 3;
            let src_end = (sy as usize * src.x + sx1 as usize) * 3;
            let dst_start = (y as usize * width as usize + (at.x + sx0) as usize) * 3;
            let dst_end = dst_start + (src_end - src_start);
            let dst: &mut [u8] = &mut self.image;
            dst[dst_start..dst_end].copy_from_slice(&data[src_start..src_end]);
        }
    }

    fn fill_ellipse(&mut self, center: Vec2<f32>, diameter: Vec2<f32>, color: Color) {
        if !(diameter.x > 0.0 && diameter.y > 0.0) || !center.is_finite() || self.released {
            return;
        }
        let center = center.round_i32();
        let rx = (diameter.x / 2.0).round().max(1.0) as i32;
        let ry = (diameter.y / 2.0).round().max(1.0) as i32;

        // far off-canvas centers would only burn cycles on clipped rows
        if center.x + rx < 0
            || center.y + ry < 0
            || center.x - rx >= self.width()
            || center.y - ry >= self.height()
        {
            return;
        }
        draw_filled_ellipse_mut(&mut self.image, (center.x, center.y), rx, ry, Rgb(color.0));
    }

    fn line(&mut self, from: Vec2<f32>, to: Vec2<f32>, weight: f32, color: Color) {
        if !from.is_finite() || !to.is_finite() || self.width() == 0 || self.height() == 0 {
            return;
        }
        let radius = ((weight - 1.0) / 2.0).round().max(0.0) as i32;
        let Some((x0, y0, x1, y1)) = clip_segment(
            from.round_i32(),
            to.round_i32(),
            -radius,
            self.width() - 1 + radius,
            self.height() - 1 + radius,
        ) else {
            return;
        };
        let pixel = Rgb(color.0);

        if radius == 0 {
            draw_line_segment_mut(
                &mut self.image,
                (x0 as f32, y0 as f32),
                (x1 as f32, y1 as f32),
                pixel,
            );
            return;
        }

        // thick line: a quad along the segment with round caps
        draw_filled_circle_mut(&mut self.image, (x0, y0), radius, pixel);
        draw_filled_circle_mut(&mut self.image, (x1, y1), radius, pixel);
        let (dx, dy) = ((x1 - x0) as f32, (y1 - y0) as f32);
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            return;
        }
        let nx = (-dy / len * radius as f32).round() as i32;
        let ny = (dx / len * radius as f32).round() as i32;
        let quad = [
            Point::new(x0 + nx, y0 + ny),
            Point::new(x1 + nx, y1 + ny),
            Point::new(x1 - nx, y1 - ny),
            Point::new(x0 - nx, y0 - ny),
        ];
        draw_polygon_mut(&mut self.image, &quad, pixel);
    }

    fn text(&mut self, text: &str, at: Vec2<f32>, style: &TextStyle) {
        let Some(font) = &self.font else {
            return;
        };
        if text.is_empty() || !at.is_finite() || self.released {
            return;
        }

        let scale = PxScale::from(style.size);
        // imageproc positions the glyph box by its top-left corner
        let x = at.x.round() as i32;
        let y = (at.y - style.size).round() as i32;

        let w = style.stroke_width as i32;
        if w > 0 {
            for oy in -w..=w {
                for ox in -w..=w {
                    if (ox, oy) != (0, 0) && ox * ox + oy * oy <= w * w {
                        draw_text_mut(
                            &mut self.image,
                            Rgb(style.stroke.0),
                            x + ox,
                            y + oy,
                            scale,
                            font,
                            text,
                        );
                    }
                }
            }
        }
        draw_text_mut(&mut self.image, Rgb(style.fill.0), x, y, scale, font, text);
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.image = RgbImage::new(0, 0);
        self.font = None;
        self.released = true;
        log::debug!("render surface released");
    }
}

/// Cohen-Sutherland clipping of a segment to `[min, max_x] x [min, max_y]`.
/// `None` when the segment lies entirely outside.
fn clip_segment(
    from: Vec2<i32>,
    to: Vec2<i32>,
    min: i32,
    max_x: i32,
    max_y: i32,
) -> Option<(i32, i32, i32, i32)> {
    let (mut x0, mut y0, mut x1, mut y1) = (from.x, from.y, to.x, to.y);
    loop {
        let code0 = outcode(x0, y0, min, max_x, max_y);
        let code1 = outcode(x1, y1, min, max_x, max_y);
        if code0 | code1 == INSIDE {
            return Some((x0, y0, x1, y1));
        }
        if code0 & code1 != INSIDE {
            return None;
        }
        let code = if code0 != INSIDE { code0 } else { code1 };
        let (x, y) = clip_point(x0, y0, x1, y1, code, min, max_x, max_y);
        if code == code0 {
            x0 = x;
            y0 = y;
        } else {
            x1 = x;
            y1 = y;
        }
    }
}

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

fn outcode(x: i32, y: i32, min: i32, max_x: i32, max_y: i32) -> u8 {
    let mut code = INSIDE;
    if x < min {
        code |= LEFT;
    } else if x > max_x {
        code |= RIGHT;
    }
    if y < min {
        code |= TOP;
    } else if y > max_y {
        code |= BOTTOM;
    }
    code
}

#[allow(clippy::too_many_arguments)]
fn clip_point(
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    code: u8,
    min: i32,
    max_x: i32,
    max_y: i32,
) -> (i32, i32) {
    // widen to i64, keypoints far off-canvas would overflow the products
    let (x0, y0, x1, y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
    let (dx, dy) = (x1 - x0, y1 - y0);
    let (min, max_x, max_y) = (min as i64, max_x as i64, max_y as i64);

    let (x, y) = if code & TOP != 0 {
        (x0 + dx * (min - y0) / dy, min)
    } else if code & BOTTOM != 0 {
        (x0 + dx * (max_y - y0) / dy, max_y)
    } else if code & LEFT != 0 {
        (min, y0 + dy * (min - x0) / dx)
    } else {
        (max_x, y0 + dy * (max_x - x0) / dx)
    };
    (x as i32, y as i32)
}
