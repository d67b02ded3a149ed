use limn_base::Vec2;
use limn_render::{RgbSurface, Surface};
use limn_session::{Presenter, SessionError};
use minifb::{Key, Window, WindowOptions};

/// A minifb window showing the rendered canvas. ESC closes it.
pub struct WindowPresenter {
    window: Window,
}

impl WindowPresenter {
    pub fn open(title: &str, size: Vec2<usize>) -> Result<Self, SessionError> {
        let window = Window::new(title, size.x, size.y, WindowOptions::default())
            .map_err(|e| SessionError::Present(e.to_string()))?;
        Ok(Self { window })
    }
}

impl Presenter<RgbSurface> for WindowPresenter {
    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    fn present(&mut self, surface: &RgbSurface) -> Result<(), SessionError> {
        let size = surface.size();
        let argb = surface.to_argb();
        self.window
            .update_with_buffer(&argb, size.x, size.y)
            .map_err(|e| SessionError::Present(e.to_string()))
    }
}
