//! Native preview window (`preview` feature).

use super::{CropCommand, CropError, CropFrontend};
use image::RgbImage;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

const POLL_FPS: usize = 60;

/// A single window reused across images, recreated when the frame size changes.
pub struct WindowFrontend {
    window: Option<Window>,
    size: (usize, usize),
}

impl WindowFrontend {
    pub fn new() -> Self {
        Self {
            window: None,
            size: (0, 0),
        }
    }
}

fn command_for_key(key: Key) -> Option<CropCommand> {
    match key {
        Key::Left => Some(CropCommand::Left),
        Key::Right => Some(CropCommand::Right),
        Key::Up => Some(CropCommand::Up),
        Key::Down => Some(CropCommand::Down),
        Key::C => Some(CropCommand::Center),
        Key::Enter | Key::NumPadEnter => Some(CropCommand::Accept),
        Key::S => Some(CropCommand::Skip),
        Key::Q | Key::Escape => Some(CropCommand::Quit),
        _ => None,
    }
}

/// Pack RGB pixels as `0RGB` words, the layout minifb expects.
fn to_buffer(frame: &RgbImage) -> Vec<u32> {
    frame
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            (r as u32) << 16 | (g as u32) << 8 | b as u32
        })
        .collect()
}

impl CropFrontend for WindowFrontend {
    fn present(&mut self, frame: &RgbImage, caption: &str) -> Result<(), CropError> {
        let size = (frame.width() as usize, frame.height() as usize);
        if self.window.is_none() || self.size != size {
            self.window = None;
            let mut window = Window::new(caption, size.0, size.1, WindowOptions::default())
                .map_err(|e| CropError::Display(e.to_string()))?;
            window.set_target_fps(POLL_FPS);
            self.window = Some(window);
            self.size = size;
        }
        let Some(window) = self.window.as_mut() else {
            return Err(CropError::Display("preview window is not open".into()));
        };

        window.set_title(caption);
        window
            .update_with_buffer(&to_buffer(frame), size.0, size.1)
            .map_err(|e| CropError::Display(e.to_string()))
    }

    fn next_command(&mut self) -> Result<CropCommand, CropError> {
        let Some(window) = self.window.as_mut() else {
            return Err(CropError::Display("preview window is not open".into()));
        };

        loop {
            if !window.is_open() {
                // Closing the window ends the run, like pressing q
                return Ok(CropCommand::Quit);
            }
            if let Some(command) = window
                .get_keys_pressed(KeyRepeat::Yes)
                .into_iter()
                .find_map(command_for_key)
            {
                return Ok(command);
            }
            window.update();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(command_for_key(Key::Left), Some(CropCommand::Left));
        assert_eq!(command_for_key(Key::Enter), Some(CropCommand::Accept));
        assert_eq!(command_for_key(Key::Escape), Some(CropCommand::Quit));
        assert_eq!(command_for_key(Key::X), None);
    }

    #[test]
    fn buffer_packs_rgb() {
        let frame = RgbImage::from_pixel(1, 1, image::Rgb([0x12, 0x34, 0x56]));
        assert_eq!(to_buffer(&frame), vec![0x0012_3456]);
    }
}
