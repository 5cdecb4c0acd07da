//! Interactive crop positioning.
//!
//! The operator sees the image with the crop window drawn on it and nudges the
//! window around before accepting. The window always has the target aspect
//! ratio and the largest size that fits; only its position changes.
//!
//! ```text
//! ┌──────────── CropSession ─────────────┐
//! │ source dims, current CropRegion,     │ ◄── CropCommand (from frontend)
//! │ display scale                        │
//! └──────────────────────────────────────┘
//!          │ region()                 ▲
//!          ▼                          │
//!   PreviewCanvas::render ──► CropFrontend::present / next_command
//! ```
//!
//! [`CropSession`] is plain state with no I/O, so every movement rule is unit
//! tested. A [`CropFrontend`] shows frames and blocks for the next command; the
//! production one is a native window (`preview` feature), tests use a scripted
//! one. Coordinates are always in source pixels; the display scale is applied
//! only when rendering.

mod preview;
#[cfg(feature = "preview")]
mod window;

pub use preview::PreviewCanvas;

use crate::imaging::{
    CropRegion, Dimensions, centered_region, display_scale, max_crop_window,
};
use image::RgbImage;
use thiserror::Error;
use tracing::debug;

/// Pixels moved per arrow press.
pub const NUDGE_STEP: u32 = 10;

/// Longest preview edge; larger images are shown scaled down.
pub const MAX_DISPLAY: u32 = 1200;

#[derive(Error, Debug)]
pub enum CropError {
    #[error("Display error: {0}")]
    Display(String),
    #[error("Cannot crop an image without pixels")]
    EmptyImage,
}

/// One operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropCommand {
    Left,
    Right,
    Up,
    Down,
    /// Back to the initial centered position.
    Center,
    Accept,
    /// Leave this image unconverted.
    Skip,
    /// Stop the whole run.
    Quit,
}

/// How a crop session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropDecision {
    Accept(CropRegion),
    Skip,
    Quit,
}

/// Position of the crop window over one image.
///
/// The window size is fixed at start; every move goes through
/// [`CropRegion::new`], so the region never leaves the source.
#[derive(Debug, Clone, PartialEq)]
pub struct CropSession {
    source: Dimensions,
    start: CropRegion,
    region: CropRegion,
    display_scale: f64,
}

impl CropSession {
    /// Start centered with the largest window of the target's aspect ratio.
    ///
    /// `None` when the source has no pixels.
    pub fn new(source: Dimensions, target: Dimensions) -> Option<Self> {
        let start = centered_region(source, max_crop_window(source, target))?;
        Some(Self {
            source,
            start,
            region: start,
            display_scale: display_scale(source, MAX_DISPLAY),
        })
    }

    pub fn region(&self) -> CropRegion {
        self.region
    }

    pub fn display_scale(&self) -> f64 {
        self.display_scale
    }

    /// Apply a command. Returns the decision once the session is over.
    pub fn apply(&mut self, command: CropCommand) -> Option<CropDecision> {
        let (left, top) = (self.region.left(), self.region.top());
        let max_left = self.source.width - self.region.width();
        let max_top = self.source.height - self.region.height();
        match command {
            CropCommand::Left => self.move_to(left.saturating_sub(NUDGE_STEP), top),
            CropCommand::Right => self.move_to((left + NUDGE_STEP).min(max_left), top),
            CropCommand::Up => self.move_to(left, top.saturating_sub(NUDGE_STEP)),
            CropCommand::Down => self.move_to(left, (top + NUDGE_STEP).min(max_top)),
            CropCommand::Center => self.region = self.start,
            CropCommand::Accept => return Some(CropDecision::Accept(self.region)),
            CropCommand::Skip => return Some(CropDecision::Skip),
            CropCommand::Quit => return Some(CropDecision::Quit),
        }
        None
    }

    /// Move the window's top-left corner, keeping its size. Out-of-bounds
    /// positions leave the region where it was.
    fn move_to(&mut self, left: u32, top: u32) {
        let region = CropRegion::new(
            left,
            top,
            left + self.region.width(),
            top + self.region.height(),
            self.source,
        );
        if let Some(region) = region {
            self.region = region;
        }
    }

    /// Caption shown with every frame.
    pub fn readout(&self) -> String {
        format!(
            "Position: ({}, {}) | arrows move, Enter accept, c center, s skip, q quit",
            self.region.left(),
            self.region.top()
        )
    }
}

/// Something that can show preview frames and report operator input.
pub trait CropFrontend {
    /// Show a frame. `caption` carries the positional readout.
    fn present(&mut self, frame: &RgbImage, caption: &str) -> Result<(), CropError>;

    /// Block until the operator issues a command.
    fn next_command(&mut self) -> Result<CropCommand, CropError>;
}

/// The native preview window, when this build includes one.
#[cfg(feature = "preview")]
pub fn default_frontend() -> Option<Box<dyn CropFrontend>> {
    Some(Box::new(window::WindowFrontend::new()))
}

/// The native preview window, when this build includes one.
#[cfg(not(feature = "preview"))]
pub fn default_frontend() -> Option<Box<dyn CropFrontend>> {
    None
}

/// Run a blocking crop session over `image` until the operator decides.
pub fn choose_region(
    frontend: &mut dyn CropFrontend,
    image: &RgbImage,
    target: Dimensions,
) -> Result<CropDecision, CropError> {
    let source = Dimensions::new(image.width(), image.height());
    let mut session = CropSession::new(source, target).ok_or(CropError::EmptyImage)?;
    let canvas = PreviewCanvas::new(image, session.display_scale());

    loop {
        let frame = canvas.render(session.region());
        frontend.present(&frame, &session.readout())?;

        let command = frontend.next_command()?;
        debug!(?command, region = ?session.region(), "crop input");
        if let Some(decision) = session.apply(command) {
            return Ok(decision);
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Frontend that replays a fixed list of commands and records frame sizes.
    #[derive(Default)]
    pub struct ScriptedFrontend {
        pub commands: VecDeque<CropCommand>,
        pub frames: Vec<(u32, u32)>,
        pub captions: Vec<String>,
    }

    impl ScriptedFrontend {
        pub fn new(commands: &[CropCommand]) -> Self {
            Self {
                commands: commands.iter().copied().collect(),
                ..Self::default()
            }
        }
    }

    impl CropFrontend for ScriptedFrontend {
        fn present(&mut self, frame: &RgbImage, caption: &str) -> Result<(), CropError> {
            self.frames.push(frame.dimensions());
            self.captions.push(caption.to_string());
            Ok(())
        }

        fn next_command(&mut self) -> Result<CropCommand, CropError> {
            self.commands
                .pop_front()
                .ok_or_else(|| CropError::Display("script exhausted".into()))
        }
    }

    fn session(width: u32, height: u32) -> CropSession {
        CropSession::new(Dimensions::new(width, height), Dimensions::new(1000, 1000)).unwrap()
    }

    // =========================================================================
    // CropSession tests
    // =========================================================================

    #[test]
    fn session_starts_centered_with_max_window() {
        let s = session(3000, 2000);
        assert_eq!(s.region().dimensions(), Dimensions::new(2000, 2000));
        assert_eq!(
            s.region(),
            CropRegion::new(500, 0, 2500, 2000, Dimensions::new(3000, 2000)).unwrap()
        );
    }

    #[test]
    fn session_full_window_even_when_aspect_matches() {
        let s = session(800, 800);
        assert_eq!(Some(s.region()), CropRegion::full(Dimensions::new(800, 800)));
    }

    #[test]
    fn session_over_empty_image_is_none() {
        assert!(CropSession::new(Dimensions::new(0, 0), Dimensions::new(10, 10)).is_none());
    }

    #[test]
    fn nudges_move_by_step() {
        let mut s = session(3000, 2000);
        s.apply(CropCommand::Right);
        assert_eq!(s.region().left(), 510);
        s.apply(CropCommand::Left);
        s.apply(CropCommand::Left);
        assert_eq!(s.region().left(), 490);
    }

    #[test]
    fn nudges_clamp_to_bounds() {
        let mut s = session(1005, 1000);
        // Window 1000x1000, only 5px of horizontal play, none vertical
        for _ in 0..3 {
            s.apply(CropCommand::Right);
        }
        assert_eq!(s.region().right(), 1005);
        for _ in 0..3 {
            s.apply(CropCommand::Left);
        }
        assert_eq!(s.region().left(), 0);
        s.apply(CropCommand::Up);
        s.apply(CropCommand::Down);
        assert_eq!(s.region().top(), 0);
        assert_eq!(s.region().bottom(), 1000);
    }

    #[test]
    fn vertical_nudges_on_portrait() {
        let mut s = session(2000, 3000);
        let start = s.region().top();
        s.apply(CropCommand::Down);
        assert_eq!(s.region().top(), start + NUDGE_STEP);
        s.apply(CropCommand::Up);
        assert_eq!(s.region().top(), start);
    }

    #[test]
    fn center_resets_position() {
        let mut s = session(3000, 2000);
        let initial = s.region();
        for _ in 0..20 {
            s.apply(CropCommand::Left);
        }
        assert_ne!(s.region(), initial);
        s.apply(CropCommand::Center);
        assert_eq!(s.region(), initial);
    }

    #[test]
    fn terminal_commands_end_session() {
        let mut s = session(3000, 2000);
        s.apply(CropCommand::Right);
        assert_eq!(
            s.apply(CropCommand::Accept),
            Some(CropDecision::Accept(s.region()))
        );
        assert_eq!(s.apply(CropCommand::Skip), Some(CropDecision::Skip));
        assert_eq!(s.apply(CropCommand::Quit), Some(CropDecision::Quit));
        assert_eq!(s.apply(CropCommand::Up), None);
    }

    #[test]
    fn display_scale_limits_preview_not_coordinates() {
        let s = session(3000, 2000);
        assert!((s.display_scale() - 0.4).abs() < 1e-9);
        assert_eq!(s.region().width(), 2000);
    }

    #[test]
    fn readout_shows_position() {
        let s = session(3000, 2000);
        assert!(s.readout().starts_with("Position: (500, 0)"));
    }

    // =========================================================================
    // choose_region tests
    // =========================================================================

    #[test]
    fn choose_region_renders_each_step_and_accepts() {
        let image = RgbImage::new(300, 200);
        let mut frontend = ScriptedFrontend::new(&[
            CropCommand::Right,
            CropCommand::Right,
            CropCommand::Accept,
        ]);

        let decision =
            choose_region(&mut frontend, &image, Dimensions::new(100, 100)).unwrap();

        // Window 200x200 starts at left 50, two nudges → 70
        assert_eq!(
            decision,
            CropDecision::Accept(CropRegion::new(70, 0, 270, 200, Dimensions::new(300, 200)).unwrap())
        );
        assert_eq!(frontend.frames, vec![(300, 200); 3]);
        assert!(frontend.captions[2].starts_with("Position: (70, 0)"));
    }

    #[test]
    fn choose_region_downscales_large_previews() {
        let image = RgbImage::new(2400, 1600);
        let mut frontend = ScriptedFrontend::new(&[CropCommand::Skip]);

        let decision =
            choose_region(&mut frontend, &image, Dimensions::new(100, 100)).unwrap();

        assert_eq!(decision, CropDecision::Skip);
        assert_eq!(frontend.frames, vec![(1200, 800)]);
    }

    #[test]
    fn choose_region_rejects_empty_image() {
        let mut frontend = ScriptedFrontend::new(&[CropCommand::Accept]);
        let result = choose_region(&mut frontend, &RgbImage::new(0, 0), Dimensions::new(1, 1));
        assert!(matches!(result, Err(CropError::EmptyImage)));
        assert!(frontend.frames.is_empty());
    }

    #[test]
    fn choose_region_propagates_frontend_errors() {
        let image = RgbImage::new(10, 10);
        let mut frontend = ScriptedFrontend::new(&[]);
        let result = choose_region(&mut frontend, &image, Dimensions::new(1, 1));
        assert!(matches!(result, Err(CropError::Display(_))));
    }
}
