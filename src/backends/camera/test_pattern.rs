// SPDX-License-Identifier: GPL-3.0-only

//! Procedural test-pattern camera

use super::{BackendResult, Camera, RenderTarget};
use crate::config::Resolution;
use image::Rgba;

/// Renders a color gradient scaled to whatever target is bound
///
/// Used by the CLI when no source image is given, and handy in tests
/// because every pixel is a pure function of its position.
#[derive(Debug)]
pub struct TestPatternCamera {
    name: String,
    viewport: Resolution,
    target: Option<RenderTarget>,
    frames_rendered: u64,
}

impl TestPatternCamera {
    pub fn new(viewport: Resolution) -> Self {
        Self {
            name: "Test pattern".to_string(),
            viewport,
            target: None,
            frames_rendered: 0,
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Color at `(x, y)` of a `width`x`height` render
    pub fn pattern_pixel(x: u32, y: u32, width: u32, height: u32) -> Rgba<u8> {
        let r = (x * 255 / width.saturating_sub(1).max(1)) as u8;
        let g = (y * 255 / height.saturating_sub(1).max(1)) as u8;
        let b = if (x / 8 + y / 8) % 2 == 0 { 64 } else { 192 };
        Rgba([r, g, b, 255])
    }
}

impl Camera for TestPatternCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn viewport(&self) -> Resolution {
        self.viewport
    }

    fn swap_target(&mut self, target: Option<RenderTarget>) -> Option<RenderTarget> {
        std::mem::replace(&mut self.target, target)
    }

    fn render(&mut self) -> BackendResult<()> {
        // Without a target the frame goes to the default output, which
        // has nothing to read back
        if let Some(target) = self.target.as_mut() {
            let color = target.color_mut();
            let (width, height) = color.dimensions();
            for (x, y, pixel) in color.enumerate_pixels_mut() {
                *pixel = Self::pattern_pixel(x, y, width, height);
            }
        }
        self.frames_rendered += 1;
        Ok(())
    }
}
