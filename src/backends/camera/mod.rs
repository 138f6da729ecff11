// SPDX-License-Identifier: MPL-2.0

//! Camera abstraction and off-screen capture
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │   CapturePipeline   │
//! └──────────┬──────────┘
//!            │ capture_frame(camera, resolution)
//!            ▼
//! ┌─────────────────────┐
//! │    TargetBinding    │  ← binds off-screen target, restores the old one
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │     Camera Trait    │  ← supplied by the host renderer
//! └─────────────────────┘
//! ```

pub mod file_source;
pub mod test_pattern;
pub mod types;

pub use file_source::ImageFileCamera;
pub use test_pattern::TestPatternCamera;
pub use types::*;

use crate::config::Resolution;
use crate::constants::RENDER_TARGET_DEPTH_BITS;
use crate::errors::{CaptureError, CaptureResult};
use tracing::debug;

/// A renderable view supplied by the host graphics runtime
pub trait Camera: Send {
    /// Human readable camera name
    fn name(&self) -> &str;

    /// Size the camera renders at when no resolution override is set
    fn viewport(&self) -> Resolution;

    /// Bind `target` as the render destination
    ///
    /// Returns whatever was bound before, so it can be put back. `None`
    /// means the camera renders to its default output.
    fn swap_target(&mut self, target: Option<RenderTarget>) -> Option<RenderTarget>;

    /// Render the scene into the bound target
    ///
    /// Must finish writing the target before returning; the engine reads
    /// it back right after.
    fn render(&mut self) -> BackendResult<()>;
}

/// Keeps a temporary target bound and restores the previous binding
///
/// Restoration also happens on early return, so a failed render never
/// leaves the camera pointing at the capture target.
struct TargetBinding<'a> {
    camera: &'a mut dyn Camera,
    previous: Option<Option<RenderTarget>>,
}

impl<'a> TargetBinding<'a> {
    fn bind(camera: &'a mut dyn Camera, target: RenderTarget) -> Self {
        let previous = camera.swap_target(Some(target));
        Self {
            camera,
            previous: Some(previous),
        }
    }

    /// Restore the previous binding and hand back the capture target
    fn unbind(mut self) -> Option<RenderTarget> {
        let previous = self.previous.take().flatten();
        self.camera.swap_target(previous)
    }
}

impl Drop for TargetBinding<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.camera.swap_target(previous);
        }
    }
}

/// Render `camera` off-screen at `resolution` and read the pixels back
///
/// The returned image always has the requested size, whatever the
/// camera's own viewport is. The camera's target binding is the same
/// after the call as before it.
pub fn capture_frame(
    camera: Option<&mut dyn Camera>,
    resolution: Resolution,
) -> CaptureResult<CapturedFrame> {
    let Some(camera) = camera else {
        debug!("Camera is missing");
        return Err(CaptureError::InvalidCamera);
    };

    if !resolution.is_valid() {
        return Err(CaptureError::InvalidResolution {
            width: resolution.width,
            height: resolution.height,
        });
    }

    let name = camera.name().to_string();
    debug!(
        camera = %name,
        viewport = %camera.viewport(),
        requested = %resolution,
        "Rendering off-screen capture"
    );

    let mut binding = TargetBinding::bind(
        camera,
        RenderTarget::new(resolution, RENDER_TARGET_DEPTH_BITS),
    );
    binding.camera.render()?;

    let target = binding.unbind().ok_or_else(|| {
        CaptureError::Render(format!("camera '{}' dropped the capture target", name))
    })?;
    let image = target.read_pixels()?;

    Ok(CapturedFrame {
        image,
        camera: name,
    })
}
