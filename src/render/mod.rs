//! Frame rendering collaborator.
//!
//! The pipeline only needs one image asset per sampled frame, written to a path it chooses.

use std::path::Path;

use crate::foundation::core::{FrameIndex, SeriesModel};
use crate::foundation::error::ReelResult;

/// SVG line-chart renderer rasterized to PNG.
pub mod chart;

/// Inputs for one frame image.
#[derive(Clone, Copy, Debug)]
pub struct FrameRequest<'a> {
    pub symbol: &'a str,
    pub series: &'a SeriesModel,
    /// Series point the frame reveals up to (inclusive).
    pub index: FrameIndex,
    /// Position of this frame in the frame set.
    pub ordinal: usize,
}

pub trait FrameRenderer {
    /// Render `req` into an image file at `out_path`.
    fn render_frame(&self, req: &FrameRequest<'_>, out_path: &Path) -> ReelResult<()>;

    /// File extension for assets produced by this renderer.
    fn extension(&self) -> &'static str {
        "png"
    }
}
