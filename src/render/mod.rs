//! Rendering pipeline: color sampling, compositing, render passes, and
//! hover magnification

/// Per-pixel alpha compositing and blend modes
pub mod blend;
/// Hover magnifier geometry
pub mod magnifier;
/// Mosaic render pass and configuration
pub mod renderer;
/// Tile color sampling
pub mod sampler;
/// Output surface and baseline snapshots
pub mod surface;

pub use blend::CompositeMode;
pub use renderer::{MosaicRenderer, RenderConfig};
