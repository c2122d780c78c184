//! Randomized photo-mosaic renderer with hover magnification
//!
//! Tiles a source image into a grid, fills each tile with a sampled base
//! color and a randomly selected sample image composited with a
//! configurable alpha and blend mode, then serves a magnified hover
//! preview from a baseline snapshot of the finished surface.

#![forbid(unsafe_code)]

/// Input/output operations, CLI, and error handling
pub mod io;
/// Rendering pipeline: sampling, compositing, render passes, magnification
pub mod render;
/// Spatial grid management
pub mod spatial;
/// Interactive viewer
pub mod view;

pub use io::error::{MosaicError, Result};
