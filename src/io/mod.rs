//! Input/output operations, CLI, and error handling

/// Command-line interface and headless render jobs
pub mod cli;
/// Rendering constants and configuration defaults
pub mod configuration;
/// Error types and result alias
pub mod error;
/// Image loading, PNG export, and the sample set
pub mod image;
/// Progress display for the tile render pass
pub mod progress;
/// Fill-order GIF visualization
pub mod visualization;
