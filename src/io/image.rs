//! Image loading and PNG export
//!
//! All decode failures are fatal startup errors carrying the failing path;
//! a sample set refuses to load partially.

use crate::io::error::{MosaicError, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// File extensions accepted as sample images
const SAMPLE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// Load and fully decode an image as RGBA
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| MosaicError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Save an RGBA image as PNG, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the image
/// cannot be encoded.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| MosaicError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(path).map_err(|e| MosaicError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Fixed ordered sequence of decoded sample images
///
/// Loaded once at startup and immutable afterward. Ordering follows sorted
/// file paths so a given directory always yields the same sequence.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    images: Vec<RgbaImage>,
}

impl SampleSet {
    /// Build a sample set from already-decoded images
    pub const fn from_images(images: Vec<RgbaImage>) -> Self {
        Self { images }
    }

    /// Load every decodable image in a directory, in sorted path order
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read, any candidate file
    /// fails to decode, or no sample images are found.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut paths: Vec<PathBuf> = Vec::new();
        let entries = std::fs::read_dir(dir).map_err(|e| MosaicError::FileSystem {
            path: dir.to_path_buf(),
            operation: "read directory",
            source: e,
        })?;
        for entry in entries {
            let path = entry
                .map_err(|e| MosaicError::FileSystem {
                    path: dir.to_path_buf(),
                    operation: "read directory entry",
                    source: e,
                })?
                .path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    let lower = ext.to_ascii_lowercase();
                    SAMPLE_EXTENSIONS.contains(&lower.as_str())
                });
            if matches {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(MosaicError::EmptySampleSet);
        }

        let mut images = Vec::with_capacity(paths.len());
        for path in &paths {
            images.push(load_rgba(path)?);
        }
        Ok(Self { images })
    }

    /// Number of sample images
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the set holds no images
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Sample image at the given index
    pub fn get(&self, index: usize) -> Option<&RgbaImage> {
        self.images.get(index)
    }

    /// Iterate over all sample images in order
    pub fn iter(&self) -> std::slice::Iter<'_, RgbaImage> {
        self.images.iter()
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a RgbaImage;
    type IntoIter = std::slice::Iter<'a, RgbaImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_load_rgba_reports_path_on_failure() {
        let missing = Path::new("definitely/not/here.png");
        let Err(MosaicError::ImageLoad { path, .. }) = load_rgba(missing) else {
            unreachable!("loading a missing file must fail with ImageLoad");
        };
        assert_eq!(path, missing.to_path_buf());
    }

    #[test]
    fn test_load_dir_orders_by_sorted_path() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| {
            unreachable!("failed to create temp dir: {e}");
        });
        let red = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let blue = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]));
        // Written out of order; loading must sort by path
        save_png(&blue, &dir.path().join("b.png")).unwrap_or_else(|e| {
            unreachable!("failed to write sample: {e}");
        });
        save_png(&red, &dir.path().join("a.png")).unwrap_or_else(|e| {
            unreachable!("failed to write sample: {e}");
        });

        let samples = SampleSet::load_dir(dir.path()).unwrap_or_else(|e| {
            unreachable!("failed to load samples: {e}");
        });
        assert_eq!(samples.len(), 2);
        assert_eq!(
            samples.get(0).map(|img| *img.get_pixel(0, 0)),
            Some(Rgba([255, 0, 0, 255]))
        );
        assert_eq!(
            samples.get(1).map(|img| *img.get_pixel(0, 0)),
            Some(Rgba([0, 0, 255, 255]))
        );
    }

    #[test]
    fn test_load_dir_rejects_empty_directory() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| {
            unreachable!("failed to create temp dir: {e}");
        });
        assert!(matches!(
            SampleSet::load_dir(dir.path()),
            Err(MosaicError::EmptySampleSet)
        ));
    }
}
