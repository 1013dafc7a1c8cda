//! Texture loading and per-load deduplication.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;

use crate::data_structures::texture::error_image;
use crate::resources::report::{LoadReport, LoadWarning};

/// Cache of decoded images keyed by resolved path, scoped to one model load.
///
/// A second request for the same path returns another handle to the pixels
/// already in memory instead of decoding again. The cache is an explicit
/// value rather than ambient state, so separate loads never contaminate
/// each other.
#[derive(Debug, Default)]
pub struct TextureCache {
    images: HashMap<PathBuf, Arc<RgbaImage>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `path` or return the already-decoded pixels for it.
    ///
    /// Unreadable files yield the magenta fallback plus a report entry; the
    /// fallback is cached like any other image so the warning fires once per
    /// path.
    pub fn load(&mut self, path: &Path, report: &mut LoadReport) -> Arc<RgbaImage> {
        if let Some(image) = self.images.get(path) {
            return Arc::clone(image);
        }
        let image = match image::open(path) {
            Ok(decoded) => Arc::new(decoded.to_rgba8()),
            Err(error) => {
                log::warn!("failed to decode {}: {error}", path.display());
                report.warn(LoadWarning::TextureUnreadable {
                    path: path.to_path_buf(),
                });
                Arc::new(error_image())
            }
        };
        self.images.insert(path.to_path_buf(), Arc::clone(&image));
        image
    }

    /// Number of distinct images decoded (or substituted) so far.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
