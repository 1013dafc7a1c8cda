//! Load-time warning reporting.
//!
//! Malformed-but-present asset data never aborts a load: every degraded
//! decision (dropped attributes, substituted textures, skipped reads) is
//! recorded as a [`LoadWarning`] and logged, so callers and tests can inspect
//! exactly what happened instead of guessing from half-empty geometry.

use std::fmt;
use std::path::PathBuf;

use crate::resources::accessor::ComponentType;

/// A recoverable condition encountered while loading one asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadWarning {
    /// An accessor declared a different component type than its use requires.
    UnexpectedComponentType {
        expected: ComponentType,
        found: ComponentType,
    },
    /// Components of an accessor pointed past the end of the binary buffer.
    AccessorOutOfBounds { skipped: usize, buffer_len: usize },
    /// A mesh primitive carries no POSITION attribute.
    MissingPositions { mesh: usize },
    /// A mesh primitive carries no index accessor.
    MissingIndices { mesh: usize },
    /// A mesh has no primitives at all.
    EmptyMesh { mesh: usize },
    /// The attribute arrays of one primitive disagree about the vertex count.
    MismatchedAttributeCounts {
        mesh: usize,
        positions: usize,
        normals: usize,
        uvs: usize,
    },
    /// Only the first primitive of a mesh is decoded.
    ExtraPrimitives { mesh: usize, skipped: usize },
    /// The document has no nodes to traverse.
    EmptyNodeTree,
    /// A primitive referenced a material the document does not define.
    MaterialNotFound { index: usize },
    /// A texture file could not be read or decoded.
    TextureUnreadable { path: PathBuf },
    /// An image embedded in a buffer view could not be decoded.
    EmbeddedImageUndecodable { image: usize },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedComponentType { expected, found } => write!(
                f,
                "expected component type {} but the accessor declares {}",
                expected.code(),
                found.code()
            ),
            Self::AccessorOutOfBounds {
                skipped,
                buffer_len,
            } => write!(
                f,
                "skipped {skipped} components that point past the end of a {buffer_len} byte buffer"
            ),
            Self::MissingPositions { mesh } => {
                write!(f, "mesh {mesh} has no POSITION attribute")
            }
            Self::MissingIndices { mesh } => write!(f, "mesh {mesh} has no index accessor"),
            Self::EmptyMesh { mesh } => write!(f, "mesh {mesh} has no primitives"),
            Self::MismatchedAttributeCounts {
                mesh,
                positions,
                normals,
                uvs,
            } => write!(
                f,
                "mesh {mesh} has mismatched attribute counts ({positions} positions, {normals} normals, {uvs} uvs)"
            ),
            Self::ExtraPrimitives { mesh, skipped } => {
                write!(f, "mesh {mesh} has {skipped} additional primitives that were skipped")
            }
            Self::EmptyNodeTree => write!(f, "the document contains no nodes"),
            Self::MaterialNotFound { index } => {
                write!(f, "material {index} not found in the document")
            }
            Self::TextureUnreadable { path } => {
                write!(f, "could not read texture {}, substituting a fallback", path.display())
            }
            Self::EmbeddedImageUndecodable { image } => {
                write!(f, "could not decode embedded image {image}")
            }
        }
    }
}

/// Warnings collected over one asset load.
///
/// One report belongs to one `load_model_gltf` call; nothing about it is
/// global, so concurrent or repeated loads never see each other's entries.
#[derive(Debug, Default)]
pub struct LoadReport {
    warnings: Vec<LoadWarning>,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log a recoverable condition.
    pub fn warn(&mut self, warning: LoadWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
