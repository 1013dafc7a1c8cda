//! Texture data shared between meshes.
//!
//! Decoded pixels are reference counted so the same image file used by
//! several materials decodes once. GPU upload and sampler setup belong to
//! the rendering collaborator; this type fixes the semantics (diffuse or
//! specular) and the texture unit the collaborator binds it to.

use std::sync::Arc;

use anyhow::Result;
use image::{Rgba, RgbaImage};

/// What a texture is used for. The binding unit is fixed per kind so loader
/// and renderer never have to negotiate slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureKind {
    Diffuse,
    Specular,
}

impl TextureKind {
    /// Fixed, non-overlapping texture unit for this kind.
    pub fn unit(self) -> u32 {
        match self {
            TextureKind::Diffuse => 0,
            TextureKind::Specular => 1,
        }
    }
}

/// A decoded texture with its semantic kind and binding unit.
#[derive(Clone, Debug)]
pub struct Texture {
    pub image: Arc<RgbaImage>,
    pub kind: TextureKind,
    pub unit: u32,
}

impl Texture {
    pub fn new(image: Arc<RgbaImage>, kind: TextureKind) -> Self {
        Self {
            image,
            kind,
            unit: kind.unit(),
        }
    }

    /// Decode a texture from raw image file bytes (embedded images).
    pub fn from_bytes(bytes: &[u8], kind: TextureKind) -> Result<Self> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::new(Arc::new(image.to_rgba8()), kind))
    }

    /// The flat white specular map substituted when a material provides
    /// none, so a specular sampler can always be bound.
    pub fn flat_white_specular() -> Self {
        Self::new(
            Arc::new(RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]))),
            TextureKind::Specular,
        )
    }

    /// The magenta stand-in bound when an image fails to load.
    pub fn error_fallback(kind: TextureKind) -> Self {
        Self::new(Arc::new(error_image()), kind)
    }
}

/// A single loud magenta pixel.
pub(crate) fn error_image() -> RgbaImage {
    RgbaImage::from_pixel(1, 1, Rgba([255, 0, 255, 255]))
}
