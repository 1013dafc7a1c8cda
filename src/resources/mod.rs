//! Loading of external assets.
//!
//! This module contains all logic for getting scene data from disk into
//! memory: document parsing, binary buffer resolution, material and texture
//! decoding, and the node traversal that flattens one document into a
//! [`Model`]. Loading is a one-shot synchronous read at startup; nothing
//! here runs per frame.

pub mod accessor;
pub mod mesh;
pub mod report;
pub mod texture;

use std::fs;
use std::path::Path;

use anyhow::Context;
use cgmath::{Matrix4, SquareMatrix};

use crate::data_structures::model::{Aabb, Model};
use crate::data_structures::scene_graph::SceneVisitor;
use crate::data_structures::texture::{Texture, TextureKind};
use crate::resources::report::{LoadReport, LoadWarning};
use crate::resources::texture::TextureCache;

/// Synchronously read one file into memory.
pub fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Load a glTF document and flatten it into a [`Model`].
///
/// The document is parsed, its binary buffers are resolved relative to the
/// asset's own directory, materials are decoded through a per-load texture
/// cache and the node tree is walked from the root (node 0) with the
/// identity transform. Recoverable problems end up in the returned
/// [`LoadReport`]; only an unparseable document or an unsupported schema
/// element aborts the load.
pub fn load_model_gltf(file_name: impl AsRef<Path>) -> anyhow::Result<(Model, LoadReport)> {
    let path = file_name.as_ref();
    let gltf = gltf::Gltf::open(path)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let buffers = load_buffers(&gltf, base_dir)?;

    let mut report = LoadReport::new();
    let mut cache = TextureCache::new();
    let materials = load_materials(&gltf, base_dir, &buffers, &mut cache, &mut report);

    let meshes = match gltf.nodes().next() {
        Some(root) => {
            let mut visitor = SceneVisitor {
                buffers: &buffers,
                materials: &materials,
                report: &mut report,
            };
            visitor.visit(root, Matrix4::identity(), 0)?
        }
        None => {
            report.warn(LoadWarning::EmptyNodeTree);
            Vec::new()
        }
    };

    let aabb = Aabb::of_meshes(&meshes);
    log::debug!(
        "loaded {} with {} meshes and {} distinct textures",
        path.display(),
        meshes.len(),
        cache.len()
    );
    Ok((Model { meshes, aabb }, report))
}

/// Resolve every buffer of the document: GLB blobs come from the document
/// itself, external buffers from files next to the asset.
fn load_buffers(gltf: &gltf::Gltf, base_dir: &Path) -> anyhow::Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                if let Some(blob) = gltf.blob.as_deref() {
                    buffer_data.push(blob.to_vec());
                }
            }
            gltf::buffer::Source::Uri(uri) => {
                buffer_data.push(load_binary(&base_dir.join(uri))?);
            }
        }
    }
    Ok(buffer_data)
}

/// Decode the texture set of every material up front.
///
/// Base-color maps land on the diffuse unit, metallic-roughness maps on the
/// specular unit. A material without a metallic-roughness map gets the flat
/// white stand-in so the specular sampler is always backed.
fn load_materials(
    gltf: &gltf::Gltf,
    base_dir: &Path,
    buffers: &[Vec<u8>],
    cache: &mut TextureCache,
    report: &mut LoadReport,
) -> Vec<Vec<Texture>> {
    gltf.materials()
        .map(|material| {
            let mut set = Vec::new();
            let pbr = material.pbr_metallic_roughness();
            if let Some(info) = pbr.base_color_texture() {
                set.push(resolve_texture(
                    info.texture(),
                    TextureKind::Diffuse,
                    base_dir,
                    buffers,
                    cache,
                    report,
                ));
            }
            match pbr.metallic_roughness_texture() {
                Some(info) => set.push(resolve_texture(
                    info.texture(),
                    TextureKind::Specular,
                    base_dir,
                    buffers,
                    cache,
                    report,
                )),
                None => set.push(Texture::flat_white_specular()),
            }
            set
        })
        .collect()
}

/// Decode one referenced texture, deduplicating file-backed images by path.
fn resolve_texture(
    texture: gltf::Texture,
    kind: TextureKind,
    base_dir: &Path,
    buffers: &[Vec<u8>],
    cache: &mut TextureCache,
    report: &mut LoadReport,
) -> Texture {
    let image = texture.source();
    match image.source() {
        gltf::image::Source::Uri { uri, .. } => {
            Texture::new(cache.load(&base_dir.join(uri), report), kind)
        }
        gltf::image::Source::View { view, .. } => {
            let data = buffers
                .get(view.buffer().index())
                .and_then(|buffer| buffer.get(view.offset()..view.offset() + view.length()));
            match data.map(|bytes| Texture::from_bytes(bytes, kind)) {
                Some(Ok(decoded)) => decoded,
                _ => {
                    report.warn(LoadWarning::EmbeddedImageUndecodable {
                        image: image.index(),
                    });
                    Texture::error_fallback(kind)
                }
            }
        }
    }
}
