#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use cgmath::{Matrix4, SquareMatrix};
use roam_ngin::data_structures::model::{Aabb, MeshGeometry, Model, ModelVertex, PlacedMesh};

/// Fresh scratch directory for one test's generated asset files.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("roam-ngin-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("failed to create scratch dir");
    dir
}

/// Write a document and its binary buffer next to each other, returning the
/// path of the document.
pub fn write_asset(dir: &Path, json: &str, bin: &[u8]) -> PathBuf {
    let gltf_path = dir.join("scene.gltf");
    fs::write(&gltf_path, json).expect("failed to write scene.gltf");
    fs::write(dir.join("scene.bin"), bin).expect("failed to write scene.bin");
    gltf_path
}

/// Little-endian bytes of a flat f32 stream.
pub fn float_bytes(values: &[f32]) -> Vec<u8> {
    values
        .iter()
        .flat_map(|value| value.to_le_bytes())
        .collect()
}

/// Little-endian bytes of a u16 stream.
pub fn u16_bytes(values: &[u16]) -> Vec<u8> {
    values
        .iter()
        .flat_map(|value| value.to_le_bytes())
        .collect()
}

pub fn vertex(position: [f32; 3]) -> ModelVertex {
    ModelVertex {
        position,
        normal: [0.0, 1.0, 0.0],
        color: [1.0, 1.0, 1.0],
        uv: [0.0, 0.0],
    }
}

/// A model whose geometry spans the given corners, with bounds computed the
/// same way the loader computes them.
pub fn block_model(min: [f32; 3], max: [f32; 3]) -> Model {
    let geometry = MeshGeometry {
        vertices: vec![vertex(min), vertex(max)],
        indices: Vec::new(),
        textures: Vec::new(),
    };
    let meshes = vec![PlacedMesh {
        geometry,
        transform: Matrix4::identity(),
    }];
    let aabb = Aabb::of_meshes(&meshes);
    Model { meshes, aabb }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
