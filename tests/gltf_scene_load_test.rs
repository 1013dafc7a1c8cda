use std::sync::Arc;

use cgmath::{Matrix4, Point3, Quaternion, Vector3};
use roam_ngin::data_structures::model::Aabb;
use roam_ngin::data_structures::scene_graph::{local_transform, node_rotation};
use roam_ngin::data_structures::texture::TextureKind;
use roam_ngin::resources::load_model_gltf;
use roam_ngin::resources::report::LoadWarning;

use crate::common::test_utils::{float_bytes, init_logger, scratch_dir, u16_bytes, write_asset};

mod common;

/// A document with one fully-attributed mesh: positions at (-1,-2,-3) and
/// (4,5,6), normals, uvs and u16 indices, all in `scene.bin`.
const TEXTURED_SCENE: &str = r#"{
    "asset": { "version": "2.0" },
    "buffers": [{ "uri": "scene.bin", "byteLength": 68 }],
    "bufferViews": [
        { "buffer": 0, "byteOffset": 0, "byteLength": 24 },
        { "buffer": 0, "byteOffset": 24, "byteLength": 24 },
        { "buffer": 0, "byteOffset": 48, "byteLength": 16 },
        { "buffer": 0, "byteOffset": 64, "byteLength": 4 }
    ],
    "accessors": [
        { "bufferView": 0, "componentType": 5126, "count": 2, "type": "VEC3", "min": [-1, -2, -3], "max": [4, 5, 6] },
        { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" },
        { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC2" },
        { "bufferView": 3, "componentType": 5123, "count": 2, "type": "SCALAR" }
    ],
    "images": [{ "uri": "checker.png" }],
    "textures": [{ "source": 0 }],
    "materials": [{
        "pbrMetallicRoughness": {
            "baseColorTexture": { "index": 0 },
            "metallicRoughnessTexture": { "index": 0 }
        }
    }],
    "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2 }, "indices": 3, "material": 0 }] }],
    "nodes": [{ "mesh": 0 }]
}"#;

/// Same geometry without any material block.
const BARE_SCENE: &str = r#"{
    "asset": { "version": "2.0" },
    "buffers": [{ "uri": "scene.bin", "byteLength": 68 }],
    "bufferViews": [
        { "buffer": 0, "byteOffset": 0, "byteLength": 24 },
        { "buffer": 0, "byteOffset": 24, "byteLength": 24 },
        { "buffer": 0, "byteOffset": 48, "byteLength": 16 },
        { "buffer": 0, "byteOffset": 64, "byteLength": 4 }
    ],
    "accessors": [
        { "bufferView": 0, "componentType": 5126, "count": 2, "type": "VEC3", "min": [-1, -2, -3], "max": [4, 5, 6] },
        { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" },
        { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC2" },
        { "bufferView": 3, "componentType": 5123, "count": 2, "type": "SCALAR" }
    ],
    "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2 }, "indices": 3 }] }],
    "nodes": [{ "mesh": 0 }]
}"#;

fn geometry_bin() -> Vec<u8> {
    let mut bin = float_bytes(&[-1.0, -2.0, -3.0, 4.0, 5.0, 6.0]);
    bin.extend(float_bytes(&[0.0, 1.0, 0.0, 0.0, 1.0, 0.0]));
    bin.extend(float_bytes(&[0.0, 0.0, 1.0, 1.0]));
    bin.extend(u16_bytes(&[0, 1]));
    bin
}

#[test]
fn should_compose_parent_transforms_down_the_tree() {
    init_logger();
    let dir = scratch_dir("compose");
    // root translates by (1,0,0), the middle node carries a matrix override
    // translating by (0,2,0), the leaf translates by (0,0,3) and has a mesh.
    let json = r#"{
        "asset": { "version": "2.0" },
        "buffers": [{ "uri": "scene.bin", "byteLength": 12 }],
        "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": 12 }],
        "accessors": [{ "bufferView": 0, "componentType": 5126, "count": 1, "type": "VEC3", "min": [0, 0, 0], "max": [0, 0, 0] }],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
        "nodes": [
            { "translation": [1, 0, 0], "children": [1] },
            { "matrix": [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 2, 0, 1], "children": [2] },
            { "translation": [0, 0, 3], "mesh": 0 }
        ]
    }"#;
    let path = write_asset(&dir, json, &float_bytes(&[0.0, 0.0, 0.0]));

    let (model, report) = load_model_gltf(&path).expect("load failed");

    assert_eq!(model.meshes.len(), 1);
    assert_eq!(
        model.meshes[0].transform,
        Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0))
    );
    assert!(report.warnings().contains(&LoadWarning::MissingIndices { mesh: 0 }));
}

#[test]
fn should_prefer_a_matrix_override_over_trs() {
    let translate = Matrix4::from_translation(Vector3::new(0.0, 0.0, 9.0));
    let from_matrix = local_transform(gltf::scene::Transform::Matrix {
        matrix: translate.into(),
    });
    assert_eq!(from_matrix, translate);

    let from_trs = local_transform(gltf::scene::Transform::Decomposed {
        translation: [1.0, 2.0, 3.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [2.0, 2.0, 2.0],
    });
    assert_eq!(
        from_trs,
        Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0)) * Matrix4::from_scale(2.0)
    );
}

#[test]
fn should_reorder_quaternion_components() {
    // The identity stored in the document's (x,y,z,w) order must stay the
    // identity, not end up scrambled.
    assert_eq!(
        node_rotation([0.0, 0.0, 0.0, 1.0]),
        Quaternion::new(1.0, 0.0, 0.0, 0.0)
    );

    // A half turn around X is stored as x=1, w=0.
    let half_turn = node_rotation([1.0, 0.0, 0.0, 0.0]);
    assert_eq!(half_turn.s, 0.0);
    assert_eq!(half_turn.v, Vector3::new(1.0, 0.0, 0.0));
}

#[test]
fn should_compute_model_bounds_from_all_vertices() {
    init_logger();
    let dir = scratch_dir("bounds");
    let path = write_asset(&dir, BARE_SCENE, &geometry_bin());

    let (model, report) = load_model_gltf(&path).expect("load failed");

    assert_eq!(
        model.aabb,
        Aabb {
            min: Point3::new(-1.0, -2.0, -3.0),
            max: Point3::new(4.0, 5.0, 6.0),
        }
    );
    let geometry = &model.meshes[0].geometry;
    assert_eq!(geometry.vertices.len(), 2);
    assert_eq!(geometry.indices, [0, 1]);
    assert!(geometry.has_valid_indices());
    assert_eq!(geometry.vertices[0].color, [1.0, 1.0, 1.0]);

    // No material block: the mesh still carries the white specular map.
    assert_eq!(geometry.textures.len(), 1);
    assert_eq!(geometry.textures[0].kind, TextureKind::Specular);
    assert_eq!(geometry.textures[0].image.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert!(report.warnings().contains(&LoadWarning::MaterialNotFound { index: 0 }));
}

#[test]
fn should_fall_back_to_the_unit_box_without_vertices() {
    assert_eq!(Aabb::of_meshes(&[]), Aabb::fallback());
}

#[test]
fn should_reuse_already_decoded_textures() {
    init_logger();
    let dir = scratch_dir("dedup");
    image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]))
        .save(dir.join("checker.png"))
        .expect("failed to write fixture image");
    let path = write_asset(&dir, TEXTURED_SCENE, &geometry_bin());

    let (model, report) = load_model_gltf(&path).expect("load failed");

    let textures = &model.meshes[0].geometry.textures;
    assert_eq!(textures.len(), 2);
    assert_eq!(textures[0].kind, TextureKind::Diffuse);
    assert_eq!(textures[0].unit, 0);
    assert_eq!(textures[1].kind, TextureKind::Specular);
    assert_eq!(textures[1].unit, 1);
    // The same file backs both slots: one decode, two handles to the pixels.
    assert!(Arc::ptr_eq(&textures[0].image, &textures[1].image));
    assert!(report.is_clean(), "unexpected warnings: {:?}", report.warnings());
}

#[test]
fn should_substitute_magenta_for_unreadable_textures() {
    init_logger();
    let dir = scratch_dir("magenta");
    // No image file is written, so the material's texture cannot decode.
    let json = TEXTURED_SCENE.replace("checker.png", "missing.png");
    let path = write_asset(&dir, &json, &geometry_bin());

    let (model, report) = load_model_gltf(&path).expect("load failed");

    let textures = &model.meshes[0].geometry.textures;
    assert_eq!(textures[0].image.get_pixel(0, 0).0, [255, 0, 255, 255]);
    assert!(report.warnings().contains(&LoadWarning::TextureUnreadable {
        path: dir.join("missing.png"),
    }));
}

#[test]
fn should_warn_on_documents_without_nodes() {
    init_logger();
    let dir = scratch_dir("no-nodes");
    let json = r#"{ "asset": { "version": "2.0" } }"#;
    let path = write_asset(&dir, json, &[]);

    let (model, report) = load_model_gltf(&path).expect("load failed");

    assert!(model.meshes.is_empty());
    assert_eq!(model.aabb, Aabb::fallback());
    assert!(report.warnings().contains(&LoadWarning::EmptyNodeTree));
}

#[test]
fn should_fail_fast_on_cyclic_node_trees() {
    init_logger();
    let dir = scratch_dir("cyclic");
    let json = r#"{ "asset": { "version": "2.0" }, "nodes": [{ "children": [0] }] }"#;
    let path = write_asset(&dir, json, &[]);

    assert!(load_model_gltf(&path).is_err());
}
