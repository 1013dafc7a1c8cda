//! roam-ngin
//!
//! A renderer-agnostic core for first-person walkthroughs of glTF scenes.
//! The crate loads scene assets into flat, upload-ready geometry with
//! composed world transforms, and validates observer movement against that
//! geometry with a ray-cast probe battery so the camera slides along walls
//! instead of passing through them. Window management, GPU state and shading
//! stay with the embedding application: it hands input deltas in and gets a
//! draw list and camera matrices back.
//!
//! High-level modules
//! - `camera`: first-person camera, controller and uniforms for view/projection
//! - `collision`: model instances, the probe-ray battery and wall sliding
//! - `data_structures`: engine data models (meshes, bounds, textures, scene graph)
//! - `resources`: helpers to load documents, buffers and textures
//! - `scene`: scene session tying instances, camera and navigation together

pub mod camera;
pub mod collision;
pub mod data_structures;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
