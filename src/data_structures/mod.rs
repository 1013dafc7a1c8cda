//! Engine data structures: models, textures and the scene graph.
//!
//! This module contains the core data types for scene representation:
//!
//! - `model` contains vertex, mesh, model and bounding-volume definitions
//! - `scene_graph` flattens the document node tree with composed transforms
//! - `texture` contains decoded texture data and its kind/unit assignment

pub mod model;
pub mod scene_graph;
pub mod texture;
