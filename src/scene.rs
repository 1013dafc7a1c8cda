//! Scene session: instance registry, camera and the per-frame step.
//!
//! A [`Scene`] is what an embedding application drives: it registers model
//! instances once (used for both drawing and collision), feeds one
//! [`FrameInput`] per frame into [`step`](Scene::step) and pulls the
//! flattened draw list for its render pass.

use std::sync::Arc;
use std::time::Duration;

use cgmath::{Matrix4, Point3, Vector3, Zero};

use crate::camera::{Camera, FirstPersonController, Projection};
use crate::collision::Navigator;
use crate::data_structures::model::{MeshGeometry, Model};

/// Input gathered by the windowing collaborator for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    /// Camera-relative movement axes: `x` strafes right, `z` walks forward.
    pub movement: Vector3<f32>,
    pub sprint: bool,
    /// Raw mouse delta in window units.
    pub mouse_delta: (f64, f64),
    /// Scroll steps; positive zooms in.
    pub scroll_delta: f32,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            movement: Vector3::zero(),
            sprint: false,
            mouse_delta: (0.0, 0.0),
            scroll_delta: 0.0,
        }
    }
}

/// One entry of the draw list handed to the rendering collaborator.
#[derive(Clone, Debug)]
pub struct DrawItem<'a> {
    pub geometry: &'a MeshGeometry,
    /// Instance transform composed with the mesh's baked node transform.
    pub world_transform: Matrix4<f32>,
}

/// A walkable scene: model instances, the observer camera and the collision
/// navigation behind its movement.
#[derive(Debug)]
pub struct Scene {
    pub camera: Camera,
    pub projection: Projection,
    pub controller: FirstPersonController,
    pub navigator: Navigator,
}

impl Scene {
    pub fn new(width: u32, height: u32, start: Point3<f32>) -> Self {
        Self {
            camera: Camera::new(start),
            projection: Projection::new(width, height),
            controller: FirstPersonController::default(),
            navigator: Navigator::new(),
        }
    }

    /// Register a model instance, once, for both drawing and collision.
    pub fn add_instance(&mut self, model: Arc<Model>, transform: Matrix4<f32>) {
        self.navigator.add_instance(model, transform);
    }

    /// Advance the simulation by one frame of input.
    pub fn step(&mut self, input: FrameInput, dt: Duration) {
        self.controller
            .handle_mouse(input.mouse_delta.0, input.mouse_delta.1);
        self.controller.handle_scroll(input.scroll_delta);
        self.controller.set_movement(input.movement, input.sprint);
        self.controller
            .update(&mut self.camera, &self.navigator, dt);
    }

    /// Flattened draw list: every placed mesh of every instance with its
    /// resolved world transform.
    ///
    /// Meshes whose indices point outside their vertex list are skipped with
    /// a warning, they are the product of a degraded load.
    pub fn draw_items(&self) -> Vec<DrawItem<'_>> {
        let mut items = Vec::new();
        for instance in self.navigator.instances() {
            if instance.model.meshes.is_empty() {
                log::warn!("model instance has no meshes to draw");
                continue;
            }
            for placed in &instance.model.meshes {
                if !placed.geometry.has_valid_indices() {
                    log::warn!("mesh has indices outside its vertex list, skipping it");
                    continue;
                }
                items.push(DrawItem {
                    geometry: &placed.geometry,
                    world_transform: instance.transform * placed.transform,
                });
            }
        }
        items
    }
}
