//! Ray-cast collision detection for first-person navigation.
//!
//! Movement is validated one discrete step at a time: a battery of short
//! probe rays is cast from the candidate position against every registered
//! model instance, and a blocked move degrades into axis-isolated sub-moves
//! so the observer slides along walls instead of sticking to them. There are
//! no forces and no continuous-time dynamics, only accept/reject/slide per
//! step.

use std::f32::consts::TAU;
use std::sync::Arc;

use cgmath::{InnerSpace, Matrix4, MetricSpace, Point3, SquareMatrix, Transform, Vector3};

use crate::data_structures::model::Model;

/// Radius of the volume the observer occupies.
const PLAYER_RADIUS: f32 = 0.6;
/// Radial probe rays per height.
const PROBE_RAYS: u32 = 24;
/// World heights the probes are cast at: feet, chest, head.
const PROBE_HEIGHTS: [f32; 3] = [0.2, 1.0, 1.7];
/// Range of the radial probes.
const PROBE_RANGE: f32 = PLAYER_RADIUS + 0.1;
/// Range of the direction-of-travel rays, slightly longer to catch fast
/// motion into a wall that the radial battery can slip past.
const TRAVEL_RANGE: f32 = PLAYER_RADIUS + 0.2;
/// Below this squared travel distance the move direction is degenerate and
/// no travel ray is cast.
const MIN_TRAVEL_SQ: f32 = 1e-6;

/// A model placed in the world: shared geometry plus a world transform.
///
/// Several instances may reference the same [`Model`] with different
/// transforms.
#[derive(Clone, Debug)]
pub struct ModelInstance {
    pub model: Arc<Model>,
    pub transform: Matrix4<f32>,
}

impl ModelInstance {
    /// Test a world-space ray against this instance's bounding box.
    ///
    /// The ray is moved into model-local space with the inverted instance
    /// transform, slab-tested there, and the hit point is mapped back so the
    /// range comparison happens in world units.
    pub fn ray_hit(&self, origin: Point3<f32>, direction: Vector3<f32>, max_distance: f32) -> bool {
        let Some(inverse) = self.transform.invert() else {
            log::warn!("model instance transform is not invertible, skipping it for collision");
            return false;
        };
        let local_origin = inverse.transform_point(origin);
        let local_direction = inverse.transform_vector(direction);
        if local_direction.magnitude2() <= f32::EPSILON {
            return false;
        }
        let local_direction = local_direction.normalize();
        let Some(distance) = self
            .model
            .aabb
            .ray_intersection(local_origin, local_direction)
        else {
            return false;
        };
        let local_hit = local_origin + local_direction * distance;
        let world_hit = self.transform.transform_point(local_hit);
        origin.distance(world_hit) <= max_distance
    }
}

/// Keeps the observer outside registered geometry.
///
/// The navigator owns the instance registry, and the draw list is derived
/// from the same registry, so collision and rendering always agree on where
/// an instance stands. The ray battery is a brute-force scan over all
/// instances.
#[derive(Debug, Default)]
pub struct Navigator {
    instances: Vec<ModelInstance>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one placed model.
    pub fn add_instance(&mut self, model: Arc<Model>, transform: Matrix4<f32>) {
        self.instances.push(ModelInstance { model, transform });
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn instances(&self) -> &[ModelInstance] {
        &self.instances
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Validate a move from `current` to `desired` and return the position
    /// that is actually taken.
    ///
    /// Height is never touched: the result always keeps `current.y`. A
    /// blocked move is retried along X only and along Z only, each from
    /// `current`, and whichever sub-move passes on its own is applied.
    pub fn try_move(&self, current: Point3<f32>, desired: Point3<f32>) -> Point3<f32> {
        if self.instances.is_empty() {
            log::warn!("no model instances registered, movement is unrestricted");
            return Point3::new(desired.x, current.y, desired.z);
        }
        let desired = Point3::new(desired.x, current.y, desired.z);
        if !self.blocked(desired, current) {
            return desired;
        }
        let mut resolved = current;
        if !self.blocked(Point3::new(desired.x, current.y, current.z), current) {
            resolved.x = desired.x;
        }
        if !self.blocked(Point3::new(current.x, current.y, desired.z), current) {
            resolved.z = desired.z;
        }
        resolved
    }

    /// Cast the full probe battery for one candidate position.
    ///
    /// Radial rays fan out horizontally at each probe height; one extra ray
    /// per height follows the actual direction of travel.
    fn blocked(&self, candidate: Point3<f32>, current: Point3<f32>) -> bool {
        for &height in &PROBE_HEIGHTS {
            let origin = Point3::new(candidate.x, height, candidate.z);
            for ray in 0..PROBE_RAYS {
                let angle = ray as f32 * TAU / PROBE_RAYS as f32;
                let direction = Vector3::new(angle.cos(), 0.0, angle.sin());
                if self.cast_ray(origin, direction, PROBE_RANGE) {
                    return true;
                }
            }
        }

        let travel = candidate - current;
        if travel.magnitude2() > MIN_TRAVEL_SQ {
            let direction = travel.normalize();
            for &height in &PROBE_HEIGHTS {
                let origin = Point3::new(candidate.x, height, candidate.z);
                if self.cast_ray(origin, direction, TRAVEL_RANGE) {
                    return true;
                }
            }
        } else {
            log::trace!("degenerate travel direction, skipping the travel rays");
        }
        false
    }

    /// Whether any instance blocks the ray within `max_distance`.
    fn cast_ray(&self, origin: Point3<f32>, direction: Vector3<f32>, max_distance: f32) -> bool {
        self.instances
            .iter()
            .any(|instance| instance.ray_hit(origin, direction, max_distance))
    }
}
