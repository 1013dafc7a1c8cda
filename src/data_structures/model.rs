//! Models, meshes and bounding volumes.
//!
//! A [`Model`] is the flattened result of one asset load: a list of
//! [`PlacedMesh`]es (geometry paired with the world transform composed over
//! its node path) and a model-local bounding box used by the collision
//! subsystem.

use cgmath::{Matrix4, Point3, Vector3};

use crate::data_structures::texture::Texture;

/// One vertex as handed to the rendering collaborator.
///
/// The layout is fixed and `Pod` so vertex data can be uploaded byte for
/// byte. Vertex color is not part of the asset format in scope and defaults
/// to opaque white.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

/// Geometry of one mesh: vertices, triangle-list indices and its texture set.
///
/// Immutable once assembled; owned by the [`Model`] that loaded it.
#[derive(Clone, Debug)]
pub struct MeshGeometry {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    pub textures: Vec<Texture>,
}

impl MeshGeometry {
    /// Whether every index stays inside the vertex list.
    ///
    /// Degraded loads can produce meshes that violate this; check before
    /// handing the mesh to a renderer.
    pub fn has_valid_indices(&self) -> bool {
        let count = self.vertices.len() as u32;
        self.indices.iter().all(|&index| index < count)
    }
}

/// A mesh with the world transform composed over its node path at load time.
#[derive(Clone, Debug)]
pub struct PlacedMesh {
    pub geometry: MeshGeometry,
    pub transform: Matrix4<f32>,
}

/// A loaded model. Never mutated after construction.
#[derive(Clone, Debug)]
pub struct Model {
    pub meshes: Vec<PlacedMesh>,
    /// Bounds over all mesh vertices, in model-local space.
    pub aabb: Aabb,
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// Fold every vertex of every mesh into one enclosing box.
    ///
    /// Without a single vertex there is nothing to enclose, so the fixed
    /// [`fallback`](Self::fallback) box is returned and a warning logged;
    /// ray tests against the model then degrade safely instead of
    /// never-hitting or always-hitting.
    pub fn of_meshes(meshes: &[PlacedMesh]) -> Self {
        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);
        let mut any_vertex = false;
        for mesh in meshes {
            for vertex in &mesh.geometry.vertices {
                any_vertex = true;
                for axis in 0..3 {
                    min[axis] = min[axis].min(vertex.position[axis]);
                    max[axis] = max[axis].max(vertex.position[axis]);
                }
            }
        }
        if !any_vertex {
            log::warn!("model has no vertices to compute bounds from, using the fallback box");
            return Self::fallback();
        }
        Self { min, max }
    }

    /// The box used when a model has no vertices at all.
    pub fn fallback() -> Self {
        Self {
            min: Point3::new(-1.0, -1.0, -1.0),
            max: Point3::new(1.0, 1.0, 1.0),
        }
    }

    /// Slab-method ray intersection.
    ///
    /// Returns the parametric distance to the entry point, `0.0` when the
    /// origin already sits inside the box, or `None` for a miss. `direction`
    /// must be normalized for the result to be a distance.
    pub fn ray_intersection(&self, origin: Point3<f32>, direction: Vector3<f32>) -> Option<f32> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            if d == 0.0 {
                // Parallel to this slab: the axis never narrows the interval,
                // but an origin outside the slab can never enter the box.
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (self.min[axis] - o) / d;
            let t2 = (self.max[axis] - o) / d;
            let (entry, exit) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            t_near = t_near.max(entry);
            t_far = t_far.min(exit);
        }
        if t_near > t_far || t_far < 0.0 {
            return None;
        }
        // A negative entry with a non-negative exit means the origin is
        // inside the box: that counts as an immediate hit.
        Some(t_near.max(0.0))
    }
}
