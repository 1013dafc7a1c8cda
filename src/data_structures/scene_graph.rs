//! Scene-graph traversal and transform composition.
//!
//! The document stores a node hierarchy where every node carries either a
//! local matrix or a translation/rotation/scale triple and optionally points
//! at a mesh. Traversal walks that tree depth-first from the root,
//! multiplying local transforms onto the parent's world transform and
//! flattening every mesh-bearing node into a [`PlacedMesh`].

use anyhow::bail;
use cgmath::{Matrix4, Quaternion, Vector3};
use gltf::Semantic;

use crate::data_structures::model::{MeshGeometry, PlacedMesh};
use crate::data_structures::texture::Texture;
use crate::resources::accessor::{self, AccessorSpec};
use crate::resources::mesh::assemble_vertices;
use crate::resources::report::{LoadReport, LoadWarning};

/// Nesting bound for the node walk. The format guarantees a tree; the cap
/// turns a malformed cyclic document into an error instead of unbounded
/// recursion.
const MAX_NODE_DEPTH: u32 = 64;

/// Rebuild a node-local rotation from the document's component order.
///
/// The document stores quaternions as (x, y, z, w); the internal
/// representation wants the scalar first.
pub fn node_rotation(rotation: [f32; 4]) -> Quaternion<f32> {
    Quaternion::new(rotation[3], rotation[0], rotation[1], rotation[2])
}

/// Local transform of a node: the matrix override when present, otherwise
/// translation × rotation × scale. The two forms are mutually exclusive per
/// node, so TRS fields never apply on top of an explicit matrix.
pub fn local_transform(transform: gltf::scene::Transform) -> Matrix4<f32> {
    match transform {
        gltf::scene::Transform::Matrix { matrix } => Matrix4::from(matrix),
        gltf::scene::Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => {
            Matrix4::from_translation(Vector3::from(translation))
                * Matrix4::from(node_rotation(rotation))
                * Matrix4::from_nonuniform_scale(scale[0], scale[1], scale[2])
        }
    }
}

/// Walks the node tree of one document, flattening meshes on the way down.
pub(crate) struct SceneVisitor<'a> {
    pub buffers: &'a [Vec<u8>],
    /// Texture set per document material, resolved up front.
    pub materials: &'a [Vec<Texture>],
    pub report: &'a mut LoadReport,
}

impl<'a> SceneVisitor<'a> {
    /// Visit `node` under the accumulated `parent` transform and return the
    /// placed meshes of the whole subtree in document order.
    pub fn visit(
        &mut self,
        node: gltf::Node,
        parent: Matrix4<f32>,
        depth: u32,
    ) -> anyhow::Result<Vec<PlacedMesh>> {
        if depth > MAX_NODE_DEPTH {
            bail!("node tree deeper than {MAX_NODE_DEPTH} levels, the document is likely cyclic");
        }
        let world = parent * local_transform(node.transform());
        let mut placed = Vec::new();
        if let Some(mesh) = node.mesh() {
            let geometry = self.load_mesh(&mesh)?;
            placed.push(PlacedMesh {
                geometry,
                transform: world,
            });
        }
        for child in node.children() {
            placed.extend(self.visit(child, world, depth + 1)?);
        }
        Ok(placed)
    }

    /// Decode the first primitive of `mesh` into geometry.
    ///
    /// Missing attributes degrade the mesh instead of failing the load;
    /// whatever accessors are present are decoded and the rest is reported.
    fn load_mesh(&mut self, mesh: &gltf::Mesh) -> anyhow::Result<MeshGeometry> {
        let index = mesh.index();
        let mut primitives = mesh.primitives();
        let Some(primitive) = primitives.next() else {
            self.report.warn(LoadWarning::EmptyMesh { mesh: index });
            return Ok(MeshGeometry {
                vertices: Vec::new(),
                indices: Vec::new(),
                textures: vec![Texture::flat_white_specular()],
            });
        };
        let skipped = primitives.count();
        if skipped > 0 {
            self.report
                .warn(LoadWarning::ExtraPrimitives { mesh: index, skipped });
        }

        let positions = match primitive.get(&Semantic::Positions) {
            Some(accessor) => accessor::group_vec3(&self.read_floats(&accessor)?),
            None => {
                self.report.warn(LoadWarning::MissingPositions { mesh: index });
                Vec::new()
            }
        };
        let normals = match primitive.get(&Semantic::Normals) {
            Some(accessor) => accessor::group_vec3(&self.read_floats(&accessor)?),
            None => Vec::new(),
        };
        let uvs = match primitive.get(&Semantic::TexCoords(0)) {
            Some(accessor) => accessor::group_vec2(&self.read_floats(&accessor)?),
            None => Vec::new(),
        };
        let indices = match primitive.indices() {
            Some(accessor) => {
                let spec = AccessorSpec::from_accessor(&accessor)?;
                accessor::read_indices(self.buffer_data(&spec), &spec, self.report)
            }
            None => {
                self.report.warn(LoadWarning::MissingIndices { mesh: index });
                Vec::new()
            }
        };

        let vertices = assemble_vertices(index, &positions, &normals, &uvs, self.report);
        let textures = self.material_textures(primitive.material().index());
        Ok(MeshGeometry {
            vertices,
            indices,
            textures,
        })
    }

    fn read_floats(&mut self, accessor: &gltf::Accessor) -> anyhow::Result<Vec<f32>> {
        let spec = AccessorSpec::from_accessor(accessor)?;
        Ok(accessor::read_floats(
            self.buffer_data(&spec),
            &spec,
            self.report,
        ))
    }

    /// The raw bytes backing an accessor. An unknown buffer index decodes as
    /// empty, which the bounds policy of the readers turns into a warning.
    fn buffer_data(&self, spec: &AccessorSpec) -> &'a [u8] {
        self.buffers
            .get(spec.buffer)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Texture set for a primitive's material.
    ///
    /// A primitive without a material falls back to the document's first one,
    /// and when that does not exist either, the mesh still gets the
    /// synthesized specular map so a renderer can bind its samplers.
    fn material_textures(&mut self, material: Option<usize>) -> Vec<Texture> {
        let index = material.unwrap_or(0);
        match self.materials.get(index) {
            Some(set) => set.clone(),
            None => {
                self.report.warn(LoadWarning::MaterialNotFound { index });
                vec![Texture::flat_white_specular()]
            }
        }
    }
}
