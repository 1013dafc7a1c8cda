//! Decoding of accessor-described binary buffer data.
//!
//! glTF geometry lives in raw binary buffers and is described indirectly by
//! accessors and buffer views (byte offsets, strides, component types).
//! This module reads those descriptions back into typed values without
//! trusting the metadata: components that point past the end of a buffer are
//! skipped and reported instead of tearing the whole load down.

use anyhow::bail;
use cgmath::{Vector2, Vector3};

use crate::resources::report::{LoadReport, LoadWarning};

/// Element shape of an accessor, determining how many components make up one
/// element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
}

impl ElementType {
    /// Components per element.
    pub fn arity(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 => 4,
        }
    }

    /// Map the document's type tag. Matrix accessors have no use in this
    /// format and indicate a corrupt or unsupported asset.
    pub fn from_dimensions(dimensions: gltf::accessor::Dimensions) -> anyhow::Result<Self> {
        use gltf::accessor::Dimensions;
        Ok(match dimensions {
            Dimensions::Scalar => Self::Scalar,
            Dimensions::Vec2 => Self::Vec2,
            Dimensions::Vec3 => Self::Vec3,
            Dimensions::Vec4 => Self::Vec4,
            other => bail!(
                "unsupported accessor type {other:?} (expected SCALAR, VEC2, VEC3 or VEC4)"
            ),
        })
    }
}

/// Component storage of an accessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentType {
    F32,
    U32,
    U16,
    I16,
}

impl ComponentType {
    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::F32 | Self::U32 => 4,
            Self::U16 | Self::I16 => 2,
        }
    }

    /// The component-type code the document uses for this type.
    pub fn code(self) -> u32 {
        match self {
            Self::F32 => 5126,
            Self::U32 => 5125,
            Self::U16 => 5123,
            Self::I16 => 5122,
        }
    }

    pub fn from_data_type(data_type: gltf::accessor::DataType) -> anyhow::Result<Self> {
        use gltf::accessor::DataType;
        Ok(match data_type {
            DataType::F32 => Self::F32,
            DataType::U32 => Self::U32,
            DataType::U16 => Self::U16,
            DataType::I16 => Self::I16,
            other => bail!("unsupported component type {other:?}"),
        })
    }
}

/// Everything needed to locate and decode one accessor's elements inside a
/// raw buffer.
///
/// Kept independent of the document types so synthetic descriptions can be
/// built directly, e.g. in tests.
#[derive(Clone, Debug)]
pub struct AccessorSpec {
    /// Index of the owning buffer.
    pub buffer: usize,
    /// Byte offset of the buffer view inside the buffer.
    pub view_offset: usize,
    /// Declared byte stride of the buffer view, if any.
    pub view_stride: Option<usize>,
    /// Byte offset of the accessor inside the view.
    pub byte_offset: usize,
    /// Number of elements.
    pub count: usize,
    pub element_type: ElementType,
    pub component_type: ComponentType,
}

impl AccessorSpec {
    pub fn from_accessor(accessor: &gltf::Accessor) -> anyhow::Result<Self> {
        let Some(view) = accessor.view() else {
            bail!(
                "accessor {} has no buffer view (sparse accessors are unsupported)",
                accessor.index()
            );
        };
        Ok(Self {
            buffer: view.buffer().index(),
            view_offset: view.offset(),
            view_stride: view.stride(),
            byte_offset: accessor.offset(),
            count: accessor.count(),
            element_type: ElementType::from_dimensions(accessor.dimensions())?,
            component_type: ComponentType::from_data_type(accessor.data_type())?,
        })
    }
}

/// Decode the float components described by `spec` out of `data`.
///
/// Returns the flat component stream; use [`group_vec2`]/[`group_vec3`] to
/// shape it. A component type other than f32 is reported and the bytes are
/// still read as little-endian f32, which is how the attribute will be
/// interpreted downstream anyway. Reads past the end of `data` contribute
/// nothing and are reported once with the number of skipped components.
pub fn read_floats(data: &[u8], spec: &AccessorSpec, report: &mut LoadReport) -> Vec<f32> {
    if spec.component_type != ComponentType::F32 {
        report.warn(LoadWarning::UnexpectedComponentType {
            expected: ComponentType::F32,
            found: spec.component_type,
        });
    }
    let arity = spec.element_type.arity();
    let stride = match spec.view_stride {
        Some(stride) if stride != 0 => stride,
        // Tightly packed: one element directly follows the previous one.
        _ => arity * 4,
    };
    let start = spec.view_offset + spec.byte_offset;

    let mut floats = Vec::with_capacity(spec.count * arity);
    let mut skipped = 0usize;
    for element in 0..spec.count {
        let element_start = start + element * stride;
        for component in 0..arity {
            let at = element_start + component * 4;
            match data.get(at..at + 4) {
                Some([a, b, c, d]) => floats.push(f32::from_le_bytes([*a, *b, *c, *d])),
                _ => skipped += 1,
            }
        }
    }
    if skipped > 0 {
        report.warn(LoadWarning::AccessorOutOfBounds {
            skipped,
            buffer_len: data.len(),
        });
    }
    floats
}

/// Decode scalar index values described by `spec` out of `data` into `u32`.
///
/// Unsigned 32/16-bit and signed 16-bit storage is supported; an index
/// accessor declaring floats yields no indices plus a report entry. Reads
/// past the end of `data` are skipped like in [`read_floats`].
pub fn read_indices(data: &[u8], spec: &AccessorSpec, report: &mut LoadReport) -> Vec<u32> {
    let component_size = match spec.component_type {
        ComponentType::U32 => 4,
        ComponentType::U16 | ComponentType::I16 => 2,
        ComponentType::F32 => {
            report.warn(LoadWarning::UnexpectedComponentType {
                expected: ComponentType::U32,
                found: ComponentType::F32,
            });
            return Vec::new();
        }
    };
    let stride = match spec.view_stride {
        Some(stride) if stride != 0 => stride,
        _ => component_size,
    };
    let start = spec.view_offset + spec.byte_offset;

    let mut indices = Vec::with_capacity(spec.count);
    let mut skipped = 0usize;
    for element in 0..spec.count {
        let at = start + element * stride;
        match data.get(at..at + component_size) {
            Some([a, b, c, d]) => indices.push(u32::from_le_bytes([*a, *b, *c, *d])),
            Some([a, b]) => indices.push(match spec.component_type {
                ComponentType::I16 => i16::from_le_bytes([*a, *b]) as u32,
                _ => u32::from(u16::from_le_bytes([*a, *b])),
            }),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        report.warn(LoadWarning::AccessorOutOfBounds {
            skipped,
            buffer_len: data.len(),
        });
    }
    indices
}

/// Shape a flat float stream into 2-component vectors. A trailing partial
/// group is padded with zeroes.
pub fn group_vec2(floats: &[f32]) -> Vec<Vector2<f32>> {
    floats
        .chunks(2)
        .map(|chunk| {
            Vector2::new(
                chunk.first().copied().unwrap_or(0.0),
                chunk.get(1).copied().unwrap_or(0.0),
            )
        })
        .collect()
}

/// Shape a flat float stream into 3-component vectors. A trailing partial
/// group is padded with zeroes.
pub fn group_vec3(floats: &[f32]) -> Vec<Vector3<f32>> {
    floats
        .chunks(3)
        .map(|chunk| {
            Vector3::new(
                chunk.first().copied().unwrap_or(0.0),
                chunk.get(1).copied().unwrap_or(0.0),
                chunk.get(2).copied().unwrap_or(0.0),
            )
        })
        .collect()
}
