//! Vertex and index buffer decoding for a single mesh.

use byteorder::{LittleEndian, ReadBytesExt};
use half::f16;
use serde::Serialize;
use tracing::trace;
use xiv_sqpack::{decoder::Decoder, error::Error as SqPackError};

use crate::{
    error::Result,
    types::{ElementType, ElementUsage, MeshHeader, VertexElement},
};

/// Decoded vertex attributes of a mesh, one entry per vertex
///
/// Every component is widened to `f32`. Unnormalized bytes keep their integer value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VertexAttributes {
    pub positions: Vec<Vec<f32>>,
    pub blend_weights: Vec<Vec<f32>>,
    pub blend_indices: Vec<Vec<f32>>,
    pub normals: Vec<Vec<f32>>,
    pub uvs: Vec<Vec<f32>>,
    pub binormals: Vec<Vec<f32>>,
    pub colors: Vec<Vec<f32>>,
}

impl VertexAttributes {
    fn slot(&mut self, usage: ElementUsage) -> Option<&mut Vec<Vec<f32>>> {
        Some(match usage {
            ElementUsage::Position => &mut self.positions,
            ElementUsage::BlendWeights => &mut self.blend_weights,
            ElementUsage::BlendIndices => &mut self.blend_indices,
            ElementUsage::Normal => &mut self.normals,
            ElementUsage::Uv => &mut self.uvs,
            ElementUsage::Tangent => return None,
            ElementUsage::Binormal => &mut self.binormals,
            ElementUsage::Color => &mut self.colors,
        })
    }
}

/// Decode the vertices of `mesh` from its level of detail's vertex buffer
///
/// Vertex `i` of stream `s` starts at `vertex_buffer_offsets[s] + i * vertex_buffer_strides[s]`.
/// When a usage is declared twice the first element wins.
pub fn decode_vertices<D: Decoder>(d: &mut D, mesh: &MeshHeader, shape: &[VertexElement]) -> Result<VertexAttributes> {
    d.scope("vertices", &mesh.vertex_count, |d| {
        let mut attributes = VertexAttributes::default();

        for element in shape {
            let element_type = ElementType::try_from(element.element_type)?;
            let usage = ElementUsage::try_from(element.usage)?;

            let Some(slot) = attributes.slot(usage) else {
                trace!("ignoring {usage:?} element");
                continue;
            };
            if !slot.is_empty() {
                trace!("ignoring repeated {usage:?} element");
                continue;
            }

            let stream = usize::from(element.stream);
            let (Some(&base), Some(&stride)) = (
                mesh.vertex_buffer_offsets.get(stream),
                mesh.vertex_buffer_strides.get(stream),
            ) else {
                return Err(SqPackError::MalformedHeader(format!("vertex stream {stream} out of range")).into());
            };

            *slot = (0..u64::from(mesh.vertex_count))
                .map(|i| {
                    d.seek_to(u64::from(base) + i * u64::from(stride) + u64::from(element.offset));
                    read_element(d, element_type)
                })
                .collect::<Result<Vec<_>>>()?;
        }

        Ok(attributes)
    })
}

fn read_element<D: Decoder>(d: &mut D, element_type: ElementType) -> Result<Vec<f32>> {
    let count = element_type.components();
    let values = match element_type {
        ElementType::Float3 | ElementType::Float4 => (0..count)
            .map(|_| d.read_f32::<LittleEndian>())
            .collect::<std::io::Result<Vec<_>>>()?,
        ElementType::UByte4 => (0..count)
            .map(|_| d.read_u8().map(f32::from))
            .collect::<std::io::Result<Vec<_>>>()?,
        ElementType::UByte4Normalized => (0..count)
            .map(|_| d.read_u8().map(|v| f32::from(v) / 255.0))
            .collect::<std::io::Result<Vec<_>>>()?,
        ElementType::Half2 | ElementType::Half4 => (0..count)
            .map(|_| d.read_u16::<LittleEndian>().map(|bits| f16::from_bits(bits).to_f32()))
            .collect::<std::io::Result<Vec<_>>>()?,
    };
    Ok(values)
}

/// Decode the indices of `mesh` from its level of detail's index buffer
pub fn decode_indices<D: Decoder>(d: &mut D, mesh: &MeshHeader) -> Result<Vec<u16>> {
    d.scope("indices", &mesh.index_count, |d| {
        d.seek_to(u64::from(mesh.start_index) * 2);
        let indices = (0..mesh.index_count)
            .map(|_| d.read_u16::<LittleEndian>())
            .collect::<std::io::Result<Vec<_>>>()?;
        Ok(indices)
    })
}
