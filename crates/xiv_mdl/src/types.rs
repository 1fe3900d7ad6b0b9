//! Fixed-layout records of the model header sub-block and the vertex declarations.
//!
//! Everything is little endian. Records whose purpose is not understood keep their layout and
//! plain field names so they can still be inspected in a trace.

use binrw::BinRead;
use xiv_sqpack::error::Error as SqPackError;

use crate::error::{Error, Result};

/// Counts for every table of the model header
#[derive(BinRead, Debug, Copy, Clone, PartialEq)]
pub struct ModelHeader {
    pub radius: f32,
    pub mesh_count: u16,
    pub attribute_count: u16,
    pub submesh_count: u16,
    pub material_count: u16,
    pub bone_count: u16,
    pub bone_table_count: u16,
    pub shape_count: u16,
    pub shape_mesh_count: u16,
    pub shape_value_count: u16,
    pub lod_count: u8,
    pub flags1: u8,
    pub element_id_count: u16,
    pub terrain_shadow_mesh_count: u8,
    pub flags2: u8,
    pub model_clip_out_distance: f32,
    pub shadow_clip_out_distance: u32,
    /// Bounding boxes stored after the bone boxes
    pub extra_bounding_box_count: u16,
    pub terrain_shadow_submesh_count: u16,
    pub unknown_value: u8,
    pub bg_change_material_index: u8,
    pub bg_crest_change_material_index: u16,
    pub unknown16: u16,
    pub unknown17: u16,
    pub unknown18: u16,
    pub unknown19: u16,
    pub unknown20: u16,
    pub unknown21: u16,
}

#[derive(BinRead, Debug, Copy, Clone, PartialEq)]
pub struct ElementId {
    pub element_id: u32,
    pub parent_bone_name: u32,
    pub translate: [f32; 3],
    pub rotate: [f32; 3],
}

/// One level of detail
#[derive(BinRead, Debug, Copy, Clone, PartialEq)]
pub struct LodHeader {
    pub mesh_index: u16,
    pub mesh_count: u16,
    pub model_lod_range: f32,
    pub texture_lod_range: f32,
    pub water_mesh_index: u16,
    pub water_mesh_count: u16,
    pub shadow_mesh_index: u16,
    pub shadow_mesh_count: u16,
    pub terrain_shadow_mesh_index: u16,
    pub terrain_shadow_mesh_count: u16,
    pub vertical_fog_mesh_index: u16,
    pub vertical_fog_mesh_count: u16,
    pub edge_geometry_size: u32,
    pub edge_geometry_data_offset: u32,
    pub polygon_count: u32,
    pub unknown8: u32,
    pub vertex_buffer_size: u32,
    pub index_buffer_size: u32,
    pub vertex_data_offset: u32,
    pub index_data_offset: u32,
}

impl LodHeader {
    /// Meshes of every category, compared against the header count to detect the extra region
    pub fn total_mesh_count(&self) -> u32 {
        u32::from(self.mesh_count)
            + u32::from(self.water_mesh_count)
            + u32::from(self.shadow_mesh_count)
            + u32::from(self.vertical_fog_mesh_count)
    }
}

/// One mesh: where its vertices and indices live inside its level of detail
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct MeshHeader {
    pub vertex_count: u32,
    pub index_count: u32,
    pub material_index: u16,
    pub submesh_index: u16,
    pub submesh_count: u16,
    pub bone_table_index: u16,
    /// First index, in indices rather than bytes
    pub start_index: u32,
    /// Per stream offset inside the vertex buffer
    pub vertex_buffer_offsets: [u32; 3],
    /// Per stream vertex size
    pub vertex_buffer_strides: [u8; 3],
    pub vertex_stream_count: u8,
}

#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct TerrainShadowMesh {
    pub index_count: u16,
    pub unknown1: u16,
    pub start_index: u16,
    pub unknown3: u16,
    pub vertex_buffer_offset: u16,
    pub unknown5: u16,
    pub vertex_count: u16,
    pub submesh_index: u16,
    pub submesh_count: u16,
    pub unknown7: u16,
}

#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Submesh {
    pub index_offset: u32,
    pub index_count: u32,
    pub attribute_index_mask: u32,
    pub bone_start_index: i16,
    pub bone_count: u16,
}

#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct TerrainShadowSubmesh {
    pub index_offset: u32,
    pub index_count: u32,
    pub unknown: u32,
}

#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct BoneTable {
    pub bone_indices: [u16; 64],
    pub bone_count: u32,
}

/// A named shape key
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Shape {
    pub string_offset: u16,
    pub unknown: u16,
    pub shape_mesh_start_index: [u16; 3],
    pub shape_mesh_count: [u16; 3],
}

#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShapeMesh {
    pub mesh_index_offset: u32,
    pub shape_value_count: u32,
    pub shape_value_offset: u32,
}

#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShapeValue {
    pub base_indices_index: u16,
    pub replacing_vertex_index: u16,
}

#[derive(BinRead, Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub min: [f32; 4],
    pub max: [f32; 4],
}

/// One entry of a vertex declaration
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexElement {
    /// Stream the element is read from, `0xFF` ends the declaration
    pub stream: u8,
    /// Offset inside a vertex of that stream
    pub offset: u8,
    /// See [`ElementType`]
    pub element_type: u8,
    /// See [`ElementUsage`]
    pub usage: u8,
    pub unknown: u32,
}

/// Storage format of a vertex element
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElementType {
    /// Three f32
    Float3,
    /// Four f32
    Float4,
    /// Four u8
    UByte4,
    /// Four u8 scaled to `0.0..=1.0`
    UByte4Normalized,
    /// Two f16
    Half2,
    /// Four f16
    Half4,
}

impl ElementType {
    /// Number of components
    pub fn components(&self) -> usize {
        match self {
            ElementType::Float3 => 3,
            ElementType::Half2 => 2,
            _ => 4,
        }
    }
}

impl TryFrom<u8> for ElementType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        Ok(match tag {
            0x2 => ElementType::Float3,
            0x3 => ElementType::Float4,
            0x5 => ElementType::UByte4,
            0x8 => ElementType::UByte4Normalized,
            0xD => ElementType::Half2,
            0xE => ElementType::Half4,
            tag => {
                return Err(SqPackError::UnknownVariant {
                    kind: "vertex element type",
                    value: tag.into(),
                }
                .into())
            }
        })
    }
}

/// What a vertex element means
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElementUsage {
    Position,
    BlendWeights,
    BlendIndices,
    Normal,
    Uv,
    Tangent,
    Binormal,
    Color,
}

impl TryFrom<u8> for ElementUsage {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        Ok(match tag {
            0 => ElementUsage::Position,
            1 => ElementUsage::BlendWeights,
            2 => ElementUsage::BlendIndices,
            3 => ElementUsage::Normal,
            4 => ElementUsage::Uv,
            5 => ElementUsage::Tangent,
            6 => ElementUsage::Binormal,
            7 => ElementUsage::Color,
            tag => {
                return Err(SqPackError::UnknownVariant {
                    kind: "vertex element usage",
                    value: tag.into(),
                }
                .into())
            }
        })
    }
}
