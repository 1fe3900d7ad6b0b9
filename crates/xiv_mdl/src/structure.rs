//! The model header sub-block: strings, counts and every table that follows them.

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::debug;
use xiv_sqpack::decoder::Decoder;

use crate::{
    error::Result,
    types::{
        BoneTable, BoundingBox, ElementId, LodHeader, MeshHeader, ModelHeader, Shape, ShapeMesh,
        ShapeValue, Submesh, TerrainShadowMesh, TerrainShadowSubmesh,
    },
};

/// Number of level of detail records, regardless of [`ModelHeader::lod_count`]
pub const LOD_COUNT: usize = 3;

/// Size of each entry of the optional region after the level of detail records
pub const UNKNOWN_ENTRY_SIZE: usize = 40;

/// Everything stored in the model header sub-block
#[derive(Debug, Clone, PartialEq)]
pub struct ModelStructure {
    pub string_count: u32,
    /// NUL separated names referenced by offset
    pub strings: Vec<u8>,
    pub header: ModelHeader,
    pub element_ids: Vec<ElementId>,
    pub lods: Vec<LodHeader>,
    /// Present only when the level of detail mesh counts disagree with the header
    pub unknown_data: Option<Vec<Vec<u8>>>,
    pub meshes: Vec<MeshHeader>,
    pub attribute_name_offsets: Vec<u32>,
    pub terrain_shadow_meshes: Vec<TerrainShadowMesh>,
    pub submeshes: Vec<Submesh>,
    pub terrain_shadow_submeshes: Vec<TerrainShadowSubmesh>,
    pub material_name_offsets: Vec<u32>,
    pub bone_name_offsets: Vec<u32>,
    pub bone_tables: Vec<BoneTable>,
    pub shapes: Vec<Shape>,
    pub shape_meshes: Vec<ShapeMesh>,
    pub shape_values: Vec<ShapeValue>,
    pub submesh_bone_map: Vec<u16>,
    pub bounding_boxes: Vec<BoundingBox>,
}

impl ModelStructure {
    /// The NUL terminated string at `offset` of the string block
    pub fn string_at(&self, offset: u32) -> Option<String> {
        let tail = self.strings.get(usize::try_from(offset).ok()?..)?;
        let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        Some(String::from_utf8_lossy(&tail[..end]).into_owned())
    }

    /// Name of material `index`
    pub fn material_name(&self, index: u16) -> Option<String> {
        let offset = *self.material_name_offsets.get(usize::from(index))?;
        self.string_at(offset)
    }

    /// Every material name in header order
    pub fn material_names(&self) -> Vec<String> {
        self.material_name_offsets
            .iter()
            .filter_map(|&offset| self.string_at(offset))
            .collect()
    }

    /// Every bone name in header order
    pub fn bone_names(&self) -> Vec<String> {
        self.bone_name_offsets
            .iter()
            .filter_map(|&offset| self.string_at(offset))
            .collect()
    }
}

/// Decode the model header sub-block
pub fn decode_structure<D: Decoder>(d: &mut D) -> Result<ModelStructure> {
    d.scope("model", &(), |d| {
        let string_count = d.read_u32::<LittleEndian>()?;
        let string_block_size = d.read_u32::<LittleEndian>()?;
        let strings = d.read_bytes(string_block_size as usize)?;

        let header = d.read_record::<ModelHeader>()?;
        let element_ids = d.read_records::<ElementId>(header.element_id_count.into())?;
        let lods = d.read_records::<LodHeader>(LOD_COUNT)?;

        // Heuristic: some files carry an extra 3 x 40 byte region here. Its presence is only
        // inferred from the level of detail mesh counts not adding up to the header count.
        let lod_meshes: u32 = lods.iter().map(LodHeader::total_mesh_count).sum();
        let unknown_data = if lod_meshes != u32::from(header.mesh_count) {
            debug!("lod meshes {lod_meshes} != {}, reading extra region", header.mesh_count);
            Some(
                (0..LOD_COUNT)
                    .map(|_| d.read_bytes(UNKNOWN_ENTRY_SIZE))
                    .collect::<xiv_sqpack::error::Result<Vec<_>>>()?,
            )
        } else {
            None
        };

        let meshes = d.read_records::<MeshHeader>(header.mesh_count.into())?;
        let attribute_name_offsets = read_u32s(d, header.attribute_count.into())?;
        let terrain_shadow_meshes =
            d.read_records::<TerrainShadowMesh>(header.terrain_shadow_mesh_count.into())?;
        let submeshes = d.read_records::<Submesh>(header.submesh_count.into())?;
        let terrain_shadow_submeshes =
            d.read_records::<TerrainShadowSubmesh>(header.terrain_shadow_submesh_count.into())?;
        let material_name_offsets = read_u32s(d, header.material_count.into())?;
        let bone_name_offsets = read_u32s(d, header.bone_count.into())?;
        let bone_tables = d.read_records::<BoneTable>(header.bone_table_count.into())?;
        let shapes = d.read_records::<Shape>(header.shape_count.into())?;
        let shape_meshes = d.read_records::<ShapeMesh>(header.shape_mesh_count.into())?;
        let shape_values = d.read_records::<ShapeValue>(header.shape_value_count.into())?;

        let bone_map_size = d.read_u32::<LittleEndian>()?;
        let submesh_bone_map = (0..bone_map_size / 2)
            .map(|_| d.read_u16::<LittleEndian>())
            .collect::<std::io::Result<Vec<_>>>()?;

        let padding = d.read_u8()?;
        d.skip(padding.into());

        let box_count = 4 + usize::from(header.bone_count) + usize::from(header.extra_bounding_box_count);
        let bounding_boxes = d.read_records::<BoundingBox>(box_count)?;

        Ok(ModelStructure {
            string_count,
            strings,
            header,
            element_ids,
            lods,
            unknown_data,
            meshes,
            attribute_name_offsets,
            terrain_shadow_meshes,
            submeshes,
            terrain_shadow_submeshes,
            material_name_offsets,
            bone_name_offsets,
            bone_tables,
            shapes,
            shape_meshes,
            shape_values,
            submesh_bone_map,
            bounding_boxes,
        })
    })
}

fn read_u32s<D: Decoder>(d: &mut D, count: usize) -> Result<Vec<u32>> {
    let values = (0..count)
        .map(|_| d.read_u32::<LittleEndian>())
        .collect::<std::io::Result<Vec<_>>>()?;
    Ok(values)
}
