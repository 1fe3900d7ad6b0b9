//! Fixed-layout records of a material file, all little endian.

use binrw::BinRead;
use half::f16;

/// Sizes and counts at the start of the file
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct MaterialHeader {
    pub version: u32,
    pub file_size: u16,
    pub data_set_size: u16,
    pub string_block_size: u16,
    pub shader_package_name_offset: u16,
    pub texture_count: u8,
    pub map_count: u8,
    pub color_set_count: u8,
    pub additional_data_size: u8,
}

/// Offset of a path inside the string block
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct StringOffset {
    pub offset: u16,
    pub flags: u16,
}

/// One color set row table, 64 half floats
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ColorSet {
    pub values: [u16; 64],
}

impl ColorSet {
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|&bits| f16::from_bits(bits).to_f32()).collect()
    }
}

/// Counts of the shader parameter tables
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParameterHeader {
    pub constant_buffer_size: u16,
    pub shader_key_count: u16,
    pub constant_count: u16,
    pub sampler_count: u16,
    pub flags: u16,
    pub unknown: u16,
}

#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShaderKey {
    pub category: u32,
    pub value: u32,
}

/// A shader constant stored in the constant buffer
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Constant {
    pub id: u32,
    pub offset: u16,
    pub size: u16,
}

/// Binds a texture to a shader sampler
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Sampler {
    pub id: u32,
    pub flags: u32,
    /// Index into the material's texture list
    pub index: u32,
}
