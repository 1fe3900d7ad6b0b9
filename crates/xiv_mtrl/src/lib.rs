//! This library decodes the **material** (`.mtrl`) files stored as blobs in SqPack archives.
//!
//! A material lists texture paths in a string block and binds them to shader samplers. The
//! sampler id tells what a texture is used for, see [`material::MaterialTextures`].

pub mod error;
pub mod material;
pub mod types;

pub use material::{Material, MaterialData, MaterialTextures};
