//! This library decodes the **model** resources stored in SqPack archives.
//!
//! # Model Format Documentation
//!
//! A model resource is split into sub-blocks by `xiv_sqpack`. Two of them describe the model,
//! the others hold raw vertex and index data per level of detail.
//!
//! ## Header Sub-Block
//!
//! | Field          | Description                                                        |
//! |----------------|--------------------------------------------------------------------|
//! | String Count   | 4 bytes                                                            |
//! | String Size    | 4 bytes: size of the NUL separated string block that follows       |
//! | Model Header   | 56 bytes: counts for every table below, see [`types::ModelHeader`] |
//! | Element Ids    | 32 bytes each                                                      |
//! | Lods           | 3 records of 60 bytes                                              |
//! | Meshes         | 36 bytes each, see [`types::MeshHeader`]                           |
//! | ...            | attribute names, terrain shadow meshes, submeshes, material names, |
//! |                | bone names, bone tables, shapes, bone map, bounding boxes          |
//!
//! ## Vertex Declarations
//!
//! One 0x88 byte declaration per mesh, each a list of 8 byte elements
//! `{stream u8, offset u8, type u8, usage u8, u32}` ended by stream `0xFF`.
//!
//! | Type | Storage         | Usage | Meaning       |
//! |------|-----------------|-------|---------------|
//! | 0x2  | f32 x 3         | 0     | position      |
//! | 0x3  | f32 x 4         | 1     | blend weights |
//! | 0x5  | u8 x 4          | 2     | blend indices |
//! | 0x8  | u8 x 4 / 255    | 3     | normal        |
//! | 0xD  | f16 x 2         | 4     | uv            |
//! | 0xE  | f16 x 4         | 5     | tangent       |
//! |      |                 | 6     | binormal      |
//! |      |                 | 7     | color         |
//!
//! # Reading
//!
//! ```no_run
//! # fn doit() -> xiv_mdl::error::Result<()> {
//! let sqpack = xiv_sqpack::SqPack::new("game/sqpack/ffxiv");
//! let model = xiv_mdl::Model::load(&sqpack, "chara/monster/m0001/obj/body/b0001/model/m0001b0001.mdl")?;
//! for mesh in model.lods()?[0].meshes() {
//!     println!("{:?}: {} vertices", mesh.material(), mesh.positions()?.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod model;
pub mod shapes;
pub mod structure;
pub mod types;
pub mod vertex;

pub use model::{Lod, Mesh, Model, ModelView};
