//! This library decodes the **texture** resources stored in SqPack archives.
//!
//! `xiv_sqpack` hands over the raw texture header and the reassembled mipmaps. Only the fields
//! needed to upload a mipmap are interpreted:
//!
//! | Offset (bytes) | Field  | Description                           |
//! |----------------|--------|---------------------------------------|
//! | 0x0004         | Format | 2 bytes, see [`types::TextureFormat`] |
//! | 0x0008         | Width  | 2 bytes                               |
//! | 0x000A         | Height | 2 bytes                               |

pub mod error;
pub mod texture;
pub mod types;

pub use texture::{Texture, TextureInfo};
pub use types::{TextureFormat, TextureHeader};
