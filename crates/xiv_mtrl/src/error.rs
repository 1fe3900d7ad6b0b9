//! Error types that can be emitted from this library

use std::io;

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`xiv_sqpack::error::Error`]
    #[error(transparent)]
    SqPack(#[from] xiv_sqpack::error::Error),

    /// a sampler points at a texture the material does not list
    #[error("sampler 0x{id:08X} uses texture {index}, material has {count}")]
    TextureNotFound {
        /// Sampler id
        id: u32,
        /// Texture index of the sampler
        index: u32,
        /// Number of textures in the material
        count: usize,
    },
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::SqPack(err.into())
    }
}

impl From<binrw::Error> for Error {
    fn from(err: binrw::Error) -> Self {
        Error::SqPack(err.into())
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
