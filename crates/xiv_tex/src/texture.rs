//! Lazily decoded view of a texture resource.

use std::fmt::{self, Debug};

use once_cell::unsync::OnceCell;
use serde::Serialize;
use tracing::instrument;
use xiv_sqpack::{
    cursor::ByteCursor,
    decoder::{self, Decoder},
    error::Error as SqPackError,
    Resource, ResourceKind, SqPack,
};

use crate::{
    error::{Error, Result},
    types::{TextureFormat, TextureHeader},
};

/// A texture resource
pub struct Texture {
    header: Vec<u8>,
    mipmaps: Vec<Vec<u8>>,
    decoded: OnceCell<TextureHeader>,
}

impl Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Texture(header={} bytes, mipmaps={})", self.header.len(), self.mipmaps.len())
    }
}

impl TryFrom<Resource> for Texture {
    type Error = Error;

    fn try_from(resource: Resource) -> Result<Self> {
        match resource {
            Resource::Texture { header, mipmaps } => Ok(Texture::new(header, mipmaps)),
            other => Err(SqPackError::WrongResourceKind {
                expected: ResourceKind::Texture,
                found: other.kind(),
            }
            .into()),
        }
    }
}

/// Format and size, as served to the viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextureInfo {
    #[serde(rename = "type")]
    pub format: &'static str,
    pub width: u16,
    pub height: u16,
}

impl Texture {
    /// Build from the raw header bytes and the reassembled mipmaps
    pub fn new(header: Vec<u8>, mipmaps: Vec<Vec<u8>>) -> Self {
        Texture {
            header,
            mipmaps,
            decoded: OnceCell::new(),
        }
    }

    /// Read the texture at `path` from an archive
    #[instrument(skip(sqpack), err(level = "debug"))]
    pub fn load(sqpack: &SqPack, path: &str) -> Result<Self> {
        let decoded = sqpack.resource_by_path(path)?;
        Texture::try_from(decoded.resource)
    }

    /// The decoded header
    pub fn header(&self) -> Result<&TextureHeader> {
        self.decoded.get_or_try_init(|| {
            decoder::read(ByteCursor::new(&self.header), |d| d.read_record::<TextureHeader>())
                .map_err(Error::from)
        })
    }

    /// Raw header bytes
    pub fn raw_header(&self) -> &[u8] {
        &self.header
    }

    pub fn format(&self) -> Result<TextureFormat> {
        TextureFormat::try_from(self.header()?.format)
    }

    pub fn width(&self) -> Result<u16> {
        Ok(self.header()?.width)
    }

    pub fn height(&self) -> Result<u16> {
        Ok(self.header()?.height)
    }

    /// Mipmaps from largest to smallest
    pub fn mipmaps(&self) -> &[Vec<u8>] {
        &self.mipmaps
    }

    /// A single mipmap, 0 being the full size image
    pub fn mipmap(&self, index: usize) -> Result<&[u8]> {
        self.mipmaps
            .get(index)
            .map(Vec::as_slice)
            .ok_or(Error::MipmapNotFound {
                index,
                count: self.mipmaps.len(),
            })
    }

    /// Format name and size
    pub fn info(&self) -> Result<TextureInfo> {
        Ok(TextureInfo {
            format: self.format()?.name(),
            width: self.width()?,
            height: self.height()?,
        })
    }
}
