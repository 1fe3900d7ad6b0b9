//! Texture header and pixel formats.

use std::fmt::{self, Display};

use binrw::BinRead;
use xiv_sqpack::error::Error as SqPackError;

use crate::error::{Error, Result};

/// The part of the texture header we understand
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct TextureHeader {
    /// See [`TextureFormat`]
    #[br(pad_before = 4)]
    pub format: u16,
    #[br(pad_before = 2)]
    pub width: u16,
    pub height: u16,
}

/// Pixel format of a texture
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgb5A1,
    Rgb4A4,
    Rgb8A8,
    Dxt1,
    Dxt5,
    RgbaF,
}

impl TextureFormat {
    /// Short name, also used in the viewer JSON
    pub fn name(&self) -> &'static str {
        match self {
            TextureFormat::Rgb5A1 => "RGB5A1",
            TextureFormat::Rgb4A4 => "RGB4A4",
            TextureFormat::Rgb8A8 => "RGB8A8",
            TextureFormat::Dxt1 => "DXT1",
            TextureFormat::Dxt5 => "DXT5",
            TextureFormat::RgbaF => "RGBAF",
        }
    }
}

impl Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u16> for TextureFormat {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        Ok(match value {
            0x1441 => TextureFormat::Rgb5A1,
            0x1440 => TextureFormat::Rgb4A4,
            0x1450 => TextureFormat::Rgb8A8,
            0x3420 => TextureFormat::Dxt1,
            0x3431 => TextureFormat::Dxt5,
            0x2460 => TextureFormat::RgbaF,
            value => {
                return Err(SqPackError::UnknownVariant {
                    kind: "texture format",
                    value: value.into(),
                }
                .into())
            }
        })
    }
}
