//! Material decoding and texture role lookup.

use std::fmt::{self, Debug};

use byteorder::{LittleEndian, ReadBytesExt};
use once_cell::unsync::OnceCell;
use serde::Serialize;
use tracing::{debug, instrument};
use xiv_sqpack::{
    cursor::ByteCursor,
    decoder::{self, Decoder},
    ResourceSource,
};

use crate::{
    error::{Error, Result},
    types::{ColorSet, Constant, MaterialHeader, ParameterHeader, Sampler, ShaderKey, StringOffset},
};

/// Sampler id of the diffuse texture
pub const DIFFUSE_SAMPLER: u32 = 290653886;

/// Sampler id of the specular texture
pub const SPECULAR_SAMPLER: u32 = 731504677;

/// Sampler id of the normal map
pub const NORMAL_SAMPLER: u32 = 207536625;

/// Number of color set tables present when the material has any
pub const COLOR_SET_COUNT: usize = 4;

/// A decoded material file
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialData {
    pub header: MaterialHeader,
    /// Texture paths
    pub textures: Vec<String>,
    pub maps: Vec<String>,
    pub color_sets: Vec<String>,
    pub shader_package: String,
    /// Color set tables, empty when the material has none
    pub color_set_tables: Vec<ColorSet>,
    pub shader_keys: Vec<ShaderKey>,
    pub constants: Vec<Constant>,
    pub samplers: Vec<Sampler>,
    pub constant_buffer: Vec<u8>,
}

/// Decode a material file
pub fn decode_material<D: Decoder>(d: &mut D) -> Result<MaterialData> {
    d.scope("material", &(), |d| {
        let header = d.read_record::<MaterialHeader>()?;

        let texture_offsets = d.read_records::<StringOffset>(header.texture_count.into())?;
        let map_offsets = d.read_records::<StringOffset>(header.map_count.into())?;
        let color_set_offsets = d.read_records::<StringOffset>(header.color_set_count.into())?;

        let strings = d.read_bytes(header.string_block_size.into())?;
        let paths = |offsets: &[StringOffset]| {
            offsets
                .iter()
                .map(|offset| string_at(&strings, offset.offset))
                .collect::<Vec<_>>()
        };
        let textures = paths(&texture_offsets);
        let maps = paths(&map_offsets);
        let color_sets = paths(&color_set_offsets);
        let shader_package = string_at(&strings, header.shader_package_name_offset);

        let color_set_marker = d.read_u32::<LittleEndian>()?;
        let color_set_tables = if color_set_marker != 0 {
            d.read_records::<ColorSet>(COLOR_SET_COUNT)?
        } else {
            Vec::new()
        };

        let parameters = d.read_record::<ParameterHeader>()?;
        let shader_keys = d.read_records::<ShaderKey>(parameters.shader_key_count.into())?;
        let constants = d.read_records::<Constant>(parameters.constant_count.into())?;
        let samplers = d.read_records::<Sampler>(parameters.sampler_count.into())?;
        let constant_buffer = d.read_bytes(parameters.constant_buffer_size.into())?;

        Ok(MaterialData {
            header,
            textures,
            maps,
            color_sets,
            shader_package,
            color_set_tables,
            shader_keys,
            constants,
            samplers,
            constant_buffer,
        })
    })
}

/// The NUL terminated string at `offset`, empty when the offset is past the block
fn string_at(strings: &[u8], offset: u16) -> String {
    let tail = strings.get(usize::from(offset)..).unwrap_or_default();
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    String::from_utf8_lossy(&tail[..end]).into_owned()
}

/// Texture paths by role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterialTextures {
    pub diffuse: Option<String>,
    pub specular: Option<String>,
    pub normal: Option<String>,
}

impl MaterialData {
    /// The texture bound to sampler `id`, if the material uses that sampler
    pub fn sampler_texture(&self, id: u32) -> Result<Option<&str>> {
        let Some(sampler) = self.samplers.iter().rev().find(|sampler| sampler.id == id) else {
            return Ok(None);
        };

        let texture = usize::try_from(sampler.index)
            .ok()
            .and_then(|index| self.textures.get(index))
            .ok_or(Error::TextureNotFound {
                id,
                index: sampler.index,
                count: self.textures.len(),
            })?;
        Ok(Some(texture.as_str()))
    }

    /// Diffuse, specular and normal textures
    pub fn texture_roles(&self) -> Result<MaterialTextures> {
        let role = |id| Ok::<_, Error>(self.sampler_texture(id)?.map(str::to_owned));
        Ok(MaterialTextures {
            diffuse: role(DIFFUSE_SAMPLER)?,
            specular: role(SPECULAR_SAMPLER)?,
            normal: role(NORMAL_SAMPLER)?,
        })
    }
}

/// A material file, decoded on first access
pub struct Material {
    data: Vec<u8>,
    decoded: OnceCell<MaterialData>,
}

impl Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Material({} bytes)", self.data.len())
    }
}

impl Material {
    /// Wrap the content of a `.mtrl` blob
    pub fn new(data: Vec<u8>) -> Self {
        Material {
            data,
            decoded: OnceCell::new(),
        }
    }

    /// Read the material at `path`
    #[instrument(skip(source), err(level = "debug"))]
    pub fn load(source: &dyn ResourceSource, path: &str) -> Result<Self> {
        Ok(Material::new(source.blob(path)?))
    }

    /// The decoded file
    pub fn data(&self) -> Result<&MaterialData> {
        self.decoded.get_or_try_init(|| {
            let decoded = decoder::read(ByteCursor::new(&self.data), decode_material)?;
            debug!(
                "{} textures, {} samplers, shader {}",
                decoded.textures.len(),
                decoded.samplers.len(),
                decoded.shader_package
            );
            Ok(decoded)
        })
    }

    /// Texture paths
    pub fn textures(&self) -> Result<&[String]> {
        self.data().map(|data| data.textures.as_slice())
    }

    /// Diffuse, specular and normal textures
    pub fn texture_roles(&self) -> Result<MaterialTextures> {
        self.data()?.texture_roles()
    }
}
