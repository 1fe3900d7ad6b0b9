//! Resource headers and the per-kind payload decoders.
//!
//! Every resource starts with a [`RawResourceHeader`]. Kind specific descriptors follow at
//! `offset + 0x14` and every block offset they contain is relative to `offset + header_size`.

use std::fmt::{self, Debug};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::{
    compression::{decompress_block, decompress_blocks},
    decoder::Decoder,
    error::{Error, Result},
    types::{BlobBlock, MipmapBlock, ModelBlockTable, RawResourceHeader, MODEL_SUB_BLOCKS},
};

/// Offset of the kind specific descriptors from the start of a resource
pub const DESCRIPTOR_OFFSET: u64 = 0x14;

/// Number of level-of-detail variants stored in a model
pub const MODEL_LODS: usize = 3;

/// The payload layout of a resource
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ResourceKind {
    /// No payload
    Empty = 1,
    /// Opaque bytes
    Blob = 2,
    /// Model split into sub-blocks
    Model = 3,
    /// Texture header and mipmaps
    Texture = 4,
}

impl ResourceKind {
    /// Short name used as file extension when dumping
    pub fn extension(&self) -> &'static str {
        match self {
            ResourceKind::Empty => "",
            ResourceKind::Blob => "std",
            ResourceKind::Model => "mdl",
            ResourceKind::Texture => "tex",
        }
    }
}

impl TryFrom<u32> for ResourceKind {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Ok(match value {
            1 => ResourceKind::Empty,
            2 => ResourceKind::Blob,
            3 => ResourceKind::Model,
            4 => ResourceKind::Texture,
            value => {
                return Err(Error::UnknownVariant {
                    kind: "resource kind",
                    value: value.into(),
                })
            }
        })
    }
}

/// Validated resource header
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResourceHeader {
    /// Size of the header, block offsets are relative to its end
    pub header_size: u32,
    /// Payload layout
    pub kind: ResourceKind,
    /// Size of the reassembled resource
    pub uncompressed_size: u32,
}

/// Vertex and index buffer of one level of detail
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LodBuffers {
    /// Reassembled vertex buffer
    pub vertex: Vec<u8>,
    /// Reassembled index buffer
    pub index: Vec<u8>,
}

impl Debug for LodBuffers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LodBuffers(vertex={} bytes, index={} bytes)",
            self.vertex.len(),
            self.index.len()
        )
    }
}

/// A decoded resource
///
/// Every buffer is the complete decompressed stream for that part.
#[derive(Clone, PartialEq, Eq)]
pub enum Resource {
    /// Placeholder entry without payload
    Empty,

    /// Opaque bytes
    Blob {
        /// Content
        data: Vec<u8>,
    },

    /// Model sub-blocks
    Model {
        /// Model header, see `xiv_mdl`
        header: Vec<u8>,
        /// Vertex declarations
        mesh_shapes: Vec<u8>,
        /// One vertex/index buffer pair per level of detail
        lod_buffers: [LodBuffers; MODEL_LODS],
        /// Sub-blocks 5 to 7, decoded but not interpreted
        extra_buffers: [Vec<u8>; MODEL_LODS],
    },

    /// Texture
    Texture {
        /// Raw texture header, see `xiv_tex`
        header: Vec<u8>,
        /// Mipmaps from largest to smallest
        mipmaps: Vec<Vec<u8>>,
    },
}

impl Resource {
    /// Kind of this resource
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Empty => ResourceKind::Empty,
            Resource::Blob { .. } => ResourceKind::Blob,
            Resource::Model { .. } => ResourceKind::Model,
            Resource::Texture { .. } => ResourceKind::Texture,
        }
    }
}

impl Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Resource::Empty => write!(f, "Empty"),
            Resource::Blob { data } => write!(f, "Blob({} bytes)", data.len()),
            Resource::Model {
                header,
                mesh_shapes,
                lod_buffers,
                ..
            } => f
                .debug_struct("Model")
                .field("header", &header.len())
                .field("mesh_shapes", &mesh_shapes.len())
                .field("lod_buffers", lod_buffers)
                .finish_non_exhaustive(),
            Resource::Texture { header, mipmaps } => f
                .debug_struct("Texture")
                .field("header", &header.len())
                .field("mipmaps", &mipmaps.iter().map(Vec::len).collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// A resource together with the header it was decoded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedResource {
    /// Header
    pub header: ResourceHeader,
    /// Payload
    pub resource: Resource,
}

/// Read and validate the header of the resource at `offset`
pub fn decode_resource_header<D: Decoder>(d: &mut D, offset: u64) -> Result<ResourceHeader> {
    d.seek_to(offset);
    let raw = d.read_record::<RawResourceHeader>()?;

    Ok(ResourceHeader {
        header_size: raw.header_size,
        kind: ResourceKind::try_from(raw.kind)?,
        uncompressed_size: raw.uncompressed_size,
    })
}

/// Decode the resource at `offset`
pub fn decode_resource<D: Decoder>(d: &mut D, offset: u64) -> Result<DecodedResource> {
    d.scope("resource", &offset, |d| {
        let header = decode_resource_header(d, offset)?;
        let base = offset + u64::from(header.header_size);

        d.seek_to(offset + DESCRIPTOR_OFFSET);
        let resource = match header.kind {
            ResourceKind::Empty => Resource::Empty,
            ResourceKind::Blob => decode_blob(d, base)?,
            ResourceKind::Model => decode_model(d, base)?,
            ResourceKind::Texture => decode_texture(d, base)?,
        };

        Ok(DecodedResource { header, resource })
    })
}

/// Fail unless `count` descriptors of `size` bytes fit between the cursor and the end
fn ensure_descriptors<D: Decoder>(d: &D, what: &str, count: u64, size: u64) -> Result<()> {
    let available = d.size().saturating_sub(d.position());
    match count.checked_mul(size) {
        Some(needed) if needed <= available => Ok(()),
        _ => Err(Error::MalformedHeader(format!(
            "{count} {what} at 0x{:X} overrun the data file",
            d.position()
        ))),
    }
}

fn read_block_sizes<D: Decoder>(d: &mut D, count: u64) -> Result<Vec<u16>> {
    ensure_descriptors(d, "block sizes", count, 2)?;
    d.scope("block_sizes", &count, |d| {
        (0..count)
            .map(|_| d.read_u16::<LittleEndian>().map_err(Error::from))
            .collect()
    })
}

/// The slice of `sizes` covering `count` blocks from `start`
fn block_range<'a>(sizes: &'a [u16], start: u64, count: u64, what: &str) -> Result<&'a [u16]> {
    usize::try_from(start)
        .ok()
        .zip(usize::try_from(count).ok())
        .and_then(|(start, count)| sizes.get(start..start.checked_add(count)?))
        .ok_or_else(|| {
            Error::MalformedHeader(format!(
                "{what} uses blocks {start}..{start}+{count} of {}",
                sizes.len()
            ))
        })
}

fn decode_blob<D: Decoder>(d: &mut D, base: u64) -> Result<Resource> {
    let count = d.read_u32::<LittleEndian>()?;
    ensure_descriptors(d, "blob blocks", count.into(), 8)?;
    let blocks = d.read_records::<BlobBlock>(count as usize)?;

    let mut data = Vec::new();
    for block in &blocks {
        decompress_block(d, base + u64::from(block.offset), &mut data)?;
    }

    Ok(Resource::Blob { data })
}

fn decode_model<D: Decoder>(d: &mut D, base: u64) -> Result<Resource> {
    let table = d.read_record::<ModelBlockTable>()?;
    let sizes = read_block_sizes(d, table.total_blocks() as u64)?;

    let mut blocks: [Vec<u8>; MODEL_SUB_BLOCKS] = Default::default();
    for (i, output) in blocks.iter_mut().enumerate() {
        let range = block_range(
            &sizes,
            table.block_starts[i].into(),
            table.block_counts[i].into(),
            "model sub-block",
        )?;
        decompress_blocks(d, base + u64::from(table.offsets[i]), range, output)?;
    }

    let [mesh_shapes, header, v0, v1, v2, e0, e1, e2, i0, i1, i2] = blocks;
    Ok(Resource::Model {
        header,
        mesh_shapes,
        lod_buffers: [
            LodBuffers {
                vertex: v0,
                index: i0,
            },
            LodBuffers {
                vertex: v1,
                index: i1,
            },
            LodBuffers {
                vertex: v2,
                index: i2,
            },
        ],
        extra_buffers: [e0, e1, e2],
    })
}

fn decode_texture<D: Decoder>(d: &mut D, base: u64) -> Result<Resource> {
    let count = d.read_u32::<LittleEndian>()?;
    if count == 0 {
        return Err(Error::MalformedHeader("texture without mipmaps".into()));
    }
    ensure_descriptors(d, "mipmap descriptors", count.into(), 20)?;
    let mips = d.read_records::<MipmapBlock>(count as usize)?;

    let (first, last) = match (mips.first(), mips.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(Error::MalformedHeader("texture without mipmaps".into())),
    };
    let total = u64::from(last.block_start) + u64::from(last.block_count);
    let sizes = read_block_sizes(d, total)?;

    d.seek_to(base);
    let header = d.read_bytes(first.offset as usize)?;

    let mut mipmaps = Vec::with_capacity(mips.len());
    for mip in &mips {
        let range = block_range(
            &sizes,
            mip.block_start.into(),
            mip.block_count.into(),
            "mipmap",
        )?;
        let mut output = Vec::new();
        decompress_blocks(d, base + u64::from(mip.offset), range, &mut output)?;
        mipmaps.push(output);
    }

    Ok(Resource::Texture { header, mipmaps })
}
