//! This library handles reading **SqPack** archives, the packed resource container used by
//! *Final Fantasy XIV*.
//!
//! # SqPack Format Documentation
//!
//! A SqPack directory is split into partitions. Every partition is made of one index file and
//! one or more data files sharing a prefix:
//!
//! ```text
//! <base>/<id>0000.win32.index
//! <base>/<id>0000.win32.dat0
//! <base>/<id>0000.win32.dat1
//! ```
//!
//! The two digit `<id>` maps to a partition name (`00` common, `0a` exd, ...), see
//! [`read::PARTITION_NAMES`].
//!
//! ## Index File
//!
//! | Offset (bytes) | Field        | Description                                   |
//! |----------------|--------------|-----------------------------------------------|
//! | 0x0408         | Table Offset | 4 bytes: absolute offset of the record table  |
//! | 0x040C         | Table Length | 4 bytes: length of the record table in bytes  |
//!
//! The table holds `length / 16` records:
//!
//! | Offset (bytes) | Field     | Description                                               |
//! |----------------|-----------|-----------------------------------------------------------|
//! | 0x0000         | File Hash | 4 bytes: hash of the lowercased file name                 |
//! | 0x0004         | Dir Hash  | 4 bytes: hash of the lowercased directory                 |
//! | 0x0008         | Packed    | 4 bytes: data file `(v & 0x0F) / 2`, offset `(v & 0xFFFFFFF0) * 8` |
//! | 0x000C         | Reserved  | 4 bytes                                                   |
//!
//! Hashes are CRC-32 (ISO-HDLC) of the path component XORed with `0xFFFFFFFF`, see
//! [`id::ResourceId`].
//!
//! ## Resources
//!
//! Every resource in a data file starts with a common header:
//!
//! | Offset (bytes) | Field             | Description                                        |
//! |----------------|-------------------|----------------------------------------------------|
//! | 0x0000         | Header Size       | 4 bytes: block offsets are relative to its end     |
//! | 0x0004         | Kind              | 4 bytes: 1 empty, 2 blob, 3 model, 4 texture       |
//! | 0x0008         | Uncompressed Size | 4 bytes: size of the reassembled resource          |
//!
//! Kind specific descriptors start at 0x14:
//!
//! - **Blob**: a block count and `{offset u32, compressed u16, uncompressed u16}` per block.
//! - **Model**: 4 skipped bytes, then for 11 sub-blocks the uncompressed sizes, sizes and
//!   offsets (u32 each), the first block index and block count (u16 each), 8 skipped bytes and
//!   a flat u16 array with the on-disk size of every block. Sub-block 0 holds the vertex
//!   declarations, 1 the model header, 2 to 4 the vertex buffers and 8 to 10 the index buffers
//!   of the three levels of detail.
//! - **Texture**: a mipmap count, `{offset, size, uncompressed size, first block, block count}`
//!   (u32 each) per mipmap and the flat u16 block size array. The texture header is stored raw
//!   in front of the first mipmap.
//!
//! ## Blocks
//!
//! | Offset (bytes) | Field             | Description                                        |
//! |----------------|-------------------|----------------------------------------------------|
//! | 0x0000         | Header Size       | 4 bytes                                            |
//! | 0x0004         | Reserved          | 4 bytes                                            |
//! | 0x0008         | Compressed Size   | 4 bytes: 32000 when the payload is stored as is    |
//! | 0x000C         | Uncompressed Size | 4 bytes                                            |
//!
//! The payload follows directly and is raw deflate without a zlib header.
//!
//! # Reading
//!
//! [`SqPack`] discovers partitions, each [`Partition`] loads its index once and maps its data
//! files on first use. Decoders are written against [`decoder::Decoder`] so that any of them can
//! be run with a trace tree, see [`Partition::trace_resource`].

pub mod compression;
pub mod cursor;
pub mod decoder;
pub mod dump;
pub mod error;
pub mod id;
pub mod index;
pub mod read;
pub mod resource;
pub mod types;

pub use dump::DumpOptions;
pub use id::ResourceId;
pub use read::{Partition, ResourceRef, ResourceSource, SqPack};
pub use resource::{DecodedResource, LodBuffers, Resource, ResourceHeader, ResourceKind};
