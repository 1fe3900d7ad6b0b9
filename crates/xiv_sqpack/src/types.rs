//! Fixed-layout records of the index and data files.
//!
//! Everything here is little endian.

use binrw::BinRead;

/// Offset of the [`IndexTableLocation`] inside an index file
pub const INDEX_TABLE_LOCATION_OFFSET: u64 = 0x408;

/// Number of sub-blocks a model resource is split into
pub const MODEL_SUB_BLOCKS: usize = 11;

/// Where the record table of an index file lives
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct IndexTableLocation {
    /// Absolute offset of the first record
    pub offset: u32,

    /// Length of the table in bytes
    pub length: u32,
}

impl IndexTableLocation {
    /// Number of whole records in the table
    pub fn records(&self) -> u32 {
        self.length / IndexRecord::SIZE
    }
}

/// One entry of the index record table
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct IndexRecord {
    /// CRC of the lowercased file name
    pub file_hash: u32,

    /// CRC of the lowercased directory
    pub dir_hash: u32,

    /// Data file number and offset packed together
    pub packed: u32,

    #[allow(dead_code)]
    reserved: u32,
}

impl IndexRecord {
    /// Size of a record on disk
    pub const SIZE: u32 = 0x10;

    /// Number of the `.dat<N>` file holding the resource
    pub fn data_file(&self) -> u8 {
        ((self.packed & 0x0F) / 2) as u8
    }

    /// Offset of the resource header inside its data file
    pub fn offset(&self) -> u64 {
        u64::from(self.packed & 0xFFFF_FFF0) * 8
    }
}

/// Header shared by every resource in a data file
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct RawResourceHeader {
    /// Size of the header, block payloads are relative to its end
    pub header_size: u32,

    /// Resource kind tag
    pub kind: u32,

    /// Size of the reassembled resource
    pub uncompressed_size: u32,
}

/// Header in front of every compressed or stored block
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct BlockHeader {
    /// Size of this header
    pub header_size: u32,

    #[allow(dead_code)]
    reserved: u32,

    /// Length of the deflate payload, or [`BlockHeader::STORED`]
    pub compressed_size: u32,

    /// Length of the payload once inflated
    pub uncompressed_size: u32,
}

impl BlockHeader {
    /// `compressed_size` value marking a block that is stored as is
    pub const STORED: u32 = 32000;

    /// Whether the payload is stored rather than deflated
    pub fn is_stored(&self) -> bool {
        self.compressed_size == Self::STORED
    }
}

/// Block descriptor of a blob resource
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct BlobBlock {
    /// Offset of the block relative to the end of the resource header
    pub offset: u32,

    /// On-disk size of the block
    pub compressed_size: u16,

    /// Size of the block once inflated
    pub uncompressed_size: u16,
}

/// Sub-block table of a model resource
#[derive(BinRead, Debug, Clone, PartialEq, Eq)]
#[br(little)]
pub struct ModelBlockTable {
    /// Reassembled size of every sub-block
    #[br(pad_before = 4)]
    pub uncompressed_sizes: [u32; MODEL_SUB_BLOCKS],

    /// On-disk size of every sub-block
    pub sizes: [u32; MODEL_SUB_BLOCKS],

    /// Offset of every sub-block relative to the end of the resource header
    pub offsets: [u32; MODEL_SUB_BLOCKS],

    /// Index of the first block of every sub-block in the flat block size array
    pub block_starts: [u16; MODEL_SUB_BLOCKS],

    /// Number of blocks in every sub-block
    #[br(pad_after = 8)]
    pub block_counts: [u16; MODEL_SUB_BLOCKS],
}

impl ModelBlockTable {
    /// Length of the flat block size array that follows the table
    pub fn total_blocks(&self) -> usize {
        self.block_counts.iter().map(|&c| usize::from(c)).sum()
    }
}

/// Block range of one texture mipmap
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct MipmapBlock {
    /// Offset of the first block relative to the end of the resource header
    pub offset: u32,

    /// On-disk size of the mipmap
    pub size: u32,

    /// Size of the mipmap once inflated
    pub uncompressed_size: u32,

    /// Index of the first block in the flat block size array
    pub block_start: u32,

    /// Number of blocks
    pub block_count: u32,
}
