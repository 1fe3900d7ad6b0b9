//! Index file decoding.

use indexmap::IndexMap;

use crate::{
    decoder::Decoder,
    error::{Error, Result},
    types::{IndexRecord, IndexTableLocation, INDEX_TABLE_LOCATION_OFFSET},
};

/// Location of a resource inside a partition's data files
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct IndexEntry {
    /// Number of the `.dat<N>` file
    pub data_file: u8,

    /// Offset of the resource header in that file
    pub offset: u64,
}

impl From<&IndexRecord> for IndexEntry {
    fn from(record: &IndexRecord) -> Self {
        IndexEntry {
            data_file: record.data_file(),
            offset: record.offset(),
        }
    }
}

/// Decoded index keyed by `(dir_hash, file_hash)`, in file order
pub type Index = IndexMap<(u32, u32), IndexEntry>;

/// Decode every record of an index file
///
/// A later record with the same hash pair replaces the earlier one.
pub fn decode_index<D: Decoder>(d: &mut D) -> Result<Index> {
    d.seek_to(INDEX_TABLE_LOCATION_OFFSET);
    let location = d.read_record::<IndexTableLocation>()?;

    let end = u64::from(location.offset) + u64::from(location.length);
    if end > d.size() {
        return Err(Error::MalformedHeader(format!(
            "index table at 0x{:X} with length 0x{:X} overruns file of size 0x{:X}",
            location.offset,
            location.length,
            d.size()
        )));
    }

    d.seek_to(location.offset.into());
    let count = location.records() as usize;

    let mut index = Index::with_capacity(count);
    for _ in 0..count {
        let record = d.read_record::<IndexRecord>()?;
        index.insert((record.dir_hash, record.file_hash), IndexEntry::from(&record));
    }

    Ok(index)
}
