//! Builders for synthetic SqPack directories.

#![allow(dead_code)]

use std::{fs, io, path::Path};

/// An index file with its record table at 0x800
pub fn index_file(records: &[(u32, u32, u32)]) -> Vec<u8> {
    let mut data = vec![0u8; 0x800];
    data[0x408..0x40C].copy_from_slice(&0x800u32.to_le_bytes());
    data[0x40C..0x410].copy_from_slice(&(records.len() as u32 * 16).to_le_bytes());

    for &(dir_hash, file_hash, packed) in records {
        data.extend(file_hash.to_le_bytes());
        data.extend(dir_hash.to_le_bytes());
        data.extend(packed.to_le_bytes());
        data.extend([0u8; 4]);
    }
    data
}

/// Packed index value for a data file number and offset
pub fn packed(data_file: u32, offset: u32) -> u32 {
    (offset / 8) | (data_file * 2)
}

/// A resource header of `kind` with a `0x80` byte header and no descriptors
pub fn bare_resource(kind: u32) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend(0x80u32.to_le_bytes());
    data.extend(kind.to_le_bytes());
    data.extend(0u32.to_le_bytes());
    data.resize(0x80, 0);
    data
}

/// A blob resource holding `content` in a single stored block
pub fn blob_resource(content: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend(0x80u32.to_le_bytes());
    data.extend(2u32.to_le_bytes());
    data.extend((content.len() as u32).to_le_bytes());
    data.resize(0x14, 0);

    data.extend(1u32.to_le_bytes());
    data.extend(0u32.to_le_bytes());
    data.extend(((content.len() + 16) as u16).to_le_bytes());
    data.extend((content.len() as u16).to_le_bytes());
    data.resize(0x80, 0);

    data.extend(16u32.to_le_bytes());
    data.extend(0u32.to_le_bytes());
    data.extend(32000u32.to_le_bytes());
    data.extend((content.len() as u32).to_le_bytes());
    data.extend(content);
    data
}

/// A data file with every resource placed at its offset
///
/// Panics when two resources overlap.
pub fn data_file(resources: &[(usize, Vec<u8>)]) -> Vec<u8> {
    let mut data = Vec::new();
    let mut used: Vec<(usize, usize)> = Vec::new();
    for (offset, resource) in resources {
        let end = offset + resource.len();
        if let Some((start, stop)) = used.iter().find(|(start, stop)| *offset < *stop && *start < end) {
            panic!("resource at 0x{offset:X}..0x{end:X} overlaps 0x{start:X}..0x{stop:X}");
        }
        used.push((*offset, end));

        if data.len() < offset + resource.len() {
            data.resize(offset + resource.len(), 0);
        }
        data[*offset..offset + resource.len()].copy_from_slice(resource);
    }
    data
}

/// Write `<dir>/<id>0000.win32.index` and one `.dat<N>` per entry of `data_files`
pub fn write_partition(
    dir: &Path,
    id: &str,
    records: &[(u32, u32, u32)],
    data_files: &[Vec<u8>],
) -> io::Result<()> {
    fs::write(dir.join(format!("{id}0000.win32.index")), index_file(records))?;
    for (n, data) in data_files.iter().enumerate() {
        fs::write(dir.join(format!("{id}0000.win32.dat{n}")), data)?;
    }
    Ok(())
}
