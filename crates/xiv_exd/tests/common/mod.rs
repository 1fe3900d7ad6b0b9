//! An in-memory resource source and builders for table files.

#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::HashMap,
};

use xiv_sqpack::{
    error::{Error, KeyNotFoundError, Result},
    ResourceSource,
};

/// Blobs keyed by path, recording every request
#[derive(Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
    pub requests: RefCell<Vec<String>>,
}

impl MemorySource {
    pub fn insert(&mut self, path: impl Into<String>, data: Vec<u8>) {
        self.files.insert(path.into(), data);
    }

    pub fn requested(&self, path: &str) -> usize {
        self.requests.borrow().iter().filter(|p| *p == path).count()
    }
}

impl ResourceSource for MemorySource {
    fn blob(&self, path: &str) -> Result<Vec<u8>> {
        self.requests.borrow_mut().push(path.to_owned());
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::KeyNotFound(KeyNotFoundError::Resource(path.to_owned())))
    }
}

/// An exh file
pub fn exh(data_offset: u16, members: &[(u16, u16)], pages: &[(u32, u32)], languages: &[u16]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend(b"EXHF");
    data.extend(3u16.to_be_bytes());
    data.extend(data_offset.to_be_bytes());
    data.extend((members.len() as u16).to_be_bytes());
    data.extend((pages.len() as u16).to_be_bytes());
    data.extend((languages.len() as u16).to_be_bytes());
    data.resize(0x20, 0);

    for &(kind, offset) in members {
        data.extend(kind.to_be_bytes());
        data.extend(offset.to_be_bytes());
    }
    for &(start, row_count) in pages {
        data.extend(start.to_be_bytes());
        data.extend(row_count.to_be_bytes());
    }
    for &code in languages {
        data.extend(code.to_le_bytes());
    }
    data
}

/// An exd file holding `(id, fixed data, string area)` rows
pub fn exd(rows: &[(u32, Vec<u8>, Vec<u8>)]) -> Vec<u8> {
    let table_size = rows.len() * 8;

    let mut body = Vec::new();
    let mut headers = Vec::new();
    let mut offset = 0x20 + table_size;
    for (id, fixed, strings) in rows {
        headers.extend(id.to_be_bytes());
        headers.extend((offset as u32).to_be_bytes());

        let mut row = Vec::new();
        row.extend(((fixed.len() + strings.len()) as u32).to_be_bytes());
        row.extend(1u16.to_be_bytes());
        row.extend(fixed);
        row.extend(strings);
        offset += row.len();
        body.extend(row);
    }

    let mut data = Vec::new();
    data.extend(b"EXDF");
    data.extend(2u16.to_be_bytes());
    data.resize(0x08, 0);
    data.extend((table_size as u32).to_be_bytes());
    data.resize(0x20, 0);
    data.extend(headers);
    data.extend(body);
    data
}

/// Members of the `Item` test table: name, price and a flag at bit 3 of byte 8
pub const ITEM_MEMBERS: [(u16, u16); 3] = [(0x07, 4), (0x00, 0), (0x1C, 8)];

/// Size of the fixed part of an `Item` row
pub const ITEM_DATA_OFFSET: u16 = 12;

/// One `Item` row
pub fn item(id: u32, name: &str, price: u32, flags: u8) -> (u32, Vec<u8>, Vec<u8>) {
    let mut fixed = Vec::new();
    fixed.extend(0u32.to_be_bytes());
    fixed.extend(price.to_be_bytes());
    fixed.extend([flags, 0, 0, 0]);

    let mut strings = name.as_bytes().to_vec();
    strings.push(0);

    (id, fixed, strings)
}

/// A source holding two tables
///
/// `Item` has pages starting at 0, 500 and 1200 in Japanese and English (Simplified Chinese is
/// listed in the schema but not exposed). `Status` is not localized and starts at row 100.
pub fn tables() -> MemorySource {
    let mut source = MemorySource::default();
    source.insert("exd/root.exl", b"EXLT,2\nItem,1\nStatus,2\n".to_vec());

    source.insert(
        "exd/Item.exh",
        exh(
            ITEM_DATA_OFFSET,
            &ITEM_MEMBERS,
            &[(0, 2), (500, 201), (1200, 1)],
            &[1, 2, 5],
        ),
    );
    for (suffix, potion) in [("ja", "ポーション"), ("en", "Potion")] {
        source.insert(
            format!("exd/Item_0_{suffix}.exd"),
            exd(&[item(0, "", 0, 0), item(1, potion, 20, 0b0000_1000)]),
        );
        source.insert(
            format!("exd/Item_500_{suffix}.exd"),
            exd(&[item(500, "Hi-Potion", 120, 0), item(700, "Ether, Hi-", 350, 0b1111_0111)]),
        );
        source.insert(
            format!("exd/Item_1200_{suffix}.exd"),
            exd(&[item(1200, "Elixir", 900, 0b0000_1000)]),
        );
    }

    source.insert("exd/Status.exh", exh(4, &[(0x05, 0)], &[(100, 2)], &[0]));
    source.insert(
        "exd/Status_100.exd",
        exd(&[(100, vec![0, 7, 0, 0], Vec::new()), (101, vec![0, 9, 0, 0], Vec::new())]),
    );

    source
}
