//! This library reads the data tables (**exl**, **exh** and **exd** files) stored in the `exd`
//! partition of a SqPack archive.
//!
//! # Table Format Documentation
//!
//! `exd/root.exl` lists the tables, one `<name>,<id>` per line after a header line.
//!
//! ## Schema (`exd/<name>.exh`)
//!
//! All fields are big endian except the language codes.
//!
//! | Offset (bytes) | Field          | Description                                    |
//! |----------------|----------------|------------------------------------------------|
//! | 0x0006         | Data Offset    | 2 bytes: size of the fixed part of a row       |
//! | 0x0008         | Field Count    | 2 bytes                                        |
//! | 0x000A         | Page Count     | 2 bytes                                        |
//! | 0x000C         | Language Count | 2 bytes                                        |
//! | 0x0020         | Members        | `{type u16, offset u16}` per field             |
//! |                | Pages          | `{start u32, row count u32}` per page          |
//! |                | Languages      | little endian u16 per language                 |
//!
//! ## Row Page (`exd/<name>_<start>[_<lang>].exd`)
//!
//! | Offset (bytes) | Field        | Description                                      |
//! |----------------|--------------|--------------------------------------------------|
//! | 0x0008         | Table Length | 4 bytes: length of the row table                 |
//! | 0x0020         | Row Table    | `{id u32, offset u32}` per row                   |
//!
//! A row's fixed data starts 6 bytes after its offset. Strings are stored as an offset relative
//! to the end of the fixed data.
//!
//! # Reading
//!
//! [`DataTables`] reads from anything implementing [`xiv_sqpack::ResourceSource`]:
//!
//! ```no_run
//! # use xiv_exd::{DataTables, Language};
//! # fn doit() -> xiv_exd::error::Result<()> {
//! let sqpack = xiv_sqpack::SqPack::new("game/sqpack/ffxiv");
//! let tables = DataTables::new(&sqpack);
//! let row = tables.table("Item")?.localized(Language::English)?.row(4)?;
//! println!("{:?}", row.values);
//! # Ok(())
//! # }
//! ```

pub mod csv;
pub mod error;
pub mod exd;
pub mod exh;
pub mod exl;
pub mod read;
pub mod types;

pub use read::{DataTables, LocalizedTable, Page, Table};
pub use types::{Language, MemberType, Row, Value};
