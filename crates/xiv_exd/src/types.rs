//! Languages, member types, cell values and the fixed records of exh/exd files.
//!
//! Unlike the archive itself, table files are big endian.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use binrw::BinRead;
use xiv_sqpack::error::Error as SqPackError;

use crate::error::{Error, Result};

/// Language of a localized table
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    /// Data that is not localized
    None,
    /// ja
    Japanese,
    /// en
    English,
    /// de
    German,
    /// fr
    French,
    /// chs
    ChineseSimplified,
    /// cht
    ChineseTraditional,
    /// ko
    Korean,
}

impl Language {
    /// Every language in code order
    pub const ALL: [Language; 8] = [
        Language::None,
        Language::Japanese,
        Language::English,
        Language::German,
        Language::French,
        Language::ChineseSimplified,
        Language::ChineseTraditional,
        Language::Korean,
    ];

    /// Map a schema language code
    pub fn from_code(code: u16) -> Option<Language> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Schema language code
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Short name used in file names, empty for [`Language::None`]
    pub fn suffix(&self) -> &'static str {
        match self {
            Language::None => "",
            Language::Japanese => "ja",
            Language::English => "en",
            Language::German => "de",
            Language::French => "fr",
            Language::ChineseSimplified => "chs",
            Language::ChineseTraditional => "cht",
            Language::Korean => "ko",
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::None => f.write_str("none"),
            language => f.write_str(language.suffix()),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let s = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|language| language.to_string() == s)
            .ok_or_else(|| format!("unknown language {s:?}"))
    }
}

/// Storage type of a schema member
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MemberType {
    /// Offset into the row's string area
    String,
    /// `u8 == 1`
    Bool,
    /// i8
    I8,
    /// u8
    U8,
    /// i16
    I16,
    /// u16
    U16,
    /// i32
    I32,
    /// u32
    U32,
    /// f32
    F32,
    /// u64
    U64,
    /// One bit of a shared byte
    PackedBool(u8),
}

impl TryFrom<u16> for MemberType {
    type Error = Error;

    fn try_from(tag: u16) -> Result<Self> {
        Ok(match tag {
            0x00 => MemberType::String,
            0x01 => MemberType::Bool,
            0x02 => MemberType::I8,
            0x03 => MemberType::U8,
            0x04 => MemberType::I16,
            0x05 => MemberType::U16,
            0x06 => MemberType::I32,
            0x07 => MemberType::U32,
            0x09 => MemberType::F32,
            0x0B => MemberType::U64,
            0x19..=0x20 => MemberType::PackedBool((tag - 0x19) as u8),
            tag => {
                return Err(SqPackError::UnknownVariant {
                    kind: "member type",
                    value: tag.into(),
                }
                .into())
            }
        })
    }
}

/// A decoded cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text
    String(String),
    /// Boolean, plain or packed
    Bool(bool),
    /// i8
    I8(i8),
    /// u8
    U8(u8),
    /// i16
    I16(i16),
    /// u16
    U16(u16),
    /// i32
    I32(i32),
    /// u32
    U32(u32),
    /// f32
    F32(f32),
    /// u64
    U64(u64),
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(v) => f.write_str(v),
            Value::Bool(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
        }
    }
}

/// One decoded row
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Row id
    pub id: u32,
    /// Cells in member order
    pub values: Vec<Value>,
}

/// Counts at the start of an exh file
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(big)]
pub struct ExhHeader {
    /// Size of the fixed part of every row, strings follow it
    #[br(pad_before = 6)]
    pub data_offset: u16,
    /// Number of members
    pub field_count: u16,
    /// Number of page files
    pub page_count: u16,
    /// Number of languages
    pub language_count: u16,
}

/// One member descriptor of an exh file
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(big)]
pub struct ExhMember {
    /// Type tag
    pub kind: u16,
    /// Offset inside the row
    pub offset: u16,
}

/// One page descriptor of an exh file
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(big)]
pub struct ExhPage {
    /// First row id of the page
    pub start: u32,
    /// Number of rows the page holds
    pub row_count: u32,
}

/// Row location in an exd file
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(big)]
pub struct ExdRowHeader {
    /// Row id
    pub id: u32,
    /// Absolute offset of the row
    pub offset: u32,
}
