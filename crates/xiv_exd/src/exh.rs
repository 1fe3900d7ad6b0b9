//! Table schema (`exd/<name>.exh`) decoding.

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::debug;
use xiv_sqpack::decoder::Decoder;

use crate::{
    error::Result,
    types::{ExhHeader, ExhMember, ExhPage, Language, MemberType},
};

/// Offset of the member descriptors
const MEMBERS_OFFSET: u64 = 0x20;

/// Highest language code that is exposed
const MAX_LANGUAGE_CODE: u16 = 4;

/// One column of a table
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Member {
    /// How the value is stored
    pub kind: MemberType,
    /// Offset of the value inside the fixed part of a row
    pub offset: u16,
}

/// Decoded schema of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Size of the fixed part of every row
    pub data_offset: u16,
    /// Columns sorted by offset
    pub members: Vec<Member>,
    /// Page files in file order
    pub pages: Vec<ExhPage>,
    /// Languages the table is available in
    pub languages: Vec<Language>,
}

/// Decode an exh file
///
/// Members are sorted by offset, the on-disk order is not. Language codes above French are
/// left out of [`Schema::languages`].
pub fn decode_schema<D: Decoder>(d: &mut D) -> Result<Schema> {
    d.scope("schema", &(), |d| {
        d.seek_to(0);
        let header = d.read_record::<ExhHeader>()?;

        d.seek_to(MEMBERS_OFFSET);
        let mut members = d
            .read_records::<ExhMember>(header.field_count.into())?
            .into_iter()
            .map(|member| {
                Ok(Member {
                    kind: MemberType::try_from(member.kind)?,
                    offset: member.offset,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        members.sort_by_key(|member| member.offset);

        let pages = d.read_records::<ExhPage>(header.page_count.into())?;

        let mut languages = Vec::with_capacity(header.language_count.into());
        for _ in 0..header.language_count {
            let code = d.read_u16::<LittleEndian>()?;
            match Language::from_code(code) {
                Some(language) if code <= MAX_LANGUAGE_CODE => languages.push(language),
                _ => debug!("ignoring language code {code}"),
            }
        }

        Ok(Schema {
            data_offset: header.data_offset,
            members,
            pages,
            languages,
        })
    })
}
