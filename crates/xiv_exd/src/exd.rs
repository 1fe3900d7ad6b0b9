//! Row page (`exd/<name>_<start>[_<lang>].exd`) decoding.

use byteorder::{BigEndian, ReadBytesExt};
use xiv_sqpack::decoder::Decoder;

use crate::{
    error::Result,
    exh::{Member, Schema},
    types::{ExdRowHeader, MemberType, Row, Value},
};

/// Offset of the row table length
const ROW_TABLE_SIZE_OFFSET: u64 = 0x08;

/// Offset of the row table
const ROW_TABLE_OFFSET: u64 = 0x20;

/// Size of the per-row prefix in front of the fixed data
const ROW_PREFIX: u64 = 6;

/// Decode every row of a page in file order
pub fn decode_page<D: Decoder>(d: &mut D, schema: &Schema) -> Result<Vec<Row>> {
    d.scope("page", &(), |d| {
        d.seek_to(ROW_TABLE_SIZE_OFFSET);
        let table_size = d.read_u32::<BigEndian>()?;

        d.seek_to(ROW_TABLE_OFFSET);
        let headers = d.read_records::<ExdRowHeader>((table_size / 8) as usize)?;

        headers
            .into_iter()
            .map(|header| decode_row(d, schema, header))
            .collect()
    })
}

fn decode_row<D: Decoder>(d: &mut D, schema: &Schema, header: ExdRowHeader) -> Result<Row> {
    d.scope("row", &header.id, |d| {
        let base = u64::from(header.offset) + ROW_PREFIX;
        let values = schema
            .members
            .iter()
            .map(|member| decode_value(d, base, schema.data_offset, member))
            .collect::<Result<Vec<_>>>()?;

        Ok(Row {
            id: header.id,
            values,
        })
    })
}

fn decode_value<D: Decoder>(d: &mut D, base: u64, data_offset: u16, member: &Member) -> Result<Value> {
    d.seek_to(base + u64::from(member.offset));

    Ok(match member.kind {
        MemberType::String => {
            let relative = d.read_u32::<BigEndian>()?;
            d.seek_to(base + u64::from(data_offset) + u64::from(relative));
            Value::String(read_text(d)?)
        }
        MemberType::Bool => Value::Bool(d.read_u8()? == 1),
        MemberType::I8 => Value::I8(d.read_i8()?),
        MemberType::U8 => Value::U8(d.read_u8()?),
        MemberType::I16 => Value::I16(d.read_i16::<BigEndian>()?),
        MemberType::U16 => Value::U16(d.read_u16::<BigEndian>()?),
        MemberType::I32 => Value::I32(d.read_i32::<BigEndian>()?),
        MemberType::U32 => Value::U32(d.read_u32::<BigEndian>()?),
        MemberType::F32 => Value::F32(d.read_f32::<BigEndian>()?),
        MemberType::U64 => Value::U64(d.read_u64::<BigEndian>()?),
        MemberType::PackedBool(bit) => Value::Bool((d.read_u8()? >> bit) & 1 == 1),
    })
}

/// Read up to a NUL byte or the end of the buffer
fn read_text<D: Decoder>(d: &mut D) -> Result<String> {
    let mut text = Vec::new();
    while d.position() < d.size() {
        match d.read_u8()? {
            0 => break,
            byte => text.push(byte),
        }
    }
    Ok(String::from_utf8_lossy(&text).into_owned())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use xiv_sqpack::{cursor::ByteCursor, decoder};

    use crate::error::{Error, Result};
    use crate::exd::decode_page;
    use crate::exh::{Member, Schema};
    use crate::types::{MemberType, Row, Value};

    fn schema(members: Vec<Member>, data_offset: u16) -> Schema {
        Schema {
            data_offset,
            members,
            pages: Vec::new(),
            languages: Vec::new(),
        }
    }

    #[rustfmt::skip]
    const PAGE: [u8; 0x3D] = [
        // magic, version, padding
        0x45, 0x58, 0x44, 0x46, 0x00, 0x02, 0x00, 0x00,
        // row table length
        0x00, 0x00, 0x00, 0x08,
        // padding up to 0x20
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        // row 7 at 0x28
        0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x28,
        // row prefix: data size, sub-row count
        0x00, 0x00, 0x00, 0x0F, 0x00, 0x01,
        // string offset, i16, packed byte, padding
        0x00, 0x00, 0x00, 0x00, 0xFF, 0xFE, 0x08, 0x00,
        // string area
        b'h', b'i', 0x00,
        // trailing text without terminator
        b'!', b'?', b'x', b'y',
    ];

    #[test]
    fn decode_row_values() -> Result<()> {
        let schema = schema(
            vec![
                Member { kind: MemberType::String, offset: 0 },
                Member { kind: MemberType::I16, offset: 4 },
                Member { kind: MemberType::PackedBool(3), offset: 6 },
            ],
            8,
        );

        let rows = decoder::read(ByteCursor::new(&PAGE), |d| decode_page(d, &schema))?;

        assert_eq!(
            rows,
            vec![Row {
                id: 7,
                values: vec![
                    Value::String("hi".into()),
                    Value::I16(-2),
                    Value::Bool(true),
                ],
            }]
        );

        Ok(())
    }

    #[test]
    fn packed_bool_reads_only_its_bit() -> Result<()> {
        let members = (0..8)
            .map(|bit| Member { kind: MemberType::PackedBool(bit), offset: 6 })
            .collect();
        let schema = schema(members, 8);

        let rows = decoder::read(ByteCursor::new(&PAGE), |d| decode_page(d, &schema))?;

        let bits = rows[0]
            .values
            .iter()
            .map(|value| matches!(value, Value::Bool(true)))
            .collect::<Vec<_>>();
        assert_eq!(bits, vec![false, false, false, true, false, false, false, false]);

        Ok(())
    }

    #[test]
    fn packed_bool_ignores_higher_bits() -> Result<()> {
        let mut page = PAGE;
        page[0x34] = 0b1010_1000;
        let members = (0..8)
            .map(|bit| Member { kind: MemberType::PackedBool(bit), offset: 6 })
            .collect();
        let schema = schema(members, 8);

        let rows = decoder::read(ByteCursor::new(&page), |d| decode_page(d, &schema))?;

        let bits = rows[0]
            .values
            .iter()
            .map(|value| matches!(value, Value::Bool(true)))
            .collect::<Vec<_>>();
        assert_eq!(bits, vec![false, false, false, true, false, true, false, true]);

        Ok(())
    }

    #[test]
    fn unterminated_string_stops_at_end() -> Result<()> {
        // the string offset of 3 points past the "hi" terminator
        let mut page = PAGE;
        page[0x31] = 0x03;
        let schema = schema(vec![Member { kind: MemberType::String, offset: 0 }], 8);

        let rows = decoder::read(ByteCursor::new(&page), |d| decode_page(d, &schema))?;
        assert_eq!(rows[0].values, vec![Value::String("!?xy".into())]);

        Ok(())
    }

    #[test]
    fn row_past_end() {
        let schema = schema(vec![Member { kind: MemberType::U64, offset: 0x40 }], 8);

        let result = decoder::read(ByteCursor::new(&PAGE), |d| decode_page(d, &schema));
        assert!(matches!(
            result,
            Err(Error::SqPack(xiv_sqpack::error::Error::OutOfBounds(_)))
        ));
    }
}
