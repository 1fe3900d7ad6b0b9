//! Vertex declarations ("mesh shapes") stored in sub-block 0.

use xiv_sqpack::decoder::Decoder;

use crate::{error::Result, types::VertexElement};

/// Size of one declaration
pub const MESH_SHAPE_SIZE: u64 = 0x88;

/// Stream id that ends a declaration
pub const END_OF_DECLARATION: u8 = 0xFF;

/// Elements of one mesh's vertex declaration
pub type MeshShape = Vec<VertexElement>;

/// Decode every declaration of the sub-block, one per mesh
///
/// A declaration ends at the first element with stream `0xFF` or at the end of its 0x88 bytes,
/// whichever comes first.
pub fn decode_mesh_shapes<D: Decoder>(d: &mut D) -> Result<Vec<MeshShape>> {
    let count = d.size() / MESH_SHAPE_SIZE;
    (0..count)
        .map(|i| d.scope("mesh_shape", &i, |d| decode_mesh_shape(d, i * MESH_SHAPE_SIZE)))
        .collect()
}

fn decode_mesh_shape<D: Decoder>(d: &mut D, start: u64) -> Result<MeshShape> {
    d.seek_to(start);

    let mut elements = Vec::new();
    while d.position() + 8 <= start + MESH_SHAPE_SIZE {
        let element = d.read_record::<VertexElement>()?;
        if element.stream == END_OF_DECLARATION {
            break;
        }
        elements.push(element);
    }
    Ok(elements)
}

#[cfg(test)]
pub(crate) mod test {
    use pretty_assertions::assert_eq;
    use xiv_sqpack::{cursor::ByteCursor, decoder};

    use crate::error::Result;
    use crate::shapes::{decode_mesh_shapes, MESH_SHAPE_SIZE};
    use crate::types::VertexElement;

    /// A sub-block with one declaration per entry of `shapes`, each `(stream, offset, type, usage)`
    pub(crate) fn mesh_shapes(shapes: &[&[(u8, u8, u8, u8)]]) -> Vec<u8> {
        let mut data = Vec::new();
        for shape in shapes {
            let start = data.len();
            for &(stream, offset, element_type, usage) in *shape {
                data.extend([stream, offset, element_type, usage, 0, 0, 0, 0]);
            }
            data.extend([0xFF, 0, 0, 0, 0, 0, 0, 0]);
            data.resize(start + MESH_SHAPE_SIZE as usize, 0);
        }
        data
    }

    fn element(stream: u8, offset: u8, element_type: u8, usage: u8) -> VertexElement {
        VertexElement {
            stream,
            offset,
            element_type,
            usage,
            unknown: 0,
        }
    }

    #[test]
    fn stop_at_terminator() -> Result<()> {
        let input = mesh_shapes(&[
            &[(0, 0, 0x2, 0), (1, 0, 0xE, 4)],
            &[(0, 0, 0xD, 0)],
        ]);

        let shapes = decoder::read(ByteCursor::new(&input), decode_mesh_shapes)?;

        assert_eq!(
            shapes,
            vec![
                vec![element(0, 0, 0x2, 0), element(1, 0, 0xE, 4)],
                vec![element(0, 0, 0xD, 0)],
            ]
        );

        Ok(())
    }

    #[test]
    fn unterminated_declaration_stays_in_its_slot() -> Result<()> {
        // 17 elements fill the whole declaration without a terminator
        let mut input = vec![0u8; MESH_SHAPE_SIZE as usize];
        for (i, chunk) in input.chunks_mut(8).enumerate() {
            chunk[1] = i as u8;
        }
        input.extend(mesh_shapes(&[&[(2, 4, 0x5, 7)]]));

        let shapes = decoder::read(ByteCursor::new(&input), decode_mesh_shapes)?;

        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].len(), 17);
        assert_eq!(shapes[1], vec![element(2, 4, 0x5, 7)]);

        Ok(())
    }

    #[test]
    fn empty_sub_block() -> Result<()> {
        let shapes = decoder::read(ByteCursor::new(&[]), decode_mesh_shapes)?;
        assert!(shapes.is_empty());
        Ok(())
    }
}
