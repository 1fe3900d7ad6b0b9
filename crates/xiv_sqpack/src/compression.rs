//! Block decompression.
//!
//! Every resource payload is split into blocks that are either stored as is or compressed as raw
//! deflate (no zlib header). The routines here know nothing about resource kinds, they only turn a
//! run of blocks at a given offset into one contiguous buffer.

use flate2::{Decompress, FlushDecompress, Status};
use tracing::instrument;

use crate::{
    decoder::Decoder,
    error::{Error, Result},
    types::BlockHeader,
};

fn corrupt(offset: u64, reason: impl Into<String>) -> Error {
    Error::CorruptBlock {
        offset,
        reason: reason.into(),
    }
}

// Largest expansion a deflate stream can achieve
const MAX_DEFLATE_RATIO: usize = 1032;

/// Inflate exactly `payload` into a buffer of exactly `expected` bytes
fn inflate(offset: u64, payload: &[u8], expected: usize) -> Result<Vec<u8>> {
    if expected > payload.len().saturating_mul(MAX_DEFLATE_RATIO) {
        return Err(corrupt(
            offset,
            format!("{} compressed bytes cannot inflate to {expected}", payload.len()),
        ));
    }

    let mut inflater = Decompress::new(false);
    let mut output = Vec::with_capacity(expected);

    let status = inflater
        .decompress_vec(payload, &mut output, FlushDecompress::Finish)
        .map_err(|err| corrupt(offset, format!("invalid deflate stream: {err}")))?;

    if status != Status::StreamEnd {
        return Err(corrupt(offset, "deflate stream ended prematurely"));
    }
    if inflater.total_in() != payload.len() as u64 {
        return Err(corrupt(
            offset,
            format!(
                "deflate stream consumed {} of {} bytes",
                inflater.total_in(),
                payload.len()
            ),
        ));
    }
    if output.len() != expected {
        return Err(corrupt(
            offset,
            format!("inflated to {} bytes, expected {expected}", output.len()),
        ));
    }

    Ok(output)
}

/// Decode the block at `offset`, appending its content to `output`
///
/// Returns the number of bytes appended.
pub fn decompress_block<D: Decoder>(d: &mut D, offset: u64, output: &mut Vec<u8>) -> Result<usize> {
    d.scope("block", &offset, |d| {
        d.seek_to(offset);
        let header = d.read_record::<BlockHeader>()?;

        let stored = header.is_stored();
        let length = if stored {
            header.uncompressed_size
        } else {
            header.compressed_size
        };

        let payload = d.read_bytes(length as usize).map_err(|err| match err {
            Error::OutOfBounds(overrun) => corrupt(offset, format!("truncated payload: {overrun}")),
            err => err,
        })?;

        if stored {
            output.extend_from_slice(&payload);
            return Ok(payload.len());
        }

        let inflated = inflate(offset, &payload, header.uncompressed_size as usize)?;
        output.extend_from_slice(&inflated);
        Ok(inflated.len())
    })
}

/// Decode a run of back-to-back blocks starting at `start`
///
/// `sizes` holds the on-disk size of each block, which is how far the next block is from the
/// current one.
#[instrument(level = "trace", skip(d, sizes, output), fields(blocks = sizes.len()), err(level = "debug"))]
pub fn decompress_blocks<D: Decoder>(
    d: &mut D,
    start: u64,
    sizes: &[u16],
    output: &mut Vec<u8>,
) -> Result<usize> {
    d.scope("blocks", &(start, sizes.len()), |d| {
        let mut current = start;
        let mut written = 0;
        for &size in sizes {
            written += decompress_block(d, current, output)?;
            current += u64::from(size);
        }
        Ok(written)
    })
}

#[cfg(test)]
pub(crate) mod test {
    use std::io::Write;

    use flate2::{write::DeflateEncoder, Compression};
    use pretty_assertions::assert_eq;

    use crate::compression::{decompress_block, decompress_blocks};
    use crate::cursor::ByteCursor;
    use crate::decoder;
    use crate::error::{Error, Result};
    use crate::types::BlockHeader;

    pub(crate) fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).expect("write to vec");
        encoder.finish().expect("finish deflate")
    }

    pub(crate) fn block(compressed_size: u32, uncompressed_size: u32, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(16u32.to_le_bytes());
        out.extend(0u32.to_le_bytes());
        out.extend(compressed_size.to_le_bytes());
        out.extend(uncompressed_size.to_le_bytes());
        out.extend(payload);
        out
    }

    pub(crate) fn stored(payload: &[u8]) -> Vec<u8> {
        block(BlockHeader::STORED, payload.len() as u32, payload)
    }

    pub(crate) fn compressed(content: &[u8]) -> Vec<u8> {
        let payload = deflate(content);
        block(payload.len() as u32, content.len() as u32, &payload)
    }

    #[test]
    fn stored_blocks_concatenate() -> Result<()> {
        let first = stored(b"hello ");
        let second = stored(b"world");
        let sizes = [first.len() as u16, second.len() as u16];
        let data = [first, second].concat();

        let mut output = Vec::new();
        let written = decoder::read(ByteCursor::new(&data), |d| {
            decompress_blocks(d, 0, &sizes, &mut output)
        })?;

        assert_eq!(written, 11);
        assert_eq!(output, b"hello world");

        Ok(())
    }

    #[test]
    fn deflate_and_stored_blocks() -> Result<()> {
        let content = b"the quick brown fox jumps over the lazy dog, the quick brown fox";
        let first = compressed(content);
        let second = stored(b"!!");
        let sizes = [first.len() as u16, second.len() as u16];
        let data = [first, second].concat();

        let mut output = Vec::new();
        decoder::read(ByteCursor::new(&data), |d| {
            decompress_blocks(d, 0, &sizes, &mut output)
        })?;

        assert_eq!(output, [&content[..], b"!!"].concat());

        Ok(())
    }

    #[test]
    fn compressed_size_off_by_one() {
        let content = b"abcabcabcabcabcabcabcabcabcabcabcabc";
        let payload = deflate(content);

        for size in [payload.len() - 1, payload.len() + 1] {
            let mut data = block(size as u32, content.len() as u32, &payload);
            // trailing garbage so that the longer read stays inside the buffer
            data.extend([0xAA; 4]);

            let mut output = Vec::new();
            let result = decoder::read(ByteCursor::new(&data), |d| {
                decompress_block(d, 0, &mut output)
            });
            assert!(
                matches!(result, Err(Error::CorruptBlock { offset: 0, .. })),
                "size {size} gave {result:?}"
            );
        }
    }

    #[test]
    fn truncated_stored_payload() {
        let mut data = stored(b"hello");
        data.truncate(data.len() - 2);

        let mut output = Vec::new();
        let result = decoder::read(ByteCursor::new(&data), |d| {
            decompress_block(d, 0, &mut output)
        });
        assert!(matches!(result, Err(Error::CorruptBlock { .. })));
        assert!(output.is_empty());
    }

    #[test]
    fn wrong_uncompressed_size() {
        let content = b"some content";
        let payload = deflate(content);
        let data = block(payload.len() as u32, content.len() as u32 + 1, &payload);

        let mut output = Vec::new();
        let result = decoder::read(ByteCursor::new(&data), |d| {
            decompress_block(d, 0, &mut output)
        });
        assert!(matches!(result, Err(Error::CorruptBlock { .. })));
    }

    #[test]
    fn impossible_uncompressed_size() {
        let payload = deflate(b"tiny");
        let data = block(payload.len() as u32, u32::MAX, &payload);

        let mut output = Vec::new();
        let result = decoder::read(ByteCursor::new(&data), |d| {
            decompress_block(d, 0, &mut output)
        });
        assert!(matches!(
            result,
            Err(Error::CorruptBlock { offset: 0, ref reason }) if reason.contains("cannot inflate")
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn garbage_payload() {
        let data = block(4, 16, &[0xFF, 0xFF, 0xFF, 0xFF]);

        let mut output = Vec::new();
        let result = decoder::read(ByteCursor::new(&data), |d| {
            decompress_block(d, 0, &mut output)
        });
        assert!(matches!(result, Err(Error::CorruptBlock { .. })));
    }
}
