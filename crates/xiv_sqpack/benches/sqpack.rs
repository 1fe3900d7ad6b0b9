use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

fn block(compressed_size: u32, uncompressed_size: usize, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend(16u32.to_le_bytes());
    out.extend(0u32.to_le_bytes());
    out.extend(compressed_size.to_le_bytes());
    out.extend((uncompressed_size as u32).to_le_bytes());
    out.extend(payload);
    out
}

pub mod index {
    use divan::Bencher;
    use xiv_sqpack::{cursor::ByteCursor, decoder, index::decode_index};

    fn get_input(records: u32) -> Vec<u8> {
        let mut data = vec![0u8; 0x800];
        data[0x408..0x40C].copy_from_slice(&0x800u32.to_le_bytes());
        data[0x40C..0x410].copy_from_slice(&(records * 16).to_le_bytes());
        for i in 0..records {
            data.extend(i.to_le_bytes());
            data.extend((i / 16).to_le_bytes());
            data.extend((i * 0x10).to_le_bytes());
            data.extend([0u8; 4]);
        }
        data
    }

    #[divan::bench(args = [1_000, 100_000])]
    fn decode(bencher: Bencher, records: u32) {
        bencher
            .with_inputs(|| get_input(records))
            .bench_refs(|data| {
                divan::black_box(decoder::read(ByteCursor::new(data), decode_index).unwrap());
            });
    }

    #[divan::bench(args = [1_000])]
    fn trace(bencher: Bencher, records: u32) {
        bencher
            .with_inputs(|| get_input(records))
            .bench_refs(|data| {
                divan::black_box(decoder::trace(ByteCursor::new(data), decode_index));
            });
    }
}

pub mod blocks {
    use std::io::Write;

    use divan::Bencher;
    use flate2::{write::DeflateEncoder, Compression};
    use xiv_sqpack::{compression::decompress_blocks, cursor::ByteCursor, decoder};

    const BLOCK: usize = 16 * 1024;

    fn get_input(count: usize, deflate: bool) -> (Vec<u8>, Vec<u16>) {
        let content = (0..BLOCK).map(|i| (i % 251) as u8).collect::<Vec<_>>();
        let encoded = if deflate {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&content).unwrap();
            let payload = encoder.finish().unwrap();
            super::block(payload.len() as u32, content.len(), &payload)
        } else {
            super::block(32000, content.len(), &content)
        };

        let sizes = vec![encoded.len() as u16; count];
        (encoded.repeat(count), sizes)
    }

    #[divan::bench(args = [false, true])]
    fn decompress(bencher: Bencher, deflate: bool) {
        bencher
            .with_inputs(|| get_input(16, deflate))
            .bench_refs(|(data, sizes)| {
                let mut output = Vec::new();
                decoder::read(ByteCursor::new(data), |d| {
                    decompress_blocks(d, 0, sizes, &mut output)
                })
                .unwrap();
                divan::black_box(output);
            });
    }
}
