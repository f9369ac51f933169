//! Full-pipeline sweep: framing, inflate, block decode and node iteration
//! over a synthetic in-memory stream.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use bytes::Bytes;
use prost::Message;
use std::io::{Cursor, Write};

use pbf_codec::osm::model::blob::Data;
use pbf_codec::osm::model::{
    Blob, BlobHeader, DenseNodes, HeaderBlock, PrimitiveBlock, PrimitiveGroup, StringTable,
};
use pbf_codec::{PbfBlock, PbfStream};

const BLOCKS: usize = 8;
const NODES_PER_BLOCK: usize = 8_000;

fn frame(kind: &str, blob: &Blob) -> Vec<u8> {
    let body = blob.encode_to_vec();
    let header = BlobHeader {
        r#type: kind.to_string(),
        indexdata: None,
        datasize: body.len() as i32,
    };
    let header_bytes = header.encode_to_vec();

    let mut framed = (header_bytes.len() as u32).to_be_bytes().to_vec();
    framed.extend_from_slice(&header_bytes);
    framed.extend_from_slice(&body);
    framed
}

fn zlib(block_bytes: &[u8]) -> Blob {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(block_bytes).expect("in-memory write");

    Blob {
        raw_size: Some(block_bytes.len() as i32),
        data: Some(Data::ZlibData(Bytes::from(
            encoder.finish().expect("in-memory finish"),
        ))),
    }
}

fn synthetic_stream() -> Vec<u8> {
    let header = HeaderBlock {
        required_features: vec!["OsmSchema-V0.6".to_string(), "DenseNodes".to_string()],
        ..Default::default()
    };

    let mut bytes = frame(
        "OSMHeader",
        &Blob {
            raw_size: None,
            data: Some(Data::Raw(Bytes::from(header.encode_to_vec()))),
        },
    );

    for block_index in 0..BLOCKS {
        let dense = DenseNodes {
            id: std::iter::once((block_index * NODES_PER_BLOCK) as i64)
                .chain(std::iter::repeat(1).take(NODES_PER_BLOCK - 1))
                .collect(),
            lat: vec![13; NODES_PER_BLOCK],
            lon: vec![-7; NODES_PER_BLOCK],
            keys_vals: vec![0; NODES_PER_BLOCK],
            ..Default::default()
        };

        let block = PrimitiveBlock {
            stringtable: StringTable {
                s: vec![Bytes::new()],
            },
            primitivegroup: vec![PrimitiveGroup {
                dense: Some(dense),
                ..Default::default()
            }],
            ..Default::default()
        };

        bytes.extend(frame("OSMData", &zlib(&block.encode_to_vec())));
    }

    bytes
}

fn decode_sweep(c: &mut Criterion) {
    let bytes = synthetic_stream();

    c.bench_function("decode_sweep", |b| {
        b.iter(|| {
            let mut stream =
                PbfStream::new(Cursor::new(bytes.clone())).expect("synthetic header");
            let mut block = PbfBlock::new();
            let mut total = 0_i64;

            while stream.read_into(&mut block).expect("synthetic read") {
                for node in block.nodes() {
                    total += node.id();
                }
            }

            black_box(total)
        })
    });
}

criterion_group!(benches, decode_sweep);
criterion_main!(benches);
