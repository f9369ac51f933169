#![cfg(test)]

use std::io::Cursor;

use crate::error::CodecError;
use crate::osm::blob::item::{DATA_BLOB, HEADER_BLOB};
use crate::osm::blob::iterator::BlobIterator;
use crate::osm::block::item::PbfBlock;
use crate::osm::block::stream::PbfStream;
use crate::osm::model::blob::Data;
use crate::osm::model::{Blob, PrimitiveBlock};

/// Builders for synthetic in-memory streams, assembled with the same prost
/// model the decoder consumes.
pub(crate) mod synth {
    use bytes::Bytes;
    use prost::Message;
    use std::io::{Cursor, Write};

    use crate::osm::blob::item::{DATA_BLOB, HEADER_BLOB};
    use crate::osm::block::item::PbfBlock;
    use crate::osm::block::stream::PbfStream;
    use crate::osm::model::blob::Data;
    use crate::osm::model::{
        Blob, BlobHeader, DenseNodes, HeaderBlock, Node, PrimitiveBlock, PrimitiveGroup, Relation,
        StringTable, Way,
    };

    pub fn string_table(strings: &[&str]) -> StringTable {
        StringTable {
            s: strings
                .iter()
                .map(|s| Bytes::copy_from_slice(s.as_bytes()))
                .collect(),
        }
    }

    pub fn raw_blob(block_bytes: &[u8]) -> Blob {
        Blob {
            raw_size: None,
            data: Some(Data::Raw(Bytes::copy_from_slice(block_bytes))),
        }
    }

    pub fn zlib_blob(block_bytes: &[u8]) -> Blob {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(block_bytes).expect("in-memory write");
        let compressed = encoder.finish().expect("in-memory finish");

        Blob {
            raw_size: Some(block_bytes.len() as i32),
            data: Some(Data::ZlibData(Bytes::from(compressed))),
        }
    }

    /// Frames a blob the way it sits on disk: big-endian header length,
    /// header bytes, blob bytes.
    pub fn frame_blob(kind: &str, blob: &Blob) -> Vec<u8> {
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

    pub fn header_block() -> HeaderBlock {
        HeaderBlock {
            required_features: vec!["OsmSchema-V0.6".to_string(), "DenseNodes".to_string()],
            ..Default::default()
        }
    }

    pub fn stream_bytes(blocks: &[PrimitiveBlock]) -> Vec<u8> {
        let mut bytes = frame_blob(HEADER_BLOB, &raw_blob(&header_block().encode_to_vec()));
        for block in blocks {
            bytes.extend(frame_blob(DATA_BLOB, &raw_blob(&block.encode_to_vec())));
        }

        bytes
    }

    pub fn open(blocks: &[PrimitiveBlock]) -> PbfStream<Cursor<Vec<u8>>> {
        PbfStream::new(Cursor::new(stream_bytes(blocks))).expect("synthetic header must parse")
    }

    /// Opens a one-block stream and reads that block.
    pub fn read_single(source: PrimitiveBlock) -> PbfBlock {
        let mut stream = open(std::slice::from_ref(&source));
        let mut block = PbfBlock::new();
        assert!(stream.read_into(&mut block).expect("read must succeed"));
        block
    }

    pub fn block_of(groups: Vec<PrimitiveGroup>, strings: &[&str]) -> PrimitiveBlock {
        PrimitiveBlock {
            stringtable: string_table(strings),
            primitivegroup: groups,
            ..Default::default()
        }
    }

    pub fn dense_group(
        ids: &[i64],
        lats: &[i64],
        lons: &[i64],
        keys_vals: &[i32],
    ) -> PrimitiveGroup {
        PrimitiveGroup {
            dense: Some(DenseNodes {
                id: ids.to_vec(),
                lat: lats.to_vec(),
                lon: lons.to_vec(),
                keys_vals: keys_vals.to_vec(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn plain_node(id: i64, lat: i64, lon: i64, keys: &[u32], vals: &[u32]) -> Node {
        Node {
            id,
            keys: keys.to_vec(),
            vals: vals.to_vec(),
            lat,
            lon,
            ..Default::default()
        }
    }

    pub fn way(id: i64, refs: &[i64], keys: &[u32], vals: &[u32]) -> Way {
        Way {
            id,
            keys: keys.to_vec(),
            vals: vals.to_vec(),
            refs: refs.to_vec(),
            ..Default::default()
        }
    }

    pub fn relation(
        id: i64,
        memids: &[i64],
        types: &[i32],
        roles_sid: &[i32],
        keys: &[u32],
        vals: &[u32],
    ) -> Relation {
        Relation {
            id,
            keys: keys.to_vec(),
            vals: vals.to_vec(),
            roles_sid: roles_sid.to_vec(),
            memids: memids.to_vec(),
            types: types.to_vec(),
            ..Default::default()
        }
    }
}

#[test_log::test]
fn reads_until_clean_end() {
    let blocks = vec![
        synth::block_of(vec![synth::dense_group(&[1], &[0], &[0], &[0])], &[""]),
        synth::block_of(vec![synth::dense_group(&[2], &[0], &[0], &[0])], &[""]),
    ];

    let mut stream = synth::open(&blocks);
    let mut block = PbfBlock::new();

    assert!(stream.read_into(&mut block).expect("first block"));
    assert!(stream.read_into(&mut block).expect("second block"));
    assert!(!stream.read_into(&mut block).expect("clean end"));

    // End is sticky; further reads stay at end rather than erroring.
    assert!(!stream.read_into(&mut block).expect("still ended"));
}

#[test]
fn header_only_stream_ends_immediately() {
    let mut stream = synth::open(&[]);
    let mut block = PbfBlock::new();

    assert!(!stream.read_into(&mut block).expect("no data blobs"));
}

#[test]
fn truncated_stream_poisons() {
    let blocks = vec![
        synth::block_of(vec![synth::dense_group(&[1], &[0], &[0], &[0])], &[""]),
        synth::block_of(vec![synth::dense_group(&[2], &[0], &[0], &[0])], &[""]),
    ];

    let mut bytes = synth::stream_bytes(&blocks);
    bytes.truncate(bytes.len() - 3);

    let mut stream = PbfStream::new(Cursor::new(bytes)).expect("header intact");
    let mut block = PbfBlock::new();

    assert!(stream.read_into(&mut block).expect("first block intact"));
    assert!(matches!(
        stream.read_into(&mut block),
        Err(CodecError::TruncatedBlob)
    ));

    // Every read after a failure must fail without touching the reader.
    assert!(matches!(
        stream.read_into(&mut block),
        Err(CodecError::Poisoned)
    ));
}

#[test]
fn missing_header_blob_rejected() {
    let block = synth::block_of(vec![], &[""]);
    let bytes = synth::frame_blob(
        DATA_BLOB,
        &synth::raw_blob(&prost::Message::encode_to_vec(&block)),
    );

    assert!(matches!(
        PbfStream::new(Cursor::new(bytes)),
        Err(CodecError::UnexpectedBlobType { .. })
    ));
}

#[test]
fn empty_input_rejected_at_open() {
    assert!(matches!(
        PbfStream::new(Cursor::new(Vec::new())),
        Err(CodecError::TruncatedBlob)
    ));
}

#[test]
fn unknown_required_feature_rejected() {
    let mut header = synth::header_block();
    header
        .required_features
        .push("HistoricalInformation".to_string());

    let bytes = synth::frame_blob(
        HEADER_BLOB,
        &synth::raw_blob(&prost::Message::encode_to_vec(&header)),
    );

    match PbfStream::new(Cursor::new(bytes)) {
        Err(CodecError::UnsupportedFeature(feature)) => {
            assert_eq!(feature, "HistoricalInformation")
        }
        other => panic!("expected UnsupportedFeature, got {other:?}"),
    }
}

#[test]
fn header_blob_after_data_rejected() {
    let block = synth::block_of(vec![], &[""]);
    let mut bytes = synth::stream_bytes(std::slice::from_ref(&block));
    bytes.extend(synth::frame_blob(
        HEADER_BLOB,
        &synth::raw_blob(&prost::Message::encode_to_vec(&synth::header_block())),
    ));

    let mut stream = PbfStream::new(Cursor::new(bytes)).expect("header intact");
    let mut block = PbfBlock::new();

    assert!(stream.read_into(&mut block).expect("data block"));
    assert!(matches!(
        stream.read_into(&mut block),
        Err(CodecError::UnexpectedBlobType { .. })
    ));
}

#[test_log::test]
fn zlib_payload_roundtrip() {
    let source = synth::block_of(
        vec![synth::dense_group(&[42], &[5], &[-5], &[0])],
        &[""],
    );

    let mut bytes = synth::frame_blob(
        HEADER_BLOB,
        &synth::raw_blob(&prost::Message::encode_to_vec(&synth::header_block())),
    );
    bytes.extend(synth::frame_blob(
        DATA_BLOB,
        &synth::zlib_blob(&prost::Message::encode_to_vec(&source)),
    ));

    let mut stream = PbfStream::new(Cursor::new(bytes)).expect("header intact");
    let mut block = PbfBlock::new();

    assert!(stream.read_into(&mut block).expect("compressed block"));
    let ids = block.nodes().map(|node| node.id()).collect::<Vec<_>>();
    assert_eq!(ids, vec![42]);
}

#[test]
fn zlib_size_mismatch_rejected() {
    let source = synth::block_of(vec![], &[""]);
    let mut blob = synth::zlib_blob(&prost::Message::encode_to_vec(&source));
    blob.raw_size = blob.raw_size.map(|size| size + 1);

    let mut bytes = synth::frame_blob(
        HEADER_BLOB,
        &synth::raw_blob(&prost::Message::encode_to_vec(&synth::header_block())),
    );
    bytes.extend(synth::frame_blob(DATA_BLOB, &blob));

    let mut stream = PbfStream::new(Cursor::new(bytes)).expect("header intact");
    let mut block = PbfBlock::new();

    assert!(matches!(
        stream.read_into(&mut block),
        Err(CodecError::RawSizeMismatch(_))
    ));
}

#[test]
fn unsupported_compression_rejected() {
    let blob = Blob {
        raw_size: Some(16),
        data: Some(Data::LzmaData(bytes::Bytes::from_static(&[0_u8; 16]))),
    };

    let mut bytes = synth::frame_blob(
        HEADER_BLOB,
        &synth::raw_blob(&prost::Message::encode_to_vec(&synth::header_block())),
    );
    bytes.extend(synth::frame_blob(DATA_BLOB, &blob));

    let mut stream = PbfStream::new(Cursor::new(bytes)).expect("header intact");
    let mut block = PbfBlock::new();

    match stream.read_into(&mut block) {
        Err(CodecError::UnsupportedCompression(scheme)) => assert_eq!(scheme, "lzma"),
        other => panic!("expected UnsupportedCompression, got {other:?}"),
    }

    assert!(matches!(
        stream.read_into(&mut block),
        Err(CodecError::Poisoned)
    ));
}

#[test]
fn payloadless_blob_rejected() {
    let blob = Blob {
        raw_size: None,
        data: None,
    };

    let mut bytes = synth::frame_blob(
        HEADER_BLOB,
        &synth::raw_blob(&prost::Message::encode_to_vec(&synth::header_block())),
    );
    bytes.extend(synth::frame_blob(DATA_BLOB, &blob));

    let mut stream = PbfStream::new(Cursor::new(bytes)).expect("header intact");
    let mut block = PbfBlock::new();

    assert!(matches!(
        stream.read_into(&mut block),
        Err(CodecError::EmptyBlob)
    ));
}

#[test]
fn garbage_block_bytes_rejected() {
    let mut bytes = synth::frame_blob(
        HEADER_BLOB,
        &synth::raw_blob(&prost::Message::encode_to_vec(&synth::header_block())),
    );
    bytes.extend(synth::frame_blob(
        DATA_BLOB,
        &synth::raw_blob(&[0xFF, 0xFF, 0xFF, 0xFF]),
    ));

    let mut stream = PbfStream::new(Cursor::new(bytes)).expect("header intact");
    let mut block = PbfBlock::new();

    assert!(matches!(
        stream.read_into(&mut block),
        Err(CodecError::MalformedBlock(_))
    ));
}

#[test]
fn blob_iterator_clean_and_truncated_ends() {
    let mut empty = BlobIterator::new(Cursor::new(Vec::<u8>::new()));
    assert!(empty.read_blob().expect("clean end").is_none());

    let mut partial_prefix = BlobIterator::new(Cursor::new(vec![0_u8, 0_u8]));
    assert!(matches!(
        partial_prefix.read_blob(),
        Err(CodecError::TruncatedBlob)
    ));

    // A full prefix that promises more header bytes than the stream holds.
    let mut bytes = 64_u32.to_be_bytes().to_vec();
    bytes.extend_from_slice(&[1, 2, 3]);
    let mut short_header = BlobIterator::new(Cursor::new(bytes));
    assert!(matches!(
        short_header.read_blob(),
        Err(CodecError::TruncatedBlob)
    ));
}

#[test]
fn malformed_blob_header_rejected() {
    let mut bytes = 4_u32.to_be_bytes().to_vec();
    bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);

    let mut blobs = BlobIterator::new(Cursor::new(bytes));
    assert!(matches!(
        blobs.read_blob(),
        Err(CodecError::MalformedBlob(_))
    ));
}

#[test]
fn block_defaults_apply() {
    let block = synth::read_single(PrimitiveBlock {
        stringtable: synth::string_table(&[""]),
        ..Default::default()
    });

    // Granularity defaults per the format when the block does not set it.
    assert_eq!(block.granularity(), 100);
    assert_eq!(block.node_count(), 0);
    assert_eq!(block.nodes().count(), 0);
}
