//! The stream session: drives the blob reader, validates the one-time file
//! header, and decodes data blobs into a caller-owned block.

use log::trace;
use prost::Message;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::CodecError;
use crate::osm::blob::item::{BlobItem, DATA_BLOB, HEADER_BLOB};
use crate::osm::blob::iterator::BlobIterator;
use crate::osm::block::item::PbfBlock;
use crate::osm::model::HeaderBlock;

/// Required features this decoder understands. A file declaring anything
/// else cannot be read correctly and is rejected up front.
const SUPPORTED_FEATURES: [&str; 2] = ["OsmSchema-V0.6", "DenseNodes"];

#[derive(Debug)]
enum StreamState {
    Active,
    Ended,
    Failed,
}

#[derive(Debug)]
pub struct PbfStream<R> {
    blobs: BlobIterator<R>,
    state: StreamState,
}

impl PbfStream<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let file = File::open(path)?;
        PbfStream::new(BufReader::new(file))
    }
}

impl<R: Read> PbfStream<R> {
    /// Wraps `reader` and performs the one-time header-blob read. A stream
    /// whose metadata cannot be read, or that requires a feature this
    /// decoder lacks, never constructs.
    pub fn new(reader: R) -> Result<Self, CodecError> {
        let mut blobs = BlobIterator::new(reader);

        let item = blobs.read_blob()?.ok_or(CodecError::TruncatedBlob)?;
        Self::validate_header(&item)?;

        Ok(PbfStream {
            blobs,
            state: StreamState::Active,
        })
    }

    fn validate_header(item: &BlobItem) -> Result<(), CodecError> {
        if item.kind() != HEADER_BLOB {
            return Err(CodecError::UnexpectedBlobType {
                expected: HEADER_BLOB,
                found: item.kind().to_string(),
            });
        }

        let data = item.decompress()?;
        let header = HeaderBlock::decode(data).map_err(CodecError::MalformedBlock)?;

        for feature in &header.required_features {
            if !SUPPORTED_FEATURES.contains(&feature.as_str()) {
                return Err(CodecError::UnsupportedFeature(feature.clone()));
            }
        }

        trace!("Stream header validated. Source: {:?}", header.source);
        Ok(())
    }

    /// Reads the next data blob, decompresses it, and decodes it into
    /// `block`, overwriting the previous contents. Returns `Ok(false)` on a
    /// clean end of stream.
    ///
    /// Any failure poisons the stream: every further read returns
    /// [`CodecError::Poisoned`] without touching the reader again.
    pub fn read_into(&mut self, block: &mut PbfBlock) -> Result<bool, CodecError> {
        match self.state {
            StreamState::Failed => return Err(CodecError::Poisoned),
            StreamState::Ended => return Ok(false),
            StreamState::Active => {}
        }

        match self.next_block(block) {
            Ok(read) => {
                if !read {
                    self.state = StreamState::Ended;
                }
                Ok(read)
            }
            Err(e) => {
                self.state = StreamState::Failed;
                Err(e)
            }
        }
    }

    fn next_block(&mut self, block: &mut PbfBlock) -> Result<bool, CodecError> {
        let Some(item) = self.blobs.read_blob()? else {
            return Ok(false);
        };

        if item.kind() != DATA_BLOB {
            return Err(CodecError::UnexpectedBlobType {
                expected: DATA_BLOB,
                found: item.kind().to_string(),
            });
        }

        let data = item.decompress()?;
        block.replace_from(&data)?;

        Ok(true)
    }
}
