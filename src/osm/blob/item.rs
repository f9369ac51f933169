//! Describes the `BlobItem`, one framed envelope unit of the stream, and
//! its decompression into block bytes.

use bytes::{Buf, Bytes};
use flate2::read::ZlibDecoder;
use log::warn;
use std::io::{ErrorKind, Read};

use crate::error::CodecError;
use crate::osm::model::blob::Data;
use crate::osm::model::{Blob, BlobHeader};

/// Type tag of the one-time file metadata blob.
pub const HEADER_BLOB: &str = "OSMHeader";
/// Type tag of every subsequent data blob.
pub const DATA_BLOB: &str = "OSMData";

pub struct BlobItem {
    pub header: BlobHeader,
    pub(crate) blob: Blob,
}

impl BlobItem {
    #[inline]
    pub(crate) fn new(header: BlobHeader, blob: Blob) -> BlobItem {
        BlobItem { header, blob }
    }

    /// The blob's type tag, [`HEADER_BLOB`] or [`DATA_BLOB`].
    #[inline]
    pub fn kind(&self) -> &str {
        self.header.r#type.as_str()
    }

    /// Recovers the block bytes this blob carries. Raw payloads pass
    /// through unchanged; zlib payloads inflate to exactly the declared
    /// uncompressed size. Every other compression scheme the format
    /// permits is a hard failure.
    pub fn decompress(&self) -> Result<Bytes, CodecError> {
        match &self.blob.data {
            Some(Data::Raw(data)) => Ok(data.clone()),
            Some(Data::ZlibData(data)) => {
                let raw_size = self.blob.raw_size.unwrap_or(0) as usize;
                BlobItem::zlib_decode(data.clone(), raw_size)
            }
            Some(Data::LzmaData(_)) => Err(CodecError::UnsupportedCompression("lzma")),
            Some(Data::ObsoleteBzip2Data(_)) => Err(CodecError::UnsupportedCompression("bzip2")),
            Some(Data::Lz4Data(_)) => Err(CodecError::UnsupportedCompression("lz4")),
            Some(Data::ZstdData(_)) => Err(CodecError::UnsupportedCompression("zstd")),
            None => {
                warn!("Blob without a payload. Header: {:?}", self.header);
                Err(CodecError::EmptyBlob)
            }
        }
    }

    #[inline]
    fn zlib_decode(data: Bytes, raw_size: usize) -> Result<Bytes, CodecError> {
        let mut decoded = vec![0_u8; raw_size];
        let mut decoder = ZlibDecoder::new(data.reader());

        decoder.read_exact(&mut decoded).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => CodecError::RawSizeMismatch(raw_size),
            _ => CodecError::Inflate(e),
        })?;

        // The declared size must be exact in both directions.
        match decoder.read(&mut [0_u8]) {
            Ok(0) => Ok(Bytes::from(decoded)),
            Ok(_) => Err(CodecError::RawSizeMismatch(raw_size)),
            Err(e) => Err(CodecError::Inflate(e)),
        }
    }
}
