//! The blob framing reader. Walks the length-prefixed envelope sequence
//! off any byte stream.

use log::trace;
use prost::Message;
use std::io::{ErrorKind, Read};

use crate::error::CodecError;
use crate::osm::blob::item::BlobItem;
use crate::osm::model::{Blob, BlobHeader};

const HEADER_LEN_SIZE: usize = 4;

#[derive(Debug)]
pub struct BlobIterator<R> {
    reader: R,
    pub(crate) index: u64,
}

impl<R: Read> BlobIterator<R> {
    pub fn new(reader: R) -> BlobIterator<R> {
        BlobIterator { reader, index: 0 }
    }

    /// Reads the next `(BlobHeader, Blob)` envelope pair. A stream that is
    /// exhausted before the first prefix byte is a clean end (`Ok(None)`);
    /// one that gives out anywhere later is truncated.
    pub fn read_blob(&mut self) -> Result<Option<BlobItem>, CodecError> {
        let mut header_len_buffer = [0_u8; HEADER_LEN_SIZE];
        if !self.fill(&mut header_len_buffer)? {
            return Ok(None);
        }

        // Translate to i32 (Big Endian)
        let blob_header_length = i32::from_be_bytes(header_len_buffer);
        if blob_header_length < 0 {
            return Err(CodecError::InvalidBlobSize(blob_header_length));
        }

        let mut blob_header_buffer = vec![0_u8; blob_header_length as usize];
        self.read_exact(&mut blob_header_buffer)?;

        let header =
            BlobHeader::decode(blob_header_buffer.as_slice()).map_err(CodecError::MalformedBlob)?;
        if header.datasize < 0 {
            return Err(CodecError::InvalidBlobSize(header.datasize));
        }

        let mut blob_buffer = vec![0_u8; header.datasize as usize];
        self.read_exact(&mut blob_buffer)?;

        let blob = Blob::decode(blob_buffer.as_slice()).map_err(CodecError::MalformedBlob)?;

        trace!("Read blob {}. Size: {}", self.index, header.datasize);
        self.index += 1;

        Ok(Some(BlobItem::new(header, blob)))
    }

    /// Fills `buf` completely, returning false when the stream was already
    /// exhausted at the first byte.
    fn fill(&mut self, buf: &mut [u8]) -> Result<bool, CodecError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) if filled == 0 => return Ok(false),
                Ok(0) => return Err(CodecError::TruncatedBlob),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(CodecError::Io(e)),
            }
        }

        Ok(true)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), CodecError> {
        self.reader.read_exact(buf).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => CodecError::TruncatedBlob,
            _ => CodecError::Io(e),
        })
    }
}

impl<R: Read> Iterator for BlobIterator<R> {
    type Item = Result<BlobItem, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_blob().transpose()
    }
}
