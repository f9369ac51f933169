use std::io;

use thiserror::Error;

/// Everything a stream read can fail with. A clean end of stream is not an
/// error; it is the `Ok(false)` return of [`crate::PbfStream::read_into`].
///
/// Every variant is terminal for the read that raised it, and poisons the
/// stream it came from.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),

    #[error("stream ended inside a blob envelope")]
    TruncatedBlob,

    #[error("malformed blob envelope: {0}")]
    MalformedBlob(prost::DecodeError),

    #[error("blob declares a negative size ({0})")]
    InvalidBlobSize(i32),

    #[error("blob carries no payload")]
    EmptyBlob,

    #[error("expected an {expected} blob, found {found:?}")]
    UnexpectedBlobType {
        expected: &'static str,
        found: String,
    },

    #[error("unsupported compression scheme: {0}")]
    UnsupportedCompression(&'static str),

    #[error("zlib inflate failed: {0}")]
    Inflate(io::Error),

    #[error("decompressed payload did not match the declared size of {0} bytes")]
    RawSizeMismatch(usize),

    #[error("malformed block: {0}")]
    MalformedBlock(prost::DecodeError),

    #[error("file requires an unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("unknown relation member type: {0}")]
    UnknownMemberType(i32),

    #[error("read attempted on a failed stream")]
    Poisoned,
}
