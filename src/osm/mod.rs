//! OSM PBF decoding: blob framing, decompression, block decoding, and the
//! lazy entity views over a decoded block.

// Exposed modules
pub mod blob;
pub mod block;
pub mod element;

// Hidden modules
#[doc(hidden)]
pub mod test;

// Inlined structs
#[doc(inline)]
pub use blob::item::BlobItem;
#[doc(inline)]
pub use blob::iterator::BlobIterator;
#[doc(inline)]
pub use block::item::PbfBlock;
#[doc(inline)]
pub use block::stream::PbfStream;
#[doc(inline)]
pub use element::item::{BlockMember, BlockNode, BlockRelation, BlockTag, BlockWay};
#[doc(inline)]
pub use element::iterator::{NodeIter, RelationIter, WayIter};

// Doc-Linking
#[doc(hidden)]
pub use model::*;

// Protocol Buffer Includes
pub mod model {
    //! OpenStreetMaps Protobuf Definitions
    include!(concat!(env!("OUT_DIR"), "/osmpbf.rs"));
}
