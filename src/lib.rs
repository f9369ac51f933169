#![doc = include_str!("../docs/codec.md")]

#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;
#[cfg_attr(feature = "mimalloc", global_allocator)]
#[cfg(feature = "mimalloc")]
static GLOBAL: MiMalloc = MiMalloc;

pub mod error;
pub mod osm;

pub use error::CodecError;

pub use osm::block::item::PbfBlock;
pub use osm::block::stream::PbfStream;
pub use osm::element::coords::Coords;
pub use osm::element::item::{BlockMember, BlockNode, BlockRelation, BlockTag, BlockWay};
pub use osm::element::iterator::{NodeIter, RelationIter, WayIter};
pub use osm::element::variants::{Member, Node, Relation, TagString, Tags, Way};
pub use osm::model::relation::MemberType;
