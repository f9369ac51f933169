//! Entity views over a decoded block, their iterators, and the owned
//! values they materialize into

pub mod coords;
pub mod item;
pub mod iterator;

pub(crate) mod delta;

#[doc(hidden)]
pub mod variants;

#[doc(inline)]
pub use coords::Coords;
#[doc(inline)]
pub use item::{BlockMember, BlockNode, BlockRelation, BlockTag, BlockWay};
#[doc(inline)]
pub use iterator::{NodeIter, RelationIter, WayIter};

pub use variants::*;
