//! The owned `Node`: identity, converted position and copied tags, with no
//! remaining reference to the block it came from.

use geo::Point;

use super::common::Tags;
use crate::osm::element::coords::Coords;
use crate::osm::element::item::BlockNode;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    pub coords: Coords,
    pub tags: Tags,
}

impl Node {
    /// Returns the identifier for the node
    pub fn id(&self) -> i64 {
        self.id
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    #[inline]
    pub fn coords(&self) -> Coords {
        self.coords
    }

    /// Position as a `geo` point, `x` = longitude, `y` = latitude.
    pub fn position(&self) -> Point {
        Point::from(self.coords)
    }
}

impl From<&BlockNode<'_>> for Node {
    fn from(view: &BlockNode) -> Self {
        Node {
            id: view.id(),
            coords: view.coords(),
            tags: Tags::from_views(view.tags()),
        }
    }
}
