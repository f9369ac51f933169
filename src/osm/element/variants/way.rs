//! The owned `Way`, its node references resolved to absolute ids.

use super::common::Tags;
use crate::osm::element::item::BlockWay;

#[derive(Debug, Clone, PartialEq)]
pub struct Way {
    pub id: i64,
    pub tags: Tags,
    pub refs: Vec<i64>,
}

impl Way {
    pub fn id(&self) -> i64 {
        self.id
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Absolute referenced node ids, in way order.
    #[inline]
    pub fn refs(&self) -> &[i64] {
        &self.refs
    }
}

impl From<&BlockWay<'_>> for Way {
    fn from(view: &BlockWay) -> Self {
        Way {
            id: view.id(),
            tags: Tags::from_views(view.tags()),
            refs: view.node_refs().collect(),
        }
    }
}
