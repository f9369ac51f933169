//! A `PbfBlock`, the single reusable slot a stream session decodes data
//! blobs into, carrying the accessors every entity view resolves through.

use prost::Message;
use std::borrow::Cow;

use crate::error::CodecError;
use crate::osm::element::iterator::{NodeIter, RelationIter, WayIter};
use crate::osm::model::PrimitiveBlock;

/// One decoded primitive block. Overwritten in place by each successive
/// [`PbfStream::read_into`](crate::PbfStream::read_into); views and
/// iterators borrow it, so nothing stale can survive the next read.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PbfBlock {
    pub(crate) block: PrimitiveBlock,
}

impl PbfBlock {
    /// An empty block. Every iterator starts at end until a stream read
    /// fills it.
    pub fn new() -> PbfBlock {
        PbfBlock::default()
    }

    pub(crate) fn replace_from(&mut self, data: &[u8]) -> Result<(), CodecError> {
        self.block = PrimitiveBlock::decode(data).map_err(CodecError::MalformedBlock)?;

        #[cfg(feature = "tracing")]
        if self.block.lat_offset.is_some()
            || self.block.lon_offset.is_some()
            || self.block.granularity.is_some()
        {
            tracing::debug!(
                "BlockHasOffset! +Lon={:?}, +Lat={:?}, Granularity={:?}",
                self.block.lon_offset,
                self.block.lat_offset,
                self.block.granularity
            );
        }

        Ok(())
    }

    /// Nanodegrees per coordinate unit in this block.
    /// Default Scaling Factor: <https://wiki.openstreetmap.org/wiki/PBF_Format>
    #[inline]
    pub fn granularity(&self) -> i32 {
        self.block.granularity()
    }

    #[inline]
    pub(crate) fn lat_offset(&self) -> i64 {
        self.block.lat_offset()
    }

    #[inline]
    pub(crate) fn lon_offset(&self) -> i64 {
        self.block.lon_offset()
    }

    /// Recovers the string-table entry at `index`. Index 0 is the reserved
    /// empty string.
    #[inline]
    pub(crate) fn string(&self, index: usize) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.block.stringtable.s[index])
    }

    /// A fresh forward iterator over the block's nodes, dense and plain.
    pub fn nodes(&self) -> NodeIter<'_> {
        NodeIter::new(self)
    }

    /// A fresh forward iterator over the block's ways.
    pub fn ways(&self) -> WayIter<'_> {
        WayIter::new(self)
    }

    /// A fresh forward iterator over the block's relations.
    pub fn relations(&self) -> RelationIter<'_> {
        RelationIter::new(self)
    }

    /// Declared node count, dense and plain, summed across every group.
    pub fn node_count(&self) -> usize {
        self.block
            .primitivegroup
            .iter()
            .map(|group| group.dense.as_ref().map_or(0, |dense| dense.id.len()) + group.nodes.len())
            .sum()
    }

    /// Declared way count summed across every group.
    pub fn way_count(&self) -> usize {
        self.block
            .primitivegroup
            .iter()
            .map(|group| group.ways.len())
            .sum()
    }

    /// Declared relation count summed across every group.
    pub fn relation_count(&self) -> usize {
        self.block
            .primitivegroup
            .iter()
            .map(|group| group.relations.len())
            .sum()
    }
}
