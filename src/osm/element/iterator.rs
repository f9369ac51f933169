//! Forward iterators over one block's entities. Positional state walks the
//! group list, crossing node encoding-mode boundaries and skipping empty
//! groups; each dereference builds a fresh, cheap view.

use crate::osm::block::item::PbfBlock;
use crate::osm::element::delta::DeltaCursor;
use crate::osm::element::item::{BlockNode, BlockRelation, BlockWay};
use crate::osm::model;

/// Node encoding mode within the current group. Dense nodes are walked
/// before plain records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeMode {
    Dense,
    Plain,
}

/// Single-pass iterator over every node in a block, dense and plain.
///
/// Invalidated, like the views it yields, by the next read into the block;
/// the borrow checker enforces this.
#[derive(Debug, Clone)]
pub struct NodeIter<'a> {
    block: &'a PbfBlock,
    group: usize,
    mode: NodeMode,
    index: usize,
    /// Tag-run offset of the current dense node within `keys_vals`.
    kv_offset: usize,
    id: DeltaCursor,
    lat: DeltaCursor,
    lon: DeltaCursor,
    end: bool,
}

impl<'a> NodeIter<'a> {
    pub(crate) fn new(block: &'a PbfBlock) -> NodeIter<'a> {
        let mut iter = NodeIter {
            block,
            group: 0,
            mode: NodeMode::Dense,
            index: 0,
            kv_offset: 0,
            id: DeltaCursor::default(),
            lat: DeltaCursor::default(),
            lon: DeltaCursor::default(),
            end: false,
        };

        iter.enter_group();
        iter
    }

    #[inline]
    fn groups(&self) -> &'a [model::PrimitiveGroup] {
        &self.block.block.primitivegroup
    }

    /// Settles on the first populated mode of the current group, walking
    /// forward past empty groups. The dense running totals carry the block
    /// offsets at their base.
    fn enter_group(&mut self) {
        loop {
            let Some(group) = self.groups().get(self.group) else {
                self.end = true;
                return;
            };

            if let Some(dense) = group.dense.as_ref().filter(|dense| !dense.id.is_empty()) {
                self.mode = NodeMode::Dense;
                self.index = 0;
                self.kv_offset = 0;
                self.id = DeltaCursor::starting_at(dense.id[0]);
                self.lat = DeltaCursor::starting_at(
                    self.block.lat_offset() + dense.lat.first().copied().unwrap_or(0),
                );
                self.lon = DeltaCursor::starting_at(
                    self.block.lon_offset() + dense.lon.first().copied().unwrap_or(0),
                );
                return;
            }

            if !group.nodes.is_empty() {
                self.mode = NodeMode::Plain;
                self.index = 0;
                return;
            }

            self.group += 1;
        }
    }

    /// One step forward. Exhausting the dense sequence falls through to the
    /// same group's plain records; exhausting those moves to the next
    /// group.
    fn advance(&mut self) {
        if self.end {
            return;
        }

        let Some(group) = self.groups().get(self.group) else {
            self.end = true;
            return;
        };

        match self.mode {
            NodeMode::Dense => {
                let Some(dense) = group.dense.as_ref() else {
                    self.end = true;
                    return;
                };

                self.skip_tag_run(dense);
                self.index += 1;

                if self.index < dense.id.len() {
                    self.id.advance(dense.id[self.index]);
                    self.lat
                        .advance(dense.lat.get(self.index).copied().unwrap_or(0));
                    self.lon
                        .advance(dense.lon.get(self.index).copied().unwrap_or(0));
                } else if !group.nodes.is_empty() {
                    self.mode = NodeMode::Plain;
                    self.index = 0;
                } else {
                    self.group += 1;
                    self.enter_group();
                }
            }
            NodeMode::Plain => {
                self.index += 1;
                if self.index >= group.nodes.len() {
                    self.group += 1;
                    self.enter_group();
                }
            }
        }
    }

    /// Moves the tag cursor past the current node's run and its 0 sentinel.
    /// The end of the array is an implicit terminator.
    fn skip_tag_run(&mut self, dense: &model::DenseNodes) {
        let keys_vals = &dense.keys_vals;

        while self.kv_offset < keys_vals.len() && keys_vals[self.kv_offset] != 0 {
            self.kv_offset += 2;
        }

        if self.kv_offset < keys_vals.len() {
            self.kv_offset += 1;
        }
    }

    fn current(&self) -> Option<BlockNode<'a>> {
        if self.end {
            return None;
        }

        let group = self.groups().get(self.group)?;
        match self.mode {
            NodeMode::Dense => Some(BlockNode::dense(
                self.block,
                group.dense.as_ref()?,
                self.kv_offset,
                self.id.total(),
                self.lat.total(),
                self.lon.total(),
            )),
            NodeMode::Plain => Some(BlockNode::plain(self.block, group.nodes.get(self.index)?)),
        }
    }
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = BlockNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.current()?;
        self.advance();
        Some(item)
    }
}

/// Positional equality: two iterators at end are equal regardless of how
/// they got there; anywhere else every positional field must match.
impl PartialEq for NodeIter<'_> {
    fn eq(&self, other: &Self) -> bool {
        if self.end && other.end {
            return true;
        }

        self.end == other.end
            && self.group == other.group
            && self.mode == other.mode
            && self.index == other.index
            && self.kv_offset == other.kv_offset
            && self.id == other.id
            && self.lat == other.lat
            && self.lon == other.lon
    }
}

/// Single-pass iterator over every way in a block.
#[derive(Debug, Clone)]
pub struct WayIter<'a> {
    block: &'a PbfBlock,
    group: usize,
    index: usize,
    end: bool,
}

impl<'a> WayIter<'a> {
    pub(crate) fn new(block: &'a PbfBlock) -> WayIter<'a> {
        let mut iter = WayIter {
            block,
            group: 0,
            index: 0,
            end: false,
        };

        iter.settle();
        iter
    }

    /// Walks forward until the position lands on a way or the groups run
    /// out.
    fn settle(&mut self) {
        loop {
            match self.block.block.primitivegroup.get(self.group) {
                None => {
                    self.end = true;
                    return;
                }
                Some(group) if self.index < group.ways.len() => return,
                Some(_) => {
                    self.group += 1;
                    self.index = 0;
                }
            }
        }
    }

    fn advance(&mut self) {
        if self.end {
            return;
        }

        self.index += 1;
        self.settle();
    }

    fn current(&self) -> Option<BlockWay<'a>> {
        if self.end {
            return None;
        }

        let group = self.block.block.primitivegroup.get(self.group)?;
        Some(BlockWay {
            block: self.block,
            way: group.ways.get(self.index)?,
        })
    }
}

impl<'a> Iterator for WayIter<'a> {
    type Item = BlockWay<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.current()?;
        self.advance();
        Some(item)
    }
}

impl PartialEq for WayIter<'_> {
    fn eq(&self, other: &Self) -> bool {
        (self.end && other.end)
            || (self.end == other.end && self.group == other.group && self.index == other.index)
    }
}

/// Single-pass iterator over every relation in a block.
#[derive(Debug, Clone)]
pub struct RelationIter<'a> {
    block: &'a PbfBlock,
    group: usize,
    index: usize,
    end: bool,
}

impl<'a> RelationIter<'a> {
    pub(crate) fn new(block: &'a PbfBlock) -> RelationIter<'a> {
        let mut iter = RelationIter {
            block,
            group: 0,
            index: 0,
            end: false,
        };

        iter.settle();
        iter
    }

    fn settle(&mut self) {
        loop {
            match self.block.block.primitivegroup.get(self.group) {
                None => {
                    self.end = true;
                    return;
                }
                Some(group) if self.index < group.relations.len() => return,
                Some(_) => {
                    self.group += 1;
                    self.index = 0;
                }
            }
        }
    }

    fn advance(&mut self) {
        if self.end {
            return;
        }

        self.index += 1;
        self.settle();
    }

    fn current(&self) -> Option<BlockRelation<'a>> {
        if self.end {
            return None;
        }

        let group = self.block.block.primitivegroup.get(self.group)?;
        Some(BlockRelation {
            block: self.block,
            relation: group.relations.get(self.index)?,
        })
    }
}

impl<'a> Iterator for RelationIter<'a> {
    type Item = BlockRelation<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.current()?;
        self.advance();
        Some(item)
    }
}

impl PartialEq for RelationIter<'_> {
    fn eq(&self, other: &Self) -> bool {
        (self.end && other.end)
            || (self.end == other.end && self.group == other.group && self.index == other.index)
    }
}
