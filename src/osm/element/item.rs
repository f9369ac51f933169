//! The lazy entity views: non-owning windows into one `PbfBlock`, resolved
//! field by field on access. Cheap to construct and to copy; their lifetime
//! is bounded by the block they borrow.

use either::Either;
use std::borrow::Cow;

use crate::error::CodecError;
use crate::osm::block::item::PbfBlock;
use crate::osm::element::coords::Coords;
use crate::osm::element::delta::DeltaCursor;
use crate::osm::model;
use crate::osm::model::relation::MemberType;

/// A resolved `(key, value)` tag pair borrowed from the block's string
/// table.
pub type BlockTag<'a> = (Cow<'a, str>, Cow<'a, str>);

/// One node of a decoded block, in either encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockNode<'a> {
    pub(crate) block: &'a PbfBlock,
    pub(crate) repr: NodeRepr<'a>,
}

/// Which encoding the node came from. Decided once at view construction,
/// never re-checked per accessor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NodeRepr<'a> {
    Plain(&'a model::Node),
    Dense {
        dense: &'a model::DenseNodes,
        /// Offset of this node's tag run within the flattened `keys_vals`.
        offset: usize,
        /// Running totals, deltas summed from the start of the sequence up
        /// to and including this node.
        id: i64,
        lat: i64,
        lon: i64,
    },
}

impl<'a> BlockNode<'a> {
    #[inline]
    pub(crate) fn plain(block: &'a PbfBlock, node: &'a model::Node) -> BlockNode<'a> {
        BlockNode {
            block,
            repr: NodeRepr::Plain(node),
        }
    }

    #[inline]
    pub(crate) fn dense(
        block: &'a PbfBlock,
        dense: &'a model::DenseNodes,
        offset: usize,
        id: i64,
        lat: i64,
        lon: i64,
    ) -> BlockNode<'a> {
        BlockNode {
            block,
            repr: NodeRepr::Dense {
                dense,
                offset,
                id,
                lat,
                lon,
            },
        }
    }

    /// Returns the identifier for the node.
    pub fn id(&self) -> i64 {
        match self.repr {
            NodeRepr::Plain(node) => node.id,
            NodeRepr::Dense { id, .. } => id,
        }
    }

    /// Number of tags on this node. A dense tag run terminates at the
    /// first 0 sentinel; the end of `keys_vals` is an implicit terminator.
    pub fn tag_count(&self) -> usize {
        match self.repr {
            NodeRepr::Plain(node) => node.keys.len(),
            NodeRepr::Dense { dense, offset, .. } => {
                let keys_vals = &dense.keys_vals;

                let mut count = 0;
                let mut at = offset;
                while at + 1 < keys_vals.len() && keys_vals[at] != 0 {
                    count += 1;
                    at += 2;
                }

                count
            }
        }
    }

    /// The `i`th tag, resolved through the block's string table. `i` must
    /// be below [`BlockNode::tag_count`].
    pub fn tag(&self, i: usize) -> BlockTag<'a> {
        match self.repr {
            NodeRepr::Plain(node) => (
                self.block.string(node.keys[i] as usize),
                self.block.string(node.vals[i] as usize),
            ),
            NodeRepr::Dense { dense, offset, .. } => (
                self.block
                    .string(dense.keys_vals[offset + 2 * i] as usize),
                self.block
                    .string(dense.keys_vals[offset + 2 * i + 1] as usize),
            ),
        }
    }

    /// All tags of this node, in encoding order.
    pub fn tags(self) -> impl Iterator<Item = BlockTag<'a>> + 'a {
        let block = self.block;
        match self.repr {
            NodeRepr::Plain(node) => Either::Left(
                node.keys
                    .iter()
                    .zip(node.vals.iter())
                    .map(move |(&k, &v)| (block.string(k as usize), block.string(v as usize))),
            ),
            NodeRepr::Dense { .. } => {
                Either::Right((0..self.tag_count()).map(move |i| self.tag(i)))
            }
        }
    }

    /// Position in degrees, converted through the block's granularity.
    pub fn coords(&self) -> Coords {
        match self.repr {
            NodeRepr::Plain(node) => {
                Coords::from_scaled(node.lat, node.lon, self.block.granularity())
            }
            NodeRepr::Dense { lat, lon, .. } => {
                Coords::from_scaled(lat, lon, self.block.granularity())
            }
        }
    }
}

/// One way of a decoded block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockWay<'a> {
    pub(crate) block: &'a PbfBlock,
    pub(crate) way: &'a model::Way,
}

impl<'a> BlockWay<'a> {
    pub fn id(&self) -> i64 {
        self.way.id
    }

    pub fn tag_count(&self) -> usize {
        self.way.keys.len()
    }

    /// The `i`th tag, resolved through the block's string table.
    pub fn tag(&self, i: usize) -> BlockTag<'a> {
        (
            self.block.string(self.way.keys[i] as usize),
            self.block.string(self.way.vals[i] as usize),
        )
    }

    /// All tags of this way, in encoding order.
    pub fn tags(self) -> impl Iterator<Item = BlockTag<'a>> + 'a {
        let block = self.block;
        self.way
            .keys
            .iter()
            .zip(self.way.vals.iter())
            .map(move |(&k, &v)| (block.string(k as usize), block.string(v as usize)))
    }

    pub fn node_count(&self) -> usize {
        self.way.refs.len()
    }

    /// Absolute id of the `i`th referenced node. Recomputes the running sum
    /// from the front on every call, which suits single forward passes;
    /// sequential callers should prefer [`BlockWay::node_refs`], and
    /// random-access callers should materialize a [`crate::Way`].
    pub fn node_ref(&self, i: usize) -> i64 {
        let mut cursor = DeltaCursor::default();
        for &delta in &self.way.refs[..=i] {
            cursor.advance(delta);
        }

        cursor.total()
    }

    /// Absolute referenced node ids in order, one forward pass.
    pub fn node_refs(self) -> impl Iterator<Item = i64> + 'a {
        self.way
            .refs
            .iter()
            .scan(DeltaCursor::default(), |cursor, &delta| {
                Some(cursor.advance(delta))
            })
    }
}

/// One relation member, resolved: absolute id, member type, and role.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMember<'a> {
    pub id: i64,
    pub member_type: MemberType,
    pub role: Cow<'a, str>,
}

/// One relation of a decoded block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockRelation<'a> {
    pub(crate) block: &'a PbfBlock,
    pub(crate) relation: &'a model::Relation,
}

impl<'a> BlockRelation<'a> {
    pub fn id(&self) -> i64 {
        self.relation.id
    }

    pub fn tag_count(&self) -> usize {
        self.relation.keys.len()
    }

    /// The `i`th tag, resolved through the block's string table.
    pub fn tag(&self, i: usize) -> BlockTag<'a> {
        (
            self.block.string(self.relation.keys[i] as usize),
            self.block.string(self.relation.vals[i] as usize),
        )
    }

    /// All tags of this relation, in encoding order.
    pub fn tags(self) -> impl Iterator<Item = BlockTag<'a>> + 'a {
        let block = self.block;
        self.relation
            .keys
            .iter()
            .zip(self.relation.vals.iter())
            .map(move |(&k, &v)| (block.string(k as usize), block.string(v as usize)))
    }

    pub fn member_count(&self) -> usize {
        self.relation.memids.len()
    }

    /// Resolves the `i`th member, under the same prefix-sum policy as
    /// [`BlockWay::node_ref`]. A type tag outside the known enum is an
    /// error, never a substituted default.
    pub fn member(&self, i: usize) -> Result<BlockMember<'a>, CodecError> {
        let mut cursor = DeltaCursor::default();
        for &delta in &self.relation.memids[..=i] {
            cursor.advance(delta);
        }

        self.member_at(i, cursor.total())
    }

    /// Resolved members in order, one forward pass over the id deltas.
    pub fn members(self) -> impl Iterator<Item = Result<BlockMember<'a>, CodecError>> + 'a {
        self.relation
            .memids
            .iter()
            .enumerate()
            .scan(DeltaCursor::default(), move |cursor, (i, &delta)| {
                Some(self.member_at(i, cursor.advance(delta)))
            })
    }

    fn member_at(&self, i: usize, id: i64) -> Result<BlockMember<'a>, CodecError> {
        let raw = self.relation.types[i];
        let member_type =
            MemberType::try_from(raw).map_err(|_| CodecError::UnknownMemberType(raw))?;

        Ok(BlockMember {
            id,
            member_type,
            role: self.block.string(self.relation.roles_sid[i] as usize),
        })
    }
}
