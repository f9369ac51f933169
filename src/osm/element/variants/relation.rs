//! The owned `Relation` and its resolved members.

use super::common::{TagString, Tags};
use crate::error::CodecError;
use crate::osm::element::item::BlockRelation;
use crate::osm::model::relation::MemberType;

/// One materialized relation member.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: i64,
    pub member_type: MemberType,
    pub role: TagString,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub id: i64,
    pub tags: Tags,
    pub members: Vec<Member>,
}

impl Relation {
    pub fn id(&self) -> i64 {
        self.id
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    #[inline]
    pub fn members(&self) -> &[Member] {
        &self.members
    }
}

impl TryFrom<&BlockRelation<'_>> for Relation {
    type Error = CodecError;

    /// Fails on the first member whose type tag is outside the known enum.
    fn try_from(view: &BlockRelation) -> Result<Self, Self::Error> {
        let members = view
            .members()
            .map(|member| {
                member.map(|m| Member {
                    id: m.id,
                    member_type: m.member_type,
                    role: TagString::from(m.role),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Relation {
            id: view.id(),
            tags: Tags::from_views(view.tags()),
            members,
        })
    }
}
