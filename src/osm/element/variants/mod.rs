//! Owned entity values, materialized out of the block views

pub mod node;
pub mod relation;
pub mod way;

pub use node::Node;
pub use relation::{Member, Relation};
pub use way::Way;

pub mod common {
    use std::borrow::Cow;
    use std::collections::HashMap;
    use std::ops::Deref;
    use std::str::FromStr;

    use crate::osm::element::item::BlockTag;

    /// An owned tag key, value or role string recovered from a block's
    /// string table.
    #[derive(Clone, Debug, PartialEq, PartialOrd, Eq, Hash)]
    pub struct TagString(String);

    impl Deref for TagString {
        type Target = String;

        fn deref(&self) -> &Self::Target {
            &self.0
        }
    }

    impl From<String> for TagString {
        fn from(s: String) -> Self {
            TagString(s)
        }
    }

    impl From<&str> for TagString {
        fn from(s: &str) -> Self {
            TagString(s.to_string())
        }
    }

    impl From<Cow<'_, str>> for TagString {
        fn from(s: Cow<'_, str>) -> Self {
            TagString(s.into_owned())
        }
    }

    impl TagString {
        pub fn parse<F: FromStr>(&self) -> Option<F> {
            FromStr::from_str(self.as_str()).ok()
        }
    }

    /// Associative tag collection, deduplicated by key.
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Tags(HashMap<TagString, TagString>);

    impl Tags {
        pub fn new(map: HashMap<TagString, TagString>) -> Self {
            Tags(map)
        }

        /// Collects resolved `(key, value)` pairs out of a view's tag
        /// iterator, copying every string. A key appearing twice keeps its
        /// last value.
        pub fn from_views<'a>(iter: impl Iterator<Item = BlockTag<'a>>) -> Self {
            Tags(
                iter.map(|(k, v)| (TagString::from(k), TagString::from(v)))
                    .collect::<HashMap<TagString, TagString>>(),
            )
        }

        fn r#use(assoc: &str) -> TagString {
            TagString::from(assoc)
        }

        pub fn get(&self, assoc: &str) -> Option<&TagString> {
            self.0.get(&Tags::r#use(assoc))
        }

        pub fn r#as<F: FromStr>(&self, assoc: &str) -> Option<F> {
            self.get(assoc).and_then(TagString::parse::<F>)
        }

        /// True when `assoc` is present with exactly `value`.
        #[inline]
        pub fn matches(&self, assoc: &str, value: &str) -> bool {
            self.get(assoc).is_some_and(|v| v.as_str() == value)
        }
    }

    impl Deref for Tags {
        type Target = HashMap<TagString, TagString>;

        fn deref(&self) -> &Self::Target {
            &self.0
        }
    }
}

pub use common::*;
