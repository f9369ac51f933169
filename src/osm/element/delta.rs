//! Running sums over delta coded field sequences.

/// Cursor holding the cumulative total of a delta coded sequence. Dense
/// node fields, way refs and relation member ids all decode through one of
/// these.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DeltaCursor(i64);

impl DeltaCursor {
    pub const fn starting_at(base: i64) -> DeltaCursor {
        DeltaCursor(base)
    }

    /// Folds the next delta in, returning the new absolute value.
    #[inline]
    pub fn advance(&mut self, delta: i64) -> i64 {
        self.0 += delta;
        self.0
    }

    #[inline]
    pub fn total(&self) -> i64 {
        self.0
    }
}
