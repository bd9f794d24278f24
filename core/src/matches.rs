use alloc::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Positions belonging to at least one run, deduplicated and in row-major order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSet(BTreeSet<Coord2>);

impl MatchSet {
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.0.contains(&coords)
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.0.iter().copied()
    }
}

impl Extend<Coord2> for MatchSet {
    fn extend<I: IntoIterator<Item = Coord2>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<Coord2> for MatchSet {
    fn from_iter<I: IntoIterator<Item = Coord2>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = Coord2;
    type IntoIter = core::iter::Copied<alloc::collections::btree_set::Iter<'a, Coord2>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}
