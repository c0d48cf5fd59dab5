use alloc::collections::{btree_set, BTreeSet};

use crate::face::FaceToken;

// Ordered set of faces. Ordering by token keeps iteration (and therefore
//  send order) deterministic, which matters for reproducible simulations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceSet {
    inner: BTreeSet<FaceToken>,
}

impl FaceSet {
    pub fn new() -> Self {
        Self {
            inner: BTreeSet::new(),
        }
    }

    // Returns false if the face was already present
    pub fn insert(&mut self, face: FaceToken) -> bool {
        self.inner.insert(face)
    }

    pub fn remove(&mut self, face: FaceToken) -> bool {
        self.inner.remove(&face)
    }

    pub fn contains(&self, face: FaceToken) -> bool {
        self.inner.contains(&face)
    }

    pub fn clear(&mut self) {
        self.inner.clear()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = FaceToken> + '_ {
        self.inner.iter().copied()
    }

    // Faces in self that are not in other
    pub fn difference<'a>(&'a self, other: &'a FaceSet) -> impl Iterator<Item = FaceToken> + 'a {
        self.inner.difference(&other.inner).copied()
    }

    pub fn union<'a>(&'a self, other: &'a FaceSet) -> impl Iterator<Item = FaceToken> + 'a {
        self.inner.union(&other.inner).copied()
    }
}

impl FromIterator<FaceToken> for FaceSet {
    fn from_iter<I: IntoIterator<Item = FaceToken>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl Extend<FaceToken> for FaceSet {
    fn extend<I: IntoIterator<Item = FaceToken>>(&mut self, iter: I) {
        self.inner.extend(iter)
    }
}

impl<'a> IntoIterator for &'a FaceSet {
    type Item = FaceToken;
    type IntoIter = core::iter::Copied<btree_set::Iter<'a, FaceToken>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter().copied()
    }
}
