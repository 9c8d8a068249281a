//! Tracking of which composite children need match data unpacked on a hit.

use itertools::Itertools;
use tinyvec::ArrayVec;

const MAX_TRACKED: usize = 31;

/// A small sorted set of child indices, or the "all children" state.
///
/// Up to [`UnpackInfo::MAX_SIZE`] indices no larger than [`UnpackInfo::MAX_INDEX`]
/// are tracked explicitly; anything beyond that degrades to "all". Once forced to
/// all, the info stays forced regardless of later inserts and removals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnpackInfo {
    indices: ArrayVec<[u8; MAX_TRACKED]>,
    all: bool,
}

impl UnpackInfo {
    pub const MAX_SIZE: usize = MAX_TRACKED;
    pub const MAX_INDEX: usize = u8::MAX as usize;

    /// An info with no child selected.
    pub fn new() -> UnpackInfo {
        UnpackInfo::default()
    }

    /// An info selecting every child, including children added later.
    pub fn full() -> UnpackInfo {
        UnpackInfo {
            indices: ArrayVec::new(),
            all: true,
        }
    }

    /// Marks `index` as needing unpack.
    pub fn add(&mut self, index: usize) -> &mut Self {
        if self.all {
            return self;
        }
        if index > Self::MAX_INDEX {
            return self.force_all();
        }
        let value = index as u8;
        match self.indices.binary_search(&value) {
            Ok(_) => {}
            Err(_) if self.indices.len() == Self::MAX_SIZE => {
                self.force_all();
            }
            Err(pos) => self.indices.insert(pos, value),
        }
        self
    }

    /// Accounts for a child inserted at `index`: every tracked index at or after it
    /// moves up by one. The new child is tracked when `unpack` is set.
    pub fn insert(&mut self, index: usize, unpack: bool) -> &mut Self {
        if self.all {
            return self;
        }
        for value in self.indices.iter_mut() {
            if *value as usize >= index {
                if *value as usize == Self::MAX_INDEX {
                    return self.force_all();
                }
                *value += 1;
            }
        }
        if unpack {
            self.add(index);
        }
        self
    }

    /// Accounts for the child at `index` being removed: the index is dropped and
    /// every tracked index after it moves down by one.
    pub fn remove(&mut self, index: usize) -> &mut Self {
        if self.all {
            return self;
        }
        self.indices.retain(|value| *value as usize != index);
        for value in self.indices.iter_mut() {
            if *value as usize > index {
                *value -= 1;
            }
        }
        self
    }

    pub fn force_all(&mut self) -> &mut Self {
        self.all = true;
        self.indices.clear();
        self
    }

    #[inline]
    pub fn unpack_all(&self) -> bool {
        self.all
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.all && self.indices.is_empty()
    }

    #[inline]
    pub fn need_unpack(&self, index: usize) -> bool {
        self.all
            || (index <= Self::MAX_INDEX && self.indices.binary_search(&(index as u8)).is_ok())
    }

    /// Calls `f` for every selected index below `child_count`, in ascending order.
    pub fn each(&self, mut f: impl FnMut(usize), child_count: usize) {
        if self.all {
            (0..child_count).for_each(f);
        } else {
            self.indices
                .iter()
                .map(|&value| value as usize)
                .take_while(|&index| index < child_count)
                .for_each(&mut f);
        }
    }

    /// The explicitly tracked indices; empty when forced to all.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().map(|&value| value as usize)
    }
}

impl std::fmt::Display for UnpackInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.all {
            f.write_str("full")
        } else {
            write!(f, "[{}]", self.indices().join(","))
        }
    }
}
