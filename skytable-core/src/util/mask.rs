//! This module implements [Mask], a set of row indices that only
//! materializes a bitmap when it is neither empty nor full.

use std::ops::Range;

use bitvec::vec::BitVec;
use itertools::Either;

/// Set of indices in `0..len`.
///
/// The set is stored in one of three states:
/// no index set (no bitmap, `count == 0`),
/// every index set (no bitmap, `count == len`),
/// or some indices set (bitmap of length `len` with `count` ones).
/// The bitmap is dropped as soon as the set becomes empty or full again,
/// so that the common uniform cases never cost more than O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Mask {
    len: usize,
    count: usize,
    bits: Option<BitVec>,
}

impl Mask {
    /// Create a [Mask] over `len` indices where no index is set.
    pub(crate) fn empty(len: usize) -> Self {
        Self {
            len,
            count: 0,
            bits: None,
        }
    }

    /// Create a [Mask] over `len` indices where every index is set.
    pub(crate) fn full(len: usize) -> Self {
        Self {
            len,
            count: len,
            bits: None,
        }
    }

    /// Create a [Mask] from an explicit bitmap.
    pub(crate) fn from_bits(bits: BitVec) -> Self {
        let mut result = Self {
            len: bits.len(),
            count: bits.count_ones(),
            bits: Some(bits),
        };
        result.normalize();

        result
    }

    /// Number of indices covered by this mask.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of set indices.
    pub(crate) fn count(&self) -> usize {
        self.count
    }

    /// Return `true` if no index is set.
    pub(crate) fn is_clear(&self) -> bool {
        self.count == 0
    }

    /// Return `true` if every index is set.
    pub(crate) fn is_full(&self) -> bool {
        self.count == self.len
    }

    /// Return whether the bitmap is currently materialized.
    #[cfg(test)]
    pub(crate) fn is_materialized(&self) -> bool {
        self.bits.is_some()
    }

    /// If every index holds the same value, return that value.
    ///
    /// An empty mask reports `Some(false)`.
    fn uniform(&self) -> Option<bool> {
        match self.bits {
            Some(_) => None,
            None => Some(self.len > 0 && self.count == self.len),
        }
    }

    /// Return whether the index is set.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub(crate) fn get(&self, index: usize) -> bool {
        assert!(index < self.len, "mask index {index} out of bounds");

        match &self.bits {
            Some(bits) => bits[index],
            None => self.count > 0,
        }
    }

    /// Make sure that the bitmap exists and return it.
    fn materialize(&mut self) -> &mut BitVec {
        let uniform = self.len > 0 && self.count == self.len;
        let len = self.len;

        self.bits.get_or_insert_with(|| BitVec::repeat(uniform, len))
    }

    /// Drop the bitmap if the set became empty or full.
    fn normalize(&mut self) {
        if self.count == 0 || self.count == self.len {
            self.bits = None;
        }
    }

    /// Set or unset a single index.
    pub(crate) fn set(&mut self, index: usize, value: bool) {
        if self.get(index) == value {
            return;
        }

        self.materialize().set(index, value);
        if value {
            self.count += 1;
        } else {
            self.count -= 1;
        }
        self.normalize();
    }

    /// Set or unset every index.
    pub(crate) fn fill(&mut self, value: bool) {
        self.bits = None;
        self.count = if value { self.len } else { 0 };
    }

    /// Set or unset every index in the given range.
    pub(crate) fn fill_range(&mut self, range: Range<usize>, value: bool) {
        debug_assert!(range.end <= self.len);

        if range.is_empty() || self.uniform() == Some(value) {
            return;
        }
        if range.start == 0 && range.end == self.len {
            self.fill(value);
            return;
        }

        let bits = self.materialize();
        bits[range].fill(value);
        let count = bits.count_ones();

        self.count = count;
        self.normalize();
    }

    /// Flip every index.
    pub(crate) fn invert(&mut self) {
        self.count = self.len - self.count;
        if let Some(bits) = self.bits.take() {
            self.bits = Some(!bits);
        }
    }

    /// Insert `amount` indices holding `value` at position `at`.
    pub(crate) fn insert(&mut self, at: usize, amount: usize, value: bool) {
        debug_assert!(at <= self.len);

        if self.len == 0 || self.uniform() == Some(value) {
            self.len += amount;
            if value {
                self.count += amount;
            }
            return;
        }

        let bits = self.materialize();
        let tail = bits.split_off(at);
        bits.extend(std::iter::repeat(value).take(amount));
        bits.extend_from_bitslice(&tail);

        self.len += amount;
        if value {
            self.count += amount;
        }
        self.normalize();
    }

    /// Insert the content of another mask at position `at`.
    pub(crate) fn insert_mask(&mut self, at: usize, other: &Mask) {
        if let Some(value) = other.uniform() {
            self.insert(at, other.len, value);
            return;
        }

        let bits = self.materialize();
        let tail = bits.split_off(at);
        bits.extend(other.iter());
        bits.extend_from_bitslice(&tail);

        self.len += other.len;
        self.count += other.count;
        self.normalize();
    }

    /// Remove `amount` indices starting at position `at`.
    pub(crate) fn remove(&mut self, at: usize, amount: usize) {
        debug_assert!(at + amount <= self.len);

        match self.bits.as_mut() {
            None => {
                let full = self.is_full();
                self.len -= amount;
                self.count = if full { self.len } else { 0 };
            }
            Some(bits) => {
                let tail = bits.split_off(at + amount);
                bits.truncate(at);
                bits.extend_from_bitslice(&tail);

                let (len, count) = (bits.len(), bits.count_ones());

                self.len = len;
                self.count = count;
                self.normalize();
            }
        }
    }

    /// Change the number of indices, new indices hold `value`.
    pub(crate) fn resize(&mut self, len: usize, value: bool) {
        if len >= self.len {
            self.insert(self.len, len - self.len, value);
        } else {
            self.remove(len, self.len - len);
        }
    }

    /// Return a new mask with the content of the given range.
    pub(crate) fn extract(&self, range: Range<usize>) -> Mask {
        match &self.bits {
            None if self.is_full() => Mask::full(range.len()),
            None => Mask::empty(range.len()),
            Some(bits) => Mask::from_bits(bits[range].to_bitvec()),
        }
    }

    /// Return a new mask such that index `i` holds the value
    /// that `indices[i]` holds in this mask.
    pub(crate) fn gather(&self, indices: &[usize]) -> Mask {
        match &self.bits {
            None if self.is_full() && self.len > 0 => Mask::full(indices.len()),
            None => Mask::empty(indices.len()),
            Some(bits) => Mask::from_bits(indices.iter().map(|&index| bits[index]).collect()),
        }
    }

    /// Reorder the mask such that index `i` receives the value of index `order[i]`.
    pub(crate) fn permute(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.len);

        if let Some(bits) = &self.bits {
            let permuted: BitVec = order.iter().map(|&index| bits[index]).collect();
            self.bits = Some(permuted);
        }
    }

    /// Unset every set index for which `keep` returns `false`.
    ///
    /// `keep` is only evaluated on set indices.
    pub(crate) fn retain<F: FnMut(usize) -> bool>(&mut self, mut keep: F) {
        if self.count == 0 {
            return;
        }

        let len = self.len;
        let bits = self.materialize();
        let mut count = 0;
        for index in 0..len {
            if bits[index] {
                if keep(index) {
                    count += 1;
                } else {
                    bits.set(index, false);
                }
            }
        }

        self.count = count;
        self.normalize();
    }

    /// Set every unset index for which `add` returns `true`.
    ///
    /// `add` is only evaluated on unset indices.
    pub(crate) fn extend_where<F: FnMut(usize) -> bool>(&mut self, mut add: F) {
        if self.count == self.len {
            return;
        }

        let len = self.len;
        let bits = self.materialize();
        let mut added = 0;
        for index in 0..len {
            if !bits[index] && add(index) {
                bits.set(index, true);
                added += 1;
            }
        }

        self.count += added;
        self.normalize();
    }

    /// Iterate over the value of every index.
    pub(crate) fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |index| match &self.bits {
            Some(bits) => bits[index],
            None => self.count > 0,
        })
    }

    /// Iterate over all set indices in ascending order.
    pub(crate) fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        match &self.bits {
            Some(bits) => Either::Right(bits.iter_ones()),
            None if self.count > 0 => Either::Left(0..self.len),
            None => Either::Left(0..0),
        }
    }

    /// Iterate over all unset indices in ascending order.
    pub(crate) fn zeros(&self) -> impl Iterator<Item = usize> + '_ {
        match &self.bits {
            Some(bits) => Either::Right(bits.iter_zeros()),
            None if self.count == 0 => Either::Left(0..self.len),
            None => Either::Left(0..0),
        }
    }
}
