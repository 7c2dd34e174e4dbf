//! A word-chunked sparse bitset over `u32` keys.
//!
//! Keys are grouped into 64-bit words; only non-zero words are stored, in a
//! hash map keyed by `key >> 6`. Membership is one hash lookup plus a bit
//! test.
//!
//! # Encoding
//!
//! ```text
//! varint        word count
//! repeated word count times:
//!     varint    word index delta   from the previous word (first: from 0)
//!     u64 (LE)  word
//! ```

use std::io::{Read, Write};

use rustc_hash::FxHashMap;

use crate::error::{IndexError, IndexResult};
use crate::varint;

const WORD_BITS: u32 = 64;
const WORD_SHIFT: u32 = 6;
const BIT_MASK: u32 = WORD_BITS - 1;
const MAX_WORD_INDEX: u32 = u32::MAX >> WORD_SHIFT;

/// A set of `u32` keys optimised for a mostly-absent domain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SparseBitSet {
    words: FxHashMap<u32, u64>,
}

impl SparseBitSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn split(key: u32) -> (u32, u64) {
        (key >> WORD_SHIFT, 1u64 << (key & BIT_MASK))
    }

    /// Insert `key`. Returns `true` if it was not already present.
    pub fn insert(&mut self, key: u32) -> bool {
        let (w, bit) = Self::split(key);
        let word = self.words.entry(w).or_insert(0);
        let fresh = *word & bit == 0;
        *word |= bit;
        fresh
    }

    /// Remove `key`. Returns `true` if it was present.
    pub fn remove(&mut self, key: u32) -> bool {
        let (w, bit) = Self::split(key);
        let Some(word) = self.words.get_mut(&w) else {
            return false;
        };
        let present = *word & bit != 0;
        *word &= !bit;
        if *word == 0 {
            self.words.remove(&w);
        }
        present
    }

    #[inline]
    pub fn contains(&self, key: u32) -> bool {
        let (w, bit) = Self::split(key);
        self.words.get(&w).is_some_and(|word| word & bit != 0)
    }

    /// Number of keys in the set.
    pub fn len(&self) -> usize {
        self.words.values().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Number of stored non-zero words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Stored `(word_index, word)` pairs in ascending word order.
    pub fn words_sorted(&self) -> Vec<(u32, u64)> {
        let mut v: Vec<(u32, u64)> = self.words.iter().map(|(&k, &w)| (k, w)).collect();
        v.sort_unstable_by_key(|&(k, _)| k);
        v
    }

    /// OR a whole word into the set. Zero words are ignored.
    pub fn insert_word(&mut self, word_index: u32, word: u64) {
        if word != 0 {
            *self.words.entry(word_index).or_insert(0) |= word;
        }
    }

    /// All keys in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.words_sorted().into_iter().flat_map(|(w, mut word)| {
            std::iter::from_fn(move || {
                if word == 0 {
                    return None;
                }
                let bit = word.trailing_zeros();
                word &= word - 1;
                Some((w << WORD_SHIFT) | bit)
            })
        })
    }

    /// Decode one bitset in the encoding above. `resource` names the
    /// enclosing resource in errors.
    pub fn read_from<R: Read>(r: &mut R, resource: &'static str) -> IndexResult<Self> {
        let word_count = varint::read_u32(r)?;
        if word_count > MAX_WORD_INDEX + 1 {
            return Err(IndexError::corrupt(
                resource,
                format!("invalid word count {word_count}"),
            ));
        }
        let mut set = Self::new();
        let mut index: u64 = 0;
        for _ in 0..word_count {
            index = index
                .checked_add(varint::read_u64(r)?)
                .ok_or_else(|| IndexError::corrupt(resource, "word index overflow"))?;
            let word_index = u32::try_from(index)
                .ok()
                .filter(|&w| w <= MAX_WORD_INDEX)
                .ok_or_else(|| IndexError::corrupt(resource, format!("word index {index}")))?;
            let mut word = [0u8; 8];
            r.read_exact(&mut word)?;
            set.insert_word(word_index, u64::from_le_bytes(word));
        }
        Ok(set)
    }

    /// Encode in the format read by [`read_from`](Self::read_from).
    pub fn write_to<W: Write>(&self, w: &mut W) -> IndexResult<()> {
        let words = self.words_sorted();
        varint::write_u32(w, words.len() as u32)?;
        let mut previous = 0u32;
        for (index, word) in words {
            varint::write_u32(w, index - previous)?;
            previous = index;
            w.write_all(&word.to_le_bytes())?;
        }
        Ok(())
    }
}

impl FromIterator<u32> for SparseBitSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut s = Self::new();
        for k in iter {
            s.insert(k);
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_contains_remove() {
        let mut s = SparseBitSet::new();
        assert!(s.is_empty());
        assert!(s.insert(5));
        assert!(!s.insert(5));
        assert!(s.insert(64));
        assert!(s.insert(u32::MAX));
        assert!(s.contains(5));
        assert!(s.contains(64));
        assert!(s.contains(u32::MAX));
        assert!(!s.contains(6));
        assert_eq!(s.len(), 3);
        assert_eq!(s.word_count(), 3);

        assert!(s.remove(5));
        assert!(!s.remove(5));
        assert!(!s.contains(5));
        assert_eq!(s.word_count(), 2);
    }

    #[test]
    fn iter_is_ascending() {
        let s: SparseBitSet = [900u32, 3, 70, 64, 2].into_iter().collect();
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![2, 3, 64, 70, 900]);
    }

    #[test]
    fn insert_word_merges() {
        let mut s = SparseBitSet::new();
        s.insert(1);
        s.insert_word(0, 0b100);
        s.insert_word(9, 0);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(s.word_count(), 1);
    }

    #[test]
    fn encoding_is_delta_indexed_words() {
        let s: SparseBitSet = [1u32, 130].into_iter().collect();
        let mut out = Vec::new();
        s.write_to(&mut out).unwrap();

        let mut expected = vec![0x02, 0x00];
        expected.extend_from_slice(&0b10u64.to_le_bytes());
        expected.push(0x02);
        expected.extend_from_slice(&0b100u64.to_le_bytes());
        assert_eq!(out, expected);

        let back = SparseBitSet::read_from(&mut out.as_slice(), "test").unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn word_index_past_key_space_is_corrupt() {
        let mut bytes = vec![0x01];
        varint::write_u64(&mut bytes, MAX_WORD_INDEX as u64 + 1).unwrap();
        bytes.extend_from_slice(&1u64.to_le_bytes());
        let err = SparseBitSet::read_from(&mut bytes.as_slice(), "test").unwrap_err();
        assert!(err.is_data_error());
    }
}
