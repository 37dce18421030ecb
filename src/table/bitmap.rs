//! Bit-packed presence bitmap (1 bit per logical row)
//!
//! A set bit means the owning column holds a value at that row. Bits past
//! `len` in the last word are always zero, so word-level AND/OR and
//! popcounts never see stray rows.

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Bitmap {
    /// Each u64 holds 64 presence bits (LSB = row 0 of the word)
    bits: Vec<u64>,
    /// Number of logical rows (not words)
    len: usize,
}

#[inline]
fn words_for(len: usize) -> usize {
    (len + 63) / 64
}

impl Bitmap {
    /// Create bitmap with every row present
    pub fn new_all_present(len: usize) -> Self {
        let words = words_for(len);
        let mut bits = vec![!0u64; words];

        // Mask off unused bits in last word
        let rem = len % 64;
        if rem != 0 {
            bits[words - 1] = (1u64 << rem) - 1;
        }

        Self { bits, len }
    }

    /// Create bitmap with every row absent
    pub fn new_all_absent(len: usize) -> Self {
        Self {
            bits: vec![0u64; words_for(len)],
            len,
        }
    }

    /// Build from an 8-bit flag sequence (non-zero = present)
    pub fn from_flags(flags: &[u8]) -> Self {
        let mut bm = Self::new_all_absent(flags.len());
        for (i, &f) in flags.iter().enumerate() {
            if f != 0 {
                bm.bits[i >> 6] |= 1u64 << (i & 63);
            }
        }
        bm
    }

    /// Expand back to one byte per row (1 = present)
    pub fn to_flags(&self) -> Vec<u8> {
        (0..self.len).map(|i| self.get(i) as u8).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get presence bit at row i
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        let w = i >> 6; // word index (i / 64)
        let b = i & 63; // bit index (i % 64)
        (self.bits[w] >> b) & 1 == 1
    }

    /// Set presence bit at row i
    #[inline]
    pub fn set(&mut self, i: usize, v: bool) {
        debug_assert!(i < self.len);
        let w = i >> 6;
        let b = i & 63;
        let mask = 1u64 << b;
        if v {
            self.bits[w] |= mask;
        } else {
            self.bits[w] &= !mask;
        }
    }

    /// Get raw word at word index (for word-wise scans)
    #[inline]
    pub fn word(&self, w: usize) -> u64 {
        self.bits[w]
    }

    /// Number of u64 words
    #[inline]
    pub fn words_len(&self) -> usize {
        self.bits.len()
    }

    /// Number of present rows
    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Bitwise AND of two bitmaps of equal length
    pub fn and(&self, other: &Bitmap) -> Bitmap {
        assert_eq!(self.len, other.len);
        Bitmap {
            bits: self
                .bits
                .iter()
                .zip(&other.bits)
                .map(|(a, b)| a & b)
                .collect(),
            len: self.len,
        }
    }

    /// Bitwise OR of two bitmaps of equal length
    pub fn or(&self, other: &Bitmap) -> Bitmap {
        assert_eq!(self.len, other.len);
        Bitmap {
            bits: self
                .bits
                .iter()
                .zip(&other.bits)
                .map(|(a, b)| a | b)
                .collect(),
            len: self.len,
        }
    }

    /// Present row indices in ascending order
    pub fn iter_ones(&self) -> Ones<'_> {
        Ones {
            bits: &self.bits,
            word_idx: 0,
            current: self.bits.first().copied().unwrap_or(0),
        }
    }

    /// Precompute cumulative popcounts so `rank` is O(1)
    pub fn rank_index(&self) -> RankIndex<'_> {
        let mut before = Vec::with_capacity(self.bits.len());
        let mut acc = 0usize;
        for w in &self.bits {
            before.push(acc);
            acc += w.count_ones() as usize;
        }
        RankIndex {
            bitmap: self,
            before,
        }
    }
}

/// Iterator over set positions, one word at a time
pub struct Ones<'a> {
    bits: &'a [u64],
    word_idx: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let b = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_idx * 64 + b);
            }
            self.word_idx += 1;
            self.current = *self.bits.get(self.word_idx)?;
        }
    }
}

/// Prefix count of present rows, built once per bitmap
///
/// `rank(i)` counts set bits strictly before row `i`; for a present row that
/// is exactly its offset into the column's dense buffer.
pub struct RankIndex<'a> {
    bitmap: &'a Bitmap,
    before: Vec<usize>,
}

impl RankIndex<'_> {
    #[inline]
    pub fn rank(&self, i: usize) -> usize {
        let w = i >> 6;
        let below = (1u64 << (i & 63)) - 1;
        self.before[w] + (self.bitmap.bits[w] & below).count_ones() as usize
    }

    /// Dense offset of row `i`, or None when the row is absent
    #[inline]
    pub fn dense_offset(&self, i: usize) -> Option<usize> {
        if self.bitmap.get(i) {
            Some(self.rank(i))
        } else {
            None
        }
    }
}
