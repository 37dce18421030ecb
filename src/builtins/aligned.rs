//! Aligned scans over two sparse columns sharing a row domain
//!
//! Both kernels walk the presence bitmaps one u64 word at a time and keep an
//! independent dense cursor per side:
//! - word with no present rows on either side: skipped, cursors untouched
//! - otherwise: only set bits are visited; each side's dense offset is its
//!   cursor plus the popcount of its bits below the current row
//!
//! `aligned_scan` emits where both sides are present (presence = AND);
//! `aligned_union` emits where either side is present (presence = OR).

use crate::error::Result;
use crate::table::SparseColumn;

/// Which side wins when both sides hold a value at the same row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Conflict {
    PreferLeft,
    #[default]
    PreferRight,
}

/// Apply `f` to every row present on both sides.
///
/// Output presence is `left.presence AND right.presence`; the dense output
/// holds one value per such row, in row order. Fails on mismatched domains
/// or on the first error returned by `f`.
pub fn aligned_scan<L, R, O, F>(
    left: &SparseColumn<L>,
    right: &SparseColumn<R>,
    mut f: F,
) -> Result<SparseColumn<O>>
where
    F: FnMut(&L, &R) -> Result<O>,
{
    left.domain().ensure_same(right.domain())?;

    let lp = left.presence();
    let rp = right.presence();
    let presence = lp.and(rp);

    let lv = left.values();
    let rv = right.values();
    let mut out = Vec::with_capacity(presence.count_ones());

    let mut left_cursor = 0usize;
    let mut right_cursor = 0usize;

    for w in 0..lp.words_len() {
        let lw = lp.word(w);
        let rw = rp.word(w);

        let mut both = lw & rw;
        while both != 0 {
            let below = (1u64 << both.trailing_zeros()) - 1;
            let li = left_cursor + (lw & below).count_ones() as usize;
            let ri = right_cursor + (rw & below).count_ones() as usize;
            out.push(f(&lv[li], &rv[ri])?);
            both &= both - 1;
        }

        // Rows present on one side only still consume that side's cursor
        left_cursor += lw.count_ones() as usize;
        right_cursor += rw.count_ones() as usize;
    }

    Ok(SparseColumn::from_parts(out, presence))
}

/// Interleave two columns: a row is present when either side is.
///
/// Where both sides are present, `conflict` picks the surviving value.
pub fn aligned_union<T: Clone>(
    left: &SparseColumn<T>,
    right: &SparseColumn<T>,
    conflict: Conflict,
) -> Result<SparseColumn<T>> {
    left.domain().ensure_same(right.domain())?;

    let lp = left.presence();
    let rp = right.presence();
    let presence = lp.or(rp);

    let lv = left.values();
    let rv = right.values();
    let mut out = Vec::with_capacity(presence.count_ones());

    let mut left_cursor = 0usize;
    let mut right_cursor = 0usize;

    for w in 0..lp.words_len() {
        let lw = lp.word(w);
        let rw = rp.word(w);

        let mut any = lw | rw;
        while any != 0 {
            let bit = 1u64 << any.trailing_zeros();
            let below = bit - 1;
            let take_left = match (lw & bit != 0, rw & bit != 0) {
                (true, true) => conflict == Conflict::PreferLeft,
                (in_left, _) => in_left,
            };
            if take_left {
                out.push(lv[left_cursor + (lw & below).count_ones() as usize].clone());
            } else {
                out.push(rv[right_cursor + (rw & below).count_ones() as usize].clone());
            }
            any &= any - 1;
        }

        left_cursor += lw.count_ones() as usize;
        right_cursor += rw.count_ones() as usize;
    }

    Ok(SparseColumn::from_parts(out, presence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, TableError};
    use crate::table::Bitmap;

    fn col(flags: &[u8], values: Vec<i64>) -> SparseColumn<i64> {
        SparseColumn::new(values, Bitmap::from_flags(flags)).unwrap()
    }

    /// Row-at-a-time reference: one cursor per side, advanced by its own presence
    fn scan_rowwise(left: &SparseColumn<i64>, right: &SparseColumn<i64>) -> Vec<(i64, i64)> {
        let (mut cl, mut cr) = (0, 0);
        let mut out = Vec::new();
        for i in 0..left.len() {
            let (pl, pr) = (left.presence().get(i), right.presence().get(i));
            if pl && pr {
                out.push((left.values()[cl], right.values()[cr]));
            }
            cl += pl as usize;
            cr += pr as usize;
        }
        out
    }

    #[test]
    fn test_scan_small() {
        let left = col(&[1, 1, 0, 1], vec![10, 20, 40]);
        let right = col(&[1, 0, 1, 1], vec![5, 7, 8]);

        let out = aligned_scan(&left, &right, |a, b| Ok(a + b)).unwrap();

        assert_eq!(out.presence().to_flags(), vec![1, 0, 0, 1]);
        assert_eq!(out.values(), &[15, 48]);
    }

    #[test]
    fn test_scan_matches_rowwise_across_words() {
        let n = 300;
        let lflags: Vec<u8> = (0..n).map(|i| (i % 3 != 0) as u8).collect();
        let rflags: Vec<u8> = (0..n).map(|i| (i % 5 < 2 || i > 250) as u8).collect();
        let left = col(&lflags, (0..lflags.iter().filter(|f| **f == 1).count() as i64).collect());
        let right = col(
            &rflags,
            (0..rflags.iter().filter(|f| **f == 1).count() as i64)
                .map(|v| v * 100)
                .collect(),
        );

        let out = aligned_scan(&left, &right, |a, b| Ok((*a, *b))).unwrap();
        assert_eq!(out.values().to_vec(), scan_rowwise(&left, &right));
        assert_eq!(out.presence(), &left.presence().and(right.presence()));
    }

    #[test]
    fn test_scan_domain_mismatch() {
        let left = col(&[1, 1], vec![1, 2]);
        let right = col(&[1, 1, 1], vec![1, 2, 3]);
        let err = aligned_scan(&left, &right, |a, b| Ok(a + b)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DomainMismatch);
    }

    #[test]
    fn test_scan_propagates_operator_error() {
        let left = col(&[1, 1], vec![1, 2]);
        let right = col(&[1, 1], vec![1, 0]);
        let err = aligned_scan(&left, &right, |a, b| {
            a.checked_div(*b).ok_or(TableError::DivisionByZero)
        })
        .unwrap_err();
        assert_eq!(err, TableError::DivisionByZero);
    }

    #[test]
    fn test_union_prefers_right() {
        let left = col(&[1, 1, 0, 0], vec![1, 2]);
        let right = col(&[0, 1, 1, 0], vec![20, 30]);

        let out = aligned_union(&left, &right, Conflict::PreferRight).unwrap();
        assert_eq!(out.to_options(), vec![Some(1), Some(20), Some(30), None]);

        let out = aligned_union(&left, &right, Conflict::PreferLeft).unwrap();
        assert_eq!(out.to_options(), vec![Some(1), Some(2), Some(30), None]);
    }
}
