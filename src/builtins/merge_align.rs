//! Sorted merge alignment of two dense key sequences
//!
//! Produces, for every output position of the merged ordering, the dense
//! offset each side contributed (or `None`). The offsets translate back to
//! row references that feed straight into [`gather`](super::gather::gather).

use super::gather::NO_SOURCE;
use crate::error::{Result, TableError};
use crate::table::Bitmap;

/// How equal keys on both sides are paired
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Duplicates {
    /// Equal heads advance both cursors together: one joint row per step,
    /// never a cross product.
    #[default]
    Monotone,
    /// Runs of equal keys produce every left/right pairing.
    Expand,
}

/// Row correspondence produced by the merge
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Alignment {
    pub left: Vec<Option<usize>>,
    pub right: Vec<Option<usize>>,
}

impl Alignment {
    fn with_capacity(len: usize) -> Self {
        Self {
            left: Vec::with_capacity(len),
            right: Vec::with_capacity(len),
        }
    }

    fn push(&mut self, left: Option<usize>, right: Option<usize>) {
        self.left.push(left);
        self.right.push(right);
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Positions where both sides contributed
    pub fn joint_count(&self) -> usize {
        self.left
            .iter()
            .zip(&self.right)
            .filter(|(l, r)| l.is_some() && r.is_some())
            .count()
    }

    /// Translate dense offsets into row references of each side's domain.
    ///
    /// `left_presence` / `right_presence` are the presence bitmaps the dense
    /// keys were taken from; positions a side did not contribute become
    /// [`NO_SOURCE`].
    pub fn to_row_refs(
        &self,
        left_presence: &Bitmap,
        right_presence: &Bitmap,
    ) -> Result<(Vec<i64>, Vec<i64>)> {
        Ok((
            offsets_to_rows(&self.left, left_presence)?,
            offsets_to_rows(&self.right, right_presence)?,
        ))
    }
}

fn offsets_to_rows(offsets: &[Option<usize>], presence: &Bitmap) -> Result<Vec<i64>> {
    let rows: Vec<usize> = presence.iter_ones().collect();
    offsets
        .iter()
        .map(|offset| match offset {
            None => Ok(NO_SOURCE),
            Some(k) => rows.get(*k).map(|row| *row as i64).ok_or(TableError::RowOutOfBounds {
                row: *k as i64,
                len: rows.len(),
            }),
        })
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Step {
    Left,
    Both,
    Right,
}

#[inline]
fn step<T: PartialOrd>(left: Option<&T>, right: Option<&T>) -> Option<Step> {
    match (left, right) {
        (None, None) => None,
        (Some(_), None) => Some(Step::Left),
        (None, Some(_)) => Some(Step::Right),
        (Some(l), Some(r)) => Some(if l < r {
            Step::Left
        } else if l == r {
            Step::Both
        } else {
            Step::Right
        }),
    }
}

/// One-to-one two-pointer merge of two ascending key sequences.
///
/// `left < right` emits a left-only row, equality emits a joint row and
/// advances both cursors, `left > right` emits a right-only row. Once one
/// side is exhausted the rest of the other side follows. A first pass sizes
/// the output; the second materializes the offsets.
pub fn align_sorted<T: PartialOrd>(left: &[T], right: &[T]) -> Alignment {
    let mut len = 0usize;
    walk_monotone(left, right, |_, _| len += 1);

    let mut alignment = Alignment::with_capacity(len);
    walk_monotone(left, right, |l, r| alignment.push(l, r));
    alignment
}

fn walk_monotone<T: PartialOrd>(
    left: &[T],
    right: &[T],
    mut emit: impl FnMut(Option<usize>, Option<usize>),
) {
    let (mut l, mut r) = (0usize, 0usize);
    while let Some(s) = step(left.get(l), right.get(r)) {
        match s {
            Step::Left => {
                emit(Some(l), None);
                l += 1;
            }
            Step::Both => {
                emit(Some(l), Some(r));
                l += 1;
                r += 1;
            }
            Step::Right => {
                emit(None, Some(r));
                r += 1;
            }
        }
    }
}

/// Merge that expands runs of equal keys into their cross product.
///
/// Within a run, pairs come out left-major: every right match for the first
/// left duplicate, then for the second, and so on.
pub fn align_sorted_expanding<T: PartialOrd>(left: &[T], right: &[T]) -> Alignment {
    let mut alignment = Alignment::with_capacity(left.len().max(right.len()));
    let (mut l, mut r) = (0usize, 0usize);

    while let Some(s) = step(left.get(l), right.get(r)) {
        match s {
            Step::Left => {
                alignment.push(Some(l), None);
                l += 1;
            }
            Step::Right => {
                alignment.push(None, Some(r));
                r += 1;
            }
            Step::Both => {
                let key = &left[l];
                let l_end = l + left[l..].iter().take_while(|k| *k == key).count();
                let r_end = r + right[r..].iter().take_while(|k| *k == key).count();
                for i in l..l_end {
                    for j in r..r_end {
                        alignment.push(Some(i), Some(j));
                    }
                }
                l = l_end;
                r = r_end;
            }
        }
    }

    alignment
}

/// Dispatch on the duplicate policy
pub fn align_with<T: PartialOrd>(left: &[T], right: &[T], duplicates: Duplicates) -> Alignment {
    match duplicates {
        Duplicates::Monotone => align_sorted(left, right),
        Duplicates::Expand => align_sorted_expanding(left, right),
    }
}

/// True when `keys` is non-decreasing
pub fn is_sorted<T: PartialOrd>(keys: &[T]) -> bool {
    keys.windows(2).all(|w| !(w[1] < w[0]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleave_with_joint_key() {
        let a = align_sorted(&[1, 3, 5], &[2, 3, 6]);

        assert_eq!(a.len(), 5);
        assert_eq!(a.left, vec![Some(0), None, Some(1), Some(2), None]);
        assert_eq!(a.right, vec![None, Some(0), Some(1), None, Some(2)]);
        assert_eq!(a.joint_count(), 1);
    }

    #[test]
    fn test_empty_sides() {
        let a = align_sorted::<i64>(&[], &[]);
        assert!(a.is_empty());

        let a = align_sorted(&[1, 2], &[]);
        assert_eq!(a.left, vec![Some(0), Some(1)]);
        assert_eq!(a.right, vec![None, None]);
    }

    #[test]
    fn test_monotone_duplicates_do_not_expand() {
        let a = align_sorted(&[1, 1, 2], &[1, 1, 1]);
        // Equal heads pair up one-to-one; the surplus right 1 stands alone
        assert_eq!(a.left, vec![Some(0), Some(1), None, Some(2)]);
        assert_eq!(a.right, vec![Some(0), Some(1), Some(2), None]);
        assert_eq!(a.joint_count(), 2);
    }

    #[test]
    fn test_expanding_duplicates() {
        let a = align_sorted_expanding(&[1, 1, 2], &[0, 1, 1, 1]);
        assert_eq!(a.len(), 1 + 6 + 1);
        assert_eq!(a.joint_count(), 6);
        assert_eq!(&a.left[..3], &[None, Some(0), Some(0)]);
        assert_eq!(&a.right[..3], &[Some(0), Some(1), Some(2)]);
        assert_eq!(a.left[7], Some(2));
        assert_eq!(a.right[7], None);
    }

    #[test]
    fn test_policies_agree_on_distinct_keys() {
        let left = [1, 4, 9, 10];
        let right = [0, 4, 10, 12];
        assert_eq!(
            align_with(&left, &right, Duplicates::Monotone),
            align_with(&left, &right, Duplicates::Expand)
        );
    }

    #[test]
    fn test_row_refs() {
        let a = align_sorted(&[1, 3], &[3]);
        let left_presence = Bitmap::from_flags(&[0, 1, 0, 1]);
        let right_presence = Bitmap::from_flags(&[0, 0, 1]);

        let (l, r) = a.to_row_refs(&left_presence, &right_presence).unwrap();
        assert_eq!(l, vec![1, 3]);
        assert_eq!(r, vec![NO_SOURCE, 2]);
    }

    #[test]
    fn test_is_sorted() {
        assert!(is_sorted(&[1, 1, 2]));
        assert!(!is_sorted(&[2, 1]));
        assert!(is_sorted::<f64>(&[]));
    }
}
