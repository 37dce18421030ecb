//! Mask filter: shrink a column's presence set without touching its domain

use crate::error::{Result, TableError};
use crate::table::column::map_variant;
use crate::table::{Bitmap, Column, SparseColumn};

/// Keep the present rows whose mask entry is true.
///
/// `mask` runs over the dense (present) entries, in row order. Rows that
/// were absent stay absent; the row domain is unchanged.
pub fn mask_filter<T: Clone>(column: &SparseColumn<T>, mask: &[bool]) -> Result<SparseColumn<T>> {
    if mask.len() != column.present_count() {
        return Err(TableError::MaskLengthMismatch {
            mask: mask.len(),
            present: column.present_count(),
        });
    }

    let mut presence = Bitmap::new_all_absent(column.len());
    let mut values = Vec::with_capacity(mask.iter().filter(|keep| **keep).count());

    for ((row, value), &keep) in column.iter_present().zip(mask) {
        if keep {
            presence.set(row, true);
            values.push(value.clone());
        }
    }

    Ok(SparseColumn::from_parts(values, presence))
}

/// Dense mask for `column` from a row-level predicate.
///
/// A present row is kept when the predicate is present and true there.
pub fn predicate_mask<T>(column: &SparseColumn<T>, predicate: &SparseColumn<bool>) -> Result<Vec<bool>> {
    column.domain().ensure_same(predicate.domain())?;
    let rank = predicate.presence().rank_index();
    Ok(column
        .presence()
        .iter_ones()
        .map(|row| {
            rank.dense_offset(row)
                .map(|offset| predicate.values()[offset])
                .unwrap_or(false)
        })
        .collect())
}

impl Column {
    /// Keep the present rows whose dense mask entry is true
    pub fn filter(&self, mask: &[bool]) -> Result<Column> {
        Ok(map_variant!(self, |c| mask_filter(c, mask)?))
    }

    /// Keep the present rows where `predicate` is present and true
    pub fn filter_by(&self, predicate: &SparseColumn<bool>) -> Result<Column> {
        Ok(map_variant!(self, |c| mask_filter(c, &predicate_mask(c, predicate)?)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> SparseColumn<i64> {
        SparseColumn::new(vec![1, 2, 3], Bitmap::from_flags(&[0, 1, 1, 0, 1])).unwrap()
    }

    #[test]
    fn test_mask_filter() {
        let out = mask_filter(&sample(), &[true, false, true]).unwrap();
        assert_eq!(out.presence().to_flags(), vec![0, 1, 0, 0, 1]);
        assert_eq!(out.values(), &[1, 3]);
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn test_all_true_is_identity() {
        let col = sample();
        assert_eq!(mask_filter(&col, &[true; 3]).unwrap(), col);
    }

    #[test]
    fn test_all_false_empties() {
        let out = mask_filter(&sample(), &[false; 3]).unwrap();
        assert_eq!(out.present_count(), 0);
        assert_eq!(out.presence(), &Bitmap::new_all_absent(5));
    }

    #[test]
    fn test_mask_length_mismatch() {
        let err = mask_filter(&sample(), &[true; 5]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DomainMismatch);
    }

    #[test]
    fn test_filter_by_predicate() {
        let predicate = SparseColumn::from_options(vec![
            Some(true),
            Some(true),
            None,
            Some(true),
            Some(true),
        ]);
        let col = Column::Int64(sample());
        let out = col.filter_by(&predicate).unwrap();
        assert_eq!(out.as_int64().unwrap().to_options(), vec![None, Some(1), None, None, Some(3)]);
    }
}
