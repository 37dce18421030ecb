//! Column-consistent stable sort of a whole table by one key column

use crate::error::Result;
use crate::table::column::with_variant;
use crate::table::{Column, Table};
use std::cmp::Ordering;

/// Total order used for sorting and insertion searches.
///
/// Every NaN, whatever its sign bit, sorts after every number; the rest of
/// the floats order by `total_cmp`.
pub trait SortKey {
    fn key_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! ord_sort_key {
    ($($t:ty),*) => {
        $(impl SortKey for $t {
            #[inline]
            fn key_cmp(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }
        })*
    };
}

ord_sort_key!(i64, u64, bool, String);

impl SortKey for f64 {
    #[inline]
    fn key_cmp(&self, other: &Self) -> Ordering {
        match (self.is_nan(), other.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.total_cmp(other),
        }
    }
}

/// Stable ascending argsort of a dense slice
pub fn argsort<T: SortKey>(values: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].key_cmp(&values[b]));
    order
}

/// Full-domain row permutation that sorts `key`'s present rows.
///
/// `perm[i]` is the source row placed at output row `i`. Only rows where the
/// key is present move, and they move among themselves; rows absent in the
/// key keep their position.
pub fn sort_permutation(key: &Column) -> Vec<i64> {
    let order = with_variant!(key, |c| argsort(c.values()));
    let present: Vec<usize> = key.presence().iter_ones().collect();

    let mut perm: Vec<i64> = (0..key.len() as i64).collect();
    for (slot, &k) in present.iter().zip(&order) {
        perm[*slot] = present[k] as i64;
    }
    perm
}

/// Reorder every column of `table` by the ascending order of column `key`.
///
/// Each column is gathered through the same row permutation, so values move
/// with their rows and every column keeps its own presence pattern.
pub fn sort_by_column(table: &Table, key: &str) -> Result<Table> {
    let perm = sort_permutation(table.column(key)?);

    let mut sorted = Table::with_rows(table.row_count());
    for (name, column) in table.iter() {
        sorted.insert_column(name, column.gather(&perm)?)?;
    }

    log::debug!(
        "sorted {} rows x {} columns by {key}",
        sorted.row_count(),
        sorted.col_count()
    );
    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{SparseColumn, Value};

    #[test]
    fn test_argsort_is_stable() {
        let order = argsort(&[3i64, 1, 3, 0, 1]);
        assert_eq!(order, vec![3, 1, 4, 0, 2]);
    }

    #[test]
    fn test_argsort_nan_last() {
        let order = argsort(&[f64::NAN, 2.0, -1.0]);
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn test_permutation_leaves_absent_rows() {
        let key = Column::Int64(SparseColumn::from_options(vec![
            Some(30),
            None,
            Some(10),
            None,
            Some(20),
        ]));
        assert_eq!(sort_permutation(&key), vec![2, 1, 4, 3, 0]);
    }

    #[test]
    fn test_sort_moves_other_columns_with_rows() {
        let table = Table::from_values(vec![
            (
                "k",
                vec![Value::Int(3), Value::Null, Value::Int(1), Value::Int(2)],
            ),
            (
                "v",
                vec!["c".into(), "x".into(), Value::Null, "b".into()],
            ),
        ])
        .unwrap();

        let sorted = sort_by_column(&table, "k").unwrap();

        assert_eq!(
            sorted.column("k").unwrap().to_values(),
            vec![Value::Int(1), Value::Null, Value::Int(2), Value::Int(3)]
        );
        assert_eq!(
            sorted.column("v").unwrap().to_values(),
            vec![Value::Null, "x".into(), "b".into(), "c".into()]
        );
    }

    #[test]
    fn test_sort_missing_key() {
        let table = Table::from_values(vec![("a", vec![Value::Int(1)])]).unwrap();
        assert!(sort_by_column(&table, "b").is_err());
    }

    #[test]
    fn test_argsort_negative_nan_last() {
        let order = argsort(&[-f64::NAN, 2.0, f64::NAN, -1.0]);
        assert_eq!(order, vec![3, 1, 0, 2]);
    }

    #[test]
    fn test_sort_nan_from_division() {
        let num = Column::Float64(SparseColumn::dense(vec![0.0, 5.0, 1.0]));
        let den = Column::Float64(SparseColumn::dense(vec![0.0, 1.0, 1.0]));
        let key = num.binary(crate::builtins::BinaryOp::Div, &den).unwrap();
        let table = Table::from_columns(vec![
            ("k", key),
            ("id", Column::Int64(SparseColumn::dense(vec![0, 1, 2]))),
        ])
        .unwrap();

        let sorted = sort_by_column(&table, "k").unwrap();

        let k = sorted.column("k").unwrap().as_float64().unwrap().values().to_vec();
        assert_eq!(&k[..2], &[1.0, 5.0]);
        assert!(k[2].is_nan());
        assert_eq!(
            sorted.column("id").unwrap().to_values(),
            vec![Value::Int(2), Value::Int(1), Value::Int(0)]
        );
    }
}
