//! Outer merge of two tables on a shared key column
//!
//! Right rows are inserted into the left row order at the position a binary
//! search over the left keys gives them. The combined domain has
//! `n_left + n_right` rows, each sourced from exactly one side.

use super::aligned::{aligned_union, Conflict};
use super::gather::NO_SOURCE;
use super::merge_align::is_sorted;
use super::sort::{argsort, SortKey};
use crate::error::{Result, TableError};
use crate::table::column::zip_same_variant;
use crate::table::{Column, SparseColumn, Table};
use std::cmp::Ordering;

/// Insertion slot in `0..=n_left` for every right row.
///
/// Slot `s < n_left` means "immediately before left row `s`"; `n_left` means
/// "after every left row". Right rows whose key is absent go to the end.
fn insertion_slots<T: SortKey>(left: &SparseColumn<T>, right: &SparseColumn<T>) -> Vec<usize> {
    let n_left = left.len();
    let left_rows: Vec<usize> = left.presence().iter_ones().collect();
    let left_keys = left.values();
    let sorter = argsort(left_keys);

    let mut slots = vec![n_left; right.len()];
    for (row, key) in right.iter_present() {
        let pos = sorter.partition_point(|&k| left_keys[k].key_cmp(key) == Ordering::Less);
        if let Some(&k) = sorter.get(pos) {
            slots[row] = left_rows[k];
        }
    }
    slots
}

fn key_is_sorted<T: PartialOrd>(column: &SparseColumn<T>) -> bool {
    is_sorted(column.values())
}

/// Row references into the left and right tables for each output row
pub fn merge_row_refs(left_key: &Column, right_key: &Column, key: &str) -> Result<(Vec<i64>, Vec<i64>)> {
    let slots = zip_same_variant!(
        left_key,
        right_key,
        |l, r| {
            if !key_is_sorted(l) {
                log::warn!("merge key {key} is not sorted in the left table; row order is unspecified");
            }
            insertion_slots(l, r)
        },
        return Err(TableError::IncompatibleColumns {
            name: key.to_string(),
            left: left_key.dtype(),
            right: right_key.dtype(),
        })
    );

    let n_left = left_key.len();
    // Bucket right rows by slot, keeping right order inside a bucket
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); n_left + 1];
    for (row, &slot) in slots.iter().enumerate() {
        buckets[slot].push(row);
    }

    let total = n_left + right_key.len();
    let mut left_refs = Vec::with_capacity(total);
    let mut right_refs = Vec::with_capacity(total);
    for (slot, bucket) in buckets.iter().enumerate() {
        for &r in bucket {
            left_refs.push(NO_SOURCE);
            right_refs.push(r as i64);
        }
        if slot < n_left {
            left_refs.push(slot as i64);
            right_refs.push(NO_SOURCE);
        }
    }
    Ok((left_refs, right_refs))
}

/// Gather both sides of one output column and interleave them
pub(crate) fn combine_sides(
    name: &str,
    left: Option<&Column>,
    right: Option<&Column>,
    left_refs: &[i64],
    right_refs: &[i64],
    conflict: Conflict,
) -> Result<Column> {
    match (left, right) {
        (Some(l), Some(r)) => {
            let l = l.gather(left_refs)?;
            let r = r.gather(right_refs)?;
            zip_same_variant!(
                &l,
                &r,
                |a, b| Ok(aligned_union(a, b, conflict)?.into()),
                Err(TableError::IncompatibleColumns {
                    name: name.to_string(),
                    left: l.dtype(),
                    right: r.dtype(),
                })
            )
        }
        (Some(l), None) => l.gather(left_refs),
        (None, Some(r)) => r.gather(right_refs),
        (None, None) => Err(TableError::missing(name)),
    }
}

/// Union of column names: left order first, then right-only names
pub(crate) fn union_names(left: &Table, right: &Table) -> Vec<String> {
    let mut names: Vec<String> = left.names().to_vec();
    names.extend(
        right
            .names()
            .iter()
            .filter(|name| !left.contains(name))
            .cloned(),
    );
    names
}

/// Merge `right` into `left` on column `key`.
///
/// The result has every column of either table and `n_left + n_right`
/// rows. Order is predictable when the left key column is sorted; unsorted
/// input still merges but interleaves in an unspecified order.
pub fn merge(left: &Table, right: &Table, key: &str) -> Result<Table> {
    let left_key = left.column(key)?;
    let right_key = right.column(key)?;

    let (left_refs, right_refs) = merge_row_refs(left_key, right_key, key)?;

    let mut merged = Table::with_rows(left_refs.len());
    for name in union_names(left, right) {
        let column = combine_sides(
            &name,
            left.get(&name),
            right.get(&name),
            &left_refs,
            &right_refs,
            Conflict::PreferRight,
        )?;
        merged.insert_column(name, column)?;
    }

    log::debug!(
        "merged {} + {} rows on {key} into {} columns",
        left.row_count(),
        right.row_count(),
        merged.col_count()
    );
    Ok(merged)
}
