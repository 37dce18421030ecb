//! Sorted merge join: align two key columns, then gather every column
//! of each table through the resulting row references.

use super::aligned::Conflict;
use super::merge::{combine_sides, union_names};
use super::merge_align::{align_with, is_sorted, Duplicates};
use crate::error::{Result, TableError};
use crate::table::column::zip_same_variant;
use crate::table::Table;

/// Options for [`merge_join`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct JoinOptions {
    /// Pairing of equal keys (default: one-to-one)
    pub duplicates: Duplicates,
    /// Survivor when a shared column is present on both sides of a joint row
    /// (default: right)
    pub conflict: Conflict,
}

/// Join `left` and `right` on `key`, producing one row per merge step.
///
/// Both key columns are reduced to their present values and are expected
/// ascending. Rows whose key is absent take no part. Joint rows carry the
/// columns of both tables; left-only and right-only rows carry their own
/// side's columns and are absent elsewhere.
pub fn merge_join(left: &Table, right: &Table, key: &str, options: &JoinOptions) -> Result<Table> {
    let left_key = left.column(key)?;
    let right_key = right.column(key)?;

    let alignment = zip_same_variant!(
        left_key,
        right_key,
        |l, r| {
            if !is_sorted(l.values()) || !is_sorted(r.values()) {
                log::warn!("join key {key} is not sorted; row order is unspecified");
            }
            align_with(l.values(), r.values(), options.duplicates)
        },
        return Err(TableError::IncompatibleColumns {
            name: key.to_string(),
            left: left_key.dtype(),
            right: right_key.dtype(),
        })
    );

    let (left_refs, right_refs) =
        alignment.to_row_refs(left_key.presence(), right_key.presence())?;

    let mut joined = Table::with_rows(alignment.len());
    for name in union_names(left, right) {
        let column = combine_sides(
            &name,
            left.get(&name),
            right.get(&name),
            &left_refs,
            &right_refs,
            options.conflict,
        )?;
        joined.insert_column(name, column)?;
    }

    log::debug!(
        "joined {} and {} rows on {key}: {} rows, {} joint",
        left.row_count(),
        right.row_count(),
        alignment.len(),
        alignment.joint_count()
    );
    Ok(joined)
}
