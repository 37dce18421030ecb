//! Gather/reindex: express a sparse column under a new row ordering

use crate::error::Result;
use crate::table::column::map_variant;
use crate::table::{Bitmap, Column, SparseColumn};

/// Row reference meaning "no source row; the output row is absent"
pub const NO_SOURCE: i64 = -1;

/// Build a column of `targets.len()` rows where output row `i` takes the
/// value of source row `targets[i]`.
///
/// Negative targets and absent source rows produce absent output rows.
/// A target at or past the source domain fails with `RowOutOfBounds`.
pub fn gather<T: Clone>(column: &SparseColumn<T>, targets: &[i64]) -> Result<SparseColumn<T>> {
    let domain = column.domain();
    let rank = column.presence().rank_index();
    let dense = column.values();

    let mut presence = Bitmap::new_all_absent(targets.len());
    let mut values = Vec::with_capacity(targets.len().min(column.present_count()));

    for (i, &target) in targets.iter().enumerate() {
        let Some(row) = domain.resolve(target)? else {
            continue;
        };
        if let Some(offset) = rank.dense_offset(row) {
            presence.set(i, true);
            values.push(dense[offset].clone());
        }
    }

    Ok(SparseColumn::from_parts(values, presence))
}

impl Column {
    /// Reindex through row references (see [`gather`])
    pub fn gather(&self, targets: &[i64]) -> Result<Column> {
        Ok(map_variant!(self, |c| gather(c, targets)?))
    }
}
