//! sparsetable: columnar tables over sparse, presence-tracked columns
//!
//! Each column stores only its present values densely, next to a presence
//! bitmap over the table's row domain. Kernels work word-wise on the
//! bitmaps and never materialize absent rows.

pub mod builtins;
pub mod error;
pub mod table;

pub use builtins::{
    aligned_scan, aligned_union, apply_binary, fillna, gather, mask_filter, merge, merge_join,
    sort_by_column, BinaryOp, Conflict, Duplicates, FillDirection, JoinOptions, NO_SOURCE,
};
pub use error::{ErrorKind, Result, TableError};
pub use table::{Bitmap, Column, DType, RankIndex, RowDomain, SparseColumn, Table, Value};
