//! Built-in operations

pub mod aligned;
pub mod fill;
pub mod filter;
pub mod gather;
pub mod join;
pub mod merge;
pub mod merge_align;
pub mod ops;
pub mod sort;

pub use aligned::{aligned_scan, aligned_union, Conflict};
pub use fill::{fill_absent, fill_refs, fillna, FillDirection};
pub use filter::{mask_filter, predicate_mask};
pub use gather::{gather, NO_SOURCE};
pub use join::{merge_join, JoinOptions};
pub use merge::{merge, merge_row_refs};
pub use merge_align::{align_sorted, align_sorted_expanding, align_with, is_sorted, Alignment, Duplicates};
pub use ops::{apply_binary, BinaryOp};
pub use sort::{argsort, sort_by_column, sort_permutation, SortKey};
