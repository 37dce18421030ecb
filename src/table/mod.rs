//! Core table and column types

pub mod bitmap;
pub mod column;
pub mod domain;
pub mod table;
pub mod value;

pub use bitmap::{Bitmap, Ones, RankIndex};
pub use column::{Column, DType, SparseColumn};
pub use domain::RowDomain;
pub use table::Table;
pub use value::Value;
