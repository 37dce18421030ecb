//! Sparse typed columns: a presence bitmap plus a ragged dense buffer
//!
//! Only present rows store a value. The k-th set bit of the presence bitmap
//! corresponds to `values[k]`, so dense order is row order.

use super::{Bitmap, RowDomain, Value};
use crate::error::{Result, TableError};
use std::fmt;

/// Values of one element type, stored only where present.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseColumn<T> {
    values: Vec<T>,
    presence: Bitmap,
}

impl<T> SparseColumn<T> {
    /// Pair a dense buffer with its presence bitmap.
    ///
    /// Fails when the buffer length differs from the number of present rows.
    pub fn new(values: Vec<T>, presence: Bitmap) -> Result<Self> {
        let present = presence.count_ones();
        if values.len() != present {
            return Err(TableError::DenseLengthMismatch {
                values: values.len(),
                present,
            });
        }
        Ok(Self { values, presence })
    }

    /// Kernel output whose invariant holds by construction
    pub(crate) fn from_parts(values: Vec<T>, presence: Bitmap) -> Self {
        debug_assert_eq!(values.len(), presence.count_ones());
        Self { values, presence }
    }

    /// Every row present
    pub fn dense(values: Vec<T>) -> Self {
        let presence = Bitmap::new_all_present(values.len());
        Self { values, presence }
    }

    /// Every row absent
    pub fn all_absent(len: usize) -> Self {
        Self {
            values: Vec::new(),
            presence: Bitmap::new_all_absent(len),
        }
    }

    pub fn from_options(rows: Vec<Option<T>>) -> Self {
        let mut presence = Bitmap::new_all_absent(rows.len());
        let mut values = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            if let Some(v) = row {
                presence.set(i, true);
                values.push(v);
            }
        }
        Self { values, presence }
    }

    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    pub fn presence(&self) -> &Bitmap {
        &self.presence
    }

    #[inline]
    pub fn domain(&self) -> RowDomain {
        RowDomain::new(self.presence.len())
    }

    /// Logical row count (present and absent)
    #[inline]
    pub fn len(&self) -> usize {
        self.presence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.presence.is_empty()
    }

    #[inline]
    pub fn present_count(&self) -> usize {
        self.values.len()
    }

    /// Value at a logical row (O(row / 64))
    pub fn get(&self, row: usize) -> Option<&T> {
        if row >= self.len() || !self.presence.get(row) {
            return None;
        }
        let w = row >> 6;
        let mut offset = (0..w)
            .map(|i| self.presence.word(i).count_ones() as usize)
            .sum::<usize>();
        offset += (self.presence.word(w) & ((1u64 << (row & 63)) - 1)).count_ones() as usize;
        self.values.get(offset)
    }

    /// Row-order view with `None` for absent rows
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        let mut dense = self.values.iter();
        (0..self.len()).map(move |i| {
            if self.presence.get(i) {
                dense.next()
            } else {
                None
            }
        })
    }

    /// `(row, value)` pairs for present rows only
    pub fn iter_present(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.presence.iter_ones().zip(self.values.iter())
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> SparseColumn<U> {
        SparseColumn {
            values: self.values.iter().map(f).collect(),
            presence: self.presence.clone(),
        }
    }
}

impl<T: Clone> SparseColumn<T> {
    pub fn to_options(&self) -> Vec<Option<T>> {
        self.iter().map(|v| v.cloned()).collect()
    }
}

/// Element type of a [`Column`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    Int64,
    UInt64,
    Float64,
    Str,
    Bool,
}

impl DType {
    pub fn is_numeric(self) -> bool {
        !matches!(self, DType::Str)
    }

    pub fn is_integer(self) -> bool {
        matches!(self, DType::Int64 | DType::UInt64 | DType::Bool)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Int64 => "int64",
            DType::UInt64 => "uint64",
            DType::Float64 => "float64",
            DType::Str => "str",
            DType::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A sparse column of one of the supported element types
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Int64(SparseColumn<i64>),
    UInt64(SparseColumn<u64>),
    Float64(SparseColumn<f64>),
    /// Text values
    Str(SparseColumn<String>),
    /// 8-bit flags
    Bool(SparseColumn<bool>),
}

/// Apply the same generic expression to whichever variant is held,
/// rewrapping the result in the same variant.
macro_rules! map_variant {
    ($col:expr, |$c:ident| $body:expr) => {
        match $col {
            $crate::table::Column::Int64($c) => $crate::table::Column::Int64($body),
            $crate::table::Column::UInt64($c) => $crate::table::Column::UInt64($body),
            $crate::table::Column::Float64($c) => $crate::table::Column::Float64($body),
            $crate::table::Column::Str($c) => $crate::table::Column::Str($body),
            $crate::table::Column::Bool($c) => $crate::table::Column::Bool($body),
        }
    };
}

/// Apply the same generic expression to whichever variant is held.
macro_rules! with_variant {
    ($col:expr, |$c:ident| $body:expr) => {
        match $col {
            $crate::table::Column::Int64($c) => $body,
            $crate::table::Column::UInt64($c) => $body,
            $crate::table::Column::Float64($c) => $body,
            $crate::table::Column::Str($c) => $body,
            $crate::table::Column::Bool($c) => $body,
        }
    };
}

/// Pair two columns holding the same variant; `$mismatch` otherwise.
macro_rules! zip_same_variant {
    ($left:expr, $right:expr, |$a:ident, $b:ident| $body:expr, $mismatch:expr) => {
        match ($left, $right) {
            ($crate::table::Column::Int64($a), $crate::table::Column::Int64($b)) => $body,
            ($crate::table::Column::UInt64($a), $crate::table::Column::UInt64($b)) => $body,
            ($crate::table::Column::Float64($a), $crate::table::Column::Float64($b)) => $body,
            ($crate::table::Column::Str($a), $crate::table::Column::Str($b)) => $body,
            ($crate::table::Column::Bool($a), $crate::table::Column::Bool($b)) => $body,
            _ => $mismatch,
        }
    };
}

pub(crate) use map_variant;
pub(crate) use with_variant;
pub(crate) use zip_same_variant;

impl Column {
    pub fn dtype(&self) -> DType {
        match self {
            Column::Int64(_) => DType::Int64,
            Column::UInt64(_) => DType::UInt64,
            Column::Float64(_) => DType::Float64,
            Column::Str(_) => DType::Str,
            Column::Bool(_) => DType::Bool,
        }
    }

    /// An all-absent column of the given type
    pub fn all_absent(dtype: DType, len: usize) -> Self {
        match dtype {
            DType::Int64 => Column::Int64(SparseColumn::all_absent(len)),
            DType::UInt64 => Column::UInt64(SparseColumn::all_absent(len)),
            DType::Float64 => Column::Float64(SparseColumn::all_absent(len)),
            DType::Str => Column::Str(SparseColumn::all_absent(len)),
            DType::Bool => Column::Bool(SparseColumn::all_absent(len)),
        }
    }

    pub fn presence(&self) -> &Bitmap {
        with_variant!(self, |c| c.presence())
    }

    pub fn domain(&self) -> RowDomain {
        with_variant!(self, |c| c.domain())
    }

    pub fn len(&self) -> usize {
        with_variant!(self, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn present_count(&self) -> usize {
        with_variant!(self, |c| c.present_count())
    }

    /// Cell at `row` as an untyped value (`Value::Null` when absent)
    pub fn value(&self, row: usize) -> Value {
        match self {
            Column::Int64(c) => c.get(row).map(|v| Value::Int(*v)),
            Column::UInt64(c) => c.get(row).map(|v| Value::UInt(*v)),
            Column::Float64(c) => c.get(row).map(|v| Value::Float(*v)),
            Column::Str(c) => c.get(row).map(|v| Value::Str(v.clone())),
            Column::Bool(c) => c.get(row).map(|v| Value::Bool(*v)),
        }
        .unwrap_or(Value::Null)
    }

    /// Every row as an untyped value, in one pass over the presence bitmap
    pub fn to_values(&self) -> Vec<Value> {
        fn cells<T>(c: &SparseColumn<T>, f: impl Fn(&T) -> Value) -> Vec<Value> {
            c.iter().map(|v| v.map_or(Value::Null, &f)).collect()
        }
        match self {
            Column::Int64(c) => cells(c, |v| Value::Int(*v)),
            Column::UInt64(c) => cells(c, |v| Value::UInt(*v)),
            Column::Float64(c) => cells(c, |v| Value::Float(*v)),
            Column::Str(c) => cells(c, |v| Value::Str(v.clone())),
            Column::Bool(c) => cells(c, |v| Value::Bool(*v)),
        }
    }

    pub fn as_int64(&self) -> Option<&SparseColumn<i64>> {
        match self {
            Column::Int64(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_uint64(&self) -> Option<&SparseColumn<u64>> {
        match self {
            Column::UInt64(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_float64(&self) -> Option<&SparseColumn<f64>> {
        match self {
            Column::Float64(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&SparseColumn<String>> {
        match self {
            Column::Str(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<&SparseColumn<bool>> {
        match self {
            Column::Bool(c) => Some(c),
            _ => None,
        }
    }

    /// Numeric view as f64 (bools as 0/1); None for text
    pub fn to_float64(&self) -> Option<SparseColumn<f64>> {
        match self {
            Column::Int64(c) => Some(c.map(|v| *v as f64)),
            Column::UInt64(c) => Some(c.map(|v| *v as f64)),
            Column::Float64(c) => Some(c.clone()),
            Column::Bool(c) => Some(c.map(|v| *v as u8 as f64)),
            Column::Str(_) => None,
        }
    }

    /// Integer view as i64; None for floats, text, or u64 values above i64::MAX
    pub fn to_int64(&self) -> Option<SparseColumn<i64>> {
        match self {
            Column::Int64(c) => Some(c.clone()),
            Column::UInt64(c) => {
                let values = c
                    .values()
                    .iter()
                    .map(|v| i64::try_from(*v).ok())
                    .collect::<Option<Vec<_>>>()?;
                Some(SparseColumn::from_parts(values, c.presence().clone()))
            }
            Column::Bool(c) => Some(c.map(|v| *v as i64)),
            Column::Float64(_) | Column::Str(_) => None,
        }
    }

    /// Truthiness per present value (non-zero, non-empty, true)
    pub fn to_truthy(&self) -> SparseColumn<bool> {
        match self {
            Column::Int64(c) => c.map(|v| *v != 0),
            Column::UInt64(c) => c.map(|v| *v != 0),
            Column::Float64(c) => c.map(|v| *v != 0.0),
            Column::Str(c) => c.map(|v| !v.is_empty()),
            Column::Bool(c) => c.clone(),
        }
    }
}

impl From<SparseColumn<i64>> for Column {
    fn from(c: SparseColumn<i64>) -> Self {
        Column::Int64(c)
    }
}

impl From<SparseColumn<u64>> for Column {
    fn from(c: SparseColumn<u64>) -> Self {
        Column::UInt64(c)
    }
}

impl From<SparseColumn<f64>> for Column {
    fn from(c: SparseColumn<f64>) -> Self {
        Column::Float64(c)
    }
}

impl From<SparseColumn<String>> for Column {
    fn from(c: SparseColumn<String>) -> Self {
        Column::Str(c)
    }
}

impl From<SparseColumn<bool>> for Column {
    fn from(c: SparseColumn<bool>) -> Self {
        Column::Bool(c)
    }
}
