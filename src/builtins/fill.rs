//! Filling absent rows: forward/backward propagation and constant fills

use super::gather::NO_SOURCE;
use crate::error::{Result, TableError};
use crate::table::{Bitmap, Column, SparseColumn, Value};

/// Direction in which present values propagate into absent rows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FillDirection {
    /// Each absent row takes the nearest present value above it
    #[default]
    Forward,
    /// Each absent row takes the nearest present value below it
    Backward,
}

/// Row references that point every row at its fill source
pub fn fill_refs(presence: &Bitmap, direction: FillDirection) -> Vec<i64> {
    let n = presence.len();
    let mut refs = vec![NO_SOURCE; n];
    let mut source = NO_SOURCE;
    match direction {
        FillDirection::Forward => {
            for (i, slot) in refs.iter_mut().enumerate() {
                if presence.get(i) {
                    source = i as i64;
                }
                *slot = source;
            }
        }
        FillDirection::Backward => {
            for (i, slot) in refs.iter_mut().enumerate().rev() {
                if presence.get(i) {
                    source = i as i64;
                }
                *slot = source;
            }
        }
    }
    refs
}

/// Propagate present values into absent rows.
///
/// Rows with no source in `direction` stay absent unless `fill_value` is
/// given, in which case they take it.
pub fn fillna(column: &Column, direction: FillDirection, fill_value: Option<&Value>) -> Result<Column> {
    let filled = column.gather(&fill_refs(column.presence(), direction))?;
    match fill_value {
        Some(value) => fill_absent(&filled, value),
        None => Ok(filled),
    }
}

fn fill_typed<T: Clone>(column: &SparseColumn<T>, value: T) -> SparseColumn<T> {
    SparseColumn::dense(
        column
            .iter()
            .map(|v| v.cloned().unwrap_or_else(|| value.clone()))
            .collect(),
    )
}

/// Set every absent row to `value`; the result is fully present.
///
/// `value` must convert losslessly to the column's element type.
pub fn fill_absent(column: &Column, value: &Value) -> Result<Column> {
    let filled = match (column, value) {
        (Column::Int64(c), v) => v.as_i64().map(|x| Column::Int64(fill_typed(c, x))),
        (Column::UInt64(c), v) => v.as_u64().map(|x| Column::UInt64(fill_typed(c, x))),
        (Column::Float64(c), v) => v.as_f64().map(|x| Column::Float64(fill_typed(c, x))),
        (Column::Str(c), Value::Str(s)) => Some(Column::Str(fill_typed(c, s.clone()))),
        (Column::Bool(c), Value::Bool(b)) => Some(Column::Bool(fill_typed(c, *b))),
        _ => None,
    };
    filled.ok_or(TableError::FillTypeMismatch {
        column: column.dtype(),
        value: value.type_name(),
    })
}

impl Column {
    /// Method form of [`fillna`]
    pub fn fillna(&self, direction: FillDirection, fill_value: Option<&Value>) -> Result<Column> {
        fillna(self, direction, fill_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> Column {
        let presence = Bitmap::from_flags(&[0, 0, 1, 0, 0, 0, 0, 1, 0, 0]);
        Column::Int64(SparseColumn::new(vec![1, 2], presence).unwrap())
    }

    fn dense(col: &Column) -> Vec<i64> {
        col.as_int64().unwrap().values().to_vec()
    }

    #[test]
    fn test_forward() {
        let out = fillna(&sample(), FillDirection::Forward, None).unwrap();
        assert_eq!(dense(&out), vec![1, 1, 1, 1, 1, 2, 2, 2]);
        assert_eq!(out.presence().to_flags(), vec![0, 0, 1, 1, 1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_forward_fill_value() {
        let out = fillna(&sample(), FillDirection::Forward, Some(&Value::Int(-1))).unwrap();
        assert_eq!(dense(&out), vec![-1, -1, 1, 1, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn test_backward() {
        let out = fillna(&sample(), FillDirection::Backward, None).unwrap();
        assert_eq!(dense(&out), vec![1, 1, 1, 2, 2, 2, 2, 2]);
        assert_eq!(out.presence().to_flags(), vec![1, 1, 1, 1, 1, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_backward_fill_value() {
        let out = fillna(&sample(), FillDirection::Backward, Some(&Value::Int(-1))).unwrap();
        assert_eq!(dense(&out), vec![1, 1, 1, 2, 2, 2, 2, 2, -1, -1]);
    }

    #[test]
    fn test_fill_type_mismatch() {
        let err = fillna(&sample(), FillDirection::Forward, Some(&"x".into())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(fill_absent(&sample(), &Value::Float(0.5)).is_err());
    }

    #[test]
    fn test_float_column_accepts_int_fill() {
        let col = Column::Float64(SparseColumn::from_options(vec![None, Some(1.5)]));
        let out = fill_absent(&col, &Value::Int(2)).unwrap();
        assert_eq!(out.as_float64().unwrap().values(), &[2.0, 1.5]);
    }
}
