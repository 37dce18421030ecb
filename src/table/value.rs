//! Untyped scalar used at the façade boundary

use super::{Column, DType, SparseColumn};
use crate::error::{Result, TableError};

/// A single cell as supplied by callers before type inference.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
        }
    }

    /// Narrowest column type able to hold this value
    pub fn natural_dtype(&self) -> Option<DType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(DType::Bool),
            Value::Int(_) => Some(DType::Int64),
            Value::UInt(v) if *v <= i64::MAX as u64 => Some(DType::Int64),
            Value::UInt(_) => Some(DType::UInt64),
            Value::Float(_) => Some(DType::Float64),
            Value::Str(_) => Some(DType::Str),
        }
    }

    pub(crate) fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub(crate) fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(v) => u64::try_from(*v).ok(),
            Value::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::UInt(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[derive(Default)]
struct Seen {
    bool_: bool,
    int: bool,
    negative: bool,
    big_uint: bool,
    float: bool,
    str_: bool,
    family: Option<&'static str>,
}

impl Column {
    /// Infer a column type from untyped cells; `Value::Null` marks absent rows.
    ///
    /// Integers become `Int64` (`UInt64` when a value exceeds `i64::MAX`), any
    /// float promotes the column to `Float64`, and an all-null input yields an
    /// all-absent `Float64` column. Text or flags mixed with numbers fail.
    pub fn from_values(cells: Vec<Value>) -> Result<Column> {
        let mut seen = Seen::default();
        for cell in &cells {
            let kind = match cell {
                Value::Null => continue,
                Value::Bool(_) => {
                    seen.bool_ = true;
                    "bool"
                }
                Value::Int(v) => {
                    seen.int = true;
                    seen.negative |= *v < 0;
                    "number"
                }
                Value::UInt(v) => {
                    seen.int = true;
                    seen.big_uint |= *v > i64::MAX as u64;
                    "number"
                }
                Value::Float(_) => {
                    seen.float = true;
                    "number"
                }
                Value::Str(_) => {
                    seen.str_ = true;
                    "str"
                }
            };
            match seen.family {
                Some(first) if first != kind => {
                    return Err(TableError::MixedTypes { first, second: kind });
                }
                _ => seen.family = Some(kind),
            }
        }

        let len = cells.len();
        let column = if seen.str_ {
            Column::Str(collect(cells, |v| match v {
                Value::Str(s) => Some(s),
                _ => None,
            }))
        } else if seen.bool_ {
            Column::Bool(collect(cells, |v| match v {
                Value::Bool(b) => Some(b),
                _ => None,
            }))
        } else if seen.float || (seen.big_uint && seen.negative) {
            Column::Float64(collect(cells, |v| v.as_f64()))
        } else if seen.big_uint {
            Column::UInt64(collect(cells, |v| v.as_u64()))
        } else if seen.int {
            Column::Int64(collect(cells, |v| v.as_i64()))
        } else {
            Column::all_absent(DType::Float64, len)
        };
        Ok(column)
    }
}

fn collect<T>(cells: Vec<Value>, f: impl Fn(Value) -> Option<T>) -> SparseColumn<T> {
    SparseColumn::from_options(cells.into_iter().map(f).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_infer_int() {
        let col = Column::from_values(vec![Value::Int(1), Value::Null, Value::Int(3)]).unwrap();
        assert_eq!(col.dtype(), DType::Int64);
        assert_eq!(col.as_int64().unwrap().to_options(), vec![Some(1), None, Some(3)]);
    }

    #[test]
    fn test_infer_promotes_float() {
        let col = Column::from_values(vec![Value::Int(1), Value::Float(2.5)]).unwrap();
        assert_eq!(col.as_float64().unwrap().values(), &[1.0, 2.5]);
    }

    #[test]
    fn test_infer_big_uint() {
        let col = Column::from_values(vec![Value::UInt(u64::MAX), Value::Int(1)]).unwrap();
        assert_eq!(col.dtype(), DType::UInt64);
        let col = Column::from_values(vec![Value::UInt(u64::MAX), Value::Int(-1)]).unwrap();
        assert_eq!(col.dtype(), DType::Float64);
    }

    #[test]
    fn test_infer_all_null() {
        let col = Column::from_values(vec![Value::Null, Value::Null]).unwrap();
        assert_eq!(col.dtype(), DType::Float64);
        assert_eq!(col.len(), 2);
        assert_eq!(col.present_count(), 0);
    }

    #[test]
    fn test_infer_mixed_fails() {
        let err = Column::from_values(vec![Value::Int(1), "x".into()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(Column::from_values(vec![true.into(), Value::Int(0)]).is_err());
    }
}
