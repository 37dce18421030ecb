//! Error type shared by every kernel and the table façade.

use crate::table::DType;

pub type Result<T> = std::result::Result<T, TableError>;

/// Coarse category of a [`TableError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced column does not exist or has the wrong shape.
    Schema,
    /// Row domains (or dense lengths) of the participants disagree.
    DomainMismatch,
    /// Operand or fill value types cannot be combined.
    Type,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("column not found: {name}")]
    MissingColumn { name: String },

    #[error("column {name} has type {actual}, expected {expected}")]
    ColumnTypeConflict {
        name: String,
        expected: DType,
        actual: DType,
    },

    #[error("row domain mismatch: expected {expected} rows, got {actual}")]
    DomainMismatch { expected: usize, actual: usize },

    #[error("dense buffer holds {values} values but presence has {present} rows set")]
    DenseLengthMismatch { values: usize, present: usize },

    #[error("mask has {mask} entries but column has {present} present rows")]
    MaskLengthMismatch { mask: usize, present: usize },

    #[error("row reference {row} is outside a domain of {len} rows")]
    RowOutOfBounds { row: i64, len: usize },

    #[error("duplicate column: {name}")]
    DuplicateColumn { name: String },

    #[error("operator {op} does not accept {left} and {right} operands")]
    UnsupportedOperands {
        op: &'static str,
        left: DType,
        right: DType,
    },

    #[error("column {name} is {left} on the left but {right} on the right")]
    IncompatibleColumns {
        name: String,
        left: DType,
        right: DType,
    },

    #[error("fill value of type {value} does not match column type {column}")]
    FillTypeMismatch { column: DType, value: &'static str },

    #[error("cannot infer a column type from mixed {first} and {second} values")]
    MixedTypes {
        first: &'static str,
        second: &'static str,
    },

    #[error("integer division by zero")]
    DivisionByZero,

    #[error("integer overflow in {op}")]
    IntegerOverflow { op: &'static str },
}

impl TableError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TableError::MissingColumn { .. }
            | TableError::ColumnTypeConflict { .. }
            | TableError::DuplicateColumn { .. } => ErrorKind::Schema,
            TableError::DomainMismatch { .. }
            | TableError::DenseLengthMismatch { .. }
            | TableError::MaskLengthMismatch { .. }
            | TableError::RowOutOfBounds { .. } => ErrorKind::DomainMismatch,
            TableError::UnsupportedOperands { .. }
            | TableError::IncompatibleColumns { .. }
            | TableError::FillTypeMismatch { .. }
            | TableError::MixedTypes { .. }
            | TableError::DivisionByZero
            | TableError::IntegerOverflow { .. } => ErrorKind::Type,
        }
    }

    pub(crate) fn missing(name: &str) -> Self {
        TableError::MissingColumn {
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(TableError::missing("a").kind(), ErrorKind::Schema);
        assert_eq!(
            TableError::DomainMismatch {
                expected: 3,
                actual: 4
            }
            .kind(),
            ErrorKind::DomainMismatch
        );
        assert_eq!(TableError::DivisionByZero.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_display() {
        let err = TableError::ColumnTypeConflict {
            name: "B".to_string(),
            expected: DType::Str,
            actual: DType::Float64,
        };
        assert_eq!(err.to_string(), "column B has type float64, expected str");
    }
}
