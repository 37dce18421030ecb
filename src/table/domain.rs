//! Row-domain handle

use crate::error::{Result, TableError};

/// The logical row count shared by every column of a table.
///
/// Columns derive their domain from their presence bitmap; kernels that
/// combine two columns (or a column and a table) compare domains up front
/// instead of relying on the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct RowDomain(usize);

impl RowDomain {
    pub const fn new(len: usize) -> Self {
        RowDomain(len)
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn ensure_same(self, other: RowDomain) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(TableError::DomainMismatch {
                expected: self.0,
                actual: other.0,
            })
        }
    }

    /// Validate a row reference; `Ok(None)` for the no-source sentinel
    pub fn resolve(self, row: i64) -> Result<Option<usize>> {
        if row < 0 {
            return Ok(None);
        }
        match usize::try_from(row) {
            Ok(r) if r < self.0 => Ok(Some(r)),
            _ => Err(TableError::RowOutOfBounds { row, len: self.0 }),
        }
    }
}
