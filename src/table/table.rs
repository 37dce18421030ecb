//! Table structure (collection of named sparse columns over one row domain)

use super::{Column, DType, RowDomain, SparseColumn, Value};
use crate::builtins::{
    fill_absent, fillna, merge, merge_join, sort_by_column, FillDirection, JoinOptions,
};
use crate::error::{Result, TableError};

/// A table is a collection of named, typed columns sharing one row domain
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    domain: RowDomain,
}

impl Table {
    /// Empty table; the first inserted column fixes the row count
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table over `rows` rows
    pub fn with_rows(rows: usize) -> Self {
        Self {
            names: Vec::new(),
            columns: Vec::new(),
            domain: RowDomain::new(rows),
        }
    }

    /// Build from `(name, column)` pairs; all columns must share a domain
    pub fn from_columns<N: Into<String>>(columns: Vec<(N, Column)>) -> Result<Self> {
        let mut table = Self::new();
        for (name, column) in columns {
            table.insert_column(name, column)?;
        }
        Ok(table)
    }

    /// Build from row-ordered cells, inferring each column's dtype.
    ///
    /// `Value::Null` cells become absent rows.
    pub fn from_values<N: Into<String>>(columns: Vec<(N, Vec<Value>)>) -> Result<Self> {
        let mut table = Self::new();
        for (name, cells) in columns {
            table.insert_column(name, Column::from_values(cells)?)?;
        }
        Ok(table)
    }

    pub fn domain(&self) -> RowDomain {
        self.domain
    }

    pub fn row_count(&self) -> usize {
        self.domain.len()
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.get(name).ok_or_else(|| TableError::missing(name))
    }

    /// `(name, column)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    fn check_domain(&mut self, column: &Column) -> Result<()> {
        // A table with no columns and no rows adopts the first column's length
        if self.columns.is_empty() && self.domain.is_empty() {
            self.domain = column.domain();
            return Ok(());
        }
        self.domain.ensure_same(column.domain())
    }

    /// Append a new column
    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(TableError::DuplicateColumn { name });
        }
        self.check_domain(&column)?;
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Swap in a new version of an existing column, returning the old one
    pub fn replace_column(&mut self, name: &str, column: Column) -> Result<Column> {
        let i = self.position(name).ok_or_else(|| TableError::missing(name))?;
        self.domain.ensure_same(column.domain())?;
        Ok(std::mem::replace(&mut self.columns[i], column))
    }

    pub fn remove_column(&mut self, name: &str) -> Result<Column> {
        let i = self.position(name).ok_or_else(|| TableError::missing(name))?;
        self.names.remove(i);
        Ok(self.columns.remove(i))
    }

    /// Column `name` with dtype `dtype`, inserted all-absent when missing.
    ///
    /// An existing column of another dtype is a schema error.
    pub fn required_column(&mut self, name: &str, dtype: DType) -> Result<&Column> {
        let i = match self.position(name) {
            Some(i) => {
                let actual = self.columns[i].dtype();
                if actual != dtype {
                    return Err(TableError::ColumnTypeConflict {
                        name: name.to_string(),
                        expected: dtype,
                        actual,
                    });
                }
                i
            }
            None => {
                self.insert_column(name, Column::all_absent(dtype, self.row_count()))?;
                self.columns.len() - 1
            }
        };
        Ok(&self.columns[i])
    }

    /// Set the absent rows of column `name` to `value`.
    ///
    /// A missing column is created with `value`'s natural dtype.
    pub fn fill_column(&mut self, name: &str, value: &Value) -> Result<()> {
        match self.position(name) {
            Some(i) => {
                self.columns[i] = fill_absent(&self.columns[i], value)?;
            }
            None => {
                let dtype = value.natural_dtype().unwrap_or(DType::Float64);
                let filled = fill_absent(&Column::all_absent(dtype, self.row_count()), value)?;
                self.insert_column(name, filled)?;
            }
        }
        Ok(())
    }

    /// Forward/backward fill column `name` in place
    pub fn fillna(
        &mut self,
        name: &str,
        direction: FillDirection,
        fill_value: Option<&Value>,
    ) -> Result<()> {
        let i = self.position(name).ok_or_else(|| TableError::missing(name))?;
        self.columns[i] = fillna(&self.columns[i], direction, fill_value)?;
        Ok(())
    }

    /// Keep, in every column, the present rows where `predicate` is true
    pub fn filter(&self, predicate: &SparseColumn<bool>) -> Result<Table> {
        self.domain.ensure_same(predicate.domain())?;
        let mut filtered = Table::with_rows(self.row_count());
        for (name, column) in self.iter() {
            filtered.insert_column(name, column.filter_by(predicate)?)?;
        }
        Ok(filtered)
    }

    /// New table with every column reordered by column `key`
    pub fn sort_by(&self, key: &str) -> Result<Table> {
        sort_by_column(self, key)
    }

    /// Outer merge with `other` on column `key`
    pub fn merge(&self, other: &Table, key: &str) -> Result<Table> {
        merge(self, other, key)
    }

    /// Sorted merge join with `other` on column `key`
    pub fn merge_join(&self, other: &Table, key: &str, options: &JoinOptions) -> Result<Table> {
        merge_join(self, other, key, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> Table {
        Table::from_values(vec![
            ("a", vec![Value::Int(1), Value::Null, Value::Int(3)]),
            ("b", vec!["x".into(), "y".into(), Value::Null]),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_values() {
        let t = sample();
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.col_count(), 2);
        assert_eq!(t.column("a").unwrap().dtype(), DType::Int64);
        assert_eq!(t.column("b").unwrap().dtype(), DType::Str);
        assert_eq!(t.column("a").unwrap().present_count(), 2);
    }

    #[test]
    fn test_unequal_lengths() {
        let err = Table::from_values(vec![
            ("a", vec![Value::Int(1)]),
            ("b", vec![Value::Int(1), Value::Int(2)]),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DomainMismatch);
    }

    #[test]
    fn test_lookup_and_duplicates() {
        let mut t = sample();
        assert!(t.contains("a"));
        assert_eq!(t.column("zz").unwrap_err().kind(), ErrorKind::Schema);

        let err = t
            .insert_column("a", Column::all_absent(DType::Bool, 3))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_replace_and_remove() {
        let mut t = sample();
        let old = t
            .replace_column("a", Column::all_absent(DType::Float64, 3))
            .unwrap();
        assert_eq!(old.dtype(), DType::Int64);
        assert!(t
            .replace_column("a", Column::all_absent(DType::Float64, 4))
            .is_err());

        t.remove_column("a").unwrap();
        assert_eq!(t.names(), &["b".to_string()]);
        assert!(t.remove_column("a").is_err());
    }

    #[test]
    fn test_required_column() {
        let mut t = sample();
        let c = t.required_column("c", DType::Float64).unwrap();
        assert_eq!(c.present_count(), 0);
        assert_eq!(c.len(), 3);

        assert!(t.required_column("a", DType::Int64).is_ok());
        let err = t.required_column("a", DType::Str).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_fill_column() {
        let mut t = sample();
        t.fill_column("a", &Value::Int(0)).unwrap();
        assert_eq!(
            t.column("a").unwrap().to_values(),
            vec![Value::Int(1), Value::Int(0), Value::Int(3)]
        );

        t.fill_column("flag", &Value::Bool(true)).unwrap();
        assert_eq!(t.column("flag").unwrap().dtype(), DType::Bool);
        assert_eq!(t.column("flag").unwrap().present_count(), 3);

        assert_eq!(
            t.fill_column("b", &Value::Int(1)).unwrap_err().kind(),
            ErrorKind::Type
        );
    }

    #[test]
    fn test_filter() {
        let t = sample();
        let predicate = SparseColumn::dense(vec![true, true, false]);
        let f = t.filter(&predicate).unwrap();
        assert_eq!(f.row_count(), 3);
        assert_eq!(
            f.column("a").unwrap().to_values(),
            vec![Value::Int(1), Value::Null, Value::Null]
        );
        assert_eq!(
            f.column("b").unwrap().to_values(),
            vec!["x".into(), "y".into(), Value::Null]
        );
    }
}
