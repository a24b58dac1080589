//! Columnar tables.
//!
//! A [`Table`] is an ordered set of uniquely named columns. Each column is
//! either a sequence with one value per row or a constant whose single value
//! is logically repeated for every row. Tables are immutable once built.
//! Sequence columns are reference counted, so a table can be built from
//! columns of another table without copying them (see
//! [`TableBuilder::add_shared`]).

use std::borrow::Cow;
use std::sync::Arc;

use crate::column::Column;
use crate::error::{Error, Result};
use crate::value::{Value, ValueKind};

/// Storage for one named column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// One value per row.
    Seq(Arc<Column>),
    /// A single value repeated for every row.
    Const(Value),
}

impl ColumnData {
    /// The element kind of the column.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            ColumnData::Seq(col) => col.kind(),
            ColumnData::Const(v) => v.kind(),
        }
    }
}

/// An immutable columnar table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    data: Vec<ColumnData>,
    len: usize,
}

impl Table {
    /// Create a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a table.
    #[must_use]
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// Column names in table order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.names
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Storage of a column, if present.
    #[must_use]
    pub fn data(&self, name: &str) -> Option<&ColumnData> {
        self.position(name).map(|i| &self.data[i])
    }

    /// The value of a constant column, or `None` if the column is absent or
    /// not constant.
    #[must_use]
    pub fn get_const(&self, name: &str) -> Option<&Value> {
        match self.data(name)? {
            ColumnData::Const(v) => Some(v),
            ColumnData::Seq(_) => None,
        }
    }

    /// The sequence of a column. Constant columns are materialized to the
    /// table's row count.
    pub fn column(&self, name: &str) -> Result<Cow<'_, Column>> {
        match self.data(name) {
            Some(ColumnData::Seq(col)) => Ok(Cow::Borrowed(col.as_ref())),
            Some(ColumnData::Const(v)) => Ok(Cow::Owned(Column::repeat(v, self.len))),
            None => Err(Error::MissingColumn(name.to_string())),
        }
    }

    /// The sequence of a non-constant column.
    pub fn must_column(&self, name: &str) -> Result<&Column> {
        match self.data(name) {
            Some(ColumnData::Seq(col)) => Ok(col.as_ref()),
            Some(ColumnData::Const(_)) => Err(Error::ConstantColumn(name.to_string())),
            None => Err(Error::MissingColumn(name.to_string())),
        }
    }

    /// Column names paired with their storage, in table order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &ColumnData)> + '_ {
        self.names.iter().map(String::as_str).zip(&self.data)
    }

    /// The values of one row, in column order.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<Vec<Value>> {
        if row >= self.len {
            return None;
        }
        self.data
            .iter()
            .map(|d| match d {
                ColumnData::Seq(col) => col.get(row),
                ColumnData::Const(v) => Some(v.clone()),
            })
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// Incremental [`Table`] constructor.
///
/// Errors are deferred to [`TableBuilder::done`] so columns can be chained.
#[derive(Debug, Default)]
pub struct TableBuilder {
    names: Vec<String>,
    data: Vec<ColumnData>,
    len: Option<usize>,
    error: Option<Error>,
}

impl TableBuilder {
    /// Add a sequence column.
    #[must_use]
    pub fn add(self, name: &str, column: impl Into<Column>) -> Self {
        self.add_shared(name, Arc::new(column.into()))
    }

    /// Add a sequence column shared with another table.
    #[must_use]
    pub fn add_shared(mut self, name: &str, column: Arc<Column>) -> Self {
        let len = column.len();
        match self.len {
            Some(expected) if expected != len => {
                self.fail(Error::LengthMismatch {
                    name: name.to_string(),
                    len,
                    expected,
                });
            }
            _ => self.len = Some(len),
        }
        self.push(name, ColumnData::Seq(column))
    }

    /// Add a constant column.
    #[must_use]
    pub fn add_const(self, name: &str, value: impl Into<Value>) -> Self {
        self.push(name, ColumnData::Const(value.into()))
    }

    /// Fix the row count. Needed only for tables without sequence columns.
    #[must_use]
    pub fn rows(mut self, len: usize) -> Self {
        match self.len {
            Some(expected) if expected != len => {
                self.fail(Error::LengthMismatch {
                    name: String::new(),
                    len,
                    expected,
                });
            }
            _ => self.len = Some(len),
        }
        self
    }

    /// Finish the table.
    pub fn done(self) -> Result<Table> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(Table {
            names: self.names,
            data: self.data,
            len: self.len.unwrap_or(0),
        })
    }

    fn push(mut self, name: &str, data: ColumnData) -> Self {
        if self.names.iter().any(|n| n == name) {
            self.fail(Error::DuplicateColumn(name.to_string()));
        }
        self.names.push(name.to_string());
        self.data.push(data);
        self
    }

    fn fail(&mut self, err: Error) {
        self.error.get_or_insert(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::builder()
            .add("g", vec![1_i64, 1, 2, 2])
            .add("v", vec![10_i64, 20, 30, 40])
            .add_const("k", "c")
            .done()
            .unwrap()
    }

    #[test]
    fn test_table_shape() {
        let t = sample();
        assert_eq!(t.len(), 4);
        assert_eq!(t.columns(), ["g", "v", "k"]);
        assert!(t.has_column("k"));
        assert!(!t.has_column("missing"));
    }

    #[test]
    fn test_const_and_materialize() {
        let t = sample();
        assert_eq!(t.get_const("k"), Some(&Value::from("c")));
        assert_eq!(t.get_const("g"), None);
        let k = t.column("k").unwrap().into_owned();
        assert_eq!(k, Column::from(vec!["c"; 4]));
    }

    #[test]
    fn test_must_column() {
        let t = sample();
        let v = t.must_column("v").unwrap();
        assert_eq!(v, &Column::from(vec![10_i64, 20, 30, 40]));

        let err = t.must_column("k").unwrap_err();
        assert_eq!(err, Error::ConstantColumn("k".into()));
        let err = t.must_column("z").unwrap_err();
        assert_eq!(err, Error::MissingColumn("z".into()));
    }

    #[test]
    fn test_duplicate_column() {
        let err = Table::builder()
            .add("a", vec![1_i64])
            .add_const("a", 2_i64)
            .done()
            .unwrap_err();
        assert_eq!(err, Error::DuplicateColumn("a".into()));
    }

    #[test]
    fn test_length_mismatch() {
        let err = Table::builder()
            .add("a", vec![1_i64])
            .add("b", vec![1_i64, 2])
            .done()
            .unwrap_err();
        let expected = Error::LengthMismatch {
            name: "b".into(),
            len: 2,
            expected: 1,
        };
        assert_eq!(err, expected);
    }

    #[test]
    fn test_constant_only_table_rows() {
        let t = Table::builder()
            .add_const("a", 1_i64)
            .rows(3)
            .done()
            .unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.row(2), Some(vec![Value::Int(1)]));
        assert_eq!(t.row(3), None);
    }

    #[test]
    fn test_add_shared_reuses_column() {
        let t = sample();
        let Some(ColumnData::Seq(v)) = t.data("v") else {
            panic!("Expected sequence column");
        };
        let copy = Table::builder()
            .add_shared("v", Arc::clone(v))
            .done()
            .unwrap();
        let Some(ColumnData::Seq(shared)) = copy.data("v") else {
            panic!("Expected sequence column");
        };
        assert!(Arc::ptr_eq(v, shared));
    }

    #[test]
    fn test_empty_table() {
        let t = Table::new();
        assert!(t.is_empty());
        assert!(t.columns().is_empty());
    }
}
