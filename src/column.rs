//! Typed column sequences.
//!
//! A [`Column`] is a homogeneous sequence of values stored in a typed vector
//! per [`ValueKind`]. The operations here are the element-type-independent
//! primitives grouping is built from: order-preserving gather
//! ([`Column::multi_index`]), concatenation ([`concat`]), constant
//! materialization ([`Column::repeat`]) and in-place sorting.

use crate::error::{Error, Result};
use crate::value::{cmp_f64, Opaque, Value, ValueKind};

/// A homogeneous sequence of values.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Boolean values.
    Bool(Vec<bool>),
    /// Integer values.
    Int(Vec<i64>),
    /// Float values.
    Float(Vec<f64>),
    /// Text values.
    Text(Vec<String>),
    /// Opaque values.
    Opaque(Vec<Opaque>),
}

fn gather<T: Clone>(seq: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| seq[i].clone()).collect()
}

impl Column {
    /// The element kind of this column.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Column::Bool(_) => ValueKind::Bool,
            Column::Int(_) => ValueKind::Int,
            Column::Float(_) => ValueKind::Float,
            Column::Text(_) => ValueKind::Text,
            Column::Opaque(_) => ValueKind::Opaque,
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Column::Bool(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::Opaque(v) => v.len(),
        }
    }

    /// Whether the column has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the value at `row`.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<Value> {
        match self {
            Column::Bool(v) => v.get(row).map(|&b| Value::Bool(b)),
            Column::Int(v) => v.get(row).map(|&n| Value::Int(n)),
            Column::Float(v) => v.get(row).map(|&n| Value::Float(n)),
            Column::Text(v) => v.get(row).map(|s| Value::Text(s.clone())),
            Column::Opaque(v) => v.get(row).map(|o| Value::Opaque(o.clone())),
        }
    }

    /// Iterate over the column's values.
    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).filter_map(move |row| self.get(row))
    }

    /// A column of `n` copies of `value`.
    #[must_use]
    pub fn repeat(value: &Value, n: usize) -> Self {
        match value {
            Value::Bool(b) => Column::Bool(vec![*b; n]),
            Value::Int(x) => Column::Int(vec![*x; n]),
            Value::Float(x) => Column::Float(vec![*x; n]),
            Value::Text(s) => Column::Text(vec![s.clone(); n]),
            Value::Opaque(o) => Column::Opaque(vec![o.clone(); n]),
        }
    }

    /// Build a column of kind `kind` from individual values.
    pub fn from_values(kind: ValueKind, values: impl IntoIterator<Item = Value>) -> Result<Self> {
        let mut out = Column::empty(kind);
        for value in values {
            match (&mut out, value) {
                (Column::Bool(v), Value::Bool(b)) => v.push(b),
                (Column::Int(v), Value::Int(n)) => v.push(n),
                (Column::Float(v), Value::Float(n)) => v.push(n),
                (Column::Text(v), Value::Text(s)) => v.push(s),
                (Column::Opaque(v), Value::Opaque(o)) => v.push(o),
                (_, value) => {
                    return Err(Error::KindMismatch {
                        left: kind,
                        right: value.kind(),
                    });
                }
            }
        }
        Ok(out)
    }

    /// An empty column of kind `kind`.
    #[must_use]
    pub fn empty(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Bool => Column::Bool(Vec::new()),
            ValueKind::Int => Column::Int(Vec::new()),
            ValueKind::Float => Column::Float(Vec::new()),
            ValueKind::Text => Column::Text(Vec::new()),
            ValueKind::Opaque => Column::Opaque(Vec::new()),
        }
    }

    /// Gather the elements at `indices`, in the order given.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    #[must_use]
    pub fn multi_index(&self, indices: &[usize]) -> Self {
        match self {
            Column::Bool(v) => Column::Bool(gather(v, indices)),
            Column::Int(v) => Column::Int(gather(v, indices)),
            Column::Float(v) => Column::Float(gather(v, indices)),
            Column::Text(v) => Column::Text(gather(v, indices)),
            Column::Opaque(v) => Column::Opaque(gather(v, indices)),
        }
    }

    /// Append the elements of `other`.
    pub fn extend_from(&mut self, other: &Column) -> Result<()> {
        match (self, other) {
            (Column::Bool(a), Column::Bool(b)) => a.extend_from_slice(b),
            (Column::Int(a), Column::Int(b)) => a.extend_from_slice(b),
            (Column::Float(a), Column::Float(b)) => a.extend_from_slice(b),
            (Column::Text(a), Column::Text(b)) => a.extend_from_slice(b),
            (Column::Opaque(a), Column::Opaque(b)) => a.extend_from_slice(b),
            (a, b) => {
                return Err(Error::KindMismatch {
                    left: a.kind(),
                    right: b.kind(),
                });
            }
        }
        Ok(())
    }

    /// Sort the column ascending in place.
    ///
    /// Floats sort with NaN last. Opaque columns have no ordering.
    pub fn sort(&mut self) -> Result<()> {
        match self {
            Column::Bool(v) => v.sort_unstable(),
            Column::Int(v) => v.sort_unstable(),
            Column::Float(v) => v.sort_by(|a, b| cmp_f64(*a, *b)),
            Column::Text(v) => v.sort(),
            Column::Opaque(_) => return Err(Error::Unorderable(ValueKind::Opaque)),
        }
        Ok(())
    }
}

/// Concatenate `first` followed by each of `rest`.
///
/// All columns must have the same kind.
pub fn concat(first: &Column, rest: &[&Column]) -> Result<Column> {
    let mut out = first.clone();
    for col in rest {
        out.extend_from(col)?;
    }
    Ok(out)
}

impl From<Vec<bool>> for Column {
    fn from(v: Vec<bool>) -> Self {
        Column::Bool(v)
    }
}

impl From<Vec<i64>> for Column {
    fn from(v: Vec<i64>) -> Self {
        Column::Int(v)
    }
}

impl From<Vec<f64>> for Column {
    fn from(v: Vec<f64>) -> Self {
        Column::Float(v)
    }
}

impl From<Vec<String>> for Column {
    fn from(v: Vec<String>) -> Self {
        Column::Text(v)
    }
}

impl From<Vec<&str>> for Column {
    fn from(v: Vec<&str>) -> Self {
        Column::Text(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<Opaque>> for Column {
    fn from(v: Vec<Opaque>) -> Self {
        Column::Opaque(v)
    }
}
