//! Error types for grouping and facet operations.

use thiserror::Error;

use crate::value::ValueKind;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while grouping tables or laying out facets.
///
/// Every error is fatal to the top-level call that produced it; no operation
/// returns a partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A named column does not exist in a table.
    #[error("Missing column: {0:?}")]
    MissingColumn(String),

    /// A sequence was requested from a column that is declared constant.
    #[error("Column {0:?} is constant")]
    ConstantColumn(String),

    /// A table was built with the same column name twice.
    #[error("Duplicate column: {0:?}")]
    DuplicateColumn(String),

    /// A sequence column's length disagrees with the rest of the table.
    #[error("Column {name:?} has {len} rows, table has {expected}")]
    LengthMismatch {
        /// Column name.
        name: String,
        /// Length of the offending column.
        len: usize,
        /// Row count established by earlier columns.
        expected: usize,
    },

    /// Sequences of different element kinds were combined.
    #[error("Cannot combine {left:?} column with {right:?} column")]
    KindMismatch {
        /// Kind of the first sequence.
        left: ValueKind,
        /// Kind of the conflicting sequence.
        right: ValueKind,
    },

    /// A column's values cannot be used as partition keys.
    #[error("Column {name:?} of kind {kind:?} cannot be used as a grouping key")]
    UnkeyableColumn {
        /// Column name.
        name: String,
        /// Kind of the column's values.
        kind: ValueKind,
    },

    /// A sequence of a kind without an ordering was sorted.
    #[error("Values of kind {0:?} have no ordering")]
    Unorderable(ValueKind),

    /// Groups sharing a parent were not listed contiguously.
    #[error("Groups under {parent} are not contiguous")]
    NonContiguousGroups {
        /// Diagnostic path of the parent group.
        parent: String,
    },
}
