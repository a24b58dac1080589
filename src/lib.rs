//! # facet-grid
//!
//! Hierarchical grouping over columnar tables, and faceted (small-multiple)
//! plot layout built on it.
//!
//! Tables are partitioned into a [`Grouping`](group::Grouping) keyed by
//! [`GroupId`](group::GroupId)s, nodes of an append-only identity tree.
//! [`group_by`](group::group_by) splits groups by column values,
//! [`ungroup`](group::ungroup) and [`flatten`](group::flatten) merge them
//! back. Facets use the same machinery to place each group in a subplot of
//! a rectangular grid, sharing or splitting axis scales per band.
//!
//! ## Quick Start
//!
//! ```rust
//! use facet_grid::prelude::*;
//!
//! let table = Table::builder()
//!     .add("g", vec![1_i64, 1, 2, 2])
//!     .add("v", vec![10_i64, 20, 30, 40])
//!     .done()?;
//!
//! let mut plot = Plot::new(table);
//! FacetX(FacetCommon::new("g").split_x_scales(true)).apply(&mut plot)?;
//! assert_eq!(plot.grid_size(), (2, 1));
//! # Ok::<(), facet_grid::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialize and deserialize facet configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Data Modules
// ============================================================================

/// Runtime cell values and their kinds.
pub mod value;

/// Typed column sequences and gather/concat/sort primitives.
pub mod column;

/// Immutable columnar tables.
pub mod table;

// ============================================================================
// Grouping and Layout
// ============================================================================

/// Group identity tree and table regrouping.
pub mod group;

/// Subplot and band trees for facet grids.
pub mod layout;

/// Axis scales and their binding to groups.
pub mod scale;

/// Grammar of Graphics faceting.
pub mod grammar;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for facet-grid operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and functions for convenient imports.
///
/// ```rust
/// use facet_grid::prelude::*;
/// ```
pub mod prelude {
    pub use crate::column::Column;
    pub use crate::error::{Error, Result};
    pub use crate::grammar::{Facet, FacetCommon, FacetX, FacetY, Plot};
    pub use crate::group::{flatten, group_by, ungroup, GroupId, GroupTree, Grouping};
    pub use crate::layout::{Direction, Layout, Subplot, SubplotId};
    pub use crate::scale::{Axis, LinearScale, Scaler};
    pub use crate::table::{Table, TableBuilder};
    pub use crate::value::{Value, ValueKind};
}
