//! Grammar of Graphics faceting.
//!
//! Provides the plot-facing layer on top of the grouping engine: a [`Plot`]
//! owning grouped data, layout and scales, and facet operations that
//! subdivide it into a grid of small multiples.
//!
//! # Example
//!
//! ```rust
//! use facet_grid::grammar::{Facet, Plot};
//! use facet_grid::table::Table;
//!
//! let table = Table::builder()
//!     .add("species", vec!["a", "b", "a", "b"])
//!     .add("site", vec!["n", "n", "s", "s"])
//!     .add("mass", vec![1.0, 2.0, 3.0, 4.0])
//!     .done()
//!     .unwrap();
//!
//! let mut plot = Plot::new(table);
//! plot.facet(&Facet::grid("species", "site")).unwrap();
//! assert_eq!(plot.grid_size(), (2, 2));
//! ```
//!
//! # References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.
//! - Wickham, H. (2010). "A Layered Grammar of Graphics." Journal of Computational
//!   and Graphical Statistics.

mod facet;
mod plot;

pub use facet::{Facet, FacetCommon, FacetX, FacetY, Labeler};
pub use plot::Plot;
