//! Faceting for Grammar of Graphics.
//!
//! Creates small multiples by splitting a plot's data on the values of a
//! column. Facets compose: if an earlier facet already divided the plot into
//! subplots, a later facet subdivides each of them, keeping the grid
//! rectangular.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::Result;
use crate::group::{GroupId, GroupingBuilder, Label};
use crate::layout::{BandId, Direction, SubplotId};
use crate::scale::{Axis, ScaleId};
use crate::value::Value;

use super::plot::Plot;

/// Builds facet label text from a column value.
pub type Labeler = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Configuration shared by [`FacetX`] and [`FacetY`].
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FacetCommon {
    /// Column to facet by. Each distinct value becomes a separate subplot,
    /// in value order if the column is orderable and first-appearance order
    /// otherwise.
    pub col: String,

    /// Give each band created by this facet (column for X, row for Y) its
    /// own X scale. When false, subplots keep sharing X scales.
    ///
    /// Combined with composition this controls sharing precisely. For an
    /// X facet followed by a Y facet:
    ///
    /// - all subplots share scales: both flags false in both facets;
    /// - every subplot is independent: both flags true in the Y facet;
    /// - X shared per column and Y per row: `split_x_scales` in the X facet
    ///   and `split_y_scales` in the Y facet.
    #[cfg_attr(feature = "serde", serde(default))]
    pub split_x_scales: bool,

    /// The equivalent of `split_x_scales` for Y scales.
    #[cfg_attr(feature = "serde", serde(default))]
    pub split_y_scales: bool,

    /// Label text for facet values. Defaults to the value's `Display`.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub labeler: Option<Labeler>,
}

impl fmt::Debug for FacetCommon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetCommon")
            .field("col", &self.col)
            .field("split_x_scales", &self.split_x_scales)
            .field("split_y_scales", &self.split_y_scales)
            .field("labeler", &self.labeler.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl FacetCommon {
    /// Facet by `col` with shared scales and default labels.
    #[must_use]
    pub fn new(col: &str) -> Self {
        Self {
            col: col.to_string(),
            ..Self::default()
        }
    }

    /// Set whether X scales are split per band.
    #[must_use]
    pub fn split_x_scales(mut self, split: bool) -> Self {
        self.split_x_scales = split;
        self
    }

    /// Set whether Y scales are split per band.
    #[must_use]
    pub fn split_y_scales(mut self, split: bool) -> Self {
        self.split_y_scales = split;
        self
    }

    /// Set the label function.
    #[must_use]
    pub fn labeler(mut self, f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.labeler = Some(Arc::new(f));
        self
    }

    fn label(&self, value: &Value) -> String {
        match &self.labeler {
            Some(f) => f(value),
            None => value.to_string(),
        }
    }

    fn apply(&self, plot: &mut Plot, dir: Direction) -> Result<()> {
        let grouped = plot.group_by(&[self.col.as_str()])?;

        // Each group's facet value, from the label group_by gave it.
        let entries: Vec<(GroupId, Value)> = grouped
            .ids()
            .filter_map(|gid| match plot.groups().label(gid) {
                Label::Value(v) => Some((gid, v.clone())),
                _ => None,
            })
            .collect();

        // Earlier facets may have split the plot already, so the same value
        // can appear in several groups.
        let mut index: HashMap<Value, usize> = HashMap::new();
        let mut distinct: Vec<Value> = Vec::new();
        for (_, val) in &entries {
            if !index.contains_key(val) {
                index.insert(val.clone(), distinct.len());
                distinct.push(val.clone());
            }
        }
        if let Some(kind) = distinct.first().map(Value::kind) {
            if kind.can_order() && distinct.iter().all(|v| v.kind() == kind) {
                let mut sorted = Column::from_values(kind, distinct.iter().cloned())?;
                sorted.sort()?;
                distinct = sorted.iter().collect();
                for (i, val) in distinct.iter().enumerate() {
                    index.insert(val.clone(), i);
                }
            }
        }
        let labels: Vec<String> = distinct.iter().map(|v| self.label(v)).collect();
        log::debug!(
            "facet {dir:?} by {:?}: {} values {labels:?}",
            self.col,
            distinct.len()
        );

        // Split each owning subplot and its band once, then move every group
        // into its new subplot.
        let mut subplots: HashMap<SubplotId, Vec<SubplotId>> = HashMap::new();
        let mut bands: HashMap<BandId, Vec<BandId>> = HashMap::new();
        let mut scales: HashMap<(BandId, ScaleId), ScaleId> = HashMap::new();
        let mut ndata = GroupingBuilder::new();
        for (gid, val) in &entries {
            let sub = plot.subplot_of(*gid);

            let band = dir.band_of(plot.layout().subplot(sub));
            let nbands = match bands.get(&band) {
                Some(nbands) => nbands.clone(),
                None => {
                    let nbands = plot.layout_mut().split_band(band, &labels);
                    bands.insert(band, nbands.clone());
                    nbands
                }
            };

            let nsubplots = subplots
                .entry(sub)
                .or_insert_with(|| plot.layout_mut().split_subplot(sub, dir, &nbands));

            let i = index[val];
            let nsubplot = nsubplots[i];
            let parent = plot.groups().parent(*gid);
            let ngid = plot.groups_mut().extend(parent, nsubplot);
            if let Some(table) = grouped.table(*gid) {
                ndata.add(ngid, Arc::clone(table));
            }

            // There may already be several scales within one band, so each
            // distinct scale in a band is split separately.
            let nband = nbands[i];
            for (axis, split) in [
                (Axis::X, self.split_x_scales),
                (Axis::Y, self.split_y_scales),
            ] {
                if !split {
                    continue;
                }
                let old = plot.get_scale(axis, *gid);
                let new = match scales.get(&(nband, old)) {
                    Some(&new) => new,
                    None => {
                        let new = plot.clone_scale(old);
                        scales.insert((nband, old), new);
                        new
                    }
                };
                plot.set_scale_at(axis, new, ngid);
            }
        }
        log::debug!(
            "facet {dir:?} by {:?}: split {} subplots",
            self.col,
            subplots.len()
        );

        plot.set_data(ndata.done());
        Ok(())
    }
}

/// Splits a plot into columns.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FacetX(pub FacetCommon);

/// Splits a plot into rows.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FacetY(pub FacetCommon);

impl FacetX {
    /// Facet into columns by `col`.
    #[must_use]
    pub fn new(col: &str) -> Self {
        Self(FacetCommon::new(col))
    }

    /// Apply to `plot`, replacing its data with the faceted grouping.
    pub fn apply(&self, plot: &mut Plot) -> Result<()> {
        self.0.apply(plot, Direction::X)
    }
}

impl FacetY {
    /// Facet into rows by `col`.
    #[must_use]
    pub fn new(col: &str) -> Self {
        Self(FacetCommon::new(col))
    }

    /// Apply to `plot`, replacing its data with the faceted grouping.
    pub fn apply(&self, plot: &mut Plot) -> Result<()> {
        self.0.apply(plot, Direction::Y)
    }
}

impl From<FacetCommon> for FacetX {
    fn from(common: FacetCommon) -> Self {
        Self(common)
    }
}

impl From<FacetCommon> for FacetY {
    fn from(common: FacetCommon) -> Self {
        Self(common)
    }
}

/// Faceting specification.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Facet {
    /// No faceting.
    #[default]
    None,
    /// Facet into a row of panels (one column per value).
    X(FacetX),
    /// Facet into a column of panels (one row per value).
    Y(FacetY),
    /// Facet into a grid: columns first, then rows.
    Grid {
        /// Column facet.
        x: FacetX,
        /// Row facet.
        y: FacetY,
    },
}

impl Facet {
    /// No faceting.
    #[must_use]
    pub fn none() -> Self {
        Facet::None
    }

    /// Facet into columns by `col`.
    #[must_use]
    pub fn x(col: &str) -> Self {
        Facet::X(FacetX::new(col))
    }

    /// Facet into rows by `col`.
    #[must_use]
    pub fn y(col: &str) -> Self {
        Facet::Y(FacetY::new(col))
    }

    /// Facet into a grid with columns by `x` and rows by `y`.
    #[must_use]
    pub fn grid(x: &str, y: &str) -> Self {
        Facet::Grid {
            x: FacetX::new(x),
            y: FacetY::new(y),
        }
    }

    /// Apply to `plot`.
    pub fn apply(&self, plot: &mut Plot) -> Result<()> {
        match self {
            Facet::None => Ok(()),
            Facet::X(f) => f.apply(plot),
            Facet::Y(f) => f.apply(plot),
            Facet::Grid { x, y } => {
                x.apply(plot)?;
                y.apply(plot)
            }
        }
    }
}
