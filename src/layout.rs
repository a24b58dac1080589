//! Facet grid layout.
//!
//! A [`Layout`] holds two append-only trees. Subplots are rectangular regions
//! of the plot grid addressed by `(x, y)`; the root subplot is the whole,
//! unfaceted plot at `(0, 0)`. Bands are strips of subplots (a column for a
//! vertical band, a row for a horizontal band) that carry a facet label and
//! may share an axis scale. Faceting splits subplots and bands into children;
//! nothing is ever removed or modified.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies a [`Subplot`] in a [`Layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubplotId(usize);

impl SubplotId {
    /// The whole, unfaceted plot.
    pub const ROOT: Self = Self(0);

    /// Position of this subplot in its layout.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Identifies a [`Band`] in a [`Layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BandId(usize);

impl BandId {
    /// The unlabeled band spanning the whole plot.
    pub const ROOT: Self = Self(0);

    /// Position of this band in its layout.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Direction a facet splits the plot in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Split into columns.
    X,
    /// Split into rows.
    Y,
}

impl Direction {
    /// The band of `sub` that a split in this direction subdivides: the
    /// vertical band for X, the horizontal band for Y.
    #[must_use]
    pub fn band_of(self, sub: &Subplot) -> BandId {
        match self {
            Direction::X => sub.v_band,
            Direction::Y => sub.h_band,
        }
    }
}

/// One rectangular region of the plot grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subplot {
    /// The subplot this one was split from.
    pub parent: SubplotId,
    /// Column, counting from the left.
    pub x: usize,
    /// Row, counting from the top.
    pub y: usize,
    /// Column strip this subplot belongs to.
    pub v_band: BandId,
    /// Row strip this subplot belongs to.
    pub h_band: BandId,
}

impl fmt::Display for Subplot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.x, self.y)
    }
}

/// A row or column strip of subplots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Band {
    /// The band this one was split from.
    pub parent: BandId,
    /// Facet label text.
    pub label: String,
}

/// Arena of subplots and bands.
///
/// # Panics
///
/// Methods taking an id panic if the id was issued by another layout with
/// more nodes.
#[derive(Debug, Clone)]
pub struct Layout {
    subplots: Vec<Subplot>,
    bands: Vec<Band>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    /// A layout with only the root subplot and root band.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subplots: vec![Subplot {
                parent: SubplotId::ROOT,
                x: 0,
                y: 0,
                v_band: BandId::ROOT,
                h_band: BandId::ROOT,
            }],
            bands: vec![Band {
                parent: BandId::ROOT,
                label: String::new(),
            }],
        }
    }

    /// Look up a subplot.
    #[must_use]
    pub fn subplot(&self, id: SubplotId) -> &Subplot {
        &self.subplots[id.0]
    }

    /// Look up a band.
    #[must_use]
    pub fn band(&self, id: BandId) -> &Band {
        &self.bands[id.0]
    }

    /// Every subplot ever created, in creation order.
    pub fn subplots(&self) -> impl Iterator<Item = (SubplotId, &Subplot)> + '_ {
        self.subplots
            .iter()
            .enumerate()
            .map(|(i, s)| (SubplotId(i), s))
    }

    /// Number of subplots ever created, including the root.
    #[must_use]
    pub fn subplot_count(&self) -> usize {
        self.subplots.len()
    }

    /// Number of bands ever created, including the root.
    #[must_use]
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Split `band` into one child per label.
    pub fn split_band(&mut self, band: BandId, labels: &[String]) -> Vec<BandId> {
        labels
            .iter()
            .map(|label| {
                self.bands.push(Band {
                    parent: band,
                    label: label.clone(),
                });
                BandId(self.bands.len() - 1)
            })
            .collect()
    }

    /// Split `sub` into one child per entry of `bands` along `dir`.
    ///
    /// Child `i` keeps the parent's position and band on the other axis; on
    /// the split axis it sits at `parent * n + i` and belongs to `bands[i]`,
    /// where `n` is `bands.len()`.
    pub fn split_subplot(
        &mut self,
        sub: SubplotId,
        dir: Direction,
        bands: &[BandId],
    ) -> Vec<SubplotId> {
        let parent = self.subplot(sub).clone();
        let n = bands.len();
        bands
            .iter()
            .enumerate()
            .map(|(i, &band)| {
                let mut child = Subplot {
                    parent: sub,
                    ..parent.clone()
                };
                match dir {
                    Direction::X => {
                        child.x = parent.x * n + i;
                        child.v_band = band;
                    }
                    Direction::Y => {
                        child.y = parent.y * n + i;
                        child.h_band = band;
                    }
                }
                self.subplots.push(child);
                SubplotId(self.subplots.len() - 1)
            })
            .collect()
    }

    /// Labels of `band` and its ancestors, outermost first. The root band
    /// contributes no label.
    #[must_use]
    pub fn band_labels(&self, band: BandId) -> Vec<&str> {
        let mut labels = Vec::new();
        let mut cur = band;
        while cur != BandId::ROOT {
            let b = self.band(cur);
            labels.push(b.label.as_str());
            cur = b.parent;
        }
        labels.reverse();
        labels
    }
}
