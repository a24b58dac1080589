//! Axis scales and their assignment to groups.
//!
//! Scales map data values to positions. A [`ScaleSet`] owns every scale of a
//! plot and binds scales to groups per [`Axis`]; a group without its own
//! binding uses the nearest bound ancestor's scale. Faceting with split
//! scales clones a scale and binds the clone to the new groups, so groups in
//! different bands train independent domains.

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::group::{GroupId, GroupTree};

/// A positional axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

/// A trainable scale.
pub trait Scaler: fmt::Debug + Send + Sync {
    /// Widen the domain to include `values`. Non-finite values are ignored.
    fn expand(&mut self, values: &[f64]);

    /// The trained domain, or `None` if no values have been seen.
    fn domain(&self) -> Option<(f64, f64)>;

    /// Map a domain value to the output range.
    fn map(&self, value: f64) -> f64;

    /// An independent copy sharing no mutable state with `self`.
    fn clone_scaler(&self) -> Box<dyn Scaler>;
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: Option<(f64, f64)>,
    range_min: f64,
    range_max: f64,
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new((0.0, 1.0))
    }
}

impl LinearScale {
    /// Create an untrained linear scale onto `range`.
    #[must_use]
    pub fn new(range: (f64, f64)) -> Self {
        Self {
            domain: None,
            range_min: range.0,
            range_max: range.1,
        }
    }

    /// Create a scale trained on `data`.
    #[must_use]
    pub fn from_data(data: &[f64], range: (f64, f64)) -> Self {
        let mut scale = Self::new(range);
        scale.expand(data);
        scale
    }

    /// Get the range extent.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f64) -> Option<f64> {
        let (lo, hi) = self.domain?;
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        Some(lo + t * (hi - lo))
    }
}

impl Scaler for LinearScale {
    fn expand(&mut self, values: &[f64]) {
        for &v in values.iter().filter(|v| v.is_finite()) {
            self.domain = Some(match self.domain {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
    }

    fn domain(&self) -> Option<(f64, f64)> {
        self.domain
    }

    fn map(&self, value: f64) -> f64 {
        let mid = (self.range_min + self.range_max) / 2.0;
        match self.domain {
            Some((lo, hi)) if (hi - lo).abs() > f64::EPSILON => {
                let t = (value - lo) / (hi - lo);
                self.range_min + t * (self.range_max - self.range_min)
            }
            // Degenerate domains map to the middle of the range.
            _ => mid,
        }
    }

    fn clone_scaler(&self) -> Box<dyn Scaler> {
        Box::new(*self)
    }
}

/// Identifies a scale in a [`ScaleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScaleId(usize);

impl ScaleId {
    /// Position of this scale in its set.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Owns a plot's scales and their bindings to groups.
#[derive(Debug, Default)]
pub struct ScaleSet {
    scales: Vec<Box<dyn Scaler>>,
    bindings: HashMap<(Axis, GroupId), ScaleId>,
}

impl ScaleSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scales.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scales.len()
    }

    /// Whether the set holds no scales.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    /// Add a scale.
    pub fn add(&mut self, scale: Box<dyn Scaler>) -> ScaleId {
        self.scales.push(scale);
        ScaleId(self.scales.len() - 1)
    }

    /// Add an independent copy of scale `id`.
    pub fn clone_scale(&mut self, id: ScaleId) -> ScaleId {
        let copy = self.scales[id.0].clone_scaler();
        self.add(copy)
    }

    /// Look up a scale.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by another set.
    #[must_use]
    pub fn get(&self, id: ScaleId) -> &dyn Scaler {
        self.scales[id.0].as_ref()
    }

    /// Look up a scale mutably.
    pub fn get_mut(&mut self, id: ScaleId) -> &mut dyn Scaler {
        self.scales[id.0].as_mut()
    }

    /// Bind scale `id` to `axis` for group `gid` and its descendants.
    pub fn set_at(&mut self, axis: Axis, id: ScaleId, gid: GroupId) {
        self.bindings.insert((axis, gid), id);
    }

    /// The scale bound to `gid` or its nearest bound ancestor.
    #[must_use]
    pub fn lookup(&self, tree: &GroupTree, axis: Axis, gid: GroupId) -> Option<ScaleId> {
        tree.ancestors(gid)
            .find_map(|g| self.bindings.get(&(axis, g)).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::from_data(&[0.0, 100.0], (0.0, 1.0));
        assert!((scale.map(0.0) - 0.0).abs() < 0.001);
        assert!((scale.map(50.0) - 0.5).abs() < 0.001);
        assert!((scale.map(100.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_linear_scale_custom_range() {
        let scale = LinearScale::from_data(&[0.0, 10.0], (100.0, 300.0));
        assert_eq!(scale.range(), (100.0, 300.0));
        assert!((scale.map(5.0) - 200.0).abs() < 0.001);
        assert_eq!(LinearScale::default().range(), (0.0, 1.0));
    }

    #[test]
    fn test_linear_scale_invert() {
        let scale = LinearScale::from_data(&[0.0, 100.0], (0.0, 1.0));
        assert!((scale.invert(0.5).unwrap() - 50.0).abs() < 0.001);
        assert_eq!(LinearScale::default().invert(0.5), None);
    }

    #[test]
    fn test_expand_ignores_non_finite() {
        let mut scale = LinearScale::default();
        scale.expand(&[f64::NAN, 3.0, f64::INFINITY, -2.0]);
        assert_eq!(scale.domain(), Some((-2.0, 3.0)));
    }

    #[test]
    fn test_degenerate_domain_maps_to_middle() {
        let scale = LinearScale::from_data(&[5.0], (0.0, 10.0));
        assert!((scale.map(5.0) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut set = ScaleSet::new();
        let a = set.add(Box::new(LinearScale::from_data(&[0.0, 1.0], (0.0, 1.0))));
        let b = set.clone_scale(a);
        assert_ne!(a, b);
        set.get_mut(b).expand(&[10.0]);
        assert_eq!(set.get(a).domain(), Some((0.0, 1.0)));
        assert_eq!(set.get(b).domain(), Some((0.0, 10.0)));
    }

    #[test]
    fn test_lookup_walks_ancestors() {
        let mut tree = GroupTree::new();
        let child = tree.extend(GroupId::ROOT, "c");
        let grandchild = tree.extend(child, "g");

        let mut set = ScaleSet::new();
        assert_eq!(set.lookup(&tree, Axis::X, grandchild), None);

        let root_scale = set.add(Box::new(LinearScale::default()));
        set.set_at(Axis::X, root_scale, GroupId::ROOT);
        assert_eq!(set.lookup(&tree, Axis::X, grandchild), Some(root_scale));
        assert_eq!(set.lookup(&tree, Axis::Y, grandchild), None);

        let child_scale = set.clone_scale(root_scale);
        set.set_at(Axis::X, child_scale, child);
        assert_eq!(set.lookup(&tree, Axis::X, grandchild), Some(child_scale));
        assert_eq!(set.lookup(&tree, Axis::X, GroupId::ROOT), Some(root_scale));
    }
}
