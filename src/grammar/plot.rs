//! Plot state shared by faceting operations.
//!
//! A [`Plot`] owns the group tree its data is keyed by, the subplot/band
//! layout, and the axis scales bound to groups.

use crate::error::Result;
use crate::group::{group_by, GroupId, GroupTree, Grouping, Label};
use crate::layout::{Layout, Subplot, SubplotId};
use crate::scale::{Axis, LinearScale, ScaleId, ScaleSet, Scaler};
use crate::table::Table;

use super::facet::Facet;

/// A plot's grouped data, layout and scales.
#[derive(Debug)]
pub struct Plot {
    groups: GroupTree,
    layout: Layout,
    scales: ScaleSet,
    data: Grouping,
}

impl Plot {
    /// Create an unfaceted plot of `table`.
    #[must_use]
    pub fn new(table: Table) -> Self {
        Self::from_grouping(GroupTree::new(), Grouping::from_table(table))
    }

    /// Create a plot from data already grouped in `groups`.
    #[must_use]
    pub fn from_grouping(groups: GroupTree, data: Grouping) -> Self {
        Self {
            groups,
            layout: Layout::new(),
            scales: ScaleSet::new(),
            data,
        }
    }

    /// The plot's current data.
    #[must_use]
    pub fn data(&self) -> &Grouping {
        &self.data
    }

    /// Replace the plot's data. Group ids must come from [`Plot::groups`].
    pub fn set_data(&mut self, data: Grouping) {
        self.data = data;
    }

    /// The group tree the data is keyed by.
    #[must_use]
    pub fn groups(&self) -> &GroupTree {
        &self.groups
    }

    /// The group tree, for extending.
    pub fn groups_mut(&mut self) -> &mut GroupTree {
        &mut self.groups
    }

    /// The subplot/band layout.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub(crate) fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    /// Group the current data by `cols`, without replacing it.
    pub fn group_by(&mut self, cols: &[&str]) -> Result<Grouping> {
        group_by(&mut self.groups, &self.data, cols)
    }

    /// Apply a facet specification.
    pub fn facet(&mut self, facet: &Facet) -> Result<()> {
        facet.apply(self)
    }

    /// The scale `axis` uses for group `gid`.
    ///
    /// If no scale is bound to `gid` or any ancestor, a default
    /// [`LinearScale`] is bound to the root and returned.
    pub fn get_scale(&mut self, axis: Axis, gid: GroupId) -> ScaleId {
        if let Some(id) = self.scales.lookup(&self.groups, axis, gid) {
            return id;
        }
        let id = self.scales.add(Box::new(LinearScale::default()));
        self.scales.set_at(axis, id, GroupId::ROOT);
        id
    }

    /// Bind scale `id` to `axis` for group `gid` and its descendants.
    pub fn set_scale_at(&mut self, axis: Axis, id: ScaleId, gid: GroupId) {
        self.scales.set_at(axis, id, gid);
    }

    /// Add a scale to the plot.
    pub fn add_scale(&mut self, scale: Box<dyn Scaler>) -> ScaleId {
        self.scales.add(scale)
    }

    /// Add an independent copy of scale `id`.
    pub fn clone_scale(&mut self, id: ScaleId) -> ScaleId {
        self.scales.clone_scale(id)
    }

    /// Look up a scale.
    #[must_use]
    pub fn scale(&self, id: ScaleId) -> &dyn Scaler {
        self.scales.get(id)
    }

    /// Expand each group's `axis` scale to cover the numeric values of
    /// column `col` in that group.
    pub fn train(&mut self, axis: Axis, col: &str) -> Result<()> {
        let ids: Vec<GroupId> = self.data.ids().collect();
        for gid in ids {
            let values: Vec<f64> = match self.data.table(gid) {
                Some(table) => {
                    let column = table.column(col)?;
                    column.iter().filter_map(|v| v.as_f64()).collect()
                }
                None => continue,
            };
            let id = self.get_scale(axis, gid);
            self.scales.get_mut(id).expand(&values);
        }
        Ok(())
    }

    /// The subplot group `gid` is drawn in: the nearest ancestor labeled
    /// with a subplot, or the root subplot.
    #[must_use]
    pub fn subplot_of(&self, gid: GroupId) -> SubplotId {
        self.groups
            .ancestors(gid)
            .find_map(|g| match self.groups.label(g) {
                Label::Subplot(sub) => Some(*sub),
                _ => None,
            })
            .unwrap_or(SubplotId::ROOT)
    }

    /// Each group of the current data with the subplot it is drawn in.
    pub fn panels(&self) -> impl Iterator<Item = (GroupId, &Subplot)> + '_ {
        self.data
            .ids()
            .map(|gid| (gid, self.layout.subplot(self.subplot_of(gid))))
    }

    /// Grid extent as `(columns, rows)`. An unfaceted plot is `(1, 1)`.
    #[must_use]
    pub fn grid_size(&self) -> (usize, usize) {
        let mut size = (1, 1);
        for (_, sub) in self.panels() {
            size = (size.0.max(sub.x + 1), size.1.max(sub.y + 1));
        }
        size
    }

    /// Diagnostic path of `gid`, rendering subplot labels as `[x y]`.
    #[must_use]
    pub fn path(&self, gid: GroupId) -> String {
        self.groups.path_with(gid, |label| match label {
            Label::Subplot(sub) => self.layout.subplot(*sub).to_string(),
            other => other.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::builder()
            .add("g", vec!["a", "a", "b"])
            .add("v", vec![1.0, 2.0, 30.0])
            .done()
            .unwrap()
    }

    #[test]
    fn test_new_plot_is_unfaceted() {
        let plot = Plot::new(sample());
        assert_eq!(plot.data().len(), 1);
        assert_eq!(plot.subplot_of(GroupId::ROOT), SubplotId::ROOT);
        assert_eq!(plot.grid_size(), (1, 1));
        assert_eq!(plot.path(GroupId::ROOT), "/");
    }

    #[test]
    fn test_default_scale_bound_at_root() {
        let mut plot = Plot::new(sample());
        let x = plot.get_scale(Axis::X, GroupId::ROOT);
        assert_eq!(plot.get_scale(Axis::X, GroupId::ROOT), x);
        let y = plot.get_scale(Axis::Y, GroupId::ROOT);
        assert_ne!(x, y);
    }

    #[test]
    fn test_group_by_does_not_replace_data() {
        let mut plot = Plot::new(sample());
        let grouped = plot.group_by(&["g"]).unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(plot.data().len(), 1);
    }

    #[test]
    fn test_train_expands_shared_scale() {
        let mut plot = Plot::new(sample());
        let grouped = plot.group_by(&["g"]).unwrap();
        plot.set_data(grouped);
        plot.train(Axis::Y, "v").unwrap();
        let id = plot.get_scale(Axis::Y, GroupId::ROOT);
        assert_eq!(plot.scale(id).domain(), Some((1.0, 30.0)));
    }

    #[test]
    fn test_added_scale_bound_to_group() {
        let mut plot = Plot::new(sample());
        let grouped = plot.group_by(&["g"]).unwrap();
        let first = grouped.ids().next().unwrap();
        plot.set_data(grouped);

        let id = plot.add_scale(Box::new(LinearScale::new((0.0, 10.0))));
        plot.set_scale_at(Axis::Y, id, first);
        plot.train(Axis::Y, "v").unwrap();

        assert_eq!(plot.get_scale(Axis::Y, first), id);
        assert_eq!(plot.scale(id).domain(), Some((1.0, 2.0)));
        let shared = plot.get_scale(Axis::Y, GroupId::ROOT);
        assert_ne!(shared, id);
        assert_eq!(plot.scale(shared).domain(), Some((30.0, 30.0)));
    }

    #[test]
    fn test_train_missing_column() {
        let mut plot = Plot::new(sample());
        assert!(plot.train(Axis::X, "nope").is_err());
    }
}
