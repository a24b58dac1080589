//! Hierarchical grouping of tables.
//!
//! Groups are identified by [`GroupId`]s, nodes of an append-only
//! [`GroupTree`]. A [`Grouping`] maps an ordered set of group ids to tables.
//! [`group_by`] subdivides every group of a grouping by the values of one or
//! more columns, extending each group's id with one child per distinct value;
//! [`ungroup`] and [`flatten`] merge groups back together.
//!
//! ```
//! use facet_grid::group::{flatten, group_by, GroupTree, Grouping};
//! use facet_grid::table::Table;
//!
//! let table = Table::builder()
//!     .add("g", vec![1_i64, 1, 2, 2])
//!     .add("v", vec![10_i64, 20, 30, 40])
//!     .done()
//!     .unwrap();
//!
//! let mut tree = GroupTree::new();
//! let grouped = group_by(&mut tree, &Grouping::from_table(table), &["g"]).unwrap();
//! let paths: Vec<String> = grouped.ids().map(|id| tree.path(id)).collect();
//! assert_eq!(paths, ["/1", "/2"]);
//! assert_eq!(flatten(&grouped).unwrap().len(), 4);
//! ```

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::column;
use crate::error::{Error, Result};
use crate::layout::SubplotId;
use crate::table::{ColumnData, Table};
use crate::value::Value;

/// Identifies a group: a node in a [`GroupTree`].
///
/// Ids compare by identity. Two ids created by extending the same parent
/// with equal labels are still distinct. An id is only meaningful for the
/// tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

impl GroupId {
    /// The root of every group tree.
    pub const ROOT: Self = Self(0);

    /// Whether this is the root group.
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }

    /// Position of this node in its tree.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Label attached to a group tree node.
///
/// Labels are diagnostic metadata, not keys, though callers may store
/// semantic information in them.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    /// The root's label.
    Root,
    /// A grouping column value.
    Value(Value),
    /// The facet subplot a group was placed in.
    Subplot(SubplotId),
    /// Free-form text.
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Root => Ok(()),
            Label::Value(v) => write!(f, "{v}"),
            Label::Subplot(id) => write!(f, "[#{}]", id.index()),
            Label::Text(s) => f.write_str(s),
        }
    }
}

impl From<Value> for Label {
    fn from(v: Value) -> Self {
        Label::Value(v)
    }
}

impl From<SubplotId> for Label {
    fn from(id: SubplotId) -> Self {
        Label::Subplot(id)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

#[derive(Debug, Clone)]
struct GroupNode {
    parent: GroupId,
    label: Label,
}

/// Append-only arena of group ids.
///
/// # Panics
///
/// Methods taking a [`GroupId`] panic if the id was issued by another tree
/// with more nodes.
#[derive(Debug, Clone)]
pub struct GroupTree {
    nodes: Vec<GroupNode>,
}

impl Default for GroupTree {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupTree {
    /// Create a tree holding only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![GroupNode {
                parent: GroupId::ROOT,
                label: Label::Root,
            }],
        }
    }

    /// Number of nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Allocate a new child of `parent`. The result differs from every
    /// existing id, even if a sibling carries an equal label.
    pub fn extend(&mut self, parent: GroupId, label: impl Into<Label>) -> GroupId {
        let id = GroupId(self.nodes.len());
        self.nodes.push(GroupNode {
            parent,
            label: label.into(),
        });
        id
    }

    /// Parent of `id`. The root is its own parent.
    #[must_use]
    pub fn parent(&self, id: GroupId) -> GroupId {
        self.nodes[id.0].parent
    }

    /// Label of `id`.
    #[must_use]
    pub fn label(&self, id: GroupId) -> &Label {
        &self.nodes[id.0].label
    }

    /// `id` followed by each of its ancestors, ending with the root.
    pub fn ancestors(&self, id: GroupId) -> impl Iterator<Item = GroupId> + '_ {
        let mut next = Some(id);
        std::iter::from_fn(move || {
            let cur = next?;
            next = if cur.is_root() {
                None
            } else {
                Some(self.parent(cur))
            };
            Some(cur)
        })
    }

    /// Number of edges between `id` and the root.
    #[must_use]
    pub fn depth(&self, id: GroupId) -> usize {
        self.ancestors(id).count() - 1
    }

    /// Diagnostic path of `id` in the form `/l1/l2/l3`; the root is `/`.
    ///
    /// Distinct ids may render identically.
    #[must_use]
    pub fn path(&self, id: GroupId) -> String {
        self.path_with(id, |label| label.to_string())
    }

    /// Like [`GroupTree::path`], rendering each label with `render`.
    pub fn path_with(&self, id: GroupId, mut render: impl FnMut(&Label) -> String) -> String {
        if id.is_root() {
            return "/".to_string();
        }
        let mut parts: Vec<String> = self
            .ancestors(id)
            .take_while(|g| !g.is_root())
            .map(|g| format!("/{}", render(self.label(g))))
            .collect();
        parts.reverse();
        parts.concat()
    }
}

/// An ordered collection of distinct groups, each with a table.
///
/// Iteration follows insertion order, which need not reflect tree topology.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    entries: Vec<(GroupId, Arc<Table>)>,
    index: HashMap<GroupId, usize>,
}

impl Grouping {
    /// A grouping with a single root group holding `table`.
    #[must_use]
    pub fn from_table(table: impl Into<Arc<Table>>) -> Self {
        let mut b = GroupingBuilder::new();
        b.add(GroupId::ROOT, table);
        b.done()
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Group ids in order.
    pub fn ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Groups and their tables in order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &Arc<Table>)> + '_ {
        self.entries.iter().map(|(id, t)| (*id, t))
    }

    /// The table of group `id`.
    #[must_use]
    pub fn table(&self, id: GroupId) -> Option<&Arc<Table>> {
        self.index.get(&id).map(|&i| &self.entries[i].1)
    }
}

/// Incremental [`Grouping`] constructor preserving insertion order.
#[derive(Debug, Default)]
pub struct GroupingBuilder {
    grouping: Grouping,
}

impl GroupingBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group. Adding an id a second time replaces its table and keeps
    /// its original position.
    pub fn add(&mut self, id: GroupId, table: impl Into<Arc<Table>>) -> &mut Self {
        let table = table.into();
        let g = &mut self.grouping;
        match g.index.entry(id) {
            Entry::Occupied(e) => g.entries[*e.get()].1 = table,
            Entry::Vacant(e) => {
                e.insert(g.entries.len());
                g.entries.push((id, table));
            }
        }
        self
    }

    /// Finish the grouping.
    #[must_use]
    pub fn done(self) -> Grouping {
        self.grouping
    }
}

/// Sub-divide every group so all rows of each group have equal values for
/// all of `cols`.
///
/// Each level extends a group's id with one child per distinct value, in
/// first-occurrence order. Relative row order is preserved and the grouped
/// columns become constant in each sub-table. Grouping by a column that is
/// already constant extends the id without scanning rows. An empty `cols`
/// returns the grouping unchanged.
pub fn group_by(tree: &mut GroupTree, g: &Grouping, cols: &[&str]) -> Result<Grouping> {
    let mut cur = g.clone();
    for &col in cols {
        let mut out = GroupingBuilder::new();
        for (gid, table) in cur.iter() {
            split(tree, &mut out, gid, table, col)?;
        }
        let next = out.done();
        log::debug!(
            "group_by {col:?}: {} groups -> {} groups",
            cur.len(),
            next.len()
        );
        cur = next;
    }
    Ok(cur)
}

fn split(
    tree: &mut GroupTree,
    out: &mut GroupingBuilder,
    gid: GroupId,
    table: &Arc<Table>,
    col: &str,
) -> Result<()> {
    let unkeyable = |kind| Error::UnkeyableColumn {
        name: col.to_string(),
        kind,
    };

    if let Some(cv) = table.get_const(col) {
        if !cv.kind().can_key() {
            return Err(unkeyable(cv.kind()));
        }
        out.add(tree.extend(gid, cv.clone()), Arc::clone(table));
        return Ok(());
    }

    let seq = table.must_column(col)?;
    if !seq.kind().can_key() {
        return Err(unkeyable(seq.kind()));
    }

    // Row indices per distinct value, in first-occurrence order.
    let mut keys: HashMap<Value, usize> = HashMap::new();
    let mut subgroups: Vec<(GroupId, Value, Vec<usize>)> = Vec::new();
    for (row, x) in seq.iter().enumerate() {
        match keys.entry(x) {
            Entry::Occupied(e) => subgroups[*e.get()].2.push(row),
            Entry::Vacant(e) => {
                let subgid = tree.extend(gid, e.key().clone());
                subgroups.push((subgid, e.key().clone(), vec![row]));
                e.insert(subgroups.len() - 1);
            }
        }
    }
    log::trace!(
        "split {} by {col:?} into {} groups",
        tree.path(gid),
        subgroups.len()
    );

    // A single subgroup holds every row in order, so its sequences are shared.
    let whole = subgroups.len() == 1;
    for (subgid, val, rows) in subgroups {
        let mut b = Table::builder().rows(rows.len());
        for (name, data) in table.iter_columns() {
            b = match data {
                _ if name == col => b.add_const(name, val.clone()),
                ColumnData::Const(cv) => b.add_const(name, cv.clone()),
                ColumnData::Seq(s) if whole => b.add_shared(name, Arc::clone(s)),
                ColumnData::Seq(s) => b.add(name, s.multi_index(&rows)),
            };
        }
        out.add(subgid, b.done()?);
    }
    Ok(())
}

/// Merge adjacent groups that share a parent into one group identified by
/// that parent, undoing the most recent [`group_by`] level.
///
/// An empty grouping, or one holding only the root group, is returned
/// unchanged. Groups sharing a parent must be listed contiguously, as
/// [`group_by`] emits them; otherwise this fails with
/// [`Error::NonContiguousGroups`].
pub fn ungroup(tree: &GroupTree, g: &Grouping) -> Result<Grouping> {
    let mut ids = g.ids();
    let first = match (ids.next(), ids.next()) {
        (None, _) => return Ok(g.clone()),
        (Some(id), None) if id.is_root() => return Ok(g.clone()),
        (Some(id), _) => id,
    };

    let mut out = GroupingBuilder::new();
    let mut flushed = HashSet::new();
    let mut run_gid = tree.parent(first);
    let mut run_tabs: Vec<Arc<Table>> = Vec::new();
    for (gid, table) in g.iter() {
        let parent = tree.parent(gid);
        if parent != run_gid {
            out.add(run_gid, concat_rows(&run_tabs)?);
            flushed.insert(run_gid);
            if flushed.contains(&parent) {
                return Err(Error::NonContiguousGroups {
                    parent: tree.path(parent),
                });
            }
            run_gid = parent;
            run_tabs.clear();
        }
        run_tabs.push(Arc::clone(table));
    }
    out.add(run_gid, concat_rows(&run_tabs)?);

    Ok(out.done())
}

/// Concatenate every group's table into one table, regardless of hierarchy.
///
/// A single group's table is returned shared, not copied.
pub fn flatten(g: &Grouping) -> Result<Arc<Table>> {
    let tabs: Vec<Arc<Table>> = g.iter().map(|(_, t)| Arc::clone(t)).collect();
    concat_rows(&tabs)
}

/// Concatenate the rows of `tabs`. The first table's column list is
/// authoritative; constant columns are materialized.
fn concat_rows(tabs: &[Arc<Table>]) -> Result<Arc<Table>> {
    let (first, rest) = match tabs {
        [] => return Ok(Arc::new(Table::new())),
        [only] => return Ok(Arc::clone(only)),
        [first, rest @ ..] => (first, rest),
    };

    let rows = tabs.iter().map(|t| t.len()).sum();
    let mut b = Table::builder().rows(rows);
    for name in first.columns() {
        let head = first.column(name)?;
        let tail = rest
            .iter()
            .map(|t| t.column(name))
            .collect::<Result<Vec<_>>>()?;
        let tail: Vec<&column::Column> = tail.iter().map(|c| &**c).collect();
        b = b.add(name, column::concat(&head, &tail)?);
    }
    Ok(Arc::new(b.done()?))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn table(keys: &[i64]) -> Table {
        let rows: Vec<i64> = (0..keys.len() as i64).collect();
        Table::builder()
            .add("k", keys.to_vec())
            .add("row", rows)
            .done()
            .unwrap()
    }

    fn row_ids(t: &Table) -> Vec<i64> {
        match t.must_column("row").unwrap() {
            column::Column::Int(v) => v.clone(),
            other => panic!("Expected Int, got {other:?}"),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_flatten_group_by_keeps_rows(keys in prop::collection::vec(0i64..5, 1..40)) {
            let mut tree = GroupTree::new();
            let g = group_by(&mut tree, &Grouping::from_table(table(&keys)), &["k"]).unwrap();

            for (_, t) in g.iter() {
                let rows = row_ids(t);
                prop_assert!(rows.windows(2).all(|w| w[0] < w[1]));
            }

            let mut rows = row_ids(&flatten(&g).unwrap());
            rows.sort_unstable();
            prop_assert_eq!(rows, (0..keys.len() as i64).collect::<Vec<_>>());
        }

        #[test]
        fn prop_distinct_keys_one_row_each(n in 0usize..30) {
            let keys: Vec<i64> = (0..n as i64).collect();
            let mut tree = GroupTree::new();
            let g = group_by(&mut tree, &Grouping::from_table(table(&keys)), &["k"]).unwrap();
            prop_assert_eq!(g.len(), n);
            prop_assert!(g.iter().all(|(_, t)| t.len() == 1));
        }

        #[test]
        fn prop_ungroup_inverts_contiguous_group_by(
            mut keys in prop::collection::vec(0i64..5, 1..40)
        ) {
            keys.sort_unstable();
            let t = table(&keys);
            let mut tree = GroupTree::new();
            let g = group_by(&mut tree, &Grouping::from_table(t.clone()), &["k"]).unwrap();
            let u = ungroup(&tree, &g).unwrap();
            prop_assert_eq!(u.len(), 1);
            prop_assert_eq!(u.table(GroupId::ROOT).unwrap().as_ref(), &t);
        }

        #[test]
        fn prop_group_by_two_columns_matches_nested(
            a in prop::collection::vec(0i64..3, 0..30),
            seed in 0i64..7,
        ) {
            let b: Vec<i64> = a
                .iter()
                .enumerate()
                .map(|(i, x)| (x + seed + i as i64) % 2)
                .collect();
            let t = Table::builder().add("a", a.clone()).add("b", b).done().unwrap();
            let input = Grouping::from_table(t);

            let mut tree = GroupTree::new();
            let once = group_by(&mut tree, &input, &["a", "b"]).unwrap();
            let step = group_by(&mut tree, &input, &["a"]).unwrap();
            let twice = group_by(&mut tree, &step, &["b"]).unwrap();

            let parts = |g: &Grouping| -> Vec<Arc<Table>> {
                g.iter().map(|(_, t)| Arc::clone(t)).collect()
            };
            prop_assert_eq!(parts(&once), parts(&twice));
        }
    }
}
