//! Positional layout of the visible part of a reference tree.
//!
//! The pass is pure: given the tree, an origin and the expanded set it returns
//! a flat, pre-ordered list of `(id, position, parent)` entries. Nothing here
//! touches rendered state, so the reconcile step can diff two layouts without
//! a drawing surface.
//!
//! Children are placed one column (`column_spacing`) to the right of their
//! parent and stacked vertically around the parent's anchor. There is no
//! collision detection between sibling subtrees; deep expansions may overlap.

mod spacing;

pub use spacing::{child_spacing, recenter_offset};

use crate::config::LayoutSettings;
use crate::model::{Point, TreeNode};
use std::collections::{BTreeSet, HashMap};
use tracing::instrument;

/// One visible node in a computed layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEntry {
    pub id: String,
    pub position: Point,
    pub parent: Option<String>,
    pub depth: usize,
    /// Position among the parent's children; 0 for the root.
    pub sibling_index: usize,
}

/// A parent-child connector with both endpoints resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge<'a> {
    pub parent: &'a str,
    pub child: &'a str,
    pub from: Point,
    pub to: Point,
    pub sibling_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    entries: Vec<LayoutEntry>,
    positions: HashMap<String, Point>,
}

impl Layout {
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn positions(&self) -> &HashMap<String, Point> {
        &self.positions
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every visible node with a visible parent, paired with both positions.
    pub fn edges(&self) -> impl Iterator<Item = LayoutEdge<'_>> {
        self.entries.iter().filter_map(|entry| {
            let parent = entry.parent.as_deref()?;
            let from = self.position(parent)?;
            Some(LayoutEdge {
                parent,
                child: &entry.id,
                from,
                to: entry.position,
                sibling_index: entry.sibling_index,
            })
        })
    }

    fn push(&mut self, entry: LayoutEntry) {
        self.positions.insert(entry.id.clone(), entry.position);
        self.entries.push(entry);
    }
}

/// Lay out every node reachable from `root` through expanded ancestors.
#[instrument(level = "trace", skip(root, expanded, settings), fields(root = %root.id))]
pub fn compute_layout(
    root: &TreeNode,
    origin: Point,
    expanded: &BTreeSet<String>,
    settings: &LayoutSettings,
) -> Layout {
    let mut layout = Layout::default();
    layout_node(root, origin, None, 0, 0, expanded, settings, &mut layout);
    layout
}

#[allow(clippy::too_many_arguments)]
fn layout_node(
    node: &TreeNode,
    position: Point,
    parent: Option<&str>,
    sibling_index: usize,
    level: usize,
    expanded: &BTreeSet<String>,
    settings: &LayoutSettings,
    layout: &mut Layout,
) {
    layout.push(LayoutEntry {
        id: node.id.clone(),
        position,
        parent: parent.map(str::to_string),
        depth: level,
        sibling_index,
    });

    let children = node.children();
    if children.is_empty() || !expanded.contains(&node.id) {
        return;
    }

    let count = children.len();
    let spacing = child_spacing(count, settings);
    let total_height = count as f64 * spacing;
    let anchor_y = position.y + recenter_offset(count, level, settings);
    let start_y = anchor_y - total_height / 2.0;
    let child_x = position.x + settings.column_spacing;

    for (index, child) in children.iter().enumerate() {
        let child_position = Point::new(child_x, start_y + index as f64 * spacing);
        layout_node(
            child,
            child_position,
            Some(&node.id),
            index,
            level + 1,
            expanded,
            settings,
            layout,
        );
    }
}
