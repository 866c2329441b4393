//! Live visual state and its reconciliation against a fresh layout.
//!
//! A visual is keyed by node id (or by parent/child pair for edges) and is
//! updated in place for as long as its key stays visible. Keys that drop out
//! of the layout fade out and are removed by a generation-tagged task.

use super::schedule::{Scheduler, Task};
use super::visual::{
    EdgeKey, Generation, Phase, Transition, TransitionKind, VisualEdge, VisualNode, link_path,
};
use crate::config::AnimationSettings;
use crate::layout::{Layout, LayoutEntry};
use crate::model::TreeIndex;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;
use tracing::{instrument, trace};

/// Everything one reconcile step reads.
pub struct PassContext<'a> {
    pub layout: &'a Layout,
    pub index: &'a TreeIndex,
    pub expanded: &'a BTreeSet<String>,
    pub newly_expanded: &'a BTreeSet<String>,
    pub newly_collapsed: &'a BTreeSet<String>,
    pub hovered: Option<&'a str>,
    pub animation: &'a AnimationSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub created_nodes: usize,
    pub updated_nodes: usize,
    /// Subset of `created_nodes` that replaced a visual still fading out.
    pub revived_nodes: usize,
    pub created_edges: usize,
    pub updated_edges: usize,
    pub exiting_nodes: usize,
    pub exiting_edges: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    RemovedNode { edges: usize },
    RemovedEdge,
    /// The visual under this key belongs to a different lifetime.
    Stale,
    /// Nothing is left under this key, e.g. an edge already taken down
    /// together with its child.
    Missing,
}

#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<String, VisualNode>,
    edges: HashMap<EdgeKey, VisualEdge>,
    hovered: Option<String>,
    next_generation: Generation,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.get(id)
    }

    pub fn edge(&self, parent: &str, child: &str) -> Option<&VisualEdge> {
        self.edges.get(&EdgeKey::new(parent, child))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &VisualNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &VisualEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Ids of visuals that are not fading out, sorted.
    pub fn live_node_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .nodes
            .values()
            .filter(|n| !n.is_exiting())
            .map(|n| n.id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn live_edge_keys(&self) -> Vec<&EdgeKey> {
        let mut keys: Vec<&EdgeKey> = self
            .edges
            .values()
            .filter(|e| !e.is_exiting())
            .map(|e| &e.key)
            .collect();
        keys.sort_unstable();
        keys
    }

    fn bump_generation(&mut self) -> Generation {
        self.next_generation += 1;
        self.next_generation
    }

    /// Bring the live maps in line with `ctx.layout`.
    #[instrument(level = "trace", skip_all, fields(visible = ctx.layout.len()))]
    pub fn reconcile(&mut self, ctx: &PassContext<'_>, scheduler: &mut Scheduler) -> ReconcileStats {
        let now = scheduler.now();
        let mut stats = ReconcileStats::default();
        // Removals of revived visuals, cancelled together once the pass is done.
        let mut superseded: HashSet<Task> = HashSet::new();

        for entry in ctx.layout.entries() {
            self.reconcile_node(entry, ctx, now, &mut superseded, &mut stats);
        }

        let mut visible_edges: HashSet<EdgeKey> = HashSet::with_capacity(ctx.layout.len());
        for edge in ctx.layout.edges() {
            let key = EdgeKey::new(edge.parent, edge.child);
            let live = self.edges.get(&key).map(|e| (e.is_exiting(), e.generation));
            match live {
                Some((false, _)) => {
                    if let Some(visual) = self.edges.get_mut(&key) {
                        visual.set_endpoints(edge.from, edge.to);
                        stats.updated_edges += 1;
                    }
                }
                previous => {
                    let phase = if ctx.newly_expanded.contains(edge.parent) {
                        Phase::Entering(Transition {
                            kind: TransitionKind::DrawIn,
                            start: now.saturating_add(stagger(ctx.animation, edge.sibling_index)),
                            duration: ctx.animation.draw_in,
                        })
                    } else {
                        Phase::Present
                    };
                    if let Some((_, old)) = previous {
                        superseded.insert(Task::RemoveEdge {
                            key: key.clone(),
                            generation: old,
                        });
                    }
                    let generation = self.bump_generation();
                    trace!(edge = %key, generation, "create edge");
                    self.edges.insert(
                        key.clone(),
                        VisualEdge {
                            key: key.clone(),
                            from: edge.from,
                            to: edge.to,
                            path: link_path(edge.from, edge.to),
                            generation,
                            phase,
                        },
                    );
                    stats.created_edges += 1;
                }
            }
            visible_edges.insert(key);
        }

        // Collapsed subtrees are found by walking the data tree, not the
        // previous layout, so descendants hidden several levels down go too.
        for collapsed in ctx.newly_collapsed {
            for descendant in ctx.index.descendants(collapsed) {
                if ctx.layout.contains(&descendant) {
                    continue;
                }
                if self.begin_node_exit(&descendant, ctx.animation, scheduler) {
                    stats.exiting_nodes += 1;
                }
                let parent = ctx.index.get(&descendant).and_then(|n| n.parent.clone());
                if let Some(parent) = parent {
                    let key = EdgeKey::new(parent, descendant);
                    if !visible_edges.contains(&key)
                        && self.begin_edge_exit(&key, ctx.animation, scheduler)
                    {
                        stats.exiting_edges += 1;
                    }
                }
            }
        }

        // Anything else no longer laid out (tree replaced, ids vanished).
        let stray_nodes: Vec<String> = self
            .nodes
            .values()
            .filter(|n| !n.is_exiting() && !ctx.layout.contains(&n.id))
            .map(|n| n.id.clone())
            .collect();
        for id in stray_nodes {
            if self.begin_node_exit(&id, ctx.animation, scheduler) {
                stats.exiting_nodes += 1;
            }
        }
        let stray_edges: Vec<EdgeKey> = self
            .edges
            .values()
            .filter(|e| !e.is_exiting() && !visible_edges.contains(&e.key))
            .map(|e| e.key.clone())
            .collect();
        for key in stray_edges {
            if self.begin_edge_exit(&key, ctx.animation, scheduler) {
                stats.exiting_edges += 1;
            }
        }

        if !superseded.is_empty() {
            let cancelled = scheduler.cancel_where(|task| superseded.contains(task));
            trace!(cancelled, "cancelled superseded removals");
        }

        self.apply_hover(ctx.hovered);
        stats
    }

    fn reconcile_node(
        &mut self,
        entry: &LayoutEntry,
        ctx: &PassContext<'_>,
        now: Duration,
        superseded: &mut HashSet<Task>,
        stats: &mut ReconcileStats,
    ) {
        let expanded = ctx.expanded.contains(&entry.id);
        let live = self
            .nodes
            .get(&entry.id)
            .map(|n| (n.is_exiting(), n.generation));

        if let Some((false, _)) = live {
            if let Some(node) = self.nodes.get_mut(&entry.id) {
                node.position = entry.position;
                node.expanded = expanded;
                stats.updated_nodes += 1;
            }
            return;
        }

        let parent_revealed = entry
            .parent
            .as_deref()
            .is_some_and(|p| ctx.newly_expanded.contains(p));
        let phase = if parent_revealed || ctx.newly_expanded.contains(&entry.id) {
            let delay = if parent_revealed {
                stagger(ctx.animation, entry.sibling_index)
            } else {
                Duration::ZERO
            };
            Phase::Entering(Transition {
                kind: TransitionKind::FadeIn,
                start: now.saturating_add(delay),
                duration: ctx.animation.enter,
            })
        } else {
            Phase::Present
        };

        if let Some((_, old)) = live {
            superseded.insert(Task::RemoveNode {
                id: entry.id.clone(),
                generation: old,
            });
            stats.revived_nodes += 1;
        }

        let generation = self.bump_generation();
        let data = ctx.index.get(&entry.id);
        trace!(id = %entry.id, generation, revived = live.is_some(), "create node");
        self.nodes.insert(
            entry.id.clone(),
            VisualNode {
                id: entry.id.clone(),
                label: data.map(|d| d.name.clone()).unwrap_or_else(|| entry.id.clone()),
                url: data.and_then(|d| d.url.clone()),
                flags: data.map(|d| d.flags).unwrap_or_default(),
                position: entry.position,
                expandable: data.is_some_and(|d| !d.children.is_empty()),
                expanded,
                hovered: false,
                generation,
                phase,
            },
        );
        stats.created_nodes += 1;
    }

    fn begin_node_exit(
        &mut self,
        id: &str,
        animation: &AnimationSettings,
        scheduler: &mut Scheduler,
    ) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        if node.is_exiting() {
            return false;
        }
        node.phase = Phase::Exiting(Transition {
            kind: TransitionKind::FadeOut,
            start: scheduler.now(),
            duration: animation.exit,
        });
        trace!(id, generation = node.generation, "schedule node removal");
        scheduler.schedule_in(
            animation.exit,
            Task::RemoveNode {
                id: id.to_string(),
                generation: node.generation,
            },
        );
        true
    }

    fn begin_edge_exit(
        &mut self,
        key: &EdgeKey,
        animation: &AnimationSettings,
        scheduler: &mut Scheduler,
    ) -> bool {
        let Some(edge) = self.edges.get_mut(key) else {
            return false;
        };
        if edge.is_exiting() {
            return false;
        }
        edge.phase = Phase::Exiting(Transition {
            kind: TransitionKind::FadeOut,
            start: scheduler.now(),
            duration: animation.exit,
        });
        scheduler.schedule_in(
            animation.exit,
            Task::RemoveEdge {
                key: key.clone(),
                generation: edge.generation,
            },
        );
        true
    }

    /// Move the hover highlight to `hovered`. Returns whether it changed.
    pub fn apply_hover(&mut self, hovered: Option<&str>) -> bool {
        let previous = self.hovered.take();
        if let Some(prev) = previous.as_deref() {
            if Some(prev) != hovered {
                if let Some(node) = self.nodes.get_mut(prev) {
                    node.hovered = false;
                }
            }
        }
        if let Some(node) = hovered.and_then(|id| self.nodes.get_mut(id)) {
            node.hovered = true;
        }
        self.hovered = hovered.map(str::to_string);
        previous.as_deref() != hovered
    }

    /// Execute a due task, honouring its generation stamp.
    pub fn apply_task(&mut self, task: Task) -> TaskOutcome {
        match task {
            Task::RemoveNode { id, generation } => {
                let Some(node) = self.nodes.get(&id) else {
                    return TaskOutcome::Missing;
                };
                if node.generation != generation || !node.is_exiting() {
                    trace!(%id, generation, "skip stale node removal");
                    return TaskOutcome::Stale;
                }
                self.nodes.remove(&id);
                let before = self.edges.len();
                self.edges.retain(|key, edge| !(key.child == id && edge.is_exiting()));
                TaskOutcome::RemovedNode {
                    edges: before - self.edges.len(),
                }
            }
            Task::RemoveEdge { key, generation } => {
                let Some(edge) = self.edges.get(&key) else {
                    return TaskOutcome::Missing;
                };
                if edge.generation != generation || !edge.is_exiting() {
                    trace!(edge = %key, generation, "skip stale edge removal");
                    return TaskOutcome::Stale;
                }
                self.edges.remove(&key);
                TaskOutcome::RemovedEdge
            }
        }
    }

    /// Finish entrance transitions that have run their course.
    pub fn settle(&mut self, now: Duration) -> usize {
        let mut settled = 0;
        for node in self.nodes.values_mut() {
            if matches!(node.phase, Phase::Entering(t) if t.end() <= now) {
                node.phase = Phase::Present;
                settled += 1;
            }
        }
        for edge in self.edges.values_mut() {
            if matches!(edge.phase, Phase::Entering(t) if t.end() <= now) {
                edge.phase = Phase::Present;
                settled += 1;
            }
        }
        settled
    }
}

fn stagger(animation: &AnimationSettings, index: usize) -> Duration {
    if animation.stagger.is_zero() {
        return Duration::ZERO;
    }
    u32::try_from(index)
        .ok()
        .and_then(|i| animation.stagger.checked_mul(i))
        .unwrap_or(Duration::MAX)
}
