use super::RenderError;
use super::scene::{PassContext, ReconcileStats, Scene, TaskOutcome};
use super::schedule::Scheduler;
use crate::config::Config;
use crate::interaction::{Dispatched, Gesture, TreeCallbacks, ViewState, dispatch};
use crate::layout::{Layout, compute_layout};
use crate::model::{Point, TreeIndex, TreeNode};
use crate::palette::Palette;
use crate::viewport::Viewport;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tracing::{debug, instrument, trace};

/// What one render pass did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassReport {
    /// False when no tree was loaded and the pass was a no-op.
    pub rendered: bool,
    /// First pass with data; its expanded set becomes the baseline.
    pub initial: bool,
    pub layout_recomputed: bool,
    pub hover_changed: bool,
    pub visible_nodes: usize,
    pub newly_expanded: Vec<String>,
    pub newly_collapsed: Vec<String>,
    #[serde(flatten)]
    pub stats: ReconcileStats,
}

/// What advancing the clock did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdvanceReport {
    pub removed_nodes: usize,
    pub removed_edges: usize,
    /// Removals skipped because their visual had been recreated.
    pub stale_skipped: usize,
    /// Entrance transitions that finished.
    pub settled: usize,
}

/// Incremental renderer for one reference tree.
///
/// Each [`render`](Self::render) call lays out the visible part of the tree
/// for the caller's [`ViewState`] and reconciles the live scene against it.
/// Exit animations are scheduled on an internal clock driven by
/// [`advance`](Self::advance).
#[derive(Debug)]
pub struct TreeRenderer {
    config: Config,
    palette: Palette,
    tree: Option<TreeNode>,
    index: TreeIndex,
    scene: Scene,
    scheduler: Scheduler,
    layout: Option<Layout>,
    positions: HashMap<String, Point>,
    previous_expanded: Option<BTreeSet<String>>,
    viewport: Viewport,
}

impl TreeRenderer {
    pub fn new(config: Config) -> Self {
        let palette = Palette::new(config.palette.clone());
        Self {
            config,
            palette,
            tree: None,
            index: TreeIndex::default(),
            scene: Scene::new(),
            scheduler: Scheduler::new(),
            layout: None,
            positions: HashMap::new(),
            previous_expanded: None,
            viewport: Viewport::default(),
        }
    }

    pub fn with_tree(tree: TreeNode, config: Config) -> Self {
        let mut renderer = Self::new(config);
        renderer.set_tree(tree);
        renderer
    }

    /// Install (or replace) the tree. The next pass recomputes the layout.
    pub fn set_tree(&mut self, tree: TreeNode) {
        debug!(root = %tree.id, nodes = tree.subtree_size(), "tree loaded");
        self.index = TreeIndex::build(&tree);
        self.tree = Some(tree);
        self.layout = None;
    }

    pub fn tree(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    pub fn index(&self) -> &TreeIndex {
        &self.index
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Whether a transition is still running or a removal is still pending.
    pub fn is_animating(&self) -> bool {
        self.pending_tasks() > 0
            || self.scene.nodes().any(|n| n.is_entering())
            || self
                .scene
                .edges()
                .any(|e| matches!(e.phase, super::Phase::Entering(_)))
    }

    /// Most recent laid-out position of `id`, kept across passes.
    pub fn last_position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// Model-space anchor of the root.
    pub fn origin(&self) -> Point {
        Point::new(self.config.layout.origin_x, self.config.layout.origin_y)
    }

    /// Run one layout + reconcile pass for `view`.
    #[instrument(level = "debug", skip_all)]
    pub fn render(&mut self, view: &ViewState) -> Result<PassReport, RenderError> {
        self.viewport = Viewport::new(view.zoom, view.pan)?;

        let origin = self.origin();
        let Some(tree) = self.tree.as_ref() else {
            debug!("no tree loaded yet, skipping pass");
            return Ok(PassReport::default());
        };

        let initial = self.previous_expanded.is_none();
        let previous = self
            .previous_expanded
            .take()
            .unwrap_or_else(|| view.expanded.clone());
        let newly_expanded: BTreeSet<String> =
            view.expanded.difference(&previous).cloned().collect();
        let newly_collapsed: BTreeSet<String> =
            previous.difference(&view.expanded).cloned().collect();
        let hovered = view.hovered.as_deref();

        let mut report = PassReport {
            rendered: true,
            initial,
            hover_changed: self.scene.hovered() != hovered,
            ..PassReport::default()
        };

        if self.layout.is_none() || previous != view.expanded {
            let layout = compute_layout(tree, origin, &view.expanded, &self.config.layout);
            self.positions
                .extend(layout.positions().iter().map(|(id, p)| (id.clone(), *p)));

            let ctx = PassContext {
                layout: &layout,
                index: &self.index,
                expanded: &view.expanded,
                newly_expanded: &newly_expanded,
                newly_collapsed: &newly_collapsed,
                hovered,
                animation: &self.config.animation,
            };
            report.stats = self.scene.reconcile(&ctx, &mut self.scheduler);
            report.layout_recomputed = true;
            self.layout = Some(layout);
        } else {
            trace!("expanded set unchanged, reusing layout");
            self.scene.apply_hover(hovered);
        }

        report.visible_nodes = self.layout.as_ref().map_or(0, Layout::len);
        report.newly_expanded = newly_expanded.into_iter().collect();
        report.newly_collapsed = newly_collapsed.into_iter().collect();
        self.previous_expanded = Some(view.expanded.clone());

        debug!(
            visible = report.visible_nodes,
            created = report.stats.created_nodes,
            updated = report.stats.updated_nodes,
            exiting = report.stats.exiting_nodes,
            relayout = report.layout_recomputed,
            "render pass"
        );
        Ok(report)
    }

    /// Advance the animation clock, firing due removals.
    pub fn advance(&mut self, by: Duration) -> AdvanceReport {
        self.scheduler.advance(by);
        let mut report = AdvanceReport::default();
        for task in self.scheduler.drain_due() {
            match self.scene.apply_task(task) {
                TaskOutcome::RemovedNode { edges } => {
                    report.removed_nodes += 1;
                    report.removed_edges += edges;
                }
                TaskOutcome::RemovedEdge => report.removed_edges += 1,
                TaskOutcome::Stale => report.stale_skipped += 1,
                TaskOutcome::Missing => {}
            }
        }
        report.settled = self.scene.settle(self.scheduler.now());
        if report.removed_nodes > 0 || report.stale_skipped > 0 {
            debug!(
                removed = report.removed_nodes,
                stale = report.stale_skipped,
                "advanced clock"
            );
        }
        report
    }

    /// Advance until no removal is pending.
    pub fn flush(&mut self) -> AdvanceReport {
        let mut total = AdvanceReport::default();
        while let Some(due) = self.scheduler.next_due() {
            let step = due.saturating_sub(self.scheduler.now());
            let report = self.advance(step);
            total.removed_nodes += report.removed_nodes;
            total.removed_edges += report.removed_edges;
            total.stale_skipped += report.stale_skipped;
            total.settled += report.settled;
        }
        total
    }

    /// Forward a gesture on a live visual to `callbacks`.
    pub fn dispatch(
        &self,
        gesture: &Gesture,
        callbacks: &mut dyn TreeCallbacks,
    ) -> Result<Dispatched, RenderError> {
        dispatch(&self.scene, gesture, callbacks)
    }
}
