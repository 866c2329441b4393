use crate::model::{NodeFlags, Point, fmt_coord};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Identity stamp of one visual's lifetime. Never reused.
pub type Generation = u64;

/// Identity of a parent-child connector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeKey {
    pub parent: String,
    pub child: String,
}

impl EdgeKey {
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.parent, self.child)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    FadeIn,
    DrawIn,
    FadeOut,
}

/// A time-scheduled visual change, expressed on the renderer's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub kind: TransitionKind,
    pub start: Duration,
    pub duration: Duration,
}

impl Transition {
    pub fn end(&self) -> Duration {
        self.start.saturating_add(self.duration)
    }

    /// Completed fraction in `[0, 1]` at clock time `now`.
    pub fn progress(&self, now: Duration) -> f64 {
        if now <= self.start {
            return 0.0;
        }
        if self.duration.is_zero() || now >= self.end() {
            return 1.0;
        }
        (now - self.start).as_secs_f64() / self.duration.as_secs_f64()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Entering(Transition),
    Present,
    Exiting(Transition),
}

impl Phase {
    pub fn opacity(&self, now: Duration) -> f64 {
        match self {
            Phase::Entering(t) => t.progress(now),
            Phase::Present => 1.0,
            Phase::Exiting(t) => 1.0 - t.progress(now),
        }
    }
}

/// Live on-screen representation of a tree node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualNode {
    pub id: String,
    pub label: String,
    pub url: Option<String>,
    pub flags: NodeFlags,
    pub position: Point,
    /// The node has children in the data tree.
    pub expandable: bool,
    pub expanded: bool,
    pub hovered: bool,
    pub generation: Generation,
    pub phase: Phase,
}

impl VisualNode {
    pub fn is_exiting(&self) -> bool {
        matches!(self.phase, Phase::Exiting(_))
    }

    pub fn is_entering(&self) -> bool {
        matches!(self.phase, Phase::Entering(_))
    }

    pub fn opacity(&self, now: Duration) -> f64 {
        self.phase.opacity(now)
    }
}

/// Live connector between a parent visual and a child visual.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualEdge {
    pub key: EdgeKey,
    pub from: Point,
    pub to: Point,
    pub path: String,
    pub generation: Generation,
    pub phase: Phase,
}

impl VisualEdge {
    pub fn is_exiting(&self) -> bool {
        matches!(self.phase, Phase::Exiting(_))
    }

    pub fn set_endpoints(&mut self, from: Point, to: Point) {
        self.from = from;
        self.to = to;
        self.path = link_path(from, to);
    }
}

/// Horizontal cubic link between two points.
pub fn link_path(from: Point, to: Point) -> String {
    let mid_x = (from.x + to.x) / 2.0;
    format!(
        "M{},{}C{},{} {},{} {},{}",
        fmt_coord(from.x),
        fmt_coord(from.y),
        fmt_coord(mid_x),
        fmt_coord(from.y),
        fmt_coord(mid_x),
        fmt_coord(to.y),
        fmt_coord(to.x),
        fmt_coord(to.y)
    )
}
