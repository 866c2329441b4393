//! Gesture routing from visuals to the caller's state.
//!
//! The renderer never owns expansion or hover state. It forwards gestures on
//! live visuals to a [`TreeCallbacks`] implementation and reads the resulting
//! state back on the next pass. [`ViewState`] is the stock implementation.

use crate::model::{Point, TreeIndex};
use crate::render::{RenderError, Scene};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    /// Click on the node body.
    Click,
    /// Pointer entered the node.
    Enter,
    /// Pointer left the node.
    Leave,
    /// Click on the external-link affordance.
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gesture {
    pub id: String,
    pub kind: GestureKind,
}

impl Gesture {
    pub fn new(id: impl Into<String>, kind: GestureKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// State-setting hooks supplied by whoever owns the view state.
pub trait TreeCallbacks {
    fn toggle_node(&mut self, id: &str);

    fn set_hovered_node(&mut self, id: Option<&str>);

    /// Open `url` in a new browsing context.
    fn open_url(&mut self, url: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Toggled,
    Hovered,
    Unhovered,
    Navigated(String),
    /// The gesture had no handler: the visual is fading out, or a link click
    /// landed on a node without a URL.
    Ignored,
}

/// Route `gesture` to `callbacks` if the targeted visual is live.
pub fn dispatch(
    scene: &Scene,
    gesture: &Gesture,
    callbacks: &mut dyn TreeCallbacks,
) -> Result<Dispatched, RenderError> {
    let Some(node) = scene.node(&gesture.id) else {
        warn!(id = %gesture.id, kind = ?gesture.kind, "gesture on unknown visual");
        return Err(RenderError::UnknownVisual(gesture.id.clone()));
    };
    if node.is_exiting() {
        debug!(id = %gesture.id, "gesture on exiting visual ignored");
        return Ok(Dispatched::Ignored);
    }

    let outcome = match gesture.kind {
        GestureKind::Click => {
            callbacks.toggle_node(&node.id);
            Dispatched::Toggled
        }
        GestureKind::Enter => {
            callbacks.set_hovered_node(Some(&node.id));
            Dispatched::Hovered
        }
        GestureKind::Leave => {
            callbacks.set_hovered_node(None);
            Dispatched::Unhovered
        }
        // The link affordance swallows the click; it never toggles.
        GestureKind::Link => match &node.url {
            Some(url) => {
                callbacks.open_url(url);
                Dispatched::Navigated(url.clone())
            }
            None => Dispatched::Ignored,
        },
    };
    Ok(outcome)
}

/// Caller-side view state: expanded set, hover, zoom and pan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub expanded: BTreeSet<String>,
    pub hovered: Option<String>,
    pub zoom: f64,
    pub pan: Point,
    /// Last URL requested through the link affordance, not yet consumed.
    #[serde(skip)]
    pub pending_navigation: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            expanded: BTreeSet::new(),
            hovered: None,
            zoom: 1.0,
            pan: Point::default(),
            pending_navigation: None,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expanded<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expanded.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expand(&mut self, id: &str) {
        self.expanded.insert(id.to_string());
    }

    pub fn collapse(&mut self, id: &str) {
        self.expanded.remove(id);
    }

    /// Expand every ancestor of `id` so it becomes visible.
    pub fn reveal(&mut self, index: &TreeIndex, id: &str) -> bool {
        if !index.contains(id) {
            return false;
        }
        self.expanded.extend(index.ancestors(id));
        true
    }

    pub fn expand_all(&mut self, index: &TreeIndex) {
        self.expanded.extend(index.branch_ids());
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn take_navigation(&mut self) -> Option<String> {
        self.pending_navigation.take()
    }
}

impl TreeCallbacks for ViewState {
    fn toggle_node(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    fn set_hovered_node(&mut self, id: Option<&str>) {
        self.hovered = id.map(str::to_string);
    }

    fn open_url(&mut self, url: &str) {
        self.pending_navigation = Some(url.to_string());
    }
}
