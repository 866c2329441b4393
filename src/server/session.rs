use crate::interaction::{Gesture, ViewState};
use crate::model::{Point, TreeNode};
use crate::render::{PassReport, RenderError, TreeRenderer};
use crate::svg::render_svg;
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Body returned by every scene-producing endpoint.
#[derive(Debug, Serialize)]
pub struct SceneResponse {
    pub svg: String,
    pub report: PassReport,
    /// Poll again soon: transitions or removals are still in flight.
    pub animating: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigate: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ViewportRequest {
    pub zoom: f64,
    #[serde(default)]
    pub pan_x: f64,
    #[serde(default)]
    pub pan_y: f64,
}

/// One viewer's renderer and view state.
///
/// Wall-clock time between calls is fed to the renderer's clock so exit
/// removals fire while the page is open.
#[derive(Debug)]
pub struct Session {
    renderer: TreeRenderer,
    view: ViewState,
    last_tick: Instant,
}

impl Session {
    pub fn new(renderer: TreeRenderer, view: ViewState) -> Self {
        Self {
            renderer,
            view,
            last_tick: Instant::now(),
        }
    }

    pub fn tree(&self) -> Option<&TreeNode> {
        self.renderer.tree()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.step(elapsed);
    }

    fn step(&mut self, elapsed: Duration) {
        let report = self.renderer.advance(elapsed);
        if report.removed_nodes > 0 {
            debug!(removed = report.removed_nodes, "session clock advanced");
        }
    }

    fn pass(&mut self) -> Result<SceneResponse, RenderError> {
        let report = self.renderer.render(&self.view)?;
        Ok(SceneResponse {
            svg: render_svg(&self.renderer),
            report,
            animating: self.renderer.is_animating(),
            navigate: self.view.take_navigation(),
        })
    }

    pub fn scene(&mut self) -> Result<SceneResponse, RenderError> {
        self.tick();
        self.pass()
    }

    pub fn gesture(&mut self, gesture: &Gesture) -> Result<SceneResponse, RenderError> {
        self.tick();
        let outcome = self.renderer.dispatch(gesture, &mut self.view)?;
        debug!(id = %gesture.id, ?outcome, "gesture");
        self.pass()
    }

    pub fn set_viewport(&mut self, request: ViewportRequest) -> Result<SceneResponse, RenderError> {
        let viewport = Viewport::new(request.zoom, Point::new(request.pan_x, request.pan_y))?;
        self.tick();
        self.view.zoom = viewport.zoom;
        self.view.pan = viewport.pan;
        self.pass()
    }

    #[cfg(test)]
    fn advance(&mut self, by: Duration) {
        self.step(by);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::interaction::GestureKind;

    fn session() -> Session {
        let tree = TreeNode::new("root", "OSINT").with_children(vec![
            TreeNode::new("a", "A").with_children(vec![TreeNode::new("a0", "A0")]),
            TreeNode::new("b", "B").with_url("https://b.example"),
        ]);
        Session::new(
            TreeRenderer::with_tree(tree, Config::default()),
            ViewState::new().with_expanded(["root"]),
        )
    }

    #[test]
    fn test_click_expands_and_animates() {
        let mut s = session();
        let first = s.scene().unwrap();
        assert!(first.report.initial);
        assert!(!first.animating);

        let clicked = s.gesture(&Gesture::new("a", GestureKind::Click)).unwrap();
        assert_eq!(clicked.report.newly_expanded, vec!["a"]);
        assert!(clicked.animating);
        assert!(clicked.svg.contains("data-id=\"a0\""));
        assert!(s.view().is_expanded("a"));
    }

    #[test]
    fn test_collapse_settles_after_exit_window() {
        let mut s = session();
        s.scene().unwrap();
        s.gesture(&Gesture::new("a", GestureKind::Click)).unwrap();
        s.gesture(&Gesture::new("a", GestureKind::Click)).unwrap();

        s.advance(Duration::from_secs(1));
        let settled = s.scene().unwrap();
        assert!(!settled.animating);
        assert!(!settled.svg.contains("data-id=\"a0\""));
    }

    #[test]
    fn test_link_gesture_returns_navigation() {
        let mut s = session();
        s.scene().unwrap();
        let response = s.gesture(&Gesture::new("b", GestureKind::Link)).unwrap();
        assert_eq!(response.navigate.as_deref(), Some("https://b.example"));
        assert!(!s.view().is_expanded("b"));
    }

    #[test]
    fn test_unknown_gesture_target() {
        let mut s = session();
        s.scene().unwrap();
        let result = s.gesture(&Gesture::new("a0", GestureKind::Enter));
        assert!(matches!(result, Err(RenderError::UnknownVisual(_))));
    }

    #[test]
    fn test_viewport_validation() {
        let mut s = session();
        let bad = s.set_viewport(ViewportRequest {
            zoom: 0.0,
            pan_x: 0.0,
            pan_y: 0.0,
        });
        assert!(matches!(bad, Err(RenderError::InvalidZoom(_))));

        let ok = s
            .set_viewport(ViewportRequest {
                zoom: 2.0,
                pan_x: 15.0,
                pan_y: -5.0,
            })
            .unwrap();
        assert!(ok.svg.contains("translate(15, -5) scale(2)"));
    }
}
