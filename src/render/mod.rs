mod renderer;
mod scene;
mod schedule;
mod visual;

pub use renderer::{AdvanceReport, PassReport, TreeRenderer};
pub use scene::{PassContext, ReconcileStats, Scene, TaskOutcome};
pub use schedule::{Scheduler, Task};
pub use visual::{
    EdgeKey, Generation, Phase, Transition, TransitionKind, VisualEdge, VisualNode, link_path,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Zoom level must be a positive finite number, got {0}")]
    InvalidZoom(f64),
    #[error("Pan offset must be finite")]
    InvalidPan,
    #[error("No live visual for node: {0}")]
    UnknownVisual(String),
}
