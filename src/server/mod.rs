mod assets;
mod routes;
mod session;

pub use routes::{AppState, router, serve};
pub use session::{SceneResponse, Session, ViewportRequest};
