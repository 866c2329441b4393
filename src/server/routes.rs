use super::assets::INDEX_HTML;
use super::session::{Session, ViewportRequest};
use crate::interaction::Gesture;
use crate::render::RenderError;
use crate::style;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub session: Mutex<Session>,
}

/// Render errors mapped onto HTTP statuses.
struct ApiError(RenderError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            RenderError::UnknownVisual(_) => StatusCode::NOT_FOUND,
            RenderError::InvalidZoom(_) | RenderError::InvalidPan => StatusCode::BAD_REQUEST,
        };
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

impl From<RenderError> for ApiError {
    fn from(e: RenderError) -> Self {
        Self(e)
    }
}

pub fn router(session: Session) -> Router {
    let state = Arc::new(AppState {
        session: Mutex::new(session),
    });

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/tree", get(tree_handler))
        .route("/api/scene", get(scene_handler))
        .route("/api/gesture", post(gesture_handler))
        .route("/api/viewport", post(viewport_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server for the interactive viewer
pub async fn serve(
    session: Session,
    port: u16,
    open_browser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(session);

    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}", addr);

    style::header("Starting osintree viewer...");
    eprintln!("Open in browser: {}", style::url(&url));
    style::hint("Press Ctrl+C to stop");

    if open_browser {
        if let Err(e) = open::that(&url) {
            style::warning(&format!("Could not open browser: {}", e));
        }
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn tree_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(session.tree().cloned())
}

async fn scene_handler(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let mut session = state.session.lock().await;
    Ok(Json(session.scene()?).into_response())
}

async fn gesture_handler(
    State(state): State<Arc<AppState>>,
    Json(gesture): Json<Gesture>,
) -> Result<Response, ApiError> {
    let mut session = state.session.lock().await;
    Ok(Json(session.gesture(&gesture)?).into_response())
}

async fn viewport_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ViewportRequest>,
) -> Result<Response, ApiError> {
    let mut session = state.session.lock().await;
    Ok(Json(session.set_viewport(request)?).into_response())
}
