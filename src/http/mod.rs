pub mod assets;
pub mod auth;
pub mod error;
pub mod folders;
pub mod music;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::http::state::AppState;

/// Upper bound on the time spent answering one request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub fn build_router(state: AppState) -> Router {
    let gate =
        middleware::from_fn_with_state(Arc::clone(&state.sessions), auth::require_session);
    let music_route = format!("{}/{{*path}}", state.explorer.mount());

    // Everything touching the library sits behind the session gate.
    let library = Router::new()
        .route("/api/folders", get(folders::list_root))
        .route("/api/folders/", get(folders::list_root))
        .route("/api/folders/{*path}", get(folders::list_folder))
        .route(&music_route, get(music::serve_music))
        .route_layer(gate);

    Router::new()
        .merge(library)
        .route("/assets/{*path}", get(assets::serve_asset))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}
