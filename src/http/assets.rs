use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::HeaderMap,
    response::Response,
};

use crate::http::error::{HandlerError, HttpError};
use crate::http::music::serve_file;
use crate::http::state::AppState;

/// GET /assets/{*path}: static files of the web client. Not behind the
/// session gate: the sign-in page needs them.
pub async fn serve_asset(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    req_headers: HeaderMap,
) -> Result<Response, HandlerError> {
    let Path(path) =
        path.map_err(|rejection| HttpError::bad_request(rejection, "Malformed asset path"))?;
    let Some(assets) = state.assets.as_deref() else {
        return Err(HttpError::not_found("no assets directory configured").into());
    };
    serve_file(assets, &path, &req_headers).await
}
