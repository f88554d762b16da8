use std::io;

use anyhow::Context;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::http::error::{HandlerError, HttpError};
use crate::http::state::AppState;
use crate::media::ExploreError;

pub const JSON_MEDIA_TYPE: &str = "application/json; charset=utf-8";

/// GET /api/folders and /api/folders/: contents of the library root.
pub async fn list_root(State(state): State<AppState>) -> Result<Response, HandlerError> {
    list(&state, ".").await
}

/// GET /api/folders/{*path}: contents of the folder at `path`.
pub async fn list_folder(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, HandlerError> {
    let Path(folder) =
        path.map_err(|rejection| HttpError::bad_request(rejection, "Malformed folder path"))?;
    let folder = if folder.is_empty() { "." } else { folder.as_str() };
    list(&state, folder).await
}

async fn list(state: &AppState, folder: &str) -> Result<Response, HandlerError> {
    let contents = match state.explorer.list_contents(folder).await {
        Ok(contents) => contents,
        Err(err) if err.io_kind() == io::ErrorKind::NotFound => {
            return Err(HttpError::not_found(err).into());
        }
        Err(err) => return Err(explore_failure(err, folder).into()),
    };

    let body = serde_json::to_vec(&contents)
        .with_context(|| format!("could not encode the contents of {folder} to JSON"))?;
    Ok(([(header::CONTENT_TYPE, JSON_MEDIA_TYPE)], body).into_response())
}

fn explore_failure(err: ExploreError, folder: &str) -> anyhow::Error {
    anyhow::Error::new(err).context(format!(
        "error while retrieving the contents of the folder at path {folder}"
    ))
}
