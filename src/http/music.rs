use std::io;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use http_range_header::parse_range_header;
use httpdate::{fmt_http_date, parse_http_date};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::http::error::{HandlerError, HttpError};
use crate::http::state::AppState;
use crate::media::mime::content_type_for;
use crate::media::LibraryFs;

/// GET /music/{*path}: stream one file of the library, honouring `Range`.
/// HEAD is answered by the same handler; axum drops the body.
pub async fn serve_music(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    req_headers: HeaderMap,
) -> Result<Response, HandlerError> {
    let Path(path) =
        path.map_err(|rejection| HttpError::bad_request(rejection, "Malformed file path"))?;
    serve_file(state.library.as_ref(), &path, &req_headers).await
}

/// Stream the regular file at `path` of `fs`: 200 for a plain GET, 206 for a
/// satisfiable `Range`, 416 otherwise, 404 when there is no file there.
///
/// When the file's modification time is known it is sent as `Last-Modified`,
/// `If-Modified-Since` can answer 304 and `If-Range` guards partial requests.
pub async fn serve_file(
    fs: &dyn LibraryFs,
    path: &str,
    req_headers: &HeaderMap,
) -> Result<Response, HandlerError> {
    let file = match fs.open(path).await {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(HttpError::not_found(err).into());
        }
        Err(err) => {
            return Err(anyhow::Error::new(err)
                .context(format!("could not open {path}"))
                .into());
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&content_type_for(path))
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(file.len));
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    // HTTP dates have one second resolution.
    let modified = file.modified.and_then(whole_seconds);
    if let Some(modified) = modified {
        if let Ok(value) = HeaderValue::from_str(&fmt_http_date(modified)) {
            headers.insert(header::LAST_MODIFIED, value);
        }
        let since = header_date(req_headers, header::IF_MODIFIED_SINCE);
        if since.is_some_and(|since| modified <= since) {
            headers.remove(header::CONTENT_LENGTH);
            return Ok((StatusCode::NOT_MODIFIED, headers).into_response());
        }
    }

    // A stale `If-Range` validator turns the request into a plain GET.
    let range_applies = match req_headers.get(header::IF_RANGE) {
        None => true,
        Some(_) => match (modified, header_date(req_headers, header::IF_RANGE)) {
            (Some(modified), Some(validator)) => modified <= validator,
            _ => false,
        },
    };

    let Some(range_val) = req_headers.get(header::RANGE).filter(|_| range_applies) else {
        let body = Body::from_stream(ReaderStream::new(file.reader));
        return Ok((StatusCode::OK, headers, body).into_response());
    };

    // An unreadable or unsatisfiable Range is answered with 416, not an error.
    let Some((start, end)) = range_val
        .to_str()
        .ok()
        .and_then(|range| first_range(range, file.len))
    else {
        return Ok(unsatisfiable(file.len));
    };

    let length = end - start + 1;
    let mut reader = file.reader;
    reader
        .seek(io::SeekFrom::Start(start))
        .await
        .with_context(|| format!("could not seek to byte {start} of {path}"))?;

    headers.insert(
        header::CONTENT_RANGE,
        HeaderValue::from_str(&format!("bytes {}-{}/{}", start, end, file.len))
            .unwrap_or_else(|_| HeaderValue::from_static("bytes 0-0/0")),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));

    let body = Body::from_stream(ReaderStream::new(reader.take(length)));
    Ok((StatusCode::PARTIAL_CONTENT, headers, body).into_response())
}

fn header_date(headers: &HeaderMap, name: header::HeaderName) -> Option<SystemTime> {
    let value = headers.get(name)?.to_str().ok()?;
    parse_http_date(value).ok()
}

fn whole_seconds(time: SystemTime) -> Option<SystemTime> {
    let since_epoch = time.duration_since(UNIX_EPOCH).ok()?;
    Some(UNIX_EPOCH + Duration::from_secs(since_epoch.as_secs()))
}

/// First satisfiable range of a `Range` header value, as inclusive byte
/// offsets. Multi-range requests are served their first range only.
fn first_range(range: &str, len: u64) -> Option<(u64, u64)> {
    let ranges = parse_range_header(range).ok()?.validate(len).ok()?;
    let first = ranges.into_iter().next()?;
    Some((*first.start(), *first.end()))
}

fn unsatisfiable(len: u64) -> Response {
    (
        StatusCode::RANGE_NOT_SATISFIABLE,
        [(header::CONTENT_RANGE, format!("bytes */{len}"))],
    )
        .into_response()
}
