//! File-backed response construction
//!
//! [`build_file_response`] turns a resolved filesystem path into a response whose
//! body streams the file, or classifies why it cannot.

use super::error::FileError;
use super::fs::FileSystem;
use crate::http::body::{self, ResponseBody};
use crate::http::mime;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};

/// Build a response streaming the file at `file_path`
///
/// Checks run in a fixed order: existence, directory, open. The opened file is
/// moved into the response body. `Content-Type` is set only when the extension
/// has a registered media type; any other header comes from `headers`.
pub async fn build_file_response<F: FileSystem>(
    fs: &F,
    status: StatusCode,
    headers: HeaderMap,
    file_path: &str,
) -> Result<Response<ResponseBody>, FileError> {
    let existence = fs.exists(file_path).await;
    if !existence.exists {
        return Err(FileError::NotFound {
            path: file_path.to_string(),
        });
    }
    if existence.is_directory {
        return Err(FileError::IsDirectory {
            path: file_path.to_string(),
        });
    }

    // The entry may vanish between the two calls; that surfaces here
    let file = fs
        .open(file_path)
        .await
        .map_err(|source| FileError::ReadFailure {
            path: file_path.to_string(),
            source,
        })?;

    let mut response = Response::new(body::stream(file));
    *response.status_mut() = status;
    *response.headers_mut() = headers;

    if let Some(media_type) = file_extension(file_path).and_then(mime::media_type) {
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(media_type));
    }

    Ok(response)
}

/// Extension of the final path segment, without the dot
///
/// `None` when the segment has no dot or ends with one.
pub fn file_extension(file_path: &str) -> Option<&str> {
    let segment = file_path.rsplit('/').next().unwrap_or(file_path);
    segment
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}
