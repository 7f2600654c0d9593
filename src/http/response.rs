//! HTTP response building module
//!
//! Builders for responses that carry a status and at most a short text body.

use crate::http::body::{self, ResponseBody};
use crate::responder::FileError;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};

/// Build a response with `status` and an empty body
pub fn build_status_response(status: StatusCode) -> Response<ResponseBody> {
    let mut response = Response::new(body::empty());
    *response.status_mut() = status;
    response
}

/// Build a plain-text response such as `404 Not Found`
pub fn build_text_response(status: StatusCode) -> Response<ResponseBody> {
    let text = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))
        .body(body::full(text))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            build_status_response(status)
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::NOT_FOUND)
}

/// Translate a responder failure into the response sent to the client
///
/// Only the status reaches the client; the path and cause stay in the logs.
pub fn build_error_response(error: &FileError) -> Response<ResponseBody> {
    build_text_response(error.status())
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::body::Body;
    use std::io;

    #[test]
    fn test_status_response_is_empty() {
        let response = build_status_response(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().is_empty());
        assert!(response.body().is_end_stream());
    }

    #[tokio::test]
    async fn test_error_responses() {
        let not_found = build_error_response(&FileError::NotFound {
            path: "/srv/www/a".to_string(),
        });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        let text = not_found.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(text, "404 Not Found");

        let directory = build_error_response(&FileError::IsDirectory {
            path: "/srv/www/assets".to_string(),
        });
        assert_eq!(directory.status(), StatusCode::NOT_FOUND);

        let failure = build_error_response(&FileError::ReadFailure {
            path: "/srv/www/b".to_string(),
            source: io::Error::other("disk on fire"),
        });
        assert_eq!(failure.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let text = failure.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(text, "500 Internal Server Error");
    }
}
