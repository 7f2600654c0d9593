//! Request handler serving files below a root path

use super::builder::build_file_response;
use super::error::FileError;
use super::fs::{DiskFileSystem, FileSystem};
use crate::http::body::ResponseBody;
use crate::http::response::build_status_response;
use hyper::header::HeaderMap;
use hyper::{Method, Request, Response, StatusCode};
use std::borrow::Cow;

/// File name substituted when a request path ends with `/`
pub const INDEX_FILE: &str = "index.html";

/// Serves GET requests from files below `root_path`
///
/// The served path is `root_path` followed by the decoded request path, joined as
/// plain strings. `..` segments are not resolved, so a request path containing
/// them can reach outside `root_path`.
#[derive(Debug, Clone)]
pub struct FileResponder<F = DiskFileSystem> {
    root_path: String,
    fs: F,
}

impl FileResponder {
    /// Responder reading from the local disk
    pub fn new(root_path: impl Into<String>) -> Self {
        Self::with_file_system(root_path, DiskFileSystem)
    }
}

impl<F: FileSystem> FileResponder<F> {
    pub fn with_file_system(root_path: impl Into<String>, fs: F) -> Self {
        Self {
            root_path: root_path.into(),
            fs,
        }
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// Filesystem path served for a decoded request path
    pub fn resolve_path(&self, request_path: &str) -> String {
        let mut file_path = String::with_capacity(
            self.root_path.len() + request_path.len() + INDEX_FILE.len(),
        );
        file_path.push_str(&self.root_path);
        file_path.push_str(request_path);
        if request_path.ends_with('/') {
            file_path.push_str(INDEX_FILE);
        }
        file_path
    }

    /// Answer `request` with the file its path names
    ///
    /// Non-GET requests get 405 and requests without a usable path get 500, both
    /// without touching the file system. Every other outcome comes from
    /// [`build_file_response`], and its errors are returned as-is.
    pub async fn respond<B>(&self, request: &Request<B>) -> Result<Response<ResponseBody>, FileError> {
        if *request.method() != Method::GET {
            return Ok(build_status_response(StatusCode::METHOD_NOT_ALLOWED));
        }

        let Some(request_path) = request_path(request) else {
            return Ok(build_status_response(StatusCode::INTERNAL_SERVER_ERROR));
        };

        let file_path = self.resolve_path(&request_path);
        build_file_response(&self.fs, StatusCode::OK, HeaderMap::new(), &file_path).await
    }
}

/// Percent-decoded request path
///
/// `None` when the decoded bytes are not valid UTF-8.
pub fn request_path<B>(request: &Request<B>) -> Option<Cow<'_, str>> {
    urlencoding::decode(request.uri().path()).ok()
}
