//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: mount prefix matching, dispatch to the
//! file responder, error translation and access logging.

use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body;
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::http::request::Parts;
use hyper::{Request, Response, Uri, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Request bodies are never read; they are dropped before any file I/O.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();

    let entry = state
        .config
        .logging
        .access_log
        .then(|| access_log_entry(&parts, remote_addr));

    let response = serve(Request::from_parts(parts, ()), &state).await;

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route a request to the file responder
async fn serve(req: Request<()>, state: &AppState) -> Response<ResponseBody> {
    let Some(req) = remount(req, &state.mount_prefix) else {
        return http::build_404_response();
    };

    match state.responder.respond(&req).await {
        Ok(response) => response,
        Err(err) => {
            logger::log_file_error(&err);
            http::build_error_response(&err)
        }
    }
}

/// Rewrite the request URI relative to the mount prefix
///
/// `None` when the path lies outside the prefix.
fn remount(mut req: Request<()>, prefix: &str) -> Option<Request<()>> {
    if prefix.is_empty() {
        return Some(req);
    }

    let path = strip_mount_prefix(req.uri().path(), prefix)?;
    let path_and_query = match req.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    match path_and_query.parse::<Uri>() {
        Ok(uri) => {
            *req.uri_mut() = uri;
            Some(req)
        }
        Err(e) => {
            logger::log_warning(&format!(
                "Cannot rewrite '{path_and_query}' below mount prefix '{prefix}': {e}"
            ));
            None
        }
    }
}

/// Remainder of `path` below `prefix`, always starting with `/`
///
/// `prefix` is expected without a trailing `/`. A path equal to the prefix maps to
/// `/`; a path that only shares leading characters (`/statics` under `/static`)
/// does not match.
pub fn strip_mount_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(path);
    }
    match path.strip_prefix(prefix)? {
        "" => Some("/"),
        rest if rest.starts_with('/') => Some(rest),
        _ => None,
    }
}

fn access_log_entry(parts: &Parts, remote_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = http_version(parts.version).to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

const fn http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
