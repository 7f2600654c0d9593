//! Static file server
//!
//! [`responder::FileResponder`] maps GET requests onto files below a root path and
//! streams them back with a `Content-Type` inferred from the extension. The
//! remaining modules wrap it into a standalone HTTP/1 server: layered
//! configuration, access logging, and a hyper accept loop with graceful shutdown.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod responder;
pub mod server;
