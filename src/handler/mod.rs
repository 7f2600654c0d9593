//! Request handler module
//!
//! Hyper-facing service: applies the mount prefix, runs the file responder and
//! turns its errors into HTTP statuses.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
