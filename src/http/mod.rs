//! HTTP protocol layer module
//!
//! Response bodies, media type lookup, and status response builders shared by the
//! file responder and the request service.

pub mod body;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use response::{
    build_404_response, build_error_response, build_status_response, build_text_response,
};
