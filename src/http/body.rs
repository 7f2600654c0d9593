//! Response body module
//!
//! Every response produced by this crate carries a [`ResponseBody`], a boxed body
//! whose frames are either in-memory bytes or chunks read lazily from a file.

use bytes::Bytes;
use futures::TryStreamExt;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::Frame;
use std::io;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// Boxed body type shared by all responses
pub type ResponseBody = BoxBody<Bytes, io::Error>;

/// Body with no content
pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

/// Body holding a single in-memory chunk
pub fn full<T: Into<Bytes>>(chunk: T) -> ResponseBody {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Body streaming the contents of `reader`
///
/// The reader is owned by the body. It is dropped, and for files closed, once the
/// body is dropped, whether or not it was read to the end.
pub fn stream<R>(reader: R) -> ResponseBody
where
    R: AsyncRead + Send + Sync + 'static,
{
    StreamBody::new(ReaderStream::new(reader).map_ok(Frame::data)).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Body;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_stream_yields_reader_bytes() {
        let data = b"streamed file contents".to_vec();
        let body = stream(Cursor::new(data.clone()));
        let collected = body.collect().await.unwrap().to_bytes();
        assert_eq!(collected.as_ref(), data.as_slice());
    }

    #[tokio::test]
    async fn test_empty_and_full() {
        let body = empty();
        assert!(body.is_end_stream());
        assert!(body.collect().await.unwrap().to_bytes().is_empty());

        let body = full("hello");
        assert_eq!(body.size_hint().exact(), Some(5));
        assert_eq!(body.collect().await.unwrap().to_bytes(), "hello");
    }
}
