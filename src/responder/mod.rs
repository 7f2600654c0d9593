//! Static file responder
//!
//! Maps a GET request onto a file below a fixed root path and streams it back.
//! Method and path problems become direct responses (405, 500); file problems are
//! returned as [`FileError`] for the caller to translate.

pub mod builder;
pub mod error;
pub mod file_responder;
pub mod fs;

// Re-export main entry points
pub use builder::build_file_response;
pub use error::FileError;
pub use file_responder::{request_path, FileResponder, INDEX_FILE};
pub use fs::{DiskFileSystem, Existence, FileSystem};

#[cfg(test)]
pub(crate) mod testing {
    use super::fs::{Existence, FileSystem};
    use std::io::{self, Cursor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory file system with scripted answers
    pub struct MockFileSystem {
        existence: Existence,
        contents: Result<Vec<u8>, io::ErrorKind>,
        exists_calls: AtomicUsize,
        open_calls: AtomicUsize,
        last_path: Mutex<Option<String>>,
    }

    impl MockFileSystem {
        pub fn with_existence(existence: Existence) -> Self {
            Self {
                existence,
                contents: Ok(Vec::new()),
                exists_calls: AtomicUsize::new(0),
                open_calls: AtomicUsize::new(0),
                last_path: Mutex::new(None),
            }
        }

        pub fn with_contents(contents: Vec<u8>) -> Self {
            Self {
                contents: Ok(contents),
                ..Self::with_existence(Existence::FILE)
            }
        }

        /// Reports a regular file that then fails to open
        pub fn failing_open(kind: io::ErrorKind) -> Self {
            Self {
                contents: Err(kind),
                ..Self::with_existence(Existence::FILE)
            }
        }

        pub fn exists_calls(&self) -> usize {
            self.exists_calls.load(Ordering::SeqCst)
        }

        pub fn open_calls(&self) -> usize {
            self.open_calls.load(Ordering::SeqCst)
        }

        pub fn last_path(&self) -> Option<String> {
            self.last_path.lock().unwrap().clone()
        }
    }

    impl FileSystem for MockFileSystem {
        type File = Cursor<Vec<u8>>;

        async fn exists(&self, path: &str) -> Existence {
            self.exists_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_path.lock().unwrap() = Some(path.to_string());
            self.existence
        }

        async fn open(&self, path: &str) -> io::Result<Self::File> {
            self.open_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_path.lock().unwrap() = Some(path.to_string());
            match &self.contents {
                Ok(data) => Ok(Cursor::new(data.clone())),
                Err(kind) => Err(io::Error::new(*kind, "scripted open failure")),
            }
        }
    }
}
