//! File system access used by the responder
//!
//! The responder only needs two questions answered about a path: does it exist
//! (and is it a directory), and can it be opened for reading. [`FileSystem`] is
//! that seam; [`DiskFileSystem`] answers it with `tokio::fs`.

use std::future::Future;
use std::io;
use tokio::io::AsyncRead;

/// Result of an existence check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Existence {
    pub exists: bool,
    pub is_directory: bool,
}

impl Existence {
    pub const MISSING: Self = Self {
        exists: false,
        is_directory: false,
    };
    pub const FILE: Self = Self {
        exists: true,
        is_directory: false,
    };
    pub const DIRECTORY: Self = Self {
        exists: true,
        is_directory: true,
    };
}

/// File system collaborator
pub trait FileSystem: Send + Sync {
    /// Readable handle returned by [`FileSystem::open`]
    type File: AsyncRead + Send + Sync + 'static;

    /// Check whether `path` exists and whether it is a directory
    fn exists(&self, path: &str) -> impl Future<Output = Existence> + Send;

    /// Open `path` for reading
    fn open(&self, path: &str) -> impl Future<Output = io::Result<Self::File>> + Send;
}

/// Local disk, through `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileSystem;

impl FileSystem for DiskFileSystem {
    type File = tokio::fs::File;

    async fn exists(&self, path: &str) -> Existence {
        // Follows symlinks; a dangling link counts as missing
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => Existence::DIRECTORY,
            Ok(_) => Existence::FILE,
            Err(_) => Existence::MISSING,
        }
    }

    async fn open(&self, path: &str) -> io::Result<Self::File> {
        tokio::fs::File::open(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_exists_classifies_entries() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"a").unwrap();

        let fs = DiskFileSystem;
        assert_eq!(fs.exists(file.to_str().unwrap()).await, Existence::FILE);
        assert_eq!(
            fs.exists(dir.path().to_str().unwrap()).await,
            Existence::DIRECTORY
        );
        let missing = dir.path().join("nope");
        assert_eq!(fs.exists(missing.to_str().unwrap()).await, Existence::MISSING);
    }

    #[tokio::test]
    async fn test_open_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("b.txt");
        std::fs::write(&file, b"contents").unwrap();

        let mut handle = DiskFileSystem.open(file.to_str().unwrap()).await.unwrap();
        let mut buf = String::new();
        handle.read_to_string(&mut buf).await.unwrap();
        assert_eq!(buf, "contents");
    }

    #[tokio::test]
    async fn test_open_missing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.txt");
        let err = DiskFileSystem
            .open(missing.to_str().unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
