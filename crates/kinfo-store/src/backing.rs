use crate::{StoreResult, io_error};
use std::{
    fmt, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

/// Byte source the kernel store reads from and writes to.
pub trait Backing {
    /// Where the bytes live, for error reporting.
    fn location(&self) -> PathBuf;

    /// Read the full contents. `Ok(None)` means nothing has been written yet.
    fn read(&self) -> StoreResult<Option<Vec<u8>>>;

    /// Replace the full contents.
    fn write(&self, bytes: &[u8]) -> StoreResult<()>;
}

/// A single file on disk, overwritten in place on every write.
#[derive(Clone)]
pub struct FileBacking {
    path: PathBuf,
}

impl fmt::Debug for FileBacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileBacking").field("path", &self.path).finish()
    }
}

impl FileBacking {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Backing for FileBacking {
    fn location(&self) -> PathBuf {
        self.path.clone()
    }

    fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&self.path, err)),
        }
    }

    // Not atomic: a crash mid-write can leave a truncated file behind.
    fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        fs::write(&self.path, bytes).map_err(|e| io_error(&self.path, e))
    }
}

/// In-memory backing. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemBacking {
    bytes: Arc<RwLock<Option<Vec<u8>>>>,
}

impl fmt::Debug for MemBacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemBacking")
            .field(
                "bytes",
                &self.bytes.read().unwrap().as_ref().map(|b| b.len()),
            )
            .finish()
    }
}

impl MemBacking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::new(RwLock::new(Some(bytes.into()))),
        }
    }

    /// Snapshot of the current contents.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.bytes.read().unwrap().clone()
    }
}

impl Backing for MemBacking {
    fn location(&self) -> PathBuf {
        PathBuf::from("memory://kernel-data")
    }

    fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.bytes())
    }

    fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        *self.bytes.write().unwrap() = Some(bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = TempDir::new().expect("tmp");
        let backing = FileBacking::new(dir.path().join(".kernel.bes"));
        assert!(backing.read().expect("read").is_none());
    }

    #[test]
    fn file_write_overwrites_previous_contents() {
        let dir = TempDir::new().expect("tmp");
        let backing = FileBacking::new(dir.path().join(".kernel.bes"));
        backing.write(b"a much longer first payload").expect("first");
        backing.write(b"short").expect("second");
        assert_eq!(backing.read().expect("read"), Some(b"short".to_vec()));
    }

    #[test]
    fn unreadable_path_surfaces_io_error() {
        let dir = TempDir::new().expect("tmp");
        // A directory where the file should be cannot be read as bytes.
        let path = dir.path().join(".kernel.bes");
        std::fs::create_dir(&path).expect("mkdir");
        let err = FileBacking::new(&path).read().expect_err("should fail");
        match err {
            StoreError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mem_backing_clones_share_bytes() {
        let backing = MemBacking::new();
        let other = backing.clone();
        assert!(other.read().expect("read").is_none());
        backing.write(b"hello").expect("write");
        assert_eq!(other.bytes(), Some(b"hello".to_vec()));
    }
}
