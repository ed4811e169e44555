//! Byte-level backends the record store persists through
//!
//! The store always rewrites its full contents. `FileStorage` does so by
//! writing a fresh temporary file next to the target and renaming it into
//! place, so a reader sees either the old file or the new one.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Backend holding the serialized observation set
pub trait Storage {
    /// Current contents, or `None` if nothing has been persisted yet
    fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Replace the full contents
    fn replace(&self, contents: &[u8]) -> io::Result<()>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// CSV file on local disk
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn replace(&self, contents: &[u8]) -> io::Result<()> {
        write_atomic(&self.path, contents)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-process buffer, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStorage {
    contents: RefCell<Option<Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing serialized contents
    pub fn with_contents(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: RefCell::new(Some(contents.into())),
        }
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Option<Vec<u8>> {
        self.contents.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.snapshot())
    }

    fn replace(&self, contents: &[u8]) -> io::Result<()> {
        *self.contents.borrow_mut() = Some(contents.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// Write `contents` to `path` through a temporary file in the same directory
///
/// Missing parent directories are created. The target is only touched by the
/// final rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_missing_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("missing.csv"));
        assert!(storage.read().unwrap().is_none());
    }

    #[test]
    fn test_file_storage_replace_then_read() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("store.csv"));
        storage.replace(b"first").unwrap();
        storage.replace(b"second").unwrap();
        assert_eq!(storage.read().unwrap().unwrap(), b"second");
    }

    #[test]
    fn test_write_atomic_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("out.csv");
        write_atomic(&path, b"a,b\n").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"a,b\n");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_atomic(&path, b"x").unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_atomic_fails_when_parent_is_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a dir").unwrap();
        assert!(write_atomic(&blocker.join("out.csv"), b"x").is_err());
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.read().unwrap().is_none());
        storage.replace(b"rows").unwrap();
        assert_eq!(storage.snapshot().unwrap(), b"rows");
        assert_eq!(storage.describe(), "<memory>");
    }
}
