//! File-based storage backend for persistent state.

use crate::backend::StateBackend;
use crate::error::StorageResult;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// This backend provides persistent storage using OS file APIs.
/// State survives process restarts.
///
/// # Atomicity
///
/// `store` writes the new blob to a sibling temporary file, syncs it to
/// disk, then renames it over the target path. A reader opening the path
/// sees either the old blob or the new blob in full - rename is atomic on
/// POSIX filesystems. A failed write leaves the target path untouched.
///
/// # Durability
///
/// `File::sync_all` is called on the temporary file before the rename, so
/// once `store` returns the new blob is on disk.
///
/// # Example
///
/// ```no_run
/// use tfstated_storage::{StateBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("terraform.tfstate")).unwrap();
/// backend.store(b"{\"version\": 4}").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Opens a file backend at the given path, creating parent directories
    /// if needed.
    ///
    /// The file itself is not created until the first `store`; a missing
    /// file means no state was ever stored.
    ///
    /// # Errors
    ///
    /// Returns an error if parent directories cannot be created.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl StateBackend for FileBackend {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(Some(data))
    }

    fn store(&mut self, data: &[u8]) -> StorageResult<()> {
        let temp = self.temp_path();

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        // Atomic replace; old content stays intact if anything above failed.
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
