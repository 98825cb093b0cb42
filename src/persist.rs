//! Byte-oriented persistence for store state.
//!
//! The engine treats persistence as an opaque load/save interface: a
//! [`ByteStore`] maps string keys to byte blobs. [`FileByteStore`] keeps each
//! blob in its own file with atomic writes; [`MemoryByteStore`] backs tests
//! and ephemeral setups.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A key-value blob store consumed by
/// [`Store::save_to`](crate::Store::save_to) and
/// [`Store::load_from`](crate::Store::load_from).
pub trait ByteStore {
    /// Read the blob stored under `key`, `None` if absent.
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous blob.
    fn put(&mut self, key: &str, bytes: &[u8]) -> io::Result<()>;
}

/// An in-memory [`ByteStore`].
///
/// # Examples
///
/// ```
/// use statefold::{ByteStore, MemoryByteStore};
///
/// let mut store = MemoryByteStore::new();
/// assert_eq!(store.get("state").unwrap(), None);
/// store.put("state", b"blob").unwrap();
/// assert_eq!(store.get("state").unwrap(), Some(b"blob".to_vec()));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryByteStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryByteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        MemoryByteStore::default()
    }
}

impl ByteStore for MemoryByteStore {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// A [`ByteStore`] keeping one file per key in a directory.
///
/// Writes are atomic: the blob goes to a `.tmp` file first, is synced, then
/// renamed over the final path. If the process crashes mid-write, the old
/// blob survives intact.
#[derive(Debug)]
pub struct FileByteStore {
    dir: PathBuf,
}

impl FileByteStore {
    /// Open or create a blob directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(FileByteStore { dir })
    }

    /// Returns the directory holding the blobs.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.blob"))
    }
}

impl ByteStore for FileByteStore {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.blob_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.blob_path(key);
        let tmp_path = path.with_extension("blob.tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_data()?;
        drop(file);

        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
