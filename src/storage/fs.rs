//! File system layer for persista storage.
//!
//! Owns the store folder (`<data_path>/persista`) and the record files in it.
//! Nothing here locks; the engine serializes every call through its mutex.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::error::{PersistaError, Result};

/// Name of the folder created under the data path.
pub const STORE_FOLDER: &str = "persista";

const TMP_SUFFIX: &str = ".tmp";

/// Directory manager for the store folder.
#[derive(Debug)]
pub struct DirectoryManager {
    /// `<data_path>/persista`
    dir: PathBuf,
}

impl DirectoryManager {
    /// Initialize storage under `data_path`, creating the store folder.
    pub fn init(data_path: &Path) -> Result<Self> {
        let manager = Self {
            dir: data_path.join(STORE_FOLDER),
        };
        manager.ensure_root()?;
        Ok(manager)
    }

    /// Create the store folder and its parents. Idempotent.
    pub fn ensure_root(&self) -> Result<()> {
        if !self.dir.is_dir() {
            std::fs::create_dir_all(&self.dir)
                .map_err(|e| PersistaError::io("creating store folder", &self.dir, e))?;
        }
        Ok(())
    }

    /// Store folder path.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record path for a type identifier. Pure, never touches the disk.
    pub fn path_for(&self, type_id: &str) -> PathBuf {
        self.dir.join(type_id)
    }

    /// Read a record. `Ok(None)` means it was never written.
    pub async fn read_record(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistaError::io("reading record", path, e)),
        }
    }

    /// Replace a record atomically.
    ///
    /// Writes a uniquely named sibling `.tmp` file, syncs it, then renames
    /// it over the record. Readers see either the old bytes or the new ones.
    pub async fn write_record(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let tmp_path = tmp_path_for(path);

        let result = async {
            let mut file = fs::File::create(&tmp_path).await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&tmp_path, path).await
        }
        .await;

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(PersistaError::io("writing record", path, e));
        }

        debug!(path = %path.display(), bytes = bytes.len(), "record written");
        Ok(())
    }

    /// Delete a record. Returns false if there was nothing to delete.
    pub async fn remove_record(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PersistaError::io("deleting record", path, e)),
        }
    }

    /// Identifiers of every stored record, sorted.
    pub async fn list_records(&self) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| PersistaError::io("listing store folder", &self.dir, e))?;

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PersistaError::io("listing store folder", &self.dir, e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_tmp_name(&name) {
                continue;
            }
            ids.push(name);
        }
        ids.sort();
        Ok(ids)
    }

    /// Delete the store folder recursively, then recreate it empty.
    pub async fn wipe(&self) -> Result<()> {
        match fs::remove_dir_all(&self.dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(PersistaError::io("wiping store folder", &self.dir, e)),
        }
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PersistaError::io("creating store folder", &self.dir, e))
    }
}

/// `<dir>/.<uuid>.tmp`
///
/// Only the uuid goes into the name, so any record name that fits the
/// filesystem also has a temp sibling that fits.
fn tmp_path_for(path: &Path) -> PathBuf {
    path.with_file_name(format!(".{}{}", Uuid::new_v4().simple(), TMP_SUFFIX))
}

/// Records never start with `.`; those names belong to in-flight writes.
fn is_tmp_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TMP_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_store_folder() {
        let dir = tempdir().unwrap();
        let data_path = dir.path().join("nested").join("data");

        let manager = DirectoryManager::init(&data_path).unwrap();

        assert!(manager.dir().is_dir());
        assert_eq!(manager.dir(), data_path.join("persista"));

        // Idempotent
        manager.ensure_root().unwrap();
        DirectoryManager::init(&data_path).unwrap();
    }

    #[test]
    fn test_init_fails_when_data_path_is_a_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let err = DirectoryManager::init(&file).unwrap_err();
        assert!(matches!(err, PersistaError::Io { .. }));
    }

    #[test]
    fn test_path_for_is_pure() {
        let manager = DirectoryManager {
            dir: PathBuf::from("/does/not/exist/persista"),
        };
        let a = manager.path_for("app.state.Wallet");
        let b = manager.path_for("app.state.Wallet");
        assert_eq!(a, b);
        assert_eq!(a, PathBuf::from("/does/not/exist/persista/app.state.Wallet"));
        assert!(!a.exists());
    }

    #[tokio::test]
    async fn test_write_read_remove() {
        let dir = tempdir().unwrap();
        let manager = DirectoryManager::init(dir.path()).unwrap();
        let path = manager.path_for("app.Dashboard");

        assert_eq!(manager.read_record(&path).await.unwrap(), None);

        manager.write_record(&path, b"{\"id\":1}").await.unwrap();
        assert_eq!(
            manager.read_record(&path).await.unwrap().as_deref(),
            Some(&b"{\"id\":1}"[..])
        );

        manager.write_record(&path, b"{\"id\":2}").await.unwrap();
        assert_eq!(
            manager.read_record(&path).await.unwrap().as_deref(),
            Some(&b"{\"id\":2}"[..])
        );

        assert!(manager.remove_record(&path).await.unwrap());
        assert!(!manager.remove_record(&path).await.unwrap());
        assert_eq!(manager.read_record(&path).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_leaves_no_tmp_files() {
        let dir = tempdir().unwrap();
        let manager = DirectoryManager::init(dir.path()).unwrap();

        manager
            .write_record(&manager.path_for("a.A"), b"1")
            .await
            .unwrap();
        manager
            .write_record(&manager.path_for("b.B"), b"2")
            .await
            .unwrap();

        let names: Vec<_> = std::fs::read_dir(manager.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| !n.ends_with(".tmp")));
    }

    #[tokio::test]
    async fn test_write_under_long_identifier() {
        let dir = tempdir().unwrap();
        let manager = DirectoryManager::init(dir.path()).unwrap();
        let id = "a".repeat(230);
        let path = manager.path_for(&id);

        manager.write_record(&path, b"5").await.unwrap();
        assert_eq!(
            manager.read_record(&path).await.unwrap().as_deref(),
            Some(&b"5"[..])
        );
        assert_eq!(manager.list_records().await.unwrap(), vec![id]);
    }

    #[tokio::test]
    async fn test_list_records_skips_in_flight_writes() {
        let dir = tempdir().unwrap();
        let manager = DirectoryManager::init(dir.path()).unwrap();
        manager
            .write_record(&manager.path_for("a.A"), b"1")
            .await
            .unwrap();
        let tmp = tmp_path_for(&manager.path_for("a.A"));
        std::fs::write(&tmp, b"partial").unwrap();

        assert!(is_tmp_name(&tmp.file_name().unwrap().to_string_lossy()));
        assert_eq!(manager.list_records().await.unwrap(), vec!["a.A"]);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_record() {
        let dir = tempdir().unwrap();
        let manager = DirectoryManager::init(dir.path()).unwrap();

        // A directory sitting at the record path makes the rename fail.
        let path = manager.path_for("a.Blocked");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"old").unwrap();

        let err = manager.write_record(&path, b"new").await.unwrap_err();
        assert!(matches!(err, PersistaError::Io { .. }));
        assert_eq!(std::fs::read(path.join("keep")).unwrap(), b"old");
        assert_eq!(manager.list_records().await.unwrap(), vec!["a.Blocked"]);
    }

    #[tokio::test]
    async fn test_read_directory_is_io_error_not_absent() {
        let dir = tempdir().unwrap();
        let manager = DirectoryManager::init(dir.path()).unwrap();
        let path = manager.path_for("a.Dir");
        std::fs::create_dir(&path).unwrap();

        let err = manager.read_record(&path).await.unwrap_err();
        assert!(matches!(err, PersistaError::Io { .. }));
    }

    #[tokio::test]
    async fn test_wipe_recreates_empty_folder() {
        let dir = tempdir().unwrap();
        let manager = DirectoryManager::init(dir.path()).unwrap();
        manager
            .write_record(&manager.path_for("a.A"), b"1")
            .await
            .unwrap();
        std::fs::create_dir(manager.dir().join("junk")).unwrap();

        manager.wipe().await.unwrap();

        assert!(manager.dir().is_dir());
        assert!(manager.list_records().await.unwrap().is_empty());

        // Wiping an already missing folder still leaves it usable.
        std::fs::remove_dir_all(manager.dir()).unwrap();
        manager.wipe().await.unwrap();
        assert!(manager.dir().is_dir());
    }
}
