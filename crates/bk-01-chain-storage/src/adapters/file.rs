use crate::domain::{StorageConfig, StorageError};
use crate::ports::ChainBackend;
use shared_types::{Canonical, Chain, SerializationError};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// File-backed chain store.
///
/// One JSON document per node at `<dir>/<node_id>.json`. Every save writes
/// the full document to a temp file, syncs it and renames it into place, so a
/// reader never observes a half-written chain.
#[derive(Debug, Clone)]
pub struct FileChainBackend {
    dir: PathBuf,
}

impl FileChainBackend {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, &e))?;
        info!("[bk-01] 📁 Chain storage at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        Self::new(&config.data_dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `node_id`.
    ///
    /// Node ids must be a single plain path component.
    pub fn file_path(&self, node_id: &str) -> Result<PathBuf, StorageError> {
        let mut components = Path::new(node_id).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(c)), None) if c == node_id => {
                Ok(self.dir.join(format!("{node_id}.json")))
            }
            _ => Err(StorageError::InvalidNodeId(node_id.to_string())),
        }
    }
}

impl ChainBackend for FileChainBackend {
    fn save_chain(&self, chain: &Chain, node_id: &str) -> Result<(), StorageError> {
        let path = self.file_path(node_id)?;
        let temp_path = path.with_extension("json.tmp");
        let bytes = chain.to_json().into_bytes();

        let mut file =
            std::fs::File::create(&temp_path).map_err(|e| StorageError::io(&temp_path, &e))?;
        file.write_all(&bytes)
            .map_err(|e| StorageError::io(&temp_path, &e))?;
        file.sync_all()
            .map_err(|e| StorageError::io(&temp_path, &e))?;
        std::fs::rename(&temp_path, &path).map_err(|e| StorageError::io(&path, &e))?;

        debug!(
            node_id = node_id,
            chain_len = chain.len(),
            bytes = bytes.len(),
            "[bk-01] 💾 Saved chain"
        );
        Ok(())
    }

    fn load_chain(&self, node_id: &str) -> Result<Chain, StorageError> {
        let path = self.file_path(node_id)?;
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(node_id = node_id, "[bk-01] No stored chain, starting empty");
                return Ok(Chain::new());
            }
            Err(e) => return Err(StorageError::io(&path, &e)),
        };

        let corrupt = |source| StorageError::Corrupt {
            node_id: node_id.to_string(),
            source,
        };
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| corrupt(SerializationError::Json(e.to_string())))?;
        Chain::from_json(text).map_err(corrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_types::{Block, Timestamp};

    fn sample_chain(prev_hash: &str) -> Chain {
        let block = Block::new(
            Timestamp::from_ymd_hms_micro(2017, 8, 9, 10, 11, 12, 0).unwrap(),
            Some(prev_hash.to_string()),
            json!({"foo": "bar"}),
        );
        Chain::from_blocks(vec![block]).unwrap()
    }

    #[test]
    fn test_save_chain_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileChainBackend::new(dir.path()).unwrap();
        let chain = sample_chain("abcd");

        backend.save_chain(&chain, "n1").unwrap();

        let text = std::fs::read_to_string(dir.path().join("n1.json")).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc, chain.to_canonical());
        assert!(!dir.path().join("n1.json.tmp").exists());
    }

    #[test]
    fn test_load_chain_reads_document() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileChainBackend::new(dir.path()).unwrap();
        let chain = sample_chain("xxyy");
        std::fs::write(dir.path().join("n2.json"), chain.to_json()).unwrap();

        assert_eq!(backend.load_chain("n2").unwrap(), chain);
    }

    #[test]
    fn test_unknown_node_loads_empty_chain() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileChainBackend::new(dir.path()).unwrap();
        assert!(backend.load_chain("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileChainBackend::new(dir.path()).unwrap();
        backend.save_chain(&sample_chain("aaaa"), "n1").unwrap();
        backend.save_chain(&Chain::new(), "n1").unwrap();
        assert!(backend.load_chain("n1").unwrap().is_empty());
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let backend = FileChainBackend::new(&nested).unwrap();
        backend.save_chain(&Chain::new(), "n1").unwrap();
        assert!(nested.join("n1.json").exists());
    }

    #[test]
    fn test_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileChainBackend::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("bad.json"), "{\"blocks\": 7}").unwrap();

        assert!(matches!(
            backend.load_chain("bad"),
            Err(StorageError::Corrupt { node_id, .. }) if node_id == "bad"
        ));
    }

    #[test]
    fn test_rejects_path_like_node_ids() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileChainBackend::new(dir.path()).unwrap();
        for id in ["", "..", "a/b", "/etc/passwd", "."] {
            assert!(
                matches!(backend.load_chain(id), Err(StorageError::InvalidNodeId(_))),
                "accepted {id:?}"
            );
        }
    }
}
