//! Content-addressed artifact store
//!
//! Stores step artifacts (page snapshots, rendered emails) under a filename
//! derived from the SHA-256 digest of their content:
//! - Deduplication: identical content is written once
//! - Integrity verification on read
//! - Atomic writes through a temp file in the same directory
//!
//! Artifacts are never deleted or rewritten.

use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_LEN: usize = 64;

/// Suffix for page snapshots and screenshot wrappers
pub const HTML_SUFFIX: &str = ".html";

/// Write and dedup counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Artifacts physically written
    pub writes: u64,
    /// `put` calls that found the artifact already present
    pub hits: u64,
}

/// Content-addressed store for step artifacts
#[derive(Debug)]
pub struct ArtifactStore {
    root: PathBuf,
    stats: StoreStats,
}

impl ArtifactStore {
    /// Open a store rooted at the given directory, creating it if needed
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!("Opened artifact store at {:?}", root);
        Ok(Self {
            root,
            stats: StoreStats::default(),
        })
    }

    /// Get the root path of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    /// Compute SHA-256 hash of data
    pub fn hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    /// Filename an artifact with this content and suffix is stored under
    pub fn filename_for(data: &[u8], suffix: &str) -> String {
        format!("{}{}", Self::hash(data), suffix)
    }

    /// Get the path for an artifact by its filename
    pub fn path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Check if an artifact exists
    pub fn exists(&self, filename: &str) -> bool {
        self.path(filename).is_file()
    }

    /// Store content and return its filename.
    ///
    /// The content is only written when no artifact of that name exists yet;
    /// the filename is returned either way.
    pub fn put(&mut self, data: impl AsRef<[u8]>, suffix: &str) -> Result<String> {
        let data = data.as_ref();
        let filename = Self::filename_for(data, suffix);

        if self.exists(&filename) {
            self.stats.hits += 1;
            debug!("Artifact {} already exists", filename);
            return Ok(filename);
        }

        // Unique temp name per writer; racing writers persist identical bytes
        let path = self.path(&filename);
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(data)?;
        tmp.persist(&path).map_err(|e| e.error)?;
        self.stats.writes += 1;

        debug!("Stored artifact {} ({} bytes)", filename, data.len());
        Ok(filename)
    }

    /// Read an artifact back, verifying its content against the name
    pub fn get(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.path(filename);

        if !path.is_file() {
            return Err(Error::NotFound {
                kind: "artifact".to_string(),
                id: filename.to_string(),
            });
        }

        let data = fs::read(&path)?;

        let expected = filename.get(..DIGEST_LEN).unwrap_or(filename);
        let actual = Self::hash(&data);
        if actual != expected {
            return Err(Error::IntegrityError(format!(
                "Digest mismatch for {}: got {}",
                filename, actual
            )));
        }

        Ok(data)
    }
}
