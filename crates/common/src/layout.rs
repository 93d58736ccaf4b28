//! Output directory layout
//!
//! ```text
//! <root>/
//!   results.json              final report document
//!   results/<hash>.html       content-addressed artifacts
//!   results/public/           copy of the application's public assets
//!   screenshots/<ts><nnnnn>.png
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::assets::AssetRewriter;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn results_json(&self) -> PathBuf {
        self.root.join("results.json")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root.join("results")
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.root.join("screenshots")
    }

    pub fn public_dir(&self) -> PathBuf {
        self.results_dir().join("public")
    }

    /// Create the output directories and, when an asset root is given, copy
    /// it to `results/public/` and return a rewriter for its directories
    pub fn prepare(&self, asset_root: Option<&Path>) -> Result<Option<AssetRewriter>> {
        fs::create_dir_all(self.results_dir())?;
        fs::create_dir_all(self.screenshots_dir())?;

        let Some(asset_root) = asset_root else {
            info!("Prepared output directory {:?}", self.root);
            return Ok(None);
        };

        let copied = copy_tree(asset_root, &self.public_dir())?;
        info!(
            "Prepared output directory {:?} ({} public file(s) copied)",
            self.root, copied
        );
        asset_rewriter(asset_root).map(Some)
    }
}

/// Build a rewriter from the visible top-level directories of an asset root
pub fn asset_rewriter(asset_root: &Path) -> Result<AssetRewriter> {
    if !asset_root.is_dir() {
        return Err(Error::InvalidConfig(format!(
            "asset root is not a directory: {}",
            asset_root.display()
        )));
    }

    let mut directories = Vec::new();
    for entry in fs::read_dir(asset_root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.starts_with('.') {
                directories.push(name.to_string());
            }
        }
    }
    directories.sort();

    debug!("Asset directories: {:?}", directories);
    Ok(AssetRewriter::new(directories))
}

/// Recursively copy `src` into `dest`, returning the number of files copied
fn copy_tree(src: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(src).into_iter().filter_map(|e| e.ok()) {
        let relative = match entry.path().strip_prefix(src) {
            Ok(r) => r,
            Err(_) => continue,
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}
