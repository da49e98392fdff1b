use crate::error::Result;
use crate::{log_info, log_warn};
use std::fs;
use std::path::{Path, PathBuf};

pub fn ensure_directory(dir: &str) -> Result<()> {
    if !Path::new(dir).exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// A local file that is deleted when the guard goes out of scope.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log_info!("[utils] Removed local file {}", self.path.display());
            }
            Err(e) => {
                log_warn!("[utils] Failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}
