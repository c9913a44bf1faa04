use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearStats {
    pub files: usize,
    pub folders: usize,
}

/// The folder the generated document is written into.
#[derive(Debug, Clone)]
pub struct OutputFolder {
    base_path: PathBuf,
}

impl OutputFolder {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    pub fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        Ok(())
    }

    /// Empty the folder, keeping the folder itself. A missing folder is already empty.
    ///
    /// Entries that cannot be removed are logged and left behind.
    pub fn clear(&self) -> Result<ClearStats> {
        let mut stats = ClearStats::default();
        if !self.base_path.is_dir() {
            return Ok(stats);
        }

        tracing::debug!("Clearing output folder {}", self.base_path.display());
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            let removed = if path.is_dir() {
                let nested = count_entries(&path);
                fs::remove_dir_all(&path).map(|_| {
                    stats.files += nested.files;
                    stats.folders += nested.folders + 1;
                })
            } else {
                fs::remove_file(&path).map(|_| stats.files += 1)
            };

            match removed {
                Ok(()) => tracing::debug!("Removed {}", path.display()),
                Err(e) => tracing::error!("Could not remove {}: {}", path.display(), e),
            }
        }

        if stats.files + stats.folders > 0 {
            tracing::info!(
                "Cleared output folder: {} files, {} folders",
                stats.files,
                stats.folders
            );
        }
        Ok(stats)
    }
}

fn count_entries(dir: &Path) -> ClearStats {
    let mut stats = ClearStats::default();
    let Ok(entries) = fs::read_dir(dir) else {
        return stats;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let nested = count_entries(&path);
            stats.files += nested.files;
            stats.folders += nested.folders + 1;
        } else {
            stats.files += 1;
        }
    }
    stats
}
