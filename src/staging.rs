use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(thiserror::Error, Debug)]
pub enum StagingError {
    #[error("Staging directory '{path}' does not exist")]
    Missing { path: PathBuf },
    #[error("Failed to walk staging directory '{path}'")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("Failed to remove '{path}' from staging")]
    Remove { path: PathBuf, source: io::Error },
}

/// Removes the staging tree: files first, then directories from the deepest
/// level up, then the root itself.
pub fn clean(root: &Path) -> Result<(), StagingError> {
    if !root.is_dir() {
        return Err(StagingError::Missing {
            path: root.to_path_buf(),
        });
    }
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
        let entry = entry.map_err(|source| StagingError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        } else {
            files.push(entry.into_path());
        }
    }
    for file in &files {
        std::fs::remove_file(file).map_err(|source| StagingError::Remove {
            path: file.clone(),
            source,
        })?;
    }
    // contents_first yields children before their parent directory
    for dir in &dirs {
        std::fs::remove_dir(dir).map_err(|source| StagingError::Remove {
            path: dir.clone(),
            source,
        })?;
    }
    std::fs::remove_dir(root).map_err(|source| StagingError::Remove {
        path: root.to_path_buf(),
        source,
    })?;
    debug!(
        path = root.as_os_str().to_str(),
        files = files.len(),
        directories = dirs.len(),
        "Removed staging directory"
    );
    Ok(())
}
