//! # Roster DB Ingest
//!
//! Bulk import collaborator: hands the catalog loader an ordered sequence
//! of raw byte documents. Any read failure here is fatal to startup; the
//! process never serves on top of a partial dataset.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Result type for ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Ingest error type
#[derive(Error, Debug)]
pub enum IngestError {
    /// Filesystem failure while reading source data
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IngestError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Supplies the ordered raw documents the catalog is loaded from
pub trait DataSource {
    fn read(&self) -> Result<Vec<Vec<u8>>>;
}

/// Reads every `*.json` file under a directory, in lexicographic name
/// order. Other entries are skipped with a log line.
pub struct DirSource {
    path: PathBuf,
}

impl DirSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_json(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "json")
    }
}

impl DataSource for DirSource {
    fn read(&self) -> Result<Vec<Vec<u8>>> {
        let entries = fs::read_dir(&self.path).map_err(|e| IngestError::io(&self.path, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| IngestError::io(&self.path, e))?;
            paths.push(entry.path());
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            if !Self::is_json(&path) {
                info!(file = %path.display(), "skipping non-JSON entry");
                continue;
            }
            info!(file = %path.display(), "importing file");
            let bytes = fs::read(&path).map_err(|e| IngestError::io(&path, e))?;
            documents.push(bytes);
        }
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_json_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("accounts_2.json"), b"two").unwrap();
        fs::write(dir.path().join("accounts_1.json"), b"one").unwrap();

        let documents = DirSource::new(dir.path()).read().unwrap();
        assert_eq!(documents, vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn skips_non_json_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("options.txt"), b"nope").unwrap();
        fs::write(dir.path().join("accounts_1.json"), b"one").unwrap();

        let documents = DirSource::new(dir.path()).read().unwrap();
        assert_eq!(documents, vec![b"one".to_vec()]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let result = DirSource::new("/definitely/not/here").read();
        assert!(result.is_err());
    }
}
