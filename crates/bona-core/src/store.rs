//! On-disk staging of uploaded inputs and annotated outputs.

use std::fs;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};

/// A staged upload awaiting inference
#[derive(Debug, Clone)]
pub struct StagedUpload {
    /// Job identifier namespacing the input file and output directory
    pub job_id: String,
    /// Where the raw upload bytes were written
    pub input_path: PathBuf,
}

/// Manages the upload and results roots.
///
/// Every job gets a fresh UUID, so no two jobs ever contend for the same
/// path and the store needs no locking.
#[derive(Debug, Clone)]
pub struct ResultStore {
    upload_dir: PathBuf,
    results_dir: PathBuf,
}

impl ResultStore {
    pub fn new(upload_dir: PathBuf, results_dir: PathBuf) -> Self {
        Self {
            upload_dir,
            results_dir,
        }
    }

    /// Mint a job identifier and persist the upload under it.
    pub fn stage_upload(&self, bytes: &[u8]) -> Result<StagedUpload> {
        let job_id = Uuid::new_v4().to_string();
        fs::create_dir_all(&self.upload_dir)?;

        let input_path = self.upload_dir.join(format!("{job_id}.jpg"));
        fs::write(&input_path, bytes)?;
        debug!("Staged upload {} ({} bytes)", input_path.display(), bytes.len());

        Ok(StagedUpload { job_id, input_path })
    }

    /// Resolve a previously produced output image.
    ///
    /// Existence check only; missing outputs are never regenerated.
    pub fn resolve_output(&self, folder: &str, filename: &str) -> Result<PathBuf> {
        validate_segment(folder)?;
        validate_segment(filename)?;

        let path = self.results_dir.join(folder).join(filename);
        if !path.is_file() {
            return Err(Error::NotFound(format!("{folder}/{filename}")));
        }
        Ok(path)
    }
}

// Fetch keys come straight from URL segments; anything that could step
// outside the results root is treated as not found.
fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains('/')
        || segment.contains('\\')
    {
        return Err(Error::NotFound(segment.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::Path;

    fn store_in(dir: &Path) -> ResultStore {
        ResultStore::new(dir.join("img"), dir.join("runs/detect"))
    }

    #[test]
    fn stage_upload_writes_bytes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let staged = store.stage_upload(b"jpeg bytes").unwrap();
        assert_eq!(fs::read(&staged.input_path).unwrap(), b"jpeg bytes");
        assert!(staged
            .input_path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .ends_with(".jpg"));
    }

    #[test]
    fn staged_uploads_get_distinct_identifiers() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut seen = HashSet::new();
        for _ in 0..64 {
            let staged = store.stage_upload(b"x").unwrap();
            assert!(seen.insert(staged.job_id));
        }
    }

    #[test]
    fn resolve_missing_output_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let err = store.resolve_output("no-such-job", "img.jpg").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn resolve_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let out_dir = dir.path().join("runs/detect/job-1");
        fs::create_dir_all(&out_dir).unwrap();
        fs::write(out_dir.join("job-1.jpg"), b"annotated").unwrap();

        let path = store.resolve_output("job-1", "job-1.jpg").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"annotated");
    }

    #[test]
    fn traversal_segments_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        for (folder, filename) in [
            ("..", "secret.jpg"),
            ("job", "../secret.jpg"),
            ("a/b", "img.jpg"),
            ("job", "a\\b.jpg"),
            ("", "img.jpg"),
        ] {
            let err = store.resolve_output(folder, filename).unwrap_err();
            assert!(matches!(err, Error::NotFound(_)), "{folder}/{filename}");
        }
    }
}
