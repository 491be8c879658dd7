use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;
use uuid::Uuid;

/// Résumé file as received from the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ResumeStoreError {
    #[error("failed to write résumé {reference}: {source}")]
    Write {
        reference: String,
        #[source]
        source: std::io::Error,
    },
    #[error("résumé store unavailable: {0}")]
    Unavailable(String),
}

/// Where accepted résumés end up. Returns the reference kept on the applicant.
pub trait ResumeStore: Send + Sync {
    fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, ResumeStoreError>;

    /// Best-effort cleanup after the registration that produced `reference` failed.
    fn discard(&self, reference: &str);
}

fn generated_name(extension: &str) -> String {
    format!("{}.{extension}", Uuid::new_v4())
}

/// Writes files under the configured uploads directory as `<dir>/<uuid>.<ext>`.
#[derive(Debug, Clone)]
pub struct FilesystemResumeStore {
    directory: PathBuf,
}

impl FilesystemResumeStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl ResumeStore for FilesystemResumeStore {
    fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, ResumeStoreError> {
        let path = self.directory.join(generated_name(extension));
        let reference = path.to_string_lossy().replace('\\', "/");

        fs::create_dir_all(&self.directory).map_err(|source| ResumeStoreError::Write {
            reference: reference.clone(),
            source,
        })?;
        fs::write(&path, bytes).map_err(|source| ResumeStoreError::Write {
            reference: reference.clone(),
            source,
        })?;
        Ok(reference)
    }

    fn discard(&self, reference: &str) {
        if let Err(err) = fs::remove_file(reference) {
            warn!(reference, error = %err, "failed to remove orphaned résumé");
        }
    }
}

/// Keeps résumés in memory; used by the demo and tests.
#[derive(Debug, Default)]
pub struct MemoryResumeStore {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn references(&self) -> Vec<String> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl ResumeStore for MemoryResumeStore {
    fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, ResumeStoreError> {
        let reference = format!("uploads/{}", generated_name(extension));
        let mut files = self
            .files
            .lock()
            .map_err(|_| ResumeStoreError::Unavailable("résumé store mutex poisoned".to_string()))?;
        files.insert(reference.clone(), bytes.to_vec());
        Ok(reference)
    }

    fn discard(&self, reference: &str) {
        if let Ok(mut files) = self.files.lock() {
            files.remove(reference);
        }
    }
}
