use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Directory receiving uploaded image bytes as-is.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` as `<millis>-<file name>` and returns the stored name.
    ///
    /// Never replaces an existing file: a taken name gets a counter,
    /// `<millis>-<n>-<file name>`.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.root).await?;

        let millis = chrono::Utc::now().timestamp_millis();
        let file_name = sanitize_file_name(original_name);

        let mut attempt = 0_u32;
        let (stored, mut file) = loop {
            let stored = if attempt == 0 {
                format!("{millis}-{file_name}")
            } else {
                format!("{millis}-{attempt}-{file_name}")
            };
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.root.join(&stored))
                .await
            {
                Ok(file) => break (stored, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e),
            }
        };
        file.write_all(bytes).await?;
        file.flush().await?;

        tracing::debug!(file = %stored, size = bytes.len(), "stored upload");
        Ok(stored)
    }

    /// Deletes stored uploads, logging the ones that cannot be removed.
    pub async fn remove_all(&self, stored: &[String]) {
        for name in stored {
            if let Err(e) = tokio::fs::remove_file(self.root.join(name)).await {
                tracing::warn!(file = %name, error = %e, "failed to remove upload");
            }
        }
    }
}

/// Keeps the last path component and replaces anything outside `[A-Za-z0-9._-]`.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
