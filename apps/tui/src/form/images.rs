use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::FormError;

/// A file picked for upload. Bytes are read only when the form is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub mime: String,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, FormError> {
        let path = path.into();
        let metadata = std::fs::metadata(&path)
            .ok()
            .filter(std::fs::Metadata::is_file)
            .ok_or_else(|| FormError::MissingFile { path: path.clone() })?;

        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
        let mime = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();

        Ok(Self {
            path,
            file_name,
            size: metadata.len(),
            mime,
        })
    }
}

/// Parses a comma-separated list of paths into files.
///
/// Blank input selects nothing. A single missing path rejects the whole batch.
pub fn parse_selection(input: &str) -> Result<Vec<SelectedFile>, FormError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| SelectedFile::from_path(expand_home(p)))
        .collect()
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => Path::new(&home).join(rest),
        _ => PathBuf::from(path),
    }
}

/// One entry of the form's image sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub id: u64,
    pub file: SelectedFile,
    pub preview: String,
}

impl ImageAttachment {
    pub(crate) fn new(id: u64, file: SelectedFile) -> Self {
        let preview = preview_url(id, &file.file_name);
        Self { id, file, preview }
    }
}

pub fn preview_url(id: u64, file_name: &str) -> String {
    format!("preview://{id}/{file_name}")
}

/// Preview URLs handed out by one form.
///
/// Every URL still registered when the registry is dropped is revoked.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: BTreeSet<String>,
    #[cfg(test)]
    revoked: Option<std::sync::mpsc::Sender<String>>,
}

impl PreviewRegistry {
    pub fn register(&mut self, url: &str) {
        self.live.insert(url.to_owned());
    }

    /// Returns false if the URL was not live.
    pub fn revoke(&mut self, url: &str) -> bool {
        let removed = self.live.remove(url);
        if removed {
            tracing::debug!(%url, "revoked preview");
            self.notify(url);
        }
        removed
    }

    pub fn revoke_all(&mut self) {
        if !self.live.is_empty() {
            tracing::debug!(count = self.live.len(), "revoking previews");
        }
        for url in std::mem::take(&mut self.live) {
            self.notify(&url);
        }
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.live.contains(url)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Reports every revoked URL on the returned channel.
    #[cfg(test)]
    pub(crate) fn watch_revocations(&mut self) -> std::sync::mpsc::Receiver<String> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.revoked = Some(tx);
        rx
    }

    #[cfg(test)]
    fn notify(&self, url: &str) {
        if let Some(tx) = &self.revoked {
            let _ = tx.send(url.to_owned());
        }
    }

    #[cfg(not(test))]
    #[allow(clippy::unused_self)]
    const fn notify(&self, _url: &str) {}
}

impl Drop for PreviewRegistry {
    fn drop(&mut self) {
        self.revoke_all();
    }
}
