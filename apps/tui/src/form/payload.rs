use reqwest::multipart::{Form, Part};

use super::images::SelectedFile;
use crate::error::ApiClientError;

/// Multi-part field carrying the image files, repeated once per file.
pub const IMAGE_FIELD: &str = "images";

/// Snapshot of the form taken at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPayload {
    fields: Vec<(&'static str, String)>,
    images: Vec<SelectedFile>,
}

impl SubmissionPayload {
    pub(crate) fn new(fields: Vec<(&'static str, String)>, images: Vec<SelectedFile>) -> Self {
        Self { fields, images }
    }

    /// Text entries in wire order.
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn images(&self) -> &[SelectedFile] {
        &self.images
    }

    /// Entry names in wire order, one `images` entry per file.
    pub fn entry_names(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .map(|(key, _)| *key)
            .chain(self.images.iter().map(|_| IMAGE_FIELD))
            .collect()
    }

    /// Reads every image and builds the multi-part body.
    pub async fn into_multipart(self) -> Result<Form, ApiClientError> {
        let mut form = Form::new();
        for (key, value) in self.fields {
            form = form.text(key, value);
        }

        for file in self.images {
            let bytes = tokio::fs::read(&file.path)
                .await
                .map_err(|source| ApiClientError::File {
                    path: file.path.clone(),
                    source,
                })?;
            let part = Part::bytes(bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)?;
            form = form.part(IMAGE_FIELD, part);
        }

        Ok(form)
    }
}
