use std::path::PathBuf;
use thiserror::Error;

/// Failures of the HTTP contract with the orphanage API.
#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("could not read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("submission ended without a response")]
    Interrupted,
}

/// Operations refused by the creation form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("a submission is already in progress")]
    Submitting,
    #[error("the orphanage was already created")]
    Finished,
    #[error("nothing to submit yet")]
    Empty,
    #[error("no submission is in progress")]
    NotSubmitting,
    #[error("image selection is stale: nothing removed at position {index}")]
    StaleSelection { index: usize },
    #[error("`{field}` is limited to {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("file not found: {}", path.display())]
    MissingFile { path: PathBuf },
}
