use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Structural conflicts raised by a schema handle.
///
/// These are fatal for the migration that hit them: the runner rolls back the
/// transaction and reports the error to the operator without retrying.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("table `{table}` already exists")]
    TableExists { table: String },
    #[error("table `{table}` does not exist")]
    MissingTable { table: String },
    #[error("column `{table}.{column}` already exists")]
    ColumnExists { table: String, column: String },
    #[error("column `{table}.{column}` does not exist")]
    ColumnMissing { table: String, column: String },
    #[error("column `{table}.{column}` has unsupported type `{declared}`")]
    UnsupportedType {
        table: String,
        column: String,
        declared: String,
    },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl SchemaError {
    /// True for the conflict variants, false for driver failures.
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::TableExists { .. }
                | Self::MissingTable { .. }
                | Self::ColumnExists { .. }
                | Self::ColumnMissing { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("migration {name} failed: {source}")]
    Schema {
        name: &'static str,
        #[source]
        source: SchemaError,
    },
    #[error("no applied migration to revert")]
    NothingToRevert,
    #[error("applied migration {name} is not known to this build")]
    Unknown { name: String },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Error returned by HTTP handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(color_eyre::eyre::Report),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.into())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.into())
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        Self::BadRequest(format!("Multipart error: {err}"))
    }
}
