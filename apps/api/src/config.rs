use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Runtime configuration of the API server, read from `.env` and the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub uploads_dir: PathBuf,
    pub bind_addr: SocketAddr,
    /// Base URL used to build public image links
    pub public_url: String,
    pub upload_limit_bytes: usize,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let base_dir = env::current_dir()?;
        let db_name = env::var("DATABASE_NAME").unwrap_or_else(|_| "happy.db".to_string());
        let database_url = database_url_for(&base_dir.join(db_name))?;

        let uploads_dir = env::var("UPLOADS_DIR")
            .map_or_else(|_| base_dir.join("uploads"), PathBuf::from);

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .map(|p| p.parse())
            .transpose()
            .map_err(|e| eyre!("Invalid PORT: {e}"))?
            .unwrap_or(3333);
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| eyre!("Invalid HOST/PORT: {e}"))?;

        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let upload_limit_mb: usize = env::var("UPLOAD_LIMIT_MB")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .map_err(|e| eyre!("Invalid UPLOAD_LIMIT_MB: {e}"))?
            .unwrap_or(20);

        Ok(Self {
            database_url,
            uploads_dir,
            bind_addr,
            public_url,
            upload_limit_bytes: upload_limit_mb * 1024 * 1024,
        })
    }
}

/// Formats a filesystem path as a SQLx SQLite URL.
///
/// Absolute paths need three slashes (`sqlite:///abs/path.db`),
/// relative paths two (`sqlite://rel/path.db`).
pub fn database_url_for(path: &Path) -> Result<String> {
    let path_str = path
        .to_str()
        .ok_or_else(|| eyre!("Invalid database path"))?;
    let clean_path = path_str.trim_start_matches('/');

    Ok(if path.is_absolute() {
        format!("sqlite:///{clean_path}")
    } else {
        format!("sqlite://{clean_path}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_url_uses_three_slashes_for_absolute_paths() {
        assert_eq!(
            database_url_for(Path::new("/srv/happy.db")).ok(),
            Some("sqlite:///srv/happy.db".to_string())
        );
        assert_eq!(
            database_url_for(Path::new("data/happy.db")).ok(),
            Some("sqlite://data/happy.db".to_string())
        );
    }
}
