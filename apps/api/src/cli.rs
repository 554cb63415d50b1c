use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "happy-api", version, about = "Orphanage registry API")]
pub struct CliArgs {
    /// Override database path
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<String>,

    /// Override uploads directory
    #[arg(long = "uploads-dir", global = true, value_name = "PATH")]
    pub uploads_dir: Option<String>,

    /// Override listening port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Apply pending migrations and serve HTTP (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Revert the most recently applied migration
    Revert,
    /// List migrations and whether they are applied
    Status,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(db) = &self.db {
            std::env::set_var("DATABASE_NAME", db);
        }
        if let Some(dir) = &self.uploads_dir {
            std::env::set_var("UPLOADS_DIR", dir);
        }
        if let Some(port) = self.port {
            std::env::set_var("PORT", port.to_string());
        }
    }

    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}
