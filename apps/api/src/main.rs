use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use happy_api::cli::{CliArgs, Command};
use happy_api::config::ApiConfig;
use happy_api::db::{create_database_pool, Migrator};
use happy_api::routes::{router, AppState};
use happy_api::uploads::UploadDir;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("happy_api=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = ApiConfig::from_env()?;

    let pool = create_database_pool(&config.database_url).await?;
    let migrator = Migrator::default();

    match args.command() {
        Command::Migrate => {
            let executed = migrator.run(&pool).await?;
            println!("Applied {} migration(s)", executed.len());
            for name in executed {
                println!("  {name}");
            }
        }
        Command::Revert => {
            let name = migrator.revert_last(&pool).await?;
            println!("Reverted {name}");
        }
        Command::Status => {
            for status in migrator.status(&pool).await? {
                let mark = if status.applied { "applied" } else { "pending" };
                println!("{mark:>8}  {}", status.name);
            }
        }
        Command::Serve => {
            migrator.run(&pool).await?;

            let state = AppState::new(
                pool,
                UploadDir::new(&config.uploads_dir),
                &config.public_url,
            );
            let app = router(state, config.upload_limit_bytes);

            let listener = tokio::net::TcpListener::bind(config.bind_addr)
                .await
                .wrap_err_with(|| format!("Failed to bind {}", config.bind_addr))?;
            tracing::info!("Listening on {}", config.bind_addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
