use clap::Parser;
use color_eyre::Result;
use std::sync::Arc;

use happy_tui::api::HttpOrphanageApi;
use happy_tui::app::actions::AppActions;
use happy_tui::app::App;
use happy_tui::cli::CliArgs;
use happy_tui::config::init_app_config;
use happy_tui::{event, logging, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config()?;

    if config.debug {
        logging::init_file_logging()?;
    }

    let api = Arc::new(HttpOrphanageApi::new(&config.api_url, config.request_timeout)?);
    tracing::info!(api_url = api.base_url(), "starting client");

    // Check if we're running in a terminal
    if args.headless || !is_terminal() {
        return event::run_headless(&AppActions::new(api), args.json).await;
    }

    let mut app = App::new(&config, api);

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app).await;
    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
