use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "happy", version, about = "Browse and register orphanages")]
pub struct CliArgs {
    /// Print the orphanage list and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless list as JSON
    #[arg(long)]
    pub json: bool,

    /// Write debug logs to happy-tui.log
    #[arg(long)]
    pub debug: bool,

    /// Override the API base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var("API_URL", url);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
