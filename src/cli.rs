use std::{net::SocketAddr, path::PathBuf};

mod serve;
mod validate;

use anyhow::Context;
use clap::ArgAction;
use cocktails::Config;
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "COCKTAILS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// The directory recipes are stored in
    #[arg(short, long, env = "COCKTAILS_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Address the server listens on
    #[arg(short, long, env = "COCKTAILS_BIND", global = true)]
    bind: Option<SocketAddr>,

    /// Secret required in the X-API-Key header to add recipes
    #[arg(long, env = "API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => Config::default(),
        }
        .with_overrides(self.data_dir, self.bind, self.api_key);

        self.command
            .unwrap_or(Command::Serve)
            .run(config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Serve the recipe API over HTTP (default)
    Serve,

    /// Check every recipe file in the data directory
    ///
    /// Reports files that cannot be parsed and names used by more than one
    /// file.
    Validate(Validate),
}

impl Command {
    fn run(self, config: Config) -> anyhow::Result<()> {
        match self {
            Self::Serve => serve::run(config)?,
            Self::Validate(command) => command.run(&config)?,
        }
        Ok(())
    }
}
