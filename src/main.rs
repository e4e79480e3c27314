use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sentiview::{cli, config};

#[derive(Debug, Parser)]
#[command(name = "sentiview")]
#[command(about = "Sentiment analysis dashboard client")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify text, then refresh the dashboard
    Analyze {
        /// The text to analyze
        #[arg(trailing_var_arg = true, required = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Show the aggregate statistics behind the charts
    Stats {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check which word clouds the backend can serve
    Wordcloud {
        /// positive, negative or both
        #[arg(default_value = "both", value_parser = ["positive", "negative", "both"])]
        kind: String,
    },
    /// Render the dashboard once to a static HTML page
    Snapshot {
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the local dashboard server
    Serve {
        /// Listen address (default from config: 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Check config, backend reachability and the diagnostic log
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write the default config to ~/.sentiview/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set one value, e.g. `backend.timeout_ms 5000`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let config = config::load();

    match app.command {
        Commands::Analyze { text } => cli::run_analyze(&config, &text.join(" ")),
        Commands::Stats { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(&config, fmt)
        }
        Commands::Wordcloud { kind } => cli::run_wordcloud(&config, &kind),
        Commands::Snapshot { out } => cli::run_snapshot(&config, out.as_deref()),
        Commands::Serve { addr } => cli::run_serve(&config, addr.as_deref()),
        Commands::Health => cli::run_health(&config),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
