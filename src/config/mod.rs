pub mod toml_config;

pub use toml_config::AppConfig;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "condo-tv")]
#[command(about = "Content backend for condominium TVs")]
pub struct CliConfig {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Snapshot file to read and write, overrides store.snapshot_path
    #[arg(long)]
    pub snapshot: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the interleaved playlist for a TV as JSON
    Playlist {
        /// TV connection code
        code: String,
        #[arg(long)]
        no_news: bool,
    },
    /// Print a condominium's active ads, notices and news without interleaving
    Content {
        condominium_id: i64,
        #[arg(long)]
        no_news: bool,
        #[arg(long, default_value = "5")]
        news_limit: usize,
    },
    /// Record a heartbeat for a TV
    Heartbeat { code: String },
    /// Run the offline and expiration checks once
    Monitor,
    /// Register a TV and print its connection code
    RegisterTv {
        name: String,
        condominium_id: i64,
        #[arg(long)]
        template: Option<String>,
    },
    /// Change a TV's notice:ad:news proportion
    SetProportion {
        tv_id: i64,
        #[arg(long)]
        notices: Option<u32>,
        #[arg(long)]
        ads: Option<u32>,
        #[arg(long)]
        news: Option<u32>,
    },
}
