#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::AppConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "register-gate")]
#[command(about = "Registration page handler backed by a Supabase-compatible auth service")]
pub struct CliConfig {
    #[arg(long, short, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Address to listen on (overrides server.bind)")]
    pub bind: Option<String>,

    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub supabase_anon_key: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}
