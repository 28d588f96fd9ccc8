use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "simpleftpd", about = "A minimal passive-mode FTP server.")]
pub struct Cli {
    /// Port of the control connection
    pub port: u16,

    /// Storage root, created if absent
    pub root_dir: PathBuf,

    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
