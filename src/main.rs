mod config;
mod constants;
mod core_cli;
mod core_error;
mod core_ftpcommand;
mod core_log;
mod core_network;
mod core_path;
mod server;
mod session;

use crate::config::Config;
use crate::core_cli::Cli;
use crate::core_log::logger::init_logger;
use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Malformed arguments exit with status 1, help and version still exit 0
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    init_logger(args.verbose);

    // Load the optional configuration file, defaults otherwise
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    // Positional arguments always win over the file
    config.server.listen_port = args.port;
    config.server.chroot_dir = args.root_dir.to_string_lossy().into_owned();

    // Run the FTP server
    server::run(config).await?;

    Ok(())
}
