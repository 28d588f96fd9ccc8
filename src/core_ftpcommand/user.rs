use crate::core_ftpcommand::handlers::Outcome;
use log::info;

/// Handles the USER FTP command.
///
/// Any user name is accepted and the client is logged in straight away,
/// there are no credentials to check.
pub fn handle_user_command(username: &str) -> Outcome {
    info!("Received USER command with username: {}", username);
    Outcome::reply(230, "User logged in")
}

/// Handles the PASS FTP command. The password is never looked at.
pub fn handle_pass_command() -> Outcome {
    Outcome::reply(230, "User logged in")
}
