use crate::core_ftpcommand::handlers::Outcome;
use crate::session::Session;

/// Handles the PWD FTP command with the `/`-rooted working directory.
pub fn handle_pwd_command(session: &Session) -> Outcome {
    Outcome::reply(257, format!("\"{}\"", session.virtual_dir()))
}
