use crate::core_ftpcommand::handlers::Outcome;
use crate::core_ftpcommand::reply::Reply;
use log::info;

/// Handles the QUIT FTP command.
///
/// The control loop sends the reply and then closes the connection.
pub fn handle_quit_command() -> Outcome {
    info!("Received QUIT command. Closing connection.");
    Outcome::Quit(Reply::new(221, "Goodbye."))
}
