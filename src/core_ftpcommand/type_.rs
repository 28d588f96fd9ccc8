use crate::core_ftpcommand::handlers::Outcome;
use log::debug;

/// Handles the TYPE FTP command.
///
/// Transfers are always binary, so the requested type is only logged.
pub fn handle_type_command(arg: &str) -> Outcome {
    debug!("TYPE {} requested, staying in binary mode", arg);
    Outcome::reply(200, "Type set to I")
}
