use crate::core_ftpcommand::handlers::Outcome;

/// Handles the SYST (System) FTP command.
pub fn handle_syst_command() -> Outcome {
    Outcome::reply(215, "UNIX Type: L8")
}
