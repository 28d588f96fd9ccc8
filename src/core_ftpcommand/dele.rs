use crate::core_ftpcommand::handlers::Outcome;
use crate::core_log::logger::log_activity;
use crate::session::Session;
use log::{error, warn};
use std::fs;

/// Handles the DELE (Delete File) FTP command.
///
/// Directories are not removed, that would be RMD. A symlink is removed as a
/// link, its target is left alone.
pub fn handle_dele_command(session: &Session, arg: &str) -> Outcome {
    let path = match session.resolve_entry(arg) {
        Ok(path) if path.symlink_metadata().is_ok() => path,
        Ok(_) => return Outcome::reply(550, "File not found."),
        Err(e) => {
            warn!("Refusing DELE of {:?}: {}", arg, e);
            return Outcome::reply(550, "File not found.");
        }
    };

    match fs::remove_file(&path) {
        Ok(()) => {
            log_activity(&format!("File deleted: {}", arg));
            Outcome::reply(250, "File successfully deleted.")
        }
        Err(e) => {
            error!("Failed to delete {:?}: {}", path, e);
            Outcome::reply(550, "Failed to delete file.")
        }
    }
}
