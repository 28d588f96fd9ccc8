use crate::core_ftpcommand::handlers::Outcome;
use crate::session::Session;
use log::{error, info};
use std::fs;
use std::io::ErrorKind;

/// Handles the SIZE (File Size) FTP command.
///
/// Replies `213 <bytes>` for a regular file inside the storage root and `550`
/// for anything else.
///
/// # Arguments
///
/// * `session` - The session the path is resolved against.
/// * `arg` - The name of the file.
pub fn handle_size_command(session: &Session, arg: &str) -> Outcome {
    let path = match session.resolve(arg) {
        Ok(path) => path,
        Err(e) => {
            error!("Refusing SIZE of {:?}: {}", arg, e);
            return Outcome::reply(550, "File not found or access denied.");
        }
    };

    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Outcome::reply(550, "File not found or access denied.");
        }
        Err(e) => {
            error!("Failed to get file metadata: {:?}, error: {}", path, e);
            return Outcome::reply(550, "Could not get file size.");
        }
    };

    if metadata.is_dir() {
        return Outcome::reply(550, "File not found or access denied.");
    }

    info!("File size for {:?} is {}", path, metadata.len());
    Outcome::reply(213, metadata.len().to_string())
}
