use crate::core_ftpcommand::handlers::Outcome;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::transfer::Transfer;
use crate::core_log::logger::log_activity;
use crate::session::Session;
use log::{error, info, warn};
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

/// Handles the STOR (Store File) FTP command.
///
/// Checks that a passive listener exists and that the target stays inside the
/// storage root. The bytes are received later by [`receive_file`], once the
/// data connection has been accepted.
///
/// # Arguments
///
/// * `session` - The session issuing the upload.
/// * `arg` - The name of the file to be stored.
///
/// # Returns
///
/// A transfer on success, `425` without PASV, `553` for a path outside the root.
pub fn handle_stor_command(session: &Session, arg: &str) -> Outcome {
    if !session.data_channel.is_listening() {
        return Outcome::reply(425, "Use PASV first.");
    }

    match session.resolve(arg) {
        Ok(path) => {
            info!("Received STOR command for: {:?}", path);
            Outcome::Transfer(Transfer::Store {
                path,
                name: arg.to_string(),
            })
        }
        Err(e) => {
            warn!("Invalid STOR target {:?}: {}", arg, e);
            Outcome::reply(553, "Invalid file path.")
        }
    }
}

/// Streams everything read from `stream` into a newly created file at `path`.
///
/// A partially written file is removed if the transfer fails.
pub async fn receive_file<R>(path: &Path, name: &str, stream: &mut R, buffer_size: usize) -> Reply
where
    R: AsyncRead + Unpin,
{
    let mut file = match File::create(path).await {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to create file: {:?}, error: {}", path, e);
            return Reply::new(550, "Failed to create file.");
        }
    };

    let mut buffer = vec![0; buffer_size.max(1)];
    let mut total: u64 = 0;
    loop {
        let bytes_read = match stream.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                error!("Error reading from data stream: {}", e);
                discard_partial(file, path).await;
                return Reply::new(550, "Failed to receive file.");
            }
        };

        if let Err(e) = file.write_all(&buffer[..bytes_read]).await {
            error!("Error writing to file: {}", e);
            discard_partial(file, path).await;
            return Reply::new(550, format!("Upload failed: {}", e));
        }
        total += bytes_read as u64;
    }

    if let Err(e) = file.flush().await {
        error!("Error flushing file {:?}: {}", path, e);
        discard_partial(file, path).await;
        return Reply::new(550, format!("Upload failed: {}", e));
    }

    info!("File stored successfully: {:?} ({} bytes)", path, total);
    log_activity(&format!("File uploaded: {}", name));
    Reply::new(226, "Transfer complete.")
}

async fn discard_partial(file: File, path: &Path) {
    drop(file);
    if let Err(e) = fs::remove_file(path).await {
        warn!("Failed to remove partial file {:?}: {}", path, e);
    }
}
