use crate::core_ftpcommand::handlers::Outcome;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::transfer::Transfer;
use crate::core_log::logger::log_activity;
use crate::session::Session;
use log::{error, info, warn};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Handles the RETR (Retrieve) FTP command.
///
/// The file must resolve inside the storage root, exist and not be a
/// directory. Its contents are streamed by [`send_file`] once the data
/// connection is accepted.
pub fn handle_retr_command(session: &Session, arg: &str) -> Outcome {
    if !session.data_channel.is_listening() {
        return Outcome::reply(425, "Use PASV first.");
    }

    let path = match session.resolve(arg) {
        Ok(path) if path.is_file() => path,
        Ok(path) => {
            warn!("RETR target is missing or a directory: {:?}", path);
            return Outcome::reply(550, "File not found or access denied.");
        }
        Err(e) => {
            error!("Refusing RETR of {:?}: {}", arg, e);
            return Outcome::reply(550, "File not found or access denied.");
        }
    };

    Outcome::Transfer(Transfer::Retrieve {
        path,
        name: arg.to_string(),
    })
}

/// Copies the file at `path` to the data connection.
pub async fn send_file<W>(path: &Path, name: &str, stream: &mut W, buffer_size: usize) -> Reply
where
    W: AsyncWrite + Unpin,
{
    let mut file = match File::open(path).await {
        Ok(f) => f,
        Err(e) => {
            error!("File could not be opened: {:?}, error: {}", path, e);
            return Reply::new(550, "Failed to open file.");
        }
    };

    info!("Sending file: {:?}", path);
    let mut buffer = vec![0; buffer_size.max(1)];
    loop {
        let bytes_read = match file.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                error!("Error reading file: {}", e);
                return Reply::new(550, format!("Download failed: {}", e));
            }
        };
        if let Err(e) = stream.write_all(&buffer[..bytes_read]).await {
            error!("Error sending file to client: {}", e);
            return Reply::new(550, "Failed to send file.");
        }
    }

    if let Err(e) = stream.shutdown().await {
        error!("Error shutting down data stream: {}", e);
        return Reply::new(550, "Failed to send file.");
    }

    info!("File transfer completed successfully: {:?}", path);
    log_activity(&format!("File downloaded: {}", name));
    Reply::new(226, "Transfer complete.")
}
