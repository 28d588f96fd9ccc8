use crate::core_error::FtpResult;
use crate::core_ftpcommand::handlers::Outcome;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::transfer::Transfer;
use crate::session::Session;
use log::{error, info, warn};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Handles the LIST FTP command.
///
/// Needs a passive listener. The listing itself is produced once the data
/// connection is up, see [`send_listing`].
pub fn handle_list_command(session: &Session, arg: &str) -> Outcome {
    if !session.data_channel.is_listening() {
        return Outcome::reply(425, "Use PASV first.");
    }
    match listing_dir(session, arg) {
        Ok(dir) => Outcome::Transfer(Transfer::List(dir)),
        Err(e) => {
            warn!("Refusing to list {:?}: {}", arg, e);
            Outcome::reply(550, "Failed to list directory.")
        }
    }
}

/// Handles the NLST FTP command, a LIST with bare names.
pub fn handle_nlst_command(session: &Session, arg: &str) -> Outcome {
    if !session.data_channel.is_listening() {
        return Outcome::reply(425, "Use PASV first.");
    }
    match listing_dir(session, arg) {
        Ok(dir) => Outcome::Transfer(Transfer::NameList(dir)),
        Err(e) => {
            warn!("Refusing to list {:?}: {}", arg, e);
            Outcome::reply(550, "Failed to list directory.")
        }
    }
}

// Clients commonly pass `ls` style flags such as `-la`; those mean the working directory.
fn listing_dir(session: &Session, arg: &str) -> FtpResult<PathBuf> {
    if arg.is_empty() || arg.starts_with('-') {
        Ok(session.working_dir.clone())
    } else {
        session.resolve(arg)
    }
}

/// One LIST line. Permissions, link count and owner are fixed.
pub fn format_list_line(name: &str, is_dir: bool, size: u64) -> String {
    format!(
        "{}rwxr-xr-x 1 ftp ftp {:>12} {}\r\n",
        if is_dir { "d" } else { "-" },
        size,
        name
    )
}

async fn read_listing(dir: &Path, names_only: bool) -> io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if names_only {
            entries.push((name, false, 0));
            continue;
        }
        match fs::metadata(entry.path()).await {
            Ok(metadata) => {
                let size = if metadata.is_dir() { 0 } else { metadata.len() };
                entries.push((name, metadata.is_dir(), size));
            }
            Err(e) => warn!("Failed to get metadata for entry: {:?}, error: {}", entry.path(), e),
        }
    }
    entries.sort();

    let listing = entries
        .iter()
        .map(|(name, is_dir, size)| {
            if names_only {
                format!("{}\r\n", name)
            } else {
                format_list_line(name, *is_dir, *size)
            }
        })
        .collect();
    Ok(listing)
}

/// Writes the listing of `dir` to the data connection and returns the final reply.
pub async fn send_listing<W>(dir: &Path, stream: &mut W, names_only: bool) -> Reply
where
    W: AsyncWrite + Unpin,
{
    let (what, done) = if names_only {
        ("files", Reply::new(226, "Transfer complete."))
    } else {
        ("directory", Reply::new(226, "Directory send OK."))
    };

    let listing = match read_listing(dir, names_only).await {
        Ok(listing) => listing,
        Err(e) => {
            error!("Error reading directory {:?}: {}", dir, e);
            let text = if names_only {
                format!("Failed to list files: {}", e)
            } else {
                format!("Failed to list directory: {}", e)
            };
            return Reply::new(550, text);
        }
    };

    if let Err(e) = stream.write_all(listing.as_bytes()).await {
        error!("Failed to send {} listing: {}", what, e);
        let text = if names_only {
            "Failed to send file list."
        } else {
            "Failed to send directory listing."
        };
        return Reply::new(550, text);
    }
    if let Err(e) = stream.shutdown().await {
        warn!("Failed to shutdown data stream: {}", e);
    }

    info!("Listing of {:?} sent successfully.", dir);
    done
}
