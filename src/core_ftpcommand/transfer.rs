use crate::config::ServerConfig;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::{list, retr, stor};
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncWrite};

/// A data-channel transfer requested by LIST, NLST, STOR or RETR.
///
/// Paths are already resolved and validated by the handler.
#[derive(Debug, PartialEq, Eq)]
pub enum Transfer {
    List(PathBuf),
    NameList(PathBuf),
    Store { path: PathBuf, name: String },
    Retrieve { path: PathBuf, name: String },
}

impl Transfer {
    /// The 150 reply sent before accepting the data connection.
    pub fn preliminary_reply(&self) -> Reply {
        let text = match self {
            Transfer::List(_) => "Here comes the directory listing.",
            Transfer::NameList(_) => "Here comes the file list.",
            Transfer::Store { .. } => "Opening data connection for file upload.",
            Transfer::Retrieve { .. } => "Opening data connection for file download.",
        };
        Reply::new(150, text)
    }

    /// Moves the bytes over `stream` and returns the completion reply.
    pub async fn run<S>(self, stream: &mut S, config: &ServerConfig) -> Reply
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        match self {
            Transfer::List(dir) => list::send_listing(&dir, stream, false).await,
            Transfer::NameList(dir) => list::send_listing(&dir, stream, true).await,
            Transfer::Store { path, name } => {
                stor::receive_file(&path, &name, stream, config.upload_buffer_size()).await
            }
            Transfer::Retrieve { path, name } => {
                retr::send_file(&path, &name, stream, config.download_buffer_size()).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_ftpcommand::handlers::tests::test_session;
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_store_then_retrieve_round_trip() {
        let (_dir, session) = test_session();
        let config = ServerConfig::default();
        let path = session.storage_root.join("round.bin");
        let payload: Vec<u8> = (0..70_000u32).map(|i| (i % 253) as u8).collect();

        let (mut server, mut client) = duplex(4096);
        let upload = payload.clone();
        let writer = tokio::spawn(async move {
            client.write_all(&upload).await.unwrap();
            client.shutdown().await.unwrap();
        });
        let store = Transfer::Store {
            path: path.clone(),
            name: "round.bin".to_string(),
        };
        assert_eq!(store.run(&mut server, &config).await.code(), 226);
        writer.await.unwrap();

        let (mut server, mut client) = duplex(4096);
        let reader = tokio::spawn(async move {
            let mut received = Vec::new();
            client.read_to_end(&mut received).await.unwrap();
            received
        });
        let retrieve = Transfer::Retrieve {
            path,
            name: "round.bin".to_string(),
        };
        assert_eq!(retrieve.run(&mut server, &config).await.code(), 226);
        drop(server);
        assert_eq!(reader.await.unwrap(), payload);
    }

    #[test]
    fn test_preliminary_replies() {
        let transfer = Transfer::List(PathBuf::from("/"));
        assert_eq!(
            transfer.preliminary_reply().to_string(),
            "150 Here comes the directory listing.\r\n"
        );
    }
}
