use crate::config::{Config, ServerConfig};
use crate::constants::{BANNER, MAX_COMMAND_LINE};
use crate::core_ftpcommand::ftpcommand::parse_command_line;
use crate::core_ftpcommand::handlers::{handle_command, Outcome};
use crate::core_ftpcommand::reply::Reply;
use crate::session::Session;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Binds the control listener described by the configuration.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    let addr = format!("{}:{}", config.bind_address, config.listen_port);
    TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind control listener on {}", addr))
}

/// Accepts control connections forever, one task per connection.
///
/// Sessions share nothing but the read-only configuration and storage root.
pub async fn serve(
    listener: TcpListener,
    config: Arc<Config>,
    storage_root: Arc<PathBuf>,
) -> Result<()> {
    info!("Server listening on {}", listener.local_addr()?);

    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Accept failed: {}", e);
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };
        info!("New connection from {}", addr);

        let config = Arc::clone(&config);
        let storage_root = Arc::clone(&storage_root);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, config, storage_root).await {
                warn!("Connection error for {}: {:?}", addr, e);
            }
            info!("Connection closed for {}", addr);
        });
    }
}

/// Runs the command loop of one control connection.
///
/// Returns when the client quits or disconnects, or when the control
/// connection fails. Dropping the session releases any passive listener.
pub async fn handle_connection(
    socket: TcpStream,
    config: Arc<Config>,
    storage_root: Arc<PathBuf>,
) -> Result<()> {
    let local_ip = match socket.local_addr()?.ip() {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(ip) => ip.to_ipv4_mapped(),
    };
    let mut session = Session::new(PathBuf::clone(&storage_root), local_ip)
        .with_pasv_address(config.server.pasv_ip()?);

    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    writer.write_all(BANNER.as_bytes()).await?;

    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        let n = (&mut reader)
            .take(MAX_COMMAND_LINE as u64)
            .read_until(b'\n', &mut buffer)
            .await?;
        if n == 0 {
            debug!("Client disconnected");
            break;
        }
        if n == MAX_COMMAND_LINE && buffer.last() != Some(&b'\n') {
            warn!("Control line longer than {} bytes, closing", MAX_COMMAND_LINE);
            send_reply(&mut writer, &Reply::new(500, "Command line too long.")).await?;
            break;
        }

        let line = String::from_utf8_lossy(&buffer);
        let (verb, arg) = parse_command_line(&line);
        if verb == "PASS" {
            debug!("Received command: PASS ****");
        } else {
            debug!("Received command: {} {}", verb, arg);
        }

        match handle_command(&verb, &mut session, &arg) {
            Outcome::Reply(reply) => send_reply(&mut writer, &reply).await?,
            Outcome::Quit(reply) => {
                send_reply(&mut writer, &reply).await?;
                break;
            }
            Outcome::Transfer(transfer) => {
                send_reply(&mut writer, &transfer.preliminary_reply()).await?;
                let reply = match session.data_channel.accept(config.server.data_timeout()).await {
                    Ok(mut data_stream) => transfer.run(&mut data_stream, &config.server).await,
                    Err(e) => e.to_ftp_response(),
                };
                send_reply(&mut writer, &reply).await?;
            }
        }
    }

    Ok(())
}

async fn send_reply<W>(writer: &mut W, reply: &Reply) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    debug!("Replying: {} {}", reply.code(), reply.text());
    writer.write_all(reply.to_string().as_bytes()).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

    struct TestClient {
        reader: BufReader<OwnedReadHalf>,
        writer: OwnedWriteHalf,
    }

    impl TestClient {
        async fn connect(addr: std::net::SocketAddr) -> Self {
            let (reader, writer) = TcpStream::connect(addr).await.unwrap().into_split();
            let mut client = Self {
                reader: BufReader::new(reader),
                writer,
            };
            assert_eq!(client.read_line().await, BANNER);
            client
        }

        async fn read_line(&mut self) -> String {
            let mut line = String::new();
            self.reader.read_line(&mut line).await.unwrap();
            line
        }

        async fn send(&mut self, command: &str) -> String {
            self.writer
                .write_all(format!("{}\r\n", command).as_bytes())
                .await
                .unwrap();
            self.read_line().await
        }

        async fn pasv(&mut self) -> u16 {
            let reply = self.send("PASV").await;
            assert!(reply.starts_with("227 Entering Passive Mode (127,0,0,1,"), "{}", reply);
            let inner = &reply[reply.find('(').unwrap() + 1..reply.find(')').unwrap()];
            let parts: Vec<u16> = inner.split(',').map(|p| p.parse().unwrap()).collect();
            parts[4] * 256 + parts[5]
        }

        async fn upload(&mut self, name: &str, payload: &[u8]) -> String {
            let port = self.pasv().await;
            assert_eq!(
                self.send(&format!("STOR {}", name)).await,
                "150 Opening data connection for file upload.\r\n"
            );
            let mut data = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
            data.write_all(payload).await.unwrap();
            data.shutdown().await.unwrap();
            drop(data);
            self.read_line().await
        }

        async fn download(&mut self, command: &str) -> (String, Vec<u8>) {
            let port = self.pasv().await;
            let preliminary = self.send(command).await;
            assert!(preliminary.starts_with("150 "), "{}", preliminary);
            let mut data = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
            let mut received = Vec::new();
            data.read_to_end(&mut received).await.unwrap();
            (self.read_line().await, received)
        }
    }

    async fn start_server() -> (TempDir, PathBuf, std::net::SocketAddr) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let mut config = Config::default();
        config.server.data_timeout_secs = Some(5);
        config.server.upload_buffer_size = Some(1024);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, Arc::new(config), Arc::new(root.clone())));
        (dir, root, addr)
    }

    #[tokio::test]
    async fn test_store_size_retrieve_delete() {
        let (_dir, root, addr) = start_server().await;
        let mut client = TestClient::connect(addr).await;
        assert_eq!(client.send("user anonymous").await, "230 User logged in\r\n");
        assert_eq!(client.send("TYPE I").await, "200 Type set to I\r\n");

        let payload: Vec<u8> = (0..50_000u32).map(|i| (i % 241) as u8).collect();
        assert_eq!(
            client.upload("data.bin", &payload).await,
            "226 Transfer complete.\r\n"
        );
        assert_eq!(std::fs::read(root.join("data.bin")).unwrap(), payload);
        assert_eq!(
            client.send("SIZE data.bin").await,
            format!("213 {}\r\n", payload.len())
        );

        let (reply, received) = client.download("RETR data.bin").await;
        assert_eq!(reply, "226 Transfer complete.\r\n");
        assert_eq!(received, payload);

        assert_eq!(
            client.send("DELE data.bin").await,
            "250 File successfully deleted.\r\n"
        );
        assert_eq!(
            client.send("SIZE data.bin").await,
            "550 File not found or access denied.\r\n"
        );
        assert_eq!(client.send("QUIT").await, "221 Goodbye.\r\n");
        assert_eq!(client.read_line().await, "");
    }

    #[tokio::test]
    async fn test_listings_and_navigation() {
        let (_dir, root, addr) = start_server().await;
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("sub/a.txt"), b"12345").unwrap();
        let mut client = TestClient::connect(addr).await;

        assert_eq!(
            client.send("CWD /sub").await,
            "250 Directory successfully changed.\r\n"
        );
        assert_eq!(client.send("PWD").await, "257 \"/sub\"\r\n");

        let (reply, listing) = client.download("LIST").await;
        assert_eq!(reply, "226 Directory send OK.\r\n");
        assert_eq!(
            String::from_utf8(listing).unwrap(),
            "-rwxr-xr-x 1 ftp ftp            5 a.txt\r\n"
        );

        let (reply, names) = client.download("NLST").await;
        assert_eq!(reply, "226 Transfer complete.\r\n");
        assert_eq!(String::from_utf8(names).unwrap(), "a.txt\r\n");

        assert_eq!(
            client.send("CWD ..").await,
            "250 Directory successfully changed.\r\n"
        );
        assert_eq!(
            client.send("CWD ..").await,
            "550 Failed to change directory.\r\n"
        );
        assert_eq!(client.send("PWD").await, "257 \"/\"\r\n");
        assert_eq!(
            client.send("RETR ../../../../etc/passwd").await,
            "425 Use PASV first.\r\n"
        );
    }

    #[tokio::test]
    async fn test_protocol_errors_keep_session_alive() {
        let (_dir, _root, addr) = start_server().await;
        let mut client = TestClient::connect(addr).await;

        assert_eq!(client.send("MKD new").await, "500 Unknown command\r\n");
        assert_eq!(client.send("LIST").await, "425 Use PASV first.\r\n");
        assert_eq!(client.send("FEAT").await, "211-Features:\r\n");
        assert_eq!(client.read_line().await, " PASV\r\n");
        assert_eq!(client.read_line().await, " UTF8\r\n");
        assert_eq!(client.read_line().await, "211 End\r\n");

        client.pasv().await;
        assert_eq!(
            client.send("STOR ../../escape.bin").await,
            "553 Invalid file path.\r\n"
        );
        assert_eq!(client.send("SYST").await, "215 UNIX Type: L8\r\n");
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_data_channels() {
        let (_dir, _root, addr) = start_server().await;
        let mut first = TestClient::connect(addr).await;
        let mut second = TestClient::connect(addr).await;

        first.pasv().await;
        assert_eq!(second.send("NLST").await, "425 Use PASV first.\r\n");

        let (reply, names) = first.download("NLST").await;
        assert_eq!(reply, "226 Transfer complete.\r\n");
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn test_overlong_line_closes_session() {
        let (_dir, _root, addr) = start_server().await;
        let mut client = TestClient::connect(addr).await;
        assert_eq!(client.send("NOOP").await, "200 NOOP ok.\r\n");

        client
            .writer
            .write_all(&vec![b'A'; MAX_COMMAND_LINE])
            .await
            .unwrap();
        assert_eq!(client.read_line().await, "500 Command line too long.\r\n");
        assert_eq!(client.read_line().await, "");
    }

    #[tokio::test]
    async fn test_invalid_utf8_keeps_session_alive() {
        let (_dir, _root, addr) = start_server().await;
        let mut client = TestClient::connect(addr).await;

        client.writer.write_all(b"USER \xff\xfeanon\r\n").await.unwrap();
        assert_eq!(client.read_line().await, "230 User logged in\r\n");
        client.writer.write_all(b"\xc3(\r\n").await.unwrap();
        assert_eq!(client.read_line().await, "500 Unknown command\r\n");
        assert_eq!(client.send("NOOP").await, "200 NOOP ok.\r\n");
    }

    #[tokio::test]
    async fn test_unused_passive_listener_released_on_quit() {
        let (_dir, _root, addr) = start_server().await;
        let mut client = TestClient::connect(addr).await;
        let port = client.pasv().await;

        assert_eq!(client.send("QUIT").await, "221 Goodbye.\r\n");
        assert_eq!(client.read_line().await, "");

        // The session is dropped right after the control socket closes.
        let mut released = false;
        for _ in 0..50 {
            if TcpStream::connect(("127.0.0.1", port)).await.is_err() {
                released = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(released, "passive port {} still accepting", port);
    }
}
