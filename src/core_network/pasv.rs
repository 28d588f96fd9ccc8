use crate::core_error::{FtpError, FtpResult};
use crate::core_ftpcommand::handlers::Outcome;
use crate::session::Session;
use log::{debug, error, info, trace, warn};
use std::mem;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use tokio::net::{TcpListener, TcpSocket, TcpStream};

/// Passive-mode data channel of one session.
///
/// `PASV` moves it to `Listening`; the next data command takes the listener
/// out, accepts a single connection and leaves it `Closed`. Dropping the
/// channel releases any listener that was never consumed.
#[derive(Debug, Default)]
pub enum DataChannel {
    #[default]
    Idle,
    Listening(TcpListener),
    Closed,
}

impl DataChannel {
    pub fn is_listening(&self) -> bool {
        matches!(self, DataChannel::Listening(_))
    }

    /// Address of the live listener, if any.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match self {
            DataChannel::Listening(listener) => listener.local_addr().ok(),
            _ => None,
        }
    }

    /// Opens a fresh listener on `ip` with an ephemeral port.
    ///
    /// A listener left over from a previous `PASV` is closed first.
    pub fn open(&mut self, ip: Ipv4Addr) -> FtpResult<SocketAddrV4> {
        self.close();

        let socket = TcpSocket::new_v4().map_err(FtpError::DataConnection)?;
        socket
            .bind(SocketAddr::V4(SocketAddrV4::new(ip, 0)))
            .map_err(FtpError::DataConnection)?;
        let listener = socket.listen(1).map_err(FtpError::DataConnection)?;

        let addr = match listener.local_addr().map_err(FtpError::DataConnection)? {
            SocketAddr::V4(addr) => addr,
            SocketAddr::V6(addr) => return Err(FtpError::NotIpv4(IpAddr::V6(*addr.ip()))),
        };
        debug!("PASV listener set up on {}", addr);

        *self = DataChannel::Listening(listener);
        Ok(addr)
    }

    /// Accepts exactly one data connection.
    ///
    /// The listener is released before this returns, whatever the outcome.
    pub async fn accept(&mut self, timeout: Duration) -> FtpResult<TcpStream> {
        let listener = match mem::replace(self, DataChannel::Closed) {
            DataChannel::Listening(listener) => listener,
            previous => {
                *self = previous;
                return Err(FtpError::NoPassiveListener);
            }
        };

        match tokio::time::timeout(timeout, listener.accept()).await {
            Ok(Ok((stream, peer))) => {
                debug!("Accepted data connection from: {}", peer);
                Ok(stream)
            }
            Ok(Err(e)) => {
                warn!("Failed to accept data connection: {}", e);
                Err(FtpError::DataConnection(e))
            }
            Err(_) => {
                warn!("No data connection within {:?}", timeout);
                Err(FtpError::AcceptTimeout)
            }
        }
    }

    pub fn close(&mut self) {
        if let Some(addr) = self.local_addr() {
            trace!("Closing passive listener {}", addr);
        }
        *self = DataChannel::Idle;
    }
}

/// Handles the PASV FTP command.
///
/// Binds a new listener on the interface the control connection came in on
/// and tells the client where to connect.
pub fn handle_pasv_command(session: &mut Session) -> Outcome {
    let Some(local_ip) = session.local_ip else {
        error!("PASV requested on a control connection without an IPv4 address");
        return Outcome::reply(425, "Can't open data connection.");
    };

    match session.data_channel.open(local_ip) {
        Ok(addr) => {
            let advertised_ip = session.pasv_address.unwrap_or(*addr.ip());
            let advertised = SocketAddrV4::new(advertised_ip, addr.port());
            info!("Entering passive mode on {}, advertised as {}", addr, advertised);
            Outcome::reply(
                227,
                format!("Entering Passive Mode ({})", encode_pasv_address(advertised)),
            )
        }
        Err(e) => {
            error!("Failed to set up PASV listener: {}", e);
            e.to_ftp_response().into()
        }
    }
}

/// Encodes an address as the `h1,h2,h3,h4,p1,p2` tuple of a 227 reply.
pub fn encode_pasv_address(addr: SocketAddrV4) -> String {
    let [h1, h2, h3, h4] = addr.ip().octets();
    let port = addr.port();
    format!("{},{},{},{},{},{}", h1, h2, h3, h4, port / 256, port % 256)
}
