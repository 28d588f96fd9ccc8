// Error handling for the protocol engine
use std::io;
use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::core_ftpcommand::reply::Reply;

#[derive(Error, Debug)]
pub enum FtpError {
    #[error("no passive listener, PASV was not issued")]
    NoPassiveListener,

    #[error("data connection failed: {0}")]
    DataConnection(#[source] io::Error),

    #[error("timed out waiting for the data connection")]
    AcceptTimeout,

    #[error("path is outside of the storage root: {0:?}")]
    OutsideRoot(PathBuf),

    #[error("cannot resolve path {path:?}: {source}")]
    Unresolvable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("passive mode needs an IPv4 address, got {0}")]
    NotIpv4(IpAddr),
}

impl FtpError {
    /// Reply for errors raised while setting up or consuming the data channel.
    pub fn to_ftp_response(&self) -> Reply {
        match self {
            FtpError::NoPassiveListener => Reply::new(425, "Use PASV first."),
            FtpError::DataConnection(_) | FtpError::AcceptTimeout | FtpError::NotIpv4(_) => {
                Reply::new(425, "Can't open data connection.")
            }
            FtpError::OutsideRoot(_) | FtpError::Unresolvable { .. } => {
                Reply::new(550, "File not found or access denied.")
            }
        }
    }
}

pub type FtpResult<T> = Result<T, FtpError>;
