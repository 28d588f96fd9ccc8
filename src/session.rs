use crate::core_error::FtpResult;
use crate::core_network::pasv::DataChannel;
use crate::core_path::resolver;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

/// State of one control connection.
///
/// `working_dir` always lies inside `storage_root`; it only changes through
/// CWD/CDUP, which validate the target first.
#[derive(Debug)]
pub struct Session {
    pub storage_root: PathBuf,
    pub working_dir: PathBuf,
    pub data_channel: DataChannel,
    pub local_ip: Option<Ipv4Addr>,     // Interface of the control connection, None for IPv6
    pub pasv_address: Option<Ipv4Addr>, // Advertised in 227 replies instead of local_ip
}

impl Session {
    /// `storage_root` must already be canonical.
    pub fn new(storage_root: PathBuf, local_ip: Option<Ipv4Addr>) -> Self {
        Self {
            working_dir: storage_root.clone(),
            storage_root,
            data_channel: DataChannel::Idle,
            local_ip,
            pasv_address: None,
        }
    }

    pub fn with_pasv_address(mut self, address: Option<Ipv4Addr>) -> Self {
        self.pasv_address = address;
        self
    }

    /// Resolves a client path and checks it stays inside the storage root.
    pub fn resolve(&self, arg: &str) -> FtpResult<PathBuf> {
        resolver::resolve_within(arg, &self.working_dir, &self.storage_root)
    }

    /// Like [`Session::resolve`], but a trailing symlink names the link itself.
    pub fn resolve_entry(&self, arg: &str) -> FtpResult<PathBuf> {
        resolver::resolve_entry_within(arg, &self.working_dir, &self.storage_root)
    }

    pub fn set_working_dir(&mut self, dir: &Path) {
        self.working_dir = dir.to_path_buf();
    }

    /// The working directory as the client sees it.
    pub fn virtual_dir(&self) -> String {
        resolver::virtual_path(&self.working_dir, &self.storage_root)
    }
}
