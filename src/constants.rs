// src/constants.rs

pub const BANNER: &str = "220 Welcome to Simple FTP Server\r\n";

pub const MAX_COMMAND_LINE: usize = 4096; // Longest control line accepted, CRLF included

pub const DEFAULT_DATA_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_UPLOAD_BUFFER_SIZE: usize = 256 * 1024; // 256 KB
pub const DEFAULT_DOWNLOAD_BUFFER_SIZE: usize = 128 * 1024; // 128 KB
