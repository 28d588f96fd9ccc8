// Here's the list of the FTP commands implemented
pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod feat;
pub mod list;
pub mod noop;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod size;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

// Dispatch, wire format and data transfers
pub mod ftpcommand;
pub mod handlers;
pub mod reply;
pub mod transfer;
