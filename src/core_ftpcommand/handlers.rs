use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::transfer::Transfer;
use crate::core_ftpcommand::{
    cdup, cwd, dele, feat, list, noop, pwd, quit, retr, size, stor, syst, type_, user,
};
use crate::core_network::pasv;
use crate::session::Session;

/// What the control loop has to do once a handler returns.
#[derive(Debug)]
pub enum Outcome {
    /// Send the reply and read the next command.
    Reply(Reply),
    /// Send the preliminary reply, accept the data connection and run the transfer.
    Transfer(Transfer),
    /// Send the reply and close the control connection.
    Quit(Reply),
}

impl Outcome {
    pub fn reply(code: u16, text: impl Into<String>) -> Self {
        Outcome::Reply(Reply::new(code, text))
    }
}

impl From<Reply> for Outcome {
    fn from(reply: Reply) -> Self {
        Outcome::Reply(reply)
    }
}

/// Runs the handler registered for `command`.
///
/// Handlers never fail: filesystem and socket errors are turned into replies
/// so a bad request can't take the session down.
pub fn dispatch(command: FtpCommand, session: &mut Session, arg: &str) -> Outcome {
    match command {
        FtpCommand::USER => user::handle_user_command(arg),
        FtpCommand::PASS => user::handle_pass_command(),
        FtpCommand::SYST => syst::handle_syst_command(),
        FtpCommand::FEAT => feat::handle_feat_command(),
        FtpCommand::TYPE => type_::handle_type_command(arg),
        FtpCommand::NOOP => noop::handle_noop_command(),
        FtpCommand::PWD => pwd::handle_pwd_command(session),
        FtpCommand::CWD => cwd::handle_cwd_command(session, arg),
        FtpCommand::CDUP => cdup::handle_cdup_command(session),
        FtpCommand::PASV => pasv::handle_pasv_command(session),
        FtpCommand::LIST => list::handle_list_command(session, arg),
        FtpCommand::NLST => list::handle_nlst_command(session, arg),
        FtpCommand::STOR => stor::handle_stor_command(session, arg),
        FtpCommand::RETR => retr::handle_retr_command(session, arg),
        FtpCommand::SIZE => size::handle_size_command(session, arg),
        FtpCommand::DELE => dele::handle_dele_command(session, arg),
        FtpCommand::QUIT => quit::handle_quit_command(),
    }
}

/// Parses `verb` and dispatches it, answering 500 for anything unknown.
pub fn handle_command(verb: &str, session: &mut Session, arg: &str) -> Outcome {
    match verb.parse::<FtpCommand>() {
        Ok(command) => dispatch(command, session, arg),
        Err(()) => Outcome::reply(500, "Unknown command"),
    }
}
