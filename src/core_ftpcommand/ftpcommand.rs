use std::str::FromStr;

#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    SYST,
    FEAT,
    TYPE,
    NOOP,
    PWD,
    CWD,
    CDUP,
    PASV,
    LIST,
    NLST,
    STOR,
    RETR,
    SIZE,
    DELE,
    QUIT,
}

impl FromStr for FtpCommand {
    type Err = ();

    /// Verbs are matched case-insensitively.
    fn from_str(cmd: &str) -> Result<Self, Self::Err> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Ok(FtpCommand::USER),
            "PASS" => Ok(FtpCommand::PASS),
            "SYST" => Ok(FtpCommand::SYST),
            "FEAT" => Ok(FtpCommand::FEAT),
            "TYPE" => Ok(FtpCommand::TYPE),
            "NOOP" => Ok(FtpCommand::NOOP),
            "PWD" => Ok(FtpCommand::PWD),
            "CWD" => Ok(FtpCommand::CWD),
            "CDUP" => Ok(FtpCommand::CDUP),
            "PASV" => Ok(FtpCommand::PASV),
            "LIST" => Ok(FtpCommand::LIST),
            "NLST" => Ok(FtpCommand::NLST),
            "STOR" => Ok(FtpCommand::STOR),
            "RETR" => Ok(FtpCommand::RETR),
            "SIZE" => Ok(FtpCommand::SIZE),
            "DELE" => Ok(FtpCommand::DELE),
            "QUIT" => Ok(FtpCommand::QUIT),
            _ => Err(()),
        }
    }
}

/// Splits a control line into its upper-cased verb and argument.
///
/// The line terminator is stripped. Everything after the first space is the
/// argument, kept verbatim so file names may contain spaces.
pub fn parse_command_line(line: &str) -> (String, String) {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.split_once(' ') {
        Some((verb, arg)) => (verb.to_ascii_uppercase(), arg.to_string()),
        None => (line.to_ascii_uppercase(), String::new()),
    }
}
