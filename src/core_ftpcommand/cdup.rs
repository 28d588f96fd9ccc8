use crate::core_ftpcommand::cwd::handle_cwd_command;
use crate::core_ftpcommand::handlers::Outcome;
use crate::session::Session;

/// Handles the CDUP FTP command, which is `CWD ..` under another name.
///
/// At the storage root the parent fails validation and the session stays put.
pub fn handle_cdup_command(session: &mut Session) -> Outcome {
    handle_cwd_command(session, "..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_ftpcommand::handlers::tests::{reply_text, test_session};

    #[test]
    fn test_cdup() {
        let (_dir, mut session) = test_session();
        let root = session.storage_root.clone();
        std::fs::create_dir(root.join("sub")).unwrap();
        session.set_working_dir(&root.join("sub"));

        assert_eq!(
            reply_text(handle_cdup_command(&mut session)),
            "250 Directory successfully changed.\r\n"
        );
        assert_eq!(session.working_dir, root);
        assert_eq!(
            reply_text(handle_cdup_command(&mut session)),
            "550 Failed to change directory.\r\n"
        );
        assert_eq!(session.virtual_dir(), "/");
    }
}
