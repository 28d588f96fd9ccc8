use crate::core_ftpcommand::handlers::Outcome;
use crate::session::Session;
use log::{info, warn};

/// Handles the CWD (Change Working Directory) FTP command.
///
/// The target is resolved against the session, must stay inside the storage
/// root and must be a directory. Otherwise the working directory is left
/// untouched.
///
/// # Arguments
///
/// * `session` - The session whose working directory changes.
/// * `arg` - The directory, absolute (root-relative) or relative to the working directory.
///
/// # Returns
///
/// `250` on success, `550` on any failure.
pub fn handle_cwd_command(session: &mut Session, arg: &str) -> Outcome {
    let new_dir = match session.resolve(arg) {
        Ok(path) => path,
        Err(e) => {
            warn!("Failed to change directory to {:?}: {}", arg, e);
            return Outcome::reply(550, "Failed to change directory.");
        }
    };

    if !new_dir.is_dir() {
        warn!("Not a directory: {:?}", new_dir);
        return Outcome::reply(550, "Failed to change directory.");
    }

    session.set_working_dir(&new_dir);
    info!("Directory successfully changed to: {}", session.virtual_dir());
    Outcome::reply(250, "Directory successfully changed.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_ftpcommand::handlers::tests::{reply_text, test_session};
    use std::fs;

    #[test]
    fn test_cwd_relative_and_absolute() {
        let (_dir, mut session) = test_session();
        let root = session.storage_root.clone();
        fs::create_dir_all(root.join("a/b")).unwrap();

        handle_cwd_command(&mut session, "a");
        assert_eq!(session.working_dir, root.join("a"));
        handle_cwd_command(&mut session, "b/./");
        assert_eq!(session.working_dir, root.join("a/b"));
        handle_cwd_command(&mut session, "/a");
        assert_eq!(session.working_dir, root.join("a"));
        handle_cwd_command(&mut session, "/");
        assert_eq!(session.working_dir, root);
    }

    #[test]
    fn test_cwd_rejects_files_and_missing_dirs() {
        let (_dir, mut session) = test_session();
        let root = session.storage_root.clone();
        fs::write(root.join("file.txt"), b"data").unwrap();

        for arg in ["file.txt", "missing", "../../../../etc"] {
            assert_eq!(
                reply_text(handle_cwd_command(&mut session, arg)),
                "550 Failed to change directory.\r\n"
            );
            assert_eq!(session.working_dir, root);
        }
    }
}
