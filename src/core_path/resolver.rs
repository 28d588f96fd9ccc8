use crate::core_error::{FtpError, FtpResult};
use log::trace;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Maps a client-supplied path onto the host filesystem.
///
/// An empty argument is the working directory itself. A leading `/` makes the
/// argument relative to the storage root, anything else is relative to the
/// working directory. The joined path is canonicalized, see [`canonicalize`].
pub fn resolve(arg: &str, working_dir: &Path, root: &Path) -> FtpResult<PathBuf> {
    if arg.is_empty() {
        return Ok(working_dir.to_path_buf());
    }
    canonicalize(&join(arg, working_dir, root))
}

fn join(arg: &str, working_dir: &Path, root: &Path) -> PathBuf {
    let joined = if arg.starts_with('/') {
        root.join(arg.trim_start_matches('/'))
    } else {
        working_dir.join(arg)
    };
    trace!("Resolving {:?} to {:?}", arg, joined);
    joined
}

/// Canonicalizes `path`, tolerating a missing final component.
///
/// A path that does not exist yet (the target of an upload) is accepted when its
/// parent directory canonicalizes; the file name is re-attached as is. Dangling
/// symlinks and missing intermediate directories are errors.
pub fn canonicalize(path: &Path) -> FtpResult<PathBuf> {
    let unresolvable = |source| FtpError::Unresolvable {
        path: path.to_path_buf(),
        source,
    };

    match path.canonicalize() {
        Ok(canonical) => Ok(canonical),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            // A symlink whose target is missing must not be written through.
            if path.symlink_metadata().is_ok() {
                return Err(unresolvable(e));
            }
            let (parent, name) = match (path.parent(), path.file_name()) {
                (Some(parent), Some(name)) => (parent, name),
                _ => return Err(unresolvable(e)),
            };
            let parent = parent.canonicalize().map_err(unresolvable)?;
            Ok(parent.join(name))
        }
        Err(e) => Err(unresolvable(e)),
    }
}

/// Returns true when `path` lies within `root` (the root itself included).
///
/// Both paths are expected in canonical form.
pub fn validate(path: &Path, root: &Path) -> bool {
    match path.strip_prefix(root) {
        Ok(relative) => !relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))),
        Err(_) => false,
    }
}

/// Resolves `arg` and rejects anything that escapes `root`.
///
/// The empty argument short-circuits to `working_dir` without a containment
/// check, it can't name anything outside the session's current location.
pub fn resolve_within(arg: &str, working_dir: &Path, root: &Path) -> FtpResult<PathBuf> {
    let resolved = resolve(arg, working_dir, root)?;
    if arg.is_empty() || validate(&resolved, root) {
        Ok(resolved)
    } else {
        Err(FtpError::OutsideRoot(resolved))
    }
}

/// Resolves `arg` to a directory entry without following a final symlink.
///
/// Only the parent is canonicalized, so removing the result removes the link
/// and never its target. The entry must name something below `root`.
pub fn resolve_entry_within(arg: &str, working_dir: &Path, root: &Path) -> FtpResult<PathBuf> {
    let joined = join(arg, working_dir, root);
    let (parent, name) = match (joined.parent(), joined.file_name()) {
        (Some(parent), Some(name)) => (parent, name),
        _ => return Err(FtpError::OutsideRoot(joined)),
    };
    let parent = parent
        .canonicalize()
        .map_err(|source| FtpError::Unresolvable {
            path: joined.clone(),
            source,
        })?;

    let entry = parent.join(name);
    if entry != root && validate(&entry, root) {
        Ok(entry)
    } else {
        Err(FtpError::OutsideRoot(entry))
    }
}

/// Client-visible form of a host path: `/` for the root, `/a/b` below it.
pub fn virtual_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(Path::new(""));
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    format!("/{}", parts.join("/"))
}
