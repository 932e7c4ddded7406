use crate::builtin::Builtin;
use crate::env::Environment;
use crate::external::find_command_path;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Status of a child that could not be located on PATH.
pub const NOT_FOUND_STATUS: ExitCode = 127;

/// Status of a child whose executable was found but failed to start.
pub const EXEC_FAILED_STATUS: ExitCode = 126;

/// What a command name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Builtin(Builtin),
    /// An executable file, with the path it was found at.
    External(PathBuf),
    NotFound,
}

impl CommandKind {
    /// Resolves `name` against the builtin set first and PATH second.
    ///
    /// A bare name is looked up in every PATH directory in order. A name with a
    /// directory component (`./run.sh`, `/bin/ls`) is taken as a path as is.
    pub fn resolve(name: &str, env: &Environment) -> Self {
        if let Some(builtin) = Builtin::from_name(name) {
            return CommandKind::Builtin(builtin);
        }
        let search_path = env.search_path();
        match find_command_path(OsStr::new(&search_path), Path::new(name)) {
            Some(path) => CommandKind::External(path.into_owned()),
            None => CommandKind::NotFound,
        }
    }
}
