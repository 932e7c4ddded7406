//! Error taxonomy of the shell.
//!
//! None of these errors ends the shell: they are reported as a one-line
//! diagnostic on stderr and the current input line is abandoned.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("pipe: {0}")]
    Pipe(#[source] nix::Error),

    #[error("fork: {0}")]
    Fork(#[source] nix::Error),

    #[error("dup2: {0}")]
    Dup(#[source] nix::Error),

    #[error("wait: {0}")]
    Wait(#[source] nix::Error),

    #[error("{}: {source}", path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("history file {}: {source}", path.display())]
    History {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;
