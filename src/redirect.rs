//! Output and error stream redirection.
//!
//! Redirection operators are ordinary words after tokenization, so they are
//! recognised here by exact text. Only the first operator of a command is
//! honoured: `cmd > out 2> err` redirects stdout to `out` and passes `2>` and
//! `err` to the command as arguments.

use crate::error::ShellError;
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

/// Stream a redirection rebinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// How the target file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// Discard previous contents (`>`).
    Truncate,
    /// Keep previous contents and write at the end (`>>`).
    Append,
}

/// A resolved `{stream, mode, target}` redirection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub stream: Stream,
    pub mode: RedirectMode,
    pub target: PathBuf,
}

impl Redirection {
    /// Opens the target for writing, creating it when missing.
    ///
    /// Relative targets resolve against the current working directory of the
    /// calling process.
    pub fn open(&self) -> Result<File, ShellError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).mode(0o644);
        match self.mode {
            RedirectMode::Truncate => options.truncate(true),
            RedirectMode::Append => options.append(true),
        };
        options.open(&self.target).map_err(|source| ShellError::Redirect {
            path: self.target.clone(),
            source,
        })
    }
}

/// Redirections attached to one command, at most one per stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirections {
    pub stdout: Option<Redirection>,
    pub stderr: Option<Redirection>,
}

impl Redirections {
    pub fn is_empty(&self) -> bool {
        self.stdout.is_none() && self.stderr.is_none()
    }

    fn set(&mut self, redirection: Redirection) {
        match redirection.stream {
            Stream::Stdout => self.stdout = Some(redirection),
            Stream::Stderr => self.stderr = Some(redirection),
        }
    }

    /// Both redirections in stdout, stderr order.
    pub fn iter(&self) -> impl Iterator<Item = &Redirection> {
        self.stdout.iter().chain(self.stderr.iter())
    }
}

fn operator(word: &str) -> Option<(Stream, RedirectMode)> {
    match word {
        ">" | "1>" => Some((Stream::Stdout, RedirectMode::Truncate)),
        ">>" | "1>>" => Some((Stream::Stdout, RedirectMode::Append)),
        "2>" => Some((Stream::Stderr, RedirectMode::Truncate)),
        "2>>" => Some((Stream::Stderr, RedirectMode::Append)),
        _ => None,
    }
}

/// Removes the first redirection operator and its target from `args`.
///
/// Scans left to right and stops at the first operator that has a following
/// word. An operator in the last position has no target; it stays in the
/// argument list untouched.
pub fn extract_redirection(mut args: Vec<String>) -> (Vec<String>, Redirections) {
    let mut redirections = Redirections::default();

    let found = args
        .iter()
        .enumerate()
        .find_map(|(i, word)| match operator(word) {
            Some(op) if i + 1 < args.len() => Some((i, op)),
            _ => None,
        });

    if let Some((i, (stream, mode))) = found {
        let target = PathBuf::from(args.remove(i + 1));
        args.remove(i);
        redirections.set(Redirection {
            stream,
            mode,
            target,
        });
    }

    (args, redirections)
}
