//! Owned descriptor plumbing for pipelines.
//!
//! Every descriptor the shell creates lives in an [`OwnedFd`], so it is closed
//! when it goes out of scope on any path, including early error returns.
//! Pipe ends are also close-on-exec: a program started for one segment only
//! keeps the descriptors that were duplicated onto its standard streams.

use crate::error::{ShellError, ShellResult};
use nix::fcntl::{fcntl, FcntlArg, FdFlag, OFlag};
use nix::unistd;
use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd, RawFd};

/// Both ends of an anonymous pipe.
#[derive(Debug)]
pub struct Pipe {
    pub read: OwnedFd,
    pub write: OwnedFd,
}

impl Pipe {
    pub fn new() -> ShellResult<Self> {
        let (read, write) =
            retry(|| unistd::pipe2(OFlag::O_CLOEXEC)).map_err(ShellError::Pipe)?;
        Ok(Self { read, write })
    }
}

/// Makes `target` refer to what `fd` refers to, then closes `fd`.
///
/// The resulting `target` descriptor survives `exec`.
pub fn dup_onto(fd: OwnedFd, target: RawFd) -> ShellResult<()> {
    if fd.as_raw_fd() == target {
        // Already in place: closing it would close the target too.
        let raw = fd.into_raw_fd();
        retry(|| fcntl(raw, FcntlArg::F_SETFD(FdFlag::empty()))).map_err(ShellError::Dup)?;
        return Ok(());
    }
    retry(|| unistd::dup2(fd.as_raw_fd(), target)).map_err(ShellError::Dup)?;
    Ok(())
}

/// Repeats a system call interrupted by a signal.
pub fn retry<T, F>(f: F) -> nix::Result<T>
where
    F: Fn() -> nix::Result<T>,
{
    loop {
        match f() {
            Err(nix::Error::EINTR) => (),
            result => return result,
        }
    }
}
