//! Process orchestration: runs a parsed [`Pipeline`].
//!
//! A pipeline of one builtin runs inside the shell, so `cd` and `exit` can act
//! on the session. Every other pipeline forks one child per segment, connects
//! neighbours with pipes and waits for all of them before returning.

use crate::builtin::Builtin;
use crate::command::{CommandKind, EXEC_FAILED_STATUS, ExitCode, NOT_FOUND_STATUS};
use crate::env::Environment;
use crate::error::{ShellError, ShellResult};
use crate::fd::{Pipe, dup_onto, retry};
use crate::io_adapters::Streams;
use crate::parser::{CommandSegment, Pipeline};
use crate::redirect::{Redirections, Stream};
use nix::sys::signal::{SigHandler, Signal, signal};
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{self, ForkResult, Pid};
use std::ffi::{CString, NulError};
use std::fmt;
use std::io::{self, Write};
use std::os::fd::OwnedFd;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Runs `pipeline` to completion and returns the status of its last segment.
///
/// Failures of a single segment (unknown command, exec error) only affect that
/// segment's child. An error is returned when the shell itself cannot set the
/// pipeline up: a redirection target of an inline builtin cannot be opened,
/// or `pipe`/`fork`/`waitpid` fail. Children started before such a failure
/// are still reaped.
pub fn execute(pipeline: Pipeline, env: &mut Environment) -> ShellResult<ExitCode> {
    log::debug!(
        "pipeline: {:?}",
        pipeline.segments().iter().map(|s| &s.argv).collect::<Vec<_>>()
    );
    if pipeline.is_simple() {
        let segment = &pipeline.segments()[0];
        match segment.name() {
            None => {
                // Only a redirection: create the targets, run nothing.
                for redirection in segment.redirections.iter() {
                    redirection.open()?;
                }
                return Ok(0);
            }
            Some(name) => {
                if let Some(builtin) = Builtin::from_name(name) {
                    return run_inline(builtin, segment, env);
                }
            }
        }
    }
    run_forked(pipeline.into_segments(), env)
}

fn run_inline(
    builtin: Builtin,
    segment: &CommandSegment,
    env: &mut Environment,
) -> ShellResult<ExitCode> {
    let mut streams = Streams::redirected(&segment.redirections)?;
    let status = builtin
        .execute(&segment.argv[1..], &mut streams, env)
        .unwrap_or_else(|e| {
            let _ = writeln!(streams.stderr, "{}: {:#}", builtin.name(), e);
            1
        });
    streams.flush()?;
    Ok(status)
}

fn run_forked(segments: Vec<CommandSegment>, env: &mut Environment) -> ShellResult<ExitCode> {
    let launches: Vec<Launch> = segments
        .into_iter()
        .map(|segment| Launch::prepare(segment, env))
        .collect();
    let last = launches.len().saturating_sub(1);

    let mut children = Vec::with_capacity(launches.len());
    let mut upstream: Option<OwnedFd> = None;
    let mut failure = None;

    for (i, launch) in launches.iter().enumerate() {
        let pipe = if i < last {
            match Pipe::new() {
                Ok(pipe) => Some(pipe),
                Err(e) => {
                    log::warn!("cannot create pipe for segment {}: {}", i, e);
                    failure = Some(e);
                    break;
                }
            }
        } else {
            None
        };

        flush_std_streams();
        // SAFETY: the shell runs on one thread. The child only rewires its
        // descriptors and runs the segment before `_exit`.
        match unsafe { unistd::fork() } {
            Ok(ForkResult::Child) => {
                let downstream = pipe.map(|pipe| pipe.write);
                let status = launch.run_child(upstream.take(), downstream, env);
                flush_std_streams();
                // SAFETY: leaves without running the parent's exit handlers.
                unsafe { libc::_exit(status) }
            }
            Ok(ForkResult::Parent { child }) => {
                log::debug!("forked {} for {:?}", child, launch.name());
                children.push(child);
                // Drops the write end and the previous read end in the parent.
                upstream = pipe.map(|pipe| pipe.read);
            }
            Err(e) => {
                log::warn!("cannot fork for {:?}: {}", launch.name(), e);
                failure = Some(ShellError::Fork(e));
                break;
            }
        }
    }
    drop(upstream);

    let mut status = 0;
    for child in children {
        match wait_child(child) {
            Ok(code) => status = code,
            Err(e) => {
                log::warn!("cannot reap {}: {}", child, e);
                failure.get_or_insert(e);
            }
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(status),
    }
}

fn wait_child(pid: Pid) -> ShellResult<ExitCode> {
    loop {
        let status = retry(|| waitpid(pid, None)).map_err(ShellError::Wait)?;
        log::debug!("reaped {}: {:?}", pid, status);
        match status {
            WaitStatus::Exited(_, code) => return Ok(code),
            WaitStatus::Signaled(_, sig, _) => return Ok(128 + sig as i32),
            _ => continue,
        }
    }
}

/// What a forked child does once its descriptors are in place.
#[derive(Debug)]
enum Action {
    Nothing,
    Builtin(Builtin, Vec<String>),
    Exec {
        name: String,
        path: CString,
        argv: Vec<CString>,
    },
    NotFound(String),
    Unusable { name: String, reason: NulError },
}

/// A segment resolved in the parent, before `fork`.
///
/// Resolution and string conversion allocate, so they are done up front and
/// the child only consumes the result.
#[derive(Debug)]
struct Launch {
    redirections: Redirections,
    action: Action,
}

impl Launch {
    fn prepare(segment: CommandSegment, env: &Environment) -> Self {
        let CommandSegment { argv, redirections } = segment;
        let action = match argv.first() {
            None => Action::Nothing,
            Some(name) => match CommandKind::resolve(name, env) {
                CommandKind::Builtin(builtin) => Action::Builtin(builtin, argv[1..].to_vec()),
                CommandKind::External(path) => match exec_args(&path, &argv) {
                    Ok((path, argv)) => Action::Exec {
                        name: name.clone(),
                        path,
                        argv,
                    },
                    Err(reason) => Action::Unusable {
                        name: name.clone(),
                        reason,
                    },
                },
                CommandKind::NotFound => Action::NotFound(name.clone()),
            },
        };
        Self {
            redirections,
            action,
        }
    }

    fn name(&self) -> &str {
        match &self.action {
            Action::Nothing => "",
            Action::Builtin(builtin, _) => builtin.name(),
            Action::Exec { name, .. }
            | Action::NotFound(name)
            | Action::Unusable { name, .. } => name,
        }
    }

    /// Body of the child process. Returns the status to exit with unless the
    /// process image is replaced.
    fn run_child(
        &self,
        stdin: Option<OwnedFd>,
        stdout: Option<OwnedFd>,
        env: &mut Environment,
    ) -> ExitCode {
        restore_default_signals();
        if let Err(e) = self.wire(stdin, stdout) {
            report(format_args!("pipesh: {}", e));
            return 1;
        }

        match &self.action {
            Action::Nothing => 0,
            Action::Builtin(builtin, args) => {
                let mut streams = Streams::inherited();
                let status = builtin.execute(args, &mut streams, env).unwrap_or_else(|e| {
                    let _ = writeln!(streams.stderr, "{}: {:#}", builtin.name(), e);
                    1
                });
                let _ = streams.flush();
                status
            }
            Action::Exec { name, path, argv } => match unistd::execv(path, argv.as_slice()) {
                Ok(never) => match never {},
                Err(e) => {
                    report(format_args!("{}: {}", name, e.desc()));
                    EXEC_FAILED_STATUS
                }
            },
            Action::NotFound(name) => {
                report(format_args!("{}: command not found", name));
                NOT_FOUND_STATUS
            }
            Action::Unusable { name, reason } => {
                report(format_args!("{}: {}", name, reason));
                EXEC_FAILED_STATUS
            }
        }
    }

    /// Connects the pipe ends, then applies the redirection on top of them.
    fn wire(&self, stdin: Option<OwnedFd>, stdout: Option<OwnedFd>) -> ShellResult<()> {
        if let Some(fd) = stdin {
            dup_onto(fd, libc::STDIN_FILENO)?;
        }
        if let Some(fd) = stdout {
            dup_onto(fd, libc::STDOUT_FILENO)?;
        }
        for redirection in self.redirections.iter() {
            let file = redirection.open()?;
            let target = match redirection.stream {
                Stream::Stdout => libc::STDOUT_FILENO,
                Stream::Stderr => libc::STDERR_FILENO,
            };
            dup_onto(OwnedFd::from(file), target)?;
        }
        Ok(())
    }
}

fn exec_args(path: &Path, argv: &[String]) -> Result<(CString, Vec<CString>), NulError> {
    let path = CString::new(path.as_os_str().as_bytes())?;
    let argv = argv
        .iter()
        .map(|arg| CString::new(arg.as_bytes()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((path, argv))
}

fn report(message: fmt::Arguments) {
    let _ = writeln!(io::stderr(), "{}", message);
}

fn flush_std_streams() {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
}

/// Makes the interactive shell survive Ctrl-C sent to a running pipeline.
///
/// Children put the default disposition back before running their command.
pub fn ignore_interrupts() {
    // SAFETY: SIG_IGN installs no handler code.
    if let Err(e) = unsafe { signal(Signal::SIGINT, SigHandler::SigIgn) } {
        log::warn!("cannot ignore SIGINT: {}", e);
    }
}

fn restore_default_signals() {
    for sig in [Signal::SIGINT, Signal::SIGPIPE] {
        // SAFETY: SIG_DFL installs no handler code.
        let _ = unsafe { signal(sig, SigHandler::SigDfl) };
    }
}
