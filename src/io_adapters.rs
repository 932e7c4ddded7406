use crate::error::ShellResult;
use crate::redirect::Redirections;
use std::cell::RefCell;
use std::io::{self, Result as IoResult, Write};
use std::rc::Rc;

/// Output streams handed to a builtin.
///
/// Inline builtins get the shell's own stdout/stderr, or the redirection
/// targets opened for this one command. Inside a forked pipeline segment the
/// descriptors have already been rewired, so the inherited streams are used.
pub struct Streams {
    pub stdout: Box<dyn Write>,
    pub stderr: Box<dyn Write>,
}

impl Streams {
    /// The process' standard output and error as they are wired right now.
    pub fn inherited() -> Self {
        Self {
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
        }
    }

    /// Standard streams with each redirected one replaced by its target file.
    ///
    /// The files are closed when the returned value is dropped.
    pub fn redirected(redirections: &Redirections) -> ShellResult<Self> {
        let mut streams = Self::inherited();
        if let Some(r) = &redirections.stdout {
            streams.stdout = Box::new(r.open()?);
        }
        if let Some(r) = &redirections.stderr {
            streams.stderr = Box::new(r.open()?);
        }
        Ok(streams)
    }

    pub fn new(stdout: Box<dyn Write>, stderr: Box<dyn Write>) -> Self {
        Self { stdout, stderr }
    }

    pub fn flush(&mut self) -> IoResult<()> {
        self.stdout.flush()?;
        self.stderr.flush()
    }
}

/// Memory-backed writer for capturing builtin output.
#[derive(Clone, Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected bytes decoded lossily as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.borrow()).into_owned()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::{RedirectMode, Redirection, Stream};
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn test_mem_writer_clones_share_buffer() {
        let reader = MemWriter::new();
        let mut writer = reader.clone();
        write!(writer, "abc").unwrap();
        assert_eq!(reader.contents(), "abc");
    }

    #[test]
    fn test_redirected_stderr_goes_to_file() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("pipesh_streams_{}_{}", std::process::id(), nanos));
        let redirections = Redirections {
            stdout: None,
            stderr: Some(Redirection {
                stream: Stream::Stderr,
                mode: RedirectMode::Truncate,
                target: path.clone(),
            }),
        };

        let mut streams = Streams::redirected(&redirections).unwrap();
        writeln!(streams.stderr, "oops").unwrap();
        streams.flush().unwrap();
        drop(streams);

        assert_eq!(fs::read_to_string(&path).unwrap(), "oops\n");
        let _ = fs::remove_file(path);
    }
}
