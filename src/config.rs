//! Command line of the `pipesh` binary.

use argh::FromArgs;
use log::LevelFilter;
use std::env as stdenv;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// An interactive shell with pipelines and output redirection.
pub struct Options {
    #[argh(option, short = 'c')]
    /// run this one line and exit instead of reading from the terminal.
    pub command: Option<String>,

    #[argh(option)]
    /// file to load history from at start and append new entries to at exit. Defaults to $HISTFILE.
    pub history_file: Option<PathBuf>,

    #[argh(option)]
    /// append diagnostic logs to this file. Logging is off without it.
    pub log_file: Option<PathBuf>,

    #[argh(option, default = "LevelFilter::Info")]
    /// log verbosity: off, error, warn, info, debug or trace.
    pub log_level: LevelFilter,

    #[argh(option, default = "String::from(\"$ \")")]
    /// text printed before every input line.
    pub prompt: String,
}

impl Options {
    /// History file from the command line, else from `HISTFILE`.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_path_or(stdenv::var_os("HISTFILE"))
    }

    fn history_path_or(&self, histfile: Option<OsString>) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| histfile.filter(|h| !h.is_empty()).map(PathBuf::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Options {
        Options::from_args(&["pipesh"], args).expect("valid arguments")
    }

    #[test]
    fn test_defaults() {
        let options = parse(&[]);
        assert_eq!(options.command, None);
        assert_eq!(options.prompt, "$ ");
        assert_eq!(options.log_level, LevelFilter::Info);
        assert_eq!(options.log_file, None);
    }

    #[test]
    fn test_all_options() {
        let options = parse(&[
            "-c",
            "echo hi | wc -c",
            "--history-file",
            "/tmp/hist",
            "--log-file",
            "/tmp/log",
            "--log-level",
            "debug",
            "--prompt",
            "> ",
        ]);
        assert_eq!(options.command.as_deref(), Some("echo hi | wc -c"));
        assert_eq!(options.history_file, Some(PathBuf::from("/tmp/hist")));
        assert_eq!(options.log_file, Some(PathBuf::from("/tmp/log")));
        assert_eq!(options.log_level, LevelFilter::Debug);
        assert_eq!(options.prompt, "> ");
    }

    #[test]
    fn test_bad_log_level_is_rejected() {
        assert!(Options::from_args(&["pipesh"], &["--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_history_path_falls_back_to_histfile() {
        let options = parse(&[]);
        assert_eq!(options.history_path_or(None), None);
        assert_eq!(options.history_path_or(Some(OsString::new())), None);
        assert_eq!(
            options.history_path_or(Some(OsString::from("/tmp/h"))),
            Some(PathBuf::from("/tmp/h"))
        );

        let options = parse(&["--history-file", "/tmp/explicit"]);
        assert_eq!(
            options.history_path_or(Some(OsString::from("/tmp/h"))),
            Some(PathBuf::from("/tmp/explicit"))
        );
    }
}
