use crate::command::ExitCode;
use crate::env::Environment;
use crate::external::find_in_path;
use crate::io_adapters::Streams;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::env as stdenv;
use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// A builtin runs either inline, in the shell's own process for a pipeline of
/// one command, or inside a forked child as one segment of a longer pipeline.
/// Both paths call [`Builtin::execute`]; the only difference is whether the
/// changes it makes to the [`Environment`] and the working directory outlive
/// the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Echo,
    Pwd,
    Cd,
    Type,
    Exit,
    History,
}

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Echo,
        Builtin::Type,
        Builtin::Exit,
        Builtin::Pwd,
        Builtin::Cd,
        Builtin::History,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Canonical name of the command, e.g. "echo" or "cd".
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Echo => "echo",
            Builtin::Pwd => "pwd",
            Builtin::Cd => "cd",
            Builtin::Type => "type",
            Builtin::Exit => "exit",
            Builtin::History => "history",
        }
    }

    /// Runs the builtin with `args` (the words after the command name).
    ///
    /// Return value follows shell conventions: 0 for success, non-zero for
    /// error. Errors are reserved for failing writes to the output streams;
    /// usage problems are reported on the streams and turned into a status.
    pub fn execute(
        self,
        args: &[String],
        streams: &mut Streams,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        match self {
            Builtin::Echo => echo(args, streams),
            Builtin::Pwd => pwd(streams),
            Builtin::Cd => cd(args, streams, env),
            Builtin::Type => type_of(args, streams, env),
            Builtin::Exit => {
                env.should_exit = true;
                Ok(0)
            }
            Builtin::History => history(args, streams, env),
        }
    }
}

fn echo(args: &[String], streams: &mut Streams) -> Result<ExitCode> {
    writeln!(streams.stdout, "{}", args.join(" "))?;
    Ok(0)
}

fn pwd(streams: &mut Streams) -> Result<ExitCode> {
    let dir = stdenv::current_dir()?;
    writeln!(streams.stdout, "{}", dir.display())?;
    Ok(0)
}

fn cd(args: &[String], streams: &mut Streams, env: &Environment) -> Result<ExitCode> {
    let arg = args.first().map(String::as_str);
    let target = match arg {
        None | Some("~") => env.home(),
        Some(p) => match p.strip_prefix("~/") {
            Some(rest) => env.home().map(|home| home.join(rest)),
            None => Some(PathBuf::from(p)),
        },
    };
    let Some(target) = target else {
        writeln!(streams.stderr, "cd: HOME not set")?;
        return Ok(1);
    };

    if stdenv::set_current_dir(&target).is_err() {
        let shown = match arg {
            Some(a) if a != "~" => a.to_string(),
            _ => target.display().to_string(),
        };
        writeln!(streams.stdout, "cd: {}: No such file or directory", shown)?;
        return Ok(1);
    }
    Ok(0)
}

fn type_of(args: &[String], streams: &mut Streams, env: &Environment) -> Result<ExitCode> {
    let search_path = env.search_path();
    let mut status = 0;
    for name in args {
        if Builtin::from_name(name).is_some() {
            writeln!(streams.stdout, "{} is a shell builtin", name)?;
        } else if let Some(path) = find_in_path(OsStr::new(&search_path), OsStr::new(name)) {
            writeln!(streams.stdout, "{} is {}", name, path.display())?;
        } else {
            writeln!(streams.stdout, "{}: not found", name)?;
            status = 1;
        }
    }
    Ok(status)
}

#[derive(FromArgs)]
/// Display the numbered list of accepted input lines.
struct HistoryArgs {
    #[argh(positional)]
    /// show only the last `count` entries.
    count: Option<usize>,
}

fn history(args: &[String], streams: &mut Streams, env: &Environment) -> Result<ExitCode> {
    let argv: Vec<&str> = args.iter().map(String::as_str).collect();
    let parsed = match HistoryArgs::from_args(&["history"], &argv) {
        Ok(parsed) => parsed,
        Err(EarlyExit {
            output,
            status: Ok(()),
        }) => {
            write!(streams.stdout, "{}", output)?;
            return Ok(0);
        }
        Err(EarlyExit { status: Err(()), .. }) => {
            match args {
                [arg] => writeln!(streams.stderr, "history: {}: numeric argument required", arg)?,
                _ => writeln!(streams.stderr, "history: too many arguments")?,
            }
            return Ok(2);
        }
    };
    env.history.write_listing(parsed.count, &mut *streams.stdout)?;
    Ok(0)
}
