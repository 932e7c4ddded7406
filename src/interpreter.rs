use crate::completion::ShellHelper;
use crate::env::Environment;
use crate::executor;
use crate::parser;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};
use std::io::{self, Write};
use std::path::PathBuf;

/// What the read loop does after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// A line-oriented shell session.
///
/// The interpreter owns the session [`Environment`] and turns each input line
/// into a pipeline run. [`Interpreter::run_line`] handles one line and is what
/// both the interactive loop and `pipesh -c` use.
///
/// Example
/// ```
/// use pipesh::{Environment, Interpreter, Outcome};
/// let mut sh = Interpreter::new(Environment::new());
/// assert_eq!(sh.run_line("   "), Outcome::Continue);
/// assert_eq!(sh.run_line("exit"), Outcome::Exit);
/// ```
pub struct Interpreter {
    env: Environment,
    history_file: Option<PathBuf>,
}

impl Interpreter {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            history_file: None,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Loads earlier history from `path` and remembers it for [`Interpreter::save_history`].
    ///
    /// An unreadable file is reported and the session starts with what it has.
    pub fn load_history(&mut self, path: Option<PathBuf>) {
        if let Some(path) = &path {
            if let Err(e) = self.env.history.load(path) {
                log::warn!("{}", e);
                report(&e);
            }
        }
        self.history_file = path;
    }

    /// Appends the lines accepted in this session to the history file, if any.
    pub fn save_history(&mut self) {
        if let Some(path) = &self.history_file {
            if let Err(e) = self.env.history.save(path) {
                log::warn!("{}", e);
                report(&e);
            }
        }
    }

    /// Handles one input line.
    ///
    /// The empty line is ignored. Every other line, whitespace-only ones
    /// included, is added to the history before it runs, so `history` lists
    /// itself. Failures are reported on stderr and
    /// never end the session; only `exit` does.
    pub fn run_line(&mut self, line: &str) -> Outcome {
        if line.is_empty() {
            return Outcome::Continue;
        }
        log::debug!("line: {:?}", line);
        self.env.history.push(line);
        if line.trim() == "exit" {
            return Outcome::Exit;
        }

        let Some(pipeline) = parser::parse_line(line) else {
            return Outcome::Continue;
        };
        match executor::execute(pipeline, &mut self.env) {
            Ok(status) => log::debug!("status: {}", status),
            Err(e) => {
                log::warn!("{}", e);
                report(&e);
            }
        }

        if self.env.should_exit {
            Outcome::Exit
        } else {
            Outcome::Continue
        }
    }

    /// Reads and runs lines from the terminal until `exit` or end of input.
    pub fn repl(&mut self, prompt: &str) -> anyhow::Result<()> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .build();
        let mut rl: Editor<ShellHelper, DefaultHistory> = Editor::with_config(config)?;
        rl.set_helper(Some(ShellHelper::new(self.env.search_path())));
        for entry in self.env.history.entries() {
            rl.add_history_entry(entry.as_str())?;
        }
        executor::ignore_interrupts();

        loop {
            match rl.readline(prompt) {
                Ok(line) => {
                    if !line.is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    if self.run_line(&line) == Outcome::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}

fn report(error: &dyn std::error::Error) {
    let _ = writeln!(io::stderr(), "pipesh: {}", error);
}
