//! Grouping of tokens into a pipeline of command segments.

use crate::lexer::{self, Token};
use crate::redirect::{self, Redirections};

/// One command of a pipeline: its argument vector and its redirections.
///
/// `argv[0]` is the command name. Redirection words are removed from `argv`
/// by [`CommandSegment::resolve_redirections`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSegment {
    pub argv: Vec<String>,
    pub redirections: Redirections,
}

impl CommandSegment {
    pub fn new(argv: Vec<String>) -> Self {
        Self {
            argv,
            redirections: Redirections::default(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// Moves the first redirection operator and its target out of `argv`.
    pub fn resolve_redirections(&mut self) {
        let (argv, redirections) = redirect::extract_redirection(std::mem::take(&mut self.argv));
        self.argv = argv;
        self.redirections = redirections;
    }
}

/// A non-empty sequence of command segments joined by `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    segments: Vec<CommandSegment>,
}

impl Pipeline {
    /// Returns `None` for an empty segment list.
    pub fn new(segments: Vec<CommandSegment>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    pub fn segments(&self) -> &[CommandSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// A pipeline of one segment: builtins run in the shell process.
    pub fn is_simple(&self) -> bool {
        self.segments.len() == 1
    }

    pub fn into_segments(self) -> Vec<CommandSegment> {
        self.segments
    }
}

/// Splits tokens on the literal word `|`.
///
/// Empty segments, from a leading, trailing or doubled pipe, are dropped.
pub fn split_pipeline(tokens: Vec<Token>) -> Vec<CommandSegment> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for token in tokens {
        if token == "|" {
            if !current.is_empty() {
                segments.push(CommandSegment::new(std::mem::take(&mut current)));
            }
        } else {
            current.push(token);
        }
    }
    if !current.is_empty() {
        segments.push(CommandSegment::new(current));
    }

    segments
}

/// Tokenizes `line`, splits it into segments and resolves each segment's
/// redirection. Returns `None` when the line holds no command.
pub fn parse_line(line: &str) -> Option<Pipeline> {
    let mut segments = split_pipeline(lexer::tokenize(line));
    for segment in &mut segments {
        segment.resolve_redirections();
    }
    Pipeline::new(segments)
}
