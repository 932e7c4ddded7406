//! Tab completion of command names for the interactive prompt.

use crate::builtin::Builtin;
use crate::external::is_executable;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::env as stdenv;
use std::ffi::OsStr;
use std::fs;

/// Command names starting with `prefix`: builtins and executables found in
/// the directories of `search_path`, sorted and without duplicates.
pub fn complete_command(prefix: &str, search_path: &str) -> Vec<String> {
    let mut names: Vec<String> = Builtin::ALL
        .iter()
        .map(|builtin| builtin.name())
        .filter(|name| name.starts_with(prefix))
        .map(String::from)
        .collect();

    for dir in stdenv::split_paths(OsStr::new(search_path)) {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with(prefix) && is_executable(&entry.path()) {
                names.push(name);
            }
        }
    }

    names.sort();
    names.dedup();
    names
}

/// rustyline helper that completes the first word of the line.
#[derive(Debug, Clone, Default)]
pub struct ShellHelper {
    search_path: String,
}

impl ShellHelper {
    pub fn new(search_path: impl Into<String>) -> Self {
        Self {
            search_path: search_path.into(),
        }
    }

    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let input = &line[..pos];
        let start = input.len() - input.trim_start_matches(' ').len();
        let word = &input[start..];
        if word.contains(' ') {
            return (pos, Vec::new());
        }

        let mut pairs: Vec<Pair> = complete_command(word, &self.search_path)
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        if let [single] = pairs.as_mut_slice() {
            single.replacement.push(' ');
        }
        (start, pairs)
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}
