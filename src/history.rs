//! In-memory command history with optional file persistence.

use crate::error::{ShellError, ShellResult};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Ordered list of accepted input lines, numbered from 1.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
    /// Number of leading entries already present in the history file.
    persisted: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The last `count` entries (all of them when `count` is `None` or larger
    /// than the history) paired with their original 1-based numbers.
    pub fn tail(&self, count: Option<usize>) -> impl Iterator<Item = (usize, &str)> {
        let start = count.map_or(0, |n| self.entries.len().saturating_sub(n));
        self.entries
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, line)| (i + 1, line.as_str()))
    }

    /// Writes the `history` listing: four spaces, number, two spaces, line.
    pub fn write_listing(&self, count: Option<usize>, out: &mut dyn Write) -> io::Result<()> {
        for (number, line) in self.tail(count) {
            writeln!(out, "    {}  {}", number, line)?;
        }
        Ok(())
    }

    /// Appends the non-blank lines of `path` to the history.
    ///
    /// A missing file is not an error: it is created on the first save.
    pub fn load(&mut self, path: &Path) -> ShellResult<()> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(ShellError::History {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        self.entries
            .extend(content.lines().filter(|l| !l.trim().is_empty()).map(String::from));
        self.persisted = self.entries.len();
        Ok(())
    }

    /// Appends the entries added since the last load or save to `path`.
    pub fn save(&mut self, path: &Path) -> ShellResult<()> {
        let wrap = |source| ShellError::History {
            path: path.to_owned(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(wrap)?;
        for line in &self.entries[self.persisted..] {
            writeln!(file, "{}", line).map_err(wrap)?;
        }
        self.persisted = self.entries.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env as stdenv;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn five() -> History {
        let mut history = History::new();
        for line in ["echo 1", "echo 2", "pwd", "cd /tmp", "history 2"] {
            history.push(line);
        }
        history
    }

    fn listing(history: &History, count: Option<usize>) -> String {
        let mut out = Vec::new();
        history.write_listing(count, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_full_listing_is_numbered_from_one() {
        let history = five();
        assert_eq!(
            listing(&history, None),
            "    1  echo 1\n    2  echo 2\n    3  pwd\n    4  cd /tmp\n    5  history 2\n"
        );
    }

    #[test]
    fn test_last_n_keeps_original_numbers() {
        let history = five();
        assert_eq!(listing(&history, Some(2)), "    4  cd /tmp\n    5  history 2\n");
    }

    #[test]
    fn test_last_n_larger_than_history() {
        let history = five();
        assert_eq!(listing(&history, Some(50)), listing(&history, None));
        assert_eq!(listing(&history, Some(0)), "");
    }

    #[test]
    fn test_save_appends_only_new_entries_and_load_restores_them() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = stdenv::temp_dir().join(format!("pipesh_history_{}_{}", std::process::id(), nanos));

        let mut history = History::new();
        history.load(&path).unwrap();
        assert!(history.is_empty());

        history.push("echo a");
        history.save(&path).unwrap();
        history.push("echo b");
        history.save(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "echo a\necho b\n");

        let mut restored = History::new();
        restored.load(&path).unwrap();
        assert_eq!(restored.entries(), &["echo a".to_string(), "echo b".to_string()]);

        let _ = fs::remove_file(path);
    }
}
