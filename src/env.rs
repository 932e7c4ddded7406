use crate::history::History;
use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Session state of one shell process.
///
/// The environment contains:
/// - `vars`: a snapshot of the process environment taken at startup (PATH, HOME).
/// - `history`: every accepted input line, in order.
/// - `should_exit`: set by the `exit` builtin; the interactive loop checks it.
///
/// The working directory is not stored here: `cd` changes the process's own,
/// which `pwd`, redirections and children all observe.
///
/// A forked pipeline segment gets its own copy; changes made there never
/// reach the parent shell.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: HashMap<String, String>,
    pub history: History,
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let vars = stdenv::vars().collect();
        Self {
            vars,
            history: History::new(),
            should_exit: false,
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override an environment variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Colon-separated executable search path, empty when unset.
    pub fn search_path(&self) -> String {
        self.get_var("PATH").unwrap_or_default()
    }

    pub fn home(&self) -> Option<PathBuf> {
        self.get_var("HOME").filter(|h| !h.is_empty()).map(PathBuf::from)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;
    use crate::history::History;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn empty_env() -> Environment {
        Environment {
            vars: HashMap::new(),
            history: History::new(),
            should_exit: false,
        }
    }

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = empty_env();

        // initially absent
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");

        assert_eq!(env.get_var("KEY"), Some("VALUE".to_string()));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
        assert!(env.history.is_empty());
        assert!(!env.should_exit);
    }

    #[test]
    fn test_home_ignores_empty_value() {
        let mut env = empty_env();
        env.set_var("HOME", "");
        assert_eq!(env.home(), None);
        env.set_var("HOME", "/home/someone");
        assert_eq!(env.home(), Some(PathBuf::from("/home/someone")));
    }
}
