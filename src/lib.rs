//! A small interactive shell with pipelines and output redirection.
//!
//! An input line goes through four stages:
//! - [`lexer`] splits it into words, removing quotes and escapes,
//! - [`parser`] groups the words into a [`Pipeline`] of command segments and
//!   resolves each segment's redirection with [`redirect`],
//! - [`executor`] runs the pipeline: a lone builtin inside the shell, anything
//!   else as one forked process per segment connected by pipes,
//! - [`builtin`] implements `echo`, `pwd`, `cd`, `type`, `exit` and `history`
//!   for both of those contexts.
//!
//! [`Interpreter`] ties the stages to a session [`Environment`] and to the
//! line editor.

pub mod builtin;
pub mod command;
pub mod completion;
pub mod config;
pub mod env;
pub mod error;
pub mod executor;
pub mod external;
pub mod fd;
pub mod history;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod logging;
pub mod parser;
pub mod redirect;

#[cfg(test)]
mod test_support;

pub use env::Environment;
pub use interpreter::{Interpreter, Outcome};
pub use parser::Pipeline;
