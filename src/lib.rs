//! `osh`: a small interactive shell with a bounded, replayable command history.

pub mod builtins;
pub mod config;
pub mod error;
pub mod history;
pub mod launcher;
pub mod parser;
pub mod repl;
pub mod resolver;
pub mod util;

pub use config::ShellConfig;
pub use error::ShellError;
pub use repl::{start_repl, Shell};
