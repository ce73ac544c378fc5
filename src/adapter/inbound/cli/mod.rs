//! CLI module graph.

pub mod command;
pub mod dispatch;
pub mod grid;
pub mod highlighter;
pub mod login;
pub mod output;
pub mod parser;
pub mod paths;
pub mod run;
pub mod shell;
