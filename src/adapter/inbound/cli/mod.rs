//! CLI module graph.

pub mod check;
pub mod command;
pub mod inspect;
pub mod list;
pub mod output;
pub mod run;
