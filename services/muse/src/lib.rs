//! Poetry Muse Service Library Crate
//!
//! Everything behind the `muse` binary: configuration, the command-line
//! interface, the interactive session, history, archiving, and terminal
//! rendering. The binary in `bin/muse.rs` is a thin wrapper around this library.

pub mod app;
pub mod archive;
pub mod cli;
pub mod config;
pub mod render;
pub mod repl;
pub mod session;
