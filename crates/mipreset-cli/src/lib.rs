//! mipreset CLI library.
//!
//! Command implementations for the `mipreset` binary. Every command works
//! against a JSON material library file and a project directory.

pub mod commands;
pub mod session;
