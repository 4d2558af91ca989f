//! Plucker CLI library.
//!
//! This crate provides the command implementations behind the `plucker`
//! binary: chord file loading, synthesis commands and report output.

pub mod commands;
pub mod input;
pub mod logging;
