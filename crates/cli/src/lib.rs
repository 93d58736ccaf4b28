//! Stepview CLI
//!
//! Command implementations behind the `stepview` binary.

pub mod commands;
pub mod output;
