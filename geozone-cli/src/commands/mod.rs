//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`batch`] - Check many coordinates read from stdin
//! - [`check`] - Check a single coordinate
//! - [`config`] - Configuration management (path, show, init)
//! - [`validate`] - Validate a zone file

pub mod batch;
pub mod check;
pub mod common;
pub mod config;
pub mod validate;
