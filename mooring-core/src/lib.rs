//! mooring-core: database connection lifecycle for the mooring backend
//! template.
//!
//! Covers everything between "process start" and "live pool handed to the
//! HTTP layer": environment-driven configuration, cross-field validation,
//! pooled connection with optional TLS, and the destructive reset used for
//! test isolation. Nothing in here terminates the process; every step
//! returns a typed [`SetupError`] and the binary decides what is fatal.

pub mod config;
pub mod db;
pub mod error;

pub use config::{ConnectionConfig, RunMode};
pub use db::reset::{reset_database, DEFAULT_SCHEMA_PATH};
pub use db::{Db, User};
pub use error::SetupError;
