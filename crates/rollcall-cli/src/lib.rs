//! # rollcall-cli
//!
//! The `rollcall` binary: blocks until every host in a job's host file has
//! started, then prints `READY` on stderr and exits 0.
//!
//! Exit status is non-zero on startup errors (unreadable host file, local
//! hostname missing from it, socket bind failure) and when `--max-wait-ms`
//! expires.

pub mod cli;
pub mod logging;

pub use cli::run;
