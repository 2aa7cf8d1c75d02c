//! # shelf-cli — CLI Tool for the Shelf Ledger
//!
//! Provides the `shelf` command-line interface over an in-memory library.
//!
//! ## Subcommands
//!
//! - `shelf replay` — Run an operation script and print a JSON report.
//! - `shelf check` — Parse a script and summarize it without running it.
//!
//! ```bash
//! shelf --config shelf.yaml replay ops.yaml --strict
//! SHELF_ADMIN=librarian shelf replay ops.yaml --fail-fast
//! shelf check ops.yaml
//! ```

pub mod check;
pub mod config;
pub mod replay;
pub mod script;
