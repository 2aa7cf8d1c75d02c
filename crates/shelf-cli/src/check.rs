//! # Check Subcommand
//!
//! Parses a script and reports its shape without touching a library. Useful
//! in CI to reject malformed scripts before they are replayed.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::script::Script;

/// Arguments for the `shelf check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the YAML operation script.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,
}

/// Execute the check subcommand.
///
/// Returns exit code 0 when the script parses. Parse failures propagate as
/// errors.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let script = Script::read(&args.script)?;
    println!("{}: {} step(s)", args.script.display(), script.steps.len());
    for (op, count) in script.op_counts() {
        println!("  {op}: {count}");
    }
    Ok(0)
}
