//! # Script and Config Files
//!
//! Drives the CLI entry points against real files on disk.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use shelf_cli::check::{run_check, CheckArgs};
use shelf_cli::config::{ConfigFile, ShelfConfig};
use shelf_cli::replay::{run_replay, run_script, ReplayArgs};
use shelf_cli::script::Script;
use shelf_core::{ErrorKind, Principal};

const CONFIG: &str = "admin: librarian\nseed:\n  - name: Dune\n    author: Herbert\n    copies: 6\n";

const DUNE_SCRIPT: &str = r#"
steps:
  - op: borrow
    caller: reader-0
    name: Dune
    author: Herbert
  - op: borrow
    caller: reader-1
    name: Dune
    author: Herbert
  - op: borrow
    caller: reader-2
    name: Dune
    author: Herbert
  - op: borrow
    caller: reader-3
    name: Dune
    author: Herbert
  - op: borrow
    caller: reader-4
    name: Dune
    author: Herbert
  - op: borrow
    caller: reader-5
    name: Dune
    author: Herbert
  - op: borrow
    caller: reader-6
    name: Dune
    author: Herbert
  - op: return_item
    caller: reader-0
    name: Dune
    author: Herbert
  - op: history
    name: Dune
"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn config_from(path: &Path) -> ShelfConfig {
    ShelfConfig::resolve(Some(ConfigFile::read(path).unwrap()), None).unwrap()
}

#[test]
fn test_replay_dune_script_from_files() {
    let config_file = write_temp(CONFIG);
    let script_file = write_temp(DUNE_SCRIPT);

    let config = config_from(config_file.path());
    assert_eq!(config.admin, Principal::new("librarian"));

    let script = Script::read(script_file.path()).unwrap();
    let report = run_script(&config, &script, false).unwrap();

    assert_eq!(report.rejected, 1);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["steps"][6]["kind"], ErrorKind::ItemUnavailable.as_str());
    assert_eq!(json["steps"][8]["output"].as_array().unwrap().len(), 6);

    let dune = &report.snapshot.items[0];
    assert_eq!(dune.active_loans(), 5);
    let history = &report.snapshot.history["Dune"];
    assert_eq!(history.len(), 6);
    assert!(history[0].ended_at.is_some());
    assert!(history[1..].iter().all(|r| r.ended_at.is_none()));
}

#[test]
fn test_run_replay_exit_codes() {
    let config = config_from(write_temp(CONFIG).path());
    let script_file = write_temp(DUNE_SCRIPT);

    let lenient = ReplayArgs {
        script: script_file.path().to_path_buf(),
        fail_fast: false,
        strict: false,
        compact: true,
    };
    assert_eq!(run_replay(&lenient, &config).unwrap(), 0);

    let strict = ReplayArgs {
        strict: true,
        ..lenient
    };
    assert_eq!(run_replay(&strict, &config).unwrap(), 1);
}

#[test]
fn test_run_replay_missing_script_is_error() {
    let config = config_from(write_temp(CONFIG).path());
    let args = ReplayArgs {
        script: "/nonexistent/shelf/script.yaml".into(),
        fail_fast: false,
        strict: false,
        compact: true,
    };
    assert!(run_replay(&args, &config).is_err());
}

#[test]
fn test_check_parses_without_running() {
    let script_file = write_temp(DUNE_SCRIPT);
    let args = CheckArgs {
        script: script_file.path().to_path_buf(),
    };
    assert_eq!(run_check(&args).unwrap(), 0);
}

#[test]
fn test_check_rejects_malformed_script() {
    let script_file = write_temp("steps:\n  - op: steal\n    caller: mallory\n");
    let args = CheckArgs {
        script: script_file.path().to_path_buf(),
    };
    assert!(run_check(&args).is_err());
}

#[test]
fn test_malformed_config_is_error() {
    let config_file = write_temp("admin: [not, a, principal]\n");
    assert!(ConfigFile::read(config_file.path()).is_err());
}
