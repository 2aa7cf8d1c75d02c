//! # Replay Subcommand
//!
//! Builds an in-memory library from the resolved configuration, runs every
//! script step against it in order, and prints a JSON report: one outcome per
//! step, every event published, and a final snapshot of the ledger.
//!
//! Rejected steps are part of normal output. They only affect the exit code
//! when `--strict` is given.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use shelf_core::{ErrorKind, ItemId, LedgerError, Principal};
use shelf_state::{
    FanoutSink, Item, LedgerEvent, Library, LibrarySnapshot, LoanRecord, RecordingSink,
    TracingSink,
};

use crate::config::ShelfConfig;
use crate::script::{Script, Step};

/// Arguments for the `shelf replay` subcommand.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Path to the YAML operation script.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Stop at the first rejected step.
    #[arg(long)]
    pub fail_fast: bool,

    /// Exit with status 1 if any step was rejected.
    #[arg(long)]
    pub strict: bool,

    /// Print the report on one line instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,
}

/// Value produced by a successful step.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StepOutput {
    Item(ItemId),
    Admin(Principal),
    Loan(LoanRecord),
    Items(Vec<Item>),
    History(Vec<LoanRecord>),
}

/// Result of one step.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Ok { output: StepOutput },
    Rejected { kind: ErrorKind, message: String },
}

impl Outcome {
    /// Whether the ledger rejected the step.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// A step's position, operation name, and outcome.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub op: &'static str,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Everything `shelf replay` prints.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepOutcome>,
    pub rejected: usize,
    pub events: Vec<LedgerEvent>,
    pub snapshot: LibrarySnapshot,
}

/// Build a library administered by the configured admin, with seed items admitted.
pub fn build_library(config: &ShelfConfig, recorder: Arc<RecordingSink>) -> Result<Library> {
    let sink = FanoutSink::new()
        .with(Arc::new(TracingSink))
        .with(recorder);
    let library = Library::new(config.admin.clone()).with_sink(Arc::new(sink));

    for seed in &config.seed {
        library
            .add_item(&config.admin, &seed.name, seed.copies, &seed.author)
            .with_context(|| format!("failed to seed {:?} by {:?}", seed.name, seed.author))?;
    }
    tracing::info!(admin = %config.admin, seeded = config.seed.len(), "library ready");
    Ok(library)
}

/// Run one step against the library.
pub fn execute(library: &Library, step: &Step) -> Result<StepOutput, LedgerError> {
    match step {
        Step::AddItem {
            caller,
            name,
            author,
            copies,
        } => library
            .add_item(caller, name, *copies, author)
            .map(StepOutput::Item),
        Step::TransferAdmin { caller, to } => {
            library.transfer_admin(caller, to.clone())?;
            Ok(StepOutput::Admin(library.admin()))
        }
        Step::Borrow {
            caller,
            name,
            author,
        } => library
            .borrow(caller, &ItemId::derive(name.as_str(), author.as_str()))
            .map(StepOutput::Loan),
        Step::ReturnItem {
            caller,
            name,
            author,
        } => library
            .return_item(caller, &ItemId::derive(name.as_str(), author.as_str()))
            .map(StepOutput::Loan),
        Step::ListAvailable => Ok(StepOutput::Items(library.list_available())),
        Step::History { name } => Ok(StepOutput::History(library.history_for(name))),
    }
}

/// Run the script's steps in order, collecting one outcome per executed step.
pub fn replay(library: &Library, script: &Script, fail_fast: bool) -> Vec<StepOutcome> {
    let mut outcomes = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.iter().enumerate() {
        let outcome = match execute(library, step) {
            Ok(output) => Outcome::Ok { output },
            Err(e) => Outcome::Rejected {
                kind: e.kind(),
                message: e.to_string(),
            },
        };
        let stop = fail_fast && outcome.is_rejected();
        outcomes.push(StepOutcome {
            index,
            op: step.op(),
            outcome,
        });
        if stop {
            tracing::warn!(index, op = step.op(), "stopping at first rejected step");
            break;
        }
    }
    outcomes
}

/// Build the full report for a script.
pub fn run_script(config: &ShelfConfig, script: &Script, fail_fast: bool) -> Result<ReplayReport> {
    let recorder = Arc::new(RecordingSink::new());
    let library = build_library(config, recorder.clone())?;
    let steps = replay(&library, script, fail_fast);
    let rejected = steps.iter().filter(|s| s.outcome.is_rejected()).count();
    Ok(ReplayReport {
        steps,
        rejected,
        events: recorder.drain(),
        snapshot: library.snapshot(),
    })
}

/// Execute the replay subcommand.
///
/// Returns exit code: 0 on success, 1 if `--strict` and any step was rejected.
pub fn run_replay(args: &ReplayArgs, config: &ShelfConfig) -> Result<u8> {
    let script = Script::read(&args.script)?;
    tracing::info!(
        script = %args.script.display(),
        steps = script.steps.len(),
        "replaying script"
    );

    let report = run_script(config, &script, args.fail_fast)?;
    let rendered = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{rendered}");

    if args.strict && report.rejected > 0 {
        tracing::warn!(rejected = report.rejected, "script had rejected steps");
        return Ok(1);
    }
    Ok(0)
}
