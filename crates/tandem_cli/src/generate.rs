//! `tandem generate`: the full multi-candidate pipeline.
//!
//! 1. Load config and read the description and candidates
//! 2. Build the proposer (CLI override, else `[proposer]`)
//! 3. Run the orchestrator, cancelling on Ctrl-C
//! 4. Report every candidate and write the selected harness

use std::sync::Arc;

use serde_json::{json, Value};
use tandem_orchestrate::{
    Candidate, CandidateOutcome, CommandProposer, Deliverable, OrchestrateError, Orchestrator,
    Outcome,
};

use crate::pipeline::{harness_options, load_config, runtime, write_output};
use crate::{GenerateArgs, GlobalArgs, ReportFormat};

/// Runs `tandem generate`.
///
/// Returns 0 with a harness, 1 when no candidate passed, 130 after Ctrl-C.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let spec = std::fs::read_to_string(&args.spec)
        .map_err(|e| format!("cannot read {}: {e}", args.spec.display()))?;
    let candidates = args
        .candidates
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .map(|source| Candidate::new(path.display().to_string(), source))
                .map_err(|e| format!("cannot read {}: {e}", path.display()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let proposer = match &args.proposer {
        Some(program) => CommandProposer::new(
            program.clone(),
            args.proposer_args.clone(),
            config.proposer.timeout(),
        ),
        None => CommandProposer::from_config(&config.proposer).ok_or(
            "no proposer configured; set `[proposer] command` in tandem.toml or pass --proposer",
        )?,
    };

    let mut orchestrator = Orchestrator::from_config(&config, Arc::new(proposer))
        .with_harness_options(harness_options(&config, &args.stimulus));
    if let Some(jobs) = args.jobs {
        orchestrator = orchestrator.with_max_parallel(jobs);
    }
    if let Some(seed) = args.selection_seed {
        orchestrator = orchestrator.with_selection_seed(seed);
    }

    if !global.quiet {
        eprintln!(
            "   Generating golden module for {} candidate(s) (seed {})",
            candidates.len(),
            orchestrator.harness_options().seed
        );
    }
    let result = runtime()?.block_on(async {
        tokio::select! {
            result = orchestrator.run(&spec, &candidates) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        }
    });

    match result {
        None => {
            eprintln!("interrupted");
            Ok(130)
        }
        Some(Ok(deliverable)) => {
            if let Some(path) = &args.golden_out {
                write_output(Some(path), &deliverable.golden)?;
            }
            match args.format {
                ReportFormat::Text => {
                    report_text(&deliverable.outcomes, global);
                    write_output(args.output.as_deref(), &deliverable.harness)?;
                    if !global.quiet {
                        eprintln!("   Selected harness from {}", deliverable.candidate);
                    }
                }
                ReportFormat::Json => {
                    if let Some(path) = &args.output {
                        write_output(Some(path), &deliverable.harness)?;
                    }
                    println!("{}", serde_json::to_string_pretty(&deliverable_json(&deliverable))?);
                }
            }
            Ok(0)
        }
        Some(Err(OrchestrateError::NoPassingHarness { outcomes })) => {
            match args.format {
                ReportFormat::Text => report_text(&outcomes, global),
                ReportFormat::Json => {
                    let report = json!({
                        "selected": Value::Null,
                        "outcomes": outcomes_json(&outcomes),
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }
            eprintln!("error: no candidate produced a passing harness");
            Ok(1)
        }
        Some(Err(e)) => Err(e.into()),
    }
}

fn report_text(outcomes: &[CandidateOutcome], global: &GlobalArgs) {
    if global.quiet {
        return;
    }
    for outcome in outcomes {
        eprintln!("   {outcome}");
    }
}

fn deliverable_json(deliverable: &Deliverable) -> Value {
    json!({
        "selected": deliverable.candidate,
        "seed": deliverable.verdict.seed,
        "harness_hash": deliverable.verdict.harness_hash.to_string(),
        "harness": deliverable.harness,
        "golden": deliverable.golden,
        "outcomes": outcomes_json(&deliverable.outcomes),
    })
}

fn outcomes_json(outcomes: &[CandidateOutcome]) -> Value {
    outcomes
        .iter()
        .map(|o| match &o.outcome {
            Outcome::Simulated { verdict, .. } => json!({
                "name": o.name,
                "status": if verdict.has_divergence { "divergence" } else { "pass" },
                "seed": verdict.seed,
                "harness_hash": verdict.harness_hash.to_string(),
            }),
            Outcome::Failed(failure) => json!({
                "name": o.name,
                "status": "error",
                "error": failure.to_string(),
            }),
        })
        .collect()
}
