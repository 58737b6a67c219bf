//! `tandem sim`: simulate a golden module against a candidate.

use tandem_diagnostics::DiagnosticSink;
use tandem_sim::{SimulationRequest, Simulator};
use tandem_source::SourceDb;

use crate::pipeline::{
    harness_options, load_config, load_module, render_diagnostics, runtime, separate_names,
    write_output,
};
use crate::{GlobalArgs, ReportFormat, SimArgs};

/// Exit code when the modules diverge.
const EXIT_DIVERGENCE: i32 = 1;
/// Exit code when no verdict could be produced.
const EXIT_NO_VERDICT: i32 = 2;
/// Exit code after Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

/// Runs `tandem sim`.
///
/// Returns 0 when no divergence was observed, 1 on divergence and 2 when
/// the modules could not be paired or the toolchain failed.
pub fn run(args: &SimArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let mut db = SourceDb::new();
    let sink = DiagnosticSink::new();
    let golden = load_module(&args.golden, &mut db, &sink)?;
    let candidate = load_module(&args.candidate, &mut db, &sink)?;
    render_diagnostics(&sink, &db, global);
    let (Some(golden), Some(candidate)) = (golden, candidate) else {
        return Ok(EXIT_NO_VERDICT);
    };
    if let Err(incompatibility) = tandem_verilog::check(&golden.interface, &candidate.interface) {
        eprintln!("error: {incompatibility}");
        return Ok(EXIT_NO_VERDICT);
    }
    let candidate = separate_names(&golden, candidate)?;

    let options = harness_options(&config, &args.stimulus);
    let harness = tandem_harness::synthesize(&golden.interface, &candidate.interface, &options);
    if let Some(path) = &args.keep_harness {
        write_output(Some(path), &harness)?;
    }
    let request = SimulationRequest {
        golden: golden.source,
        candidate: candidate.source,
        harness,
        seed: options.seed,
    };

    if !global.quiet {
        eprintln!(
            "   Simulating {} against {} (seed {}, {} trials)",
            candidate.interface.module_name(),
            golden.interface.module_name(),
            options.seed,
            options.trials
        );
    }
    let simulator = Simulator::from_config(&config.toolchain);
    let result = runtime()?.block_on(async {
        tokio::select! {
            result = simulator.run(&request) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        }
    });

    let verdict = match result {
        None => {
            eprintln!("interrupted");
            return Ok(EXIT_INTERRUPTED);
        }
        Some(Err(e)) => {
            eprintln!("error: {e}");
            return Ok(EXIT_NO_VERDICT);
        }
        Some(Ok(verdict)) => verdict,
    };

    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                print!("{}", verdict.raw);
                eprintln!(
                    "   Result: {} (seed {}, harness {})",
                    if verdict.has_divergence { "divergence" } else { "no divergence" },
                    verdict.seed,
                    verdict.harness_hash.short()
                );
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&verdict)?),
    }
    Ok(if verdict.has_divergence { EXIT_DIVERGENCE } else { 0 })
}
