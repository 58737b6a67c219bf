//! `tandem harness`: write a differential harness without running it.

use tandem_diagnostics::DiagnosticSink;
use tandem_source::SourceDb;

use crate::pipeline::{harness_options, load_config, load_module, render_diagnostics, write_output};
use crate::{GlobalArgs, HarnessArgs};

/// Runs `tandem harness`. Returns 1 if the modules cannot be paired.
///
/// The harness instantiates both modules by their declared names, so two
/// modules sharing a name are rejected here; `tandem sim` renames them
/// automatically.
pub fn run(args: &HarnessArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let mut db = SourceDb::new();
    let sink = DiagnosticSink::new();
    let golden = load_module(&args.golden, &mut db, &sink)?;
    let candidate = load_module(&args.candidate, &mut db, &sink)?;
    render_diagnostics(&sink, &db, global);
    let (Some(golden), Some(candidate)) = (golden, candidate) else {
        return Ok(1);
    };

    if let Err(incompatibility) = tandem_verilog::check(&golden.interface, &candidate.interface) {
        eprintln!("error: {incompatibility}");
        return Ok(1);
    }
    if golden.interface.module_name() == candidate.interface.module_name() {
        eprintln!(
            "error: both modules are named `{}`; rename one before building a harness",
            golden.interface.module_name()
        );
        return Ok(1);
    }

    let options = harness_options(&config, &args.stimulus);
    let harness = tandem_harness::synthesize(&golden.interface, &candidate.interface, &options);
    write_output(args.output.as_deref(), &harness)?;
    if !global.quiet {
        eprintln!("   Harness: seed {}, {} trials", options.seed, options.trials);
    }
    Ok(0)
}
