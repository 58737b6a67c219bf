//! `tandem check`: compare two module interfaces.

use tandem_diagnostics::DiagnosticSink;
use tandem_source::SourceDb;

use crate::pipeline::{load_module, render_diagnostics};
use crate::{CheckArgs, GlobalArgs};

/// Runs `tandem check`. Returns 1 if either module is unusable or the
/// interfaces differ.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut db = SourceDb::new();
    let sink = DiagnosticSink::new();
    let left = load_module(&args.left, &mut db, &sink)?;
    let right = load_module(&args.right, &mut db, &sink)?;
    render_diagnostics(&sink, &db, global);
    let (Some(left), Some(right)) = (left, right) else {
        return Ok(1);
    };

    match tandem_verilog::check(&left.interface, &right.interface) {
        Ok(()) => {
            if !global.quiet {
                eprintln!(
                    "   Compatible: {} and {} ({} ports)",
                    left.interface.module_name(),
                    right.interface.module_name(),
                    left.interface.ports().count()
                );
            }
            Ok(0)
        }
        Err(incompatibility) => {
            eprintln!("error: {incompatibility}");
            Ok(1)
        }
    }
}
