//! `tandem ports`: print a module's port interface.

use tandem_diagnostics::DiagnosticSink;
use tandem_source::SourceDb;
use tandem_verilog::InterfaceDescriptor;

use crate::pipeline::{load_module, render_diagnostics};
use crate::{GlobalArgs, PortsArgs, ReportFormat};

/// Runs `tandem ports`. Returns 1 if the module could not be parsed.
pub fn run(args: &PortsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut db = SourceDb::new();
    let sink = DiagnosticSink::new();
    let module = load_module(&args.file, &mut db, &sink)?;
    render_diagnostics(&sink, &db, global);
    let Some(module) = module else {
        return Ok(1);
    };

    match args.format {
        ReportFormat::Text => print!("{}", describe(&module.interface)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&module.interface)?),
    }
    Ok(0)
}

/// One line per port under the module's header.
fn describe(iface: &InterfaceDescriptor) -> String {
    let mut out = format!("{}\n", iface.port_header());
    for port in iface.ports() {
        let range = port.range();
        out.push_str(&format!(
            "  {:<6} {:<10} {} ({} bit{})\n",
            port.direction.keyword(),
            range,
            port.name,
            port.width,
            if port.width == 1 { "" } else { "s" }
        ));
    }
    out
}
