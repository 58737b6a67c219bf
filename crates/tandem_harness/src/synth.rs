//! Emitting the harness as Verilog-2005 text.

use crate::interpret::{DIVERGENCE_MARKER, PASS_MESSAGE};
use crate::options::HarnessOptions;
use crate::spec::HarnessSpec;
use std::fmt::{self, Write};
use tandem_verilog::{InterfaceDescriptor, Port};

/// Synthesizes a differential harness for two compatible interfaces.
///
/// The caller is responsible for having run [`tandem_verilog::check`] and for
/// giving the two modules distinct names.
pub fn synthesize(
    golden: &InterfaceDescriptor,
    candidate: &InterfaceDescriptor,
    options: &HarnessOptions,
) -> String {
    let spec = HarnessSpec::derive(golden, candidate, options);
    tracing::debug!(
        golden = %spec.golden_module,
        candidate = %spec.candidate_module,
        registers = spec.registers.len(),
        comparisons = spec.comparisons.len(),
        clock = ?spec.clock,
        reset = ?spec.reset,
        seed = spec.options.seed,
        "synthesizing harness"
    );
    spec.to_string()
}

impl fmt::Display for HarnessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opts = &self.options;
        let seed = Ident(&self.seed_var);
        let trial = Ident(&self.trial_var);
        writeln!(f, "`timescale 1ns/1ps")?;
        writeln!(f)?;
        writeln!(f, "module testbench;")?;
        writeln!(f)?;

        writeln!(f, "  // Shared stimulus")?;
        for port in &self.registers {
            writeln!(f, "  reg {};", declarator(port.width, &port.name))?;
        }
        writeln!(f)?;
        writeln!(f, "  // Observed outputs")?;
        for cmp in &self.comparisons {
            writeln!(f, "  wire {};", declarator(cmp.width, &cmp.golden_wire))?;
            writeln!(f, "  wire {};", declarator(cmp.width, &cmp.candidate_wire))?;
        }
        writeln!(f)?;
        writeln!(f, "  integer {seed};")?;
        writeln!(f, "  integer {trial};")?;
        writeln!(f)?;

        self.instance(f, &self.golden_module, &opts.golden_instance, |c| &c.golden_wire)?;
        self.instance(f, &self.candidate_module, &opts.candidate_instance, |c| {
            &c.candidate_wire
        })?;

        if let Some(clock) = &self.clock {
            let clock = Ident(clock);
            writeln!(f, "  initial begin")?;
            writeln!(f, "    {clock} = 0;")?;
            writeln!(f, "    forever #{} {clock} = ~{clock};", opts.clock_half_period)?;
            writeln!(f, "  end")?;
            writeln!(f)?;
        }

        writeln!(f, "  initial begin")?;
        writeln!(f, "    {seed} = {};", opts.seed)?;
        writeln!(
            f,
            "    $display(\"Starting equivalence check: %0d trials, seed %0d\", {}, {});",
            opts.trials, opts.seed
        )?;
        for port in self.stimulus() {
            writeln!(f, "    {} = 0;", Ident(&port.name))?;
        }
        if let Some(reset) = &self.reset {
            let reset = Ident(reset);
            writeln!(f, "    {reset} = 1;")?;
            writeln!(f, "    #{};", opts.reset_assert)?;
            writeln!(f, "    {reset} = 0;")?;
            writeln!(f, "    #{};", opts.reset_release)?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "    for ({trial} = 0; {trial} < {}; {trial} = {trial} + 1) begin",
            opts.trials
        )?;
        for port in self.stimulus() {
            writeln!(
                f,
                "      {} = {};",
                Ident(&port.name),
                random_value(port.width, &self.seed_var)
            )?;
        }
        writeln!(f, "      #{};", opts.settle_delay)?;
        for cmp in &self.comparisons {
            self.mismatch_check(f, cmp)?;
        }
        writeln!(f, "    end")?;
        writeln!(f)?;
        writeln!(f, "    $display(\"{PASS_MESSAGE}\", {});", opts.trials)?;
        writeln!(
            f,
            "    $display(\"Modules may be equivalent or need more thorough testing.\");"
        )?;
        writeln!(f, "    $finish;")?;
        writeln!(f, "  end")?;
        writeln!(f)?;
        writeln!(f, "endmodule")
    }
}

impl HarnessSpec {
    fn instance(
        &self,
        f: &mut fmt::Formatter<'_>,
        module: &str,
        instance: &str,
        wire: impl Fn(&crate::spec::Comparison) -> &String,
    ) -> fmt::Result {
        let mut bindings: Vec<String> = self
            .registers
            .iter()
            .map(|p| format!("    .{0}({0})", Ident(&p.name)))
            .collect();
        bindings.extend(
            self.comparisons
                .iter()
                .map(|c| format!("    .{}({})", Ident(&c.port), Ident(wire(c)))),
        );
        let module = Ident(module);
        if bindings.is_empty() {
            writeln!(f, "  {module} {instance} ();")?;
        } else {
            writeln!(f, "  {module} {instance} (")?;
            writeln!(f, "{}", bindings.join(",\n"))?;
            writeln!(f, "  );")?;
        }
        writeln!(f)
    }

    fn mismatch_check(
        &self,
        f: &mut fmt::Formatter<'_>,
        cmp: &crate::spec::Comparison,
    ) -> fmt::Result {
        let (g, c) = (Ident(&cmp.golden_wire), Ident(&cmp.candidate_wire));
        let port = quoted(&cmp.port);
        writeln!(f, "      if ({g} !== {c}) begin")?;
        writeln!(
            f,
            "        $display(\"Mismatch on output {port} at time %0t (trial %0d)\", $time, {});",
            Ident(&self.trial_var)
        )?;
        writeln!(f, "        $display(\"  Inputs:\");")?;
        for input in &self.registers {
            writeln!(
                f,
                "        $display(\"    {} = %h\", {});",
                quoted(&input.name),
                Ident(&input.name)
            )?;
        }
        writeln!(f, "        $display(\"  Golden output: {port} = %h\", {g});")?;
        writeln!(f, "        $display(\"  Buggy output:  {port} = %h\", {c});")?;
        writeln!(f, "        $display(\"%0d {DIVERGENCE_MARKER}.\", 1);")?;
        writeln!(f, "        $finish;")?;
        writeln!(f, "      end")
    }
}

/// An identifier as it must appear in source. Escaped identifiers run to the
/// next whitespace, so they always get a trailing space.
struct Ident<'a>(&'a str);

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)?;
        if self.0.starts_with('\\') {
            f.write_char(' ')?;
        }
        Ok(())
    }
}

/// A name as literal `$display` format text.
fn quoted(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '%' => out.push_str("%%"),
            c => out.push(c),
        }
    }
    out
}

/// `[msb:0] name` for buses, `name` for scalars.
fn declarator(width: u32, name: &str) -> String {
    if width > 1 {
        format!("[{}:0] {}", width - 1, Ident(name))
    } else {
        Ident(name).to_string()
    }
}

/// A random value for a `width`-bit register: one 32-bit `$random` draw per
/// started word, concatenated, then masked to the declared width.
fn random_value(width: u32, seed: &str) -> String {
    let words = width.div_ceil(32);
    let call = format!("$random({})", Ident(seed));
    let draw = vec![call; words as usize].join(", ");
    format!("{{{draw}}} & {}", all_ones(width))
}

/// A sized hexadecimal literal with the low `width` bits set, e.g. `5'h1f`.
fn all_ones(width: u32) -> String {
    let mut hex = String::with_capacity(width as usize / 4 + 1);
    let partial = width % 4;
    if partial > 0 {
        let _ = write!(hex, "{:x}", (1u8 << partial) - 1);
    }
    hex.extend(std::iter::repeat('f').take((width / 4) as usize));
    format!("{width}'h{hex}")
}
