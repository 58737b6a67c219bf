//! The structural plan of a harness, derived from a compatible pair.

use crate::options::HarnessOptions;
use serde::Serialize;
use std::collections::HashSet;
use tandem_verilog::{InterfaceDescriptor, Port};

/// Input names recognised as a clock. The first matching input wins.
pub const CLOCK_NAMES: [&str; 2] = ["clk", "clock"];
/// Input names recognised as an active-high reset. The first matching
/// input wins.
pub const RESET_NAMES: [&str; 2] = ["rst", "reset"];

/// One output compared between the two instances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Output port name.
    pub port: String,
    /// Port width.
    pub width: u32,
    /// Wire bound to the golden instance's output.
    pub golden_wire: String,
    /// Wire bound to the candidate instance's output.
    pub candidate_wire: String,
}

/// Everything the synthesizer needs, decided up front.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HarnessSpec {
    /// Module name instantiated as the golden reference.
    pub golden_module: String,
    /// Module name instantiated as the candidate.
    pub candidate_module: String,
    /// One register per input, in golden declaration order.
    pub registers: Vec<Port>,
    /// Two wires per output, in golden declaration order.
    pub comparisons: Vec<Comparison>,
    /// Input driven by the free-running clock generator.
    pub clock: Option<String>,
    /// Input driven by the reset pulse.
    pub reset: Option<String>,
    /// The harness's PRNG state variable.
    pub seed_var: String,
    /// The harness's trial loop counter.
    pub trial_var: String,
    /// Names, budget, seed and timing.
    pub options: HarnessOptions,
}

impl HarnessSpec {
    /// Derives the plan for a pair that has already passed
    /// [`tandem_verilog::check`]. Port order follows `golden`.
    ///
    /// Every identifier the harness declares itself is picked so that it
    /// never shadows a port, another harness wire or an instance name.
    pub fn derive(
        golden: &InterfaceDescriptor,
        candidate: &InterfaceDescriptor,
        options: &HarnessOptions,
    ) -> Self {
        let find = |names: &[&str]| {
            golden
                .inputs()
                .keys()
                .find(|k| names.contains(&k.as_str()))
                .cloned()
        };
        let mut taken: HashSet<String> = golden
            .inputs()
            .keys()
            .chain(golden.outputs().keys())
            .chain(candidate.inputs().keys())
            .chain(candidate.outputs().keys())
            .cloned()
            .collect();
        taken.extend([
            golden.module_name().to_string(),
            candidate.module_name().to_string(),
            options.golden_instance.clone(),
            options.candidate_instance.clone(),
        ]);

        let comparisons = golden
            .outputs()
            .values()
            .map(|p| Comparison {
                port: p.name.clone(),
                width: p.width,
                golden_wire: reserve(&mut taken, &format!("{}_golden", p.name)),
                candidate_wire: reserve(&mut taken, &format!("{}_buggy", p.name)),
            })
            .collect();
        let seed_var = reserve(&mut taken, "seed");
        let trial_var = reserve(&mut taken, "trial");

        HarnessSpec {
            golden_module: golden.module_name().to_string(),
            candidate_module: candidate.module_name().to_string(),
            registers: golden.inputs().values().cloned().collect(),
            comparisons,
            clock: find(&CLOCK_NAMES[..]),
            reset: find(&RESET_NAMES[..]),
            seed_var,
            trial_var,
            options: options.clone(),
        }
    }

    /// Registers that receive random stimulus: every input except the
    /// clock and reset.
    pub fn stimulus(&self) -> impl Iterator<Item = &Port> {
        self.registers.iter().filter(move |p| {
            Some(&p.name) != self.clock.as_ref() && Some(&p.name) != self.reset.as_ref()
        })
    }
}

/// Claims `base`, or the first free `tb_<base>`, `tb_<base>_1`, ... variant.
fn reserve(taken: &mut HashSet<String>, base: &str) -> String {
    // Escaped names stay escaped: `\a+b_golden` becomes `\tb_a+b_golden`.
    let (escape, plain) = match base.strip_prefix('\\') {
        Some(rest) => ("\\", rest),
        None => ("", base),
    };
    let name = std::iter::once(base.to_string())
        .chain(std::iter::once(format!("{escape}tb_{plain}")))
        .chain((1u32..).map(|n| format!("{escape}tb_{plain}_{n}")))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string());
    taken.insert(name.clone());
    name
}
