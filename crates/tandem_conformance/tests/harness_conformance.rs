//! Structural properties of synthesized harnesses.

use tandem_conformance::{options, pair_request};
use tandem_harness::{interpret, DIVERGENCE_MARKER, PASS_MESSAGE};

const ALU: &str = r#"
module alu (
    input  wire        clock,
    input  wire        reset,
    input  wire [3:0]  op,
    input  wire [31:0] x,
    input  wire [31:0] y,
    output reg  [31:0] r,
    output wire        zero
);
endmodule
"#;

const ALU_CANDIDATE: &str = r#"
module alu_v2 (zero, r, y, x, op, reset, clock);
    input clock, reset;
    input [3:0] op;
    input [31:0] x, y;
    output [31:0] r;
    output zero;
endmodule
"#;

#[test]
fn harness_is_plain_verilog_2005() {
    let request = pair_request(ALU, ALU_CANDIDATE, &options(12, 64));
    let tb = &request.harness;
    assert!(tb.starts_with("`timescale 1ns/1ps\n"));
    assert!(tb.contains("module testbench;"));
    assert!(!tb.contains("$urandom"));
    assert!(!tb.contains("int "));
    assert!(!tb.contains("++"));
    assert!(tb.trim_end().ends_with("endmodule"));
}

#[test]
fn clock_and_reset_aliases_are_driven() {
    let request = pair_request(ALU, ALU_CANDIDATE, &options(12, 64));
    let tb = &request.harness;
    assert!(tb.contains("forever #5 clock = ~clock;"));
    assert!(tb.contains("reset = 1;"));
    assert!(tb.contains("reset = 0;"));
    // clock and reset are never randomized
    assert!(!tb.contains("clock = {"));
    assert!(!tb.contains("reset = {"));
    assert!(tb.contains("op = "));
}

#[test]
fn instances_bind_every_port() {
    let request = pair_request(ALU, ALU_CANDIDATE, &options(12, 64));
    let tb = &request.harness;
    assert!(tb.contains("alu golden_inst ("));
    assert!(tb.contains("alu_v2 buggy_inst ("));
    for port in ["clock", "reset", "op", "x", "y"] {
        assert_eq!(tb.matches(&format!(".{port}({port})")).count(), 2, "{port}");
    }
    assert!(tb.contains(".r(r_golden)"));
    assert!(tb.contains(".r(r_buggy)"));
    assert!(tb.contains(".zero(zero_buggy)"));
}

#[test]
fn seed_and_budget_are_embedded() {
    let request = pair_request(ALU, ALU_CANDIDATE, &options(4242, 17));
    assert_eq!(request.seed, 4242);
    assert!(request.harness.contains("seed = 4242;"));
    assert!(request.harness.contains("trial < 17;"));
}

#[test]
fn same_name_pair_is_separated() {
    let request = pair_request(ALU, ALU, &options(1, 1));
    assert!(request.candidate.contains("module alu_candidate ("));
    assert!(request.harness.contains("alu golden_inst ("));
    assert!(request.harness.contains("alu_candidate buggy_inst ("));
}

#[test]
fn pass_message_never_reads_as_divergence() {
    let printed = PASS_MESSAGE.replace("%0d", "1000");
    assert!(!interpret(&printed));
    assert!(!printed.to_lowercase().contains(DIVERGENCE_MARKER));
    assert!(interpret(&format!("1 {DIVERGENCE_MARKER}.")));
}
