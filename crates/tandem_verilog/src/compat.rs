//! Structural comparison of two interfaces.
//!
//! Two interfaces are compatible when they declare the same input names, the
//! same output names, and equal widths for every shared name. Module names
//! are not compared. Every difference is collected before reporting.

use crate::interface::{Direction, InterfaceDescriptor, Port};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Which of the two compared interfaces a port belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The first argument to [`check`].
    Left,
    /// The second argument to [`check`].
    Right,
}

impl Side {
    fn flip(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A port declared by only one side.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct MissingPort {
    /// Port name.
    pub name: String,
    /// The side that declares it.
    pub present_on: Side,
}

/// A port declared by both sides with different widths.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct WidthMismatch {
    /// Port name.
    pub name: String,
    /// Direction on both sides.
    pub direction: Direction,
    /// Width on the left side.
    pub left: u32,
    /// Width on the right side.
    pub right: u32,
}

/// Every structural difference between two interfaces.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Incompatibility {
    /// Module name of the left interface.
    pub left_module: String,
    /// Module name of the right interface.
    pub right_module: String,
    /// Inputs declared by one side only, sorted by name.
    pub missing_inputs: Vec<MissingPort>,
    /// Outputs declared by one side only, sorted by name.
    pub missing_outputs: Vec<MissingPort>,
    /// Shared ports with differing widths, sorted by name.
    pub width_mismatches: Vec<WidthMismatch>,
}

impl Incompatibility {
    /// The same report as seen from the other argument order.
    pub fn swapped(&self) -> Incompatibility {
        let flip = |ports: &[MissingPort]| {
            ports
                .iter()
                .map(|p| MissingPort {
                    name: p.name.clone(),
                    present_on: p.present_on.flip(),
                })
                .collect()
        };
        Incompatibility {
            left_module: self.right_module.clone(),
            right_module: self.left_module.clone(),
            missing_inputs: flip(&self.missing_inputs),
            missing_outputs: flip(&self.missing_outputs),
            width_mismatches: self
                .width_mismatches
                .iter()
                .map(|w| WidthMismatch {
                    left: w.right,
                    right: w.left,
                    ..w.clone()
                })
                .collect(),
        }
    }

    /// Total number of individual differences.
    pub fn len(&self) -> usize {
        self.missing_inputs.len() + self.missing_outputs.len() + self.width_mismatches.len()
    }

    /// Always `false` for a report produced by [`check`].
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn module(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.left_module,
            Side::Right => &self.right_module,
        }
    }
}

impl fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "interfaces of `{}` and `{}` differ ({} difference{}):",
            self.left_module,
            self.right_module,
            self.len(),
            if self.len() == 1 { "" } else { "s" }
        )?;
        for (direction, missing) in [
            (Direction::Input, &self.missing_inputs),
            (Direction::Output, &self.missing_outputs),
        ] {
            for port in missing {
                let present = self.module(port.present_on);
                let absent = self.module(port.present_on.flip());
                write!(
                    f,
                    "\n  {direction} `{}` is declared by `{present}` but not by `{absent}`",
                    port.name
                )?;
            }
        }
        for w in &self.width_mismatches {
            write!(
                f,
                "\n  {} `{}` is {} bit{} wide in `{}` but {} bit{} wide in `{}`",
                w.direction,
                w.name,
                w.left,
                if w.left == 1 { "" } else { "s" },
                self.left_module,
                w.right,
                if w.right == 1 { "" } else { "s" },
                self.right_module
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for Incompatibility {}

/// Compares two interfaces, returning every difference when they are not
/// compatible.
pub fn check(a: &InterfaceDescriptor, b: &InterfaceDescriptor) -> Result<(), Incompatibility> {
    let mut width_mismatches = Vec::new();
    let missing_inputs = compare(a.inputs(), b.inputs(), &mut width_mismatches);
    let missing_outputs = compare(a.outputs(), b.outputs(), &mut width_mismatches);
    width_mismatches.sort_by(|x: &WidthMismatch, y| x.name.cmp(&y.name));

    let report = Incompatibility {
        left_module: a.module_name().to_string(),
        right_module: b.module_name().to_string(),
        missing_inputs,
        missing_outputs,
        width_mismatches,
    };
    if report.is_empty() {
        Ok(())
    } else {
        Err(report)
    }
}

fn compare(
    left: &IndexMap<String, Port>,
    right: &IndexMap<String, Port>,
    widths: &mut Vec<WidthMismatch>,
) -> Vec<MissingPort> {
    let mut missing = Vec::new();
    for (name, port) in left {
        match right.get(name) {
            None => missing.push(MissingPort {
                name: name.clone(),
                present_on: Side::Left,
            }),
            Some(other) if other.width != port.width => widths.push(WidthMismatch {
                name: name.clone(),
                direction: port.direction,
                left: port.width,
                right: other.width,
            }),
            Some(_) => {}
        }
    }
    missing.extend(
        right
            .keys()
            .filter(|name| !left.contains_key(*name))
            .map(|name| MissingPort {
                name: name.clone(),
                present_on: Side::Right,
            }),
    );
    missing.sort_by(|x, y| x.name.cmp(&y.name));
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn golden() -> InterfaceDescriptor {
        InterfaceDescriptor::new(
            "counter",
            [
                Port::input("clk", 1),
                Port::input("rst", 1),
                Port::input("en", 1),
                Port::output("count", 8),
            ],
        )
    }

    #[test]
    fn identical_interfaces_are_compatible() {
        let renamed = InterfaceDescriptor::new("counter_buggy", golden().ports().cloned());
        assert!(check(&golden(), &renamed).is_ok());
    }

    #[test]
    fn port_order_does_not_matter() {
        let reordered = InterfaceDescriptor::new(
            "counter",
            [
                Port::output("count", 8),
                Port::input("en", 1),
                Port::input("rst", 1),
                Port::input("clk", 1),
            ],
        );
        assert!(check(&golden(), &reordered).is_ok());
    }

    #[test]
    fn collects_every_difference() {
        let candidate = InterfaceDescriptor::new(
            "counter_v2",
            [
                Port::input("clk", 1),
                Port::input("reset", 1),
                Port::input("en", 2),
                Port::output("count", 16),
                Port::output("overflow", 1),
            ],
        );
        let report = check(&golden(), &candidate).unwrap_err();
        assert_eq!(
            report.missing_inputs,
            vec![
                MissingPort {
                    name: "reset".into(),
                    present_on: Side::Right
                },
                MissingPort {
                    name: "rst".into(),
                    present_on: Side::Left
                },
            ]
        );
        assert_eq!(report.missing_outputs.len(), 1);
        assert_eq!(report.missing_outputs[0].name, "overflow");
        let names: Vec<&str> = report.width_mismatches.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["count", "en"]);
        assert_eq!(report.len(), 5);
    }

    #[test]
    fn check_is_symmetric() {
        let candidate = InterfaceDescriptor::new(
            "other",
            [
                Port::input("clk", 1),
                Port::input("data", 4),
                Port::output("count", 4),
            ],
        );
        let forward = check(&golden(), &candidate).unwrap_err();
        let backward = check(&candidate, &golden()).unwrap_err();
        assert_eq!(forward.swapped(), backward);
        assert_eq!(backward.swapped(), forward);
    }

    #[test]
    fn direction_swap_reports_both_categories() {
        let a = InterfaceDescriptor::new("a", [Port::input("x", 1), Port::output("y", 1)]);
        let b = InterfaceDescriptor::new("b", [Port::output("x", 1), Port::input("y", 1)]);
        let report = check(&a, &b).unwrap_err();
        assert_eq!(report.missing_inputs.len(), 2);
        assert_eq!(report.missing_outputs.len(), 2);
        assert!(report.width_mismatches.is_empty());
    }

    #[test]
    fn display_is_readable() {
        let candidate = InterfaceDescriptor::new(
            "counter_bad",
            [
                Port::input("clk", 1),
                Port::input("rst", 1),
                Port::output("count", 4),
            ],
        );
        let text = check(&golden(), &candidate).unwrap_err().to_string();
        assert_eq!(
            text,
            "interfaces of `counter` and `counter_bad` differ (2 differences):\n  \
             input `en` is declared by `counter` but not by `counter_bad`\n  \
             output `count` is 8 bits wide in `counter` but 4 bits wide in `counter_bad`"
        );
    }
}
