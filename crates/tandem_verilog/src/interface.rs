//! Structural interface of a module: its name and its directed, sized ports.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a port the harness can drive or observe.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Driven by the harness.
    Input,
    /// Compared by the harness.
    Output,
}

impl Direction {
    /// The Verilog keyword for this direction.
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
        }
    }

    /// The other direction.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Input => Direction::Output,
            Direction::Output => Direction::Input,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A named signal with a direction and a bit width (always at least 1).
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Port {
    /// Port name as written in the source.
    pub name: String,
    /// Whether the harness drives or compares it.
    pub direction: Direction,
    /// Number of bits.
    pub width: u32,
}

impl Port {
    /// Creates an input port.
    pub fn input(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Input,
            width,
        }
    }

    /// Creates an output port.
    pub fn output(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Output,
            width,
        }
    }

    /// The `[msb:0]` range for this width, or an empty string for a scalar.
    pub fn range(&self) -> String {
        if self.width > 1 {
            format!("[{}:0]", self.width - 1)
        } else {
            String::new()
        }
    }
}

/// The ports of one module, split by direction, in declaration order.
///
/// A name never appears in both maps, and every port sits in the map matching
/// its direction. Inserting a name that already exists replaces it.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    module_name: String,
    inputs: IndexMap<String, Port>,
    outputs: IndexMap<String, Port>,
}

/// What happened to an earlier declaration when a port was inserted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Replaced {
    Nothing,
    SameDirection,
    OtherDirection,
}

impl InterfaceDescriptor {
    /// Builds a descriptor from ports; later ports with a repeated name win.
    pub fn new(module_name: impl Into<String>, ports: impl IntoIterator<Item = Port>) -> Self {
        let mut desc = Self::empty(module_name);
        for port in ports {
            desc.insert(port);
        }
        desc
    }

    pub(crate) fn empty(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            inputs: IndexMap::new(),
            outputs: IndexMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, port: Port) -> Replaced {
        let (own, other) = match port.direction {
            Direction::Input => (&mut self.inputs, &mut self.outputs),
            Direction::Output => (&mut self.outputs, &mut self.inputs),
        };
        let moved = other.shift_remove(&port.name).is_some();
        let existed = own.insert(port.name.clone(), port).is_some();
        if moved {
            Replaced::OtherDirection
        } else if existed {
            Replaced::SameDirection
        } else {
            Replaced::Nothing
        }
    }

    /// The declared module name.
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Input ports keyed by name.
    pub fn inputs(&self) -> &IndexMap<String, Port> {
        &self.inputs
    }

    /// Output ports keyed by name.
    pub fn outputs(&self) -> &IndexMap<String, Port> {
        &self.outputs
    }

    /// Looks up a port of either direction.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.inputs.get(name).or_else(|| self.outputs.get(name))
    }

    /// All ports, inputs first.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.values().chain(self.outputs.values())
    }

    /// Returns `true` if the module has no ports the harness can use.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }

    /// Renders an ANSI-style module header, e.g.
    /// `module adder (input [7:0] a, input [7:0] b, output [8:0] sum);`.
    pub fn port_header(&self) -> String {
        let ports: Vec<String> = self
            .ports()
            .map(|p| {
                let range = p.range();
                if range.is_empty() {
                    format!("{} {}", p.direction, p.name)
                } else {
                    format!("{} {} {}", p.direction, range, p.name)
                }
            })
            .collect();
        format!("module {} ({});", self.module_name, ports.join(", "))
    }
}
