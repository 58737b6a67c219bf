//! Verilog module-interface extraction and comparison.
//!
//! [`extract`] reduces module text to an [`InterfaceDescriptor`] (name plus
//! directed, sized ports) with a small lexer-backed scanner, and [`check`]
//! reports every structural difference between two descriptors.
//!
//! ```
//! let golden = tandem_verilog::extract("module m(input [7:0] a, output b); endmodule").unwrap();
//! let candidate = tandem_verilog::extract("module n(input [7:0] a, output b); endmodule").unwrap();
//! assert!(tandem_verilog::check(&golden, &candidate).is_ok());
//! ```

#![warn(missing_docs)]

pub mod compat;
pub mod extract;
pub mod interface;
pub mod lexer;
pub mod rename;
pub mod token;

pub use compat::{check, Incompatibility, MissingPort, Side, WidthMismatch};
pub use extract::{extract, extract_interface, extract_source, ExtractError, MAX_PORT_WIDTH};
pub use interface::{Direction, InterfaceDescriptor, Port};
pub use rename::rename_module;
