//! Token kinds produced by the Verilog lexer.
//!
//! Only the keywords that matter for locating a module and its port
//! declarations get their own kind; every other reserved word lexes as an
//! [`VerilogToken::Identifier`] and is ignored by the extractor.

use serde::{Deserialize, Serialize};
use tandem_source::Span;

/// A Verilog token kind.
///
/// Keywords are case-sensitive. Literal values are not stored in the token;
/// they are read back from the source text through the token's span.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum VerilogToken {
    // === Keywords ===
    /// `endfunction`
    Endfunction,
    /// `endmodule`
    Endmodule,
    /// `endtask`
    Endtask,
    /// `function`
    Function,
    /// `inout`
    Inout,
    /// `input`
    Input,
    /// `integer`
    Integer,
    /// `localparam`
    Localparam,
    /// `module`
    Module,
    /// `output`
    Output,
    /// `parameter`
    Parameter,
    /// `reg`
    Reg,
    /// `signed`
    Signed,
    /// `task`
    Task,
    /// `tri`
    Tri,
    /// `unsigned`
    Unsigned,
    /// `wire`
    Wire,

    // === Literals ===
    /// Unsized decimal literal (e.g., `42`)
    IntLiteral,
    /// Sized or based literal (e.g., `4'b1010`, `'hFF`)
    SizedLiteral,
    /// Real literal (e.g., `3.5`, `1.0e-3`)
    RealLiteral,
    /// String literal (e.g., `"hello"`)
    StringLiteral,

    // === Operators and punctuation ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `#`
    Hash,
    /// `@`
    At,
    /// `=`
    Equals,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `<<`
    DoubleLess,
    /// `>>`
    DoubleGreater,
    /// Any other operator (`==`, `&&`, `~^`, ...), not needed for extraction.
    Operator,

    // === Identifiers and special ===
    /// A regular identifier (e.g., `data_in`, `clk`)
    Identifier,
    /// An escaped identifier (e.g., `\bus+index `)
    EscapedIdentifier,
    /// A system identifier (e.g., `$display`, `$random`)
    SystemIdentifier,
    /// End of file
    Eof,
    /// Unrecognized or malformed input
    Error,
}

impl VerilogToken {
    /// Returns `true` if this token is a port direction keyword.
    pub fn is_direction(self) -> bool {
        matches!(
            self,
            VerilogToken::Input | VerilogToken::Output | VerilogToken::Inout
        )
    }

    /// Returns `true` for keywords that may sit between a direction and the
    /// range of a port declaration (`output reg signed [7:0] q`).
    pub fn is_port_qualifier(self) -> bool {
        matches!(
            self,
            VerilogToken::Wire
                | VerilogToken::Reg
                | VerilogToken::Tri
                | VerilogToken::Integer
                | VerilogToken::Signed
                | VerilogToken::Unsigned
        )
    }

    /// Returns `true` if this token names something (plain or escaped).
    pub fn is_identifier(self) -> bool {
        matches!(
            self,
            VerilogToken::Identifier | VerilogToken::EscapedIdentifier
        )
    }
}

/// A lexed token with its kind and source location.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The kind of this token.
    pub kind: VerilogToken,
    /// The source span covering this token's text.
    pub span: Span,
}

/// Looks up a keyword from an identifier string.
pub fn lookup_keyword(s: &str) -> Option<VerilogToken> {
    match s {
        "endfunction" => Some(VerilogToken::Endfunction),
        "endmodule" => Some(VerilogToken::Endmodule),
        "endtask" => Some(VerilogToken::Endtask),
        "function" => Some(VerilogToken::Function),
        "inout" => Some(VerilogToken::Inout),
        "input" => Some(VerilogToken::Input),
        "integer" => Some(VerilogToken::Integer),
        "localparam" => Some(VerilogToken::Localparam),
        "module" => Some(VerilogToken::Module),
        "output" => Some(VerilogToken::Output),
        "parameter" => Some(VerilogToken::Parameter),
        "reg" => Some(VerilogToken::Reg),
        "signed" => Some(VerilogToken::Signed),
        "task" => Some(VerilogToken::Task),
        "tri" => Some(VerilogToken::Tri),
        "unsigned" => Some(VerilogToken::Unsigned),
        "wire" => Some(VerilogToken::Wire),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_case_sensitive() {
        assert_eq!(lookup_keyword("module"), Some(VerilogToken::Module));
        assert_eq!(lookup_keyword("Module"), None);
        assert_eq!(lookup_keyword("INPUT"), None);
    }

    #[test]
    fn keyword_lookup_non_keyword() {
        assert_eq!(lookup_keyword("clk"), None);
        assert_eq!(lookup_keyword("always"), None);
        assert_eq!(lookup_keyword(""), None);
    }

    #[test]
    fn direction_predicate() {
        assert!(VerilogToken::Input.is_direction());
        assert!(VerilogToken::Output.is_direction());
        assert!(VerilogToken::Inout.is_direction());
        assert!(!VerilogToken::Wire.is_direction());
    }

    #[test]
    fn qualifier_predicate() {
        assert!(VerilogToken::Reg.is_port_qualifier());
        assert!(VerilogToken::Signed.is_port_qualifier());
        assert!(!VerilogToken::Input.is_port_qualifier());
        assert!(!VerilogToken::Identifier.is_port_qualifier());
    }
}
