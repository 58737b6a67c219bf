//! Renaming the declared module.

use crate::extract::ExtractError;
use crate::lexer::lex;
use crate::token::VerilogToken;
use tandem_diagnostics::DiagnosticSink;
use tandem_source::{FileId, Span};

/// Rewrites the name of the first module declared in `source`.
///
/// Two modules with the same name cannot be compiled together, so a golden
/// module and a candidate that share a name are renamed apart before
/// simulation. Only the declaration is rewritten; a recursive self-instance
/// keeps the old name.
pub fn rename_module(source: &str, new_name: &str) -> Result<String, ExtractError> {
    let tokens = lex(source, FileId::DUMMY, &DiagnosticSink::new());
    let name = tokens
        .windows(2)
        .find(|w| w[0].kind == VerilogToken::Module && w[1].kind.is_identifier())
        .map(|w| w[1])
        .ok_or_else(|| ExtractError::MalformedModule {
            reason: "no module declaration found".to_string(),
            span: Span::new(FileId::DUMMY, 0, 0),
        })?;

    let range = name.span.range();
    let mut renamed = String::with_capacity(source.len() + new_name.len());
    renamed.push_str(&source[..range.start]);
    renamed.push_str(new_name);
    renamed.push_str(&source[range.end..]);
    Ok(renamed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;

    #[test]
    fn renames_declaration_only() {
        let src = "// module fake;\nmodule adder(input a, output y);\n  assign y = a; // adder\nendmodule\n";
        let out = rename_module(src, "adder_golden").unwrap();
        assert_eq!(
            out,
            "// module fake;\nmodule adder_golden(input a, output y);\n  assign y = a; // adder\nendmodule\n"
        );
        assert_eq!(extract(&out).unwrap().module_name(), "adder_golden");
    }

    #[test]
    fn renames_escaped_name() {
        let out = rename_module("module \\weird+name (input a);\nendmodule", "plain").unwrap();
        assert!(out.starts_with("module plain (input a);"));
    }

    #[test]
    fn fails_without_module() {
        assert!(rename_module("wire a;", "x").is_err());
    }
}
