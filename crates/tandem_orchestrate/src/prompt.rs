//! Prompt construction and response parsing for golden-module generation.

use crate::error::OrchestrateError;
use tandem_diagnostics::DiagnosticSink;
use tandem_source::FileId;
use tandem_verilog::lexer::lex;
use tandem_verilog::token::VerilogToken;

/// Builds the prompt asking for a golden implementation of `spec` with the
/// exact interface given by `header`.
pub fn build_prompt(spec: &str, header: &str) -> String {
    format!(
        "You are an expert Verilog designer. Write a complete, synthesizable \
         Verilog-2005 module that implements the specification below.\n\
         \n\
         The module must use exactly this interface (same port names, \
         directions and widths):\n\
         \n\
         {header}\n\
         \n\
         Reply with the module definition, from `module` through `endmodule`.\n\
         \n\
         Specification:\n\
         {spec}\n",
        spec = spec.trim_end(),
    )
}

/// Finds the module definition in a free-form response.
///
/// Every `module <name>` outside comments and strings starts a candidate
/// span ending at the next `endmodule`. The first span whose interface can
/// be extracted wins; failing that, the first span is returned as is.
pub fn extract_module_text(response: &str) -> Result<String, OrchestrateError> {
    let tokens = lex(response, FileId::DUMMY, &DiagnosticSink::new());
    let mut first = None;
    for (i, pair) in tokens.windows(2).enumerate() {
        if pair[0].kind != VerilogToken::Module || !pair[1].kind.is_identifier() {
            continue;
        }
        let Some(end) = tokens[i..]
            .iter()
            .find(|t| t.kind == VerilogToken::Endmodule)
        else {
            break;
        };
        let text = &response[pair[0].span.start as usize..end.span.end as usize];
        if tandem_verilog::extract(text).is_ok() {
            return Ok(text.to_string());
        }
        first.get_or_insert(text);
    }
    first
        .map(str::to_string)
        .ok_or(OrchestrateError::NoModuleInResponse)
}
