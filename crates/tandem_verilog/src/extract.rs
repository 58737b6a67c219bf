//! Token-scoped interface extraction.
//!
//! Only the first module in the text is examined: its ANSI port list and the
//! body statements up to `endmodule` that begin with a direction keyword.
//! Declarations inside `function`/`task` bodies, comments, strings and
//! directives never contribute ports.

use crate::interface::{Direction, InterfaceDescriptor, Port, Replaced};
use crate::lexer::lex;
use crate::token::{Token, VerilogToken};
use std::collections::{HashMap, HashSet};
use tandem_diagnostics::code::{Category, DiagnosticCode};
use tandem_diagnostics::{Diagnostic, DiagnosticSink, Label};
use tandem_source::{FileId, SourceDb, Span};

/// A module that cannot be reduced to an interface.
pub const MALFORMED_MODULE: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);
/// A port declared twice with the same direction.
pub const DUPLICATE_PORT: DiagnosticCode = DiagnosticCode::new(Category::Warning, 101);
/// An `inout` port, which the harness cannot drive or compare.
pub const INOUT_SKIPPED: DiagnosticCode = DiagnosticCode::new(Category::Warning, 102);
/// A port-list name that never receives a direction.
pub const UNDIRECTED_PORT: DiagnosticCode = DiagnosticCode::new(Category::Warning, 103);
/// A port redeclared with the opposite direction.
pub const DIRECTION_CONFLICT: DiagnosticCode = DiagnosticCode::new(Category::Warning, 104);

/// Errors that stop extraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// No module declaration, an unterminated port list, or a range bound
    /// that is not a constant expression.
    #[error("malformed module: {reason}")]
    MalformedModule {
        /// What was wrong.
        reason: String,
        /// Where it was found.
        span: Span,
    },
}

impl ExtractError {
    fn malformed(reason: impl Into<String>, span: Span) -> Self {
        ExtractError::MalformedModule {
            reason: reason.into(),
            span,
        }
    }

    /// Converts the error into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ExtractError::MalformedModule { reason, span } => {
                Diagnostic::error(MALFORMED_MODULE, format!("malformed module: {reason}"), *span)
            }
        }
    }
}

/// Extracts the interface of the first module in a loaded source file.
pub fn extract_interface(
    file: FileId,
    db: &SourceDb,
    sink: &DiagnosticSink,
) -> Result<InterfaceDescriptor, ExtractError> {
    extract_source(&db.get_file(file).content, file, sink)
}

/// Extracts the interface of the first module in `source`, reporting
/// warnings with spans in `file`.
pub fn extract_source(
    source: &str,
    file: FileId,
    sink: &DiagnosticSink,
) -> Result<InterfaceDescriptor, ExtractError> {
    let tokens = lex(source, file, sink);
    let start = tokens
        .windows(2)
        .position(|w| w[0].kind == VerilogToken::Module && w[1].kind.is_identifier())
        .ok_or_else(|| {
            ExtractError::malformed("no module declaration found", Span::new(file, 0, 0))
        })?;

    let mut scanner = Scanner {
        source,
        tokens: &tokens,
        pos: start + 2,
        sink,
        params: HashMap::new(),
        desc: InterfaceDescriptor::empty(identifier_text(source, tokens[start + 1])),
        first_seen: HashMap::new(),
        inouts: HashSet::new(),
        undirected: Vec::new(),
    };
    scanner.header()?;
    scanner.body()?;
    scanner.report_undirected();

    let desc = scanner.desc;
    tracing::debug!(
        module = desc.module_name(),
        inputs = desc.inputs().len(),
        outputs = desc.outputs().len(),
        "extracted interface"
    );
    Ok(desc)
}

/// Extracts an interface from text, discarding warnings.
pub fn extract(source: &str) -> Result<InterfaceDescriptor, ExtractError> {
    extract_source(source, FileId::DUMMY, &DiagnosticSink::new())
}

/// Widest port accepted, matching Icarus Verilog's vector limit.
pub const MAX_PORT_WIDTH: u32 = 1 << 24;

/// Returns the name an identifier token denotes. `\abc ` and `abc` are the
/// same identifier, so escapes around plain names are dropped.
pub(crate) fn identifier_text(source: &str, tok: Token) -> String {
    let text = &source[tok.span.range()];
    match text.strip_prefix('\\') {
        Some(rest)
            if !rest.is_empty()
                && rest.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
                && !rest.as_bytes()[0].is_ascii_digit()
                && !rest.starts_with('$') =>
        {
            rest.to_string()
        }
        _ => text.to_string(),
    }
}

/// Direction and width shared by the names of one declaration.
#[derive(Clone, Copy)]
struct Head {
    /// `None` for `inout`.
    direction: Option<Direction>,
    width: u32,
}

struct Scanner<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
    sink: &'a DiagnosticSink,
    params: HashMap<String, i64>,
    desc: InterfaceDescriptor,
    first_seen: HashMap<String, Span>,
    inouts: HashSet<String>,
    undirected: Vec<(String, Span)>,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn text(&self, tok: Token) -> &'a str {
        &self.source[tok.span.range()]
    }

    /// Index of the token closing the group opened at `open`, stopping at
    /// `endmodule`.
    fn matching(&self, open: usize, close: VerilogToken) -> Option<usize> {
        let opener = self.tokens[open].kind;
        let mut depth = 0usize;
        for (i, tok) in self.tokens.iter().enumerate().skip(open) {
            match tok.kind {
                k if k == opener => depth += 1,
                k if k == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                VerilogToken::Endmodule | VerilogToken::Eof => return None,
                _ => {}
            }
        }
        None
    }

    /// Index of the next `;` at or after `from`, or of the `endmodule`/EOF
    /// that cuts the statement short.
    fn statement_end(&self, from: usize) -> usize {
        self.tokens[from..]
            .iter()
            .position(|t| {
                matches!(
                    t.kind,
                    VerilogToken::Semicolon | VerilogToken::Endmodule | VerilogToken::Eof
                )
            })
            .map_or(self.tokens.len() - 1, |i| from + i)
    }

    fn after_statement(&self, end: usize) -> usize {
        if self.tokens[end].kind == VerilogToken::Semicolon {
            end + 1
        } else {
            end
        }
    }

    fn header(&mut self) -> Result<(), ExtractError> {
        if self.peek().kind == VerilogToken::Hash {
            let hash = self.peek();
            self.pos += 1;
            if self.peek().kind != VerilogToken::LeftParen {
                return Err(ExtractError::malformed(
                    "expected `(` after `#` in module header",
                    hash.span,
                ));
            }
            let close = self
                .matching(self.pos, VerilogToken::RightParen)
                .ok_or_else(|| {
                    ExtractError::malformed("unterminated parameter list", self.peek().span)
                })?;
            self.record_parameters(self.pos + 1, close);
            self.pos = close + 1;
        }

        let tok = self.peek();
        match tok.kind {
            VerilogToken::Semicolon => {
                self.pos += 1;
                Ok(())
            }
            VerilogToken::LeftParen => {
                let close = self.matching(self.pos, VerilogToken::RightParen);
                let terminated = close.filter(|&c| {
                    self.tokens.get(c + 1).map(|t| t.kind) == Some(VerilogToken::Semicolon)
                });
                let Some(close) = terminated else {
                    return Err(ExtractError::malformed(
                        "port list is not terminated by `);`",
                        tok.span,
                    ));
                };
                self.port_list(self.pos + 1, close)?;
                self.pos = close + 2;
                Ok(())
            }
            _ => Err(ExtractError::malformed(
                "expected a port list or `;` after the module name",
                tok.span,
            )),
        }
    }

    fn port_list(&mut self, lo: usize, hi: usize) -> Result<(), ExtractError> {
        let mut ansi: Option<Head> = None;
        for (a, b) in split_top_level(self.tokens, lo, hi) {
            if a == b {
                continue;
            }
            let first = self.tokens[a];
            if first.kind.is_direction() {
                let mut i = a;
                let head = self.head(&mut i, b)?;
                ansi = Some(head);
                self.declare_names(head, i, b);
            } else if let Some(prev) = ansi {
                // Continuation of the previous ANSI declaration, possibly
                // with its own type or range.
                let mut i = a;
                let head = self.qualified_width(&mut i, b, prev.direction)?;
                let head = if i == a { prev } else { head };
                ansi = Some(head);
                self.declare_names(head, i, b);
            } else if first.kind.is_identifier() {
                self.undirected
                    .push((identifier_text(self.source, first), first.span));
            }
        }
        Ok(())
    }

    fn body(&mut self) -> Result<(), ExtractError> {
        loop {
            let tok = self.peek();
            match tok.kind {
                VerilogToken::Endmodule | VerilogToken::Eof => return Ok(()),
                VerilogToken::Function => self.skip_until(VerilogToken::Endfunction),
                VerilogToken::Task => self.skip_until(VerilogToken::Endtask),
                VerilogToken::Parameter | VerilogToken::Localparam => {
                    let end = self.statement_end(self.pos);
                    self.record_parameters(self.pos + 1, end);
                    self.pos = self.after_statement(end);
                }
                k if k.is_direction() => {
                    let end = self.statement_end(self.pos);
                    let mut i = self.pos;
                    let head = self.head(&mut i, end)?;
                    for (a, b) in split_top_level(self.tokens, i, end) {
                        self.declare_names(head, a, b);
                    }
                    self.pos = self.after_statement(end);
                }
                _ => self.pos += 1,
            }
        }
    }

    fn skip_until(&mut self, end: VerilogToken) {
        while !matches!(
            self.peek().kind,
            VerilogToken::Endmodule | VerilogToken::Eof
        ) {
            let kind = self.peek().kind;
            self.pos += 1;
            if kind == end {
                return;
            }
        }
    }

    /// Parses `direction qualifier* range?` starting at a direction keyword.
    fn head(&self, i: &mut usize, end: usize) -> Result<Head, ExtractError> {
        let direction = match self.tokens[*i].kind {
            VerilogToken::Input => Some(Direction::Input),
            VerilogToken::Output => Some(Direction::Output),
            _ => None,
        };
        *i += 1;
        self.qualified_width(i, end, direction)
    }

    fn qualified_width(
        &self,
        i: &mut usize,
        end: usize,
        direction: Option<Direction>,
    ) -> Result<Head, ExtractError> {
        let mut width = 1;
        while *i < end {
            let tok = self.tokens[*i];
            if tok.kind == VerilogToken::Integer {
                width = 32;
            } else if !(tok.kind.is_port_qualifier() || self.text(tok) == "logic") {
                break;
            }
            *i += 1;
        }
        if *i < end && self.tokens[*i].kind == VerilogToken::LeftBracket {
            let open = *i;
            let close = self
                .matching(open, VerilogToken::RightBracket)
                .filter(|&c| c < end)
                .ok_or_else(|| {
                    ExtractError::malformed("unterminated port range", self.tokens[open].span)
                })?;
            width = self.range_width(open, close)?;
            *i = close + 1;
        }
        Ok(Head { direction, width })
    }

    fn range_width(&self, open: usize, close: usize) -> Result<u32, ExtractError> {
        let span = self.tokens[open].span.merge(self.tokens[close].span);
        let inner = &self.tokens[open + 1..close];
        let colon = top_level_position(inner, VerilogToken::Colon)
            .ok_or_else(|| ExtractError::malformed("port range has no `:`", span))?;
        let bound = |toks: &[Token]| {
            Evaluator::new(self.source, toks, &self.params)
                .evaluate()
                .ok_or_else(|| {
                    let text = &self.source[span.range()];
                    ExtractError::malformed(
                        format!("cannot evaluate port range `{text}` to a constant"),
                        span,
                    )
                })
        };
        let msb = bound(&inner[..colon])?;
        let lsb = bound(&inner[colon + 1..])?;
        msb.checked_sub(lsb)
            .and_then(i64::checked_abs)
            .and_then(|d| u32::try_from(d).ok())
            .and_then(|d| d.checked_add(1))
            .filter(|w| *w <= MAX_PORT_WIDTH)
            .ok_or_else(|| {
                ExtractError::malformed(
                    format!("port range is wider than {MAX_PORT_WIDTH} bits"),
                    span,
                )
            })
    }

    /// Records every `NAME = expr` at the top level of `[lo, hi)`.
    fn record_parameters(&mut self, lo: usize, hi: usize) {
        for (a, b) in split_top_level(self.tokens, lo, hi) {
            let Some(eq) = self.tokens[a..b]
                .iter()
                .position(|t| t.kind == VerilogToken::Equals)
            else {
                continue;
            };
            let eq = a + eq;
            if eq == a || !self.tokens[eq - 1].kind.is_identifier() {
                continue;
            }
            let name = identifier_text(self.source, self.tokens[eq - 1]);
            if let Some(value) =
                Evaluator::new(self.source, &self.tokens[eq + 1..b], &self.params).evaluate()
            {
                self.params.insert(name, value);
            }
        }
    }

    /// Declares the identifier leading `[a, b)`; anything after it (an
    /// initializer, for instance) is ignored.
    fn declare_names(&mut self, head: Head, a: usize, b: usize) {
        if a >= b || !self.tokens[a].kind.is_identifier() {
            return;
        }
        let tok = self.tokens[a];
        let name = identifier_text(self.source, tok);

        let Some(direction) = head.direction else {
            self.sink.emit(
                Diagnostic::warning(
                    INOUT_SKIPPED,
                    format!("inout port `{name}` is skipped"),
                    tok.span,
                )
                .with_note("the harness only drives inputs and compares outputs"),
            );
            self.inouts.insert(name);
            return;
        };

        let port = Port {
            name: name.clone(),
            direction,
            width: head.width,
        };
        match self.desc.insert(port) {
            Replaced::Nothing => {
                self.first_seen.insert(name, tok.span);
            }
            Replaced::SameDirection => {
                let mut diag = Diagnostic::warning(
                    DUPLICATE_PORT,
                    format!("port `{name}` is declared more than once"),
                    tok.span,
                )
                .with_label(Label::primary(tok.span, "this declaration is used"))
                .with_note("the last declaration is used");
                if let Some(&first) = self.first_seen.get(&name) {
                    diag = diag.with_label(Label::secondary(first, "first declared"));
                }
                self.sink.emit(diag);
            }
            Replaced::OtherDirection => {
                let mut diag = Diagnostic::warning(
                    DIRECTION_CONFLICT,
                    format!("port `{name}` is redeclared as {direction}"),
                    tok.span,
                )
                .with_label(Label::primary(tok.span, format!("redeclared as {direction}")))
                .with_note(format!("`{name}` is treated as an {direction}"));
                if let Some(&first) = self.first_seen.get(&name) {
                    diag = diag.with_label(Label::secondary(
                        first,
                        format!("declared as {}", direction.opposite()),
                    ));
                }
                self.sink.emit(diag);
            }
        }
    }

    fn report_undirected(&self) {
        for (name, span) in &self.undirected {
            if self.desc.port(name).is_none() && !self.inouts.contains(name) {
                self.sink.emit(Diagnostic::warning(
                    UNDIRECTED_PORT,
                    format!("port `{name}` has no input or output declaration"),
                    *span,
                ));
            }
        }
    }
}

/// Splits `[lo, hi)` at commas outside any brackets.
fn split_top_level(tokens: &[Token], lo: usize, hi: usize) -> Vec<(usize, usize)> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = lo;
    for (i, tok) in tokens.iter().enumerate().take(hi).skip(lo) {
        match tok.kind {
            VerilogToken::LeftParen | VerilogToken::LeftBracket | VerilogToken::LeftBrace => {
                depth += 1
            }
            VerilogToken::RightParen | VerilogToken::RightBracket | VerilogToken::RightBrace => {
                depth -= 1
            }
            VerilogToken::Comma if depth == 0 => {
                parts.push((start, i));
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < hi {
        parts.push((start, hi));
    }
    parts
}

fn top_level_position(tokens: &[Token], kind: VerilogToken) -> Option<usize> {
    let mut depth = 0i32;
    for (i, tok) in tokens.iter().enumerate() {
        match tok.kind {
            VerilogToken::LeftParen | VerilogToken::LeftBracket => depth += 1,
            VerilogToken::RightParen | VerilogToken::RightBracket => depth -= 1,
            k if k == kind && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Constant-expression evaluator for range bounds.
///
/// Grammar, loosest binding first:
/// `shift := add (("<<"|">>") add)*`, `add := mul (("+"|"-") mul)*`,
/// `mul := unary (("*"|"/"|"%") unary)*`, `unary := ("-"|"+") unary | atom`,
/// `atom := literal | parameter | "(" shift ")"`.
struct Evaluator<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
    params: &'a HashMap<String, i64>,
}

impl<'a> Evaluator<'a> {
    fn new(source: &'a str, tokens: &'a [Token], params: &'a HashMap<String, i64>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            params,
        }
    }

    fn evaluate(mut self) -> Option<i64> {
        let value = self.shift()?;
        (self.pos == self.tokens.len()).then_some(value)
    }

    fn eat(&mut self, kind: VerilogToken) -> bool {
        if self.tokens.get(self.pos).map(|t| t.kind) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn shift(&mut self) -> Option<i64> {
        let mut value = self.add()?;
        loop {
            if self.eat(VerilogToken::DoubleLess) {
                let rhs = u32::try_from(self.add()?).ok()?;
                value = value.checked_shl(rhs)?;
            } else if self.eat(VerilogToken::DoubleGreater) {
                let rhs = u32::try_from(self.add()?).ok()?;
                value = value.checked_shr(rhs)?;
            } else {
                return Some(value);
            }
        }
    }

    fn add(&mut self) -> Option<i64> {
        let mut value = self.mul()?;
        loop {
            if self.eat(VerilogToken::Plus) {
                value = value.checked_add(self.mul()?)?;
            } else if self.eat(VerilogToken::Minus) {
                value = value.checked_sub(self.mul()?)?;
            } else {
                return Some(value);
            }
        }
    }

    fn mul(&mut self) -> Option<i64> {
        let mut value = self.unary()?;
        loop {
            if self.eat(VerilogToken::Star) {
                value = value.checked_mul(self.unary()?)?;
            } else if self.eat(VerilogToken::Slash) {
                value = value.checked_div(self.unary()?)?;
            } else if self.eat(VerilogToken::Percent) {
                value = value.checked_rem(self.unary()?)?;
            } else {
                return Some(value);
            }
        }
    }

    fn unary(&mut self) -> Option<i64> {
        if self.eat(VerilogToken::Minus) {
            return self.unary()?.checked_neg();
        }
        if self.eat(VerilogToken::Plus) {
            return self.unary();
        }
        self.atom()
    }

    fn atom(&mut self) -> Option<i64> {
        if self.eat(VerilogToken::LeftParen) {
            let value = self.shift()?;
            return self.eat(VerilogToken::RightParen).then_some(value);
        }
        let tok = *self.tokens.get(self.pos)?;
        self.pos += 1;
        let text = &self.source[tok.span.range()];
        match tok.kind {
            VerilogToken::IntLiteral => text.replace('_', "").parse().ok(),
            VerilogToken::SizedLiteral => sized_literal_value(text),
            VerilogToken::Identifier | VerilogToken::EscapedIdentifier => self
                .params
                .get(&identifier_text(self.source, tok))
                .copied(),
            _ => None,
        }
    }
}

/// Value of a based literal such as `8'hFF` or `'d12`; `None` when it holds
/// `x`/`z` digits or does not fit.
fn sized_literal_value(text: &str) -> Option<i64> {
    let (_, based) = text.split_once('\'')?;
    let based = based.strip_prefix(['s', 'S']).unwrap_or(based);
    let mut chars = based.chars();
    let radix = match chars.next()?.to_ascii_lowercase() {
        'b' => 2,
        'o' => 8,
        'd' => 10,
        'h' => 16,
        _ => return None,
    };
    let digits: String = chars.filter(|c| !c.is_whitespace() && *c != '_').collect();
    i64::from_str_radix(&digits, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_diagnostics::LabelStyle;

    fn extract_with_diags(source: &str) -> (InterfaceDescriptor, Vec<Diagnostic>) {
        let sink = DiagnosticSink::new();
        let desc = extract_source(source, FileId::from_raw(0), &sink).unwrap();
        (desc, sink.take_all())
    }

    fn widths(map: &indexmap::IndexMap<String, Port>) -> Vec<(&str, u32)> {
        map.values().map(|p| (p.name.as_str(), p.width)).collect()
    }

    #[test]
    fn non_ansi_declarations() {
        let desc = extract("module m(a, b); input [7:0] a; output b; endmodule").unwrap();
        assert_eq!(desc.module_name(), "m");
        assert_eq!(widths(desc.inputs()), vec![("a", 8)]);
        assert_eq!(widths(desc.outputs()), vec![("b", 1)]);
    }

    #[test]
    fn ansi_port_list() {
        let desc = extract(
            "module alu (\n  input wire [3:0] op,\n  input [31:0] x, y,\n  output reg signed [31:0] r,\n  output zero\n);\nendmodule",
        )
        .unwrap();
        assert_eq!(widths(desc.inputs()), vec![("op", 4), ("x", 32), ("y", 32)]);
        assert_eq!(widths(desc.outputs()), vec![("r", 32), ("zero", 1)]);
    }

    #[test]
    fn parameterized_widths() {
        let desc = extract(
            "module fifo #(parameter WIDTH = 8, parameter DEPTH = WIDTH * 2) (\n  input [WIDTH-1:0] din,\n  output [(DEPTH<<1)-1:0] dout,\n  output [$clog2(4):0] bad_free\n);\nendmodule",
        );
        // `$clog2` is not a constant the extractor can fold.
        assert!(matches!(desc, Err(ExtractError::MalformedModule { .. })));

        let desc = extract(
            "module fifo #(parameter WIDTH = 8, DEPTH = WIDTH * 2) (\n  input [WIDTH-1:0] din,\n  output [(DEPTH<<1)-1:0] dout\n);\nlocalparam HALF = WIDTH / 2;\ninput [HALF:1] unused;\nendmodule",
        )
        .unwrap();
        assert_eq!(widths(desc.inputs()), vec![("din", 8), ("unused", 4)]);
        assert_eq!(widths(desc.outputs()), vec![("dout", 32)]);
    }

    #[test]
    fn ascending_range_and_sized_bounds() {
        let desc = extract("module m(input [0:7] a, input [4'd3:-2] b, output c); endmodule").unwrap();
        assert_eq!(widths(desc.inputs()), vec![("a", 8), ("b", 6)]);
    }

    #[test]
    fn rejects_ranges_beyond_simulator_limit() {
        let desc = extract("module m(input [4000000000:0] a, output b); endmodule");
        assert!(matches!(desc, Err(ExtractError::MalformedModule { .. })));

        let desc = extract("module m(input [16777215:0] a, output b); endmodule").unwrap();
        assert_eq!(widths(desc.inputs()), vec![("a", MAX_PORT_WIDTH)]);
        let desc = extract("module m(input [16777216:0] a, output b); endmodule");
        assert!(matches!(desc, Err(ExtractError::MalformedModule { .. })));
    }

    #[test]
    fn integer_port_is_32_bits() {
        let desc = extract("module m(output integer count); endmodule").unwrap();
        assert_eq!(desc.outputs()["count"].width, 32);
    }

    #[test]
    fn comments_and_strings_ignored() {
        let desc = extract(
            "// input [3:0] ghost;\nmodule m(input a, output b);\n/* output [9:0] phantom; */\ninitial $display(\"input spooky;\");\nassign b = a;\nendmodule",
        )
        .unwrap();
        assert_eq!(widths(desc.inputs()), vec![("a", 1)]);
        assert_eq!(widths(desc.outputs()), vec![("b", 1)]);
    }

    #[test]
    fn function_and_task_bodies_ignored() {
        let desc = extract(
            "module m(input [3:0] a, output [3:0] y);\nfunction [3:0] inv;\n  input [3:0] v;\n  inv = ~v;\nendfunction\ntask t;\n  output q;\nendtask\nassign y = inv(a);\nendmodule",
        )
        .unwrap();
        assert_eq!(widths(desc.inputs()), vec![("a", 4)]);
        assert_eq!(widths(desc.outputs()), vec![("y", 4)]);
    }

    #[test]
    fn only_first_module_scanned() {
        let desc = extract(
            "module top(input a, output b); endmodule\nmodule other(input [7:0] z, output w); endmodule",
        )
        .unwrap();
        assert_eq!(desc.module_name(), "top");
        assert!(desc.port("z").is_none());
    }

    #[test]
    fn portless_module_is_empty() {
        let desc = extract("`timescale 1ns/1ps\nmodule testbench;\n  reg [7:0] a;\n  wire b;\nendmodule").unwrap();
        assert_eq!(desc.module_name(), "testbench");
        assert!(desc.is_empty());
    }

    #[test]
    fn missing_module_is_malformed() {
        let err = extract("input a; output b;").unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed module: no module declaration found"
        );
    }

    #[test]
    fn unterminated_port_list_is_malformed() {
        assert!(extract("module m(input a, output b endmodule").is_err());
        assert!(extract("module m(input a, output b)\nendmodule").is_err());
        assert!(extract("module m input a; endmodule").is_err());
    }

    #[test]
    fn duplicate_same_direction_warns() {
        let (desc, diags) =
            extract_with_diags("module m(a);\ninput a;\ninput [3:0] a;\nendmodule");
        assert_eq!(desc.inputs()["a"].width, 4);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DUPLICATE_PORT);
        let styles: Vec<_> = diags[0].labels.iter().map(|l| l.style).collect();
        assert_eq!(styles, vec![LabelStyle::Primary, LabelStyle::Secondary]);
    }

    #[test]
    fn direction_conflict_moves_port() {
        let (desc, diags) = extract_with_diags("module m(x);\ninput x;\noutput [1:0] x;\nendmodule");
        assert!(desc.inputs().is_empty());
        assert_eq!(desc.outputs()["x"].width, 2);
        assert_eq!(diags[0].code, DIRECTION_CONFLICT);
        assert_eq!(diags[0].labels[0].message, "redeclared as output");
    }

    #[test]
    fn inout_skipped_with_warning() {
        let (desc, diags) =
            extract_with_diags("module m(input a, inout [7:0] bus, output y); endmodule");
        assert!(desc.port("bus").is_none());
        assert_eq!(desc.ports().count(), 2);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, INOUT_SKIPPED);
    }

    #[test]
    fn undirected_port_list_name_warns() {
        let (_, diags) = extract_with_diags("module m(a, b, c);\ninput a;\noutput b;\nendmodule");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, UNDIRECTED_PORT);
        assert!(diags[0].message.contains("`c`"));
    }

    #[test]
    fn initializers_and_escaped_names() {
        let desc = extract("module \\top (input \\clk , output reg [3:0] q = 4'd0, r);\nendmodule").unwrap();
        assert_eq!(desc.module_name(), "top");
        assert!(desc.inputs().contains_key("clk"));
        assert_eq!(widths(desc.outputs()), vec![("q", 4), ("r", 4)]);
    }

    #[test]
    fn warning_spans_point_into_file() {
        let mut db = SourceDb::new();
        let file = db.add_source("dup.v", "module m(a);\ninput a;\ninput a;\nendmodule\n".to_string());
        let sink = DiagnosticSink::new();
        extract_interface(file, &db, &sink).unwrap();
        let diags = sink.take_all();
        assert_eq!(db.resolve_span(diags[0].primary_span).to_string(), "dup.v:3:7");
    }

    #[test]
    fn literal_values() {
        assert_eq!(sized_literal_value("8'hFF"), Some(255));
        assert_eq!(sized_literal_value("4'sb1010"), Some(10));
        assert_eq!(sized_literal_value("'d1_0"), Some(10));
        assert_eq!(sized_literal_value("4'bx01z"), None);
    }
}
