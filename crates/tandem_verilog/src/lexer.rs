//! Lexical analyzer for Verilog source text.
//!
//! Converts source text into a sequence of [`Token`]s. Comments and compiler
//! directives (`` `timescale``, `` `define`` lines, stray Markdown fences)
//! are skipped without producing tokens, so nothing inside them can be
//! mistaken for a port declaration. Malformed input is reported to the
//! [`DiagnosticSink`] as `E100` and produces [`VerilogToken::Error`] tokens.

use crate::token::{lookup_keyword, Token, VerilogToken};
use tandem_diagnostics::code::{Category, DiagnosticCode};
use tandem_diagnostics::{Diagnostic, DiagnosticSink};
use tandem_source::{FileId, Span};

/// Code for every lexical error.
pub const LEX_ERROR: DiagnosticCode = DiagnosticCode::new(Category::Error, 100);

/// Lexes the given Verilog source text into a vector of tokens.
///
/// The returned vector always ends with a [`VerilogToken::Eof`] token.
pub fn lex(source: &str, file: FileId, sink: &DiagnosticSink) -> Vec<Token> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        file,
        sink,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    file: FileId,
    sink: &'a DiagnosticSink,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: VerilogToken::Eof,
                    span: Span::new(self.file, self.pos as u32, self.pos as u32),
                });
                break;
            }
            tokens.push(self.next_token());
        }
        tokens
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    fn token(&self, kind: VerilogToken, start: usize) -> Token {
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn error(&self, msg: &str, span: Span) {
        self.sink.emit(Diagnostic::error(LEX_ERROR, msg, span));
    }

    fn skip_to_line_end(&mut self) {
        while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.source.len() {
                return;
            }
            match (self.peek(), self.peek_at(1)) {
                (b'/', b'/') => self.skip_to_line_end(),
                (b'/', b'*') => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        if self.pos >= self.source.len() {
                            self.error("unterminated block comment", self.span_from(start));
                            break;
                        }
                        if self.source[self.pos] == b'*' && self.peek_at(1) == b'/' {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                // Directives never declare ports; the rest of the line goes with them.
                (b'`', _) => self.skip_to_line_end(),
                _ => return,
            }
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let b = self.peek();

        if is_ident_start(b) {
            return self.lex_identifier_or_keyword(start);
        }
        if b == b'\\' {
            return self.lex_escaped_identifier(start);
        }
        if b == b'$' {
            return self.lex_system_identifier(start);
        }
        if b.is_ascii_digit() {
            return self.lex_number(start);
        }
        if b == b'\'' && matches!(self.peek_at(1).to_ascii_lowercase(), b'b' | b'o' | b'd' | b'h' | b's')
        {
            return self.lex_unsized_based_literal(start);
        }
        if b == b'"' {
            return self.lex_string(start);
        }
        self.lex_operator(start)
    }

    fn lex_identifier_or_keyword(&mut self, start: usize) -> Token {
        while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");
        let kind = lookup_keyword(text).unwrap_or(VerilogToken::Identifier);
        self.token(kind, start)
    }

    fn lex_escaped_identifier(&mut self, start: usize) -> Token {
        self.pos += 1;
        while self.pos < self.source.len() && !self.source[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos == start + 1 {
            self.error("empty escaped identifier", self.span_from(start));
            return self.token(VerilogToken::Error, start);
        }
        self.token(VerilogToken::EscapedIdentifier, start)
    }

    fn lex_system_identifier(&mut self, start: usize) -> Token {
        self.pos += 1;
        if self.pos < self.source.len() && is_ident_start(self.source[self.pos]) {
            while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
                self.pos += 1;
            }
            self.token(VerilogToken::SystemIdentifier, start)
        } else {
            self.error("expected identifier after '$'", self.span_from(start));
            self.token(VerilogToken::Error, start)
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        self.eat_decimal_digits();

        // Size prefix: 8'hFF, 4'sb1010
        if self.peek() == b'\'' {
            let mut base = self.peek_at(1).to_ascii_lowercase();
            let mut prefix = 2;
            if base == b's' {
                base = self.peek_at(2).to_ascii_lowercase();
                prefix = 3;
            }
            if matches!(base, b'b' | b'o' | b'd' | b'h') {
                self.pos += prefix;
                self.skip_inline_space();
                self.eat_based_digits(base);
                return self.token(VerilogToken::SizedLiteral, start);
            }
        }

        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            self.pos += 1;
            self.eat_decimal_digits();
            self.eat_exponent();
            return self.token(VerilogToken::RealLiteral, start);
        }

        if matches!(self.peek(), b'e' | b'E') {
            self.eat_exponent();
            return self.token(VerilogToken::RealLiteral, start);
        }

        self.token(VerilogToken::IntLiteral, start)
    }

    fn lex_unsized_based_literal(&mut self, start: usize) -> Token {
        self.pos += 1;
        let mut base = self.peek().to_ascii_lowercase();
        self.pos += 1;
        if base == b's' {
            base = self.peek().to_ascii_lowercase();
            if matches!(base, b'b' | b'o' | b'd' | b'h') {
                self.pos += 1;
            }
        }
        self.skip_inline_space();
        self.eat_based_digits(base);
        self.token(VerilogToken::SizedLiteral, start)
    }

    // `8'h FF` is legal: whitespace may separate the base from its digits.
    fn skip_inline_space(&mut self) {
        while matches!(self.peek(), b' ' | b'\t') {
            self.pos += 1;
        }
    }

    fn eat_decimal_digits(&mut self) {
        while self.peek().is_ascii_digit() || self.peek() == b'_' {
            self.pos += 1;
        }
    }

    fn eat_based_digits(&mut self, base: u8) {
        loop {
            let ch = self.peek().to_ascii_lowercase();
            let valid = match base {
                b'b' => matches!(ch, b'0' | b'1' | b'x' | b'z' | b'?' | b'_'),
                b'o' => matches!(ch, b'0'..=b'7' | b'x' | b'z' | b'?' | b'_'),
                b'd' => ch.is_ascii_digit() || ch == b'_',
                b'h' => ch.is_ascii_hexdigit() || matches!(ch, b'x' | b'z' | b'?' | b'_'),
                _ => false,
            };
            if !valid {
                break;
            }
            self.pos += 1;
        }
    }

    fn eat_exponent(&mut self) {
        if matches!(self.peek(), b'e' | b'E') {
            self.pos += 1;
            if matches!(self.peek(), b'+' | b'-') {
                self.pos += 1;
            }
            self.eat_decimal_digits();
        }
    }

    fn lex_string(&mut self, start: usize) -> Token {
        self.pos += 1;
        loop {
            if self.pos >= self.source.len() || self.source[self.pos] == b'\n' {
                self.error("unterminated string literal", self.span_from(start));
                return self.token(VerilogToken::Error, start);
            }
            match self.source[self.pos] {
                b'\\' => self.pos = (self.pos + 2).min(self.source.len()),
                b'"' => {
                    self.pos += 1;
                    return self.token(VerilogToken::StringLiteral, start);
                }
                _ => self.pos += 1,
            }
        }
    }

    fn lex_operator(&mut self, start: usize) -> Token {
        let b = self.peek();
        self.pos += 1;
        let kind = match b {
            b'(' => VerilogToken::LeftParen,
            b')' => VerilogToken::RightParen,
            b'[' => VerilogToken::LeftBracket,
            b']' => VerilogToken::RightBracket,
            b'{' => VerilogToken::LeftBrace,
            b'}' => VerilogToken::RightBrace,
            b',' => VerilogToken::Comma,
            b';' => VerilogToken::Semicolon,
            b':' => VerilogToken::Colon,
            b'.' => VerilogToken::Dot,
            b'#' => VerilogToken::Hash,
            b'@' => VerilogToken::At,
            b'+' => VerilogToken::Plus,
            b'-' => VerilogToken::Minus,
            b'/' => VerilogToken::Slash,
            b'%' => VerilogToken::Percent,
            b'=' => {
                if self.peek() == b'=' {
                    self.eat_while_any(b"=");
                    VerilogToken::Operator
                } else {
                    VerilogToken::Equals
                }
            }
            b'*' => {
                self.eat_while_any(b"*");
                if self.pos - start == 1 {
                    VerilogToken::Star
                } else {
                    VerilogToken::Operator
                }
            }
            b'<' => self.lex_shift(b'<', VerilogToken::DoubleLess),
            b'>' => self.lex_shift(b'>', VerilogToken::DoubleGreater),
            b'!' | b'&' | b'|' | b'^' | b'~' | b'?' => {
                self.eat_while_any(b"=&|^~");
                VerilogToken::Operator
            }
            _ => {
                // Keep spans on character boundaries for multi-byte input.
                while self.pos < self.source.len() && (self.source[self.pos] & 0xC0) == 0x80 {
                    self.pos += 1;
                }
                let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
                self.error(
                    &format!("unrecognized character '{text}'"),
                    self.span_from(start),
                );
                VerilogToken::Error
            }
        };
        self.token(kind, start)
    }

    /// `<<` and `>>` are the only relational-family operators that matter
    /// for range arithmetic; `<`, `<=`, `<<<` and friends collapse into
    /// [`VerilogToken::Operator`].
    fn lex_shift(&mut self, ch: u8, shift: VerilogToken) -> VerilogToken {
        if self.peek() == ch && self.peek_at(1) != ch && self.peek_at(1) != b'=' {
            self.pos += 1;
            return shift;
        }
        self.eat_while_any(&[ch, b'=']);
        VerilogToken::Operator
    }

    fn eat_while_any(&mut self, set: &[u8]) {
        while set.contains(&self.peek()) {
            self.pos += 1;
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}
