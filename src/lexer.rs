use crate::diag::{Diagnostic, Severity, codes};
use crate::schema::keywords;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer state. `InMacro` and `InExports` persist across `next_token`
/// calls; `InComment` normally resolves within one call but is kept
/// explicit so the machine is inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InComment,
    InMacro,
    InExports,
}

/// Byte-level tokenizer for one MIB source buffer.
///
/// Operates on bytes, not code points: Latin-1 and other non-UTF-8 vendor
/// encodings inside strings and comments pass through without diagnostics.
/// Malformed input never aborts tokenization; problems are recorded as
/// [`Diagnostic`]s and the stream continues to an `Eof` token.
#[derive(Debug)]
pub struct Lexer<'input> {
    source: &'input [u8],
    pos: usize,
    state: State,
    diagnostics: Vec<Diagnostic>,
}

impl<'input> Lexer<'input> {
    #[must_use]
    pub fn new(source: &'input [u8]) -> Self {
        Self {
            source,
            pos: 0,
            state: State::Normal,
            diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn source(&self) -> &'input [u8] {
        self.source
    }

    /// Diagnostics recorded so far, in source order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Drive to EOF. The returned stream always ends with exactly one
    /// `Eof` token.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        loop {
            match self.state {
                State::InComment => self.comment_body(),
                State::InMacro => return self.macro_body(),
                State::InExports => return self.exports_body(),
                State::Normal => {
                    let Some(b) = self.peek() else {
                        return Token::new(TokenKind::Eof, Span::empty(self.source.len()));
                    };
                    match b {
                        b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c => {
                            self.pos += 1;
                        }
                        b'{' => return self.punct(TokenKind::LBrace),
                        b'}' => return self.punct(TokenKind::RBrace),
                        b'(' => return self.punct(TokenKind::LParen),
                        b')' => return self.punct(TokenKind::RParen),
                        b'[' => return self.punct(TokenKind::LBracket),
                        b']' => return self.punct(TokenKind::RBracket),
                        b';' => return self.punct(TokenKind::Semicolon),
                        b',' => return self.punct(TokenKind::Comma),
                        b'|' => return self.punct(TokenKind::Pipe),
                        b'.' => {
                            if self.peek_at(1) == Some(b'.') {
                                return self.wide(TokenKind::DotDot, 2);
                            }
                            return self.punct(TokenKind::Dot);
                        }
                        b':' => {
                            if self.peek_at(1) == Some(b':') && self.peek_at(2) == Some(b'=') {
                                return self.wide(TokenKind::Assign, 3);
                            }
                            self.unknown_byte();
                        }
                        b'-' => {
                            if let Some(token) = self.dashes() {
                                return token;
                            }
                        }
                        b'0'..=b'9' => return self.number(self.pos),
                        b'"' => return self.quoted_string(),
                        b'\'' => return self.hex_or_bin_string(),
                        b'A'..=b'Z' | b'a'..=b'z' => return self.identifier(),
                        _ => self.unknown_byte(),
                    }
                }
            }
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    #[inline]
    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.source.get(self.pos + ahead).copied()
    }

    fn punct(&mut self, kind: TokenKind) -> Token {
        self.wide(kind, 1)
    }

    fn wide(&mut self, kind: TokenKind, len: usize) -> Token {
        let span = Span::new(self.pos, self.pos + len);
        self.pos += len;
        Token::new(kind, span)
    }

    /// A `-` in normal state: negative number, dash-run separator line,
    /// comment opener, or bare minus.
    fn dashes(&mut self) -> Option<Token> {
        let mut run = 0;
        while self.peek_at(run) == Some(b'-') {
            run += 1;
        }
        if run == 1 && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            let start = self.pos;
            self.pos += 1;
            return Some(self.number(start));
        }
        let after = self.peek_at(run);
        if run >= 3 && matches!(after, None | Some(b'\n') | Some(b'\r')) {
            // A separator line of dashes; consumed whole, no tokens.
            self.pos += run;
            return None;
        }
        if run >= 2 {
            self.pos += 2;
            self.state = State::InComment;
            return None;
        }
        Some(self.punct(TokenKind::Minus))
    }

    /// Inside `--`: closes at the next `--` on the same physical line or
    /// at end-of-line, whichever comes first. Bytes are not inspected for
    /// encoding.
    fn comment_body(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'\n' | b'\r' => break,
                b'-' if self.peek_at(1) == Some(b'-') => {
                    self.pos += 2;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        self.state = State::Normal;
    }

    /// Inside a MACRO body: consume everything, skipping comments, until
    /// a bare `END` at a word boundary. Only the `END` token is emitted.
    fn macro_body(&mut self) -> Token {
        while self.pos < self.source.len() {
            if self.peek() == Some(b'-') && self.peek_at(1) == Some(b'-') {
                self.pos += 2;
                self.skip_comment_inline();
                continue;
            }
            if self.source[self.pos..].starts_with(b"END") && self.word_boundary(self.pos, 3) {
                log::trace!("macro body skipped up to offset {}", self.pos);
                self.state = State::Normal;
                return self.wide(TokenKind::End, 3);
            }
            self.pos += 1;
        }
        self.state = State::Normal;
        Token::new(TokenKind::Eof, Span::empty(self.source.len()))
    }

    /// Inside EXPORTS: consume symbols up to the closing `;`, which is
    /// the only token emitted.
    fn exports_body(&mut self) -> Token {
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b'-' if self.peek_at(1) == Some(b'-') => {
                    self.pos += 2;
                    self.skip_comment_inline();
                }
                b';' => {
                    log::trace!("exports body skipped up to offset {}", self.pos);
                    self.state = State::Normal;
                    return self.punct(TokenKind::Semicolon);
                }
                _ => self.pos += 1,
            }
        }
        self.state = State::Normal;
        Token::new(TokenKind::Eof, Span::empty(self.source.len()))
    }

    /// Comment skip used while already consuming a skipped region, where
    /// the state machine must not leave the enclosing state.
    fn skip_comment_inline(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'\n' | b'\r' => return,
                b'-' if self.peek_at(1) == Some(b'-') => {
                    self.pos += 2;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// `END` boundary test: the byte before must not be alphanumeric or
    /// `-` (or it is start-of-input), and the byte after must not be
    /// alphanumeric or `-` unless it starts a `--` comment.
    fn word_boundary(&self, at: usize, len: usize) -> bool {
        let before_ok = at == 0
            || !matches!(self.source[at - 1], b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-');
        let after = self.source.get(at + len).copied();
        let after_ok = match after {
            None => true,
            Some(b'-') => self.source.get(at + len + 1).copied() == Some(b'-'),
            Some(b) => !b.is_ascii_alphanumeric(),
        };
        before_ok && after_ok
    }

    /// `[0-9]+`, with `start` already positioned before an optional
    /// leading `-` that has been consumed.
    fn number(&mut self, start: usize) -> Token {
        let negative = start < self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let kind = if negative {
            TokenKind::NegNumber
        } else {
            TokenKind::Number
        };
        Token::new(kind, Span::new(start, self.pos))
    }

    /// `"` begins a quoted string; any bytes including newlines are part
    /// of it until the closing `"`.
    fn quoted_string(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'"' {
                return Token::new(TokenKind::QuotedString, Span::new(start, self.pos));
            }
        }
        let span = Span::new(start, self.source.len());
        self.diagnostics.push(Diagnostic::new(
            Severity::Error,
            codes::UNTERMINATED_STRING,
            span,
            "unterminated quoted string".into(),
        ));
        Token::new(TokenKind::QuotedString, span)
    }

    /// `'...'H` or `'...'B` (suffix case-insensitive). A missing or
    /// unknown suffix yields an `Error` token.
    fn hex_or_bin_string(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                None => {
                    let span = Span::new(start, self.source.len());
                    self.diagnostics.push(Diagnostic::new(
                        Severity::Error,
                        codes::UNTERMINATED_STRING,
                        span,
                        "unterminated hex or binary string".into(),
                    ));
                    return Token::new(TokenKind::Error, span);
                }
                Some(b'\'') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        match self.peek() {
            Some(b'H' | b'h') => {
                self.pos += 1;
                Token::new(TokenKind::HexString, Span::new(start, self.pos))
            }
            Some(b'B' | b'b') => {
                self.pos += 1;
                Token::new(TokenKind::BinString, Span::new(start, self.pos))
            }
            other => {
                if other.is_some() {
                    self.pos += 1;
                }
                let span = Span::new(start, self.pos);
                self.diagnostics.push(Diagnostic::new(
                    Severity::Error,
                    codes::INVALID_HEX_BINARY_SUFFIX,
                    span,
                    "expected H or B after closing quote".into(),
                ));
                Token::new(TokenKind::Error, span)
            }
        }
    }

    /// `[A-Za-z][A-Za-z0-9_-]*`, except that an embedded `--` splits the
    /// identifier: the first hyphen stays on the identifier and scanning
    /// stops, so `foo--bar` yields `foo-`, `-`, `bar`.
    fn identifier(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        while let Some(b) = self.peek() {
            match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' => self.pos += 1,
                b'-' => {
                    self.pos += 1;
                    if self.peek() == Some(b'-') {
                        break;
                    }
                }
                _ => break,
            }
        }
        let text = &self.source[start..self.pos];
        let kind = keywords::classify(text).unwrap_or_else(|| {
            if text[0].is_ascii_uppercase() {
                TokenKind::UpperIdent
            } else {
                TokenKind::LowerIdent
            }
        });
        match kind {
            TokenKind::Macro => self.state = State::InMacro,
            TokenKind::Exports => self.state = State::InExports,
            _ => {}
        }
        Token::new(kind, Span::new(start, self.pos))
    }

    /// Unrecognized byte: diagnostic, then skip the rest of the physical
    /// line and resume.
    fn unknown_byte(&mut self) {
        let span = Span::new(self.pos, self.pos + 1);
        self.diagnostics.push(Diagnostic::new(
            Severity::Error,
            codes::UNKNOWN_CHARACTER,
            span,
            format!("unexpected character 0x{:02x}", self.source[self.pos]),
        ));
        while let Some(b) = self.peek() {
            if b == b'\n' || b == b'\r' {
                break;
            }
            self.pos += 1;
        }
    }
}

#[cfg(test)]
fn kinds(source: &[u8]) -> Vec<TokenKind> {
    let (tokens, _) = Lexer::new(source).tokenize();
    tokens.into_iter().map(|t| t.kind).collect()
}

#[test]
fn test_terminates_with_single_eof() {
    for source in [
        &b""[..],
        &b"   "[..],
        &b"FOO-MIB DEFINITIONS ::= BEGIN END"[..],
        &b"\xff\xfe\x80"[..],
        &b"'deadbeef'"[..],
    ] {
        let (tokens, _) = Lexer::new(source).tokenize();
        assert_eq!(
            1,
            tokens.iter().filter(|t| t.kind == TokenKind::Eof).count()
        );
        assert_eq!(TokenKind::Eof, tokens.last().unwrap().kind);
        for t in &tokens[..tokens.len() - 1] {
            assert!(t.span.end > t.span.start);
            assert!(t.span.end <= source.len());
        }
    }
}

#[test]
fn test_identifier_double_dash_split() {
    assert_eq!(
        vec![
            TokenKind::LowerIdent,
            TokenKind::Minus,
            TokenKind::LowerIdent,
            TokenKind::Eof
        ],
        kinds(b"foo--bar")
    );
    let (tokens, _) = Lexer::new(b"foo--bar").tokenize();
    assert_eq!(b"foo-", tokens[0].text(b"foo--bar"));
    assert_eq!(b"bar", tokens[2].text(b"foo--bar"));
}

#[test]
fn test_dash_runs() {
    // 81-dash separator line: wholly consumed
    let mut line = vec![b'-'; 81];
    line.push(b'\n');
    assert_eq!(vec![TokenKind::Eof], kinds(&line));
    // odd run not followed by EOL: comment parity leaves one minus
    assert_eq!(
        vec![TokenKind::Minus, TokenKind::LowerIdent, TokenKind::Eof],
        kinds(b"----- x")
    );
    // seven dashes then newline: nothing
    assert_eq!(vec![TokenKind::Eof], kinds(b"-------\n"));
    // plain comment hides the rest of the line
    assert_eq!(
        vec![TokenKind::Number, TokenKind::Eof],
        kinds(b"1 -- two 2\n")
    );
    // comment closed by -- on the same line
    assert_eq!(
        vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof],
        kinds(b"1 -- hidden -- 2")
    );
}

#[test]
fn test_numbers_and_operators() {
    assert_eq!(
        vec![
            TokenKind::Number,
            TokenKind::DotDot,
            TokenKind::NegNumber,
            TokenKind::Eof
        ],
        kinds(b"0..-42")
    );
    assert_eq!(
        vec![
            TokenKind::UpperIdent,
            TokenKind::Assign,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Eof
        ],
        kinds(b"Foo ::= { }")
    );
}

#[test]
fn test_forbidden_keyword_no_diagnostic() {
    let source = b"DEFVAL { FALSE }";
    let (tokens, diags) = Lexer::new(source).tokenize();
    assert_eq!(
        vec![
            TokenKind::Defval,
            TokenKind::LBrace,
            TokenKind::ForbiddenKeyword,
            TokenKind::RBrace,
            TokenKind::Eof
        ],
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>()
    );
    assert!(diags.is_empty());
}

#[test]
fn test_strings() {
    let source = b"\"ab\ncd\" 'ff'H '1010'b";
    let (tokens, diags) = Lexer::new(source).tokenize();
    assert_eq!(
        vec![
            TokenKind::QuotedString,
            TokenKind::HexString,
            TokenKind::BinString,
            TokenKind::Eof
        ],
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>()
    );
    assert!(diags.is_empty());

    // non-UTF-8 bytes inside strings and comments are fine
    let (_, diags) = Lexer::new(b"\"\xe9\xff\" -- caf\xe9\n").tokenize();
    assert!(diags.is_empty());

    // unterminated string: token to EOF plus one diagnostic
    let (tokens, diags) = Lexer::new(b"\"open").tokenize();
    assert_eq!(TokenKind::QuotedString, tokens[0].kind);
    assert_eq!(Span::new(0, 5), tokens[0].span);
    assert_eq!(codes::UNTERMINATED_STRING, diags[0].code);

    // bad suffix
    let (tokens, diags) = Lexer::new(b"'ff'X").tokenize();
    assert_eq!(TokenKind::Error, tokens[0].kind);
    assert_eq!(codes::INVALID_HEX_BINARY_SUFFIX, diags[0].code);
}

#[test]
fn test_macro_skip() {
    let source = b"OBJECT-TYPE MACRO ::= BEGIN TYPE NOTATION -- END inside\n ::= x END foo";
    let (tokens, diags) = Lexer::new(source).tokenize();
    assert_eq!(
        vec![
            TokenKind::ObjectType,
            TokenKind::Macro,
            TokenKind::End,
            TokenKind::LowerIdent,
            TokenKind::Eof
        ],
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>()
    );
    assert!(diags.is_empty());
    // ENDED is not a boundary END
    let (tokens, _) = Lexer::new(b"M MACRO x ENDED END").tokenize();
    assert_eq!(
        vec![
            TokenKind::UpperIdent,
            TokenKind::Macro,
            TokenKind::End,
            TokenKind::Eof
        ],
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>()
    );
}

#[test]
fn test_exports_skip() {
    let source = b"EXPORTS a, B, c; foo";
    assert_eq!(
        vec![
            TokenKind::Exports,
            TokenKind::Semicolon,
            TokenKind::LowerIdent,
            TokenKind::Eof
        ],
        kinds(source)
    );
}

#[test]
fn test_unknown_byte_skips_line() {
    let source = b"x %skipped all\ny";
    let (tokens, diags) = Lexer::new(source).tokenize();
    assert_eq!(
        vec![TokenKind::LowerIdent, TokenKind::LowerIdent, TokenKind::Eof],
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>()
    );
    assert_eq!(1, diags.len());
    assert_eq!(codes::UNKNOWN_CHARACTER, diags[0].code);
    assert_eq!(Span::new(2, 3), diags[0].span);
}
