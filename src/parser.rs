//! Recursive-descent parser for one MIB module.
//!
//! Works over a 3-token lookahead buffer pulled on demand from the
//! [`Lexer`]. [`Parser::parse_module`] always returns a [`ModuleAst`],
//! however broken the input: expected-token failures become
//! `parse-error` diagnostics and the parser re-synchronizes at the next
//! definition boundary.

use bitflags::bitflags;

use crate::ast::*;
use crate::diag::{Diagnostic, Severity, Strictness, codes};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Internal unwind marker: a definition could not be completed and the
/// parser must re-synchronize. Never escapes `parse_module`.
#[derive(Debug, Clone, Copy)]
struct Recover;

type ParseResult<T> = Result<T, Recover>;

bitflags! {
    /// Clauses already seen in the current macro body. Macro clauses are
    /// parsed in a loop rather than in RFC order, so out-of-order vendor
    /// MIBs still parse; this set catches repeats.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct ClauseSet: u32 {
        const SYNTAX = 1 << 0;
        const UNITS = 1 << 1;
        const ACCESS = 1 << 2;
        const STATUS = 1 << 3;
        const DESCRIPTION = 1 << 4;
        const REFERENCE = 1 << 5;
        const INDEX = 1 << 6;
        const AUGMENTS = 1 << 7;
        const DEFVAL = 1 << 8;
        const DISPLAY_HINT = 1 << 9;
        const LAST_UPDATED = 1 << 10;
        const ORGANIZATION = 1 << 11;
        const CONTACT_INFO = 1 << 12;
        const OBJECTS = 1 << 13;
        const NOTIFICATIONS = 1 << 14;
        const ENTERPRISE = 1 << 15;
        const VARIABLES = 1 << 16;
        const PRODUCT_RELEASE = 1 << 17;
        const WRITE_SYNTAX = 1 << 18;
        const MIN_ACCESS = 1 << 19;
        const CREATION_REQUIRES = 1 << 20;
        const MANDATORY_GROUPS = 1 << 21;
    }
}

/// Module name used when the input does not begin with one.
pub const UNKNOWN_MODULE: &str = "UNKNOWN";

pub struct Parser<'input> {
    lexer: Lexer<'input>,
    source: &'input [u8],
    lookahead: [Token; 3],
    strictness: Strictness,
    diagnostics: Vec<Diagnostic>,
    last_end: usize,
}

impl<'input> Parser<'input> {
    #[must_use]
    pub fn new(source: &'input [u8]) -> Self {
        Self::with_strictness(source, Strictness::default())
    }

    #[must_use]
    pub fn with_strictness(source: &'input [u8], strictness: Strictness) -> Self {
        let mut lexer = Lexer::new(source);
        let lookahead = [lexer.next_token(), lexer.next_token(), lexer.next_token()];
        Self {
            lexer,
            source,
            lookahead,
            strictness,
            diagnostics: Vec::new(),
            last_end: 0,
        }
    }

    // -- token plumbing ------------------------------------------------

    #[inline]
    fn current(&self) -> Token {
        self.lookahead[0]
    }

    #[inline]
    fn peek(&self, n: usize) -> Token {
        debug_assert!(n >= 1 && n <= 2);
        self.lookahead[n]
    }

    fn bump(&mut self) -> Token {
        let token = self.lookahead[0];
        self.lookahead[0] = self.lookahead[1];
        self.lookahead[1] = self.lookahead[2];
        self.lookahead[2] = self.lexer.next_token();
        if token.kind != TokenKind::Eof {
            self.last_end = token.span.end;
        }
        token
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) { Some(self.bump()) } else { None }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.at(kind) {
            return Ok(self.bump());
        }
        self.unexpected(&format!("expected {kind}"));
        Err(Recover)
    }

    fn unexpected(&mut self, what: &str) {
        let token = self.current();
        self.report(
            Severity::Error,
            codes::PARSE_ERROR,
            token.span,
            format!("{what}, found {}", token.kind),
        );
    }

    fn report(&mut self, severity: Severity, code: &'static str, span: Span, message: String) {
        if self.strictness.should_report(code, severity) {
            let effective = self.strictness.effective_severity(code, severity);
            self.diagnostics
                .push(Diagnostic::new(effective, code, span, message));
        }
    }

    fn text(&self, span: Span) -> String {
        String::from_utf8_lossy(span.slice(self.source)).into_owned()
    }

    // -- identifiers ---------------------------------------------------

    /// Turn the current ident-like token into an [`Ident`], running the
    /// identifier well-formedness checks. `value_ref` selects the
    /// lowercase-first-letter rule.
    fn ident(&mut self, value_ref: bool) -> ParseResult<Ident> {
        let token = self.current();
        if !token.kind.is_ident_like() {
            self.unexpected("expected identifier");
            return Err(Recover);
        }
        self.bump();
        let name = self.text(token.span);
        if token.kind == TokenKind::ForbiddenKeyword {
            self.report(
                Severity::Severe,
                codes::KEYWORD_RESERVED,
                token.span,
                format!("`{name}` is a reserved ASN.1 keyword"),
            );
        }
        if name.contains('_') {
            self.report(
                Severity::Style,
                codes::IDENTIFIER_UNDERSCORE,
                token.span,
                format!("identifier `{name}` contains an underscore"),
            );
        }
        if name.ends_with('-') {
            self.report(
                Severity::Error,
                codes::IDENTIFIER_HYPHEN_END,
                token.span,
                format!("identifier `{name}` ends with a hyphen"),
            );
        }
        if name.len() > 64 {
            self.report(
                Severity::Error,
                codes::IDENTIFIER_LENGTH_64,
                token.span,
                format!("identifier `{name}` is longer than 64 characters"),
            );
        } else if name.len() > 32 {
            self.report(
                Severity::Warning,
                codes::IDENTIFIER_LENGTH_32,
                token.span,
                format!("identifier `{name}` is longer than 32 characters"),
            );
        }
        if value_ref && name.starts_with(|c: char| c.is_ascii_uppercase()) {
            self.report(
                Severity::Error,
                codes::BAD_IDENTIFIER_CASE,
                token.span,
                format!("value reference `{name}` must start with a lowercase letter"),
            );
        }
        Ok(Ident::new(name, token.span))
    }

    // -- literals ------------------------------------------------------

    /// Quoted string with the surrounding quotes stripped; an
    /// unterminated string loses only its opening quote.
    fn quoted(&mut self) -> ParseResult<Text> {
        let token = self.expect(TokenKind::QuotedString)?;
        let raw = token.span.slice(self.source);
        let inner = match raw {
            [b'"', mid @ .., b'"'] if raw.len() >= 2 => mid,
            [b'"', rest @ ..] => rest,
            other => other,
        };
        Ok(Text {
            value: String::from_utf8_lossy(inner).into_owned(),
            span: token.span,
        })
    }

    fn number_u32(&mut self, token: Token) -> u32 {
        let text = self.text(token.span);
        match text.parse::<u32>() {
            Ok(v) => v,
            Err(_) => {
                self.report(
                    Severity::Error,
                    codes::INVALID_U32,
                    token.span,
                    format!("`{text}` does not fit in an unsigned 32-bit sub-identifier"),
                );
                0
            }
        }
    }

    fn number_i64(&mut self, token: Token) -> i64 {
        let text = self.text(token.span);
        match text.parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                self.report(
                    Severity::Error,
                    codes::INVALID_I64,
                    token.span,
                    format!("`{text}` does not fit in a signed 64-bit value"),
                );
                0
            }
        }
    }

    /// Unsigned-first number parsing for range endpoints and defaults:
    /// u64, then i64 for negatives.
    fn range_endpoint(&mut self) -> ParseResult<RangeValue> {
        let token = self.current();
        match token.kind {
            TokenKind::Number => {
                self.bump();
                let text = self.text(token.span);
                match text.parse::<u64>() {
                    Ok(v) => Ok(RangeValue::Unsigned(v)),
                    Err(_) => {
                        self.report(
                            Severity::Error,
                            codes::INVALID_I64,
                            token.span,
                            format!("range endpoint `{text}` is out of range"),
                        );
                        Ok(RangeValue::Unsigned(0))
                    }
                }
            }
            TokenKind::NegNumber => {
                self.bump();
                Ok(RangeValue::Signed(self.number_i64(token)))
            }
            TokenKind::HexString => {
                self.bump();
                let digits = self.hex_digits(token);
                match u64::from_str_radix(&digits, 16) {
                    Ok(v) => Ok(RangeValue::Unsigned(v)),
                    Err(_) => {
                        self.report(
                            Severity::Error,
                            codes::INVALID_HEX_RANGE,
                            token.span,
                            format!("hex range endpoint '{digits}'H is out of range"),
                        );
                        Ok(RangeValue::Unsigned(0))
                    }
                }
            }
            TokenKind::UpperIdent | TokenKind::ForbiddenKeyword => {
                // MIN and MAX land here; they are reserved words used in
                // their one legitimate position, so no diagnostic.
                self.bump();
                Ok(RangeValue::Ident(self.text(token.span)))
            }
            _ => {
                self.unexpected("expected range endpoint");
                Err(Recover)
            }
        }
    }

    /// Digits of a `'..'H` / `'..'B` literal, quotes and suffix stripped.
    fn hex_digits(&mut self, token: Token) -> String {
        let raw = token.span.slice(self.source);
        let inner = if raw.len() >= 3 {
            &raw[1..raw.len() - 2]
        } else {
            raw
        };
        String::from_utf8_lossy(inner).into_owned()
    }

    // -- module --------------------------------------------------------

    /// Parse one complete module. Never fails and never panics; on a
    /// broken header the returned module has name `UNKNOWN` and an empty
    /// body.
    pub fn parse_module(mut self) -> ModuleAst {
        let start = self.current().span.start;
        let mut module = match self.module_header() {
            Ok((name, dialect)) => ModuleAst {
                name,
                dialect,
                imports: Vec::new(),
                body: Vec::new(),
                span: Span::empty(start),
                diagnostics: Vec::new(),
            },
            Err(Recover) => {
                let name = Ident::new(UNKNOWN_MODULE, Span::empty(start));
                let end = self.last_end.max(start);
                return self.finish(ModuleAst {
                    name,
                    dialect: Dialect::Definitions,
                    imports: Vec::new(),
                    body: Vec::new(),
                    span: Span::new(start, end),
                    diagnostics: Vec::new(),
                });
            }
        };

        // The lexer reduced any EXPORTS body to its closing `;`.
        if self.eat(TokenKind::Exports).is_some() {
            let _ = self.expect(TokenKind::Semicolon);
        }
        if self.at(TokenKind::Imports) {
            self.imports(&mut module.imports);
        }

        loop {
            match self.current().kind {
                TokenKind::End => {
                    self.bump();
                    break;
                }
                TokenKind::Eof => {
                    let span = self.current().span;
                    self.report(
                        Severity::Error,
                        codes::PARSE_ERROR,
                        span,
                        "missing END at end of module".into(),
                    );
                    break;
                }
                _ => match self.definition() {
                    Ok(def) => {
                        log::trace!("parsed definition `{}`", def.name().name);
                        module.body.push(def);
                    }
                    Err(Recover) => self.recover_to_definition(),
                },
            }
        }

        module.span = Span::new(start, self.last_end.max(start));
        self.finish(module)
    }

    /// Merge lexer diagnostics (first) with parser diagnostics, both
    /// filtered through the strictness config.
    fn finish(mut self, mut module: ModuleAst) -> ModuleAst {
        let mut merged = Vec::new();
        for d in self.lexer.take_diagnostics() {
            if self.strictness.should_report(d.code, d.severity) {
                let severity = self.strictness.effective_severity(d.code, d.severity);
                merged.push(Diagnostic { severity, ..d });
            }
        }
        merged.append(&mut self.diagnostics);
        module.diagnostics = merged;
        module
    }

    fn module_header(&mut self) -> ParseResult<(Ident, Dialect)> {
        let name = self.ident(false)?;
        if self.eat(TokenKind::LBrace).is_some() {
            // Some modules repeat their registration OID in the header;
            // it carries no information the body lacks.
            while !matches!(self.current().kind, TokenKind::RBrace | TokenKind::Eof) {
                self.bump();
            }
            self.expect(TokenKind::RBrace)?;
        }
        let dialect = match self.current().kind {
            TokenKind::Definitions => {
                self.bump();
                Dialect::Definitions
            }
            TokenKind::UpperIdent if self.text(self.current().span) == "PIB-DEFINITIONS" => {
                self.bump();
                Dialect::PibDefinitions
            }
            _ => {
                self.unexpected("expected DEFINITIONS or PIB-DEFINITIONS");
                return Err(Recover);
            }
        };
        self.expect(TokenKind::Assign)?;
        self.expect(TokenKind::Begin)?;
        Ok((name, dialect))
    }

    fn imports(&mut self, imports: &mut Vec<Import>) {
        let kw = self.bump();
        let mut symbols: Vec<Ident> = Vec::new();
        let mut arm_start = kw.span.end;
        loop {
            match self.current().kind {
                TokenKind::Semicolon => {
                    if !symbols.is_empty() {
                        self.unexpected("expected FROM before `;`");
                    }
                    self.bump();
                    return;
                }
                TokenKind::End | TokenKind::Eof => {
                    self.unexpected("unterminated IMPORTS clause");
                    return;
                }
                TokenKind::Comma => {
                    self.bump();
                }
                TokenKind::From => {
                    self.bump();
                    let Ok(module) = self.ident(false) else {
                        return;
                    };
                    let span = Span::new(arm_start, module.span.end);
                    imports.push(Import {
                        symbols: std::mem::take(&mut symbols),
                        module,
                        span,
                    });
                    arm_start = self.current().span.start;
                }
                kind if kind.is_ident_like() => {
                    if symbols.is_empty() {
                        arm_start = self.current().span.start;
                    }
                    let token = self.bump();
                    symbols.push(Ident::new(self.text(token.span), token.span));
                }
                _ => {
                    self.unexpected("expected imported symbol");
                    self.bump();
                }
            }
        }
    }

    // -- definitions ---------------------------------------------------

    fn definition(&mut self) -> ParseResult<Definition> {
        let current = self.current();
        let p1 = self.peek(1);
        let p2 = self.peek(2);

        if current.kind.is_ident_like() {
            if p1.kind == TokenKind::Macro {
                return self.macro_definition();
            }
            if p1.kind.is_macro_keyword() {
                return self.macro_invocation(p1.kind);
            }
            if p1.kind == TokenKind::Object && p2.kind == TokenKind::Identifier {
                return self.value_assignment();
            }
            if p1.kind == TokenKind::Assign {
                if p2.kind == TokenKind::TextualConvention {
                    return self.textual_convention();
                }
                return self.type_assignment();
            }
        }
        self.unexpected("expected definition");
        Err(Recover)
    }

    /// Skip forward to the next plausible definition start, END or EOF.
    fn recover_to_definition(&mut self) {
        loop {
            let current = self.current();
            let p1 = self.peek(1);
            let p2 = self.peek(2);
            match current.kind {
                TokenKind::End | TokenKind::Eof => return,
                kind if kind.is_ident_like()
                    && (p1.kind.is_macro_keyword()
                        || (p1.kind == TokenKind::Object && p2.kind == TokenKind::Identifier)) =>
                {
                    return;
                }
                TokenKind::UpperIdent
                    if matches!(
                        p1.kind,
                        TokenKind::Assign | TokenKind::TextualConvention | TokenKind::Macro
                    ) =>
                {
                    return;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn macro_definition(&mut self) -> ParseResult<Definition> {
        let name = self.ident(false)?;
        self.expect(TokenKind::Macro)?;
        // The lexer swallowed the body; only END comes back.
        let end = self.expect(TokenKind::End)?;
        Ok(Definition::MacroDefinition(MacroDef {
            span: name.span.join(end.span),
            name,
        }))
    }

    fn value_assignment(&mut self) -> ParseResult<Definition> {
        let name = self.ident(true)?;
        self.expect(TokenKind::Object)?;
        self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Assign)?;
        let oid = self.oid_value()?;
        Ok(Definition::ValueAssignment(ValueAssignmentDef {
            span: name.span.join(oid.span),
            name,
            oid,
        }))
    }

    fn type_assignment(&mut self) -> ParseResult<Definition> {
        let name = self.ident(false)?;
        self.expect(TokenKind::Assign)?;
        let mut tag = None;
        if self.eat(TokenKind::LBracket).is_some() {
            let class = match self.current().kind {
                TokenKind::Application => {
                    self.bump();
                    TagClass::Application
                }
                TokenKind::Universal => {
                    self.bump();
                    TagClass::Universal
                }
                _ => {
                    self.unexpected("expected APPLICATION or UNIVERSAL");
                    return Err(Recover);
                }
            };
            let number = self.expect(TokenKind::Number)?;
            let number = self.number_u32(number);
            self.expect(TokenKind::RBracket)?;
            tag = Some((class, number));
        }
        let implicit = self.eat(TokenKind::Implicit).is_some();
        let syntax = self.type_syntax()?;
        Ok(Definition::TypeAssignment(TypeAssignmentDef {
            span: name.span.join(syntax.span),
            name,
            tag,
            implicit,
            syntax,
        }))
    }

    fn macro_invocation(&mut self, kind: TokenKind) -> ParseResult<Definition> {
        let name = self.ident(true)?;
        self.bump(); // the macro keyword
        match kind {
            TokenKind::ObjectType => self.object_type(name),
            TokenKind::ModuleIdentity => self.module_identity(name),
            TokenKind::ObjectIdentity => self.object_identity(name),
            TokenKind::NotificationType => self.notification_type(name),
            TokenKind::TrapType => self.trap_type(name),
            TokenKind::ObjectGroup => self.object_group(name),
            TokenKind::NotificationGroup => self.notification_group(name),
            TokenKind::ModuleCompliance => self.module_compliance(name),
            TokenKind::AgentCapabilities => self.agent_capabilities(name),
            _ => unreachable!("dispatch guarantees a macro keyword"),
        }
    }

    /// Record `clause` as seen, reporting a repeat.
    fn claim(&mut self, seen: &mut ClauseSet, clause: ClauseSet, token: Token) {
        if seen.contains(clause) {
            let text = self.text(token.span);
            self.report(
                Severity::Error,
                codes::DUPLICATE_CLAUSE,
                token.span,
                format!("repeated {text} clause"),
            );
        }
        seen.insert(clause);
    }

    fn object_type(&mut self, name: Ident) -> ParseResult<Definition> {
        let mut def = ObjectTypeDef {
            span: name.span,
            name,
            syntax: None,
            units: None,
            access: None,
            status: None,
            description: None,
            reference: None,
            index: None,
            augments: None,
            defval: None,
            oid: OidValue {
                components: Vec::new(),
                span: Span::empty(0),
            },
        };
        let mut seen = ClauseSet::empty();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Syntax => {
                    self.claim(&mut seen, ClauseSet::SYNTAX, token);
                    self.bump();
                    def.syntax = Some(self.type_syntax()?);
                }
                TokenKind::Units => {
                    self.claim(&mut seen, ClauseSet::UNITS, token);
                    self.bump();
                    def.units = Some(self.quoted()?);
                }
                TokenKind::MaxAccess | TokenKind::Access => {
                    self.claim(&mut seen, ClauseSet::ACCESS, token);
                    self.bump();
                    def.access = Some(self.access_clause()?);
                }
                TokenKind::Status => {
                    self.claim(&mut seen, ClauseSet::STATUS, token);
                    self.bump();
                    def.status = Some(self.status_clause()?);
                }
                TokenKind::Description => {
                    self.claim(&mut seen, ClauseSet::DESCRIPTION, token);
                    self.bump();
                    def.description = Some(self.quoted()?);
                }
                TokenKind::Reference => {
                    self.claim(&mut seen, ClauseSet::REFERENCE, token);
                    self.bump();
                    def.reference = Some(self.quoted()?);
                }
                TokenKind::Index => {
                    self.claim(&mut seen, ClauseSet::INDEX, token);
                    self.bump();
                    def.index = Some(self.index_clause(token.span)?);
                }
                TokenKind::Augments => {
                    self.claim(&mut seen, ClauseSet::AUGMENTS, token);
                    self.bump();
                    self.expect(TokenKind::LBrace)?;
                    def.augments = Some(self.ident(true)?);
                    self.expect(TokenKind::RBrace)?;
                }
                TokenKind::Defval => {
                    self.claim(&mut seen, ClauseSet::DEFVAL, token);
                    def.defval = Some(self.defval()?);
                }
                TokenKind::Assign => break,
                _ => {
                    self.unexpected("expected OBJECT-TYPE clause or `::=`");
                    return Err(Recover);
                }
            }
        }
        self.expect(TokenKind::Assign)?;
        def.oid = self.oid_value()?;
        def.span = def.span.join(def.oid.span);
        Ok(Definition::ObjectType(def))
    }

    fn module_identity(&mut self, name: Ident) -> ParseResult<Definition> {
        let mut def = ModuleIdentityDef {
            span: name.span,
            name,
            last_updated: None,
            organization: None,
            contact_info: None,
            description: None,
            revisions: Vec::new(),
            oid: OidValue {
                components: Vec::new(),
                span: Span::empty(0),
            },
        };
        let mut seen = ClauseSet::empty();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::LastUpdated => {
                    self.claim(&mut seen, ClauseSet::LAST_UPDATED, token);
                    self.bump();
                    def.last_updated = Some(self.quoted()?);
                }
                TokenKind::Organization => {
                    self.claim(&mut seen, ClauseSet::ORGANIZATION, token);
                    self.bump();
                    def.organization = Some(self.quoted()?);
                }
                TokenKind::ContactInfo => {
                    self.claim(&mut seen, ClauseSet::CONTACT_INFO, token);
                    self.bump();
                    def.contact_info = Some(self.quoted()?);
                }
                TokenKind::Description => {
                    self.claim(&mut seen, ClauseSet::DESCRIPTION, token);
                    self.bump();
                    def.description = Some(self.quoted()?);
                }
                TokenKind::Revision => {
                    self.bump();
                    let date = self.quoted()?;
                    let mut description = None;
                    if self.at(TokenKind::Description) {
                        self.bump();
                        description = Some(self.quoted()?);
                    }
                    let span = token.span.join(
                        description
                            .as_ref()
                            .map(|d| d.span)
                            .unwrap_or(date.span),
                    );
                    def.revisions.push(Revision {
                        date,
                        description,
                        span,
                    });
                }
                TokenKind::Assign => break,
                _ => {
                    self.unexpected("expected MODULE-IDENTITY clause or `::=`");
                    return Err(Recover);
                }
            }
        }
        self.expect(TokenKind::Assign)?;
        def.oid = self.oid_value()?;
        def.span = def.span.join(def.oid.span);
        Ok(Definition::ModuleIdentity(def))
    }

    fn object_identity(&mut self, name: Ident) -> ParseResult<Definition> {
        let mut def = ObjectIdentityDef {
            span: name.span,
            name,
            status: None,
            description: None,
            reference: None,
            oid: OidValue {
                components: Vec::new(),
                span: Span::empty(0),
            },
        };
        let mut seen = ClauseSet::empty();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Status => {
                    self.claim(&mut seen, ClauseSet::STATUS, token);
                    self.bump();
                    def.status = Some(self.status_clause()?);
                }
                TokenKind::Description => {
                    self.claim(&mut seen, ClauseSet::DESCRIPTION, token);
                    self.bump();
                    def.description = Some(self.quoted()?);
                }
                TokenKind::Reference => {
                    self.claim(&mut seen, ClauseSet::REFERENCE, token);
                    self.bump();
                    def.reference = Some(self.quoted()?);
                }
                TokenKind::Assign => break,
                _ => {
                    self.unexpected("expected OBJECT-IDENTITY clause or `::=`");
                    return Err(Recover);
                }
            }
        }
        self.expect(TokenKind::Assign)?;
        def.oid = self.oid_value()?;
        def.span = def.span.join(def.oid.span);
        Ok(Definition::ObjectIdentity(def))
    }

    fn notification_type(&mut self, name: Ident) -> ParseResult<Definition> {
        let mut def = NotificationTypeDef {
            span: name.span,
            name,
            objects: Vec::new(),
            status: None,
            description: None,
            reference: None,
            oid: OidValue {
                components: Vec::new(),
                span: Span::empty(0),
            },
        };
        let mut seen = ClauseSet::empty();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Objects => {
                    self.claim(&mut seen, ClauseSet::OBJECTS, token);
                    self.bump();
                    def.objects = self.name_list()?;
                }
                TokenKind::Status => {
                    self.claim(&mut seen, ClauseSet::STATUS, token);
                    self.bump();
                    def.status = Some(self.status_clause()?);
                }
                TokenKind::Description => {
                    self.claim(&mut seen, ClauseSet::DESCRIPTION, token);
                    self.bump();
                    def.description = Some(self.quoted()?);
                }
                TokenKind::Reference => {
                    self.claim(&mut seen, ClauseSet::REFERENCE, token);
                    self.bump();
                    def.reference = Some(self.quoted()?);
                }
                TokenKind::Assign => break,
                _ => {
                    self.unexpected("expected NOTIFICATION-TYPE clause or `::=`");
                    return Err(Recover);
                }
            }
        }
        self.expect(TokenKind::Assign)?;
        def.oid = self.oid_value()?;
        def.span = def.span.join(def.oid.span);
        Ok(Definition::NotificationType(def))
    }

    fn trap_type(&mut self, name: Ident) -> ParseResult<Definition> {
        let mut def = TrapTypeDef {
            span: name.span,
            name,
            enterprise: None,
            variables: Vec::new(),
            description: None,
            reference: None,
            number: 0,
        };
        let mut seen = ClauseSet::empty();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Enterprise => {
                    self.claim(&mut seen, ClauseSet::ENTERPRISE, token);
                    self.bump();
                    def.enterprise = Some(if self.at(TokenKind::LBrace) {
                        EnterpriseClause::Oid(self.oid_value()?)
                    } else {
                        EnterpriseClause::Name(self.ident(true)?)
                    });
                }
                TokenKind::Variables => {
                    self.claim(&mut seen, ClauseSet::VARIABLES, token);
                    self.bump();
                    def.variables = self.name_list()?;
                }
                TokenKind::Description => {
                    self.claim(&mut seen, ClauseSet::DESCRIPTION, token);
                    self.bump();
                    def.description = Some(self.quoted()?);
                }
                TokenKind::Reference => {
                    self.claim(&mut seen, ClauseSet::REFERENCE, token);
                    self.bump();
                    def.reference = Some(self.quoted()?);
                }
                TokenKind::Assign => break,
                _ => {
                    self.unexpected("expected TRAP-TYPE clause or `::=`");
                    return Err(Recover);
                }
            }
        }
        self.expect(TokenKind::Assign)?;
        let number = self.expect(TokenKind::Number)?;
        def.number = self.number_u32(number);
        def.span = def.span.join(number.span);
        Ok(Definition::TrapType(def))
    }

    fn object_group(&mut self, name: Ident) -> ParseResult<Definition> {
        let mut def = ObjectGroupDef {
            span: name.span,
            name,
            objects: Vec::new(),
            status: None,
            description: None,
            reference: None,
            oid: OidValue {
                components: Vec::new(),
                span: Span::empty(0),
            },
        };
        let mut seen = ClauseSet::empty();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Objects => {
                    self.claim(&mut seen, ClauseSet::OBJECTS, token);
                    self.bump();
                    def.objects = self.name_list()?;
                }
                TokenKind::Status => {
                    self.claim(&mut seen, ClauseSet::STATUS, token);
                    self.bump();
                    def.status = Some(self.status_clause()?);
                }
                TokenKind::Description => {
                    self.claim(&mut seen, ClauseSet::DESCRIPTION, token);
                    self.bump();
                    def.description = Some(self.quoted()?);
                }
                TokenKind::Reference => {
                    self.claim(&mut seen, ClauseSet::REFERENCE, token);
                    self.bump();
                    def.reference = Some(self.quoted()?);
                }
                TokenKind::Assign => break,
                _ => {
                    self.unexpected("expected OBJECT-GROUP clause or `::=`");
                    return Err(Recover);
                }
            }
        }
        self.expect(TokenKind::Assign)?;
        def.oid = self.oid_value()?;
        def.span = def.span.join(def.oid.span);
        Ok(Definition::ObjectGroup(def))
    }

    fn notification_group(&mut self, name: Ident) -> ParseResult<Definition> {
        let mut def = NotificationGroupDef {
            span: name.span,
            name,
            notifications: Vec::new(),
            status: None,
            description: None,
            reference: None,
            oid: OidValue {
                components: Vec::new(),
                span: Span::empty(0),
            },
        };
        let mut seen = ClauseSet::empty();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Notifications => {
                    self.claim(&mut seen, ClauseSet::NOTIFICATIONS, token);
                    self.bump();
                    def.notifications = self.name_list()?;
                }
                TokenKind::Status => {
                    self.claim(&mut seen, ClauseSet::STATUS, token);
                    self.bump();
                    def.status = Some(self.status_clause()?);
                }
                TokenKind::Description => {
                    self.claim(&mut seen, ClauseSet::DESCRIPTION, token);
                    self.bump();
                    def.description = Some(self.quoted()?);
                }
                TokenKind::Reference => {
                    self.claim(&mut seen, ClauseSet::REFERENCE, token);
                    self.bump();
                    def.reference = Some(self.quoted()?);
                }
                TokenKind::Assign => break,
                _ => {
                    self.unexpected("expected NOTIFICATION-GROUP clause or `::=`");
                    return Err(Recover);
                }
            }
        }
        self.expect(TokenKind::Assign)?;
        def.oid = self.oid_value()?;
        def.span = def.span.join(def.oid.span);
        Ok(Definition::NotificationGroup(def))
    }

    fn module_compliance(&mut self, name: Ident) -> ParseResult<Definition> {
        let mut def = ModuleComplianceDef {
            span: name.span,
            name,
            status: None,
            description: None,
            reference: None,
            modules: Vec::new(),
            oid: OidValue {
                components: Vec::new(),
                span: Span::empty(0),
            },
        };
        let mut seen = ClauseSet::empty();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Status => {
                    self.claim(&mut seen, ClauseSet::STATUS, token);
                    self.bump();
                    def.status = Some(self.status_clause()?);
                }
                TokenKind::Description => {
                    self.claim(&mut seen, ClauseSet::DESCRIPTION, token);
                    self.bump();
                    def.description = Some(self.quoted()?);
                }
                TokenKind::Reference => {
                    self.claim(&mut seen, ClauseSet::REFERENCE, token);
                    self.bump();
                    def.reference = Some(self.quoted()?);
                }
                TokenKind::Module => {
                    def.modules.push(self.compliance_module(token.span)?);
                }
                TokenKind::Assign => break,
                _ => {
                    self.unexpected("expected MODULE-COMPLIANCE clause or `::=`");
                    return Err(Recover);
                }
            }
        }
        self.expect(TokenKind::Assign)?;
        def.oid = self.oid_value()?;
        def.span = def.span.join(def.oid.span);
        Ok(Definition::ModuleCompliance(def))
    }

    fn compliance_module(&mut self, start: Span) -> ParseResult<ComplianceModule> {
        self.bump(); // MODULE
        let mut arm = ComplianceModule {
            module: None,
            mandatory_groups: Vec::new(),
            items: Vec::new(),
            span: start,
        };
        // `MODULE` alone refers to this module; a following uppercase
        // identifier names another one.
        if self.at(TokenKind::UpperIdent) {
            arm.module = Some(self.ident(false)?);
        }
        let mut seen = ClauseSet::empty();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::MandatoryGroups => {
                    self.claim(&mut seen, ClauseSet::MANDATORY_GROUPS, token);
                    self.bump();
                    arm.mandatory_groups = self.name_list()?;
                }
                TokenKind::Group => {
                    self.bump();
                    let name = self.ident(true)?;
                    let mut description = None;
                    if self.at(TokenKind::Description) {
                        self.bump();
                        description = Some(self.quoted()?);
                    }
                    let span = token.span.join(
                        description
                            .as_ref()
                            .map(|d| d.span)
                            .unwrap_or(name.span),
                    );
                    arm.items.push(ComplianceItem::Group {
                        name,
                        description,
                        span,
                    });
                }
                TokenKind::Object => {
                    arm.items.push(self.compliance_object(token.span)?);
                }
                _ => break,
            }
        }
        arm.span = start.join(Span::empty(self.last_end));
        Ok(arm)
    }

    fn compliance_object(&mut self, start: Span) -> ParseResult<ComplianceItem> {
        self.bump(); // OBJECT
        let name = self.ident(true)?;
        let mut syntax = None;
        let mut write_syntax = None;
        let mut min_access = None;
        let mut description = None;
        let mut seen = ClauseSet::empty();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Syntax => {
                    self.claim(&mut seen, ClauseSet::SYNTAX, token);
                    self.bump();
                    syntax = Some(self.type_syntax()?);
                }
                TokenKind::WriteSyntax => {
                    self.claim(&mut seen, ClauseSet::WRITE_SYNTAX, token);
                    self.bump();
                    write_syntax = Some(self.type_syntax()?);
                }
                TokenKind::MinAccess => {
                    self.claim(&mut seen, ClauseSet::MIN_ACCESS, token);
                    self.bump();
                    min_access = Some(self.access_clause()?);
                }
                TokenKind::Description => {
                    self.claim(&mut seen, ClauseSet::DESCRIPTION, token);
                    self.bump();
                    description = Some(self.quoted()?);
                }
                _ => break,
            }
        }
        Ok(ComplianceItem::Object {
            span: start.join(Span::empty(self.last_end)),
            name,
            syntax,
            write_syntax,
            min_access,
            description,
        })
    }

    fn agent_capabilities(&mut self, name: Ident) -> ParseResult<Definition> {
        let mut def = AgentCapabilitiesDef {
            span: name.span,
            name,
            product_release: None,
            status: None,
            description: None,
            reference: None,
            supports: Vec::new(),
            oid: OidValue {
                components: Vec::new(),
                span: Span::empty(0),
            },
        };
        let mut seen = ClauseSet::empty();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::ProductRelease => {
                    self.claim(&mut seen, ClauseSet::PRODUCT_RELEASE, token);
                    self.bump();
                    def.product_release = Some(self.quoted()?);
                }
                TokenKind::Status => {
                    self.claim(&mut seen, ClauseSet::STATUS, token);
                    self.bump();
                    def.status = Some(self.status_clause()?);
                }
                TokenKind::Description => {
                    self.claim(&mut seen, ClauseSet::DESCRIPTION, token);
                    self.bump();
                    def.description = Some(self.quoted()?);
                }
                TokenKind::Reference => {
                    self.claim(&mut seen, ClauseSet::REFERENCE, token);
                    self.bump();
                    def.reference = Some(self.quoted()?);
                }
                TokenKind::Supports => {
                    def.supports.push(self.supports_clause(token.span)?);
                }
                TokenKind::Assign => break,
                _ => {
                    self.unexpected("expected AGENT-CAPABILITIES clause or `::=`");
                    return Err(Recover);
                }
            }
        }
        self.expect(TokenKind::Assign)?;
        def.oid = self.oid_value()?;
        def.span = def.span.join(def.oid.span);
        Ok(Definition::AgentCapabilities(def))
    }

    fn supports_clause(&mut self, start: Span) -> ParseResult<SupportsClause> {
        self.bump(); // SUPPORTS
        let module = self.ident(false)?;
        let mut includes = Vec::new();
        if self.at(TokenKind::Includes) {
            self.bump();
            includes = self.name_list()?;
        }
        let mut variations = Vec::new();
        while self.at(TokenKind::Variation) {
            variations.push(self.variation()?);
        }
        Ok(SupportsClause {
            span: start.join(Span::empty(self.last_end)),
            module,
            includes,
            variations,
        })
    }

    fn variation(&mut self) -> ParseResult<Variation> {
        let start = self.bump().span; // VARIATION
        let name = self.ident(true)?;
        let mut variation = Variation {
            span: start,
            name,
            syntax: None,
            write_syntax: None,
            access: None,
            creation_requires: Vec::new(),
            defval: None,
            description: None,
        };
        let mut seen = ClauseSet::empty();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Syntax => {
                    self.claim(&mut seen, ClauseSet::SYNTAX, token);
                    self.bump();
                    variation.syntax = Some(self.type_syntax()?);
                }
                TokenKind::WriteSyntax => {
                    self.claim(&mut seen, ClauseSet::WRITE_SYNTAX, token);
                    self.bump();
                    variation.write_syntax = Some(self.type_syntax()?);
                }
                TokenKind::Access => {
                    self.claim(&mut seen, ClauseSet::ACCESS, token);
                    self.bump();
                    variation.access = Some(self.access_clause()?);
                }
                TokenKind::CreationRequires => {
                    self.claim(&mut seen, ClauseSet::CREATION_REQUIRES, token);
                    self.bump();
                    variation.creation_requires = self.name_list()?;
                }
                TokenKind::Defval => {
                    self.claim(&mut seen, ClauseSet::DEFVAL, token);
                    variation.defval = Some(self.defval()?);
                }
                TokenKind::Description => {
                    self.claim(&mut seen, ClauseSet::DESCRIPTION, token);
                    self.bump();
                    variation.description = Some(self.quoted()?);
                }
                _ => break,
            }
        }
        variation.span = start.join(Span::empty(self.last_end));
        Ok(variation)
    }

    fn textual_convention(&mut self) -> ParseResult<Definition> {
        let name = self.ident(false)?;
        self.expect(TokenKind::Assign)?;
        self.expect(TokenKind::TextualConvention)?;
        let mut def = TextualConventionDef {
            span: name.span,
            name,
            display_hint: None,
            status: None,
            description: None,
            reference: None,
            syntax: None,
        };
        let mut seen = ClauseSet::empty();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::DisplayHint => {
                    self.claim(&mut seen, ClauseSet::DISPLAY_HINT, token);
                    self.bump();
                    def.display_hint = Some(self.quoted()?);
                }
                TokenKind::Status => {
                    self.claim(&mut seen, ClauseSet::STATUS, token);
                    self.bump();
                    def.status = Some(self.status_clause()?);
                }
                TokenKind::Description => {
                    self.claim(&mut seen, ClauseSet::DESCRIPTION, token);
                    self.bump();
                    def.description = Some(self.quoted()?);
                }
                TokenKind::Reference => {
                    self.claim(&mut seen, ClauseSet::REFERENCE, token);
                    self.bump();
                    def.reference = Some(self.quoted()?);
                }
                TokenKind::Syntax => {
                    self.claim(&mut seen, ClauseSet::SYNTAX, token);
                    self.bump();
                    def.syntax = Some(self.type_syntax()?);
                    break;
                }
                _ => {
                    self.unexpected("expected TEXTUAL-CONVENTION clause");
                    return Err(Recover);
                }
            }
        }
        def.span = def.span.join(Span::empty(self.last_end));
        Ok(Definition::TextualConvention(def))
    }

    // -- shared sub-productions ----------------------------------------

    fn status_clause(&mut self) -> ParseResult<StatusClause> {
        let token = self.current();
        let value = match token.kind {
            TokenKind::Current => Status::Current,
            TokenKind::Deprecated => Status::Deprecated,
            TokenKind::Obsolete => Status::Obsolete,
            TokenKind::Mandatory => Status::Mandatory,
            TokenKind::Optional => Status::Optional,
            _ => {
                self.unexpected("expected status value");
                return Err(Recover);
            }
        };
        self.bump();
        Ok(StatusClause {
            value,
            span: token.span,
        })
    }

    fn access_clause(&mut self) -> ParseResult<AccessClause> {
        let token = self.current();
        let value = match token.kind {
            TokenKind::ReadOnly => Access::ReadOnly,
            TokenKind::ReadWrite => Access::ReadWrite,
            TokenKind::ReadCreate => Access::ReadCreate,
            TokenKind::NotAccessible => Access::NotAccessible,
            TokenKind::AccessibleForNotify => Access::AccessibleForNotify,
            TokenKind::WriteOnly => Access::WriteOnly,
            TokenKind::NotImplemented => Access::NotImplemented,
            // SPPI access values are ordinary lowercase identifiers
            TokenKind::LowerIdent => match self.text(token.span).as_str() {
                "install" => Access::Install,
                "install-notify" => Access::InstallNotify,
                "report-only" => Access::ReportOnly,
                _ => {
                    self.unexpected("expected access value");
                    return Err(Recover);
                }
            },
            _ => {
                self.unexpected("expected access value");
                return Err(Recover);
            }
        };
        self.bump();
        Ok(AccessClause {
            value,
            span: token.span,
        })
    }

    /// `{ name, name, ... }`
    fn name_list(&mut self) -> ParseResult<Vec<Ident>> {
        self.expect(TokenKind::LBrace)?;
        let mut names = Vec::new();
        if !self.at(TokenKind::RBrace) {
            loop {
                names.push(self.ident(true)?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(names)
    }

    fn index_clause(&mut self, start: Span) -> ParseResult<IndexClause> {
        self.expect(TokenKind::LBrace)?;
        let mut items = Vec::new();
        loop {
            let implied = self.eat(TokenKind::Implied).is_some();
            // Vendor idiom: a bare `OCTET STRING` as an index item.
            if self.at(TokenKind::Octet) && self.peek(1).kind == TokenKind::String {
                let first = self.bump();
                let second = self.bump();
                items.push(IndexItem {
                    implied,
                    name: Ident::new("OCTET STRING", first.span.join(second.span)),
                });
            } else {
                items.push(IndexItem {
                    implied,
                    name: self.ident(true)?,
                });
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        let end = self.expect(TokenKind::RBrace)?;
        Ok(IndexClause {
            items,
            span: start.join(end.span),
        })
    }

    fn oid_value(&mut self) -> ParseResult<OidValue> {
        let open = self.expect(TokenKind::LBrace)?;
        let mut components = Vec::new();
        while !self.at(TokenKind::RBrace) {
            components.push(self.oid_component()?);
        }
        let close = self.bump();
        Ok(OidValue {
            components,
            span: open.span.join(close.span),
        })
    }

    fn oid_component(&mut self) -> ParseResult<OidComponent> {
        let token = self.current();
        match token.kind {
            TokenKind::Number => {
                self.bump();
                let value = self.number_u32(token);
                Ok(OidComponent {
                    kind: OidComponentKind::Number(value),
                    span: token.span,
                })
            }
            TokenKind::NegNumber => {
                self.bump();
                self.report(
                    Severity::Error,
                    codes::INVALID_U32,
                    token.span,
                    "OID sub-identifiers cannot be negative".into(),
                );
                Ok(OidComponent {
                    kind: OidComponentKind::Number(0),
                    span: token.span,
                })
            }
            kind if kind.is_ident_like() => {
                let first = self.ident(false)?;
                // `Module.name` or `Module.name(number)`
                if self.eat(TokenKind::Dot).is_some() {
                    let name = self.ident(false)?;
                    if let Some((number, end)) = self.paren_number()? {
                        return Ok(OidComponent {
                            span: first.span.join(end),
                            kind: OidComponentKind::QualifiedNamedNumber(first, name, number),
                        });
                    }
                    return Ok(OidComponent {
                        span: first.span.join(name.span),
                        kind: OidComponentKind::QualifiedName(first, name),
                    });
                }
                if let Some((number, end)) = self.paren_number()? {
                    return Ok(OidComponent {
                        span: first.span.join(end),
                        kind: OidComponentKind::NamedNumber(first, number),
                    });
                }
                Ok(OidComponent {
                    span: first.span,
                    kind: OidComponentKind::Name(first),
                })
            }
            _ => {
                self.unexpected("expected OID component");
                Err(Recover)
            }
        }
    }

    /// Optional `(number)` suffix of an OID component.
    fn paren_number(&mut self) -> ParseResult<Option<(u32, Span)>> {
        if !self.at(TokenKind::LParen) {
            return Ok(None);
        }
        self.bump();
        let number = self.expect(TokenKind::Number)?;
        let value = self.number_u32(number);
        let close = self.expect(TokenKind::RParen)?;
        Ok(Some((value, close.span)))
    }

    // -- type syntax ---------------------------------------------------

    fn type_syntax(&mut self) -> ParseResult<TypeSyntax> {
        let token = self.current();
        let mut syntax = match token.kind {
            TokenKind::Integer => {
                self.bump();
                if self.at(TokenKind::LBrace) {
                    let (named, end) = self.named_numbers()?;
                    TypeSyntax {
                        kind: TypeSyntaxKind::IntegerEnum(named),
                        span: token.span.join(end),
                    }
                } else {
                    TypeSyntax {
                        kind: TypeSyntaxKind::TypeRef(Ident::new("INTEGER", token.span)),
                        span: token.span,
                    }
                }
            }
            TokenKind::Bits => {
                self.bump();
                if self.at(TokenKind::LBrace) {
                    let (named, end) = self.named_numbers()?;
                    TypeSyntax {
                        kind: TypeSyntaxKind::Bits(named),
                        span: token.span.join(end),
                    }
                } else {
                    TypeSyntax {
                        kind: TypeSyntaxKind::TypeRef(Ident::new("BITS", token.span)),
                        span: token.span,
                    }
                }
            }
            TokenKind::Octet => {
                self.bump();
                let second = self.expect(TokenKind::String)?;
                TypeSyntax {
                    kind: TypeSyntaxKind::OctetString,
                    span: token.span.join(second.span),
                }
            }
            TokenKind::Object => {
                self.bump();
                let second = self.expect(TokenKind::Identifier)?;
                TypeSyntax {
                    kind: TypeSyntaxKind::ObjectIdentifier,
                    span: token.span.join(second.span),
                }
            }
            TokenKind::Sequence => {
                self.bump();
                if self.eat(TokenKind::Of).is_some() {
                    let entry = self.ident(false)?;
                    TypeSyntax {
                        span: token.span.join(entry.span),
                        kind: TypeSyntaxKind::SequenceOf(entry),
                    }
                } else {
                    let (fields, end) = self.field_list()?;
                    TypeSyntax {
                        kind: TypeSyntaxKind::Sequence(fields),
                        span: token.span.join(end),
                    }
                }
            }
            TokenKind::Choice => {
                self.bump();
                let (fields, end) = self.field_list()?;
                TypeSyntax {
                    kind: TypeSyntaxKind::Choice(fields),
                    span: token.span.join(end),
                }
            }
            // Named base types keep their spelling as a reference and
            // are resolved against the builtin set later.
            TokenKind::Integer32
            | TokenKind::Unsigned32
            | TokenKind::Counter
            | TokenKind::Counter32
            | TokenKind::Counter64
            | TokenKind::Gauge
            | TokenKind::Gauge32
            | TokenKind::TimeTicks
            | TokenKind::IpAddress
            | TokenKind::NetworkAddress
            | TokenKind::Opaque => {
                self.bump();
                TypeSyntax {
                    kind: TypeSyntaxKind::TypeRef(Ident::new(self.text(token.span), token.span)),
                    span: token.span,
                }
            }
            TokenKind::UpperIdent | TokenKind::LowerIdent => {
                let name = self.ident(false)?;
                TypeSyntax {
                    span: name.span,
                    kind: TypeSyntaxKind::TypeRef(name),
                }
            }
            _ => {
                self.unexpected("expected type syntax");
                return Err(Recover);
            }
        };
        if self.at(TokenKind::LParen) {
            let constraint = self.constraint()?;
            syntax = TypeSyntax {
                span: syntax.span.join(constraint.span),
                kind: TypeSyntaxKind::Constrained(Box::new(syntax), constraint),
            };
        }
        Ok(syntax)
    }

    /// `{ name Type, ... }` of a SEQUENCE or CHOICE.
    fn field_list(&mut self) -> ParseResult<(Vec<SequenceField>, Span)> {
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        if !self.at(TokenKind::RBrace) {
            loop {
                let name = self.ident(true)?;
                let syntax = self.type_syntax()?;
                fields.push(SequenceField {
                    span: name.span.join(syntax.span),
                    name,
                    syntax,
                });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        let close = self.expect(TokenKind::RBrace)?;
        Ok((fields, close.span))
    }

    /// `{ name(value), ... }` of an INTEGER enumeration or BITS list.
    fn named_numbers(&mut self) -> ParseResult<(Vec<NamedNumber>, Span)> {
        self.expect(TokenKind::LBrace)?;
        let mut named = Vec::new();
        if !self.at(TokenKind::RBrace) {
            loop {
                let name = self.ident(true)?;
                self.expect(TokenKind::LParen)?;
                let token = self.current();
                let value = match token.kind {
                    TokenKind::Number | TokenKind::NegNumber => {
                        self.bump();
                        self.number_i64(token)
                    }
                    _ => {
                        self.unexpected("expected named number value");
                        return Err(Recover);
                    }
                };
                let close = self.expect(TokenKind::RParen)?;
                named.push(NamedNumber {
                    span: name.span.join(close.span),
                    name,
                    value,
                });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        let close = self.expect(TokenKind::RBrace)?;
        Ok((named, close.span))
    }

    fn constraint(&mut self) -> ParseResult<Constraint> {
        let open = self.expect(TokenKind::LParen)?;
        if self.at(TokenKind::Size) {
            self.bump();
            self.expect(TokenKind::LParen)?;
            let ranges = self.range_list()?;
            self.expect(TokenKind::RParen)?;
            let close = self.expect(TokenKind::RParen)?;
            return Ok(Constraint {
                kind: ConstraintKind::Size,
                ranges,
                span: open.span.join(close.span),
            });
        }
        let ranges = self.range_list()?;
        let close = self.expect(TokenKind::RParen)?;
        Ok(Constraint {
            kind: ConstraintKind::Value,
            ranges,
            span: open.span.join(close.span),
        })
    }

    fn range_list(&mut self) -> ParseResult<Vec<RangeSpec>> {
        let mut ranges = Vec::new();
        loop {
            let start = self.current().span;
            let min = self.range_endpoint()?;
            let mut max = None;
            if self.eat(TokenKind::DotDot).is_some() {
                max = Some(self.range_endpoint()?);
            }
            ranges.push(RangeSpec {
                min,
                max,
                span: Span::new(start.start, self.last_end),
            });
            if self.eat(TokenKind::Pipe).is_none() {
                break;
            }
        }
        Ok(ranges)
    }

    // -- DEFVAL --------------------------------------------------------

    fn defval(&mut self) -> ParseResult<DefVal> {
        let kw = self.bump(); // DEFVAL
        self.expect(TokenKind::LBrace)?;
        let content = self.defval_content();
        if !self.at(TokenKind::RBrace) {
            // Whatever is left was not understood; keep the clause with
            // its span and move past it.
            self.skip_balanced();
            let span = kw.span.join(Span::empty(self.last_end));
            return Ok(DefVal {
                content: DefValContent::Unparsed,
                span,
            });
        }
        let close = self.bump();
        let content = content.unwrap_or(DefValContent::Unparsed);
        Ok(DefVal {
            content,
            span: kw.span.join(close.span),
        })
    }

    /// Disambiguate DEFVAL content by its first token. `None` means the
    /// content could not be interpreted.
    fn defval_content(&mut self) -> Option<DefValContent> {
        let token = self.current();
        match token.kind {
            TokenKind::Number => {
                self.bump();
                let text = self.text(token.span);
                if let Ok(v) = text.parse::<u64>() {
                    Some(DefValContent::Unsigned(v))
                } else {
                    self.report(
                        Severity::Error,
                        codes::INVALID_I64,
                        token.span,
                        format!("default value `{text}` is out of range"),
                    );
                    None
                }
            }
            TokenKind::NegNumber => {
                self.bump();
                let value = self.number_i64(token);
                Some(DefValContent::Integer(value))
            }
            TokenKind::QuotedString => {
                let text = self.quoted().ok()?;
                Some(DefValContent::Text(text.value))
            }
            TokenKind::HexString => {
                self.bump();
                let digits = self.hex_digits(token);
                Some(DefValContent::Hex(digits))
            }
            TokenKind::BinString => {
                self.bump();
                let digits = self.hex_digits(token);
                Some(DefValContent::Binary(digits))
            }
            TokenKind::LBrace => {
                // Nested braces: a BITS label set when the first inner
                // identifier is followed by `,` or `}`, else an OID value.
                let p1 = self.peek(1);
                let p2 = self.peek(2);
                if p1.kind == TokenKind::RBrace {
                    self.bump();
                    self.bump();
                    return Some(DefValContent::Bits(Vec::new()));
                }
                if p1.kind.is_ident_like()
                    && matches!(p2.kind, TokenKind::Comma | TokenKind::RBrace)
                {
                    self.bump();
                    let mut labels = Vec::new();
                    loop {
                        let label = self.ident(true).ok()?;
                        labels.push(label.name);
                        if self.eat(TokenKind::Comma).is_none() {
                            break;
                        }
                    }
                    self.expect(TokenKind::RBrace).ok()?;
                    return Some(DefValContent::Bits(labels));
                }
                let oid = self.oid_value().ok()?;
                Some(DefValContent::Oid(oid))
            }
            kind if kind.is_ident_like() => {
                let ident = self.ident(false).ok()?;
                Some(DefValContent::Ident(ident.name))
            }
            _ => None,
        }
    }

    /// Consume up to and including the `}` matching an already-consumed
    /// `{`, tolerating nesting. Stops at END/EOF.
    fn skip_balanced(&mut self) {
        let mut depth = 1usize;
        loop {
            match self.current().kind {
                TokenKind::LBrace => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::RBrace => {
                    depth -= 1;
                    self.bump();
                    if depth == 0 {
                        return;
                    }
                }
                TokenKind::End | TokenKind::Eof => return,
                _ => {
                    self.bump();
                }
            }
        }
    }
}

#[test]
fn test_minimal_module() {
    let module = Parser::new(b"TEST-MIB DEFINITIONS ::= BEGIN END").parse_module();
    assert_eq!("TEST-MIB", module.name.name);
    assert_eq!(Dialect::Definitions, module.dialect);
    assert!(module.imports.is_empty());
    assert!(module.body.is_empty());
    assert!(module.diagnostics.is_empty());
}

#[test]
fn test_never_fails() {
    for source in [
        &b""[..],
        &b"garbage ] ] ::= }"[..],
        &b"MIB DEFINITIONS ::="[..],
        &b"MIB DEFINITIONS ::= BEGIN x OBJECT-TYPE END"[..],
        &b"\xc0\xc1 \xf5"[..],
    ] {
        let module = Parser::new(source).parse_module();
        assert!(module.span.end >= module.span.start);
    }
}

#[test]
fn test_unknown_module_name() {
    let module = Parser::new(b"::= BEGIN END").parse_module();
    assert_eq!(UNKNOWN_MODULE, module.name.name);
    assert!(
        module
            .diagnostics
            .iter()
            .any(|d| d.code == codes::PARSE_ERROR)
    );
}
