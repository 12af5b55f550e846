use std::fmt;

use crate::span::Span;

/// One lexed token: a kind plus the byte span it covers.
///
/// Tokens carry no text of their own; slice the source buffer with the
/// span to recover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The spanned source bytes.
    #[must_use]
    pub fn text<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        self.span.slice(source)
    }
}

/// Closed enumeration of token categories.
///
/// Keywords get one variant each; the tables in
/// [`schema::keywords`](crate::schema::keywords) map spellings to kinds.
/// Reserved ASN.1 words that SMI forbids lex to the [`ForbiddenKeyword`]
/// sentinel without a diagnostic; the parser decides severity in context.
///
/// [`ForbiddenKeyword`]: TokenKind::ForbiddenKeyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Pipe,
    Minus,

    // Multi-character operators
    /// `..`
    DotDot,
    /// `::=`
    Assign,

    // Identifier classes
    UpperIdent,
    LowerIdent,

    // Literal classes
    Number,
    NegNumber,
    QuotedString,
    /// `'...'H`
    HexString,
    /// `'...'B`
    BinString,

    // Structural keywords
    Begin,
    Definitions,
    End,
    Exports,
    From,
    Imports,
    Macro,

    // Clause keywords
    Access,
    Augments,
    ContactInfo,
    CreationRequires,
    Defval,
    Description,
    DisplayHint,
    Enterprise,
    Group,
    Implied,
    Includes,
    Index,
    LastUpdated,
    MandatoryGroups,
    MaxAccess,
    MinAccess,
    Module,
    Notifications,
    Objects,
    Organization,
    ProductRelease,
    Reference,
    Revision,
    Status,
    Supports,
    Syntax,
    Units,
    Variables,
    Variation,
    WriteSyntax,

    // Macro-name keywords
    AgentCapabilities,
    ModuleCompliance,
    ModuleIdentity,
    NotificationGroup,
    NotificationType,
    ObjectGroup,
    ObjectIdentity,
    ObjectType,
    TrapType,
    TextualConvention,

    // Type keywords
    Application,
    Bits,
    Choice,
    Counter,
    Counter32,
    Counter64,
    Gauge,
    Gauge32,
    Identifier,
    Implicit,
    Integer,
    Integer32,
    IpAddress,
    NetworkAddress,
    Object,
    Octet,
    Of,
    Opaque,
    Sequence,
    Size,
    String,
    TimeTicks,
    Universal,
    Unsigned32,

    // Access values
    AccessibleForNotify,
    NotAccessible,
    NotImplemented,
    ReadCreate,
    ReadOnly,
    ReadWrite,
    WriteOnly,

    // Status values
    Current,
    Deprecated,
    Mandatory,
    Obsolete,
    Optional,

    /// A reserved ASN.1 word that SMI does not allow as an identifier.
    ForbiddenKeyword,

    Eof,
    Error,
}

impl TokenKind {
    /// Whether this kind reads as an identifier: the two identifier
    /// classes plus every keyword (keywords are just identifiers the
    /// lexer recognized) and the forbidden sentinel.
    #[must_use]
    pub fn is_ident_like(&self) -> bool {
        use TokenKind::*;
        !matches!(
            self,
            LBrace
                | RBrace
                | LParen
                | RParen
                | LBracket
                | RBracket
                | Semicolon
                | Comma
                | Dot
                | Pipe
                | Minus
                | DotDot
                | Assign
                | Number
                | NegNumber
                | QuotedString
                | HexString
                | BinString
                | Eof
                | Error
        )
    }

    /// The macro-name keywords that introduce a definition after a value
    /// reference (`foo OBJECT-TYPE ...`).
    #[must_use]
    pub fn is_macro_keyword(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            AgentCapabilities
                | ModuleCompliance
                | ModuleIdentity
                | NotificationGroup
                | NotificationType
                | ObjectGroup
                | ObjectIdentity
                | ObjectType
                | TrapType
        )
    }

    #[must_use]
    pub fn is_access_value(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            AccessibleForNotify
                | NotAccessible
                | NotImplemented
                | ReadCreate
                | ReadOnly
                | ReadWrite
                | WriteOnly
        )
    }

    #[must_use]
    pub fn is_status_value(&self) -> bool {
        use TokenKind::*;
        matches!(self, Current | Deprecated | Mandatory | Obsolete | Optional)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LBrace => f.write_str("`{`"),
            Self::RBrace => f.write_str("`}`"),
            Self::LParen => f.write_str("`(`"),
            Self::RParen => f.write_str("`)`"),
            Self::LBracket => f.write_str("`[`"),
            Self::RBracket => f.write_str("`]`"),
            Self::Semicolon => f.write_str("`;`"),
            Self::Comma => f.write_str("`,`"),
            Self::Dot => f.write_str("`.`"),
            Self::Pipe => f.write_str("`|`"),
            Self::Minus => f.write_str("`-`"),
            Self::DotDot => f.write_str("`..`"),
            Self::Assign => f.write_str("`::=`"),
            Self::UpperIdent => f.write_str("uppercase identifier"),
            Self::LowerIdent => f.write_str("lowercase identifier"),
            Self::Number => f.write_str("number"),
            Self::NegNumber => f.write_str("negative number"),
            Self::QuotedString => f.write_str("quoted string"),
            Self::HexString => f.write_str("hex string"),
            Self::BinString => f.write_str("binary string"),
            Self::ForbiddenKeyword => f.write_str("reserved ASN.1 keyword"),
            Self::Eof => f.write_str("end of input"),
            Self::Error => f.write_str("invalid token"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[test]
fn test_kind_classes() {
    assert!(TokenKind::ObjectType.is_macro_keyword());
    assert!(TokenKind::TrapType.is_macro_keyword());
    assert!(!TokenKind::TextualConvention.is_macro_keyword());
    assert!(TokenKind::ReadCreate.is_access_value());
    assert!(TokenKind::Mandatory.is_status_value());
    assert!(TokenKind::Counter64.is_ident_like());
    assert!(TokenKind::ForbiddenKeyword.is_ident_like());
    assert!(!TokenKind::Assign.is_ident_like());
    assert!(!TokenKind::Eof.is_ident_like());
}
