//! Reserved word tables.
//!
//! Both tables are sorted by byte value and searched with
//! `binary_search`; both are case-sensitive, so `Counter` is a keyword
//! while `COUNTER` is a plain uppercase identifier.

use crate::token::TokenKind;

/// The complete SMI keyword set, sorted.
pub static KEYWORDS: &[(&str, TokenKind)] = &[
    ("ACCESS", TokenKind::Access),
    ("AGENT-CAPABILITIES", TokenKind::AgentCapabilities),
    ("APPLICATION", TokenKind::Application),
    ("AUGMENTS", TokenKind::Augments),
    ("BEGIN", TokenKind::Begin),
    ("BITS", TokenKind::Bits),
    ("CHOICE", TokenKind::Choice),
    ("CONTACT-INFO", TokenKind::ContactInfo),
    ("CREATION-REQUIRES", TokenKind::CreationRequires),
    ("Counter", TokenKind::Counter),
    ("Counter32", TokenKind::Counter32),
    ("Counter64", TokenKind::Counter64),
    ("DEFINITIONS", TokenKind::Definitions),
    ("DEFVAL", TokenKind::Defval),
    ("DESCRIPTION", TokenKind::Description),
    ("DISPLAY-HINT", TokenKind::DisplayHint),
    ("END", TokenKind::End),
    ("ENTERPRISE", TokenKind::Enterprise),
    ("EXPORTS", TokenKind::Exports),
    ("FROM", TokenKind::From),
    ("GROUP", TokenKind::Group),
    ("Gauge", TokenKind::Gauge),
    ("Gauge32", TokenKind::Gauge32),
    ("IDENTIFIER", TokenKind::Identifier),
    ("IMPLICIT", TokenKind::Implicit),
    ("IMPLIED", TokenKind::Implied),
    ("IMPORTS", TokenKind::Imports),
    ("INCLUDES", TokenKind::Includes),
    ("INDEX", TokenKind::Index),
    ("INTEGER", TokenKind::Integer),
    ("Integer32", TokenKind::Integer32),
    ("IpAddress", TokenKind::IpAddress),
    ("LAST-UPDATED", TokenKind::LastUpdated),
    ("MACRO", TokenKind::Macro),
    ("MANDATORY-GROUPS", TokenKind::MandatoryGroups),
    ("MAX-ACCESS", TokenKind::MaxAccess),
    ("MIN-ACCESS", TokenKind::MinAccess),
    ("MODULE", TokenKind::Module),
    ("MODULE-COMPLIANCE", TokenKind::ModuleCompliance),
    ("MODULE-IDENTITY", TokenKind::ModuleIdentity),
    ("NOTIFICATION-GROUP", TokenKind::NotificationGroup),
    ("NOTIFICATION-TYPE", TokenKind::NotificationType),
    ("NOTIFICATIONS", TokenKind::Notifications),
    ("NetworkAddress", TokenKind::NetworkAddress),
    ("OBJECT", TokenKind::Object),
    ("OBJECT-GROUP", TokenKind::ObjectGroup),
    ("OBJECT-IDENTITY", TokenKind::ObjectIdentity),
    ("OBJECT-TYPE", TokenKind::ObjectType),
    ("OBJECTS", TokenKind::Objects),
    ("OCTET", TokenKind::Octet),
    ("OF", TokenKind::Of),
    ("ORGANIZATION", TokenKind::Organization),
    ("Opaque", TokenKind::Opaque),
    ("PRODUCT-RELEASE", TokenKind::ProductRelease),
    ("REFERENCE", TokenKind::Reference),
    ("REVISION", TokenKind::Revision),
    ("SEQUENCE", TokenKind::Sequence),
    ("SIZE", TokenKind::Size),
    ("STATUS", TokenKind::Status),
    ("STRING", TokenKind::String),
    ("SUPPORTS", TokenKind::Supports),
    ("SYNTAX", TokenKind::Syntax),
    ("TEXTUAL-CONVENTION", TokenKind::TextualConvention),
    ("TRAP-TYPE", TokenKind::TrapType),
    ("TimeTicks", TokenKind::TimeTicks),
    ("UNITS", TokenKind::Units),
    ("UNIVERSAL", TokenKind::Universal),
    ("Unsigned32", TokenKind::Unsigned32),
    ("VARIABLES", TokenKind::Variables),
    ("VARIATION", TokenKind::Variation),
    ("WRITE-SYNTAX", TokenKind::WriteSyntax),
    ("accessible-for-notify", TokenKind::AccessibleForNotify),
    ("current", TokenKind::Current),
    ("deprecated", TokenKind::Deprecated),
    ("mandatory", TokenKind::Mandatory),
    ("not-accessible", TokenKind::NotAccessible),
    ("not-implemented", TokenKind::NotImplemented),
    ("obsolete", TokenKind::Obsolete),
    ("optional", TokenKind::Optional),
    ("read-create", TokenKind::ReadCreate),
    ("read-only", TokenKind::ReadOnly),
    ("read-write", TokenKind::ReadWrite),
    ("write-only", TokenKind::WriteOnly),
];

/// ASN.1 words SMI reserves but never uses, sorted.
///
/// These lex to [`TokenKind::ForbiddenKeyword`]; whether that is an error
/// depends on where they appear (`FALSE` inside a DEFVAL is a legitimate
/// enum label, `MIN`/`MAX` are legitimate range endpoints).
pub static FORBIDDEN: &[&str] = &[
    "ABSENT",
    "ANY",
    "BIT",
    "BOOLEAN",
    "BY",
    "COMPONENT",
    "COMPONENTS",
    "DEFAULT",
    "DEFINED",
    "ENUMERATED",
    "EXPLICIT",
    "EXTERNAL",
    "FALSE",
    "MAX",
    "MIN",
    "MINUS-INFINITY",
    "NULL",
    "OPTIONAL",
    "PLUS-INFINITY",
    "PRESENT",
    "PRIVATE",
    "REAL",
    "SET",
    "TAGS",
    "TRUE",
    "WITH",
];

/// Classify a scanned identifier: keyword kind, forbidden sentinel, or
/// `None` for an ordinary identifier.
#[must_use]
pub fn classify(ident: &[u8]) -> Option<TokenKind> {
    if let Ok(at) = KEYWORDS.binary_search_by(|(kw, _)| kw.as_bytes().cmp(ident)) {
        return Some(KEYWORDS[at].1);
    }
    if FORBIDDEN
        .binary_search_by(|kw| kw.as_bytes().cmp(ident))
        .is_ok()
    {
        return Some(TokenKind::ForbiddenKeyword);
    }
    None
}

#[test]
fn test_tables_sorted() {
    assert!(KEYWORDS.windows(2).all(|w| w[0].0 < w[1].0));
    assert!(FORBIDDEN.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_classify() {
    assert_eq!(Some(TokenKind::ObjectType), classify(b"OBJECT-TYPE"));
    assert_eq!(Some(TokenKind::Counter64), classify(b"Counter64"));
    assert_eq!(Some(TokenKind::ReadOnly), classify(b"read-only"));
    assert_eq!(Some(TokenKind::ForbiddenKeyword), classify(b"FALSE"));
    assert_eq!(Some(TokenKind::ForbiddenKeyword), classify(b"MINUS-INFINITY"));
    // case-sensitive on both tables
    assert_eq!(None, classify(b"counter64"));
    assert_eq!(None, classify(b"False"));
    assert_eq!(None, classify(b"sysDescr"));
}
