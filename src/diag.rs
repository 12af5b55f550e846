use num_enum::TryFromPrimitive;
use std::collections::HashMap;
use std::{error, fmt};

use crate::span::Span;

/// Stable diagnostic code strings.
///
/// These are part of the crate's wire surface: downstream tooling filters
/// and suppresses on them, so they never change spelling.
pub mod codes {
    pub const IDENTIFIER_UNDERSCORE: &str = "identifier-underscore";
    pub const IDENTIFIER_HYPHEN_END: &str = "identifier-hyphen-end";
    pub const IDENTIFIER_LENGTH_32: &str = "identifier-length-32";
    pub const IDENTIFIER_LENGTH_64: &str = "identifier-length-64";
    pub const BAD_IDENTIFIER_CASE: &str = "bad-identifier-case";
    pub const KEYWORD_RESERVED: &str = "keyword-reserved";
    pub const INVALID_U32: &str = "invalid-u32";
    pub const INVALID_I64: &str = "invalid-i64";
    pub const INVALID_HEX_RANGE: &str = "invalid-hex-range";
    pub const PARSE_ERROR: &str = "parse-error";
    pub const UNTERMINATED_STRING: &str = "unterminated-string";
    pub const INVALID_HEX_BINARY_SUFFIX: &str = "invalid-hex-binary-suffix";
    pub const UNKNOWN_CHARACTER: &str = "unknown-character";
    pub const DUPLICATE_CLAUSE: &str = "duplicate-clause";
    pub const DUPLICATE_DEFINITION: &str = "duplicate-definition";
    pub const MODULE_IDENTITY_DUPLICATE: &str = "module-identity-duplicate";
    pub const UNRESOLVED_IMPORT: &str = "unresolved-import";
    pub const UNRESOLVED_IDENTIFIER: &str = "unresolved-identifier";
    pub const OID_CONFLICT: &str = "oid-conflict";
    pub const MISSING_AUGMENTS: &str = "missing-augments";
    pub const MISSING_INDEX: &str = "missing-index";
    pub const CYCLIC_AUGMENTS: &str = "cyclic-augments";
    pub const CYCLIC_TYPE: &str = "cyclic-type";
}

/// Diagnostic severity, ordered `Style < Warning < Error < Severe`.
///
/// The numeric repr is stable so drivers can map command-line error levels
/// onto it (`Severity::try_from(2u8)`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive,
)]
#[repr(u8)]
pub enum Severity {
    /// RFC style violation; the construct is well-formed.
    Style = 0,
    Warning = 1,
    Error = 2,
    /// Input that is badly broken but still recoverable.
    Severe = 3,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Style => "style",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Severe => "severe",
        })
    }
}

/// One reported condition: `(severity, code, span, message)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// One of the [`codes`] constants.
    pub code: &'static str,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(severity: Severity, code: &'static str, span: Span, message: String) -> Self {
        Self {
            severity,
            code,
            span,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}] {} at {}",
            self.severity, self.code, self.message, self.span
        )
    }
}

/// A numeric severity level outside `0..=3`.
#[derive(Debug, Clone)]
pub struct InvalidLevel(pub u8);

impl fmt::Display for InvalidLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid severity level {}", self.0)
    }
}

impl error::Error for InvalidLevel {}

/// Code→severity overrides plus a reporting floor.
///
/// A diagnostic is reported iff its effective severity (the override for
/// its code, else the severity the emitter chose) is at or above the
/// floor. Structural parse errors bypass the filter entirely.
#[derive(Debug, Clone)]
pub struct Strictness {
    floor: Severity,
    overrides: HashMap<&'static str, Severity>,
}

impl Strictness {
    /// Report everything, including RFC style violations.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            floor: Severity::Style,
            overrides: HashMap::new(),
        }
    }

    /// Suppress pure style diagnostics.
    #[must_use]
    pub fn normal() -> Self {
        Self {
            floor: Severity::Warning,
            overrides: HashMap::new(),
        }
    }

    /// Suppress style and most warnings.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            floor: Severity::Error,
            overrides: HashMap::new(),
        }
    }

    /// Override the severity of one code.
    pub fn set_severity(&mut self, code: &'static str, severity: Severity) -> &mut Self {
        self.overrides.insert(code, severity);
        self
    }

    /// Override the severity of one code by numeric level, the way
    /// command-line drivers express it.
    pub fn set_level(&mut self, code: &'static str, level: u8) -> Result<&mut Self, InvalidLevel> {
        let severity = Severity::try_from(level).map_err(|_| InvalidLevel(level))?;
        Ok(self.set_severity(code, severity))
    }

    /// The severity a diagnostic with `code` will carry when reported.
    #[must_use]
    pub fn effective_severity(&self, code: &str, default: Severity) -> Severity {
        self.overrides.get(code).copied().unwrap_or(default)
    }

    /// Whether a diagnostic with `code` and emitter-chosen `default`
    /// severity passes the filter.
    #[must_use]
    pub fn should_report(&self, code: &str, default: Severity) -> bool {
        if code == codes::PARSE_ERROR {
            return true;
        }
        self.effective_severity(code, default) >= self.floor
    }
}

impl Default for Strictness {
    fn default() -> Self {
        Self::normal()
    }
}

#[test]
fn test_severity_order_and_levels() {
    assert!(Severity::Style < Severity::Warning);
    assert!(Severity::Warning < Severity::Error);
    assert!(Severity::Error < Severity::Severe);
    assert_eq!(Ok(Severity::Error), Severity::try_from(2u8));
    assert!(Severity::try_from(4u8).is_err());
}

#[test]
fn test_strictness_presets() {
    let strict = Strictness::strict();
    assert!(strict.should_report(codes::IDENTIFIER_UNDERSCORE, Severity::Style));

    let normal = Strictness::normal();
    assert!(!normal.should_report(codes::IDENTIFIER_UNDERSCORE, Severity::Style));
    assert!(normal.should_report(codes::IDENTIFIER_LENGTH_32, Severity::Warning));

    let permissive = Strictness::permissive();
    assert!(!permissive.should_report(codes::IDENTIFIER_LENGTH_32, Severity::Warning));
    assert!(permissive.should_report(codes::KEYWORD_RESERVED, Severity::Severe));
}

#[test]
fn test_strictness_overrides_and_parse_error_bypass() {
    let mut cfg = Strictness::permissive();
    cfg.set_level(codes::IDENTIFIER_UNDERSCORE, 2).unwrap();
    assert!(cfg.should_report(codes::IDENTIFIER_UNDERSCORE, Severity::Style));
    assert_eq!(
        Severity::Error,
        cfg.effective_severity(codes::IDENTIFIER_UNDERSCORE, Severity::Style)
    );
    assert!(cfg.set_level(codes::OID_CONFLICT, 9).is_err());

    // parse errors are always reported, whatever the floor
    assert!(cfg.should_report(codes::PARSE_ERROR, Severity::Style));
}
