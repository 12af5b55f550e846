use std::fs;

use smi_mib::{Lexer, TokenKind};

/// Every fixture tokenizes cleanly: one trailing EOF, in-bounds
/// non-empty spans in source order, no error tokens, no diagnostics.
#[test]
fn test_fixtures_tokenize_clean() {
    for name in ["DEMO-SMI.mib", "DEMO-MIB.mib", "DEMO-V1-MIB.mib"] {
        let source = fs::read(format!("tests/fixtures/{name}")).unwrap();
        let (tokens, diags) = Lexer::new(&source).tokenize();
        assert!(diags.is_empty(), "{name}: {diags:?}");
        assert_eq!(TokenKind::Eof, tokens.last().unwrap().kind);
        assert_eq!(
            1,
            tokens.iter().filter(|t| t.kind == TokenKind::Eof).count()
        );
        let mut offset = 0;
        for token in &tokens[..tokens.len() - 1] {
            assert_ne!(TokenKind::Error, token.kind, "{name}");
            assert!(token.span.start >= offset, "{name}: tokens out of order");
            assert!(token.span.end > token.span.start);
            assert!(token.span.end <= source.len());
            offset = token.span.end;
        }
    }
}

/// Slicing the source with each token's span reproduces the logical
/// token stream.
#[test]
fn test_token_text_roundtrip() {
    let source = b"demoState OBJECT-TYPE SYNTAX INTEGER { up(1) } ::= { demo 2 }";
    let (tokens, _) = Lexer::new(source).tokenize();
    let texts: Vec<&[u8]> = tokens[..tokens.len() - 1]
        .iter()
        .map(|t| t.text(source))
        .collect();
    assert_eq!(
        vec![
            &b"demoState"[..],
            &b"OBJECT-TYPE"[..],
            &b"SYNTAX"[..],
            &b"INTEGER"[..],
            &b"{"[..],
            &b"up"[..],
            &b"("[..],
            &b"1"[..],
            &b")"[..],
            &b"}"[..],
            &b"::="[..],
            &b"{"[..],
            &b"demo"[..],
            &b"2"[..],
            &b"}"[..],
        ],
        texts
    );
}

/// The macro body in DEMO-SMI collapses to a single END token and the
/// definitions around it survive.
#[test]
fn test_fixture_macro_collapse() {
    let source = fs::read("tests/fixtures/DEMO-SMI.mib").unwrap();
    let (tokens, _) = Lexer::new(&source).tokenize();
    let macro_at = tokens
        .iter()
        .position(|t| t.kind == TokenKind::Macro)
        .unwrap();
    assert_eq!(TokenKind::End, tokens[macro_at + 1].kind);
    // the TEXTUAL-CONVENTION after the macro is still in the stream
    assert!(
        tokens[macro_at..]
            .iter()
            .any(|t| t.kind == TokenKind::TextualConvention)
    );
}

/// Keywords inside comments and strings stay inert.
#[test]
fn test_keywords_in_comments_and_strings() {
    let source = b"-- OBJECT-TYPE END\n\"SYNTAX INTEGER\" iso";
    let (tokens, diags) = Lexer::new(source).tokenize();
    assert!(diags.is_empty());
    assert_eq!(
        vec![
            TokenKind::QuotedString,
            TokenKind::LowerIdent,
            TokenKind::Eof
        ],
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>()
    );
}
