use indoc::indoc;
use pretty_assertions::assert_eq;

use smi_mib::ast::{
    Access, ConstraintKind, DefValContent, Definition, Dialect, RangeValue, TypeSyntaxKind,
};
use smi_mib::diag::codes;
use smi_mib::{Parser, Severity, Strictness};

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
fn test_pib_definitions_dialect() {
    let source = indoc! {br#"
        TEST-PIB PIB-DEFINITIONS ::= BEGIN
        x OBJECT-TYPE
            SYNTAX Integer32
            MAX-ACCESS install-notify
            STATUS current
            DESCRIPTION ""
            ::= { t 1 }
        END
    "#};
    let module = Parser::new(source).parse_module();
    assert_eq!(Dialect::PibDefinitions, module.dialect);
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
    let def = module.body[0].as_object_type().unwrap();
    assert_eq!(Access::InstallNotify, def.access.unwrap().value);
}

#[test]
fn test_integer_enum_object() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        x OBJECT-TYPE
            SYNTAX INTEGER { up(1), down(2) }
            MAX-ACCESS read-only
            STATUS current
            DESCRIPTION ""
            ::= { t 1 }
        END
    "#};
    let module = Parser::new(source).parse_module();
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
    assert_eq!(1, module.body.len());
    let def = module.body[0].as_object_type().unwrap();
    assert_eq!("x", def.name.name);
    let TypeSyntaxKind::IntegerEnum(named) = &def.syntax.as_ref().unwrap().kind else {
        panic!("expected inline enumeration");
    };
    let pairs: Vec<(&str, i64)> = named
        .iter()
        .map(|n| (n.name.name.as_str(), n.value))
        .collect();
    assert_eq!(vec![("up", 1), ("down", 2)], pairs);
}

#[test]
fn test_octet_string_size_syntax() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        y OBJECT-TYPE
            SYNTAX OCTET STRING (SIZE (0..255))
            MAX-ACCESS read-only
            STATUS current
            DESCRIPTION ""
            ::= { t 2 }
        END
    "#};
    let module = Parser::new(source).parse_module();
    let def = module.body[0].as_object_type().unwrap();
    let TypeSyntaxKind::Constrained(base, constraint) = &def.syntax.as_ref().unwrap().kind
    else {
        panic!("expected constrained syntax");
    };
    assert!(matches!(base.kind, TypeSyntaxKind::OctetString));
    assert_eq!(ConstraintKind::Size, constraint.kind);
    assert_eq!(1, constraint.ranges.len());
    assert_eq!(RangeValue::Unsigned(0), constraint.ranges[0].min);
    assert_eq!(Some(RangeValue::Unsigned(255)), constraint.ranges[0].max);
}

#[test]
fn test_constraint_forms() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        z OBJECT-TYPE
            SYNTAX Integer32 (-20..-1 | 'ff'H..'1f4'H | MIN..MAX)
            MAX-ACCESS read-only
            STATUS current
            DESCRIPTION ""
            ::= { t 3 }
        END
    "#};
    let module = Parser::new(source).parse_module();
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
    let def = module.body[0].as_object_type().unwrap();
    let TypeSyntaxKind::Constrained(_, constraint) = &def.syntax.as_ref().unwrap().kind else {
        panic!("expected constrained syntax");
    };
    assert_eq!(ConstraintKind::Value, constraint.kind);
    assert_eq!(RangeValue::Signed(-20), constraint.ranges[0].min);
    assert_eq!(Some(RangeValue::Signed(-1)), constraint.ranges[0].max);
    assert_eq!(RangeValue::Unsigned(0xff), constraint.ranges[1].min);
    assert_eq!(Some(RangeValue::Unsigned(0x1f4)), constraint.ranges[1].max);
    assert_eq!(RangeValue::Ident("MIN".into()), constraint.ranges[2].min);
    assert_eq!(Some(RangeValue::Ident("MAX".into())), constraint.ranges[2].max);
}

#[test]
fn test_uppercase_value_reference() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        Foo OBJECT-TYPE
            SYNTAX Integer32
            MAX-ACCESS read-only
            STATUS current
            DESCRIPTION ""
            ::= { t 1 }
        END
    "#};
    let module = Parser::new(source).parse_module();
    let diag = module
        .diagnostics
        .iter()
        .find(|d| d.code == codes::BAD_IDENTIFIER_CASE)
        .expect("missing bad-identifier-case");
    assert_eq!(Severity::Error, diag.severity);
    // the parse still proceeds with the vendor spelling
    assert_eq!("Foo", module.body[0].name().name);
}

#[test]
fn test_identifier_validations() {
    let long32 = "a".repeat(33);
    let long64 = "b".repeat(65);
    let source = format!(
        "T DEFINITIONS ::= BEGIN\n\
         my_val OBJECT IDENTIFIER ::= {{ iso 1 }}\n\
         {long32} OBJECT IDENTIFIER ::= {{ iso 2 }}\n\
         {long64} OBJECT IDENTIFIER ::= {{ iso 3 }}\n\
         END"
    );
    let module =
        Parser::with_strictness(source.as_bytes(), Strictness::strict()).parse_module();
    let codes_seen: Vec<&str> = module.diagnostics.iter().map(|d| d.code).collect();
    assert!(codes_seen.contains(&codes::IDENTIFIER_UNDERSCORE));
    assert!(codes_seen.contains(&codes::IDENTIFIER_LENGTH_32));
    assert!(codes_seen.contains(&codes::IDENTIFIER_LENGTH_64));

    // normal strictness suppresses the pure style finding
    let module = Parser::new(source.as_bytes()).parse_module();
    assert!(
        module
            .diagnostics
            .iter()
            .all(|d| d.code != codes::IDENTIFIER_UNDERSCORE)
    );
}

#[test]
fn test_forbidden_keyword_as_defval() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        x OBJECT-TYPE
            SYNTAX Integer32
            MAX-ACCESS read-write
            STATUS current
            DESCRIPTION ""
            DEFVAL { FALSE }
            ::= { t 1 }
        END
    "#};
    let module = Parser::new(source).parse_module();
    let def = module.body[0].as_object_type().unwrap();
    assert_eq!(
        Some(&DefValContent::Ident("FALSE".into())),
        def.defval.as_ref().map(|d| &d.content)
    );
    let diag = module
        .diagnostics
        .iter()
        .find(|d| d.code == codes::KEYWORD_RESERVED)
        .expect("missing keyword-reserved");
    assert_eq!(Severity::Severe, diag.severity);
}

#[test]
fn test_defval_forms() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        a OBJECT-TYPE SYNTAX Integer32 MAX-ACCESS read-write STATUS current
            DESCRIPTION "" DEFVAL { -15 } ::= { t 1 }
        b OBJECT-TYPE SYNTAX Integer32 MAX-ACCESS read-write STATUS current
            DESCRIPTION "" DEFVAL { "text" } ::= { t 2 }
        c OBJECT-TYPE SYNTAX Integer32 MAX-ACCESS read-write STATUS current
            DESCRIPTION "" DEFVAL { 'c0a80001'H } ::= { t 3 }
        d OBJECT-TYPE SYNTAX Integer32 MAX-ACCESS read-write STATUS current
            DESCRIPTION "" DEFVAL { { red, blue } } ::= { t 4 }
        e OBJECT-TYPE SYNTAX Integer32 MAX-ACCESS read-write STATUS current
            DESCRIPTION "" DEFVAL { { iso 3 } } ::= { t 5 }
        END
    "#};
    let module = Parser::new(source).parse_module();
    let contents: Vec<DefValContent> = module
        .body
        .iter()
        .map(|def| {
            def.as_object_type()
                .unwrap()
                .defval
                .as_ref()
                .unwrap()
                .content
                .clone()
        })
        .collect();
    assert_eq!(DefValContent::Integer(-15), contents[0]);
    assert_eq!(DefValContent::Text("text".into()), contents[1]);
    assert_eq!(DefValContent::Hex("c0a80001".into()), contents[2]);
    assert_eq!(
        DefValContent::Bits(vec!["red".into(), "blue".into()]),
        contents[3]
    );
    assert!(matches!(contents[4], DefValContent::Oid(_)));
}

#[test]
fn test_index_clause_variants() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        e OBJECT-TYPE
            SYNTAX E
            MAX-ACCESS not-accessible
            STATUS current
            DESCRIPTION ""
            INDEX { ifIndex, IMPLIED name, OCTET STRING }
            ::= { t 1 }
        END
    "#};
    let module = Parser::new(source).parse_module();
    let def = module.body[0].as_object_type().unwrap();
    let index = def.index.as_ref().unwrap();
    assert_eq!(3, index.items.len());
    assert_eq!(("ifIndex", false), (index.items[0].name.name.as_str(), index.items[0].implied));
    assert_eq!(("name", true), (index.items[1].name.name.as_str(), index.items[1].implied));
    assert_eq!("OCTET STRING", index.items[2].name.name);
}

#[test]
fn test_recovery_between_definitions() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        good1 OBJECT IDENTIFIER ::= { iso 1 }
        bad OBJECT-TYPE ::= }
        good2 OBJECT IDENTIFIER ::= { iso 2 }
        END
    "#};
    let module = Parser::new(source).parse_module();
    let names: Vec<&str> = module.body.iter().map(|d| d.name().name.as_str()).collect();
    assert_eq!(vec!["good1", "good2"], names);
    assert!(
        module
            .diagnostics
            .iter()
            .any(|d| d.code == codes::PARSE_ERROR)
    );
}

#[test]
fn test_imports_and_declared_names() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        IMPORTS
            OBJECT-TYPE, Counter32 FROM SNMPv2-SMI
            DisplayString FROM SNMPv2-TC;
        x OBJECT-TYPE
            SYNTAX DisplayString
            MAX-ACCESS read-only
            STATUS current
            DESCRIPTION ""
            ::= { t 1 }
        Alias ::= Counter32
        END
    "#};
    let module = Parser::new(source).parse_module();
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
    assert_eq!(2, module.imports.len());
    assert_eq!("SNMPv2-SMI", module.imports[0].module.name);
    assert_eq!(
        vec!["OBJECT-TYPE", "Counter32"],
        module.imports[0]
            .symbols
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
    );
    assert_eq!("SNMPv2-TC", module.imports[1].module.name);
    let names: Vec<&str> = module.body.iter().map(|d| d.name().name.as_str()).collect();
    assert_eq!(vec!["x", "Alias"], names);
}

#[test]
fn test_module_identity_revisions() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        t MODULE-IDENTITY
            LAST-UPDATED "202408010000Z"
            ORGANIZATION "Example"
            CONTACT-INFO "info@example.org"
            DESCRIPTION "A module."
            REVISION "202408010000Z"
            DESCRIPTION "Second."
            REVISION "202301010000Z"
            DESCRIPTION "First."
            ::= { iso 42 }
        END
    "#};
    let module = Parser::new(source).parse_module();
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
    let Definition::ModuleIdentity(def) = &module.body[0] else {
        panic!("expected MODULE-IDENTITY");
    };
    assert_eq!("Example", def.organization.as_ref().unwrap().value);
    assert_eq!(2, def.revisions.len());
    assert_eq!("202301010000Z", def.revisions[1].date.value);
}

#[test]
fn test_duplicate_clause_reported() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        x OBJECT-TYPE
            SYNTAX Integer32
            STATUS current
            STATUS deprecated
            MAX-ACCESS read-only
            DESCRIPTION ""
            ::= { t 1 }
        END
    "#};
    let module = Parser::new(source).parse_module();
    assert!(
        module
            .diagnostics
            .iter()
            .any(|d| d.code == codes::DUPLICATE_CLAUSE)
    );
    // the definition itself survives
    assert_eq!("x", module.body[0].name().name);
}

#[test]
fn test_agent_capabilities_and_variation() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        demoAgent AGENT-CAPABILITIES
            PRODUCT-RELEASE "Demo agent 1.0"
            STATUS current
            DESCRIPTION "What the demo agent implements."
            SUPPORTS DEMO-MIB
                INCLUDES { demoObjectGroup }
                VARIATION demoState
                    ACCESS read-only
                    DESCRIPTION "Writes unsupported."
            ::= { t 9 }
        END
    "#};
    let module = Parser::new(source).parse_module();
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
    let Definition::AgentCapabilities(def) = &module.body[0] else {
        panic!("expected AGENT-CAPABILITIES");
    };
    assert_eq!("Demo agent 1.0", def.product_release.as_ref().unwrap().value);
    assert_eq!(1, def.supports.len());
    let arm = &def.supports[0];
    assert_eq!("DEMO-MIB", arm.module.name);
    assert_eq!(1, arm.includes.len());
    assert_eq!("demoState", arm.variations[0].name.name);
}

#[test]
fn test_choice_and_tagged_type_assignments() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        NetworkAddress2 ::= CHOICE { internet IpAddress }
        Counter2 ::= [APPLICATION 1] IMPLICIT INTEGER (0..4294967295)
        END
    "#};
    let module = Parser::new(source).parse_module();
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
    let choice = module.body[0].as_type_assignment().unwrap();
    assert!(matches!(choice.syntax.kind, TypeSyntaxKind::Choice(_)));
    let tagged = module.body[1].as_type_assignment().unwrap();
    assert!(tagged.implicit);
    assert!(tagged.tag.is_some());
}

#[test]
fn test_span_containment() {
    let source = std::fs::read("tests/fixtures/DEMO-MIB.mib").unwrap();
    let module = Parser::new(&source).parse_module();
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
    for def in &module.body {
        assert!(
            module.span.contains(def.span()),
            "definition `{}` escapes the module span",
            def.name().name
        );
    }
}
