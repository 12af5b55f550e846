use std::fs;

use indoc::indoc;
use pretty_assertions::assert_eq;

use smi_mib::ast::{Access, Status};
use smi_mib::diag::codes;
use smi_mib::model::{BaseType, NodeKind};
use smi_mib::{Mib, Strictness};

fn load_fixture(mib: &mut Mib, name: &str) -> smi_mib::model::ModuleId {
    let source = fs::read(format!("tests/fixtures/{name}")).unwrap();
    mib.load(&source)
}

#[test]
fn test_inline_enum_resolution() {
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
    let mut mib = Mib::new();
    let module = mib.load(source);
    let object = mib.module(module).object("x").unwrap();
    let record = mib.object(object);
    assert_eq!(Some(Access::ReadOnly), record.access);
    assert_eq!(Some(Status::Current), record.status);
    let pairs: Vec<(&str, i64)> = record
        .effective
        .enums
        .iter()
        .map(|n| (n.name.name.as_str(), n.value))
        .collect();
    assert_eq!(vec![("up", 1), ("down", 2)], pairs);
    assert_eq!(
        Some(BaseType::Enumeration),
        mib.effective_base(record.ty.unwrap())
    );
    // the unknown OID base `t` resolves to a named placeholder
    assert!(
        mib.module(module)
            .diagnostics
            .iter()
            .any(|d| d.code == codes::UNRESOLVED_IDENTIFIER)
    );
}

#[test]
fn test_octet_string_size_resolution() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        y OBJECT-TYPE
            SYNTAX OCTET STRING (SIZE (0..255))
            MAX-ACCESS read-only
            STATUS current
            DESCRIPTION ""
            ::= { t 1 }
        END
    "#};
    let mut mib = Mib::new();
    let module = mib.load(source);
    let object = mib.module(module).object("y").unwrap();
    let ty = mib.object(object).ty.unwrap();
    // inline type, parent chain bottoms out in OCTET STRING
    assert!(mib.get_type(ty).name.is_none());
    assert_eq!(Some(BaseType::OctetString), mib.effective_base(ty));
    let sizes = mib.effective_sizes(ty);
    assert_eq!(1, sizes.len());
    assert_eq!(
        (
            &smi_mib::ast::RangeValue::Unsigned(0),
            Some(&smi_mib::ast::RangeValue::Unsigned(255))
        ),
        (&sizes[0].min, sizes[0].max.as_ref())
    );
}

#[test]
fn test_fixture_modules_resolve_clean() {
    let mut mib = Mib::new();
    let smi = load_fixture(&mut mib, "DEMO-SMI.mib");
    let demo = load_fixture(&mut mib, "DEMO-MIB.mib");
    assert!(mib.module(smi).diagnostics.is_empty(), "{:?}", mib.module(smi).diagnostics);
    assert!(mib.module(demo).diagnostics.is_empty(), "{:?}", mib.module(demo).diagnostics);

    // OID tree: demoMIB sits at 1.3.6.1.4.1.4242
    let identity = mib.module(demo).identity.unwrap();
    assert_eq!(vec![1, 3, 6, 1, 4, 1, 4242], mib.oid(identity));
    assert_eq!(Some(identity), mib.node_by_oid(&[1, 3, 6, 1, 4, 1, 4242]));

    // module metadata from MODULE-IDENTITY
    let module = mib.module(demo);
    assert_eq!(Some("Demo Networks"), module.organization.as_deref());
    assert_eq!(1, module.revisions.len());
}

#[test]
fn test_fixture_table_navigation() {
    let mut mib = Mib::new();
    load_fixture(&mut mib, "DEMO-SMI.mib");
    let demo = load_fixture(&mut mib, "DEMO-MIB.mib");
    let module = mib.module(demo);

    let table = module.object("demoIfTable").unwrap();
    let row = module.object("demoIfEntry").unwrap();
    let index = module.object("demoIfIndex").unwrap();
    let octets = module.object("demoIfOctets").unwrap();
    let name = module.object("demoName").unwrap();

    assert_eq!(
        NodeKind::Table,
        mib.node(mib.object(table).node.unwrap()).kind
    );
    assert_eq!(NodeKind::Row, mib.node(mib.object(row).node.unwrap()).kind);
    assert_eq!(
        NodeKind::Column,
        mib.node(mib.object(index).node.unwrap()).kind
    );
    assert_eq!(
        NodeKind::Scalar,
        mib.node(mib.object(name).node.unwrap()).kind
    );

    assert_eq!(Some(row), mib.table_entry(table));
    assert_eq!(Some(table), mib.table(octets));
    assert_eq!(Some(row), mib.row(octets));
    assert_eq!(vec![index, octets], mib.columns(row));
    assert_eq!(vec![index, octets], mib.columns(table));

    assert_eq!(vec![table, module.object("demoIfXTable").unwrap()], mib.tables(demo));
    assert_eq!(2, mib.rows(demo).len());
    assert_eq!(2, mib.scalars(demo).len());
}

#[test]
fn test_fixture_augments_and_effective_values() {
    let mut mib = Mib::new();
    load_fixture(&mut mib, "DEMO-SMI.mib");
    let demo = load_fixture(&mut mib, "DEMO-MIB.mib");
    let module = mib.module(demo);

    // the extension row inherits the base row's index through AUGMENTS
    let xrow = module.object("demoIfXEntry").unwrap();
    let base_row = module.object("demoIfEntry").unwrap();
    assert_eq!(Some(base_row), mib.object(xrow).augments);
    let indexes = mib.effective_indexes(xrow);
    assert_eq!(1, indexes.len());
    assert_eq!("demoIfIndex", indexes[0].name);
    assert_eq!(module.object("demoIfIndex"), indexes[0].object);

    // textual convention attributes flow down the chain
    let alias = module.object("demoIfAlias").unwrap();
    let record = mib.object(alias);
    assert_eq!(Some("255a"), record.effective.display_hint.as_deref());
    // the inline SIZE (0..64) wins over DisplayString's SIZE (0..255)
    assert_eq!(
        Some(&smi_mib::ast::RangeValue::Unsigned(64)),
        record.effective.sizes[0].max.as_ref()
    );

    let display_string = mib.module(demo).get_type("DisplayString");
    assert!(display_string.is_none(), "imported, not defined here");
    let smi = mib.lookup_module("DEMO-SMI").unwrap();
    let display_string = mib.module(smi).get_type("DisplayString").unwrap();
    assert!(mib.get_type(display_string).is_textual_convention);
    assert_eq!(Some(BaseType::OctetString), mib.effective_base(display_string));
}

#[test]
fn test_fixture_groups_and_compliance() {
    let mut mib = Mib::new();
    load_fixture(&mut mib, "DEMO-SMI.mib");
    let demo = load_fixture(&mut mib, "DEMO-MIB.mib");
    let module = mib.module(demo);

    let group = mib.group(module.group("demoObjectGroup").unwrap());
    assert_eq!(4, group.members.len());
    assert!(group.members.iter().all(|m| m.object.is_some()));
    assert_eq!(
        NodeKind::Group,
        mib.node(group.node.unwrap()).kind
    );

    let notify_group = mib.group(module.group("demoNotifyGroup").unwrap());
    assert!(notify_group.members[0].notification.is_some());

    let notification = mib.notification(module.notification("demoLinkUp").unwrap());
    assert_eq!(
        NodeKind::NotificationLeaf,
        mib.node(notification.node.unwrap()).kind
    );
    assert_eq!(2, notification.objects.len());
    assert!(notification.objects.iter().all(|(_, o)| o.is_some()));

    let compliance = mib.compliance(module.compliance("demoCompliance").unwrap());
    assert_eq!(1, compliance.modules.len());
    let arm = &compliance.modules[0];
    assert_eq!(None, arm.module_name);
    assert_eq!(Some(demo), arm.module);
    assert!(arm.mandatory_groups[0].group.is_some());
    assert_eq!("demoState", arm.objects[0].name);
    assert_eq!(Some(Access::ReadOnly), arm.objects[0].min_access);
}

#[test]
fn test_v1_trap_placement() {
    let mut mib = Mib::new();
    load_fixture(&mut mib, "DEMO-SMI.mib");
    let v1 = load_fixture(&mut mib, "DEMO-V1-MIB.mib");
    assert!(mib.module(v1).diagnostics.is_empty(), "{:?}", mib.module(v1).diagnostics);

    let status = mib.module(v1).object("acmeStatus").unwrap();
    assert_eq!(Some(Access::ReadOnly), mib.object(status).access);
    assert_eq!(Some(Status::Mandatory), mib.object(status).status);

    // v1 traps land at enterprise.0.trapNumber
    let alert = mib.notification(mib.module(v1).notification("acmeAlert").unwrap());
    assert_eq!(
        vec![1, 3, 6, 1, 4, 1, 9999, 0, 2],
        mib.oid(alert.node.unwrap())
    );
    assert_eq!(("acmeStatus".to_string(), Some(status)), alert.objects[0].clone());
}

#[test]
fn test_unresolved_import_placeholders() {
    let mut mib = Mib::new();
    // DEMO-MIB without its base module
    let demo = load_fixture(&mut mib, "DEMO-MIB.mib");
    let diags = &mib.module(demo).diagnostics;
    assert!(diags.iter().any(|d| d.code == codes::UNRESOLVED_IMPORT));
    // resolution still completes: objects exist and hang off a
    // placeholder base
    let name = mib.module(demo).object("demoName").unwrap();
    assert!(mib.object(name).node.is_some());
    // DisplayString became an opaque placeholder type with no hint
    assert_eq!(None, mib.object(name).effective.display_hint.as_deref());
}

#[test]
fn test_augments_cycle_terminates() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        aEntry OBJECT-TYPE
            SYNTAX AEntry
            MAX-ACCESS not-accessible
            STATUS current
            DESCRIPTION ""
            AUGMENTS { bEntry }
            ::= { t 1 }
        bEntry OBJECT-TYPE
            SYNTAX BEntry
            MAX-ACCESS not-accessible
            STATUS current
            DESCRIPTION ""
            AUGMENTS { aEntry }
            ::= { t 2 }
        AEntry ::= SEQUENCE { aCol Integer32 }
        BEntry ::= SEQUENCE { bCol Integer32 }
        END
    "#};
    let mut mib = Mib::new();
    let module = mib.load(source);
    let a = mib.module(module).object("aEntry").unwrap();
    let b = mib.module(module).object("bEntry").unwrap();
    assert_eq!(Vec::<smi_mib::model::IndexRef>::new(), mib.effective_indexes(a));
    assert_eq!(Vec::<smi_mib::model::IndexRef>::new(), mib.effective_indexes(b));
    assert!(
        mib.module(module)
            .diagnostics
            .iter()
            .any(|d| d.code == codes::CYCLIC_AUGMENTS)
    );
}

#[test]
fn test_type_cycle_broken() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        A ::= B
        B ::= A
        END
    "#};
    let mut mib = Mib::new();
    let module = mib.load(source);
    assert!(
        mib.module(module)
            .diagnostics
            .iter()
            .any(|d| d.code == codes::CYCLIC_TYPE)
    );
    let a = mib.module(module).get_type("A").unwrap();
    // the chain terminates and yields no base
    assert_eq!(None, mib.effective_base(a));
}

#[test]
fn test_oid_conflict_keeps_earlier_owner() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        first OBJECT IDENTIFIER ::= { iso 5 }
        second OBJECT IDENTIFIER ::= { iso 5 }
        END
    "#};
    let mut mib = Mib::new();
    let module = mib.load(source);
    assert!(
        mib.module(module)
            .diagnostics
            .iter()
            .any(|d| d.code == codes::OID_CONFLICT)
    );
    let node = mib.node_by_oid(&[1, 5]).unwrap();
    assert_eq!(Some("first"), mib.node(node).name.as_deref());
}

#[test]
fn test_duplicate_definition() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        x OBJECT-TYPE
            SYNTAX Integer32 MAX-ACCESS read-only STATUS current DESCRIPTION ""
            ::= { t 1 }
        x OBJECT-TYPE
            SYNTAX Counter32 MAX-ACCESS read-only STATUS current DESCRIPTION ""
            ::= { t 2 }
        END
    "#};
    let mut mib = Mib::new();
    let module = mib.load(source);
    assert!(
        mib.module(module)
            .diagnostics
            .iter()
            .any(|d| d.code == codes::DUPLICATE_DEFINITION)
    );
}

#[test]
fn test_named_number_components_register_names() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        internet OBJECT IDENTIFIER ::= { iso org(3) dod(6) 1 }
        directory OBJECT IDENTIFIER ::= { internet 1 }
        mib-2 OBJECT IDENTIFIER ::= { org 6 1 2 1 }
        END
    "#};
    let mut mib = Mib::new();
    let module = mib.load(source);
    assert!(mib.module(module).diagnostics.is_empty(), "{:?}", mib.module(module).diagnostics);
    // org(3) registered a reusable name on the way down
    let org = mib.module(module).node("org").unwrap();
    assert_eq!(vec![1, 3], mib.oid(org));
    let mib2 = mib.module(module).node("mib-2").unwrap();
    assert_eq!(vec![1, 3, 6, 1, 2, 1], mib.oid(mib2));
    assert_eq!(
        vec![1, 3, 6, 1, 1],
        mib.oid(mib.module(module).node("directory").unwrap())
    );
}

#[test]
fn test_strictness_filters_resolver_diagnostics() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        x OBJECT-TYPE
            SYNTAX Integer32 MAX-ACCESS read-only STATUS current DESCRIPTION ""
            ::= { nowhere 1 }
        END
    "#};
    let mut permissive = Mib::with_strictness(Strictness::permissive());
    let module = permissive.load(source);
    // the unresolved-base warning is below the permissive floor
    assert!(
        permissive
            .module(module)
            .diagnostics
            .iter()
            .all(|d| d.code != codes::UNRESOLVED_IDENTIFIER)
    );

    let mut normal = Mib::new();
    let module = normal.load(source);
    assert!(
        normal
            .module(module)
            .diagnostics
            .iter()
            .any(|d| d.code == codes::UNRESOLVED_IDENTIFIER)
    );
}

#[test]
fn test_network_address_choice_collapses_to_ip() {
    let source = indoc! {br#"
        T DEFINITIONS ::= BEGIN
        Addr ::= CHOICE { internet IpAddress }
        END
    "#};
    let mut mib = Mib::new();
    let module = mib.load(source);
    let addr = mib.module(module).get_type("Addr").unwrap();
    assert_eq!(Some(BaseType::IpAddress), mib.effective_base(addr));
}
