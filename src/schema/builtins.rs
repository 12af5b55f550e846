//! Built-in base types and well-known OID roots.
//!
//! Every [`Mib`](crate::Mib) pre-loads these as a pseudo-module: the
//! primitive type anchors terminate all type chains (`parent == None`,
//! empty constraint lists), and the three roots anchor the OID tree.

use crate::model::BaseType;

/// Children of the tree root: `ccitt(0)`, `iso(1)`, `joint-iso-ccitt(2)`.
pub static WELL_KNOWN_ROOTS: &[(&str, u32)] =
    &[("ccitt", 0), ("iso", 1), ("joint-iso-ccitt", 2)];

/// Primitive anchors by spelling, including the SMIv1 aliases
/// (`Counter`, `Gauge`, `NetworkAddress`). Sorted for readability; the
/// consumer builds a map.
pub static BUILTIN_TYPES: &[(&str, BaseType)] = &[
    ("BITS", BaseType::Bits),
    ("Counter", BaseType::Counter32),
    ("Counter32", BaseType::Counter32),
    ("Counter64", BaseType::Counter64),
    ("Gauge", BaseType::Gauge32),
    ("Gauge32", BaseType::Gauge32),
    ("INTEGER", BaseType::Integer32),
    ("Integer32", BaseType::Integer32),
    ("IpAddress", BaseType::IpAddress),
    ("NetworkAddress", BaseType::IpAddress),
    ("OBJECT IDENTIFIER", BaseType::ObjectIdentifier),
    ("OCTET STRING", BaseType::OctetString),
    ("Opaque", BaseType::Opaque),
    ("TimeTicks", BaseType::TimeTicks),
    ("Unsigned32", BaseType::Unsigned32),
];
