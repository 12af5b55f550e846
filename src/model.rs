//! The resolved information model.
//!
//! All records live in arenas owned by a [`Mib`] compilation context and
//! reference each other through `u32` id handles, so cross-module links
//! (imported symbols, type parents, augments targets) stay valid for the
//! lifetime of the context and cycles in pathological inputs cannot
//! create ownership loops.

use std::collections::{BTreeMap, HashMap};

use crate::ast::{Access, DefValContent, Dialect, NamedNumber, RangeSpec, Status};
use crate::diag::{Diagnostic, Strictness};
use crate::span::Span;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            #[inline]
            #[must_use]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

id_type!(
    /// Handle of a [`Module`].
    ModuleId
);
id_type!(
    /// Handle of an [`Object`].
    ObjectId
);
id_type!(
    /// Handle of a [`Type`].
    TypeId
);
id_type!(
    /// Handle of an OID tree [`Node`].
    NodeId
);
id_type!(
    /// Handle of a [`Notification`].
    NotificationId
);
id_type!(
    /// Handle of a [`Group`].
    GroupId
);
id_type!(
    /// Handle of a [`Compliance`].
    ComplianceId
);
id_type!(
    /// Handle of a [`Capabilities`].
    CapabilitiesId
);

/// Base type a resolved type chain bottoms out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Integer32,
    Unsigned32,
    Counter32,
    Counter64,
    Gauge32,
    TimeTicks,
    IpAddress,
    Opaque,
    OctetString,
    ObjectIdentifier,
    Bits,
    Enumeration,
}

/// What a node in the OID tree is, inferred from syntax and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Row,
    Column,
    Table,
    Group,
    NotificationLeaf,
    Identity,
    Unknown,
}

/// One node of the global OID tree, unique by absolute OID.
#[derive(Debug, Clone)]
pub struct Node {
    pub sub_id: u32,
    pub parent: Option<NodeId>,
    /// Children by sub-identifier, in OID order.
    pub children: BTreeMap<u32, NodeId>,
    pub name: Option<String>,
    pub module: Option<ModuleId>,
    pub object: Option<ObjectId>,
    pub kind: NodeKind,
    /// Span of the declaration that named this node, if any.
    pub span: Option<Span>,
}

impl Node {
    pub(crate) fn new(sub_id: u32, parent: Option<NodeId>) -> Self {
        Self {
            sub_id,
            parent,
            children: BTreeMap::new(),
            name: None,
            module: None,
            object: None,
            kind: NodeKind::Unknown,
            span: None,
        }
    }
}

/// A resolved type: builtin primitive anchor, named assignment, textual
/// convention, or anonymous inline refinement.
///
/// `parent` forms the type chain; a chain terminates at a primitive
/// anchor whose `parent` is `None`. The *effective* value of a
/// constraint attribute is the nearest non-empty value walking up the
/// chain — see the `effective_*` queries on [`Mib`].
#[derive(Debug, Clone)]
pub struct Type {
    pub name: Option<String>,
    pub module: Option<ModuleId>,
    /// Definitive base for anchors, enumerations and BITS; `None` where
    /// the base is inherited through `parent` (and for `SEQUENCE` row
    /// types, which have no scalar base at all).
    pub base: Option<BaseType>,
    pub parent: Option<TypeId>,
    pub status: Option<Status>,
    pub display_hint: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub sizes: Vec<RangeSpec>,
    pub ranges: Vec<RangeSpec>,
    pub enums: Vec<NamedNumber>,
    pub bits: Vec<NamedNumber>,
    pub is_textual_convention: bool,
    /// Set for `SEQUENCE { ... }` assignments (conceptual rows).
    pub is_sequence: bool,
    pub span: Option<Span>,
}

impl Type {
    pub(crate) fn named(name: &str, module: Option<ModuleId>) -> Self {
        Self {
            name: Some(name.to_owned()),
            module,
            base: None,
            parent: None,
            status: None,
            display_hint: None,
            description: None,
            reference: None,
            sizes: Vec::new(),
            ranges: Vec::new(),
            enums: Vec::new(),
            bits: Vec::new(),
            is_textual_convention: false,
            is_sequence: false,
            span: None,
        }
    }

    pub(crate) fn anonymous(module: ModuleId) -> Self {
        let mut ty = Self::named("", Some(module));
        ty.name = None;
        ty
    }
}

/// One resolved index item. `object` is `None` for the synthetic
/// `OCTET STRING` vendor idiom and for unresolvable names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRef {
    pub implied: bool,
    pub name: String,
    pub object: Option<ObjectId>,
}

/// Inline constraints folded with the type chain at resolution time;
/// the object's own inline values win.
#[derive(Debug, Clone, Default)]
pub struct Effective {
    pub display_hint: Option<String>,
    pub sizes: Vec<RangeSpec>,
    pub ranges: Vec<RangeSpec>,
    pub enums: Vec<NamedNumber>,
    pub bits: Vec<NamedNumber>,
}

/// A resolved OBJECT-TYPE (or an import placeholder carrying only a
/// name).
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub module: Option<ModuleId>,
    pub node: Option<NodeId>,
    pub ty: Option<TypeId>,
    pub access: Option<Access>,
    pub status: Option<Status>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub units: Option<String>,
    pub defval: Option<DefValContent>,
    pub augments: Option<ObjectId>,
    pub index: Vec<IndexRef>,
    pub effective: Effective,
    pub span: Option<Span>,
}

impl Object {
    pub(crate) fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            module: None,
            node: None,
            ty: None,
            access: None,
            status: None,
            description: None,
            reference: None,
            units: None,
            defval: None,
            augments: None,
            index: Vec::new(),
            effective: Effective::default(),
            span: None,
        }
    }
}

/// A NOTIFICATION-TYPE or a v1 TRAP-TYPE after resolution.
#[derive(Debug, Clone)]
pub struct Notification {
    pub name: String,
    pub module: Option<ModuleId>,
    pub node: Option<NodeId>,
    pub status: Option<Status>,
    pub description: Option<String>,
    pub reference: Option<String>,
    /// OBJECTS / VARIABLES members, in declaration order.
    pub objects: Vec<(String, Option<ObjectId>)>,
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Objects,
    Notifications,
}

/// A member of an OBJECT-GROUP or NOTIFICATION-GROUP.
#[derive(Debug, Clone)]
pub struct GroupMember {
    pub name: String,
    pub object: Option<ObjectId>,
    pub notification: Option<NotificationId>,
}

#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    pub module: Option<ModuleId>,
    pub node: Option<NodeId>,
    pub kind: GroupKind,
    pub status: Option<Status>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub members: Vec<GroupMember>,
    pub span: Option<Span>,
}

/// A group requirement or object refinement inside one compliance arm.
#[derive(Debug, Clone)]
pub struct ComplianceGroupRef {
    pub name: String,
    pub group: Option<GroupId>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ComplianceObjectRef {
    pub name: String,
    pub object: Option<ObjectId>,
    pub min_access: Option<Access>,
    pub description: Option<String>,
}

/// One `MODULE ...` arm of a MODULE-COMPLIANCE.
#[derive(Debug, Clone)]
pub struct ComplianceModuleRef {
    /// `None` for the `MODULE -- this module` form.
    pub module_name: Option<String>,
    pub module: Option<ModuleId>,
    pub mandatory_groups: Vec<ComplianceGroupRef>,
    pub groups: Vec<ComplianceGroupRef>,
    pub objects: Vec<ComplianceObjectRef>,
}

#[derive(Debug, Clone)]
pub struct Compliance {
    pub name: String,
    pub module: Option<ModuleId>,
    pub node: Option<NodeId>,
    pub status: Option<Status>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub modules: Vec<ComplianceModuleRef>,
    pub span: Option<Span>,
}

/// An AGENT-CAPABILITIES variation after resolution.
#[derive(Debug, Clone)]
pub struct CapabilityVariation {
    pub name: String,
    pub object: Option<ObjectId>,
    pub notification: Option<NotificationId>,
    pub access: Option<Access>,
    pub description: Option<String>,
}

/// One `SUPPORTS module` arm.
#[derive(Debug, Clone)]
pub struct CapabilitySupport {
    pub module_name: String,
    pub module: Option<ModuleId>,
    pub includes: Vec<ComplianceGroupRef>,
    pub variations: Vec<CapabilityVariation>,
}

#[derive(Debug, Clone)]
pub struct Capabilities {
    pub name: String,
    pub module: Option<ModuleId>,
    pub node: Option<NodeId>,
    pub product_release: Option<String>,
    pub status: Option<Status>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub supports: Vec<CapabilitySupport>,
    pub span: Option<Span>,
}

#[derive(Debug, Clone)]
pub struct ModuleRevision {
    pub date: String,
    pub description: Option<String>,
}

/// One resolved module. Collections are in declaration order; the
/// `*_by_name` maps give O(1) lookup.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub dialect: Dialect,
    /// Node of the MODULE-IDENTITY, when the module has one.
    pub identity: Option<NodeId>,
    pub organization: Option<String>,
    pub contact_info: Option<String>,
    pub description: Option<String>,
    pub revisions: Vec<ModuleRevision>,
    pub objects: Vec<ObjectId>,
    pub types: Vec<TypeId>,
    pub notifications: Vec<NotificationId>,
    pub groups: Vec<GroupId>,
    pub compliances: Vec<ComplianceId>,
    pub capabilities: Vec<CapabilitiesId>,
    pub nodes: Vec<NodeId>,
    /// Lexer, parser and resolver diagnostics for this module, in that
    /// order.
    pub diagnostics: Vec<Diagnostic>,
    pub(crate) objects_by_name: HashMap<String, ObjectId>,
    pub(crate) types_by_name: HashMap<String, TypeId>,
    pub(crate) notifications_by_name: HashMap<String, NotificationId>,
    pub(crate) groups_by_name: HashMap<String, GroupId>,
    pub(crate) compliances_by_name: HashMap<String, ComplianceId>,
    pub(crate) capabilities_by_name: HashMap<String, CapabilitiesId>,
    pub(crate) nodes_by_name: HashMap<String, NodeId>,
}

impl Module {
    pub(crate) fn new(name: String, dialect: Dialect) -> Self {
        Self {
            name,
            dialect,
            identity: None,
            organization: None,
            contact_info: None,
            description: None,
            revisions: Vec::new(),
            objects: Vec::new(),
            types: Vec::new(),
            notifications: Vec::new(),
            groups: Vec::new(),
            compliances: Vec::new(),
            capabilities: Vec::new(),
            nodes: Vec::new(),
            diagnostics: Vec::new(),
            objects_by_name: HashMap::new(),
            types_by_name: HashMap::new(),
            notifications_by_name: HashMap::new(),
            groups_by_name: HashMap::new(),
            compliances_by_name: HashMap::new(),
            capabilities_by_name: HashMap::new(),
            nodes_by_name: HashMap::new(),
        }
    }

    #[must_use]
    pub fn object(&self, name: &str) -> Option<ObjectId> {
        self.objects_by_name.get(name).copied()
    }

    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<TypeId> {
        self.types_by_name.get(name).copied()
    }

    #[must_use]
    pub fn notification(&self, name: &str) -> Option<NotificationId> {
        self.notifications_by_name.get(name).copied()
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<GroupId> {
        self.groups_by_name.get(name).copied()
    }

    #[must_use]
    pub fn compliance(&self, name: &str) -> Option<ComplianceId> {
        self.compliances_by_name.get(name).copied()
    }

    #[must_use]
    pub fn agent_capabilities(&self, name: &str) -> Option<CapabilitiesId> {
        self.capabilities_by_name.get(name).copied()
    }

    #[must_use]
    pub fn node(&self, name: &str) -> Option<NodeId> {
        self.nodes_by_name.get(name).copied()
    }
}

/// The compilation context: module registry, arenas and the global OID
/// tree. Pre-loads the well-known roots and the builtin base types; one
/// `Mib` accumulates every module loaded into it.
#[derive(Debug)]
pub struct Mib {
    pub(crate) strictness: Strictness,
    pub(crate) modules: Vec<Module>,
    pub(crate) modules_by_name: HashMap<String, ModuleId>,
    pub(crate) objects: Vec<Object>,
    pub(crate) types: Vec<Type>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) notifications: Vec<Notification>,
    pub(crate) groups: Vec<Group>,
    pub(crate) compliances: Vec<Compliance>,
    pub(crate) capabilities: Vec<Capabilities>,
    pub(crate) root: NodeId,
    pub(crate) roots_by_name: HashMap<String, NodeId>,
    pub(crate) builtins: HashMap<&'static str, TypeId>,
}

impl Mib {
    #[must_use]
    pub fn new() -> Self {
        Self::with_strictness(Strictness::default())
    }

    #[must_use]
    pub fn with_strictness(strictness: Strictness) -> Self {
        let mut mib = Self {
            strictness,
            modules: Vec::new(),
            modules_by_name: HashMap::new(),
            objects: Vec::new(),
            types: Vec::new(),
            nodes: Vec::new(),
            notifications: Vec::new(),
            groups: Vec::new(),
            compliances: Vec::new(),
            capabilities: Vec::new(),
            root: NodeId(0),
            roots_by_name: HashMap::new(),
            builtins: HashMap::new(),
        };
        mib.root = mib.alloc_node(Node::new(0, None));
        for &(name, sub_id) in crate::schema::builtins::WELL_KNOWN_ROOTS {
            let id = mib.new_child(mib.root, sub_id);
            let node = &mut mib.nodes[id.index()];
            node.name = Some(name.to_owned());
            node.kind = NodeKind::Identity;
            mib.roots_by_name.insert(name.to_owned(), id);
        }
        for &(name, base) in crate::schema::builtins::BUILTIN_TYPES {
            let mut ty = Type::named(name, None);
            ty.base = Some(base);
            let id = TypeId(mib.types.len() as u32);
            mib.types.push(ty);
            mib.builtins.insert(name, id);
        }
        mib
    }

    // -- registry ------------------------------------------------------

    /// Look up an already-loaded module.
    #[must_use]
    pub fn lookup_module(&self, name: &str) -> Option<ModuleId> {
        self.modules_by_name.get(name).copied()
    }

    /// Loaded modules, in load order.
    pub fn module_ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        (0..self.modules.len() as u32).map(ModuleId)
    }

    // -- arena accessors -----------------------------------------------

    #[must_use]
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    #[must_use]
    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    #[must_use]
    pub fn get_type(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[must_use]
    pub fn notification(&self, id: NotificationId) -> &Notification {
        &self.notifications[id.index()]
    }

    #[must_use]
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.index()]
    }

    #[must_use]
    pub fn compliance(&self, id: ComplianceId) -> &Compliance {
        &self.compliances[id.index()]
    }

    #[must_use]
    pub fn agent_capabilities(&self, id: CapabilitiesId) -> &Capabilities {
        &self.capabilities[id.index()]
    }

    /// Root of the global OID tree (the unnamed node above `iso`).
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Builtin primitive anchor by spelling (`"Integer32"`,
    /// `"OCTET STRING"`, ...).
    #[must_use]
    pub fn builtin_type(&self, name: &str) -> Option<TypeId> {
        self.builtins.get(name).copied()
    }

    // -- arena internals -----------------------------------------------

    pub(crate) fn alloc_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Child of `parent` at `sub_id`, created when absent.
    pub(crate) fn new_child(&mut self, parent: NodeId, sub_id: u32) -> NodeId {
        if let Some(&existing) = self.nodes[parent.index()].children.get(&sub_id) {
            return existing;
        }
        let id = self.alloc_node(Node::new(sub_id, Some(parent)));
        self.nodes[parent.index()].children.insert(sub_id, id);
        id
    }

    pub(crate) fn alloc_object(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    pub(crate) fn alloc_type(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    pub(crate) fn alloc_notification(&mut self, notification: Notification) -> NotificationId {
        let id = NotificationId(self.notifications.len() as u32);
        self.notifications.push(notification);
        id
    }

    pub(crate) fn alloc_group(&mut self, group: Group) -> GroupId {
        let id = GroupId(self.groups.len() as u32);
        self.groups.push(group);
        id
    }

    pub(crate) fn alloc_compliance(&mut self, compliance: Compliance) -> ComplianceId {
        let id = ComplianceId(self.compliances.len() as u32);
        self.compliances.push(compliance);
        id
    }

    pub(crate) fn alloc_capabilities(&mut self, caps: Capabilities) -> CapabilitiesId {
        let id = CapabilitiesId(self.capabilities.len() as u32);
        self.capabilities.push(caps);
        id
    }

    // -- OID queries ---------------------------------------------------

    /// Absolute OID of a node: the strictly descending path of
    /// sub-identifiers from the root.
    #[must_use]
    pub fn oid(&self, id: NodeId) -> Vec<u32> {
        let mut path = Vec::new();
        let mut current = Some(id);
        // parent links cannot cycle (children always get fresh ids), but
        // the walk is still bounded by the arena size
        let mut budget = self.nodes.len() + 1;
        while let Some(node_id) = current {
            if node_id == self.root || budget == 0 {
                break;
            }
            budget -= 1;
            let node = self.node(node_id);
            path.push(node.sub_id);
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// Descend from the root along `oid`.
    #[must_use]
    pub fn node_by_oid(&self, oid: &[u32]) -> Option<NodeId> {
        let mut current = self.root;
        for sub_id in oid {
            current = *self.node(current).children.get(sub_id)?;
        }
        Some(current)
    }

    // -- effective type attributes -------------------------------------

    /// Walk `start`'s chain upward, yielding each type once. Cycle-safe.
    fn chain(&self, start: TypeId) -> Vec<TypeId> {
        let mut seen = Vec::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if seen.contains(&id) {
                break;
            }
            seen.push(id);
            current = self.get_type(id).parent;
        }
        seen
    }

    /// Nearest definitive base walking up the parent chain.
    #[must_use]
    pub fn effective_base(&self, ty: TypeId) -> Option<BaseType> {
        self.chain(ty)
            .into_iter()
            .find_map(|id| self.get_type(id).base)
    }

    #[must_use]
    pub fn effective_sizes(&self, ty: TypeId) -> &[RangeSpec] {
        for id in self.chain(ty) {
            let t = self.get_type(id);
            if !t.sizes.is_empty() {
                return &self.get_type(id).sizes;
            }
        }
        &[]
    }

    #[must_use]
    pub fn effective_ranges(&self, ty: TypeId) -> &[RangeSpec] {
        for id in self.chain(ty) {
            if !self.get_type(id).ranges.is_empty() {
                return &self.get_type(id).ranges;
            }
        }
        &[]
    }

    #[must_use]
    pub fn effective_enums(&self, ty: TypeId) -> &[NamedNumber] {
        for id in self.chain(ty) {
            if !self.get_type(id).enums.is_empty() {
                return &self.get_type(id).enums;
            }
        }
        &[]
    }

    #[must_use]
    pub fn effective_bits(&self, ty: TypeId) -> &[NamedNumber] {
        for id in self.chain(ty) {
            if !self.get_type(id).bits.is_empty() {
                return &self.get_type(id).bits;
            }
        }
        &[]
    }

    #[must_use]
    pub fn effective_display_hint(&self, ty: TypeId) -> Option<&str> {
        for id in self.chain(ty) {
            if let Some(hint) = self.get_type(id).display_hint.as_deref() {
                return Some(hint);
            }
        }
        None
    }

    // -- relational navigation -----------------------------------------

    fn node_kind(&self, object: ObjectId) -> Option<NodeKind> {
        self.object(object).node.map(|n| self.node(n).kind)
    }

    /// The table above a row or column object, or the object itself if
    /// it is a table.
    #[must_use]
    pub fn table(&self, object: ObjectId) -> Option<ObjectId> {
        let mut node = self.object(object).node?;
        for _ in 0..3 {
            let n = self.node(node);
            if n.kind == NodeKind::Table {
                return n.object;
            }
            node = n.parent?;
        }
        None
    }

    /// The row above a column, or the object itself if it is a row.
    #[must_use]
    pub fn row(&self, object: ObjectId) -> Option<ObjectId> {
        let mut node = self.object(object).node?;
        for _ in 0..2 {
            let n = self.node(node);
            if n.kind == NodeKind::Row {
                return n.object;
            }
            node = n.parent?;
        }
        None
    }

    /// The single conceptual-row object under a table.
    #[must_use]
    pub fn table_entry(&self, table: ObjectId) -> Option<ObjectId> {
        let node = self.object(table).node?;
        self.node(node)
            .children
            .values()
            .find_map(|&child| {
                let n = self.node(child);
                (n.kind == NodeKind::Row).then_some(n.object).flatten()
            })
    }

    /// Column objects of a row (or of a table, via its row), in OID
    /// order.
    #[must_use]
    pub fn columns(&self, object: ObjectId) -> Vec<ObjectId> {
        let row = match self.node_kind(object) {
            Some(NodeKind::Row) => Some(object),
            Some(NodeKind::Table) => self.table_entry(object),
            _ => None,
        };
        let Some(row) = row.and_then(|r| self.object(r).node) else {
            return Vec::new();
        };
        self.node(row)
            .children
            .values()
            .filter_map(|&child| {
                let n = self.node(child);
                (n.kind == NodeKind::Column).then_some(n.object).flatten()
            })
            .collect()
    }

    /// The object's own INDEX, else the index inherited through the
    /// AUGMENTS chain. A cycle yields the empty list.
    #[must_use]
    pub fn effective_indexes(&self, object: ObjectId) -> Vec<IndexRef> {
        let mut visited = Vec::new();
        let mut current = object;
        loop {
            if visited.contains(&current) {
                return Vec::new();
            }
            visited.push(current);
            let record = self.object(current);
            if !record.index.is_empty() {
                return record.index.clone();
            }
            match record.augments {
                Some(target) => current = target,
                None => return Vec::new(),
            }
        }
    }

    fn objects_of_kind(&self, module: ModuleId, kind: NodeKind) -> Vec<ObjectId> {
        self.module(module)
            .objects
            .iter()
            .copied()
            .filter(|&o| self.node_kind(o) == Some(kind))
            .collect()
    }

    /// All table objects of a module, in declaration order.
    #[must_use]
    pub fn tables(&self, module: ModuleId) -> Vec<ObjectId> {
        self.objects_of_kind(module, NodeKind::Table)
    }

    #[must_use]
    pub fn rows(&self, module: ModuleId) -> Vec<ObjectId> {
        self.objects_of_kind(module, NodeKind::Row)
    }

    #[must_use]
    pub fn scalars(&self, module: ModuleId) -> Vec<ObjectId> {
        self.objects_of_kind(module, NodeKind::Scalar)
    }

    #[must_use]
    pub fn module_columns(&self, module: ModuleId) -> Vec<ObjectId> {
        self.objects_of_kind(module, NodeKind::Column)
    }
}

impl Default for Mib {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn test_preloaded_roots_and_builtins() {
    let mib = Mib::new();
    let iso = mib.roots_by_name["iso"];
    assert_eq!(vec![1], mib.oid(iso));
    assert_eq!(Some(iso), mib.node_by_oid(&[1]));
    assert_eq!(None, mib.node_by_oid(&[9]));
    let integer = mib.builtin_type("INTEGER").unwrap();
    assert_eq!(Some(BaseType::Integer32), mib.effective_base(integer));
    let network = mib.builtin_type("NetworkAddress").unwrap();
    assert_eq!(Some(BaseType::IpAddress), mib.effective_base(network));
    assert!(mib.builtin_type("DisplayString").is_none());
}
