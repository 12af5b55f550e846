//! Cross-module resolution: AST in, information model out.
//!
//! Runs as a sequence of passes over one parsed module against the
//! registry held by the [`Mib`]: import binding, a declare pass for
//! forward references, OID tree insertion (iterated to a fixpoint so
//! definition order does not matter), type chain threading, kind
//! inference, AUGMENTS/INDEX linking, member resolution for groups,
//! compliances and capabilities, and effective-value folding. Nothing
//! here fails on malformed input; placeholders keep downstream passes
//! going and diagnostics record what was wrong.

use std::collections::HashMap;

use crate::ast::{
    Access, ComplianceItem, ConstraintKind, Definition, EnterpriseClause, Ident, ModuleAst,
    ObjectTypeDef, OidComponentKind, OidValue, TypeSyntax, TypeSyntaxKind,
};
use crate::diag::{Diagnostic, Severity, codes};
use crate::model::{
    BaseType, Capabilities, CapabilitySupport, CapabilityVariation, Compliance,
    ComplianceGroupRef, ComplianceModuleRef, ComplianceObjectRef, Effective, Group, GroupId,
    GroupKind, GroupMember, IndexRef, Mib, Module, ModuleId, ModuleRevision, Node, NodeId,
    NodeKind, Notification, NotificationId, Object, ObjectId, Type, TypeId,
};
use crate::parser::Parser;
use crate::span::Span;

impl Mib {
    /// Lex, parse and resolve one module source against this registry.
    pub fn load(&mut self, source: &[u8]) -> ModuleId {
        let ast = Parser::with_strictness(source, self.strictness.clone()).parse_module();
        self.resolve(ast)
    }

    /// Resolve an already-parsed module against this registry.
    pub fn resolve(&mut self, ast: ModuleAst) -> ModuleId {
        log::debug!(
            "resolving module `{}` ({} definitions)",
            ast.name.name,
            ast.body.len()
        );
        Resolver::run(self, ast)
    }
}

/// Symbols visible through IMPORTS (or their placeholders).
#[derive(Default)]
struct Scope {
    types: HashMap<String, TypeId>,
    objects: HashMap<String, ObjectId>,
    nodes: HashMap<String, NodeId>,
    notifications: HashMap<String, NotificationId>,
    groups: HashMap<String, GroupId>,
}

struct Resolver<'a> {
    mib: &'a mut Mib,
    module: ModuleId,
    imports: Scope,
    diagnostics: Vec<Diagnostic>,
    /// Objects declared as `SEQUENCE OF` tables in this module.
    table_objects: Vec<ObjectId>,
}

impl<'a> Resolver<'a> {
    fn run(mib: &'a mut Mib, ast: ModuleAst) -> ModuleId {
        let module = ModuleId(mib.modules.len() as u32);
        let mut record = Module::new(ast.name.name.clone(), ast.dialect);
        record.diagnostics = ast.diagnostics.clone();
        mib.modules.push(record);
        mib.modules_by_name.insert(ast.name.name.clone(), module);

        let mut resolver = Resolver {
            mib,
            module,
            imports: Scope::default(),
            diagnostics: Vec::new(),
            table_objects: Vec::new(),
        };
        resolver.resolve_imports(&ast);
        resolver.declare(&ast);
        resolver.insert_oids(&ast);
        resolver.resolve_types(&ast);
        resolver.check_type_cycles();
        resolver.infer_kinds();
        resolver.link_augments_and_index(&ast);
        resolver.resolve_members(&ast);
        resolver.fold_effective();

        let mut diagnostics = std::mem::take(&mut resolver.diagnostics);
        mib.modules[module.index()]
            .diagnostics
            .append(&mut diagnostics);
        module
    }

    fn report(&mut self, severity: Severity, code: &'static str, span: Span, message: String) {
        if self.mib.strictness.should_report(code, severity) {
            let effective = self.mib.strictness.effective_severity(code, severity);
            self.diagnostics
                .push(Diagnostic::new(effective, code, span, message));
        }
    }

    fn module_mut(&mut self) -> &mut Module {
        &mut self.mib.modules[self.module.index()]
    }

    fn module_ref(&self) -> &Module {
        &self.mib.modules[self.module.index()]
    }

    // -- pass 2: imports ----------------------------------------------

    fn resolve_imports(&mut self, ast: &ModuleAst) {
        for import in &ast.imports {
            let exporter = self.mib.lookup_module(&import.module.name);
            if exporter.is_none() {
                self.report(
                    Severity::Error,
                    codes::UNRESOLVED_IMPORT,
                    import.module.span,
                    format!("module `{}` is not loaded", import.module.name),
                );
            }
            for symbol in &import.symbols {
                // Macro names and builtin type spellings arrive through
                // IMPORTS too; they need no binding.
                if crate::schema::keywords::classify(symbol.name.as_bytes()).is_some() {
                    continue;
                }
                match exporter {
                    Some(exporter) => self.bind_import(exporter, symbol),
                    None => self.placeholder_import(symbol),
                }
            }
        }
    }

    fn bind_import(&mut self, exporter: ModuleId, symbol: &Ident) {
        let module = self.mib.module(exporter);
        if let Some(id) = module.object(&symbol.name) {
            self.imports.objects.insert(symbol.name.clone(), id);
        } else if let Some(id) = module.get_type(&symbol.name) {
            self.imports.types.insert(symbol.name.clone(), id);
        } else if let Some(id) = module.notification(&symbol.name) {
            self.imports.notifications.insert(symbol.name.clone(), id);
        } else if let Some(id) = module.group(&symbol.name) {
            self.imports.groups.insert(symbol.name.clone(), id);
        } else if let Some(id) = module.node(&symbol.name) {
            self.imports.nodes.insert(symbol.name.clone(), id);
        } else {
            self.report(
                Severity::Error,
                codes::UNRESOLVED_IMPORT,
                symbol.span,
                format!(
                    "`{}` is not defined in module `{}`",
                    symbol.name,
                    self.mib.module(exporter).name
                ),
            );
            self.placeholder_import(symbol);
        }
    }

    /// An opaque stand-in with a name only: a Type for uppercase
    /// symbols, an Object otherwise.
    fn placeholder_import(&mut self, symbol: &Ident) {
        if symbol.name.starts_with(|c: char| c.is_ascii_uppercase()) {
            let ty = self.mib.alloc_type(Type::named(&symbol.name, None));
            self.imports.types.insert(symbol.name.clone(), ty);
        } else {
            let object = self.mib.alloc_object(Object::placeholder(&symbol.name));
            self.imports.objects.insert(symbol.name.clone(), object);
        }
    }

    // -- pass 3: declare ----------------------------------------------

    fn is_declared(&self, name: &str) -> bool {
        let module = self.module_ref();
        module.objects_by_name.contains_key(name)
            || module.types_by_name.contains_key(name)
            || module.notifications_by_name.contains_key(name)
            || module.groups_by_name.contains_key(name)
            || module.compliances_by_name.contains_key(name)
            || module.capabilities_by_name.contains_key(name)
    }

    fn declare(&mut self, ast: &ModuleAst) {
        for def in &ast.body {
            let name = def.name();
            match def {
                Definition::ObjectType(_)
                | Definition::TypeAssignment(_)
                | Definition::TextualConvention(_)
                | Definition::NotificationType(_)
                | Definition::TrapType(_)
                | Definition::ObjectGroup(_)
                | Definition::NotificationGroup(_)
                | Definition::ModuleCompliance(_)
                | Definition::AgentCapabilities(_)
                    if self.is_declared(&name.name) =>
                {
                    self.report(
                        Severity::Error,
                        codes::DUPLICATE_DEFINITION,
                        name.span,
                        format!("`{}` is already defined in this module", name.name),
                    );
                    continue;
                }
                _ => {}
            }
            match def {
                Definition::ObjectType(d) => {
                    let mut object = Object::placeholder(&d.name.name);
                    object.module = Some(self.module);
                    object.span = Some(d.span);
                    let id = self.mib.alloc_object(object);
                    let module = self.module_mut();
                    module.objects.push(id);
                    module.objects_by_name.insert(d.name.name.clone(), id);
                }
                Definition::TypeAssignment(d) => {
                    let ty = Type::named(&d.name.name, Some(self.module));
                    let id = self.mib.alloc_type(ty);
                    let module = self.module_mut();
                    module.types.push(id);
                    module.types_by_name.insert(d.name.name.clone(), id);
                }
                Definition::TextualConvention(d) => {
                    let mut ty = Type::named(&d.name.name, Some(self.module));
                    ty.is_textual_convention = true;
                    let id = self.mib.alloc_type(ty);
                    let module = self.module_mut();
                    module.types.push(id);
                    module.types_by_name.insert(d.name.name.clone(), id);
                }
                Definition::NotificationType(_) | Definition::TrapType(_) => {
                    let notification = Notification {
                        name: name.name.clone(),
                        module: Some(self.module),
                        node: None,
                        status: None,
                        description: None,
                        reference: None,
                        objects: Vec::new(),
                        span: Some(def.span()),
                    };
                    let id = self.mib.alloc_notification(notification);
                    let module = self.module_mut();
                    module.notifications.push(id);
                    module
                        .notifications_by_name
                        .insert(name.name.clone(), id);
                }
                Definition::ObjectGroup(_) | Definition::NotificationGroup(_) => {
                    let kind = if matches!(def, Definition::ObjectGroup(_)) {
                        GroupKind::Objects
                    } else {
                        GroupKind::Notifications
                    };
                    let group = Group {
                        name: name.name.clone(),
                        module: Some(self.module),
                        node: None,
                        kind,
                        status: None,
                        description: None,
                        reference: None,
                        members: Vec::new(),
                        span: Some(def.span()),
                    };
                    let id = self.mib.alloc_group(group);
                    let module = self.module_mut();
                    module.groups.push(id);
                    module.groups_by_name.insert(name.name.clone(), id);
                }
                Definition::ModuleCompliance(_) => {
                    let compliance = Compliance {
                        name: name.name.clone(),
                        module: Some(self.module),
                        node: None,
                        status: None,
                        description: None,
                        reference: None,
                        modules: Vec::new(),
                        span: Some(def.span()),
                    };
                    let id = self.mib.alloc_compliance(compliance);
                    let module = self.module_mut();
                    module.compliances.push(id);
                    module.compliances_by_name.insert(name.name.clone(), id);
                }
                Definition::AgentCapabilities(_) => {
                    let caps = Capabilities {
                        name: name.name.clone(),
                        module: Some(self.module),
                        node: None,
                        product_release: None,
                        status: None,
                        description: None,
                        reference: None,
                        supports: Vec::new(),
                        span: Some(def.span()),
                    };
                    let id = self.mib.alloc_capabilities(caps);
                    let module = self.module_mut();
                    module.capabilities.push(id);
                    module.capabilities_by_name.insert(name.name.clone(), id);
                }
                Definition::ValueAssignment(_)
                | Definition::ModuleIdentity(_)
                | Definition::ObjectIdentity(_)
                | Definition::MacroDefinition(_) => {}
            }
        }
    }

    // -- pass 4: OID tree ---------------------------------------------

    /// Insert all OID-carrying definitions, iterating to a fixpoint so
    /// that in-module forward references resolve; whatever is left gets
    /// a detached placeholder base.
    fn insert_oids(&mut self, ast: &ModuleAst) {
        let mut pending: Vec<&Definition> = ast.body.iter().collect();
        loop {
            let before = pending.len();
            let mut still_pending = Vec::new();
            for def in pending {
                if !self.try_insert(def, false) {
                    still_pending.push(def);
                }
            }
            pending = still_pending;
            if pending.is_empty() || pending.len() == before {
                break;
            }
        }
        for def in pending {
            self.try_insert(def, true);
        }
    }

    /// Returns false when the definition's OID base is not yet known and
    /// the caller should retry later.
    fn try_insert(&mut self, def: &Definition, placeholders: bool) -> bool {
        let node = match def {
            Definition::ValueAssignment(d) => self.resolve_oid(&d.oid, placeholders),
            Definition::ObjectType(d) => self.resolve_oid(&d.oid, placeholders),
            Definition::ObjectIdentity(d) => self.resolve_oid(&d.oid, placeholders),
            Definition::ModuleIdentity(d) => self.resolve_oid(&d.oid, placeholders),
            Definition::NotificationType(d) => self.resolve_oid(&d.oid, placeholders),
            Definition::ObjectGroup(d) => self.resolve_oid(&d.oid, placeholders),
            Definition::NotificationGroup(d) => self.resolve_oid(&d.oid, placeholders),
            Definition::ModuleCompliance(d) => self.resolve_oid(&d.oid, placeholders),
            Definition::AgentCapabilities(d) => self.resolve_oid(&d.oid, placeholders),
            Definition::TrapType(d) => {
                let enterprise = match &d.enterprise {
                    Some(EnterpriseClause::Oid(oid)) => self.resolve_oid(oid, placeholders),
                    Some(EnterpriseClause::Name(name)) => {
                        match self.lookup_node(&name.name) {
                            Some(node) => Ok(Some(node)),
                            None if placeholders => {
                                Ok(Some(self.placeholder_node(&name.name, name.span)))
                            }
                            None => Err(()),
                        }
                    }
                    None => Ok(None),
                };
                // v1 traps live at enterprise.0.trapNumber by convention
                enterprise.map(|enterprise| {
                    enterprise.map(|base| {
                        let zero = self.mib.new_child(base, 0);
                        self.mib.new_child(zero, d.number)
                    })
                })
            }
            Definition::TypeAssignment(_)
            | Definition::TextualConvention(_)
            | Definition::MacroDefinition(_) => Ok(None),
        };
        let node = match node {
            Err(()) => return false,
            Ok(None) => return true,
            Ok(Some(node)) => node,
        };

        let name = def.name().clone();
        let node = self.claim_node(node, &name);
        match def {
            Definition::ValueAssignment(_) | Definition::ObjectIdentity(_) => {
                self.set_kind(node, NodeKind::Identity);
            }
            Definition::ModuleIdentity(d) => {
                self.set_kind(node, NodeKind::Identity);
                if self.module_ref().identity.is_some() {
                    self.report(
                        Severity::Error,
                        codes::MODULE_IDENTITY_DUPLICATE,
                        d.name.span,
                        "module already has a MODULE-IDENTITY".into(),
                    );
                } else {
                    let module = self.module_mut();
                    module.identity = Some(node);
                    module.organization = d.organization.as_ref().map(|t| t.value.clone());
                    module.contact_info = d.contact_info.as_ref().map(|t| t.value.clone());
                    module.description = d.description.as_ref().map(|t| t.value.clone());
                    module.revisions = d
                        .revisions
                        .iter()
                        .map(|r| ModuleRevision {
                            date: r.date.value.clone(),
                            description: r.description.as_ref().map(|t| t.value.clone()),
                        })
                        .collect();
                }
            }
            Definition::ObjectType(_) => {
                if let Some(object) = self.module_ref().object(&name.name) {
                    self.mib.objects[object.index()].node = Some(node);
                    if self.mib.nodes[node.index()].object.is_none() {
                        self.mib.nodes[node.index()].object = Some(object);
                    }
                }
            }
            Definition::NotificationType(_) | Definition::TrapType(_) => {
                self.set_kind(node, NodeKind::NotificationLeaf);
                if let Some(id) = self.module_ref().notification(&name.name) {
                    self.mib.notifications[id.index()].node = Some(node);
                }
            }
            Definition::ObjectGroup(_) | Definition::NotificationGroup(_) => {
                self.set_kind(node, NodeKind::Group);
                if let Some(id) = self.module_ref().group(&name.name) {
                    self.mib.groups[id.index()].node = Some(node);
                }
            }
            Definition::ModuleCompliance(_) => {
                self.set_kind(node, NodeKind::Identity);
                if let Some(id) = self.module_ref().compliance(&name.name) {
                    self.mib.compliances[id.index()].node = Some(node);
                }
            }
            Definition::AgentCapabilities(_) => {
                self.set_kind(node, NodeKind::Identity);
                if let Some(id) = self.module_ref().agent_capabilities(&name.name) {
                    self.mib.capabilities[id.index()].node = Some(node);
                }
            }
            _ => {}
        }
        true
    }

    fn set_kind(&mut self, node: NodeId, kind: NodeKind) {
        let node = &mut self.mib.nodes[node.index()];
        if node.kind == NodeKind::Unknown {
            node.kind = kind;
        }
    }

    /// Attach `name` to `node`, merging with an unnamed node and
    /// reporting a conflict against a differently-named earlier owner.
    fn claim_node(&mut self, node: NodeId, name: &Ident) -> NodeId {
        let existing = self.mib.nodes[node.index()].name.clone();
        match existing {
            Some(ref other) if other != &name.name => {
                self.report(
                    Severity::Error,
                    codes::OID_CONFLICT,
                    name.span,
                    format!(
                        "OID already registered to `{other}`; keeping the earlier owner"
                    ),
                );
            }
            Some(_) => {}
            None => {
                let record = &mut self.mib.nodes[node.index()];
                record.name = Some(name.name.clone());
                record.module = Some(self.module);
                record.span = Some(name.span);
            }
        }
        let module = self.module_mut();
        if let std::collections::hash_map::Entry::Vacant(entry) =
            module.nodes_by_name.entry(name.name.clone())
        {
            entry.insert(node);
            module.nodes.push(node);
        }
        node
    }

    /// Resolve an OID value. `Err(())` means the base name is unknown
    /// and the caller may retry after other definitions have landed.
    fn resolve_oid(&mut self, oid: &OidValue, placeholders: bool) -> Result<Option<NodeId>, ()> {
        let mut components = oid.components.iter();
        let Some(first) = components.next() else {
            self.report(
                Severity::Error,
                codes::PARSE_ERROR,
                oid.span,
                "empty OID value".into(),
            );
            return Ok(None);
        };
        let mut current = match &first.kind {
            OidComponentKind::Number(n) => {
                let root = self.mib.root;
                self.mib.new_child(root, *n)
            }
            OidComponentKind::Name(name) => match self.lookup_node(&name.name) {
                Some(node) => node,
                None if placeholders => self.placeholder_node(&name.name, name.span),
                None => return Err(()),
            },
            OidComponentKind::NamedNumber(name, n) => match self.lookup_node(&name.name) {
                Some(node) => node,
                None => {
                    // A named number carries enough to create the node
                    // under the root.
                    let root = self.mib.root;
                    let node = self.mib.new_child(root, *n);
                    self.claim_node(node, name)
                }
            },
            OidComponentKind::QualifiedName(module, name)
            | OidComponentKind::QualifiedNamedNumber(module, name, _) => {
                match self.lookup_qualified(module, name) {
                    Some(node) => node,
                    None if placeholders => self.placeholder_node(&name.name, name.span),
                    None => return Err(()),
                }
            }
        };
        for component in components {
            current = match &component.kind {
                OidComponentKind::Number(n) => self.mib.new_child(current, *n),
                OidComponentKind::NamedNumber(name, n) => {
                    let child = self.mib.new_child(current, *n);
                    self.claim_node(child, name)
                }
                OidComponentKind::QualifiedNamedNumber(_, name, n) => {
                    let child = self.mib.new_child(current, *n);
                    self.claim_node(child, name)
                }
                OidComponentKind::Name(name) => {
                    let found = self.mib.nodes[current.index()]
                        .children
                        .values()
                        .copied()
                        .find(|&c| self.mib.node(c).name.as_deref() == Some(&name.name));
                    match found {
                        Some(child) => child,
                        None => {
                            self.report(
                                Severity::Warning,
                                codes::UNRESOLVED_IDENTIFIER,
                                name.span,
                                format!("`{}` does not name a registered sub-identifier", name.name),
                            );
                            return Ok(None);
                        }
                    }
                }
                OidComponentKind::QualifiedName(module, name) => {
                    match self.lookup_qualified(module, name) {
                        Some(node) => node,
                        None => {
                            self.report(
                                Severity::Warning,
                                codes::UNRESOLVED_IDENTIFIER,
                                name.span,
                                format!("`{}.{}` is not known", module.name, name.name),
                            );
                            return Ok(None);
                        }
                    }
                }
            };
        }
        Ok(Some(current))
    }

    /// A detached node for a base name nothing defines; reused on every
    /// later reference to the same name.
    fn placeholder_node(&mut self, name: &str, span: Span) -> NodeId {
        if let Some(node) = self.module_ref().node(name) {
            return node;
        }
        self.report(
            Severity::Warning,
            codes::UNRESOLVED_IDENTIFIER,
            span,
            format!("`{name}` cannot be resolved; creating a placeholder"),
        );
        let node = self.mib.alloc_node(Node::new(0, None));
        {
            let record = &mut self.mib.nodes[node.index()];
            record.name = Some(name.to_owned());
            record.module = Some(self.module);
            record.span = Some(span);
        }
        let module = self.module_mut();
        module.nodes.push(node);
        module.nodes_by_name.insert(name.to_owned(), node);
        // If the name came in through IMPORTS as an object placeholder,
        // hang the node on it.
        if let Some(&object) = self.imports.objects.get(name) {
            self.mib.objects[object.index()].node = Some(node);
        }
        node
    }

    /// Name → node: this module's named nodes, then imports, then the
    /// well-known roots.
    fn lookup_node(&self, name: &str) -> Option<NodeId> {
        if let Some(node) = self.module_ref().node(name) {
            return Some(node);
        }
        if let Some(&node) = self.imports.nodes.get(name) {
            return Some(node);
        }
        if let Some(&object) = self.imports.objects.get(name) {
            if let Some(node) = self.mib.object(object).node {
                return Some(node);
            }
        }
        if let Some(&notification) = self.imports.notifications.get(name) {
            if let Some(node) = self.mib.notification(notification).node {
                return Some(node);
            }
        }
        if let Some(&group) = self.imports.groups.get(name) {
            if let Some(node) = self.mib.group(group).node {
                return Some(node);
            }
        }
        self.mib.roots_by_name.get(name).copied()
    }

    fn lookup_qualified(&self, module: &Ident, name: &Ident) -> Option<NodeId> {
        let exporter = self.mib.lookup_module(&module.name)?;
        let exporter = self.mib.module(exporter);
        if let Some(node) = exporter.node(&name.name) {
            return Some(node);
        }
        exporter
            .object(&name.name)
            .and_then(|o| self.mib.object(o).node)
    }

    // -- pass 5: types ------------------------------------------------

    fn resolve_types(&mut self, ast: &ModuleAst) {
        for def in &ast.body {
            match def {
                Definition::TypeAssignment(d) => {
                    if let Some(ty) = self.module_ref().get_type(&d.name.name) {
                        self.mib.types[ty.index()].span = Some(d.span);
                        self.apply_syntax(ty, &d.syntax);
                    }
                }
                Definition::TextualConvention(d) => {
                    let Some(ty) = self.module_ref().get_type(&d.name.name) else {
                        continue;
                    };
                    {
                        let record = &mut self.mib.types[ty.index()];
                        record.span = Some(d.span);
                        record.display_hint = d.display_hint.as_ref().map(|t| t.value.clone());
                        record.status = d.status.map(|s| s.value);
                        record.description = d.description.as_ref().map(|t| t.value.clone());
                        record.reference = d.reference.as_ref().map(|t| t.value.clone());
                    }
                    if let Some(syntax) = &d.syntax {
                        self.apply_syntax(ty, syntax);
                    }
                }
                Definition::ObjectType(d) => self.resolve_object_type(d),
                _ => {}
            }
        }
    }

    fn resolve_object_type(&mut self, def: &ObjectTypeDef) {
        let Some(object) = self.module_ref().object(&def.name.name) else {
            return;
        };
        let ty = def.syntax.as_ref().map(|syntax| {
            let resolved = self.object_syntax(syntax);
            if syntax.is_sequence_of() {
                self.table_objects.push(object);
            }
            resolved
        });
        let record = &mut self.mib.objects[object.index()];
        record.ty = ty.flatten();
        record.access = def.access.map(|a| a.value);
        record.status = def.status.map(|s| s.value);
        record.description = def.description.as_ref().map(|t| t.value.clone());
        record.reference = def.reference.as_ref().map(|t| t.value.clone());
        record.units = def.units.as_ref().map(|t| t.value.clone());
        record.defval = def.defval.as_ref().map(|d| d.content.clone());
    }

    /// Type of an OBJECT-TYPE's SYNTAX: a named reference resolves
    /// directly, plain base spellings hit the builtin anchors, anything
    /// inline becomes an anonymous type.
    fn object_syntax(&mut self, syntax: &TypeSyntax) -> Option<TypeId> {
        match &syntax.kind {
            TypeSyntaxKind::TypeRef(name) => Some(self.resolve_type_ref(name)),
            TypeSyntaxKind::SequenceOf(entry) => Some(self.resolve_type_ref(entry)),
            TypeSyntaxKind::OctetString => self.mib.builtin_type("OCTET STRING"),
            TypeSyntaxKind::ObjectIdentifier => self.mib.builtin_type("OBJECT IDENTIFIER"),
            _ => {
                let ty = self.mib.alloc_type(Type::anonymous(self.module));
                self.apply_syntax(ty, syntax);
                Some(ty)
            }
        }
    }

    /// Thread `syntax` onto an existing type record: parent link, base
    /// override, and inline constraints.
    fn apply_syntax(&mut self, ty: TypeId, syntax: &TypeSyntax) {
        match &syntax.kind {
            TypeSyntaxKind::TypeRef(name) => {
                let parent = self.resolve_type_ref(name);
                self.mib.types[ty.index()].parent = Some(parent);
            }
            TypeSyntaxKind::IntegerEnum(named) => {
                let parent = self.mib.builtin_type("INTEGER");
                let record = &mut self.mib.types[ty.index()];
                record.parent = parent;
                record.base = Some(BaseType::Enumeration);
                record.enums = named.clone();
            }
            TypeSyntaxKind::Bits(named) => {
                let parent = self.mib.builtin_type("BITS");
                let record = &mut self.mib.types[ty.index()];
                record.parent = parent;
                record.base = Some(BaseType::Bits);
                record.bits = named.clone();
            }
            TypeSyntaxKind::OctetString => {
                self.mib.types[ty.index()].parent = self.mib.builtin_type("OCTET STRING");
            }
            TypeSyntaxKind::ObjectIdentifier => {
                self.mib.types[ty.index()].parent = self.mib.builtin_type("OBJECT IDENTIFIER");
            }
            TypeSyntaxKind::SequenceOf(entry) => {
                let parent = self.resolve_type_ref(entry);
                self.mib.types[ty.index()].parent = Some(parent);
            }
            TypeSyntaxKind::Sequence(_) => {
                self.mib.types[ty.index()].is_sequence = true;
            }
            TypeSyntaxKind::Choice(fields) => {
                // SMIv1 `NetworkAddress ::= CHOICE { internet IpAddress }`
                // is the one CHOICE that matters; it collapses to its
                // IpAddress arm.
                let ip = fields.iter().any(|f| {
                    matches!(&f.syntax.kind, TypeSyntaxKind::TypeRef(n) if n.name == "IpAddress")
                });
                if ip {
                    self.mib.types[ty.index()].parent = self.mib.builtin_type("IpAddress");
                }
            }
            TypeSyntaxKind::Constrained(inner, constraint) => {
                self.apply_syntax(ty, inner);
                let record = &mut self.mib.types[ty.index()];
                match constraint.kind {
                    ConstraintKind::Size => {
                        record.sizes = constraint.ranges.clone();
                    }
                    ConstraintKind::Value => {
                        record.ranges = constraint.ranges.clone();
                    }
                }
            }
        }
    }

    /// Named type lookup: module scope, then imports, then builtins. An
    /// unknown name gets one diagnostic and a shared placeholder.
    fn resolve_type_ref(&mut self, name: &Ident) -> TypeId {
        if let Some(ty) = self.module_ref().get_type(&name.name) {
            return ty;
        }
        if let Some(&ty) = self.imports.types.get(&name.name) {
            return ty;
        }
        if let Some(ty) = self.mib.builtin_type(&name.name) {
            return ty;
        }
        self.report(
            Severity::Warning,
            codes::UNRESOLVED_IDENTIFIER,
            name.span,
            format!("type `{}` cannot be resolved", name.name),
        );
        let ty = self.mib.alloc_type(Type::named(&name.name, None));
        self.imports.types.insert(name.name.clone(), ty);
        ty
    }

    /// Every parent chain must terminate; break cycles and report them.
    fn check_type_cycles(&mut self) {
        let ids: Vec<TypeId> = self.module_ref().types.clone();
        for start in ids {
            let mut seen = vec![start];
            let mut current = start;
            while let Some(parent) = self.mib.get_type(current).parent {
                if seen.contains(&parent) {
                    let span = self
                        .mib
                        .get_type(start)
                        .span
                        .unwrap_or(Span::empty(0));
                    let name = self
                        .mib
                        .get_type(current)
                        .name
                        .clone()
                        .unwrap_or_default();
                    self.report(
                        Severity::Error,
                        codes::CYCLIC_TYPE,
                        span,
                        format!("type chain through `{name}` is cyclic; clearing the parent"),
                    );
                    self.mib.types[current.index()].parent = None;
                    break;
                }
                seen.push(parent);
                current = parent;
            }
        }
    }

    // -- pass 6: kinds ------------------------------------------------

    fn infer_kinds(&mut self) {
        // tables and rows first, then the leaves that depend on them
        for object in std::mem::take(&mut self.table_objects) {
            if let Some(node) = self.mib.object(object).node {
                self.mib.nodes[node.index()].kind = NodeKind::Table;
            }
        }
        let objects: Vec<ObjectId> = self.module_ref().objects.clone();
        for &object in &objects {
            let record = self.mib.object(object);
            let Some(node) = record.node else { continue };
            if self.mib.node(node).kind != NodeKind::Unknown {
                continue;
            }
            let is_row = record
                .ty
                .map(|ty| self.mib.get_type(ty).is_sequence)
                .unwrap_or(false);
            if is_row {
                self.mib.nodes[node.index()].kind = NodeKind::Row;
            }
        }
        // a not-accessible leaf directly under a table is a row even if
        // its entry type never resolved
        for &object in &objects {
            let record = self.mib.object(object);
            let Some(node) = record.node else { continue };
            if self.mib.node(node).kind != NodeKind::Unknown {
                continue;
            }
            let under_table = self
                .mib
                .node(node)
                .parent
                .map(|p| self.mib.node(p).kind == NodeKind::Table)
                .unwrap_or(false);
            if under_table && record.access == Some(Access::NotAccessible) {
                self.mib.nodes[node.index()].kind = NodeKind::Row;
            }
        }
        for &object in &objects {
            let Some(node) = self.mib.object(object).node else {
                continue;
            };
            if self.mib.node(node).kind != NodeKind::Unknown {
                continue;
            }
            let under_row = self
                .mib
                .node(node)
                .parent
                .map(|p| self.mib.node(p).kind == NodeKind::Row)
                .unwrap_or(false);
            self.mib.nodes[node.index()].kind = if under_row {
                NodeKind::Column
            } else {
                NodeKind::Scalar
            };
        }
    }

    // -- pass 7: augments & index -------------------------------------

    fn lookup_object(&self, name: &str) -> Option<ObjectId> {
        self.module_ref()
            .object(name)
            .or_else(|| self.imports.objects.get(name).copied())
    }

    fn link_augments_and_index(&mut self, ast: &ModuleAst) {
        for def in &ast.body {
            let Definition::ObjectType(d) = def else {
                continue;
            };
            let Some(object) = self.module_ref().object(&d.name.name) else {
                continue;
            };
            if let Some(target) = &d.augments {
                match self.lookup_object(&target.name) {
                    Some(row) => self.mib.objects[object.index()].augments = Some(row),
                    None => self.report(
                        Severity::Error,
                        codes::MISSING_AUGMENTS,
                        target.span,
                        format!("AUGMENTS target `{}` cannot be resolved", target.name),
                    ),
                }
            }
            if let Some(index) = &d.index {
                let mut resolved = Vec::with_capacity(index.items.len());
                for item in &index.items {
                    let target = if item.name.name == "OCTET STRING" {
                        None
                    } else {
                        let found = self.lookup_object(&item.name.name);
                        if found.is_none() {
                            self.report(
                                Severity::Error,
                                codes::MISSING_INDEX,
                                item.name.span,
                                format!("index object `{}` cannot be resolved", item.name.name),
                            );
                        }
                        found
                    };
                    resolved.push(IndexRef {
                        implied: item.implied,
                        name: item.name.name.clone(),
                        object: target,
                    });
                }
                self.mib.objects[object.index()].index = resolved;
            }
        }
        // walk every augments chain once so cycles are reported at
        // resolve time; the query side stays silent
        let objects: Vec<ObjectId> = self.module_ref().objects.clone();
        for start in objects {
            let mut visited = vec![start];
            let mut current = start;
            while let Some(next) = self.mib.object(current).augments {
                if visited.contains(&next) {
                    let span = self
                        .mib
                        .object(start)
                        .span
                        .unwrap_or(Span::empty(0));
                    let name = self.mib.object(start).name.clone();
                    self.report(
                        Severity::Warning,
                        codes::CYCLIC_AUGMENTS,
                        span,
                        format!("AUGMENTS chain of `{name}` is cyclic"),
                    );
                    break;
                }
                visited.push(next);
                current = next;
            }
        }
    }

    // -- pass 8: groups, compliances, capabilities ---------------------

    fn lookup_notification(&self, name: &str) -> Option<NotificationId> {
        self.module_ref()
            .notification(name)
            .or_else(|| self.imports.notifications.get(name).copied())
    }

    fn lookup_group(&self, name: &str) -> Option<GroupId> {
        self.module_ref()
            .group(name)
            .or_else(|| self.imports.groups.get(name).copied())
    }

    fn group_ref(&mut self, name: &Ident, description: Option<String>) -> ComplianceGroupRef {
        let group = self.lookup_group(&name.name);
        if group.is_none() {
            self.report(
                Severity::Warning,
                codes::UNRESOLVED_IDENTIFIER,
                name.span,
                format!("group `{}` cannot be resolved", name.name),
            );
        }
        ComplianceGroupRef {
            name: name.name.clone(),
            group,
            description,
        }
    }

    fn resolve_members(&mut self, ast: &ModuleAst) {
        for def in &ast.body {
            match def {
                Definition::NotificationType(d) => {
                    let Some(id) = self.module_ref().notification(&d.name.name) else {
                        continue;
                    };
                    let members = self.object_members(&d.objects);
                    let record = &mut self.mib.notifications[id.index()];
                    record.status = d.status.map(|s| s.value);
                    record.description = d.description.as_ref().map(|t| t.value.clone());
                    record.reference = d.reference.as_ref().map(|t| t.value.clone());
                    record.objects = members;
                }
                Definition::TrapType(d) => {
                    let Some(id) = self.module_ref().notification(&d.name.name) else {
                        continue;
                    };
                    let members = self.object_members(&d.variables);
                    let record = &mut self.mib.notifications[id.index()];
                    record.description = d.description.as_ref().map(|t| t.value.clone());
                    record.reference = d.reference.as_ref().map(|t| t.value.clone());
                    record.objects = members;
                }
                Definition::ObjectGroup(d) => {
                    let Some(id) = self.module_ref().group(&d.name.name) else {
                        continue;
                    };
                    let members = d
                        .objects
                        .iter()
                        .map(|name| self.group_member(name))
                        .collect();
                    let record = &mut self.mib.groups[id.index()];
                    record.status = d.status.map(|s| s.value);
                    record.description = d.description.as_ref().map(|t| t.value.clone());
                    record.reference = d.reference.as_ref().map(|t| t.value.clone());
                    record.members = members;
                }
                Definition::NotificationGroup(d) => {
                    let Some(id) = self.module_ref().group(&d.name.name) else {
                        continue;
                    };
                    let members = d
                        .notifications
                        .iter()
                        .map(|name| self.group_member(name))
                        .collect();
                    let record = &mut self.mib.groups[id.index()];
                    record.status = d.status.map(|s| s.value);
                    record.description = d.description.as_ref().map(|t| t.value.clone());
                    record.reference = d.reference.as_ref().map(|t| t.value.clone());
                    record.members = members;
                }
                Definition::ModuleCompliance(d) => {
                    let Some(id) = self.module_ref().compliance(&d.name.name) else {
                        continue;
                    };
                    let mut modules = Vec::with_capacity(d.modules.len());
                    for arm in &d.modules {
                        let module = arm
                            .module
                            .as_ref()
                            .map(|m| self.mib.lookup_module(&m.name))
                            .unwrap_or(Some(self.module));
                        let mandatory_groups = arm
                            .mandatory_groups
                            .iter()
                            .map(|g| self.group_ref(g, None))
                            .collect();
                        let mut groups = Vec::new();
                        let mut objects = Vec::new();
                        for item in &arm.items {
                            match item {
                                ComplianceItem::Group {
                                    name, description, ..
                                } => {
                                    let description =
                                        description.as_ref().map(|t| t.value.clone());
                                    groups.push(self.group_ref(name, description));
                                }
                                ComplianceItem::Object {
                                    name,
                                    min_access,
                                    description,
                                    ..
                                } => {
                                    objects.push(ComplianceObjectRef {
                                        name: name.name.clone(),
                                        object: self.lookup_object(&name.name),
                                        min_access: min_access.map(|a| a.value),
                                        description: description
                                            .as_ref()
                                            .map(|t| t.value.clone()),
                                    });
                                }
                            }
                        }
                        modules.push(ComplianceModuleRef {
                            module_name: arm.module.as_ref().map(|m| m.name.clone()),
                            module,
                            mandatory_groups,
                            groups,
                            objects,
                        });
                    }
                    let record = &mut self.mib.compliances[id.index()];
                    record.status = d.status.map(|s| s.value);
                    record.description = d.description.as_ref().map(|t| t.value.clone());
                    record.reference = d.reference.as_ref().map(|t| t.value.clone());
                    record.modules = modules;
                }
                Definition::AgentCapabilities(d) => {
                    let Some(id) = self.module_ref().agent_capabilities(&d.name.name) else {
                        continue;
                    };
                    let mut supports = Vec::with_capacity(d.supports.len());
                    for arm in &d.supports {
                        let includes = arm
                            .includes
                            .iter()
                            .map(|g| self.group_ref(g, None))
                            .collect();
                        let variations = arm
                            .variations
                            .iter()
                            .map(|v| CapabilityVariation {
                                name: v.name.name.clone(),
                                object: self.lookup_object(&v.name.name),
                                notification: self.lookup_notification(&v.name.name),
                                access: v.access.map(|a| a.value),
                                description: v.description.as_ref().map(|t| t.value.clone()),
                            })
                            .collect();
                        supports.push(CapabilitySupport {
                            module_name: arm.module.name.clone(),
                            module: self.mib.lookup_module(&arm.module.name),
                            includes,
                            variations,
                        });
                    }
                    let record = &mut self.mib.capabilities[id.index()];
                    record.product_release =
                        d.product_release.as_ref().map(|t| t.value.clone());
                    record.status = d.status.map(|s| s.value);
                    record.description = d.description.as_ref().map(|t| t.value.clone());
                    record.reference = d.reference.as_ref().map(|t| t.value.clone());
                    record.supports = supports;
                }
                _ => {}
            }
        }
    }

    fn object_members(&mut self, names: &[Ident]) -> Vec<(String, Option<ObjectId>)> {
        names
            .iter()
            .map(|name| {
                let object = self.lookup_object(&name.name);
                if object.is_none() {
                    self.report(
                        Severity::Warning,
                        codes::UNRESOLVED_IDENTIFIER,
                        name.span,
                        format!("object `{}` cannot be resolved", name.name),
                    );
                }
                (name.name.clone(), object)
            })
            .collect()
    }

    fn group_member(&mut self, name: &Ident) -> GroupMember {
        let object = self.lookup_object(&name.name);
        let notification = if object.is_none() {
            self.lookup_notification(&name.name)
        } else {
            None
        };
        if object.is_none() && notification.is_none() {
            self.report(
                Severity::Warning,
                codes::UNRESOLVED_IDENTIFIER,
                name.span,
                format!("group member `{}` cannot be resolved", name.name),
            );
        }
        GroupMember {
            name: name.name.clone(),
            object,
            notification,
        }
    }

    // -- pass 9: effective folding ------------------------------------

    fn fold_effective(&mut self) {
        let objects: Vec<ObjectId> = self.module_ref().objects.clone();
        for object in objects {
            let Some(ty) = self.mib.object(object).ty else {
                continue;
            };
            let effective = Effective {
                display_hint: self.mib.effective_display_hint(ty).map(str::to_owned),
                sizes: self.mib.effective_sizes(ty).to_vec(),
                ranges: self.mib.effective_ranges(ty).to_vec(),
                enums: self.mib.effective_enums(ty).to_vec(),
                bits: self.mib.effective_bits(ty).to_vec(),
            };
            log::trace!(
                "folded effective constraints for `{}`",
                self.mib.object(object).name
            );
            self.mib.objects[object.index()].effective = effective;
        }
    }
}
