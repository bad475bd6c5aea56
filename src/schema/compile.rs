//! Compiling a type-definition graph into a schema tree.
//!
//! This is a private module. It only adds methods to [`SchemaTree`].

use tracing::{debug, warn};
use super::error::{CompileWarning, SchemaError};
use super::node::{NodeId, SchemaNode, SchemaTree};
use super::typedef::{BuiltinKind, Component, Module, TypeDef, TypeRef};


//------------ SchemaTree ----------------------------------------------------

impl SchemaTree {
    /// The maximum nesting depth of a compiled schema.
    pub const MAX_DEPTH: usize = 64;

    /// Compiles the schema for the top-level type `top` of a module.
    ///
    /// Non-fatal problems such as duplicate tags are collected as warnings
    /// and are available via [`SchemaTree::warnings`].
    pub fn compile(module: &Module, top: &str) -> Result<Self, SchemaError> {
        let mut compiler = Compiler {
            module,
            nodes: Vec::new(),
            warnings: Vec::new(),
            active: Vec::new(),
        };
        if module.get(top).is_none() {
            return Err(SchemaError::UnknownType {
                name: top.into(), field: None
            })
        }
        let root = Component::new(top, TypeRef::Named(top.into()));
        compiler.compile(&root, None, 0)?;
        debug!(
            "compiled schema for '{}' with {} nodes",
            top, compiler.nodes.len()
        );
        Ok(SchemaTree {
            nodes: compiler.nodes,
            warnings: compiler.warnings,
        })
    }
}


//------------ Compiler ------------------------------------------------------

struct Compiler<'a> {
    module: &'a Module,
    nodes: Vec<SchemaNode>,
    warnings: Vec<CompileWarning>,

    /// The type names currently being expanded.
    active: Vec<&'a str>,
}

impl<'a> Compiler<'a> {
    fn compile(
        &mut self,
        component: &'a Component,
        parent: Option<NodeId>,
        depth: usize,
    ) -> Result<NodeId, SchemaError> {
        if depth > SchemaTree::MAX_DEPTH {
            return Err(SchemaError::TooDeep { field: component.name.clone() })
        }

        // Follow type references until we hit an actual definition. The
        // component’s own tag wins over the tag of a referenced type.
        let mut tag = component.tag.as_deref();
        let mut explicit = component.explicit;
        let mut ty = &component.ty;
        let mut entered = 0;
        let def: &'a TypeDef = loop {
            match ty {
                TypeRef::Inline(def) => break def,
                TypeRef::Named(name) => {
                    if self.active.contains(&name.as_str()) {
                        return Err(SchemaError::Recursive {
                            name: name.clone()
                        })
                    }
                    let assignment = match self.module.get(name) {
                        Some(assignment) => assignment,
                        None => {
                            return Err(SchemaError::UnknownType {
                                name: name.clone(),
                                field: Some(component.name.clone()),
                            })
                        }
                    };
                    if tag.is_none() {
                        tag = assignment.tag.as_deref();
                        explicit = assignment.explicit;
                    }
                    self.active.push(name.as_str());
                    entered += 1;
                    ty = &assignment.ty;
                }
            }
        };

        let id = NodeId::from_index(self.nodes.len());
        let mut node = SchemaNode::new(
            def.kind, component.name.clone(), parent
        );
        node.optional = component.optional;
        node.tag = match tag {
            Some(tag) => match tag.trim().parse::<u32>() {
                Ok(tag) => Some(tag),
                Err(_) => {
                    self.warn(CompileWarning::InvalidTag {
                        field: component.name.clone(),
                        tag: tag.into(),
                    });
                    None
                }
            }
            None => None
        };
        // A tagged CHOICE always gets an explicit tag since the choice
        // itself needs the tag of the chosen alternative.
        node.explicit = node.tag.is_some()
            && (explicit || def.kind == BuiltinKind::Choice);
        if def.kind == BuiltinKind::Enumerated {
            for (name, value) in &def.named_values {
                node.enum_table.entry(*value).or_insert_with(|| name.clone());
            }
        }
        self.nodes.push(node);

        if def.kind.is_container() {
            for member in &def.components {
                let child = self.compile(member, Some(id), depth + 1)?;
                self.register(id, child);
            }
        }

        let len = self.active.len();
        self.active.truncate(len - entered);
        Ok(id)
    }

    /// Registers a compiled member with its container.
    fn register(&mut self, id: NodeId, child: NodeId) {
        let container_kind = self.nodes[id.index()].kind;
        let child_tag = self.nodes[child.index()].tag;
        let child_kind = self.nodes[child.index()].kind;

        match child_tag {
            Some(tag) => {
                let existing = self.nodes[id.index()].children.get(&tag).copied();
                match existing {
                    Some(existing) => {
                        let warning = CompileWarning::DuplicateTag {
                            container: self.nodes[id.index()].field_name.clone(),
                            tag,
                            kept: self.nodes[existing.index()].field_name.clone(),
                            ignored: self.nodes[child.index()].field_name.clone(),
                        };
                        self.warn(warning);
                    }
                    None => {
                        self.nodes[id.index()].children.insert(tag, child);
                    }
                }
            }
            None => {
                if container_kind != BuiltinKind::Choice
                    && child_kind != BuiltinKind::Choice
                {
                    debug!(
                        "member '{}' of '{}' has no tag, resolving by position",
                        self.nodes[child.index()].field_name,
                        self.nodes[id.index()].field_name,
                    );
                    self.nodes[child.index()].untagged = true;
                }
            }
        }

        let container = &mut self.nodes[id.index()];
        if container_kind == BuiltinKind::Choice {
            container.alternatives.push(child);
        }
        container.members.push(child);
    }

    fn warn(&mut self, warning: CompileWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}


//============ Tests =========================================================
