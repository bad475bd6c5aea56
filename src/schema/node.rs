//! The compiled schema tree.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use super::error::CompileWarning;
use super::typedef::BuiltinKind;


//------------ NodeId --------------------------------------------------------

/// The identifier of a node within a [`SchemaTree`].
///
/// Identifiers are only meaningful for the tree that issued them.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    pub(super) fn from_index(idx: usize) -> Self {
        NodeId(idx)
    }

    /// Returns the index of the node in the tree’s arena.
    pub fn index(self) -> usize {
        self.0
    }
}


//------------ SchemaNode ----------------------------------------------------

/// A position in the compiled schema.
///
/// There is one node for every type position reachable from the top-level
/// type. Nodes refer to each other through [`NodeId`]s.
#[derive(Clone, Debug)]
pub struct SchemaNode {
    pub(super) kind: BuiltinKind,
    pub(super) field_name: String,
    pub(super) tag: Option<u32>,
    pub(super) explicit: bool,
    pub(super) optional: bool,
    pub(super) untagged: bool,
    pub(super) members: Vec<NodeId>,
    pub(super) children: HashMap<u32, NodeId>,
    pub(super) alternatives: Vec<NodeId>,
    pub(super) enum_table: BTreeMap<i64, String>,
    pub(super) parent: Option<NodeId>,
}

impl SchemaNode {
    pub(super) fn new(
        kind: BuiltinKind, field_name: String, parent: Option<NodeId>
    ) -> Self {
        SchemaNode {
            kind,
            field_name,
            tag: None,
            explicit: false,
            optional: false,
            untagged: false,
            members: Vec::new(),
            children: HashMap::new(),
            alternatives: Vec::new(),
            enum_table: BTreeMap::new(),
            parent,
        }
    }

    /// Returns the builtin kind of the node.
    pub fn kind(&self) -> BuiltinKind {
        self.kind
    }

    /// Returns the name of the field.
    ///
    /// For the root node, this is the name of the top-level type.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Returns the tag number of the node if it has one.
    pub fn tag(&self) -> Option<u32> {
        self.tag
    }

    /// Returns whether the node’s tag is explicit.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Returns whether the node is an optional member.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns whether the node is a member resolved by position.
    ///
    /// This is true for members without a tag that aren’t a CHOICE.
    pub fn is_untagged(&self) -> bool {
        self.untagged
    }

    /// Returns all members in declaration order.
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// Returns the member registered under the given tag.
    pub fn child(&self, tag: u32) -> Option<NodeId> {
        self.children.get(&tag).copied()
    }

    /// Returns the alternatives of a CHOICE.
    pub fn alternatives(&self) -> &[NodeId] {
        &self.alternatives
    }

    /// Returns the name for a value of an ENUMERATED.
    pub fn enum_name(&self, value: i64) -> Option<&str> {
        self.enum_table.get(&value).map(String::as_str)
    }

    /// Returns the named values of an ENUMERATED.
    pub fn enum_table(&self) -> &BTreeMap<i64, String> {
        &self.enum_table
    }

    /// Returns the parent node.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}


//------------ SchemaTree ----------------------------------------------------

/// A compiled schema rooted at a top-level type.
///
/// The tree is created once via [`SchemaTree::compile`] and is immutable
/// afterwards. It can be shared freely between threads.
#[derive(Clone, Debug)]
pub struct SchemaTree {
    pub(super) nodes: Vec<SchemaNode>,
    pub(super) warnings: Vec<CompileWarning>,
}

impl SchemaTree {
    /// Returns the identifier of the root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the node for an identifier.
    ///
    /// # Panics
    ///
    /// Panics if the identifier was issued by a different tree.
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the tree is empty.
    ///
    /// A compiled tree always has at least a root, so this is always false.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the warnings produced while compiling.
    pub fn warnings(&self) -> &[CompileWarning] {
        &self.warnings
    }

    /// Returns the members of a node in tag path order.
    ///
    /// Members with a tag come first, followed by those without, both in
    /// declaration order. Tag path lookup and the path index both walk the
    /// tree in this order.
    pub fn path_order(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let members = self.node(id).members();
        let tagged = members.iter().copied().filter(
            move |&member| self.node(member).tag.is_some()
        );
        let untagged = members.iter().copied().filter(
            move |&member| self.node(member).tag.is_none()
        );
        tagged.chain(untagged)
    }

    /// Finds the node for a tag path.
    ///
    /// The path consists of the tags of all tagged nodes from the root
    /// downwards. Nodes without tags don’t appear in the path, so several
    /// nodes may share one. In this case, the first one in a pre-order walk
    /// that prefers tagged members wins.
    pub fn find(&self, path: &[u32]) -> Option<NodeId> {
        self.find_from(self.root(), path)
    }

    fn find_from(&self, id: NodeId, path: &[u32]) -> Option<NodeId> {
        let rest = match self.node(id).tag {
            Some(tag) => match path.split_first() {
                Some((&first, rest)) if first == tag => rest,
                _ => return None,
            }
            None => path,
        };
        if rest.is_empty() {
            return Some(id)
        }
        self.path_order(id).find_map(|member| self.find_from(member, rest))
    }

    /// Returns the closest ancestor that has a tag.
    pub fn nearest_tagged_ancestor(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.node(id).parent;
        while let Some(ancestor) = current {
            if self.node(ancestor).tag.is_some() {
                return Some(ancestor)
            }
            current = self.node(ancestor).parent;
        }
        None
    }

    /// Returns the field names from the root to the node.
    pub fn lineage(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            names.push(self.node(node).field_name());
            current = self.node(node).parent;
        }
        let mut res = String::new();
        for name in names.iter().rev() {
            res.push('/');
            res.push_str(name);
        }
        res
    }

    fn fmt_node(
        &self, id: NodeId, depth: usize, f: &mut fmt::Formatter
    ) -> fmt::Result {
        let node = self.node(id);
        write!(f, "{:width$}", "", width = depth * 2)?;
        match node.tag {
            Some(tag) if node.explicit => write!(f, "[{}] EXPLICIT ", tag)?,
            Some(tag) => write!(f, "[{}] ", tag)?,
            None if node.untagged => write!(f, "(positional) ")?,
            None => { }
        }
        write!(f, "{}: {}", node.field_name, node.kind)?;
        if node.optional {
            write!(f, " OPTIONAL")?;
        }
        if !node.enum_table.is_empty() {
            write!(f, " {{")?;
            for (i, (value, name)) in node.enum_table.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, " {}({})", name, value)?;
            }
            write!(f, " }}")?;
        }
        writeln!(f)?;
        for &member in &node.members {
            self.fmt_node(member, depth + 1, f)?;
        }
        Ok(())
    }
}

impl fmt::Display for SchemaTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_node(self.root(), 0, f)
    }
}
