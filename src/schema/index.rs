//! The tag-path index.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use crate::resolve::TagStack;
use super::node::{NodeId, SchemaTree};


//------------ TagPathIndex --------------------------------------------------

/// A flat view of a schema tree keyed by tag path.
///
/// The index maps the textual tag path of every node, e.g., `/1/0/3`, to
/// the node itself. It is derived from the tree and holds no metadata of
/// its own, so it can never disagree with it: looking up a path in the
/// index gives the same node as [`SchemaTree::find`].
#[derive(Clone, Debug, Default)]
pub struct TagPathIndex {
    entries: Vec<(String, NodeId)>,
    paths: HashMap<String, usize>,
}

impl TagPathIndex {
    /// Builds the index for a tree.
    pub fn build(tree: &SchemaTree) -> Self {
        let mut res = TagPathIndex::default();
        let mut stack = TagStack::new();
        res.visit(tree, tree.root(), &mut stack);
        res
    }

    fn visit(&mut self, tree: &SchemaTree, id: NodeId, stack: &mut TagStack) {
        let tag = tree.node(id).tag();
        if let Some(tag) = tag {
            if stack.push(tag).is_err() {
                debug!(
                    "tag path too deep at '{}', not indexed", tree.lineage(id)
                );
                return
            }
        }
        let path = stack.to_string();
        if !self.paths.contains_key(&path) {
            self.paths.insert(path.clone(), self.entries.len());
            self.entries.push((path, id));
        }
        for member in tree.path_order(id) {
            self.visit(tree, member, stack);
        }
        if tag.is_some() {
            // We pushed above, so this can’t underflow.
            let _ = stack.pop();
        }
    }

    /// Returns the node for a textual tag path.
    pub fn get(&self, path: &str) -> Option<NodeId> {
        self.paths.get(path).and_then(|&idx| {
            self.entries.get(idx).map(|entry| entry.1)
        })
    }

    /// Returns the node for a tag path.
    pub fn get_path(&self, path: &[u32]) -> Option<NodeId> {
        self.get(&format_path(path))
    }

    /// Returns an iterator over all paths and their nodes.
    ///
    /// The paths are returned in the order of the walk that built the
    /// index.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.entries.iter().map(|(path, id)| (path.as_str(), *id))
    }

    /// Returns the number of paths in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a value that displays the index for the given tree.
    ///
    /// Each line contains the tag path, the field names leading to the
    /// node, and the node’s kind, separated by commas.
    pub fn display<'a>(&'a self, tree: &'a SchemaTree) -> impl fmt::Display + 'a {
        DisplayIndex { index: self, tree }
    }
}


//------------ DisplayIndex --------------------------------------------------

struct DisplayIndex<'a> {
    index: &'a TagPathIndex,
    tree: &'a SchemaTree,
}

impl<'a> fmt::Display for DisplayIndex<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (path, id) in self.index.iter() {
            writeln!(f, "{},{},{}",
                path, self.tree.lineage(id), self.tree.node(id).kind()
            )?;
        }
        Ok(())
    }
}


//------------ Helper Functions ----------------------------------------------

/// Formats a tag path the same way [`TagStack`] displays.
pub fn format_path(path: &[u32]) -> String {
    if path.is_empty() {
        return "/".into()
    }
    let mut res = String::new();
    for tag in path {
        res.push('/');
        res.push_str(&tag.to_string());
    }
    res
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::typedef::{BuiltinKind, Component, Module, TypeDef};
    use BuiltinKind::*;

    fn module() -> Module {
        let mut module = Module::new("Test");
        module.assign_type("Top", TypeDef::with_components(Sequence, vec![
            Component::tagged("a", 0, Integer),
            Component::new("inner", TypeDef::with_components(Sequence, vec![
                Component::tagged("shadowed", 0, Boolean),
                Component::tagged("b", 5, Boolean),
            ])),
            Component::tagged("c", 1, TypeDef::with_components(Choice, vec![
                Component::tagged("x", 0, Integer),
                Component::tagged("y", 1, TypeDef::with_components(
                    Sequence, vec![Component::tagged("z", 7, Null)]
                )),
            ])),
            Component::new("loose", Choice),
        ]));
        module
    }

    #[test]
    fn index_matches_tree() {
        let tree = SchemaTree::compile(&module(), "Top").unwrap();
        let index = TagPathIndex::build(&tree);
        assert!(!index.is_empty());
        for (path, id) in index.iter() {
            let tags: Vec<u32> = path.split('/').filter(|s| !s.is_empty())
                .map(|s| s.parse().unwrap()).collect();
            assert_eq!(tree.find(&tags), Some(id), "path {}", path);
            assert_eq!(index.get_path(&tags), Some(id));
        }
    }

    #[test]
    fn paths() {
        let tree = SchemaTree::compile(&module(), "Top").unwrap();
        let index = TagPathIndex::build(&tree);
        let name = |path: &str| {
            index.get(path).map(|id| tree.node(id).field_name().to_string())
        };
        assert_eq!(name("/").as_deref(), Some("Top"));
        assert_eq!(name("/0").as_deref(), Some("a"));
        assert_eq!(name("/5").as_deref(), Some("b"));
        assert_eq!(name("/1").as_deref(), Some("c"));
        assert_eq!(name("/1/1/7").as_deref(), Some("z"));
        assert_eq!(name("/2"), None);
        assert_eq!(index.len(), 7);
    }

    #[test]
    fn display() {
        let tree = SchemaTree::compile(&module(), "Top").unwrap();
        let index = TagPathIndex::build(&tree);
        let text = index.display(&tree).to_string();
        assert!(text.starts_with("/,/Top,SEQUENCE\n/0,/Top/a,INTEGER\n"));
        assert!(text.contains("/1/1/7,/Top/c/y/z,NULL\n"));
    }
}
