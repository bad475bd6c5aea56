//! Walking values and schema in lockstep.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use tracing::trace;
use crate::decode::Value;
use crate::ident::Tag;
use crate::int::Integer;
use crate::oid::Oid;
use crate::schema::{BuiltinKind, NodeId, SchemaTree};
use crate::text;
use super::document::Document;
use super::error::{ErrorKind, ResolveError};
use super::stack::TagStack;


//------------ Options -------------------------------------------------------

/// Options for resolving values.
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Append the hex encoding to every decoded string.
    pub hex_also: bool,
}


//------------ Resolver ------------------------------------------------------

/// Turns generic values into documents.
///
/// With a schema, the resolver interprets every value according to the
/// schema node it corresponds to. Without one, it falls back to what can be
/// guessed from the encoding alone.
///
/// A resolver doesn’t keep any state between records. It can be shared
/// between threads.
#[derive(Clone, Debug)]
pub struct Resolver<'a> {
    schema: Option<&'a SchemaTree>,
    options: Options,
}

impl<'a> Resolver<'a> {
    /// Creates a new resolver.
    pub fn new(schema: Option<&'a SchemaTree>, options: Options) -> Self {
        Resolver { schema, options }
    }

    /// Creates a resolver using the given schema.
    pub fn with_schema(schema: &'a SchemaTree) -> Self {
        Self::new(Some(schema), Options::default())
    }

    /// Creates a resolver without a schema.
    pub fn schemaless() -> Self {
        Self::new(None, Options::default())
    }

    /// Returns the options of the resolver.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Resolves a single record.
    pub fn resolve(&self, value: &Value) -> Result<Document, ResolveError> {
        let mut walk = Walk {
            options: &self.options,
            stack: TagStack::new(),
        };
        match self.schema {
            Some(tree) => {
                SchemaWalk { tree, walk }.member(value, tree.root())
            }
            None => walk.schemaless(value)
        }
    }
}


//------------ Walk ----------------------------------------------------------

/// The state of resolving one record.
struct Walk<'a> {
    options: &'a Options,
    stack: TagStack,
}

impl<'a> Walk<'a> {
    fn push(&mut self, tag: u32) -> Result<(), ResolveError> {
        self.stack.push(tag)
    }

    fn pop(&mut self) -> Result<(), ResolveError> {
        self.stack.pop().map(|_| ())
    }

    fn err(&self, kind: ErrorKind, message: impl Into<String>) -> ResolveError {
        ResolveError::new(kind, &self.stack, message)
    }

    fn text(&self, content: &[u8]) -> Document {
        if self.options.hex_also {
            Document::Text(text::render_with_hex(content))
        }
        else {
            Document::Text(text::render(content))
        }
    }

    fn oid(&self, content: &Bytes) -> Document {
        match Oid::from_content(content.clone()) {
            Some(oid) => Document::Text(oid.to_string()),
            None => Document::Text(text::render(content)),
        }
    }

    /// Resolves a value without a schema.
    ///
    /// Constructed values whose children all carry distinct tags become
    /// objects keyed by tag number, all others become arrays. Primitive
    /// values are interpreted by their universal tag if they have one.
    /// Otherwise clean text stays text and short binary values are taken
    /// to be integers.
    fn schemaless(&mut self, value: &Value) -> Result<Document, ResolveError> {
        trace!(path = %self.stack, "{}", value.shape());
        match *value {
            Value::Tagged { tag, ref base } => {
                self.push(tag.number())?;
                let res = self.schemaless(base)?;
                self.pop()?;
                Ok(res)
            }
            Value::Constructed { ref children, .. } => {
                let mut keys = Vec::with_capacity(children.len());
                for child in children {
                    match child.wrapper_tag() {
                        Some(tag) if !keys.contains(&tag.number()) => {
                            keys.push(tag.number())
                        }
                        _ => break
                    }
                }
                if !children.is_empty() && keys.len() == children.len() {
                    let mut entries = Vec::with_capacity(children.len());
                    for (key, child) in keys.iter().zip(children) {
                        entries.push((key.to_string(), self.schemaless(child)?));
                    }
                    Ok(Document::Object(entries))
                }
                else {
                    let mut items = Vec::with_capacity(children.len());
                    for child in children {
                        items.push(self.schemaless(child)?);
                    }
                    Ok(Document::Array(items))
                }
            }
            Value::Primitive { tag, ref content } => {
                Ok(match tag {
                    Some(Tag::INTEGER) | Some(Tag::ENUMERATED) => {
                        Document::Integer(Integer::from_bytes(content.clone()))
                    }
                    Some(Tag::BOOLEAN) => Document::Boolean(boolean(content)),
                    Some(Tag::NULL) => Document::Null,
                    Some(Tag::OID) => self.oid(content),
                    _ => {
                        if !text::is_clean(content)
                            && (1..=8).contains(&content.len())
                        {
                            Document::Integer(
                                Integer::from_bytes(content.clone())
                            )
                        }
                        else {
                            self.text(content)
                        }
                    }
                })
            }
        }
    }
}


//------------ SchemaWalk ----------------------------------------------------

/// Resolving one record against a schema tree.
struct SchemaWalk<'a> {
    tree: &'a SchemaTree,
    walk: Walk<'a>,
}

/// How a child of a constructed value is placed into the result.
enum Slot {
    /// Under the name of a member or alternative.
    Member(NodeId),

    /// Under the name of an untagged CHOICE member, as one of its
    /// alternatives.
    Alternative { choice: NodeId, alternative: NodeId },

    /// By position.
    Positional,
}

impl<'a> SchemaWalk<'a> {
    /// Resolves a value selected for a schema node.
    ///
    /// If the value is wrapped in the node’s own tag, the wrapper is
    /// consumed here. An explicit tag also consumes the constructed value
    /// inside the wrapper.
    fn member(
        &mut self, value: &Value, id: NodeId
    ) -> Result<Document, ResolveError> {
        let tree = self.tree;
        let node = tree.node(id);
        if let (Some(own), Value::Tagged { tag, base }) = (node.tag(), value) {
            if tag.number() == own {
                self.walk.push(own)?;
                let inner = match **base {
                    Value::Constructed { ref children, .. }
                        if node.is_explicit() && children.len() == 1
                    => &children[0],
                    ref base => base,
                };
                let res = self.value(inner, id)?;
                self.walk.pop()?;
                return Ok(res)
            }
        }
        self.value(value, id)
    }

    /// Resolves a value with the given node as the cursor.
    fn value(
        &mut self, value: &Value, id: NodeId
    ) -> Result<Document, ResolveError> {
        let tree = self.tree;
        let node = tree.node(id);
        trace!(
            path = %self.walk.stack, kind = %node.kind(),
            field = node.field_name(), "{}", value.shape()
        );
        if node.kind() == BuiltinKind::Choice {
            if let Some(tag) = value.universal_tag() {
                let alternative = self.universal_alternative(id, tag)?;
                let res = self.member(value, alternative)?;
                return Ok(Document::single(
                    self.tree.node(alternative).field_name(), res
                ))
            }
        }
        match *value {
            Value::Tagged { tag, ref base } => {
                if node.kind() == BuiltinKind::Choice {
                    let alternative = self.alternative(id, tag.number())?;
                    let res = self.member(value, alternative)?;
                    return Ok(Document::single(
                        self.tree.node(alternative).field_name(), res
                    ))
                }
                self.walk.push(tag.number())?;
                let res = self.value(base, id)?;
                self.walk.pop()?;
                Ok(res)
            }
            Value::Constructed { ref children, .. } => {
                if node.kind().is_string() {
                    if let Some(content) = value.string_content() {
                        return self.primitive(&content, id)
                    }
                }
                self.constructed(children, id)
            }
            Value::Primitive { ref content, .. } => {
                self.primitive(content, id)
            }
        }
    }

    /// Resolves the children of a constructed value.
    fn constructed(
        &mut self, children: &[Value], id: NodeId
    ) -> Result<Document, ResolveError> {
        let tree = self.tree;
        let node = tree.node(id);
        let kind = node.kind();
        if !kind.is_container() {
            return Err(self.walk.err(
                ErrorKind::SchemaResolution,
                format!(
                    "constructed value for {} field '{}'",
                    kind, node.field_name()
                )
            ))
        }
        if children.is_empty() {
            return Ok(if kind.is_list() {
                Document::Array(Vec::new())
            }
            else {
                Document::Object(Vec::new())
            })
        }
        if kind.is_list() {
            let element = match node.members().first() {
                Some(element) => *element,
                None => {
                    return Err(self.walk.err(
                        ErrorKind::SchemaResolution,
                        format!(
                            "{} field '{}' has no element type",
                            kind, node.field_name()
                        )
                    ))
                }
            };
            let mut items = Vec::with_capacity(children.len());
            for child in children {
                items.push(self.member(child, element)?);
            }
            return Ok(Document::Array(items))
        }

        // Decide where each child goes before resolving any of them.
        let mut slots = Vec::with_capacity(children.len());
        for child in children {
            slots.push(self.slot(child, id)?);
        }
        let keyed = slots.iter().filter(|slot| {
            !matches!(slot, Slot::Positional)
        }).count();
        if keyed == 0 {
            let positional: Vec<_> = node.members().iter().copied().filter(
                |&member| self.tree.node(member).is_untagged()
            ).collect();
            let mut items = Vec::with_capacity(children.len());
            for (i, child) in children.iter().enumerate() {
                let cursor = positional.get(i).copied().unwrap_or(id);
                items.push(self.member(child, cursor)?);
            }
            return Ok(Document::Array(items))
        }
        if keyed < slots.len() {
            return Err(self.walk.err(
                ErrorKind::EncodingStructure,
                format!(
                    "'{}' mixes tagged and positional members",
                    node.field_name()
                )
            ))
        }

        let mut entries = Vec::with_capacity(children.len());
        for (child, slot) in children.iter().zip(slots) {
            match slot {
                Slot::Member(member) => {
                    let res = self.member(child, member)?;
                    insert(
                        &mut entries, self.tree.node(member).field_name(), res
                    );
                }
                Slot::Alternative { choice, alternative } => {
                    let res = self.member(child, alternative)?;
                    insert(
                        &mut entries, self.tree.node(choice).field_name(),
                        Document::single(
                            self.tree.node(alternative).field_name(), res
                        )
                    );
                }
                Slot::Positional => { }
            }
        }
        Ok(Document::Object(entries))
    }

    /// Determines the slot for a child of a constructed value.
    fn slot(&self, child: &Value, id: NodeId) -> Result<Slot, ResolveError> {
        let tree = self.tree;
        let node = tree.node(id);
        let tag = match child.wrapper_tag() {
            Some(tag) => tag.number(),
            None => {
                if node.kind() == BuiltinKind::Choice {
                    if let Some(universal) = child.universal_tag() {
                        return self.universal_alternative(
                            id, universal
                        ).map(Slot::Member)
                    }
                    return Err(self.walk.err(
                        ErrorKind::EncodingStructure,
                        format!(
                            "untagged {} can’t select an alternative of '{}'",
                            child.shape(), node.field_name()
                        )
                    ))
                }
                return Ok(Slot::Positional)
            }
        };
        if node.kind() == BuiltinKind::Choice {
            return self.alternative(id, tag).map(Slot::Member)
        }
        if let Some(member) = node.child(tag) {
            return Ok(Slot::Member(member))
        }
        for &member in node.members() {
            let member_node = self.tree.node(member);
            if member_node.tag().is_none()
                && member_node.kind() == BuiltinKind::Choice
            {
                if let Some(alternative) = member_node.child(tag) {
                    return Ok(Slot::Alternative { choice: member, alternative })
                }
            }
        }
        Ok(Slot::Positional)
    }

    /// Returns the alternative of a CHOICE for a tag.
    fn alternative(
        &self, id: NodeId, tag: u32
    ) -> Result<NodeId, ResolveError> {
        let tree = self.tree;
        let node = tree.node(id);
        node.child(tag).ok_or_else(|| {
            let context = match self.tree.nearest_tagged_ancestor(id) {
                Some(ancestor) => {
                    format!(" within '{}'", self.tree.node(ancestor).field_name())
                }
                None => String::new()
            };
            self.walk.err(
                ErrorKind::EncodingStructure,
                format!(
                    "no alternative of '{}'{} has tag [{}]",
                    node.field_name(), context, tag
                )
            )
        })
    }

    /// Returns the untagged alternative of a CHOICE for a universal tag.
    fn universal_alternative(
        &self, id: NodeId, tag: Tag
    ) -> Result<NodeId, ResolveError> {
        let tree = self.tree;
        let node = tree.node(id);
        node.alternatives().iter().copied().find(|&alternative| {
            let alternative = tree.node(alternative);
            alternative.tag().is_none()
                && alternative.kind().universal_tag() == Some(tag)
        }).ok_or_else(|| {
            self.walk.err(
                ErrorKind::EncodingStructure,
                format!(
                    "no alternative of '{}' matches universal tag {}",
                    node.field_name(), tag
                )
            )
        })
    }

    /// Resolves primitive content.
    fn primitive(
        &mut self, content: &Bytes, id: NodeId
    ) -> Result<Document, ResolveError> {
        let tree = self.tree;
        let node = tree.node(id);
        match node.kind() {
            BuiltinKind::Enumerated => {
                let value = Integer::from_bytes(content.clone());
                let name = value.to_i64().and_then(|value| {
                    node.enum_name(value)
                });
                Ok(match name {
                    Some(name) => Document::Text(name.into()),
                    None => Document::Integer(value),
                })
            }
            BuiltinKind::Boolean => Ok(Document::Boolean(boolean(content))),
            BuiltinKind::Integer => {
                Ok(Document::Integer(Integer::from_bytes(content.clone())))
            }
            BuiltinKind::Null => Ok(Document::Null),
            BuiltinKind::ObjectIdentifier => Ok(self.walk.oid(content)),
            BuiltinKind::Choice => {
                // The base of a tagged value. Content with a universal tag
                // of its own was dealt with in `value`, so the tag that got
                // us here selects the alternative.
                let tag = match self.walk.stack.peek() {
                    Some(tag) => tag,
                    None => {
                        return Err(self.walk.err(
                            ErrorKind::EncodingStructure,
                            format!(
                                "no tag to select an alternative of '{}'",
                                node.field_name()
                            )
                        ))
                    }
                };
                let alternative = self.alternative(id, tag)?;
                let res = self.primitive(content, alternative)?;
                Ok(Document::single(
                    self.tree.node(alternative).field_name(), res
                ))
            }
            kind if kind.is_string() => Ok(self.walk.text(content)),
            kind => {
                Err(self.walk.err(
                    ErrorKind::SchemaResolution,
                    format!(
                        "can’t resolve primitive value as {} field '{}'",
                        kind, node.field_name()
                    )
                ))
            }
        }
    }
}


//------------ Helper Functions ----------------------------------------------

/// Returns the value of a BOOLEAN’s content.
///
/// Any non-zero first octet is true. Empty content is false.
fn boolean(content: &[u8]) -> bool {
    content.first().map(|first| *first != 0).unwrap_or(false)
}

/// Inserts an entry into an object, replacing an existing one.
fn insert(entries: &mut Vec<(String, Document)>, key: &str, value: Document) {
    match entries.iter_mut().find(|entry| entry.0 == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key.into(), value)),
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use crate::schema::{Component, Module, TypeDef};
    use crate::schema::BuiltinKind::{
        BitString, Boolean, Choice, Ia5String, ObjectIdentifier, OctetString,
        Sequence, SequenceOf,
    };

    /// ```text
    /// Record ::= [APPLICATION 1] SEQUENCE {
    ///     id      [0] INTEGER,
    ///     status  [1] Status,
    ///     payment [2] Payment OPTIONAL,
    ///     names   [3] SEQUENCE OF [0] IA5String
    /// }
    /// Status ::= ENUMERATED { A(0), B(1) }
    /// Payment ::= CHOICE { code [0] IA5String, amount [1] INTEGER }
    /// ```
    fn module() -> Module {
        let mut module = Module::new("Test");
        module.assign(Component {
            tag: Some("1".into()),
            ..Component::new("Record", TypeDef::with_components(Sequence, vec![
                Component::tagged("id", 0, BuiltinKind::Integer),
                Component::tagged("status", 1, "Status"),
                Component::tagged("payment", 2, "Payment").optional(),
                Component::tagged("names", 3, TypeDef::with_components(
                    SequenceOf, vec![Component::tagged("name", 0, Ia5String)]
                )),
            ]))
        });
        module.assign_type("Status", TypeDef::enumerated(vec![
            ("A".into(), 0), ("B".into(), 1)
        ]));
        module.assign_type("Payment", TypeDef::with_components(Choice, vec![
            Component::tagged("code", 0, Ia5String),
            Component::tagged("amount", 1, BuiltinKind::Integer),
        ]));
        module
    }

    fn resolve_with(
        module: &Module, top: &str, options: Options, data: &[u8]
    ) -> Result<serde_json::Value, ResolveError> {
        let tree = SchemaTree::compile(module, top).unwrap();
        let value = Value::decode_slice(data).unwrap();
        Resolver::new(Some(&tree), options).resolve(&value).map(|doc| {
            doc.to_json()
        })
    }

    fn resolve(
        module: &Module, top: &str, data: &[u8]
    ) -> Result<serde_json::Value, ResolveError> {
        resolve_with(module, top, Options::default(), data)
    }

    fn schemaless(data: &[u8]) -> Result<serde_json::Value, ResolveError> {
        let value = Value::decode_slice(data).unwrap();
        Resolver::schemaless().resolve(&value).map(|doc| doc.to_json())
    }

    fn single(name: &str, kind: BuiltinKind) -> Module {
        let mut module = Module::new("Test");
        module.assign_type(name, TypeDef::new(kind));
        module
    }

    #[test]
    fn enumerated() {
        let module = module();
        assert_eq!(
            resolve(&module, "Status", b"\x0a\x01\x00").unwrap(), json!("A")
        );
        assert_eq!(
            resolve(&module, "Status", b"\x0a\x01\x01").unwrap(), json!("B")
        );
        assert_eq!(
            resolve(&module, "Status", b"\x0a\x01\x02").unwrap(), json!(2)
        );
        assert_eq!(
            resolve(&module, "Status", b"\x0a\x01\xff").unwrap(), json!(-1)
        );
    }

    #[test]
    fn choice() {
        let module = module();
        assert_eq!(
            resolve(&module, "Payment", b"\x81\x02\x00\x64").unwrap(),
            json!({"amount": 100})
        );
        assert_eq!(
            resolve(&module, "Payment", b"\x80\x03abc").unwrap(),
            json!({"code": "abc"})
        );
        let err = resolve(&module, "Payment", b"\x85\x01\x00").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingStructure);
    }

    #[test]
    fn full_record() {
        let data = b"\x61\x14\
            \x80\x01\x07\
            \x81\x01\x01\
            \xa2\x04\x81\x02\x00\x64\
            \xa3\x06\x80\x01a\x80\x01b";
        assert_eq!(
            resolve(&module(), "Record", data).unwrap(),
            json!({
                "id": 7,
                "status": "B",
                "payment": {"amount": 100},
                "names": ["a", "b"],
            })
        );
    }

    #[test]
    fn error_path() {
        let data = b"\x61\x0b\
            \x80\x01\x07\
            \x81\x01\x01\
            \xa2\x03\x85\x01\x00";
        let err = resolve(&module(), "Record", data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingStructure);
        assert_eq!(err.path(), "/1/2");
    }

    #[test]
    fn optional_members() {
        let mut module = Module::new("Test");
        module.assign_type("Top", TypeDef::with_components(Sequence, vec![
            Component::tagged("a", 0, BuiltinKind::Integer).optional(),
            Component::tagged("b", 1, Boolean).optional(),
            Component::tagged("c", 2, Ia5String).optional(),
        ]));
        let res = resolve(
            &module, "Top", b"\x30\x06\x80\x01\x05\x82\x01x"
        ).unwrap();
        assert_eq!(res, json!({"a": 5, "c": "x"}));
        assert_eq!(res.as_object().unwrap().len(), 2);

        assert_eq!(
            resolve(&module, "Top", b"\x30\x00").unwrap(), json!({})
        );
    }

    #[test]
    fn text_fallback() {
        let module = single("Text", Ia5String);
        assert_eq!(
            resolve(&module, "Text", b"\x16\x05Hello").unwrap(),
            json!("Hello")
        );
        assert_eq!(
            resolve(&module, "Text", b"\x16\x05He\x00lo").unwrap(),
            json!("hex[5]: 4865006C6F")
        );
        assert_eq!(
            resolve_with(
                &module, "Text", Options { hex_also: true }, b"\x16\x03abc"
            ).unwrap(),
            json!("abc, HEX: 616263")
        );
    }

    #[test]
    fn depth_bound() {
        fn nested(depth: usize) -> Value {
            let mut value = Value::Primitive {
                tag: None, content: Bytes::from_static(b"\x01")
            };
            for _ in 0..depth {
                value = Value::Tagged {
                    tag: Tag::ctx(5), base: Box::new(value)
                };
            }
            value
        }

        let module = single("Top", BuiltinKind::Integer);
        let tree = SchemaTree::compile(&module, "Top").unwrap();
        let resolver = Resolver::with_schema(&tree);
        assert_eq!(
            resolver.resolve(&nested(TagStack::LIMIT)).unwrap().to_json(),
            json!(1)
        );
        assert_eq!(
            resolver.resolve(&nested(TagStack::LIMIT + 1)).unwrap_err().kind(),
            ErrorKind::DecodeBounds
        );
        assert_eq!(
            Resolver::schemaless().resolve(
                &nested(TagStack::LIMIT + 1)
            ).unwrap_err().kind(),
            ErrorKind::DecodeBounds
        );
    }

    #[test]
    fn mixed_container() {
        let mut module = Module::new("Test");
        module.assign_type("Top", TypeDef::with_components(Sequence, vec![
            Component::tagged("a", 0, BuiltinKind::Integer),
            Component::new("b", BuiltinKind::Integer),
        ]));
        let err = resolve(
            &module, "Top", b"\x30\x06\x80\x01\x01\x02\x01\x02"
        ).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingStructure);
        assert_eq!(err.path(), "/");
    }

    #[test]
    fn positional_members() {
        let mut module = Module::new("Test");
        module.assign_type("Top", TypeDef::with_components(Sequence, vec![
            Component::new("a", BuiltinKind::Integer),
            Component::new("b", OctetString),
        ]));
        assert_eq!(
            resolve(&module, "Top", b"\x30\x06\x02\x01\x05\x04\x01A").unwrap(),
            json!([5, "A"])
        );
    }

    #[test]
    fn untagged_choice_member() {
        let mut module = Module::new("Test");
        module.assign_type("Top", TypeDef::with_components(Sequence, vec![
            Component::tagged("id", 0, BuiltinKind::Integer),
            Component::new("body", TypeDef::with_components(Choice, vec![
                Component::tagged("x", 1, BuiltinKind::Integer),
                Component::tagged("y", 2, Boolean),
            ])),
        ]));
        assert_eq!(
            resolve(
                &module, "Top", b"\x30\x06\x80\x01\x01\x82\x01\xff"
            ).unwrap(),
            json!({"id": 1, "body": {"y": true}})
        );
    }

    #[test]
    fn implicitly_tagged_choice() {
        let mut module = module();
        module.assign_type("Holder", TypeDef::with_components(Sequence, vec![
            Component::tagged("p", 1, "Payment"),
        ]));
        assert_eq!(
            resolve(&module, "Holder", b"\x30\x04\x81\x02\x00\x64").unwrap(),
            json!({"p": {"amount": 100}})
        );
    }

    #[test]
    fn choice_universal_alternative() {
        let mut module = Module::new("Test");
        module.assign_type("Top", TypeDef::with_components(Sequence, vec![
            Component::tagged("x", 1, "Alt"),
        ]));
        module.assign_type("Alt", TypeDef::with_components(Choice, vec![
            Component::new("n", BuiltinKind::Integer),
            Component::tagged("s", 1, Ia5String),
        ]));
        assert_eq!(
            resolve(&module, "Top", b"\x30\x05\xa1\x03\x02\x01\x05").unwrap(),
            json!({"x": {"n": 5}})
        );
        assert_eq!(
            resolve(&module, "Top", b"\x30\x05\xa1\x03\x81\x01a").unwrap(),
            json!({"x": {"s": "a"}})
        );

        let err = resolve(
            &module, "Top", b"\x30\x05\xa1\x03\x01\x01\xff"
        ).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingStructure);
        assert_eq!(err.path(), "/1");
        assert!(err.message().contains("BOOLEAN"));

        // More than one value inside the explicit tag.
        let err = resolve(
            &module, "Top", b"\x30\x08\xa1\x06\x02\x01\x05\x01\x01\xff"
        ).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingStructure);
        assert!(err.message().contains("BOOLEAN"));
    }

    #[test]
    fn choice_universal_time() {
        let mut module = Module::new("Test");
        module.assign_type("Top", TypeDef::with_components(Sequence, vec![
            Component::tagged("t", 0, "Time"),
        ]));
        module.assign_type("Time", TypeDef::with_components(Choice, vec![
            Component::new("utc", BuiltinKind::UtcTime),
            Component::new("gen", BuiltinKind::GeneralizedTime),
        ]));
        assert_eq!(
            resolve(
                &module, "Top",
                b"\x30\x11\xa0\x0f\x17\x0d250101000000Z"
            ).unwrap(),
            json!({"t": {"utc": "250101000000Z"}})
        );
        assert_eq!(
            resolve(&module, "Time", b"\x18\x0f20250101000000Z").unwrap(),
            json!({"gen": "20250101000000Z"})
        );

        let err = resolve(
            &module, "Top", b"\x30\x05\xa0\x03\x02\x01\x05"
        ).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingStructure);
        assert_eq!(err.path(), "/0");
        assert!(err.message().contains("INTEGER"));
    }

    #[test]
    fn segmented_string() {
        let mut module = Module::new("Test");
        module.assign_type("Top", TypeDef::with_components(Sequence, vec![
            Component::tagged("s", 0, OctetString),
        ]));
        assert_eq!(
            resolve(
                &module, "Top", b"\x30\x0a\xa0\x08\x04\x02ab\x04\x02cd"
            ).unwrap(),
            json!({"s": "abcd"})
        );
    }

    #[test]
    fn unsupported_leaf() {
        let mut module = Module::new("Test");
        module.assign_type("Top", TypeDef::with_components(Sequence, vec![
            Component::tagged("bits", 0, BitString),
        ]));
        let err = resolve(&module, "Top", b"\x30\x03\x80\x01\x00").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaResolution);
        assert_eq!(err.path(), "/0");
    }

    #[test]
    fn object_identifier() {
        let module = single("Id", ObjectIdentifier);
        assert_eq!(
            resolve(&module, "Id", b"\x06\x03\x2b\x06\x01").unwrap(),
            json!("1.3.6.1")
        );
        assert_eq!(
            resolve(&module, "Id", b"\x06\x01\x86").unwrap(),
            json!("hex[1]: 86")
        );
    }

    #[test]
    fn schemaless_values() {
        assert_eq!(
            schemaless(b"\x30\x08\x80\x01\x05\x81\x03abc").unwrap(),
            json!({"0": 5, "1": "abc"})
        );
        assert_eq!(
            schemaless(b"\x30\x06\x80\x01A\x80\x01B").unwrap(),
            json!(["A", "B"])
        );
        assert_eq!(
            schemaless(b"\x30\x08\x02\x01\xff\x01\x01\xff\x05\x00").unwrap(),
            json!([-1, true, null])
        );
        assert_eq!(
            schemaless(b"\x04\x09\x00\x01\x02\x03\x04\x05\x06\x07\x08")
                .unwrap(),
            json!("hex[9]: 000102030405060708")
        );
    }
}
