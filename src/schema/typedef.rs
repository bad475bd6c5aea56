//! The type-definition graph.
//!
//! This is what the schema compiler consumes. It deliberately only knows
//! what the compiler needs: builtin kinds, tags, components, and named
//! values. The [`asn1`](crate::asn1) module produces it from ASN.1 source
//! but anything else can, too.

use std::collections::HashMap;
use std::fmt;
use crate::ident::Tag;


//------------ BuiltinKind ---------------------------------------------------

/// The builtin ASN.1 type underlying a type definition.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BuiltinKind {
    Sequence,
    SequenceOf,
    Set,
    SetOf,
    Choice,
    Enumerated,
    Integer,
    Boolean,
    Null,
    OctetString,
    Utf8String,
    Ia5String,
    GraphicString,
    PrintableString,
    VisibleString,
    NumericString,
    GeneralString,
    TeletexString,
    UtcTime,
    GeneralizedTime,
    ObjectIdentifier,
    BitString,
    Real,
}

impl BuiltinKind {
    /// Returns whether values of this kind have components.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            BuiltinKind::Sequence | BuiltinKind::SequenceOf
            | BuiltinKind::Set | BuiltinKind::SetOf
            | BuiltinKind::Choice
        )
    }

    /// Returns whether this is a SEQUENCE OF or SET OF.
    pub fn is_list(self) -> bool {
        matches!(self, BuiltinKind::SequenceOf | BuiltinKind::SetOf)
    }

    /// Returns whether values of this kind are rendered as text.
    pub fn is_string(self) -> bool {
        matches!(
            self,
            BuiltinKind::OctetString | BuiltinKind::Utf8String
            | BuiltinKind::Ia5String | BuiltinKind::GraphicString
            | BuiltinKind::PrintableString | BuiltinKind::VisibleString
            | BuiltinKind::NumericString | BuiltinKind::GeneralString
            | BuiltinKind::TeletexString | BuiltinKind::UtcTime
            | BuiltinKind::GeneralizedTime
        )
    }

    /// Returns the ASN.1 name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinKind::Sequence => "SEQUENCE",
            BuiltinKind::SequenceOf => "SEQUENCE OF",
            BuiltinKind::Set => "SET",
            BuiltinKind::SetOf => "SET OF",
            BuiltinKind::Choice => "CHOICE",
            BuiltinKind::Enumerated => "ENUMERATED",
            BuiltinKind::Integer => "INTEGER",
            BuiltinKind::Boolean => "BOOLEAN",
            BuiltinKind::Null => "NULL",
            BuiltinKind::OctetString => "OCTET STRING",
            BuiltinKind::Utf8String => "UTF8String",
            BuiltinKind::Ia5String => "IA5String",
            BuiltinKind::GraphicString => "GraphicString",
            BuiltinKind::PrintableString => "PrintableString",
            BuiltinKind::VisibleString => "VisibleString",
            BuiltinKind::NumericString => "NumericString",
            BuiltinKind::GeneralString => "GeneralString",
            BuiltinKind::TeletexString => "TeletexString",
            BuiltinKind::UtcTime => "UTCTime",
            BuiltinKind::GeneralizedTime => "GeneralizedTime",
            BuiltinKind::ObjectIdentifier => "OBJECT IDENTIFIER",
            BuiltinKind::BitString => "BIT STRING",
            BuiltinKind::Real => "REAL",
        }
    }

    /// Returns the universal tag values of this kind are encoded with.
    ///
    /// A CHOICE has no tag of its own and returns `None`.
    pub fn universal_tag(self) -> Option<Tag> {
        Some(match self {
            BuiltinKind::Sequence | BuiltinKind::SequenceOf => Tag::SEQUENCE,
            BuiltinKind::Set | BuiltinKind::SetOf => Tag::SET,
            BuiltinKind::Choice => return None,
            BuiltinKind::Enumerated => Tag::ENUMERATED,
            BuiltinKind::Integer => Tag::INTEGER,
            BuiltinKind::Boolean => Tag::BOOLEAN,
            BuiltinKind::Null => Tag::NULL,
            BuiltinKind::OctetString => Tag::OCTET_STRING,
            BuiltinKind::Utf8String => Tag::UTF8_STRING,
            BuiltinKind::Ia5String => Tag::IA5_STRING,
            BuiltinKind::GraphicString => Tag::GRAPHIC_STRING,
            BuiltinKind::PrintableString => Tag::PRINTABLE_STRING,
            BuiltinKind::VisibleString => Tag::VISIBLE_STRING,
            BuiltinKind::NumericString => Tag::NUMERIC_STRING,
            BuiltinKind::GeneralString => Tag::GENERAL_STRING,
            BuiltinKind::TeletexString => Tag::TELETEX_STRING,
            BuiltinKind::UtcTime => Tag::UTC_TIME,
            BuiltinKind::GeneralizedTime => Tag::GENERALIZED_TIME,
            BuiltinKind::ObjectIdentifier => Tag::OID,
            BuiltinKind::BitString => Tag::BIT_STRING,
            BuiltinKind::Real => Tag::REAL,
        })
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}


//------------ TypeDef -------------------------------------------------------

/// The definition of a type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeDef {
    /// The builtin type.
    pub kind: BuiltinKind,

    /// The components of a container type.
    ///
    /// For SEQUENCE OF and SET OF, this is a single component describing
    /// the element type.
    pub components: Vec<Component>,

    /// The named values of an ENUMERATED type.
    pub named_values: Vec<(String, i64)>,
}

impl TypeDef {
    /// Creates a definition without components.
    pub fn new(kind: BuiltinKind) -> Self {
        TypeDef { kind, components: Vec::new(), named_values: Vec::new() }
    }

    /// Creates a definition of a container type.
    pub fn with_components(
        kind: BuiltinKind, components: Vec<Component>
    ) -> Self {
        TypeDef { kind, components, named_values: Vec::new() }
    }

    /// Creates the definition of an ENUMERATED type.
    pub fn enumerated(named_values: Vec<(String, i64)>) -> Self {
        TypeDef {
            kind: BuiltinKind::Enumerated,
            components: Vec::new(),
            named_values
        }
    }
}


//------------ TypeRef -------------------------------------------------------

/// The type of a component.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeRef {
    /// A reference to a type assigned in the module.
    Named(String),

    /// A type defined in place.
    Inline(Box<TypeDef>),
}

impl From<TypeDef> for TypeRef {
    fn from(def: TypeDef) -> Self {
        TypeRef::Inline(Box::new(def))
    }
}


//------------ Component -----------------------------------------------------

/// A component of a container type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Component {
    /// The name of the component.
    pub name: String,

    /// The tag number of the component as written.
    pub tag: Option<String>,

    /// Whether the tag is explicit.
    pub explicit: bool,

    /// Whether the component may be absent.
    pub optional: bool,

    /// The type of the component.
    pub ty: TypeRef,
}

impl Component {
    /// Creates an untagged, mandatory component.
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Component {
            name: name.into(),
            tag: None,
            explicit: false,
            optional: false,
            ty: ty.into()
        }
    }

    /// Creates an implicitly tagged, mandatory component.
    pub fn tagged(
        name: impl Into<String>, tag: u32, ty: impl Into<TypeRef>
    ) -> Self {
        Component {
            tag: Some(tag.to_string()),
            ..Self::new(name, ty)
        }
    }

    /// Marks the component as optional.
    pub fn optional(self) -> Self {
        Component { optional: true, ..self }
    }

    /// Marks the tag of the component as explicit.
    pub fn explicit(self) -> Self {
        Component { explicit: true, ..self }
    }
}

impl From<BuiltinKind> for TypeRef {
    fn from(kind: BuiltinKind) -> Self {
        TypeDef::new(kind).into()
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::Named(name.into())
    }
}


//------------ Module --------------------------------------------------------

/// A set of type assignments.
///
/// Each assignment `Name ::= Type` is kept as a [`Component`] named after
/// the type. Its tag is the tag of the assigned type, if any.
#[derive(Clone, Debug, Default)]
pub struct Module {
    name: String,
    assignments: Vec<Component>,
    index: HashMap<String, usize>,
}

impl Module {
    /// Creates a new, empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Module { name: name.into(), ..Default::default() }
    }

    /// Returns the name of the module.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a type assignment.
    ///
    /// Returns `false` if a type of that name was already assigned. The
    /// first assignment stays in effect in this case.
    pub fn assign(&mut self, assignment: Component) -> bool {
        if self.index.contains_key(&assignment.name) {
            return false
        }
        self.index.insert(assignment.name.clone(), self.assignments.len());
        self.assignments.push(assignment);
        true
    }

    /// Adds an untagged type assignment.
    pub fn assign_type(
        &mut self, name: impl Into<String>, def: TypeDef
    ) -> bool {
        self.assign(Component::new(name, def))
    }

    /// Returns the assignment for the given type name.
    pub fn get(&self, name: &str) -> Option<&Component> {
        self.index.get(name).and_then(|&idx| self.assignments.get(idx))
    }

    /// Returns an iterator over the assignments in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> + '_ {
        self.assignments.iter()
    }

    /// Returns the number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns whether there are no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}


//============ Tests =========================================================
