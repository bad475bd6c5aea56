//! Parsing a token stream into a module.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::collections::HashSet;
use tracing::debug;
use crate::schema::{BuiltinKind, Component, Module, TypeDef, TypeRef};
use super::error::ParseError;
use super::lexer::{Lexer, Token, TokenKind};


//------------ parse_module --------------------------------------------------

/// Reads a module from ASN.1 source text.
///
/// Only type assignments end up in the module. Value assignments, imports,
/// exports, and constraints are read but dropped.
pub fn parse_module(source: &str) -> Result<Module, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        tagging: Tagging::Explicit,
    };
    let module = parser.module()?;
    debug!(
        "read module '{}' with {} type assignments",
        module.name(), module.len()
    );
    Ok(module)
}


//------------ Tagging -------------------------------------------------------

/// The tagging default of a module.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Tagging {
    Explicit,
    Implicit,
    Automatic,
}


//------------ Tagged --------------------------------------------------------

/// A tag as written in front of a type.
#[derive(Clone, Debug)]
struct Tagged {
    number: String,
    explicit: bool,
}


//------------ Parser --------------------------------------------------------

/// Recursive descent parser over the tokens of a module.
struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    tagging: Tagging,
}

impl<'a> Parser<'a> {
    /// Parses the module definition.
    fn module(&mut self) -> Result<Module, ParseError> {
        let name = self.next()?;
        if !is_reference(&name) {
            return Err(self.error_at(name, "expected a module name"))
        }
        if self.peek_symbol('{') {
            self.skip_balanced('{', '}')?;
        }
        self.expect_word("DEFINITIONS")?;
        if self.eat_word("EXPLICIT") {
            self.expect_word("TAGS")?;
        }
        else if self.eat_word("IMPLICIT") {
            self.tagging = Tagging::Implicit;
            self.expect_word("TAGS")?;
        }
        else if self.eat_word("AUTOMATIC") {
            self.tagging = Tagging::Automatic;
            self.expect_word("TAGS")?;
        }
        if self.eat_word("EXTENSIBILITY") {
            self.expect_word("IMPLIED")?;
        }
        self.expect_kind(TokenKind::Assignment, "'::='")?;
        self.expect_word("BEGIN")?;

        let mut module = Module::new(name.value);
        if self.eat_word("EXPORTS") {
            self.skip_past(';')?;
        }
        if self.eat_word("IMPORTS") {
            self.skip_past(';')?;
        }
        loop {
            let token = self.next()?;
            if token.is_word("END") {
                break
            }
            self.assignment(token, &mut module)?;
        }
        if let Some(token) = self.peek() {
            return Err(self.error_at(token, "unexpected text after END"))
        }
        Ok(module)
    }

    /// Parses an assignment starting with the given name.
    fn assignment(
        &mut self, name: Token<'a>, module: &mut Module
    ) -> Result<(), ParseError> {
        if name.kind != TokenKind::Word {
            return Err(self.error_at(name, "expected an assignment"))
        }
        if !is_reference(&name) {
            // A value assignment: `name Type ::= value`.
            self.skip_past_assignment()?;
            self.skip_value()?;
            return Ok(())
        }
        if self.peek_symbol('{') {
            return Err(self.error_at(
                name, "parameterized types are not supported"
            ))
        }
        if !matches!(self.peek(), Some(token) if token.kind == TokenKind::Assignment) {
            return Err(self.error_at(
                name, format!("unsupported assignment '{}'", name.value)
            ))
        }
        self.next()?;
        let (tag, ty) = self.tagged_type()?;
        let mut assignment = Component::new(name.value, ty);
        if let Some(tag) = tag {
            assignment.tag = Some(tag.number);
            assignment.explicit = tag.explicit;
        }
        if !module.assign(assignment) {
            return Err(self.error_at(
                name, format!("duplicate assignment of '{}'", name.value)
            ))
        }
        Ok(())
    }

    /// Parses a type with an optional tag in front.
    fn tagged_type(
        &mut self
    ) -> Result<(Option<Tagged>, TypeRef), ParseError> {
        let tag = if self.peek_symbol('[') {
            let tag = self.tag()?;
            if let Some(token) = self.peek() {
                if token.is_symbol('[') {
                    return Err(self.error_at(
                        token, "multiple tags are not supported"
                    ))
                }
            }
            Some(tag)
        }
        else {
            None
        };
        Ok((tag, self.plain_type()?))
    }

    /// Parses a tag such as `[APPLICATION 5] IMPLICIT`.
    ///
    /// The class is dropped since only tag numbers are significant.
    fn tag(&mut self) -> Result<Tagged, ParseError> {
        self.expect_symbol('[')?;
        let _ = self.eat_word("UNIVERSAL")
            || self.eat_word("APPLICATION")
            || self.eat_word("PRIVATE");
        let number = self.next()?;
        if !matches!(number.kind, TokenKind::Number | TokenKind::Word) {
            return Err(self.error_at(number, "expected a tag number"))
        }
        self.expect_symbol(']')?;
        let explicit = if self.eat_word("IMPLICIT") {
            false
        }
        else if self.eat_word("EXPLICIT") {
            true
        }
        else {
            self.tagging == Tagging::Explicit
        };
        Ok(Tagged { number: number.value.into(), explicit })
    }

    /// Parses a type without tag including trailing constraints.
    fn plain_type(&mut self) -> Result<TypeRef, ParseError> {
        use self::BuiltinKind::*;

        let token = self.next()?;
        if token.kind != TokenKind::Word {
            return Err(self.error_at(token, "expected a type"))
        }
        let ty = match token.value {
            "SEQUENCE" => self.structured(Sequence, SequenceOf)?,
            "SET" => self.structured(Set, SetOf)?,
            "CHOICE" => {
                TypeDef::with_components(Choice, self.components()?).into()
            }
            "ENUMERATED" => TypeDef::enumerated(self.enumerations()?).into(),
            "INTEGER" => {
                if self.peek_symbol('{') {
                    self.skip_balanced('{', '}')?;
                }
                Integer.into()
            }
            "BIT" => {
                self.expect_word("STRING")?;
                if self.peek_symbol('{') {
                    self.skip_balanced('{', '}')?;
                }
                BitString.into()
            }
            "OCTET" => {
                self.expect_word("STRING")?;
                OctetString.into()
            }
            "OBJECT" => {
                self.expect_word("IDENTIFIER")?;
                ObjectIdentifier.into()
            }
            "BOOLEAN" => Boolean.into(),
            "NULL" => Null.into(),
            "REAL" => Real.into(),
            "UTF8String" => Utf8String.into(),
            "IA5String" => Ia5String.into(),
            "GraphicString" | "ObjectDescriptor" => GraphicString.into(),
            "PrintableString" => PrintableString.into(),
            "VisibleString" | "ISO646String" => VisibleString.into(),
            "NumericString" => NumericString.into(),
            "GeneralString" => GeneralString.into(),
            "TeletexString" | "T61String" | "VideotexString" => {
                TeletexString.into()
            }
            "BMPString" | "UniversalString" => OctetString.into(),
            "UTCTime" => UtcTime.into(),
            "GeneralizedTime" => GeneralizedTime.into(),
            "ANY" | "EXTERNAL" | "EMBEDDED" | "CHARACTER" | "INSTANCE"
            | "CLASS" | "RELATIVE-OID" => {
                return Err(self.error_at(
                    token, format!("type '{}' is not supported", token.value)
                ))
            }
            _ if is_reference(&token) => self.type_reference(token)?,
            _ => {
                return Err(self.error_at(
                    token, format!("expected a type, found '{}'", token.value)
                ))
            }
        };
        self.skip_constraints()?;
        Ok(ty)
    }

    /// Parses a reference to another type, possibly module-qualified.
    fn type_reference(
        &mut self, mut name: Token<'a>
    ) -> Result<TypeRef, ParseError> {
        while self.peek_symbol('.') {
            self.next()?;
            name = self.next()?;
            if !is_reference(&name) {
                return Err(self.error_at(name, "expected a type reference"))
            }
        }
        if self.peek_symbol('{') {
            return Err(self.error_at(
                name, "parameterized types are not supported"
            ))
        }
        Ok(TypeRef::Named(name.value.into()))
    }

    /// Parses what follows SEQUENCE or SET.
    fn structured(
        &mut self, container: BuiltinKind, list: BuiltinKind
    ) -> Result<TypeRef, ParseError> {
        if self.peek_symbol('{') {
            return Ok(
                TypeDef::with_components(container, self.components()?).into()
            )
        }
        if self.eat_word("SIZE") {
            self.skip_balanced('(', ')')?;
        }
        else {
            self.skip_constraints()?;
        }
        self.expect_word("OF")?;

        let name = match self.peek() {
            Some(token) if is_identifier(&token) => {
                self.next()?;
                Some(token.value)
            }
            _ => None
        };
        let (tag, ty) = self.tagged_type()?;
        let name = match (name, &ty) {
            (Some(name), _) => name.to_string(),
            (None, TypeRef::Named(name)) => name.clone(),
            (None, TypeRef::Inline(_)) => "item".into(),
        };
        let mut element = Component::new(name, ty);
        if let Some(tag) = tag {
            element.tag = Some(tag.number);
            element.explicit = tag.explicit;
        }
        Ok(TypeDef::with_components(list, vec![element]).into())
    }

    /// Parses the component list of a SEQUENCE, SET, or CHOICE.
    fn components(&mut self) -> Result<Vec<Component>, ParseError> {
        self.expect_symbol('{')?;
        let mut res = Vec::new();
        if self.peek_symbol('}') {
            self.next()?;
            return Ok(res)
        }
        loop {
            self.component(&mut res)?;
            let token = self.next()?;
            if token.is_symbol('}') {
                break
            }
            if !token.is_symbol(',') {
                return Err(self.error_at(token, "expected ',' or '}'"))
            }
        }

        if self.tagging == Tagging::Automatic
            && res.iter().all(|component| component.tag.is_none())
        {
            for (number, component) in res.iter_mut().enumerate() {
                component.tag = Some(number.to_string());
                component.explicit = false;
            }
        }
        Ok(res)
    }

    /// Parses one entry of a component list.
    ///
    /// Extension markers and the brackets of extension addition groups
    /// are skipped. Their content is read as ordinary components.
    fn component(
        &mut self, res: &mut Vec<Component>
    ) -> Result<(), ParseError> {
        if self.peek_symbol('[') && self.peek_nth_symbol(1, '[') {
            self.next()?;
            self.next()?;
            if self.peek_kind(TokenKind::Number) && self.peek_nth_symbol(1, ':') {
                self.next()?;
                self.next()?;
            }
        }
        if self.peek_kind(TokenKind::Ellipsis) {
            self.next()?;
            self.skip_exception()?;
            return Ok(())
        }

        let name = self.next()?;
        if name.is_word("COMPONENTS") {
            return Err(self.error_at(name, "COMPONENTS OF is not supported"))
        }
        if !is_identifier(&name) {
            return Err(self.error_at(name, "expected a component name"))
        }
        let (tag, ty) = self.tagged_type()?;
        let mut component = Component::new(name.value, ty);
        if let Some(tag) = tag {
            component.tag = Some(tag.number);
            component.explicit = tag.explicit;
        }
        if self.eat_word("OPTIONAL") {
            component.optional = true;
        }
        else if self.eat_word("DEFAULT") {
            self.skip_value()?;
            component.optional = true;
        }
        if self.peek_symbol(']') && self.peek_nth_symbol(1, ']') {
            self.next()?;
            self.next()?;
        }
        res.push(component);
        Ok(())
    }

    /// Parses the named values of an ENUMERATED type.
    ///
    /// Values without a number get the smallest non-negative number not
    /// used otherwise in the root. Values after the extension marker
    /// continue after the largest number so far.
    fn enumerations(&mut self) -> Result<Vec<(String, i64)>, ParseError> {
        self.expect_symbol('{')?;
        let mut items: Vec<(String, Option<i64>, bool)> = Vec::new();
        let mut extended = false;
        loop {
            if self.peek_kind(TokenKind::Ellipsis) {
                self.next()?;
                self.skip_exception()?;
                extended = true;
            }
            else {
                let name = self.next()?;
                if !is_identifier(&name) {
                    return Err(self.error_at(name, "expected an enumeration"))
                }
                let value = if self.peek_symbol('(') {
                    self.next()?;
                    let value = self.signed_number()?;
                    self.expect_symbol(')')?;
                    Some(value)
                }
                else {
                    None
                };
                items.push((name.value.into(), value, extended));
            }
            let token = self.next()?;
            if token.is_symbol('}') {
                break
            }
            if !token.is_symbol(',') {
                return Err(self.error_at(token, "expected ',' or '}'"))
            }
        }

        let mut used: HashSet<i64> = items.iter().filter(|item| !item.2)
            .filter_map(|item| item.1).collect();
        let mut next = 0;
        let mut largest: Option<i64> = None;
        let mut res = Vec::with_capacity(items.len());
        for (name, value, extension) in items {
            let value = match (value, extension) {
                (Some(value), _) => value,
                (None, false) => {
                    while used.contains(&next) {
                        next += 1;
                    }
                    next
                }
                (None, true) => largest.map_or(0, |largest| largest + 1),
            };
            used.insert(value);
            largest = Some(largest.map_or(value, |largest| largest.max(value)));
            res.push((name, value));
        }
        Ok(res)
    }

    /// Parses a number with an optional minus sign.
    fn signed_number(&mut self) -> Result<i64, ParseError> {
        let negative = self.peek_symbol('-');
        if negative {
            self.next()?;
        }
        let token = self.expect_kind(TokenKind::Number, "a number")?;
        let value = token.value.parse::<i64>().map_err(|_| {
            self.error_at(token, "number out of range")
        })?;
        Ok(if negative { -value } else { value })
    }


    //--- Skipping

    /// Skips any number of constraints in parentheses.
    fn skip_constraints(&mut self) -> Result<(), ParseError> {
        while self.peek_symbol('(') {
            self.skip_balanced('(', ')')?;
        }
        Ok(())
    }

    /// Skips an exception specification after an extension marker.
    fn skip_exception(&mut self) -> Result<(), ParseError> {
        if self.peek_symbol('!') {
            self.next()?;
            self.skip_value()?;
        }
        Ok(())
    }

    /// Skips a value.
    fn skip_value(&mut self) -> Result<(), ParseError> {
        if self.peek_symbol('{') {
            return self.skip_balanced('{', '}')
        }
        if self.peek_symbol('-') {
            self.next()?;
        }
        let token = self.next()?;
        if matches!(token.kind, TokenKind::Symbol(_)) {
            return Err(self.error_at(token, "expected a value"))
        }
        if token.kind == TokenKind::Word && self.peek_symbol(':') {
            // A choice value such as `name : value`.
            self.next()?;
            return self.skip_value()
        }
        Ok(())
    }

    /// Skips a bracketed group of tokens starting at the next token.
    fn skip_balanced(
        &mut self, open: char, close: char
    ) -> Result<(), ParseError> {
        let start = self.next()?;
        if !start.is_symbol(open) {
            return Err(self.error_at(start, format!("expected '{}'", open)))
        }
        let mut depth = 1usize;
        while depth > 0 {
            let token = match self.peek() {
                Some(token) => token,
                None => {
                    return Err(self.error_at(
                        start, format!("missing '{}'", close)
                    ))
                }
            };
            self.pos += 1;
            if token.is_symbol(open) {
                depth += 1;
            }
            else if token.is_symbol(close) {
                depth -= 1;
            }
        }
        Ok(())
    }

    /// Skips everything up to and including the next given symbol.
    fn skip_past(&mut self, symbol: char) -> Result<(), ParseError> {
        loop {
            if self.next()?.is_symbol(symbol) {
                return Ok(())
            }
        }
    }

    /// Skips everything up to and including the next `::=`.
    fn skip_past_assignment(&mut self) -> Result<(), ParseError> {
        loop {
            let token = self.next()?;
            if token.kind == TokenKind::Assignment {
                return Ok(())
            }
            if token.is_word("END") {
                return Err(self.error_at(token, "expected '::='"))
            }
        }
    }


    //--- Token access

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_kind(&self, kind: TokenKind) -> bool {
        matches!(self.peek(), Some(token) if token.kind == kind)
    }

    fn peek_symbol(&self, symbol: char) -> bool {
        self.peek_nth_symbol(0, symbol)
    }

    fn peek_nth_symbol(&self, n: usize, symbol: char) -> bool {
        matches!(
            self.tokens.get(self.pos + n), Some(token) if token.is_symbol(symbol)
        )
    }

    /// Returns the next token or an error at the end of input.
    fn next(&mut self) -> Result<Token<'a>, ParseError> {
        match self.peek() {
            Some(token) => {
                self.pos += 1;
                Ok(token)
            }
            None => {
                Err(ParseError::at(
                    self.source, self.source.len(), "unexpected end of input"
                ))
            }
        }
    }

    /// Consumes the given word if it is next.
    fn eat_word(&mut self, word: &str) -> bool {
        match self.peek() {
            Some(token) if token.is_word(word) => {
                self.pos += 1;
                true
            }
            _ => false
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<(), ParseError> {
        let token = self.next()?;
        if token.is_word(word) {
            Ok(())
        }
        else {
            Err(self.error_at(
                token, format!("expected '{}', found '{}'", word, token.value)
            ))
        }
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), ParseError> {
        let token = self.next()?;
        if token.is_symbol(symbol) {
            Ok(())
        }
        else {
            Err(self.error_at(
                token,
                format!("expected '{}', found '{}'", symbol, token.value)
            ))
        }
    }

    fn expect_kind(
        &mut self, kind: TokenKind, what: &str
    ) -> Result<Token<'a>, ParseError> {
        let token = self.next()?;
        if token.kind == kind {
            Ok(token)
        }
        else {
            Err(self.error_at(
                token, format!("expected {}, found '{}'", what, token.value)
            ))
        }
    }

    fn error_at(
        &self, token: Token, message: impl Into<String>
    ) -> ParseError {
        ParseError::at(self.source, token.offset, message)
    }
}

/// Returns whether a token is a type or module reference.
fn is_reference(token: &Token) -> bool {
    token.kind == TokenKind::Word
        && token.value.starts_with(|c: char| c.is_ascii_uppercase())
}

/// Returns whether a token is an identifier, i.e., a component name.
fn is_identifier(token: &Token) -> bool {
    token.kind == TokenKind::Word
        && token.value.starts_with(|c: char| c.is_ascii_lowercase())
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use BuiltinKind::*;

    fn def(module: &Module, name: &str) -> TypeDef {
        match module.get(name).unwrap().ty {
            TypeRef::Inline(ref def) => (**def).clone(),
            TypeRef::Named(ref name) => panic!("reference to {}", name),
        }
    }

    #[test]
    fn header_and_assignments() {
        let module = parse_module(r#"
            Billing { iso(1) member-body(2) 42 } DEFINITIONS
                IMPLICIT TAGS ::=
            BEGIN
            EXPORTS ALL;
            IMPORTS Foo, Bar FROM Other { 1 2 3 };

            maxNames INTEGER ::= 10
            Record ::= [APPLICATION 1] SEQUENCE {
                id       [0] INTEGER (0..MAX),
                status   [1] EXPLICIT Status DEFAULT active,
                names    [2] SEQUENCE SIZE (1..maxNames) OF IA5String,
                raw      OCTET STRING OPTIONAL,
                ...
            }
            Status ::= ENUMERATED { active, closed(5), unknown }
            Other ::= Foreign.Type
            END
        "#).unwrap();

        assert_eq!(module.name(), "Billing");
        assert_eq!(module.len(), 3);

        let record = module.get("Record").unwrap();
        assert_eq!(record.tag.as_deref(), Some("1"));
        assert!(!record.explicit);

        let record = def(&module, "Record");
        assert_eq!(record.kind, Sequence);
        assert_eq!(record.components.len(), 4);
        let status = &record.components[1];
        assert_eq!(status.tag.as_deref(), Some("1"));
        assert!(status.explicit);
        assert!(status.optional);
        assert_eq!(status.ty, TypeRef::Named("Status".into()));
        let names = &record.components[2];
        match names.ty {
            TypeRef::Inline(ref def) => {
                assert_eq!(def.kind, SequenceOf);
                assert_eq!(def.components[0].name, "item");
            }
            _ => panic!("inline type expected"),
        }
        assert!(record.components[3].optional);
        assert_eq!(record.components[3].tag, None);

        assert_eq!(
            def(&module, "Status").named_values,
            vec![
                ("active".into(), 0), ("closed".into(), 5),
                ("unknown".into(), 1)
            ]
        );
        assert_eq!(
            module.get("Other").unwrap().ty, TypeRef::Named("Type".into())
        );
    }

    #[test]
    fn automatic_tags() {
        let module = parse_module("
            M DEFINITIONS AUTOMATIC TAGS ::= BEGIN
            A ::= SEQUENCE { x INTEGER, y CHOICE { p NULL, q BOOLEAN } }
            B ::= SET { x [5] INTEGER, y BOOLEAN }
            END
        ").unwrap();

        let a = def(&module, "A");
        assert_eq!(a.components[0].tag.as_deref(), Some("0"));
        assert_eq!(a.components[1].tag.as_deref(), Some("1"));
        assert!(!a.components[1].explicit);
        match a.components[1].ty {
            TypeRef::Inline(ref choice) => {
                assert_eq!(choice.components[1].tag.as_deref(), Some("1"));
            }
            _ => panic!("inline type expected"),
        }

        let b = def(&module, "B");
        assert_eq!(b.components[0].tag.as_deref(), Some("5"));
        assert!(!b.components[0].explicit);
        assert_eq!(b.components[1].tag, None);
    }

    #[test]
    fn explicit_default() {
        let module = parse_module("
            M DEFINITIONS ::= BEGIN
            A ::= SEQUENCE {
                x [0] INTEGER,
                y [1] IMPLICIT INTEGER,
                [[ z [2] BOOLEAN ]],
                ... ! -1
            }
            L ::= SEQUENCE (SIZE (0..8)) OF entry [0] A
            E ::= ENUMERATED { a, b, ..., c, d(7), e }
            END
        ").unwrap();

        let a = def(&module, "A");
        assert!(a.components[0].explicit);
        assert!(!a.components[1].explicit);
        assert_eq!(a.components[2].name, "z");

        let list = def(&module, "L");
        assert_eq!(list.kind, SequenceOf);
        assert_eq!(list.components[0].name, "entry");
        assert_eq!(list.components[0].tag.as_deref(), Some("0"));
        assert_eq!(list.components[0].ty, TypeRef::Named("A".into()));

        assert_eq!(
            def(&module, "E").named_values,
            vec![
                ("a".into(), 0), ("b".into(), 1), ("c".into(), 2),
                ("d".into(), 7), ("e".into(), 8)
            ]
        );
    }

    #[test]
    fn errors() {
        let err = parse_module("
            M DEFINITIONS ::= BEGIN
            A ::= SEQUENCE { COMPONENTS OF B }
            END
        ").unwrap_err();
        assert_eq!(err.message(), "COMPONENTS OF is not supported");
        assert_eq!((err.line(), err.column()), (3, 30));

        let err = parse_module(
            "M DEFINITIONS ::= BEGIN A ::= INTEGER A ::= BOOLEAN END"
        ).unwrap_err();
        assert_eq!(err.message(), "duplicate assignment of 'A'");

        let err = parse_module("M DEFINITIONS ::= BEGIN A ::= ANY END");
        assert!(err.is_err());

        let err = parse_module("M DEFINITIONS ::= BEGIN A ::= INTEGER")
            .unwrap_err();
        assert_eq!(err.message(), "unexpected end of input");
    }
}
