//! Reading type definitions from ASN.1 source.
//!
//! This module reads the subset of ASN.1 module syntax needed to describe
//! records: type assignments with SEQUENCE, SET, CHOICE, ENUMERATED and the
//! basic types, tags, and the module’s tagging default. The result is a
//! [`Module`](crate::schema::Module) ready for the schema compiler.
//!
//! Things that don’t affect decoding, like constraints, value assignments,
//! imports, or default values, are skipped. Things that would but aren’t
//! supported, like `COMPONENTS OF` or parameterized types, produce an
//! error.

pub use self::error::ParseError;
pub use self::parser::parse_module;

mod error;
mod lexer;
mod parser;


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use serde_json::json;
    use crate::decode::Value;
    use crate::resolve::Resolver;
    use crate::schema::SchemaTree;
    use super::*;

    const SCHEMA: &str = "
        Billing DEFINITIONS IMPLICIT TAGS ::= BEGIN

        -- A single billing record.
        Record ::= [APPLICATION 1] SEQUENCE {
            id       [0] INTEGER,
            status   [1] Status,
            payment  [2] Payment OPTIONAL,
            wrapped  [4] EXPLICIT INTEGER OPTIONAL,
            names    [3] SEQUENCE OF [0] IA5String
        }

        Status ::= ENUMERATED { active, closed }

        Payment ::= CHOICE {
            code   [0] IA5String,
            amount [1] INTEGER
        }

        END
    ";

    #[test]
    fn decode_record() {
        let module = parse_module(SCHEMA).unwrap();
        let tree = SchemaTree::compile(&module, "Record").unwrap();
        assert!(tree.warnings().is_empty());

        let value = Value::decode_slice(
            b"\x61\x19\
              \x80\x01\x07\
              \x81\x01\x01\
              \xa2\x04\x81\x02\x00\x64\
              \xa4\x03\x02\x01\x2a\
              \xa3\x06\x80\x01a\x80\x01b"
        ).unwrap();
        let document = Resolver::with_schema(&tree).resolve(&value).unwrap();
        assert_eq!(
            document.to_json(),
            json!({
                "id": 7,
                "status": "closed",
                "payment": {"amount": 100},
                "wrapped": 42,
                "names": ["a", "b"],
            })
        );
    }
}
