//! An event-driven JSON codec.
//!
//! Parsing runs a four-stage pipeline: a character source, a tokenizer, a
//! recursive-descent parser, and a [`Visitor`] that consumes structural
//! events in document order. [`TreeBuilder`] materializes events into a
//! [`Value`] tree; [`JsonBuilder`] writes events back out as text without
//! ever holding a document in memory. [`load`] and [`dump`] wire the stages
//! together for the common tree-in, tree-out case.
//!
//! ```
//! use jsonvisit::{load, dump_string, Value};
//!
//! let doc = load(r#"{"aap": [1, 2.5], "noot": null}"#)?;
//! assert_eq!(doc.as_mapping().unwrap()["noot"], Value::Null);
//! assert_eq!(dump_string(&doc, true)?, r#"{"aap":[1,2.5],"noot":null}"#);
//! # Ok::<(), jsonvisit::Error>(())
//! ```
//!
//! Numbers parse into the narrowest fitting type: `i64` first, `u64` for the
//! upper magnitude range, `f64` for everything else. Any lexeme with a
//! decimal point or exponent is a float, and floats are always written with a
//! float marker, so the distinction survives a round trip.
//!
//! The parser reads its source one character at a time and never looks past
//! the current token (except one peeked character while scanning a number),
//! so feeding it a prefix of a document fails promptly with an error instead
//! of blocking on input the document does not need.

mod builder;
mod error;
mod escape;
mod parser;
mod reader;
mod scalar;
mod tokenizer;
mod tree;
mod value;
mod visitor;

#[cfg(test)]
mod tests;

use std::io::{Read, Write};

pub use builder::JsonBuilder;
pub use error::{BuilderError, Error, LexError, SyntaxError};
pub use escape::escape;
pub use scalar::Scalar;
pub use tree::TreeBuilder;
pub use value::{Map, Sequence, Value};
pub use visitor::Visitor;

use parser::Parser;
use reader::CharReader;

/// Parses one JSON document from a string into a [`Value`] tree.
///
/// ```
/// use jsonvisit::{load, Value};
///
/// assert_eq!(load("[true]")?, Value::Sequence(vec![Value::Bool(true)]));
/// # Ok::<(), jsonvisit::Error>(())
/// ```
pub fn load(input: &str) -> Result<Value, Error> {
    let mut tree = TreeBuilder::new();
    load_with(input, &mut tree)?;
    tree.collect()
}

/// Parses one JSON document from a string, feeding events to `visitor`.
pub fn load_with<V: Visitor + ?Sized>(input: &str, visitor: &mut V) -> Result<(), Error> {
    Parser::new(input.chars().map(Ok::<char, Error>), visitor).parse()
}

/// Parses one JSON document from a byte reader into a [`Value`] tree.
///
/// The reader is consumed one UTF-8 code point at a time; no characters past
/// the end of the document are requested. Wrap raw file or socket handles in
/// a buffered reader.
pub fn load_reader<R: Read>(input: R) -> Result<Value, Error> {
    let mut tree = TreeBuilder::new();
    load_reader_with(input, &mut tree)?;
    tree.collect()
}

/// Parses one JSON document from a byte reader, feeding events to `visitor`.
pub fn load_reader_with<R: Read, V: Visitor + ?Sized>(
    input: R,
    visitor: &mut V,
) -> Result<(), Error> {
    Parser::new(CharReader::new(input), visitor).parse()
}

/// Replays `doc` as visitor events in document order.
///
/// Mapping entries arrive in insertion order; every `push_*` gets a matching
/// `pop`. This is the bridge from trees back to event consumers, and is how
/// [`dump`] drives a [`JsonBuilder`].
pub fn walk<V: Visitor + ?Sized>(doc: &Value, visitor: &mut V) -> Result<(), Error> {
    walk_keyed(doc, None, visitor)
}

fn walk_keyed<V: Visitor + ?Sized>(
    node: &Value,
    key: Option<&str>,
    visitor: &mut V,
) -> Result<(), Error> {
    match node {
        Value::Null => visitor.scalar(key, Scalar::Null),
        Value::Bool(v) => visitor.scalar(key, Scalar::Bool(*v)),
        Value::Int(v) => visitor.scalar(key, Scalar::Int(*v)),
        Value::Uint(v) => visitor.scalar(key, Scalar::Uint(*v)),
        Value::Float(v) => visitor.scalar(key, Scalar::Float(*v)),
        Value::String(v) => visitor.scalar(key, Scalar::String(v.clone())),
        Value::Sequence(seq) => {
            visitor.push_sequence(key)?;
            for element in seq {
                walk_keyed(element, None, visitor)?;
            }
            visitor.pop()
        }
        Value::Mapping(map) => {
            visitor.push_mapping(key)?;
            for (k, element) in map {
                walk_keyed(element, Some(k), visitor)?;
            }
            visitor.pop()
        }
    }
}

/// Serializes `doc` to `out`, compact or pretty.
///
/// Fails with [`BuilderError::NonFiniteFloat`] if the tree contains a NaN or
/// infinity.
pub fn dump<W: Write>(doc: &Value, out: W, compact: bool) -> Result<(), Error> {
    let mut builder = JsonBuilder::new(out, compact);
    walk(doc, &mut builder)?;
    builder.flush()
}

/// Serializes `doc` to a string.
///
/// ```
/// use jsonvisit::{dump_string, Value};
///
/// let doc = Value::Sequence(vec![Value::Int(1), Value::Float(2.0)]);
/// assert_eq!(dump_string(&doc, true)?, "[1,2.0]");
/// # Ok::<(), jsonvisit::Error>(())
/// ```
pub fn dump_string(doc: &Value, compact: bool) -> Result<String, Error> {
    let mut buf = Vec::new();
    dump(doc, &mut buf, compact)?;
    Ok(String::from_utf8(buf).expect("serialized output is valid utf-8"))
}
