//! Materializing visitor events into a [`Value`] tree.

use crate::error::{BuilderError, Error};
use crate::scalar::Scalar;
use crate::value::{Map, Sequence, Value};
use crate::visitor::Visitor;

#[derive(Debug)]
enum Node {
    Mapping(Map),
    Sequence(Sequence),
}

#[derive(Debug)]
struct OpenFrame {
    /// The key this container goes under in its parent, if the parent is a
    /// mapping.
    key: Option<String>,
    node: Node,
}

/// A [`Visitor`] that accumulates events into an in-memory document.
///
/// The same stack-based legality rules as [`crate::JsonBuilder`] apply: keyed
/// events require a mapping on top of the stack, unkeyed values are rejected
/// mid-entry, and popping an empty stack fails. Exactly one top-level value
/// is accepted.
///
/// ```
/// use jsonvisit::{Scalar, TreeBuilder, Value, Visitor};
///
/// let mut tree = TreeBuilder::new();
/// tree.push_sequence(None)?;
/// tree.scalar(None, Scalar::Int(1))?;
/// tree.pop()?;
/// assert_eq!(tree.collect()?, Value::Sequence(vec![Value::Int(1)]));
/// # Ok::<(), jsonvisit::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    stack: Vec<OpenFrame>,
    root: Option<Value>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Yields the finished document.
    ///
    /// Fails with [`BuilderError::IncompleteDocument`] while containers are
    /// still open or no value has been received.
    pub fn collect(self) -> Result<Value, Error> {
        if !self.stack.is_empty() {
            return Err(BuilderError::IncompleteDocument.into());
        }
        self.root
            .ok_or_else(|| BuilderError::IncompleteDocument.into())
    }

    fn check_position(&self, key: Option<&str>) -> Result<(), Error> {
        match self.stack.last() {
            Some(frame) => match frame.node {
                Node::Mapping(_) if key.is_none() => Err(BuilderError::NotExpectingValue.into()),
                Node::Sequence(_) if key.is_some() => Err(BuilderError::NotAMapping.into()),
                _ => Ok(()),
            },
            None if key.is_some() => Err(BuilderError::NotAMapping.into()),
            None if self.root.is_some() => Err(BuilderError::DocumentComplete.into()),
            None => Ok(()),
        }
    }

    fn attach(&mut self, key: Option<&str>, value: Value) -> Result<(), Error> {
        self.check_position(key)?;
        match self.stack.last_mut() {
            Some(frame) => match &mut frame.node {
                Node::Mapping(map) => {
                    let Some(k) = key else {
                        return Err(BuilderError::NotExpectingValue.into());
                    };
                    map.insert(k.to_owned(), value);
                }
                Node::Sequence(seq) => seq.push(value),
            },
            None => self.root = Some(value),
        }
        Ok(())
    }

    fn open(&mut self, key: Option<&str>, node: Node) -> Result<(), Error> {
        self.check_position(key)?;
        self.stack.push(OpenFrame {
            key: key.map(str::to_owned),
            node,
        });
        Ok(())
    }
}

impl Visitor for TreeBuilder {
    fn scalar(&mut self, key: Option<&str>, value: Scalar) -> Result<(), Error> {
        self.attach(key, Value::from(value))
    }

    fn push_sequence(&mut self, key: Option<&str>) -> Result<(), Error> {
        self.open(key, Node::Sequence(Sequence::new()))
    }

    fn push_mapping(&mut self, key: Option<&str>) -> Result<(), Error> {
        self.open(key, Node::Mapping(Map::new()))
    }

    fn pop(&mut self) -> Result<(), Error> {
        let Some(frame) = self.stack.pop() else {
            return Err(BuilderError::EmptyStack.into());
        };
        let value = match frame.node {
            Node::Mapping(map) => Value::Mapping(map),
            Node::Sequence(seq) => Value::Sequence(seq),
        };
        self.attach(frame.key.as_deref(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::TreeBuilder;
    use crate::error::{BuilderError, Error};
    use crate::scalar::Scalar;
    use crate::value::{Map, Value};
    use crate::visitor::Visitor;

    #[test]
    fn builds_nested_document() -> Result<(), Error> {
        let mut tree = TreeBuilder::new();
        tree.push_mapping(None)?;
        tree.scalar(Some("a"), Scalar::Int(1))?;
        tree.push_sequence(Some("s"))?;
        tree.scalar(None, Scalar::Int(2))?;
        tree.scalar(None, Scalar::String("x".into()))?;
        tree.pop()?;
        tree.pop()?;

        let mut expected = Map::new();
        expected.insert("a".to_string(), Value::Int(1));
        expected.insert(
            "s".to_string(),
            Value::Sequence(vec![Value::Int(2), Value::String("x".into())]),
        );
        assert_eq!(tree.collect()?, Value::Mapping(expected));
        Ok(())
    }

    #[test]
    fn rejects_keyed_events_outside_mappings() {
        let mut tree = TreeBuilder::new();
        assert_eq!(
            tree.scalar(Some("k"), Scalar::Null),
            Err(Error::Builder(BuilderError::NotAMapping))
        );

        let mut tree = TreeBuilder::new();
        tree.push_sequence(None).unwrap();
        assert_eq!(
            tree.push_mapping(Some("k")),
            Err(Error::Builder(BuilderError::NotAMapping))
        );
    }

    #[test]
    fn rejects_unkeyed_values_in_mappings() {
        let mut tree = TreeBuilder::new();
        tree.push_mapping(None).unwrap();
        assert_eq!(
            tree.scalar(None, Scalar::Int(1)),
            Err(Error::Builder(BuilderError::NotExpectingValue))
        );
        // The rejected value must not land in the mapping either.
        tree.pop().unwrap();
        assert_eq!(tree.collect(), Ok(Value::Mapping(Map::new())));
    }

    #[test]
    fn rejects_second_root() {
        let mut tree = TreeBuilder::new();
        tree.scalar(None, Scalar::Null).unwrap();
        assert_eq!(
            tree.scalar(None, Scalar::Null),
            Err(Error::Builder(BuilderError::DocumentComplete))
        );
    }

    #[test]
    fn pop_on_empty_stack_fails() {
        let mut tree = TreeBuilder::new();
        assert_eq!(
            tree.pop(),
            Err(Error::Builder(BuilderError::EmptyStack))
        );
    }

    #[test]
    fn collect_requires_a_complete_document() {
        let tree = TreeBuilder::new();
        assert_eq!(
            tree.collect(),
            Err(Error::Builder(BuilderError::IncompleteDocument))
        );

        let mut tree = TreeBuilder::new();
        tree.push_sequence(None).unwrap();
        assert_eq!(
            tree.collect(),
            Err(Error::Builder(BuilderError::IncompleteDocument))
        );
    }

    #[test]
    fn duplicate_keys_keep_position_take_last_value() -> Result<(), Error> {
        let mut tree = TreeBuilder::new();
        tree.push_mapping(None)?;
        tree.scalar(Some("k"), Scalar::Int(1))?;
        tree.scalar(Some("x"), Scalar::Int(2))?;
        tree.scalar(Some("k"), Scalar::Int(3))?;
        tree.pop()?;
        let doc = tree.collect()?;
        let map = doc.as_mapping().unwrap();
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec!["k", "x"]
        );
        assert_eq!(map["k"], Value::Int(3));
        Ok(())
    }
}
