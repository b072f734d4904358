//! Recursive-descent parser driving a [`Visitor`].
//!
//! Consumes tokens one value at a time and emits events in document order.
//! Containers recurse; scalar tokens are converted to [`Scalar`]s here, so
//! the tokenizer stays free of numeric policy.

use crate::error::{Error, SyntaxError};
use crate::scalar::Scalar;
use crate::tokenizer::{Token, Tokenizer};
use crate::visitor::Visitor;

pub(crate) struct Parser<'v, I, V: ?Sized> {
    tokens: Tokenizer<I>,
    visitor: &'v mut V,
    current: Token,
}

impl<'v, I, V> Parser<'v, I, V>
where
    I: Iterator<Item = Result<char, Error>>,
    V: Visitor + ?Sized,
{
    pub(crate) fn new(input: I, visitor: &'v mut V) -> Self {
        Self {
            tokens: Tokenizer::new(input),
            visitor,
            current: Token::Eof,
        }
    }

    /// Parses exactly one document and requires end of input after it.
    pub(crate) fn parse(mut self) -> Result<(), Error> {
        self.advance()?;
        self.value(None)?;
        if self.current != Token::Eof {
            return Err(SyntaxError::TrailingContent.into());
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<(), Error> {
        self.current = self.tokens.next_token()?;
        Ok(())
    }

    fn take(&mut self) -> Token {
        std::mem::replace(&mut self.current, Token::Eof)
    }

    /// The error for a token that does not fit where `expected` is required.
    fn expected(&self, expected: &'static str) -> Error {
        match self.current {
            Token::Eof => SyntaxError::UnexpectedEndOfInput.into(),
            ref other => SyntaxError::UnexpectedToken {
                expected,
                found: other.describe(),
            }
            .into(),
        }
    }

    fn value(&mut self, key: Option<&str>) -> Result<(), Error> {
        let scalar = match self.take() {
            Token::StartMapping => return self.mapping(key),
            Token::StartSequence => return self.sequence(key),
            Token::True => Scalar::Bool(true),
            Token::False => Scalar::Bool(false),
            Token::Null => Scalar::Null,
            Token::String(content) => Scalar::String(content),
            Token::Int(lexeme) => parse_integer(lexeme)?,
            Token::Float(lexeme) => parse_float(lexeme)?,
            other => {
                self.current = other;
                return Err(self.expected("a value"));
            }
        };
        self.visitor.scalar(key, scalar)?;
        self.advance()
    }

    /// The opening brace is already consumed. Trailing separators before
    /// the closing brace are accepted.
    fn mapping(&mut self, key: Option<&str>) -> Result<(), Error> {
        self.visitor.push_mapping(key)?;
        self.advance()?;
        loop {
            if self.current == Token::EndMapping {
                break;
            }
            self.pair()?;
            if self.current == Token::Separator {
                self.advance()?;
            } else {
                break;
            }
        }
        if self.current != Token::EndMapping {
            return Err(self.expected("'}'"));
        }
        self.visitor.pop()?;
        self.advance()
    }

    fn sequence(&mut self, key: Option<&str>) -> Result<(), Error> {
        self.visitor.push_sequence(key)?;
        self.advance()?;
        loop {
            if self.current == Token::EndSequence {
                break;
            }
            self.value(None)?;
            if self.current == Token::Separator {
                self.advance()?;
            } else {
                break;
            }
        }
        if self.current != Token::EndSequence {
            return Err(self.expected("']'"));
        }
        self.visitor.pop()?;
        self.advance()
    }

    fn pair(&mut self) -> Result<(), Error> {
        let key = match self.take() {
            Token::String(key) => key,
            Token::Eof => return Err(SyntaxError::UnexpectedEndOfInput.into()),
            _ => return Err(SyntaxError::KeyNotString.into()),
        };
        self.advance()?;
        if self.current != Token::Mapper {
            return Err(self.expected("':'"));
        }
        self.advance()?;
        self.value(Some(&key))
    }
}

fn parse_float(lexeme: String) -> Result<Scalar, Error> {
    match lexeme.parse::<f64>() {
        Ok(value) => Ok(Scalar::Float(value)),
        Err(_) => Err(SyntaxError::InvalidNumber(lexeme).into()),
    }
}

/// Smallest-first classification: `i64`, then `u64` for the upper magnitude
/// range, then `f64` for anything longer than either.
fn parse_integer(lexeme: String) -> Result<Scalar, Error> {
    if let Ok(i) = lexeme.parse::<i64>() {
        return Ok(Scalar::Int(i));
    }
    if let Ok(u) = lexeme.parse::<u64>() {
        return Ok(Scalar::Uint(u));
    }
    if let Ok(f) = lexeme.parse::<f64>() {
        return Ok(Scalar::Float(f));
    }
    Err(SyntaxError::InvalidNumber(lexeme).into())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::Parser;
    use crate::error::{Error, SyntaxError};
    use crate::scalar::Scalar;
    use crate::visitor::Visitor;

    /// Records events verbatim so tests can assert on order and keys.
    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Scalar(Option<String>, Scalar),
        PushSequence(Option<String>),
        PushMapping(Option<String>),
        Pop,
    }

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl Visitor for Recorder {
        fn scalar(&mut self, key: Option<&str>, value: Scalar) -> Result<(), Error> {
            self.0.push(Event::Scalar(key.map(str::to_owned), value));
            Ok(())
        }

        fn push_sequence(&mut self, key: Option<&str>) -> Result<(), Error> {
            self.0.push(Event::PushSequence(key.map(str::to_owned)));
            Ok(())
        }

        fn push_mapping(&mut self, key: Option<&str>) -> Result<(), Error> {
            self.0.push(Event::PushMapping(key.map(str::to_owned)));
            Ok(())
        }

        fn pop(&mut self) -> Result<(), Error> {
            self.0.push(Event::Pop);
            Ok(())
        }
    }

    fn events(input: &str) -> Result<Vec<Event>, Error> {
        let mut recorder = Recorder::default();
        Parser::new(input.chars().map(Ok::<char, Error>), &mut recorder).parse()?;
        Ok(recorder.0)
    }

    fn scalar(key: Option<&str>, value: impl Into<Scalar>) -> Event {
        Event::Scalar(key.map(str::to_owned), value.into())
    }

    #[rstest]
    #[case("null", vec![scalar(None, Scalar::Null)])]
    #[case("true", vec![scalar(None, true)])]
    #[case("false", vec![scalar(None, false)])]
    #[case("42", vec![scalar(None, 42i64)])]
    #[case("-7", vec![scalar(None, -7i64)])]
    #[case("2.5", vec![scalar(None, 2.5f64)])]
    #[case("2e3", vec![scalar(None, 2000.0f64)])]
    #[case(r#""aap""#, vec![scalar(None, "aap")])]
    // past i64::MAX, still within u64
    #[case("18446744073709551615", vec![scalar(None, Scalar::Uint(u64::MAX))])]
    // past u64::MAX, falls back to f64
    #[case("18446744073709551616", vec![scalar(None, 18_446_744_073_709_551_616.0f64)])]
    #[case("[]", vec![Event::PushSequence(None), Event::Pop])]
    #[case("{}", vec![Event::PushMapping(None), Event::Pop])]
    #[case("[1, 2]", vec![
        Event::PushSequence(None),
        scalar(None, 1i64),
        scalar(None, 2i64),
        Event::Pop,
    ])]
    // trailing separators are tolerated
    #[case("[1, 2,]", vec![
        Event::PushSequence(None),
        scalar(None, 1i64),
        scalar(None, 2i64),
        Event::Pop,
    ])]
    #[case(r#"{"aap": "noot",}"#, vec![
        Event::PushMapping(None),
        scalar(Some("aap"), "noot"),
        Event::Pop,
    ])]
    #[case(r#"{"a": 1, "s": [2, {"b": null}]}"#, vec![
        Event::PushMapping(None),
        scalar(Some("a"), 1i64),
        Event::PushSequence(Some("s".to_owned())),
        scalar(None, 2i64),
        Event::PushMapping(None),
        scalar(Some("b"), Scalar::Null),
        Event::Pop,
        Event::Pop,
        Event::Pop,
    ])]
    fn emits_events_in_document_order(#[case] input: &str, #[case] expected: Vec<Event>) {
        assert_eq!(events(input).unwrap(), expected);
    }

    #[rstest]
    #[case("", SyntaxError::UnexpectedEndOfInput)]
    #[case("[1, 2", SyntaxError::UnexpectedEndOfInput)]
    #[case("[1,", SyntaxError::UnexpectedEndOfInput)]
    #[case(r#"{"a": 1"#, SyntaxError::UnexpectedEndOfInput)]
    #[case(r#"{"a""#, SyntaxError::UnexpectedEndOfInput)]
    #[case("[1 2]", SyntaxError::UnexpectedToken {
        expected: "']'",
        found: "number",
    })]
    #[case(r#"{"a" 1}"#, SyntaxError::UnexpectedToken {
        expected: "':'",
        found: "number",
    })]
    #[case("[}", SyntaxError::UnexpectedToken {
        expected: "a value",
        found: "'}'",
    })]
    #[case("]", SyntaxError::UnexpectedToken {
        expected: "a value",
        found: "']'",
    })]
    #[case("{1: 2}", SyntaxError::KeyNotString)]
    #[case("1 2", SyntaxError::TrailingContent)]
    #[case("null null", SyntaxError::TrailingContent)]
    #[case("-", SyntaxError::InvalidNumber("-".to_string()))]
    fn rejects(#[case] input: &str, #[case] expected: SyntaxError) {
        assert_eq!(events(input), Err(Error::Syntax(expected)));
    }

    /// The parser must fail cleanly at the point input runs out instead of
    /// asking the source for characters past the document.
    #[test]
    fn incomplete_input_fails_without_overreading() {
        let consumed = std::cell::Cell::new(0usize);
        let input = "[true,";
        let chars = input.chars().map(|c| {
            consumed.set(consumed.get() + 1);
            Ok::<char, Error>(c)
        });
        let mut recorder = Recorder::default();
        let result = Parser::new(chars, &mut recorder).parse();
        assert_eq!(
            result,
            Err(Error::Syntax(SyntaxError::UnexpectedEndOfInput))
        );
        assert_eq!(consumed.get(), input.len());
        assert_eq!(
            recorder.0,
            vec![Event::PushSequence(None), scalar(None, true)]
        );
    }

    /// Visitor errors abort the parse and surface unchanged.
    #[test]
    fn visitor_errors_propagate() {
        struct Failing;
        impl Visitor for Failing {
            fn scalar(&mut self, _key: Option<&str>, _value: Scalar) -> Result<(), Error> {
                Err(Error::Io("sink closed".to_string()))
            }
            fn push_sequence(&mut self, _key: Option<&str>) -> Result<(), Error> {
                Ok(())
            }
            fn push_mapping(&mut self, _key: Option<&str>) -> Result<(), Error> {
                Ok(())
            }
            fn pop(&mut self) -> Result<(), Error> {
                Ok(())
            }
        }

        let mut failing = Failing;
        let result = Parser::new("[1, 2]".chars().map(Ok::<char, Error>), &mut failing).parse();
        assert_eq!(result, Err(Error::Io("sink closed".to_string())));
    }
}
