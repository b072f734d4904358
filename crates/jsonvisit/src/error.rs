//! Error types for lexing, parsing, and building.
//!
//! Every failure is an ordinary value propagated through `Result`; nothing in
//! this crate panics on malformed input or misused builders.

use thiserror::Error;

/// Any error this crate can produce.
///
/// The variants mirror the pipeline stages: [`LexError`] for character-level
/// failures, [`SyntaxError`] for grammar-level failures, [`BuilderError`] for
/// structural misuse of a builder, and `Io` for failures of the underlying
/// source or sink.
///
/// A `Builder` error surfacing from [`crate::load`] indicates an internal
/// invariant violation rather than bad input; bad input always surfaces as
/// `Lex` or `Syntax`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Character-level error from the tokenizer.
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),
    /// Grammar-level error from the parser.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// Structural misuse of an incremental builder.
    #[error("builder error: {0}")]
    Builder(#[from] BuilderError),
    /// Failure of the underlying reader or writer.
    ///
    /// The message is captured as a string so errors stay comparable in
    /// tests.
    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// A character-level error produced while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character that cannot begin any token.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    /// A `true`/`false`/`null` literal went off the rails partway through.
    #[error("unexpected char '{found}', expected '{expected}' as part of \"{literal}\"")]
    UnexpectedLiteralCharacter {
        /// The character actually read.
        found: char,
        /// The character the literal spelling requires here.
        expected: char,
        /// The literal being matched.
        literal: &'static str,
    },
    /// Input ended in the middle of a literal.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// A `\u` escape contained something other than a hex digit.
    #[error("expected hex digit, got '{0}'")]
    ExpectedHexDigit(char),
    /// The bytes of a string literal do not form valid UTF-8.
    ///
    /// Reachable only through `\u` escapes, which append raw bytes.
    #[error("string literal is not valid utf-8")]
    InvalidUtf8,
}

/// A grammar-level error produced while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A token that does not fit the grammar at this position.
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        /// What the grammar required here.
        expected: &'static str,
        /// A description of the token actually seen.
        found: &'static str,
    },
    /// A mapping key token that is not a string.
    #[error("key is not a string")]
    KeyNotString,
    /// Input ended where a token was still required.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// Extra content after the top-level value.
    #[error("trailing content after document")]
    TrailingContent,
    /// A number lexeme no numeric type accepts.
    #[error("invalid number literal \"{0}\"")]
    InvalidNumber(String),
}

/// Structural misuse of [`crate::JsonBuilder`] or [`crate::TreeBuilder`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuilderError {
    /// `key` called while the builder is not positioned at a mapping entry.
    #[error("not expecting a key")]
    NotExpectingKey,
    /// A keyed event arrived while the top of the stack is not a mapping.
    #[error("top of the stack is not a mapping")]
    NotAMapping,
    /// A value arrived while the current mapping entry still needs its key.
    #[error("not expecting a value")]
    NotExpectingValue,
    /// `pop` called with no open container.
    #[error("can not pop an empty stack")]
    EmptyStack,
    /// JSON has no representation for NaN or infinities.
    #[error("{0} is not representable in json")]
    NonFiniteFloat(f64),
    /// A second top-level value was offered to a tree builder.
    #[error("document is already complete")]
    DocumentComplete,
    /// `collect` called with open containers or no root value.
    #[error("document is incomplete")]
    IncompleteDocument,
}
