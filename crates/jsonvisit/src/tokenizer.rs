//! Character-level lexer.
//!
//! Turns a character stream into [`Token`]s with no grammar knowledge. The
//! tokenizer never consumes more characters than the current token requires:
//! a single-slot peek is used only for number scanning, so syntactically
//! incomplete input fails in the parser instead of stalling here.

use bstr::ByteVec;

use crate::error::{Error, LexError};

/// One lexical unit.
///
/// Number tokens carry the raw lexeme; the parser decides the numeric type.
/// String tokens carry the decoded content without quotes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    StartMapping,
    EndMapping,
    StartSequence,
    EndSequence,
    Separator,
    Mapper,
    String(String),
    Int(String),
    Float(String),
    True,
    False,
    Null,
    Eof,
}

impl Token {
    /// Short description for error messages.
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Self::StartMapping => "'{'",
            Self::EndMapping => "'}'",
            Self::StartSequence => "'['",
            Self::EndSequence => "']'",
            Self::Separator => "','",
            Self::Mapper => "':'",
            Self::String(_) => "string",
            Self::Int(_) | Self::Float(_) => "number",
            Self::True => "'true'",
            Self::False => "'false'",
            Self::Null => "'null'",
            Self::Eof => "end of input",
        }
    }
}

pub(crate) struct Tokenizer<I> {
    input: I,
    peeked: Option<char>,
}

impl<I> Tokenizer<I>
where
    I: Iterator<Item = Result<char, Error>>,
{
    pub(crate) fn new(input: I) -> Self {
        Self {
            input,
            peeked: None,
        }
    }

    fn next_char(&mut self) -> Result<Option<char>, Error> {
        if let Some(c) = self.peeked.take() {
            return Ok(Some(c));
        }
        self.input.next().transpose()
    }

    fn peek_char(&mut self) -> Result<Option<char>, Error> {
        if self.peeked.is_none() {
            self.peeked = self.input.next().transpose()?;
        }
        Ok(self.peeked)
    }

    /// Produces the next token, or [`Token::Eof`] once input is exhausted.
    pub(crate) fn next_token(&mut self) -> Result<Token, Error> {
        let Some(head) = self.skip_whitespace()? else {
            return Ok(Token::Eof);
        };
        match head {
            '{' => Ok(Token::StartMapping),
            '}' => Ok(Token::EndMapping),
            '[' => Ok(Token::StartSequence),
            ']' => Ok(Token::EndSequence),
            ',' => Ok(Token::Separator),
            ':' => Ok(Token::Mapper),
            't' => self.literal("true", Token::True),
            'f' => self.literal("false", Token::False),
            'n' => self.literal("null", Token::Null),
            '0'..='9' | '-' | '+' => self.number(head),
            '"' => self.string(),
            other => Err(LexError::UnexpectedCharacter(other).into()),
        }
    }

    fn skip_whitespace(&mut self) -> Result<Option<char>, Error> {
        while let Some(c) = self.next_char()? {
            if !c.is_whitespace() {
                return Ok(Some(c));
            }
        }
        Ok(None)
    }

    /// Matches the remaining spelling of `literal`; its head is already
    /// consumed.
    fn literal(&mut self, literal: &'static str, token: Token) -> Result<Token, Error> {
        for expected in literal.chars().skip(1) {
            match self.next_char()? {
                None => return Err(LexError::UnexpectedEndOfInput.into()),
                Some(c) if c != expected => {
                    return Err(LexError::UnexpectedLiteralCharacter {
                        found: c,
                        expected,
                        literal,
                    }
                    .into());
                }
                Some(_) => {}
            }
        }
        Ok(token)
    }

    /// Scans digits, at most one decimal point, and at most one exponent.
    /// Classified float once a point or exponent is seen.
    fn number(&mut self, head: char) -> Result<Token, Error> {
        let mut lexeme = String::new();
        lexeme.push(head);

        let mut is_float = false;
        let mut had_point = false;
        let mut had_exp = false;

        while let Some(c) = self.peek_char()? {
            match c {
                '0'..='9' => {
                    self.next_char()?;
                    lexeme.push(c);
                }
                '.' if !had_point => {
                    self.next_char()?;
                    lexeme.push(c);
                    is_float = true;
                    had_point = true;
                }
                'e' | 'E' if !had_exp => {
                    self.next_char()?;
                    lexeme.push(c);
                    if let Some(sign @ ('+' | '-')) = self.peek_char()? {
                        self.next_char()?;
                        lexeme.push(sign);
                    }
                    is_float = true;
                    had_exp = true;
                }
                _ => break,
            }
        }

        Ok(if is_float {
            Token::Float(lexeme)
        } else {
            Token::Int(lexeme)
        })
    }

    /// Accumulates string content after the opening quote, until an
    /// unescaped quote or end of input (an unterminated string at EOF yields
    /// the partial content, matching the historical behavior).
    ///
    /// Content is gathered as bytes because `\u` escapes append raw bytes;
    /// the finished token must still be valid UTF-8.
    fn string(&mut self) -> Result<Token, Error> {
        let mut content = Vec::new();
        while let Some(c) = self.next_char()? {
            if c == '"' {
                break;
            }
            if c != '\\' {
                content.push_char(c);
                continue;
            }
            let Some(escaped) = self.next_char()? else {
                break;
            };
            match escaped {
                '"' | '\\' | '/' => content.push_char(escaped),
                'b' => content.push(0x08),
                'f' => content.push(0x0c),
                'n' => content.push(b'\n'),
                'r' => content.push(b'\r'),
                't' => content.push(b'\t'),
                'u' => self.unicode_escape(&mut content)?,
                // Unknown escapes keep the escaped character verbatim.
                other => content.push_char(other),
            }
        }
        content
            .into_string()
            .map(Token::String)
            .map_err(|_| LexError::InvalidUtf8.into())
    }

    /// Decodes up to four hex digits (fewer if input ends) and appends the
    /// minimal non-zero big-endian bytes of the value; the low byte is always
    /// appended. This reproduces the historical escape handling exactly; it
    /// is not UTF-16 aware.
    fn unicode_escape(&mut self, content: &mut Vec<u8>) -> Result<(), Error> {
        let mut acc: u32 = 0;
        for _ in 0..4 {
            let Some(c) = self.next_char()? else {
                break;
            };
            let Some(digit) = hex_val(c) else {
                return Err(LexError::ExpectedHexDigit(c).into());
            };
            acc = (acc << 4) | digit;
        }
        for shift in [24u32, 16, 8] {
            #[allow(clippy::cast_possible_truncation)]
            let byte = (acc >> shift) as u8;
            if byte != 0 {
                content.push(byte);
            }
        }
        #[allow(clippy::cast_possible_truncation)]
        content.push(acc as u8);
        Ok(())
    }
}

fn hex_val(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - '0' as u32),
        'a'..='f' => Some(c as u32 - 'a' as u32 + 10),
        'A'..='F' => Some(c as u32 - 'A' as u32 + 10),
        _ => None,
    }
}
