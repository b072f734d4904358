//! Incremental JSON text writer.

use std::io::Write;

use crate::error::{BuilderError, Error};
use crate::escape::write_escaped;
use crate::scalar::Scalar;
use crate::visitor::Visitor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Mapping,
    Sequence,
}

#[derive(Debug)]
struct Frame {
    container: Container,
    /// True once a sibling has been written in this container.
    needs_separator: bool,
    /// Mapping only: true while the next event must be a key.
    expecting_key: bool,
}

impl Frame {
    fn new(container: Container) -> Self {
        Self {
            container,
            needs_separator: false,
            expecting_key: container == Container::Mapping,
        }
    }
}

/// A stack-based incremental writer that emits correctly punctuated JSON
/// text, rejecting events that would violate JSON structure.
///
/// Every mutating operation returns `Result<&mut Self, Error>` so calls chain
/// with `?`. Compact mode writes no insignificant whitespace; pretty mode
/// indents two spaces per nesting level and puts a space after each colon.
///
/// Dropping a builder with open containers does not close them; call
/// [`Self::pop`] or [`Self::flush`] to finish the document.
///
/// ```
/// use jsonvisit::JsonBuilder;
///
/// let mut out = Vec::new();
/// let mut b = JsonBuilder::new(&mut out, true);
/// b.open_mapping()?
///     .key("a")?
///     .with_int(1)?
///     .key("s")?
///     .open_sequence()?
///     .with_int(2)?
///     .with_int(3)?;
/// b.flush()?;
/// assert_eq!(out, br#"{"a":1,"s":[2,3]}"#);
/// # Ok::<(), jsonvisit::Error>(())
/// ```
#[derive(Debug)]
pub struct JsonBuilder<W> {
    out: W,
    compact: bool,
    stack: Vec<Frame>,
    /// Separator state for depth zero, where values may be emitted back to
    /// back.
    root_needs_separator: bool,
}

impl<W: Write> JsonBuilder<W> {
    /// Creates a builder bound to one sink and one formatting mode.
    pub fn new(out: W, compact: bool) -> Self {
        Self {
            out,
            compact,
            stack: Vec::new(),
            root_needs_separator: false,
        }
    }

    /// Writes the key of the next mapping entry.
    ///
    /// Legal only when the innermost open container is a mapping that is not
    /// mid-entry.
    pub fn key(&mut self, name: &str) -> Result<&mut Self, Error> {
        match self.stack.last() {
            Some(f) if f.container == Container::Mapping && f.expecting_key => {}
            _ => return Err(BuilderError::NotExpectingKey.into()),
        }
        self.separator()?;
        write_escaped(&mut self.out, name)?;
        self.out
            .write_all(if self.compact { b":".as_slice() } else { b": " })?;
        if let Some(f) = self.stack.last_mut() {
            f.needs_separator = false;
            f.expecting_key = false;
        }
        Ok(self)
    }

    /// Writes `null`.
    pub fn with_none(&mut self) -> Result<&mut Self, Error> {
        self.write_value(b"null")
    }

    /// Writes `true` or `false`.
    pub fn with_bool(&mut self, v: bool) -> Result<&mut Self, Error> {
        self.write_value(if v { b"true".as_slice() } else { b"false" })
    }

    /// Writes a signed integer in base 10.
    pub fn with_int(&mut self, v: i64) -> Result<&mut Self, Error> {
        let mut buf = itoa::Buffer::new();
        let text = buf.format(v);
        self.write_value(text.as_bytes())
    }

    /// Writes an unsigned integer in base 10.
    pub fn with_uint(&mut self, v: u64) -> Result<&mut Self, Error> {
        let mut buf = itoa::Buffer::new();
        let text = buf.format(v);
        self.write_value(text.as_bytes())
    }

    /// Writes a float in its shortest round-trip form.
    ///
    /// The rendering always keeps a float marker (`2.0`, `1e30`) so the value
    /// reparses as a float. NaN and infinities are a
    /// [`BuilderError::NonFiniteFloat`].
    pub fn with_float(&mut self, v: f64) -> Result<&mut Self, Error> {
        if !v.is_finite() {
            return Err(BuilderError::NonFiniteFloat(v).into());
        }
        let mut buf = ryu::Buffer::new();
        let text = buf.format_finite(v);
        self.write_value(text.as_bytes())
    }

    /// Writes a quoted, escaped string.
    pub fn with_string(&mut self, v: &str) -> Result<&mut Self, Error> {
        self.expect_value()?;
        self.separator()?;
        write_escaped(&mut self.out, v)?;
        self.after_value();
        Ok(self)
    }

    /// Writes any scalar; dispatches to the matching `with_*` operation.
    pub fn with_scalar(&mut self, v: &Scalar) -> Result<&mut Self, Error> {
        match v {
            Scalar::Null => self.with_none(),
            Scalar::Bool(b) => self.with_bool(*b),
            Scalar::Int(i) => self.with_int(*i),
            Scalar::Uint(u) => self.with_uint(*u),
            Scalar::Float(f) => self.with_float(*f),
            Scalar::String(s) => self.with_string(s),
        }
    }

    /// Opens a mapping; the next event must be a [`Self::key`] or
    /// [`Self::pop`].
    pub fn open_mapping(&mut self) -> Result<&mut Self, Error> {
        self.open(Container::Mapping, b"{")
    }

    /// Opens a sequence.
    pub fn open_sequence(&mut self) -> Result<&mut Self, Error> {
        self.open(Container::Sequence, b"[")
    }

    /// Closes the innermost open container.
    pub fn pop(&mut self) -> Result<&mut Self, Error> {
        let Some(frame) = self.stack.pop() else {
            return Err(BuilderError::EmptyStack.into());
        };
        self.newline()?;
        self.out.write_all(match frame.container {
            Container::Mapping => b"}",
            Container::Sequence => b"]",
        })?;
        self.after_value();
        Ok(self)
    }

    /// Closes every open container and flushes the sink.
    pub fn flush(&mut self) -> Result<(), Error> {
        while !self.stack.is_empty() {
            self.pop()?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn open(&mut self, container: Container, opener: &[u8]) -> Result<&mut Self, Error> {
        self.expect_value()?;
        self.separator()?;
        self.out.write_all(opener)?;
        self.stack.push(Frame::new(container));
        self.newline()?;
        Ok(self)
    }

    fn write_value(&mut self, text: &[u8]) -> Result<&mut Self, Error> {
        self.expect_value()?;
        self.separator()?;
        self.out.write_all(text)?;
        self.after_value();
        Ok(self)
    }

    fn expect_value(&self) -> Result<(), Error> {
        if let Some(f) = self.stack.last() {
            if f.container == Container::Mapping && f.expecting_key {
                return Err(BuilderError::NotExpectingValue.into());
            }
        }
        Ok(())
    }

    fn separator(&mut self) -> Result<(), Error> {
        let pending = self
            .stack
            .last()
            .map_or(self.root_needs_separator, |f| f.needs_separator);
        if pending {
            self.out.write_all(b",")?;
            self.newline()?;
        }
        Ok(())
    }

    fn after_value(&mut self) {
        match self.stack.last_mut() {
            Some(f) => {
                f.needs_separator = true;
                if f.container == Container::Mapping {
                    f.expecting_key = true;
                }
            }
            None => self.root_needs_separator = true,
        }
    }

    fn newline(&mut self) -> Result<(), Error> {
        if self.compact {
            return Ok(());
        }
        self.out.write_all(b"\n")?;
        for _ in 0..self.stack.len() {
            self.out.write_all(b"  ")?;
        }
        Ok(())
    }
}

impl<W: Write> Visitor for JsonBuilder<W> {
    fn scalar(&mut self, key: Option<&str>, value: Scalar) -> Result<(), Error> {
        if let Some(k) = key {
            self.key(k)?;
        }
        self.with_scalar(&value)?;
        Ok(())
    }

    fn push_sequence(&mut self, key: Option<&str>) -> Result<(), Error> {
        if let Some(k) = key {
            self.key(k)?;
        }
        self.open_sequence()?;
        Ok(())
    }

    fn push_mapping(&mut self, key: Option<&str>) -> Result<(), Error> {
        if let Some(k) = key {
            self.key(k)?;
        }
        self.open_mapping()?;
        Ok(())
    }

    fn pop(&mut self) -> Result<(), Error> {
        Self::pop(self)?;
        Ok(())
    }
}
