//! Incremental character decoding for stream inputs.

use std::io::{self, Read};

use crate::error::{Error, LexError};

/// Yields one `char` at a time from an [`io::Read`], decoding UTF-8
/// incrementally.
///
/// Only the bytes of the current code point are ever requested, so a
/// tokenizer driven by this iterator never blocks on input it does not need.
/// Callers with raw file or socket handles should wrap them in a
/// [`io::BufRead`] implementation themselves.
pub(crate) struct CharReader<R> {
    inner: R,
}

impl<R: Read> CharReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner }
    }

    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Expected encoded length for a UTF-8 leading byte; 0 for invalid leads.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}

impl<R: Read> Iterator for CharReader<R> {
    type Item = Result<char, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let lead = match self.next_byte() {
            Err(e) => return Some(Err(e)),
            Ok(None) => return None,
            Ok(Some(b)) => b,
        };
        let width = utf8_width(lead);
        if width == 0 {
            return Some(Err(LexError::InvalidUtf8.into()));
        }
        if width == 1 {
            return Some(Ok(char::from(lead)));
        }
        let mut buf = [lead, 0, 0, 0];
        for slot in &mut buf[1..width] {
            match self.next_byte() {
                Err(e) => return Some(Err(e)),
                Ok(None) => return Some(Err(LexError::InvalidUtf8.into())),
                Ok(Some(b)) => *slot = b,
            }
        }
        match std::str::from_utf8(&buf[..width]).map(|s| s.chars().next()) {
            Ok(Some(c)) => Some(Ok(c)),
            _ => Some(Err(LexError::InvalidUtf8.into())),
        }
    }
}
