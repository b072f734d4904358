//! JSON string escaping.

use std::io::{self, Write};

/// Writes `src` as a quoted JSON string literal.
///
/// Escapes the quote, backslash, forward slash, and the C0 control characters
/// that have mnemonics (`\b \f \n \r \t`). Everything else, including
/// multi-byte UTF-8 sequences and control characters outside that set, passes
/// through untouched; the tokenizer reads such output back verbatim.
pub(crate) fn write_escaped<W: Write>(out: &mut W, src: &str) -> io::Result<()> {
    out.write_all(b"\"")?;
    for c in src.chars() {
        match c {
            '"' => out.write_all(b"\\\"")?,
            '\\' => out.write_all(b"\\\\")?,
            '/' => out.write_all(b"\\/")?,
            '\u{8}' => out.write_all(b"\\b")?,
            '\u{c}' => out.write_all(b"\\f")?,
            '\n' => out.write_all(b"\\n")?,
            '\r' => out.write_all(b"\\r")?,
            '\t' => out.write_all(b"\\t")?,
            _ => {
                let mut buf = [0u8; 4];
                out.write_all(c.encode_utf8(&mut buf).as_bytes())?;
            }
        }
    }
    out.write_all(b"\"")
}

/// Returns `input` as a quoted, escaped JSON string literal.
///
/// ```
/// use jsonvisit::escape;
///
/// assert_eq!(escape("a\tb"), "\"a\\tb\"");
/// ```
#[must_use]
pub fn escape(input: &str) -> String {
    let mut out = Vec::with_capacity(input.len() + 2);
    write_escaped(&mut out, input).expect("writing to a Vec cannot fail");
    String::from_utf8(out).expect("escaped string is valid utf-8")
}
