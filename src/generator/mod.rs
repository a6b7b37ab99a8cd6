//! Serialise components to RFC 5545 text.
//!
//! Every emitted line ends with CRLF. Content lines longer than
//! [`FOLD_LIMIT`] characters are folded onto continuation lines starting with
//! a single space.

mod ical;

use crate::parser::ContentLine;

/// Maximum length of a physical line, continuation space included.
pub const FOLD_LIMIT: usize = 75;
pub const CRLF: &str = "\r\n";

pub trait Emitter {
    fn generate(&self) -> String;
}

impl Emitter for ContentLine {
    fn generate(&self) -> String {
        fold_line(&self.to_string()) + CRLF
    }
}

impl<T: Emitter> Emitter for [T] {
    fn generate(&self) -> String {
        self.iter().map(Emitter::generate).collect()
    }
}

impl<T: Emitter> Emitter for Vec<T> {
    fn generate(&self) -> String {
        self.as_slice().generate()
    }
}

impl<T: Emitter> Emitter for Option<T> {
    fn generate(&self) -> String {
        self.as_ref().map(Emitter::generate).unwrap_or_default()
    }
}

/// Escape a TEXT value.
///
/// Backslashes go first so the escapes added afterwards are not doubled.
/// Carriage returns never reach the output: CRLF and lone CR line breaks are
/// written as `\n` like any other newline.
pub fn escape_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Fold `line` into physical lines of at most [`FOLD_LIMIT`] characters,
/// joined by CRLF. The result has no trailing line break.
///
/// Lengths are counted in characters, so multi-byte UTF-8 sequences are never
/// split.
pub fn fold_line(line: &str) -> String {
    if line.chars().count() <= FOLD_LIMIT {
        return line.to_owned();
    }

    let mut out = String::with_capacity(line.len() + line.len() / FOLD_LIMIT * 3);
    let mut width = 0;
    for c in line.chars() {
        if width == FOLD_LIMIT {
            out.push_str(CRLF);
            out.push(' ');
            width = 1;
        }
        out.push(c);
        width += 1;
    }
    out
}
