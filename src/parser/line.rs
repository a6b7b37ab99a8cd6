//! Join folded physical lines back into content lines.
//!
//! RFC 5545 lines longer than 75 characters are folded by inserting a CRLF
//! followed by a single space. `LineReader` undoes that: every physical line
//! starting with a space (or tab) is appended, minus that first character, to
//! the content line before it.

use std::fmt;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LineError {
    #[error("Line {0}: Continuation without a preceding line.")]
    OrphanContinuation(usize),
}

/// An unfolded content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub inner: String,
    number: usize,
}

impl Line {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Number of the first physical line, starting at 1.
    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

pub struct LineReader<'a> {
    lines: std::iter::Peekable<std::iter::Enumerate<std::str::Split<'a, &'static str>>>,
}

impl<'a> LineReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.split("\r\n").enumerate().peekable(),
        }
    }
}

fn is_continuation(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

impl Iterator for LineReader<'_> {
    type Item = Result<Line, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        // a trailing CRLF leaves one empty piece behind
        let (index, first) = self.lines.find(|(_, line)| !line.is_empty())?;
        if is_continuation(first) {
            return Some(Err(LineError::OrphanContinuation(index + 1)));
        }

        let mut inner = first.to_owned();
        while let Some((_, next)) = self.lines.next_if(|(_, line)| is_continuation(line)) {
            inner.push_str(&next[1..]);
        }
        Some(Ok(Line {
            inner,
            number: index + 1,
        }))
    }
}

/// Unfold a whole document into its content lines.
pub fn unfold_lines(text: &str) -> Result<Vec<String>, LineError> {
    LineReader::new(text)
        .map(|line| line.map(|line| line.inner))
        .collect()
}
