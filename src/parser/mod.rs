mod line;
pub use line::{Line, LineError, LineReader, unfold_lines};

mod content_line;
pub use content_line::{ContentLine, ContentLineError, ContentLineParams};

/// Reverse [`crate::generator::escape_text`].
///
/// `\n` and `\N` become a newline, `\\`, `\;` and `\,` the escaped character.
/// Any other backslash is kept literally.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(escaped @ ('\\' | ';' | ',')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
