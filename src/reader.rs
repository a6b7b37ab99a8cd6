//! Read a whole CSV document into memory.
//!
//! The delimiter is not known up front: spreadsheets exported with a European
//! locale commonly use `;`, others use tabs. [`Dialect::sniff`] looks at a
//! leading sample of the input and picks the candidate that splits the sample
//! lines most consistently.

use itertools::Itertools;
use log::{debug, info};

use crate::ConvertError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Candidate delimiters, in order of preference.
const DELIMITERS: [u8; 5] = [b',', b';', b'\t', b'|', b':'];

/// A single CSV record, padded to the header length.
pub type RawRow = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl Dialect {
    /// Guess the dialect from a leading sample of the document.
    ///
    /// Returns `None` if no candidate delimiter occurs in the sample.
    pub fn sniff(sample: &str) -> Option<Self> {
        let lines = sample_lines(sample);
        if lines.is_empty() {
            return None;
        }

        let quote = sniff_quote(&lines);
        let mut best: Option<(usize, u8)> = None;
        for delimiter in DELIMITERS {
            let score = consistency(&lines, delimiter, quote);
            // strictly greater: earlier candidates win ties
            if score > 0 && best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, delimiter));
            }
        }
        best.map(|(_, delimiter)| Self { delimiter, quote })
    }
}

/// Non-empty lines of the sample. The last line is dropped when the sample was
/// cut in the middle of it, unless it is the only one.
fn sample_lines(sample: &str) -> Vec<&str> {
    let mut lines = sample.lines().filter(|l| !l.trim().is_empty()).collect_vec();
    if !sample.ends_with('\n') && lines.len() > 1 {
        lines.pop();
    }
    lines
}

fn sniff_quote(lines: &[&str]) -> u8 {
    let double = lines.iter().map(|l| l.matches('"').count()).sum::<usize>();
    let single = lines.iter().map(|l| l.matches('\'').count()).sum::<usize>();
    if double == 0 && single >= 2 && single % 2 == 0 {
        b'\''
    } else {
        b'"'
    }
}

/// Number of lines sharing the most common non-zero count of `delimiter`.
fn consistency(lines: &[&str], delimiter: u8, quote: u8) -> usize {
    lines
        .iter()
        .map(|line| count_unquoted(line.as_bytes(), delimiter, quote))
        .filter(|count| *count > 0)
        .counts()
        .into_values()
        .max()
        .unwrap_or(0)
}

fn count_unquoted(line: &[u8], delimiter: u8, quote: u8) -> usize {
    let mut quoted = false;
    let mut count = 0;
    for byte in line {
        if *byte == quote {
            quoted = !quoted;
        } else if *byte == delimiter && !quoted {
            count += 1;
        }
    }
    count
}

/// The parsed document: header row and data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub dialect: Dialect,
    pub header: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Parse `input` as CSV, sniffing the dialect from its first `sample_len` bytes.
///
/// Short rows are padded with empty strings up to the header length, rows
/// longer than the header are kept as they are.
pub fn read_rows(input: &[u8], sample_len: usize) -> Result<RawTable, ConvertError> {
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
    let sample = String::from_utf8_lossy(&input[..sample_len.min(input.len())]);

    let dialect = match Dialect::sniff(&sample) {
        Some(dialect) => dialect,
        None => {
            debug!("could not detect the CSV dialect, falling back to comma separated");
            Dialect::default()
        }
    };
    info!(
        "Parsing CSV with delimiter {:?} and quote {:?}",
        dialect.delimiter as char, dialect.quote as char
    );

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .flexible(true)
        .has_headers(false)
        .from_reader(input);

    let mut records = reader
        .records()
        .map(|record| record.map(|record| record.iter().map(str::to_owned).collect_vec()))
        .collect::<Result<Vec<RawRow>, _>>()?
        .into_iter();

    let header = records.next().ok_or(ConvertError::EmptyInput)?;
    let rows = records
        .map(|mut row| {
            if row.len() < header.len() {
                row.resize(header.len(), String::new());
            }
            row
        })
        .collect_vec();
    info!("Read {} data rows", rows.len());

    Ok(RawTable {
        dialect,
        header,
        rows,
    })
}
