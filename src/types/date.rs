use chrono::NaiveDate;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Reverse;

/// A year has to have at least this many digits to be told apart from a day or month.
const MIN_YEAR_DIGITS: usize = 3;

/// Year 0 does not exist in the Gregorian calendar.
const MIN_YEAR: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error("empty date")]
    Empty,
    #[error("unrecognized date {0:?}")]
    Unrecognized(String),
    #[error("cannot tell which part of {0:?} is the year")]
    AmbiguousYear(String),
    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("{0} is out of the supported range")]
    OutOfRange(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Year,
    Month,
    Day,
}

/// One explicit date layout. Years are four digits, months and days one or two.
#[derive(Debug)]
pub struct DateFormat {
    pub name: &'static str,
    pattern: Regex,
    order: [Part; 3],
}

impl DateFormat {
    fn new(name: &'static str, pattern: &str, order: [Part; 3]) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("date pattern is valid"),
            order,
        }
    }

    /// Attempt to read `input` in this layout.
    pub fn parse(&self, input: &str) -> Result<NaiveDate, DateParseError> {
        let captures = self
            .pattern
            .captures(input)
            .ok_or_else(|| DateParseError::Unrecognized(input.to_owned()))?;

        let unrecognized = |_| DateParseError::Unrecognized(input.to_owned());
        let (mut year, mut month, mut day) = (0, 0, 0);
        for (part, capture) in self.order.iter().zip(captures.iter().skip(1).flatten()) {
            let value = capture.as_str();
            match part {
                Part::Year => year = value.parse().map_err(unrecognized)?,
                Part::Month => month = value.parse().map_err(unrecognized)?,
                Part::Day => day = value.parse().map_err(unrecognized)?,
            }
        }
        from_ymd(year, month, day)
    }
}

lazy_static! {
    /// Explicit layouts in the order they are attempted. The first match wins,
    /// so `09/05/2025` is read as September 5th.
    pub static ref DATE_FORMATS: [DateFormat; 4] = [
        DateFormat::new("ISO", r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$", [Part::Year, Part::Month, Part::Day]),
        DateFormat::new("European dot", r"^([0-9]{1,2})\.([0-9]{1,2})\.([0-9]{4})$", [Part::Day, Part::Month, Part::Year]),
        DateFormat::new("US slash", r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$", [Part::Month, Part::Day, Part::Year]),
        DateFormat::new("European slash", r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$", [Part::Day, Part::Month, Part::Year]),
    ];
    static ref FRAGMENT: Regex = Regex::new(r"[^/.\-]+").expect("fragment pattern is valid");
}

fn from_ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, DateParseError> {
    if year < MIN_YEAR {
        return Err(DateParseError::InvalidDate { year, month, day });
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateParseError::InvalidDate { year, month, day })
}

/// Parse a due date as found in a spreadsheet cell.
///
/// The explicit [`DATE_FORMATS`] are tried first. If none of them applies the
/// input is split on `/`, `.` and `-` into exactly three numeric fragments.
/// Ordered by descending length (ties in reading order) they are taken as year,
/// month and day. The year has to be strictly the longest fragment.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DateParseError::Empty);
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| format.parse(input).ok())
        .map_or_else(|| parse_fragments(input), Ok)
}

fn parse_fragments(input: &str) -> Result<NaiveDate, DateParseError> {
    let fragments = FRAGMENT
        .find_iter(input)
        .map(|m| m.as_str().trim())
        .filter(|fragment| !fragment.is_empty())
        .collect_vec();
    if fragments.len() != 3
        || !fragments
            .iter()
            .all(|fragment| fragment.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(DateParseError::Unrecognized(input.to_owned()));
    }

    // stable sort: equally long fragments keep their left-to-right order
    let by_length = fragments
        .into_iter()
        .sorted_by_key(|fragment| Reverse(fragment.len()))
        .collect_vec();
    let [year, month, day] = by_length[..] else {
        return Err(DateParseError::Unrecognized(input.to_owned()));
    };
    if year.len() < MIN_YEAR_DIGITS || year.len() == month.len() {
        return Err(DateParseError::AmbiguousYear(input.to_owned()));
    }

    let unrecognized = |_| DateParseError::Unrecognized(input.to_owned());
    from_ymd(
        year.parse().map_err(unrecognized)?,
        month.parse().map_err(unrecognized)?,
        day.parse().map_err(unrecognized)?,
    )
}
