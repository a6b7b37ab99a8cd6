//! A single unfolded iCalendar property: `NAME;PARAM=value:VALUE`.
//!
//! The generator builds [`ContentLine`]s and emits them, [`ContentLine::parse`]
//! reads them back out of an unfolded line. Values are kept exactly as they
//! appear on the wire, i.e. still escaped.

use derive_more::From;
use std::fmt;

use crate::{PARAM_DELIMITER, PARAM_NAME_DELIMITER, PARAM_QUOTE, PARAM_VALUE_DELIMITER, VALUE_DELIMITER};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ContentLineError {
    #[error("Missing property name.")]
    MissingName,
    #[error("Missing a closing quote.")]
    MissingClosingQuote,
    #[error("Missing a \"{0}\" delimiter.")]
    MissingDelimiter(char),
    #[error("Missing a parameter key.")]
    MissingParamKey,
    #[error("Missing value.")]
    MissingValue,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, From)]
pub struct ContentLineParams(pub(crate) Vec<(String, Vec<String>)>);

impl ContentLineParams {
    #[inline]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| name == key)
            .and_then(|(_, values)| values.first().map(String::as_str))
    }

    #[inline]
    pub fn get_value_type(&self) -> Option<&str> {
        self.get_param("VALUE")
    }

    pub fn replace_param(&mut self, name: String, value: String) {
        if let Some(pos) = self.0.iter().position(|(n, _)| n == &name) {
            self.0[pos] = (name, vec![value]);
        } else {
            self.0.push((name, vec![value]));
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Vec<String>)> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct ContentLine {
    /// Property name, uppercase.
    pub name: String,
    pub params: ContentLineParams,
    /// Raw (escaped) property value.
    pub value: String,
}

impl ContentLine {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_owned(),
            params: ContentLineParams::default(),
            value: value.into(),
        }
    }

    /// Builder style shortcut for [`ContentLineParams::replace_param`].
    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.replace_param(name.to_owned(), value.to_owned());
        self
    }

    /// Split an unfolded line into name, parameters and value.
    pub fn parse(line: &str) -> Result<Self, ContentLineError> {
        let Some(name_end) = line.find([PARAM_DELIMITER, VALUE_DELIMITER]) else {
            return Err(ContentLineError::MissingValue);
        };
        let (name, mut rest) = line.split_at(name_end);
        if name.is_empty() {
            return Err(ContentLineError::MissingName);
        }

        let mut params = vec![];
        while let Some(remainder) = rest.strip_prefix(PARAM_DELIMITER) {
            let Some((key, remainder)) = remainder.split_once(PARAM_NAME_DELIMITER) else {
                return Err(ContentLineError::MissingDelimiter(PARAM_NAME_DELIMITER));
            };
            if key.is_empty() {
                return Err(ContentLineError::MissingParamKey);
            }
            rest = remainder;

            let mut values = Vec::with_capacity(1);
            loop {
                if let Some(quoted) = rest.strip_prefix(PARAM_QUOTE) {
                    let Some((value, remainder)) = quoted.split_once(PARAM_QUOTE) else {
                        return Err(ContentLineError::MissingClosingQuote);
                    };
                    values.push(value.to_owned());
                    rest = remainder;
                } else {
                    let end = rest
                        .find([PARAM_DELIMITER, VALUE_DELIMITER, PARAM_VALUE_DELIMITER])
                        .ok_or(ContentLineError::MissingValue)?;
                    values.push(rest[..end].to_owned());
                    rest = &rest[end..];
                }
                match rest.strip_prefix(PARAM_VALUE_DELIMITER) {
                    Some(remainder) => rest = remainder,
                    None => break,
                }
            }
            params.push((key.to_uppercase(), values));
        }

        let value = rest
            .strip_prefix(VALUE_DELIMITER)
            .ok_or(ContentLineError::MissingValue)?;
        Ok(Self {
            name: name.to_uppercase(),
            params: params.into(),
            value: value.to_owned(),
        })
    }
}

fn needs_quotes(value: &str) -> bool {
    value.contains([PARAM_DELIMITER, VALUE_DELIMITER, PARAM_VALUE_DELIMITER])
}

impl fmt::Display for ContentLine {
    /// The unfolded wire form, without line terminator.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (key, values) in self.params.iter() {
            write!(f, "{PARAM_DELIMITER}{key}{PARAM_NAME_DELIMITER}")?;
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    write!(f, "{PARAM_VALUE_DELIMITER}")?;
                }
                if needs_quotes(value) {
                    write!(f, "{PARAM_QUOTE}{value}{PARAM_QUOTE}")?;
                } else {
                    write!(f, "{value}")?;
                }
            }
        }
        write!(f, "{VALUE_DELIMITER}{}", self.value)
    }
}
