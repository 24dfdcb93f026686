//! Timestamp grammars
//!
//! The shape of each grammar is checked with a regular expression first
//! (exactly four year digits, two digits for every other field), then the
//! calendar and clock ranges are checked by `chrono`.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;

use crate::error::{Result, ValidationError};

/// Longest prefix kept by [`TimestampFormat::Fractional`]: `YYYY-MM-DDTHH:MM:SS.ffffff`
const FRACTIONAL_LEN: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampFormat {
    /// `2022-08-11T10:09:21Z`
    Zulu,
    /// `2022-08-11T10:09:21.123456`, longer inputs are cut to 26 characters
    Fractional,
    /// `2021-02-12T09:22:40.335867+00:00`
    FractionalOffset,
    /// `2022-08-11T10:09:21`
    Naive,
}

struct Shapes {
    zulu: Regex,
    fractional: Regex,
    offset: Regex,
    naive: Regex,
}

fn shapes() -> &'static Shapes {
    static SHAPES: OnceLock<Shapes> = OnceLock::new();
    SHAPES.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("static grammar must compile");
        Shapes {
            zulu: compile(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$"),
            fractional: compile(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{1,6}$"),
            offset: compile(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{1,6}[+-]\d{2}:\d{2}$"),
            naive: compile(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}$"),
        }
    })
}

impl TimestampFormat {
    pub fn check(&self, text: &str) -> Result<()> {
        let shapes = shapes();
        let valid = match self {
            TimestampFormat::Zulu => {
                shapes.zulu.is_match(text)
                    && NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%SZ").is_ok()
            }
            TimestampFormat::Fractional => {
                let text = truncate_chars(text, FRACTIONAL_LEN);
                shapes.fractional.is_match(text)
                    && NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
            }
            TimestampFormat::FractionalOffset => {
                shapes.offset.is_match(text)
                    && DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%:z").is_ok()
            }
            TimestampFormat::Naive => {
                shapes.naive.is_match(text)
                    && NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").is_ok()
            }
        };
        if !valid {
            return Err(ValidationError::format(format!("invalid datetime value {}", text)));
        }
        Ok(())
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
