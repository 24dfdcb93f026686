//! Numeric predicates, both for native numbers and numbers carried as text

use std::cmp::Ordering;

use super::Sign;
use crate::error::{Result, ValidationError};
use crate::value::{Value, ValueType};

pub(super) fn check_int(value: &Value, sign: Option<Sign>) -> Result<()> {
    let Value::Int(i) = value else {
        return Err(ValidationError::type_mismatch(ValueType::Int, value.value_type()));
    };
    check_sign(i.cmp(&0), sign, || i.to_string())
}

pub(super) fn check_float(value: &Value, sign: Option<Sign>) -> Result<()> {
    let Value::Float(x) = value else {
        return Err(ValidationError::type_mismatch(ValueType::Float, value.value_type()));
    };
    check_float_sign(*x, sign)
}

pub(super) fn check_nan(value: &Value, expect_nan: bool) -> Result<()> {
    let Value::Float(x) = value else {
        return Err(ValidationError::type_mismatch(ValueType::Float, value.value_type()));
    };
    match (x.is_nan(), expect_nan) {
        (true, false) => Err(ValidationError::range("NaN is not allowed there")),
        (false, true) => Err(ValidationError::range(format!("NaN expected, but got {}", x))),
        _ => Ok(()),
    }
}

/// Check an integer literal: optional sign, decimal digits, single
/// underscores between digits, surrounding whitespace ignored. The
/// literal is compared against zero without converting it, so there is
/// no upper bound on its magnitude.
pub(super) fn check_int_literal(text: &str, sign: Option<Sign>) -> Result<()> {
    let against_zero = parse_int_literal(text)
        .ok_or_else(|| ValidationError::parse(format!("invalid literal for int: {:?}", text)))?;
    check_sign(against_zero, sign, || text.trim().to_string())
}

/// Check a float literal. Single underscores between digits are accepted
/// the same way as in integer literals.
pub(super) fn check_float_literal(text: &str, sign: Option<Sign>) -> Result<()> {
    let x: f64 = strip_digit_separators(text.trim())
        .and_then(|literal| literal.parse().ok())
        .ok_or_else(|| ValidationError::parse(format!("could not convert string to float: {:?}", text)))?;
    check_float_sign(x, sign)
}

/// Remove `_` separators, `None` when one is not surrounded by digits
fn strip_digit_separators(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let after_digit = i > 0 && bytes[i - 1].is_ascii_digit();
        let before_digit = bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
        if !(after_digit && before_digit) {
            return None;
        }
    }
    Some(text.replace('_', ""))
}

fn check_float_sign(x: f64, sign: Option<Sign>) -> Result<()> {
    let Some(sign) = sign else { return Ok(()) };
    // NaN compares as neither side of zero
    let accepted = x.partial_cmp(&0.0).map(|ord| sign.accepts(ord)).unwrap_or(false);
    if !accepted {
        return Err(ValidationError::range(format!(
            "{} float value expected, but got {} instead",
            sign.describe(),
            x
        )));
    }
    Ok(())
}

fn check_sign(against_zero: Ordering, sign: Option<Sign>, shown: impl FnOnce() -> String) -> Result<()> {
    match sign {
        Some(sign) if !sign.accepts(against_zero) => Err(ValidationError::range(format!(
            "{} integer value expected, but got {} instead",
            sign.describe(),
            shown()
        ))),
        _ => Ok(()),
    }
}

/// Compare an integer literal against zero, `None` when it is malformed
fn parse_int_literal(text: &str) -> Option<Ordering> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let mut saw_digit = false;
    let mut nonzero = false;
    let mut previous_underscore = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => {
                saw_digit = true;
                nonzero |= c != '0';
                previous_underscore = false;
            }
            '_' if saw_digit && !previous_underscore => previous_underscore = true,
            _ => return None,
        }
    }
    if !saw_digit || previous_underscore {
        return None;
    }

    Some(match (nonzero, negative) {
        (false, _) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Less,
    })
}
