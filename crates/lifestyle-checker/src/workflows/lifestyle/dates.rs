//! Calendar helpers shared by the identity validator and the questionnaire.
//!
//! Registry dates arrive as `DD-MM-YYYY` and form dates as `YYYY-MM-DD`. Both are split and
//! assigned positionally so that neither layout can be mistaken for the other.

use chrono::{Datelike, NaiveDate};

/// Failure to turn a textual date into a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error("expected {layout}, found '{input}'")]
    Layout { layout: &'static str, input: String },
    #[error("'{input}' is not a calendar date")]
    OutOfRange { input: String },
}

const REGISTRY_LAYOUT: &str = "DD-MM-YYYY";
const FORM_LAYOUT: &str = "YYYY-MM-DD";

/// Parse a registry date in `DD-MM-YYYY` layout.
///
/// Day and month may be one or two digits; the year must be four. Impossible dates such as
/// `31-02-2000` are rejected.
pub fn parse_registry_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let [day, month, year] = split_components(input, REGISTRY_LAYOUT)?;
    if year.len() != 4 || day.len() > 2 || month.len() > 2 {
        return Err(layout_error(input, REGISTRY_LAYOUT));
    }
    build_date(input, year, month, day)
}

/// Parse a form date in `YYYY-MM-DD` layout, as produced by a date picker.
pub fn parse_form_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let [year, month, day] = split_components(input, FORM_LAYOUT)?;
    if year.len() != 4 || day.len() > 2 || month.len() > 2 {
        return Err(layout_error(input, FORM_LAYOUT));
    }
    build_date(input, year, month, day)
}

/// Whole years elapsed between `birth_date` and `as_of`.
///
/// One year is taken off while the birthday has not yet come round in `as_of`'s year. The
/// comparison is on (month, day), so a 29 February birthday counts as reached from 1 March in
/// non-leap years. Birth dates after `as_of` yield zero.
pub fn age_in_years(birth_date: NaiveDate, as_of: NaiveDate) -> u32 {
    if birth_date >= as_of {
        return 0;
    }

    let mut years = as_of.year() - birth_date.year();
    if (as_of.month(), as_of.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }

    u32::try_from(years).unwrap_or(0)
}

fn split_components<'a>(
    input: &'a str,
    layout: &'static str,
) -> Result<[&'a str; 3], DateParseError> {
    let trimmed = input.trim();
    let mut parts = trimmed.split('-');
    let components = [parts.next(), parts.next(), parts.next()];

    match (components, parts.next()) {
        ([Some(a), Some(b), Some(c)], None)
            if [a, b, c]
                .iter()
                .all(|part| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit())) =>
        {
            Ok([a, b, c])
        }
        _ => Err(layout_error(input, layout)),
    }
}

fn build_date(input: &str, year: &str, month: &str, day: &str) -> Result<NaiveDate, DateParseError> {
    let out_of_range = || DateParseError::OutOfRange {
        input: input.to_string(),
    };

    let year: i32 = year.parse().map_err(|_| out_of_range())?;
    let month: u32 = month.parse().map_err(|_| out_of_range())?;
    let day: u32 = day.parse().map_err(|_| out_of_range())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(out_of_range)
}

fn layout_error(input: &str, layout: &'static str) -> DateParseError {
    DateParseError::Layout {
        layout,
        input: input.to_string(),
    }
}
