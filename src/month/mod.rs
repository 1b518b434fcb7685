use anyhow::anyhow;
use chrono::{Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref YEAR_MONTH: Regex = Regex::new(r"^\d{4}-\d{2}$").unwrap();
}

/// Resolve a month token into the `YYYY-MM` form the budget server expects.
/// `last` is the previous calendar month, `current` is this month, anything
/// else must already be `YYYY-MM`. Validation is format-only: `2024-13`
/// passes and simply finds no data on the server.
pub(crate) fn resolve(token: &str) -> anyhow::Result<String> {
    match token {
        "last" => Ok(previous_month()),
        "current" => Ok(current_month()),
        other => {
            if YEAR_MONTH.is_match(other) {
                Ok(other.to_string())
            } else {
                Err(anyhow!("invalid month '{other}'. Must be in the format YYYY-MM, or 'current' or 'last'"))
            }
        }
    }
}

/// clap value parser for the month positional argument, so a bad token
/// fails as a usage error before anything touches the network.
pub(crate) fn parse_token(token: &str) -> Result<String, String> {
    resolve(token).map_err(|e| e.to_string())
}

pub(crate) fn previous_month() -> String {
    let today = Utc::now().naive_utc().date();
    let (year, month) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    format!("{year:04}-{month:02}")
}

pub(crate) fn current_month() -> String {
    let today = Utc::now().naive_utc().date();
    format!("{:04}-{:02}", today.year(), today.month())
}
