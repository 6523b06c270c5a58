//! Sales report commands.

use chrono::{DateTime, NaiveDate, Utc};

use storekeeper_backoffice::AppState;
use storekeeper_backoffice::services::{
    monthly_summary, range_summary, render_monthly_report, render_range_report,
};

use super::{CliError, emit};

/// Print the report for one calendar month.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for a month outside 1-12.
pub fn monthly(state: &mut AppState, year: i32, month: u32) -> Result<(), CliError> {
    check_month(month)?;

    let currency = state.renderer().currency();
    let orders = state.orders().orders_by_month(year, month)?;
    let summary = monthly_summary(&orders, year, month);

    emit(&render_monthly_report(year, month, &summary, currency))
}

/// Print the report for `[from, to]`, whole days in UTC.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for malformed dates or `from > to`.
pub fn range(state: &mut AppState, from: &str, to: &str) -> Result<(), CliError> {
    let start = start_of_day(parse_date("--from", from)?);
    let end = end_of_day(parse_date("--to", to)?);
    if start > end {
        return Err(CliError::InvalidArgument(
            "--from",
            format!("{from} is after {to}"),
        ));
    }

    let currency = state.renderer().currency();
    let orders = state.orders().orders_by_date_range(start, end)?;
    let summary = range_summary(&orders, start, end);

    emit(&render_range_report(start, end, &summary, currency))
}

/// Reject months outside 1-12.
pub(super) fn check_month(month: u32) -> Result<(), CliError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(CliError::InvalidArgument(
            "--month",
            format!("{month} is not between 1 and 12"),
        ))
    }
}

fn parse_date(flag: &'static str, raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| CliError::InvalidArgument(flag, format!("'{raw}': {e}")))
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let last = chrono::NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
        .unwrap_or(chrono::NaiveTime::MIN);
    date.and_time(last).and_utc()
}
