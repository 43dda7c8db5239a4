//! Activity window calculator.
//!
//! Pure calendar logic deciding which leagues are in season on a given
//! date. Never suspends, never touches I/O, so the orchestrator can be
//! tested with arbitrary fake tables.

use chrono::{Datelike, NaiveDate};

use statline_common::{League, LeagueSeason, SeasonWindow};

/// Is this window active on `date`?
///
/// Historical leagues are never active. A non-wrapping window is a closed
/// month-major interval. A wrapping window (start month > end month) is
/// active from the start date through Dec 31 and from Jan 1 through the
/// end date — the day-of-month bound applies only within the boundary
/// months themselves.
pub fn is_active(date: NaiveDate, window: &SeasonWindow) -> bool {
    if window.historical {
        return false;
    }

    let m = date.month();
    let d = date.day();
    let start = window.start;
    let end = window.end;

    if window.wraps() {
        let after_start = m > start.month || (m == start.month && d >= start.day);
        let before_end = m < end.month || (m == end.month && d <= end.day);
        after_start || before_end
    } else {
        let after_start = m > start.month || (m == start.month && d >= start.day);
        let before_end = m < end.month || (m == end.month && d <= end.day);
        after_start && before_end
    }
}

/// Filter the league table down to the leagues in season on `date`,
/// preserving table order.
pub fn active_leagues(date: NaiveDate, table: &[LeagueSeason]) -> Vec<League> {
    table
        .iter()
        .filter(|entry| is_active(date, &entry.window))
        .map(|entry| entry.league)
        .collect()
}
