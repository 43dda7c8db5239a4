//! Compile-time league season table.
//!
//! Loaded once at process start, validated, and injected into the
//! orchestrator. No runtime mutation surface.

use crate::error::ConfigError;
use crate::types::{League, LeagueSeason, MonthDay, SeasonWindow};

/// The static table of leagues and their annual season windows.
pub fn season_table() -> Vec<LeagueSeason> {
    vec![
        LeagueSeason {
            league: League::Pll,
            window: SeasonWindow::new(MonthDay::new(6, 1), MonthDay::new(9, 15)),
        },
        LeagueSeason {
            league: League::Nll,
            // Box lacrosse runs through the winter, wrapping the year boundary.
            window: SeasonWindow::new(MonthDay::new(12, 1), MonthDay::new(5, 15)),
        },
        LeagueSeason {
            league: League::Wll,
            window: SeasonWindow::new(MonthDay::new(2, 1), MonthDay::new(3, 31)),
        },
        LeagueSeason {
            league: League::Mll,
            window: SeasonWindow::historical(),
        },
    ]
}

/// Validate a season table. Called once at startup; a failure here is a
/// config-level bug and aborts the invocation.
pub fn validate_table(table: &[LeagueSeason]) -> Result<(), ConfigError> {
    let mut seen = Vec::new();
    for entry in table {
        if seen.contains(&entry.league) {
            return Err(ConfigError::DuplicateLeague {
                league: entry.league,
            });
        }
        seen.push(entry.league);

        if entry.window.historical {
            continue;
        }
        if !entry.window.start.is_valid() {
            return Err(ConfigError::InvalidSeasonWindow {
                league: entry.league,
                reason: format!(
                    "start {}/{} is not a valid month/day",
                    entry.window.start.month, entry.window.start.day
                ),
            });
        }
        if !entry.window.end.is_valid() {
            return Err(ConfigError::InvalidSeasonWindow {
                league: entry.league,
                reason: format!(
                    "end {}/{} is not a valid month/day",
                    entry.window.end.month, entry.window.end.day
                ),
            });
        }
        // Same-month windows cannot wrap; start after end is an empty range.
        if entry.window.start.month == entry.window.end.month
            && entry.window.start.day > entry.window.end.day
        {
            return Err(ConfigError::InvalidSeasonWindow {
                league: entry.league,
                reason: "start day after end day within the same month".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_table_is_valid() {
        let table = season_table();
        assert!(validate_table(&table).is_ok());
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn rejects_invalid_day_for_month() {
        let table = vec![LeagueSeason {
            league: League::Pll,
            window: SeasonWindow::new(MonthDay::new(6, 31), MonthDay::new(9, 15)),
        }];
        assert!(matches!(
            validate_table(&table),
            Err(ConfigError::InvalidSeasonWindow { .. })
        ));
    }

    #[test]
    fn rejects_empty_same_month_window() {
        let table = vec![LeagueSeason {
            league: League::Wll,
            window: SeasonWindow::new(MonthDay::new(3, 20), MonthDay::new(3, 5)),
        }];
        assert!(matches!(
            validate_table(&table),
            Err(ConfigError::InvalidSeasonWindow { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_league() {
        let mut table = season_table();
        table.push(table[0]);
        assert!(matches!(
            validate_table(&table),
            Err(ConfigError::DuplicateLeague { .. })
        ));
    }

    #[test]
    fn historical_window_skips_date_validation() {
        let table = vec![LeagueSeason {
            league: League::Mll,
            window: SeasonWindow::historical(),
        }];
        assert!(validate_table(&table).is_ok());
    }
}
