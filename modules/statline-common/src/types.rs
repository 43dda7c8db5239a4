use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Leagues ---

/// Stable short code for one external league data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum League {
    /// Premier Lacrosse League (field, summer).
    Pll,
    /// National Lacrosse League (box, winter — season wraps the year boundary).
    Nll,
    /// Women's Lacrosse League.
    Wll,
    /// Major League Lacrosse. Folded into the PLL; kept for historical data.
    Mll,
}

impl League {
    pub fn code(&self) -> &'static str {
        match self {
            League::Pll => "pll",
            League::Nll => "nll",
            League::Wll => "wll",
            League::Mll => "mll",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            League::Pll => "Premier Lacrosse League",
            League::Nll => "National Lacrosse League",
            League::Wll => "Women's Lacrosse League",
            League::Mll => "Major League Lacrosse",
        }
    }
}

impl std::fmt::Display for League {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// --- Season windows ---

/// A recurring calendar position, year-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDay {
    /// 1-12.
    pub month: u32,
    /// 1-31, consistent with `month`.
    pub day: u32,
}

impl MonthDay {
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    /// Days in the month, using the leap-year maximum for February so a
    /// Feb 29 boundary is representable.
    pub fn max_day_for_month(month: u32) -> u32 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 => 29,
            _ => 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= Self::max_day_for_month(self.month)
    }
}

/// Annual active period for a league. `start.month > end.month` means the
/// window wraps the year boundary (active start→Dec 31 and Jan 1→end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonWindow {
    pub start: MonthDay,
    pub end: MonthDay,
    /// Retired league — never scheduled regardless of date.
    pub historical: bool,
}

impl SeasonWindow {
    pub const fn new(start: MonthDay, end: MonthDay) -> Self {
        Self {
            start,
            end,
            historical: false,
        }
    }

    pub const fn historical() -> Self {
        Self {
            start: MonthDay::new(1, 1),
            end: MonthDay::new(1, 1),
            historical: true,
        }
    }

    pub fn wraps(&self) -> bool {
        self.start.month > self.end.month
    }
}

/// One row in the static league table: a league and its season window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeagueSeason {
    pub league: League,
    pub window: SeasonWindow,
}

// --- Stat records ---

/// One extracted player stat line. `external_id` is the stable upstream
/// identifier and, with the league code, the upsert key in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    pub league: League,
    pub external_id: String,
    pub player_name: String,
    pub team: String,
    pub position: Option<String>,
    pub games_played: i32,
    pub goals: i32,
    pub assists: i32,
    pub points: i32,
    pub scraped_at: DateTime<Utc>,
}

// --- Cache views ---

/// Derived views cached per league. The invalidator deletes exactly this
/// set after a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheView {
    Leaderboard,
    Players,
    Teams,
    Standings,
}

impl CacheView {
    pub const ALL: [CacheView; 4] = [
        CacheView::Leaderboard,
        CacheView::Players,
        CacheView::Teams,
        CacheView::Standings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheView::Leaderboard => "leaderboard",
            CacheView::Players => "players",
            CacheView::Teams => "teams",
            CacheView::Standings => "standings",
        }
    }

    /// Deterministic cache key for this view of one league.
    pub fn key(&self, league: League) -> String {
        format!("{}:{}", self.as_str(), league.code())
    }
}
