//! The five look-back windows a scan covers, in display order.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed look-back window. Declaration order is scan order and display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "Past Day")]
    Day,
    #[serde(rename = "Past Week")]
    Week,
    #[serde(rename = "Past Month")]
    Month,
    #[serde(rename = "Past Quarter")]
    Quarter,
    #[serde(rename = "Past Year")]
    Year,
}

/// How the prompt frames a window: discrete recent events vs. thematic trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    ShortTerm,
    Trend,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::Day,
        Timeframe::Week,
        Timeframe::Month,
        Timeframe::Quarter,
        Timeframe::Year,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::Day => "Past Day",
            Timeframe::Week => "Past Week",
            Timeframe::Month => "Past Month",
            Timeframe::Quarter => "Past Quarter",
            Timeframe::Year => "Past Year",
        }
    }

    pub fn horizon(self) -> Horizon {
        match self {
            Timeframe::Day | Timeframe::Week => Horizon::ShortTerm,
            Timeframe::Month | Timeframe::Quarter | Timeframe::Year => Horizon::Trend,
        }
    }

    /// First day of the window ending on `end`.
    ///
    /// Day and Week subtract days; the longer windows subtract calendar months, so a
    /// day missing from the shorter month clamps to that month's last day.
    pub fn window_start(self, end: NaiveDate) -> NaiveDate {
        let start = match self {
            Timeframe::Day => end.checked_sub_days(chrono::Days::new(1)),
            Timeframe::Week => end.checked_sub_days(chrono::Days::new(7)),
            Timeframe::Month => end.checked_sub_months(Months::new(1)),
            Timeframe::Quarter => end.checked_sub_months(Months::new(3)),
            Timeframe::Year => end.checked_sub_months(Months::new(12)),
        };
        start.unwrap_or(end)
    }

    /// Human-readable range, e.g. `from 3/14/2025 to 3/15/2025`.
    pub fn date_range(self, end: NaiveDate) -> String {
        format!(
            "from {} to {}",
            format_us_date(self.window_start(end)),
            format_us_date(end)
        )
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn format_us_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn all_is_in_declaration_order() {
        let mut sorted = Timeframe::ALL;
        sorted.sort();
        assert_eq!(sorted, Timeframe::ALL);
        assert_eq!(Timeframe::ALL[0].label(), "Past Day");
        assert_eq!(Timeframe::ALL[4].label(), "Past Year");
    }

    #[test]
    fn short_term_split() {
        assert_eq!(Timeframe::Day.horizon(), Horizon::ShortTerm);
        assert_eq!(Timeframe::Week.horizon(), Horizon::ShortTerm);
        assert_eq!(Timeframe::Month.horizon(), Horizon::Trend);
        assert_eq!(Timeframe::Quarter.horizon(), Horizon::Trend);
        assert_eq!(Timeframe::Year.horizon(), Horizon::Trend);
    }

    #[test]
    fn window_starts() {
        let end = date(2025, 3, 15);
        assert_eq!(Timeframe::Day.window_start(end), date(2025, 3, 14));
        assert_eq!(Timeframe::Week.window_start(end), date(2025, 3, 8));
        assert_eq!(Timeframe::Month.window_start(end), date(2025, 2, 15));
        assert_eq!(Timeframe::Quarter.window_start(end), date(2024, 12, 15));
        assert_eq!(Timeframe::Year.window_start(end), date(2024, 3, 15));
    }

    #[test]
    fn month_subtraction_clamps_to_shorter_month() {
        assert_eq!(Timeframe::Month.window_start(date(2025, 3, 31)), date(2025, 2, 28));
        assert_eq!(Timeframe::Year.window_start(date(2024, 2, 29)), date(2023, 2, 28));
    }

    #[test]
    fn date_range_uses_us_format() {
        assert_eq!(
            Timeframe::Day.date_range(date(2025, 1, 1)),
            "from 12/31/2024 to 1/1/2025"
        );
    }

    #[test]
    fn serde_uses_display_labels() {
        let json = serde_json::to_string(&Timeframe::Quarter).unwrap();
        assert_eq!(json, "\"Past Quarter\"");
        let back: Timeframe = serde_json::from_str("\"Past Week\"").unwrap();
        assert_eq!(back, Timeframe::Week);
    }
}
