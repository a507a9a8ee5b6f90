// file: src/utils/dates.rs
// description: report metadata dates relative to the run date
// reference: https://docs.rs/chrono

use chrono::{Days, Local, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDates {
    pub today: NaiveDate,
}

impl ReportDates {
    /// Offsets exposed to templates, in days from `today`.
    pub const OFFSETS: [(&'static str, u64); 6] = [
        ("today", 0),
        ("seven_days", 7),
        ("fourteen_days", 14),
        ("thirty_days", 30),
        ("sixty_days", 60),
        ("ninety_days", 90),
    ];

    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn local_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn days_from_today(&self, days: u64) -> NaiveDate {
        self.today
            .checked_add_days(Days::new(days))
            .unwrap_or(NaiveDate::MAX)
    }

    /// (template name, `YYYY-MM-DD`) pairs.
    pub fn named(&self) -> Vec<(&'static str, String)> {
        Self::OFFSETS
            .iter()
            .map(|(name, days)| (*name, self.days_from_today(*days).format("%Y-%m-%d").to_string()))
            .collect()
    }
}
