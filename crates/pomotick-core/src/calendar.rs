use chrono::{Local, NaiveDate};

/// Source of "today" as a local calendar date. Statistics and the daily goal
/// are keyed by it.
pub trait Calendar {
    fn today(&self) -> NaiveDate;
}

/// The machine's local calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCalendar;

impl Calendar for LocalCalendar {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A calendar stuck on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedCalendar(pub NaiveDate);

impl Calendar for FixedCalendar {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
