//! Calendar bucketing.
//!
//! A `MonthGrid` covers whole weeks: it starts on the Sunday on or before the 1st of the month
//! and ends on the Saturday on or after the last day of the month, so it may include days from
//! the neighboring months. Every day in the grid gets a `DayCell` holding that day's
//! transactions and their signed total.

use crate::dashboard;
use crate::model::Transaction;
use chrono::{Datelike, Duration, Local, Months, NaiveDate, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use tracing::{trace, warn};

/// The first column of every calendar row. Fixed; the week arithmetic below assumes it.
pub const WEEK_START: Weekday = Weekday::Sun;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One day of the calendar grid.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub transactions: Vec<Transaction>,
    /// Credits minus debits for this day.
    pub daily_total: Decimal,
    /// False for the leading and trailing days borrowed from adjacent months.
    pub is_current_month: bool,
    pub is_today: bool,
}

impl DayCell {
    /// The small total tag shown in a cell: the whole-unit absolute value, with a `+` when the
    /// day is strictly positive. Days without transactions have no tag.
    pub fn total_tag(&self) -> Option<String> {
        if self.transactions.is_empty() {
            return None;
        }
        let whole = self
            .daily_total
            .abs()
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        if self.daily_total > Decimal::ZERO {
            Some(format!("+{whole}"))
        } else {
            Some(whole.to_string())
        }
    }
}

/// The cells of one month view, in chronological order, always a whole number of weeks.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MonthGrid {
    /// The first day of the month being viewed.
    month: NaiveDate,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Builds the grid for the month containing `reference`.
    ///
    /// Transactions whose date cannot be parsed are left out of every cell and logged.
    pub fn build(reference: NaiveDate, transactions: &[Transaction], today: NaiveDate) -> Self {
        let month = first_of_month(reference);
        let start = start_of_week(month);
        let end = end_of_week(last_of_month(month));
        trace!("Building calendar for {month} from {start} through {end}");

        let mut by_day = group_by_day(transactions);
        let mut cells = Vec::new();
        for date in start.iter_days().take_while(|d| *d <= end) {
            let transactions = by_day.remove(&date).unwrap_or_default();
            let daily_total = transactions
                .iter()
                .map(Transaction::signed_amount)
                .fold(Decimal::ZERO, dashboard::add);
            cells.push(DayCell {
                date,
                transactions,
                daily_total,
                is_current_month: date.year() == month.year() && date.month() == month.month(),
                is_today: date == today,
            });
        }
        Self { month, cells }
    }

    /// Builds the grid using the local clock for `is_today`.
    pub fn build_today(reference: NaiveDate, transactions: &[Transaction]) -> Self {
        Self::build(reference, transactions, today())
    }

    /// The first day of the month being viewed.
    pub fn month(&self) -> NaiveDate {
        self.month
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    /// The grid split into rows of exactly seven days.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    /// The cell for `date`, if it is part of the grid.
    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells.iter().find(|c| c.date == date)
    }

    /// A heading such as `March 2024`.
    pub fn title(&self) -> String {
        self.month.format("%B %Y").to_string()
    }
}

impl Display for MonthGrid {
    /// Renders the grid as a plain text table. Days outside the month are bracketed and today is
    /// marked with `*`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title())?;
        let header: Vec<String> = DAY_NAMES.iter().map(|d| format!("{d:<9}")).collect();
        writeln!(f, "{}", header.join("").trim_end())?;
        for week in self.weeks() {
            let mut line = String::new();
            for cell in week {
                let day = cell.date.day();
                let mut label = if cell.is_current_month {
                    format!("{day}")
                } else {
                    format!("({day})")
                };
                if cell.is_today {
                    label.push('*');
                }
                if let Some(tag) = cell.total_tag() {
                    label.push(' ');
                    label.push_str(&tag);
                }
                line.push_str(&format!("{label:<9}"));
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// Keeps track of which month the calendar is showing.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MonthCursor {
    reference: NaiveDate,
}

impl MonthCursor {
    pub fn new(reference: NaiveDate) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    /// Moves forward one month and returns the new reference date.
    pub fn advance(&mut self) -> NaiveDate {
        self.reference = next_month(self.reference);
        self.reference
    }

    /// Moves back one month and returns the new reference date.
    pub fn retreat(&mut self) -> NaiveDate {
        self.reference = previous_month(self.reference);
        self.reference
    }

    /// Moves by `months`, forward when positive and backward when negative, as if `advance` or
    /// `retreat` had been called that many times. If the destination is outside the supported
    /// calendar the cursor stays where it is.
    pub fn shift(&mut self, months: i32) -> NaiveDate {
        let count = Months::new(months.unsigned_abs());
        let destination = if months >= 0 {
            self.reference.checked_add_months(count)
        } else {
            self.reference.checked_sub_months(count)
        };
        if destination.is_none() {
            warn!(
                "Cannot move {months} months from {}, the result is outside the supported calendar",
                self.reference
            );
            return self.reference;
        }

        // Stepping one month at a time carries the end-of-month clamping along (Mar 31 -> Apr 30
        // -> May 30), the same as repeated `advance` calls.
        let one = Months::new(1);
        for _ in 0..months.unsigned_abs() {
            let step = if months > 0 {
                self.reference.checked_add_months(one)
            } else {
                self.reference.checked_sub_months(one)
            };
            let Some(next) = step else { break };
            self.reference = next;
        }
        self.reference
    }

    pub fn grid(&self, transactions: &[Transaction], today: NaiveDate) -> MonthGrid {
        MonthGrid::build(self.reference, transactions, today)
    }
}

impl Default for MonthCursor {
    fn default() -> Self {
        Self::new(today())
    }
}

/// The same day one month later, clamped to the length of that month (Jan 31 -> Feb 29/28).
pub fn next_month(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(1)).unwrap_or_else(|| {
        warn!("Cannot move past {date}, the end of the supported calendar");
        date
    })
}

/// The same day one month earlier, clamped to the length of that month (Mar 31 -> Feb 29/28).
pub fn previous_month(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(1)).unwrap_or_else(|| {
        warn!("Cannot move before {date}, the start of the supported calendar");
        date
    })
}

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn last_of_month(first: NaiveDate) -> NaiveDate {
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next - Duration::days(1),
        // Only December of the last representable year gets here.
        None => NaiveDate::from_ymd_opt(first.year(), 12, 31).unwrap_or(first),
    }
}

fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday();
    date.checked_sub_signed(Duration::days(i64::from(offset)))
        .unwrap_or(date)
}

fn end_of_week(date: NaiveDate) -> NaiveDate {
    let offset = 6 - date.weekday().num_days_from_sunday();
    date.checked_add_signed(Duration::days(i64::from(offset)))
        .unwrap_or(date)
}

fn group_by_day(transactions: &[Transaction]) -> BTreeMap<NaiveDate, Vec<Transaction>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<Transaction>> = BTreeMap::new();
    for t in transactions {
        match t.day() {
            Some(day) => by_day.entry(day).or_default().push(t.clone()),
            None => warn!(
                "Transaction {} has an unreadable date '{}' and will not appear on the calendar",
                t.id, t.date
            ),
        }
    }
    by_day
}
