//! Month layout engine.
//!
//! Turns a (year, month) pair into the fixed six-week grid the month view
//! draws. Nothing here touches the reminder store or the terminal.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};

use super::error::ValidationError;

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const GRID_ROWS: usize = 6;
pub const GRID_COLS: usize = 7;

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS_IN_MONTH[(month - 1) as usize]
    }
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown")
}

/// A validated calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::MonthOutOfRange(month));
        }
        if year < 1 || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ValidationError::YearOutOfRange(year));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated in YearMonth::new")
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    /// The following month, carrying into the next year after December.
    pub fn succ_opt(&self) -> Option<Self> {
        let (year, month) = if self.month == 12 {
            (self.year.checked_add(1)?, 1)
        } else {
            (self.year, self.month + 1)
        };
        Self::new(year, month).ok()
    }

    /// The preceding month, borrowing from the previous year before January.
    pub fn pred_opt(&self) -> Option<Self> {
        let (year, month) = if self.month == 1 {
            (self.year - 1, 12)
        } else {
            (self.year, self.month - 1)
        };
        Self::new(year, month).ok()
    }

    /// `day` of this month, clamped to the month length.
    pub fn with_day_clamped(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days());
        NaiveDate::from_ymd_opt(self.year, self.month, day).expect("day clamped to month length")
    }

    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    /// Advisory flag for styling; the engine never reads it back.
    pub is_today: bool,
}

/// Six data rows of seven weekday columns, Sunday first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: YearMonth,
    first_weekday: u32,
    days_in_month: u32,
    cells: [[Option<DayCell>; GRID_COLS]; GRID_ROWS],
}

impl MonthGrid {
    pub fn month(&self) -> YearMonth {
        self.month
    }

    /// Column of day 1, 0 = Sunday.
    pub fn first_weekday(&self) -> u32 {
        self.first_weekday
    }

    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    pub fn rows(&self) -> &[[Option<DayCell>; GRID_COLS]; GRID_ROWS] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<DayCell> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    pub fn day_cells(&self) -> impl Iterator<Item = DayCell> + '_ {
        self.cells.iter().flatten().filter_map(|c| *c)
    }

    pub fn padding_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_none()).count()
    }

    pub fn position_of(&self, day: u32) -> Option<(usize, usize)> {
        if day == 0 || day > self.days_in_month {
            return None;
        }
        let index = (self.first_weekday + day - 1) as usize;
        Some((index / GRID_COLS, index % GRID_COLS))
    }

    /// Number of rows that hold at least one day.
    pub fn used_rows(&self) -> usize {
        self.cells
            .iter()
            .filter(|row| row.iter().any(Option::is_some))
            .count()
    }
}

/// Lays out `month`, flagging the cell that equals `today`.
pub fn compute_grid(month: YearMonth, today: NaiveDate) -> MonthGrid {
    let first_weekday = month.first_day().weekday().num_days_from_sunday();
    let days = month.days();
    let today_day = (YearMonth::of(today) == month).then(|| today.day());

    let mut cells = [[None; GRID_COLS]; GRID_ROWS];
    for day in 1..=days {
        let index = (first_weekday + day - 1) as usize;
        cells[index / GRID_COLS][index % GRID_COLS] = Some(DayCell {
            day,
            is_today: today_day == Some(day),
        });
    }

    MonthGrid {
        month,
        first_weekday,
        days_in_month: days,
        cells,
    }
}

pub fn compute_grid_today(month: YearMonth) -> MonthGrid {
    compute_grid(month, Local::now().date_naive())
}
