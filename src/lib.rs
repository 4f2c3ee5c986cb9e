//! Month calendar with day-bound reminders kept in a flat text file.

pub mod calendar;
pub mod config;
