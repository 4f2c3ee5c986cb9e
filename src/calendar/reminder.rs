use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use super::datetime::{self, ClockTime};
use super::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Moderate,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Moderate, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Moderate => "Moderate",
            Priority::Low => "Low",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Priority::High => Priority::Moderate,
            Priority::Moderate => Priority::Low,
            Priority::Low => Priority::High,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidPriority(s.to_string()))
    }
}

/// A note bound to a day and time. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reminder {
    date_time: NaiveDateTime,
    event_type: String,
    priority: Priority,
    note: String,
    location: String,
}

impl Reminder {
    pub fn new(
        date_time: NaiveDateTime,
        event_type: impl Into<String>,
        priority: Priority,
        note: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let event_type = non_empty("Event Type", event_type.into())?;
        let note = non_empty("Reminder", note.into())?;
        let location = non_empty("Location", location.into())?;
        Ok(Self {
            date_time,
            event_type,
            priority,
            note,
            location,
        })
    }

    pub fn date_time(&self) -> NaiveDateTime {
        self.date_time
    }

    pub fn date(&self) -> NaiveDate {
        self.date_time.date()
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn time_display(&self) -> String {
        ClockTime::from_naive_time(self.date_time.time()).to_string()
    }
}

/// Raw field values collected by a form, before any checking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderDraft {
    pub event_type: String,
    pub priority: String,
    pub note: String,
    pub location: String,
    /// `hh:mm AM|PM`
    pub time: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ReminderDraft {
    pub fn on(date: NaiveDate) -> Self {
        use chrono::Datelike;

        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            ..Self::default()
        }
    }

    /// Checks fields in form order and stops at the first problem.
    pub fn validate(&self) -> Result<Reminder, ValidationError> {
        let event_type = non_empty("Event Type", self.event_type.clone())?;
        let priority = non_empty("Priority", self.priority.clone())?.parse::<Priority>()?;
        let note = non_empty("Reminder", self.note.clone())?;
        let location = non_empty("Location", self.location.clone())?;
        let time = ClockTime::parse(&non_empty("Time", self.time.clone())?)?;
        let date_time = datetime::compose_parts(self.year, self.month, self.day, time)?;

        Reminder::new(date_time, event_type, priority, note, location)
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField { field })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ReminderDraft {
        ReminderDraft {
            event_type: "Meeting".into(),
            priority: "High".into(),
            note: "Discuss roadmap".into(),
            location: "Room 2".into(),
            time: "02:30 PM".into(),
            year: 2024,
            month: 3,
            day: 5,
        }
    }

    #[test]
    fn valid_draft_builds_reminder() {
        let r = draft().validate().unwrap();
        assert_eq!(r.event_type(), "Meeting");
        assert_eq!(r.priority(), Priority::High);
        assert_eq!(r.note(), "Discuss roadmap");
        assert_eq!(r.location(), "Room 2");
        assert_eq!(r.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(r.time_display(), "02:30 PM");
    }

    #[test]
    fn reports_first_empty_field() {
        let mut d = draft();
        d.note = String::new();
        d.location = "   ".into();
        assert_eq!(
            d.validate(),
            Err(ValidationError::EmptyField { field: "Reminder" })
        );
    }

    #[test]
    fn rejects_unknown_priority() {
        let mut d = draft();
        d.priority = "Urgent".into();
        assert_eq!(
            d.validate(),
            Err(ValidationError::InvalidPriority("Urgent".into()))
        );
    }

    #[test]
    fn rejects_impossible_day() {
        let mut d = draft();
        d.month = 2;
        d.day = 30;
        assert!(matches!(
            d.validate(),
            Err(ValidationError::InvalidDate { day: 30, .. })
        ));
    }

    #[test]
    fn rejects_bad_time() {
        let mut d = draft();
        d.time = "13:00 PM".into();
        assert!(matches!(d.validate(), Err(ValidationError::InvalidTime { .. })));
    }

    #[test]
    fn priority_cycles_through_all() {
        assert_eq!(Priority::High.next(), Priority::Moderate);
        assert_eq!(Priority::Low.next(), Priority::High);
        assert_eq!("Moderate".parse::<Priority>(), Ok(Priority::Moderate));
        assert!("high".parse::<Priority>().is_err());
    }
}
