//! Strict timestamp handling.
//!
//! Reminders are stored with a canonical `YYYY-MM-DD hh:mm AM|PM` stamp.
//! Parsing is exact: the shape must match byte for byte and the date and
//! clock values must exist. Nothing is rolled over (Feb 30 is an error, not
//! March 1).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::error::ValidationError;

const CANONICAL_FORMAT: &str = "%Y-%m-%d %I:%M %p";
const DISPLAY_FORMAT: &str = "%B %d, %Y at %I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Meridiem::Am => Meridiem::Pm,
            Meridiem::Pm => Meridiem::Am,
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Meridiem {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AM" => Ok(Meridiem::Am),
            "PM" => Ok(Meridiem::Pm),
            other => Err(ValidationError::InvalidMeridiem(other.to_string())),
        }
    }
}

/// A 12-hour clock reading, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockTime {
    hour: u32,
    minute: u32,
    meridiem: Meridiem,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32, meridiem: Meridiem) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&hour) || minute > 59 {
            return Err(ValidationError::InvalidTime { hour, minute });
        }
        Ok(Self {
            hour,
            minute,
            meridiem,
        })
    }

    /// Parses `hh:mm AM|PM`, zero padded.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedTime(s.to_string());
        let b = s.as_bytes();
        if b.len() != 8 || !s.is_ascii() || b[2] != b':' || b[5] != b' ' {
            return Err(malformed());
        }
        let hour = digits(&s[0..2]).ok_or_else(malformed)?;
        let minute = digits(&s[3..5]).ok_or_else(malformed)?;
        let meridiem = s[6..8].parse::<Meridiem>()?;
        Self::new(hour, minute, meridiem)
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        let (pm, hour) = time.hour12();
        Self {
            hour,
            minute: time.minute(),
            meridiem: if pm { Meridiem::Pm } else { Meridiem::Am },
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn meridiem(&self) -> Meridiem {
        self.meridiem
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        let hour24 = match (self.meridiem, self.hour) {
            (Meridiem::Am, 12) => 0,
            (Meridiem::Am, h) => h,
            (Meridiem::Pm, 12) => 12,
            (Meridiem::Pm, h) => h + 12,
        };
        NaiveTime::from_hms_opt(hour24, self.minute, 0).expect("hour and minute checked in ClockTime::new")
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02} {}", self.hour, self.minute, self.meridiem)
    }
}

pub fn compose(date: NaiveDate, time: ClockTime) -> NaiveDateTime {
    date.and_time(time.to_naive_time())
}

pub fn compose_parts(
    year: i32,
    month: u32,
    day: u32,
    time: ClockTime,
) -> Result<NaiveDateTime, ValidationError> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .filter(|_| year >= 1)
        .ok_or(ValidationError::InvalidDate { year, month, day })?;
    Ok(compose(date, time))
}

/// Renders `date` and a 12-hour clock reading as a canonical stamp.
pub fn format_canonical(
    date: NaiveDate,
    hour: u32,
    minute: u32,
    meridiem: Meridiem,
) -> Result<String, ValidationError> {
    let time = ClockTime::new(hour, minute, meridiem)?;
    Ok(format_timestamp(&compose(date, time)))
}

pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(CANONICAL_FORMAT).to_string()
}

/// Strict inverse of [`format_timestamp`].
pub fn parse_canonical(s: &str) -> Result<NaiveDateTime, ValidationError> {
    let malformed = || ValidationError::MalformedTimestamp(s.to_string());
    let b = s.as_bytes();
    if b.len() != 19 || !s.is_ascii() || b[4] != b'-' || b[7] != b'-' || b[10] != b' ' {
        return Err(malformed());
    }

    let year = digits(&s[0..4]).ok_or_else(malformed)? as i32;
    let month = digits(&s[5..7]).ok_or_else(malformed)?;
    let day = digits(&s[8..10]).ok_or_else(malformed)?;
    let time = ClockTime::parse(&s[11..])?;

    compose_parts(year, month, day, time)
}

/// Long form for the detail popup, e.g. `March 05, 2024 at 02:30 PM`.
pub fn format_display(dt: &NaiveDateTime) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}

fn digits(s: &str) -> Option<u32> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn formats_canonical_stamp() {
        let s = format_canonical(date(2024, 3, 5), 2, 30, Meridiem::Pm).unwrap();
        assert_eq!(s, "2024-03-05 02:30 PM");

        let s = format_canonical(date(2024, 3, 5), 12, 0, Meridiem::Am).unwrap();
        assert_eq!(s, "2024-03-05 12:00 AM");
    }

    #[test]
    fn parses_canonical_stamp() {
        let dt = parse_canonical("2024-03-05 02:30 PM").unwrap();
        assert_eq!(dt, date(2024, 3, 5).and_hms_opt(14, 30, 0).unwrap());

        let midnight = parse_canonical("2024-03-05 12:15 AM").unwrap();
        assert_eq!(midnight, date(2024, 3, 5).and_hms_opt(0, 15, 0).unwrap());

        let noon = parse_canonical("2024-03-05 12:15 PM").unwrap();
        assert_eq!(noon, date(2024, 3, 5).and_hms_opt(12, 15, 0).unwrap());
    }

    #[test]
    fn rejects_impossible_date() {
        assert_eq!(
            parse_canonical("2024-02-30 10:00 AM"),
            Err(ValidationError::InvalidDate {
                year: 2024,
                month: 2,
                day: 30
            })
        );
        assert!(parse_canonical("2023-02-29 10:00 AM").is_err());
        assert!(parse_canonical("2024-02-29 10:00 AM").is_ok());
        assert!(parse_canonical("0000-01-01 10:00 AM").is_err());
    }

    #[test]
    fn rejects_impossible_time() {
        assert_eq!(
            parse_canonical("2024-01-15 13:30 PM"),
            Err(ValidationError::InvalidTime {
                hour: 13,
                minute: 30
            })
        );
        assert!(parse_canonical("2024-01-15 00:30 AM").is_err());
        assert!(parse_canonical("2024-01-15 11:60 AM").is_err());
    }

    #[test]
    fn rejects_loose_shapes() {
        for s in [
            "2024-3-05 02:30 PM",
            "2024-03-05 2:30 PM",
            "2024-03-05 02:30 pm",
            "2024-03-05 02:30PM",
            "2024-03-05T02:30 PM",
            "2024-03-05 02:30 PM ",
            "+024-03-05 02:30 PM",
            "",
        ] {
            assert!(parse_canonical(s).is_err(), "{s:?} should be rejected");
        }
    }

    #[test]
    fn error_carries_offending_text() {
        let err = parse_canonical("yesterday").unwrap_err();
        assert_eq!(err, ValidationError::MalformedTimestamp("yesterday".to_string()));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn clock_time_parse_and_display() {
        let t = ClockTime::parse("02:30 PM").unwrap();
        assert_eq!((t.hour(), t.minute(), t.meridiem()), (2, 30, Meridiem::Pm));
        assert_eq!(t.to_string(), "02:30 PM");
        assert!(ClockTime::parse("02:30 XM").is_err());
        assert!(ClockTime::parse("14:30 PM").is_err());
    }

    #[test]
    fn clock_time_from_naive_time() {
        let t = ClockTime::from_naive_time(NaiveTime::from_hms_opt(0, 5, 0).unwrap());
        assert_eq!(t.to_string(), "12:05 AM");
        let t = ClockTime::from_naive_time(NaiveTime::from_hms_opt(23, 59, 0).unwrap());
        assert_eq!(t.to_string(), "11:59 PM");
    }

    #[test]
    fn display_format() {
        let dt = parse_canonical("2024-03-05 02:30 PM").unwrap();
        assert_eq!(format_display(&dt), "March 05, 2024 at 02:30 PM");
    }

    #[test]
    fn canonical_survives_reparse() {
        let dt = parse_canonical("1999-12-31 11:59 PM").unwrap();
        assert_eq!(format_timestamp(&dt), "1999-12-31 11:59 PM");
    }
}
