use std::path::PathBuf;

use thiserror::Error;

/// A user-supplied value that failed strict checking.
///
/// Every variant carries the offending text so the host can tell the user
/// exactly what to fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("invalid time {hour:02}:{minute:02} (hour must be 1-12, minute 0-59)")]
    InvalidTime { hour: u32, minute: u32 },
    #[error("invalid time {0:?}, expected hh:mm AM|PM")]
    MalformedTime(String),
    #[error("invalid timestamp {0:?}, expected YYYY-MM-DD hh:mm AM|PM")]
    MalformedTimestamp(String),
    #[error("invalid meridiem {0:?}, expected AM or PM")]
    InvalidMeridiem(String),
    #[error("invalid priority {0:?}, expected High, Moderate or Low")]
    InvalidPriority(String),
    #[error("month {0} out of range 1-12")]
    MonthOutOfRange(u32),
    #[error("year {0} out of range")]
    YearOutOfRange(i32),
}

/// A persisted line that could not be turned back into a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing field {expected:?}")]
    MissingField { expected: &'static str },
    #[error("expected field {expected:?}, found {found:?}")]
    UnexpectedKey { expected: &'static str, found: String },
    #[error("field without key: {0:?}")]
    MissingSeparator(String),
    #[error("unexpected trailing field {0:?}")]
    TrailingField(String),
    #[error("line is not valid UTF-8 (bad byte at offset {valid_up_to})")]
    NotUtf8 { valid_up_to: usize },
    #[error("field {field:?}: {source}")]
    Invalid {
        field: &'static str,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("reminder file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("background writer has shut down")]
    WriterClosed,
    #[error("reminder file {} was not loaded; refusing to overwrite it", .0.display())]
    NotLoaded(PathBuf),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
