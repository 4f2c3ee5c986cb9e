//! One-line text form of a [`Reminder`].
//!
//! ```text
//! DateTime: 2024-03-05 02:30 PM, Event Type: Meeting, Priority: High, Reminder: Discuss roadmap, Location: Room 2
//! ```
//!
//! Free-text values escape `\`, CR, LF and the comma or colon of an embedded
//! `", "` / `": "` delimiter with a backslash, so any user text survives.
//! Other commas and colons (`10:30`, `a,b`) are written as is, and values
//! without special characters match older files byte for byte.

use super::datetime;
use super::error::{DecodeError, ValidationError};
use super::reminder::{Priority, Reminder};

const FIELD_SEP: &str = ", ";
const KEY_SEP: &str = ": ";

const DATE_TIME: &str = "DateTime";
const EVENT_TYPE: &str = "Event Type";
const PRIORITY: &str = "Priority";
const NOTE: &str = "Reminder";
const LOCATION: &str = "Location";

const FIELDS: [&str; 5] = [DATE_TIME, EVENT_TYPE, PRIORITY, NOTE, LOCATION];

pub fn encode(reminder: &Reminder) -> String {
    format!(
        "{DATE_TIME}: {}, {EVENT_TYPE}: {}, {PRIORITY}: {}, {NOTE}: {}, {LOCATION}: {}",
        datetime::format_timestamp(&reminder.date_time()),
        escape(reminder.event_type()),
        reminder.priority(),
        escape(reminder.note()),
        escape(reminder.location()),
    )
}

/// Parses one stored line. Fields must appear in the fixed order, each
/// exactly once; anything else fails the whole line.
pub fn decode(line: &str) -> Result<Reminder, DecodeError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let pieces = split_unescaped(line, FIELD_SEP);

    let mut values = [""; 5];
    for (i, expected) in FIELDS.into_iter().enumerate() {
        let piece = pieces
            .get(i)
            .ok_or(DecodeError::MissingField { expected })?;
        let (key, value) = split_key(piece)
            .ok_or_else(|| DecodeError::MissingSeparator(piece.to_string()))?;
        if key != expected {
            return Err(DecodeError::UnexpectedKey {
                expected,
                found: key.to_string(),
            });
        }
        values[i] = value;
    }
    if let Some(extra) = pieces.get(FIELDS.len()) {
        return Err(DecodeError::TrailingField(extra.to_string()));
    }

    let [date_time, event_type, priority, note, location] = values;
    let date_time = datetime::parse_canonical(date_time).map_err(invalid(DATE_TIME))?;
    let priority = priority.parse::<Priority>().map_err(invalid(PRIORITY))?;

    Reminder::new(
        date_time,
        unescape(event_type),
        priority,
        unescape(note),
        unescape(location),
    )
    .map_err(|source| {
        let field = match &source {
            ValidationError::EmptyField { field } => *field,
            _ => NOTE,
        };
        DecodeError::Invalid { field, source }
    })
}

fn invalid(field: &'static str) -> impl Fn(ValidationError) -> DecodeError {
    move |source| DecodeError::Invalid { field, source }
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ',' | ':' if chars.peek() == Some(&' ') => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

/// Reverses [`escape`]. Unknown escapes are kept verbatim.
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some(',') => out.push(','),
            Some(':') => out.push(':'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Splits on `sep` wherever it is not preceded by an escaping backslash.
fn split_unescaped<'a>(s: &'a str, sep: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut chars = s.char_indices();
    while let Some((i, ch)) = chars.next() {
        if ch == '\\' {
            // The escaped char may be multi-byte.
            chars.next();
        } else if s[i..].starts_with(sep) {
            pieces.push(&s[start..i]);
            start = i + sep.len();
            for _ in sep.chars().skip(1) {
                chars.next();
            }
        }
    }
    pieces.push(&s[start..]);
    pieces
}

fn split_key(piece: &str) -> Option<(&str, &str)> {
    let mut parts = split_unescaped(piece, KEY_SEP).into_iter();
    let key = parts.next()?;
    // Value is everything after the first separator.
    parts.next()?;
    Some((key, &piece[key.len() + KEY_SEP.len()..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LINE: &str = "DateTime: 2024-03-05 02:30 PM, Event Type: Meeting, Priority: High, Reminder: Discuss roadmap, Location: Room 2";

    fn reminder(event_type: &str, note: &str, location: &str) -> Reminder {
        Reminder::new(
            datetime::parse_canonical("2024-03-05 02:30 PM").unwrap(),
            event_type,
            Priority::High,
            note,
            location,
        )
        .unwrap()
    }

    #[test]
    fn encodes_plain_line() {
        let r = reminder("Meeting", "Discuss roadmap", "Room 2");
        assert_eq!(encode(&r), LINE);
    }

    #[test]
    fn decodes_plain_line() {
        let r = decode(LINE).unwrap();
        assert_eq!(r, reminder("Meeting", "Discuss roadmap", "Room 2"));
    }

    #[test]
    fn tolerates_crlf() {
        let line = format!("{LINE}\r");
        assert!(decode(&line).is_ok());
    }

    #[test]
    fn delimiters_in_text_survive() {
        let r = reminder("Call: Bob", "Bring a, b, and c\nthen leave", "C:\\Users, Floor 3");
        let line = encode(&r);
        assert!(!line.contains('\n'));
        assert_eq!(decode(&line).unwrap(), r);
    }

    #[test]
    fn legacy_backslash_is_kept() {
        let line = LINE.replace("Room 2", "Share \\files");
        let r = decode(&line).unwrap();
        assert_eq!(r.location(), "Share \\files");
    }

    #[test]
    fn backslash_before_multibyte_char_is_kept() {
        let line = LINE.replace("Room 2", r"Caf\é\, 2nd floor");
        assert_eq!(decode(&line).unwrap().location(), r"Caf\é, 2nd floor");

        let stray = LINE.replace("Discuss roadmap", r"\日本");
        assert_eq!(decode(&stray).unwrap().note(), r"\日本");
    }

    #[test]
    fn plain_colons_and_commas_stay_unescaped() {
        let r = reminder("Standup", "From 10:30 to 11:00, a,b,c", "C:\\Users");
        let line = encode(&r);
        assert!(line.ends_with("Reminder: From 10:30 to 11:00\\, a,b,c, Location: C:\\\\Users"));
        assert_eq!(decode(&line).unwrap(), r);

        let legacy = LINE.replace("Discuss roadmap", "Meet at 10\\:30");
        assert_eq!(decode(&legacy).unwrap().note(), "Meet at 10:30");
    }

    #[test]
    fn missing_field_fails() {
        let line = "DateTime: 2024-03-05 02:30 PM, Event Type: Meeting, Priority: High";
        assert_eq!(
            decode(line),
            Err(DecodeError::MissingField { expected: NOTE })
        );
    }

    #[test]
    fn out_of_order_field_fails() {
        let line = "Event Type: Meeting, DateTime: 2024-03-05 02:30 PM, Priority: High, Reminder: x, Location: y";
        assert!(matches!(
            decode(line),
            Err(DecodeError::UnexpectedKey { expected: DATE_TIME, .. })
        ));
    }

    #[test]
    fn trailing_field_fails() {
        let line = format!("{LINE}, Done: yes");
        assert_eq!(
            decode(&line),
            Err(DecodeError::TrailingField("Done: yes".into()))
        );
    }

    #[test]
    fn unescaped_legacy_comma_fails() {
        let line = LINE.replace("Discuss roadmap", "Discuss roadmap, budget");
        assert!(matches!(decode(&line), Err(DecodeError::MissingSeparator(_))));
    }

    #[test]
    fn bad_timestamp_fails() {
        let line = LINE.replace("2024-03-05", "2024-02-30");
        assert!(matches!(
            decode(&line),
            Err(DecodeError::Invalid { field: DATE_TIME, .. })
        ));
    }

    #[test]
    fn bad_priority_fails() {
        let line = LINE.replace("High", "Urgent");
        assert_eq!(
            decode(&line),
            Err(DecodeError::Invalid {
                field: PRIORITY,
                source: ValidationError::InvalidPriority("Urgent".into()),
            })
        );
    }

    #[test]
    fn empty_value_fails() {
        let line = LINE.replace("Room 2", "");
        assert!(matches!(
            decode(&line),
            Err(DecodeError::Invalid { field: LOCATION, .. })
        ));
    }

    #[test]
    fn garbage_fails() {
        assert!(decode("hello world").is_err());
        assert!(decode("").is_err());
    }

    fn free_text() -> impl Strategy<Value = String> {
        prop::collection::vec(any::<char>(), 1..24)
            .prop_map(String::from_iter)
            .prop_filter("must not be blank", |s| !s.trim().is_empty())
    }

    proptest! {
        #[test]
        fn any_text_round_trips(event in free_text(), note in free_text(), location in free_text()) {
            let r = reminder(&event, &note, &location);
            let line = encode(&r);
            prop_assert!(!line.contains('\n'));
            prop_assert_eq!(decode(&line).unwrap(), r);
        }
    }
}
