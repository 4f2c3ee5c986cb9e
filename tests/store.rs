//! File-backed reminder store behaviour.

use std::fs;

use reminder_calendar::calendar::codec;
use reminder_calendar::calendar::datetime::format_display;
use reminder_calendar::calendar::{
    BackgroundWriter, DecodeError, Priority, ReminderDraft, ReminderStore, StoreError,
    ValidationError, YearMonth,
};
use tempfile::TempDir;

const GOOD: &str = "DateTime: 2024-03-05 02:30 PM, Event Type: Meeting, Priority: High, Reminder: Discuss roadmap, Location: Room 2";

fn meeting() -> ReminderDraft {
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

fn line_count(path: &std::path::Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count()
}

#[test]
fn open_creates_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("reminders.txt");

    let store = ReminderStore::open(&path).unwrap();

    assert!(store.is_empty());
    assert!(path.exists());
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn add_persists_decodable_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let mut store = ReminderStore::open(&path).unwrap();

    let added = store.add(&meeting()).unwrap().clone();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, format!("{GOOD}\n"));

    let decoded = codec::decode(contents.lines().next().unwrap()).unwrap();
    assert_eq!(decoded, added);
    assert_eq!(decoded.event_type(), "Meeting");
    assert_eq!(decoded.priority(), Priority::High);
    assert_eq!(decoded.note(), "Discuss roadmap");
    assert_eq!(decoded.location(), "Room 2");
    assert_eq!(format_display(&decoded.date_time()), "March 05, 2024 at 02:30 PM");
}

#[test]
fn add_rejects_invalid_draft_without_touching_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let mut store = ReminderStore::open(&path).unwrap();
    store.add(&meeting()).unwrap();

    let mut draft = meeting();
    draft.location.clear();
    let err = store.add(&draft).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyField { field: "Location" })
    ));
    assert_eq!(store.len(), 1);
    assert_eq!(line_count(&path), 1);
}

#[test]
fn reopen_preserves_order_and_duplicates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let mut store = ReminderStore::open(&path).unwrap();

    let mut lunch = meeting();
    lunch.event_type = "Lunch".into();
    lunch.time = "12:00 PM".into();
    store.add(&meeting()).unwrap();
    store.add(&lunch).unwrap();
    store.add(&meeting()).unwrap();

    let reopened = ReminderStore::open(&path).unwrap();
    let kinds: Vec<&str> = reopened.reminders().iter().map(|r| r.event_type()).collect();
    assert_eq!(kinds, vec!["Meeting", "Lunch", "Meeting"]);
    assert_eq!(reopened.reminders(), store.reminders());
}

#[test]
fn remove_drops_exactly_one_match() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let mut store = ReminderStore::open(&path).unwrap();
    store.add(&meeting()).unwrap();
    store.add(&meeting()).unwrap();
    assert_eq!(line_count(&path), 2);

    let target = store.reminders()[0].clone();
    let removed = store.remove(&target).unwrap();

    assert_eq!(removed, Some(target));
    assert_eq!(store.len(), 1);
    assert_eq!(line_count(&path), 1);
}

#[test]
fn remove_missing_reminder_is_noop() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let mut store = ReminderStore::open(&path).unwrap();
    let stray = meeting().validate().unwrap();

    assert_eq!(store.remove(&stray).unwrap(), None);
    assert!(store.is_empty());
}

#[test]
fn malformed_line_is_skipped_and_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let bad = GOOD.replace("2024-03-05", "2024-02-30");
    fs::write(&path, format!("{GOOD}\r\n{bad}\r\n\nnot a reminder\n")).unwrap();

    let store = ReminderStore::open(&path).unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.skipped().len(), 2);
    let skipped = &store.skipped()[0];
    assert_eq!(skipped.line_no, 2);
    assert!(matches!(skipped.error, DecodeError::Invalid { field: "DateTime", .. }));
    assert_eq!(store.skipped()[1].line_no, 4);
}

#[test]
fn invalid_utf8_line_is_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let mut bytes = format!("{GOOD}\n").into_bytes();
    bytes.extend_from_slice(b"DateTime: \xff\xfe broken\n");
    bytes.extend_from_slice(format!("{GOOD}\n").as_bytes());
    fs::write(&path, &bytes).unwrap();

    let store = ReminderStore::open(&path).unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.skipped().len(), 1);
    let skipped = &store.skipped()[0];
    assert_eq!(skipped.line_no, 2);
    assert_eq!(skipped.error, DecodeError::NotUtf8 { valid_up_to: 10 });
    assert!(skipped.line.starts_with("DateTime: \u{fffd}"));
}

#[test]
fn backslash_before_non_ascii_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let odd = GOOD.replace("Room 2", r"Caf\é");
    fs::write(&path, format!("{GOOD}\n{odd}\n")).unwrap();

    let store = ReminderStore::open(&path).unwrap();

    assert_eq!(store.len(), 2);
    assert!(store.skipped().is_empty());
    assert_eq!(store.reminders()[1].location(), r"Caf\é");
}

#[test]
fn unloaded_store_never_overwrites_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let archive = dir.path().join("reminders.done.txt");
    let original = format!("{GOOD}\n{GOOD}\n");
    fs::write(&path, &original).unwrap();

    let mut store = ReminderStore::empty(&path).with_archive(&archive);
    assert!(!store.is_loaded());

    let err = store.add(&meeting()).unwrap_err();
    assert!(matches!(err, StoreError::NotLoaded(_)));
    // Kept in memory for the session.
    assert_eq!(store.len(), 1);

    let added = store.reminders()[0].clone();
    assert!(matches!(store.complete(&added), Err(StoreError::NotLoaded(_))));
    assert!(matches!(store.persist(), Err(StoreError::NotLoaded(_))));

    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert!(!archive.exists());
}

#[test]
fn complete_archives_then_removes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let archive = dir.path().join("reminders.done.txt");
    let mut store = ReminderStore::open(&path).unwrap().with_archive(&archive);
    store.add(&meeting()).unwrap();

    let target = store.reminders()[0].clone();
    store.complete(&target).unwrap();

    assert!(store.is_empty());
    assert_eq!(line_count(&path), 0);
    assert_eq!(fs::read_to_string(&archive).unwrap(), format!("{GOOD}\n"));
}

#[test]
fn complete_without_archive_behaves_like_remove() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let mut store = ReminderStore::open(&path).unwrap();
    store.add(&meeting()).unwrap();

    let target = store.reminders()[0].clone();
    assert_eq!(store.complete(&target).unwrap(), Some(target));
    assert!(store.is_empty());
}

#[test]
fn days_with_reminders_are_limited_to_month() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let mut store = ReminderStore::open(&path).unwrap();
    let mut april = meeting();
    april.month = 4;
    april.day = 1;
    store.add(&meeting()).unwrap();
    store.add(&april).unwrap();

    let march = YearMonth::new(2024, 3).unwrap();
    assert_eq!(store.days_with_reminders(march).into_iter().collect::<Vec<_>>(), vec![5]);
    assert_eq!(store.on_date(march.with_day_clamped(5)).count(), 1);
}

#[test]
fn no_temp_file_left_behind() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let mut store = ReminderStore::open(&path).unwrap();
    store.add(&meeting()).unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("reminders.txt")]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn background_writer_persists_every_mutation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reminders.txt");
    let writer = BackgroundWriter::spawn(&tokio::runtime::Handle::current(), &path);
    let mut store = ReminderStore::open(&path).unwrap().with_writer(writer);

    store.add(&meeting()).unwrap();
    store.add(&meeting()).unwrap();
    let first = store.reminders()[0].clone();
    store.remove(&first).unwrap();
    store.flush().await.unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), format!("{GOOD}\n"));
}
