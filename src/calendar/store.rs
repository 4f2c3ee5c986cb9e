use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

use super::codec;
use super::error::{DecodeError, StoreError};
use super::grid::YearMonth;
use super::reminder::{Reminder, ReminderDraft};
use super::writer::{BackgroundWriter, WriteOutcome};

/// A stored line that was skipped while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line_no: usize,
    pub line: String,
    pub error: DecodeError,
}

/// Owns the reminder collection and the flat file behind it.
///
/// Every mutation rewrites the whole file, either inline or through an
/// attached [`BackgroundWriter`].
pub struct ReminderStore {
    path: PathBuf,
    archive: Option<PathBuf>,
    reminders: Vec<Reminder>,
    skipped: Vec<LineError>,
    writer: Option<BackgroundWriter>,
    /// False for [`Self::empty`]: the file on disk was never read.
    loaded: bool,
}

impl ReminderStore {
    /// Loads `path`, creating it (and its directory) when missing.
    ///
    /// Lines that fail to decode are logged and kept in [`Self::skipped`];
    /// they never abort the load.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| StoreError::io(&path, e))?;
        }

        let mut contents = Vec::new();
        OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .and_then(|mut file| file.read_to_end(&mut contents))
            .map_err(|e| StoreError::io(&path, e))?;

        let mut reminders = Vec::new();
        let mut skipped = Vec::new();
        // Lines are checked for UTF-8 one by one so a bad byte only costs its line.
        for (index, raw) in contents.split(|b| *b == b'\n').enumerate() {
            let decoded = std::str::from_utf8(raw)
                .map_err(|e| DecodeError::NotUtf8 {
                    valid_up_to: e.valid_up_to(),
                })
                .and_then(|line| {
                    if line.trim().is_empty() {
                        Ok(None)
                    } else {
                        codec::decode(line).map(Some)
                    }
                });
            match decoded {
                Ok(Some(reminder)) => reminders.push(reminder),
                Ok(None) => {}
                Err(error) => {
                    log::warn!("{}:{}: skipping reminder: {}", path.display(), index + 1, error);
                    skipped.push(LineError {
                        line_no: index + 1,
                        line: String::from_utf8_lossy(raw).into_owned(),
                        error,
                    });
                }
            }
        }

        log::info!(
            "loaded {} reminders from {} ({} skipped)",
            reminders.len(),
            path.display(),
            skipped.len()
        );

        Ok(Self {
            path,
            archive: None,
            reminders,
            skipped,
            writer: None,
            loaded: true,
        })
    }

    /// An empty collection bound to `path`, for when [`Self::open`] failed.
    ///
    /// The file was never read, so it is never written either: every
    /// mutation stays in memory and `persist` returns
    /// [`StoreError::NotLoaded`].
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            archive: None,
            reminders: Vec::new(),
            skipped: Vec::new(),
            writer: None,
            loaded: false,
        }
    }

    /// Whether changes reach the file on disk.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Completed reminders are appended to `archive` instead of dropped.
    pub fn with_archive(mut self, archive: impl Into<PathBuf>) -> Self {
        self.archive = Some(archive.into());
        self
    }

    /// Hands all further writes to `writer`.
    pub fn with_writer(mut self, writer: BackgroundWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn archive_path(&self) -> Option<&Path> {
        self.archive.as_deref()
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    pub fn skipped(&self) -> &[LineError] {
        &self.skipped
    }

    pub fn on_date(&self, date: NaiveDate) -> impl Iterator<Item = &Reminder> + '_ {
        self.reminders.iter().filter(move |r| r.date() == date)
    }

    /// Day numbers in `month` that have at least one reminder.
    pub fn days_with_reminders(&self, month: YearMonth) -> BTreeSet<u32> {
        self.reminders
            .iter()
            .map(Reminder::date)
            .filter(|d| YearMonth::of(*d) == month)
            .map(|d| d.day())
            .collect()
    }

    /// Validates `draft`, appends it and persists.
    ///
    /// When the write fails the reminder stays in memory and goes out with
    /// the next successful write.
    pub fn add(&mut self, draft: &ReminderDraft) -> Result<&Reminder, StoreError> {
        let reminder = draft.validate()?;
        log::info!("adding {} reminder on {}", reminder.event_type(), reminder.date());
        self.reminders.push(reminder);
        self.persist()?;
        Ok(&self.reminders[self.reminders.len() - 1])
    }

    /// Removes the first reminder equal to `reminder` and persists.
    pub fn remove(&mut self, reminder: &Reminder) -> Result<Option<Reminder>, StoreError> {
        let Some(index) = self.position(reminder) else {
            return Ok(None);
        };
        let removed = self.reminders.remove(index);
        self.persist()?;
        Ok(Some(removed))
    }

    /// Like [`Self::remove`], but first appends the reminder to the archive
    /// file when one is configured.
    pub fn complete(&mut self, reminder: &Reminder) -> Result<Option<Reminder>, StoreError> {
        if self.position(reminder).is_none() {
            return Ok(None);
        }
        if !self.loaded {
            return Err(StoreError::NotLoaded(self.path.clone()));
        }
        if let Some(archive) = &self.archive {
            append_line(archive, &codec::encode(reminder))?;
            log::info!("archived {} reminder to {}", reminder.event_type(), archive.display());
        }
        self.remove(reminder)
    }

    /// Rewrites the whole file from the in-memory collection.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        if !self.loaded {
            return Err(StoreError::NotLoaded(self.path.clone()));
        }
        let contents = self.encode_all();
        match &mut self.writer {
            Some(writer) => writer.submit(contents).map(|_| ()),
            None => write_atomic(&self.path, &contents),
        }
    }

    /// Next finished background write, if any.
    pub fn poll_write(&mut self) -> Option<WriteOutcome> {
        self.writer.as_mut()?.try_outcome()
    }

    /// Waits for queued background writes. Must not be called from inside
    /// the runtime the writer runs on.
    pub fn flush_blocking(&mut self) -> Result<(), StoreError> {
        match &mut self.writer {
            Some(writer) => writer.flush_blocking(),
            None => Ok(()),
        }
    }

    pub async fn flush(&mut self) -> Result<(), StoreError> {
        match &mut self.writer {
            Some(writer) => writer.flush().await,
            None => Ok(()),
        }
    }

    fn position(&self, reminder: &Reminder) -> Option<usize> {
        self.reminders.iter().position(|r| r == reminder)
    }

    fn encode_all(&self) -> String {
        let mut out = String::new();
        for reminder in &self.reminders {
            out.push_str(&codec::encode(reminder));
            out.push('\n');
        }
        out
    }
}

pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("reminders"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `contents` next to `path` and renames it into place.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    let tmp = temp_path(path);
    fs::write(&tmp, contents).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;
    log::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

fn append_line(path: &Path, line: &str) -> Result<(), StoreError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| StoreError::io(path, e))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| writeln!(file, "{line}"))
        .map_err(|e| StoreError::io(path, e))
}
