pub mod codec;
pub mod datetime;
pub mod error;
pub mod grid;
pub mod reminder;
pub mod store;
pub mod writer;

pub use error::{DecodeError, StoreError, ValidationError};
pub use grid::{compute_grid, compute_grid_today, DayCell, MonthGrid, YearMonth};
pub use reminder::{Priority, Reminder, ReminderDraft};
pub use store::{LineError, ReminderStore};
pub use writer::{BackgroundWriter, WriteOutcome};
