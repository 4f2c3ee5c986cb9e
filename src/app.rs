use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, Local, NaiveDate};
use reminder_calendar::calendar::{
    compute_grid, MonthGrid, Reminder, ReminderStore, StoreError, YearMonth,
};

use crate::components::reminder_form::ReminderFormState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Month,
    Reminders,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Form,
}

pub struct App {
    pub running: bool,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub grid: MonthGrid,
    pub days_with_reminders: BTreeSet<u32>,
    /// Cursor in the list of the current view.
    pub list_index: usize,
    /// Checked rows of the current view.
    pub checked: HashSet<usize>,
    pub form_state: Option<ReminderFormState>,
    pub detail_item: Option<Reminder>,
    pub show_help: bool,
    pub status_message: Option<String>,
    store: ReminderStore,
}

impl App {
    pub fn new(store: ReminderStore) -> Self {
        Self::with_today(store, Local::now().date_naive())
    }

    pub fn with_today(store: ReminderStore, today: NaiveDate) -> Self {
        let month = YearMonth::of(today);
        let mut app = Self {
            running: true,
            view_mode: ViewMode::Month,
            input_mode: InputMode::Normal,
            selected_date: today,
            today,
            grid: compute_grid(month, today),
            days_with_reminders: BTreeSet::new(),
            list_index: 0,
            checked: HashSet::new(),
            form_state: None,
            detail_item: None,
            show_help: false,
            status_message: None,
            store,
        };

        let skipped = app.store.skipped().len();
        if skipped > 0 {
            app.status_message = Some(format!(
                "Skipped {} unreadable line{} in {}",
                skipped,
                if skipped == 1 { "" } else { "s" },
                app.store.path().display()
            ));
        }
        app.refresh();
        app
    }

    pub fn month(&self) -> YearMonth {
        self.grid.month()
    }

    /// Reminders shown in the current view, in display order.
    pub fn visible_reminders(&self) -> Vec<&Reminder> {
        match self.view_mode {
            ViewMode::Month => {
                let mut day: Vec<&Reminder> = self.store.on_date(self.selected_date).collect();
                day.sort_by_key(|r| r.date_time());
                day
            }
            ViewMode::Reminders => self.store.reminders().iter().collect(),
        }
    }

    pub fn selected_reminder(&self) -> Option<&Reminder> {
        self.visible_reminders().get(self.list_index).copied()
    }

    fn refresh(&mut self) {
        let month = YearMonth::of(self.selected_date);
        if self.grid.month() != month || self.grid_is_stale() {
            self.grid = compute_grid(month, self.today);
            log::debug!("showing {}", month);
        }
        self.days_with_reminders = self.store.days_with_reminders(month);
        let len = self.visible_reminders().len();
        self.list_index = self.list_index.min(len.saturating_sub(1));
        self.checked.retain(|i| *i < len);
    }

    fn grid_is_stale(&self) -> bool {
        let flagged = self.grid.day_cells().find(|c| c.is_today).map(|c| c.day);
        let expected = (YearMonth::of(self.today) == self.grid.month()).then(|| self.today.day());
        flagged != expected
    }

    fn on_date_changed(&mut self) {
        self.list_index = 0;
        self.checked.clear();
        self.refresh();
    }

    pub fn set_view(&mut self, mode: ViewMode) {
        if self.view_mode != mode {
            self.view_mode = mode;
            self.on_date_changed();
        }
    }

    pub fn next_day(&mut self) {
        self.selected_date = self.selected_date.succ_opt().unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn prev_day(&mut self) {
        self.selected_date = self.selected_date.pred_opt().unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn next_week(&mut self) {
        self.selected_date = self
            .selected_date
            .checked_add_days(chrono::Days::new(7))
            .unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn prev_week(&mut self) {
        self.selected_date = self
            .selected_date
            .checked_sub_days(chrono::Days::new(7))
            .unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn next_month(&mut self) {
        let current = self.month();
        let month = current.succ_opt().unwrap_or(current);
        self.selected_date = month.with_day_clamped(self.selected_date.day());
        self.on_date_changed();
    }

    pub fn prev_month(&mut self) {
        let current = self.month();
        let month = current.pred_opt().unwrap_or(current);
        self.selected_date = month.with_day_clamped(self.selected_date.day());
        self.on_date_changed();
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        self.selected_date = self.today;
        self.on_date_changed();
    }

    pub fn select_next(&mut self) {
        let len = self.visible_reminders().len();
        if self.list_index + 1 < len {
            self.list_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.list_index = self.list_index.saturating_sub(1);
    }

    pub fn toggle_checked(&mut self) {
        if self.selected_reminder().is_none() {
            return;
        }
        if !self.checked.remove(&self.list_index) {
            self.checked.insert(self.list_index);
        }
    }

    /// Checked rows, or the cursor row when nothing is checked.
    fn targets(&self) -> Vec<Reminder> {
        let visible = self.visible_reminders();
        if self.checked.is_empty() {
            return visible.get(self.list_index).map(|r| (*r).clone()).into_iter().collect();
        }
        let mut indexes: Vec<usize> = self.checked.iter().copied().collect();
        indexes.sort_unstable();
        indexes
            .into_iter()
            .filter_map(|i| visible.get(i).map(|r| (*r).clone()))
            .collect()
    }

    pub fn delete_selected(&mut self) {
        self.apply_to_targets("Deleted", |store, r| store.remove(r));
    }

    pub fn complete_selected(&mut self) {
        self.apply_to_targets("Marked as done", |store, r| store.complete(r));
    }

    fn apply_to_targets(
        &mut self,
        verb: &str,
        op: impl Fn(&mut ReminderStore, &Reminder) -> Result<Option<Reminder>, StoreError>,
    ) {
        let targets = match &self.detail_item {
            Some(detail) => vec![detail.clone()],
            None => self.targets(),
        };
        if targets.is_empty() {
            return;
        }

        let mut done = 0;
        let mut message = None;
        for reminder in &targets {
            match op(&mut self.store, reminder) {
                Ok(Some(_)) => done += 1,
                Ok(None) => {}
                Err(e) => {
                    log::error!("{verb} failed: {e}");
                    message = Some(format!("Error: {e}"));
                    break;
                }
            }
        }
        self.status_message = message.or_else(|| {
            Some(format!(
                "{verb} {done} reminder{}",
                if done == 1 { "" } else { "s" }
            ))
        });

        self.detail_item = None;
        self.checked.clear();
        self.refresh();
    }

    pub fn show_detail(&mut self) {
        self.detail_item = self.selected_reminder().cloned();
    }

    pub fn close_detail(&mut self) {
        self.detail_item = None;
    }

    pub fn open_form(&mut self) {
        self.form_state = Some(ReminderFormState::new(self.selected_date));
        self.input_mode = InputMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form_state = None;
        self.input_mode = InputMode::Normal;
    }

    /// Saves the form. On a validation error the form stays open with its
    /// values so only the bad field needs fixing.
    pub fn submit_form(&mut self) {
        let Some(form) = &self.form_state else {
            return;
        };
        let draft = form.draft();
        match self.store.add(&draft) {
            Ok(reminder) => {
                self.status_message = Some(format!("Added {} reminder", reminder.event_type()));
                self.close_form();
                self.refresh();
            }
            Err(StoreError::Validation(e)) => {
                self.status_message = Some(format!("Please fix: {e}"));
            }
            Err(e) => {
                log::error!("saving reminder failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.close_form();
                self.refresh();
            }
        }
    }

    pub fn form_input_char(&mut self, c: char) {
        if let Some(form) = &mut self.form_state {
            form.input_char(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(form) = &mut self.form_state {
            form.backspace();
        }
    }

    pub fn form_tab(&mut self) {
        if let Some(form) = &mut self.form_state {
            form.active_field = form.active_field.next();
        }
    }

    pub fn form_backtab(&mut self) {
        if let Some(form) = &mut self.form_state {
            form.active_field = form.active_field.prev();
        }
    }

    /// Surfaces finished background writes; only failures reach the user.
    pub fn poll_writes(&mut self) {
        while let Some(outcome) = self.store.poll_write() {
            if let Err(e) = outcome.result {
                self.status_message = Some(format!("Save failed: {e}"));
            }
        }
    }

    /// Waits for pending writes before exit.
    pub fn shutdown(&mut self) -> Result<(), StoreError> {
        self.store.flush_blocking()
    }
}
