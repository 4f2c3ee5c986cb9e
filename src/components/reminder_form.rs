use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use reminder_calendar::calendar::{Priority, ReminderDraft};

use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    EventType,
    Priority,
    Note,
    Location,
    Time,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::EventType => FormField::Priority,
            FormField::Priority => FormField::Note,
            FormField::Note => FormField::Location,
            FormField::Location => FormField::Time,
            FormField::Time => FormField::EventType,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::EventType => FormField::Time,
            FormField::Priority => FormField::EventType,
            FormField::Note => FormField::Priority,
            FormField::Location => FormField::Note,
            FormField::Time => FormField::Location,
        }
    }
}

/// Field values of the add-reminder popup. Survives a failed submit so the
/// user can fix one field without retyping the rest.
#[derive(Debug, Clone)]
pub struct ReminderFormState {
    pub date: NaiveDate,
    pub event_type: String,
    pub priority: Priority,
    pub note: String,
    pub location: String,
    pub time: String,
    pub active_field: FormField,
}

impl ReminderFormState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            event_type: String::new(),
            priority: Priority::Moderate,
            note: String::new(),
            location: String::new(),
            time: "09:00 AM".to_string(),
            active_field: FormField::EventType,
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            FormField::EventType => self.event_type.push(c),
            FormField::Note => self.note.push(c),
            FormField::Location => self.location.push(c),
            FormField::Time => self.time.push(c.to_ascii_uppercase()),
            FormField::Priority => {
                if c == ' ' {
                    self.priority = self.priority.next();
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            FormField::EventType => { self.event_type.pop(); }
            FormField::Note => { self.note.pop(); }
            FormField::Location => { self.location.pop(); }
            FormField::Time => { self.time.pop(); }
            FormField::Priority => {}
        }
    }

    pub fn draft(&self) -> ReminderDraft {
        let mut draft = ReminderDraft::on(self.date);
        draft.event_type = self.event_type.clone();
        draft.priority = self.priority.to_string();
        draft.note = self.note.clone();
        draft.location = self.location.clone();
        draft.time = self.time.clone();
        draft
    }
}

pub struct ReminderForm;

impl ReminderForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &ReminderFormState) {
        // Center the form popup
        let form_w = area.width.clamp(30, 56);
        let form_h = area.height.clamp(10, 12);
        let x = area.x + (area.width.saturating_sub(form_w)) / 2;
        let y = area.y + (area.height.saturating_sub(form_h)) / 2;
        let form_area = Rect::new(x, y, form_w.min(area.width), form_h.min(area.height));

        frame.render_widget(Clear, form_area);

        let block = Block::default()
            .title(format!(" Add Reminder - {} ", state.date.format("%Y-%m-%d")))
            .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // event type
            Constraint::Length(1), // priority
            Constraint::Length(1), // note
            Constraint::Length(1), // location
            Constraint::Length(1), // time
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let active = state.active_field;
        render_field(frame, rows[0], "Event Type:", &state.event_type, active == FormField::EventType);
        render_priority(frame, rows[1], state.priority, active == FormField::Priority);
        render_field(frame, rows[2], "Reminder:", &state.note, active == FormField::Note);
        render_field(frame, rows[3], "Location:", &state.location, active == FormField::Location);
        render_field(frame, rows[4], "Time:", &state.time, active == FormField::Time);

        let dim = theme::current().dim;
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help = Line::from(vec![
            Span::styled("Tab", bold),
            Span::styled(":Next ", dim),
            Span::styled("Space", bold),
            Span::styled(":Priority ", dim),
            Span::styled("Enter", bold),
            Span::styled(":Save ", dim),
            Span::styled("Esc", bold),
            Span::styled(":Cancel", dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[6]);
    }
}

const LABEL_W: usize = 12;

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let cursor = if active { "_" } else { "" };
    let style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let line = Line::from(vec![
        Span::styled(format!("{label:<LABEL_W$}"), theme::current().dim),
        Span::styled(format!("{value}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_priority(frame: &mut Frame, area: Rect, priority: Priority, active: bool) {
    let mut style = theme::current().priority(priority);
    if active {
        style = style.add_modifier(Modifier::REVERSED);
    }
    let line = Line::from(vec![
        Span::styled(format!("{:<LABEL_W$}", "Priority:"), theme::current().dim),
        Span::styled(format!("< {priority} >"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
