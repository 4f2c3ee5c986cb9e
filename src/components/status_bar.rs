use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{InputMode, ViewMode};
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        mode: ViewMode,
        input: InputMode,
        message: Option<&str>,
    ) {
        let style = theme::current().status;
        let w = area.width as usize;

        let mode_str = match mode {
            ViewMode::Month => "[1]Month",
            ViewMode::Reminders => "[2]Reminders",
        };
        let focus_indicator = match input {
            InputMode::Form => " [New Reminder]",
            InputMode::Normal => "",
        };

        // Show status message if present, otherwise show context-aware hints
        let right_text = match message {
            Some(msg) => format!(" {msg} "),
            None => match (mode, w) {
                (ViewMode::Month, w) if w >= 80 => {
                    " hjkl:Nav [/]:Mon t:Today n:New Enter:Detail Sp:Check x:Done d:Del ?:Help q:Quit"
                }
                (ViewMode::Month, w) if w >= 50 => " hjkl:Nav [/]:Mon n:New ?:Help q:Quit",
                (ViewMode::Reminders, w) if w >= 60 => {
                    " jk:Select Enter:Detail Sp:Check x:Done d:Del ?:Help q:Quit"
                }
                _ => " ?:Help q:Quit",
            }
            .to_string(),
        };

        let left = format!(" {mode_str}{focus_indicator} ");
        let padding = " ".repeat(w.saturating_sub(left.len() + right_text.len()));

        let line = Line::from(vec![
            Span::styled(left, style),
            Span::styled(padding, style),
            Span::styled(right_text, style),
        ]);

        frame.render_widget(Paragraph::new(line).style(style), area);
    }
}
