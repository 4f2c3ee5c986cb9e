use std::collections::HashSet;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use reminder_calendar::calendar::Reminder;

use crate::theme;

/// Every stored reminder, in file order.
pub struct ReminderList;

impl ReminderList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        reminders: &[&Reminder],
        selected_index: usize,
        checked: &HashSet<usize>,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 25 {
            format!(" Reminders ({}) ", reminders.len())
        } else {
            " Reminders ".to_string()
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        if reminders.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No reminders").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = reminders
            .iter()
            .enumerate()
            .map(|(i, reminder)| {
                let checkbox = if checked.contains(&i) { "[x]" } else { "[ ]" };
                let title_style = if checked.contains(&i) {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                let when = format!(
                    " {} {} ",
                    reminder.date().format("%Y-%m-%d"),
                    reminder.time_display()
                );
                let mut spans = vec![
                    Span::raw(format!(" {checkbox}")),
                    Span::styled(when.clone(), theme.dim),
                    Span::styled(
                        format!("{:<9}", reminder.priority()),
                        theme.priority(reminder.priority()),
                    ),
                ];
                let used = 4 + when.len() + 9;
                spans.push(Span::styled(
                    truncate(
                        &format!("{}: {}", reminder.event_type(), reminder.note()),
                        inner_w.saturating_sub(used),
                    ),
                    title_style,
                ));

                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme.highlight);
        let mut state = ListState::default().with_selected(Some(selected_index));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn truncate(s: &str, max: usize) -> String {
    // Notes may hold newlines; keep the row on one line.
    let s = s.replace('\n', " ");
    if s.chars().count() <= max {
        s
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a\nb", 10), "a b");
        assert_eq!(truncate("abcdef", 2), "ab");
    }
}
