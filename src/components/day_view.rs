use std::collections::HashSet;

use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};
use reminder_calendar::calendar::datetime::format_display;
use reminder_calendar::calendar::Reminder;

use crate::theme;

/// Reminders of the selected day, next to the month grid.
pub struct DayView;

impl DayView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        reminders: &[&Reminder],
        selected: Option<usize>,
        checked: &HashSet<usize>,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %B %d, %Y"))
        } else if w >= 18 {
            format!(" {} ", date.format("%b %d, %Y"))
        } else {
            format!(" {} ", date.format("%m/%d"))
        };

        let count_str = match reminders.len() {
            0 => String::new(),
            1 => " 1 reminder ".to_string(),
            n => format!(" {n} reminders "),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(count_str, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if reminders.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No reminders. Press n to add one.").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = reminders
            .iter()
            .enumerate()
            .map(|(i, rem)| {
                format_reminder(rem, inner_w, selected == Some(i), checked.contains(&i))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

fn format_reminder(rem: &Reminder, max_width: usize, selected: bool, checked: bool) -> ListItem<'static> {
    let theme = theme::current();
    let checkbox = if checked { " [x] " } else { " [ ] " };
    let row_style = if selected { theme.selected } else { Style::default() };

    let time = format!("{} ", rem.time_display());
    let mut spans = vec![
        Span::styled(checkbox, row_style),
        Span::styled(time.clone(), row_style.add_modifier(Modifier::DIM)),
        Span::styled(format!("{:<8} ", rem.priority()), theme.priority(rem.priority())),
        Span::styled(rem.event_type().to_string(), row_style),
    ];

    // Only show location if there's room
    let used = checkbox.len() + time.len() + 9 + rem.event_type().len();
    if used + 3 + rem.location().len() <= max_width {
        spans.push(Span::styled(format!(" @ {}", rem.location()), theme.dim));
    }

    ListItem::new(Line::from(spans))
}

/// Render a reminder detail popup overlay.
pub fn render_detail_popup(frame: &mut Frame, area: Rect, rem: &Reminder) {
    let theme = theme::current();
    let popup_w = area.width.clamp(30, 60).min(area.width);
    let popup_h = area.height.clamp(8, 16).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", rem.event_type()))
        .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Date and Time: ", theme.dim),
            Span::raw(format_display(&rem.date_time())),
        ]),
        Line::from(vec![
            Span::styled("Priority: ", theme.dim),
            Span::styled(rem.priority().to_string(), theme.priority(rem.priority())),
        ]),
        Line::from(vec![
            Span::styled("Location: ", theme.dim),
            Span::raw(rem.location().to_string()),
        ]),
        Line::from(""),
        Line::from(Span::styled("Reminder:", theme.dim)),
    ];
    lines.extend(rem.note().lines().map(|l| Line::from(l.to_string())));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "x: mark done  d: delete  Esc: close",
        theme.dim,
    )));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
