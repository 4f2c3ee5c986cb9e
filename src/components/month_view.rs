use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use reminder_calendar::calendar::grid::WEEKDAY_HEADERS;
use reminder_calendar::calendar::MonthGrid;

use crate::theme;

const CELL_W: usize = 5;

pub struct MonthView;

impl MonthView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        grid: &MonthGrid,
        selected_date: NaiveDate,
        days_with_reminders: &BTreeSet<u32>,
    ) {
        let theme = theme::current();
        let month = grid.month();

        let block = Block::default()
            .title(format!(" {} ", month.title()))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Line::from(
            WEEKDAY_HEADERS
                .iter()
                .map(|d| Span::styled(format!("{d:^CELL_W$}"), theme.header))
                .collect::<Vec<_>>(),
        );

        let selected_day = (grid.month().year() == selected_date.year()
            && grid.month().month() == selected_date.month())
        .then(|| selected_date.day());

        // Trailing empty rows are dropped so short months stay compact.
        let weeks: Vec<Line> = grid
            .rows()
            .iter()
            .take(grid.used_rows())
            .map(|row| {
                let cells: Vec<Span> = row
                    .iter()
                    .map(|cell| {
                        let Some(cell) = cell else {
                            return Span::raw(" ".repeat(CELL_W));
                        };
                        let marker = if days_with_reminders.contains(&cell.day) { '*' } else { ' ' };
                        let is_selected = selected_day == Some(cell.day);

                        let style = if cell.is_today && is_selected {
                            theme.today.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                        } else if is_selected {
                            theme.selected
                        } else if cell.is_today {
                            theme.today
                        } else {
                            Style::default()
                        };

                        Span::styled(format!(" {:>2}{} ", cell.day, marker), style)
                    })
                    .collect();
                Line::from(cells)
            })
            .collect();

        let mut constraints = vec![Constraint::Length(1)]; // header
        constraints.extend(weeks.iter().map(|_| Constraint::Length(1)));
        constraints.push(Constraint::Min(0)); // fill remaining

        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(Paragraph::new(header), rows[0]);
        for (i, week) in weeks.into_iter().enumerate() {
            frame.render_widget(Paragraph::new(week), rows[i + 1]);
        }
    }
}
