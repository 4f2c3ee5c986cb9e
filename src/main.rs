mod app;
mod components;
mod event;
mod theme;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use app::{App, InputMode, ViewMode};
use clap::Parser;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use reminder_calendar::calendar::{BackgroundWriter, ReminderStore};
use reminder_calendar::config::Settings;

/// Month calendar with reminders, in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Reminder file to use instead of the configured one.
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();

    let args = Args::parse();
    let settings = Settings::load();
    theme::init(&settings.theme);

    let runtime = tokio::runtime::Runtime::new()?;
    let (store, load_error) = open_store(&args, &settings, runtime.handle());
    let mut app = App::new(store);
    if load_error.is_some() {
        app.status_message = load_error;
    }

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;

    if let Err(e) = app.shutdown() {
        log::error!("last save failed: {e}");
        eprintln!("Warning: reminders may not have been saved: {e}");
    }
    result
}

/// Opens the reminder file. A file that cannot be read leaves the calendar
/// usable with an empty list, and the reason goes to the status bar.
fn open_store(
    args: &Args,
    settings: &Settings,
    handle: &tokio::runtime::Handle,
) -> (ReminderStore, Option<String>) {
    let path = args.file.clone().unwrap_or_else(|| settings.reminders_path());

    let (mut store, message) = match ReminderStore::open(&path) {
        Ok(store) => (store, None),
        Err(e) => {
            log::error!("{e}");
            let message = format!("Could not load reminders ({e}); changes will not be saved");
            (ReminderStore::empty(&path), Some(message))
        }
    };

    if let Some(archive) = settings.archive_path() {
        store = store.with_archive(archive);
    }
    if settings.background_writes && store.is_loaded() {
        store = store.with_writer(BackgroundWriter::spawn(handle, &path));
    }
    (store, message)
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.poll_writes();

        terminal.draw(|frame| {
            let area = frame.area();
            let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
            let content_area = layout[0];

            match app.view_mode {
                ViewMode::Month => render_month_layout(frame, content_area, app),
                ViewMode::Reminders => {
                    components::ReminderList::render(
                        frame,
                        content_area,
                        &app.visible_reminders(),
                        app.list_index,
                        &app.checked,
                    );
                }
            }

            if let Some(ref form) = app.form_state {
                components::ReminderForm::render(frame, area, form);
            }

            if let Some(ref detail) = app.detail_item {
                components::day_view::render_detail_popup(frame, area, detail);
            }

            if app.show_help {
                render_help(frame, area);
            }

            components::StatusBar::render(
                frame,
                layout[1],
                app.view_mode,
                app.input_mode,
                app.status_message.as_deref(),
            );
        })?;

        if let Some(key) = event::next_key_press(Duration::from_millis(100))? {
            // Form errors stay visible while the user fixes the field
            if app.input_mode == InputMode::Normal {
                app.status_message = None;
            }

            if app.show_help {
                if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                    app.show_help = false;
                }
                continue;
            }

            if app.detail_item.is_some() {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter => app.close_detail(),
                    KeyCode::Char('x') => app.complete_selected(),
                    KeyCode::Char('d') => app.delete_selected(),
                    _ => {}
                }
                continue;
            }

            match app.input_mode {
                InputMode::Form => handle_form_input(app, key.code),
                InputMode::Normal => handle_normal_input(app, key.code, key.modifiers),
            }
        }
    }

    Ok(())
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Char('1'), _) => app.set_view(ViewMode::Month),
        (KeyCode::Char('2'), _) => app.set_view(ViewMode::Reminders),
        (KeyCode::Char('t'), _) => app.go_to_today(),
        (KeyCode::Char('n'), _) => app.open_form(),
        (KeyCode::Char('d'), _) => app.delete_selected(),
        (KeyCode::Char('x'), _) => app.complete_selected(),
        (KeyCode::Char(' '), _) => app.toggle_checked(),
        (KeyCode::Enter, _) => app.show_detail(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        (KeyCode::Char('['), _) => app.prev_month(),
        (KeyCode::Char(']'), _) => app.next_month(),
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.prev_day(),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.next_day(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => match app.view_mode {
            ViewMode::Month if modifiers.contains(KeyModifiers::SHIFT) => app.select_prev(),
            ViewMode::Month => app.prev_week(),
            ViewMode::Reminders => app.select_prev(),
        },
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => match app.view_mode {
            ViewMode::Month if modifiers.contains(KeyModifiers::SHIFT) => app.select_next(),
            ViewMode::Month => app.next_week(),
            ViewMode::Reminders => app.select_next(),
        },
        (KeyCode::Char('K'), _) => app.select_prev(),
        (KeyCode::Char('J'), _) => app.select_next(),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab => app.form_tab(),
        KeyCode::BackTab => app.form_backtab(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) => app.form_input_char(c),
        _ => {}
    }
}

fn render_month_layout(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    if area.width < 60 {
        components::MonthView::render(
            frame,
            area,
            &app.grid,
            app.selected_date,
            &app.days_with_reminders,
        );
        return;
    }

    let content =
        Layout::horizontal([Constraint::Length(37), Constraint::Min(20)]).split(area);

    components::MonthView::render(
        frame,
        content[0],
        &app.grid,
        app.selected_date,
        &app.days_with_reminders,
    );
    components::DayView::render(
        frame,
        content[1],
        app.selected_date,
        &app.visible_reminders(),
        Some(app.list_index),
        &app.checked,
    );
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let dim = theme::current().dim;
    let popup_w = area.width.clamp(30, 54).min(area.width);
    let popup_h = area.height.clamp(12, 24).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![Span::styled(format!("  {keys:<10}"), key_style), Span::raw(desc)])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        entry("h/l", "Previous/next day"),
        entry("j/k", "Next/previous week (list in Reminders view)"),
        entry("J/K", "Move in the day's reminders"),
        entry("[/]", "Previous/next month"),
        entry("t", "Jump to today"),
        Line::from(""),
        Line::from(Span::styled("Views", section_style)),
        entry("1/2", "Month / all reminders"),
        Line::from(""),
        Line::from(Span::styled("Reminders", section_style)),
        entry("n", "Add reminder on selected day"),
        entry("Enter", "Show details"),
        entry("Space", "Check / uncheck"),
        entry("x", "Mark checked (or selected) as done"),
        entry("d", "Delete checked (or selected)"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  q", key_style),
            Span::styled(" / ", dim),
            Span::styled("Esc     ", key_style),
            Span::raw("Quit / close popup"),
        ]),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
