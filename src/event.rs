use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Next key press within `timeout`. Resize and mouse events are dropped,
/// as are key releases on terminals that report them.
pub fn next_key_press(timeout: Duration) -> color_eyre::Result<Option<KeyEvent>> {
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(Some(key)),
            _ => continue,
        }
    }
    Ok(None)
}
