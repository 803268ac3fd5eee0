use super::{App, keybinds};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, EventStream};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::Result;
use std::panic;
use std::time::Instant;

pub async fn run(app: &mut App) -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    terminal.clear()?;
    let size = terminal.size()?;
    app.resize(size.width, size.height, Instant::now());
    terminal.draw(|frame| app.draw(frame))?;

    let mut terminal_events = EventStream::new();
    let result = loop {
        let deadline = app.next_deadline();
        let sleep_target = tokio::time::Instant::from_std(deadline.unwrap_or_else(Instant::now));

        tokio::select! {
            maybe_event = terminal_events.next() => match maybe_event {
                Some(Ok(event)) => keybinds::handle_terminal_event(app, event, Instant::now()),
                Some(Err(e)) => break Err(e),
                None => break Ok(()),
            },
            _ = app.pump_session(), if app.is_session_open() => {}
            _ = tokio::time::sleep_until(sleep_target), if deadline.is_some() => {
                app.tick(Instant::now());
            }
        }

        if app.should_exit {
            break Ok(());
        }
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e);
        }
    };

    app.shutdown();
    let _ = panic::take_hook();
    terminal.show_cursor()?;
    restore_terminal();

    result
}

fn restore_terminal() {
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = crossterm::execute!(std::io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}
