pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    // 250ms tick drives flash message expiry
    let mut events = EventHandler::new(250);

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.update_flash(),
        }

        if app.should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_field(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_field(),

                // Step adjustments
                KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('+') => app.nudge(1.0),
                KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('-') => app.nudge(-1.0),

                // Free-text editing
                KeyCode::Enter | KeyCode::Char('i') => app.start_editing(),

                // Auto-QA toggle
                KeyCode::Char('a') => app.toggle_auto_qa(),

                // Chart view toggle
                KeyCode::Char('c') => app.toggle_chart(),

                // Export CSV
                KeyCode::Char('e') => app.export_csv(),

                // Reset to baseline
                KeyCode::Char('r') => app.reset(),

                // Help
                KeyCode::Char('?') => app.show_help(),

                _ => {}
            }
        }
        app::InputMode::Editing => {
            match key.code {
                // Commit through the engine's clamping setters
                KeyCode::Enter => app.commit_edit(),

                KeyCode::Esc => app.cancel_edit(),

                KeyCode::Backspace => {
                    app.edit_buffer.pop();
                }

                // Numeric input only; anything else the engine would clamp
                // to zero anyway, so reject it at the keyboard
                KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                    app.edit_buffer.push(c);
                }

                // Ignore all other keys (don't propagate to Normal mode)
                _ => {}
            }
        }
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
