// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, paste, timer ticks)
// - Spawning generation requests and applying their outcome

pub mod app;
pub mod markdown;
pub mod text_input;
pub mod theme;
pub mod toast;
pub mod ui;

use crate::config::Config;
use crate::export::SystemClipboard;
use crate::generator::{GenerateError, GenerateRequest, HttpGenerator};
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use text_input::Handled;
use tokio::sync::mpsc;

type Outcome = Result<String, GenerateError>;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// when done, even if the loop failed.
pub async fn run_tui(config: Config, log_buffer: LogBuffer, generator: HttpGenerator) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(&config, log_buffer);
    tracing::info!("Ready, posting to {}", generator.endpoint());

    let result = run_event_loop(&mut terminal, &mut app, &generator).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on terminal input, a redraw tick, and the outcome of the
/// in-flight request. Requests run on their own task so the UI keeps
/// animating while they are pending.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    generator: &HttpGenerator,
) -> Result<()> {
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<Outcome>(1);
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard input and paste
            maybe_event = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            } => {
                if let Some(request) = maybe_event.and_then(|ev| handle_terminal_event(app, ev)) {
                    spawn_generation(generator, request, outcome_tx.clone());
                }
            }

            // Periodic tick for the spinner and toast expiry
            _ = tick_interval.tick() => {
                app.tick();
            }

            // The pending request settled
            Some(outcome) = outcome_rx.recv() => {
                app.finish_submit(outcome);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Send `request` on a background task and deliver the outcome to the loop
fn spawn_generation(generator: &HttpGenerator, request: GenerateRequest, tx: mpsc::Sender<Outcome>) {
    let generator = generator.clone();
    tokio::spawn(async move {
        let outcome = generator.generate(&request).await;
        // Receiver is gone only when the UI has quit
        let _ = tx.send(outcome).await;
    });
}

fn handle_terminal_event(app: &mut App, event: Event) -> Option<GenerateRequest> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
        Event::Paste(text) => {
            app.paste(&text);
            None
        }
        _ => None,
    }
}

/// Handle keyboard input
///
/// Global shortcuts first, then focus navigation, then the focused field.
fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<GenerateRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Char('s') if ctrl => return app.submit(),
        KeyCode::Char('y') if ctrl => app.copy_result(&mut SystemClipboard),
        KeyCode::Char('d') if ctrl => {
            app.download_result();
        }
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::PageUp => app.scroll_result_up(app.page_size()),
        KeyCode::PageDown => app.scroll_result_down(app.page_size()),
        KeyCode::Enter => return app.activate(&mut SystemClipboard),
        _ => {
            if app.edit(key) == Handled::No {
                tracing::trace!("Unhandled key: {:?}", key.code);
            }
        }
    }
    None
}
