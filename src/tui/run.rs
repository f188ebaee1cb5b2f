use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::app::{AppOptions, Bindings, TuiApp};
use super::render::draw_ui;
use crate::api::Backend;
use crate::config::Config;
use crate::dispatch::CommandDispatcher;
use crate::poller::{spawn_log_poller, spawn_status_poller};
use crate::shutdown::ShutdownSignal;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// Run the dashboard until the user quits or a shutdown is requested.
pub fn run_dashboard(
    config: &Config,
    backend: Arc<dyn Backend>,
    initial_project: Option<String>,
    shutdown: ShutdownSignal,
) -> io::Result<()> {
    let (tx, rx) = mpsc::channel();

    let status = spawn_status_poller(
        Arc::clone(&backend),
        config.status_interval(),
        tx.clone(),
        shutdown.clone(),
    )?;
    let logs = spawn_log_poller(
        Arc::clone(&backend),
        config.log_interval(),
        initial_project.clone(),
        tx.clone(),
        shutdown.clone(),
    )?;
    let dispatcher = CommandDispatcher::new(backend, tx);

    let bindings = Bindings {
        status,
        logs,
        dispatcher,
        shutdown: shutdown.clone(),
    };
    let options = AppOptions {
        toast_delay: config.toast_delay(),
        open_host: config.open_host.clone(),
        backend_label: config.base_url.clone(),
        initial_project,
    };
    let mut app = TuiApp::new(rx, bindings, options);

    tracing::info!(event = "client.dashboard.started", url = %config.base_url);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        return Err(e);
    }
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            return Err(e);
        }
    };

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal even if the loop failed
    let restored = restore(&mut terminal);
    shutdown.trigger();
    drop(app);

    tracing::info!(event = "client.dashboard.stopped");
    result.and(restored)
}

fn event_loop(terminal: &mut Term, app: &mut TuiApp) -> io::Result<()> {
    terminal.clear()?;

    // Track log pane height for page scrolling
    let mut last_inner_height: usize = 20;

    loop {
        app.process_messages(Instant::now());
        if app.should_quit() {
            return Ok(());
        }

        terminal.draw(|f| {
            last_inner_height = draw_ui(f, app);
        })?;

        // Poll with a timeout so poller results keep flowing in
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    app.handle_key(key.code, key.modifiers, last_inner_height);
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => app.handle_mouse_scroll(true),
                    MouseEventKind::ScrollDown => app.handle_mouse_scroll(false),
                    _ => {}
                },
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

fn restore(terminal: &mut Term) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()
}
