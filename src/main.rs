use anyhow::Result;

use mindguard_chat::{logging, Config};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    // Load config
    let config = Config::load_or_init().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable config: {:#}", e);
        Config::new()
    });

    let log_path = logging::init(&config.data_dir()?)?;
    tracing::info!(
        "starting MindGuard v{} (log at {:?})",
        env!("CARGO_PKG_VERSION"),
        log_path
    );

    let mut events = EventHandler::new();
    let mut app = App::new(&config, events.sender())?;
    app.scroll_chat_to_bottom();

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    if let Err(e) = &result {
        tracing::error!("exiting after error: {:#}", e);
    }
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    tracing::info!("shutting down");
    Ok(())
}
