mod app;
mod components;
mod config;
mod editor;
mod error;
mod event;
mod handler;
mod logging;
mod syntax;
mod theme;
mod tui;
mod ui;
mod workspace;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::AppConfig;
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};

/// A distraction-free terminal code editor.
#[derive(Parser, Debug)]
#[command(name = "zen", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Colour theme
    #[arg(long, value_parser = ["dark", "light", "high-contrast"])]
    theme: Option<String>,

    /// JSON colour theme to load on startup
    #[arg(long, value_name = "PATH")]
    theme_file: Option<PathBuf>,

    /// Hide the minimap
    #[arg(long)]
    no_minimap: bool,

    /// Disable Normal/Insert/Visual modes
    #[arg(long)]
    no_modal: bool,

    /// Start in zen mode
    #[arg(long)]
    zen: bool,
}

impl Cli {
    /// CLI flags as a partial config; unset flags stay `None`.
    fn overrides(&self) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.editor.theme = self.theme.clone();
        cfg.editor.minimap = self.no_minimap.then_some(false);
        cfg.editor.modal_editing = self.no_modal.then_some(false);
        cfg.layout.zen = self.zen.then_some(true);
        cfg.theme.file = self.theme_file.clone();
        cfg
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    install_panic_hook();

    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut app = App::new(&config);
    let mut events = EventHandler::new(Duration::from_millis(16));
    let event_tx = events.sender();

    if let Some(path) = config.theme_file().map(PathBuf::from) {
        let tx = event_tx.clone();
        tokio::spawn(async move {
            let result = theme::load_theme_file(&path).await;
            let _ = tx.send(Event::ThemeLoaded(result));
        });
    }

    let size = tui.terminal_mut().size()?;
    app.handle_resize(size.width, size.height);
    tracing::info!(width = size.width, height = size.height, "editor started");

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;
        tui.set_cursor_style(app.cursor_style())?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key, &event_tx),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.tick(),
            Event::Resize(w, h) => app.handle_resize(w, h),
            Event::PaletteFocus(generation) => app.palette_focus(generation),
            Event::ThemeLoaded(result) => app.handle_theme_loaded(result),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    tracing::info!("editor exited");
    Ok(())
}
