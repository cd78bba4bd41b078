use std::env;
use std::path::PathBuf;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog::CatalogStore;
use crate::fetch::{FetchWorker, YoutubeFetcher};

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (mut settings, problem) = settings::load_settings();

    if let Some(path) = env::args_os().nth(1) {
        settings.catalog.path = PathBuf::from(path);
    }

    if let Err(e) = logging::init_logging(&settings.log) {
        eprintln!("jukebox: logging disabled: {e}");
    }
    settings::report(problem.as_deref());
    info!(catalog = %settings.catalog.path.display(), "starting");

    let catalog = CatalogStore::open(&settings.catalog.path);
    let audio_player = AudioPlayer::new();
    let mut app = App::new(catalog);
    app.rating_stars = settings.ui.rating_stars;
    app.set_playback_handle(audio_player.playback_handle());

    let fetcher = match YoutubeFetcher::new(settings.fetch.clone()) {
        Ok(f) => Some(FetchWorker::spawn(f)),
        Err(e) => {
            warn!(error = %e, "fetching disabled");
            None
        }
    };

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &audio_player,
            fetcher.as_ref(),
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        warn!(error = %e, "event loop ended with an error");
    }
    run_result
}
