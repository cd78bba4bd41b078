use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::{App, PromptKind, Screen};
use crate::audio::AudioPlayer;
use crate::config;
use crate::fetch::{FetchCmd, FetchWorker};
use crate::ui;

const QUIT_FADE_OUT: Duration = Duration::from_millis(300);

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: handles input, UI drawing and results coming
/// back from the fetch worker. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    fetcher: Option<&FetchWorker>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if let Some(worker) = fetcher {
            while let Some(event) = worker.try_recv() {
                // Fresh downloads start with a random rating.
                app.apply_fetch_event(event, rand::random_range(1..=5));
            }
        }

        app.sync_playback();
        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, audio_player, fetcher, state)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Hand a command to the fetch worker, or report why it cannot run.
fn dispatch(app: &mut App, fetcher: Option<&FetchWorker>, cmd: FetchCmd) {
    let Some(worker) = fetcher else {
        app.fetch_busy = false;
        app.error("Fetching is unavailable, see the log for details.");
        return;
    };
    if worker.send(cmd).is_err() {
        warn!("fetch worker is gone");
        app.fetch_busy = false;
        app.error("Fetching is unavailable, see the log for details.");
    }
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    fetcher: Option<&FetchWorker>,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    if app.prompt.is_some() {
        match key.code {
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Backspace => app.prompt_pop(),
            KeyCode::Enter => {
                if let Some(cmd) = app.submit_prompt(audio_player, settings.fetch.search_limit) {
                    dispatch(app, fetcher, cmd);
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.prompt_push(c),
            _ => {}
        }
        return Ok(false);
    }

    if app.filter_mode {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Char('j') | KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.next();
            }
            KeyCode::Char('k') | KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.prev();
            }
            KeyCode::Down => app.next(),
            KeyCode::Up => app.prev(),
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_filter_char(c);
                }
            }
            KeyCode::Enter => app.exit_filter_mode(),
            _ => {}
        }

        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => {
            info!("quit requested");
            audio_player.quit_softly(QUIT_FADE_OUT);
            if let Some(worker) = fetcher {
                worker.shutdown();
            }
            return Ok(true);
        }
        KeyCode::Tab => app.switch_screen(app.screen.next()),
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            app.switch_screen(Screen::ALL[idx]);
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                select_edge(app, true);
            } else {
                state.pending_gg = true;
            }
            return Ok(false);
        }
        KeyCode::Char('G') => select_edge(app, false),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        _ => handle_screen_key(key, settings, app, audio_player, fetcher),
    }

    state.pending_gg = false;
    Ok(false)
}

/// Keys that only mean something on the current screen.
fn handle_screen_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    fetcher: Option<&FetchWorker>,
) {
    match (app.screen, key.code) {
        (Screen::Library, KeyCode::Char('/')) => app.enter_filter_mode(),
        (Screen::Library, KeyCode::Char('v')) => app.open_prompt(PromptKind::ViewTrack),
        (Screen::Library, KeyCode::Char('r')) => app.reload(),
        (Screen::Library, KeyCode::Char('i')) => {
            app.import(&settings.catalog.music_dir, &settings.library);
        }
        (Screen::Library, KeyCode::Enter) => {
            if let Some(id) = app.selected_record().map(|r| r.track_id.clone()) {
                app.view_track(&id);
            }
        }
        (Screen::Playlist, KeyCode::Char('a')) => app.open_prompt(PromptKind::PlayTrack),
        (Screen::Playlist, KeyCode::Char('s')) => app.stop(audio_player),
        (Screen::Playlist, KeyCode::Char(' ')) => app.toggle_pause(audio_player),
        (Screen::Playlist, KeyCode::Enter) => app.play_selected(audio_player),
        (Screen::Update, KeyCode::Char('e')) => app.open_prompt(PromptKind::RateId),
        (Screen::Update, KeyCode::Char('n')) => app.open_prompt(PromptKind::RenameId),
        (Screen::Fetch, KeyCode::Char('/')) => app.open_prompt(PromptKind::Search),
        (Screen::Fetch, KeyCode::Enter) => {
            if let Some(cmd) = app.begin_download() {
                dispatch(app, fetcher, cmd);
            }
        }
        _ => {}
    }
}

/// Jump to the first (`top`) or last visible entry of the current list.
fn select_edge(app: &mut App, top: bool) {
    if app.screen == Screen::Fetch {
        if !app.search_hits.is_empty() {
            app.hit_selected = if top { 0 } else { app.search_hits.len() - 1 };
        }
        return;
    }
    let display = app.display_indices();
    let edge = if top { display.first() } else { display.last() };
    if let Some(&i) = edge {
        app.selected = i;
    }
}
