//! Application model: the catalog plus everything the screens show.
//!
//! Every screen is a thin client of the one `CatalogStore` owned here.
//! Playback goes through a `PlaybackDriver` passed in by the caller, and
//! remote fetches are returned as `FetchCmd`s for the runtime to dispatch.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::audio::{PlaybackDriver, PlaybackHandle};
use crate::catalog::{CatalogStore, NewTrack, TrackRecord, format_rating};
use crate::config::LibrarySettings;
use crate::error::{AudioError, InputError};
use crate::fetch::{FetchCmd, FetchEvent, SearchHit};
use crate::library::import_dir;
use crate::validate;

use super::prompt::{Prompt, PromptKind};

/// The four screens of the jukebox.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    /// Browse and inspect the catalog.
    #[default]
    Library,
    /// Play tracks and keep a session list.
    Playlist,
    /// Change ratings, names and artists.
    Update,
    /// Search and download new tracks.
    Fetch,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Library, Screen::Playlist, Screen::Update, Screen::Fetch];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Library => "View Tracks",
            Screen::Playlist => "Create Track List",
            Screen::Update => "Update Tracks",
            Screen::Fetch => "Fetch Music",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Screen::Library => Screen::Playlist,
            Screen::Playlist => Screen::Update,
            Screen::Update => Screen::Fetch,
            Screen::Fetch => Screen::Library,
        }
    }
}

/// Message shown in the status box.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

/// The main application model.
pub struct App {
    pub catalog: CatalogStore,
    pub screen: Screen,
    pub selected: usize,
    pub filter_mode: bool,
    pub filter_query: String,
    pub prompt: Option<Prompt>,
    pub status: Status,
    /// Detail text for the last viewed or played track.
    pub details: Option<String>,
    /// Names played this session, with how often, in first-play order.
    pub session: Vec<(String, u32)>,
    pub search_hits: Vec<SearchHit>,
    pub hit_selected: usize,
    /// A search or download is running on the fetch worker.
    pub fetch_busy: bool,
    pub playback_handle: Option<PlaybackHandle>,
    /// Track queued on the audio thread but not yet confirmed playing.
    pub pending_play: Option<(PathBuf, String)>,
    pub rating_stars: bool,
}

impl App {
    /// Create a new `App` around an already loaded `catalog`.
    pub fn new(catalog: CatalogStore) -> Self {
        let status = load_status(&catalog);
        Self {
            catalog,
            screen: Screen::Library,
            selected: 0,
            filter_mode: false,
            filter_query: String::new(),
            prompt: None,
            status,
            details: None,
            session: Vec::new(),
            search_hits: Vec::new(),
            hit_selected: 0,
            fetch_busy: false,
            playback_handle: None,
            pending_play: None,
            rating_stars: false,
        }
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.status = Status {
            text: text.into(),
            is_error: false,
        };
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.status = Status {
            text: text.into(),
            is_error: true,
        };
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.prompt = None;
        self.filter_mode = false;
    }

    // ----- library list -------------------------------------------------

    /// Catalog positions visible in the list, after filtering.
    pub fn display_indices(&self) -> Vec<usize> {
        self.catalog.search_positions(&self.filter_query)
    }

    pub fn selected_record(&self) -> Option<&TrackRecord> {
        self.catalog.list_all().get(self.selected)
    }

    /// Return the next visible index after `current`, wrapping around.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Return the previous visible index before `current`, wrapping around.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(0) | None => Some(display[display.len() - 1]),
            Some(p) => Some(display[p - 1]),
        }
    }

    pub fn next(&mut self) {
        if self.screen == Screen::Fetch {
            if !self.search_hits.is_empty() {
                self.hit_selected = (self.hit_selected + 1) % self.search_hits.len();
            }
            return;
        }
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    pub fn prev(&mut self) {
        if self.screen == Screen::Fetch {
            if !self.search_hits.is_empty() {
                self.hit_selected = self
                    .hit_selected
                    .checked_sub(1)
                    .unwrap_or(self.search_hits.len() - 1);
            }
            return;
        }
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.ensure_selected_visible();
    }

    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Keep `selected` inside the filtered view, else move to its first entry.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }

        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }

    // ----- catalog actions ----------------------------------------------

    /// Re-read the catalog file, dropping anything only held in memory.
    pub fn reload(&mut self) {
        self.catalog.load();
        self.ensure_selected_visible();
        self.status = load_status(&self.catalog);
    }

    /// Details block for `track_id`, with or without the play count.
    fn details_for(&self, track_id: &str, with_plays: bool) -> Option<String> {
        let r = self.catalog.get(track_id)?;
        let rating = format_rating(r.rating, self.rating_stars);
        let mut text = format!("Name: {}\nArtist: {}\nRating: {}", r.name, r.artist, rating);
        if with_plays {
            text.push_str(&format!("\nPlays: {}", r.play_count));
        }
        Some(text)
    }

    /// Show a track's details by typed id.
    pub fn view_track(&mut self, input: &str) {
        let id = match validate::track_id(input) {
            Ok(id) => id.to_string(),
            Err(e) => return self.input_error(e),
        };
        match self.details_for(&id, true) {
            Some(text) => {
                self.details = Some(text);
                self.info(format!("Track {id} found."));
            }
            None => {
                self.details = Some("Track not found".to_string());
                self.error(format!("Track {id} not found."));
            }
        }
    }

    /// Play a track by typed id: count the play, persist it, add it to the
    /// session list and start the audio when the file exists.
    pub fn play_track(&mut self, input: &str, player: &dyn PlaybackDriver) {
        let id = match validate::track_id(input) {
            Ok(id) => id.to_string(),
            Err(e) => return self.input_error(e),
        };
        self.play_by_id(&id, player);
    }

    /// Play the highlighted library entry.
    pub fn play_selected(&mut self, player: &dyn PlaybackDriver) {
        let Some(id) = self.selected_record().map(|r| r.track_id.clone()) else {
            self.error("No tracks available.");
            return;
        };
        self.play_by_id(&id, player);
    }

    fn play_by_id(&mut self, id: &str, player: &dyn PlaybackDriver) {
        let Some(record) = self.catalog.get(id).cloned() else {
            self.details = Some("Track not found".to_string());
            self.error(format!("Track {id} not found."));
            return;
        };

        match self.session.iter_mut().find(|(name, _)| *name == record.name) {
            Some((_, count)) => *count += 1,
            None => self.session.push((record.name.clone(), 1)),
        }
        if let Err(e) = self.catalog.record_play(id) {
            warn!(error = %e, "could not persist play count");
            self.error(format!("Could not save play count: {e}"));
        }

        let mut details = self.details_for(id, false).unwrap_or_default();
        let started = player
            .load(Path::new(&record.source))
            .and_then(|()| player.play());
        match started {
            // With a playback handle, "Playing" waits for the audio thread
            // to confirm; see `sync_playback`.
            Ok(()) if self.playback_handle.is_some() => {
                self.pending_play = Some((PathBuf::from(&record.source), record.name.clone()));
                if !self.status.is_error {
                    self.info(format!("Starting {}...", record.name));
                }
            }
            Ok(()) => {
                if !self.status.is_error {
                    self.info(format!("Playing {}", record.name));
                }
            }
            Err(AudioError::Unavailable(_)) => {
                details.push_str("\nTrack file not found!");
                self.error(format!("Track file not found: {}", record.source));
            }
            Err(e) => self.error(e.to_string()),
        }
        self.details = Some(details);
    }

    /// Stop playback and reset the session list.
    pub fn stop(&mut self, player: &dyn PlaybackDriver) {
        if let Err(e) = player.stop() {
            warn!(error = %e, "stop failed");
        }
        self.details = None;
        self.session.clear();
        self.pending_play = None;
        self.info("Stopped.");
    }

    /// Settle a queued play against what the audio thread reports: either
    /// it is playing the file, or it failed to open it.
    pub fn sync_playback(&mut self) {
        let Some((path, name)) = self.pending_play.clone() else {
            return;
        };
        let Some(handle) = self.playback_handle.clone() else {
            return;
        };
        let (error, started) = match handle.lock() {
            Ok(info) => (
                info.error.clone(),
                info.playing && info.path.as_deref() == Some(path.as_path()),
            ),
            Err(_) => return,
        };

        if let Some(err) = error {
            self.pending_play = None;
            self.error(format!("Could not play {name}: {err}"));
        } else if started {
            self.pending_play = None;
            // Keep an earlier failure (e.g. the play count not saving) visible.
            if !self.status.is_error {
                self.info(format!("Playing {name}"));
            }
        }
    }

    pub fn toggle_pause(&mut self, player: &dyn PlaybackDriver) {
        if let Err(e) = player.toggle_pause() {
            self.error(e.to_string());
        }
    }

    /// Change a rating from typed id and value.
    pub fn update_rating(&mut self, id_input: &str, rating_input: &str) {
        let rating = match validate::rating(rating_input) {
            Ok(r) => r,
            Err(e) => return self.input_error(e),
        };
        let id = match validate::track_id(id_input) {
            Ok(id) => id.to_string(),
            Err(e) => return self.input_error(e),
        };
        match self.catalog.set_rating(&id, rating) {
            Ok(true) => {
                self.details = self.details_for(&id, true);
                self.info(format!("Track {id} rating updated to {rating}."));
            }
            Ok(false) => self.error(format!("Track {id} not found.")),
            Err(e) => self.error(format!("Could not save catalog: {e}")),
        }
    }

    /// Rename a track from typed id, name and artist.
    pub fn rename(&mut self, id_input: &str, name: &str, artist: &str) {
        let (name, artist) = match validate::name_and_artist(name, artist) {
            Ok(v) => v,
            Err(e) => return self.input_error(e),
        };
        let id = match validate::track_id(id_input) {
            Ok(id) => id.to_string(),
            Err(e) => return self.input_error(e),
        };
        let result = match self.catalog.set_name(&id, name) {
            Ok(true) => self.catalog.set_artist(&id, artist),
            other => other,
        };
        match result {
            Ok(true) => {
                self.details = self.details_for(&id, true);
                self.info(format!("Track {id} updated successfully!"));
            }
            Ok(false) => self.error(format!("Track {id} not found.")),
            Err(e) => self.error(format!("Could not save catalog: {e}")),
        }
    }

    /// Add the audio files under `dir` that are not catalogued yet.
    pub fn import(&mut self, dir: &Path, settings: &LibrarySettings) {
        match import_dir(&mut self.catalog, dir, settings) {
            Ok(report) => self.info(format!(
                "Imported {} new track(s), {} already in the catalog.",
                report.added, report.skipped
            )),
            Err(e) => self.error(format!("Import failed: {e}")),
        }
    }

    // ----- fetch ----------------------------------------------------------

    /// Validate a query and build the command for the fetch worker.
    pub fn begin_search(&mut self, input: &str, limit: u32) -> Option<FetchCmd> {
        let query = match validate::search_query(input) {
            Ok(q) => q.to_string(),
            Err(e) => {
                self.input_error(e);
                return None;
            }
        };
        if self.fetch_busy {
            self.error("Still working on the previous request...");
            return None;
        }
        self.fetch_busy = true;
        self.search_hits.clear();
        self.hit_selected = 0;
        self.info("Searching...");
        Some(FetchCmd::Search { query, limit })
    }

    /// Build the download command for the highlighted search hit.
    pub fn begin_download(&mut self) -> Option<FetchCmd> {
        if self.fetch_busy {
            self.error("Still working on the previous request...");
            return None;
        }
        let hit = self.search_hits.get(self.hit_selected)?.clone();
        self.fetch_busy = true;
        self.info(format!("Downloading {}...", hit.title));
        Some(FetchCmd::Download(hit))
    }

    /// Apply a finished fetch. A download that produced a file becomes a new
    /// catalog record with `initial_rating`; anything else only sets status.
    pub fn apply_fetch_event(&mut self, event: FetchEvent, initial_rating: u32) {
        self.fetch_busy = false;
        match event {
            FetchEvent::SearchDone { hits, status } => {
                let failed = hits.is_empty();
                self.search_hits = hits;
                self.hit_selected = 0;
                if failed {
                    self.error(status);
                } else {
                    self.info(status);
                }
            }
            FetchEvent::Downloaded { hit, outcome } => {
                let Some(path) = outcome.local_path else {
                    self.error(outcome.status);
                    return;
                };
                let track = NewTrack {
                    name: hit.title.clone(),
                    artist: hit.channel,
                    source: path.to_string_lossy().into_owned(),
                    rating: initial_rating,
                };
                match self.catalog.add_track(track) {
                    Ok(record) => {
                        self.info(format!("Downloaded {} as track {}!", hit.title, record.track_id));
                    }
                    Err(e) => self.error(format!("Downloaded {} but could not save it: {e}", hit.title)),
                }
            }
        }
    }

    // ----- prompts ----------------------------------------------------------

    pub fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(Prompt::new(kind));
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Type into the open prompt. Numeric prompts drop non-digits.
    pub fn prompt_push(&mut self, c: char) {
        if let Some(p) = self.prompt.as_mut() {
            if !p.kind.numeric() || validate::is_numeric_keystroke(c) {
                p.input.push(c);
            }
        }
    }

    pub fn prompt_pop(&mut self) {
        if let Some(p) = self.prompt.as_mut() {
            p.input.pop();
        }
    }

    /// Submit the open prompt. Returns a command when the submission needs
    /// the fetch worker.
    pub fn submit_prompt(&mut self, player: &dyn PlaybackDriver, search_limit: u32) -> Option<FetchCmd> {
        let Prompt { kind, input } = self.prompt.take()?;
        match kind {
            PromptKind::ViewTrack => self.view_track(&input),
            PromptKind::PlayTrack => self.play_track(&input, player),
            PromptKind::RateId => {
                if let Some(track_id) = self.known_track_id(&input) {
                    self.open_prompt(PromptKind::RateValue { track_id });
                }
            }
            PromptKind::RateValue { track_id } => self.update_rating(&track_id, &input),
            PromptKind::RenameId => {
                if let Some(track_id) = self.known_track_id(&input) {
                    self.open_prompt(PromptKind::RenameName { track_id });
                }
            }
            PromptKind::RenameName { track_id } => {
                if input.trim().is_empty() {
                    self.input_error(InputError::EmptyNameOrArtist);
                } else {
                    self.open_prompt(PromptKind::RenameArtist {
                        track_id,
                        name: input,
                    });
                }
            }
            PromptKind::RenameArtist { track_id, name } => self.rename(&track_id, &name, &input),
            PromptKind::Search => return self.begin_search(&input, search_limit),
        }
        None
    }

    /// Validate an id and check it exists, reporting either problem.
    fn known_track_id(&mut self, input: &str) -> Option<String> {
        let id = match validate::track_id(input) {
            Ok(id) => id.to_string(),
            Err(e) => {
                self.input_error(e);
                return None;
            }
        };
        if self.catalog.contains(&id) {
            self.details = self.details_for(&id, true);
            Some(id)
        } else {
            self.error(format!("Track {id} not found."));
            None
        }
    }

    fn input_error(&mut self, e: InputError) {
        self.error(e.to_string());
    }
}

/// Status line after a (re)load of `catalog`.
fn load_status(catalog: &CatalogStore) -> Status {
    if let Some(reason) = catalog.load_error() {
        return Status {
            text: format!("Catalog could not be read, changes will not be saved: {reason}"),
            is_error: true,
        };
    }
    if catalog.is_empty() {
        return Status {
            text: "No tracks available.".to_string(),
            is_error: true,
        };
    }
    Status {
        text: format!("Loaded {} tracks", catalog.len()),
        is_error: false,
    }
}
