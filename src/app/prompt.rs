//! One-line input prompts used by the screens.

/// What the text being typed is for. Multi-step edits carry the values
/// collected so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Show the details of a track by id.
    ViewTrack,
    /// Play a track by id and add it to the session list.
    PlayTrack,
    /// First step of a rating change.
    RateId,
    /// Second step of a rating change.
    RateValue { track_id: String },
    /// First step of a rename.
    RenameId,
    /// Second step of a rename.
    RenameName { track_id: String },
    /// Last step of a rename.
    RenameArtist { track_id: String, name: String },
    /// Remote search query.
    Search,
}

impl PromptKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::ViewTrack => "View track ID",
            PromptKind::PlayTrack => "Play track ID",
            PromptKind::RateId | PromptKind::RenameId => "Track ID",
            PromptKind::RateValue { .. } => "New rating (1-5)",
            PromptKind::RenameName { .. } => "New name",
            PromptKind::RenameArtist { .. } => "New artist",
            PromptKind::Search => "Search for music",
        }
    }

    /// Numeric prompts only accept digits, keystroke by keystroke.
    pub fn numeric(&self) -> bool {
        matches!(
            self,
            PromptKind::ViewTrack
                | PromptKind::PlayTrack
                | PromptKind::RateId
                | PromptKind::RateValue { .. }
                | PromptKind::RenameId
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }
}
