use serde::{Deserialize, Serialize};

/// Column names of the catalog file, in the order they are written.
///
/// Other tools read the same file, so this order and spelling is fixed.
pub const HEADER: [&str; 7] = [
    "Track ID",
    "ID",
    "Name",
    "Singer",
    "File Path",
    "Rating",
    "Plays",
];

/// One entry in the catalog.
///
/// Field order matches [`HEADER`]; rows are serialized positionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    #[serde(rename = "Track ID")]
    pub track_id: String,
    /// Contents of the `ID` column. Kept verbatim so it survives a rewrite;
    /// nothing reads meaning into it.
    #[serde(rename = "ID")]
    pub legacy_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Singer")]
    pub artist: String,
    /// Path of the playable file. May point at nothing.
    #[serde(rename = "File Path")]
    pub source: String,
    /// 0 means unrated. Range checks happen in the input validator, not here.
    #[serde(rename = "Rating")]
    pub rating: u32,
    #[serde(rename = "Plays")]
    pub play_count: u32,
}

impl TrackRecord {
    /// `"Artist - Name"`, or just the name when the artist is blank.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", artist, self.name)
        }
    }
}

/// A track about to be added, before it has been given an id.
#[derive(Debug, Clone)]
pub struct NewTrack {
    pub name: String,
    pub artist: String,
    pub source: String,
    pub rating: u32,
}
