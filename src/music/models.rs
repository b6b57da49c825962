use serde::{Deserialize, Serialize};

/// A track produced by the recommendation client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedTrack {
    /// Track name.
    pub name: String,
    /// Name of the first credited artist.
    pub artist: String,
    /// Catalog identifier, never empty.
    pub id: String,
}

impl RecommendedTrack {
    pub fn new(name: impl Into<String>, artist: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            id: id.into(),
        }
    }

    /// Playback URI, e.g. `spotify:track:6rqhFgbbKwnb9MLmUQDhG6`.
    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.id)
    }

    /// Label shown in track pickers: `"{name} by {artist}"`.
    pub fn label(&self) -> String {
        format!("{} by {}", self.name, self.artist)
    }
}
