//! Raw data models matching the Spotify Web API schema.
//!
//! Only the fields the relay reshapes are modelled; everything else in the
//! upstream payloads is ignored during deserialization.

use serde::Deserialize;

/// A track object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Track {
    /// Spotify track ID.
    #[serde(default)]
    pub id: String,

    /// Track name.
    #[serde(default)]
    pub name: String,

    /// Performing artists.
    #[serde(default)]
    pub artists: Vec<ArtistRef>,

    /// Album the track appears on.
    #[serde(default)]
    pub album: AlbumRef,

    /// Spotify URI (`spotify:track:...`).
    #[serde(default)]
    pub uri: String,

    /// External URLs, including the open.spotify.com link.
    #[serde(default)]
    pub external_urls: ExternalUrls,

    /// Track length in milliseconds.
    #[serde(default)]
    pub duration_ms: Option<u64>,

    /// 30-second preview clip URL, when licensed.
    #[serde(default)]
    pub preview_url: Option<String>,
}

impl Track {
    /// Artist names as a comma-separated string.
    #[must_use]
    pub fn artist_names(&self) -> String {
        self.artists.iter().filter_map(|a| a.name.as_deref()).collect::<Vec<_>>().join(", ")
    }

    /// URL of the largest album image, if any.
    #[must_use]
    pub fn album_art(&self) -> Option<&str> {
        self.album.images.first()?.url.as_deref()
    }

    /// The open.spotify.com link for this track, if present.
    #[must_use]
    pub fn spotify_url(&self) -> Option<&str> {
        self.external_urls.spotify.as_deref()
    }
}

/// Minimal artist reference embedded in track objects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistRef {
    /// Artist name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Minimal album reference embedded in track objects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlbumRef {
    /// Album name.
    #[serde(default)]
    pub name: String,

    /// Cover art, widest first.
    #[serde(default)]
    pub images: Vec<Image>,
}

/// An image object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Image {
    /// Image URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// External URL map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    /// open.spotify.com link.
    #[serde(default)]
    pub spotify: Option<String>,
}

/// Response of `GET /me/top/tracks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopTracks {
    /// Page of track objects.
    #[serde(default)]
    pub items: Vec<Track>,
}

/// Response of `GET /me/player/currently-playing`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentlyPlaying {
    /// Whether playback is active.
    #[serde(default)]
    pub is_playing: bool,

    /// Playback position in milliseconds.
    #[serde(default)]
    pub progress_ms: Option<u64>,

    /// The playing track; absent for e.g. podcast episodes or ads.
    #[serde(default)]
    pub item: Option<Track>,
}

/// A full artist object from `GET /me/following`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Artist {
    /// Spotify artist ID.
    #[serde(default)]
    pub id: String,

    /// Artist name.
    #[serde(default)]
    pub name: String,

    /// Genre tags.
    #[serde(default)]
    pub genres: Vec<String>,

    /// Follower counts.
    #[serde(default)]
    pub followers: Followers,

    /// Popularity score (0-100).
    #[serde(default)]
    pub popularity: Option<u32>,

    /// Artist images, widest first.
    #[serde(default)]
    pub images: Vec<Image>,

    /// External URLs.
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl Artist {
    /// URL of the largest artist image, if any.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.images.first()?.url.as_deref()
    }
}

/// Follower information.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Followers {
    /// Total follower count.
    #[serde(default)]
    pub total: Option<u64>,
}

/// Response of `GET /me/following?type=artist`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowedArtists {
    /// Cursor page wrapper.
    #[serde(default)]
    pub artists: ArtistPage,
}

/// Cursor page of artist objects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistPage {
    /// Artists in this page.
    #[serde(default)]
    pub items: Vec<Artist>,
}
