//! The simplified response contract the relay exposes to its clients.
//!
//! Field names follow the contract of the original frontend: aggregate keys
//! and art/playing fields are camelCase, duration/progress keep the upstream
//! millisecond names.

use serde::Serialize;

use super::spotify::{Artist, CurrentlyPlaying, Track};

/// Aggregate listening data returned by `GET /spotify`.
#[derive(Debug, Clone, Serialize)]
pub struct ListeningData {
    /// Top tracks, most played first.
    #[serde(rename = "topTracks")]
    pub top_tracks: Vec<TrackSummary>,

    /// Currently playing track, or the "not playing" default.
    #[serde(rename = "nowPlaying")]
    pub now_playing: NowPlaying,

    /// Followed artists.
    #[serde(rename = "followedArtists")]
    pub followed_artists: Vec<ArtistSummary>,
}

/// A reshaped track.
#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
    /// Spotify track ID.
    pub id: String,

    /// Track name.
    pub name: String,

    /// Artist names, comma-separated.
    pub artist: String,

    /// Album name.
    pub album: String,

    /// Largest album cover URL.
    #[serde(rename = "albumArt")]
    pub album_art: Option<String>,

    /// Spotify URI, usable as a play-operation input.
    pub uri: String,

    /// open.spotify.com link.
    pub url: Option<String>,

    /// Track length in milliseconds.
    pub duration_ms: Option<u64>,

    /// Preview clip URL.
    pub preview_url: Option<String>,
}

impl From<Track> for TrackSummary {
    fn from(track: Track) -> Self {
        let artist = track.artist_names();
        let album_art = track.album_art().map(ToOwned::to_owned);
        let url = track.spotify_url().map(ToOwned::to_owned);
        Self {
            id: track.id,
            name: track.name,
            artist,
            album: track.album.name,
            album_art,
            uri: track.uri,
            url,
            duration_ms: track.duration_ms,
            preview_url: track.preview_url,
        }
    }
}

/// Currently-playing state.
///
/// Serializes either as a playing track or as the "not playing" default
/// payload, mirroring the two shapes of the original contract.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum NowPlaying {
    /// A track is on.
    Playing(PlayingTrack),

    /// Nothing is playing; carries a human-readable message.
    NotPlaying {
        /// Always false.
        #[serde(rename = "isPlaying")]
        is_playing: bool,
        /// Why there is no track payload.
        message: String,
    },
}

impl NowPlaying {
    /// The default payload for an idle or empty player.
    #[must_use]
    pub fn not_playing() -> Self {
        Self::NotPlaying { is_playing: false, message: "No track currently playing".to_string() }
    }
}

/// The reshaped currently-playing track.
#[derive(Debug, Clone, Serialize)]
pub struct PlayingTrack {
    /// Whether playback is active (false while paused).
    #[serde(rename = "isPlaying")]
    pub is_playing: bool,

    /// Track name.
    pub name: String,

    /// Artist names, comma-separated.
    pub artist: String,

    /// Album name.
    pub album: String,

    /// Largest album cover URL.
    #[serde(rename = "albumArt")]
    pub album_art: Option<String>,

    /// open.spotify.com link.
    pub url: Option<String>,

    /// Track length in milliseconds.
    pub duration_ms: Option<u64>,

    /// Playback position in milliseconds.
    pub progress_ms: Option<u64>,
}

impl From<CurrentlyPlaying> for NowPlaying {
    fn from(playing: CurrentlyPlaying) -> Self {
        let Some(track) = playing.item else {
            return Self::not_playing();
        };
        Self::Playing(PlayingTrack {
            is_playing: playing.is_playing,
            artist: track.artist_names(),
            album_art: track.album_art().map(ToOwned::to_owned),
            url: track.spotify_url().map(ToOwned::to_owned),
            name: track.name,
            album: track.album.name,
            duration_ms: track.duration_ms,
            progress_ms: playing.progress_ms,
        })
    }
}

/// A reshaped followed artist.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistSummary {
    /// Spotify artist ID.
    pub id: String,

    /// Artist name.
    pub name: String,

    /// Genre tags.
    pub genres: Vec<String>,

    /// Total follower count.
    pub followers: Option<u64>,

    /// Popularity score (0-100).
    pub popularity: Option<u32>,

    /// Largest artist image URL.
    pub image: Option<String>,

    /// open.spotify.com link.
    pub url: Option<String>,
}

impl From<Artist> for ArtistSummary {
    fn from(artist: Artist) -> Self {
        let image = artist.image().map(ToOwned::to_owned);
        Self {
            id: artist.id,
            name: artist.name,
            genres: artist.genres,
            followers: artist.followers.total,
            popularity: artist.popularity,
            image,
            url: artist.external_urls.spotify,
        }
    }
}
