//! Data models.
//!
//! `spotify` holds the raw upstream Web API schema; `relay` holds the
//! simplified response contract the relay exposes to its clients, with
//! conversions from the raw types.

mod relay;
mod spotify;

pub use relay::{ArtistSummary, ListeningData, NowPlaying, PlayingTrack, TrackSummary};
pub use spotify::{
    AlbumRef, Artist, ArtistPage, ArtistRef, CurrentlyPlaying, ExternalUrls, FollowedArtists,
    Followers, Image, TopTracks, Track,
};
