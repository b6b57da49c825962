//! Spotify Web API backend.
//!
//! `SpotifyClient` is the one authenticated client the application builds at
//! startup and hands to everything that talks to the streaming service.

mod client;
mod models;
mod token;

pub use client::{SpotifyClient, SPOTIFY_API_BASE};
pub use models::SavedTrackFeatures;
pub use token::TokenSource;
