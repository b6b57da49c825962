//! Fixture data served by the fake Spotify API.

pub const TEST_TOKEN: &str = "test-access-token";

pub const KYGO_ID: &str = "23fqKkggKUBHNkbKtXEls4";
pub const STARGAZING_ID: &str = "3Q2Z4zXYdDZrPU9SdqUgtx";
pub const FIRESTONE_ID: &str = "1I8tHoNBFTuoJAlh4hfVVE";

/// Artists the fake search endpoint knows, `(name, id)`.
pub const ARTISTS: &[(&str, &str)] = &[("Kygo", KYGO_ID), ("Avicii", "1vCWHaC5f2uS3yhpwWbIA6")];

/// Tracks the fake search endpoint knows, `(name, artist, id)`.
pub const TRACKS: &[(&str, &str, &str)] = &[
    ("Stargazing", "Kygo", STARGAZING_ID),
    ("Firestone", "Kygo", FIRESTONE_ID),
    ("Levels", "Avicii", "5UqCQaDshqbIk3pkhy4Pjg"),
];

pub const GENRE_SEEDS: &[&str] = &["acoustic", "chill", "edm", "house", "pop"];

/// Genre seed that makes the fake recommendations endpoint fail.
pub const BROKEN_GENRE: &str = "broken";
