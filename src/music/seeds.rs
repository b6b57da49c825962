//! Seed sets and down-sampling.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Maximum number of seeds a recommendation request accepts.
pub const MAX_SEEDS: usize = 5;

/// Artist names, track names and genre tags used to seed a recommendation.
///
/// Each group behaves as a set: duplicates are collapsed on construction,
/// keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSet {
    pub artists: Vec<String>,
    pub tracks: Vec<String>,
    pub genres: Vec<String>,
}

impl SeedSet {
    pub fn new(artists: Vec<String>, tracks: Vec<String>, genres: Vec<String>) -> Self {
        Self {
            artists: dedup(artists),
            tracks: dedup(tracks),
            genres: dedup(genres),
        }
    }

    pub fn len(&self) -> usize {
        self.artists.len() + self.tracks.len() + self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reduce the set to at most `MAX_SEEDS` items.
    ///
    /// Sets already within the limit are returned untouched. Otherwise an
    /// artist quota is drawn first, then a track quota from what is left, and
    /// genres fill the remainder; each group is then sampled without
    /// replacement. Draw ranges are clamped so the quotas always add up to
    /// `MAX_SEEDS` without exceeding any group's size.
    pub fn down_sample<R: Rng + ?Sized>(self, rng: &mut R) -> SeedSet {
        if self.len() <= MAX_SEEDS {
            return self;
        }

        let (artists_len, tracks_len, genres_len) =
            (self.artists.len(), self.tracks.len(), self.genres.len());

        let artist_min = MAX_SEEDS.saturating_sub(tracks_len + genres_len);
        let artist_max = artists_len.min(MAX_SEEDS);
        let artist_quota = rng.random_range(artist_min..=artist_max);

        let remaining = MAX_SEEDS - artist_quota;
        let track_min = remaining.saturating_sub(genres_len);
        let track_max = tracks_len.min(remaining);
        let track_quota = rng.random_range(track_min..=track_max);

        let genre_quota = remaining - track_quota;

        SeedSet {
            artists: sample(&self.artists, artist_quota, rng),
            tracks: sample(&self.tracks, track_quota, rng),
            genres: sample(&self.genres, genre_quota, rng),
        }
    }
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn sample<R: Rng + ?Sized>(items: &[String], amount: usize, rng: &mut R) -> Vec<String> {
    items.choose_multiple(rng, amount).cloned().collect()
}
