use bracket_random::prelude::RandomNumberGenerator;
use serde::{Deserialize, Serialize};

use crate::config::PoolBounds;
use crate::data::Song;
use crate::rng;

/// Narrows the catalog to the act's difficulty band.
///
/// Act 1 keeps difficulty <= 3, act 2 keeps <= 5, every later act keeps >= 3.
/// An empty result falls back to the unfiltered catalog so generation never starves.
pub fn filter_for_act(act_index: usize, songs: &[Song]) -> Vec<Song> {
    let filtered: Vec<Song> = songs
        .iter()
        .filter(|song| act_allows(act_index, song.clamped_difficulty()))
        .cloned()
        .collect();
    if filtered.is_empty() {
        songs.to_vec()
    } else {
        filtered
    }
}

fn act_allows(act_index: usize, difficulty: u8) -> bool {
    match act_index {
        0 | 1 => difficulty <= 3,
        2 => difficulty <= 5,
        _ => difficulty >= 3,
    }
}

/// How many songs a challenge in this act may offer.
pub fn pick_pool_size(
    bounds: PoolBounds,
    available: usize,
    rng: &mut RandomNumberGenerator,
) -> usize {
    if available < bounds.min {
        return available;
    }
    let max = bounds.max.min(available);
    if bounds.min >= max {
        return bounds.min;
    }
    rng::inclusive(rng, bounds.min, max)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
    Expert,
}

/// Highest tier first; difficulty challenges take the first tier with enough songs.
pub const TIER_PRIORITY: [DifficultyTier; 4] = [
    DifficultyTier::Expert,
    DifficultyTier::Hard,
    DifficultyTier::Medium,
    DifficultyTier::Easy,
];

impl DifficultyTier {
    pub fn for_difficulty(difficulty: u8) -> Self {
        match difficulty {
            d if d >= 6 => DifficultyTier::Expert,
            5 => DifficultyTier::Hard,
            3 | 4 => DifficultyTier::Medium,
            _ => DifficultyTier::Easy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "easy",
            DifficultyTier::Medium => "medium",
            DifficultyTier::Hard => "hard",
            DifficultyTier::Expert => "expert",
        }
    }
}
