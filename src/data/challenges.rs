use std::collections::BTreeMap;

use bracket_random::prelude::RandomNumberGenerator;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::data::difficulty::{DifficultyTier, TIER_PRIORITY};
use crate::data::{FALLBACK_TITLE, Song, dedup_by_key, find_by_title};
use crate::rng;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChallengeKind {
    Test,
    Decade,
    LongSong,
    Genre,
    Difficulty,
}

impl ChallengeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChallengeKind::Test => "TestChallenge",
            ChallengeKind::Decade => "DecadeChallenge",
            ChallengeKind::LongSong => "LongSongChallenge",
            ChallengeKind::Genre => "GenreChallenge",
            ChallengeKind::Difficulty => "DifficultyChallenge",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub kind: ChallengeKind,
    pub id: String,
    pub name: String,
    pub summary: String,
    pub songs: Vec<Song>,
}

impl Challenge {
    fn new(kind: ChallengeKind, id: String, summary: String, songs: Vec<Song>) -> Self {
        Self {
            kind,
            id,
            name: kind.name().to_string(),
            summary,
            songs,
        }
    }
}

/// Per-act inputs to challenge selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SelectionRules {
    pub pool_size: usize,
    pub min_songs: usize,
    pub long_song_seconds: u32,
    pub picks: usize,
}

impl SelectionRules {
    pub fn new(pool_size: usize) -> Self {
        Self::from_config(&GeneratorConfig::default(), pool_size)
    }

    pub fn from_config(config: &GeneratorConfig, pool_size: usize) -> Self {
        Self {
            pool_size,
            min_songs: config.theme_min_songs,
            long_song_seconds: config.long_song_seconds,
            picks: config.picks_per_challenge,
        }
    }

    fn sample_count(&self, eligible: usize) -> usize {
        self.pool_size.max(1).min(eligible)
    }
}

type ThemeFn = fn(&[Song], &SelectionRules, &mut RandomNumberGenerator) -> Option<Challenge>;

/// Themed constructors. Each declines with `None` when too few songs qualify.
/// Try order is a fresh permutation per call, so table order carries no weight.
pub const THEMES: [(&str, ThemeFn); 4] = [
    ("decade", decade_challenge),
    ("long-song", long_song_challenge),
    ("genre", genre_challenge),
    ("difficulty", difficulty_challenge),
];

pub fn select_challenge(
    songs: &[Song],
    rng: &mut RandomNumberGenerator,
    rules: &SelectionRules,
) -> Challenge {
    for idx in rng::permutation(rng, THEMES.len()) {
        let (theme, build) = THEMES[idx];
        if let Some(challenge) = build(songs, rules, rng) {
            return challenge;
        }
        trace!("{theme} theme declined for {} songs", songs.len());
    }
    debug!(
        "no theme qualified for {} songs, using test challenge",
        songs.len()
    );
    test_challenge(songs, rules, rng)
}

pub fn decade_challenge(
    songs: &[Song],
    rules: &SelectionRules,
    rng: &mut RandomNumberGenerator,
) -> Option<Challenge> {
    let mut by_decade: BTreeMap<u32, Vec<&Song>> = BTreeMap::new();
    for song in songs {
        if let Some(decade) = song.decade() {
            by_decade.entry(decade).or_default().push(song);
        }
    }
    let (decade, pool) = pick_bucket(by_decade, rules.min_songs, rng)?;
    let selected = sample(&pool, rules.sample_count(pool.len()), rng);
    let summary = format!(
        "Pick any {} of these {} tracks from the {decade}s.",
        rules.picks,
        selected.len()
    );
    Some(Challenge::new(
        ChallengeKind::Decade,
        format!("decade-{decade}"),
        summary,
        selected,
    ))
}

pub fn long_song_challenge(
    songs: &[Song],
    rules: &SelectionRules,
    rng: &mut RandomNumberGenerator,
) -> Option<Challenge> {
    let pool = dedup_by_key(
        songs
            .iter()
            .filter(|song| song.seconds > rules.long_song_seconds),
    );
    if pool.len() < rules.min_songs {
        return None;
    }
    let selected = sample(&pool, rules.sample_count(pool.len()), rng);
    let summary = format!(
        "Pick any {} of these {} long tracks (over {} minutes).",
        rules.picks,
        selected.len(),
        rules.long_song_seconds / 60
    );
    Some(Challenge::new(
        ChallengeKind::LongSong,
        "long-song".to_string(),
        summary,
        selected,
    ))
}

pub fn genre_challenge(
    songs: &[Song],
    rules: &SelectionRules,
    rng: &mut RandomNumberGenerator,
) -> Option<Challenge> {
    let mut by_genre: BTreeMap<String, Vec<&Song>> = BTreeMap::new();
    for song in songs {
        if song.genre.is_empty() {
            continue;
        }
        by_genre
            .entry(song.genre.to_lowercase())
            .or_default()
            .push(song);
    }
    let (genre, pool) = pick_bucket(by_genre, rules.min_songs, rng)?;
    let selected = sample(&pool, rules.sample_count(pool.len()), rng);
    let summary = format!(
        "Pick any {} of these {} {} tracks.",
        rules.picks,
        selected.len(),
        title_case(&genre)
    );
    Some(Challenge::new(
        ChallengeKind::Genre,
        format!("genre-{genre}"),
        summary,
        selected,
    ))
}

pub fn difficulty_challenge(
    songs: &[Song],
    rules: &SelectionRules,
    rng: &mut RandomNumberGenerator,
) -> Option<Challenge> {
    let mut by_tier: BTreeMap<DifficultyTier, Vec<&Song>> = BTreeMap::new();
    for song in songs {
        let tier = DifficultyTier::for_difficulty(song.clamped_difficulty());
        by_tier.entry(tier).or_default().push(song);
    }
    let (tier, pool) = TIER_PRIORITY.iter().find_map(|tier| {
        by_tier
            .remove(tier)
            .map(dedup_by_key)
            .filter(|pool| pool.len() >= rules.min_songs)
            .map(|pool| (*tier, pool))
    })?;
    let selected = sample(&pool, rules.sample_count(pool.len()), rng);
    let summary = format!(
        "Pick any {} of these {} {} tracks.",
        rules.picks,
        selected.len(),
        tier.as_str()
    );
    Some(Challenge::new(
        ChallengeKind::Difficulty,
        format!("difficulty-{}", tier.as_str()),
        summary,
        selected,
    ))
}

/// Fallback when no theme qualifies. Anchored on "Eye of the Tiger" when the
/// catalog has it, otherwise on the first candidate or the built-in song.
pub fn test_challenge(
    songs: &[Song],
    rules: &SelectionRules,
    rng: &mut RandomNumberGenerator,
) -> Challenge {
    let builtin = [Song::builtin()];
    let candidates: &[Song] = if songs.is_empty() { &builtin } else { songs };
    let anchor = find_by_title(candidates, FALLBACK_TITLE).unwrap_or(&candidates[0]);
    let summary = if anchor.title.is_empty() || anchor.artist.is_empty() {
        format!("Play \"{FALLBACK_TITLE}\" to push through this encounter.")
    } else {
        format!(
            "Play \"{}\" by {} to push through this encounter.",
            anchor.title, anchor.artist
        )
    };
    let pool: Vec<&Song> = candidates.iter().collect();
    let selected = sample(&pool, rules.sample_count(pool.len()), rng);
    Challenge::new(
        ChallengeKind::Test,
        "test-challenge".to_string(),
        summary,
        selected,
    )
}

/// Uniform pick among buckets holding at least `min_songs` distinct songs.
fn pick_bucket<'a, K: Ord>(
    buckets: BTreeMap<K, Vec<&'a Song>>,
    min_songs: usize,
    rng: &mut RandomNumberGenerator,
) -> Option<(K, Vec<&'a Song>)> {
    let mut eligible: Vec<(K, Vec<&'a Song>)> = buckets
        .into_iter()
        .map(|(key, pool)| (key, dedup_by_key(pool)))
        .filter(|(_, pool)| pool.len() >= min_songs)
        .collect();
    if eligible.is_empty() {
        return None;
    }
    let idx = rng::below(rng, eligible.len());
    Some(eligible.swap_remove(idx))
}

/// Up to `count` songs, distinct by identity. A pool that already fits is
/// returned in order without touching the stream.
pub fn sample(pool: &[&Song], count: usize, rng: &mut RandomNumberGenerator) -> Vec<Song> {
    let unique = dedup_by_key(pool.iter().copied());
    if unique.len() <= count {
        return unique.into_iter().cloned().collect();
    }
    rng::permutation(rng, unique.len())
        .into_iter()
        .take(count)
        .map(|idx| unique[idx].clone())
        .collect()
}

fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut boundary = true;
    for ch in value.chars() {
        if boundary {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        boundary = !ch.is_alphanumeric() && ch != '\'';
    }
    out
}
