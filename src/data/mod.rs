pub mod challenges;
pub mod difficulty;
pub mod loader;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub const MAX_DIFFICULTY: u8 = 6;
pub const FALLBACK_TITLE: &str = "Eye of the Tiger";

pub fn clamp_difficulty(value: i64) -> u8 {
    value.clamp(0, MAX_DIFFICULTY as i64) as u8
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentDifficulty {
    pub guitar: u8,
    pub bass: u8,
    pub drums: u8,
    pub vocals: u8,
    pub keys: u8,
    pub rhythm: u8,
    pub guitar_coop: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub difficulty: u8,
    #[serde(default)]
    pub instruments: InstrumentDifficulty,
    pub length: String,
    pub seconds: u32,
    /// Release year; 0 means unknown.
    pub year: u32,
    #[serde(default)]
    pub origin: String,
}

impl Song {
    /// Identity used for deduplication: the id, or title and artist when the id is blank.
    pub fn key(&self) -> String {
        if self.id.is_empty() {
            format!("{}|{}", self.title, self.artist)
        } else {
            self.id.clone()
        }
    }

    pub fn clamped_difficulty(&self) -> u8 {
        self.difficulty.min(MAX_DIFFICULTY)
    }

    /// `floor(year / 10) * 10`, or `None` for an unknown year.
    pub fn decade(&self) -> Option<u32> {
        if self.year == 0 {
            None
        } else {
            Some(self.year / 10 * 10)
        }
    }

    pub fn builtin() -> Self {
        Self {
            id: "song-001".to_string(),
            title: FALLBACK_TITLE.to_string(),
            artist: "Survivor".to_string(),
            album: FALLBACK_TITLE.to_string(),
            genre: "Rock".to_string(),
            difficulty: 3,
            instruments: InstrumentDifficulty::default(),
            length: "4:05".to_string(),
            seconds: 245,
            year: 1982,
            origin: String::new(),
        }
    }
}

pub fn find_by_title<'a>(songs: &'a [Song], title: &str) -> Option<&'a Song> {
    songs
        .iter()
        .find(|song| song.title.eq_ignore_ascii_case(title))
}

/// Keeps the first song for every identity, preserving order.
pub fn dedup_by_key<'a, I>(songs: I) -> Vec<&'a Song>
where
    I: IntoIterator<Item = &'a Song>,
{
    let mut seen = HashSet::new();
    songs
        .into_iter()
        .filter(|song| seen.insert(song.key()))
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongCatalog {
    pub songs: Vec<Song>,
}

impl SongCatalog {
    pub fn new(songs: Vec<Song>) -> Self {
        Self { songs }
    }

    /// The single built-in song, used when no catalog file is supplied.
    pub fn builtin() -> Self {
        Self::new(vec![Song::builtin()])
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn with_origin(&self, origin: &str) -> Self {
        let songs = self
            .songs
            .iter()
            .filter(|song| song.origin.eq_ignore_ascii_case(origin))
            .cloned()
            .collect();
        Self::new(songs)
    }

    /// Distinct origins in first-seen order, skipping blanks.
    pub fn origins(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.songs
            .iter()
            .filter(|song| !song.origin.is_empty())
            .filter(|song| seen.insert(song.origin.to_lowercase()))
            .map(|song| song.origin.clone())
            .collect()
    }
}
