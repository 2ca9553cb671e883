use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use ::csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};

use crate::data::{InstrumentDifficulty, Song, SongCatalog, clamp_difficulty};
use crate::error::CatalogError;

const HEADER_PREFIX: [&str; 5] = ["id", "title", "artist", "album", "genre"];

/// Positional layout used when the file carries no header row.
const POSITIONAL: [(&str, usize); 8] = [
    ("id", 0),
    ("title", 1),
    ("artist", 2),
    ("album", 3),
    ("genre", 4),
    ("diff_band", 5),
    ("length", 6),
    ("year", 7),
];

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<SongCatalog, CatalogError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_catalog(file, &path.display().to_string())?;
    debug!("loaded {} songs from {}", catalog.len(), path.display());
    Ok(catalog)
}

pub fn parse_catalog<R: Read>(reader: R, source: &str) -> Result<SongCatalog, CatalogError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut columns: Option<Columns> = None;
    let mut seen = HashSet::new();
    let mut songs = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if columns.is_none() {
            if let Some(header) = Columns::detect(&record) {
                columns = Some(header);
                continue;
            }
        }
        let layout = columns.get_or_insert_with(Columns::positional);
        let line = record.position().map_or(0, |pos| pos.line());
        let song = layout.parse(&record, line)?;
        if !seen.insert(song.key()) {
            warn!("{source}:{line}: duplicate song {} skipped", song.key());
            continue;
        }
        songs.push(song);
    }

    if songs.is_empty() {
        return Err(CatalogError::Empty(source.to_string()));
    }
    Ok(SongCatalog::new(songs))
}

struct Columns {
    named: HashMap<String, usize>,
}

impl Columns {
    fn detect(record: &StringRecord) -> Option<Self> {
        if record.len() < HEADER_PREFIX.len() {
            return None;
        }
        let matches = HEADER_PREFIX
            .iter()
            .zip(record.iter())
            .all(|(want, got)| got.eq_ignore_ascii_case(want));
        if !matches {
            return None;
        }
        let named = record
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.to_lowercase(), idx))
            .collect();
        Some(Self { named })
    }

    fn positional() -> Self {
        let named = POSITIONAL
            .iter()
            .map(|(name, idx)| (name.to_string(), *idx))
            .collect();
        Self { named }
    }

    fn get<'r>(&self, record: &'r StringRecord, key: &str) -> &'r str {
        self.named
            .get(key)
            .and_then(|idx| record.get(*idx))
            .unwrap_or("")
    }

    fn parse(&self, record: &StringRecord, line: u64) -> Result<Song, CatalogError> {
        let required = |field: &'static str| {
            let value = self.get(record, field);
            if value.is_empty() {
                Err(CatalogError::MissingField { line, field })
            } else {
                Ok(value.to_string())
            }
        };
        let id = required("id")?;
        let title = required("title")?;
        let artist = required("artist")?;

        let length = self.get(record, "length").to_string();
        let seconds = self
            .get(record, "seconds")
            .parse::<u32>()
            .unwrap_or_else(|_| parse_duration(&length));
        let difficulty = |key: &str| parse_difficulty(self.get(record, key));

        Ok(Song {
            id,
            title,
            artist,
            album: self.get(record, "album").to_string(),
            genre: self.get(record, "genre").to_string(),
            difficulty: difficulty("diff_band"),
            instruments: InstrumentDifficulty {
                guitar: difficulty("diff_guitar"),
                bass: difficulty("diff_bass"),
                drums: difficulty("diff_drums"),
                vocals: difficulty("diff_vocals"),
                keys: difficulty("diff_keys"),
                rhythm: difficulty("diff_rhythm"),
                guitar_coop: difficulty("diff_guitar_coop"),
            },
            length,
            seconds,
            year: self.get(record, "year").parse().unwrap_or(0),
            origin: self.get(record, "origin").to_string(),
        })
    }
}

/// `M:SS` or bare seconds; anything else is 0.
pub fn parse_duration(value: &str) -> u32 {
    if let Ok(seconds) = value.parse::<u32>() {
        return seconds;
    }
    let Some((minutes, seconds)) = value.split_once(':') else {
        return 0;
    };
    match (minutes.trim().parse::<u32>(), seconds.trim().parse::<u32>()) {
        (Ok(m), Ok(s)) => m.checked_mul(60).and_then(|v| v.checked_add(s)).unwrap_or(0),
        _ => 0,
    }
}

pub fn parse_difficulty(value: &str) -> u8 {
    value.parse::<i64>().map_or(0, clamp_difficulty)
}
