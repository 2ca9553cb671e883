use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Inclusive range of songs offered by one challenge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolBounds {
    pub min: usize,
    pub max: usize,
}

impl PoolBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

/// Shape and selection knobs for run generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub acts: usize,
    pub rows_per_act: usize,
    pub min_nodes_per_row: usize,
    pub max_nodes_per_row: usize,
    pub max_edges_per_node: usize,
    /// One entry per act; acts past the end reuse the last entry.
    pub pool_bounds: Vec<PoolBounds>,
    pub theme_min_songs: usize,
    pub long_song_seconds: u32,
    pub picks_per_challenge: usize,
}

const DEFAULT_POOL_BOUNDS: [PoolBounds; 3] = [
    PoolBounds::new(9, 12),
    PoolBounds::new(6, 9),
    PoolBounds::new(3, 5),
];

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            acts: 3,
            rows_per_act: 8,
            min_nodes_per_row: 2,
            max_nodes_per_row: 5,
            max_edges_per_node: 2,
            pool_bounds: DEFAULT_POOL_BOUNDS.to_vec(),
            theme_min_songs: 3,
            long_song_seconds: 300,
            picks_per_challenge: 3,
        }
    }
}

impl GeneratorConfig {
    /// Loads config from a JSON file, falling back to defaults when the file
    /// does not exist. The result is validated either way.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("acts", self.acts, 1)?;
        at_least("rows_per_act", self.rows_per_act, 1)?;
        at_least("min_nodes_per_row", self.min_nodes_per_row, 1)?;
        at_least("max_edges_per_node", self.max_edges_per_node, 1)?;
        at_least("pool_bounds", self.pool_bounds.len(), 1)?;
        at_least("theme_min_songs", self.theme_min_songs, 1)?;
        ordered(
            "nodes_per_row",
            self.min_nodes_per_row,
            self.max_nodes_per_row,
        )?;
        for bounds in &self.pool_bounds {
            at_least("pool_bounds.min", bounds.min, 1)?;
            ordered("pool_bounds", bounds.min, bounds.max)?;
        }
        Ok(())
    }

    /// Pool bounds for a 1-based act index. An empty list falls back to the
    /// default bounds.
    pub fn pool_bounds_for_act(&self, act_index: usize) -> PoolBounds {
        let idx = act_index.saturating_sub(1);
        self.pool_bounds
            .get(idx)
            .or_else(|| self.pool_bounds.last())
            .copied()
            .unwrap_or(DEFAULT_POOL_BOUNDS[idx.min(DEFAULT_POOL_BOUNDS.len() - 1)])
    }
}

fn at_least(field: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::TooSmall { field, min, value });
    }
    Ok(())
}

fn ordered(field: &'static str, min: usize, max: usize) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}
