pub mod builder;

use bracket_random::prelude::RandomNumberGenerator;
use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::GeneratorConfig;
use crate::data::Song;
use crate::data::challenges::Challenge;
use crate::data::difficulty::filter_for_act;
use crate::error::ConfigError;

pub use builder::{build_act, connect_rows};

/// Column indices into the next row.
pub type Edges = SmallVec<[usize; 2]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Challenge,
}

impl NodeKind {
    pub fn glyph(&self) -> char {
        match self {
            NodeKind::Challenge => 'C',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Challenge => "Challenge",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub col: usize,
    pub kind: NodeKind,
    pub challenge: Challenge,
    pub edges: Edges,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Act {
    /// 1-based.
    pub index: usize,
    pub rows: Vec<Vec<Node>>,
}

impl Act {
    pub fn width(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    /// Node at `(row, col)` with `col` clamped to the row's width.
    pub fn node(&self, row: usize, col: usize) -> Option<&Node> {
        let nodes = self.rows.get(row)?;
        let last = nodes.len().checked_sub(1)?;
        nodes.get(col.min(last))
    }

    /// Columns reachable in `row + 1` from `(row, col)`.
    ///
    /// Edge targets are only meaningful against the destination row's width,
    /// so both the source column and every target are clamped here. Duplicates
    /// produced by clamping are collapsed, first occurrence kept.
    pub fn targets_from(&self, row: usize, col: usize) -> Vec<usize> {
        let next_width = self.width(row + 1);
        let Some(node) = self.node(row, col) else {
            return Vec::new();
        };
        if next_width == 0 {
            return Vec::new();
        }
        let mut targets = Vec::with_capacity(node.edges.len());
        for &edge in &node.edges {
            let target = edge.min(next_width - 1);
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        targets
    }

    pub fn has_incoming(&self, row: usize, col: usize) -> bool {
        row > 0
            && self.rows.get(row - 1).is_some_and(|prev| {
                prev.iter().any(|node| node.edges.contains(&col))
            })
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.rows.iter().flatten()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub seed: u64,
    pub acts: Vec<Act>,
}

impl Run {
    /// Three acts from `seed` with the default layout.
    pub fn generate(seed: u64, catalog: &[Song]) -> Self {
        RunGenerator::default().generate(seed, catalog)
    }

    pub fn act(&self, idx: usize) -> Option<&Act> {
        self.acts.get(idx)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn build_run(seed: u64, catalog: &[Song]) -> Run {
    Run::generate(seed, catalog)
}

#[derive(Clone, Debug, Default)]
pub struct RunGenerator {
    config: GeneratorConfig,
}

impl RunGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Acts are built in order from one stream; the draw order across acts is
    /// part of what makes a seed reproducible.
    pub fn generate(&self, seed: u64, catalog: &[Song]) -> Run {
        let mut rng = RandomNumberGenerator::seeded(seed);
        let acts = (1..=self.config.acts)
            .map(|index| {
                let songs = filter_for_act(index, catalog);
                debug!(
                    "act {index}: {} of {} songs in band",
                    songs.len(),
                    catalog.len()
                );
                build_act(index, &mut rng, &songs, &self.config)
            })
            .collect();
        Run { seed, acts }
    }
}
