use bracket_random::prelude::RandomNumberGenerator;
use log::debug;

use crate::config::GeneratorConfig;
use crate::data::Song;
use crate::data::challenges::{SelectionRules, select_challenge};
use crate::data::difficulty::pick_pool_size;
use crate::map::{Act, Edges, Node, NodeKind};
use crate::rng;

/// Lays out one act.
///
/// Draw order: pool size once, then per row the width, each node's challenge
/// left to right, and finally the edges from the previous row.
pub fn build_act(
    index: usize,
    rng: &mut RandomNumberGenerator,
    songs: &[Song],
    config: &GeneratorConfig,
) -> Act {
    let pool_size = pick_pool_size(config.pool_bounds_for_act(index), songs.len(), rng);
    let rules = SelectionRules::from_config(config, pool_size);
    debug!("act {index}: pool size {pool_size}");

    let mut rows: Vec<Vec<Node>> = Vec::with_capacity(config.rows_per_act);
    for _ in 0..config.rows_per_act {
        let width = rng::inclusive(rng, config.min_nodes_per_row, config.max_nodes_per_row);
        let nodes: Vec<Node> = (0..width)
            .map(|col| Node {
                col,
                kind: NodeKind::Challenge,
                challenge: select_challenge(songs, rng, &rules),
                edges: Edges::new(),
            })
            .collect();
        if let Some(prev) = rows.last_mut() {
            connect_rows(prev, nodes.len(), rng, config.max_edges_per_node);
        }
        rows.push(nodes);
    }

    Act { index, rows }
}

/// Wires `prev` into a row of `next_width` nodes. Every column of the next row
/// ends up with at least one incoming edge.
pub fn connect_rows(
    prev: &mut [Node],
    next_width: usize,
    rng: &mut RandomNumberGenerator,
    max_edges: usize,
) {
    if prev.is_empty() || next_width == 0 {
        return;
    }
    let mut incoming = vec![0usize; next_width];

    for node in prev.iter_mut() {
        for target in pick_targets(next_width, max_edges, rng) {
            node.edges.push(target);
            incoming[target] += 1;
        }
    }

    for (col, seen) in incoming.iter().enumerate() {
        if *seen == 0 {
            let src = rng::below(rng, prev.len());
            prev[src].edges.push(col);
        }
    }
}

/// 1..=`max_edges` distinct columns, capped by the row width.
fn pick_targets(
    next_width: usize,
    max_edges: usize,
    rng: &mut RandomNumberGenerator,
) -> Edges {
    let count = rng::inclusive(rng, 1, max_edges.max(1)).min(next_width);
    rng::permutation(rng, next_width)
        .into_iter()
        .take(count)
        .collect()
}
