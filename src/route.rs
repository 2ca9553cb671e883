//! Cursor over a generated run: which act and row the player is on, and which
//! columns of that row the committed path allows.

use std::collections::BTreeMap;

use crate::map::{Act, Node, Run};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RouteCommand {
    Left,
    Right,
    Advance,
    Back,
    NextAct,
    PrevAct,
    /// Toggle the song at this index of the selected node's challenge.
    ToggleSong(usize),
}

/// Songs a player may pick per node unless told otherwise.
pub const DEFAULT_PICK_LIMIT: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteCursor {
    act: usize,
    row: usize,
    col: usize,
    allowed: Vec<usize>,
    allowed_idx: usize,
    committed: BTreeMap<usize, usize>,
    picked: Vec<usize>,
    committed_picks: BTreeMap<usize, Vec<usize>>,
    pick_limit: usize,
}

impl RouteCursor {
    pub fn new(run: &Run) -> Self {
        Self::with_pick_limit(run, DEFAULT_PICK_LIMIT)
    }

    pub fn with_pick_limit(run: &Run, pick_limit: usize) -> Self {
        let mut cursor = Self {
            pick_limit,
            ..Self::default()
        };
        cursor.reset(run);
        cursor
    }

    pub fn act(&self) -> usize {
        self.act
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn allowed(&self) -> &[usize] {
        &self.allowed
    }

    /// Song indices picked on the selected node, in pick order.
    pub fn picked(&self) -> &[usize] {
        &self.picked
    }

    /// Songs picked on a committed row.
    pub fn picks_for_row(&self, row: usize) -> &[usize] {
        self.committed_picks
            .get(&row)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Committed `(row, col)` pairs in row order.
    pub fn path(&self) -> Vec<(usize, usize)> {
        self.committed.iter().map(|(r, c)| (*r, *c)).collect()
    }

    pub fn current_act<'r>(&self, run: &'r Run) -> Option<&'r Act> {
        run.act(self.act)
    }

    pub fn selected_node<'r>(&self, run: &'r Run) -> Option<&'r Node> {
        self.current_act(run)?.node(self.row, self.col)
    }

    /// Applies one command; returns whether the cursor or its picks changed.
    pub fn apply(&mut self, run: &Run, command: RouteCommand) -> bool {
        let before = (self.act, self.row, self.col);
        match command {
            RouteCommand::Left => self.shift(-1),
            RouteCommand::Right => self.shift(1),
            RouteCommand::Advance => self.advance(run),
            RouteCommand::Back => self.back(run),
            RouteCommand::NextAct => self.switch_act(run, 1),
            RouteCommand::PrevAct => self.switch_act(run, -1),
            RouteCommand::ToggleSong(idx) => return self.toggle_song(run, idx),
        }
        before != (self.act, self.row, self.col)
    }

    /// Back to row 0 of the current act with nothing committed.
    pub fn reset(&mut self, run: &Run) {
        self.act = self.act.min(run.acts.len().saturating_sub(1));
        self.row = 0;
        self.committed.clear();
        self.committed_picks.clear();
        self.refresh_allowed(run);
    }

    fn shift(&mut self, delta: isize) {
        if self.allowed.is_empty() {
            return;
        }
        let last = self.allowed.len() - 1;
        self.allowed_idx = self.allowed_idx.saturating_add_signed(delta).min(last);
        let col = self.allowed[self.allowed_idx];
        if col != self.col {
            self.picked.clear();
        }
        self.col = col;
    }

    fn toggle_song(&mut self, run: &Run, idx: usize) -> bool {
        let Some(node) = self.selected_node(run) else {
            return false;
        };
        if idx >= node.challenge.songs.len() {
            return false;
        }
        if let Some(pos) = self.picked.iter().position(|p| *p == idx) {
            self.picked.remove(pos);
            return true;
        }
        if self.picked.len() >= self.pick_limit {
            return false;
        }
        self.picked.push(idx);
        true
    }

    fn advance(&mut self, run: &Run) {
        let Some(act) = self.current_act(run) else {
            return;
        };
        if self.row + 1 >= act.rows.len() {
            return;
        }
        self.committed.insert(self.row, self.col);
        self.committed_picks
            .insert(self.row, std::mem::take(&mut self.picked));
        self.row += 1;
        self.refresh_allowed(run);
    }

    fn back(&mut self, run: &Run) {
        if self.row == 0 {
            return;
        }
        self.row -= 1;
        let previous = self.committed.remove(&self.row);
        let previous_picks = self.committed_picks.remove(&self.row);
        self.refresh_allowed(run);
        let restored = previous.and_then(|col| self.allowed.iter().position(|c| *c == col));
        if let Some(idx) = restored {
            self.allowed_idx = idx;
            self.col = self.allowed[idx];
            self.picked = previous_picks.unwrap_or_default();
        }
    }

    fn switch_act(&mut self, run: &Run, delta: isize) {
        let last = run.acts.len().saturating_sub(1);
        self.act = self.act.saturating_add_signed(delta).min(last);
        self.reset(run);
    }

    fn refresh_allowed(&mut self, run: &Run) {
        let Some(act) = run.act(self.act) else {
            self.allowed.clear();
            self.allowed_idx = 0;
            self.col = 0;
            self.picked.clear();
            return;
        };
        let targets = match self.row.checked_sub(1) {
            Some(prev_row) => self
                .committed
                .get(&prev_row)
                .map(|col| act.targets_from(prev_row, *col))
                .unwrap_or_default(),
            None => Vec::new(),
        };
        self.allowed = if targets.is_empty() {
            (0..act.width(self.row)).collect()
        } else {
            targets
        };
        self.allowed_idx = 0;
        self.col = self.allowed.first().copied().unwrap_or(0);
        self.picked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Song;
    use crate::map::build_run;

    fn run() -> Run {
        build_run(2024, &[Song::builtin()])
    }

    #[test]
    fn starts_on_first_row_with_every_column_allowed() {
        let run = run();
        let cursor = RouteCursor::new(&run);
        assert_eq!((cursor.act(), cursor.row(), cursor.col()), (0, 0, 0));
        assert_eq!(cursor.allowed().len(), run.acts[0].width(0));
        assert!(cursor.selected_node(&run).is_some());
    }

    #[test]
    fn advance_follows_committed_edges() {
        let run = run();
        let mut cursor = RouteCursor::new(&run);
        cursor.apply(&run, RouteCommand::Right);
        let from = cursor.col();
        assert!(cursor.apply(&run, RouteCommand::Advance));
        assert_eq!(cursor.row(), 1);
        assert_eq!(cursor.allowed(), run.acts[0].targets_from(0, from).as_slice());
        assert_eq!(cursor.path(), vec![(0, from)]);
    }

    #[test]
    fn walking_to_the_end_stays_in_range() {
        let run = run();
        let mut cursor = RouteCursor::new(&run);
        for step in 0..20 {
            if step % 3 == 0 {
                cursor.apply(&run, RouteCommand::Right);
            }
            cursor.apply(&run, RouteCommand::Advance);
            let act = &run.acts[cursor.act()];
            assert!(cursor.col() < act.width(cursor.row()));
        }
        assert_eq!(cursor.row(), 7);
        assert!(!cursor.apply(&run, RouteCommand::Advance));
    }

    #[test]
    fn back_restores_previous_choice() {
        let run = run();
        let mut cursor = RouteCursor::new(&run);
        cursor.apply(&run, RouteCommand::Right);
        let chosen = cursor.col();
        cursor.apply(&run, RouteCommand::Advance);
        assert!(cursor.apply(&run, RouteCommand::Back));
        assert_eq!((cursor.row(), cursor.col()), (0, chosen));
        assert!(cursor.path().is_empty());
        assert!(!cursor.apply(&run, RouteCommand::Back));
    }

    #[test]
    fn horizontal_moves_clamp() {
        let run = run();
        let mut cursor = RouteCursor::new(&run);
        for _ in 0..10 {
            cursor.apply(&run, RouteCommand::Right);
        }
        assert_eq!(cursor.col(), *cursor.allowed().last().unwrap());
        for _ in 0..10 {
            cursor.apply(&run, RouteCommand::Left);
        }
        assert_eq!(cursor.col(), cursor.allowed()[0]);
    }

    #[test]
    fn act_switching_clamps_and_resets() {
        let run = run();
        let mut cursor = RouteCursor::new(&run);
        cursor.apply(&run, RouteCommand::Advance);
        cursor.apply(&run, RouteCommand::PrevAct);
        assert_eq!((cursor.act(), cursor.row()), (0, 0));
        for _ in 0..5 {
            cursor.apply(&run, RouteCommand::NextAct);
        }
        assert_eq!(cursor.act(), 2);
        assert_eq!(cursor.row(), 0);
        assert!(cursor.path().is_empty());
    }

    fn wide_run() -> Run {
        let songs: Vec<Song> = (0..12)
            .map(|i| Song {
                id: format!("s{i}"),
                title: format!("Song {i}"),
                artist: "Band".to_string(),
                year: 1984,
                seconds: 200,
                difficulty: 2,
                ..Song::default()
            })
            .collect();
        build_run(7, &songs)
    }

    #[test]
    fn song_picks_toggle_and_stop_at_limit() {
        let run = wide_run();
        let mut cursor = RouteCursor::new(&run);
        let offered = cursor.selected_node(&run).unwrap().challenge.songs.len();
        assert!(offered > 3);

        assert!(cursor.apply(&run, RouteCommand::ToggleSong(0)));
        assert!(cursor.apply(&run, RouteCommand::ToggleSong(1)));
        assert!(cursor.apply(&run, RouteCommand::ToggleSong(2)));
        assert!(!cursor.apply(&run, RouteCommand::ToggleSong(3)));
        assert_eq!(cursor.picked(), &[0, 1, 2]);

        assert!(cursor.apply(&run, RouteCommand::ToggleSong(1)));
        assert_eq!(cursor.picked(), &[0, 2]);
        assert!(!cursor.apply(&run, RouteCommand::ToggleSong(offered)));
    }

    #[test]
    fn picks_follow_the_committed_row() {
        let run = wide_run();
        let mut cursor = RouteCursor::with_pick_limit(&run, 2);
        cursor.apply(&run, RouteCommand::ToggleSong(1));
        cursor.apply(&run, RouteCommand::Advance);
        assert!(cursor.picked().is_empty());
        assert_eq!(cursor.picks_for_row(0), &[1]);

        cursor.apply(&run, RouteCommand::Back);
        assert_eq!(cursor.picked(), &[1]);
        assert!(cursor.picks_for_row(0).is_empty());
    }

    #[test]
    fn moving_sideways_drops_picks() {
        let run = wide_run();
        let mut cursor = RouteCursor::new(&run);
        cursor.apply(&run, RouteCommand::ToggleSong(0));
        assert!(cursor.apply(&run, RouteCommand::Right));
        assert!(cursor.picked().is_empty());
    }
}
