/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    thread,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context, Result};
use log::{debug, trace};

use crate::{evaluate, history_bonus, history_malus, tune, Color, HistoryTable, Move, Position, Score, Table};

/// Maximum number of plies any search thread keeps statistics for.
pub const MAX_PLY: usize = tune::max_ply!();

/// Search-control block for a single search thread.
///
/// Limits are set by whoever starts the search; counters and flags are updated by the search itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchInfo {
    /// When the search started.
    pub starttime: Instant,

    /// When the search must stop, if it is timed.
    pub stoptime: Option<Instant>,

    /// Maximum depth to search to.
    pub depth: usize,

    /// Whether `depth` was requested explicitly, rather than left at its default.
    pub depth_set: bool,

    /// Deepest ply reached so far, including quiescence.
    pub seldepth: usize,

    /// Moves left until the next time control, if known.
    pub movestogo: Option<u32>,

    /// Search until told to stop.
    pub infinite: bool,

    /// Nodes visited so far.
    pub nodes: u64,

    /// Set when the current search must be abandoned.
    pub stopped: bool,

    /// Set when the engine is shutting down.
    pub quit: bool,

    /// Number of beta cutoffs.
    pub fail_high: u64,

    /// Number of beta cutoffs produced by the first move searched.
    pub fail_high_first: u64,
}

impl SearchInfo {
    /// Resets the per-search counters and flags, and restarts the clock.
    ///
    /// Limits (`stoptime`, `depth`, `movestogo`, `infinite`) and the `quit` flag are kept.
    pub fn clear(&mut self) {
        self.starttime = Instant::now();
        self.seldepth = 0;
        self.nodes = 0;
        self.stopped = false;
        self.fail_high = 0;
        self.fail_high_first = 0;
    }

    /// Sets a time limit of `duration`, counted from `starttime`.
    #[inline(always)]
    pub fn set_movetime(&mut self, duration: Duration) {
        self.stoptime = Some(self.starttime + duration);
    }

    /// Sets a depth limit.
    #[inline(always)]
    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth.min(MAX_PLY);
        self.depth_set = true;
    }

    /// Whether the time limit, if any, has passed at `now`.
    #[inline(always)]
    pub fn is_time_up(&self, now: Instant) -> bool {
        !self.infinite && self.stoptime.is_some_and(|stop| now >= stop)
    }

    /// Fraction of cutoffs produced by the first move tried, a measure of move ordering quality.
    #[inline(always)]
    pub fn move_ordering(&self) -> Option<f32> {
        (self.fail_high > 0).then(|| self.fail_high_first as f32 / self.fail_high as f32)
    }
}

impl Default for SearchInfo {
    /// A default [`SearchInfo`] allows a search as deep as [`MAX_PLY`] with no time limit.
    fn default() -> Self {
        Self {
            starttime: Instant::now(),
            stoptime: None,
            depth: MAX_PLY,
            depth_set: false,
            seldepth: 0,
            movestogo: None,
            infinite: false,
            nodes: 0,
            stopped: false,
            quit: false,
            fail_high: 0,
            fail_high_first: 0,
        }
    }
}

/// Move ordering and pruning statistics owned by a single search thread.
#[derive(Debug, Clone)]
pub struct MoveStats {
    /// Move played to reach each ply.
    pub moves_path: [Option<Move>; MAX_PLY + 1],

    /// Best reply found to a move, indexed by that move's `from` and `to` squares.
    pub counter_moves: Table<Table<Option<Move>>>,

    /// History heuristic scores.
    pub history: HistoryTable,

    /// Quiet moves that caused a cutoff at each ply, most recent first.
    pub killers: [[Option<Move>; 2]; MAX_PLY + 1],

    /// Static evaluation of the position at each ply.
    pub static_eval: [Score; MAX_PLY + 1],
}

impl Default for MoveStats {
    fn default() -> Self {
        Self {
            moves_path: [None; MAX_PLY + 1],
            counter_moves: Table::splat(Table::splat(None)),
            history: HistoryTable::default(),
            killers: [[None; 2]; MAX_PLY + 1],
            static_eval: [Score::DRAW; MAX_PLY + 1],
        }
    }
}

/// Everything a single search thread owns.
///
/// No part of this is ever shared with another thread.
#[derive(Debug, Clone)]
pub struct SearchThread {
    /// Index of this thread in its [`ThreadPool`].
    id: usize,

    /// This thread's private copy of the position being searched.
    pub position: Position,

    /// This thread's search-control block.
    pub info: SearchInfo,

    /// Boxed, since the tables are too large to move around on the stack.
    stats: Box<MoveStats>,
}

impl SearchThread {
    /// Creates a new thread context with empty statistics, searching the starting position.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            position: Position::default(),
            info: SearchInfo::default(),
            stats: Box::default(),
        }
    }

    /// Index of this thread in its pool.
    #[inline(always)]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Read-only access to all of this thread's statistics.
    #[inline(always)]
    pub fn stats(&self) -> &MoveStats {
        &self.stats
    }

    /// Evaluates this thread's position from the side-to-move's perspective.
    #[inline(always)]
    pub fn evaluate(&self) -> Score {
        evaluate(&self.position)
    }

    /// Records `mv` as the newest killer move at `ply`.
    ///
    /// The previous first killer moves to the second slot, unless `mv` already is the first killer.
    pub fn record_killer(&mut self, ply: usize, mv: Move) {
        debug_assert!(ply <= MAX_PLY, "Ply {ply} exceeds the maximum of {MAX_PLY}");
        let Some(killers) = self.stats.killers.get_mut(ply) else {
            return;
        };

        if killers[0] != Some(mv) {
            killers[1] = killers[0];
            killers[0] = Some(mv);
        }
    }

    /// Killer moves at `ply`, most recent first.
    #[inline(always)]
    pub fn killers(&self, ply: usize) -> [Option<Move>; 2] {
        self.stats.killers.get(ply).copied().unwrap_or_default()
    }

    /// Returns `true` if `mv` is one of the killer moves at `ply`.
    #[inline(always)]
    pub fn is_killer(&self, ply: usize, mv: Move) -> bool {
        self.killers(ply).contains(&Some(mv))
    }

    /// Records `mv` as the move played to reach `ply + 1` from `ply`.
    #[inline(always)]
    pub fn record_move(&mut self, ply: usize, mv: Move) {
        debug_assert!(ply <= MAX_PLY, "Ply {ply} exceeds the maximum of {MAX_PLY}");
        if let Some(slot) = self.stats.moves_path.get_mut(ply) {
            *slot = Some(mv);
        }
    }

    /// Updates the history and countermove tables after `best` caused a cutoff at `ply`.
    ///
    /// `best` is rewarded according to `depth`, and every other move in `quiets` (the quiet moves
    /// searched before it) is penalized by a smaller amount. The move that led to this ply is
    /// then refuted by `best` in the countermove table.
    pub fn update_move_heuristics(&mut self, ply: usize, best: Move, depth: usize, quiets: &[Move]) {
        let color = self.position.side_to_move();
        let bonus = history_bonus(depth);
        let malus = history_malus(depth);

        self.stats.history.update(color, best, bonus);
        for &mv in quiets.iter().filter(|&&mv| mv != best) {
            self.stats.history.update(color, mv, -malus);
        }

        if let Some(prev) = ply
            .checked_sub(1)
            .and_then(|parent| self.stats.moves_path.get(parent).copied().flatten())
        {
            self.stats.counter_moves[prev.from()][prev.to()] = Some(best);
        }
    }

    /// History score of `mv` when played by `color`.
    #[inline(always)]
    pub fn history_score(&self, color: Color, mv: Move) -> i16 {
        self.stats.history.get(color, mv)
    }

    /// The recorded refutation of the move that led to `ply`, if any.
    #[inline(always)]
    pub fn counter_move(&self, ply: usize) -> Option<Move> {
        let prev = self.stats.moves_path.get(ply.checked_sub(1)?).copied().flatten()?;
        self.stats.counter_moves[prev.from()][prev.to()]
    }

    /// Caches the static evaluation of the position at `ply`.
    #[inline(always)]
    pub fn set_static_eval(&mut self, ply: usize, score: Score) {
        debug_assert!(ply <= MAX_PLY, "Ply {ply} exceeds the maximum of {MAX_PLY}");
        if let Some(slot) = self.stats.static_eval.get_mut(ply) {
            *slot = score;
        }
    }

    /// Returns `true` if the static evaluation at `ply` is better than it was on our previous move.
    #[inline(always)]
    pub fn is_improving(&self, ply: usize) -> bool {
        match (ply.checked_sub(2), self.stats.static_eval.get(ply)) {
            (Some(earlier), Some(&now)) => now > self.stats.static_eval[earlier],
            _ => false,
        }
    }

    /// Resets the killer, countermove, and history tables.
    ///
    /// Meant to be called when a new search starts, never between plies of the same search.
    pub fn clear_move_heuristics(&mut self) {
        trace!("Clearing move heuristics of search thread {}", self.id);
        self.stats.killers = [[None; 2]; MAX_PLY + 1];
        self.stats.counter_moves = Table::splat(Table::splat(None));
        self.stats.history.clear();
    }
}

/// A fixed set of [`SearchThread`]s, allocated once.
#[derive(Debug)]
pub struct ThreadPool {
    threads: Vec<SearchThread>,
}

impl ThreadPool {
    /// Allocates `count` independent search threads.
    ///
    /// Fails only if the memory for them cannot be reserved.
    pub fn new(count: usize) -> Result<Self> {
        let mut threads = Vec::new();
        threads
            .try_reserve_exact(count)
            .with_context(|| format!("Failed to allocate {count} search threads"))?;

        threads.extend((0..count).map(SearchThread::new));
        debug!("Allocated a pool of {count} search threads");

        Ok(Self { threads })
    }

    /// The thread at `index`, or `None` if `index` is out of range.
    #[inline(always)]
    pub fn at(&self, index: usize) -> Option<&SearchThread> {
        self.threads.get(index)
    }

    /// Mutable access to the thread at `index`, or `None` if `index` is out of range.
    #[inline(always)]
    pub fn at_mut(&mut self, index: usize) -> Option<&mut SearchThread> {
        self.threads.get_mut(index)
    }

    /// Number of threads in this pool.
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.threads.len()
    }

    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, SearchThread> {
        self.threads.iter()
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, SearchThread> {
        self.threads.iter_mut()
    }

    /// Prepares every thread for a new search of `position`, limited by `info`.
    ///
    /// Each thread receives its own copy of both and has its statistics wiped.
    pub fn init_threads(&mut self, position: &Position, info: &SearchInfo) {
        debug!(
            "Initializing {} search threads on {}",
            self.threads.len(),
            position.to_fen()
        );

        for thread in &mut self.threads {
            thread.position = *position;
            thread.info = *info;
            thread.clear_move_heuristics();
            thread.stats.moves_path = [None; MAX_PLY + 1];
            thread.stats.static_eval = [Score::DRAW; MAX_PLY + 1];
        }
    }

    /// Runs `f` on every thread of this pool, each on its own OS thread.
    ///
    /// Results are returned in the same order as the threads in this pool.
    pub fn run<F, R>(&mut self, f: F) -> Result<Vec<R>>
    where
        F: Fn(&mut SearchThread) -> R + Sync,
        R: Send,
    {
        let f = &f;

        thread::scope(|scope| -> Result<Vec<R>> {
            let handles = self
                .threads
                .iter_mut()
                .map(|worker| {
                    let name = format!("search-{}", worker.id());
                    thread::Builder::new()
                        .name(name.clone())
                        .spawn_scoped(scope, move || f(worker))
                        .with_context(|| format!("Failed to spawn thread {name:?}"))
                })
                .collect::<Result<Vec<_>>>()?;

            // Every handle is joined before any failure is reported
            let joined = handles.into_iter().map(|handle| handle.join()).collect::<Vec<_>>();

            joined
                .into_iter()
                .enumerate()
                .map(|(id, res)| res.map_err(|_| anyhow!("Search thread {id} panicked")))
                .collect()
        })
    }
}
