/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{tune, Color, Move, Table};

/// Computes the history bonus for a cutoff found at `depth`.
///
/// Deeper cutoffs are rewarded more, up to [`tune::max_history_bonus`].
///
/// # Example
/// ```
/// # use newt::history_bonus;
/// assert_eq!(history_bonus(1), 50);
/// assert_eq!(history_bonus(4), 950);
/// assert_eq!(history_bonus(100), 16_384);
/// ```
#[inline(always)]
pub fn history_bonus(depth: usize) -> i16 {
    let depth = depth.min(tune::max_ply!()) as i32;
    let bonus = tune::history_multiplier!() * depth - tune::history_offset!();
    bonus.clamp(0, tune::max_history_bonus!()) as i16
}

/// Computes the penalty applied to quiet moves that were searched but did not cause a cutoff at `depth`.
#[inline(always)]
pub fn history_malus(depth: usize) -> i16 {
    history_bonus(depth) / tune::history_malus_divisor!()
}

/// Stores bonuses and penalties for moving from one square to another, for each side.
///
/// Used to keep track of good/bad quiet moves found during search.
#[derive(Debug, Clone)]
pub struct HistoryTable([Table<Table<i16>>; Color::COUNT]);

impl HistoryTable {
    /// Clear the history table, removing all scores.
    #[inline(always)]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Fetches the score of `mv` when played by `color`.
    #[inline(always)]
    pub fn get(&self, color: Color, mv: Move) -> i16 {
        self.0[color][mv.from()][mv.to()]
    }

    /// Applies a bonus (or a penalty, if negative) to `mv` when played by `color`.
    ///
    /// Uses the "history gravity" formula from <https://www.chessprogramming.org/History_Heuristic#History_Bonuses>,
    /// which keeps every score within `[-max, max]`.
    #[inline(always)]
    pub fn update(&mut self, color: Color, mv: Move, bonus: i16) {
        let current = self.get(color, mv) as i32;

        let max = tune::max_history_bonus!();
        let clamped = (bonus as i32).clamp(-max, max);

        let new = current + clamped - current * clamped.abs() / max;

        self.0[color][mv.from()].set(mv.to(), new as i16);
    }
}

impl Default for HistoryTable {
    #[inline(always)]
    fn default() -> Self {
        Self([Table::splat(Table::splat(0)); Color::COUNT])
    }
}

impl fmt::Display for HistoryTable {
    /// Prints, for each side, the best score of any move leaving each square.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in Color::all() {
            let best = Table::from_fn(|from| {
                self.0[color][from]
                    .iter()
                    .copied()
                    .max_by_key(|score| score.abs())
                    .unwrap_or_default()
            });
            writeln!(f, "{}:", color.name())?;
            writeln!(f, "{best:>6}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Square;

    #[test]
    fn test_bonus_grows_with_depth() {
        let bonuses = (1..20).map(history_bonus).collect::<Vec<_>>();
        assert!(bonuses.windows(2).all(|w| w[0] <= w[1]), "{bonuses:?}");
        assert_eq!(history_bonus(0), 0, "bonuses are never negative");
        assert_eq!(history_malus(4), 475);
    }

    #[test]
    fn test_update_is_per_color_and_per_move() {
        let mut history = HistoryTable::default();
        let mv = Move::new(Square::G1, Square::F3);

        history.update(Color::White, mv, 500);
        assert_eq!(history.get(Color::White, mv), 500);
        assert_eq!(history.get(Color::Black, mv), 0);
        assert_eq!(history.get(Color::White, Move::new(Square::F3, Square::G1)), 0);
    }

    #[test]
    fn test_gravity_bounds_scores() {
        let mut history = HistoryTable::default();
        let mv = Move::new(Square::E2, Square::E4);
        let max = tune::max_history_bonus!() as i16;

        for _ in 0..1_000 {
            history.update(Color::White, mv, max);
        }
        assert_eq!(history.get(Color::White, mv), max);

        for _ in 0..1_000 {
            history.update(Color::White, mv, -max);
        }
        assert_eq!(history.get(Color::White, mv), -max);

        history.clear();
        assert_eq!(history.get(Color::White, mv), 0);
    }

    #[test]
    fn test_gravity_dampens_repeated_bonuses() {
        let mut history = HistoryTable::default();
        let mv = Move::new(Square::B1, Square::C3);

        history.update(Color::Black, mv, 1000);
        history.update(Color::Black, mv, 1000);
        // 1000 + 1000 - 1000 * 1000 / 16384
        assert_eq!(history.get(Color::Black, mv), 1939);
    }
}
