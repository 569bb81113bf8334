/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Tuned evaluation weights.
//!
//! Every value here is a `(middlegame, endgame)` pair unless noted otherwise.
//! Penalties are stored as positive numbers and subtracted by the evaluator.

use crate::{PieceKind, TaperedScore};

/// Shorthand for [`TaperedScore::new`], to keep the tables below readable.
const fn s(mg: i32, eg: i32) -> TaperedScore {
    TaperedScore::new(mg, eg)
}

/// Material value of each piece kind. The King has none.
///
/// Values are taken from [PeSTO](https://www.chessprogramming.org/PeSTO%27s_Evaluation_Function).
pub const PIECE_VALUES: [TaperedScore; PieceKind::COUNT] = [
    s(82, 94),
    s(337, 281),
    s(365, 297),
    s(477, 512),
    s(1025, 936),
    s(0, 0),
];

/// Bonus for the side to move, in centipawns.
pub const TEMPO: i32 = 18;

/// Non-pawn middlegame material of one side in the starting position.
pub const MAX_NON_PAWN_MATERIAL: i32 = 2 * PIECE_VALUES[1].mg
    + 2 * PIECE_VALUES[2].mg
    + 2 * PIECE_VALUES[3].mg
    + PIECE_VALUES[4].mg;

/* Imbalance */
pub const BISHOP_PAIR: TaperedScore = s(30, 55);
/// Per rook, per pawn missing from its own side.
pub const ROOK_PAWN_BONUS: TaperedScore = s(1, 3);
/// Per knight, per pawn missing from its own side.
pub const KNIGHT_PAWN_PENALTY: TaperedScore = s(2, 3);

/* Pawns */
/// Indexed by the pawn's rank, relative to its owner.
#[rustfmt::skip]
pub const PASSED_PAWN_BONUS: [TaperedScore; 8] = [
    s(0, 0), s(2, 8), s(4, 12), s(8, 20), s(20, 40), s(40, 70), s(70, 110), s(0, 0),
];
/// Per file holding more than one of a side's pawns.
pub const DOUBLED_PAWN_PENALTY: TaperedScore = s(10, 20);
pub const ISOLATED_PAWN_PENALTY: TaperedScore = s(8, 12);

/* Space */
/// Per space point.
pub const SPACE_WEIGHT: TaperedScore = s(2, 1);

/* Mobility, indexed by the number of squares attacked that are not occupied by friendly pieces */
#[rustfmt::skip]
pub const KNIGHT_MOBILITY: [TaperedScore; 9] = [
    s(-31, -40), s(-26, -28), s(-6, -15), s(-2, -7), s(1, 4), s(6, 7), s(11, 11), s(14, 13),
    s(16, 16),
];

#[rustfmt::skip]
pub const BISHOP_MOBILITY: [TaperedScore; 14] = [
    s(-24, -29), s(-10, -11), s(8, -1), s(13, 6), s(19, 12), s(25, 21), s(27, 27), s(31, 28),
    s(31, 32), s(34, 36), s(40, 39), s(40, 43), s(45, 44), s(49, 48),
];

#[rustfmt::skip]
pub const ROOK_MOBILITY: [TaperedScore; 15] = [
    s(-29, -38), s(-13, -9), s(-7, 14), s(-5, 27), s(-2, 34), s(-1, 41), s(4, 56), s(8, 59),
    s(15, 66), s(14, 71), s(16, 77), s(19, 82), s(23, 83), s(24, 84), s(29, 85),
];

#[rustfmt::skip]
pub const QUEEN_MOBILITY: [TaperedScore; 28] = [
    s(-19, -18), s(-10, -7), s(1, 4), s(1, 9), s(7, 17), s(11, 27), s(14, 30), s(20, 36),
    s(21, 39), s(24, 46), s(28, 47), s(30, 52), s(30, 56), s(33, 60), s(33, 61), s(35, 63),
    s(35, 66), s(36, 68), s(39, 70), s(44, 71), s(44, 74), s(49, 83), s(51, 85), s(51, 87),
    s(53, 92), s(54, 95), s(56, 103), s(58, 106),
];

/// King-zone attack units per attacked king-ring square, indexed by [`PieceKind`].
pub const KING_ATTACK_UNITS: [i32; PieceKind::COUNT] = [0, 2, 2, 3, 5, 0];

/* Pieces */
/// Per knight or bishop standing on an outpost.
pub const OUTPOST: TaperedScore = s(18, 6);
/// Per outpost a knight or bishop attacks.
pub const REACHABLE_OUTPOST: TaperedScore = s(8, 2);
pub const DEFENDED_KNIGHT: TaperedScore = s(6, 4);
pub const BISHOP_ON_QUEEN: TaperedScore = s(12, 8);
/// Per own pawn a bishop runs into.
pub const BAD_BISHOP_PENALTY: TaperedScore = s(3, 7);
/// Per file holding more than one of a side's rooks.
pub const DOUBLED_ROOKS: TaperedScore = s(15, 10);
pub const ROOK_ON_QUEEN: TaperedScore = s(6, 3);
pub const ROOK_OPEN_FILE: TaperedScore = s(25, 8);
pub const ROOK_SEMI_OPEN_FILE: TaperedScore = s(10, 4);
/// Endgame only. Halved when the rook shares the file but does not see the pawn.
pub const ROOK_BEHIND_PASSER: i32 = 20;
/// Middlegame only, per minor piece still on the back rank.
pub const QUEEN_DEVELOPMENT_PENALTY: i32 = 6;

/// Bonus for a piece that attacks the enemy king ring, indexed by [`PieceKind`].
pub const KING_RING_ATTACK: [TaperedScore; PieceKind::COUNT] = [
    s(0, 0),
    s(8, 0),
    s(12, 2),
    s(10, 0),
    s(5, 0),
    s(0, 0),
];

/* King safety */
/// Middlegame only, for each file next to (or under) the king without any friendly pawns.
pub const KING_OPEN_FILE_PENALTY: i32 = 30;
/// Middlegame only, for each file next to (or under) the king with friendly pawns but no enemy pawns.
pub const KING_SEMI_OPEN_FILE_PENALTY: i32 = 15;

/// Middlegame penalty for the king's nearest own pawn on a file, by its relative rank.
pub const SHELTER_PENALTY: [i32; 8] = [0, 0, 8, 20, 32, 40, 44, 0];

/// Middlegame penalty for the nearest enemy pawn on a file, by its rank relative to the defending king.
pub const STORM_PENALTY: [i32; 8] = [0, 30, 40, 25, 10, 5, 0, 0];

/// When no pawns at all are left on the king's flank.
pub const PAWNLESS_FLANK_PENALTY: TaperedScore = s(17, 95);

/// Penalty by accumulated king attack units.
///
/// Taken from <https://www.chessprogramming.org/King_Safety#Attack_Units>.
/// The endgame value is half the middlegame one.
pub const SAFETY_TABLE: [TaperedScore; 100] = {
    #[rustfmt::skip]
    const UNITS: [i32; 100] = [
          0,   0,   1,   2,   3,   5,   7,   9,  12,  15,
         18,  22,  26,  30,  35,  39,  44,  50,  56,  62,
         68,  75,  82,  85,  89,  97, 105, 113, 122, 131,
        140, 150, 169, 180, 191, 202, 213, 225, 237, 248,
        260, 272, 283, 295, 307, 319, 330, 342, 354, 366,
        377, 389, 401, 412, 424, 436, 448, 459, 471, 483,
        494, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    ];

    let mut table = [TaperedScore::ZERO; 100];
    let mut i = 0;
    while i < UNITS.len() {
        table[i] = s(UNITS[i], UNITS[i] / 2);
        i += 1;
    }
    table
};

/// Fetches the mobility bonus for a piece of `kind` attacking `count` safe squares.
///
/// Pawns and Kings have no mobility term.
#[inline(always)]
pub fn mobility_bonus(kind: PieceKind, count: usize) -> TaperedScore {
    let table: &[TaperedScore] = match kind {
        PieceKind::Knight => &KNIGHT_MOBILITY,
        PieceKind::Bishop => &BISHOP_MOBILITY,
        PieceKind::Rook => &ROOK_MOBILITY,
        PieceKind::Queen => &QUEEN_MOBILITY,
        PieceKind::Pawn | PieceKind::King => return TaperedScore::ZERO,
    };
    table[count.min(table.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_material_matches_starting_army() {
        assert_eq!(MAX_NON_PAWN_MATERIAL, 3383);
    }

    #[test]
    fn test_safety_table_is_monotone() {
        for pair in SAFETY_TABLE.windows(2) {
            assert!(pair[0].mg <= pair[1].mg);
            assert!(pair[0].eg <= pair[1].eg);
        }
        assert_eq!(SAFETY_TABLE[99], s(500, 250));
    }

    #[test]
    fn test_mobility_index_is_clamped() {
        assert_eq!(mobility_bonus(PieceKind::Knight, 8), s(16, 16));
        assert_eq!(mobility_bonus(PieceKind::Knight, 20), s(16, 16));
        assert_eq!(mobility_bonus(PieceKind::Queen, 0), QUEEN_MOBILITY[0]);
        assert_eq!(mobility_bonus(PieceKind::King, 5), TaperedScore::ZERO);
    }
}
