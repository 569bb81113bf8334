/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{Bitboard, Board, Color, File, PieceKind, TaperedScore};

use super::{
    material::non_pawn_material, EvalState, Term, KING_FLANKS, KING_OPEN_FILE_PENALTY,
    KING_SEMI_OPEN_FILE_PENALTY, MAX_NON_PAWN_MATERIAL, PAWNLESS_FLANK_PENALTY, SAFETY_TABLE,
    SHELTER_PENALTY, STORM_PENALTY,
};

/// Middlegame penalty for the pawn cover of `color`'s king, before any scaling.
///
/// Looks at the king's file and its neighbors.
fn shelter(board: &Board, color: Color) -> i32 {
    let them = color.opponent();
    let ours = board.pawns(color);
    let theirs = board.pawns(them);
    let king_file = board.king_square(color).file().index();

    let mut mg = 0;

    for f in king_file.saturating_sub(1)..=(king_file + 1).min(7) {
        let file = Bitboard::from_file(File::new_unchecked(f as u8));
        let our_file_pawns = ours & file;
        let their_file_pawns = theirs & file;

        if our_file_pawns.is_empty() {
            mg -= KING_OPEN_FILE_PENALTY;
        } else if their_file_pawns.is_empty() {
            mg -= KING_SEMI_OPEN_FILE_PENALTY;
        }

        // The pawns nearest to our own back rank
        let our_pawn = our_file_pawns.frontmost(them);
        let their_pawn = their_file_pawns.frontmost(them);

        let mut file_score = 0;
        if let Some(sq) = our_pawn {
            file_score -= SHELTER_PENALTY[sq.rank().relative_to(color).index()];
        }
        if let Some(sq) = their_pawn {
            file_score -= STORM_PENALTY[sq.rank().relative_to(color).index()];
        }

        // Pawns ramming into each other
        if let (Some(ours), Some(theirs)) = (our_pawn, their_pawn) {
            if ours.distance_ranks(theirs) == 1 {
                file_score /= 2;
            }
        }

        mg += file_score;
    }

    mg
}

/// Scales `value` by `material / MAX_NON_PAWN_MATERIAL`, rounding half away from zero.
fn scale_by_material(value: i32, material: i32) -> i32 {
    let scaled = value * material;
    (2 * scaled + scaled.signum() * MAX_NON_PAWN_MATERIAL) / (2 * MAX_NON_PAWN_MATERIAL)
}

/// King safety for `color`.
///
/// Requires mobility to have been evaluated for both sides, since that is what fills in the
/// king-zone attack counters.
pub(super) fn king_safety(board: &Board, color: Color, state: &mut EvalState) {
    let them = color.opponent();

    // A weak shelter matters less as the opponent's army shrinks
    let shelter = scale_by_material(shelter(board, color), non_pawn_material(board, them));
    let mut score = TaperedScore::new(shelter, 0);

    let king_file = board.king_square(color).file().index();
    if (board.kind(PieceKind::Pawn) & KING_FLANKS[king_file]).is_empty() {
        score -= PAWNLESS_FLANK_PENALTY;
    }

    if state.king_zone_attackers[color] >= 2 && board.queens(them).is_nonempty() {
        let units = state.king_zone_attack_units[color].clamp(0, 99) as usize;
        score -= SAFETY_TABLE[units];
    }

    state.add(Term::KingSafety, color, score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::PIECE_VALUES;

    #[test]
    fn test_intact_shelter() {
        let board = Board::from_fen("6k1/5ppp/8/8/8/8/5PPP/6K1").unwrap();
        // Unmoved pawns on every file, and the enemy pawns are far away
        assert_eq!(shelter(&board, Color::White), 0);
        assert_eq!(shelter(&board, Color::White), shelter(&board, Color::Black));
    }

    #[test]
    fn test_open_king_file() {
        let board = Board::from_fen("6k1/5p1p/8/8/8/8/5P1P/6K1").unwrap();
        assert_eq!(shelter(&board, Color::White), -KING_OPEN_FILE_PENALTY);
    }

    #[test]
    fn test_rammed_pawns_halve_the_file() {
        // White G3 blocked by Black G4
        let board = Board::from_fen("6k1/8/8/8/6p1/6P1/8/6K1").unwrap();
        let expected = -KING_OPEN_FILE_PENALTY * 2 + -(SHELTER_PENALTY[2] + STORM_PENALTY[3]) / 2;
        assert_eq!(shelter(&board, Color::White), expected);
    }

    #[test]
    fn test_shelter_scales_with_enemy_material() {
        let mut state = EvalState::default();
        // Without enemy pieces the shelter does not matter, only the empty flank does
        let board = Board::from_fen("6k1/8/8/8/8/8/8/6K1").unwrap();
        king_safety(&board, Color::White, &mut state);
        assert_eq!(state.term(Term::KingSafety, Color::White), -PAWNLESS_FLANK_PENALTY);
    }

    #[test]
    fn test_shelter_scaling_rounds_to_nearest() {
        assert_eq!(scale_by_material(-90, MAX_NON_PAWN_MATERIAL), -90);
        assert_eq!(scale_by_material(-90, 0), 0);
        // -90 * 337 / 3383 is about -8.97
        assert_eq!(scale_by_material(-90, PIECE_VALUES[PieceKind::Knight].mg), -9);
        assert_eq!(scale_by_material(90, PIECE_VALUES[PieceKind::Knight].mg), 9);
        // -15 * 1692 / 3383 is just past -7.5
        assert_eq!(scale_by_material(-15, MAX_NON_PAWN_MATERIAL / 2 + 1), -8);
    }

    #[test]
    fn test_open_king_facing_a_lone_knight() {
        let mut state = EvalState::default();
        let board = Board::from_fen("n5k1/8/8/8/8/8/8/6K1").unwrap();
        king_safety(&board, Color::White, &mut state);

        let expected = TaperedScore::new(-9, 0) - PAWNLESS_FLANK_PENALTY;
        assert_eq!(state.term(Term::KingSafety, Color::White), expected);
    }

    #[test]
    fn test_attack_units_need_two_attackers_and_a_queen() {
        let board = Board::from_fen("3qk3/pppppppp/8/8/8/8/PPPPPPPP/4K3").unwrap();

        let mut state = EvalState::default();
        state.king_zone_attackers[Color::White] = 1;
        state.king_zone_attack_units[Color::White] = 12;
        king_safety(&board, Color::White, &mut state);
        let lone_attacker = state.term(Term::KingSafety, Color::White);

        let mut state = EvalState::default();
        state.king_zone_attackers[Color::White] = 2;
        state.king_zone_attack_units[Color::White] = 12;
        king_safety(&board, Color::White, &mut state);
        let two_attackers = state.term(Term::KingSafety, Color::White);

        assert_eq!(lone_attacker - two_attackers, SAFETY_TABLE[12]);

        // Huge unit counts saturate
        let mut state = EvalState::default();
        state.king_zone_attackers[Color::White] = 5;
        state.king_zone_attack_units[Color::White] = 400;
        king_safety(&board, Color::White, &mut state);
        assert_eq!(
            lone_attacker - state.term(Term::KingSafety, Color::White),
            SAFETY_TABLE[99]
        );
    }
}
