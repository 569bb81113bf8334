/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{pawn_attacks_span, Bitboard, Board, Color, File, PieceKind, TaperedScore};

use super::{
    EvalState, Term, ADJACENT_FILES, DOUBLED_PAWN_PENALTY, ISOLATED_PAWN_PENALTY,
    PASSED_PAWN_BONUS, PASSED_PAWN_MASKS, SPACE_WEIGHT, SPACE_ZONE,
};

/// Pawn structure for `color`.
///
/// Also records `color`'s pawn attacks and passed pawns in `state`, so this must run before any
/// module that reads them.
pub(super) fn pawns(board: &Board, color: Color, state: &mut EvalState) {
    let ours = board.pawns(color);
    let theirs = board.pawns(color.opponent());
    let mut score = TaperedScore::ZERO;

    state.attacks[PieceKind::Pawn][color] = pawn_attacks_span(ours, color);

    let doubled = File::iter()
        .filter(|&file| (ours & file).has_many())
        .count() as i32;
    score -= DOUBLED_PAWN_PENALTY * doubled;

    for square in ours {
        if (PASSED_PAWN_MASKS[color][square] & theirs).is_empty() {
            state.passed_pawns[color].set(square);
            score += PASSED_PAWN_BONUS[square.rank().relative_to(color).index()];
        }

        if (ADJACENT_FILES[square.file().index()] & ours).is_empty() {
            score -= ISOLATED_PAWN_PENALTY;
        }
    }

    state.add(Term::Pawns, color, score);
}

/// Safe central squares controlled by `color`'s pawns.
///
/// Requires the pawn attacks of both sides.
pub(super) fn space(board: &Board, color: Color, state: &mut EvalState) {
    let ours = board.pawns(color);
    let safe = SPACE_ZONE & !state.attacks[PieceKind::Pawn][color.opponent()];

    // Everything between our pawns and our back rank
    let behind = ours.backward(color).fill_forward(color.opponent());

    let attacked = (state.attacks[PieceKind::Pawn][color] & safe).population() as i32;
    let sheltered = (behind & safe).population() as i32;

    state.add(Term::Space, color, SPACE_WEIGHT * (attacked + 2 * sheltered));
}

/// Every pawn of `color` that is currently passed.
///
/// # Example
/// ```
/// # use newt::*;
/// let board = Board::from_fen("4k3/p7/8/8/8/8/1P5P/4K3").unwrap();
/// assert_eq!(passed_pawns(&board, Color::White), Bitboard::from_square(Square::H2));
/// ```
pub fn passed_pawns(board: &Board, color: Color) -> Bitboard {
    let theirs = board.pawns(color.opponent());
    board
        .pawns(color)
        .into_iter()
        .filter(|&square| (PASSED_PAWN_MASKS[color][square] & theirs).is_empty())
        .collect()
}
