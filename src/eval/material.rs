/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{Board, Color, Piece, PieceKind, TaperedScore, MAX_PHASE, PSQT};

use super::{
    EvalState, Term, BISHOP_PAIR, KNIGHT_PAWN_PENALTY, PIECE_VALUES, ROOK_PAWN_BONUS,
};

/// Contribution of each piece kind to the game phase.
const PHASE_WEIGHTS: [i32; PieceKind::COUNT] = [0, 1, 1, 2, 4, 0];

/// Returns `true` if neither side has enough material left to force checkmate.
///
/// This is a fixed set of conservative patterns, not endgame-table knowledge.
/// Positions with pawns are never considered drawn, since pawns can promote.
///
/// # Example
/// ```
/// # use newt::*;
/// let kings_and_knights: Position = "4k3/8/8/8/3n4/8/8/2N1K3 w - - 0 1".parse().unwrap();
/// assert!(is_material_draw(&kings_and_knights));
///
/// let rook_up: Position = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
/// assert!(!is_material_draw(&rook_up));
/// ```
pub fn is_material_draw(board: &Board) -> bool {
    use Color::*;
    use PieceKind::*;

    let n = |color| board.count(color, Knight);
    let b = |color| board.count(color, Bishop);
    let r = |color| board.count(color, Rook);
    let minors = |color| n(color) + b(color);

    // Bare kings
    if board.occupied() == board.kind(King) {
        return true;
    }

    // Pawns can always promote
    if board.kind(Pawn).is_nonempty() {
        return false;
    }

    let no_queens = board.kind(Queen).is_empty();
    let no_rooks = board.kind(Rook).is_empty();

    if no_queens && no_rooks {
        if board.kind(Bishop).is_empty() {
            return n(White) <= 2 && n(Black) <= 2;
        }

        if board.kind(Knight).is_empty() {
            return (b(White) - b(Black)).abs() < 2;
        }

        let weak = |color| (n(color) < 3 && b(color) == 0) || (b(color) == 1 && n(color) == 0);
        return weak(White) && weak(Black);
    }

    if no_queens {
        return match (r(White), r(Black)) {
            (1, 1) => minors(White) < 2 && minors(Black) < 2,
            (1, 0) => minors(White) == 0 && (1..=2).contains(&minors(Black)),
            (0, 1) => minors(Black) == 0 && (1..=2).contains(&minors(White)),
            _ => false,
        };
    }

    false
}

/// Computes the game phase from the minor and major pieces left on the board.
///
/// A full board is [`MAX_PHASE`], bare kings and pawns are `0`.
///
/// # Example
/// ```
/// # use newt::*;
/// assert_eq!(phase(&Board::default()), 24);
/// ```
pub fn phase(board: &Board) -> i32 {
    let phase = PieceKind::all()
        .into_iter()
        .map(|kind| board.kind(kind).population() as i32 * PHASE_WEIGHTS[kind])
        .sum::<i32>();

    phase.clamp(0, MAX_PHASE)
}

/// Middlegame value of all of `color`'s Knights, Bishops, Rooks, and Queens.
pub fn non_pawn_material(board: &Board, color: Color) -> i32 {
    PieceKind::minors_and_majors()
        .into_iter()
        .map(|kind| PIECE_VALUES[kind].mg * board.count(color, kind))
        .sum()
}

/// Raw material and piece placement for `color`.
pub(super) fn material_and_psqt(board: &Board, color: Color, state: &mut EvalState) {
    let material = PieceKind::all_except_king()
        .into_iter()
        .map(|kind| PIECE_VALUES[kind] * board.count(color, kind))
        .sum();
    state.add(Term::Material, color, material);

    let placement = PieceKind::all()
        .into_iter()
        .flat_map(|kind| {
            board
                .pieces(color, kind)
                .into_iter()
                .map(move |square| (kind, square))
        })
        .map(|(kind, square)| PSQT.value(Piece::new(color, kind), square))
        .sum();
    state.add(Term::Psqt, color, placement);
}

/// Bishop pair, and the drift in Rook and Knight value as pawns come off the board.
pub(super) fn imbalance(board: &Board, color: Color, state: &mut EvalState) {
    let mut score = TaperedScore::ZERO;

    if board.count(color, PieceKind::Bishop) >= 2 {
        score += BISHOP_PAIR;
    }

    let pawns_removed = 8 - board.count(color, PieceKind::Pawn);
    score += ROOK_PAWN_BONUS * (board.count(color, PieceKind::Rook) * pawns_removed);
    score -= KNIGHT_PAWN_PENALTY * (board.count(color, PieceKind::Knight) * pawns_removed);

    state.add(Term::Imbalance, color, score);
}
