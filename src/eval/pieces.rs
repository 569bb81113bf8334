/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{
    attacks_for, bishop_rays, rook_rays, Bitboard, Board, Color, File, PieceKind, Rank,
    TaperedScore,
};

use super::{
    mobility_bonus, EvalState, Term, BAD_BISHOP_PENALTY, BISHOP_ON_QUEEN, DEFENDED_KNIGHT,
    DOUBLED_ROOKS, ENEMY_TERRITORY, KING_ATTACK_UNITS, KING_RING, KING_RING_ATTACK, OUTPOST,
    OUTPOST_MASKS, QUEEN_DEVELOPMENT_PENALTY, REACHABLE_OUTPOST, ROOK_BEHIND_PASSER,
    ROOK_ON_QUEEN, ROOK_OPEN_FILE, ROOK_SEMI_OPEN_FILE,
};

/// Mobility of `color`'s pieces of `kind`.
///
/// Records their attacks, and charges the enemy king with any pressure on its ring.
pub(super) fn mobility(board: &Board, color: Color, kind: PieceKind, state: &mut EvalState) {
    let them = color.opponent();
    let occupied = board.occupied();
    let friendly = board.color(color);
    let enemy_ring = KING_RING[board.king_square(them)];

    let mut score = TaperedScore::ZERO;

    for square in board.pieces(color, kind) {
        let attacks = attacks_for(kind, color, square, occupied);
        state.attacks[kind][color] |= attacks;

        let ring_hits = attacks & enemy_ring;
        if ring_hits.is_nonempty() {
            state.king_zone_attackers[them] += 1;
            state.king_zone_attack_units[them] +=
                KING_ATTACK_UNITS[kind] * ring_hits.population() as i32;
        }

        score += mobility_bonus(kind, (attacks & !friendly).population() as usize);
    }

    state.add(Term::Mobility, color, score);
}

/// Squares in enemy territory that our pawns defend and no enemy pawn can ever attack.
fn outposts(board: &Board, color: Color, state: &EvalState) -> Bitboard {
    let theirs = board.pawns(color.opponent());
    (state.attacks[PieceKind::Pawn][color] & ENEMY_TERRITORY[color])
        .into_iter()
        .filter(|&square| (OUTPOST_MASKS[color][square] & theirs).is_empty())
        .collect()
}

/// Placement terms for `color`'s pieces of `kind`.
///
/// Requires pawn structure to have been evaluated for both sides.
pub(super) fn pieces(board: &Board, color: Color, kind: PieceKind, state: &mut EvalState) {
    let them = color.opponent();
    let occupied = board.occupied();
    let enemy_ring = KING_RING[board.king_square(them)];
    let enemy_queens = board.queens(them);
    let own_pawns = board.pawns(color);
    let their_pawns = board.pawns(them);
    let all_pawns = board.kind(PieceKind::Pawn);
    let our_pieces = board.pieces(color, kind);

    let mut score = TaperedScore::ZERO;

    let outpost_squares = match kind {
        PieceKind::Knight | PieceKind::Bishop => {
            let outposts = outposts(board, color, state);
            score += OUTPOST * (our_pieces & outposts).population() as i32;
            outposts
        }
        _ => Bitboard::EMPTY_BOARD,
    };

    if kind == PieceKind::Rook {
        let doubled = File::iter()
            .filter(|&file| (our_pieces & file).has_many())
            .count() as i32;
        score += DOUBLED_ROOKS * doubled;
    }

    for square in our_pieces {
        let attacks = attacks_for(kind, color, square, occupied);
        let file = Bitboard::from_file(square.file());

        if attacks.intersects(enemy_ring) {
            score += KING_RING_ATTACK[kind];
        }

        match kind {
            PieceKind::Knight => {
                score += REACHABLE_OUTPOST * (attacks & outpost_squares).population() as i32;

                if state.attacks[PieceKind::Pawn][color].intersects(square) {
                    score += DEFENDED_KNIGHT;
                }
            }

            PieceKind::Bishop => {
                score += REACHABLE_OUTPOST * (attacks & outpost_squares).population() as i32;

                if bishop_rays(square).intersects(enemy_queens) {
                    score += BISHOP_ON_QUEEN;
                }

                score -= BAD_BISHOP_PENALTY * (attacks & own_pawns).population() as i32;
            }

            PieceKind::Rook => {
                if rook_rays(square).intersects(enemy_queens) {
                    score += ROOK_ON_QUEEN;
                }

                if (all_pawns & file).is_empty() {
                    score += ROOK_OPEN_FILE;
                } else if (their_pawns & file).is_empty() {
                    score += ROOK_SEMI_OPEN_FILE;
                }

                // Tarrasch rule
                let passers = state.passed_pawns[color];
                if attacks.intersects(passers) {
                    score.eg += ROOK_BEHIND_PASSER;
                } else if file.intersects(passers) {
                    score.eg += ROOK_BEHIND_PASSER / 2;
                }
            }

            PieceKind::Queen => {
                if square.rank() != Rank::first(color) {
                    let undeveloped = (board.knights(color) | board.bishops(color))
                        & Bitboard::first_rank(color);
                    score.mg -= QUEEN_DEVELOPMENT_PENALTY * undeveloped.population() as i32;
                }
            }

            PieceKind::Pawn | PieceKind::King => {}
        }
    }

    state.add(Term::Pieces, color, score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{eval::pawns::pawns, Square};

    fn prepared(placements: &str) -> (Board, EvalState) {
        let board = Board::from_fen(placements).unwrap();
        let mut state = EvalState::default();
        for color in Color::all() {
            pawns(&board, color, &mut state);
        }
        (board, state)
    }

    #[test]
    fn test_mobility_records_attacks_and_king_pressure() {
        // White rook on the open E file stares at the Black king
        let (board, mut state) = prepared("4k3/8/8/8/8/8/8/4RK2");
        mobility(&board, Color::White, PieceKind::Rook, &mut state);

        let attacks = state.attacks[PieceKind::Rook][Color::White];
        assert!(attacks.intersects(Square::E8));
        assert!(attacks.intersects(Square::A1));
        assert!(!attacks.intersects(Square::G1), "the King blocks the rank");

        // E7 and E8 are both on the king ring
        assert_eq!(state.king_zone_attackers[Color::Black], 1);
        assert_eq!(state.king_zone_attack_units[Color::Black], 3 * 2);
        assert_eq!(state.king_zone_attackers[Color::White], 0);

        // 7 squares up the file, 4 to the left
        assert_eq!(
            state.term(Term::Mobility, Color::White),
            mobility_bonus(PieceKind::Rook, 11)
        );
    }

    #[test]
    fn test_mobility_ignores_friendly_squares() {
        let (board, mut state) = prepared("4k3/8/8/8/8/8/3P4/1N2K3");
        mobility(&board, Color::White, PieceKind::Knight, &mut state);
        // A3 and C3; D2 is our own pawn
        assert_eq!(
            state.term(Term::Mobility, Color::White),
            mobility_bonus(PieceKind::Knight, 2)
        );
    }

    #[test]
    fn test_knight_outpost() {
        // Knight on D5, defended by the E4 pawn, with no Black pawns on C or E
        let (board, mut state) = prepared("7k/3p4/8/3N4/4P3/8/8/4K3");
        let outposts = outposts(&board, Color::White, &state);
        assert_eq!(outposts, Square::D5.bitboard() | Square::F5);

        pieces(&board, Color::White, PieceKind::Knight, &mut state);
        let expected = OUTPOST + DEFENDED_KNIGHT;
        assert_eq!(state.term(Term::Pieces, Color::White), expected);
    }

    #[test]
    fn test_rook_files() {
        let (board, mut state) = prepared("4k3/8/8/8/8/8/8/R3K3");
        pieces(&board, Color::White, PieceKind::Rook, &mut state);
        assert_eq!(state.term(Term::Pieces, Color::White), ROOK_OPEN_FILE);

        // Only an enemy pawn on the file
        let (board, mut state) = prepared("4k3/p7/8/8/8/8/8/R3K3");
        pieces(&board, Color::White, PieceKind::Rook, &mut state);
        assert_eq!(state.term(Term::Pieces, Color::White), TaperedScore::ZERO);

        // Only our own pawn on the file, and it is passed
        let (board, mut state) = prepared("4k3/8/8/8/8/8/P7/R3K3");
        pieces(&board, Color::White, PieceKind::Rook, &mut state);
        let expected = ROOK_SEMI_OPEN_FILE + TaperedScore::new(0, ROOK_BEHIND_PASSER);
        assert_eq!(state.term(Term::Pieces, Color::White), expected);

        // Pawns of both sides close the file
        let (board, mut state) = prepared("4k3/p7/8/8/8/8/P7/R3K3");
        pieces(&board, Color::White, PieceKind::Rook, &mut state);
        assert_eq!(state.term(Term::Pieces, Color::White), TaperedScore::ZERO);
    }

    #[test]
    fn test_doubled_rooks_and_queen_line() {
        let (board, mut state) = prepared("3qk3/8/8/8/8/8/3R4/3RK3");
        pieces(&board, Color::White, PieceKind::Rook, &mut state);

        // Both rooks share the open D file with the enemy queen, the front one reaches D7 and D8
        let expected = DOUBLED_ROOKS
            + (ROOK_ON_QUEEN + ROOK_OPEN_FILE) * 2
            + KING_RING_ATTACK[PieceKind::Rook];
        assert_eq!(state.term(Term::Pieces, Color::White), expected);
    }

    #[test]
    fn test_bad_bishop_and_queen_diagonal() {
        let (board, mut state) = prepared("4k3/8/8/q7/8/8/3P4/2B1K3");
        pieces(&board, Color::White, PieceKind::Bishop, &mut state);

        // C1 runs into its own pawn on D2, and no diagonal through C1 reaches A5
        let rays = bishop_rays(Square::C1);
        assert!(!rays.intersects(Square::A5));
        assert_eq!(state.term(Term::Pieces, Color::White), -BAD_BISHOP_PENALTY);
    }

    #[test]
    fn test_early_queen() {
        let (board, mut state) = prepared("k7/8/8/8/8/3Q4/8/1NB1K1N1");
        pieces(&board, Color::White, PieceKind::Queen, &mut state);
        assert_eq!(
            state.term(Term::Pieces, Color::White),
            TaperedScore::new(-3 * QUEEN_DEVELOPMENT_PENALTY, 0)
        );
    }
}
