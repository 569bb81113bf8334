/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Bitboard, Color, PieceKind, Square};

/// Deltas for the eight ray directions, as `(file, rank)` pairs.
///
/// The first four point towards higher square indices, the last four towards lower ones.
const RAY_DELTAS: [(i8, i8); 8] = [
    (0, 1),   // north
    (1, 0),   // east
    (1, 1),   // northeast
    (-1, 1),  // northwest
    (0, -1),  // south
    (-1, 0),  // west
    (-1, -1), // southwest
    (1, -1),  // southeast
];

/// Deltas for the movement of the Knight.
const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (1, -2),
    (2, 1),
    (2, -1),
    (-1, 2),
    (-1, -2),
    (-2, 1),
    (-2, -1),
];

/// Unblocked rays from every square, indexed by direction then square.
const RAYS: [[Bitboard; Square::COUNT]; 8] = {
    let mut rays = [[Bitboard::EMPTY_BOARD; Square::COUNT]; 8];

    let mut dir = 0;
    while dir < RAY_DELTAS.len() {
        let (df, dr) = RAY_DELTAS[dir];
        let mut i = 0;
        while i < Square::COUNT {
            let mut ray = Bitboard::EMPTY_BOARD;
            let mut to = Square::from_index_unchecked(i);

            while let Some(shifted) = to.offset(df, dr) {
                ray = ray.or(shifted.bitboard());
                to = shifted;
            }

            rays[dir][i] = ray;
            i += 1;
        }
        dir += 1;
    }

    rays
};

const KNIGHT_ATTACKS: [Bitboard; Square::COUNT] = generate_leaper_mobility(&KNIGHT_DELTAS);
const KING_ATTACKS: [Bitboard; Square::COUNT] = generate_leaper_mobility(&RAY_DELTAS);
const WHITE_PAWN_ATTACKS: [Bitboard; Square::COUNT] = generate_pawn_attacks(Color::White);
const BLACK_PAWN_ATTACKS: [Bitboard; Square::COUNT] = generate_pawn_attacks(Color::Black);

/// Fetch the attacks for a piece of `kind` and `color` at `square`, given `blockers`.
///
/// For Pawns, this is only their diagonal captures, never their pushes.
#[inline(always)]
pub const fn attacks_for(kind: PieceKind, color: Color, square: Square, blockers: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Pawn => pawn_attacks(square, color),
        PieceKind::Knight => knight_attacks(square),
        PieceKind::Bishop => bishop_attacks(square, blockers),
        PieceKind::Rook => rook_attacks(square, blockers),
        PieceKind::Queen => queen_attacks(square, blockers),
        PieceKind::King => king_attacks(square),
    }
}

/// Computes the attacks for a Rook at a given [`Square`] with the provided blockers.
///
/// This will yield a [`Bitboard`] that allows the Rook to capture the first blocker in each direction.
///
/// # Example
/// ```
/// # use newt::*;
/// let blockers = Bitboard::from_square(Square::D6);
/// let attacks = rook_attacks(Square::D4, blockers);
/// assert!(attacks.intersects(Square::D6));
/// assert!(!attacks.intersects(Square::D7));
/// assert_eq!(attacks.population(), 12);
/// ```
#[inline(always)]
pub const fn rook_attacks(square: Square, blockers: Bitboard) -> Bitboard {
    ray_attacks(0, square, blockers)
        .or(ray_attacks(1, square, blockers))
        .or(ray_attacks(4, square, blockers))
        .or(ray_attacks(5, square, blockers))
}

/// Computes the attacks for a Bishop at a given [`Square`] with the provided blockers.
#[inline(always)]
pub const fn bishop_attacks(square: Square, blockers: Bitboard) -> Bitboard {
    ray_attacks(2, square, blockers)
        .or(ray_attacks(3, square, blockers))
        .or(ray_attacks(6, square, blockers))
        .or(ray_attacks(7, square, blockers))
}

/// Computes the attacks for a Queen at a given [`Square`] with the provided blockers.
#[inline(always)]
pub const fn queen_attacks(square: Square, blockers: Bitboard) -> Bitboard {
    rook_attacks(square, blockers).or(bishop_attacks(square, blockers))
}

/// Fetch the raw, unblocked attacks for a knight on the provided square.
#[inline(always)]
pub const fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[square.index()]
}

/// Fetch the raw, unblocked attacks for a king on the provided square.
#[inline(always)]
pub const fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[square.index()]
}

/// Fetch the attacks for a pawn of the provided color on the provided square.
#[inline(always)]
pub const fn pawn_attacks(square: Square, color: Color) -> Bitboard {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square.index()],
        Color::Black => BLACK_PAWN_ATTACKS[square.index()],
    }
}

/// Every square attacked by at least one of `pawns`, which belong to `color`.
#[inline(always)]
pub const fn pawn_attacks_span(pawns: Bitboard, color: Color) -> Bitboard {
    let pushed = pawns.forward(color);
    pushed.east().or(pushed.west())
}

/// Unblocked diagonal rays through `square`, for X-ray style checks.
#[inline(always)]
pub const fn bishop_rays(square: Square) -> Bitboard {
    bishop_attacks(square, Bitboard::EMPTY_BOARD)
}

/// Unblocked file and rank through `square`, for X-ray style checks.
#[inline(always)]
pub const fn rook_rays(square: Square) -> Bitboard {
    rook_attacks(square, Bitboard::EMPTY_BOARD)
}

/// Walks one ray out of `square`, stopping at (and including) the first blocker.
#[inline(always)]
const fn ray_attacks(dir: usize, square: Square, blockers: Bitboard) -> Bitboard {
    let ray = RAYS[dir][square.index()];
    let hits = ray.and(blockers);
    if hits.is_empty() {
        return ray;
    }

    // The first four directions walk towards higher indices
    let first = if dir < 4 {
        hits.inner().trailing_zeros() as usize
    } else {
        63 - hits.inner().leading_zeros() as usize
    };

    ray.xor(RAYS[dir][first])
}

/// Generates the attacks from every location for the "Leaper" pieces.
const fn generate_leaper_mobility(deltas: &[(i8, i8)]) -> [Bitboard; Square::COUNT] {
    let mut mobility = [Bitboard::EMPTY_BOARD; Square::COUNT];

    let mut i = 0;
    while i < Square::COUNT {
        let square = Square::from_index_unchecked(i);
        let mut movement = Bitboard::EMPTY_BOARD;

        let mut j = 0;
        while j < deltas.len() {
            let (df, dr) = deltas[j];
            if let Some(shifted) = square.offset(df, dr) {
                movement = movement.or(shifted.bitboard());
            }
            j += 1;
        }

        mobility[i] = movement;
        i += 1;
    }

    mobility
}

/// Generates the diagonal capture squares for Pawns of `color`.
const fn generate_pawn_attacks(color: Color) -> [Bitboard; Square::COUNT] {
    let mut boards = [Bitboard::EMPTY_BOARD; Square::COUNT];
    let mut i = 0;
    while i < Square::COUNT {
        let bb = Bitboard::from_square(Square::from_index_unchecked(i));
        boards[i] = pawn_attacks_span(bb, color);
        i += 1;
    }
    boards
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Checks if `moves` and `expected` contain all the same elements, ignoring order
    fn lists_match(moves: Bitboard, expected: &[Square]) {
        assert_eq!(
            moves.population() as usize,
            expected.len(),
            "\nMoves: {:?}\nExpected: {:?}",
            moves.iter().collect::<Vec<_>>(),
            expected
        );

        for sq in moves {
            assert!(expected.contains(&sq), "{sq} not found in {expected:?}");
        }
    }

    #[test]
    fn test_rook_blockers() {
        let blockers: Bitboard = [Square::D2, Square::D6, Square::C4, Square::H8]
            .into_iter()
            .collect();

        let expected = [
            Square::D2,
            Square::D3,
            Square::D5,
            Square::D6,
            Square::C4,
            Square::E4,
            Square::F4,
            Square::G4,
            Square::H4,
        ];

        lists_match(rook_attacks(Square::D4, blockers), &expected);
    }

    #[test]
    fn test_bishop_blockers() {
        let blockers: Bitboard = [Square::F6, Square::B2].into_iter().collect();
        let expected = [
            Square::E5,
            Square::F6,
            Square::C3,
            Square::B2,
            Square::C5,
            Square::B6,
            Square::A7,
            Square::E3,
            Square::F2,
            Square::G1,
        ];

        lists_match(bishop_attacks(Square::D4, blockers), &expected);
    }

    #[test]
    fn test_leapers() {
        lists_match(knight_attacks(Square::A1), &[Square::B3, Square::C2]);
        lists_match(king_attacks(Square::H8), &[Square::G8, Square::G7, Square::H7]);
        lists_match(pawn_attacks(Square::A2, Color::White), &[Square::B3]);
        lists_match(pawn_attacks(Square::E7, Color::Black), &[Square::D6, Square::F6]);
        assert_eq!(pawn_attacks(Square::E8, Color::White), Bitboard::EMPTY_BOARD);
    }
}
