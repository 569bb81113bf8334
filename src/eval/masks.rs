/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Static bitmasks consulted by the feature modules.
//!
//! All of these are computed at compile time and never mutated.

use crate::{king_attacks, Bitboard, Color, File, Square};

/// Squares that must be free of enemy pawns for a pawn on a given square to be passed.
///
/// This is every square ahead of the pawn, on its own file and both adjacent files.
pub const PASSED_PAWN_MASKS: [[Bitboard; Square::COUNT]; Color::COUNT] = [
    generate_front_spans(Color::White, true),
    generate_front_spans(Color::Black, true),
];

/// Squares from which an enemy pawn could one day attack a given square.
///
/// If none of them hold an enemy pawn, the square can be used as an outpost.
pub const OUTPOST_MASKS: [[Bitboard; Square::COUNT]; Color::COUNT] = [
    generate_front_spans(Color::White, false),
    generate_front_spans(Color::Black, false),
];

/// The king's square and every square adjacent to it.
pub const KING_RING: [Bitboard; Square::COUNT] = {
    let mut rings = [Bitboard::EMPTY_BOARD; Square::COUNT];
    let mut i = 0;
    while i < Square::COUNT {
        let square = Square::from_index_unchecked(i);
        rings[i] = king_attacks(square).or(square.bitboard());
        i += 1;
    }
    rings
};

/// The files on either side of a file, excluding the file itself.
pub const ADJACENT_FILES: [Bitboard; 8] = {
    let mut masks = [Bitboard::EMPTY_BOARD; 8];
    let mut i = 0;
    while i < 8 {
        let file = Bitboard::from_file(File::new_unchecked(i as u8));
        masks[i] = file.east().or(file.west());
        i += 1;
    }
    masks
};

/// The three files a king on a given file defends with its pawns.
///
/// Kings on the queenside (or center-left) are mapped to `A..=C`, kings on the kingside to `F..=H`.
pub const KING_FLANKS: [Bitboard; 8] = {
    let queenside = Bitboard::FILE_A.or(Bitboard::FILE_A.east()).or(Bitboard::FILE_A.east().east());
    let kingside = Bitboard::FILE_H.or(Bitboard::FILE_H.west()).or(Bitboard::FILE_H.west().west());

    let mut flanks = [Bitboard::EMPTY_BOARD; 8];
    let mut i = 0;
    while i < 8 {
        flanks[i] = match i {
            0..=2 => queenside,
            3 | 4 => {
                let center = Bitboard::from_file(File::new_unchecked(i as u8));
                center.or(center.east()).or(center.west())
            }
            _ => kingside,
        };
        i += 1;
    }
    flanks
};

/// Files `C..=F` on ranks `3..=6`; the squares counted by the space term.
pub const SPACE_ZONE: Bitboard = {
    let files = Bitboard::from_file(File::C)
        .or(Bitboard::from_file(File::D))
        .or(Bitboard::from_file(File::E))
        .or(Bitboard::from_file(File::F));
    let ranks = Bitboard::RANK_3
        .or(Bitboard::RANK_4)
        .or(Bitboard::RANK_5)
        .or(Bitboard::RANK_6);
    files.and(ranks)
};

/// The half of the board belonging to the opponent of the indexing color.
pub const ENEMY_TERRITORY: [Bitboard; Color::COUNT] = [
    Bitboard::RANK_5
        .or(Bitboard::RANK_6)
        .or(Bitboard::RANK_7)
        .or(Bitboard::RANK_8),
    Bitboard::RANK_1
        .or(Bitboard::RANK_2)
        .or(Bitboard::RANK_3)
        .or(Bitboard::RANK_4),
];

/// Squares strictly ahead of each square, on the adjacent files and (if `include_own_file`) its own file.
const fn generate_front_spans(color: Color, include_own_file: bool) -> [Bitboard; Square::COUNT] {
    let mut spans = [Bitboard::EMPTY_BOARD; Square::COUNT];
    let mut i = 0;
    while i < Square::COUNT {
        let bb = Square::from_index_unchecked(i).bitboard();
        let mut files = bb.east().or(bb.west());
        if include_own_file {
            files = files.or(bb);
        }
        spans[i] = files.forward(color).fill_forward(color);
        i += 1;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passed_pawn_masks() {
        let expected = Bitboard::from_file(File::D)
            | Bitboard::from_file(File::E)
            | Bitboard::from_file(File::F);
        let expected = expected & !(Bitboard::RANK_1 | Bitboard::RANK_2 | Bitboard::RANK_3 | Bitboard::RANK_4);
        assert_eq!(PASSED_PAWN_MASKS[Color::White][Square::E4], expected);

        let black = PASSED_PAWN_MASKS[Color::Black][Square::A5];
        assert_eq!(black.population(), 8, "A5 for Black looks at A4..A1 and B4..B1");
        assert!(black.intersects(Square::B1));
        assert!(!black.intersects(Square::A5));
    }

    #[test]
    fn test_outpost_masks_skip_own_file() {
        let mask = OUTPOST_MASKS[Color::White][Square::D5];
        assert!(!mask.intersects(Bitboard::from_file(File::D)));
        assert!(mask.intersects(Square::C6));
        assert!(mask.intersects(Square::E7));
        assert!(!mask.intersects(Square::E5));
        assert_eq!(mask.population(), 6);
    }

    #[test]
    fn test_king_ring() {
        assert_eq!(KING_RING[Square::E1].population(), 6);
        assert_eq!(KING_RING[Square::A8].population(), 4);
        assert_eq!(KING_RING[Square::D4].population(), 9);
        assert!(KING_RING[Square::G1].intersects(Square::G1));
    }

    #[test]
    fn test_king_flanks() {
        let abc = Bitboard::from_file(File::A) | Bitboard::from_file(File::B) | Bitboard::from_file(File::C);
        let fgh = Bitboard::from_file(File::F) | Bitboard::from_file(File::G) | Bitboard::from_file(File::H);
        for file in 0..3 {
            assert_eq!(KING_FLANKS[file], abc, "file index {file}");
        }
        for file in 5..8 {
            assert_eq!(KING_FLANKS[file], fgh, "file index {file}");
        }
        assert_eq!(
            KING_FLANKS[File::D.index()],
            Bitboard::from_file(File::C) | Bitboard::from_file(File::D) | Bitboard::from_file(File::E)
        );
        assert_eq!(
            KING_FLANKS[File::E.index()],
            Bitboard::from_file(File::D) | Bitboard::from_file(File::E) | Bitboard::from_file(File::F)
        );
    }

    #[test]
    fn test_space_zone_and_territory() {
        assert_eq!(SPACE_ZONE.population(), 16);
        assert!(SPACE_ZONE.intersects(Square::C3));
        assert!(SPACE_ZONE.intersects(Square::F6));
        assert!(!SPACE_ZONE.intersects(Square::G4));

        assert_eq!(ENEMY_TERRITORY[Color::White], ENEMY_TERRITORY[Color::Black].flipped_rank());
        assert!(ENEMY_TERRITORY[Color::White].intersects(Square::E5));
    }

    #[test]
    fn test_adjacent_files() {
        assert_eq!(ADJACENT_FILES[0], Bitboard::from_file(File::B));
        assert_eq!(
            ADJACENT_FILES[4],
            Bitboard::from_file(File::D) | Bitboard::from_file(File::F)
        );
    }
}
