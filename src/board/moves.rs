/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

use super::{PieceKind, Square};

/// Represents a move made on a chess board.
///
/// Internally encoded using the following bit pattern:
/// ```text
///     0000 000000 000000
///      |     |      |
///      |     |      +- Source square of the move.
///      |     +- Target square of the move.
///      +- Promotion flag and piece.
/// ```
///
/// A move carries no knowledge of the position it is played in.
/// Heuristic tables only need its source and target squares.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Move(u16);

impl Move {
    /// Mask for the source ("from") bits.
    const SRC_MASK: u16 = 0b0000_0000_0011_1111;
    /// Mask for the destination ("to") bits.
    const DST_MASK: u16 = 0b0000_1111_1100_0000;
    /// Start index of destination bits.
    const DST_BITS: u16 = 6;
    /// Start index of flag bits.
    const FLG_BITS: u16 = 12;
    /// Set if this move promotes a pawn. The two bits below it hold the promotion piece.
    const FLAG_PROMO: u16 = 0b1000 << Self::FLG_BITS;

    /// Creates a new [`Move`] between the given [`Square`]s.
    ///
    /// # Example
    /// ```
    /// # use newt::{Move, Square};
    /// let e2e4 = Move::new(Square::E2, Square::E4);
    /// assert_eq!(e2e4.to_string(), "e2e4");
    /// ```
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self((to.0 as u16) << Self::DST_BITS | from.0 as u16)
    }

    /// Creates a new [`Move`] that promotes a pawn to `promotion`.
    ///
    /// Only knights, bishops, rooks, and queens are valid promotions. Anything else is treated as a queen.
    #[inline(always)]
    pub const fn new_promotion(from: Square, to: Square, promotion: PieceKind) -> Self {
        let piece: u16 = match promotion {
            PieceKind::Knight => 0,
            PieceKind::Bishop => 1,
            PieceKind::Rook => 2,
            _ => 3,
        };
        Self(Self::new(from, to).0 | Self::FLAG_PROMO | piece << Self::FLG_BITS)
    }

    /// Creates an "illegal" [`Move`], representing moving a piece to and from A1.
    #[inline(always)]
    pub const fn illegal() -> Self {
        Self(0)
    }

    /// Fetches the source (or "from") part of this [`Move`], as a [`Square`].
    #[inline(always)]
    pub const fn from(&self) -> Square {
        Square((self.0 & Self::SRC_MASK) as u8)
    }

    /// Fetches the destination (or "to") part of this [`Move`], as a [`Square`].
    #[inline(always)]
    pub const fn to(&self) -> Square {
        Square(((self.0 & Self::DST_MASK) >> Self::DST_BITS) as u8)
    }

    /// Returns `true` if this [`Move`] promotes a pawn.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.0 & Self::FLAG_PROMO != 0
    }

    /// Fetches the [`PieceKind`] this [`Move`] promotes to, if any.
    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        if !self.is_promotion() {
            return None;
        }
        Some(match (self.0 >> Self::FLG_BITS) & 0b11 {
            0 => PieceKind::Knight,
            1 => PieceKind::Bishop,
            2 => PieceKind::Rook,
            _ => PieceKind::Queen,
        })
    }

    /// Parses a [`Move`] in long algebraic notation, such as `e2e4` or `e7e8q`.
    ///
    /// # Example
    /// ```
    /// # use newt::{Move, PieceKind, Square};
    /// let promote = Move::from_uci("e7e8n").unwrap();
    /// assert_eq!(promote.to(), Square::E8);
    /// assert_eq!(promote.promotion(), Some(PieceKind::Knight));
    /// assert!(Move::from_uci("e2").is_err());
    /// ```
    pub fn from_uci(uci: &str) -> Result<Self> {
        if !(4..=5).contains(&uci.len()) || !uci.is_ascii() {
            bail!("Invalid move string: Expected 4 or 5 ascii characters. Got {uci:?}");
        }

        let from = Square::from_uci(&uci[0..2]).context("Invalid source square")?;
        let to = Square::from_uci(&uci[2..4]).context("Invalid target square")?;

        match uci[4..].chars().next() {
            None => Ok(Self::new(from, to)),
            Some(c) => {
                let promotion = PieceKind::from_uci(c)?;
                if matches!(promotion, PieceKind::Pawn | PieceKind::King) {
                    bail!("Invalid promotion piece in move {uci:?}");
                }
                Ok(Self::new_promotion(from, to, promotion))
            }
        }
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Move {
    /// A [`Move`] is displayed in long algebraic notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promotion) = self.promotion() {
            write!(f, "{}", promotion.to_uci())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

impl Default for Move {
    /// A "default" move is an illegal move. See [`Move::illegal`].
    #[inline(always)]
    fn default() -> Self {
        Self::illegal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_parts() {
        let mv = Move::new(Square::G1, Square::F3);
        assert_eq!(mv.from(), Square::G1);
        assert_eq!(mv.to(), Square::F3);
        assert!(!mv.is_promotion());
        assert_eq!(mv.promotion(), None);
    }

    #[test]
    fn test_move_parsing() {
        for uci in ["e2e4", "g8f6", "a7a8q", "h2h1r", "b7c8b", "d2d1n"] {
            let mv: Move = uci.parse().unwrap();
            assert_eq!(mv.to_string(), uci);
        }

        assert!(Move::from_uci("e7e8k").is_err());
        assert!(Move::from_uci("e9e8").is_err());
        assert!(Move::from_uci("").is_err());
    }
}
