/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Not};

use super::{Color, File, Rank, Square};

/// A [`Bitboard`] represents a set of squares on the board as the bits of a `u64`.
///
/// The internal encoding uses [Little-Endian Rank-File Mapping (LERF)](https://www.chessprogramming.org/Square_Mapping_Considerations#Little-Endian_Rank-File_Mapping),
/// so bit index 0 is A1 and bit index 63 is H8. The first rank looks like this:
/// ```text
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 11111111
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Bitboard(pub(crate) u64);

impl Bitboard {
    pub const FILE_A: Self = Self(0x0101010101010101);
    pub const FILE_H: Self = Self(0x8080808080808080);
    pub const NOT_FILE_A: Self = Self(0xfefefefefefefefe);
    pub const NOT_FILE_H: Self = Self(0x7f7f7f7f7f7f7f7f);
    pub const RANK_1: Self = Self(0x00000000000000FF);
    pub const RANK_2: Self = Self(0x000000000000FF00);
    pub const RANK_3: Self = Self(0x0000000000FF0000);
    pub const RANK_4: Self = Self(0x00000000FF000000);
    pub const RANK_5: Self = Self(0x000000FF00000000);
    pub const RANK_6: Self = Self(0x0000FF0000000000);
    pub const RANK_7: Self = Self(0x00FF000000000000);
    pub const RANK_8: Self = Self(0xFF00000000000000);
    pub const LIGHT_SQUARES: Self = Self(0x55AA55AA55AA55AA);
    pub const DARK_SQUARES: Self = Self(0xAA55AA55AA55AA55);
    pub const EMPTY_BOARD: Self = Self(0x0000000000000000);
    pub const FULL_BOARD: Self = Self(0xFFFFFFFFFFFFFFFF);
    pub const CENTER: Self = Self(0x0000001818000000);

    /// Constructs a new [`Bitboard`] from the provided bit pattern.
    #[inline(always)]
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// Constructs a new [`Bitboard`] with only the bit of `square` set.
    ///
    /// # Example
    /// ```
    /// # use newt::{Bitboard, Square};
    /// let board = Bitboard::from_square(Square::H8);
    /// assert_eq!(board.inner(), 0x8000000000000000);
    /// ```
    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.index())
    }

    /// Constructs a new [`Bitboard`] with an entire column of bits set.
    #[inline(always)]
    pub const fn from_file(file: File) -> Self {
        Self::new(Self::FILE_A.0 << file.0)
    }

    /// Constructs a new [`Bitboard`] with an entire row of bits set.
    #[inline(always)]
    pub const fn from_rank(rank: Rank) -> Self {
        Self::new(Self::RANK_1.0 << (rank.0 * 8))
    }

    /// Returns a [`Bitboard`] of the first rank, relative to `color`.
    #[inline(always)]
    pub const fn first_rank(color: Color) -> Self {
        match color {
            Color::White => Self::RANK_1,
            Color::Black => Self::RANK_8,
        }
    }

    /// Returns the inner `u64` of this [`Bitboard`].
    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// Mirrors this [`Bitboard`] across the horizontal axis, so that rank 1 becomes rank 8.
    ///
    /// # Example
    /// ```
    /// # use newt::Bitboard;
    /// assert_eq!(Bitboard::RANK_2.flipped_rank(), Bitboard::RANK_7);
    /// ```
    #[inline(always)]
    pub const fn flipped_rank(&self) -> Self {
        Self(self.0.swap_bytes())
    }

    /// If `color` is Black, mirrors this [`Bitboard`] across the horizontal axis.
    #[inline(always)]
    pub const fn relative_to(self, color: Color) -> Self {
        match color {
            Color::White => self,
            Color::Black => self.flipped_rank(),
        }
    }

    /// Returns `true` if there are no set bits in this [`Bitboard`].
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == Self::EMPTY_BOARD.0
    }

    /// Returns `true` if there is at least one set bit in this [`Bitboard`].
    #[inline(always)]
    pub const fn is_nonempty(&self) -> bool {
        self.0 != Self::EMPTY_BOARD.0
    }

    /// Returns `true` if `self` and `other` share at least one set bit.
    #[inline(always)]
    pub fn intersects(&self, other: impl Into<Self>) -> bool {
        (self.0 & other.into().0) != 0
    }

    /// Returns `true` if more than one bit is set.
    #[inline(always)]
    pub const fn has_many(&self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    /// Sets the bit(s) at the location(s) specified by `other`.
    #[inline(always)]
    pub fn set(&mut self, other: impl Into<Self>) {
        *self |= other.into()
    }

    /// Clears the bit(s) at the location(s) specified by `other`.
    #[inline(always)]
    pub fn clear(&mut self, other: impl Into<Self>) {
        *self &= !other.into()
    }

    /// Returns the lowest set bit of this [`Bitboard`], as a [`Square`].
    ///
    /// If `self` is empty, this yields `None`.
    #[inline(always)]
    pub fn lsb(&self) -> Option<Square> {
        self.is_nonempty()
            .then(|| Square(self.0.trailing_zeros() as u8))
    }

    /// Returns the highest set bit of this [`Bitboard`], as a [`Square`].
    ///
    /// If `self` is empty, this yields `None`.
    #[inline(always)]
    pub fn msb(&self) -> Option<Square> {
        self.is_nonempty()
            .then(|| Square(63 - self.0.leading_zeros() as u8))
    }

    /// Returns the set bit that is furthest advanced from `color`'s point of view.
    ///
    /// # Example
    /// ```
    /// # use newt::{Bitboard, Color, Square};
    /// let pawns = Bitboard::from_square(Square::E2) | Square::E5;
    /// assert_eq!(pawns.frontmost(Color::White), Some(Square::E5));
    /// assert_eq!(pawns.frontmost(Color::Black), Some(Square::E2));
    /// ```
    #[inline(always)]
    pub fn frontmost(&self, color: Color) -> Option<Square> {
        match color {
            Color::White => self.msb(),
            Color::Black => self.lsb(),
        }
    }

    /// Pops and returns the lowest set bit of this [`Bitboard`], as a [`Square`].
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let lsb = self.lsb();
        self.0 &= self.0.wrapping_sub(1);
        lsb
    }

    /// Returns a [`BitboardIter`] to iterate over all of the set bits as [`Square`]s.
    #[inline(always)]
    pub const fn iter(&self) -> BitboardIter {
        BitboardIter { bitboard: *self }
    }

    /// Yields the total number of `1`s in this [`Bitboard`].
    ///
    /// # Example
    /// ```
    /// # use newt::Bitboard;
    /// assert_eq!(Bitboard::RANK_1.population(), 8);
    /// ```
    #[inline(always)]
    pub const fn population(&self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Shifts this [`Bitboard`] one rank towards the enemy of `color`.
    ///
    /// Bits shifted off the board are lost.
    #[inline(always)]
    pub const fn forward(self, color: Color) -> Self {
        match color {
            Color::White => self.north(),
            Color::Black => self.south(),
        }
    }

    /// Shifts this [`Bitboard`] one rank towards `color`'s own back rank.
    #[inline(always)]
    pub const fn backward(self, color: Color) -> Self {
        self.forward(color.opponent())
    }

    /// Smears every set bit forward, from `color`'s point of view, to the edge of the board.
    ///
    /// The original bits are kept.
    #[inline(always)]
    pub const fn fill_forward(self, color: Color) -> Self {
        let mut bits = self.0;
        match color {
            Color::White => {
                bits |= bits << 8;
                bits |= bits << 16;
                bits |= bits << 32;
            }
            Color::Black => {
                bits |= bits >> 8;
                bits |= bits >> 16;
                bits |= bits >> 32;
            }
        }
        Self(bits)
    }

    /// Every square on the files touched by this [`Bitboard`].
    #[inline(always)]
    pub const fn file_fill(self) -> Self {
        self.fill_forward(Color::White)
            .or(self.fill_forward(Color::Black))
    }

    /// Shifts this [`Bitboard`] by one rank up.
    ///
    /// # Example
    /// ```
    /// # use newt::Bitboard;
    /// assert_eq!(Bitboard::RANK_4.north(), Bitboard::RANK_5);
    /// assert_eq!(Bitboard::RANK_8.north(), Bitboard::EMPTY_BOARD);
    /// ```
    #[inline(always)]
    pub const fn north(self) -> Self {
        Self(self.0 << 8)
    }

    /// Shifts this [`Bitboard`] by one rank down.
    #[inline(always)]
    pub const fn south(self) -> Self {
        Self(self.0 >> 8)
    }

    /// Shifts this [`Bitboard`] by one file towards the H file.
    #[inline(always)]
    pub const fn east(self) -> Self {
        // Post-shift mask
        Self((self.0 << 1) & Self::NOT_FILE_A.0)
    }

    /// Shifts this [`Bitboard`] by one file towards the A file.
    #[inline(always)]
    pub const fn west(self) -> Self {
        // Post-shift mask
        Self((self.0 >> 1) & Self::NOT_FILE_H.0)
    }

    #[inline(always)]
    pub const fn northeast(self) -> Self {
        Self((self.0 << 9) & Self::NOT_FILE_A.0)
    }

    #[inline(always)]
    pub const fn southeast(self) -> Self {
        Self((self.0 >> 7) & Self::NOT_FILE_A.0)
    }

    #[inline(always)]
    pub const fn northwest(self) -> Self {
        Self((self.0 << 7) & Self::NOT_FILE_H.0)
    }

    #[inline(always)]
    pub const fn southwest(self) -> Self {
        Self((self.0 >> 9) & Self::NOT_FILE_H.0)
    }

    /// `const` analog of [`std::ops::BitAnd::bitand`].
    #[inline(always)]
    pub const fn and(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// `const` analog of [`std::ops::BitOr::bitor`].
    #[inline(always)]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// `const` analog of [`std::ops::BitXor::bitxor`].
    #[inline(always)]
    pub const fn xor(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    /// `const` analog of [`std::ops::Not::not`].
    #[inline(always)]
    pub const fn not(self) -> Self {
        Self(!self.0)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), |bb, sq| bb | sq)
    }
}

macro_rules! impl_bitwise_op {
    // Impl op and op_assign for Self
    ($op:tt, $op_assign:tt, $func:ident, $func_assign:ident) => {
        impl<T> std::ops::$op<T> for Bitboard
        where
            Self: From<T>,
        {
            type Output = Self;
            #[inline(always)]
            fn $func(self, rhs: T) -> Self::Output {
                Self(std::ops::$op::$func(self.0, Self::from(rhs).0))
            }
        }

        impl<T> std::ops::$op_assign<T> for Bitboard
        where
            Self: From<T>,
        {
            #[inline(always)]
            fn $func_assign(&mut self, rhs: T) {
                std::ops::$op_assign::$func_assign(&mut self.0, Self::from(rhs).0);
            }
        }
    };
}

impl_bitwise_op!(BitAnd, BitAndAssign, bitand, bitand_assign);
impl_bitwise_op!(BitOr, BitOrAssign, bitor, bitor_assign);
impl_bitwise_op!(BitXor, BitXorAssign, bitxor, bitxor_assign);

impl Not for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl From<Square> for Bitboard {
    #[inline(always)]
    fn from(value: Square) -> Self {
        Self::from_square(value)
    }
}

impl From<File> for Bitboard {
    #[inline(always)]
    fn from(value: File) -> Self {
        Self::from_file(value)
    }
}

impl From<Rank> for Bitboard {
    #[inline(always)]
    fn from(value: Rank) -> Self {
        Self::from_rank(value)
    }
}

impl From<u64> for Bitboard {
    #[inline(always)]
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl Default for Bitboard {
    #[inline(always)]
    fn default() -> Self {
        Self::EMPTY_BOARD
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Allocate just enough capacity
        let mut board = String::with_capacity(136);

        for rank in Rank::iter().rev() {
            for file in File::iter() {
                let square = Square::new(file, rank);
                let occupant = if self.intersects(square) { 'X' } else { '.' };

                board += &format!("{occupant} ");
            }
            board += "\n";
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitboard(0x{:0>16x})\n{self}", self.0)
    }
}

/// An iterator over all set bits in a [`Bitboard`].
///
/// See [`Bitboard::iter`].
pub struct BitboardIter {
    bitboard: Bitboard,
}

impl Iterator for BitboardIter {
    type Item = Square;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.bitboard.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bitboard.population() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for BitboardIter {
    #[inline(always)]
    fn len(&self) -> usize {
        self.bitboard.population() as usize
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter { bitboard: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitboard_shifts_stay_on_board() {
        assert_eq!(Bitboard::FILE_H.east(), Bitboard::EMPTY_BOARD);
        assert_eq!(Bitboard::FILE_A.west(), Bitboard::EMPTY_BOARD);
        assert_eq!(Bitboard::RANK_1.south(), Bitboard::EMPTY_BOARD);
        assert_eq!(Bitboard::RANK_4.forward(Color::Black), Bitboard::RANK_3);
        assert_eq!(Bitboard::RANK_4.backward(Color::Black), Bitboard::RANK_5);
    }

    #[test]
    fn test_bitboard_fills() {
        let e4 = Bitboard::from_square(Square::E4);
        let white_span = e4.fill_forward(Color::White);
        assert_eq!(white_span.population(), 5);
        assert!(white_span.intersects(Square::E8));
        assert!(!white_span.intersects(Square::E3));

        assert_eq!(e4.file_fill(), Bitboard::from_file(File::E));
    }

    #[test]
    fn test_bitboard_flip_matches_square_flip() {
        for square in Square::iter() {
            assert_eq!(
                Bitboard::from_square(square).flipped_rank(),
                Bitboard::from_square(square.flipped_rank())
            );
        }
    }

    #[test]
    fn test_bitboard_iteration() {
        let board: Bitboard = [Square::A1, Square::C3, Square::H8].into_iter().collect();
        assert_eq!(board.population(), 3);
        assert!(board.has_many());
        assert_eq!(board.lsb(), Some(Square::A1));
        assert_eq!(board.msb(), Some(Square::H8));
        assert_eq!(board.iter().collect::<Vec<_>>(), vec![Square::A1, Square::C3, Square::H8]);
        assert!(!Bitboard::from_square(Square::D4).has_many());
    }
}
