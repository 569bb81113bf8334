/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Result};

use crate::{Bitboard, Color};

/// Represents a single square on an `8x8` chess board.
///
/// Squares use [Least Significant File Mapping](https://www.chessprogramming.org/Square_Mapping_Considerations#Deduction_on_Files_and_Ranks),
/// so `square = file + rank * 8`:
/// ```text
/// 8| 56 57 58 59 60 61 62 63
/// 7| 48 49 50 51 52 53 54 55
/// 6| 40 41 42 43 44 45 46 47
/// 5| 32 33 34 35 36 37 38 39
/// 4| 24 25 26 27 28 29 30 31
/// 3| 16 17 18 19 20 21 22 23
/// 2|  8  9 10 11 12 13 14 15
/// 1|  0  1  2  3  4  5  6  7
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(pub(crate) u8);

impl Square {
    pub const A1: Self = Self::new(File::A, Rank::ONE);
    pub const A2: Self = Self::new(File::A, Rank::TWO);
    pub const A3: Self = Self::new(File::A, Rank::THREE);
    pub const A4: Self = Self::new(File::A, Rank::FOUR);
    pub const A5: Self = Self::new(File::A, Rank::FIVE);
    pub const A6: Self = Self::new(File::A, Rank::SIX);
    pub const A7: Self = Self::new(File::A, Rank::SEVEN);
    pub const A8: Self = Self::new(File::A, Rank::EIGHT);

    pub const B1: Self = Self::new(File::B, Rank::ONE);
    pub const B2: Self = Self::new(File::B, Rank::TWO);
    pub const B3: Self = Self::new(File::B, Rank::THREE);
    pub const B4: Self = Self::new(File::B, Rank::FOUR);
    pub const B5: Self = Self::new(File::B, Rank::FIVE);
    pub const B6: Self = Self::new(File::B, Rank::SIX);
    pub const B7: Self = Self::new(File::B, Rank::SEVEN);
    pub const B8: Self = Self::new(File::B, Rank::EIGHT);

    pub const C1: Self = Self::new(File::C, Rank::ONE);
    pub const C2: Self = Self::new(File::C, Rank::TWO);
    pub const C3: Self = Self::new(File::C, Rank::THREE);
    pub const C4: Self = Self::new(File::C, Rank::FOUR);
    pub const C5: Self = Self::new(File::C, Rank::FIVE);
    pub const C6: Self = Self::new(File::C, Rank::SIX);
    pub const C7: Self = Self::new(File::C, Rank::SEVEN);
    pub const C8: Self = Self::new(File::C, Rank::EIGHT);

    pub const D1: Self = Self::new(File::D, Rank::ONE);
    pub const D2: Self = Self::new(File::D, Rank::TWO);
    pub const D3: Self = Self::new(File::D, Rank::THREE);
    pub const D4: Self = Self::new(File::D, Rank::FOUR);
    pub const D5: Self = Self::new(File::D, Rank::FIVE);
    pub const D6: Self = Self::new(File::D, Rank::SIX);
    pub const D7: Self = Self::new(File::D, Rank::SEVEN);
    pub const D8: Self = Self::new(File::D, Rank::EIGHT);

    pub const E1: Self = Self::new(File::E, Rank::ONE);
    pub const E2: Self = Self::new(File::E, Rank::TWO);
    pub const E3: Self = Self::new(File::E, Rank::THREE);
    pub const E4: Self = Self::new(File::E, Rank::FOUR);
    pub const E5: Self = Self::new(File::E, Rank::FIVE);
    pub const E6: Self = Self::new(File::E, Rank::SIX);
    pub const E7: Self = Self::new(File::E, Rank::SEVEN);
    pub const E8: Self = Self::new(File::E, Rank::EIGHT);

    pub const F1: Self = Self::new(File::F, Rank::ONE);
    pub const F2: Self = Self::new(File::F, Rank::TWO);
    pub const F3: Self = Self::new(File::F, Rank::THREE);
    pub const F4: Self = Self::new(File::F, Rank::FOUR);
    pub const F5: Self = Self::new(File::F, Rank::FIVE);
    pub const F6: Self = Self::new(File::F, Rank::SIX);
    pub const F7: Self = Self::new(File::F, Rank::SEVEN);
    pub const F8: Self = Self::new(File::F, Rank::EIGHT);

    pub const G1: Self = Self::new(File::G, Rank::ONE);
    pub const G2: Self = Self::new(File::G, Rank::TWO);
    pub const G3: Self = Self::new(File::G, Rank::THREE);
    pub const G4: Self = Self::new(File::G, Rank::FOUR);
    pub const G5: Self = Self::new(File::G, Rank::FIVE);
    pub const G6: Self = Self::new(File::G, Rank::SIX);
    pub const G7: Self = Self::new(File::G, Rank::SEVEN);
    pub const G8: Self = Self::new(File::G, Rank::EIGHT);

    pub const H1: Self = Self::new(File::H, Rank::ONE);
    pub const H2: Self = Self::new(File::H, Rank::TWO);
    pub const H3: Self = Self::new(File::H, Rank::THREE);
    pub const H4: Self = Self::new(File::H, Rank::FOUR);
    pub const H5: Self = Self::new(File::H, Rank::FIVE);
    pub const H6: Self = Self::new(File::H, Rank::SIX);
    pub const H7: Self = Self::new(File::H, Rank::SEVEN);
    pub const H8: Self = Self::new(File::H, Rank::EIGHT);

    pub const MIN: u8 = 0;
    pub const MAX: u8 = 63;
    pub const COUNT: usize = 64;

    const RANK_MASK: u8 = 0b0011_1000;

    /// Returns an iterator over all available squares, from A1 to H8.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// let mut iter = Square::iter();
    /// assert_eq!(iter.len(), 64);
    /// assert_eq!(iter.next().unwrap(), Square::A1);
    /// assert_eq!(iter.last().unwrap(), Square::H8);
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// Creates a new [`Square`] from the provided [`File`] and [`Rank`].
    #[inline(always)]
    pub const fn new(file: File, rank: Rank) -> Self {
        // least-significant file mapping
        Self(file.0 ^ rank.0 << 3)
    }

    /// Creates a new [`Square`] from the provided index value.
    ///
    /// The provided `index` must be `[0, 63]` or else an error is returned.
    #[inline(always)]
    pub fn from_index(index: usize) -> Result<Self> {
        if index > Self::MAX as usize {
            bail!(
                "Invalid index for Square: Must be between [{}, {}]. Got {index}",
                Self::MIN,
                Self::MAX
            );
        }
        Ok(Self(index as u8))
    }

    /// Creates a new [`Square`] from the provided index value, without error checking.
    ///
    /// # Panics
    ///
    /// In debug builds, if `index` is greater than `63`.
    #[inline(always)]
    pub const fn from_index_unchecked(index: usize) -> Self {
        debug_assert!(index < 64, "Index must be between [0,64)");
        Self(index as u8)
    }

    /// Mirrors this [`Square`] across the horizontal axis of the board, so that A1 becomes A8.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!(Square::A1.flipped_rank(), Square::A8);
    /// assert_eq!(Square::C4.flipped_rank(), Square::C5);
    /// ```
    #[inline(always)]
    pub const fn flipped_rank(self) -> Self {
        Self(self.0 ^ Self::RANK_MASK)
    }

    /// If `color` is Black, flips the [`Rank`] of this [`Square`].
    /// If `color` is White, does nothing.
    ///
    /// This is how tables written from White's point of view are read for Black.
    ///
    /// # Example
    /// ```
    /// # use newt::{Color, Square};
    /// assert_eq!(Square::E2.rank_relative_to(Color::White), Square::E2);
    /// assert_eq!(Square::E2.rank_relative_to(Color::Black), Square::E7);
    /// ```
    #[inline(always)]
    pub const fn rank_relative_to(self, color: Color) -> Self {
        match color {
            Color::White => self,
            Color::Black => self.flipped_rank(),
        }
    }

    /// Fetches the [`File`] of this [`Square`].
    #[inline(always)]
    pub const fn file(&self) -> File {
        File(self.0 & 7)
    }

    /// Fetches the [`Rank`] of this [`Square`].
    #[inline(always)]
    pub const fn rank(&self) -> Rank {
        Rank(self.0 >> 3)
    }

    /// Fetches the index of this [`Square`], for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Number of files between `self` and `other`.
    #[inline(always)]
    pub const fn distance_files(&self, other: Self) -> u8 {
        self.file().0.abs_diff(other.file().0)
    }

    /// Number of ranks between `self` and `other`.
    #[inline(always)]
    pub const fn distance_ranks(&self, other: Self) -> u8 {
        self.rank().0.abs_diff(other.rank().0)
    }

    /// Number of king moves needed to walk from `self` to `other`.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!(Square::A1.distance_chebyshev(Square::H8), 7);
    /// assert_eq!(Square::C4.distance_chebyshev(Square::D6), 2);
    /// ```
    #[inline(always)]
    pub const fn distance_chebyshev(&self, other: Self) -> u8 {
        let files = self.distance_files(other);
        let ranks = self.distance_ranks(other);
        if files > ranks {
            files
        } else {
            ranks
        }
    }

    /// Creates a [`Square`] from a string such as `e4`.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!(Square::from_uci("c4").unwrap(), Square::C4);
    /// assert!(Square::from_uci("z0").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let bytes = square.as_bytes();
        if bytes.len() != 2 {
            bail!("Invalid Square string: String must contain exactly 2 characters. Got {square:?}")
        }
        let file = File::from_char(bytes[0] as char)?;
        let rank = Rank::from_char(bytes[1] as char)?;

        Ok(Self::new(file, rank))
    }

    /// Converts this [`Square`] to a string such as `e4`.
    #[inline(always)]
    pub fn to_uci(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    /// Alias for [`Bitboard::from_square`].
    #[inline(always)]
    pub const fn bitboard(&self) -> Bitboard {
        Bitboard::from_square(*self)
    }

    /// Attempt to offset this [`Square`] by the file and rank offsets.
    ///
    /// If the result would leave the board, `None` is returned.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!(Square::C4.offset(1, 1), Some(Square::D5));
    /// assert_eq!(Square::A1.offset(-1, -1), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let Some(file) = self.file().offset(file_delta) else {
            return None;
        };

        let Some(rank) = self.rank().offset(rank_delta) else {
            return None;
        };

        Some(Self::new(file, rank))
    }

    /// Offsets this [`Square`] `n` ranks towards the enemy side, from `color`'s point of view.
    #[inline(always)]
    pub const fn forward_by(&self, color: Color, n: u8) -> Option<Self> {
        let n = n as i8;
        match color {
            Color::White => self.offset(0, n),
            Color::Black => self.offset(0, -n),
        }
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl<T> Index<Square> for [T; Square::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Square> for [T; Square::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for Square {
    /// Displays the square's name and also its internal decimal value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.0)
    }
}

/// Represents one of eight ranks on a chess board.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
#[repr(transparent)]
pub struct Rank(pub(crate) u8);

impl Rank {
    pub const ONE: Self = Self(0);
    pub const TWO: Self = Self(1);
    pub const THREE: Self = Self(2);
    pub const FOUR: Self = Self(3);
    pub const FIVE: Self = Self(4);
    pub const SIX: Self = Self(5);
    pub const SEVEN: Self = Self(6);
    pub const EIGHT: Self = Self(7);

    pub const MIN: u8 = 0;
    pub const MAX: u8 = 7;
    pub const COUNT: usize = 8;

    /// Returns an iterator over all ranks, in ascending order.
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// Construct a new [`Rank`] from the provided value, ignoring safety checks.
    #[inline(always)]
    pub const fn new_unchecked(rank: u8) -> Self {
        debug_assert!(rank <= Self::MAX);
        Self(rank)
    }

    /// The rank a [`Color`]'s back pieces start on.
    #[inline(always)]
    pub const fn first(color: Color) -> Self {
        Self::ONE.relative_to(color)
    }

    /// If `color` is Black, flips this [`Rank`].
    ///
    /// # Example
    /// ```
    /// # use newt::{Color, Rank};
    /// assert_eq!(Rank::TWO.relative_to(Color::White), Rank::TWO);
    /// assert_eq!(Rank::TWO.relative_to(Color::Black), Rank::SEVEN);
    /// ```
    #[inline(always)]
    pub const fn relative_to(self, color: Color) -> Self {
        match color {
            Color::White => self,
            Color::Black => Self(Self::MAX - self.0),
        }
    }

    /// Creates a [`Rank`] from a character in `1..=8`.
    pub fn from_char(rank: char) -> Result<Self> {
        match rank {
            '1'..='8' => Ok(Self(rank as u8 - b'1')),
            _ => bail!("Invalid char for Rank: Must be between ['1', '8']. Got {rank:?}"),
        }
    }

    /// Fetches the inner index value of the [`Rank`].
    #[inline(always)]
    pub const fn inner(&self) -> u8 {
        self.0
    }

    /// Fetches the index of this [`Rank`], for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Attempt to offset this [`Rank`] by `delta`, returning `None` if it would leave the board.
    #[inline(always)]
    pub const fn offset(&self, delta: i8) -> Option<Self> {
        let rank = self.0 as i8 + delta;
        if rank < Self::MIN as i8 || rank > Self::MAX as i8 {
            None
        } else {
            Some(Self(rank as u8))
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (self.0 + b'1') as char)
    }
}

/// Represents one of eight files on a chess board.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
#[repr(transparent)]
pub struct File(pub(crate) u8);

impl File {
    pub const A: Self = Self(0);
    pub const B: Self = Self(1);
    pub const C: Self = Self(2);
    pub const D: Self = Self(3);
    pub const E: Self = Self(4);
    pub const F: Self = Self(5);
    pub const G: Self = Self(6);
    pub const H: Self = Self(7);

    pub const MIN: u8 = 0;
    pub const MAX: u8 = 7;
    pub const COUNT: usize = 8;

    /// Returns an iterator over all files, from A to H.
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// Construct a new [`File`] from the provided value, ignoring safety checks.
    #[inline(always)]
    pub const fn new_unchecked(file: u8) -> Self {
        debug_assert!(file <= Self::MAX);
        Self(file)
    }

    /// Creates a [`File`] from a character in `a..=h`. Case is ignored.
    pub fn from_char(file: char) -> Result<Self> {
        match file.to_ascii_lowercase() {
            c @ 'a'..='h' => Ok(Self(c as u8 - b'a')),
            _ => bail!("Invalid char for File: Must be between ['a', 'h']. Got {file:?}"),
        }
    }

    /// Fetches the inner index value of the [`File`].
    #[inline(always)]
    pub const fn inner(&self) -> u8 {
        self.0
    }

    /// Fetches the index of this [`File`], for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Attempt to offset this [`File`] by `delta`, returning `None` if it would leave the board.
    #[inline(always)]
    pub const fn offset(&self, delta: i8) -> Option<Self> {
        let file = self.0 as i8 + delta;
        if file < Self::MIN as i8 || file > Self::MAX as i8 {
            None
        } else {
            Some(Self(file as u8))
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (self.0 + b'a') as char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squares() {
        assert_eq!(Square::new(File::C, Rank::FOUR), Square::C4);
        assert_eq!(Square::C4.index(), 26);
        assert_eq!(Square::H8.file(), File::H);
        assert_eq!(Square::H8.rank(), Rank::EIGHT);
        assert!(Square::from_index(64).is_err());
    }

    #[test]
    fn test_parsing() {
        for square in Square::iter() {
            assert_eq!(Square::from_uci(&square.to_uci()).unwrap(), square);
        }
        assert!(Square::from_uci("i1").is_err());
        assert!(Square::from_uci("a9").is_err());
        assert!(Square::from_uci("a10").is_err());
    }

    #[test]
    fn test_flipping() {
        for square in Square::iter() {
            let flipped = square.flipped_rank();
            assert_eq!(flipped.file(), square.file());
            assert_eq!(flipped.rank(), square.rank().relative_to(Color::Black));
            assert_eq!(flipped.flipped_rank(), square);
        }
    }

    #[test]
    fn test_forward() {
        assert_eq!(Square::E2.forward_by(Color::White, 2), Some(Square::E4));
        assert_eq!(Square::E7.forward_by(Color::Black, 2), Some(Square::E5));
        assert_eq!(Square::E8.forward_by(Color::White, 1), None);
    }
}
