/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

/// Highest possible game phase, reached when all non-pawn material is on the board.
pub const MAX_PHASE: i32 = 24;

/// A side-relative evaluation, in centipawns.
///
/// Positive values favor the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Score(pub(crate) i32);

impl Score {
    /// Largest possible score ever achievable.
    pub const INF: Self = Self(i16::MAX as i32);

    /// Score of a draw.
    pub const DRAW: Self = Self(0);

    /// Creates a new [`Score`] from a centipawn value.
    #[inline(always)]
    pub const fn new(centipawns: i32) -> Self {
        Self(centipawns)
    }

    /// The centipawn value of this [`Score`].
    #[inline(always)]
    pub const fn inner(&self) -> i32 {
        self.0
    }

    /// Returns the absolute value of this [`Score`].
    #[inline(always)]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// "Normalizes" a score so that it can be printed as a float, in pawns.
    #[inline(always)]
    pub fn normalize(&self) -> f32 {
        self.0 as f32 / 100.0
    }
}

macro_rules! impl_binary_op {
    ($trait:tt, $fn:ident) => {
        impl std::ops::$trait for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: Self) -> Self::Output {
                Self(std::ops::$trait::$fn(self.0, rhs.0))
            }
        }

        impl std::ops::$trait<i32> for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: i32) -> Self::Output {
                Self(std::ops::$trait::$fn(self.0, rhs))
            }
        }
    };
}

macro_rules! impl_binary_op_assign {
    ($trait:tt, $fn:ident) => {
        impl std::ops::$trait for Score {
            #[inline(always)]
            fn $fn(&mut self, rhs: Self) {
                std::ops::$trait::$fn(&mut self.0, rhs.0);
            }
        }

        impl std::ops::$trait<i32> for Score {
            #[inline(always)]
            fn $fn(&mut self, rhs: i32) {
                std::ops::$trait::$fn(&mut self.0, rhs);
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);
impl_binary_op!(Div, div);

impl_binary_op_assign!(AddAssign, add_assign);
impl_binary_op_assign!(SubAssign, sub_assign);

impl std::ops::Neg for Score {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl PartialEq<i32> for Score {
    fn eq(&self, other: &i32) -> bool {
        self.0.eq(other)
    }
}

impl PartialOrd<i32> for Score {
    fn partial_cmp(&self, other: &i32) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

impl fmt::Display for Score {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A pair of middlegame and endgame values.
///
/// Every evaluation weight is one of these. They are summed up over the whole board
/// and only blended into a single [`Score`] at the very end, by [`TaperedScore::taper`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct TaperedScore {
    pub mg: i32,
    pub eg: i32,
}

impl TaperedScore {
    /// Zero in both game stages.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new [`TaperedScore`] from its middlegame and endgame values.
    #[inline(always)]
    pub const fn new(mg: i32, eg: i32) -> Self {
        Self { mg, eg }
    }

    /// `const` analog of [`std::ops::Add::add`].
    #[inline(always)]
    pub const fn add(self, rhs: Self) -> Self {
        Self::new(self.mg + rhs.mg, self.eg + rhs.eg)
    }

    /// `const` analog of [`std::ops::Mul::mul`] with a scalar.
    #[inline(always)]
    pub const fn scale(self, factor: i32) -> Self {
        Self::new(self.mg * factor, self.eg * factor)
    }

    /// Blends the two values according to `phase`, in `[0, MAX_PHASE]`.
    ///
    /// A full board (`phase == MAX_PHASE`) yields the middlegame value and a bare board the endgame value.
    /// Integer division truncates toward zero, so `taper` is odd: `taper(-x) == -taper(x)`.
    ///
    /// # Example
    /// ```
    /// # use newt::TaperedScore;
    /// let score = TaperedScore::new(-100, -50);
    /// assert_eq!(score.taper(5), -60);
    /// assert_eq!((-score).taper(5), 60);
    /// ```
    #[inline(always)]
    pub const fn taper(&self, phase: i32) -> Score {
        debug_assert!(0 <= phase && phase <= MAX_PHASE);
        Score((phase * self.mg + (MAX_PHASE - phase) * self.eg) / MAX_PHASE)
    }
}

impl std::ops::Add for TaperedScore {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

impl std::ops::Sub for TaperedScore {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.mg - rhs.mg, self.eg - rhs.eg)
    }
}

impl std::ops::Mul<i32> for TaperedScore {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: i32) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Neg for TaperedScore {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self::new(-self.mg, -self.eg)
    }
}

impl std::ops::AddAssign for TaperedScore {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        self.mg += rhs.mg;
        self.eg += rhs.eg;
    }
}

impl std::ops::SubAssign for TaperedScore {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        self.mg -= rhs.mg;
        self.eg -= rhs.eg;
    }
}

impl std::iter::Sum for TaperedScore {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, s| acc + s)
    }
}

impl fmt::Display for TaperedScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = format!("({}, {})", self.mg, self.eg);
        f.pad(&shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taper_endpoints() {
        let score = TaperedScore::new(120, -40);
        assert_eq!(score.taper(MAX_PHASE), 120);
        assert_eq!(score.taper(0), -40);
        assert_eq!(score.taper(12), 40);
    }

    #[test]
    fn test_taper_truncates_toward_zero() {
        // (5 * -100 + 19 * -50) / 24 = -1450 / 24 = -60.41..
        assert_eq!(TaperedScore::new(-100, -50).taper(5), -60);
        assert_eq!(TaperedScore::new(100, 50).taper(5), 60);
        assert_eq!(TaperedScore::new(1, 0).taper(23), 0);
        assert_eq!(TaperedScore::new(-1, 0).taper(23), 0);
    }

    #[test]
    fn test_tapered_arithmetic() {
        let a = TaperedScore::new(3, -7);
        let b = TaperedScore::new(-2, 5);
        assert_eq!(a + b, TaperedScore::new(1, -2));
        assert_eq!(a - b, TaperedScore::new(5, -12));
        assert_eq!(a * 3, TaperedScore::new(9, -21));
        assert_eq!(-a, TaperedScore::new(-3, 7));
        assert_eq!([a, b, a].into_iter().sum::<TaperedScore>(), TaperedScore::new(4, -9));
    }
}
