/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use crate::{File, Rank, Square};

/// A generic container of 64 elements, one per [`Square`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Table<T>([T; Square::COUNT]);

impl<T> Table<T> {
    /// Create a new [`Table`] by applying `f` to each [`Square`].
    #[inline(always)]
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Square) -> T,
    {
        Self(std::array::from_fn(|i| f(Square(i as u8))))
    }

    /// Create a new [`Table`] with the provided values, indexed A1 to H8.
    #[inline(always)]
    pub const fn new(values: [T; Square::COUNT]) -> Self {
        Self(values)
    }

    /// Create a new [`Table`] with every value set to `value`.
    #[inline(always)]
    pub const fn splat(value: T) -> Self
    where
        T: Copy,
    {
        Self([value; Square::COUNT])
    }

    /// Get the value of this [`Table`] at the index of `square`.
    #[inline(always)]
    pub const fn get(&self, square: Square) -> &T {
        &self.0[square.index()]
    }

    /// Set the value of this [`Table`] at the index of `square`.
    #[inline(always)]
    pub fn set(&mut self, square: Square, value: T) {
        self.0[square] = value;
    }

    /// Iterate over every value, ordered A1 to H8.
    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Overwrite every entry of this [`Table`] with `value`.
    #[inline(always)]
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.0.fill(value);
    }
}

impl<T> Default for Table<T>
where
    T: Default + Copy,
{
    #[inline(always)]
    fn default() -> Self {
        Self::splat(T::default())
    }
}

impl<T, Idx> Index<Idx> for Table<T>
where
    [T; Square::COUNT]: Index<Idx, Output = T>,
{
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Idx) -> &Self::Output {
        &self.0[index]
    }
}

impl<T, Idx> IndexMut<Idx> for Table<T>
where
    [T; Square::COUNT]: IndexMut<Idx, Output = T>,
{
    #[inline(always)]
    fn index_mut(&mut self, index: Idx) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<T: fmt::Display> fmt::Display for Table<T> {
    /// Prints the table as a board, rank 8 on top.
    ///
    /// Honors the formatter's width, defaulting to the widest entry.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = f
            .width()
            .unwrap_or_else(|| self.0.iter().map(|v| v.to_string().len()).max().unwrap_or(1));

        for rank in Rank::iter().rev() {
            write!(f, "{rank}| ")?;
            for file in File::iter() {
                let value = self.0[Square::new(file, rank)].to_string();
                write!(f, "{value:>width$} ")?;
            }
            writeln!(f)?;
        }
        write!(f, " +")?;
        for _ in File::iter() {
            write!(f, "-{}", "-".repeat(width))?;
        }
        write!(f, "\n   ")?;
        for file in File::iter() {
            write!(f, "{:>width$} ", file.to_string())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_indexing() {
        let mut table = Table::from_fn(|sq| sq.index() as i32);
        assert_eq!(table[Square::C4], 26);
        table.set(Square::C4, -1);
        assert_eq!(*table.get(Square::C4), -1);
        table.fill(7);
        assert!(Square::iter().all(|sq| table[sq] == 7));
    }

    #[test]
    fn test_table_display_has_every_rank() {
        let table = Table::splat(0u8);
        let shown = table.to_string();
        for rank in Rank::iter() {
            assert!(shown.contains(&format!("{rank}| ")));
        }
    }
}
