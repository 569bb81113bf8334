/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Attack lookups for every kind of piece.
mod attacks;

/// Sets of squares, stored as the bits of a `u64`.
mod bitboard;

/// Compact move encoding.
mod moves;

/// Colors, piece kinds, and pieces.
mod piece;

/// The board and the FEN state around it.
mod position;

/// Squares, files, and ranks.
mod square;

/// Containers with one entry per square.
mod table;

pub use attacks::*;
pub use bitboard::*;
pub use moves::*;
pub use piece::*;
pub use position::*;
pub use square::*;
pub use table::*;
