/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Bitboards, squares, pieces, moves, attacks, and positions.
mod board;

/// Command-line interface of the `newt` binary.
mod cli;

/// Evaluation of chess positions.
mod eval;

/// History heuristic.
mod history;

/// Piece-Square tables.
mod psqt;

/// Centipawn scores and middlegame/endgame pairs.
mod score;

/// Per-thread search state and the pool that owns it.
mod thread;

/// Tunable search parameters.
mod tune;

/// Misc utility functions, constants, and types.
mod utils;

pub use board::*;
pub use cli::*;
pub use eval::*;
pub use history::*;
pub use psqt::*;
pub use score::*;
pub use thread::*;
pub use utils::*;
