/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Maximum number of plies a single search may reach.
macro_rules! max_ply {
    () => {
        128
    };
}
pub(crate) use max_ply;

/// Upper bound on the magnitude of any history score.
macro_rules! max_history_bonus {
    () => {
        16_384
    };
}
pub(crate) use max_history_bonus;

/// Multiplier of the depth when computing a history bonus.
macro_rules! history_multiplier {
    () => {
        300
    };
}
pub(crate) use history_multiplier;

/// Subtracted from the scaled depth when computing a history bonus.
macro_rules! history_offset {
    () => {
        250
    };
}
pub(crate) use history_offset;

/// Quiet moves that failed to cut off are penalized by the bonus divided by this.
macro_rules! history_malus_divisor {
    () => {
        2
    };
}
pub(crate) use history_malus_divisor;
