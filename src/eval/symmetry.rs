/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{Position, Score};

use super::evaluate;

/// Positions the evaluator is checked against by default.
///
/// Openings, middlegames, and endings, with both sides to move and with and without castling rights.
pub const SYMMETRY_FENS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    "rnbqkb1r/pp1p1ppp/4pn2/2p5/2PP4/2N5/PP2PPPP/R1BQKBNR w KQkq - 0 4",
    "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/3P1N2/PPP2PPP/RNBQK2R b KQkq - 2 5",
    "r2q1rk1/pp2bppp/2n1pn2/3p4/3P4/2NBPN2/PP3PPP/R2Q1RK1 w - - 4 10",
    "2r3k1/pp3ppp/4p3/3pP3/3P2Q1/2q5/P4PPP/4R1K1 b - - 3 24",
    "r1b2rk1/2q1bppp/p2p1n2/np2p3/3PP3/5N1P/PPBN1PP1/R1BQR1K1 w - - 1 13",
    "3r1rk1/p4ppp/1p2p3/2b5/2P1n3/P3BN2/1P2BPPP/3R1RK1 b - - 0 19",
    "6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1",
    "8/8/4k3/3p4/3P4/4K3/8/8 b - - 0 1",
    "8/5pk1/6p1/7p/7P/6P1/5PK1/8 w - - 0 40",
    "4k3/8/8/8/8/8/3N4/4K1B1 w - - 0 1",
    "8/8/8/3k4/8/3K4/3R4/8 w - - 0 1",
    "r5k1/5ppp/8/8/8/8/5PPP/1N4K1 w - - 0 1",
    "2kr3r/ppp2ppp/2n5/2b1p3/4P1q1/2NP4/PPP1BPPP/R1BQ1RK1 w - - 0 11",
    "1k6/1pp5/p7/8/8/P7/1PP5/1K6 w - - 0 1",
    "q5k1/5ppp/8/8/8/8/5PPP/3Q2K1 b - - 0 1",
    "4r1k1/1p3ppp/p2b4/3P4/8/1B3N2/PP3PPP/4R1K1 w - - 2 21",
    "r3k3/8/8/8/8/8/8/4K2R w Kq - 0 1",
    "8/8/8/4k3/8/8/2nb4/4K3 b - - 0 1",
];

/// Result of evaluating one position and its mirror image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetryOutcome {
    /// The position, as given.
    pub fen: String,

    /// Evaluation of the position.
    pub score: Score,

    /// Evaluation of the mirrored position.
    pub mirrored_score: Score,
}

impl SymmetryOutcome {
    /// Evaluates `position` and its mirror image.
    pub fn new(position: &Position) -> Self {
        Self {
            fen: position.to_fen(),
            score: evaluate(position),
            mirrored_score: evaluate(&position.mirrored()),
        }
    }

    /// Whether both sides of the board were scored identically.
    #[inline(always)]
    pub fn passed(&self) -> bool {
        self.score == self.mirrored_score
    }
}

/// Outcome of a whole mirror-symmetry run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymmetryReport {
    /// One outcome per position, in the order they were given.
    pub outcomes: Vec<SymmetryOutcome>,
}

impl SymmetryReport {
    #[inline(always)]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    #[inline(always)]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    #[inline(always)]
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Percentage of positions that failed, in `[0, 100]`.
    pub fn failure_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.failed() as f64 / self.total() as f64 * 100.0
        }
    }

    /// Returns `true` if every position passed.
    #[inline(always)]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

impl fmt::Display for SymmetryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, outcome) in self.outcomes.iter().enumerate() {
            if outcome.passed() {
                writeln!(f, "Position {}\t--->\tPASSED", i + 1)?;
            } else {
                writeln!(
                    f,
                    "Position {}\t--->\tFAILED: {} != {}\t(FEN: {})",
                    i + 1,
                    outcome.score,
                    outcome.mirrored_score,
                    outcome.fen
                )?;
            }
        }

        writeln!(f, "{} positions analyzed.", self.total())?;
        writeln!(f, "{} positions passed.", self.passed())?;
        write!(
            f,
            "{} positions failed. ({:.2}%)",
            self.failed(),
            self.failure_rate()
        )
    }
}

/// Evaluates every position in `fens` and its mirror image, and compares the two scores.
///
/// Fails if any of the FENs cannot be parsed.
///
/// # Example
/// ```
/// # use newt::*;
/// let report = check_symmetry(SYMMETRY_FENS).unwrap();
/// assert_eq!(report.total(), SYMMETRY_FENS.len());
/// assert!(report.is_success(), "{report}");
/// ```
pub fn check_symmetry<I, S>(fens: I) -> Result<SymmetryReport>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = SymmetryReport::default();

    for (i, fen) in fens.into_iter().enumerate() {
        let fen = fen.as_ref();
        let position = Position::from_fen(fen)
            .with_context(|| format!("Failed to parse position {}: {fen:?}", i + 1))?;

        let outcome = SymmetryOutcome::new(&position);
        if outcome.passed() {
            info!("Position {} passed ({})", i + 1, outcome.score);
        } else {
            warn!(
                "Position {} failed: {} != {} ({fen})",
                i + 1,
                outcome.score,
                outcome.mirrored_score
            );
        }

        report.outcomes.push(outcome);
    }

    Ok(report)
}

/// Extracts FENs from text holding one per line, skipping blank lines and `#` comments.
///
/// # Example
/// ```
/// # use newt::fens_from_str;
/// let text = "# openings\n\n4k3/8/8/8/8/8/8/4K3 w - - 0 1\n  8/8/8/8/8/8/8/K6k b - - 0 1  \n";
/// assert_eq!(fens_from_str(text).count(), 2);
/// ```
pub fn fens_from_str(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_is_symmetric() {
        let report = check_symmetry(SYMMETRY_FENS).unwrap();
        assert_eq!(report.total(), SYMMETRY_FENS.len());
        assert_eq!(report.failed(), 0, "{report}");
        assert_eq!(report.failure_rate(), 0.0);
    }

    #[test]
    fn test_invalid_fen_is_an_error() {
        let err = check_symmetry(["4k3/8/8/8/8/8/8/4K3 w - - 0 1", "not a fen"]).unwrap_err();
        assert!(err.to_string().contains("position 2"), "{err}");
    }

    #[test]
    fn test_report_counts_failures() {
        let pass = SymmetryOutcome {
            fen: String::new(),
            score: Score::new(5),
            mirrored_score: Score::new(5),
        };
        let fail = SymmetryOutcome {
            mirrored_score: Score::new(-5),
            ..pass.clone()
        };
        let report = SymmetryReport {
            outcomes: vec![pass.clone(), fail, pass.clone(), pass],
        };

        assert_eq!(report.passed(), 3);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failure_rate(), 25.0);
        assert!(!report.is_success());

        let text = report.to_string();
        assert!(text.contains("Position 2\t--->\tFAILED: 5 != -5"), "{text}");
        assert!(text.ends_with("1 positions failed. (25.00%)"), "{text}");
    }
}
