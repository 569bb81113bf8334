/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{Bitboard, Color, PieceKind, Position, Score, TaperedScore};

/// Pawn-free endings that cannot be won, phase, and raw material.
mod material;
/// King shelter, pawn storms, and attacks on the king zone.
mod king;
/// Precomputed masks.
mod masks;
/// Tuned weights.
mod params;
/// Pawn structure and space.
mod pawns;
/// Mobility and per-piece placement.
mod pieces;
/// Mirror-symmetry diagnostic.
mod symmetry;

pub use masks::*;
pub use material::{is_material_draw, non_pawn_material, phase};
pub use params::*;
pub use pawns::passed_pawns;
pub use symmetry::*;

/// A single feature of the evaluation, as reported in a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    Material,
    Psqt,
    Imbalance,
    Pawns,
    Space,
    Mobility,
    Pieces,
    KingSafety,
}

impl Term {
    /// Number of terms.
    pub const COUNT: usize = 8;

    /// All terms, in the order they are evaluated.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        use Term::*;
        [
            Material, Psqt, Imbalance, Pawns, Space, Mobility, Pieces, KingSafety,
        ]
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Material => "Material",
            Self::Psqt => "PSQT",
            Self::Imbalance => "Imbalance",
            Self::Pawns => "Pawns",
            Self::Space => "Space",
            Self::Mobility => "Mobility",
            Self::Pieces => "Pieces",
            Self::KingSafety => "King safety",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Scratch space shared by the feature modules during a single evaluation.
///
/// Everything starts out empty. Fields are filled in by the module that owns them and only read
/// by modules that run afterwards.
#[derive(Clone, Debug, Default)]
pub struct EvalState {
    /// Running total, from White's perspective.
    pub total: TaperedScore,

    /// Contribution of every term, from the perspective of the side it was computed for.
    pub terms: [[TaperedScore; Color::COUNT]; Term::COUNT],

    /// Squares attacked by all pieces of a kind and color.
    pub attacks: [[Bitboard; Color::COUNT]; PieceKind::COUNT],

    /// Pawns with no enemy pawn ahead of them on their own or adjacent files.
    pub passed_pawns: [Bitboard; Color::COUNT],

    /// Number of enemy pieces that hit the ring around this side's king.
    pub king_zone_attackers: [i32; Color::COUNT],

    /// Weighted count of king-ring squares attacked by enemy pieces.
    pub king_zone_attack_units: [i32; Color::COUNT],
}

impl EvalState {
    /// Adds `score`, computed from `color`'s perspective, to `term`.
    #[inline(always)]
    pub fn add(&mut self, term: Term, color: Color, score: TaperedScore) {
        self.terms[term.index()][color] += score;
        self.total += score * color.negation_multiplier();
    }

    /// The contribution of `term` for `color`, from `color`'s perspective.
    #[inline(always)]
    pub fn term(&self, term: Term, color: Color) -> TaperedScore {
        self.terms[term.index()][color]
    }
}

/// Encapsulates the logic of scoring a chess position.
///
/// Every feature is computed as a `(middlegame, endgame)` pair for both sides, and the totals are
/// blended by [`phase`] into a single [`Score`] relative to the side to move.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    /// The position being evaluated.
    position: &'a Position,

    /// Per-term breakdown. Left empty if the position is a material draw.
    state: EvalState,

    /// Game phase, in `[0, MAX_PHASE]`.
    phase: i32,

    /// Whether the position was recognized as an insufficient-material draw.
    is_draw: bool,
}

impl<'a> Evaluator<'a> {
    /// Construct a new [`Evaluator`], running every feature module on `position`.
    pub fn new(position: &'a Position) -> Self {
        let board = position.board();
        let mut state = EvalState::default();
        let is_draw = is_material_draw(board);

        if !is_draw {
            for color in Color::all() {
                material::material_and_psqt(board, color, &mut state);
                material::imbalance(board, color, &mut state);
            }

            // Pawn attacks and passers of both sides are needed from here on
            for color in Color::all() {
                pawns::pawns(board, color, &mut state);
            }
            for color in Color::all() {
                pawns::space(board, color, &mut state);
            }

            for color in Color::all() {
                for kind in PieceKind::minors_and_majors() {
                    pieces::mobility(board, color, kind, &mut state);
                }
            }
            for color in Color::all() {
                for kind in PieceKind::minors_and_majors() {
                    pieces::pieces(board, color, kind, &mut state);
                }
            }

            // Needs the king-zone counters from mobility
            for color in Color::all() {
                king::king_safety(board, color, &mut state);
            }
        }

        Self {
            position,
            state,
            phase: phase(board),
            is_draw,
        }
    }

    /// Evaluate this position from the side-to-move's perspective.
    ///
    /// A positive/high number is good for the side-to-move, while a negative number is better for the opponent.
    /// A score of 0 is considered equal.
    #[inline(always)]
    pub fn eval(&self) -> Score {
        if self.is_draw {
            return Score::DRAW;
        }

        let stm = self.position.side_to_move().negation_multiplier();
        (self.state.total.taper(self.phase) + TEMPO * stm) * stm
    }

    /// The game phase of this position.
    #[inline(always)]
    pub const fn phase(&self) -> i32 {
        self.phase
    }

    /// The per-term breakdown of this evaluation.
    #[inline(always)]
    pub const fn state(&self) -> &EvalState {
        &self.state
    }

    /// Whether the position was scored as an insufficient-material draw.
    #[inline(always)]
    pub const fn is_material_draw(&self) -> bool {
        self.is_draw
    }
}

impl fmt::Display for Evaluator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.position.board())?;

        if self.is_draw {
            writeln!(f, "Insufficient material")?;
        } else {
            let rule = format!("+{:-<15}+{:-<16}+{:-<16}+{:-<16}+", "", "", "", "");
            writeln!(f, "{rule}")?;
            writeln!(f, "| {:<13} | {:^14} | {:^14} | {:^14} |", "Term", "White", "Black", "Total")?;
            writeln!(f, "{rule}")?;

            for term in Term::all() {
                let white = self.state.term(term, Color::White);
                let black = self.state.term(term, Color::Black);
                writeln!(
                    f,
                    "| {term:<13} | {white:>14} | {black:>14} | {:>14} |",
                    white - black
                )?;
            }

            writeln!(f, "{rule}")?;
            writeln!(f, "| {:<13} | {:>14} | {:>14} | {:>14} |", "Total", "", "", self.state.total)?;
            writeln!(f, "{rule}")?;
        }

        writeln!(f, "Phase: {}/{}", self.phase, crate::MAX_PHASE)?;
        write!(
            f,
            "Score: {} ({} to move)",
            self.eval(),
            self.position.side_to_move().name()
        )
    }
}

/// Evaluates `position` from the side-to-move's perspective.
///
/// # Example
/// ```
/// # use newt::*;
/// let startpos = Position::default();
/// assert_eq!(evaluate(&startpos), TEMPO);
/// ```
#[inline(always)]
pub fn evaluate(position: &Position) -> Score {
    Evaluator::new(position).eval()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FEN_KIWIPETE, FEN_STARTPOS};

    fn eval(fen: &str) -> Score {
        evaluate(&fen.parse().unwrap())
    }

    #[test]
    fn test_startpos_is_tempo() {
        assert_eq!(eval(FEN_STARTPOS), TEMPO);
        assert_eq!(
            eval("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1"),
            TEMPO
        );
    }

    #[test]
    fn test_state_total_matches_terms() {
        let position: Position = FEN_KIWIPETE.parse().unwrap();
        let evaluator = Evaluator::new(&position);
        let state = evaluator.state();

        let summed = Term::all()
            .into_iter()
            .map(|term| state.term(term, Color::White) - state.term(term, Color::Black))
            .sum::<TaperedScore>();
        assert_eq!(summed, state.total);
    }

    #[test]
    fn test_side_to_move_flips_sign() {
        let white: Position = FEN_KIWIPETE.parse().unwrap();
        let mut black = white.clone();
        black.set_side_to_move(Color::Black);

        let raw = Evaluator::new(&white).state().total.taper(phase(&white));
        assert_eq!(evaluate(&white), raw + TEMPO);
        assert_eq!(evaluate(&black), -raw + TEMPO);
    }

    #[test]
    fn test_material_draw_ignores_tempo() {
        assert_eq!(eval("8/8/4k3/8/8/2K5/8/8 w - - 0 1"), Score::DRAW);
        assert!(eval("4k3/8/8/8/8/8/8/2B1K1N1 b - - 0 1") < 0);
    }

    #[test]
    fn test_extra_queen_is_winning() {
        let score = eval("3qk3/pppppppp/8/8/8/8/PPPPPPPP/3QKQ2 w - - 0 1");
        assert!(score > 800, "an extra queen should be worth a lot, got {score}");
    }

    #[test]
    fn test_trace_lists_every_term() {
        let position = Position::default();
        let trace = Evaluator::new(&position).to_string();
        for term in Term::all() {
            assert!(trace.contains(term.name()), "missing {term} in trace:\n{trace}");
        }
        assert!(trace.contains("Phase: 24/24"));
    }
}
