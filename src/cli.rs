/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use crate::{
    attacks_for, check_symmetry, fens_from_str, Bitboard, Evaluator, Move, MoveList, PieceKind,
    Position, Score, SearchInfo, SearchThread, Square, ThreadPool, FEN_STARTPOS, PSQT,
    SYMMETRY_FENS,
};

/// Evaluation and search-state diagnostics for the Newt chess engine core.
#[derive(Debug, Clone, Parser)]
#[command(version, about, rename_all = "lower")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// A single diagnostic to run.
#[derive(Debug, Clone, Subcommand)]
#[command(rename_all = "lower")]
pub enum Command {
    /// Print an evaluation of a position.
    Eval {
        /// FEN of the position to evaluate. Defaults to the starting position.
        fen: Vec<String>,

        /// If set, a per-term breakdown of the evaluation will be printed.
        #[arg(short, long, default_value = "false")]
        pretty: bool,
    },

    /// Check that every position evaluates exactly like its mirror image.
    ///
    /// Exits with an error if any position fails.
    #[command(alias = "sym")]
    Symmetry {
        /// File with one FEN per line. Blank lines and lines starting with `#` are skipped.
        ///
        /// If omitted, a built-in suite is used.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print the FEN of the mirror image of a position.
    Mirror {
        /// FEN of the position to mirror.
        #[arg(required = true)]
        fen: Vec<String>,
    },

    /// Print the Piece-Square table(s) for a piece kind, or a single entry of one.
    #[command(aliases = ["psq", "pst"])]
    Psqt {
        /// The kind of piece whose table to print.
        kind: PieceKind,

        /// Only print the value at this square.
        square: Option<Square>,
    },

    /// Build a pool of search threads and run each of them once on a position.
    Threads {
        /// Number of threads in the pool.
        count: usize,

        /// FEN of the position to search. Defaults to the starting position.
        fen: Vec<String>,
    },
}

impl Cli {
    /// Executes the parsed command, returning `false` if a diagnostic did not pass.
    pub fn run(self) -> Result<bool> {
        match self.command {
            Command::Eval { fen, pretty } => eval(&parse_fen(&fen)?, pretty),
            Command::Symmetry { file } => return symmetry(file),
            Command::Mirror { fen } => println!("{}", parse_fen(&fen)?.mirrored()),
            Command::Psqt { kind, square } => psqt(kind, square),
            Command::Threads { count, fen } => threads(count, &parse_fen(&fen)?)?,
        }

        Ok(true)
    }
}

/// Joins the whitespace-separated pieces of a FEN given on the command line.
fn parse_fen(parts: &[String]) -> Result<Position> {
    if parts.is_empty() {
        return FEN_STARTPOS.parse();
    }

    let fen = parts.join(" ");
    fen.parse().with_context(|| format!("Invalid FEN {fen:?}"))
}

/// Executes the `eval` command, printing an evaluation of the position.
fn eval(position: &Position, pretty: bool) {
    let evaluator = Evaluator::new(position);
    if pretty {
        println!("{evaluator}");
    } else {
        println!("{}", evaluator.eval());
    }
}

/// Executes the `symmetry` command.
fn symmetry(file: Option<PathBuf>) -> Result<bool> {
    let report = match file {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let fens = fens_from_str(&text).collect::<Vec<_>>();
            if fens.is_empty() {
                bail!("No positions found in {}", path.display());
            }
            check_symmetry(fens)?
        }
        None => check_symmetry(SYMMETRY_FENS)?,
    };

    println!("{report}");
    Ok(report.is_success())
}

/// Executes the `psqt` command.
fn psqt(kind: PieceKind, square: Option<Square>) {
    let table = PSQT.table(kind);
    match square {
        Some(square) => println!("{kind} on {square}: {}", table[square]),
        None => {
            let mg = crate::Table::from_fn(|sq| table[sq].mg);
            let eg = crate::Table::from_fn(|sq| table[sq].eg);
            println!("{kind} (middlegame):\n{mg:4}\n\n{kind} (endgame):\n{eg:4}");
        }
    }
}

/// What a single search thread found during a one-ply probe.
#[derive(Debug, Clone, Copy)]
struct ProbeResult {
    id: usize,
    static_eval: Score,
    best: Option<(Move, Score)>,
    quiets: usize,
    nodes: u64,
}

/// Executes the `threads` command.
fn threads(count: usize, position: &Position) -> Result<()> {
    if count == 0 {
        bail!("Thread pool must have at least one thread");
    }

    let mut pool = ThreadPool::new(count)?;
    let mut info = SearchInfo::default();
    info.set_depth(1);
    pool.init_threads(position, &info);

    let results = pool.run(probe)?;
    for res in results {
        let best = match res.best {
            Some((mv, score)) => format!("{mv} ({score})"),
            None => String::from("none"),
        };
        println!(
            "search-{}: static eval {}, best quiet move {best}, {} quiet moves, {} nodes",
            res.id, res.static_eval, res.quiets, res.nodes
        );
    }

    Ok(())
}

/// Pseudo-legal quiet moves of the side to move: non-capturing piece moves and single pawn pushes.
fn quiet_moves(position: &Position) -> MoveList {
    let color = position.side_to_move();
    let occupied = position.occupied();
    let last_rank = Bitboard::first_rank(color.opponent());
    let mut moves = MoveList::new();

    for kind in PieceKind::all() {
        for from in position.pieces(color, kind) {
            let targets = match kind {
                PieceKind::Pawn => from.bitboard().forward(color) & !occupied & !last_rank,
                _ => attacks_for(kind, color, from, occupied) & !occupied,
            };

            for to in targets {
                // A position has far fewer quiet moves than the list can hold
                if moves.try_push(Move::new(from, to)).is_err() {
                    return moves;
                }
            }
        }
    }

    moves
}

/// Searches one ply of quiet moves on this thread's position, feeding the move-ordering tables.
fn probe(thread: &mut SearchThread) -> ProbeResult {
    let ply = 0;
    thread.info.clear();

    let static_eval = thread.evaluate();
    thread.set_static_eval(ply, static_eval);
    thread.info.nodes += 1;

    let quiets = quiet_moves(&thread.position);
    let mut best: Option<(Move, Score)> = None;

    for &mv in &quiets {
        let mut child = thread.position;
        if let Some(piece) = child.take(mv.from()) {
            child.place(piece, mv.to());
        }
        child.set_side_to_move(child.side_to_move().opponent());

        let score = -crate::evaluate(&child);
        thread.info.nodes += 1;

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((mv, score));
        }
    }

    if let Some((mv, _)) = best {
        thread.info.fail_high += 1;
        thread.record_killer(ply, mv);
        thread.update_move_heuristics(ply, mv, thread.info.depth, &quiets);
    }

    thread.info.seldepth = 1;
    info!(
        "search-{} visited {} nodes in {:?}",
        thread.id(),
        thread.info.nodes,
        thread.info.starttime.elapsed()
    );

    ProbeResult {
        id: thread.id(),
        static_eval,
        best,
        quiets: quiets.len(),
        nodes: thread.info.nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_commands() {
        let cli = Cli::try_parse_from(["newt", "eval", "--pretty"]).unwrap();
        assert!(matches!(cli.command, Command::Eval { pretty: true, ref fen } if fen.is_empty()));

        let cli = Cli::try_parse_from(["newt", "threads", "4", "8/8/8/8/8/8/8/K6k", "w"]).unwrap();
        assert!(matches!(cli.command, Command::Threads { count: 4, ref fen } if fen.len() == 2));

        let cli = Cli::try_parse_from(["newt", "psqt", "knight", "e4"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Psqt { kind: PieceKind::Knight, square: Some(Square::E4) }
        ));

        assert!(Cli::try_parse_from(["newt", "mirror"]).is_err());
    }

    #[test]
    fn test_parse_fen_joins_parts() {
        let parts = ["4k3/8/8/8/8/8/8/4K3", "b", "-", "-", "0", "1"].map(String::from);
        let position = parse_fen(&parts).unwrap();
        assert_eq!(position.to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
        assert_eq!(parse_fen(&[]).unwrap(), Position::default());
    }

    #[test]
    fn test_quiet_moves_in_start_position() {
        // Double pushes are not generated: 8 single pushes and 4 knight moves
        let moves = quiet_moves(&Position::default());
        assert_eq!(moves.len(), 12);
        assert!(moves.contains(&Move::new(Square::G1, Square::F3)));
        assert!(moves.contains(&Move::new(Square::E2, Square::E3)));
    }

    #[test]
    fn test_probe_feeds_heuristics() {
        let mut pool = ThreadPool::new(1).unwrap();
        pool.init_threads(&Position::default(), &SearchInfo::default());

        let thread = pool.at_mut(0).unwrap();
        let result = probe(thread);
        let (best, _) = result.best.unwrap();

        assert_eq!(result.quiets, 12);
        assert_eq!(result.nodes, 13);
        assert_eq!(thread.killers(0)[0], Some(best));
        assert!(thread.history_score(crate::Color::White, best) > 0);
    }
}
