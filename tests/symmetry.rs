/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use newt::{
    check_symmetry, evaluate, is_material_draw, phase, Color, Evaluator, PieceKind, Position, Score, Square,
    FEN_KIWIPETE, FEN_STARTPOS, SYMMETRY_FENS, TEMPO,
};

fn position(fen: &str) -> Position {
    fen.parse().unwrap_or_else(|e| panic!("Invalid FEN {fen:?}: {e}"))
}

#[test]
fn test_symmetry_suite_passes() {
    let report = check_symmetry(SYMMETRY_FENS).unwrap();
    assert_eq!(report.total(), SYMMETRY_FENS.len());
    assert_eq!(report.failed(), 0, "{report}");
    assert_eq!(report.failure_rate(), 0.0);
}

#[test]
fn test_mirrored_positions_evaluate_equally() {
    for fen in SYMMETRY_FENS.iter().chain([&FEN_KIWIPETE, &FEN_STARTPOS]) {
        let pos = position(fen);
        let mirrored = pos.mirrored();
        assert_eq!(evaluate(&pos), evaluate(&mirrored), "Asymmetric evaluation of {fen}");

        // Mirroring twice is the identity
        assert_eq!(mirrored.mirrored(), pos, "Mirroring {fen} twice changed it");
    }
}

#[test]
fn test_startpos_is_worth_the_tempo() {
    let white = Position::default();
    assert_eq!(evaluate(&white), Score::new(TEMPO));

    // The tempo bonus belongs to whoever is to move
    let mut black = white;
    black.set_side_to_move(Color::Black);
    assert_eq!(evaluate(&black), Score::new(TEMPO));
}

#[test]
fn test_evaluation_is_idempotent() {
    let pos = position(FEN_KIWIPETE);
    let first = Evaluator::new(&pos);
    let second = Evaluator::new(&pos);

    assert_eq!(first.eval(), second.eval());
    assert_eq!(first.eval(), evaluate(&pos));
    assert_eq!(first.phase(), second.phase());
    assert_eq!(first.state().total, second.state().total);
}

#[test]
fn test_golden_evaluations() {
    // Pins the taper rounding and the king shelter scaling on reduced material
    let cases = [
        (FEN_KIWIPETE, 98),
        ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b KQkq - 0 1", -62),
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 15),
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 0 1", 21),
        ("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", 229),
        ("2r3k1/5pp1/7p/8/8/1N5P/5PP1/6K1 w - - 0 1", -311),
        ("2r3k1/5pp1/7p/8/8/1N5P/5PP1/6K1 b - - 0 1", 347),
    ];

    for (fen, expected) in cases {
        assert_eq!(evaluate(&position(fen)), Score::new(expected), "Evaluation of {fen} drifted");
    }
}

#[test]
fn test_side_to_move_flips_sign_around_tempo() {
    let white = position("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
    let black = position("4k3/8/8/8/8/8/8/R3K3 b - - 0 1");

    // Whoever moves gets the tempo, so the two views differ by twice of it
    assert!(evaluate(&white) > 0);
    assert!(evaluate(&black) < 0);
    assert_eq!(evaluate(&white).inner() + evaluate(&black).inner(), 2 * TEMPO);
}

#[test]
fn test_material_draws() {
    let draws = [
        "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
        "4k3/8/8/8/8/8/8/1N2K1N1 w - - 0 1",
        "4k3/8/8/8/8/8/8/2B1K3 w - - 0 1",
        "2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1",
        "2b1k3/8/8/8/8/8/8/1N2K3 w - - 0 1",
        "4k1n1/8/8/8/8/8/8/1NN1K3 w - - 0 1",
        "r3k3/8/8/8/8/8/8/R3K3 w - - 0 1",
        "r3k1n1/8/8/8/8/8/8/R3K3 w - - 0 1",
        "4k1n1/8/8/8/8/8/8/R3K3 w - - 0 1",
        "2b1k1n1/8/8/8/8/8/8/R3K3 w - - 0 1",
    ];

    for fen in draws {
        let pos = position(fen);
        assert!(is_material_draw(&pos), "{fen} should be a material draw");
        assert_eq!(evaluate(&pos), Score::DRAW, "{fen} should evaluate to a draw");
    }
}

#[test]
fn test_one_piece_past_a_material_draw() {
    let wins = [
        // Three knights
        "4k3/8/8/8/8/8/8/1NN1K1N1 w - - 0 1",
        // Bishop pair
        "4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1",
        // Bishop and knight
        "4k3/8/8/8/8/8/8/2B1K1N1 w - - 0 1",
        // Rook against rook and two minors
        "r1b1k1n1/8/8/8/8/8/8/R3K3 w - - 0 1",
        // Lone rook
        "4k3/8/8/8/8/8/8/R3K3 w - - 0 1",
        // Rook against three minors
        "1nb1k1n1/8/8/8/8/8/8/R3K3 w - - 0 1",
        // Any queen
        "4k3/8/8/8/8/8/8/3QK3 w - - 0 1",
        // Any pawn
        "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
    ];

    for fen in wins {
        assert!(!is_material_draw(&position(fen)), "{fen} should not be a material draw");
    }
}

#[test]
fn test_phase_bounds() {
    assert_eq!(phase(&Position::default()), 24);
    assert_eq!(phase(&position("4k3/pppppppp/8/8/8/8/PPPPPPPP/4K3 w - - 0 1")), 0);

    // Extra queens from promotion cannot push the phase past its maximum
    assert_eq!(phase(&position("qqqqkqqq/8/8/8/8/8/8/QQQQKQQQ w - - 0 1")), 24);
}

#[test]
fn test_phase_never_grows_as_pieces_leave() {
    let mut pos = Position::default();
    let mut last = phase(&pos);

    for square in Square::iter() {
        let Some(piece) = pos.take(square) else {
            continue;
        };
        if piece.kind() == PieceKind::King {
            pos.place(piece, square);
            continue;
        }

        let now = phase(&pos);
        assert!(now <= last, "Phase grew from {last} to {now} after removing {piece} on {square}");
        last = now;
    }

    assert_eq!(last, 0);
}
