/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use newt::{
    evaluate, history_bonus, history_malus, Color, Move, Position, SearchInfo, SearchThread, Square, ThreadPool,
    FEN_KIWIPETE, MAX_PLY,
};

fn mv(uci: &str) -> Move {
    uci.parse().unwrap()
}

#[test]
fn test_killers_shift_without_duplicates() {
    let mut thread = SearchThread::new(0);
    let (a, b, c) = (mv("g1f3"), mv("b1c3"), mv("e2e3"));

    thread.record_killer(3, a);
    assert_eq!(thread.killers(3), [Some(a), None]);

    thread.record_killer(3, a);
    assert_eq!(thread.killers(3), [Some(a), None]);

    thread.record_killer(3, b);
    thread.record_killer(3, c);
    assert_eq!(thread.killers(3), [Some(c), Some(b)]);
    assert!(!thread.is_killer(3, a));

    // Other plies are untouched
    assert_eq!(thread.killers(2), [None, None]);
    assert_eq!(thread.killers(MAX_PLY), [None, None]);
}

#[test]
fn test_cutoff_updates_history_and_countermove() {
    let mut thread = SearchThread::new(0);
    let (prev, best, other) = (mv("e7e5"), mv("g1f3"), mv("a2a3"));

    thread.record_move(0, prev);
    thread.update_move_heuristics(1, best, 4, &[other, best]);

    assert_eq!(thread.history_score(Color::White, best), history_bonus(4));
    assert_eq!(thread.history_score(Color::White, other), -history_malus(4));
    assert_eq!(thread.history_score(Color::Black, best), 0);
    assert_eq!(thread.counter_move(1), Some(best));

    // The root has no parent move to refute
    assert_eq!(thread.counter_move(0), None);
}

#[test]
fn test_init_threads_resets_state() {
    let mut pool = ThreadPool::new(2).unwrap();
    let killer = mv("g1f3");
    for thread in pool.iter_mut() {
        thread.record_killer(0, killer);
        thread.update_move_heuristics(0, killer, 6, &[]);
    }

    let position: Position = FEN_KIWIPETE.parse().unwrap();
    let mut info = SearchInfo::default();
    info.set_depth(5);
    pool.init_threads(&position, &info);

    for thread in pool.iter() {
        assert_eq!(thread.position, position);
        assert_eq!(thread.info.depth, 5);
        assert_eq!(thread.killers(0), [None, None]);
        assert_eq!(thread.history_score(Color::White, killer), 0);
    }
}

#[test]
fn test_threads_run_in_isolation() {
    const FENS: [&str; 4] = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "4k3/8/8/8/8/8/8/R3K3 b - - 0 1",
    ];

    // Distinct for every thread
    let parent_of = |id: usize| Move::new(Square::from_index(48 + id).unwrap(), Square::from_index(40 + id).unwrap());
    let reply_of = |id: usize| Move::new(Square::from_index(id).unwrap(), Square::from_index(id + 16).unwrap());

    let mut pool = ThreadPool::new(FENS.len()).unwrap();
    pool.init_threads(&Position::default(), &SearchInfo::default());

    let results = pool
        .run(|thread| {
            let id = thread.id();
            thread.position = FENS[id].parse().unwrap();

            let static_eval = thread.evaluate();
            let reply = reply_of(id);

            thread.record_move(0, parent_of(id));
            thread.set_static_eval(1, static_eval);
            thread.record_killer(1, reply);
            thread.update_move_heuristics(1, reply, 4, &[reply]);
            thread.info.nodes = id as u64 * 100;

            (id, static_eval)
        })
        .unwrap();

    assert_eq!(results.len(), FENS.len());
    for (i, (id, score)) in results.into_iter().enumerate() {
        assert_eq!(id, i, "Results must come back in pool order");
        assert_eq!(score, evaluate(&FENS[i].parse().unwrap()));

        let thread = pool.at(i).unwrap();
        let color = thread.position.side_to_move();
        let reply = reply_of(i);

        assert_eq!(thread.killers(1), [Some(reply), None]);
        assert_eq!(thread.history_score(color, reply), history_bonus(4));
        assert_eq!(thread.counter_move(1), Some(reply));
        assert_eq!(thread.stats().static_eval[1], score);
        assert_eq!(thread.info.nodes, i as u64 * 100);

        // Nothing written by another thread shows up here
        for j in (0..FENS.len()).filter(|&j| j != i) {
            let other = reply_of(j);
            let parent = parent_of(j);

            assert!(!thread.is_killer(1, other), "thread {i} sees the killer of thread {j}");
            for color in Color::all() {
                assert_eq!(
                    thread.history_score(color, other),
                    0,
                    "thread {i} sees the history of thread {j}"
                );
            }
            assert_eq!(
                thread.stats().counter_moves[parent.from()][parent.to()],
                None,
                "thread {i} sees the countermove of thread {j}"
            );
        }
    }

    assert!(pool.at(FENS.len()).is_none());
}

#[test]
fn test_panicking_thread_is_an_error() {
    let mut pool = ThreadPool::new(2).unwrap();
    let res = pool.run(|thread| {
        if thread.id() == 1 {
            panic!("search thread failure");
        }
        thread.id()
    });

    assert!(res.is_err());
}
