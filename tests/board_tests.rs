//! Board-level integration tests: move generation counts, draw detection,
//! and the transposition table's standalone store/probe contract.

use chess_core::board::{Board, Move, Square};
use chess_core::tt::{Bound, TranspositionTable};

#[test]
fn perft_positions() {
    struct TestPosition {
        name: &'static str,
        fen: &'static str,
        depths: &'static [(usize, u64)],
    }

    const TEST_POSITIONS: &[TestPosition] = &[
        TestPosition {
            name: "Initial Position",
            fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            depths: &[(1, 20), (2, 400), (3, 8902), (4, 197_281)],
        },
        TestPosition {
            name: "Kiwipete",
            fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            depths: &[(1, 48), (2, 2039), (3, 97_862)],
        },
    ];

    for position in TEST_POSITIONS {
        let mut board = Board::from_fen(position.fen);
        for &(depth, expected) in position.depths {
            let nodes = board.perft(depth);
            assert_eq!(
                nodes, expected,
                "Perft failed for {} at depth {}",
                position.name, depth
            );
        }
    }
}

#[test]
fn test_draw_detection_50_move() {
    // Halfmove clock already at 100 (the 50-move rule threshold).
    let board = Board::from_fen("8/8/8/8/8/8/8/K6k w - - 100 1");
    assert!(board.is_draw(), "100 halfmove clock should be a draw");
    assert_eq!(board.halfmove_clock(), 100);
}

#[test]
fn test_draw_detection_repetition() {
    let mut board = Board::new();
    for mv in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6"] {
        board
            .make_move_uci(mv)
            .unwrap_or_else(|_| panic!("{mv} applies"));
    }
    assert!(board.is_draw(), "Should be a draw by threefold repetition");
}

#[test]
fn test_transposition_table_store_probe() {
    let mut tt = TranspositionTable::new(1);
    let hash = 0xdead_beef_u64;
    let mv = Move::quiet(Square::new(1, 4), Square::new(3, 4));

    tt.store(hash, 0, 1, 100, Bound::Exact, mv);
    let entry = tt.probe(hash, 0).expect("entry missing");
    assert_eq!(entry.depth, 1);

    // A shallower store at the same key should not overwrite the deeper entry.
    tt.store(hash, 0, 0, 50, Bound::Exact, mv);
    let entry2 = tt.probe(hash, 0).expect("entry missing after shallower store");
    assert_eq!(entry2.depth, 1);

    tt.store(hash, 0, 5, 200, Bound::Exact, mv);
    let entry3 = tt.probe(hash, 0).expect("entry missing after deeper store");
    assert_eq!(entry3.depth, 5);
}
