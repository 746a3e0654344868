//! A small suite of mate-in-one positions, checked end to end: search finds
//! the mating move, then replaying it on the board actually delivers mate.

use std::sync::atomic::AtomicBool;

use chess_core::board::{find_best_move, Board, SearchState};

struct MateInOne {
    fen: &'static str,
    mating_move: &'static str,
}

const POSITIONS: &[MateInOne] = &[
    MateInOne {
        fen: "6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1",
        mating_move: "e1e8",
    },
    MateInOne {
        fen: "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4",
        mating_move: "h5f7",
    },
    MateInOne {
        fen: "1k6/8/1K6/8/8/8/8/7R w - - 0 1",
        mating_move: "h1h8",
    },
];

#[test]
fn mate_in_one_suite() {
    for position in POSITIONS {
        let mut board = Board::from_fen(position.fen);
        let mut state = SearchState::new(16);
        let stop = AtomicBool::new(false);

        let best = find_best_move(&mut board, &mut state, 2, &stop);
        let mv = best.unwrap_or_else(|| panic!("no move found for {}", position.fen));
        assert_eq!(
            mv.to_string(),
            position.mating_move,
            "expected {} to find {}",
            position.fen,
            position.mating_move
        );

        board.make_move_uci(&mv.to_string()).expect("mating move is legal");
        assert!(
            board.is_checkmate(),
            "mate in one failed for fen: {} move: {}",
            position.fen,
            position.mating_move
        );
    }
}

#[test]
#[ignore]
fn mate_search_suite_deeper_depths() {
    // Same suite, searched one ply deeper to confirm the mate survives extra
    // search depth rather than being an artifact of a shallow horizon.
    for position in POSITIONS {
        let mut board = Board::from_fen(position.fen);
        let mut state = SearchState::new(16);
        let stop = AtomicBool::new(false);

        let best = find_best_move(&mut board, &mut state, 4, &stop);
        let mv = best.unwrap_or_else(|| panic!("no move found for {}", position.fen));
        assert_eq!(mv.to_string(), position.mating_move);
    }
}
