//! Literal end-to-end scenarios named in the core specification: forced-mate
//! score reporting, the fifty-move rule forcing a draw, and single-threaded
//! determinism with a freshly cleared transposition table.

use std::sync::atomic::AtomicBool;

use chess_core::board::{search, Board, SearchConfig, SearchState};

const MATE: i32 = 32_000;

#[test]
fn reports_mate_in_one_for_the_side_to_move_against() {
    // White to move, but every legal king move walks into Qd1#: the engine
    // must still return a legal move and score it as getting mated in one ply.
    let mut board = Board::from_fen("8/8/8/8/8/3k4/3q4/3K4 w - - 0 1");
    let mut state = SearchState::new(8);
    let stop = AtomicBool::new(false);

    let result = search(&mut board, &mut state, SearchConfig::depth(1), &stop);
    assert!(result.best_move.is_some(), "a legal move must still be returned");

    let probe = state
        .tables
        .tt
        .probe(board.hash(), 0)
        .expect("root position should be stored in the TT");
    assert!(
        probe.value <= -MATE + 2,
        "expected a getting-mated-in-one score, got {}",
        probe.value
    );
}

#[test]
fn mate_in_two_is_reported_as_near_mate() {
    // A textbook mate-in-2: at any depth >= 3 the engine must report a score
    // within 4 of MATE, regardless of which exact mating line it picks.
    let mut board = Board::from_fen("r2qkb1r/pp2nppp/3p4/2pNN1B1/2BnP3/3P4/PPP2PPP/R2bK2R w KQkq - 1 0");
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);

    let result = search(&mut board, &mut state, SearchConfig::depth(6), &stop);
    assert!(result.best_move.is_some(), "no move found for the mate-in-2 position");

    let probe = state
        .tables
        .tt
        .probe(board.hash(), 0)
        .expect("root position should be stored in the TT");
    assert!(
        probe.value >= MATE - 4,
        "expected a near-mate score, got {}",
        probe.value
    );
}

#[test]
fn fifty_move_rule_forces_draw_score() {
    // Halfmove clock already at 100: any search must return a draw score.
    let mut board = Board::from_fen("8/8/8/8/4k3/8/4K3/4R3 w - - 100 1");
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);

    let result = search(&mut board, &mut state, SearchConfig::depth(4), &stop);
    assert!(result.best_move.is_some(), "should still return a legal move");

    let probe = state
        .tables
        .tt
        .probe(board.hash(), 0)
        .expect("root position should be stored in the TT");
    assert_eq!(probe.value, 0, "fifty-move position must score as a draw");
}

#[test]
fn single_threaded_search_is_deterministic() {
    // Same position, same depth, fresh TT each run: the result must not
    // depend on anything but the inputs.
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";

    let mut first_board = Board::from_fen(fen);
    let mut first_state = SearchState::new(8);
    let stop = AtomicBool::new(false);
    let first = search(&mut first_board, &mut first_state, SearchConfig::depth(5), &stop);

    let mut second_board = Board::from_fen(fen);
    let mut second_state = SearchState::new(8);
    let second = search(&mut second_board, &mut second_state, SearchConfig::depth(5), &stop);

    assert_eq!(
        first.best_move, second.best_move,
        "identical inputs with a cleared TT must produce the same move"
    );
}
