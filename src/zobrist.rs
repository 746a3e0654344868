//! Zobrist hashing for chess positions.
//!
//! Provides the 64-bit random constants used to incrementally maintain
//! [`Board::hash`](crate::board::Board) and its pawn+king subset,
//! `Board::pkhash`, across make/unmake.

use rand::prelude::*;

use crate::board::{Color, Piece, Square};

#[inline]
pub(crate) const fn piece_to_zobrist_index(piece: Piece) -> usize {
    piece.index()
}

#[inline]
pub(crate) const fn color_to_zobrist_index(color: Color) -> usize {
    color.index()
}

#[inline]
pub(crate) const fn square_to_zobrist_index(sq: Square) -> usize {
    sq.index()
}

/// One set of Zobrist random constants, built once at process start.
///
/// Castling keys are indexed per square rather than per (color, side): a
/// chess960 rook's castling right lives on whatever file it started on, so
/// the hash contribution is "this square still carries a castling right",
/// XORed in/out as `Board::castle_rooks` gains or loses that bit.
pub(crate) struct ZobristKeys {
    /// `piece_keys[piece][color][square]`
    pub(crate) piece_keys: [[[u64; 64]; 2]; 6],
    pub(crate) black_to_move_key: u64,
    /// `castling_keys[square]`, one key per potential castle-rights square.
    pub(crate) castling_keys: [u64; 64],
    pub(crate) en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        // Fixed seed: hashes must be reproducible across runs for TT tests
        // (same position, same FEN load order, same hash) and so that a
        // saved perft/search trace stays meaningful run to run.
        let mut rng = StdRng::seed_from_u64(0x5EED_C0FF_EE15_B17E);

        let mut piece_keys = [[[0u64; 64]; 2]; 6];
        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        let mut castling_keys = [0u64; 64];
        for key in &mut castling_keys {
            *key = rng.gen();
        }

        let mut en_passant_keys = [0u64; 8];
        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }

    /// `true` for the pieces whose placement feeds `pkhash`.
    #[inline]
    pub(crate) fn is_pawn_or_king(piece: Piece) -> bool {
        matches!(piece, Piece::Pawn | Piece::King)
    }
}

pub(crate) static ZOBRIST: std::sync::LazyLock<ZobristKeys> = std::sync::LazyLock::new(ZobristKeys::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_pairwise_distinct_sample() {
        let z = &*ZOBRIST;
        assert_ne!(z.black_to_move_key, z.castling_keys[0]);
        assert_ne!(z.piece_keys[0][0][0], z.piece_keys[0][1][0]);
    }

    #[test]
    fn is_pawn_or_king_classifies_correctly() {
        assert!(ZobristKeys::is_pawn_or_king(Piece::Pawn));
        assert!(ZobristKeys::is_pawn_or_king(Piece::King));
        assert!(!ZobristKeys::is_pawn_or_king(Piece::Knight));
    }
}
