use super::super::attack_tables::{slider_attacks, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};
use super::super::masks::between_on_rank;
use super::super::{
    color_index, piece_index, pop_lsb, square_from_index, square_index, Bitboard, Board, Color,
    MoveList, Piece, Square,
};

impl Board {
    pub(crate) fn generate_king_moves(&self, from: Square) -> MoveList {
        let mut moves = MoveList::new();
        let color = self.current_color();
        let from_idx = square_index(from).as_usize();
        let own_occ = self.occupied[color_index(color)].0;
        let mut targets = Bitboard(KING_ATTACKS[from_idx] & !own_occ);

        while targets.0 != 0 {
            let to_idx = pop_lsb(&mut targets);
            let to_sq = square_from_index(to_idx);
            moves.push(self.create_move(from, to_sq, None, false, false));
        }

        let own_rooks_with_rights = self.castle_rooks.0 & own_occ;
        let mut rooks = own_rooks_with_rights;
        while rooks != 0 {
            let rook_idx = rooks.trailing_zeros() as usize;
            rooks &= rooks - 1;
            let rook_sq = Square::from_index(rook_idx);
            if rook_sq.rank() != from.rank() {
                continue;
            }
            if self.castle_path_clear(from, rook_sq) {
                let king_to_file = if rook_sq.file() > from.file() { 6 } else { 2 };
                let king_to = Square::new(from.rank(), king_to_file);
                moves.push(self.create_move(from, king_to, None, true, false));
            }
        }

        moves
    }

    /// Whether the squares a chess960-safe castle needs clear actually are,
    /// given the king on `from` and the chosen castling rook on `rook_sq`.
    /// Both destination squares are included in the required-empty set
    /// (minus the king's and rook's own current squares) so a king or rook
    /// landing on a square still held by the *other* rook is caught.
    fn castle_path_clear(&self, from: Square, rook_sq: Square) -> bool {
        let kingside = rook_sq.file() > from.file();
        let king_to = Square::new(from.rank(), if kingside { 6 } else { 2 });
        let rook_to = Square::new(from.rank(), if kingside { 5 } else { 3 });

        let mut required_empty = between_on_rank(from, king_to).0
            | Bitboard::from_square(king_to).0
            | between_on_rank(rook_sq, rook_to).0
            | Bitboard::from_square(rook_to).0;
        required_empty &= !(Bitboard::from_square(from).0 | Bitboard::from_square(rook_sq).0);

        if self.all_occupied.0 & required_empty != 0 {
            return false;
        }

        let opponent = self.current_color().opponent();
        let mut transit = between_on_rank(from, king_to).0
            | Bitboard::from_square(from).0
            | Bitboard::from_square(king_to).0;
        while transit != 0 {
            let sq_idx = transit.trailing_zeros() as usize;
            transit &= transit - 1;
            if self.is_square_attacked(Square::from_index(sq_idx), opponent) {
                return false;
            }
        }

        true
    }

    pub(crate) fn find_king(&self, color: Color) -> Option<Square> {
        for r in 0..8 {
            for f in 0..8 {
                let sq = Square::new(r, f);
                if self.piece_at(sq) == Some((color, Piece::King)) {
                    return Some(sq);
                }
            }
        }
        None
    }

    pub(crate) fn is_square_attacked(&self, square: Square, attacker_color: Color) -> bool {
        let target_idx = square_index(square).as_usize();
        let c_idx = color_index(attacker_color);

        let pawn_sources = if attacker_color == Color::White {
            PAWN_ATTACKS[color_index(Color::Black)][target_idx]
        } else {
            PAWN_ATTACKS[color_index(Color::White)][target_idx]
        };
        if self.pieces[c_idx][piece_index(Piece::Pawn)].0 & pawn_sources != 0 {
            return true;
        }

        if self.pieces[c_idx][piece_index(Piece::Knight)].0 & KNIGHT_ATTACKS[target_idx] != 0 {
            return true;
        }

        if self.pieces[c_idx][piece_index(Piece::King)].0 & KING_ATTACKS[target_idx] != 0 {
            return true;
        }

        let rook_like = self.pieces[c_idx][piece_index(Piece::Rook)].0
            | self.pieces[c_idx][piece_index(Piece::Queen)].0;
        let bishop_like = self.pieces[c_idx][piece_index(Piece::Bishop)].0
            | self.pieces[c_idx][piece_index(Piece::Queen)].0;

        if slider_attacks(target_idx, self.all_occupied.0, false) & rook_like != 0 {
            return true;
        }
        if slider_attacks(target_idx, self.all_occupied.0, true) & bishop_like != 0 {
            return true;
        }

        false
    }

    pub(crate) fn is_in_check(&self, color: Color) -> bool {
        if let Some(king_sq) = self.find_king(color) {
            self.is_square_attacked(king_sq, color.opponent())
        } else {
            false
        }
    }
}
