use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::{file_to_index, rank_to_index, Bitboard, Board, Color, Move, Piece, Square};

/// Castle-rook squares of a standard (non-Fischer-random) setup: a1, h1, a8, h8.
const STANDARD_CASTLE_ROOKS: u64 = (1 << 0) | (1 << 7) | (1 << 56) | (1 << 63);

impl Board {
    /// Parse a board position from FEN notation.
    ///
    /// Returns an error if the FEN string is invalid.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        // Parse piece placement
        for (rank_idx, rank_str) in parts[0].split('/').enumerate() {
            if rank_idx >= 8 {
                return Err(FenError::InvalidRank { rank: rank_idx });
            }
            let mut file = 0;
            for c in rank_str.chars() {
                if c.is_ascii_digit() {
                    file += c.to_digit(10).unwrap() as usize;
                } else {
                    let color = if c.is_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::TooManyFiles {
                            rank: rank_idx,
                            files: file + 1,
                        });
                    }
                    board.set_piece(Square::new(7 - rank_idx, file), color, piece);
                    file += 1;
                }
            }
        }

        // Parse side to move
        match parts[1] {
            "w" => board.white_to_move = true,
            "b" => board.white_to_move = false,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        }

        // Parse castling rights. Letters 'K'/'Q'/'k'/'q' are classical
        // notation and resolve to the outermost rook on the mover's back
        // rank (matching whichever rook is actually there); 'A'-'H'/'a'-'h'
        // are Shredder-FEN and name the rook's file directly. Both forms are
        // accepted in the same string since a FEN author may not know which
        // one produced a given position.
        let mut castle_rooks: u64 = 0;
        for c in parts[2].chars() {
            match c {
                'K' => {
                    let bb = board.pieces[Color::White.index()][Piece::Rook.index()].0 & 0xFF;
                    if bb != 0 {
                        castle_rooks |= 1 << (63 - bb.leading_zeros());
                    }
                }
                'Q' => {
                    let bb = board.pieces[Color::White.index()][Piece::Rook.index()].0 & 0xFF;
                    if bb != 0 {
                        castle_rooks |= bb & bb.wrapping_neg();
                    }
                }
                'k' => {
                    let bb =
                        board.pieces[Color::Black.index()][Piece::Rook.index()].0 & (0xFFu64 << 56);
                    if bb != 0 {
                        castle_rooks |= 1 << (63 - bb.leading_zeros());
                    }
                }
                'q' => {
                    let bb =
                        board.pieces[Color::Black.index()][Piece::Rook.index()].0 & (0xFFu64 << 56);
                    if bb != 0 {
                        castle_rooks |= bb & bb.wrapping_neg();
                    }
                }
                'A'..='H' => {
                    let file = (c as u8 - b'A') as usize;
                    castle_rooks |= 1 << Square::new(0, file).as_index();
                }
                'a'..='h' => {
                    let file = (c as u8 - b'a') as usize;
                    castle_rooks |= 1 << Square::new(7, file).as_index();
                }
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }
        board.castle_rooks = Bitboard(castle_rooks);
        board.recompute_castle_masks();
        // A rook retaining rights off its standard square can only happen in
        // a Fischer-random setup; detect it here rather than require callers
        // to pass the flag through explicitly.
        board.chess960 = castle_rooks & !STANDARD_CASTLE_ROOKS != 0;

        // Parse en passant target
        board.en_passant_target = if parts[3] == "-" {
            None
        } else {
            let chars: Vec<char> = parts[3].chars().collect();
            if chars.len() == 2
                && ('a'..='h').contains(&chars[0])
                && ('1'..='8').contains(&chars[1])
            {
                Some(Square::new(rank_to_index(chars[1]), file_to_index(chars[0])))
            } else {
                return Err(FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                });
            }
        };

        // Parse halfmove clock and fullmove counter (both optional; a bare
        // piece placement + side-to-move + castling + en-passant FEN is
        // still accepted, defaulting to move 1 with a fresh clock)
        if parts.len() >= 5 {
            board.halfmove_clock = parts[4].parse().map_err(|_| FenError::InvalidCounter {
                field: "halfmove",
                found: parts[4].to_string(),
            })?;
        }
        if parts.len() >= 6 {
            board.fullmove_counter = parts[5].parse().map_err(|_| FenError::InvalidCounter {
                field: "fullmove",
                found: parts[5].to_string(),
            })?;
        }

        board.hash = board.calculate_initial_hash();
        board.pkhash = board.calculate_initial_pkhash();
        board.repetition_counts.set(board.hash, 1);
        board.recalculate_incremental_eval();
        Ok(board)
    }

    /// Parse a board position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use `try_from_fen` for fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("Invalid FEN string")
    }

    /// Convert the board position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::new();
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::new(rank, file);
                if let Some((color, piece)) = self.piece_at(sq) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = if self.white_to_move { "w" } else { "b" };
        let castling = self.castling_fen_field();
        let ep = self
            .en_passant_target.map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            castling,
            ep,
            self.halfmove_clock,
            self.fullmove_counter
        )
    }

    /// The castling field of a FEN string. Emits Shredder-FEN (`A`-`H`/`a`-`h`
    /// rook files) whenever the position is flagged Chess960, classical
    /// `KQkq` otherwise — a rook off its standard square can only be
    /// represented in Shredder notation, but `chess960` may also be set on
    /// an otherwise-standard position that was explicitly loaded that way.
    fn castling_fen_field(&self) -> String {
        let mut castling = String::new();
        if self.chess960 {
            let mut white_bits = self.castle_rooks.0 & self.occupied[Color::White.index()].0;
            while white_bits != 0 {
                let sq = 63 - white_bits.leading_zeros();
                white_bits &= !(1 << sq);
                castling.push((b'A' + Square::from_index(sq as usize).file() as u8) as char);
            }
            let mut black_bits = self.castle_rooks.0 & self.occupied[Color::Black.index()].0;
            while black_bits != 0 {
                let sq = 63 - black_bits.leading_zeros();
                black_bits &= !(1 << sq);
                castling.push((b'a' + Square::from_index(sq as usize).file() as u8) as char);
            }
        } else {
            if self.castle_rooks.0 & (1 << Square::new(0, 7).as_index()) != 0 {
                castling.push('K');
            }
            if self.castle_rooks.0 & (1 << Square::new(0, 0).as_index()) != 0 {
                castling.push('Q');
            }
            if self.castle_rooks.0 & (1 << Square::new(7, 7).as_index()) != 0 {
                castling.push('k');
            }
            if self.castle_rooks.0 & (1 << Square::new(7, 0).as_index()) != 0 {
                castling.push('q');
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        castling
    }

    /// Parse a move in UCI long algebraic notation (e.g., "e2e4", "e7e8q").
    ///
    /// Returns the matching legal move if found, or an error describing why parsing failed.
    ///
    /// # Example
    /// ```
    /// use chess_core::board::Board;
    ///
    /// let mut board = Board::new();
    /// let mv = board.parse_move("e2e4").unwrap();
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    pub fn parse_move(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        if uci.len() < 4 || uci.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }

        let chars: Vec<char> = uci.chars().collect();

        // Validate square characters
        if !('a'..='h').contains(&chars[0])
            || !('1'..='8').contains(&chars[1])
            || !('a'..='h').contains(&chars[2])
            || !('1'..='8').contains(&chars[3])
        {
            return Err(MoveParseError::InvalidSquare {
                notation: uci.to_string(),
            });
        }

        let from_sq = Square::new(rank_to_index(chars[1]), file_to_index(chars[0]));
        let to_sq = Square::new(rank_to_index(chars[3]), file_to_index(chars[2]));

        // Parse promotion piece if present
        let promotion = if uci.len() == 5 {
            let piece = Piece::from_char(chars[4]).ok_or(MoveParseError::InvalidPromotion {
                char: chars[4],
            })?;
            if matches!(piece, Piece::Pawn | Piece::King) {
                return Err(MoveParseError::InvalidPromotion { char: chars[4] });
            }
            Some(piece)
        } else {
            None
        };

        // Find matching legal move
        let legal_moves = self.generate_moves();
        for legal_move in &legal_moves {
            if legal_move.from() == from_sq
                && legal_move.to() == to_sq
                && legal_move.promotion() == promotion
            {
                return Ok(*legal_move);
            }
        }

        Err(MoveParseError::IllegalMove {
            notation: uci.to_string(),
        })
    }

    /// Parse a UCI move and make it on the board in one call.
    ///
    /// This is a convenience method combining `parse_move` and `make_move`.
    ///
    /// # Example
    /// ```
    /// use chess_core::board::Board;
    ///
    /// let mut board = Board::new();
    /// board.make_move_uci("e2e4").unwrap();
    /// board.make_move_uci("e7e5").unwrap();
    /// ```
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(uci)?;
        self.make_move(mv);
        Ok(mv)
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}
