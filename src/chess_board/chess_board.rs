use super::{fen, Color, Move, MoveTag, Piece, PieceKind, Square, PROMOTION_KINDS};
use crate::error::GameResult;
use std::fmt;

/// Collaborator that decides what a pawn reaching the far rank becomes.
pub trait Promoter {
    fn promote(&mut self, pawn: &Piece) -> PieceKind;
}

/// A fixed choice, used for simulations and once a prompt has been answered.
impl Promoter for PieceKind {
    fn promote(&mut self, _pawn: &Piece) -> PieceKind {
        *self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Piece; 8]; 8],
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::King,
    PieceKind::Queen,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// Creates an empty chess board
    pub fn new() -> Self {
        let mut squares = [[Piece::EMPTY; 8]; 8];
        for (rank, row) in squares.iter_mut().enumerate() {
            for (file, cell) in row.iter_mut().enumerate() {
                *cell = Piece::empty_at(rank as u8, file as u8);
            }
        }
        Self { squares }
    }

    /// The standard opening setup, White on ranks 0 and 1.
    pub fn standard() -> Self {
        let mut board = Self::new();
        for color in [Color::White, Color::Black] {
            let back = color.back_rank();
            let pawns = (back as i8 + color.forward()) as u8;
            for (file, kind) in BACK_RANK.iter().enumerate() {
                board.place(Piece::new(*kind, color, back, file as u8));
                board.place(Piece::new(PieceKind::Pawn, color, pawns, file as u8));
            }
        }
        board
    }

    /// Delegates FEN parsing to the `fen` module.
    pub fn from_fen(fen: &str) -> GameResult<(Self, Color, Option<Move>)> {
        fen::from_fen(fen)
    }

    pub fn to_fen(&self, to_move: Color, last_move: Option<Move>) -> String {
        fen::to_fen(self, to_move, last_move)
    }

    pub fn at(&self, square: Square) -> &Piece {
        &self.squares[square.rank as usize][square.file as usize]
    }

    pub fn piece(&self, rank: u8, file: u8) -> &Piece {
        &self.squares[rank as usize][file as usize]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.at(square).is_empty()
    }

    pub fn owner(&self, square: Square) -> Color {
        self.at(square).owner
    }

    /// Writes `piece` into the cell named by its own rank and file.
    pub fn place(&mut self, piece: Piece) {
        self.squares[piece.rank as usize][piece.file as usize] = piece;
    }

    pub fn clear(&mut self, square: Square) {
        self.place(Piece::empty_at(square.rank, square.file));
    }

    /// Occupied cells, scanning from rank 7 down and file 7 down.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().rev().flat_map(|row| row.iter().rev()).filter(|p| !p.is_empty())
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |p| p.owner == color)
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces_of(color).find(|p| p.kind == PieceKind::King).map(|p| p.square())
    }

    /// Returns the board after `piece` plays `mv`. `mv` must be one of the legal moves of `piece`.
    pub fn apply_move(&self, piece: &Piece, mv: Move, promoter: &mut dyn Promoter) -> Board {
        let mut board = self.clone();
        let mut moving = *piece;

        match mv.tag {
            MoveTag::Normal => {}
            MoveTag::EnPassant => board.clear(mv.captured_square()),
            MoveTag::CastleKingSide => {
                board.clear(Square::new(piece.rank, 7));
                board.place(Piece {
                    has_moved: true,
                    ..Piece::new(PieceKind::Rook, piece.owner, piece.rank, piece.file + 1)
                });
            }
            MoveTag::CastleQueenSide => {
                board.clear(Square::new(piece.rank, 0));
                board.place(Piece {
                    has_moved: true,
                    ..Piece::new(PieceKind::Rook, piece.owner, piece.rank, piece.file - 1)
                });
            }
            MoveTag::Promotion => {
                moving.kind = promoter.promote(piece);
                assert!(PROMOTION_KINDS.contains(&moving.kind), "cannot promote to {}", moving.kind);
            }
        }

        board.clear(piece.square());
        moving.rank = mv.to.rank;
        moving.file = mv.to.file;
        moving.has_moved = true;
        board.place(moving);
        board
    }

    pub fn render_to_string(&self, highlighted: &[Move], selected: Option<&Piece>) -> String {
        let mut board_representation = String::new();
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");
        board_representation.push_str("  ┌───┬───┬───┬───┬───┬───┬───┬───┐\n");

        for rank in (0..8u8).rev() {
            board_representation.push_str(&format!("{} │", rank + 1));
            for file in (0..8u8).rev() {
                let square = Square::new(rank, file);
                let piece = self.at(square);
                let cell = match highlighted.iter().position(|m| m.to == square) {
                    Some(index) => {
                        let mv = highlighted[index];
                        let captures = mv.tag == MoveTag::EnPassant || (!piece.is_empty() && piece.owner != selected.map_or(Color::None, |s| s.owner));
                        if captures {
                            format!("x{:<2}", index)
                        } else {
                            format!("{:^3}", index)
                        }
                    }
                    None if selected.is_some_and(|s| s.square() == square) => format!("[{}]", piece.to_char()),
                    None if piece.is_empty() => "   ".to_string(),
                    None => format!(" {} ", piece.to_char()),
                };
                board_representation.push_str(&cell);
                board_representation.push('│');
            }
            board_representation.push_str(&format!(" {}\n", rank + 1));

            if rank > 0 {
                board_representation.push_str("  ├───┼───┼───┼───┼───┼───┼───┼───┤\n");
            }
        }

        board_representation.push_str("  └───┴───┴───┴───┴───┴───┴───┴───┘\n");
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");

        board_representation
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_to_string(&[], None))
    }
}
