use std::fmt;

/// Owner of a piece. `None` only ever owns the empty sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    None,
    White,
    Black,
}

impl Color {
    pub fn opponent(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
            Color::None => Color::None,
        }
    }

    /// Direction a pawn of this color walks in, in ranks.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
            Color::None => 0,
        }
    }

    pub fn back_rank(&self) -> u8 {
        match self {
            Color::Black => 7,
            _ => 0,
        }
    }

    pub fn promotion_rank(&self) -> u8 {
        match self {
            Color::Black => 0,
            _ => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
            Color::None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Empty,
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

/// Replacement kinds offered on promotion, in prompt order.
pub const PROMOTION_KINDS: [PieceKind; 4] = [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen];

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Empty => "Empty",
            PieceKind::Pawn => "Pawn",
            PieceKind::Rook => "Rook",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Square {
    pub rank: u8,
    pub file: u8,
}

impl Square {
    pub fn new(rank: u8, file: u8) -> Self {
        debug_assert!(rank < 8 && file < 8, "square ({}, {}) is off the board", rank, file);
        Self { rank, file }
    }

    /// The square `(dr, df)` away, or `None` when that leaves the board.
    pub fn offset(&self, dr: i8, df: i8) -> Option<Square> {
        let rank = self.rank as i8 + dr;
        let file = self.file as i8 + df;
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Some(Square::new(rank as u8, file as u8))
        } else {
            None
        }
    }

    /// Files are stored mirrored: index 0 is the h-file, index 7 the a-file.
    pub fn from_algebraic(algebraic: &str) -> Option<Self> {
        let mut chars = algebraic.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() || !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        Some(Square::new(rank as u8 - b'1', 7 - (file as u8 - b'a')))
    }

    pub fn as_algebraic(&self) -> String {
        to_algebraic_square(self.rank, self.file)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algebraic())
    }
}

pub fn to_algebraic_square(rank: u8, file: u8) -> String {
    let letter = (b'a' + (7 - file)) as char;
    format!("{}{}", letter, rank + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub owner: Color,
    pub rank: u8,
    pub file: u8,
    pub has_moved: bool,
}

impl Piece {
    pub const EMPTY: Piece = Piece {
        kind: PieceKind::Empty,
        owner: Color::None,
        rank: 0,
        file: 0,
        has_moved: false,
    };

    pub fn new(kind: PieceKind, owner: Color, rank: u8, file: u8) -> Self {
        Self {
            kind,
            owner,
            rank,
            file,
            has_moved: false,
        }
    }

    /// The sentinel stored in an unoccupied cell.
    pub fn empty_at(rank: u8, file: u8) -> Self {
        Self { rank, file, ..Piece::EMPTY }
    }

    pub fn is_empty(&self) -> bool {
        self.kind == PieceKind::Empty
    }

    pub fn square(&self) -> Square {
        Square::new(self.rank, self.file)
    }

    pub fn to_char(&self) -> char {
        let c = match self.kind {
            PieceKind::Empty => return '.',
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        if self.owner == Color::White {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ {}", self.owner, self.kind, self.square())
    }
}

/// Selects the side effects the move applier performs.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub enum MoveTag {
    Normal,
    EnPassant,
    /// Castling with the rook on file 7.
    CastleKingSide,
    /// Castling with the rook on file 0.
    CastleQueenSide,
    Promotion,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub tag: MoveTag,
}

impl Move {
    pub fn new(from: Square, to: Square, tag: MoveTag) -> Self {
        Self { from, to, tag }
    }

    pub fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveTag::Normal)
    }

    /// Square of the piece this move removes, if any. Differs from `to` only for en passant.
    pub fn captured_square(&self) -> Square {
        match self.tag {
            MoveTag::EnPassant => Square::new(self.from.rank, self.to.file),
            _ => self.to,
        }
    }

    pub fn is_castle(&self) -> bool {
        matches!(self.tag, MoveTag::CastleKingSide | MoveTag::CastleQueenSide)
    }

    pub fn as_algebraic(&self) -> String {
        format!("{}{}", self.from.as_algebraic(), self.to.as_algebraic())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algebraic())
    }
}
