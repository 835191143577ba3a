use super::{Board, Color, Move, Piece, PieceKind, Square};

/// Whether the side opposing the mover is in check, and how it can be answered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    NoCheck,
    /// A single checker. Non-king pieces may only move onto `block_squares`.
    Check { attacker: Square, block_squares: Vec<Square> },
    /// Two checkers at once, only the king can respond.
    DoubleCheck,
}

impl CheckState {
    pub fn in_check(&self) -> bool {
        !matches!(self, CheckState::NoCheck)
    }

    /// Squares that capture the checker or interpose between it and the king.
    /// Empty unless there is exactly one checker.
    pub fn block_squares(&self) -> &[Square] {
        match self {
            CheckState::Check { block_squares, .. } => block_squares,
            _ => &[],
        }
    }

    pub fn attacker(&self) -> Option<Square> {
        match self {
            CheckState::Check { attacker, .. } => Some(*attacker),
            _ => None,
        }
    }
}

impl Board {
    /// Checks whether the pieces of `mover` attack the king of the other side.
    ///
    /// Panics if that king is not on the board.
    pub fn detect_check(&self, mover: Color) -> CheckState {
        let defender = mover.opponent();
        let king = self
            .find_king(defender)
            .unwrap_or_else(|| panic!("no {} king on the board", defender));

        let mut state = CheckState::NoCheck;
        for piece in self.pieces_of(mover) {
            let attacks = match piece.kind {
                // Kings never check, but an adjacent king still covers the square.
                PieceKind::King => piece.rank.abs_diff(king.rank) <= 1 && piece.file.abs_diff(king.file) <= 1,
                _ => self.generate_pseudo_moves(piece, None).iter().any(|mv| mv.to == king),
            };
            if !attacks {
                continue;
            }
            if state.in_check() {
                return CheckState::DoubleCheck;
            }
            state = CheckState::Check {
                attacker: piece.square(),
                block_squares: block_squares(piece, king),
            };
        }
        state
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.detect_check(color.opponent()).in_check()
    }

    /// Plays `mv` on a copy and reports whether the mover's own king is attacked afterwards.
    pub fn leaves_king_in_check(&self, piece: &Piece, mv: Move) -> bool {
        self.apply_move(piece, mv, &mut PieceKind::Queen).is_in_check(piece.owner)
    }
}

fn block_squares(checker: &Piece, king: Square) -> Vec<Square> {
    match checker.kind {
        PieceKind::Pawn | PieceKind::Knight | PieceKind::King => vec![checker.square()],
        // Queens follow the rook segment on a shared rank or file, the bishop one otherwise.
        PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen => segment(checker.square(), king),
        PieceKind::Empty => Vec::new(),
    }
}

/// Squares from `from` (inclusive) towards `to` (exclusive) along a rank, file or diagonal.
fn segment(from: Square, to: Square) -> Vec<Square> {
    let dr = (to.rank as i8 - from.rank as i8).signum();
    let df = (to.file as i8 - from.file as i8).signum();

    let mut squares = vec![from];
    let mut current = from;
    while let Some(next) = current.offset(dr, df) {
        if next == to {
            break;
        }
        squares.push(next);
        current = next;
    }
    squares
}
