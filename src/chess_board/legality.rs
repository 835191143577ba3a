use super::{Board, CheckState, Color, Move, Piece, PieceKind};

/// Rule switches that differ between strict chess and the looser house rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// Reject moves of pinned pieces that would expose their own king.
    pub forbid_self_check: bool,
    /// Score a stalemate as a draw instead of a loss for the stalemated side.
    pub stalemate_is_draw: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            forbid_self_check: true,
            stalemate_is_draw: false,
        }
    }
}

impl Board {
    /// Drops pseudo-legal moves that land on a friendly piece or on a king, and while in
    /// check keeps only the non-king moves that capture the checker or interpose.
    ///
    /// Off-board targets cannot occur, `Square` never leaves the board.
    pub fn filter_moves(&self, moves: Vec<Move>, piece: &Piece, check: &CheckState) -> Vec<Move> {
        moves
            .into_iter()
            .filter(|mv| {
                let target = self.at(mv.to);
                if target.owner == piece.owner || target.kind == PieceKind::King {
                    return false;
                }
                if piece.kind == PieceKind::King || !check.in_check() {
                    return true;
                }
                let blocks = check.block_squares();
                blocks.contains(&mv.to) || blocks.contains(&mv.captured_square())
            })
            .collect()
    }

    /// The moves `piece` may actually play given the current check state.
    pub fn legal_moves(&self, piece: &Piece, last_move: Option<Move>, check: &CheckState, rules: &Rules) -> Vec<Move> {
        let moves = self.filter_moves(self.generate_pseudo_moves(piece, last_move), piece, check);
        if !rules.forbid_self_check || piece.kind == PieceKind::King {
            return moves;
        }
        moves
            .into_iter()
            .filter(|mv| !self.leaves_king_in_check(piece, *mv))
            .collect()
    }

    /// Pieces of `player` with at least one legal move, in board scan order.
    pub fn selectable_pieces(&self, player: Color, last_move: Option<Move>, check: &CheckState, rules: &Rules) -> Vec<Piece> {
        self.pieces_of(player)
            .filter(|piece| !self.legal_moves(piece, last_move, check, rules).is_empty())
            .copied()
            .collect()
    }
}
