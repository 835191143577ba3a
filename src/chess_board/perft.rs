use super::{Board, Color, Move, MoveTag, PieceKind, Rules, PROMOTION_KINDS};

/// Every move `to_move` can play with the board it leads to, promotions expanded into
/// one entry per replacement kind.
fn expanded_moves(board: &Board, to_move: Color, last_move: Option<Move>, rules: &Rules) -> Vec<(Move, Board)> {
    let check = board.detect_check(to_move.opponent());
    let mut children = Vec::new();
    for piece in board.pieces_of(to_move) {
        for mv in board.legal_moves(piece, last_move, &check, rules) {
            if mv.tag == MoveTag::Promotion {
                for mut kind in PROMOTION_KINDS {
                    children.push((mv, board.apply_move(piece, mv, &mut kind)));
                }
            } else {
                children.push((mv, board.apply_move(piece, mv, &mut PieceKind::Queen)));
            }
        }
    }
    children
}

pub fn perft(board: &Board, to_move: Color, last_move: Option<Move>, rules: &Rules, depth: u8) -> u64 {
    if depth == 0 {
        return 1u64;
    }

    expanded_moves(board, to_move, last_move, rules)
        .iter()
        .map(|(mv, next)| perft(next, to_move.opponent(), Some(*mv), rules, depth - 1))
        .sum()
}

/// Node counts below each root move, in generation order.
pub fn divide(board: &Board, to_move: Color, last_move: Option<Move>, rules: &Rules, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    expanded_moves(board, to_move, last_move, rules)
        .iter()
        .map(|(mv, next)| (*mv, perft(next, to_move.opponent(), Some(*mv), rules, depth - 1)))
        .collect()
}
