use super::{Board, Move, MoveTag, Piece, PieceKind, Square};
use log::trace;

const KNIGHT_MOVES: [(i8, i8); 8] = [(-2, -1), (-1, -2), (1, -2), (2, -1), (2, 1), (1, 2), (-1, 2), (-2, 1)];
const KING_MOVES: [(i8, i8); 8] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [(-1, -1), (-1, 1), (1, -1), (1, 1), (0, -1), (0, 1), (-1, 0), (1, 0)];

impl Board {
    /// Pseudo-legal moves of `piece`: movement patterns only, friendly targets included.
    ///
    /// King moves are the exception, they are already checked against leaving the king
    /// attacked, because castling cannot be validated from the target square alone.
    pub fn generate_pseudo_moves(&self, piece: &Piece, last_move: Option<Move>) -> Vec<Move> {
        let moves = match piece.kind {
            PieceKind::Pawn => self.generate_pawn_moves(piece, last_move),
            PieceKind::Knight => self.generate_moves_from_directions(piece, &KNIGHT_MOVES),
            PieceKind::Bishop => self.generate_sliding_moves(piece, &BISHOP_DIRECTIONS),
            PieceKind::Rook => self.generate_sliding_moves(piece, &ROOK_DIRECTIONS),
            PieceKind::Queen => self.generate_sliding_moves(piece, &QUEEN_DIRECTIONS),
            PieceKind::King => self.generate_king_moves(piece),
            PieceKind::Empty => Vec::new(),
        };
        trace!("{}: {} pseudo-legal moves", piece, moves.len());
        moves
    }

    fn generate_pawn_moves(&self, pawn: &Piece, last_move: Option<Move>) -> Vec<Move> {
        let mut moves = Vec::new();
        let from = pawn.square();
        let forward = pawn.owner.forward();
        let promotion_rank = pawn.owner.promotion_rank();
        let tag_for = |to: Square| {
            if to.rank == promotion_rank {
                MoveTag::Promotion
            } else {
                MoveTag::Normal
            }
        };

        // Regular forward move, and the double step on the first move
        if let Some(one) = from.offset(forward, 0) {
            if self.is_empty(one) {
                moves.push(Move::new(from, one, tag_for(one)));
                if !pawn.has_moved {
                    if let Some(two) = one.offset(forward, 0) {
                        if self.is_empty(two) {
                            moves.push(Move::new(from, two, tag_for(two)));
                        }
                    }
                }
            }
        }

        // Capture diagonally
        for df in [-1, 1] {
            if let Some(to) = from.offset(forward, df) {
                if self.owner(to) == pawn.owner.opponent() {
                    moves.push(Move::new(from, to, tag_for(to)));
                }
            }
        }

        if let Some(mv) = self.en_passant_move(pawn, last_move) {
            moves.push(mv);
        }

        moves
    }

    /// En passant is only open right after an enemy double step that lands beside `pawn`.
    fn en_passant_move(&self, pawn: &Piece, last_move: Option<Move>) -> Option<Move> {
        let last = last_move?;
        let passed = self.at(last.to);
        let capture_rank = (pawn.owner.back_rank() as i8 + 4 * pawn.owner.forward()) as u8;

        let double_step = passed.kind == PieceKind::Pawn
            && passed.owner == pawn.owner.opponent()
            && last.from.file == last.to.file
            && last.from.rank.abs_diff(last.to.rank) == 2;
        if !double_step || pawn.rank != capture_rank || last.to.rank != pawn.rank || last.to.file.abs_diff(pawn.file) != 1 {
            return None;
        }

        let target = last.to.offset(pawn.owner.forward(), 0)?;
        Some(Move::new(pawn.square(), target, MoveTag::EnPassant))
    }

    /// Sliding pieces stop on the first occupied square and include it, whoever owns it.
    fn generate_sliding_moves(&self, piece: &Piece, directions: &[(i8, i8)]) -> Vec<Move> {
        let from = piece.square();
        let mut moves = Vec::new();

        for &(dr, df) in directions {
            let mut current = from;
            while let Some(next) = current.offset(dr, df) {
                moves.push(Move::normal(from, next));
                if !self.is_empty(next) {
                    break;
                }
                current = next;
            }
        }

        moves
    }

    fn generate_moves_from_directions(&self, piece: &Piece, directions: &[(i8, i8)]) -> Vec<Move> {
        let from = piece.square();
        directions
            .iter()
            .filter_map(|&(dr, df)| from.offset(dr, df))
            .map(|to| Move::normal(from, to))
            .collect()
    }

    /// Generate king moves (including castling).
    fn generate_king_moves(&self, king: &Piece) -> Vec<Move> {
        let mut candidates = self.generate_moves_from_directions(king, &KING_MOVES);
        candidates.extend(self.castling_moves(king));

        candidates
            .into_iter()
            .filter(|mv| !self.leaves_king_in_check(king, *mv))
            .collect()
    }

    fn castling_moves(&self, king: &Piece) -> Vec<Move> {
        let mut moves = Vec::new();
        if king.has_moved {
            return moves;
        }
        let from = king.square();

        for (rook_file, tag) in [(7u8, MoveTag::CastleKingSide), (0u8, MoveTag::CastleQueenSide)] {
            let rook = self.piece(king.rank, rook_file);
            if rook.kind != PieceKind::Rook || rook.owner != king.owner || rook.has_moved {
                continue;
            }
            if king.file.abs_diff(rook_file) < 3 {
                continue;
            }

            if !(king.file.min(rook_file) + 1..king.file.max(rook_file)).all(|file| self.piece(king.rank, file).is_empty()) {
                continue;
            }

            let step = if rook_file > king.file { 1 } else { -1 };
            let (Some(transit), Some(to)) = (from.offset(0, step), from.offset(0, 2 * step)) else {
                continue;
            };
            if self.is_in_check(king.owner) || self.leaves_king_in_check(king, Move::normal(from, transit)) {
                continue;
            }
            moves.push(Move::new(from, to, tag));
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::*;
    use super::*;
    use crate::chess_board::Color;

    fn pseudo_moves(board: &Board, square: &str) -> Vec<Move> {
        board.generate_pseudo_moves(board.at(sq(square)), None)
    }

    #[test]
    fn test_generate_pawn_moves_pseudo_legal() {
        // Pawn at e4 can move forward to e5
        let b = board("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1");
        assert_moves(pseudo_moves(&b, "e4"), vec!["e5"]);

        // Blocked pawn a3 by a4
        let b = board("4k3/8/8/8/P7/P7/8/4K3 w - - 0 1");
        assert_moves(pseudo_moves(&b, "a3"), vec![]);

        // Pawn on b2 with black pawns on a3 and c3
        let b = board("4k3/8/8/8/8/p1p5/1P6/4K3 w - - 0 1");
        assert_moves(pseudo_moves(&b, "b2"), vec!["b3", "b4", "a3", "c3"]);

        // Single and double step of black pawn a7
        let b = board("4k3/p7/8/8/8/8/8/4K3 b - - 0 1");
        assert_moves(pseudo_moves(&b, "a7"), vec!["a6", "a5"]);

        // Double step blocked on the second square
        let b = board("4k3/p7/8/p7/8/8/8/4K3 b - - 0 1");
        assert_moves(pseudo_moves(&b, "a7"), vec!["a6"]);

        // No capture of an own piece
        let b = board("4k3/p7/1p6/8/8/8/8/4K3 b - - 0 1");
        assert_moves(pseudo_moves(&b, "a7"), vec!["a6", "a5"]);

        // Captures on both sides
        let b = board("4k3/1p6/P1P5/8/8/8/8/4K3 b - - 0 1");
        assert_moves(pseudo_moves(&b, "b7"), vec!["b6", "b5", "a6", "c6"]);
    }

    #[test]
    fn test_double_step_needs_first_move() {
        let b = board("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        let pawn = *b.at(sq("e2"));
        assert_moves(b.generate_pseudo_moves(&pawn, None), vec!["e3", "e4"]);

        let moved = Piece { has_moved: true, ..pawn };
        assert_moves(b.generate_pseudo_moves(&moved, None), vec!["e3"]);
    }

    #[test]
    fn test_promotion_tags() {
        let b = board("3r1k2/2P5/8/8/8/8/8/4K3 w - - 0 1");
        let moves = pseudo_moves(&b, "c7");
        assert_moves(moves.clone(), vec!["c8", "d8"]);
        assert!(moves.iter().all(|m| m.tag == MoveTag::Promotion));

        let b = board("4k3/8/8/8/8/8/1p6/2R1K3 b - - 0 1");
        let moves = pseudo_moves(&b, "b2");
        assert_moves(moves.clone(), vec!["b1", "c1"]);
        assert!(moves.iter().all(|m| m.tag == MoveTag::Promotion));
    }

    #[test]
    fn test_en_passant() {
        // White pawn (4,3), black pawn double-stepped (6,4) -> (4,4)
        let mut b = Board::new();
        b.place(Piece::new(PieceKind::King, Color::White, 0, 0));
        b.place(Piece::new(PieceKind::King, Color::Black, 7, 0));
        let pawn = Piece { has_moved: true, ..Piece::new(PieceKind::Pawn, Color::White, 4, 3) };
        b.place(pawn);
        b.place(Piece { has_moved: true, ..Piece::new(PieceKind::Pawn, Color::Black, 4, 4) });
        let last = Move::normal(Square::new(6, 4), Square::new(4, 4));

        let moves = b.generate_pseudo_moves(&pawn, Some(last));
        let en_passant = Move::new(Square::new(4, 3), Square::new(5, 4), MoveTag::EnPassant);
        assert!(moves.contains(&en_passant));

        let next = b.apply_move(&pawn, en_passant, &mut PieceKind::Queen);
        assert!(next.is_empty(Square::new(4, 4)));
        assert_eq!(next.at(Square::new(5, 4)).kind, PieceKind::Pawn);
    }

    #[test]
    fn test_en_passant_black() {
        // Black pawn (3,4), white pawn double-stepped (1,3) -> (3,3)
        let mut b = Board::new();
        b.place(Piece::new(PieceKind::King, Color::White, 0, 0));
        b.place(Piece::new(PieceKind::King, Color::Black, 7, 0));
        let pawn = Piece { has_moved: true, ..Piece::new(PieceKind::Pawn, Color::Black, 3, 4) };
        b.place(pawn);
        b.place(Piece { has_moved: true, ..Piece::new(PieceKind::Pawn, Color::White, 3, 3) });
        let last = Move::normal(Square::new(1, 3), Square::new(3, 3));

        let moves = b.generate_pseudo_moves(&pawn, Some(last));
        let en_passant = Move::new(Square::new(3, 4), Square::new(2, 3), MoveTag::EnPassant);
        assert!(moves.contains(&en_passant));

        let next = b.apply_move(&pawn, en_passant, &mut PieceKind::Queen);
        assert!(next.is_empty(Square::new(3, 3)));
        assert!(next.is_empty(Square::new(3, 4)));
        assert_eq!(next.at(Square::new(2, 3)).owner, Color::Black);
    }

    #[test]
    fn test_en_passant_needs_double_step() {
        // The black pawn came from d6, a single step
        let b = board("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1");
        let moves = b.generate_pseudo_moves(b.at(sq("e5")), Some(Move::normal(sq("d6"), sq("d5"))));
        assert!(moves.iter().all(|m| m.tag != MoveTag::EnPassant));

        // Only the move right after the double step counts
        let moves = b.generate_pseudo_moves(b.at(sq("e5")), Some(Move::normal(sq("e1"), sq("e2"))));
        assert!(moves.iter().all(|m| m.tag != MoveTag::EnPassant));

        let moves = b.generate_pseudo_moves(b.at(sq("e5")), Some(Move::normal(sq("d7"), sq("d5"))));
        assert_moves(moves, vec!["e6", "d6"]);
    }

    #[test]
    fn test_generate_knight_moves_pseudo_legal() {
        let b = board("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1");
        assert_moves(pseudo_moves(&b, "d4"), vec!["b3", "c2", "e2", "f3", "f5", "e6", "c6", "b5"]);

        // Corner knight: only on-board targets, friendly ones included
        let b = board("4k3/8/8/8/8/8/2B5/N3K3 w - - 0 1");
        assert_moves(pseudo_moves(&b, "a1"), vec!["b3", "c2"]);
    }

    #[test]
    fn test_generate_bishop_moves_pseudo_legal() {
        let b = board("8/8/8/8/3B4/8/8/8 w - - 0 1");
        let expected = vec!["a7", "b6", "c5", "e3", "f2", "g1", "a1", "b2", "c3", "e5", "f6", "g7", "h8"];
        assert_moves(pseudo_moves(&b, "d4"), expected);

        // Stops on the first piece and includes it, friend or foe
        let b = board("8/6r1/5B2/8/3P4/8/8/8 w - - 0 1");
        assert_moves(pseudo_moves(&b, "f6"), vec!["d8", "e7", "g5", "h4", "e5", "d4", "g7"]);
    }

    #[test]
    fn test_generate_rook_moves_pseudo_legal() {
        let b = board("8/8/8/8/3R4/8/8/8 w - - 0 1");
        let expected = vec!["d1", "d2", "d3", "d5", "d6", "d7", "d8", "a4", "b4", "c4", "e4", "f4", "g4", "h4"];
        assert_moves(pseudo_moves(&b, "d4"), expected);

        let b = board("8/8/8/8/3bR3/8/4N3/8 w - - 0 1");
        let expected = vec!["e3", "e2", "e5", "e6", "e7", "e8", "d4", "f4", "g4", "h4"];
        assert_moves(pseudo_moves(&b, "e4"), expected);
    }

    #[test]
    fn test_generate_queen_moves_pseudo_legal() {
        let b = board("8/b7/1b6/qb6/1P6/P7/8/8 b - - 0 1");
        assert_moves(pseudo_moves(&b, "a5"), vec!["a6", "a7", "a4", "a3", "b4", "b5", "b6"]);
    }

    #[test]
    fn test_generate_king_moves() {
        let b = board("4k3/8/8/8/8/3K4/8/8 w - - 0 1");
        assert_moves(pseudo_moves(&b, "d3"), vec!["c2", "c3", "c4", "d2", "d4", "e2", "e3", "e4"]);

        // Squares covered by the rook are dropped
        let b = board("3rk3/8/8/8/8/3K4/8/8 w - - 0 1");
        assert_moves(pseudo_moves(&b, "d3"), vec!["c2", "c3", "c4", "e2", "e3", "e4"]);

        // The enemy king covers its neighbours
        let b = board("8/8/8/8/3k4/8/3K4/8 w - - 0 1");
        assert_moves(pseudo_moves(&b, "d2"), vec!["c1", "d1", "e1", "c2", "e2"]);
    }

    #[test]
    fn test_castling() {
        // King (0,3), rook (0,0), (0,1) and (0,2) empty
        let b = board("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        let moves = pseudo_moves(&b, "e1");
        let castle = Move::new(Square::new(0, 3), Square::new(0, 1), MoveTag::CastleQueenSide);
        assert!(moves.contains(&castle));

        let king = *b.at(sq("e1"));
        let next = b.apply_move(&king, castle, &mut PieceKind::Queen);
        let rook = next.piece(0, 2);
        assert_eq!(rook.kind, PieceKind::Rook);
        assert!(rook.has_moved);
        assert!(next.piece(0, 0).is_empty());

        let b = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_moves(pseudo_moves(&b, "e1"), vec!["d1", "d2", "e2", "f2", "f1", "c1", "g1"]);
        let tags: Vec<_> = pseudo_moves(&b, "e1").into_iter().filter(|m| m.is_castle()).map(|m| (m.to, m.tag)).collect();
        assert!(tags.contains(&(sq("c1"), MoveTag::CastleKingSide)));
        assert!(tags.contains(&(sq("g1"), MoveTag::CastleQueenSide)));
    }

    #[test]
    fn test_castling_blocked() {
        // b1 occupied blocks the long castle
        let b = board("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1");
        assert_moves(pseudo_moves(&b, "e1"), vec!["d1", "d2", "e2", "f2", "f1", "g1"]);

        // Rook already moved
        let b = board("4k3/8/8/8/8/8/8/R3K2R w Q - 0 1");
        assert_moves(pseudo_moves(&b, "e1"), vec!["d1", "d2", "e2", "f2", "f1", "c1"]);

        // No castling out of check
        let b = board("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert_moves(pseudo_moves(&b, "e1"), vec!["d1", "d2", "f2", "f1"]);

        // Nor through an attacked square
        let b = board("5rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert_moves(pseudo_moves(&b, "e1"), vec!["d1", "d2", "e2", "c1"]);
    }

    #[test]
    fn test_castling_needs_unmoved_king() {
        let b = board("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        let moved = Piece { has_moved: true, ..*b.at(sq("e1")) };
        let moves = b.generate_pseudo_moves(&moved, None);
        assert!(moves.iter().all(|m| !m.is_castle()));
    }
}
