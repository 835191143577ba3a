use chess_referee::chess_board::{Board, CheckState, Color, Move, MoveTag, Piece, PieceKind, Rules, Square};
use chess_referee::game::{Game, NoDisplay, Selector};
use chess_referee::players::RandomPlayer;

fn place(board: &mut Board, kind: PieceKind, owner: Color, rank: u8, file: u8, has_moved: bool) -> Piece {
    let piece = Piece {
        has_moved,
        ..Piece::new(kind, owner, rank, file)
    };
    board.place(piece);
    piece
}

#[test]
fn moved_piece_loses_first_move_privileges() {
    let board = Board::standard();
    let pawn = *board.piece(1, 3);
    let next = board.apply_move(&pawn, Move::normal(Square::new(1, 3), Square::new(2, 3)), &mut PieceKind::Queen);
    let moved = next.piece(2, 3);
    assert!(moved.has_moved);
    let targets: Vec<_> = next.generate_pseudo_moves(moved, None).iter().map(|m| m.to).collect();
    assert_eq!(targets, vec![Square::new(3, 3)]);

    let mut board = Board::new();
    place(&mut board, PieceKind::King, Color::Black, 7, 3, true);
    let king = place(&mut board, PieceKind::King, Color::White, 0, 3, false);
    place(&mut board, PieceKind::Rook, Color::White, 0, 0, false);
    let castle = Move::new(king.square(), Square::new(0, 1), MoveTag::CastleQueenSide);
    assert!(board.generate_pseudo_moves(&king, None).contains(&castle));

    // Step the king out and back: castling is gone
    let out = board.apply_move(&king, Move::normal(king.square(), Square::new(1, 3)), &mut PieceKind::Queen);
    let stepped = *out.piece(1, 3);
    let back = out.apply_move(&stepped, Move::normal(stepped.square(), Square::new(0, 3)), &mut PieceKind::Queen);
    assert!(back.generate_pseudo_moves(back.piece(0, 3), None).iter().all(|m| !m.is_castle()));
}

#[test]
fn en_passant_clears_the_passed_pawn() {
    let mut board = Board::new();
    place(&mut board, PieceKind::King, Color::White, 0, 0, true);
    place(&mut board, PieceKind::King, Color::Black, 7, 7, true);
    let pawn = place(&mut board, PieceKind::Pawn, Color::White, 4, 3, true);
    place(&mut board, PieceKind::Pawn, Color::Black, 4, 4, true);
    let last = Move::normal(Square::new(6, 4), Square::new(4, 4));

    let check = board.detect_check(Color::Black);
    let moves = board.legal_moves(&pawn, Some(last), &check, &Rules::default());
    let en_passant = Move::new(Square::new(4, 3), Square::new(5, 4), MoveTag::EnPassant);
    assert!(moves.contains(&en_passant));

    let next = board.apply_move(&pawn, en_passant, &mut PieceKind::Queen);
    assert!(next.piece(4, 4).is_empty());
    assert_eq!(next.piece(5, 4).kind, PieceKind::Pawn);
    assert_eq!(next.piece(5, 4).owner, Color::White);
}

#[test]
fn castling_relocates_the_rook() {
    let mut board = Board::new();
    place(&mut board, PieceKind::King, Color::Black, 7, 3, true);
    let king = place(&mut board, PieceKind::King, Color::White, 0, 3, false);
    place(&mut board, PieceKind::Rook, Color::White, 0, 0, false);

    let check = board.detect_check(Color::Black);
    let moves = board.legal_moves(&king, None, &check, &Rules::default());
    let castle = Move::new(Square::new(0, 3), Square::new(0, 1), MoveTag::CastleQueenSide);
    assert!(moves.contains(&castle));

    let next = board.apply_move(&king, castle, &mut PieceKind::Queen);
    let rook = next.piece(0, 2);
    assert_eq!(rook.kind, PieceKind::Rook);
    assert!(rook.has_moved);
    assert!(next.piece(0, 0).is_empty());
    assert_eq!(next.piece(0, 1).kind, PieceKind::King);
}

#[test]
fn single_rook_check_restricts_to_intersection() {
    // White king (0,3), Black rook (2,3), (1,3) empty between them
    let mut board = Board::new();
    place(&mut board, PieceKind::King, Color::White, 0, 3, true);
    place(&mut board, PieceKind::King, Color::Black, 7, 7, true);
    place(&mut board, PieceKind::Rook, Color::Black, 2, 3, true);
    let bishop = place(&mut board, PieceKind::Bishop, Color::White, 3, 2, true);

    let check = board.detect_check(Color::Black);
    assert!(check.in_check());
    assert_eq!(check.block_squares(), &[Square::new(2, 3), Square::new(1, 3)]);

    let pseudo: Vec<Move> = board.generate_pseudo_moves(&bishop, None);
    let expected: Vec<Move> = pseudo
        .into_iter()
        .filter(|m| check.block_squares().contains(&m.to))
        .collect();
    let legal = board.legal_moves(&bishop, None, &check, &Rules::default());
    assert_eq!(legal, expected);
    assert_eq!(legal, vec![Move::normal(Square::new(3, 2), Square::new(2, 3))]);
}

#[test]
fn promotion_on_any_file() {
    let mut board = Board::new();
    place(&mut board, PieceKind::King, Color::White, 0, 0, true);
    place(&mut board, PieceKind::King, Color::Black, 5, 0, true);
    let pawn = place(&mut board, PieceKind::Pawn, Color::White, 6, 4, true);
    place(&mut board, PieceKind::Knight, Color::Black, 7, 5, true);

    let moves = board.legal_moves(&pawn, None, &CheckState::NoCheck, &Rules::default());
    assert_eq!(moves.len(), 2);
    assert!(moves.iter().all(|m| m.tag == MoveTag::Promotion));

    for mv in moves {
        let next = board.apply_move(&pawn, mv, &mut PieceKind::Queen);
        assert_eq!(next.at(mv.to).kind, PieceKind::Queen);
        assert_eq!(next.at(mv.to).owner, Color::White);
    }
}

#[test]
fn legal_moves_stay_on_board_and_off_own_pieces() {
    for seed in 10..13u64 {
        let mut game = Game::default();
        let mut white = RandomPlayer::new(seed);
        let mut black = RandomPlayer::new(seed * 7);
        for _ in 0..120 {
            for piece in game.selectable_pieces() {
                for mv in game.legal_moves(&piece) {
                    assert!(mv.to.rank < 8 && mv.to.file < 8);
                    assert_ne!(game.board().at(mv.to).owner, piece.owner);
                    assert_ne!(game.board().at(mv.to).kind, PieceKind::King);
                }
            }
            let selector: &mut dyn Selector = if game.to_move() == Color::White { &mut white } else { &mut black };
            if game.play_turn(&mut NoDisplay, selector).unwrap().is_some() {
                break;
            }
        }
    }
}
