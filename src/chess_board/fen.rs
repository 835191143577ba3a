use super::{Board, Color, Move, Piece, PieceKind, Square};
use crate::error::{GameError, GameResult};

pub const INITIAL_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn invalid(message: impl Into<String>) -> GameError {
    GameError::InvalidFen(message.into())
}

/// Parses a FEN string into a board, the side to move and the last move implied by the
/// en passant field.
///
/// The board does not store castling rights; they are folded into the `has_moved` flags of
/// the king and corner rooks. Pawns off their start rank are marked as moved.
pub fn from_fen(fen: &str) -> GameResult<(Board, Color, Option<Move>)> {
    let mut board = Board::new();
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 6 {
        return Err(invalid("must have 6 parts"));
    }

    let rows: Vec<&str> = parts[0].split('/').collect();
    if rows.len() != 8 {
        return Err(invalid("expected 8 rows"));
    }

    let castling = parts[2];
    if castling != "-" && !castling.chars().all(|c| "KQkq".contains(c)) {
        return Err(invalid(format!("invalid castling field {}", castling)));
    }

    for (row_index, row) in rows.iter().enumerate() {
        let rank = 7 - row_index as u8;
        let mut col_index = 0usize;

        for c in row.chars() {
            if col_index > 7 {
                return Err(invalid(format!("too many squares in row {}", row_index)));
            }
            if let Some(skip) = c.to_digit(10) {
                col_index += skip as usize;
                continue;
            }
            let kind = match c.to_ascii_lowercase() {
                'p' => PieceKind::Pawn,
                'r' => PieceKind::Rook,
                'n' => PieceKind::Knight,
                'b' => PieceKind::Bishop,
                'q' => PieceKind::Queen,
                'k' => PieceKind::King,
                _ => return Err(invalid(format!("invalid piece character {}", c))),
            };
            let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
            let file = 7 - col_index as u8;
            let mut piece = Piece::new(kind, color, rank, file);
            piece.has_moved = !is_unmoved(kind, color, rank, file, castling);
            board.place(piece);
            col_index += 1;
        }
        if col_index != 8 {
            return Err(invalid(format!("row {} does not describe 8 squares", row_index)));
        }
    }

    let to_move = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(invalid("invalid active color")),
    };

    let last_move = match parts[3] {
        "-" => None,
        square => Some(parse_en_passant(&board, square, to_move)?),
    };

    for clock in &parts[4..] {
        clock.parse::<u32>().map_err(|_| invalid(format!("{} is not a valid move counter", clock)))?;
    }

    Ok((board, to_move, last_move))
}

fn is_unmoved(kind: PieceKind, color: Color, rank: u8, file: u8, castling: &str) -> bool {
    let (king_side, queen_side) = match color {
        Color::White => ('K', 'Q'),
        _ => ('k', 'q'),
    };
    let home = rank == color.back_rank();
    match kind {
        PieceKind::Pawn => rank as i8 == color.back_rank() as i8 + color.forward(),
        PieceKind::King => home && file == 3 && (castling.contains(king_side) || castling.contains(queen_side)),
        // FEN's king side is the h-file, stored as file 0.
        PieceKind::Rook if home && file == 0 => castling.contains(king_side),
        PieceKind::Rook if home && file == 7 => castling.contains(queen_side),
        PieceKind::Rook => false,
        _ => true,
    }
}

/// Rebuilds the double step that made `square` an en passant target.
fn parse_en_passant(board: &Board, square: &str, to_move: Color) -> GameResult<Move> {
    let target = Square::from_algebraic(square).ok_or_else(|| invalid(format!("invalid square {}", square)))?;
    let mover = to_move.opponent();
    let expected_rank = (mover.back_rank() as i8 + 2 * mover.forward()) as u8;
    if target.rank != expected_rank {
        return Err(invalid(format!("{} cannot be an en passant square", square)));
    }
    let from = Square::new((target.rank as i8 - mover.forward()) as u8, target.file);
    let to = Square::new((target.rank as i8 + mover.forward()) as u8, target.file);
    let pawn = board.at(to);
    if pawn.kind != PieceKind::Pawn || pawn.owner != mover {
        return Err(invalid(format!("no pawn passed over {}", square)));
    }
    Ok(Move::normal(from, to))
}

pub fn to_fen(board: &Board, to_move: Color, last_move: Option<Move>) -> String {
    let mut board_representation = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0;

        for file in (0..8u8).rev() {
            let piece = board.piece(rank, file);
            if piece.is_empty() {
                empty_count += 1;
                continue;
            }
            if empty_count > 0 {
                board_representation.push_str(&empty_count.to_string());
                empty_count = 0;
            }
            board_representation.push(piece.to_char());
        }

        if empty_count > 0 {
            board_representation.push_str(&empty_count.to_string());
        }

        if rank > 0 {
            board_representation.push('/');
        }
    }

    let active_color = if to_move == Color::Black { "b" } else { "w" };

    let mut castling = String::new();
    for color in [Color::White, Color::Black] {
        let rank = color.back_rank();
        let king = board.piece(rank, 3);
        if king.kind != PieceKind::King || king.owner != color || king.has_moved {
            continue;
        }
        for (file, right) in [(0u8, 'K'), (7u8, 'Q')] {
            let rook = board.piece(rank, file);
            if rook.kind == PieceKind::Rook && rook.owner == color && !rook.has_moved {
                castling.push(if color == Color::White { right } else { right.to_ascii_lowercase() });
            }
        }
    }
    if castling.is_empty() {
        castling = "-".to_string();
    }

    let en_passant_square = last_move
        .filter(|mv| mv.from.rank.abs_diff(mv.to.rank) == 2 && board.at(mv.to).kind == PieceKind::Pawn)
        .map(|mv| Square::new((mv.from.rank + mv.to.rank) / 2, mv.to.file).as_algebraic())
        .unwrap_or_else(|| "-".to_string());

    format!("{} {} {} {} 0 1", board_representation, active_color, castling, en_passant_square)
}
