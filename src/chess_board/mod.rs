mod chess_board;
pub mod check;
pub mod fen;
pub mod legality;
pub mod model;
pub mod move_generation;
pub mod perft;

#[cfg(test)]
mod test_utils;

pub use chess_board::{Board, Promoter};
pub use check::CheckState;
pub use legality::Rules;
pub use model::{Color, Move, MoveTag, Piece, PieceKind, Square, PROMOTION_KINDS};
