pub mod chess_board;
pub mod error;
pub mod game;
pub mod players;
