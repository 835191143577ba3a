//! Error types shared by the board, the game loop and the players.

use crate::chess_board::Color;

/// Errors that can occur while setting up or driving a game
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A FEN string that could not be parsed
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    /// A position without a king for one side
    #[error("No {0} king on the board")]
    MissingKing(Color),

    /// A position with more than one king for one side
    #[error("More than one {0} king on the board")]
    TooManyKings(Color),

    /// The selector ran out of input before the game ended
    #[error("Input closed before the game ended")]
    InputClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
