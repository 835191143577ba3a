use crate::chess_board::{Board, Color, Move, Piece};
use crate::error::GameResult;
use std::fmt;

/// How a game ended. A stalemate counts as a loss unless the rules say otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win { winner: Color, checkmate: bool },
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win { winner, checkmate: true } => write!(f, "Checkmate, {} wins", winner),
            Outcome::Win { winner, checkmate: false } => {
                write!(f, "{} has no legal response, {} wins", winner.opponent(), winner)
            }
            Outcome::Draw => write!(f, "Stalemate, the game is drawn"),
        }
    }
}

/// Which selection step rejected an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Piece,
    Move,
    Promotion,
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionKind::Piece => write!(f, "That is not one of your movable pieces, pick again"),
            SelectionKind::Move => write!(f, "That is not a legal move for this piece, pick again"),
            SelectionKind::Promotion => write!(f, "Promote to one of the four listed pieces"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    TurnStarted { player: Color, in_check: bool },
    InvalidSelection(SelectionKind),
    MoveApplied { piece: Piece, mv: Move },
    GameOver(Outcome),
}

/// A question for a `Selector`. The answer is a zero-based index into the options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt<'a> {
    Piece { player: Color, options: &'a [Piece] },
    Move { piece: Piece, options: &'a [Move] },
    /// Options are `PROMOTION_KINDS`.
    Promotion { piece: Piece },
}

impl Prompt<'_> {
    pub fn player(&self) -> Color {
        match self {
            Prompt::Piece { player, .. } => *player,
            Prompt::Move { piece, .. } | Prompt::Promotion { piece } => piece.owner,
        }
    }

    pub fn option_count(&self) -> usize {
        match self {
            Prompt::Piece { options, .. } => options.len(),
            Prompt::Move { options, .. } => options.len(),
            Prompt::Promotion { .. } => crate::chess_board::PROMOTION_KINDS.len(),
        }
    }
}

/// Renders the game. Nothing it does feeds back into the rules.
pub trait Display {
    fn show(&mut self, board: &Board, highlighted: &[Move], selected: Option<&Piece>);
    fn event(&mut self, event: &GameEvent);
}

/// Answers prompts with an index, which may be out of range.
pub trait Selector {
    fn select(&mut self, prompt: Prompt<'_>) -> GameResult<isize>;
}

/// Ignores everything, for headless games.
pub struct NoDisplay;

impl Display for NoDisplay {
    fn show(&mut self, _board: &Board, _highlighted: &[Move], _selected: Option<&Piece>) {}
    fn event(&mut self, _event: &GameEvent) {}
}
