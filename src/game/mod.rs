mod collaborators;

pub use collaborators::{Display, GameEvent, NoDisplay, Outcome, Prompt, SelectionKind, Selector};

use crate::chess_board::{Board, CheckState, Color, Move, MoveTag, Piece, PieceKind, Rules, PROMOTION_KINDS};
use crate::error::{GameError, GameResult};
use log::{debug, info, warn};

enum TurnState {
    SelectingPiece(Vec<Piece>),
    SelectingMove { piece: Piece, moves: Vec<Move> },
    Applying { piece: Piece, mv: Move },
    RecomputingCheck,
}

/// A game in progress: the board, whose turn it is and the check state of that side.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    to_move: Color,
    last_move: Option<Move>,
    check: CheckState,
    rules: Rules,
}

impl Game {
    pub fn new(rules: Rules) -> Self {
        Self {
            board: Board::standard(),
            to_move: Color::White,
            last_move: None,
            check: CheckState::NoCheck,
            rules,
        }
    }

    pub fn from_fen(fen: &str, rules: Rules) -> GameResult<Self> {
        let (board, to_move, last_move) = Board::from_fen(fen)?;
        Self::from_position(board, to_move, last_move, rules)
    }

    /// Starts from an arbitrary position. Both sides need exactly one king.
    pub fn from_position(board: Board, to_move: Color, last_move: Option<Move>, rules: Rules) -> GameResult<Self> {
        for color in [Color::White, Color::Black] {
            let kings = board.pieces_of(color).filter(|p| p.kind == PieceKind::King).count();
            if kings == 0 {
                return Err(GameError::MissingKing(color));
            }
            if kings > 1 {
                return Err(GameError::TooManyKings(color));
            }
        }
        let check = board.detect_check(to_move.opponent());
        Ok(Self {
            board,
            to_move,
            last_move,
            check,
            rules,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn check(&self) -> &CheckState {
        &self.check
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn to_fen(&self) -> String {
        self.board.to_fen(self.to_move, self.last_move)
    }

    pub fn selectable_pieces(&self) -> Vec<Piece> {
        self.board.selectable_pieces(self.to_move, self.last_move, &self.check, &self.rules)
    }

    pub fn legal_moves(&self, piece: &Piece) -> Vec<Move> {
        self.board.legal_moves(piece, self.last_move, &self.check, &self.rules)
    }

    /// Applies `mv` for `piece` and hands the turn over. `promotion` is only read for
    /// promotion moves.
    pub fn make_move(&mut self, piece: &Piece, mv: Move, promotion: PieceKind) {
        self.apply(piece, mv, promotion);
        self.recompute_check();
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome_for(&self.selectable_pieces())
    }

    fn outcome_for(&self, selectable: &[Piece]) -> Option<Outcome> {
        if !selectable.is_empty() {
            return None;
        }
        let checkmate = self.check.in_check();
        if !checkmate && self.rules.stalemate_is_draw {
            return Some(Outcome::Draw);
        }
        Some(Outcome::Win {
            winner: self.to_move.opponent(),
            checkmate,
        })
    }

    fn apply(&mut self, piece: &Piece, mv: Move, mut promotion: PieceKind) {
        self.board = self.board.apply_move(piece, mv, &mut promotion);
        self.last_move = Some(mv);
        debug!("{} plays {} ({:?})", piece, mv, mv.tag);
    }

    fn recompute_check(&mut self) {
        let mover = self.to_move;
        self.to_move = mover.opponent();
        self.check = self.board.detect_check(mover);
        debug!("{} to move, {:?}", self.to_move, self.check);
    }

    /// Plays one ply, prompting `selector` until it picks a valid piece, move and
    /// promotion. Returns the outcome instead when the side to move has no move.
    pub fn play_turn(&mut self, display: &mut dyn Display, selector: &mut dyn Selector) -> GameResult<Option<Outcome>> {
        let pieces = self.selectable_pieces();
        if let Some(outcome) = self.outcome_for(&pieces) {
            info!("Game over: {}", outcome);
            display.show(&self.board, &[], None);
            display.event(&GameEvent::GameOver(outcome));
            return Ok(Some(outcome));
        }

        display.event(&GameEvent::TurnStarted {
            player: self.to_move,
            in_check: self.check.in_check(),
        });

        let mut state = TurnState::SelectingPiece(pieces);
        loop {
            state = match state {
                TurnState::SelectingPiece(pieces) => {
                    display.show(&self.board, &[], None);
                    let index = selector.select(Prompt::Piece {
                        player: self.to_move,
                        options: &pieces,
                    })?;
                    match pick(&pieces, index) {
                        Some(piece) => TurnState::SelectingMove {
                            moves: self.legal_moves(&piece),
                            piece,
                        },
                        None => {
                            reject(display, SelectionKind::Piece, index);
                            TurnState::SelectingPiece(pieces)
                        }
                    }
                }
                TurnState::SelectingMove { piece, moves } => {
                    display.show(&self.board, &moves, Some(&piece));
                    let index = selector.select(Prompt::Move { piece, options: &moves })?;
                    match pick(&moves, index) {
                        Some(mv) => TurnState::Applying { piece, mv },
                        None => {
                            reject(display, SelectionKind::Move, index);
                            TurnState::SelectingMove { piece, moves }
                        }
                    }
                }
                TurnState::Applying { piece, mv } => {
                    let promotion = match mv.tag {
                        MoveTag::Promotion => select_promotion(display, selector, piece)?,
                        _ => piece.kind,
                    };
                    self.apply(&piece, mv, promotion);
                    display.event(&GameEvent::MoveApplied { piece, mv });
                    TurnState::RecomputingCheck
                }
                TurnState::RecomputingCheck => {
                    self.recompute_check();
                    return Ok(None);
                }
            }
        }
    }

    /// Alternates between the two selectors until the game ends.
    pub fn play(&mut self, display: &mut dyn Display, white: &mut dyn Selector, black: &mut dyn Selector) -> GameResult<Outcome> {
        info!("Starting game from {}", self.to_fen());
        loop {
            let outcome = match self.to_move {
                Color::Black => self.play_turn(display, black)?,
                _ => self.play_turn(display, white)?,
            };
            if let Some(outcome) = outcome {
                return Ok(outcome);
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

fn pick<T: Copy>(options: &[T], index: isize) -> Option<T> {
    usize::try_from(index).ok().and_then(|i| options.get(i)).copied()
}

fn reject(display: &mut dyn Display, kind: SelectionKind, index: isize) {
    warn!("Rejected {:?} selection {}", kind, index);
    display.event(&GameEvent::InvalidSelection(kind));
}

fn select_promotion(display: &mut dyn Display, selector: &mut dyn Selector, piece: Piece) -> GameResult<PieceKind> {
    loop {
        let index = selector.select(Prompt::Promotion { piece })?;
        match pick(&PROMOTION_KINDS, index) {
            Some(kind) => return Ok(kind),
            None => reject(display, SelectionKind::Promotion, index),
        }
    }
}
