use crate::chess_board::{Board, Move, MoveTag, Piece, PROMOTION_KINDS};
use crate::error::{GameError, GameResult};
use crate::game::{Display, GameEvent, Prompt, Selector};
use circular_buffer::CircularBuffer;
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use tabled::settings::Style;
use tabled::{Table, Tabled};

const HISTORY_LEN: usize = 8;

#[derive(Tabled)]
struct OptionRow {
    #[tabled(rename = "#")]
    index: usize,
    piece: String,
    square: String,
    note: &'static str,
}

fn move_note(mv: &Move) -> &'static str {
    match mv.tag {
        MoveTag::Normal => "",
        MoveTag::EnPassant => "en passant",
        MoveTag::CastleKingSide | MoveTag::CastleQueenSide => "castle",
        MoveTag::Promotion => "promotion",
    }
}

fn option_rows(prompt: &Prompt<'_>) -> Vec<OptionRow> {
    match prompt {
        Prompt::Piece { options, .. } => options
            .iter()
            .enumerate()
            .map(|(index, piece)| OptionRow {
                index,
                piece: piece.kind.to_string(),
                square: piece.square().as_algebraic(),
                note: "",
            })
            .collect(),
        Prompt::Move { piece, options } => options
            .iter()
            .enumerate()
            .map(|(index, mv)| OptionRow {
                index,
                piece: piece.kind.to_string(),
                square: mv.to.as_algebraic(),
                note: move_note(mv),
            })
            .collect(),
        Prompt::Promotion { piece } => PROMOTION_KINDS
            .iter()
            .enumerate()
            .map(|(index, kind)| OptionRow {
                index,
                piece: kind.to_string(),
                square: piece.square().as_algebraic(),
                note: "",
            })
            .collect(),
    }
}

/// Human seat on a text terminal: draws the board, lists the options as a table and
/// reads one number per line.
pub struct Terminal<R, W> {
    input: R,
    output: W,
    history: CircularBuffer<HISTORY_LEN, String>,
    write_error: Option<io::Error>,
}

impl Terminal<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            history: CircularBuffer::new(),
            write_error: None,
        }
    }

    /// The most recent plies, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &String> {
        self.history.iter()
    }

    pub fn into_output(self) -> W {
        self.output
    }

    // Display cannot fail, so the first write error is kept for the next prompt.
    fn write(&mut self, text: &str) {
        if self.write_error.is_some() {
            return;
        }
        if let Err(err) = self.output.write_all(text.as_bytes()).and_then(|_| self.output.flush()) {
            self.write_error = Some(err);
        }
    }

    fn take_write_error(&mut self) -> GameResult<()> {
        match self.write_error.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

impl<R: BufRead, W: Write> Display for Terminal<R, W> {
    fn show(&mut self, board: &Board, highlighted: &[Move], selected: Option<&Piece>) {
        let mut text = board.render_to_string(highlighted, selected);
        if !self.history.is_empty() {
            let recent: Vec<&str> = self.history.iter().map(String::as_str).collect();
            text.push_str(&format!("Recent moves: {}\n", recent.join(", ")));
        }
        self.write(&text);
    }

    fn event(&mut self, event: &GameEvent) {
        let text = match event {
            GameEvent::TurnStarted { player, in_check: true } => format!("\n{} to move, in check!\n", player),
            GameEvent::TurnStarted { player, in_check: false } => format!("\n{} to move\n", player),
            GameEvent::InvalidSelection(kind) => format!("{}\n", kind),
            GameEvent::MoveApplied { piece, mv } => {
                let ply = format!("{} {}", piece.to_char(), mv);
                self.history.push_back(ply);
                format!("{} {} moves {} -> {}\n", piece.owner, piece.kind, mv.from, mv.to)
            }
            GameEvent::GameOver(outcome) => format!("{}\n", outcome),
        };
        self.write(&text);
    }
}

impl<R: BufRead, W: Write> Selector for Terminal<R, W> {
    fn select(&mut self, prompt: Prompt<'_>) -> GameResult<isize> {
        let question = match &prompt {
            Prompt::Piece { player, .. } => format!("{}, select a piece", player),
            Prompt::Move { piece, .. } => format!("Select a move for the {} on {}", piece.kind, piece.square()),
            Prompt::Promotion { piece } => format!("Promote the pawn on {} to", piece.square()),
        };
        let table = Table::new(option_rows(&prompt)).with(Style::modern()).to_string();
        self.write(&format!("{}\n{} [0-{}]: ", table, question, prompt.option_count().saturating_sub(1)));
        self.take_write_error()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(GameError::InputClosed);
        }
        // Anything that is not a number is just another out-of-range answer.
        Ok(line.trim().parse::<isize>().unwrap_or(-1))
    }
}

/// Handle that lets one terminal act as the display and as both human seats.
pub struct SharedTerminal<R, W>(Rc<RefCell<Terminal<R, W>>>);

impl<R, W> SharedTerminal<R, W> {
    pub fn new(terminal: Terminal<R, W>) -> Self {
        Self(Rc::new(RefCell::new(terminal)))
    }
}

impl<R, W> Clone for SharedTerminal<R, W> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<R: BufRead, W: Write> Display for SharedTerminal<R, W> {
    fn show(&mut self, board: &Board, highlighted: &[Move], selected: Option<&Piece>) {
        self.0.borrow_mut().show(board, highlighted, selected);
    }

    fn event(&mut self, event: &GameEvent) {
        self.0.borrow_mut().event(event);
    }
}

impl<R: BufRead, W: Write> Selector for SharedTerminal<R, W> {
    fn select(&mut self, prompt: Prompt<'_>) -> GameResult<isize> {
        self.0.borrow_mut().select(prompt)
    }
}
