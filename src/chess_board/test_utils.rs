use super::{Board, Move, Square};

pub fn sq(algebraic: &str) -> Square {
    Square::from_algebraic(algebraic).unwrap_or_else(|| panic!("bad square {}", algebraic))
}

pub fn board(fen: &str) -> Board {
    Board::from_fen(fen).map(|(board, _, _)| board).unwrap()
}

/// Compares the targets of `generated` with the expected squares, ignoring order.
pub fn assert_moves<I: IntoIterator<Item = Move>>(generated: I, mut expected: Vec<&str>) {
    let mut generated_converted: Vec<_> = generated.into_iter().map(|m| m.to.as_algebraic()).collect();
    generated_converted.sort();
    expected.sort();

    assert_eq!(generated_converted, expected);
}
