pub mod random;
pub mod terminal;

pub use random::RandomPlayer;
pub use terminal::{SharedTerminal, Terminal};
