use super::{Board, Player};

/// Board plus the turn marker. A turn of `None` means the game is over.
///
/// Only the rules engine mutates a `GameState`; everything else reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    turn: Option<Player>,
}

impl GameState {
    /// Empty board, Yellow to move.
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            turn: Some(Player::FIRST),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The player to move, or `None` once the game has ended.
    pub fn turn(&self) -> Option<Player> {
        self.turn
    }

    pub fn is_terminal(&self) -> bool {
        self.turn.is_none()
    }

    pub(super) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(super) fn set_turn(&mut self, turn: Option<Player>) {
        self.turn = turn;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
