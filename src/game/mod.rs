//! Core Connect Four game logic: the board with gravity placement, players,
//! the game state, and the rules engine that drives turns and detects wins
//! and stalemates.

mod board;
mod player;
mod rules;
mod state;

pub use board::{Board, Cell, Coord, COLS, ROWS, WIN_LENGTH};
pub use player::Player;
pub use rules::{find_win_line, Game, Move, TurnOutcome, WinLine};
pub use state::GameState;
