//! # Connect Four
//!
//! A two-player Connect Four game played in the terminal. Pieces drop under
//! gravity into a 6x7 grid; four in a row horizontally, vertically or
//! diagonally wins, and a full board with no line is a stalemate.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, player, state, rules engine
//! - [`ui`] — Terminal UI built with Ratatui and Crossterm
//! - [`config`] — TOML configuration loading and validation
//! - [`logging`] — File-backed `tracing` subscriber
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod ui;
