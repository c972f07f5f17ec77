use crate::config::UiConfig;
use crate::game::{Game, Move, TurnOutcome, COLS};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{backend::Backend, Terminal};
use std::rc::Rc;
use std::time::Duration;
use std::{cell, io};
use tracing::debug;

use super::game_view::{self, BoardGeometry};

pub struct App {
    game: Game,
    selected_column: usize,
    start_column: usize,
    poll_interval: Duration,
    mouse: bool,
    should_quit: bool,
    message: Option<String>,
    /// Filled in by the game's move listener.
    last_move: Rc<cell::Cell<Option<Move>>>,
    board_geometry: BoardGeometry,
}

impl App {
    pub fn new(config: &UiConfig) -> Self {
        let mut game = Game::new();
        let last_move = Rc::new(cell::Cell::new(None));
        let sink = Rc::clone(&last_move);
        game.subscribe(move |mv| sink.set(Some(*mv)));

        let start_column = config.start_column.min(COLS - 1);
        App {
            game,
            selected_column: start_column,
            start_column,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            mouse: config.mouse,
            should_quit: false,
            message: None,
            last_move,
            board_geometry: BoardGeometry::default(),
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            terminal
                .draw(|f| self.render(f))
                .map_err(Into::<io::Error>::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(self.poll_interval)? {
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                self.selected_column = (self.selected_column + 1).min(COLS - 1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece(self.selected_column);
            }
            KeyCode::Char(digit @ '1'..='7') => {
                let column = usize::from(digit as u8 - b'1');
                self.selected_column = column;
                self.drop_piece(column);
            }
            KeyCode::Char('r') => self.restart(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !self.mouse {
            return;
        }
        // Any click after the game ends starts a new one, on or off the board
        if self.game.is_over() && mouse.kind == MouseEventKind::Down(MouseButton::Left) {
            self.restart();
            return;
        }
        let Some(column) = self.board_geometry.column_at(mouse.column, mouse.row) else {
            return;
        };

        match mouse.kind {
            MouseEventKind::Moved if !self.game.is_over() => {
                self.selected_column = column;
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.message = None;
                self.selected_column = column;
                self.drop_piece(column);
            }
            _ => {}
        }
    }

    /// Play into `column`, or start over if the game has already ended.
    fn drop_piece(&mut self, column: usize) {
        if self.game.is_over() {
            self.restart();
            return;
        }

        match self.game.advance_turn(column.min(COLS - 1)) {
            TurnOutcome::Won { winner, .. } => {
                self.message = Some(format!("{winner} wins! Drop again to play another game."));
            }
            TurnOutcome::Stalemate => {
                self.message = Some("It's a draw! Drop again to play another game.".to_string());
            }
            TurnOutcome::ColumnFull => {
                self.message = Some("Column is full!".to_string());
            }
            TurnOutcome::Placed(_) | TurnOutcome::GameOver => {}
        }
    }

    fn restart(&mut self) {
        debug!("restart requested");
        self.game.new_game();
        self.last_move.set(None);
        self.selected_column = self.start_column;
        self.message = Some("New game started!".to_string());
    }

    fn render(&mut self, frame: &mut ratatui::Frame) {
        self.board_geometry = game_view::render(
            frame,
            &self.game,
            self.selected_column,
            &self.message,
            self.last_move.get(),
        );
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&UiConfig::default())
    }
}
