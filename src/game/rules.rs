use std::fmt;

use tracing::{debug, info, instrument};

use super::{Board, Cell, Coord, GameState, Player, COLS, ROWS, WIN_LENGTH};

/// The four coordinates of a detected four-in-a-row, starting at its origin.
pub type WinLine = [Coord; WIN_LENGTH];

/// Scan directions as `(d_row, d_col)`: horizontal, vertical (upwards),
/// diagonal up-right, diagonal up-left. Forward directions from every
/// origin cover every line on the board.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (-1, 0), (-1, 1), (-1, -1)];

/// An accepted move: who played and where the piece landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub player: Player,
    pub coord: Coord,
}

/// What a call to [`Game::advance_turn`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The game had already ended; nothing changed.
    GameOver,
    /// The column is full and the board is not; nothing changed.
    ColumnFull,
    /// A piece was placed and the turn passed to the other player.
    Placed(Move),
    /// A piece was placed and completed a line.
    Won { winner: Player, line: WinLine },
    /// A drop was tried on a full board with no line; the game is over.
    Stalemate,
}

type Listener = Box<dyn FnMut(&Move)>;

/// Rules engine: owns the game state and is the only thing that mutates it.
pub struct Game {
    state: GameState,
    win_line: Option<WinLine>,
    listeners: Vec<Listener>,
}

impl Game {
    pub fn new() -> Self {
        Game {
            state: GameState::initial(),
            win_line: None,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        self.state.board()
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.state.board().get(row, col)
    }

    /// The player to move, or `None` once the game has ended.
    pub fn turn(&self) -> Option<Player> {
        self.state.turn()
    }

    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// The winning line, if the game ended in a win.
    pub fn win_line(&self) -> Option<&WinLine> {
        self.win_line.as_ref()
    }

    /// Register a callback fired once for every accepted move, before the
    /// win check. Listeners are kept across [`Game::new_game`].
    pub fn subscribe(&mut self, listener: impl FnMut(&Move) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Drop `player`'s piece into `column` without any turn bookkeeping.
    /// Returns the landing row, or `None` if the column is full.
    ///
    /// Panics if `column >= COLS`.
    pub fn place(&mut self, column: usize, player: Player) -> Option<usize> {
        self.state.board_mut().place(column, player.to_cell())
    }

    /// Play the current player's piece into `column`.
    ///
    /// Panics if `column >= COLS`; a full column is reported, not a panic.
    #[instrument(level = "trace", skip(self))]
    pub fn advance_turn(&mut self, column: usize) -> TurnOutcome {
        let Some(player) = self.state.turn() else {
            return TurnOutcome::GameOver;
        };

        let Some(row) = self.place(column, player) else {
            if self.is_stalemate() {
                return self.finish_stalemate();
            }
            debug!(column, "column full, move ignored");
            return TurnOutcome::ColumnFull;
        };

        let mv = Move {
            player,
            coord: Coord::new(row, column),
        };
        debug!(%player, row, column, "piece placed");
        for listener in &mut self.listeners {
            listener(&mv);
        }

        if let Some(line) = find_win_line(self.state.board()) {
            let winner = Player::from_cell(self.state.board().at(line[0])).unwrap_or(player);
            info!(%winner, ?line, "game won");
            self.win_line = Some(line);
            self.state.set_turn(None);
            return TurnOutcome::Won { winner, line };
        }

        self.state.set_turn(Some(player.other()));
        TurnOutcome::Placed(mv)
    }

    /// True when every column's top cell is occupied.
    pub fn is_stalemate(&self) -> bool {
        self.state.board().is_full()
    }

    /// Throw away the current game: empty board, Yellow to move, no win line.
    pub fn new_game(&mut self) {
        self.state = GameState::initial();
        self.win_line = None;
        info!("new game");
    }

    fn finish_stalemate(&mut self) -> TurnOutcome {
        info!("stalemate");
        self.state.set_turn(None);
        TurnOutcome::Stalemate
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("win_line", &self.win_line)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// First four-in-a-row on the board, scanning origins row by row and, for
/// each origin, the directions in [`DIRECTIONS`] order.
pub fn find_win_line(board: &Board) -> Option<WinLine> {
    (0..ROWS)
        .flat_map(|row| (0..COLS).map(move |col| Coord::new(row, col)))
        .find_map(|origin| {
            DIRECTIONS
                .iter()
                .find_map(|&(d_row, d_col)| line_from(board, origin, d_row, d_col))
        })
}

fn line_from(board: &Board, origin: Coord, d_row: isize, d_col: isize) -> Option<WinLine> {
    let colour = board.at(origin);
    if colour == Cell::Empty {
        return None;
    }

    let mut line = [origin; WIN_LENGTH];
    for i in 1..WIN_LENGTH {
        let next = line[i - 1].offset(d_row, d_col)?;
        if board.at(next) != colour {
            return None;
        }
        line[i] = next;
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// A full board with no four-in-a-row. Row 0 is the top.
    const DRAWN: [&str; ROWS] = [
        "YYRRYYR", "YYRRYYR", "YYRRYYR", "RRYYRRY", "YYRRYYR", "YYRRYYR",
    ];

    fn drawn_player(row: usize, col: usize) -> Player {
        match DRAWN[row].as_bytes()[col] {
            b'Y' => Player::Yellow,
            _ => Player::Red,
        }
    }

    /// Fill the board from the `DRAWN` layout, skipping `skip` if given.
    fn fill_drawn(game: &mut Game, skip: Option<Coord>) {
        for col in 0..COLS {
            for row in (0..ROWS).rev() {
                if Some(Coord::new(row, col)) == skip {
                    continue;
                }
                assert_eq!(game.place(col, drawn_player(row, col)), Some(row));
            }
        }
    }

    fn recorder(game: &mut Game) -> Rc<RefCell<Vec<Move>>> {
        let moves = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&moves);
        game.subscribe(move |mv| sink.borrow_mut().push(*mv));
        moves
    }

    #[test]
    fn test_new_game_state() {
        let game = Game::new();
        assert_eq!(game.turn(), Some(Player::Yellow));
        assert!(game.win_line().is_none());
        assert_eq!(game.board().piece_count(), 0);
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = Game::new();

        let outcome = game.advance_turn(3);
        assert_eq!(
            outcome,
            TurnOutcome::Placed(Move {
                player: Player::Yellow,
                coord: Coord::new(5, 3),
            })
        );
        assert_eq!(game.turn(), Some(Player::Red));

        game.advance_turn(3);
        assert_eq!(game.cell(4, 3), Cell::Red);
        assert_eq!(game.turn(), Some(Player::Yellow));
    }

    #[test]
    fn test_vertical_win_by_direct_placement() {
        let mut game = Game::new();
        for _ in 0..3 {
            game.place(3, Player::Yellow);
        }

        let outcome = game.advance_turn(3);

        let expected = [
            Coord::new(5, 3),
            Coord::new(4, 3),
            Coord::new(3, 3),
            Coord::new(2, 3),
        ];
        assert_eq!(
            outcome,
            TurnOutcome::Won {
                winner: Player::Yellow,
                line: expected,
            }
        );
        assert_eq!(game.win_line(), Some(&expected));
        assert_eq!(game.turn(), None);
    }

    #[test]
    fn test_horizontal_win() {
        let mut game = Game::new();
        for col in 0..3 {
            game.advance_turn(col); // Yellow
            game.advance_turn(col); // Red, one row up
        }

        let outcome = game.advance_turn(3);

        let line = [
            Coord::new(5, 0),
            Coord::new(5, 1),
            Coord::new(5, 2),
            Coord::new(5, 3),
        ];
        assert_eq!(
            outcome,
            TurnOutcome::Won {
                winner: Player::Yellow,
                line,
            }
        );
        assert!(game.is_over());
    }

    #[test]
    fn test_diagonal_up_right_win() {
        let mut game = Game::new();
        game.place(0, Player::Yellow);
        game.place(1, Player::Red);
        game.place(1, Player::Yellow);
        game.place(2, Player::Red);
        game.place(2, Player::Red);
        game.place(2, Player::Yellow);
        for _ in 0..3 {
            game.place(3, Player::Red);
        }

        game.advance_turn(3);

        assert_eq!(
            game.win_line(),
            Some(&[
                Coord::new(5, 0),
                Coord::new(4, 1),
                Coord::new(3, 2),
                Coord::new(2, 3),
            ])
        );
        assert_eq!(game.turn(), None);
    }

    #[test]
    fn test_diagonal_up_left_win() {
        let mut game = Game::new();
        game.place(6, Player::Yellow);
        game.place(5, Player::Red);
        game.place(5, Player::Yellow);
        game.place(4, Player::Red);
        game.place(4, Player::Red);
        game.place(4, Player::Yellow);
        for _ in 0..3 {
            game.place(3, Player::Red);
        }

        game.advance_turn(3);

        assert_eq!(
            game.win_line(),
            Some(&[
                Coord::new(5, 6),
                Coord::new(4, 5),
                Coord::new(3, 4),
                Coord::new(2, 3),
            ])
        );
    }

    #[test]
    fn test_three_in_a_row_is_not_a_win() {
        let mut board = Board::new();
        for col in 0..3 {
            board.place(col, Cell::Red);
        }
        assert_eq!(find_win_line(&board), None);
    }

    #[test]
    fn test_full_column_is_a_no_op() {
        let mut game = Game::new();
        for _ in 0..ROWS {
            game.advance_turn(0);
        }
        let moves = recorder(&mut game);
        let before = *game.state();

        assert_eq!(game.advance_turn(0), TurnOutcome::ColumnFull);
        assert_eq!(*game.state(), before);
        assert_eq!(game.turn(), Some(Player::Yellow));
        assert!(moves.borrow().is_empty());
    }

    #[test]
    fn test_stalemate_on_full_column_attempt() {
        let mut game = Game::new();
        fill_drawn(&mut game, None);
        assert!(game.is_stalemate());
        assert_eq!(game.turn(), Some(Player::Yellow));

        assert_eq!(game.advance_turn(4), TurnOutcome::Stalemate);
        assert_eq!(game.turn(), None);
        assert!(game.win_line().is_none());
    }

    #[test]
    fn test_filling_move_passes_turn_until_next_attempt() {
        let mut game = Game::new();
        fill_drawn(&mut game, Some(Coord::new(0, 0)));
        assert!(!game.is_stalemate());

        assert_eq!(
            game.advance_turn(0),
            TurnOutcome::Placed(Move {
                player: Player::Yellow,
                coord: Coord::new(0, 0),
            })
        );
        assert!(game.is_stalemate());
        assert_eq!(game.turn(), Some(Player::Red));

        assert_eq!(game.advance_turn(2), TurnOutcome::Stalemate);
        assert_eq!(game.turn(), None);
        assert!(game.win_line().is_none());
    }

    /// Build a board from per-column pieces, listed bottom to top.
    fn board_from_columns(columns: [&str; COLS]) -> Board {
        let mut board = Board::new();
        for (col, pieces) in columns.iter().enumerate() {
            for piece in pieces.bytes() {
                let cell = if piece == b'Y' { Cell::Yellow } else { Cell::Red };
                board.place(col, cell);
            }
        }
        board
    }

    #[test]
    fn test_five_in_a_row_reports_leftmost_origin() {
        let board = board_from_columns(["R", "R", "R", "R", "R", "", ""]);
        assert_eq!(
            find_win_line(&board),
            Some([
                Coord::new(5, 0),
                Coord::new(5, 1),
                Coord::new(5, 2),
                Coord::new(5, 3),
            ])
        );
    }

    #[test]
    fn test_horizontal_checked_before_vertical_at_same_origin() {
        let board = board_from_columns(["RRRR", "R", "R", "R", "", "", ""]);
        assert_eq!(
            find_win_line(&board),
            Some([
                Coord::new(5, 0),
                Coord::new(5, 1),
                Coord::new(5, 2),
                Coord::new(5, 3),
            ])
        );
    }

    #[test]
    fn test_earlier_row_origin_wins_over_direction_order() {
        // Up-right from (5,0) and up-left from (4,6); row 4 is scanned first.
        let board = board_from_columns(["R", "YR", "YYR", "YYYRR", "YYYR", "YRR", "YR"]);
        assert_eq!(
            line_from(&board, Coord::new(5, 0), -1, 1),
            Some([
                Coord::new(5, 0),
                Coord::new(4, 1),
                Coord::new(3, 2),
                Coord::new(2, 3),
            ])
        );
        assert_eq!(
            find_win_line(&board),
            Some([
                Coord::new(4, 6),
                Coord::new(3, 5),
                Coord::new(2, 4),
                Coord::new(1, 3),
            ])
        );
    }

    #[test]
    fn test_moves_after_game_over_are_ignored() {
        let mut game = Game::new();
        for _ in 0..3 {
            game.place(6, Player::Yellow);
        }
        game.advance_turn(6);
        let before = *game.state();

        assert_eq!(game.advance_turn(0), TurnOutcome::GameOver);
        assert_eq!(*game.state(), before);
    }

    #[test]
    fn test_new_game_resets_everything() {
        let mut game = Game::new();
        for _ in 0..3 {
            game.place(1, Player::Yellow);
        }
        game.advance_turn(1);
        assert!(game.win_line().is_some());

        game.new_game();

        assert_eq!(game.turn(), Some(Player::Yellow));
        assert!(game.win_line().is_none());
        assert_eq!(game.board().piece_count(), 0);
    }

    #[test]
    fn test_listener_sees_each_accepted_move() {
        let mut game = Game::new();
        let moves = recorder(&mut game);

        game.advance_turn(2);
        game.advance_turn(5);
        game.new_game();
        game.advance_turn(6);

        let moves = moves.borrow();
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[1].player, Player::Red);
        assert_eq!(moves[1].coord, Coord::new(5, 5));
        assert_eq!(moves[2].player, Player::Yellow);
    }

    #[test]
    fn test_listener_fires_for_winning_move() {
        let mut game = Game::new();
        for _ in 0..3 {
            game.place(4, Player::Yellow);
        }
        let moves = recorder(&mut game);

        game.advance_turn(4);

        assert_eq!(moves.borrow().as_slice(), &[Move {
            player: Player::Yellow,
            coord: Coord::new(2, 4),
        }]);
    }

    proptest! {
        #[test]
        fn prop_columns_fill_bottom_up(columns in prop::collection::vec(0..COLS, 0..80)) {
            let mut game = Game::new();
            let mut next_row = [ROWS; COLS];
            for col in columns {
                if let TurnOutcome::Placed(mv) = game.advance_turn(col) {
                    next_row[col] -= 1;
                    prop_assert_eq!(mv.coord.row, next_row[col]);
                }
            }
            for col in 0..COLS {
                let height = game.board().column_height(col);
                prop_assert!(height <= ROWS);
                for row in 0..ROWS {
                    let occupied = game.cell(row, col) != Cell::Empty;
                    prop_assert_eq!(occupied, row >= ROWS - height);
                }
            }
        }

        #[test]
        fn prop_turn_alternates_until_terminal(columns in prop::collection::vec(0..COLS, 0..80)) {
            let mut game = Game::new();
            for col in columns {
                let before = *game.state();
                match game.advance_turn(col) {
                    TurnOutcome::Placed(mv) => {
                        prop_assert_eq!(Some(mv.player), before.turn());
                        prop_assert_eq!(game.turn(), Some(mv.player.other()));
                    }
                    TurnOutcome::ColumnFull | TurnOutcome::GameOver => {
                        prop_assert_eq!(*game.state(), before);
                    }
                    TurnOutcome::Won { winner, line } => {
                        prop_assert_eq!(Some(winner), before.turn());
                        prop_assert_eq!(game.turn(), None);
                        for coord in line {
                            prop_assert_eq!(game.board().at(coord), winner.to_cell());
                        }
                    }
                    TurnOutcome::Stalemate => {
                        prop_assert!(game.board().is_full());
                        prop_assert!(game.win_line().is_none());
                        prop_assert_eq!(game.turn(), None);
                    }
                }
            }
        }

        #[test]
        fn prop_listener_count_matches_pieces(columns in prop::collection::vec(0..COLS, 0..80)) {
            let mut game = Game::new();
            let moves = recorder(&mut game);
            for col in columns {
                game.advance_turn(col);
            }
            prop_assert_eq!(moves.borrow().len(), game.board().piece_count());
        }
    }
}
