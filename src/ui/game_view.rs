use crate::game::{Cell, Coord, Game, Move, Player, COLS, ROWS};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const CELL_WIDTH: u16 = 3;
const BOARD_WIDTH: u16 = COLS as u16 * CELL_WIDTH + 2;
/// Preview row, top border, the grid, bottom border.
const BOARD_HEIGHT: u16 = ROWS as u16 + 3;

/// Where the board sits on screen. Shared by rendering and pointer mapping
/// so a click always lands in the column drawn under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardGeometry {
    left: u16,
    top: u16,
}

impl BoardGeometry {
    /// Centre the board inside `area`.
    pub fn centered(area: Rect) -> Self {
        BoardGeometry {
            left: area.x + area.width.saturating_sub(BOARD_WIDTH) / 2,
            top: area.y + area.height.saturating_sub(BOARD_HEIGHT) / 2,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, BOARD_WIDTH, BOARD_HEIGHT)
    }

    /// The column under terminal cell `(x, y)`, or `None` off the board.
    pub fn column_at(&self, x: u16, y: u16) -> Option<usize> {
        if y < self.top || y >= self.top + BOARD_HEIGHT {
            return None;
        }
        let inner = x.checked_sub(self.left + 1)?;
        let col = usize::from(inner / CELL_WIDTH);
        (col < COLS).then_some(col)
    }
}

pub fn render(
    frame: &mut Frame,
    game: &Game,
    selected_column: usize,
    message: &Option<String>,
    last_move: Option<Move>,
) -> BoardGeometry {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),         // Header
            Constraint::Min(BOARD_HEIGHT), // Board
            Constraint::Length(3),         // Message
            Constraint::Length(3),         // Controls
        ])
        .split(frame.area());

    render_header(frame, game, chunks[0]);
    let geometry = BoardGeometry::centered(chunks[1]);
    render_board(frame, game, selected_column, geometry, chunks[1]);
    render_message(frame, message, last_move, chunks[2]);
    render_controls(frame, chunks[3]);
    geometry
}

fn player_color(player: Player) -> Color {
    match player {
        Player::Red => Color::Red,
        Player::Yellow => Color::Yellow,
    }
}

fn render_header(frame: &mut Frame, game: &Game, area: Rect) {
    let (status, color) = match (game.turn(), game.win_line()) {
        (Some(player), _) => (format!("{player} to move"), player_color(player)),
        (None, Some(line)) => match Player::from_cell(game.board().at(line[0])) {
            Some(winner) => (format!("{winner} wins!"), player_color(winner)),
            None => ("Game over".to_string(), Color::White),
        },
        (None, None) => ("Stalemate: the board is full".to_string(), Color::White),
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(
    frame: &mut Frame,
    game: &Game,
    selected_column: usize,
    geometry: BoardGeometry,
    area: Rect,
) {
    let mut lines = Vec::with_capacity(usize::from(BOARD_HEIGHT));

    // Preview of the piece about to drop, over the selected column
    let mut preview = vec![Span::raw(" ")];
    for col in 0..COLS {
        let span = match game.turn() {
            Some(player) if col == selected_column && game.cell(0, col) == Cell::Empty => {
                Span::styled(" ● ", Style::default().fg(player_color(player)))
            }
            Some(_) if col == selected_column => {
                Span::styled(" ▼ ", Style::default().fg(Color::Cyan))
            }
            _ => Span::raw("   "),
        };
        preview.push(span);
    }
    lines.push(Line::from(preview));

    lines.push(Line::from(format!("╔{}╗", "═".repeat(COLS * 3))));

    let win_line = game.win_line();
    for row in 0..ROWS {
        let mut row_spans = vec![Span::raw("║")];
        for col in 0..COLS {
            let (symbol, color) = match game.cell(row, col) {
                Cell::Empty => (" ○ ", Color::DarkGray),
                Cell::Red => (" ● ", Color::Red),
                Cell::Yellow => (" ● ", Color::Yellow),
            };
            let mut style = Style::default().fg(color);
            if win_line.is_some_and(|line| line.contains(&Coord::new(row, col))) {
                style = style.bg(Color::Green).add_modifier(Modifier::BOLD);
            }
            row_spans.push(Span::styled(symbol, style));
        }
        row_spans.push(Span::raw("║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("╚{}╝", "═".repeat(COLS * 3))));

    let board_widget = Paragraph::new(lines);
    frame.render_widget(board_widget, geometry.rect().intersection(area));
}

fn render_message(
    frame: &mut Frame,
    message: &Option<String>,
    last_move: Option<Move>,
    area: Rect,
) {
    let text = match (message, last_move) {
        (Some(message), _) => message.clone(),
        (None, Some(mv)) => format!("Last move: {} in column {}", mv.player, mv.coord.col + 1),
        (None, None) => String::new(),
    };
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let controls = Paragraph::new("←/→: Move  |  Enter/Click/1-7: Drop  |  R: Restart  |  Q: Quit")
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}
