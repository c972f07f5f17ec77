pub const ROWS: usize = 6;
pub const COLS: usize = 7;
/// Number of same-coloured cells in a line needed to win.
pub const WIN_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Red,
    Yellow,
}

/// A (row, column) position. Row 0 is the top, column 0 is the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }

    pub fn is_on_board(self) -> bool {
        self.row < ROWS && self.col < COLS
    }

    /// Step by `(d_row, d_col)`, or `None` if that leaves the board.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Coord> {
        let next = Coord {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        };
        next.is_on_board().then_some(next)
    }
}

/// Fixed 6x7 grid. A cell goes from `Empty` to a colour once and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn at(&self, coord: Coord) -> Cell {
        self.get(coord.row, coord.col)
    }

    /// Check if a column is full. Panics if `col` is off the board.
    pub fn is_column_full(&self, col: usize) -> bool {
        self.cells[0][col] != Cell::Empty
    }

    /// Number of pieces stacked in a column.
    pub fn column_height(&self, col: usize) -> usize {
        (0..ROWS)
            .filter(|&row| self.cells[row][col] != Cell::Empty)
            .count()
    }

    pub fn piece_count(&self) -> usize {
        (0..COLS).map(|col| self.column_height(col)).sum()
    }

    /// Drop a piece into `col` and return the row where it landed, or
    /// `None` if the column is already full.
    ///
    /// Panics if `col >= COLS`; callers clamp input before getting here.
    pub fn place(&mut self, col: usize, cell: Cell) -> Option<usize> {
        assert!(col < COLS, "column {col} out of range 0..{COLS}");
        debug_assert_ne!(cell, Cell::Empty, "cannot place an empty cell");

        if self.is_column_full(col) {
            return None;
        }

        // Columns fill contiguously from the bottom, so the piece lands just
        // above the first occupied cell found scanning down from the top.
        let row = (0..ROWS)
            .find(|&row| self.cells[row][col] != Cell::Empty)
            .map_or(ROWS - 1, |occupied| occupied - 1);
        self.cells[row][col] = cell;
        Some(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
