//! Terminal UI: renders the board, maps keys and pointer positions to
//! columns, and restarts the game on the first drop after it ends.

mod app;
mod game_view;

pub use app::App;
pub use game_view::BoardGeometry;
