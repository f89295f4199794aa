//! Terminal UI: lobby roster editing, the scoreboard, a round entry
//! overlay, and the score-sheet history, driven by a single-threaded
//! event loop.

mod app;
mod entry_view;
mod history_view;
mod lobby_view;
mod score_view;

pub use app::App;
