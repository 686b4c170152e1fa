//! Interactive recordings manager.
//!
//! Combines the recordings list and the playback controller behind a single
//! terminal screen.

pub mod state;
pub mod ui;

pub use state::ManagerState;
pub use ui::ManagerScreen;
