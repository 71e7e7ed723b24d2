//! SQLite persistence sink for parsed hands.
//!
//! Insert-if-absent keyed on `hand_id` for imports, always-overwrite for the
//! live-save path, plus the single rakeback setting.

pub mod schema;
pub mod store;

pub use store::{HandStore, RAKEBACK_KEY};
