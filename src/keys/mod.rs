//! Key identity and pressed-key state
//!
//! [`normalize`] turns raw hook key events into stable lowercase
//! [`KeyToken`]s; [`KeyStateTracker`] maintains the set of currently-held
//! tokens behind one lock; [`combo_matches`] tests a combo against a
//! snapshot of that set.

mod token;
mod tracker;

pub use token::{normalize, KeyToken};
pub use tracker::{combo_matches, KeyStateTracker};
