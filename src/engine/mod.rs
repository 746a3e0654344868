//! Engine controller for managing search and game state.
//!
//! This is the `getBestMove`/callback contract of spec §6: a text-protocol
//! front-end (UCI, `XBoard`, or anything else) is expected to link against
//! this module and drive it, but parsing and emitting that protocol's wire
//! format is out of scope for the core and is not implemented here.

mod controller;
pub mod time;

pub use controller::{EngineController, SearchJob, SearchParams};
pub use time::{build_search_request, compute_time_limits, TimeConfig, TimeControl};
