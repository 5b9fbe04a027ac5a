//! `tl-schedule`: the spawn timetable and its CSV loader.
//!
//! # Crate layout
//!
//! | Module        | Contents                                          |
//! |---------------|---------------------------------------------------|
//! | [`entry`]     | `SpawnEntry`: one manifest line                  |
//! | [`timetable`] | `Timetable`: fires each entry exactly once       |
//! | [`loader`]    | `load_timetable_csv`, `load_timetable_reader`     |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`              |
//!
//! # Firing model (summary)
//!
//! ```text
//! due(now) = { e ∈ entries | e.id ∉ fired ∧ now ≥ e.trigger_secs }
//! fired   ← fired ∪ ids(due(now))
//! ```
//!
//! The timetable does not validate routes: an entry whose route is invalid
//! is still reported as due, and the simulation decides whether to dispatch.

pub mod entry;
pub mod error;
pub mod loader;
pub mod timetable;


pub use entry::SpawnEntry;
pub use error::{ScheduleError, ScheduleResult};
pub use loader::{load_timetable_csv, load_timetable_reader};
pub use timetable::Timetable;
