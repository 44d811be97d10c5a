//! Core of a personal work-session timer.
//!
//! [`SessionTimer`] tracks one start-to-stop session, subtracting pauses from
//! the active time. Stopping yields a [`FinishedSession`]; once the caller has
//! collected the optional comment it becomes an immutable [`SessionRecord`],
//! which [`SessionStore`] appends into a monthly-sectioned workbook file.
//!
//! The window, tray icon and comment dialog live outside this crate; they
//! drive the timer through its transitions and poll [`SessionTimer::elapsed`]
//! once a second for display.

mod clock;
mod models;
mod store;
mod timer;

pub use clock::{Clock, SystemClock};
pub use models::{format_brief, format_hms, parse_hms, SessionRecord};
pub use store::{SessionStore, StoreError, DEFAULT_WORKBOOK};
pub use timer::{Elapsed, FinishedSession, Phase, SessionTimer, TransitionError};
