pub mod state;

pub use state::{Elapsed, FinishedSession, Phase, SessionTimer, TransitionError};
