use chrono::{DateTime, Local, TimeDelta};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    clock::{Clock, SystemClock},
    models::{format_brief, SessionRecord},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
        }
    }
}

/// A transition was requested in a phase that does not permit it. The timer
/// is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} while the timer is {}", .phase.as_str())]
pub struct TransitionError {
    pub action: &'static str,
    pub phase: Phase,
}

/// Live work/pause split for the display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub work: TimeDelta,
    pub pause: TimeDelta,
}

impl Elapsed {
    fn zero() -> Self {
        Self {
            work: TimeDelta::zero(),
            pause: TimeDelta::zero(),
        }
    }

    pub fn work_display(&self) -> String {
        format_brief(self.work)
    }

    pub fn pause_display(&self) -> String {
        format_brief(self.pause)
    }
}

/// Output of [`SessionTimer::stop`]: the session endpoints, held until the
/// caller has collected the optional comment.
#[derive(Debug, Clone)]
pub struct FinishedSession {
    pub started_at: DateTime<Local>,
    pub ended_at: DateTime<Local>,
    pub pause_duration: TimeDelta,
}

impl FinishedSession {
    pub fn work_duration(&self) -> TimeDelta {
        ((self.ended_at - self.started_at) - self.pause_duration).max(TimeDelta::zero())
    }

    /// Builds the immutable workbook row. A session that runs past midnight
    /// is dated by when it ended; an absent comment is stored as the empty
    /// string.
    pub fn into_record(self, comment: Option<String>) -> SessionRecord {
        let work_duration = self.work_duration();
        SessionRecord {
            start_time: self.started_at.time(),
            end_time: self.ended_at.time(),
            date: self.ended_at.date_naive(),
            pause_duration: self.pause_duration,
            work_duration,
            comment: comment.unwrap_or_default(),
        }
    }
}

/// State machine for one work session: `Idle -> Running <-> Paused -> Idle`.
///
/// Holds at most one session and cycles back to `Idle` on stop. Every
/// transition samples the injected clock once; `elapsed` is a pure query.
/// Callers in a multi-threaded host must serialize transitions themselves.
#[derive(Debug)]
pub struct SessionTimer<C: Clock = SystemClock> {
    clock: C,
    phase: Phase,
    started_at: Option<DateTime<Local>>,
    paused_at: Option<DateTime<Local>>,
    accumulated_pause: TimeDelta,
}

impl SessionTimer<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for SessionTimer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SessionTimer<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            phase: Phase::Idle,
            started_at: None,
            paused_at: None,
            accumulated_pause: TimeDelta::zero(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Begins a new session. Only valid while `Idle`.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.guard("start", Phase::Idle)?;
        self.started_at = Some(self.clock.now());
        self.paused_at = None;
        self.accumulated_pause = TimeDelta::zero();
        self.phase = Phase::Running;
        Ok(())
    }

    /// Opens a pause interval. Only valid while `Running`.
    pub fn pause(&mut self) -> Result<(), TransitionError> {
        self.guard("pause", Phase::Running)?;
        self.paused_at = Some(self.clock.now());
        self.phase = Phase::Paused;
        Ok(())
    }

    /// Closes the open pause interval and returns to `Running`.
    pub fn resume(&mut self) -> Result<(), TransitionError> {
        self.guard("resume", Phase::Paused)?;
        let now = self.clock.now();
        self.fold_open_pause(now);
        self.phase = Phase::Running;
        Ok(())
    }

    /// Ends the session, folding in a still-open pause, and resets the timer
    /// to `Idle`. Valid while `Running` or `Paused`.
    pub fn stop(&mut self) -> Result<FinishedSession, TransitionError> {
        if self.phase == Phase::Idle {
            return Err(TransitionError {
                action: "stop",
                phase: self.phase,
            });
        }

        let ended_at = self.clock.now();
        self.fold_open_pause(ended_at);
        let started_at = self.started_at.take().unwrap_or(ended_at);
        let session = FinishedSession {
            started_at,
            ended_at,
            pause_duration: self.accumulated_pause,
        };

        self.phase = Phase::Idle;
        self.paused_at = None;
        self.accumulated_pause = TimeDelta::zero();

        Ok(session)
    }

    /// Current work/pause split. While `Paused` the work figure is frozen at
    /// the pause boundary and the pause figure keeps growing.
    pub fn elapsed(&self) -> Elapsed {
        let started_at = match (self.phase, self.started_at) {
            (Phase::Idle, _) | (_, None) => return Elapsed::zero(),
            (_, Some(started_at)) => started_at,
        };

        let now = self.clock.now();
        match self.phase {
            Phase::Idle => Elapsed::zero(),
            Phase::Running => Elapsed {
                work: (now - started_at - self.accumulated_pause).max(TimeDelta::zero()),
                pause: self.accumulated_pause,
            },
            Phase::Paused => {
                let paused_at = self.paused_at.unwrap_or(now);
                Elapsed {
                    work: (paused_at - started_at - self.accumulated_pause).max(TimeDelta::zero()),
                    pause: self.accumulated_pause + (now - paused_at),
                }
            }
        }
    }

    fn guard(&self, action: &'static str, expected: Phase) -> Result<(), TransitionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(TransitionError {
                action,
                phase: self.phase,
            })
        }
    }

    fn fold_open_pause(&mut self, now: DateTime<Local>) {
        if let Some(paused_at) = self.paused_at.take() {
            self.accumulated_pause += (now - paused_at).max(TimeDelta::zero());
        }
    }
}
