//! Timed presentation sequences driven by an injected clock.
//!
//! Nothing here spawns threads. The host calls `advance(now)` whenever it
//! wants the sequences brought up to date, the same way a wall-clock timer
//! engine is ticked by its caller.
//!
//! ```text
//! draw animation:  Idle -> Running(ticks remaining) -> Settling -> Idle
//! splash:          Hidden -> Showing(until) -> Hidden
//! ```

use serde::Serialize;
use std::time::Instant;

/// Milliseconds on a monotonic timeline with an arbitrary origin.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-advanced clock. Clones share the same timeline.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: std::rc::Rc<std::cell::Cell<u64>>,
}

#[cfg(test)]
impl VirtualClock {
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

#[cfg(test)]
impl Clock for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// A value that disappears on its own after a fixed delay. Setting a new
/// value replaces the old one and restarts the delay.
#[derive(Debug, Clone)]
pub struct Expiring<T> {
    duration_ms: u64,
    current: Option<(T, u64)>,
}

impl<T> Expiring<T> {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            current: None,
        }
    }

    pub fn set(&mut self, value: T, now: u64) {
        self.current = Some((value, now.saturating_add(self.duration_ms)));
    }

    /// Drops the value once its deadline has passed. Returns true if it did.
    pub fn advance(&mut self, now: u64) -> bool {
        match &self.current {
            Some((_, until)) if now >= *until => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.current.as_ref().map(|(v, _)| v)
    }

    pub fn expires_at(&self) -> Option<u64> {
        self.current.as_ref().map(|(_, until)| *until)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum DrawPhase {
    Idle,
    #[serde(rename_all = "camelCase")]
    Running {
        ticks_remaining: u32,
        next_tick_at: u64,
    },
    #[serde(rename_all = "camelCase")]
    Settling { commit_at: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStep {
    /// Cosmetic re-sample; no state changes.
    Rolled,
    /// Time to commit the real draw.
    Commit,
}

#[derive(Debug, Clone)]
pub struct DrawAnimation {
    tick_ms: u64,
    ticks: u32,
    settle_ms: u64,
    phase: DrawPhase,
}

impl DrawAnimation {
    pub fn new(tick_ms: u64, ticks: u32, settle_ms: u64) -> Self {
        Self {
            tick_ms,
            ticks: ticks.max(1),
            settle_ms,
            phase: DrawPhase::Idle,
        }
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != DrawPhase::Idle
    }

    /// Returns false if a sequence is already in flight.
    pub fn start(&mut self, now: u64) -> bool {
        if self.is_active() {
            return false;
        }
        self.phase = DrawPhase::Running {
            ticks_remaining: self.ticks,
            next_tick_at: now.saturating_add(self.tick_ms),
        };
        true
    }

    pub fn cancel(&mut self) {
        self.phase = DrawPhase::Idle;
    }

    /// Every step due at or before `now`, in order.
    pub fn advance(&mut self, now: u64) -> Vec<DrawStep> {
        let mut steps = Vec::new();
        loop {
            match self.phase {
                DrawPhase::Idle => break,
                DrawPhase::Running {
                    ticks_remaining,
                    next_tick_at,
                } => {
                    if now < next_tick_at {
                        break;
                    }
                    steps.push(DrawStep::Rolled);
                    self.phase = if ticks_remaining <= 1 {
                        DrawPhase::Settling {
                            commit_at: next_tick_at.saturating_add(self.settle_ms),
                        }
                    } else {
                        DrawPhase::Running {
                            ticks_remaining: ticks_remaining - 1,
                            next_tick_at: next_tick_at.saturating_add(self.tick_ms),
                        }
                    };
                }
                DrawPhase::Settling { commit_at } => {
                    if now < commit_at {
                        break;
                    }
                    steps.push(DrawStep::Commit);
                    self.phase = DrawPhase::Idle;
                }
            }
        }
        steps
    }
}
