//! Glyph decay.
//!
//! When enabled, a glyph that gets replaced does not vanish at once: the old
//! tile is kept as a ghost and drawn over the cell with a shrinking opacity.
//! The fade runs on animation frames driven by the host. The buffer hands
//! out one [`FrameHandle`] at a time; any explicit render cancels it and
//! schedules a fresh one, so a stale handle does nothing.

use std::time::{Duration, Instant};

use tessera_core::Tile;

/// Identifies the single scheduled decay frame of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// A replaced tile that is still fading out.
#[derive(Debug, Clone)]
pub(crate) struct Ghost {
    pub(crate) tile: Tile,
    since: Instant,
}

impl Ghost {
    pub(crate) fn new(tile: Tile, since: Instant) -> Self {
        Self { tile, since }
    }

    /// Opacity at `now`, linear from 1 down to 0 over `duration`.
    pub(crate) fn opacity(&self, now: Instant, duration: Duration) -> f32 {
        let elapsed = now.saturating_duration_since(self.since);
        (1.0 - elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Decay bookkeeping owned by a buffer.
#[derive(Debug)]
pub(crate) struct Decay {
    pub(crate) duration: Duration,
    pub(crate) pending: Option<FrameHandle>,
    next_id: u64,
    /// Positions of the cells holding a ghost.
    pub(crate) ghosts: Vec<(i32, i32)>,
}

impl Decay {
    pub(crate) fn new(duration: Duration) -> Self {
        Self {
            duration,
            pending: None,
            next_id: 0,
            ghosts: Vec::new(),
        }
    }

    pub(crate) fn schedule(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }
}
