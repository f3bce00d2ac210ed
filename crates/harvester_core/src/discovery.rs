//! Convergence state machine behind the content loader.
//!
//! The loader in the engine owns the waiting and the surface calls; this
//! module only decides, from the readings it is fed, whether another reveal
//! round is needed.

/// Reveal rounds allowed before discovery gives up on a surface that keeps
/// growing without adding items.
pub const DEFAULT_MAX_ROUNDS: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// At least `target` items are visible.
    Reached(u64),
    /// Content extent stopped growing before the target was met.
    Exhausted(u64),
    /// The round budget ran out before either of the above.
    RoundLimit(u64),
}

impl DiscoveryOutcome {
    pub fn count(self) -> u64 {
        match self {
            DiscoveryOutcome::Reached(n)
            | DiscoveryOutcome::Exhausted(n)
            | DiscoveryOutcome::RoundLimit(n) => n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStep {
    Reveal,
    Done(DiscoveryOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryState {
    visible_count: u64,
    content_extent: u64,
    target: u64,
    rounds: u32,
    max_rounds: u32,
}

impl DiscoveryState {
    pub fn new(visible_count: u64, content_extent: u64, target: u64) -> Self {
        Self::with_max_rounds(visible_count, content_extent, target, DEFAULT_MAX_ROUNDS)
    }

    pub fn with_max_rounds(
        visible_count: u64,
        content_extent: u64,
        target: u64,
        max_rounds: u32,
    ) -> Self {
        Self {
            visible_count,
            content_extent,
            target,
            rounds: 0,
            max_rounds,
        }
    }

    pub fn visible_count(&self) -> u64 {
        self.visible_count
    }

    pub fn content_extent(&self) -> u64 {
        self.content_extent
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// What to do next given the readings so far.
    pub fn step(&self) -> DiscoveryStep {
        if self.visible_count >= self.target {
            DiscoveryStep::Done(DiscoveryOutcome::Reached(self.visible_count))
        } else if self.rounds >= self.max_rounds {
            DiscoveryStep::Done(DiscoveryOutcome::RoundLimit(self.visible_count))
        } else {
            DiscoveryStep::Reveal
        }
    }

    /// Records the extent measured after a reveal round.
    ///
    /// An unchanged extent means nothing more can appear; the current count
    /// is final and `Exhausted` is returned.
    pub fn record_extent(&mut self, extent: u64) -> Option<DiscoveryOutcome> {
        self.rounds = self.rounds.saturating_add(1);
        if extent == self.content_extent {
            return Some(DiscoveryOutcome::Exhausted(self.visible_count));
        }
        self.content_extent = extent;
        None
    }

    /// Records the visible item count re-read after the extent grew.
    pub fn record_visible(&mut self, count: u64) {
        self.visible_count = count;
    }
}
