use std::time::Duration;

use harvester_core::DEFAULT_MAX_ROUNDS;
use thiserror::Error;

use crate::Ordinal;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("surface operation {operation} failed: {message}")]
    Operation {
        operation: &'static str,
        message: String,
    },
    #[error("item {0} is not present on the surface")]
    ItemAbsent(Ordinal),
}

impl SurfaceError {
    pub fn operation(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Operation {
            operation,
            message: message.into(),
        }
    }
}

/// Live, dynamically growing listing the harvester reads items from.
///
/// Implementations are driven by one operation at a time; the harvester
/// never calls two methods concurrently.
#[async_trait::async_trait]
pub trait InteractiveSurface: Send + Sync {
    /// Requests that more content be rendered (scroll to end or similar).
    async fn trigger_reveal(&self) -> Result<(), SurfaceError>;

    async fn visible_item_count(&self) -> Result<u64, SurfaceError>;

    /// Monotone size measure of the rendered content, e.g. scroll height.
    async fn content_extent(&self) -> Result<u64, SurfaceError>;

    /// Activates a "show more" affordance if one is present.
    ///
    /// Returns `Ok(false)` when the affordance is absent.
    async fn activate_show_more(&self) -> Result<bool, SurfaceError>;

    /// Selects the item at the 1-based `ordinal`.
    async fn select_item(&self, ordinal: Ordinal) -> Result<(), SurfaceError>;

    /// Locator of the currently selected item's full resource, if it has one.
    async fn resolve_selected_locator(&self) -> Result<Option<String>, SurfaceError>;
}

/// Fixed waits that give the surface time to reflect triggered actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub unit: Duration,
    /// Multiple of `unit` to wait after each reveal trigger.
    pub reveal_multiplier: u32,
    pub max_rounds: u32,
}

impl WaitPolicy {
    pub fn new(unit: Duration) -> Self {
        Self {
            unit,
            reveal_multiplier: 4,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn reveal_wait(&self) -> Duration {
        self.unit.saturating_mul(self.reveal_multiplier)
    }
}
