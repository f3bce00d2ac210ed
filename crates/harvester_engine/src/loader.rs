use engine_logging::{engine_debug, engine_info};
use harvester_core::{DiscoveryOutcome, DiscoveryState, DiscoveryStep};

use crate::{InteractiveSurface, SurfaceError, WaitPolicy};

/// Grows the surface until `target` items are visible or it stops growing.
#[derive(Debug, Clone, Copy)]
pub struct ContentLoader {
    wait: WaitPolicy,
}

impl ContentLoader {
    pub fn new(wait: WaitPolicy) -> Self {
        Self { wait }
    }

    /// Returns the final discovered count.
    pub async fn load_until(
        &self,
        surface: &dyn InteractiveSurface,
        target: u64,
    ) -> Result<u64, SurfaceError> {
        self.discover(surface, target).await.map(DiscoveryOutcome::count)
    }

    /// Like [`ContentLoader::load_until`], but reports how discovery ended.
    pub async fn discover(
        &self,
        surface: &dyn InteractiveSurface,
        target: u64,
    ) -> Result<DiscoveryOutcome, SurfaceError> {
        let extent = surface.content_extent().await?;
        let visible = surface.visible_item_count().await?;
        let mut state = DiscoveryState::with_max_rounds(visible, extent, target, self.wait.max_rounds);
        engine_debug!("discovery start: visible={visible} extent={extent} target={target}");

        let outcome = loop {
            match state.step() {
                DiscoveryStep::Done(outcome) => break outcome,
                DiscoveryStep::Reveal => {}
            }

            surface.trigger_reveal().await?;
            tokio::time::sleep(self.wait.reveal_wait()).await;
            let extent = surface.content_extent().await?;

            match surface.activate_show_more().await {
                Ok(true) => tokio::time::sleep(self.wait.unit).await,
                Ok(false) => {}
                Err(err) => engine_debug!("show-more probe failed: {err}"),
            }

            if let Some(outcome) = state.record_extent(extent) {
                break outcome;
            }
            state.record_visible(surface.visible_item_count().await?);
            engine_debug!(
                "round {}: visible={} extent={}",
                state.rounds(),
                state.visible_count(),
                state.content_extent()
            );
        };

        engine_info!("discovery finished after {} round(s): {:?}", state.rounds(), outcome);
        Ok(outcome)
    }
}
