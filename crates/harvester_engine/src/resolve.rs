use std::time::Duration;

use engine_logging::engine_debug;
use harvester_core::{classify, ExtensionSet, FilterOutcome, ResourceDescriptor};

use crate::{InteractiveSurface, Ordinal};

/// Turns an ordinal on the surface into a harvestable resource.
#[derive(Debug, Clone)]
pub struct ItemResolver {
    extensions: ExtensionSet,
    settle: Duration,
}

impl ItemResolver {
    /// `settle` is how long to wait between selecting an item and reading its locator.
    pub fn new(extensions: ExtensionSet, settle: Duration) -> Self {
        Self { extensions, settle }
    }

    /// `None` when the item cannot be selected, has no locator, or its
    /// locator is not a single recognized resource. Absence near the end of
    /// the discovered range is expected and not an error.
    pub async fn resolve(
        &self,
        surface: &dyn InteractiveSurface,
        ordinal: Ordinal,
    ) -> Option<ResourceDescriptor> {
        if let Err(err) = surface.select_item(ordinal).await {
            engine_debug!("select failed: {err}");
            return None;
        }
        tokio::time::sleep(self.settle).await;

        let locator = match surface.resolve_selected_locator().await {
            Ok(Some(locator)) => locator,
            Ok(None) => {
                engine_debug!("selected item has no locator");
                return None;
            }
            Err(err) => {
                engine_debug!("locator lookup failed: {err}");
                return None;
            }
        };

        match classify(&locator, &self.extensions) {
            FilterOutcome::Accepted(descriptor) => Some(descriptor),
            FilterOutcome::NoMatch => {
                engine_debug!("no recognized extension in {}", abbreviate(&locator));
                None
            }
            FilterOutcome::Ambiguous(exts) => {
                engine_debug!("ambiguous extensions {exts:?} in {}", abbreviate(&locator));
                None
            }
        }
    }
}

/// Inline data locators can be megabytes long; keep log lines readable.
fn abbreviate(locator: &str) -> &str {
    const MAX: usize = 120;
    if locator.len() <= MAX {
        return locator;
    }
    let mut end = MAX;
    while !locator.is_char_boundary(end) {
        end -= 1;
    }
    &locator[..end]
}
