mod support;

use std::time::Duration;

use harvester_core::ExtensionSet;
use harvester_engine::ItemResolver;
use pretty_assertions::assert_eq;
use support::ScriptedSurface;

fn resolver() -> ItemResolver {
    ItemResolver::new(ExtensionSet::new([".jpg", ".png"]), Duration::from_millis(10))
}

#[tokio::test(start_paused = true)]
async fn selected_item_locator_is_filtered_into_descriptor() {
    let surface = ScriptedSurface::new(vec![(3, 100)])
        .with_locator(2, Some("https://x/img123.png?x=1"));

    let descriptor = resolver().resolve(&surface, 2).await.expect("resolved");

    assert_eq!(descriptor.base_locator(), "https://x/img123.png");
    assert_eq!(descriptor.extension(), ".png");
    assert_eq!(surface.selections(), vec![2]);
}

#[tokio::test(start_paused = true)]
async fn absent_item_resolves_to_none() {
    let surface = ScriptedSurface::new(vec![(3, 100)]);
    assert_eq!(resolver().resolve(&surface, 4).await, None);
}

#[tokio::test(start_paused = true)]
async fn item_without_locator_resolves_to_none() {
    let surface = ScriptedSurface::new(vec![(3, 100)]).with_locator(1, None);
    assert_eq!(resolver().resolve(&surface, 1).await, None);
}

#[tokio::test(start_paused = true)]
async fn ambiguous_or_unknown_locators_resolve_to_none() {
    let surface = ScriptedSurface::new(vec![(3, 100)])
        .with_locator(1, Some("https://x/pngfile.jpg"))
        .with_locator(2, Some("https://x/clip.gif"));

    assert_eq!(resolver().resolve(&surface, 1).await, None);
    assert_eq!(resolver().resolve(&surface, 2).await, None);
}
