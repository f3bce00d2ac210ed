mod support;

use std::fs;
use std::sync::Arc;

use harvester_core::{filter, Dimensions, ExtensionSet, OutputFormat, TransformSpec};
use harvester_engine::{
    FailureKind, HarvestEvent, HarvestPipeline, HarvestResult, NamingPolicy, SkipReason, Stage,
};
use image::ImageFormat;
use pretty_assertions::assert_eq;
use support::{encoded_image, RecordingSink, TableFetcher};
use tempfile::TempDir;

fn pipeline(
    dir: &TempDir,
    fetcher: TableFetcher,
    transform: Option<TransformSpec>,
) -> HarvestPipeline {
    HarvestPipeline::new(
        Arc::new(fetcher),
        dir.path().to_path_buf(),
        NamingPolicy::for_query("red panda"),
        transform,
    )
}

fn descriptor(locator: &str) -> harvester_core::ResourceDescriptor {
    filter(locator, &ExtensionSet::default()).expect("recognized locator")
}

#[tokio::test]
async fn unresolved_item_is_skipped_without_fetching() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir, TableFetcher::default(), None);

    let result = pipeline.harvest_one(1, None, &RecordingSink::default()).await;

    assert_eq!(result, HarvestResult::Skipped(SkipReason::Unresolved));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn fetched_bytes_are_stored_under_query_and_ordinal() {
    let dir = TempDir::new().unwrap();
    let bytes = encoded_image(4, 4, ImageFormat::Png);
    let fetcher = TableFetcher::default().serve("https://cdn/a.png", bytes.clone());
    let pipeline = pipeline(&dir, fetcher, None);
    let sink = RecordingSink::default();

    let result = pipeline
        .harvest_one(3, Some(&descriptor("https://cdn/a.png?size=l")), &sink)
        .await;

    let expected = dir.path().join("red_panda_3.png");
    assert_eq!(result, HarvestResult::Stored(expected.clone()));
    assert_eq!(fs::read(expected).unwrap(), bytes);
    assert!(sink.take().iter().any(|event| matches!(
        event,
        HarvestEvent::Progress(progress) if progress.stage == Stage::Writing
    )));
}

#[tokio::test]
async fn fetch_failure_is_classified_and_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let fetcher = TableFetcher::default().fail("https://cdn/b.jpg", FailureKind::Timeout);
    let pipeline = pipeline(&dir, fetcher, None);

    let result = pipeline
        .harvest_one(2, Some(&descriptor("https://cdn/b.jpg")), &RecordingSink::default())
        .await;

    assert_eq!(result, HarvestResult::Skipped(SkipReason::Fetch(FailureKind::Timeout)));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn undecodable_download_is_skipped_and_removed() {
    let dir = TempDir::new().unwrap();
    let fetcher = TableFetcher::default().serve("https://cdn/c.png", b"garbage".to_vec());
    let transform = TransformSpec {
        resize: Some(Dimensions {
            width: 2,
            height: 2,
        }),
        output_format: None,
    };
    let pipeline = pipeline(&dir, fetcher, Some(transform));

    let result = pipeline
        .harvest_one(1, Some(&descriptor("https://cdn/c.png")), &RecordingSink::default())
        .await;

    assert!(matches!(result, HarvestResult::Skipped(SkipReason::Decode(_))));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn converted_item_is_stored_under_new_extension() {
    let dir = TempDir::new().unwrap();
    let fetcher = TableFetcher::default()
        .serve("https://cdn/d.png", encoded_image(6, 6, ImageFormat::Png));
    let transform = TransformSpec {
        resize: None,
        output_format: Some(OutputFormat::Jpeg),
    };
    let pipeline = pipeline(&dir, fetcher, Some(transform));

    let result = pipeline
        .harvest_one(5, Some(&descriptor("https://cdn/d.png")), &RecordingSink::default())
        .await;

    assert_eq!(result, HarvestResult::Stored(dir.path().join("red_panda_5.jpeg")));
    assert!(!dir.path().join("red_panda_5.png").exists());
}

#[test]
fn distinct_ordinals_never_share_a_filename() {
    let naming = NamingPolicy::for_query("same query");
    let names: std::collections::HashSet<_> =
        (1..=50).map(|ordinal| naming.filename(ordinal, ".jpg")).collect();
    assert_eq!(names.len(), 50);
    assert_eq!(naming.filename(7, ".jpg"), NamingPolicy::for_query("same query").filename(7, ".jpg"));
}
