use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::{clear_item_context, engine_info, set_item_context};
use harvester_core::{ExtensionSet, HarvestRequest, TransformSpec};

use crate::fetch::{Fetcher, ProgressSink};
use crate::loader::ContentLoader;
use crate::pipeline::{emit_stage, HarvestPipeline};
use crate::resolve::ItemResolver;
use crate::{
    HarvestEvent, HarvestReport, HarvestResult, InteractiveSurface, ItemReport, NamingPolicy,
    Ordinal, Stage, SurfaceError, WaitPolicy,
};

#[derive(Debug, Clone)]
pub struct HarvesterConfig {
    pub query: String,
    pub output_dir: PathBuf,
    pub target_count: u64,
    pub wait: WaitPolicy,
    pub extensions: ExtensionSet,
    pub transform: Option<TransformSpec>,
}

impl HarvesterConfig {
    pub fn from_request(request: &HarvestRequest) -> Self {
        Self {
            query: request.query.clone(),
            output_dir: request.output_dir.clone(),
            target_count: request.target_count,
            wait: WaitPolicy::new(request.wait_unit),
            extensions: ExtensionSet::default(),
            transform: request.transform,
        }
    }
}

/// Drives one harvest pass: discovery once, then every ordinal in order.
///
/// Item log lines are tagged through a thread-local context, so the run is
/// meant for a current-thread runtime.
pub struct Harvester {
    target_count: u64,
    loader: ContentLoader,
    resolver: ItemResolver,
    pipeline: HarvestPipeline,
}

impl Harvester {
    pub fn new(config: HarvesterConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            target_count: config.target_count,
            loader: ContentLoader::new(config.wait),
            resolver: ItemResolver::new(config.extensions, config.wait.unit),
            pipeline: HarvestPipeline::new(
                fetcher,
                config.output_dir,
                NamingPolicy::for_query(&config.query),
                config.transform,
            ),
        }
    }

    /// Only a surface failure during discovery is returned as an error;
    /// per-item failures end up as skipped entries in the report.
    pub async fn run(
        &self,
        surface: &dyn InteractiveSurface,
        sink: &dyn ProgressSink,
    ) -> Result<HarvestReport, SurfaceError> {
        let discovery = self.loader.discover(surface, self.target_count).await?;
        let planned = discovery.count().min(self.target_count);
        sink.emit(HarvestEvent::DiscoveryFinished {
            outcome: discovery,
            planned,
        });
        engine_info!(
            "harvesting {} of {} requested item(s) as {}_N",
            planned,
            self.target_count,
            self.pipeline.naming().stem()
        );

        let last = Ordinal::try_from(planned).unwrap_or(Ordinal::MAX);
        let mut items = Vec::new();
        for ordinal in 1..=last {
            set_item_context(ordinal);
            emit_stage(sink, ordinal, Stage::Resolving, None);
            let descriptor = self.resolver.resolve(surface, ordinal).await;
            let result = self
                .pipeline
                .harvest_one(ordinal, descriptor.as_ref(), sink)
                .await;
            match &result {
                HarvestResult::Stored(path) => engine_info!("stored {}", path.display()),
                HarvestResult::Skipped(reason) => engine_info!("skipped: {reason}"),
            }
            sink.emit(HarvestEvent::ItemCompleted {
                ordinal,
                result: result.clone(),
            });
            items.push(ItemReport { ordinal, result });
        }
        clear_item_context();

        let report = HarvestReport { discovery, items };
        engine_info!(
            "harvest finished: {} stored, {} skipped",
            report.stored_count(),
            report.skipped_count()
        );
        Ok(report)
    }
}
