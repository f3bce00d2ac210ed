use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::{engine_debug, engine_warn};
use harvester_core::{ResourceDescriptor, TransformSpec};

use crate::fetch::{Fetcher, ProgressSink};
use crate::persist::AtomicFileWriter;
use crate::transform::{TransformError, Transformer};
use crate::{
    HarvestEvent, HarvestResult, ItemProgress, NamingPolicy, Ordinal, SkipReason, Stage,
};

/// Fetch, store and transform a single resolved item.
///
/// Every failure is classified into a [`SkipReason`]; nothing escapes
/// `harvest_one`, so one bad item never stops the batch.
pub struct HarvestPipeline {
    fetcher: Arc<dyn Fetcher>,
    writer: AtomicFileWriter,
    transformer: Transformer,
    naming: NamingPolicy,
    transform: Option<TransformSpec>,
}

impl HarvestPipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        output_dir: PathBuf,
        naming: NamingPolicy,
        transform: Option<TransformSpec>,
    ) -> Self {
        let writer = AtomicFileWriter::new(output_dir);
        Self {
            fetcher,
            transformer: Transformer::new(writer.clone()),
            writer,
            naming,
            transform,
        }
    }

    pub fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    pub async fn harvest_one(
        &self,
        ordinal: Ordinal,
        descriptor: Option<&ResourceDescriptor>,
        sink: &dyn ProgressSink,
    ) -> HarvestResult {
        let Some(descriptor) = descriptor else {
            return HarvestResult::Skipped(SkipReason::Unresolved);
        };
        let filename = self.naming.filename(ordinal, descriptor.extension());

        let fetched = match self
            .fetcher
            .fetch(ordinal, descriptor.base_locator(), sink)
            .await
        {
            Ok(output) => output,
            Err(err) => {
                engine_warn!("fetch of {} failed: {}", descriptor.base_locator(), err);
                return HarvestResult::Skipped(SkipReason::Fetch(err.kind));
            }
        };
        engine_debug!(
            "fetched {} bytes ({:?}) from {}",
            fetched.metadata.byte_len,
            fetched.metadata.content_type,
            fetched.metadata.final_url
        );

        emit_stage(sink, ordinal, Stage::Writing, Some(fetched.metadata.byte_len));
        let stored = match self.writer.write(&filename, &fetched.bytes) {
            Ok(path) => path,
            Err(err) => {
                engine_warn!("writing {filename} failed: {err}");
                return HarvestResult::Skipped(SkipReason::Store(err.to_string()));
            }
        };
        drop(fetched);

        let Some(spec) = self.transform.as_ref() else {
            return HarvestResult::Stored(stored);
        };

        emit_stage(sink, ordinal, Stage::Transforming, None);
        match self.transformer.apply(&stored, spec) {
            Ok(final_path) => HarvestResult::Stored(final_path),
            Err(err) => {
                engine_warn!("transform of {} failed: {}", stored.display(), err);
                // Only successfully harvested items may remain on disk.
                if let Err(discard) = self.writer.discard(&stored) {
                    engine_warn!("could not remove {}: {}", stored.display(), discard);
                }
                HarvestResult::Skipped(match err {
                    TransformError::Decode { message, .. } => SkipReason::Decode(message),
                    TransformError::Encode { message, .. } => SkipReason::Encode(message),
                    TransformError::Persist(err) => SkipReason::Store(err.to_string()),
                })
            }
        }
    }
}

pub(crate) fn emit_stage(sink: &dyn ProgressSink, ordinal: Ordinal, stage: Stage, bytes: Option<u64>) {
    sink.emit(HarvestEvent::Progress(ItemProgress {
        ordinal,
        stage,
        bytes,
    }));
}
