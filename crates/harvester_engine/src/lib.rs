//! Harvester engine: discovery driver, item pipeline and surface adapters.
mod browser;
mod engine;
mod fetch;
mod filename;
mod loader;
mod persist;
mod pipeline;
mod resolve;
mod surface;
mod transform;
mod types;

pub use browser::{
    BrowserError, BrowserOptions, BrowserSession, BrowserSurface, SurfaceSelectors,
};
pub use engine::{Harvester, HarvesterConfig};
pub use fetch::{FetchSettings, Fetcher, NullProgressSink, ProgressSink, ReqwestFetcher};
pub use filename::NamingPolicy;
pub use loader::ContentLoader;
pub use persist::{probe_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::HarvestPipeline;
pub use resolve::ItemResolver;
pub use surface::{InteractiveSurface, SurfaceError, WaitPolicy};
pub use transform::{TransformError, Transformer};
pub use types::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, HarvestEvent, HarvestReport,
    HarvestResult, ItemProgress, ItemReport, Ordinal, SkipReason, Stage,
};
