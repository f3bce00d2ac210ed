//! Harvester core: pure decision logic for discovery and resource filtering.
mod config;
mod descriptor;
mod discovery;
mod transform;

pub use config::{validate, ConfigError, HarvestRequest, InvocationArgs, SizeFilter};
pub use descriptor::{
    classify, filter, ExtensionSet, FilterOutcome, ResourceDescriptor, RECOGNIZED_EXTENSIONS,
};
pub use discovery::{DiscoveryOutcome, DiscoveryState, DiscoveryStep, DEFAULT_MAX_ROUNDS};
pub use transform::{Dimensions, OutputFormat, TransformSpec};
