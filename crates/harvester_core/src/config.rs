use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::{Dimensions, OutputFormat, TransformSpec};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("query expects a non-empty string")]
    EmptyQuery,
    #[error("wait unit expects a number of seconds greater than 0, got {0}")]
    InvalidWaitUnit(f64),
    #[error("output directory expects a path to an existing directory: {0}")]
    OutputDir(String),
    #[error("number of items expects an integer greater than 0")]
    InvalidTargetCount,
    #[error("resize expects a width and a height: {0}")]
    InvalidResize(String),
    #[error("unknown output format {0:?}")]
    UnknownFormat(String),
    #[error("unknown size filter {0:?}")]
    UnknownSizeFilter(String),
}

/// Size bucket the listing can be narrowed to before discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeFilter {
    Large,
    Medium,
    Icon,
}

impl SizeFilter {
    pub const ALL: [SizeFilter; 3] = [SizeFilter::Large, SizeFilter::Medium, SizeFilter::Icon];

    pub fn name(self) -> &'static str {
        match self {
            SizeFilter::Large => "large",
            SizeFilter::Medium => "medium",
            SizeFilter::Icon => "icon",
        }
    }
}

impl FromStr for SizeFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SizeFilter::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownSizeFilter(s.to_string()))
    }
}

impl fmt::Display for SizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Invocation parameters as received from the outer surface, unchecked.
#[derive(Debug, Clone, Default)]
pub struct InvocationArgs {
    pub query: String,
    pub wait_unit_secs: f64,
    pub output_dir: PathBuf,
    pub target_count: u64,
    pub output_format: Option<OutputFormat>,
    pub size_filter: Option<SizeFilter>,
    pub resize: Option<Vec<u32>>,
}

/// A validated harvest invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestRequest {
    pub query: String,
    pub wait_unit: Duration,
    pub output_dir: PathBuf,
    pub target_count: u64,
    pub size_filter: Option<SizeFilter>,
    pub transform: Option<TransformSpec>,
}

/// Checks every invocation constraint before any harvesting begins.
pub fn validate(args: InvocationArgs) -> Result<HarvestRequest, ConfigError> {
    if args.query.trim().is_empty() {
        return Err(ConfigError::EmptyQuery);
    }
    if !(args.wait_unit_secs.is_finite() && args.wait_unit_secs > 0.0) {
        return Err(ConfigError::InvalidWaitUnit(args.wait_unit_secs));
    }
    let wait_unit = Duration::try_from_secs_f64(args.wait_unit_secs)
        .map_err(|_| ConfigError::InvalidWaitUnit(args.wait_unit_secs))?;
    if !args.output_dir.is_dir() {
        return Err(ConfigError::OutputDir(args.output_dir.display().to_string()));
    }
    if args.target_count == 0 {
        return Err(ConfigError::InvalidTargetCount);
    }
    let resize = args
        .resize
        .as_deref()
        .map(Dimensions::from_pair)
        .transpose()?;

    Ok(HarvestRequest {
        query: args.query,
        wait_unit,
        output_dir: args.output_dir,
        target_count: args.target_count,
        size_filter: args.size_filter,
        transform: TransformSpec::from_parts(resize, args.output_format),
    })
}
