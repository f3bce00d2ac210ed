use std::fmt;
use std::path::PathBuf;

use harvester_core::DiscoveryOutcome;

/// 1-based position of an item in the discovered listing.
pub type Ordinal = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Downloading,
    Transforming,
    Writing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemProgress {
    pub ordinal: Ordinal,
    pub stage: Stage,
    pub bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestEvent {
    DiscoveryFinished {
        outcome: DiscoveryOutcome,
        /// Number of ordinals that will be attempted.
        planned: u64,
    },
    Progress(ItemProgress),
    ItemCompleted {
        ordinal: Ordinal,
        result: HarvestResult,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Why an ordinal produced no stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No locator, or a locator with zero or several recognized extensions.
    Unresolved,
    Fetch(FailureKind),
    Store(String),
    Decode(String),
    Encode(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unresolved => write!(f, "unresolved"),
            SkipReason::Fetch(kind) => write!(f, "fetch failed: {kind}"),
            SkipReason::Store(msg) => write!(f, "store failed: {msg}"),
            SkipReason::Decode(msg) => write!(f, "decode failed: {msg}"),
            SkipReason::Encode(msg) => write!(f, "encode failed: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestResult {
    Stored(PathBuf),
    Skipped(SkipReason),
}

impl HarvestResult {
    pub fn is_stored(&self) -> bool {
        matches!(self, HarvestResult::Stored(_))
    }

    pub fn stored_path(&self) -> Option<&PathBuf> {
        match self {
            HarvestResult::Stored(path) => Some(path),
            HarvestResult::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub ordinal: Ordinal,
    pub result: HarvestResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    pub discovery: DiscoveryOutcome,
    pub items: Vec<ItemReport>,
}

impl HarvestReport {
    pub fn discovered(&self) -> u64 {
        self.discovery.count()
    }

    pub fn stored_count(&self) -> usize {
        self.items.iter().filter(|item| item.result.is_stored()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.items.len() - self.stored_count()
    }

    pub fn results(&self) -> Vec<HarvestResult> {
        self.items.iter().map(|item| item.result.clone()).collect()
    }
}
