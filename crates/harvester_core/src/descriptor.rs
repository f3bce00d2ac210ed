/// Raster image extensions accepted by the resource filter.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &[
    ".bmp", ".dib", ".jpeg", ".jpg", ".jp2", ".png", ".webp", ".pbm", ".pgm", ".ppm", ".pxm",
    ".pnm", ".pfm", ".sr", ".ras", ".tiff", ".exr", ".hdr", ".pic",
];

/// Closed set of extensions a locator must carry to be harvestable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: Vec<String>,
}

impl ExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut extensions: Vec<String> = extensions.into_iter().map(Into::into).collect();
        extensions.sort();
        extensions.dedup();
        Self { extensions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e == extension)
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::new(RECOGNIZED_EXTENSIONS.iter().copied())
    }
}

/// A locator reduced to the fetchable part and the extension it was matched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    base_locator: String,
    extension: String,
}

impl ResourceDescriptor {
    /// Locator truncated right after the first occurrence of the extension.
    pub fn base_locator(&self) -> &str {
        &self.base_locator
    }

    /// Matched extension, including the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Accepted(ResourceDescriptor),
    NoMatch,
    /// More than one recognized extension occurs in the locator.
    Ambiguous(Vec<String>),
}

impl FilterOutcome {
    pub fn accepted(self) -> Option<ResourceDescriptor> {
        match self {
            FilterOutcome::Accepted(descriptor) => Some(descriptor),
            FilterOutcome::NoMatch | FilterOutcome::Ambiguous(_) => None,
        }
    }
}

/// Matches `locator` against every dotted extension in the set.
///
/// Only the dotted form counts, so path segments such as `src/` or
/// `pictures/` never collide with `.sr` or `.pic`. A locator with exactly one
/// present extension is accepted and cut right after its first occurrence.
pub fn classify(locator: &str, extensions: &ExtensionSet) -> FilterOutcome {
    let present: Vec<(&str, usize)> = extensions
        .iter()
        .filter_map(|ext| locator.find(ext).map(|at| (ext, at)))
        .collect();

    match present.as_slice() {
        [] => FilterOutcome::NoMatch,
        [(ext, at)] => FilterOutcome::Accepted(ResourceDescriptor {
            base_locator: locator[..at + ext.len()].to_string(),
            extension: ext.to_string(),
        }),
        _ => FilterOutcome::Ambiguous(present.iter().map(|(e, _)| e.to_string()).collect()),
    }
}

/// Returns the descriptor for a harvestable locator, `None` when it carries
/// zero or several recognized extensions.
pub fn filter(locator: &str, extensions: &ExtensionSet) -> Option<ResourceDescriptor> {
    classify(locator, extensions).accepted()
}
