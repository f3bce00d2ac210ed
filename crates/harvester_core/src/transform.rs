use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Builds dimensions from a `[width, height]` pair; both must be positive.
    pub fn from_pair(values: &[u32]) -> Result<Self, ConfigError> {
        match values {
            [width, height] if *width > 0 && *height > 0 => Ok(Self {
                width: *width,
                height: *height,
            }),
            [_, _] => Err(ConfigError::InvalidResize(
                "width and height must be positive".into(),
            )),
            other => Err(ConfigError::InvalidResize(format!(
                "expected a width and a height, got {} value(s)",
                other.len()
            ))),
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Output formats an item may be converted to after download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpg,
    Jpeg,
    Png,
    Tiff,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Jpg,
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::Tiff,
    ];

    /// File extension with leading dot, as used in stored filenames.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpg => ".jpg",
            OutputFormat::Jpeg => ".jpeg",
            OutputFormat::Png => ".png",
            OutputFormat::Tiff => ".tiff",
        }
    }

    pub fn name(self) -> &'static str {
        &self.extension()[1..]
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('.');
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Post-download transformation applied to every stored item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformSpec {
    pub resize: Option<Dimensions>,
    pub output_format: Option<OutputFormat>,
}

impl TransformSpec {
    /// `None` when neither a resize nor a conversion was requested.
    pub fn from_parts(
        resize: Option<Dimensions>,
        output_format: Option<OutputFormat>,
    ) -> Option<Self> {
        if resize.is_none() && output_format.is_none() {
            None
        } else {
            Some(Self {
                resize,
                output_format,
            })
        }
    }

    /// Extension the final artifact should carry, given the one it was fetched with.
    pub fn target_extension<'a>(&self, original: &'a str) -> &'a str {
        match self.output_format {
            Some(format) => format.extension(),
            None => original,
        }
    }
}
