use std::io::Cursor;
use std::path::{Path, PathBuf};

use engine_logging::engine_debug;
use harvester_core::{Dimensions, TransformSpec};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("cannot decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("cannot encode as {extension}: {message}")]
    Encode { extension: String, message: String },
    #[error("cannot write transformed image: {0}")]
    Persist(#[from] PersistError),
}

/// Applies resize and format conversion to a stored image in place.
#[derive(Debug, Clone)]
pub struct Transformer {
    writer: AtomicFileWriter,
}

impl Transformer {
    pub fn new(writer: AtomicFileWriter) -> Self {
        Self { writer }
    }

    /// Returns the path of the final artifact.
    ///
    /// When the extension changes, the artifact is written under the new name
    /// and the original file is removed, so exactly one file remains. An
    /// image that already has the target size and format is left untouched.
    pub fn apply(&self, path: &Path, spec: &TransformSpec) -> Result<PathBuf, TransformError> {
        let image = decode(path)?;

        let current_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let target_ext = spec.target_extension(&current_ext);
        let converts = !target_ext.eq_ignore_ascii_case(&current_ext);
        let resize = spec
            .resize
            .filter(|d| (image.width(), image.height()) != (d.width, d.height));

        if resize.is_none() && !converts {
            engine_debug!("{} already matches {:?}", path.display(), spec);
            return Ok(path.to_path_buf());
        }

        let image = match resize {
            Some(target) => resample(&image, target),
            None => image,
        };
        let bytes = encode(image, target_ext)?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let final_path = self.writer.write(&format!("{stem}{target_ext}"), &bytes)?;
        if final_path != path {
            self.writer.discard(path)?;
        }
        Ok(final_path)
    }
}

fn decode(path: &Path) -> Result<DynamicImage, TransformError> {
    let decode_error = |message: String| TransformError::Decode {
        path: path.display().to_string(),
        message,
    };
    ImageReader::open(path)
        .map_err(|e| decode_error(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_error(e.to_string()))?
        .decode()
        .map_err(|e| decode_error(e.to_string()))
}

/// Area averaging when shrinking both axes, bilinear otherwise.
fn resample(image: &DynamicImage, target: Dimensions) -> DynamicImage {
    if target.width <= image.width() && target.height <= image.height() {
        image.thumbnail_exact(target.width, target.height)
    } else {
        image.resize_exact(target.width, target.height, FilterType::Triangle)
    }
}

fn encode(image: DynamicImage, extension: &str) -> Result<Vec<u8>, TransformError> {
    let encode_error = |message: String| TransformError::Encode {
        extension: extension.to_string(),
        message,
    };
    let format = ImageFormat::from_extension(extension.trim_start_matches('.'))
        .ok_or_else(|| encode_error("no encoder for this extension".into()))?;

    // JPEG has no alpha channel; float buffers only survive as 16-bit.
    let image = match (format, image.color()) {
        (ImageFormat::Jpeg, ColorType::Rgb8 | ColorType::L8) => image,
        (ImageFormat::Jpeg, _) => DynamicImage::ImageRgb8(image.to_rgb8()),
        (_, ColorType::Rgb32F | ColorType::Rgba32F) => DynamicImage::ImageRgba16(image.to_rgba16()),
        _ => image,
    };

    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, format)
        .map_err(|e| encode_error(e.to_string()))?;
    Ok(buffer.into_inner())
}
