use std::path::PathBuf;
use thiserror::Error;

/// The main error type for kittirec operations.
#[derive(Debug, Error)]
pub enum KittirecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse KITTI label {path}:{line}: {message}")]
    LabelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to encode image as JPEG: {source}")]
    ImageEncode {
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to decode JPEG image: {source}")]
    ImageDecode {
        #[source]
        source: image::ImageError,
    },

    #[error("Malformed record at byte {offset}: {message}")]
    Framing { offset: u64, message: String },

    #[error("Out-of-sequence read: {message}")]
    OutOfSequence { message: String },

    /// Clean end of a container at a record boundary. This is the designed
    /// loop-termination signal, not a corruption report; truncated or
    /// malformed records surface as [`KittirecError::Framing`] instead.
    #[error("End of container reached")]
    EndOfStream,

    #[error("Image/label count mismatch: {images} image(s), {labels} label table(s)")]
    LengthMismatch { images: usize, labels: usize },

    #[error("Invalid dataset layout at {path}: {message}")]
    LayoutInvalid { path: PathBuf, message: String },

    #[error("No label file found for image {image_path} (expected {expected})")]
    LabelNotFound {
        image_path: PathBuf,
        expected: PathBuf,
    },

    #[error("Failed to serialize report as JSON: {source}")]
    ReportJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl KittirecError {
    /// Returns true for the clean end-of-container signal.
    ///
    /// Consumers iterating a whole container should stop on this kind and
    /// propagate every other kind.
    #[inline]
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_of_stream_is_distinguishable_by_kind() {
        assert!(KittirecError::EndOfStream.is_end_of_stream());
        let framing = KittirecError::Framing {
            offset: 12,
            message: "truncated".into(),
        };
        assert!(!framing.is_end_of_stream());
    }
}
