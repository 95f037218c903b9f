//! Sequential container writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::RgbImage;
use log::{debug, trace};

use crate::error::KittirecError;
use crate::label::LabelTable;

use super::frame::encode_record;
use super::jpeg::{encode_jpeg, DEFAULT_JPEG_QUALITY};

/// Lazily yields one framed record block per aligned (image, label) pair,
/// without touching any sink.
///
/// This is the pure core of the write path: [`KittiWriter::write`] drains it
/// into its sink, and callers that want in-memory blocks (network exchange,
/// tests) can consume it directly. Pairs are formed positionally and the
/// iteration stops at the shorter input; use [`KittiWriter::write`] when a
/// length mismatch should be an error.
pub fn byte_records<'a>(
    images: &'a [RgbImage],
    labels: &'a [LabelTable],
    quality: u8,
) -> impl Iterator<Item = Result<Vec<u8>, KittirecError>> + 'a {
    images.iter().zip(labels.iter()).map(move |(image, label)| {
        let jpeg = encode_jpeg(image, quality)?;
        Ok(encode_record(&jpeg, label))
    })
}

/// Appends (image, label) records to a byte sink in input order.
///
/// The writer owns its sink for its whole scoped lifetime. Buffered file
/// sinks created by [`KittiWriter::create`] flush on drop; call
/// [`KittiWriter::finish`] to surface flush errors instead of discarding
/// them.
pub struct KittiWriter<W: Write> {
    sink: W,
    quality: u8,
    records_written: u64,
}

impl KittiWriter<BufWriter<File>> {
    /// Creates (truncating) a container file at `path`.
    ///
    /// One container is one scoped write session; appending to an existing
    /// container is not supported.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, KittirecError> {
        let file = File::create(path).map_err(KittirecError::Io)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> KittiWriter<W> {
    /// Wraps an arbitrary byte sink, e.g. a `&mut Vec<u8>` for pure
    /// in-memory containers.
    pub fn from_writer(sink: W) -> Self {
        Self {
            sink,
            quality: DEFAULT_JPEG_QUALITY,
            records_written: 0,
        }
    }

    /// Overrides the JPEG quality used for subsequent records.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Encodes and appends one record per aligned (image, label) pair.
    ///
    /// The inputs must have equal lengths; a mismatch fails before any byte
    /// is written. If encoding or I/O fails for pair `i`, nothing for pair
    /// `i` or later reaches the sink, but records already appended stay:
    /// the sink is left holding a valid prefix of the intended container.
    pub fn write(
        &mut self,
        images: &[RgbImage],
        labels: &[LabelTable],
    ) -> Result<(), KittirecError> {
        if images.len() != labels.len() {
            return Err(KittirecError::LengthMismatch {
                images: images.len(),
                labels: labels.len(),
            });
        }

        for block in byte_records(images, labels, self.quality) {
            let block = block?;
            self.sink.write_all(&block).map_err(KittirecError::Io)?;
            self.records_written += 1;
            trace!(
                "appended record {} ({} bytes)",
                self.records_written,
                block.len()
            );
        }
        debug!("wrote {} record(s)", images.len());
        Ok(())
    }

    /// Encodes and appends a single record.
    pub fn write_record(
        &mut self,
        image: &RgbImage,
        label: &LabelTable,
    ) -> Result<(), KittirecError> {
        let jpeg = encode_jpeg(image, self.quality)?;
        let block = encode_record(&jpeg, label);
        self.sink.write_all(&block).map_err(KittirecError::Io)?;
        self.records_written += 1;
        trace!(
            "appended record {} ({} bytes)",
            self.records_written,
            block.len()
        );
        Ok(())
    }

    /// Total records appended so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flushes the sink and returns it, surfacing any deferred I/O error.
    pub fn finish(mut self) -> Result<W, KittirecError> {
        self.sink.flush().map_err(KittirecError::Io)?;
        Ok(self.sink)
    }
}
