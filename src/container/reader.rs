//! Sequential container reader.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use image::RgbImage;
use log::trace;

use crate::error::KittirecError;
use crate::label::LabelTable;

use super::frame::{read_image_section, read_label_section};
use super::jpeg::decode_jpeg;

/// Streams records out of a container, one at a time.
///
/// Each record must be consumed in stream order: the image portion first
/// ([`read_image`](KittiReader::read_image)), then the label portion
/// ([`read_label`](KittiReader::read_label)). There is no skip or seek;
/// label bytes physically follow image bytes, and the only index is the
/// per-record length framing.
///
/// A clean end of the container surfaces as [`KittirecError::EndOfStream`]
/// from the next image read, which is the designed loop-termination
/// signal; [`records`](KittiReader::records) wraps that protocol into an
/// ordinary iterator. File handles are released when the reader drops,
/// on every exit path.
pub struct KittiReader<R: Read> {
    source: R,
    offset: u64,
    pending_label: bool,
}

impl KittiReader<BufReader<File>> {
    /// Opens a container file for streaming reads.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KittirecError> {
        let file = File::open(path).map_err(KittirecError::Io)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl KittiReader<Cursor<Vec<u8>>> {
    /// Wraps an in-memory container, e.g. blocks produced by
    /// [`byte_records`](super::byte_records). No external resources are
    /// involved, but the reader follows the same scoped discipline so
    /// callers can stay source-agnostic.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::from_reader(Cursor::new(bytes.into()))
    }
}

impl<R: Read> KittiReader<R> {
    /// Wraps an arbitrary byte source.
    pub fn from_reader(source: R) -> Self {
        Self {
            source,
            offset: 0,
            pending_label: false,
        }
    }

    /// Bytes consumed from the source so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Reads and decodes the next record's image portion.
    ///
    /// Advances the cursor past the image bytes; the matching
    /// [`read_label`](Self::read_label) must follow before the next image.
    /// Fails with [`KittirecError::EndOfStream`] at a clean end of the
    /// container and with [`KittirecError::Framing`] on a truncated record.
    pub fn read_image(&mut self) -> Result<RgbImage, KittirecError> {
        let jpeg = self.read_image_bytes()?;
        decode_jpeg(&jpeg)
    }

    /// Reads the next record's image portion without decoding it.
    ///
    /// Same sequencing rules as [`read_image`](Self::read_image). Useful
    /// when the compressed bytes are the goal (re-exporting, inspection),
    /// since the stored JPEG is preserved byte-for-byte.
    pub fn read_image_bytes(&mut self) -> Result<Vec<u8>, KittirecError> {
        if self.pending_label {
            return Err(KittirecError::OutOfSequence {
                message: "image read attempted before the current record's label was consumed"
                    .into(),
            });
        }
        match read_image_section(&mut self.source, &mut self.offset)? {
            None => Err(KittirecError::EndOfStream),
            Some(jpeg) => {
                self.pending_label = true;
                trace!("read image portion ({} bytes)", jpeg.len());
                Ok(jpeg)
            }
        }
    }

    /// Reads the label portion of the current record.
    ///
    /// Requires that [`read_image`](Self::read_image) (or
    /// [`read_image_bytes`](Self::read_image_bytes)) was already called for
    /// this record; calling it first is a programmer error and fails with
    /// [`KittirecError::OutOfSequence`].
    pub fn read_label(&mut self) -> Result<LabelTable, KittirecError> {
        if !self.pending_label {
            return Err(KittirecError::OutOfSequence {
                message: "label read attempted before the matching image read".into(),
            });
        }
        let label = read_label_section(&mut self.source, &mut self.offset)?;
        self.pending_label = false;
        trace!("read label portion ({} row(s))", label.len());
        Ok(label)
    }

    /// Reads one whole record, or `None` at a clean end of the container.
    pub fn next_record(&mut self) -> Result<Option<(RgbImage, LabelTable)>, KittirecError> {
        let image = match self.read_image() {
            Err(err) if err.is_end_of_stream() => return Ok(None),
            Err(err) => return Err(err),
            Ok(image) => image,
        };
        let label = self.read_label()?;
        Ok(Some((image, label)))
    }

    /// Adapts the reader into an iterator over decoded records.
    pub fn records(self) -> Records<R> {
        Records { reader: self }
    }
}

/// Iterator over a container's decoded (image, label) records.
///
/// Yields `Err` items for corrupt records; a clean end of the container
/// ends the iteration.
pub struct Records<R: Read> {
    reader: KittiReader<R>,
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<(RgbImage, LabelTable), KittirecError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_record().transpose()
    }
}
