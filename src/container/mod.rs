//! The binary record container: codec, framing, writer, and reader.
//!
//! A container is an ordered sequence of records persisted as a single byte
//! stream, on disk or in memory. Each record pairs one lossily-compressed
//! (JPEG) image with the exact numeric label table for that image:
//!
//! ```text
//! [image_len: u32 LE] [image_bytes] [row_count: u32 LE] [rows: f32 LE ...]
//! ```
//!
//! There is no container-level header, footer, index, or checksum: record
//! boundaries are self-describing through the per-record length prefixes,
//! which keeps writing a pure append and reading a pure forward scan with
//! at most one record in memory at a time.
//!
//! The file-backed and in-memory paths share the same byte format; a block
//! produced by [`byte_records`] and fed to [`KittiReader::from_bytes`]
//! decodes identically to the same record read back from a file.

mod frame;
mod jpeg;
mod reader;
mod writer;

pub use frame::{decode_record, encode_record, FIELD_BYTES, LEN_PREFIX_BYTES};
pub use jpeg::{decode_jpeg, encode_jpeg, DEFAULT_JPEG_QUALITY};
pub use reader::{KittiReader, Records};
pub use writer::{byte_records, KittiWriter};
