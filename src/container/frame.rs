//! Length-framed record encoding.
//!
//! One record is a single self-describing byte block:
//!
//! ```text
//! [image_len: u32 little-endian]
//! [image_bytes: image_len bytes of JPEG data]
//! [row_count: u32 little-endian]
//! [rows: row_count * BOX_WIDTH f32 little-endian values, row-major]
//! ```
//!
//! A container is a plain concatenation of such blocks with no header,
//! footer, or checksum; boundaries are recovered purely from the length
//! prefixes. Truncation anywhere inside a block is detectable (declared
//! length exceeds the remaining bytes) but not repairable.

use std::io::{Cursor, ErrorKind, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::KittirecError;
use crate::label::{KittiBox, LabelTable, BOX_WIDTH};

/// Width of each integer length prefix, in bytes.
pub const LEN_PREFIX_BYTES: usize = 4;

/// Width of each label field, in bytes.
pub const FIELD_BYTES: usize = 4;

/// Serializes one (compressed image, label table) pair into a framed block.
///
/// The image bytes are stored verbatim; no re-encoding happens on this
/// path, so framing round-trips are byte-exact.
pub fn encode_record(image_bytes: &[u8], label: &LabelTable) -> Vec<u8> {
    let label_bytes = label.len() * BOX_WIDTH * FIELD_BYTES;
    let mut block =
        Vec::with_capacity(2 * LEN_PREFIX_BYTES + image_bytes.len() + label_bytes);

    block.extend_from_slice(&(image_bytes.len() as u32).to_le_bytes());
    block.extend_from_slice(image_bytes);
    block.extend_from_slice(&(label.len() as u32).to_le_bytes());
    for bbox in label {
        for field in bbox.to_fields() {
            block.extend_from_slice(&field.to_le_bytes());
        }
    }
    block
}

/// Deserializes a single framed block back into its
/// (compressed image, label table) pair.
///
/// The block must contain exactly one record; trailing bytes are a framing
/// error, as is any declared length that exceeds the remaining bytes.
pub fn decode_record(bytes: &[u8]) -> Result<(Vec<u8>, LabelTable), KittirecError> {
    let mut cursor = Cursor::new(bytes);
    let mut offset = 0u64;

    let image_bytes = read_image_section(&mut cursor, &mut offset)?
        .ok_or_else(|| framing(0, "empty record block"))?;
    let label = read_label_section(&mut cursor, &mut offset)?;

    let trailing = bytes.len() as u64 - offset;
    if trailing > 0 {
        return Err(framing(
            offset,
            format!("{trailing} trailing byte(s) after record"),
        ));
    }
    Ok((image_bytes, label))
}

/// Reads the image section of the record starting at the source's current
/// position: length prefix plus that many raw compressed bytes.
///
/// Returns `Ok(None)` when the source is cleanly exhausted at a record
/// boundary (zero bytes left before the prefix); a partial prefix or a
/// short payload is a framing error. `offset` is advanced past the bytes
/// actually consumed and is used for error positions.
pub(crate) fn read_image_section<R: Read>(
    source: &mut R,
    offset: &mut u64,
) -> Result<Option<Vec<u8>>, KittirecError> {
    let image_len = match read_len_prefix(source, *offset)? {
        None => return Ok(None),
        Some(len) => len,
    };
    *offset += LEN_PREFIX_BYTES as u64;

    // Grow with the data actually read rather than trusting the declared
    // length, so a corrupt prefix cannot trigger a huge allocation.
    let mut image_bytes = Vec::new();
    source
        .by_ref()
        .take(u64::from(image_len))
        .read_to_end(&mut image_bytes)
        .map_err(KittirecError::Io)?;
    if image_bytes.len() < image_len as usize {
        return Err(framing(
            *offset + image_bytes.len() as u64,
            format!(
                "image length {} declared but only {} byte(s) remain",
                image_len,
                image_bytes.len()
            ),
        ));
    }
    *offset += u64::from(image_len);
    Ok(Some(image_bytes))
}

/// Reads the label section of the record starting at the source's current
/// position: row-count prefix plus `row_count * BOX_WIDTH` f32 fields.
pub(crate) fn read_label_section<R: Read>(
    source: &mut R,
    offset: &mut u64,
) -> Result<LabelTable, KittirecError> {
    let row_count = match read_len_prefix(source, *offset)? {
        None => {
            return Err(framing(
                *offset,
                "container ends before the label row count",
            ))
        }
        Some(count) => count,
    };
    *offset += LEN_PREFIX_BYTES as u64;

    let mut table = LabelTable::new();
    for row in 0..row_count {
        let mut fields = [0f32; BOX_WIDTH];
        source
            .read_f32_into::<LittleEndian>(&mut fields)
            .map_err(|err| map_field_err(err, *offset, row))?;
        *offset += (BOX_WIDTH * FIELD_BYTES) as u64;
        table.push(KittiBox::from_fields(fields));
    }
    Ok(table)
}

/// Reads a 4-byte little-endian length prefix.
///
/// Distinguishes a clean end of input (`Ok(None)`: zero bytes available)
/// from a torn prefix (framing error: between 1 and 3 bytes available).
fn read_len_prefix<R: Read>(source: &mut R, offset: u64) -> Result<Option<u32>, KittirecError> {
    let mut buf = [0u8; LEN_PREFIX_BYTES];
    let mut filled = 0;
    while filled < LEN_PREFIX_BYTES {
        match source.read(&mut buf[filled..]) {
            Ok(0) => {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(framing(
                    offset + filled as u64,
                    "container ends inside a length prefix",
                ));
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(KittirecError::Io(err)),
        }
    }
    Ok(Some(u32::from_le_bytes(buf)))
}

fn map_field_err(err: std::io::Error, offset: u64, row: u32) -> KittirecError {
    if err.kind() == ErrorKind::UnexpectedEof {
        framing(offset, format!("container ends inside label row {row}"))
    } else {
        KittirecError::Io(err)
    }
}

fn framing(offset: u64, message: impl Into<String>) -> KittirecError {
    KittirecError::Framing {
        offset,
        message: message.into(),
    }
}
