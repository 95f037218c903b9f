//! KITTI annotation label types and text parsing.
//!
//! This module is the producer side of the container's label half: it turns
//! raw KITTI annotation text into the fixed-width numeric tables a record
//! stores, and renders tables back to text for `unpack`.
//!
//! Parsing is pure (no I/O beyond the one file-reading convenience helper)
//! and strict: malformed lines fail with a line-identified error rather than
//! being skipped, since a silently dropped box corrupts training data.

mod bbox;
mod kitti_txt;

pub use bbox::{KittiBox, KittiClass, LabelTable, BOX_WIDTH};
pub use kitti_txt::{
    parse_label_block, parse_label_blocks, read_kitti_txt, write_label_block,
};
