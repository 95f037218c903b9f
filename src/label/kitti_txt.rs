//! KITTI annotation text reader and writer.
//!
//! The KITTI devkit stores one annotation file per image, one object per
//! line, with whitespace-separated columns:
//!
//! ```text
//! type truncated occluded alpha left top right bottom height width length x y z rotation_y [score]
//! ```
//!
//! That is 15 columns, or 16 when a detection score is present. The parser
//! keeps the class name (column 0) and the four pixel geometry columns
//! (4..8); the remaining columns are validated for count and numeric form
//! but are not retained, since the container stores only what the encoded
//! row layout carries.

use std::fs;
use std::path::Path;

use crate::error::KittirecError;

use super::bbox::{KittiBox, KittiClass, LabelTable};

/// Column counts accepted per annotation line.
const FIELDS_WITHOUT_SCORE: usize = 15;
const FIELDS_WITH_SCORE: usize = 16;

/// Parses one annotation block (the full text of one label file) into a
/// label table, one row per annotated object, in text order.
///
/// Blank lines are skipped; an empty block yields an empty table. Any
/// malformed line fails with a line-identified parse error.
pub fn parse_label_block(text: &str) -> Result<LabelTable, KittirecError> {
    parse_block(text, Path::new("<memory>"))
}

/// Parses one annotation block per input, in input order.
pub fn parse_label_blocks<S: AsRef<str>>(blocks: &[S]) -> Result<Vec<LabelTable>, KittirecError> {
    blocks
        .iter()
        .map(|block| parse_label_block(block.as_ref()))
        .collect()
}

/// Reads and parses one annotation file.
pub fn read_kitti_txt(path: &Path) -> Result<LabelTable, KittirecError> {
    let text = fs::read_to_string(path).map_err(KittirecError::Io)?;
    parse_block(&text, path)
}

/// Renders a label table back to KITTI annotation text.
///
/// Columns the container does not track (truncation, occlusion, alpha, 3D
/// dimensions, location, rotation) are written as zeros. Geometry is written
/// with two decimal places, the devkit's own precision.
pub fn write_label_block(table: &LabelTable) -> Result<String, KittirecError> {
    let mut out = String::new();
    for bbox in table {
        let class = bbox.class().ok_or_else(|| {
            KittirecError::UnsupportedFormat(format!(
                "class index {} has no KITTI class name",
                bbox.class_id
            ))
        })?;
        out.push_str(&format!(
            "{} 0.00 0 0.00 {:.2} {:.2} {:.2} {:.2} 0.00 0.00 0.00 0.00 0.00 0.00 0.00\n",
            class.name(),
            bbox.xmin,
            bbox.ymin,
            bbox.xmax,
            bbox.ymax,
        ));
    }
    Ok(out)
}

fn parse_block(text: &str, path: &Path) -> Result<LabelTable, KittirecError> {
    let mut table = LabelTable::new();
    for (line_idx, line) in text.lines().enumerate() {
        let line_num = line_idx + 1;
        if let Some(bbox) = parse_object_line(line, path, line_num)? {
            table.push(bbox);
        }
    }
    Ok(table)
}

fn parse_object_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<KittiBox>, KittirecError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Cap the token scan so pathological inputs do not allocate unbounded memory.
    let tokens: Vec<&str> = trimmed
        .split_whitespace()
        .take(FIELDS_WITH_SCORE + 1)
        .collect();

    if tokens.len() != FIELDS_WITHOUT_SCORE && tokens.len() != FIELDS_WITH_SCORE {
        return Err(KittirecError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!(
                "expected {} or {} fields, found {}",
                FIELDS_WITHOUT_SCORE,
                FIELDS_WITH_SCORE,
                if tokens.len() > FIELDS_WITH_SCORE {
                    "more".to_string()
                } else {
                    tokens.len().to_string()
                }
            ),
        });
    }

    let class = KittiClass::from_name(tokens[0]).ok_or_else(|| KittirecError::LabelParse {
        path: file_path.to_path_buf(),
        line: line_num,
        message: format!("unknown object class '{}'", tokens[0]),
    })?;

    // Validate every numeric column, even the ones we drop, so a corrupt
    // file fails here rather than producing a silently wrong table.
    for (column, token) in tokens.iter().enumerate().skip(1) {
        parse_f32_token(token, column, file_path, line_num)?;
    }

    let xmin = parse_f32_token(tokens[4], 4, file_path, line_num)?;
    let ymin = parse_f32_token(tokens[5], 5, file_path, line_num)?;
    let xmax = parse_f32_token(tokens[6], 6, file_path, line_num)?;
    let ymax = parse_f32_token(tokens[7], 7, file_path, line_num)?;

    Ok(Some(KittiBox::new(xmin, ymin, xmax, ymax, class)))
}

fn parse_f32_token(
    raw: &str,
    column: usize,
    file_path: &Path,
    line_num: usize,
) -> Result<f32, KittirecError> {
    raw.parse::<f32>().map_err(|_| KittirecError::LabelParse {
        path: file_path.to_path_buf(),
        line: line_num,
        message: format!("invalid number '{raw}' in column {column}"),
    })
}
