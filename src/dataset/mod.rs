//! Directory-based packing and unpacking of containers.
//!
//! `pack` walks a KITTI-style dataset layout — an `images/` tree plus a
//! `labels/` tree of matching-stem `.txt` files — and streams it into a
//! single container file, one record at a time. `unpack` is the reverse:
//! it streams a container back out as numbered JPEG and annotation files.
//! Neither direction ever holds more than one example in memory.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::container::{KittiReader, KittiWriter};
use crate::error::KittirecError;
use crate::label::{read_kitti_txt, write_label_block};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "png", "jpeg", "bmp", "webp"];
const LABEL_EXTENSION: &str = "txt";

/// Counts reported by [`pack_dataset`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PackSummary {
    pub records: u64,
    pub boxes: u64,
}

/// Counts reported by [`unpack_dataset`].
#[derive(Clone, Copy, Debug, Default)]
pub struct UnpackSummary {
    pub records: u64,
    pub boxes: u64,
}

/// Packs an images directory plus a labels directory into a container file.
///
/// Every image must have a label file with the same relative stem under
/// `labels_dir`; a missing label file is an error rather than an implicit
/// empty table, since silently dropping annotations corrupts training
/// data. An image whose label file is empty packs an empty table.
pub fn pack_dataset(
    images_dir: &Path,
    labels_dir: &Path,
    output: &Path,
    quality: u8,
) -> Result<PackSummary, KittirecError> {
    if !images_dir.is_dir() {
        return Err(layout_invalid(images_dir, "not a directory"));
    }
    if !labels_dir.is_dir() {
        return Err(layout_invalid(labels_dir, "not a directory"));
    }

    let mut image_files = collect_files_with_extensions(images_dir, &IMAGE_EXTENSIONS)?;
    image_files.sort_by_cached_key(|image_path| rel_string(images_dir, image_path));

    let mut writer = KittiWriter::create(output)?.with_quality(quality);
    let mut summary = PackSummary::default();

    for image_path in &image_files {
        let label_path = find_label_for_image(images_dir, labels_dir, image_path)?;
        let label = read_kitti_txt(&label_path)?;

        let image = image::open(image_path)
            .map_err(|source| KittirecError::ImageDecode { source })?
            .into_rgb8();

        writer.write_record(&image, &label)?;
        summary.records += 1;
        summary.boxes += label.len() as u64;
        debug!(
            "packed {} ({} box(es))",
            rel_string(images_dir, image_path),
            label.len()
        );
    }

    writer.finish()?;
    info!(
        "packed {} record(s), {} box(es) into {}",
        summary.records,
        summary.boxes,
        output.display()
    );
    Ok(summary)
}

/// Unpacks a container file into an images directory and a labels
/// directory, using zero-padded record indices as file stems
/// (`000000.jpg` / `000000.txt`, the KITTI naming convention).
///
/// The stored JPEG bytes are written out verbatim; no pixel re-encoding
/// happens, so unpacking is lossless with respect to the container.
pub fn unpack_dataset(
    container: &Path,
    images_dir: &Path,
    labels_dir: &Path,
) -> Result<UnpackSummary, KittirecError> {
    fs::create_dir_all(images_dir).map_err(KittirecError::Io)?;
    fs::create_dir_all(labels_dir).map_err(KittirecError::Io)?;

    let mut reader = KittiReader::open(container)?;
    let mut summary = UnpackSummary::default();

    loop {
        let jpeg = match reader.read_image_bytes() {
            Err(err) if err.is_end_of_stream() => break,
            Err(err) => return Err(err),
            Ok(jpeg) => jpeg,
        };
        let label = reader.read_label()?;

        let stem = format!("{:06}", summary.records);
        fs::write(images_dir.join(format!("{stem}.jpg")), &jpeg).map_err(KittirecError::Io)?;
        fs::write(
            labels_dir.join(format!("{stem}.{LABEL_EXTENSION}")),
            write_label_block(&label)?,
        )
        .map_err(KittirecError::Io)?;

        summary.records += 1;
        summary.boxes += label.len() as u64;
    }

    info!(
        "unpacked {} record(s), {} box(es) from {}",
        summary.records,
        summary.boxes,
        container.display()
    );
    Ok(summary)
}

fn collect_files_with_extensions(
    root: &Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, KittirecError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| {
            layout_invalid(root, format!("failed while traversing directory: {source}"))
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

fn find_label_for_image(
    images_dir: &Path,
    labels_dir: &Path,
    image_path: &Path,
) -> Result<PathBuf, KittirecError> {
    let rel = image_path.strip_prefix(images_dir).map_err(|_| {
        layout_invalid(
            image_path,
            format!("image path is outside images dir '{}'", images_dir.display()),
        )
    })?;

    let candidate = labels_dir.join(rel).with_extension(LABEL_EXTENSION);
    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(KittirecError::LabelNotFound {
            image_path: image_path.to_path_buf(),
            expected: candidate,
        })
    }
}

fn layout_invalid(path: &Path, message: impl Into<String>) -> KittirecError {
    KittirecError::LayoutInvalid {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
