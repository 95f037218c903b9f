//! Container inspection and statistics.
//!
//! Inspection is a pure forward scan: image payloads are never pixel-decoded
//! — dimensions come from the JPEG headers via `imagesize` — so inspecting a
//! large container costs one pass of buffered reads and O(1) memory.

mod report;

pub use report::{ClassCount, ImageSection, InspectReport, SummarySection};

use std::collections::HashMap;
use std::path::Path;

use crate::container::KittiReader;
use crate::error::KittirecError;
use crate::label::KittiClass;

/// Streams a container file and produces an [`InspectReport`].
pub fn inspect_container(path: &Path) -> Result<InspectReport, KittirecError> {
    let mut reader = KittiReader::open(path)?;
    let mut report = InspectReport::default();
    let mut class_counts: HashMap<u32, u64> = HashMap::new();

    loop {
        let jpeg = match reader.read_image_bytes() {
            Err(err) if err.is_end_of_stream() => break,
            Err(err) => return Err(err),
            Ok(jpeg) => jpeg,
        };
        let label = reader.read_label()?;

        report.summary.records += 1;
        report.summary.boxes += label.len() as u64;
        report.summary.image_bytes += jpeg.len() as u64;
        if label.is_empty() {
            report.summary.empty_records += 1;
        }

        match imagesize::blob_size(&jpeg) {
            Ok(size) => record_dimensions(&mut report.images, size.width, size.height),
            Err(_) => report.images.unreadable += 1,
        }

        for bbox in &label {
            *class_counts.entry(bbox.class_id).or_default() += 1;
        }
    }

    report.summary.container_bytes = reader.offset();
    report.classes = sorted_class_counts(class_counts);
    Ok(report)
}

fn record_dimensions(images: &mut ImageSection, width: usize, height: usize) {
    let (width, height) = (width as u32, height as u32);
    images.min_width = Some(images.min_width.map_or(width, |w| w.min(width)));
    images.max_width = Some(images.max_width.map_or(width, |w| w.max(width)));
    images.min_height = Some(images.min_height.map_or(height, |h| h.min(height)));
    images.max_height = Some(images.max_height.map_or(height, |h| h.max(height)));
}

fn sorted_class_counts(counts: HashMap<u32, u64>) -> Vec<ClassCount> {
    let mut classes: Vec<ClassCount> = counts
        .into_iter()
        .map(|(class_id, count)| ClassCount {
            name: KittiClass::from_index(class_id)
                .map(|class| class.name().to_string())
                .unwrap_or_else(|| format!("class_{class_id}")),
            count,
        })
        .collect();
    // Count descending, name ascending for deterministic output.
    classes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    classes
}
