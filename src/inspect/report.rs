//! Inspect report types and terminal formatting.

use std::fmt;

use serde::Serialize;

/// The result of inspecting a container.
#[derive(Clone, Debug, Default, Serialize)]
pub struct InspectReport {
    /// Whole-container counts.
    pub summary: SummarySection,
    /// Image dimension ranges, probed from JPEG headers without decoding.
    pub images: ImageSection,
    /// Per-class box counts, sorted by count descending.
    pub classes: Vec<ClassCount>,
}

/// Whole-container counts.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct SummarySection {
    /// Total records in the container.
    pub records: u64,
    /// Total bounding boxes across all records.
    pub boxes: u64,
    /// Records with an empty label table.
    pub empty_records: u64,
    /// Total container size in bytes.
    pub container_bytes: u64,
    /// Bytes spent on compressed image payloads.
    pub image_bytes: u64,
}

/// Image dimension statistics.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct ImageSection {
    /// Smallest image width seen, if any record had a readable header.
    pub min_width: Option<u32>,
    /// Largest image width seen.
    pub max_width: Option<u32>,
    /// Smallest image height seen.
    pub min_height: Option<u32>,
    /// Largest image height seen.
    pub max_height: Option<u32>,
    /// Records whose image header could not be probed.
    pub unreadable: u64,
}

/// A single class with its box count.
#[derive(Clone, Debug, Serialize)]
pub struct ClassCount {
    /// Class name, or `class_N` for indices outside the known class list.
    pub name: String,
    /// Number of boxes with this class.
    pub count: u64,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "Container summary")?;
        writeln!(f, "  records:        {}", s.records)?;
        writeln!(f, "  boxes:          {}", s.boxes)?;
        writeln!(f, "  empty records:  {}", s.empty_records)?;
        writeln!(f, "  total bytes:    {}", s.container_bytes)?;
        writeln!(f, "  image bytes:    {}", s.image_bytes)?;
        writeln!(f)?;

        writeln!(f, "Images")?;
        match (
            self.images.min_width,
            self.images.max_width,
            self.images.min_height,
            self.images.max_height,
        ) {
            (Some(min_w), Some(max_w), Some(min_h), Some(max_h)) => {
                writeln!(f, "  width:  {min_w} .. {max_w}")?;
                writeln!(f, "  height: {min_h} .. {max_h}")?;
            }
            _ => writeln!(f, "  no readable image headers")?,
        }
        if self.images.unreadable > 0 {
            writeln!(f, "  unreadable headers: {}", self.images.unreadable)?;
        }
        writeln!(f)?;

        writeln!(f, "Classes")?;
        if self.classes.is_empty() {
            writeln!(f, "  no boxes")?;
        } else {
            let max_count = self.classes.iter().map(|c| c.count).max().unwrap_or(1);
            for class in &self.classes {
                writeln!(
                    f,
                    "  {:<16} {:>8}  {}",
                    class.name,
                    class.count,
                    histogram_bar(class.count, max_count, 24)
                )?;
            }
        }
        Ok(())
    }
}

/// Renders a proportional histogram bar, `width` characters at full scale.
fn histogram_bar(count: u64, max_count: u64, width: u64) -> String {
    if max_count == 0 {
        return String::new();
    }
    let filled = ((count * width) / max_count).min(width) as usize;
    "#".repeat(filled)
}
