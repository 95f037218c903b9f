#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::RgbImage;
use rand::{RngExt, SeedableRng};

use kittirec::label::{parse_label_block, LabelTable};

/// Accepted mean absolute per-sample difference after a JPEG round-trip.
///
/// This is the downstream consumer's lossy-compression error budget, not a
/// correctness bound on the codec.
pub const MAX_MEAN_PIXEL_DIFF: f64 = 110.0;

/// A realistic annotation block in devkit syntax: three tracked objects
/// plus a DontCare region.
pub const SAMPLE_KITTI_BLOCK: &str = "\
Car 0.00 0 1.85 387.63 181.54 423.81 203.12 1.67 1.87 3.69 -16.53 2.39 58.49 1.57
Pedestrian 0.00 0 -0.20 712.40 143.00 810.73 307.92 1.89 0.48 1.20 1.84 1.47 8.41 0.01
Cyclist 0.00 3 -1.65 676.60 163.95 688.98 193.93 1.86 0.60 2.02 4.59 1.32 45.84 -1.55
DontCare -1 -1 -10 503.89 169.71 590.61 190.13 -1 -1 -1 -1000 -1000 -1000 -10
";

/// Parses [`SAMPLE_KITTI_BLOCK`] into a label table.
pub fn sample_label() -> LabelTable {
    parse_label_block(SAMPLE_KITTI_BLOCK).expect("sample block parses")
}

/// A smooth gradient image; compresses well under JPEG.
pub fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    })
}

/// A seeded noise image; the worst case for lossy compression.
pub fn noise_image(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    RgbImage::from_fn(width, height, |_, _| {
        image::Rgb([rng.random(), rng.random(), rng.random()])
    })
}

/// Mean absolute difference over all samples of two same-sized images.
pub fn mean_abs_diff(a: &RgbImage, b: &RgbImage) -> f64 {
    assert_eq!(a.as_raw().len(), b.as_raw().len(), "image sizes differ");
    let total: f64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw().iter())
        .map(|(&x, &y)| (f64::from(x) - f64::from(y)).abs())
        .sum();
    total / a.as_raw().len() as f64
}

/// Asserts that two images have identical dimensions and differ by less
/// than the compression error budget.
pub fn assert_images_close(original: &RgbImage, restored: &RgbImage, msg: &str) {
    assert_eq!(original.width(), restored.width(), "{msg}: width differs");
    assert_eq!(original.height(), restored.height(), "{msg}: height differs");
    let diff = mean_abs_diff(original, restored);
    assert!(
        diff < MAX_MEAN_PIXEL_DIFF,
        "{msg}: mean pixel difference {diff} exceeds budget {MAX_MEAN_PIXEL_DIFF}"
    );
}

/// Asserts two label tables are numerically equal row-for-row.
pub fn assert_labels_equal(expected: &LabelTable, actual: &LabelTable, msg: &str) {
    assert_eq!(expected.len(), actual.len(), "{msg}: row count differs");
    for (i, (a, b)) in expected.iter().zip(actual.iter()).enumerate() {
        assert_eq!(a, b, "{msg}: row {i} differs");
    }
}

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}
