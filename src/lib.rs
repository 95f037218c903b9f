//! Kittirec: a streaming binary record container for KITTI-style object
//! detection training examples.
//!
//! Kittirec stores (JPEG image, bounding-box table) pairs as length-framed
//! records in a single byte stream, on disk or in memory, and reads them
//! back one record at a time so a training loop never holds more than one
//! example in memory. Labels round-trip exactly; images round-trip within
//! the JPEG error budget.
//!
//! # Modules
//!
//! - [`label`]: KITTI annotation parsing and the bounding-box table types
//! - [`container`]: record framing, JPEG codec, writer, and reader
//! - [`dataset`]: directory-level pack/unpack plumbing for the CLI
//! - [`inspect`]: streaming container statistics
//! - [`error`]: error types for kittirec operations
//!
//! # Example
//!
//! ```no_run
//! use kittirec::container::{KittiReader, KittiWriter};
//! use kittirec::label::parse_label_block;
//!
//! # fn main() -> Result<(), kittirec::KittirecError> {
//! let image = image::open("000042.png").unwrap().into_rgb8();
//! let label = parse_label_block(&std::fs::read_to_string("000042.txt")?)?;
//!
//! let mut writer = KittiWriter::create("train.bin")?;
//! writer.write(&[image], &[label])?;
//! writer.finish()?;
//!
//! let reader = KittiReader::open("train.bin")?;
//! for record in reader.records() {
//!     let (image, label) = record?;
//!     // feed (image, label) to the training loop
//! }
//! # Ok(())
//! # }
//! ```

pub mod container;
pub mod dataset;
pub mod error;
pub mod inspect;
pub mod label;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::KittirecError;

use container::DEFAULT_JPEG_QUALITY;

/// The kittirec CLI application.
#[derive(Parser)]
#[command(name = "kittirec")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Pack an images directory plus a labels directory into a container.
    Pack(PackArgs),
    /// Unpack a container back into image and label files.
    Unpack(UnpackArgs),
    /// Print statistics about a container.
    Inspect(InspectArgs),
}

/// Arguments for the pack subcommand.
#[derive(clap::Args)]
struct PackArgs {
    /// Directory tree of input images (jpg/png/jpeg/bmp/webp).
    images: PathBuf,

    /// Directory tree of KITTI label files with matching stems.
    labels: PathBuf,

    /// Output container file.
    #[arg(short, long)]
    output: PathBuf,

    /// JPEG quality (1-100) for stored images.
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "KITTIREC_JPEG_QUALITY")]
    quality: u8,
}

/// Arguments for the unpack subcommand.
#[derive(clap::Args)]
struct UnpackArgs {
    /// Input container file.
    input: PathBuf,

    /// Output directory for JPEG images.
    #[arg(long, default_value = "images")]
    images: PathBuf,

    /// Output directory for KITTI label files.
    #[arg(long, default_value = "labels")]
    labels: PathBuf,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Container file to inspect.
    input: PathBuf,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the kittirec CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), KittirecError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Pack(args)) => run_pack(args),
        Some(Commands::Unpack(args)) => run_unpack(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            // No subcommand: print a help hint and exit successfully
            println!("kittirec {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Streaming binary record container for KITTI-style training data.");
            println!();
            println!("Run 'kittirec --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the pack subcommand.
fn run_pack(args: PackArgs) -> Result<(), KittirecError> {
    let summary = dataset::pack_dataset(&args.images, &args.labels, &args.output, args.quality)?;
    println!(
        "Packed {} record(s) with {} box(es) into {}",
        summary.records,
        summary.boxes,
        args.output.display()
    );
    Ok(())
}

/// Execute the unpack subcommand.
fn run_unpack(args: UnpackArgs) -> Result<(), KittirecError> {
    let summary = dataset::unpack_dataset(&args.input, &args.images, &args.labels)?;
    println!(
        "Unpacked {} record(s) with {} box(es) from {}",
        summary.records,
        summary.boxes,
        args.input.display()
    );
    Ok(())
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), KittirecError> {
    let report = inspect::inspect_container(&args.input)?;

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|source| KittirecError::ReportJson { source })?;
            println!("{json}");
        }
        "text" => print!("{report}"),
        other => {
            return Err(KittirecError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }
    Ok(())
}
