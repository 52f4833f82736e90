use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use watermark_autoplace::{process_file, PlaceOptions, PlaceReport};

#[derive(Parser)]
#[command(
    name = "watermark-autoplace",
    about = "Blend a watermark into the visually quietest region of an image",
    version,
    after_help = "Simple usage: watermark-autoplace <image> <watermark>\n\n\
                  The watermark must carry an alpha channel (e.g. a PNG logo).\n\
                  Output defaults to {name}_watermarked.{ext} next to the input."
)]
struct Cli {
    /// Base image to place the watermark on
    image: String,

    /// Watermark image with an alpha channel
    watermark: String,

    /// Output file (default: {name}_watermarked.{ext})
    #[arg(short, long)]
    output: Option<String>,

    /// Write energy and smoothed-energy renderings into this directory
    #[arg(long, value_name = "DIR")]
    artifacts: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let image_path = Path::new(&cli.image);
    if !image_path.exists() {
        eprintln!("Error: Input image does not exist: {}", cli.image);
        process::exit(1);
    }
    let overlay_path = Path::new(&cli.watermark);
    if !overlay_path.exists() {
        eprintln!("Error: Watermark image does not exist: {}", cli.watermark);
        process::exit(1);
    }

    let opts = PlaceOptions {
        output: cli.output.as_ref().map(PathBuf::from),
        artifact_dir: cli.artifacts.as_ref().map(PathBuf::from),
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    if opts.verbose && !opts.quiet {
        eprintln!("Analyzing {} ...", image_path.display());
    }

    match process_file(image_path, overlay_path, &opts) {
        Ok(report) => print_report(&report, &opts),
        Err(e) => {
            eprintln!("[FAIL] {}: {e}", file_label(image_path));
            process::exit(1);
        }
    }
}

fn print_report(report: &PlaceReport, opts: &PlaceOptions) {
    if opts.quiet {
        return;
    }
    eprintln!("[OK] {}", report.output.display());
    if opts.verbose {
        let rect = report.placement.rect;
        eprintln!(
            "  -> anchor row {}, col {} in {}x{}",
            report.placement.anchor.row, report.placement.anchor.col, report.width, report.height
        );
        eprintln!(
            "  -> painted rows {}..{}, cols {}..{}",
            rect.top, rect.bottom, rect.left, rect.right
        );
        if let Some(dir) = &opts.artifact_dir {
            eprintln!("  -> artifacts in {}", dir.display());
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}
