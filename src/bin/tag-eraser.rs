use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use corner_tag_eraser::{EraseOptions, EraseReport, NormalizedRect, TagEraser, DEFAULT_QUALITY};

#[derive(Parser)]
#[command(
    name = "tag-eraser",
    about = "Remove a small corner tag from an image by covering it with the background color",
    version,
    after_help = "Example: tag-eraser scan.jpg scan_clean.jpg --rect \"0.78,0.02,0.99,0.12\"\n\n\
                  The output is encoded in the input's format, whatever its extension."
)]
struct Cli {
    /// Path to input image file
    input: PathBuf,

    /// Path to write the cleaned image
    output: PathBuf,

    /// Normalized rectangle 'left,top,right,bottom' (each 0.0-1.0) to cover
    #[arg(long, default_value = "0.74,0.02,0.99,0.12")]
    rect: NormalizedRect,

    /// JPEG quality when saving JPEG output (1-100)
    #[arg(long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("corner_tag_eraser={level},tag_eraser={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let opts = EraseOptions {
        rect: cli.rect,
        quality: cli.quality,
    };
    let eraser = TagEraser::new(opts);

    match eraser.process_file(&cli.input, &cli.output) {
        Ok(report) => {
            if !cli.quiet {
                print_report(&report);
            }
        }
        Err(e) => {
            eprintln!("Error: {}: {e}", cli.input.display());
            process::exit(1);
        }
    }
}

fn print_report(report: &EraseReport) {
    let filename = report.input.file_name().map_or_else(
        || report.input.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );
    let [r, g, b] = report.fill.0;

    eprintln!(
        "[OK] {filename} -> {} ({}x{}, covered {} with #{r:02x}{g:02x}{b:02x})",
        report.output.display(),
        report.width,
        report.height,
        report.region,
    );
}
