use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use celebrity_annotator::annotation::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_FONT_PATH, DEFAULT_FONT_SIZE, MAX_FONT_SIZE,
};
use celebrity_annotator::detection::{RekognitionRecognizer, ReplayRecognizer};
use celebrity_annotator::paths::DEFAULT_ASSETS_FOLDER;
use celebrity_annotator::{
    AnnotationConfig, Annotator, CelebrityDetector, Color, ImageOutcome, PathResolver, Pipeline,
    Recognizer,
};

#[derive(Parser)]
#[command(name = "celebrity-annotator")]
#[command(about = "Recognize celebrities in images and draw labelled boxes around them")]
struct Cli {
    /// Image file names inside the assets folder
    #[arg(value_name = "IMAGE", default_values_t = vec!["ptv.jpeg".to_string()])]
    images: Vec<String>,

    /// Folder holding the input images; annotated copies are written there too
    #[arg(long, value_name = "DIR", default_value = DEFAULT_ASSETS_FOLDER)]
    assets_dir: String,

    /// Minimum match confidence (0-100) for a face to be drawn
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    threshold: f32,

    /// TrueType font for labels (falls back to a built-in font)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_FONT_PATH)]
    font: PathBuf,

    /// Label font size in pixels
    #[arg(
        long,
        default_value_t = DEFAULT_FONT_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=MAX_FONT_SIZE as i64)
    )]
    font_size: u32,

    /// Rectangle and label background color (name or #rrggbb)
    #[arg(long, default_value = "green")]
    box_color: Color,

    /// Label text color (name or #rrggbb)
    #[arg(long, default_value = "white")]
    text_color: Color,

    /// AWS region, overriding the environment
    #[arg(long)]
    region: Option<String>,

    /// Answer from saved Rekognition responses (<image stem>.json) instead of calling AWS
    #[arg(long, value_name = "DIR")]
    replay: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .init();

    if !(0.0..=100.0).contains(&args.threshold) {
        anyhow::bail!("--threshold must be between 0 and 100, got {}", args.threshold);
    }

    let resolver = PathResolver::from_current_dir()?;
    let recognizer = match args.replay {
        Some(dir) => Recognizer::Replay(ReplayRecognizer::new(dir)),
        None => Recognizer::Rekognition(RekognitionRecognizer::from_env(args.region).await),
    };

    let config = AnnotationConfig {
        confidence_threshold: args.threshold,
        font_path: args.font,
        font_size: args.font_size,
        box_color: args.box_color,
        text_color: args.text_color,
    };
    let annotator = Annotator::new(config).with_font_dir(resolver.root().join(&args.assets_dir));

    let pipeline = Pipeline::new(resolver, CelebrityDetector::new(recognizer), annotator)
        .with_assets_folder(&args.assets_dir);
    let report = pipeline.run(&args.images).await;

    if args.verbose {
        println!("\n=== Summary ===");
        for entry in &report.images {
            match &entry.outcome {
                ImageOutcome::Annotated { output, summary } => println!(
                    "  {}: {} drawn, {} below threshold -> {}",
                    entry.image,
                    summary.drawn,
                    summary.below_threshold,
                    output.display()
                ),
                ImageOutcome::NoDetections => println!("  {}: no detections", entry.image),
                ImageOutcome::Failed { error } => println!("  {}: failed ({})", entry.image, error),
            }
        }
        println!(
            "Annotated: {}, without detections: {}, failed: {}",
            report.annotated(),
            report.without_detections(),
            report.failed()
        );
    }

    Ok(())
}
