//! maxtree CLI - Attribute filtering and stereo matching with max-trees

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use maxtree_core::{GrayImage, Template};
use maxtree_filter::{Decision, filter_tree};
use maxtree_io::{ImageFormat, read_image, read_template, write_image};
use maxtree_stereo::{DisparityOptions, compute_disparity, evaluate_disparity};
use maxtree_tree::{AttributeKind, AttributeRegistry, MaxTree};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "maxtree")]
#[command(author, version, about = "Max-tree attribute filtering", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter an image by thresholding an attribute of its components
    Filter {
        /// Input image
        input: PathBuf,
        /// Attribute index (see `catalog`)
        attrib: usize,
        /// Threshold; components scoring below it are removed
        #[arg(allow_negative_numbers = true)]
        lambda: f64,
        /// Decision rule index (see `catalog`)
        decision: Option<usize>,
        /// Output image
        #[arg(default_value = "out.pgm")]
        output: PathBuf,
        /// Template image; nonzero pixels take part
        template: Option<PathBuf>,
    },
    /// List the attributes and decision rules
    Catalog,
    /// Compute a disparity map from a rectified stereo pair
    Disparity {
        /// Left image
        left: PathBuf,
        /// Right image
        right: PathBuf,
        /// Attribute index used for matching
        #[arg(short, long, default_value = "0")]
        attrib: usize,
        /// Output disparity map
        #[arg(short, long, default_value = "disp.pgm")]
        output: PathBuf,
        /// Template for the left image
        #[arg(long)]
        left_template: Option<PathBuf>,
        /// Template for the right image
        #[arg(long)]
        right_template: Option<PathBuf>,
        /// Farthest column offset searched
        #[arg(short, long)]
        max_disparity: Option<u32>,
        /// Ground-truth disparity map to score the result against
        #[arg(short, long)]
        ground_truth: Option<PathBuf>,
        /// Errors above this many levels count as bad pixels
        #[arg(short, long, default_value = "1")]
        bad_threshold: u8,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second initialization only fails when a subscriber is already set
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Run `work` under a spinner that is cleared whether or not it succeeds
fn with_spinner<T>(msg: &str, work: impl FnOnce(&ProgressBar) -> Result<T>) -> Result<T> {
    let pb = spinner(msg);
    let result = work(&pb);
    pb.finish_and_clear();
    result
}

fn usage() -> String {
    "Usage: maxtree filter <input image> <attrib> <lambda> [decision] [output image] [template]"
        .to_string()
}

/// Attribute and decision listing, in index order
fn catalog_text(registry: &AttributeRegistry) -> String {
    let mut text = String::from("Where attrib is:\n");
    for entry in registry.entries() {
        let _ = writeln!(text, "\t{} - {}", entry.index, entry.name);
    }
    text.push_str("and decision is:\n");
    for decision in Decision::ALL {
        let _ = write!(text, "\t{} - {}", decision.index(), decision.name());
        if decision.is_default() {
            text.push_str(" (default)");
        }
        text.push('\n');
    }
    text
}

fn output_format(path: &Path) -> ImageFormat {
    ImageFormat::from_path(path).unwrap_or(ImageFormat::Pnm)
}

fn read_input(path: &Path) -> Result<GrayImage> {
    with_spinner("Reading image...", |_| {
        read_image(path).with_context(|| format!("Can't read image '{}'", path.display()))
    })
}

fn write_output(image: &GrayImage, path: &Path) -> Result<()> {
    with_spinner("Writing output...", |_| {
        write_image(image, path, output_format(path))
            .with_context(|| format!("Error writing image '{}'", path.display()))
    })
}

fn load_template(path: Option<&Path>, image: &GrayImage) -> Result<Template> {
    read_template(path, image).context("Can't create template")
}

// ─── Commands ───────────────────────────────────────────────────────────

fn run_filter(
    input: &Path,
    attrib: usize,
    lambda: f64,
    decision: Option<usize>,
    output: &Path,
    template: Option<&Path>,
) -> Result<()> {
    let registry = AttributeRegistry::standard();
    let entry = registry.get(attrib).context("Invalid attribute")?;
    let decision = match decision {
        Some(index) => Decision::from_index(index).context("Invalid decision")?,
        None => Decision::default(),
    };

    let image = read_input(input)?;
    let template_image = load_template(template, &image)?;
    println!(
        "Filtering image '{}' using attribute '{}' with lambda={:.6}",
        input.display(),
        entry.name,
        lambda
    );
    let template_name = template
        .map(|t| t.display().to_string())
        .unwrap_or_else(|| "<not used>".to_string());
    println!("Decision rule: {}   Template: {}", decision.name(), template_name);
    println!("Image: Width={} Height={}", image.width(), image.height());

    let start = Instant::now();
    let (tree, out) = with_spinner("Building max-tree...", |pb| {
        let mut tree = MaxTree::build_attribute(&image, &template_image, entry.kind)
            .context("Can't create Max-tree")?;
        pb.set_message("Filtering...");
        let out = filter_tree(&mut tree, &image, &template_image, decision, lambda);
        Ok((tree, out))
    })?;
    info!(
        nodes = tree.node_count(),
        "Processing time: {:.2?}",
        start.elapsed()
    );

    write_output(&out, output)?;
    println!("Filtered image written to '{}'", output.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_disparity(
    left: &Path,
    right: &Path,
    attrib: usize,
    output: &Path,
    left_template: Option<&Path>,
    right_template: Option<&Path>,
    max_disparity: Option<u32>,
    ground_truth: Option<&Path>,
    bad_threshold: u8,
) -> Result<()> {
    let kind = AttributeKind::from_index(attrib).context("Invalid attribute")?;
    let left_image = read_input(left)?;
    let right_image = read_input(right)?;
    let left_template = load_template(left_template, &left_image)?;
    let right_template = load_template(right_template, &right_image)?;

    let mut options = DisparityOptions::new().with_attribute(kind);
    if let Some(d) = max_disparity {
        options = options.with_max_disparity(d);
    }

    println!(
        "Matching '{}' against '{}' using attribute '{}'",
        left.display(),
        right.display(),
        kind.name()
    );
    let start = Instant::now();
    let disparity = with_spinner("Matching components...", |_| {
        compute_disparity(
            &left_image,
            &right_image,
            &left_template,
            &right_template,
            &options,
        )
        .context("Failed to compute disparity")
    })?;
    info!("Processing time: {:.2?}", start.elapsed());

    write_output(&disparity, output)?;
    println!("Disparity map written to '{}'", output.display());

    if let Some(path) = ground_truth {
        let truth = read_input(path)?;
        let stats = evaluate_disparity(&disparity, &truth, bad_threshold)
            .context("Failed to score disparity")?;
        println!("Scored pixels: {}", stats.pixel_count);
        println!("  Mean absolute error: {:.4}", stats.mean_abs_error);
        println!(
            "  Bad pixels (> {}): {:.2}%",
            bad_threshold,
            100.0 * stats.bad_pixel_ratio
        );
    }
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        None => {
            println!("{}", usage());
            print!("{}", catalog_text(&AttributeRegistry::standard()));
        }
        Some(Commands::Catalog) => {
            print!("{}", catalog_text(&AttributeRegistry::standard()));
        }
        Some(Commands::Filter {
            input,
            attrib,
            lambda,
            decision,
            output,
            template,
        }) => run_filter(
            &input,
            attrib,
            lambda,
            decision,
            &output,
            template.as_deref(),
        )?,
        Some(Commands::Disparity {
            left,
            right,
            attrib,
            output,
            left_template,
            right_template,
            max_disparity,
            ground_truth,
            bad_threshold,
        }) => run_disparity(
            &left,
            &right,
            attrib,
            &output,
            left_template.as_deref(),
            right_template.as_deref(),
            max_disparity,
            ground_truth.as_deref(),
            bad_threshold,
        )?,
    }
    Ok(())
}
