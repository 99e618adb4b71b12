use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use quadlineage::io;
use quadlineage::{Config, MissingData, QuadtreeBuilder, euclidean_distance, geodesic_distance};
use quadlineage_types::metadata::SampleMetadata;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Partition samples into spatial lineages with a quadtree
    Quadtree(QuadtreeArgs),
    /// Pairwise geodesic distances (meters) between samples
    GeodesicDistance(GeodesicArgs),
    /// Pairwise euclidean distances between samples
    EuclideanDistance(EuclideanArgs),
}

#[derive(Args, Debug)]
struct QuadtreeArgs {
    /// Tab-separated sample metadata
    #[arg(short, long)]
    metadata: PathBuf,

    #[arg(long, default_value = "latitude")]
    y_coord: String,

    #[arg(long, default_value = "longitude")]
    x_coord: String,

    /// Quadrants with at least this many samples are split again
    #[arg(short, long)]
    threshold: Option<usize>,

    #[arg(long)]
    max_depth: Option<usize>,

    /// JSON or TOML build configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the lineage table
    #[arg(long, default_value = "lineages.tsv")]
    table_output: PathBuf,

    /// Where to write the Newick tree
    #[arg(long, default_value = "tree.nwk")]
    tree_output: PathBuf,
}

#[derive(Args, Debug)]
struct GeodesicArgs {
    #[arg(short, long)]
    metadata: PathBuf,

    #[arg(long, default_value = "latitude")]
    latitude: String,

    #[arg(long, default_value = "longitude")]
    longitude: String,

    /// `error` or `ignore` samples with missing coordinates
    #[arg(long, default_value_t = MissingData::Error)]
    missing_data: MissingData,

    #[arg(short, long, default_value = "distance-matrix.tsv")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct EuclideanArgs {
    #[arg(short, long)]
    metadata: PathBuf,

    #[arg(short = 'x', long)]
    x: String,

    #[arg(short = 'y', long)]
    y: String,

    /// Optional third axis
    #[arg(short = 'z', long)]
    z: Option<String>,

    #[arg(long, default_value_t = MissingData::Error)]
    missing_data: MissingData,

    #[arg(short, long, default_value = "distance-matrix.tsv")]
    output: PathBuf,
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Config::from_toml(&text)?,
        _ => Config::from_json(&text)?,
    };
    Ok(config)
}

fn read_metadata(path: &Path) -> anyhow::Result<SampleMetadata> {
    io::read_metadata_file(path).with_context(|| format!("reading metadata {}", path.display()))
}

fn run_quadtree(args: QuadtreeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }

    let metadata = read_metadata(&args.metadata)?;
    let output = QuadtreeBuilder::new()
        .config(config)
        .columns(args.x_coord, args.y_coord)
        .build(&metadata)?;

    io::write_lineage_table_file(&output.table, &args.table_output)?;
    io::write_newick_file(&output.tree, &args.tree_output)?;
    info!(
        "Wrote {} lineages (depth {}) to {} and the tree to {}",
        output.table.len(),
        output.table.max_depth(),
        args.table_output.display(),
        args.tree_output.display()
    );
    Ok(())
}

fn run_geodesic(args: GeodesicArgs) -> anyhow::Result<()> {
    let metadata = read_metadata(&args.metadata)?;
    let matrix = geodesic_distance(&metadata, &args.latitude, &args.longitude, args.missing_data)?;
    io::write_distance_matrix_file(&matrix, &args.output)?;
    info!(
        "Wrote {}x{} geodesic distance matrix to {}",
        matrix.len(),
        matrix.len(),
        args.output.display()
    );
    Ok(())
}

fn run_euclidean(args: EuclideanArgs) -> anyhow::Result<()> {
    let metadata = read_metadata(&args.metadata)?;
    let matrix = euclidean_distance(
        &metadata,
        &args.x,
        &args.y,
        args.z.as_deref(),
        args.missing_data,
    )?;
    io::write_distance_matrix_file(&matrix, &args.output)?;
    info!(
        "Wrote {}x{} euclidean distance matrix to {}",
        matrix.len(),
        matrix.len(),
        args.output.display()
    );
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Quadtree(args) => run_quadtree(args),
        Command::GeodesicDistance(args) => run_geodesic(args),
        Command::EuclideanDistance(args) => run_euclidean(args),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quadlineage=info,info".into()),
        )
        .init();

    run(Cli::parse())
}
