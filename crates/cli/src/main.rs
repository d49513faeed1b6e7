//! distweight CLI - geodesic distances and distance-weighted aggregation

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use distweight_algorithms::distance::{
    dist_1to1, dist_1tom, dist_mtom, dist_paired, DistanceFunction,
};
use distweight_algorithms::interpolation::{
    dist_min, dist_weighted_mean, inverse_value, popdist_weighted_mean, MinDistanceParams,
    WeightTransform, WeightedMeanParams, DEFAULT_DECAY,
};
use distweight_core::io::{
    read_column_csv, read_coordinates_csv, read_query_csv, read_reference_csv, write_matrix,
    write_table, write_vector, ColumnNames,
};
use distweight_core::{AggregationTable, Coordinate};
use distweight_parallel::set_num_threads;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "distweight")]
#[command(author, version, about = "Geodesic distances and distance-weighted aggregation", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Worker threads (default: all cores)
    #[arg(short = 'j', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

/// Header names of the input columns
#[derive(Args)]
struct ColumnArgs {
    /// Identifier column
    #[arg(long, default_value = "id")]
    id_col: String,
    /// Longitude column
    #[arg(long, default_value = "lon")]
    lon_col: String,
    /// Latitude column
    #[arg(long, default_value = "lat")]
    lat_col: String,
    /// Population column
    #[arg(long, default_value = "pop")]
    pop_col: String,
}

impl From<ColumnArgs> for ColumnNames {
    fn from(c: ColumnArgs) -> Self {
        ColumnNames {
            id: c.id_col,
            lon: c.lon_col,
            lat: c.lat_col,
            pop: c.pop_col,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Distance in meters between two points
    Distance {
        /// First point as lon,lat
        #[arg(allow_hyphen_values = true, value_parser = parse_point)]
        from: Coordinate,
        /// Second point as lon,lat
        #[arg(allow_hyphen_values = true, value_parser = parse_point)]
        to: Coordinate,
        /// Distance function: Haversine, Vincenty
        #[arg(short, long, default_value = "Haversine")]
        function: String,
    },
    /// Distances from one point to every point of a CSV table
    OneToMany {
        /// Origin as lon,lat
        #[arg(allow_hyphen_values = true, value_parser = parse_point)]
        point: Coordinate,
        /// Input CSV with lon/lat columns
        input: PathBuf,
        /// Output CSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Distance function: Haversine, Vincenty
        #[arg(short, long, default_value = "Haversine")]
        function: String,
        #[command(flatten)]
        columns: ColumnArgs,
    },
    /// Row-by-row distances between two CSV tables of equal length
    Paired {
        /// First CSV
        x: PathBuf,
        /// Second CSV
        y: PathBuf,
        /// Output CSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Distance function: Haversine, Vincenty
        #[arg(short, long, default_value = "Haversine")]
        function: String,
        #[command(flatten)]
        columns: ColumnArgs,
    },
    /// Distance matrix between two CSV tables
    Matrix {
        /// Row points CSV
        x: PathBuf,
        /// Column points CSV
        y: PathBuf,
        /// Output CSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Distance function: Haversine, Vincenty
        #[arg(short, long, default_value = "Haversine")]
        function: String,
        #[command(flatten)]
        columns: ColumnArgs,
    },
    /// Turn a column of distances into inverse-distance weights
    Transform {
        /// Input CSV
        input: PathBuf,
        /// Column holding distances in meters
        #[arg(short, long, default_value = "distance")]
        column: String,
        /// Output CSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Distance decay exponent
        #[arg(short, long, default_value_t = DEFAULT_DECAY)]
        decay: f64,
        /// Weight transform: level, log
        #[arg(short, long, default_value = "level")]
        transform: String,
    },
    /// Inverse-distance weighted mean of a measure at query points
    WeightedMean {
        /// Query points CSV (id, lon, lat)
        query: PathBuf,
        /// Reference points CSV (lon, lat, measure and optionally pop)
        reference: PathBuf,
        /// Measure column of the reference table
        #[arg(short, long)]
        measure: String,
        /// Also weight by the reference population column
        #[arg(long)]
        pop: bool,
        /// Output CSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Distance function: Haversine, Vincenty
        #[arg(short, long, default_value = "Haversine")]
        function: String,
        /// Weight transform: level, log
        #[arg(short, long, default_value = "level")]
        transform: String,
        /// Distance decay exponent
        #[arg(short, long, default_value_t = DEFAULT_DECAY)]
        decay: f64,
        /// Reference points within this distance (m) count as measured at the query point
        #[arg(long, default_value = "0")]
        snap_distance: f64,
        #[command(flatten)]
        columns: ColumnArgs,
    },
    /// Distance from each query point to the closest reference point
    MinDist {
        /// Query points CSV (id, lon, lat)
        query: PathBuf,
        /// Reference points CSV (lon, lat)
        reference: PathBuf,
        /// Output CSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Distance function: Haversine, Vincenty
        #[arg(short, long, default_value = "Haversine")]
        function: String,
        #[command(flatten)]
        columns: ColumnArgs,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn parse_point(s: &str) -> Result<Coordinate> {
    let (lon, lat) = s
        .split_once(',')
        .with_context(|| format!("Expected lon,lat but got '{}'", s))?;
    let lon: f64 = lon.trim().parse().with_context(|| format!("Invalid longitude: {}", lon))?;
    let lat: f64 = lat.trim().parse().with_context(|| format!("Invalid latitude: {}", lat))?;
    Ok(Coordinate::new(lon, lat))
}

fn parse_function(name: &str) -> Result<DistanceFunction> {
    match name.parse() {
        Ok(f) => Ok(f),
        Err(_) => anyhow::bail!("Unknown distance function: {}. Use Haversine or Vincenty.", name),
    }
}

fn parse_transform(name: &str) -> Result<WeightTransform> {
    match name.parse() {
        Ok(t) => Ok(t),
        Err(_) => anyhow::bail!("Unknown transform: {}. Use level or log.", name),
    }
}

/// Output file, or stdout when no path is given
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file: {}", p.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    })
}

fn write_result(table: &AggregationTable, path: Option<&Path>) -> Result<()> {
    let pb = spinner("Writing output...");
    write_table(open_output(path)?, table).context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: Option<&Path>, elapsed: std::time::Duration) {
    match path {
        Some(p) => {
            println!("{} saved to: {}", name, p.display());
            println!("  Processing time: {:.2?}", elapsed);
        }
        None => info!("{} processing time: {:.2?}", name, elapsed),
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    if let Some(threads) = cli.threads {
        if threads == 0 {
            anyhow::bail!("--threads must be at least 1");
        }
        set_num_threads(threads);
    }

    match cli.command {
        Commands::Distance { from, to, function } => {
            let fun = parse_function(&function)?;
            let d = dist_1to1(from, to, fun);
            println!("{}", d);
        }

        Commands::OneToMany {
            point,
            input,
            output,
            function,
            columns,
        } => {
            let fun = parse_function(&function)?;
            let y = read_coordinates_csv(&input, &columns.into())
                .context("Failed to read input table")?;
            info!("Input: {} points", y.len());
            let start = Instant::now();
            let d = dist_1tom(point, &y, fun);
            let elapsed = start.elapsed();
            write_vector(open_output(output.as_deref())?, "distance", &d)
                .context("Failed to write output")?;
            done("Distances", output.as_deref(), elapsed);
        }

        Commands::Paired {
            x,
            y,
            output,
            function,
            columns,
        } => {
            let fun = parse_function(&function)?;
            let columns: ColumnNames = columns.into();
            let x = read_coordinates_csv(&x, &columns).context("Failed to read first table")?;
            let y = read_coordinates_csv(&y, &columns).context("Failed to read second table")?;
            let start = Instant::now();
            let d = dist_paired(&x, &y, fun).context("Failed to compute paired distances")?;
            let elapsed = start.elapsed();
            write_vector(open_output(output.as_deref())?, "distance", &d)
                .context("Failed to write output")?;
            done("Distances", output.as_deref(), elapsed);
        }

        Commands::Matrix {
            x,
            y,
            output,
            function,
            columns,
        } => {
            let fun = parse_function(&function)?;
            let columns: ColumnNames = columns.into();
            let x = read_coordinates_csv(&x, &columns).context("Failed to read row table")?;
            let y = read_coordinates_csv(&y, &columns).context("Failed to read column table")?;
            info!("Matrix: {} x {}", x.len(), y.len());
            let pb = spinner("Computing distance matrix...");
            let start = Instant::now();
            let m = dist_mtom(&x, &y, fun).context("Failed to compute distance matrix")?;
            let elapsed = start.elapsed();
            pb.finish_and_clear();
            write_matrix(open_output(output.as_deref())?, &m).context("Failed to write output")?;
            done("Distance matrix", output.as_deref(), elapsed);
        }

        Commands::Transform {
            input,
            column,
            output,
            decay,
            transform,
        } => {
            let transform = parse_transform(&transform)?;
            let d = read_column_csv(&input, &column).context("Failed to read distances")?;
            let start = Instant::now();
            let w = inverse_value(&d, decay, transform).context("Failed to compute weights")?;
            let elapsed = start.elapsed();
            write_vector(open_output(output.as_deref())?, "weight", &w)
                .context("Failed to write output")?;
            done("Weights", output.as_deref(), elapsed);
        }

        Commands::WeightedMean {
            query,
            reference,
            measure,
            pop,
            output,
            function,
            transform,
            decay,
            snap_distance,
            columns,
        } => {
            let params = WeightedMeanParams {
                dist_function: parse_function(&function)?,
                transform: parse_transform(&transform)?,
                decay,
                snap_distance,
                ..Default::default()
            };
            let columns: ColumnNames = columns.into();
            let q = read_query_csv(&query, &columns).context("Failed to read query points")?;
            let r = read_reference_csv(&reference, &columns, Some(&measure), pop)
                .context("Failed to read reference points")?;
            info!("Query: {} points, reference: {} points", q.len(), r.len());

            let pb = spinner("Computing weighted mean...");
            let start = Instant::now();
            let result = if pop {
                popdist_weighted_mean(&q, &r, &params)
            } else {
                dist_weighted_mean(&q, &r, &params)
            }
            .context("Failed to compute weighted mean")?;
            let elapsed = start.elapsed();
            pb.finish_and_clear();

            write_result(&result, output.as_deref())?;
            done("Weighted mean", output.as_deref(), elapsed);
        }

        Commands::MinDist {
            query,
            reference,
            output,
            function,
            columns,
        } => {
            let params = MinDistanceParams {
                dist_function: parse_function(&function)?,
                ..Default::default()
            };
            let columns: ColumnNames = columns.into();
            let q = read_query_csv(&query, &columns).context("Failed to read query points")?;
            let r = read_reference_csv(&reference, &columns, None, false)
                .context("Failed to read reference points")?;
            info!("Query: {} points, reference: {} points", q.len(), r.len());

            let pb = spinner("Computing minimum distance...");
            let start = Instant::now();
            let result = dist_min(&q, &r, &params).context("Failed to compute minimum distance")?;
            let elapsed = start.elapsed();
            pb.finish_and_clear();

            write_result(&result, output.as_deref())?;
            done("Minimum distance", output.as_deref(), elapsed);
        }
    }

    Ok(())
}
