use av_core::FieldSpec;
use av_dataset::{Axis, Dataset, DatasetError, FieldOrigin};
use av_params::{ParamsError, PlotParams, load_config, load_params_json, load_params_yaml};
use av_plot::{Planner, PlotError, PlotKind, PlotRequest};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error("Failed to serialize plan: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "av-cli")]
#[command(about = "amrviz CLI - inspect AMR snapshots and resolve plot configurations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List native and derived fields of a snapshot
    Fields {
        /// Path to the snapshot description (YAML)
        snapshot: PathBuf,
    },
    /// Print a short dataset summary
    Info {
        /// Path to the snapshot description (YAML)
        snapshot: PathBuf,
        /// Global plot configuration (YAML), for the particle type catalogue
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Resolve a plot request and print the plan as YAML
    Resolve {
        /// Path to the snapshot description (YAML)
        snapshot: PathBuf,
        /// Plot kind: slice|slc, projection|prj, volume|vol
        #[arg(long, default_value = "slice")]
        kind: String,
        /// Principal axis: x, y or z
        #[arg(long, default_value = "z")]
        axis: Axis,
        /// Field, e.g. density or gas:density
        #[arg(long)]
        field: String,
        /// Projection weight field ("None" for an unweighted projection)
        #[arg(long)]
        weight: Option<String>,
        /// Slice coordinate along the axis (code length)
        #[arg(long)]
        coord: Option<f64>,
        /// Plot parameters file (YAML, or JSON with a .json extension)
        #[arg(long)]
        params: Option<PathBuf>,
        /// Global plot configuration (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fields { snapshot } => cmd_fields(&snapshot),
        Commands::Info { snapshot, config } => cmd_info(&snapshot, config.as_deref()),
        Commands::Resolve {
            snapshot,
            kind,
            axis,
            field,
            weight,
            coord,
            params,
            config,
        } => cmd_resolve(
            &snapshot,
            &kind,
            axis,
            &field,
            weight,
            coord,
            params.as_deref(),
            config.as_deref(),
        ),
    }
}

fn cmd_fields(snapshot: &Path) -> CliResult<()> {
    let dataset = Dataset::open(snapshot)?;
    for entry in dataset.catalog().entries() {
        match entry.origin {
            FieldOrigin::Native => println!("  {}", entry.id),
            FieldOrigin::Derived(derived) => {
                println!("  {} (derived: {})", entry.id, derived.display_name())
            }
        }
    }
    Ok(())
}

fn cmd_info(snapshot: &Path, config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let dataset = Dataset::open(snapshot)?;
    println!("{}", dataset.summary());

    let thermo = dataset.thermo();
    println!(
        "  Gas: gamma = {:.4}, mu = {}",
        thermo.gamma, thermo.mean_molecular_weight
    );

    println!("  Particles:");
    for ptype in config.particle_types_with_suffix() {
        match dataset.particle_count(&ptype) {
            Some(count) => println!("    {ptype}: {count}"),
            None => println!("    {ptype}: absent"),
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_resolve(
    snapshot: &Path,
    kind: &str,
    axis: Axis,
    field: &str,
    weight: Option<String>,
    coord: Option<f64>,
    params_path: Option<&Path>,
    config_path: Option<&Path>,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let params = match params_path {
        Some(path) if path.extension().is_some_and(|ext| ext == "json") => load_params_json(path)?,
        Some(path) => load_params_yaml(path)?,
        None => PlotParams::from_config(&config),
    };
    debug!(?params, "plot parameters");

    let dataset = Dataset::open(snapshot)?;
    let kind: PlotKind = kind.parse()?;
    let mut request = PlotRequest::new(kind, axis, field).with_params(params);
    request.weight_field = weight.map(FieldSpec::from);
    request.coord = coord;

    let plan = Planner::new(&dataset, &config).plan(&request)?;
    print!("{}", serde_yaml::to_string(&plan)?);
    Ok(())
}
