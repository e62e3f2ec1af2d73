use af_catalog::Catalog;
use af_field::{ComfortReport, FieldGrid, FieldRequest};
use af_jet::{PerformanceQuery, evaluate};
use af_particles::{ParticleConfig, ParticleEngine, Projection, TickReport, project_particles};
use af_scenario::{ScenarioResult, Session};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "af")]
#[command(about = "Airflow - diffuser performance and room air distribution", long_about = None)]
struct Cli {
    /// Alternative catalog YAML (defaults to the builtin catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Log wall-clock timings of the heavy stages
    #[arg(long, global = true)]
    timing: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog models, modes and sizes
    Catalog,
    /// Evaluate one diffuser configuration
    Perf {
        #[arg(long)]
        model: String,
        #[arg(long)]
        mode: String,
        #[arg(long)]
        size: u32,
        /// Volume flow (m3/h)
        #[arg(long)]
        flow: f64,
        /// Supply air temperature (degC)
        #[arg(long, default_value_t = 20.0)]
        supply: f64,
        /// Room air temperature (degC)
        #[arg(long, default_value_t = 24.0)]
        room: f64,
        /// Mounting height (m)
        #[arg(long, default_value_t = af_jet::DEFAULT_MOUNTING_HEIGHT)]
        mounting: f64,
        /// Work-zone height (m)
        #[arg(long, default_value_t = af_jet::DEFAULT_WORKZONE_HEIGHT)]
        workzone: f64,
    },
    /// Validate a scenario file
    Validate { scenario: PathBuf },
    /// Solve the velocity/temperature slice and report comfort
    Field {
        scenario: PathBuf,
        /// Override the grid step (m)
        #[arg(long)]
        step: Option<f64>,
        /// Override the slice height (m)
        #[arg(long)]
        height: Option<f64>,
        /// Include every grid cell in the output
        #[arg(long)]
        grid: bool,
    },
    /// Read every probe of a scenario
    Probe { scenario: PathBuf },
    /// Run the tracer animation headless
    Animate {
        scenario: PathBuf,
        /// Simulated duration (s)
        #[arg(long, default_value_t = 5.0)]
        seconds: f64,
        /// Host frame rate driving the fixed-step clock
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,
        /// Projection of the final frame
        #[arg(long, value_enum)]
        view: Option<View>,
        /// Include the projected particles of the final frame
        #[arg(long)]
        frame: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Side,
    Top,
    Isometric,
}

impl From<View> for Projection {
    fn from(view: View) -> Self {
        match view {
            View::Side => Projection::Side,
            View::Top => Projection::Top,
            View::Isometric => Projection::Isometric(Default::default()),
        }
    }
}

fn main() -> ScenarioResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.timing {
        af_core::timing::enable_timing();
    }
    let catalog = Arc::new(match &cli.catalog {
        Some(path) => Catalog::from_yaml_path(path)?,
        None => Catalog::builtin()?,
    });

    match cli.command {
        Commands::Catalog => cmd_catalog(&catalog),
        Commands::Perf {
            model,
            mode,
            size,
            flow,
            supply,
            room,
            mounting,
            workzone,
        } => {
            let query = PerformanceQuery::new(model, mode, size, flow, supply, room)
                .with_heights(mounting, workzone);
            print_json(&evaluate(&catalog, &query))
        }
        Commands::Validate { scenario } => cmd_validate(catalog, &scenario),
        Commands::Field {
            scenario,
            step,
            height,
            grid,
        } => cmd_field(catalog, &scenario, step, height, grid),
        Commands::Probe { scenario } => cmd_probe(catalog, &scenario),
        Commands::Animate {
            scenario,
            seconds,
            fps,
            seed,
            view,
            frame,
        } => cmd_animate(catalog, &scenario, seconds, fps, seed, view, frame),
    }
}

fn print_json<T: Serialize>(value: &T) -> ScenarioResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open(catalog: Arc<Catalog>, path: &Path) -> ScenarioResult<Session> {
    let scenario = af_scenario::load(path, &catalog)?;
    info!(path = %path.display(), name = %scenario.name, "scenario loaded");
    Ok(Session::from_scenario(catalog, scenario))
}

fn cmd_catalog(catalog: &Catalog) -> ScenarioResult<()> {
    for model in catalog.models() {
        println!("{} - {}", model.id, model.name);
        for mode in &model.modes {
            let sizes: Vec<String> = model
                .sizes_for(&mode.id)
                .iter()
                .map(u32::to_string)
                .collect();
            println!(
                "  {:<12} {:<14} sizes: {}",
                mode.id,
                mode.flow_type.label(),
                sizes.join(", ")
            );
        }
    }
    Ok(())
}

fn cmd_validate(catalog: Arc<Catalog>, path: &Path) -> ScenarioResult<()> {
    println!("Validating scenario: {}", path.display());
    let session = open(catalog, path)?;
    let mut failed = 0;
    for d in session.diffusers() {
        if let Some(err) = &d.result().error {
            let s = &d.settings;
            println!("  ! diffuser {} ({} {} {}): {}", d.id, s.model, s.mode, s.size, err);
            failed += 1;
        }
    }
    if failed == 0 {
        println!("✓ Scenario is valid");
    } else {
        println!("Scenario loads, {failed} diffuser(s) need attention");
    }
    Ok(())
}

#[derive(Serialize)]
struct FieldOutput {
    nx: usize,
    ny: usize,
    step: f64,
    slice_height: f64,
    comfort: ComfortReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    grid: Option<FieldGrid>,
}

fn cmd_field(
    catalog: Arc<Catalog>,
    path: &Path,
    step: Option<f64>,
    height: Option<f64>,
    with_grid: bool,
) -> ScenarioResult<()> {
    let mut session = open(catalog, path)?;
    let defaults = session.view.field;
    session.view.field = FieldRequest {
        grid_step: step.unwrap_or(defaults.grid_step),
        slice_height: height.unwrap_or(defaults.slice_height),
    };
    let (grid, comfort) = session.comfort();
    print_json(&FieldOutput {
        nx: grid.nx,
        ny: grid.ny,
        step: grid.step,
        slice_height: grid.slice_height,
        comfort,
        grid: with_grid.then_some(grid),
    })
}

fn cmd_probe(catalog: Arc<Catalog>, path: &Path) -> ScenarioResult<()> {
    let session = open(catalog, path)?;
    print_json(&session.probe_samples())
}

#[derive(Serialize)]
struct AnimateOutput {
    elapsed_s: f64,
    active: usize,
    capacity: usize,
    totals: TickReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame: Option<Vec<af_particles::ProjectedParticle>>,
}

fn cmd_animate(
    catalog: Arc<Catalog>,
    path: &Path,
    seconds: f64,
    fps: f64,
    seed: Option<u64>,
    view: Option<View>,
    with_frame: bool,
) -> ScenarioResult<()> {
    let session = open(catalog, path)?;
    let mut config = ParticleConfig::default();
    if let Some(seed) = seed {
        config.seed = seed;
    }
    let mut engine = ParticleEngine::new(config);
    let scene = session.scene();

    let frame_dt = 1.0 / fps.max(1.0);
    let frames = (seconds.max(0.0) / frame_dt).round() as u64;
    let mut totals = TickReport::default();
    for _ in 0..frames {
        totals.merge(&engine.advance(frame_dt, &scene));
    }
    info!(steps = totals.steps, active = totals.active, "animation finished");

    let projection = view.map(Projection::from).unwrap_or(session.view.projection);
    print_json(&AnimateOutput {
        elapsed_s: engine.elapsed(),
        active: engine.active_count(),
        capacity: engine.capacity(),
        totals,
        frame: with_frame.then(|| project_particles(&engine, &projection, session.room())),
    })
}
