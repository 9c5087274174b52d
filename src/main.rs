use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use uiuc_airfoils::batch;
use uiuc_airfoils::config::Config;
use uiuc_airfoils::data::filter::done_airfoils;
use uiuc_airfoils::data::loader::{load_summary, read_canonical, read_names, read_names_or_empty};
use uiuc_airfoils::data::model::Indicator;
use uiuc_airfoils::data::normalize::normalize_file;
use uiuc_airfoils::data::writer::{write_canonical, write_names, write_summary};
use uiuc_airfoils::solver::XfoilSolver;
use uiuc_airfoils::state::ExplorerState;
use uiuc_airfoils::summary::build_summary;

/// UIUC airfoil database pipeline
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Airfoil name list (overrides config)
    #[arg(short, long, global = true)]
    names: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Normalize raw coordinate files into solver order
    Preprocess {
        /// Worker threads (overrides config)
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// Normalize one raw file and print it
    Normalize {
        file: PathBuf,
    },
    /// Run XFOIL for every preprocessed airfoil
    Analyze {
        /// XFOIL executable (overrides config)
        #[arg(long)]
        xfoil: Option<PathBuf>,
    },
    /// Collect polars into the summary table
    Summarize {
        /// Output file, .csv / .json / .parquet (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Indicator vs indicator for all airfoils at one alpha
    Scatter {
        #[arg(short, default_value = "CL")]
        x: Indicator,
        #[arg(short, default_value = "L_by_D")]
        y: Indicator,
        #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
        alpha: f64,
    },
    /// One airfoil's indicator against alpha
    Series {
        airfoil: String,
        #[arg(short, long, default_value = "CL")]
        indicator: Indicator,
    },
    /// Print an airfoil's processed coordinates
    Geometry {
        airfoil: String,
    },
    /// List airfoils with a usable analysis
    Done,
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(names) = &args.names {
        config.names_path = names.clone();
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    match args.command {
        Cmd::Preprocess { workers } => {
            if let Some(w) = workers {
                config.workers = w;
            }
            preprocess(&config)
        }
        Cmd::Normalize { file } => {
            let name = file_name(&file)?;
            let airfoil = normalize_file(&name, &file)?;
            write_canonical(io::stdout().lock(), &airfoil)?;
            Ok(())
        }
        Cmd::Analyze { xfoil } => {
            if let Some(exe) = xfoil {
                config.solver.executable = exe;
            }
            analyze(&config)
        }
        Cmd::Summarize { output } => {
            if let Some(out) = output {
                config.summary_path = out;
            }
            summarize(&config)
        }
        Cmd::Scatter { x, y, alpha } => {
            let mut state = ExplorerState::new(load_summary(&config.summary_path)?);
            state.set_axes(x, y);
            state.set_alpha(alpha);
            info!("{} airfoils at alpha = {}", state.visible.len(), state.alpha);

            let mut out = csv::Writer::from_writer(io::stdout().lock());
            out.write_record(["Airfoil Name", x.as_str(), y.as_str()])?;
            for p in &state.visible {
                out.write_record([p.airfoil.clone(), p.x.to_string(), p.y.to_string()])?;
            }
            out.flush()?;
            Ok(())
        }
        Cmd::Series { airfoil, indicator } => {
            let mut state = ExplorerState::new(load_summary(&config.summary_path)?);
            if !state.select(&airfoil) {
                bail!("{airfoil} is not in {}", config.summary_path.display());
            }
            state.set_axes(indicator, indicator);
            let (points, _) = state.candidate_series().unwrap_or_default();

            let mut out = csv::Writer::from_writer(io::stdout().lock());
            out.write_record(["Alpha", indicator.as_str()])?;
            for (alpha, value) in points {
                out.write_record([alpha.to_string(), value.to_string()])?;
            }
            out.flush()?;
            Ok(())
        }
        Cmd::Geometry { airfoil } => {
            let path = config.processed_dir.join(&airfoil);
            let geometry = read_canonical(&path, &airfoil)?;
            write_canonical(io::stdout().lock(), &geometry)?;
            Ok(())
        }
        Cmd::Done => {
            let names = read_names(&config.names_path)?;
            let problematic = read_names_or_empty(&config.problematic_path)?;
            let not_converged = read_names_or_empty(&config.not_converged_path)?;
            for name in done_airfoils(&names, &problematic, &not_converged) {
                println!("{name}");
            }
            Ok(())
        }
        Cmd::Config => {
            println!("{}", config.to_json()?);
            Ok(())
        }
    }
}

fn preprocess(config: &Config) -> Result<()> {
    let names = read_names(&config.names_path)?;
    create_dir(&config.processed_dir)?;

    let report = batch::preprocess(&names, &config.coordinate_dir, &config.processed_dir, config.workers);
    for (name, e) in &report.failed {
        eprintln!("{name}: {e}");
    }
    create_parent(&config.problematic_path)?;
    write_names(&config.problematic_path, &report.failed_names())?;
    info!(
        "{} failures listed in {}",
        report.failed.len(),
        config.problematic_path.display()
    );
    Ok(())
}

fn analyze(config: &Config) -> Result<()> {
    let names = read_names(&config.names_path)?;
    let problematic = read_names_or_empty(&config.problematic_path)?;
    let todo = done_airfoils(&names, &problematic, &[]);
    create_dir(&config.polar_dir)?;

    let solver = XfoilSolver::new(&config.solver.executable);
    let report = batch::analyze(&solver, &todo, &config.processed_dir, &config.polar_dir, &config.solver);
    for (name, e) in &report.failed {
        eprintln!("{name}: {e}");
    }
    Ok(())
}

fn summarize(config: &Config) -> Result<()> {
    let names = read_names(&config.names_path)?;
    let mut problematic: BTreeSet<String> = read_names_or_empty(&config.problematic_path)?
        .into_iter()
        .collect();
    let todo = done_airfoils(&names, &problematic.iter().cloned().collect::<Vec<_>>(), &[]);

    let summary = build_summary(&todo, &config.polar_dir);
    problematic.extend(summary.problematic.iter().cloned());

    create_parent(&config.summary_path)?;
    write_summary(&config.summary_path, &summary.records)?;
    create_parent(&config.not_converged_path)?;
    write_names(&config.not_converged_path, &summary.not_converged)?;
    write_names(&config.problematic_path, &problematic.into_iter().collect::<Vec<_>>())?;
    info!("Wrote {}", config.summary_path.display());
    Ok(())
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("{} has no file name", path.display()))
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir(parent),
        _ => Ok(()),
    }
}
