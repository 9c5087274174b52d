//! Batch drivers: run one stage over a whole name list.
//!
//! Every airfoil is independent. A failure is logged, recorded against the
//! airfoil's name and the batch moves on.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::config::SolverConfig;
use crate::data::normalize::normalize_file;
use crate::data::writer::save_canonical;
use crate::error::{AirfoilError, NormalizeError};
use crate::solver::PolarSolver;

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchReport<E> {
    /// Names that went through, in input order.
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, E)>,
    pub elapsed: Duration,
}

impl<E> BatchReport<E> {
    pub fn failed_names(&self) -> Vec<&str> {
        self.failed.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Normalize `raw_dir/<name>` into `out_dir/<name>` for every name.
///
/// With `workers > 1` the list is split into contiguous chunks, one scoped
/// thread each; results are stitched back in input order.
pub fn preprocess(
    names: &[String],
    raw_dir: &Path,
    out_dir: &Path,
    workers: usize,
) -> BatchReport<NormalizeError> {
    let start = Instant::now();
    let workers = workers.clamp(1, names.len().max(1));
    let chunk = names.len().div_ceil(workers).max(1);

    let results: Vec<Result<(), AirfoilError>> = if workers == 1 {
        preprocess_chunk(names, 0, names.len(), raw_dir, out_dir)
    } else {
        std::thread::scope(|s| {
            let handles: Vec<_> = names
                .chunks(chunk)
                .enumerate()
                .map(|(i, part)| {
                    s.spawn(move || preprocess_chunk(part, i * chunk, names.len(), raw_dir, out_dir))
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| match h.join() {
                    Ok(results) => results,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    };

    let mut report = BatchReport {
        succeeded: Vec::new(),
        failed: Vec::new(),
        elapsed: Duration::ZERO,
    };
    for (name, result) in names.iter().zip(results) {
        match result {
            Ok(()) => report.succeeded.push(name.clone()),
            Err(e) => report.failed.push((e.name, e.kind)),
        }
    }
    report.elapsed = start.elapsed();
    info!(
        "Preprocessed {}/{} airfoils in {:.2?}",
        report.succeeded.len(),
        report.total(),
        report.elapsed
    );
    report
}

fn preprocess_chunk(
    names: &[String],
    offset: usize,
    total: usize,
    raw_dir: &Path,
    out_dir: &Path,
) -> Vec<Result<(), AirfoilError>> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            info!("{}. Preprocessing {name} ...", offset + i + 1);
            let result = normalize_file(name, &raw_dir.join(name)).and_then(|airfoil| {
                save_canonical(&out_dir.join(name), &airfoil).map_err(|e| AirfoilError::new(name.as_str(), e))
            });
            if let Err(e) = &result {
                warn!("{e} ({} of {total})", offset + i + 1);
            }
            result
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Polar analysis
// ---------------------------------------------------------------------------

/// Run `solver` on `processed_dir/<name>`, writing `polar_dir/<name>`.
///
/// Sequential: XFOIL instances share the working directory for scratch files.
pub fn analyze<S: PolarSolver>(
    solver: &S,
    names: &[String],
    processed_dir: &Path,
    polar_dir: &Path,
    flow: &SolverConfig,
) -> BatchReport<S::E> {
    let start = Instant::now();
    let mut report = BatchReport {
        succeeded: Vec::new(),
        failed: Vec::new(),
        elapsed: Duration::ZERO,
    };

    for name in names {
        info!("Analyzing {name} ...");
        match solver.solve(&processed_dir.join(name), name, &polar_dir.join(name), flow) {
            Ok(()) => report.succeeded.push(name.clone()),
            Err(e) => {
                warn!("{name}: {e}");
                report.failed.push((name.clone(), e));
            }
        }
    }

    report.elapsed = start.elapsed();
    info!(
        "Analyzed {}/{} airfoils in {:.2?}",
        report.succeeded.len(),
        report.total(),
        report.elapsed
    );
    report
}
