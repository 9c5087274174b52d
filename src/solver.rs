//! Wrapper for [XFOIL](https://web.mit.edu/drela/Public/web/xfoil/), the
//! subsonic airfoil panel code.
//!
//! XFOIL is driven the way it is used interactively: a command script is
//! piped to its stdin and the polar accumulation file (`PACC`) it writes is
//! picked up afterwards by [crate::summary]. The `xfoil` executable must be
//! on `PATH` or configured as `solver.executable`.

use std::error::Error;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::trace;

use crate::config::SolverConfig;
use crate::error::SolverError;

/// Polar Solver Trait
pub trait PolarSolver {
    type E: Error;

    /// Analyze the canonical contour at `geometry` and leave the polar at
    /// `polar_out`.
    fn solve(
        &self,
        geometry: &Path,
        name: &str,
        polar_out: &Path,
        flow: &SolverConfig,
    ) -> Result<(), Self::E>;
}

/// XFOIL solver wrapper
pub struct XfoilSolver {
    executable: PathBuf,
}

impl XfoilSolver {
    /// Does not check the executable; a missing one surfaces on the first
    /// [PolarSolver::solve] as [SolverError::NotFound].
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Command script for one airfoil: load, repanel, viscous run at the
    /// configured Re/Mach, accumulate an alpha sweep into `polar_out`.
    pub fn script(geometry: &Path, name: &str, polar_out: &Path, flow: &SolverConfig) -> String {
        format!(
            "LOAD {geometry}\n\
             {name}\n\
             PANE\n\
             OPER\n\
             Visc {re}\n\
             Mach {mach}\n\
             PACC\n\
             {polar}\n\
             \n\
             Iter {iter}\n\
             ASeq {a0} {a1} {da}\n\
             \n\
             quit\n",
            geometry = geometry.display(),
            polar = polar_out.display(),
            re = flow.reynolds,
            mach = flow.mach,
            iter = flow.iterations,
            a0 = flow.alpha_start,
            a1 = flow.alpha_end,
            da = flow.alpha_step,
        )
    }
}

impl PolarSolver for XfoilSolver {
    type E = SolverError;

    fn solve(
        &self,
        geometry: &Path,
        name: &str,
        polar_out: &Path,
        flow: &SolverConfig,
    ) -> Result<(), SolverError> {
        // PACC appends to an existing polar
        if polar_out.exists() {
            std::fs::remove_file(polar_out)?;
        }

        let mut child = Command::new(&self.executable)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SolverError::NotFound(self.executable.display().to_string()),
                _ => SolverError::Io(e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(Self::script(geometry, name, polar_out, flow).as_bytes())?;
        }

        let output = child.wait_with_output()?;
        trace!(
            "{name}: xfoil wrote {} lines to stdout",
            output.stdout.split(|&b| b == b'\n').count()
        );

        if !output.status.success() {
            return Err(SolverError::Failed(output.status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_script() {
        let flow = SolverConfig::default();
        let script = XfoilSolver::script(
            Path::new("processed_coordinates/e1233.dat"),
            "e1233.dat",
            Path::new("polar_data/e1233.dat"),
            &flow,
        );
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(
            lines,
            vec![
                "LOAD processed_coordinates/e1233.dat",
                "e1233.dat",
                "PANE",
                "OPER",
                "Visc 3500000",
                "Mach 0.117",
                "PACC",
                "polar_data/e1233.dat",
                "",
                "Iter 100",
                "ASeq 0 10 0.5",
                "",
                "quit",
            ]
        );
    }

    #[test]
    fn test_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let solver = XfoilSolver::new(dir.path().join("no-such-xfoil"));
        let err = solver
            .solve(
                &dir.path().join("a.dat"),
                "a.dat",
                &dir.path().join("polar"),
                &SolverConfig::default(),
            )
            .unwrap_err();
        assert!(matches!(err, SolverError::NotFound(_)));
    }
}
