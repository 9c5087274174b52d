use thiserror::Error;

/// Why a single coordinate file could not be normalized.
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// No entry of the trial ladder produced a two-column numeric table.
    #[error("not a two-column numeric table under any header/footer trial")]
    Format,
    /// A leading-edge-first file without exactly one break in x.
    #[error("leading-edge-first contour has {descents} x-descents, expected exactly 1")]
    DegenerateGeometry { descents: usize },
    #[error("no coordinates left after stripping header artifacts")]
    Empty,
}

/// A [NormalizeError] tagged with the airfoil it came from.
#[derive(Error, Debug)]
#[error("{name}: {kind}")]
pub struct AirfoilError {
    pub name: String,
    #[source]
    pub kind: NormalizeError,
}

impl AirfoilError {
    pub fn new(name: impl Into<String>, kind: impl Into<NormalizeError>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// Errors from driving the external polar solver.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("solver executable '{0}' could not be started")]
    NotFound(String),
    #[error("solver exited with {0}")]
    Failed(std::process::ExitStatus),
}
