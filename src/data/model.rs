use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Point – one (x, y) coordinate pair in chord fractions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// RawTable – a raw coordinate file after the header trial ladder
// ---------------------------------------------------------------------------

/// One entry of the header/footer trial ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseTrial {
    /// Raw lines skipped at the top of the file.
    pub skip_header: usize,
    /// Data lines dropped at the end of the file.
    pub skip_footer: usize,
}

impl fmt::Display for ParseTrial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skip_header={} skip_footer={}", self.skip_header, self.skip_footer)
    }
}

/// A two-column numeric table, still carrying any header artifacts
/// (NaN sentinel, point-count row) the trial ladder let through.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Point>,
    /// The trial that produced this table.
    pub trial: ParseTrial,
}

// ---------------------------------------------------------------------------
// Airfoil – canonical trailing-edge-first contour
// ---------------------------------------------------------------------------

/// Canonical coordinate sequence: trailing edge → leading edge → trailing edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Airfoil {
    /// Identifier, usually the source file name (e.g. `e1233.dat`).
    pub name: String,
    pub points: Vec<Point>,
}

impl Airfoil {
    /// Index of the leading edge (first minimum of x).
    pub fn leading_edge(&self) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.x.total_cmp(&b.x))
            .map(|(i, _)| i)
    }

    /// True when x decreases to a single minimum and then increases.
    pub fn is_unimodal(&self) -> bool {
        let Some(le) = self.leading_edge() else {
            return true;
        };
        let xs: Vec<f64> = self.points.iter().map(|p| p.x).collect();
        xs[..=le].windows(2).all(|w| w[0] >= w[1]) && xs[le..].windows(2).all(|w| w[0] <= w[1])
    }
}

// ---------------------------------------------------------------------------
// Polar data – XFOIL output
// ---------------------------------------------------------------------------

/// One converged row of an XFOIL polar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPoint {
    pub alpha: f64,
    pub cl: f64,
    pub cd: f64,
    pub cdp: f64,
    pub cm: f64,
    pub top_xtr: f64,
    pub bot_xtr: f64,
}

impl PolarPoint {
    pub fn value(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Cl => self.cl,
            Indicator::Cd => self.cd,
            Indicator::Cdp => self.cdp,
            Indicator::Cm => self.cm,
            Indicator::TopXtr => self.top_xtr,
            Indicator::BotXtr => self.bot_xtr,
            Indicator::LByD => self.cl / self.cd,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polar {
    pub name: String,
    pub points: Vec<PolarPoint>,
}

impl Polar {
    /// XFOIL leaves an empty table when no angle converged.
    pub fn is_converged(&self) -> bool {
        !self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Indicator – the quantities shown in the explorer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Indicator {
    #[serde(rename = "CL")]
    Cl,
    #[serde(rename = "CD")]
    Cd,
    #[serde(rename = "CDp")]
    Cdp,
    #[serde(rename = "CM")]
    Cm,
    #[serde(rename = "Top_Xtr")]
    TopXtr,
    #[serde(rename = "Bot_Xtr")]
    BotXtr,
    #[serde(rename = "L_by_D")]
    LByD,
}

impl Indicator {
    pub const ALL: [Indicator; 7] = [
        Indicator::Cl,
        Indicator::Cd,
        Indicator::Cdp,
        Indicator::Cm,
        Indicator::TopXtr,
        Indicator::BotXtr,
        Indicator::LByD,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Cl => "CL",
            Indicator::Cd => "CD",
            Indicator::Cdp => "CDp",
            Indicator::Cm => "CM",
            Indicator::TopXtr => "Top_Xtr",
            Indicator::BotXtr => "Bot_Xtr",
            Indicator::LByD => "L_by_D",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Indicator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Indicator::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown indicator '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// SummaryTable – long-format table read by the explorer
// ---------------------------------------------------------------------------

/// One row of `summary_all.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(rename = "Airfoil Name")]
    pub airfoil: String,
    #[serde(rename = "Alpha")]
    pub alpha: f64,
    #[serde(rename = "Indicator Name")]
    pub indicator: Indicator,
    #[serde(rename = "Value")]
    pub value: f64,
}

/// All summary records with pre-computed indices.
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    pub records: Vec<SummaryRecord>,
    /// Sorted unique airfoil names.
    pub airfoils: BTreeSet<String>,
    /// Sorted unique angles of attack.
    pub alphas: Vec<f64>,
}

impl SummaryTable {
    /// Build indices from the loaded records.
    pub fn from_records(records: Vec<SummaryRecord>) -> Self {
        let airfoils = records.iter().map(|r| r.airfoil.clone()).collect();
        let mut alphas: Vec<f64> = records.iter().map(|r| r.alpha).collect();
        alphas.sort_by(f64::total_cmp);
        alphas.dedup();
        SummaryTable {
            records,
            airfoils,
            alphas,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_airfoil(&self, name: &str) -> bool {
        self.airfoils.contains(name)
    }

    /// The available alpha closest to `alpha`.
    pub fn nearest_alpha(&self, alpha: f64) -> Option<f64> {
        self.alphas
            .iter()
            .copied()
            .min_by(|a, b| (a - alpha).abs().total_cmp(&(b - alpha).abs()))
    }
}
