use std::collections::{BTreeMap, BTreeSet};

use super::model::{Indicator, SummaryTable};

// ---------------------------------------------------------------------------
// Cross-filter queries over the summary table
// ---------------------------------------------------------------------------

/// One marker of the indicator-vs-indicator scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub airfoil: String,
    pub x: f64,
    pub y: f64,
}

/// Indicator `x` against indicator `y` for every airfoil at one alpha.
///
/// An airfoil shows up only when it has both indicators at that alpha.
/// Result is sorted by airfoil name.
pub fn scatter(table: &SummaryTable, x: Indicator, y: Indicator, alpha: f64) -> Vec<ScatterPoint> {
    let mut xs: BTreeMap<&str, f64> = BTreeMap::new();
    let mut ys: BTreeMap<&str, f64> = BTreeMap::new();

    for rec in table.records.iter().filter(|r| r.alpha == alpha) {
        if rec.indicator == x {
            xs.insert(&rec.airfoil, rec.value);
        }
        if rec.indicator == y {
            ys.insert(&rec.airfoil, rec.value);
        }
    }

    xs.into_iter()
        .filter_map(|(name, xv)| {
            ys.get(name).map(|&yv| ScatterPoint {
                airfoil: name.to_string(),
                x: xv,
                y: yv,
            })
        })
        .collect()
}

/// `(alpha, value)` pairs of one indicator for one airfoil, sorted by alpha.
pub fn series(table: &SummaryTable, airfoil: &str, indicator: Indicator) -> Vec<(f64, f64)> {
    let mut out: Vec<(f64, f64)> = table
        .records
        .iter()
        .filter(|r| r.airfoil == airfoil && r.indicator == indicator)
        .map(|r| (r.alpha, r.value))
        .collect();
    out.sort_by(|a, b| a.0.total_cmp(&b.0));
    out
}

/// Airfoils with a usable analysis: `names` minus both exclusion lists,
/// in the order of `names`.
pub fn done_airfoils(names: &[String], problematic: &[String], not_converged: &[String]) -> Vec<String> {
    let excluded: BTreeSet<&str> = problematic
        .iter()
        .chain(not_converged)
        .map(String::as_str)
        .collect();
    names
        .iter()
        .filter(|n| !excluded.contains(n.as_str()))
        .cloned()
        .collect()
}
