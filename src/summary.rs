//! Polar files → long-format summary table.

use std::path::Path;

use log::{debug, info, warn};

use crate::data::loader::read_polar;
use crate::data::model::{Indicator, Polar, SummaryRecord};

/// Summary records plus the airfoils that could not contribute.
#[derive(Debug, Default)]
pub struct Summary {
    pub records: Vec<SummaryRecord>,
    /// Polar missing or unreadable.
    pub problematic: Vec<String>,
    /// Polar present but no angle converged.
    pub not_converged: Vec<String>,
}

/// Read `polar_dir/<name>` for every name and flatten the converged rows.
pub fn build_summary(names: &[String], polar_dir: &Path) -> Summary {
    let mut summary = Summary::default();

    for name in names {
        match read_polar(&polar_dir.join(name), name) {
            Ok(polar) if polar.is_converged() => {
                debug!("{name}: {} converged angles", polar.points.len());
                summary.records.extend(records_for(&polar));
            }
            Ok(_) => {
                warn!("{name}: empty polar, not converged");
                summary.not_converged.push(name.clone());
            }
            Err(e) => {
                warn!("{e:#}");
                summary.problematic.push(name.clone());
            }
        }
    }

    info!(
        "Summarized {} airfoils ({} records), {} not converged, {} problematic",
        names.len() - summary.not_converged.len() - summary.problematic.len(),
        summary.records.len(),
        summary.not_converged.len(),
        summary.problematic.len()
    );
    summary
}

/// One record per indicator per polar row.
pub fn records_for(polar: &Polar) -> impl Iterator<Item = SummaryRecord> + '_ {
    polar.points.iter().flat_map(move |p| {
        Indicator::ALL.into_iter().map(move |indicator| SummaryRecord {
            airfoil: polar.name.clone(),
            alpha: p.alpha,
            indicator,
            value: p.value(indicator),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const POLAR: &str = "\
 Calculated polar for: test

  alpha    CL        CD       CDp       CM     Top_Xtr  Bot_Xtr
 ------ -------- --------- --------- -------- -------- --------
   0.000   0.2000   0.00500   0.00100  -0.0500   0.6000   0.9000
   1.000   0.3000   0.00600   0.00120  -0.0510   0.5800   0.9500
";

    #[test]
    fn sorts_airfoils_into_buckets() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.dat"), POLAR).unwrap();
        fs::write(dir.path().join("empty.dat"), "  alpha CL\n ------ --\n").unwrap();
        let names: Vec<String> = ["ok.dat", "empty.dat", "gone.dat"].iter().map(|s| s.to_string()).collect();

        let summary = build_summary(&names, dir.path());
        assert_eq!(summary.records.len(), 2 * Indicator::ALL.len());
        assert_eq!(summary.not_converged, vec!["empty.dat"]);
        assert_eq!(summary.problematic, vec!["gone.dat"]);
    }

    #[test]
    fn lift_to_drag_is_derived() {
        let polar = crate::data::loader::parse_polar(POLAR, "t.dat").unwrap();
        let ld: Vec<f64> = records_for(&polar)
            .filter(|r| r.indicator == Indicator::LByD)
            .map(|r| r.value)
            .collect();
        assert_eq!(ld.len(), 2);
        assert!((ld[0] - 40.0).abs() < 1e-9);
        assert!((ld[1] - 50.0).abs() < 1e-9);
    }
}
