use crate::data::filter::{scatter, series, ScatterPoint};
use crate::data::model::{Indicator, SummaryTable};

// ---------------------------------------------------------------------------
// Explorer state
// ---------------------------------------------------------------------------

/// Cross-filter selections, independent of any rendering.
pub struct ExplorerState {
    pub table: SummaryTable,

    /// Indicator on the scatter's x axis.
    pub x_indicator: Indicator,

    /// Indicator on the scatter's y axis.
    pub y_indicator: Indicator,

    /// Angle of attack, always one present in the table (if any).
    pub alpha: f64,

    /// Highlighted airfoil.
    pub candidate: Option<String>,

    /// Scatter for the current selections (cached).
    pub visible: Vec<ScatterPoint>,
}

impl ExplorerState {
    /// Defaults: CL vs L/D at the alpha nearest 0.
    pub fn new(table: SummaryTable) -> Self {
        let alpha = table.nearest_alpha(0.0).unwrap_or(0.0);
        let candidate = table.airfoils.iter().next().cloned();
        let mut state = Self {
            table,
            x_indicator: Indicator::Cl,
            y_indicator: Indicator::LByD,
            alpha,
            candidate,
            visible: Vec::new(),
        };
        state.refilter();
        state
    }

    /// Recompute `visible` after a selection change.
    pub fn refilter(&mut self) {
        self.visible = scatter(&self.table, self.x_indicator, self.y_indicator, self.alpha);
    }

    pub fn set_axes(&mut self, x: Indicator, y: Indicator) {
        self.x_indicator = x;
        self.y_indicator = y;
        self.refilter();
    }

    /// Snap to the nearest alpha the table has.
    pub fn set_alpha(&mut self, alpha: f64) {
        if let Some(a) = self.table.nearest_alpha(alpha) {
            self.alpha = a;
        }
        self.refilter();
    }

    /// Select a candidate; unknown names are ignored. Returns whether the
    /// selection changed.
    pub fn select(&mut self, airfoil: &str) -> bool {
        if !self.table.contains_airfoil(airfoil) {
            return false;
        }
        self.candidate = Some(airfoil.to_string());
        true
    }

    /// The candidate's marker in the current scatter.
    pub fn candidate_point(&self) -> Option<&ScatterPoint> {
        let name = self.candidate.as_deref()?;
        self.visible.iter().find(|p| p.airfoil == name)
    }

    /// The candidate's x-axis and y-axis indicators against alpha.
    pub fn candidate_series(&self) -> Option<(Vec<(f64, f64)>, Vec<(f64, f64)>)> {
        let name = self.candidate.as_deref()?;
        Some((
            series(&self.table, name, self.x_indicator),
            series(&self.table, name, self.y_indicator),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SummaryRecord;

    fn table() -> SummaryTable {
        let mut records = Vec::new();
        for (name, scale) in [("a.dat", 1.0), ("b.dat", 2.0)] {
            for alpha in [-2.0, 0.0, 0.5] {
                for indicator in Indicator::ALL {
                    records.push(SummaryRecord {
                        airfoil: name.into(),
                        alpha,
                        indicator,
                        value: scale * (alpha + 3.0),
                    });
                }
            }
        }
        SummaryTable::from_records(records)
    }

    #[test]
    fn defaults_to_cl_vs_ld_at_zero() {
        let state = ExplorerState::new(table());
        assert_eq!(state.alpha, 0.0);
        assert_eq!(state.x_indicator, Indicator::Cl);
        assert_eq!(state.y_indicator, Indicator::LByD);
        assert_eq!(state.visible.len(), 2);
        assert_eq!(state.candidate.as_deref(), Some("a.dat"));
    }

    #[test]
    fn alpha_snaps_to_table() {
        let mut state = ExplorerState::new(table());
        state.set_alpha(0.4);
        assert_eq!(state.alpha, 0.5);
        assert_eq!(state.visible[1].x, 7.0);
    }

    #[test]
    fn candidate_selection() {
        let mut state = ExplorerState::new(table());
        assert!(!state.select("nope.dat"));
        assert!(state.select("b.dat"));
        assert_eq!(state.candidate_point().map(|p| p.y), Some(6.0));
        let (xs, ys) = state.candidate_series().unwrap();
        assert_eq!(xs.len(), 3);
        assert_eq!(ys[0], (-2.0, 2.0));
    }
}
