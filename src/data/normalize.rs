//! Coordinate normalization: raw coordinate file → canonical contour.
//!
//! The panel solver wants one closed contour starting at the trailing edge,
//! running over one surface to the leading edge and back along the other.
//! Database files come either that way already (Selig layout) or as two
//! leading-edge-first surfaces (Lednicer layout), with assorted headers.

use std::io::Read;
use std::path::Path;

use log::debug;

use super::loader::{parse_raw_table, read_raw_table};
use super::model::{Airfoil, Point, RawTable};
use crate::error::{AirfoilError, NormalizeError};

/// First x below this means the file starts at the leading edge.
pub const LEADING_EDGE_X: f64 = 0.1;

/// Normalize an already parsed table.
pub fn normalize_table(name: &str, table: RawTable) -> Result<Airfoil, NormalizeError> {
    debug!("{name}: parsed with {}", table.trial);
    let points = strip_artifacts(table.rows);
    if points.is_empty() {
        return Err(NormalizeError::Empty);
    }
    Ok(Airfoil {
        name: name.to_string(),
        points: reorder(points)?,
    })
}

/// Normalize raw file contents.
pub fn normalize_str(name: &str, text: &str) -> Result<Airfoil, AirfoilError> {
    parse_raw_table(text)
        .and_then(|table| normalize_table(name, table))
        .map_err(|e| AirfoilError::new(name, e))
}

/// Normalize a raw byte stream. Non UTF-8 header bytes are tolerated.
pub fn normalize_reader<R: Read>(name: &str, mut reader: R) -> Result<Airfoil, AirfoilError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| AirfoilError::new(name, e))?;
    normalize_str(name, &String::from_utf8_lossy(&bytes))
}

/// Normalize the raw coordinate file at `path`.
pub fn normalize_file(name: &str, path: &Path) -> Result<Airfoil, AirfoilError> {
    read_raw_table(path)
        .and_then(|table| normalize_table(name, table))
        .map_err(|e| AirfoilError::new(name, e))
}

/// Drop a leading NaN sentinel row, then a leading point-count row.
pub fn strip_artifacts(mut rows: Vec<Point>) -> Vec<Point> {
    let mut start = 0;
    if rows.first().is_some_and(|p| p.x.is_nan()) {
        start += 1;
    }
    // x > 1 can't be a chord fraction, it's the count line of a Lednicer header
    if rows.get(start).is_some_and(|p| p.x > 1.0) {
        start += 1;
    }
    rows.drain(..start);
    rows
}

/// Put the contour in trailing-edge-first order.
///
/// Leading-edge-first input must descend in x exactly once (where the first
/// surface ends at the trailing edge and the second restarts at the leading
/// edge). The first surface is reversed and the second appended unchanged.
pub fn reorder(points: Vec<Point>) -> Result<Vec<Point>, NormalizeError> {
    match points.first() {
        Some(first) if first.x < LEADING_EDGE_X => {}
        _ => return Ok(points),
    }

    let descents: Vec<usize> = points
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[0].x > w[1].x)
        .map(|(i, _)| i)
        .collect();

    let [brk] = descents[..] else {
        return Err(NormalizeError::DegenerateGeometry {
            descents: descents.len(),
        });
    };

    let mut out: Vec<Point> = points[..=brk].iter().rev().copied().collect();
    out.extend_from_slice(&points[brk + 1..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn trailing_edge_first_is_identity() {
        let text = "1.0 0.0\n0.5 0.06\n0.0 0.0\n0.5 -0.05\n1.0 0.0\n";
        let airfoil = normalize_str("s.dat", text).unwrap();
        assert_eq!(
            airfoil.points,
            pts(&[(1.0, 0.0), (0.5, 0.06), (0.0, 0.0), (0.5, -0.05), (1.0, 0.0)])
        );
    }

    #[test]
    fn leading_edge_first_example() {
        let raw = pts(&[(0.0, 0.0), (0.05, 0.02), (0.02, 0.03), (0.10, 0.01)]);
        let out = reorder(raw).unwrap();
        assert_eq!(out, pts(&[(0.05, 0.02), (0.0, 0.0), (0.02, 0.03), (0.10, 0.01)]));
    }

    #[test]
    fn lednicer_surfaces_become_one_contour() {
        let text = "NACA 0012\n  3.  3.\n\n0.0 0.0\n0.5 0.06\n1.0 0.0\n\n0.0 0.0\n0.5 -0.06\n1.0 0.0\n";
        let airfoil = normalize_str("n0012.dat", text).unwrap();
        assert_eq!(
            airfoil.points,
            pts(&[(1.0, 0.0), (0.5, 0.06), (0.0, 0.0), (0.0, 0.0), (0.5, -0.06), (1.0, 0.0)])
        );
        assert!(airfoil.is_unimodal());
    }

    #[test]
    fn point_count_row_is_dropped() {
        let rows = pts(&[(48.0, 0.0), (1.0, 0.0), (0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(strip_artifacts(rows), pts(&[(1.0, 0.0), (0.0, 0.0), (1.0, 0.0)]));
    }

    #[test]
    fn nan_then_count_rows_are_dropped() {
        let rows = pts(&[(f64::NAN, f64::NAN), (61.0, 61.0), (1.0, 0.0), (0.0, 0.0)]);
        assert_eq!(strip_artifacts(rows), pts(&[(1.0, 0.0), (0.0, 0.0)]));
    }

    #[test]
    fn monotonic_leading_edge_input_is_degenerate() {
        let raw = pts(&[(0.0, 0.0), (0.5, 0.05), (1.0, 0.0)]);
        assert!(matches!(
            reorder(raw),
            Err(NormalizeError::DegenerateGeometry { descents: 0 })
        ));
    }

    #[test]
    fn noisy_leading_edge_input_is_degenerate() {
        let raw = pts(&[(0.0, 0.0), (0.5, 0.05), (0.4, 0.05), (1.0, 0.0), (0.0, 0.0), (1.0, 0.0)]);
        assert!(matches!(
            reorder(raw),
            Err(NormalizeError::DegenerateGeometry { descents: 2 })
        ));
    }

    #[test]
    fn errors_carry_the_airfoil_name() {
        let err = normalize_str("broken.dat", "not\na\ntable\nat\nall\n").unwrap_err();
        assert_eq!(err.name, "broken.dat");
        assert!(matches!(err.kind, NormalizeError::Format));
        assert!(err.to_string().starts_with("broken.dat:"));
    }

    #[test]
    fn only_a_count_row_is_empty() {
        let err = normalize_str("c.dat", "48 0\n").unwrap_err();
        assert!(matches!(err.kind, NormalizeError::Empty));
    }

    #[test]
    fn reader_input_matches_str_input() {
        let text = "1.0 0.0\n0.0 0.0\n1.0 0.0\n";
        let a = normalize_reader("r.dat", text.as_bytes()).unwrap();
        let b = normalize_str("r.dat", text).unwrap();
        assert_eq!(a, b);
    }
}
