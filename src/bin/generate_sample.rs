//! Writes a small raw coordinate database in every header layout the
//! preprocessor understands, plus the matching name list:
//!
//! ```text
//! sample/coordinate_data/<name>
//! sample/names_list/airfoil_names.txt
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// NACA 4-digit half-thickness and camber line at chord station `x`.
fn naca4(m: f64, p: f64, t: f64, x: f64) -> (f64, f64) {
    let yt = 5.0
        * t
        * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x.powi(2) + 0.2843 * x.powi(3)
            - 0.1036 * x.powi(4));
    let yc = if p == 0.0 {
        0.0
    } else if x < p {
        m / p.powi(2) * (2.0 * p * x - x.powi(2))
    } else {
        m / (1.0 - p).powi(2) * ((1.0 - 2.0 * p) + 2.0 * p * x - x.powi(2))
    };
    (yc + yt, yc - yt)
}

/// Cosine-spaced stations from leading edge (0) to trailing edge (1).
fn stations(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 * (1.0 - (std::f64::consts::PI * i as f64 / (n - 1) as f64).cos()))
        .collect()
}

/// Upper and lower surfaces, each leading edge → trailing edge.
fn surfaces(digits: &str, n: usize) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let d: Vec<f64> = digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(f64::from)
        .collect();
    let (m, p, t) = (d[0] / 100.0, d[1] / 10.0, (d[2] * 10.0 + d[3]) / 100.0);

    let xs = stations(n);
    let upper = xs.iter().map(|&x| (x, naca4(m, p, t, x).0)).collect();
    let lower = xs.iter().map(|&x| (x, naca4(m, p, t, x).1)).collect();
    (upper, lower)
}

fn rows(points: &[(f64, f64)]) -> String {
    points.iter().fold(String::new(), |mut s, (x, y)| {
        let _ = writeln!(s, "  {x:.6}  {y:.6}");
        s
    })
}

/// Trailing edge → upper → leading edge → lower → trailing edge.
fn selig(digits: &str, n: usize) -> String {
    let (upper, lower) = surfaces(digits, n);
    let contour: Vec<_> = upper.iter().rev().chain(lower.iter().skip(1)).copied().collect();
    rows(&contour)
}

/// Name, point counts, then each surface leading edge first.
fn lednicer(digits: &str, n: usize) -> String {
    let (upper, lower) = surfaces(digits, n);
    format!(
        "NACA {digits}\n  {n}.  {n}.\n\n{}\n{}",
        rows(&upper),
        rows(&lower)
    )
}

fn main() -> Result<()> {
    let root = Path::new("sample");
    let coord_dir = root.join("coordinate_data");
    fs::create_dir_all(&coord_dir).context("creating sample/coordinate_data")?;
    fs::create_dir_all(root.join("names_list")).context("creating sample/names_list")?;

    let files: Vec<(&str, String)> = vec![
        ("naca0012.dat", selig("0012", 41)),
        ("naca2412.dat", format!("NACA 2412\n{}", selig("2412", 41))),
        ("naca4415.dat", lednicer("4415", 31)),
        (
            "naca1408.dat",
            format!("NACA 1408\nsmoothed\n  81\n{}", selig("1408", 41)),
        ),
        (
            "naca6409.dat",
            format!("NACA 6409\nSelig format\nrev 2\n{}END\n", selig("6409", 41)),
        ),
        ("broken.dat", "this file\nis not\na coordinate\ntable\nat all\n".to_string()),
    ];

    let mut names = String::new();
    for (name, text) in &files {
        fs::write(coord_dir.join(name), text).with_context(|| format!("writing {name}"))?;
        names.push_str(name);
        names.push('\n');
    }
    fs::write(root.join("names_list/airfoil_names.txt"), names).context("writing name list")?;

    println!("Wrote {} raw coordinate files to {}", files.len(), coord_dir.display());
    Ok(())
}
