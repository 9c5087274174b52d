use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{Array, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{
    Airfoil, Indicator, ParseTrial, Point, Polar, PolarPoint, RawTable, SummaryRecord,
    SummaryTable,
};
use crate::error::NormalizeError;

// ---------------------------------------------------------------------------
// Raw coordinate files
// ---------------------------------------------------------------------------

/// Header/footer variants seen in the coordinate database, tried in order.
/// The first one that yields a clean two-column table wins; a new historical
/// layout is one more entry here.
pub const PARSE_TRIALS: [ParseTrial; 5] = [
    ParseTrial { skip_header: 0, skip_footer: 0 },
    ParseTrial { skip_header: 1, skip_footer: 0 },
    ParseTrial { skip_header: 2, skip_footer: 0 },
    ParseTrial { skip_header: 3, skip_footer: 0 },
    ParseTrial { skip_header: 3, skip_footer: 1 },
];

/// Parse a raw coordinate file, walking [PARSE_TRIALS].
///
/// Skipped header lines are counted as raw lines, blank or not. Past the
/// header, blank lines and `#` comments are ignored and every other line must
/// hold exactly two numbers. A literal `nan` is a number here; stripping it
/// is the normalizer's job.
pub fn parse_raw_table(text: &str) -> Result<RawTable, NormalizeError> {
    PARSE_TRIALS
        .iter()
        .find_map(|&trial| parse_with_trial(text, trial).map(|rows| RawTable { rows, trial }))
        .ok_or(NormalizeError::Format)
}

/// Read and parse a raw coordinate file from disk.
pub fn read_raw_table(path: &Path) -> Result<RawTable, NormalizeError> {
    let bytes = std::fs::read(path)?;
    parse_raw_table(&String::from_utf8_lossy(&bytes))
}

fn parse_with_trial(text: &str, trial: ParseTrial) -> Option<Vec<Point>> {
    let lines: Vec<&str> = text
        .lines()
        .skip(trial.skip_header)
        .map(strip_comment)
        .filter(|l| !l.trim().is_empty())
        .collect();

    let keep = lines.len().checked_sub(trial.skip_footer)?;
    if keep == 0 {
        return None;
    }
    lines[..keep].iter().map(|l| parse_pair(l)).collect()
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_pair(line: &str) -> Option<Point> {
    let mut fields = line.split_whitespace();
    let x = fields.next()?.parse::<f64>().ok()?;
    let y = fields.next()?.parse::<f64>().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(Point::new(x, y))
}

// ---------------------------------------------------------------------------
// Canonical coordinate files
// ---------------------------------------------------------------------------

/// Read a processed (headerless, two-column) coordinate file.
pub fn read_canonical(path: &Path, name: &str) -> Result<Airfoil> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading coordinates {}", path.display()))?;

    let points = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| {
            parse_pair(l).with_context(|| format!("{name}: line {}: '{}' is not an x y pair", i + 1, l.trim()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Airfoil {
        name: name.to_string(),
        points,
    })
}

// ---------------------------------------------------------------------------
// Name lists
// ---------------------------------------------------------------------------

/// Read an airfoil name list (one name per line, blanks ignored).
pub fn read_names(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("opening name list {}", path.display()))?;
    let mut names = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.context("reading name list")?;
        let name = line.trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Like [read_names], but a missing file is an empty list.
pub fn read_names_or_empty(path: &Path) -> Result<Vec<String>> {
    if path.exists() {
        read_names(path)
    } else {
        Ok(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// XFOIL polar files
// ---------------------------------------------------------------------------

/// Read an XFOIL polar accumulation file (`PACC` output).
pub fn read_polar(path: &Path, name: &str) -> Result<Polar> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading polar {}", path.display()))?;
    parse_polar(&text, name)
}

/// Polar layout:
///
/// ```text
///  Calculated polar for: NACA 2412
///  ...
///   alpha    CL        CD       CDp       CM     Top_Xtr  Bot_Xtr
///  ------ -------- --------- --------- -------- -------- --------
///    0.000   0.2466   0.00563   0.00113  -0.0529   0.6384   0.9973
/// ```
///
/// Rows after the dashed separator hold at least seven numbers; newer XFOIL
/// versions append transition-location columns, which are ignored.
pub fn parse_polar(text: &str, name: &str) -> Result<Polar> {
    let mut lines = text.lines();
    if !lines.by_ref().any(|l| l.trim_start().starts_with("---")) {
        bail!("{name}: no polar table separator found");
    }

    let mut points = Vec::new();
    for (row, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let values = line
            .split_whitespace()
            .map(|tok| tok.parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("{name}: polar row {row}: '{}'", line.trim()))?;

        if values.len() < 7 {
            bail!("{name}: polar row {row} has {} columns, expected 7", values.len());
        }
        points.push(PolarPoint {
            alpha: values[0],
            cl: values[1],
            cd: values[2],
            cdp: values[3],
            cm: values[4],
            top_xtr: values[5],
            bot_xtr: values[6],
        });
    }

    Ok(Polar {
        name: name.to_string(),
        points,
    })
}

// ---------------------------------------------------------------------------
// Summary tables
// ---------------------------------------------------------------------------

/// Load the summary table.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header `Airfoil Name,Alpha,Indicator Name,Value`
/// * `.json`    – `[{ "Airfoil Name": ..., "Alpha": ..., ... }, ...]`
/// * `.parquet` – same four columns (utf8, f64, utf8, f64)
pub fn load_summary(path: &Path) -> Result<SummaryTable> {
    let records = match extension(path).as_str() {
        "csv" => load_summary_csv(path)?,
        "json" => load_summary_json(path)?,
        "parquet" | "pq" => load_summary_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };
    Ok(SummaryTable::from_records(records))
}

pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn load_summary_csv(path: &Path) -> Result<Vec<SummaryRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    reader
        .deserialize()
        .enumerate()
        .map(|(row, rec)| rec.with_context(|| format!("CSV row {row}")))
        .collect()
}

fn load_summary_json(path: &Path) -> Result<Vec<SummaryRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON")
}

fn load_summary_parquet(path: &Path) -> Result<Vec<SummaryRecord>> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let airfoils = string_column(&batch, "Airfoil Name")?;
        let alphas = f64_column(&batch, "Alpha")?;
        let indicators = string_column(&batch, "Indicator Name")?;
        let values = f64_column(&batch, "Value")?;

        for row in 0..batch.num_rows() {
            if airfoils.is_null(row) || indicators.is_null(row) {
                bail!("Row {row}: null airfoil or indicator name");
            }
            let indicator = indicators
                .value(row)
                .parse::<Indicator>()
                .map_err(|e| anyhow!("Row {row}: {e}"))?;
            records.push(SummaryRecord {
                airfoil: airfoils.value(row).to_string(),
                alpha: alphas.value(row),
                indicator,
                value: if values.is_null(row) { f64::NAN } else { values.value(row) },
            });
        }
    }
    Ok(records)
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .with_context(|| format!("Parquet file missing '{name}' column"))?
        .as_any()
        .downcast_ref::<StringArray>()
        .with_context(|| format!("'{name}' is not a utf8 column"))
}

fn f64_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array> {
    batch
        .column_by_name(name)
        .with_context(|| format!("Parquet file missing '{name}' column"))?
        .as_any()
        .downcast_ref::<Float64Array>()
        .with_context(|| format!("'{name}' is not a Float64 column"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELIG: &str = "1.0 0.0\n0.5 0.05\n0.0 0.0\n0.5 -0.04\n1.0 0.0\n";

    #[test]
    fn headerless_file_takes_first_trial() {
        let table = parse_raw_table(SELIG).unwrap();
        assert_eq!(table.trial, PARSE_TRIALS[0]);
        assert_eq!(table.rows.len(), 5);
    }

    #[test]
    fn each_header_depth_selects_its_own_trial() {
        let headers = ["", "NACA 2412\n", "NACA 2412\nSelig format\n", "E 1233\nfrom UIUC\nrev B\n"];
        for (k, header) in headers.iter().enumerate() {
            let table = parse_raw_table(&format!("{header}{SELIG}")).unwrap();
            assert_eq!(table.trial.skip_header, k, "header {header:?}");
            assert_eq!(table.trial.skip_footer, 0);
            assert!(table.rows.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        }
    }

    #[test]
    fn spurious_footer_uses_last_trial() {
        let text = format!("A\nB\nC\n{SELIG}end of file\n");
        let table = parse_raw_table(&text).unwrap();
        assert_eq!(table.trial, PARSE_TRIALS[4]);
        assert_eq!(table.rows.last(), Some(&Point::new(1.0, 0.0)));
        assert_eq!(table.rows.len(), 5);
    }

    #[test]
    fn lednicer_counts_parse_as_a_row() {
        let text = "NACA 0012\n  3.  3.\n\n0.0 0.0\n0.5 0.06\n1.0 0.0\n\n0.0 0.0\n0.5 -0.06\n1.0 0.0\n";
        let table = parse_raw_table(text).unwrap();
        assert_eq!(table.trial.skip_header, 1);
        assert_eq!(table.rows[0], Point::new(3.0, 3.0));
        assert_eq!(table.rows.len(), 7);
    }

    #[test]
    fn unparseable_file_is_format_error() {
        let text = "a\nb\nc\nd\ne f\n1 2 3\n";
        assert!(matches!(parse_raw_table(text), Err(NormalizeError::Format)));
        assert!(matches!(parse_raw_table(""), Err(NormalizeError::Format)));
    }

    #[test]
    fn nan_sentinel_survives_parsing() {
        let table = parse_raw_table("nan nan\n1.0 0.0\n0.0 0.0\n").unwrap();
        assert!(table.rows[0].x.is_nan());
    }

    #[test]
    fn polar_rows_after_separator() {
        let text = "\
       XFOIL         Version 6.99

 Calculated polar for: NACA 2412

  alpha    CL        CD       CDp       CM     Top_Xtr  Bot_Xtr
 ------ -------- --------- --------- -------- -------- --------
   0.000   0.2466   0.00563   0.00113  -0.0529   0.6384   0.9973
   0.500   0.3064   0.00571   0.00118  -0.0538   0.6222   1.0000   0.1   0.2
";
        let polar = parse_polar(text, "naca2412.dat").unwrap();
        assert_eq!(polar.points.len(), 2);
        assert_eq!(polar.points[1].alpha, 0.5);
        assert_eq!(polar.points[0].cm, -0.0529);
        assert!(polar.is_converged());
    }

    #[test]
    fn polar_without_rows_is_not_converged() {
        let text = "  alpha    CL\n ------ --------\n";
        assert!(!parse_polar(text, "x").unwrap().is_converged());
        assert!(parse_polar("garbage", "x").is_err());
    }
}
