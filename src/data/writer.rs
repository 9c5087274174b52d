use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::loader::extension;
use super::model::{Airfoil, SummaryRecord};

// ---------------------------------------------------------------------------
// Canonical coordinate files
// ---------------------------------------------------------------------------

/// Write `x y` rows, no header. `{:.18e}` keeps every bit of an f64.
pub fn write_canonical<W: Write>(mut w: W, airfoil: &Airfoil) -> std::io::Result<()> {
    for p in &airfoil.points {
        writeln!(w, "{:.18e} {:.18e}", p.x, p.y)?;
    }
    w.flush()
}

/// Persist a canonical contour to `path`, replacing any previous file.
pub fn save_canonical(path: &Path, airfoil: &Airfoil) -> std::io::Result<()> {
    let file = File::create(path)?;
    write_canonical(BufWriter::new(file), airfoil)
}

/// One name per line, the format [super::loader::read_names] reads back.
pub fn write_names<S: AsRef<str>>(path: &Path, names: &[S]) -> Result<()> {
    let mut w = BufWriter::new(
        File::create(path).with_context(|| format!("creating {}", path.display()))?,
    );
    for name in names {
        writeln!(w, "{}", name.as_ref())?;
    }
    w.flush().context("writing name list")
}

// ---------------------------------------------------------------------------
// Summary tables
// ---------------------------------------------------------------------------

/// Write the summary table. Dispatch by extension, mirroring
/// [super::loader::load_summary].
pub fn write_summary(path: &Path, records: &[SummaryRecord]) -> Result<()> {
    match extension(path).as_str() {
        "csv" => write_summary_csv(path, records),
        "json" => write_summary_json(path, records),
        "parquet" | "pq" => write_summary_parquet(path, records),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn write_summary_csv(path: &Path, records: &[SummaryRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for rec in records {
        writer.serialize(rec).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")
}

fn write_summary_json(path: &Path, records: &[SummaryRecord]) -> Result<()> {
    let file = File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(BufWriter::new(file), records).context("writing JSON")
}

fn write_summary_parquet(path: &Path, records: &[SummaryRecord]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Airfoil Name", DataType::Utf8, false),
        Field::new("Alpha", DataType::Float64, false),
        Field::new("Indicator Name", DataType::Utf8, false),
        Field::new("Value", DataType::Float64, false),
    ]));

    let airfoils = StringArray::from(records.iter().map(|r| r.airfoil.as_str()).collect::<Vec<_>>());
    let alphas = Float64Array::from(records.iter().map(|r| r.alpha).collect::<Vec<_>>());
    let indicators =
        StringArray::from(records.iter().map(|r| r.indicator.as_str()).collect::<Vec<_>>());
    let values = Float64Array::from(records.iter().map(|r| r.value).collect::<Vec<_>>());

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(airfoils),
            Arc::new(alphas),
            Arc::new(indicators),
            Arc::new(values),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_summary, read_canonical};
    use crate::data::model::{Indicator, Point};

    fn records() -> Vec<SummaryRecord> {
        vec![
            SummaryRecord {
                airfoil: "e1233.dat".into(),
                alpha: 0.0,
                indicator: Indicator::Cl,
                value: 0.41,
            },
            SummaryRecord {
                airfoil: "e1233.dat".into(),
                alpha: 0.5,
                indicator: Indicator::LByD,
                value: 72.5,
            },
        ]
    }

    #[test]
    fn canonical_file_reads_back_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.dat");
        let airfoil = Airfoil {
            name: "a.dat".into(),
            points: vec![Point::new(1.0, 0.00126), Point::new(0.1 + 0.2, -1.0 / 3.0)],
        };
        save_canonical(&path, &airfoil).unwrap();
        assert_eq!(read_canonical(&path, "a.dat").unwrap(), airfoil);
    }

    #[test]
    fn summary_formats_agree() {
        let dir = tempfile::tempdir().unwrap();
        for ext in ["csv", "json", "parquet"] {
            let path = dir.path().join(format!("summary.{ext}"));
            write_summary(&path, &records()).unwrap();
            let table = load_summary(&path).unwrap();
            assert_eq!(table.records, records(), "format {ext}");
        }
    }

    #[test]
    fn csv_header_matches_explorer_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        write_summary(&path, &records()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Airfoil Name,Alpha,Indicator Name,Value\n"));
        assert!(text.contains("e1233.dat,0.5,L_by_D,72.5"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(write_summary(Path::new("summary.xlsx"), &records()).is_err());
    }
}
