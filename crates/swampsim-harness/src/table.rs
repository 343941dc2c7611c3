//! Results table and its CSV form
//!
//! One row per tensor type. Columns are the grid parameters, the four
//! summary statistics, then `{k}_err` and `{k}_time` for each run. Floats
//! are written with shortest round-trip formatting, so a table read back
//! from CSV equals the one written.

use crate::aggregate::{ResultsRow, Summary};
use crate::error::{TableError, TableResult};
use crate::grid::GridRow;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Leading parameter columns
pub const PARAMETER_COLUMNS: [&str; 7] = ["type", "rank", "size", "collinearity", "l1", "l2", "runs"];

/// Summary statistic columns
pub const SUMMARY_COLUMNS: [&str; 4] = ["err_mean", "err_std", "time_mean", "time_std"];

/// Full header for a table with `runs` runs per row
pub fn columns(runs: usize) -> Vec<String> {
    let mut header: Vec<String> = PARAMETER_COLUMNS
        .iter()
        .chain(SUMMARY_COLUMNS.iter())
        .map(|c| c.to_string())
        .collect();
    header.extend((1..=runs).map(|k| format!("{}_err", k)));
    header.extend((1..=runs).map(|k| format!("{}_time", k)));
    header
}

/// Finished experiment results
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsTable {
    runs: usize,
    rows: Vec<ResultsRow>,
}

impl ResultsTable {
    /// Assemble a table; all rows must share one run count
    pub fn new(rows: Vec<ResultsRow>) -> TableResult<Self> {
        let runs = rows.first().ok_or(TableError::Empty)?.params.runs;
        for row in &rows {
            for found in [row.params.runs, row.errors.len(), row.times.len()] {
                if found != runs {
                    return Err(TableError::RunCount {
                        label: row.label,
                        expected: runs,
                        found,
                    });
                }
            }
        }
        Ok(Self { runs, rows })
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn rows(&self) -> &[ResultsRow] {
        &self.rows
    }

    /// Row by tensor type label
    pub fn row(&self, label: usize) -> Option<&ResultsRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> Vec<String> {
        columns(self.runs)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> TableResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.columns())?;
        for row in &self.rows {
            csv_writer.write_record(record_fields(row))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn read_csv<R: Read>(reader: R) -> TableResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let header: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

        let fixed = PARAMETER_COLUMNS.len() + SUMMARY_COLUMNS.len();
        let runs = header.len().saturating_sub(fixed) / 2;
        let expected = columns(runs);
        if header != expected {
            return Err(TableError::Header {
                expected,
                found: header,
            });
        }

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            let field = |index: usize| CellRef {
                line,
                column: &expected[index],
                value: record.get(index).unwrap_or(""),
            };

            let params = GridRow {
                rank: field(1).parse()?,
                size: field(2).parse()?,
                collinearity: field(3).parse()?,
                l1: field(4).parse()?,
                l2: field(5).parse()?,
                runs: field(6).parse()?,
            };
            let summary = Summary {
                err_mean: field(7).parse()?,
                err_std: field(8).parse()?,
                time_mean: field(9).parse()?,
                time_std: field(10).parse()?,
            };
            let errors = (0..runs)
                .map(|k| field(fixed + k).parse())
                .collect::<TableResult<Vec<f64>>>()?;
            let times = (0..runs)
                .map(|k| field(fixed + runs + k).parse())
                .collect::<TableResult<Vec<f64>>>()?;

            rows.push(ResultsRow {
                label: field(0).parse()?,
                params,
                summary,
                errors,
                times,
            });
        }

        Self::new(rows)
    }

    pub fn to_csv_path<P: AsRef<Path>>(&self, path: P) -> TableResult<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::read_csv(std::io::BufReader::new(file))
    }
}

fn record_fields(row: &ResultsRow) -> Vec<String> {
    let p = &row.params;
    let s = &row.summary;
    let mut fields = vec![
        row.label.to_string(),
        p.rank.to_string(),
        p.size.to_string(),
        p.collinearity.to_string(),
        p.l1.to_string(),
        p.l2.to_string(),
        p.runs.to_string(),
        s.err_mean.to_string(),
        s.err_std.to_string(),
        s.time_mean.to_string(),
        s.time_std.to_string(),
    ];
    fields.extend(row.errors.iter().map(f64::to_string));
    fields.extend(row.times.iter().map(f64::to_string));
    fields
}

struct CellRef<'a> {
    line: u64,
    column: &'a str,
    value: &'a str,
}

impl CellRef<'_> {
    fn parse<T: FromStr>(&self) -> TableResult<T> {
        self.value.trim().parse().map_err(|_| TableError::Parse {
            line: self.line,
            column: self.column.to_string(),
            value: self.value.to_string(),
        })
    }
}
