use anyhow::{Context, Result};
use csv::StringRecord;
use std::fs;
use std::io;
use std::path::Path;

use super::narration::Narration;
use crate::error::ToolError;
use crate::shared::constants;

/// The annotation store as read from CSV: every column kept verbatim.
#[derive(Debug, Clone, Default)]
pub struct AnnotationTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl AnnotationTable {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput {
                what: "annotation store",
                path: path.to_path_buf(),
            }
            .into());
        }

        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        Self::from_reader(reader).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_csv_str(data: &str) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data.as_bytes());
        Self::from_reader(reader)
    }

    fn from_reader<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { headers, rows })
    }

    pub fn columns(&self) -> Vec<&str> {
        self.headers.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Value of `column` in row `row`; `None` when either is absent.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Rows whose `video_id` equals `video_id` exactly. A table without a
    /// `video_id` column matches nothing.
    pub fn filter_video(&self, video_id: &str) -> AnnotationTable {
        let rows = match self.column_index("video_id") {
            Some(idx) => self
                .rows
                .iter()
                .filter(|row| row.get(idx) == Some(video_id))
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        AnnotationTable {
            headers: self.headers.clone(),
            rows,
        }
    }

    pub fn head(&self, n: usize) -> AnnotationTable {
        AnnotationTable {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Typed view of every row, in table order.
    pub fn narrations(&self) -> Vec<Narration> {
        let has_end = self.column_index("end_timestamp").is_some();
        (0..self.rows.len())
            .map(|row| {
                let text = |column: &str| self.cell(row, column).unwrap_or_default().to_string();
                let start = parse_timestamp(self.cell(row, "start_timestamp"));
                let end = if has_end {
                    parse_timestamp(self.cell(row, "end_timestamp"))
                } else {
                    Some(start.unwrap_or(0.0) + constants::MISSING_END_PAD_SECS)
                };

                Narration {
                    participant_id: text("participant_id"),
                    video_id: text("video_id"),
                    narration: text("narration"),
                    start_timestamp: start,
                    end_timestamp: end,
                }
            })
            .collect()
    }

    /// Preview rows restricted to `columns`; absent columns render empty.
    pub fn select(&self, columns: &[&str], limit: usize) -> Vec<Vec<String>> {
        (0..self.rows.len().min(limit))
            .map(|row| {
                columns
                    .iter()
                    .map(|column| self.cell(row, column).unwrap_or_default().to_string())
                    .collect()
            })
            .collect()
    }

    /// Writes the header and every row to `path`, creating parent directories.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Empty cells and `NaN` are undefined timestamps.
fn parse_timestamp(cell: Option<&str>) -> Option<f64> {
    let value: f64 = cell?.trim().parse().ok()?;
    value.is_finite().then_some(value)
}
