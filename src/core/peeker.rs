use anyhow::Result;
use std::path::PathBuf;

use crate::annotations::AnnotationTable;
use crate::core::discovery;
use crate::shared::config::Config;
use crate::shared::constants;
use crate::utils::file_utils::{self, Picker};
use crate::utils::logger;

#[derive(Debug, Clone)]
pub struct PeekReport {
    pub video_path: PathBuf,
    pub video_id: String,
    pub columns: Vec<String>,
    pub total_rows: usize,
    pub matched_rows: usize,
    pub preview: Vec<Vec<String>>,
    pub exported_rows: usize,
    pub csv_path: PathBuf,
}

/// Loads the annotation store, infers the video id from the first video
/// found, prints what matches and saves a CSV sample.
///
/// Zero matching rows is reported, not treated as an error.
pub fn run_peek(config: &Config, picker: &dyn Picker) -> Result<PeekReport> {
    let table = AnnotationTable::load(&config.annotations_path)?;
    let columns: Vec<String> = table.columns().into_iter().map(String::from).collect();
    println!("Columns: {:?}", columns);
    println!("Total rows: {}", table.len());

    let video_path = discovery::locate_video(config, picker)?;
    let video_id = file_utils::infer_video_id(&video_path, &config.video_id_marker);
    println!("Using MP4: {}", video_path.display());
    println!("Inferred video_id: {}", video_id);

    let subset = table.filter_video(&video_id);
    println!("Rows for {}: {}", video_id, subset.len());

    let preview = subset.select(constants::PREVIEW_COLUMNS, config.preview_rows);
    println!("{}", format_preview(constants::PREVIEW_COLUMNS, &preview));

    let sample = subset.head(config.export_rows);
    let csv_path = config.peek_csv_for(&video_id);
    sample.write_csv(&csv_path)?;
    println!("Saved sample narrations to {}", csv_path.display());
    logger::info(&format!(
        "peek: {} matched {}/{} rows, wrote {} to {}",
        video_id,
        subset.len(),
        table.len(),
        sample.len(),
        csv_path.display()
    ));

    Ok(PeekReport {
        video_path,
        video_id,
        columns,
        total_rows: table.len(),
        matched_rows: subset.len(),
        preview,
        exported_rows: sample.len(),
        csv_path,
    })
}

/// Left-aligned text table with a row-number column.
pub fn format_preview(columns: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return format!("Empty preview (columns: {})", columns.join(", "));
    }

    let index_width = (rows.len() - 1).to_string().len();
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .map(|row| row.get(i).map_or(0, |cell| cell.chars().count()))
                .max()
                .unwrap_or(0)
                .max(name.chars().count())
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(name, width)| format!("{:<width$}", name, width = width))
        .collect();
    lines.push(format!("{:<iw$}  {}", "", header.join("  "), iw = index_width));

    for (n, row) in rows.iter().enumerate() {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                format!("{:<width$}", cell, width = width)
            })
            .collect();
        lines.push(format!("{:<iw$}  {}", n, cells.join("  "), iw = index_width));
    }

    lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
