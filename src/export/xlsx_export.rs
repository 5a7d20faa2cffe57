//! XLSX export: the annotated rows plus a run-summary sheet.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};

use crate::annotate::AnnotatedTable;
use crate::error::ExportError;

/// Everything the summary sheet reports about a run.
#[derive(Debug, Clone)]
pub struct SummaryContext {
    pub source_path: String,
    pub registry_path: String,

    pub total_source: usize,
    pub total_registry: usize,
    pub window_rows: usize,

    pub matched: usize,
    pub review: usize,
    pub missing_name: usize,

    pub threshold: f64,

    pub load_time: Duration,
    pub match_time: Duration,

    pub mem_used_start_mb: u64,
    pub mem_used_end_mb: u64,

    pub started_utc: DateTime<Utc>,
    pub ended_utc: DateTime<Utc>,
}

fn header_format() -> Format {
    Format::new().set_bold().set_align(FormatAlign::Center)
}

fn ensure_parent_dir(path: &str) -> Result<(), ExportError> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ExportError::Xlsx(e.to_string()))?;
        }
    }
    Ok(())
}

pub fn export_to_xlsx(
    table: &AnnotatedTable,
    path: &str,
    summary: &SummaryContext,
) -> Result<(), ExportError> {
    ensure_parent_dir(path)?;
    write_workbook(table, path, summary).map_err(|e| ExportError::Xlsx(e.to_string()))
}

fn write_workbook(
    table: &AnnotatedTable,
    path: &str,
    summary: &SummaryContext,
) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();

    let ws = workbook.add_worksheet();
    ws.set_name("Linked")?;
    let hfmt = header_format();
    for (c, h) in table.headers.iter().enumerate() {
        ws.write_string_with_format(0, c as u16, h, &hfmt)?;
    }
    for (i, row) in table.rows.iter().enumerate() {
        let r = (i as u32) + 1;
        for (c, cell) in row.iter().enumerate() {
            if c == table.score_col {
                if let Ok(v) = cell.parse::<f64>() {
                    ws.write_number(r, c as u16, v)?;
                    continue;
                }
            }
            ws.write_string(r, c as u16, cell)?;
        }
    }

    write_summary_sheet(&mut workbook, summary)?;
    workbook.save(path)?;
    Ok(())
}

fn write_summary_sheet(workbook: &mut Workbook, s: &SummaryContext) -> Result<(), XlsxError> {
    let ws: &mut Worksheet = workbook.add_worksheet();
    ws.set_name("Summary")?;
    let hfmt = header_format();
    ws.write_string_with_format(0, 0, "Field", &hfmt)?;
    ws.write_string_with_format(0, 1, "Value", &hfmt)?;
    ws.set_column_width(0, 28)?;
    ws.set_column_width(1, 44)?;

    let entries: Vec<(&str, String)> = vec![
        ("Source table", s.source_path.clone()),
        ("Registry table", s.registry_path.clone()),
        ("Source rows", s.total_source.to_string()),
        ("Registry rows", s.total_registry.to_string()),
        ("Rows processed", s.window_rows.to_string()),
        ("Matched", s.matched.to_string()),
        ("Needs review", s.review.to_string()),
        ("Missing name", s.missing_name.to_string()),
        ("Threshold", format!("{:.2}", s.threshold)),
        ("Load time (s)", format!("{:.3}", s.load_time.as_secs_f64())),
        ("Match time (s)", format!("{:.3}", s.match_time.as_secs_f64())),
        ("Memory used at start (MB)", s.mem_used_start_mb.to_string()),
        ("Memory used at end (MB)", s.mem_used_end_mb.to_string()),
        (
            "Started (UTC)",
            s.started_utc.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
        (
            "Ended (UTC)",
            s.ended_utc.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
    ];
    for (i, (label, value)) in entries.iter().enumerate() {
        let r = (i as u32) + 1;
        ws.write_string(r, 0, *label)?;
        ws.write_string(r, 1, value)?;
    }
    Ok(())
}
