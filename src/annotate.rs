//! Annotation: turns link outcomes into the output fields of the source
//! table — matched name, confidence, review flag, review note, and the
//! address values propagated from the matched registry record.

use log::debug;

use crate::config::RowWindow;
use crate::matching::LinkOutcome;
use crate::models::Table;
use crate::schema::TableSchema;

pub const MATCHED_NAME_HEADER: &str = "Matched Name";
pub const MATCH_SCORE_HEADER: &str = "Match Score";
pub const NEEDS_REVIEW_HEADER: &str = "Needs Review";
pub const REVIEW_NOTE_HEADER: &str = "Review Note";

pub const NOTE_MATCHED: &str = "Matched";
pub const NOTE_LOW_OVERLAP: &str = "Low overlap";
pub const NOTE_MISSING_NAME: &str = "Missing name";

/// The annotated source table: original columns, the four match columns,
/// then any registry address columns the source did not already carry.
#[derive(Debug, Clone)]
pub struct AnnotatedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Position of the numeric match-score column.
    pub score_col: usize,
}

/// A destination address column in the output, optionally fed by a
/// same-named registry column. Matching is by column name; there is no
/// positional copying across mismatched schemas.
#[derive(Debug)]
struct DestColumn {
    out_col: usize,
    registry_col: Option<usize>,
}

pub fn annotate(
    source: &Table,
    registry: &Table,
    source_schema: &TableSchema,
    registry_schema: &TableSchema,
    window: RowWindow,
    outcomes: &[LinkOutcome],
) -> AnnotatedTable {
    debug_assert_eq!(outcomes.len(), window.len());

    let ann_base = source.headers.len();
    let mut headers = source.headers.clone();
    headers.push(MATCHED_NAME_HEADER.into());
    headers.push(MATCH_SCORE_HEADER.into());
    headers.push(NEEDS_REVIEW_HEADER.into());
    headers.push(REVIEW_NOTE_HEADER.into());

    let dest = destination_columns(source, source_schema, registry_schema, &mut headers);
    debug!(
        "{} destination address column(s), {} supplied by the registry",
        dest.len(),
        dest.iter().filter(|d| d.registry_col.is_some()).count()
    );

    let width = headers.len();
    let mut rows = Vec::with_capacity(source.row_count());
    for r in 0..source.row_count() {
        let mut cells = source.rows[r].clone();
        cells.truncate(ann_base);
        cells.resize(width, String::new());

        if !window.contains(r) {
            rows.push(cells);
            continue;
        }

        match &outcomes[r - window.start] {
            LinkOutcome::Matched { target, score } => {
                cells[ann_base] = registry
                    .cell(*target, registry_schema.name_col)
                    .unwrap_or("")
                    .to_string();
                cells[ann_base + 1] = format_score(*score);
                cells[ann_base + 2] = "false".into();
                cells[ann_base + 3] = NOTE_MATCHED.into();
                for d in &dest {
                    if let Some(rc) = d.registry_col {
                        cells[d.out_col] = registry.cell(*target, rc).unwrap_or("").to_string();
                    }
                }
            }
            LinkOutcome::BelowThreshold { .. } | LinkOutcome::NoCandidates => {
                // address fields stay as they were: not cleared, not populated
                cells[ann_base + 1] = "0.0".into();
                cells[ann_base + 2] = "true".into();
                cells[ann_base + 3] = NOTE_LOW_OVERLAP.into();
            }
            LinkOutcome::MissingName => {
                // overrides everything, including any pre-existing addresses
                cells[ann_base + 1] = "0.0".into();
                cells[ann_base + 2] = "false".into();
                cells[ann_base + 3] = NOTE_MISSING_NAME.into();
                for d in &dest {
                    cells[d.out_col].clear();
                }
            }
        }
        rows.push(cells);
    }

    AnnotatedTable {
        headers,
        rows,
        score_col: ann_base + 1,
    }
}

/// Destination columns: the source's own address columns (fed by a
/// same-named registry column where one exists), then registry address
/// columns the source lacks, appended to the header row.
fn destination_columns(
    source: &Table,
    source_schema: &TableSchema,
    registry_schema: &TableSchema,
    headers: &mut Vec<String>,
) -> Vec<DestColumn> {
    let mut dest: Vec<DestColumn> = Vec::new();
    for col in &source_schema.address_cols {
        let registry_col = registry_schema
            .address_cols
            .iter()
            .find(|rc| rc.header.eq_ignore_ascii_case(&col.header))
            .map(|rc| rc.index);
        dest.push(DestColumn {
            out_col: col.index,
            registry_col,
        });
    }
    for rc in &registry_schema.address_cols {
        if dest.iter().any(|d| d.registry_col == Some(rc.index)) {
            continue;
        }
        match source.column_index(&rc.header) {
            Some(idx) => {
                if !dest.iter().any(|d| d.out_col == idx) {
                    dest.push(DestColumn {
                        out_col: idx,
                        registry_col: Some(rc.index),
                    });
                }
            }
            None => {
                dest.push(DestColumn {
                    out_col: headers.len(),
                    registry_col: Some(rc.index),
                });
                headers.push(rc.header.clone());
            }
        }
    }
    dest
}

/// Confidence as a percentage with one decimal, e.g. 0.6667 -> "66.7".
fn format_score(score: f64) -> String {
    format!("{:.1}", (score * 1000.0).round() / 10.0)
}
