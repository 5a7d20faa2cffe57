use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{error, info};

use record_linker::annotate::annotate;
use record_linker::cli::parse_cli_to_app_config;
use record_linker::export::csv_export::export_to_csv;
use record_linker::export::xlsx_export::{export_to_xlsx, SummaryContext};
use record_linker::io::read_csv_table;
use record_linker::matching::{build_records, link_records, LinkOutcome, ProgressConfig};
use record_linker::metrics::memory_snapshot;
use record_linker::normalize::Tokenizer;
use record_linker::schema::resolve_schema;

fn main() {
    init_logging();
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let use_tracing = std::env::var("LINKER_TRACING")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_tracing {
        record_linker::logging::init_tracing_from_env();
    } else {
        env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    }
}

fn run() -> Result<()> {
    let t_run = Instant::now();
    let started_utc = chrono::Utc::now();
    let cfg = parse_cli_to_app_config().context("invalid configuration")?;
    let mem_start = memory_snapshot();

    let t_load = Instant::now();
    let source = read_csv_table(&cfg.source_path).context("reading source table")?;
    let registry = read_csv_table(&cfg.registry_path).context("reading registry table")?;
    let load_time = t_load.elapsed();
    info!(
        "loaded {} source row(s), {} registry row(s)",
        source.row_count(),
        registry.row_count()
    );

    let source_schema =
        resolve_schema(&source, "source", false).context("resolving source schema")?;
    let registry_schema =
        resolve_schema(&registry, "registry", true).context("resolving registry schema")?;

    let window = cfg.window.resolve(source.row_count());
    info!(
        "processing rows {}..{} of {} (threshold {:.2})",
        window.start,
        window.end,
        source.row_count(),
        cfg.matching.threshold
    );

    let tokenizer = Tokenizer::default();
    let source_names: Vec<Option<String>> = (window.start..window.end)
        .map(|r| source.cell(r, source_schema.name_col).map(str::to_string))
        .collect();
    let registry_names: Vec<Option<String>> = (0..registry.row_count())
        .map(|r| registry.cell(r, registry_schema.name_col).map(str::to_string))
        .collect();

    let t_match = Instant::now();
    let source_records = build_records(&source_names, &tokenizer);
    let registry_records = build_records(&registry_names, &tokenizer);
    let outcomes = link_records(
        &source_records,
        &registry_records,
        cfg.matching.threshold,
        ProgressConfig::default(),
        |u| {
            info!(
                "{}: {}/{} candidate pair(s) ({:.1}%), mem {} MB used / {} MB avail",
                u.stage, u.processed, u.total, u.percent, u.mem_used_mb, u.mem_avail_mb
            );
        },
    );
    let match_time = t_match.elapsed();

    let mut matched = 0usize;
    let mut review = 0usize;
    let mut missing_name = 0usize;
    for outcome in &outcomes {
        match outcome {
            LinkOutcome::Matched { .. } => matched += 1,
            LinkOutcome::BelowThreshold { .. } | LinkOutcome::NoCandidates => review += 1,
            LinkOutcome::MissingName => missing_name += 1,
        }
    }
    info!(
        "linked {} row(s): {} matched, {} need review, {} missing a name (took {:.3}s)",
        outcomes.len(),
        matched,
        review,
        missing_name,
        match_time.as_secs_f64()
    );

    let annotated = annotate(
        &source,
        &registry,
        &source_schema,
        &registry_schema,
        window,
        &outcomes,
    );

    let out_path = cfg
        .export
        .out_path
        .clone()
        .unwrap_or_else(|| "linked.csv".into());
    let format = cfg
        .export
        .format
        .clone()
        .unwrap_or_else(|| "csv".into());

    let summary = SummaryContext {
        source_path: cfg.source_path.clone(),
        registry_path: cfg.registry_path.clone(),
        total_source: source.row_count(),
        total_registry: registry.row_count(),
        window_rows: window.len(),
        matched,
        review,
        missing_name,
        threshold: cfg.matching.threshold,
        load_time,
        match_time,
        mem_used_start_mb: mem_start.used_mb,
        mem_used_end_mb: memory_snapshot().used_mb,
        started_utc,
        ended_utc: chrono::Utc::now(),
    };

    export_outputs(&annotated, &out_path, &format, &summary)?;
    info!("done in {:.3}s", t_run.elapsed().as_secs_f64());
    Ok(())
}

fn export_outputs(
    annotated: &record_linker::annotate::AnnotatedTable,
    out_path: &str,
    format: &str,
    summary: &SummaryContext,
) -> Result<()> {
    match format {
        "csv" => {
            export_to_csv(annotated, out_path).context("exporting csv")?;
            info!("wrote {}", out_path);
        }
        "xlsx" => {
            export_to_xlsx(annotated, out_path, summary).context("exporting xlsx")?;
            info!("wrote {}", out_path);
        }
        "both" => {
            let csv_path = sibling_with_extension(out_path, "csv");
            let xlsx_path = sibling_with_extension(out_path, "xlsx");
            export_to_csv(annotated, &csv_path).context("exporting csv")?;
            export_to_xlsx(annotated, &xlsx_path, summary).context("exporting xlsx")?;
            info!("wrote {} and {}", csv_path, xlsx_path);
        }
        other => anyhow::bail!("unsupported export format: {}", other),
    }
    Ok(())
}

fn sibling_with_extension(path: &str, ext: &str) -> String {
    Path::new(path)
        .with_extension(ext)
        .to_string_lossy()
        .into_owned()
}
