use crate::config::{AD_COLUMNS, RESULT_COLUMNS};
use crate::error::DashboardError;
use crate::types::{AdRecord, ElectionRecord, RawAdRow, RawResultRow};
use crate::util::{clean_text, parse_f64_safe, parse_u64_safe};
use csv::{Reader, ReaderBuilder, Trim};
use log::{debug, info, warn};
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    /// Rows that failed to deserialize or lacked a grouping key.
    pub skipped_rows: usize,
    /// Numeric cells that were present but unparseable, now treated as missing.
    pub coerced_cells: usize,
}

fn open(path: &Path, required: &[&'static str]) -> Result<Reader<File>, DashboardError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_path(path)?;
    let headers = rdr.headers()?.clone();
    for &column in required {
        if !headers.iter().any(|h| h == column) {
            return Err(DashboardError::MissingColumn {
                file: path.display().to_string(),
                column,
            });
        }
    }
    Ok(rdr)
}

/// Count a cell that had text but did not parse as a number.
fn coerce<T>(raw: Option<&str>, parsed: Option<T>, coerced: &mut usize) -> Option<T> {
    if parsed.is_none() && raw.map_or(false, |s| !s.trim().is_empty()) {
        *coerced += 1;
    }
    parsed
}

/// Load `advertisers.csv`. Unparseable spend or ad counts become missing.
pub fn load_advertisers(path: impl AsRef<Path>) -> Result<(Vec<AdRecord>, LoadReport), DashboardError> {
    let path = path.as_ref();
    info!("Loading advertisers from: {}", path.display());
    let mut rdr = open(path, AD_COLUMNS)?;
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in rdr.deserialize::<RawAdRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping advertiser row {}: {}", report.total_rows, e);
                report.skipped_rows += 1;
                continue;
            }
        };
        let Some(page_name) = clean_text(row.page_name) else {
            report.skipped_rows += 1;
            continue;
        };

        let amount_spent = coerce(
            row.amount_spent.as_deref(),
            parse_f64_safe(row.amount_spent.as_deref()),
            &mut report.coerced_cells,
        );
        let number_of_ads = coerce(
            row.number_of_ads.as_deref(),
            parse_u64_safe(row.number_of_ads.as_deref()),
            &mut report.coerced_cells,
        );

        records.push(AdRecord {
            page_name,
            amount_spent,
            number_of_ads,
        });
    }

    report.kept_rows = records.len();
    log_report("advertisers", &report);
    Ok((records, report))
}

/// Load `merged_data.csv`. Rows without a state or phase are skipped so that
/// every kept record belongs to exactly one state and one phase.
pub fn load_election_results(
    path: impl AsRef<Path>,
) -> Result<(Vec<ElectionRecord>, LoadReport), DashboardError> {
    let path = path.as_ref();
    info!("Loading election results from: {}", path.display());
    let mut rdr = open(path, RESULT_COLUMNS)?;
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in rdr.deserialize::<RawResultRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping result row {}: {}", report.total_rows, e);
                report.skipped_rows += 1;
                continue;
            }
        };
        let (Some(state), Some(phase)) = (clean_text(row.state), clean_text(row.phase)) else {
            report.skipped_rows += 1;
            continue;
        };
        let constituency = clean_text(row.pc_name).unwrap_or_else(|| "Unknown".to_string());

        let coerced = &mut report.coerced_cells;
        let total_electors = coerce(
            row.total_electors.as_deref(),
            parse_u64_safe(row.total_electors.as_deref()),
            coerced,
        );
        let polled_pct = coerce(
            row.polled_pct.as_deref(),
            parse_f64_safe(row.polled_pct.as_deref()),
            coerced,
        );
        let total_votes = coerce(
            row.total_votes.as_deref(),
            parse_u64_safe(row.total_votes.as_deref()),
            coerced,
        );
        let amount_spent = coerce(
            row.amount_spent.as_deref(),
            parse_f64_safe(row.amount_spent.as_deref()),
            coerced,
        );

        records.push(ElectionRecord {
            state,
            constituency,
            phase: normalize_phase(&phase),
            total_electors,
            polled_pct,
            total_votes,
            amount_spent,
        });
    }

    report.kept_rows = records.len();
    log_report("election results", &report);
    Ok((records, report))
}

/// `"2.0"` and `"2"` name the same phase.
fn normalize_phase(phase: &str) -> String {
    match phase.strip_suffix(".0") {
        Some(whole) if !whole.is_empty() && whole.chars().all(|c| c.is_ascii_digit()) => {
            whole.to_string()
        }
        _ => phase.to_string(),
    }
}

fn log_report(what: &str, report: &LoadReport) {
    info!(
        "Loaded {} of {} {} rows",
        report.kept_rows, report.total_rows, what
    );
    if report.skipped_rows > 0 {
        warn!("{} {} rows skipped", report.skipped_rows, what);
    }
    if report.coerced_cells > 0 {
        warn!(
            "{} unparseable numeric cells in {} treated as missing",
            report.coerced_cells, what
        );
    }
}
