//! Operation timeline analysis of inspection logs.
//!
//! Inspection logs are tab-separated. After a header line, every data line
//! carries a scope, an operation name, a `START`/`END` status and a JSON
//! payload naming the barrel it belongs to:
//!
//! ```text
//! SEM_LOG_VERSION 2.1
//! ...  \t<scope>\t<operation>\tSTART\t{"barrelId":"B1","startTs":100}
//! ...  \t<scope>\t<operation>\tEND\t{"barrelId":"B1","endTs":150,"actualMs":50,"idealMs":80}
//! ```
//!
//! Parsing is best-effort: malformed lines are skipped, never reported.
//! All state lives inside one [`analyze_log`] call.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

// ── Log format ───────────────────────────────────────────────────────────────

/// Header token that starts the data section.
pub const VERSION_MARKER: &str = "SEM_LOG_VERSION";
/// Column-header token that also starts the data section.
pub const COLUMN_HEADER_MARKER: &str = "Datetime\t";
/// Lines with fewer columns are malformed.
pub const MIN_COLUMNS: usize = 10;
/// Ideal duration assumed when an END payload has no `idealMs`.
pub const DEFAULT_IDEAL_MS: i64 = 100;

const SCOPE_COLUMN: usize = 8;
const NAME_COLUMN: usize = 9;
const STATUS_COLUMN: usize = 10;
const PAYLOAD_COLUMN: usize = 11;

// ── Output model ─────────────────────────────────────────────────────────────

/// Analysis switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Report STARTs that never saw their END instead of dropping them.
    pub report_incomplete: bool,
}

/// One completed operation of a barrel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    pub operation_name: String,
    pub start_time: i64,
    pub end_time: i64,
    pub actual_duration: i64,
    pub ideal_duration: i64,
    /// 1-based, in END arrival order within the barrel.
    pub sequence: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Barrel {
    pub barrel_id: String,
    pub total_execution_time: i64,
    pub operations: Vec<OperationRecord>,
}

/// Statistics over barrel totals (not over operations).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_barrels: usize,
    pub average_execution_time: f64,
    pub min_execution_time: i64,
    pub max_execution_time: i64,
}

/// A START left without END at the end of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncompleteOperation {
    pub barrel_id: String,
    pub operation_name: String,
    pub start_time: i64,
}

/// Result of one analysis pass. Barrels are ordered by `barrel_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAnalysis {
    pub barrels: Vec<Barrel>,
    pub summary: AnalysisSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomplete_operations: Option<Vec<IncompleteOperation>>,
}

// ── Parsing ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    End,
}

/// One data line that names a barrel.
#[derive(Debug)]
struct LogEvent {
    barrel_id: String,
    operation_key: String,
    phase: Option<Phase>,
    payload: Value,
}

fn parse_line(line: &str) -> Option<LogEvent> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() < MIN_COLUMNS {
        return None;
    }
    let column = |i: usize| columns.get(i).copied().unwrap_or_default();

    let payload_text = column(PAYLOAD_COLUMN);
    if payload_text.is_empty() {
        return None;
    }
    let payload: Value = serde_json::from_str(payload_text).ok()?;
    let barrel_id = payload.get("barrelId")?.as_str()?.to_string();

    let scope = column(SCOPE_COLUMN);
    let name = column(NAME_COLUMN);
    let operation_key = if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}_{name}")
    };

    let phase = match column(STATUS_COLUMN) {
        "START" => Some(Phase::Start),
        "END" => Some(Phase::End),
        _ => None,
    };

    Some(LogEvent {
        barrel_id,
        operation_key,
        phase,
        payload,
    })
}

/// Integer payload field. A missing key yields `default`; a present value
/// that is not a number yields `None` and the line is skipped. Fractional
/// values are truncated.
#[allow(clippy::cast_possible_truncation)]
fn int_field(payload: &Value, key: &str, default: i64) -> Option<i64> {
    match payload.get(key) {
        Some(v) => v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)),
        None => Some(default),
    }
}

/// Record fields of a matched END, or `None` when any is unreadable.
struct EndFields {
    start_time: i64,
    end_time: i64,
    actual_duration: i64,
    ideal_duration: i64,
}

fn end_fields(start: &Value, end: &Value) -> Option<EndFields> {
    Some(EndFields {
        start_time: int_field(start, "startTs", 0)?,
        end_time: int_field(end, "endTs", 0)?,
        actual_duration: int_field(end, "actualMs", 0)?,
        ideal_duration: int_field(end, "idealMs", DEFAULT_IDEAL_MS)?,
    })
}

// ── Analysis ─────────────────────────────────────────────────────────────────

/// Rebuild the per-barrel operation timeline of a log and summarise it.
#[must_use]
pub fn analyze_log(content: &str, options: AnalysisOptions) -> LogAnalysis {
    let mut barrels: BTreeMap<String, Barrel> = BTreeMap::new();
    // (barrel, operation) -> payload of the latest unmatched START
    let mut pending: BTreeMap<(String, String), Value> = BTreeMap::new();
    let mut in_data = false;

    for line in content.lines() {
        if line.is_empty() {
            continue;
        }
        if line.contains(VERSION_MARKER) || line.contains(COLUMN_HEADER_MARKER) {
            in_data = true;
            continue;
        }
        if !in_data {
            continue;
        }
        let Some(event) = parse_line(line) else {
            continue;
        };

        let barrel = barrels
            .entry(event.barrel_id.clone())
            .or_insert_with(|| Barrel {
                barrel_id: event.barrel_id.clone(),
                total_execution_time: 0,
                operations: Vec::new(),
            });
        let key = (event.barrel_id, event.operation_key);

        match event.phase {
            Some(Phase::Start) => {
                pending.insert(key, event.payload);
            }
            Some(Phase::End) => {
                let Some(start) = pending.get(&key) else {
                    continue;
                };
                // Unreadable fields skip the END; its START stays pending.
                let Some(fields) = end_fields(start, &event.payload) else {
                    continue;
                };
                pending.remove(&key);
                barrel.operations.push(OperationRecord {
                    operation_name: key.1,
                    start_time: fields.start_time,
                    end_time: fields.end_time,
                    actual_duration: fields.actual_duration,
                    ideal_duration: fields.ideal_duration,
                    sequence: barrel.operations.len() + 1,
                });
                barrel.total_execution_time = barrel
                    .total_execution_time
                    .saturating_add(fields.actual_duration);
            }
            None => {}
        }
    }

    let incomplete_operations = options.report_incomplete.then(|| {
        pending
            .into_iter()
            .map(|((barrel_id, operation_name), start)| IncompleteOperation {
                barrel_id,
                operation_name,
                start_time: int_field(&start, "startTs", 0).unwrap_or_default(),
            })
            .collect()
    });

    let barrels: Vec<Barrel> = barrels.into_values().collect();
    LogAnalysis {
        summary: summarize(&barrels),
        barrels,
        incomplete_operations,
    }
}

#[allow(clippy::cast_precision_loss)]
fn summarize(barrels: &[Barrel]) -> AnalysisSummary {
    let totals = barrels.iter().map(|b| b.total_execution_time);
    let total_time = totals.clone().fold(0_i64, i64::saturating_add);
    let average_execution_time = if barrels.is_empty() {
        0.0
    } else {
        total_time as f64 / barrels.len() as f64
    };

    AnalysisSummary {
        total_barrels: barrels.len(),
        average_execution_time,
        min_execution_time: totals.clone().min().unwrap_or(0),
        max_execution_time: totals.max().unwrap_or(0),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
