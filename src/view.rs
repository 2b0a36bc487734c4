//! Selection scope → chartable series.
//!
//! Everything here is a pure function of its inputs, so it can run on every
//! selection change without caching.

use crate::aggregator::{aggregate, AggregateRecord, GroupedSummary, Rule};
use crate::config::ALL_LABEL;
use crate::types::{ElectionRecord, Field};
use std::collections::HashMap;

/// What a dropdown currently selects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    Key(String),
}

impl Scope {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value == ALL_LABEL {
            Scope::All
        } else {
            Scope::Key(value.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Scope::All => ALL_LABEL,
            Scope::Key(k) => k,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub label: String,
    pub record: AggregateRecord,
}

/// Rows ready to be mapped onto a chart's x-axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub rows: Vec<SeriesRow>,
    /// Set when the selection was not among the known keys.
    pub missing: Option<String>,
}

impl Series {
    fn not_found(key: &str) -> Self {
        Series {
            rows: Vec::new(),
            missing: Some(key.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

impl From<&GroupedSummary<String>> for Series {
    fn from(summary: &GroupedSummary<String>) -> Self {
        Series {
            rows: summary
                .iter()
                .map(|(k, r)| SeriesRow {
                    label: k.clone(),
                    record: r.clone(),
                })
                .collect(),
            missing: None,
        }
    }
}

/// Resolve the series for `scope`.
///
/// - `All` returns `global` unchanged, one row per top-level key.
/// - A key without `secondary` returns that subset's raw rows, one per
///   constituency.
/// - A key with `secondary` re-aggregates the subset by it with `rules`.
/// - An unknown key yields an empty series with `missing` set.
pub fn resolve_view(
    scope: &Scope,
    global: &GroupedSummary<String>,
    subsets: &HashMap<String, Vec<ElectionRecord>>,
    secondary: Option<&dyn Fn(&ElectionRecord) -> String>,
    rules: &[(Field, Rule)],
) -> Series {
    let key = match scope {
        Scope::All => return Series::from(global),
        Scope::Key(k) => k,
    };
    let Some(subset) = subsets.get(key) else {
        return Series::not_found(key);
    };

    match secondary {
        Some(key_fn) => Series::from(&aggregate(subset, key_fn, rules)),
        None => Series {
            rows: subset
                .iter()
                .map(|r| SeriesRow {
                    label: r.constituency.clone(),
                    record: AggregateRecord::from_row(r, rules),
                })
                .collect(),
            missing: None,
        },
    }
}
