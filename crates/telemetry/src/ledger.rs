//! Running per-backend usage totals.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Accumulated usage for one backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRow {
    pub backend: String,
    /// Model of the most recent call
    pub model: String,
    pub calls: u64,
    pub tokens: u64,
    pub cost_usd: f64,
    pub last_call: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageTotals {
    pub calls: u64,
    pub tokens: u64,
    pub cost_usd: f64,
}

/// Shared ledger; one row per backend tag.
#[derive(Default)]
pub struct UsageLedger {
    rows: Mutex<BTreeMap<String, UsageRow>>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful call.
    pub fn record(&self, backend: &str, model: &str, tokens: u32, cost_usd: f64) {
        let now = Utc::now();
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        let row = rows.entry(backend.to_string()).or_insert_with(|| UsageRow {
            backend: backend.to_string(),
            model: model.to_string(),
            calls: 0,
            tokens: 0,
            cost_usd: 0.0,
            last_call: now,
        });
        row.model = model.to_string();
        row.calls += 1;
        row.tokens += u64::from(tokens);
        row.cost_usd += cost_usd;
        row.last_call = now;
    }

    /// Rows sorted by backend tag.
    pub fn snapshot(&self) -> Vec<UsageRow> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn totals(&self) -> UsageTotals {
        self.snapshot()
            .iter()
            .fold(UsageTotals::default(), |mut acc, row| {
                acc.calls += row.calls;
                acc.tokens += row.tokens;
                acc.cost_usd += row.cost_usd;
                acc
            })
    }

    pub fn reset(&self) {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
