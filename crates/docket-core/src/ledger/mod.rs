//! Append-only audit store. `case_id` is unique for the ledger's lifetime;
//! there is no update or delete path. Corrections reference the entry they
//! supersede and are appended like any other entry.

pub mod schema;

use crate::errors::TriageError;
use crate::model::{LedgerEntry, LedgerFilter};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub struct Ledger {
    conn: Arc<Mutex<Connection>>,
}

impl Ledger {
    pub fn open(path: &Path) -> Result<Self, TriageError> {
        let conn = Connection::open(path)?;
        let ledger = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        ledger.init_schema()?;
        Ok(ledger)
    }

    pub fn memory() -> Result<Self, TriageError> {
        let conn = Connection::open_in_memory()?;
        let ledger = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        ledger.init_schema()?;
        Ok(ledger)
    }

    fn init_schema(&self) -> Result<(), TriageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(schema::DDL)?;
        Ok(())
    }

    /// Single atomic insert; either the whole entry lands or nothing does.
    pub fn append(&self, entry: &LedgerEntry) -> Result<(), TriageError> {
        self.insert(entry, None)
    }

    /// Append a correction for an existing case. The original row is never
    /// touched; the new entry records which `case_id` it supersedes.
    pub fn append_correction(
        &self,
        entry: &LedgerEntry,
        supersedes: &str,
    ) -> Result<(), TriageError> {
        // The referenced original must exist.
        self.get(supersedes)?;
        self.insert(entry, Some(supersedes))
    }

    fn insert(&self, entry: &LedgerEntry, supersedes: Option<&str>) -> Result<(), TriageError> {
        let submission_json = serde_json::to_string(&entry.submission)?;
        let classification_json = serde_json::to_string(&entry.classification)?;
        let decision_json = serde_json::to_string(&entry.decision)?;

        let conn = self.conn.lock().unwrap();
        let result = conn.execute(
            "INSERT INTO cases(case_id, submitted_at, final_court, final_urgency,
                               accepted_formally, manual_review, latency_ms, supersedes,
                               submission_json, classification_json, decision_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                entry.submission.case_id,
                timestamp(&entry.submission.submitted_at),
                entry.decision.final_court.as_str(),
                entry.decision.final_urgency.as_str(),
                entry.decision.accepted_formally,
                entry.decision.manual_review,
                entry.latency_ms as i64,
                supersedes,
                submission_json,
                classification_json,
                decision_json,
            ],
        );

        match result {
            Ok(_) => {
                info!(case_id = %entry.submission.case_id, "ledger entry appended");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(TriageError::DuplicateCase(entry.submission.case_id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get(&self, case_id: &str) -> Result<LedgerEntry, TriageError> {
        let row = {
            let conn = self.conn.lock().unwrap();
            conn.query_row(
                "SELECT submission_json, classification_json, decision_json, latency_ms, supersedes
                 FROM cases WHERE case_id = ?1",
                params![case_id],
                raw_row,
            )
            .optional()?
        };
        match row {
            Some(raw) => entry_from_raw(raw),
            None => Err(TriageError::NotFound(case_id.to_string())),
        }
    }

    /// Entries matching the filter, in append order. Each call prepares a
    /// fresh statement, so iteration is restartable by calling again.
    pub fn list(&self, filter: &LedgerFilter) -> Result<Vec<LedgerEntry>, TriageError> {
        let mut sql = String::from(
            "SELECT submission_json, classification_json, decision_json, latency_ms, supersedes
             FROM cases",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<rusqlite::types::Value> = Vec::new();

        if let Some(court) = filter.court {
            clauses.push("final_court = ?");
            values.push(court.as_str().to_string().into());
        }
        if let Some(urgency) = filter.urgency {
            clauses.push("final_urgency = ?");
            values.push(urgency.as_str().to_string().into());
        }
        if let Some(since) = filter.since {
            clauses.push("submitted_at >= ?");
            values.push(timestamp(&since).into());
        }
        if let Some(until) = filter.until {
            clauses.push("submitted_at <= ?");
            values.push(timestamp(&until).into());
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY seq ASC");

        let raws = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params_from_iter(values), raw_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        raws.into_iter().map(entry_from_raw).collect()
    }

    pub fn len(&self) -> Result<u64, TriageError> {
        let conn = self.conn.lock().unwrap();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM cases", [], |r| r.get(0))?;
        Ok(n as u64)
    }

    pub fn is_empty(&self) -> Result<bool, TriageError> {
        Ok(self.len()? == 0)
    }
}

/// Timestamps are column values compared lexicographically, so both the
/// write and filter sides must use the same fixed precision.
fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

type RawRow = (String, String, String, i64, Option<String>);

fn raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn entry_from_raw(raw: RawRow) -> Result<LedgerEntry, TriageError> {
    let (submission_json, classification_json, decision_json, latency_ms, supersedes) = raw;
    Ok(LedgerEntry {
        submission: serde_json::from_str(&submission_json)?,
        classification: serde_json::from_str(&classification_json)?,
        decision: serde_json::from_str(&decision_json)?,
        latency_ms: latency_ms.max(0) as u64,
        supersedes,
    })
}
