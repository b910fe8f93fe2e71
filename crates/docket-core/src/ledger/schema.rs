pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS cases (
  seq INTEGER PRIMARY KEY AUTOINCREMENT,
  case_id TEXT NOT NULL UNIQUE,
  submitted_at TEXT NOT NULL,
  final_court TEXT NOT NULL,
  final_urgency TEXT NOT NULL,
  accepted_formally INTEGER NOT NULL,
  manual_review INTEGER NOT NULL,
  latency_ms INTEGER NOT NULL,
  supersedes TEXT REFERENCES cases(case_id),
  submission_json TEXT NOT NULL,
  classification_json TEXT NOT NULL,
  decision_json TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cases_court ON cases(final_court);
CREATE INDEX IF NOT EXISTS idx_cases_urgency ON cases(final_urgency);
CREATE INDEX IF NOT EXISTS idx_cases_submitted_at ON cases(submitted_at);
"#;
