use crate::config::TriageConfig;
use crate::errors::TriageError;
use crate::model::{CaseSubmission, RawSubmission};
use chrono::Utc;
use uuid::Uuid;

/// Validates and canonicalizes raw field values into a `CaseSubmission`.
/// The only side effect is `case_id` assignment.
#[derive(Debug, Clone)]
pub struct Normalizer {
    max_subject_len: usize,
    max_name_len: usize,
}

impl Normalizer {
    pub fn new(config: &TriageConfig) -> Self {
        Self {
            max_subject_len: config.max_subject_len,
            max_name_len: config.max_name_len,
        }
    }

    pub fn normalize(&self, raw: RawSubmission) -> Result<CaseSubmission, TriageError> {
        let narrative = normalize_text(&raw.narrative);
        if narrative.is_empty() {
            return Err(TriageError::validation("narrative must not be empty"));
        }

        let subject = normalize_text(&raw.subject);
        if subject.chars().count() > self.max_subject_len {
            return Err(TriageError::validation(format!(
                "subject exceeds maximum length of {} characters",
                self.max_subject_len
            )));
        }

        let plaintiff_name = self.normalize_name(raw.plaintiff_name, "plaintiff_name")?;
        let defendant_name = self.normalize_name(raw.defendant_name, "defendant_name")?;

        Ok(CaseSubmission {
            case_id: Uuid::new_v4().to_string(),
            plaintiff_name,
            defendant_name,
            subject,
            narrative,
            submitted_at: Utc::now(),
        })
    }

    fn normalize_name(
        &self,
        name: Option<String>,
        field: &str,
    ) -> Result<Option<String>, TriageError> {
        let Some(name) = name else { return Ok(None) };
        let name = name.trim().to_string();
        if name.is_empty() {
            return Ok(None);
        }
        if name.chars().count() > self.max_name_len {
            return Err(TriageError::validation(format!(
                "{} exceeds maximum length of {} characters",
                field, self.max_name_len
            )));
        }
        Ok(Some(name))
    }
}

/// Trims outer whitespace and normalizes CRLF/CR line endings to LF.
fn normalize_text(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}
