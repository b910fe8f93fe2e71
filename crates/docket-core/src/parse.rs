//! Tolerant extraction of classification fields from the service's output.
//!
//! The upstream response is best-effort text, not a fixed wire schema. A
//! JSON object is preferred when one is embedded anywhere in the response;
//! otherwise labeled lines ("Court: ...") are scanned. Field names are
//! matched through alias lists after canonicalization, so heading variants,
//! ordering, and markdown decoration do not matter.

use crate::errors::{ParseErrorKind, TriageError};
use crate::model::{CaseType, ClassificationResult, Urgency};
use serde_json::Value;
use std::collections::HashMap;

const CASE_TYPE_ALIASES: &[&str] = &["casetype", "category", "casecategory", "type"];
const COURT_ALIASES: &[&str] = &["recommendedcourt", "courttype", "court", "competentcourt"];
const URGENCY_ALIASES: &[&str] = &["urgency", "priority", "urgencylevel"];
const CONFIDENCE_ALIASES: &[&str] = &["confidence", "confidencescore", "score"];
const RATIONALE_ALIASES: &[&str] = &["rationale", "reasoning", "justification", "reason"];
const SUMMARY_ALIASES: &[&str] = &["summary"];
const KEYWORD_ALIASES: &[&str] = &["keywords", "keyterms"];
const MALICIOUS_ALIASES: &[&str] = &["islikelymalicious", "likelymalicious", "malicious"];
const MALICIOUS_REASON_ALIASES: &[&str] = &["maliciousreason", "abusereason"];

pub fn parse_classification(
    raw: &str,
    neutral_confidence: f64,
) -> Result<ClassificationResult, TriageError> {
    let fields = extract_json_fields(raw).unwrap_or_else(|| extract_labeled_fields(raw));

    let recognized = [
        CASE_TYPE_ALIASES,
        COURT_ALIASES,
        URGENCY_ALIASES,
        CONFIDENCE_ALIASES,
        RATIONALE_ALIASES,
    ]
    .iter()
    .any(|aliases| lookup(&fields, aliases).is_some());
    if !recognized {
        return Err(TriageError::malformed_response(
            "no classification fields found in response",
        ));
    }

    let mut warnings = Vec::new();

    let case_type = match lookup_str(&fields, CASE_TYPE_ALIASES) {
        Some(s) => CaseType::parse(&s).unwrap_or_else(|| {
            warnings.push(format!(
                "{}: unknown case type '{}', mapped to other",
                ParseErrorKind::UnrecognizedCategory,
                s
            ));
            CaseType::Other
        }),
        None => {
            warnings.push(format!(
                "{}: case type absent, defaulted to other",
                ParseErrorKind::MissingField
            ));
            CaseType::Other
        }
    };

    let recommended_court = match lookup_str(&fields, COURT_ALIASES) {
        Some(s) => s,
        None => {
            warnings.push(format!(
                "{}: recommended court absent",
                ParseErrorKind::MissingField
            ));
            String::new()
        }
    };

    let urgency = match lookup_str(&fields, URGENCY_ALIASES) {
        Some(s) => Urgency::parse(&s).unwrap_or_else(|| {
            warnings.push(format!(
                "{}: unknown urgency '{}', defaulted to normal",
                ParseErrorKind::UnrecognizedCategory,
                s
            ));
            Urgency::Normal
        }),
        None => {
            warnings.push(format!(
                "{}: urgency absent, defaulted to normal",
                ParseErrorKind::MissingField
            ));
            Urgency::Normal
        }
    };

    let confidence = match lookup(&fields, CONFIDENCE_ALIASES) {
        Some(v) => match parse_confidence(v) {
            Ok(c) => {
                let clamped = c.clamp(0.0, 1.0);
                if (clamped - c).abs() > f64::EPSILON {
                    warnings.push(format!("confidence {} clamped to {}", c, clamped));
                }
                clamped
            }
            Err(e) => {
                warnings.push(format!("{}, defaulted to {}", e, neutral_confidence));
                neutral_confidence
            }
        },
        None => {
            warnings.push(format!(
                "{}: confidence absent, defaulted to {}",
                ParseErrorKind::MissingField,
                neutral_confidence
            ));
            neutral_confidence
        }
    };

    let rationale = lookup_str(&fields, RATIONALE_ALIASES).unwrap_or_else(|| {
        warnings.push(format!(
            "{}: rationale absent",
            ParseErrorKind::MissingField
        ));
        String::new()
    });

    let is_likely_malicious = match lookup(&fields, MALICIOUS_ALIASES) {
        Some(v) => parse_bool(v).unwrap_or_else(|| {
            warnings.push(format!("malicious flag has unexpected shape: {}", v));
            false
        }),
        None => false,
    };

    Ok(ClassificationResult {
        case_type,
        recommended_court,
        urgency,
        confidence,
        rationale,
        summary: lookup_str(&fields, SUMMARY_ALIASES),
        keywords: lookup_keywords(&fields),
        is_likely_malicious,
        malicious_reason: lookup_str(&fields, MALICIOUS_REASON_ALIASES),
        warnings,
        raw_response: raw.to_string(),
    })
}

/// Locate and parse the first JSON object embedded in the text. Trailing
/// prose after the object is ignored.
fn extract_json_fields(raw: &str) -> Option<HashMap<String, Value>> {
    let start = raw.find('{')?;
    let value: Value = serde_json::Deserializer::from_str(&raw[start..])
        .into_iter::<Value>()
        .next()?
        .ok()?;
    let obj = value.as_object()?;
    Some(
        obj.iter()
            .map(|(k, v)| (canonical_key(k), v.clone()))
            .collect(),
    )
}

/// Fallback: scan "Label: value" lines, tolerating bullets and markdown
/// emphasis around the label.
fn extract_labeled_fields(raw: &str) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    for line in raw.lines() {
        let line = line.trim_start_matches(['-', '*', '#', ' ', '\t']);
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let key = canonical_key(label);
        let value = value.trim_matches(['*', ' ', '\t']);
        if !key.is_empty() && !value.is_empty() {
            // First occurrence wins; later repeats are duplicates or prose.
            fields
                .entry(key)
                .or_insert_with(|| Value::String(value.to_string()));
        }
    }
    fields
}

/// Lowercase, alphanumeric-only key form: "Case Type", "caseType" and
/// "case_type" all collapse to "casetype".
fn canonical_key(k: &str) -> String {
    k.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn lookup<'a>(fields: &'a HashMap<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|a| fields.get(*a))
}

fn lookup_str(fields: &HashMap<String, Value>, aliases: &[&str]) -> Option<String> {
    match lookup(fields, aliases)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lookup_keywords(fields: &HashMap<String, Value>) -> Vec<String> {
    match lookup(fields, KEYWORD_ALIASES) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn parse_confidence(v: &Value) -> Result<f64, TriageError> {
    match v {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            TriageError::parse(
                ParseErrorKind::MalformedConfidence,
                format!("confidence not representable: {}", n),
            )
        }),
        Value::String(s) => {
            // Percent form means a 0-100 scale.
            let (digits, scale) = match s.trim().strip_suffix('%') {
                Some(stripped) => (stripped.trim_end(), 100.0),
                None => (s.trim(), 1.0),
            };
            digits.parse::<f64>().map(|c| c / scale).map_err(|_| {
                TriageError::parse(
                    ParseErrorKind::MalformedConfidence,
                    format!("confidence not numeric: '{}'", s),
                )
            })
        }
        other => Err(TriageError::parse(
            ParseErrorKind::MalformedConfidence,
            format!("confidence has unexpected shape: {}", other),
        )),
    }
}
