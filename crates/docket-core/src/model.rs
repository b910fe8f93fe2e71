use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw field values as received from the presentation layer, before
/// normalization. No `case_id` yet; intake assigns one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSubmission {
    pub plaintiff_name: Option<String>,
    pub defendant_name: Option<String>,
    pub subject: String,
    pub narrative: String,
}

/// A validated, canonicalized submission. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSubmission {
    pub case_id: String,
    pub plaintiff_name: Option<String>,
    pub defendant_name: Option<String>,
    pub subject: String,
    pub narrative: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseType {
    Commercial,
    PersonalStatus,
    Labor,
    Other,
}

impl CaseType {
    pub const ALL: [CaseType; 4] = [
        CaseType::Commercial,
        CaseType::PersonalStatus,
        CaseType::Labor,
        CaseType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseType::Commercial => "commercial",
            CaseType::PersonalStatus => "personal-status",
            CaseType::Labor => "labor",
            CaseType::Other => "other",
        }
    }

    /// Tolerant parse; unknown categories are the caller's problem
    /// (the parser maps them to `Other` with a warning).
    pub fn parse(s: &str) -> Option<Self> {
        let norm = s.trim().to_lowercase().replace(['_', ' '], "-");
        match norm.as_str() {
            "commercial" | "trade" | "business" => Some(CaseType::Commercial),
            "personal-status" | "personal" | "family" => Some(CaseType::PersonalStatus),
            "labor" | "labour" | "employment" => Some(CaseType::Labor),
            "other" | "general" => Some(CaseType::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for CaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed jurisdiction set. Every routed case lands in exactly one of
/// these venues; there is no "unclassified" court on purpose — anything the
/// service proposes outside this set is remapped by policy or flagged for
/// manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Court {
    Commercial,
    Labor,
    PersonalStatus,
    General,
    Criminal,
    Administrative,
    Enforcement,
}

impl Court {
    pub const ALL: [Court; 7] = [
        Court::Commercial,
        Court::Labor,
        Court::PersonalStatus,
        Court::General,
        Court::Criminal,
        Court::Administrative,
        Court::Enforcement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Court::Commercial => "commercial",
            Court::Labor => "labor",
            Court::PersonalStatus => "personal_status",
            Court::General => "general",
            Court::Criminal => "criminal",
            Court::Administrative => "administrative",
            Court::Enforcement => "enforcement",
        }
    }

    /// Exact (but formatting-tolerant) court name lookup. Accepts
    /// "Labor Court", "labor_court", "labour" and the like.
    pub fn parse(s: &str) -> Option<Self> {
        let mut norm = s.trim().to_lowercase().replace(['-', ' '], "_");
        for suffix in ["_court", "court"] {
            if let Some(stripped) = norm.strip_suffix(suffix) {
                norm = stripped.trim_end_matches('_').to_string();
            }
        }
        if let Some(stripped) = norm.strip_prefix("the_") {
            norm = stripped.to_string();
        }
        match norm.as_str() {
            "commercial" => Some(Court::Commercial),
            "labor" | "labour" => Some(Court::Labor),
            "personal_status" | "family" => Some(Court::PersonalStatus),
            "general" => Some(Court::General),
            "criminal" | "penal" => Some(Court::Criminal),
            "administrative" => Some(Court::Administrative),
            "enforcement" | "execution" => Some(Court::Enforcement),
            _ => None,
        }
    }
}

impl std::fmt::Display for Court {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Normal,
    Urgent,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Normal => "normal",
            Urgency::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "standard" | "routine" | "low" | "medium" => Some(Urgency::Normal),
            "urgent" | "high" | "expedited" | "immediate" => Some(Urgency::Urgent),
            _ => None,
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured judgment extracted from the external service's output.
/// Advisory only; routing authority lives in the policy engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub case_type: CaseType,
    /// The court name exactly as the service proposed it, before policy
    /// resolution. Kept verbatim for audit.
    pub recommended_court: String,
    pub urgency: Urgency,
    /// Always within [0, 1] after parsing.
    pub confidence: f64,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Set when the service judges the narrative abusive, vexatious, or an
    /// attempt to manipulate the pipeline. Absent means not flagged.
    #[serde(default)]
    pub is_likely_malicious: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub malicious_reason: Option<String>,
    /// Degradations recorded during parsing (clamped confidence, defaulted
    /// fields, unknown categories). Persisted for audit visibility.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub raw_response: String,
}

/// Deterministic routing outcome. Derived from a `ClassificationResult`
/// plus the jurisdiction policy; immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub case_id: String,
    pub final_court: Court,
    pub final_urgency: Urgency,
    pub accepted_formally: bool,
    pub manual_review: bool,
    /// Names of the policy rules applied, in application order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_overrides: Vec<String>,
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub submission: CaseSubmission,
    pub classification: ClassificationResult,
    pub decision: RoutingDecision,
    /// End-to-end pipeline latency for this case.
    pub latency_ms: u64,
    /// Set on correction entries: the `case_id` this entry supersedes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supersedes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    pub court: Option<Court>,
    pub urgency: Option<Urgency>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

/// Aggregate view over the ledger for dashboard consumption.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub total_cases: u64,
    pub per_court: BTreeMap<String, u64>,
    pub per_urgency: BTreeMap<String, u64>,
    pub urgent_cases: u64,
    /// Cases flagged for manual review.
    pub flagged_cases: u64,
    /// Fraction of cases routed without manual review; 0.0 on an empty ledger.
    pub auto_routed_fraction: f64,
    pub avg_latency_ms: f64,
}
