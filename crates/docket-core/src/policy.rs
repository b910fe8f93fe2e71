//! Deterministic routing on top of the advisory classification.
//!
//! The upstream judgment is noisy; this layer guarantees that every case
//! lands in a court from the fixed jurisdiction set, that urgency respects
//! the exemption list, and that low-confidence cases are held for manual
//! review instead of being formally accepted.

use crate::config::TriageConfig;
use crate::model::{CaseType, ClassificationResult, Court, RoutingDecision, Urgency};
use chrono::Utc;
use tracing::debug;

/// Similarity floor for remapping an out-of-set court name to a known venue.
const COURT_MATCH_THRESHOLD: f64 = 0.55;

/// Rule names recorded in `RoutingDecision.policy_overrides`.
pub mod overrides {
    pub const COURT_REMAPPED: &str = "court_remapped";
    pub const COURT_UNRECOGNIZED: &str = "court_unrecognized";
    pub const JURISDICTION_TABLE: &str = "jurisdiction_table";
    pub const URGENCY_EXEMPT: &str = "urgency_exempt";
    pub const LOW_CONFIDENCE: &str = "low_confidence";
    pub const MALICIOUS_FLAG: &str = "malicious_flag";
}

#[derive(Debug, Clone)]
pub struct JurisdictionPolicy {
    min_confidence: f64,
    urgency_exempt: Vec<CaseType>,
}

impl JurisdictionPolicy {
    pub fn new(config: &TriageConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            urgency_exempt: config.urgency_exempt.clone(),
        }
    }

    /// The court a case type belongs to when the recommendation is unusable
    /// or inconsistent.
    pub fn canonical_court(case_type: CaseType) -> Court {
        match case_type {
            CaseType::Commercial => Court::Commercial,
            CaseType::Labor => Court::Labor,
            CaseType::PersonalStatus => Court::PersonalStatus,
            CaseType::Other => Court::General,
        }
    }

    /// Courts authorized to hear a case type. `Other` spans the venues that
    /// have no dedicated case type of their own.
    pub fn eligible_courts(case_type: CaseType) -> &'static [Court] {
        match case_type {
            CaseType::Commercial => &[Court::Commercial, Court::Enforcement],
            CaseType::Labor => &[Court::Labor, Court::Enforcement],
            CaseType::PersonalStatus => &[Court::PersonalStatus],
            CaseType::Other => &[
                Court::General,
                Court::Criminal,
                Court::Administrative,
                Court::Enforcement,
            ],
        }
    }

    pub fn decide(&self, case_id: &str, classification: &ClassificationResult) -> RoutingDecision {
        let mut policy_overrides = Vec::new();
        let mut manual_review = false;

        // 1. Resolve the recommended court against the jurisdiction set.
        let resolved = resolve_court(&classification.recommended_court, &mut policy_overrides);
        let resolved = match resolved {
            Some(court) => court,
            None => {
                policy_overrides.push(overrides::COURT_UNRECOGNIZED.to_string());
                manual_review = true;
                Self::canonical_court(classification.case_type)
            }
        };

        // 2. Jurisdiction table beats the recommendation.
        let final_court = if Self::eligible_courts(classification.case_type).contains(&resolved) {
            resolved
        } else {
            policy_overrides.push(overrides::JURISDICTION_TABLE.to_string());
            Self::canonical_court(classification.case_type)
        };

        // 3. Urgency escalation exemptions.
        let final_urgency = if classification.urgency == Urgency::Urgent
            && self.urgency_exempt.contains(&classification.case_type)
        {
            policy_overrides.push(overrides::URGENCY_EXEMPT.to_string());
            Urgency::Normal
        } else {
            classification.urgency
        };

        // 4. Formal admissibility gate: confident and not flagged malicious.
        if classification.confidence < self.min_confidence {
            policy_overrides.push(overrides::LOW_CONFIDENCE.to_string());
            manual_review = true;
        }
        if classification.is_likely_malicious {
            policy_overrides.push(overrides::MALICIOUS_FLAG.to_string());
            manual_review = true;
        }
        let accepted_formally = classification.confidence >= self.min_confidence
            && !classification.is_likely_malicious;

        debug!(
            case_id,
            court = %final_court,
            urgency = %final_urgency,
            accepted_formally,
            overrides = policy_overrides.len(),
            "routing decided"
        );

        RoutingDecision {
            case_id: case_id.to_string(),
            final_court,
            final_urgency,
            accepted_formally,
            manual_review,
            policy_overrides,
            decided_at: Utc::now(),
        }
    }
}

/// Exact parse first, then fuzzy match against the known venue names.
fn resolve_court(name: &str, policy_overrides: &mut Vec<String>) -> Option<Court> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    if let Some(court) = Court::parse(name) {
        return Some(court);
    }

    let needle = name.to_lowercase();
    let mut best: Option<(Court, f64)> = None;
    for court in Court::ALL {
        let sim = strsim::normalized_levenshtein(&needle, court.as_str());
        if sim >= COURT_MATCH_THRESHOLD && best.map_or(true, |(_, b)| sim > b) {
            best = Some((court, sim));
        }
    }
    best.map(|(court, _)| {
        policy_overrides.push(overrides::COURT_REMAPPED.to_string());
        court
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(
        case_type: CaseType,
        court: &str,
        urgency: Urgency,
        confidence: f64,
    ) -> ClassificationResult {
        ClassificationResult {
            case_type,
            recommended_court: court.to_string(),
            urgency,
            confidence,
            rationale: "test".to_string(),
            summary: None,
            keywords: Vec::new(),
            is_likely_malicious: false,
            malicious_reason: None,
            warnings: Vec::new(),
            raw_response: String::new(),
        }
    }

    fn policy() -> JurisdictionPolicy {
        JurisdictionPolicy::new(&TriageConfig::default())
    }

    #[test]
    fn consistent_recommendation_passes_through() {
        let d = policy().decide(
            "c-1",
            &classification(CaseType::Labor, "labor", Urgency::Urgent, 0.9),
        );
        assert_eq!(d.final_court, Court::Labor);
        assert_eq!(d.final_urgency, Urgency::Urgent);
        assert!(d.accepted_formally);
        assert!(!d.manual_review);
        assert!(d.policy_overrides.is_empty());
    }

    #[test]
    fn labor_case_recommended_to_commercial_court_is_overridden() {
        let d = policy().decide(
            "c-2",
            &classification(CaseType::Labor, "commercial", Urgency::Normal, 0.9),
        );
        assert_eq!(d.final_court, Court::Labor);
        assert_eq!(d.policy_overrides, vec![overrides::JURISDICTION_TABLE]);
        assert!(d.accepted_formally);
        assert!(!d.manual_review);
    }

    #[test]
    fn misspelled_court_is_remapped() {
        let d = policy().decide(
            "c-3",
            &classification(CaseType::Commercial, "comercial", Urgency::Normal, 0.8),
        );
        assert_eq!(d.final_court, Court::Commercial);
        assert!(d
            .policy_overrides
            .contains(&overrides::COURT_REMAPPED.to_string()));
        assert!(!d.manual_review);
    }

    #[test]
    fn unrecognizable_court_falls_back_and_flags_review() {
        let d = policy().decide(
            "c-4",
            &classification(CaseType::PersonalStatus, "xyzzy", Urgency::Normal, 0.8),
        );
        assert_eq!(d.final_court, Court::PersonalStatus);
        assert!(d
            .policy_overrides
            .contains(&overrides::COURT_UNRECOGNIZED.to_string()));
        assert!(d.manual_review);
        // Still admissible: the classification itself was confident.
        assert!(d.accepted_formally);
    }

    #[test]
    fn urgency_exempt_case_type_is_forced_normal() {
        let d = policy().decide(
            "c-5",
            &classification(CaseType::Other, "general", Urgency::Urgent, 0.9),
        );
        assert_eq!(d.final_urgency, Urgency::Normal);
        assert_eq!(d.policy_overrides, vec![overrides::URGENCY_EXEMPT]);
    }

    #[test]
    fn low_confidence_blocks_formal_acceptance() {
        let d = policy().decide(
            "c-6",
            &classification(CaseType::Commercial, "commercial", Urgency::Normal, 0.3),
        );
        assert!(!d.accepted_formally);
        assert!(d.manual_review);
        assert_eq!(d.policy_overrides, vec![overrides::LOW_CONFIDENCE]);
    }

    #[test]
    fn malicious_flag_blocks_acceptance_despite_high_confidence() {
        let mut c = classification(CaseType::Commercial, "commercial", Urgency::Normal, 0.95);
        c.is_likely_malicious = true;
        c.malicious_reason = Some("vexatious refiling".to_string());
        let d = policy().decide("c-8", &c);
        assert!(!d.accepted_formally);
        assert!(d.manual_review);
        assert_eq!(d.policy_overrides, vec![overrides::MALICIOUS_FLAG]);
        // Routing itself is unaffected; only admissibility is.
        assert_eq!(d.final_court, Court::Commercial);
    }

    #[test]
    fn final_court_always_in_jurisdiction_set() {
        for case_type in CaseType::ALL {
            for court in ["", "???", "supreme galactic tribunal", "labor", "enforcement"] {
                let d = policy().decide(
                    "c-x",
                    &classification(case_type, court, Urgency::Normal, 0.9),
                );
                assert!(Court::ALL.contains(&d.final_court));
                assert!(
                    JurisdictionPolicy::eligible_courts(case_type).contains(&d.final_court),
                    "{case_type:?} routed to ineligible {:?}",
                    d.final_court
                );
            }
        }
    }

    #[test]
    fn decisions_are_deterministic() {
        let c = classification(CaseType::Labor, "comercial curt", Urgency::Urgent, 0.4);
        let a = policy().decide("c-7", &c);
        let b = policy().decide("c-7", &c);
        assert_eq!(a.final_court, b.final_court);
        assert_eq!(a.policy_overrides, b.policy_overrides);
        assert_eq!(a.accepted_formally, b.accepted_formally);
    }
}
