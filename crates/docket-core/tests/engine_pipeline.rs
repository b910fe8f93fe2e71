//! End-to-end pipeline scenarios against a scripted service double and an
//! in-memory ledger.

use docket_core::errors::ServiceErrorKind;
use docket_core::providers::llm::FakeClient;
use docket_core::{
    Court, LedgerFilter, RawSubmission, TriageConfig, TriageEngine, TriageError, Urgency,
};
use docket_core::Ledger;
use std::sync::Arc;

const LABOR_JSON: &str = r#"{"case_type":"labor","recommended_court":"labor",
    "urgency":"normal","confidence":0.9,"rationale":"unpaid wages",
    "summary":"wage claim","keywords":["wages"]}"#;

fn raw(narrative: &str) -> RawSubmission {
    RawSubmission {
        narrative: narrative.to_string(),
        subject: "subject".to_string(),
        plaintiff_name: Some("Plaintiff".to_string()),
        defendant_name: None,
    }
}

fn engine_with(client: FakeClient) -> (TriageEngine, Ledger) {
    let config = TriageConfig {
        backoff_base_ms: 1,
        ..Default::default()
    };
    let ledger = Ledger::memory().expect("in-memory ledger");
    let engine = TriageEngine::new(&config, Arc::new(client), ledger.clone());
    (engine, ledger)
}

#[tokio::test]
async fn valid_submission_lands_one_entry_in_jurisdiction_set() {
    let (engine, ledger) = engine_with(FakeClient::new("fake").with_response(LABOR_JSON));

    let decision = engine.submit(raw("Employer withheld wages.")).await.unwrap();
    assert!(Court::ALL.contains(&decision.final_court));
    assert_eq!(decision.final_court, Court::Labor);
    assert!(decision.accepted_formally);

    let entries = ledger.list(&LedgerFilter::default()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].decision, decision);
}

#[tokio::test]
async fn empty_narrative_fails_validation_without_ledger_write() {
    let (engine, ledger) = engine_with(FakeClient::new("fake").with_response(LABOR_JSON));

    let err = engine.submit(raw("   ")).await.unwrap_err();
    assert!(matches!(err, TriageError::Validation(_)));
    assert!(ledger.is_empty().unwrap());
}

#[tokio::test]
async fn timeouts_on_all_attempts_surface_and_write_nothing() {
    let (engine, ledger) = engine_with(
        FakeClient::new("fake")
            .push_err(TriageError::timeout("slow"))
            .push_err(TriageError::timeout("slow"))
            .push_err(TriageError::timeout("slow"))
            .with_response(LABOR_JSON),
    );

    let err = engine.submit(raw("narrative")).await.unwrap_err();
    match err {
        TriageError::Service {
            kind,
            retries_exhausted,
            ..
        } => {
            assert_eq!(kind, ServiceErrorKind::Timeout);
            assert!(retries_exhausted);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(ledger.is_empty().unwrap());
}

#[tokio::test]
async fn transient_failures_recover_into_a_single_entry() {
    let (engine, ledger) = engine_with(
        FakeClient::new("fake")
            .push_err(TriageError::rate_limited("429"))
            .push_err(TriageError::timeout("slow"))
            .with_response(LABOR_JSON),
    );

    engine.submit(raw("narrative")).await.unwrap();
    assert_eq!(ledger.len().unwrap(), 1);
}

#[tokio::test]
async fn inconsistent_court_recommendation_is_overridden_once() {
    let response = r#"{"case_type":"labor","recommended_court":"commercial",
        "urgency":"normal","confidence":0.9,"rationale":"r"}"#;
    let (engine, _ledger) = engine_with(FakeClient::new("fake").with_response(response));

    let decision = engine.submit(raw("narrative")).await.unwrap();
    assert_eq!(decision.final_court, Court::Labor);
    assert_eq!(decision.policy_overrides, vec!["jurisdiction_table"]);
    assert!(decision.accepted_formally);
}

#[tokio::test]
async fn low_confidence_case_is_flagged_but_persisted() {
    let response = r#"{"case_type":"commercial","recommended_court":"commercial",
        "urgency":"normal","confidence":0.3,"rationale":"thin narrative"}"#;
    let (engine, ledger) = engine_with(FakeClient::new("fake").with_response(response));

    let decision = engine.submit(raw("narrative")).await.unwrap();
    assert!(!decision.accepted_formally);
    assert!(decision.manual_review);

    let entries = ledger.list(&LedgerFilter::default()).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].decision.manual_review);
}

#[tokio::test]
async fn malicious_narrative_is_held_despite_high_confidence() {
    let response = r#"{"case_type":"commercial","recommended_court":"commercial",
        "urgency":"normal","confidence":0.95,"rationale":"r",
        "isLikelyMalicious":true,"maliciousReason":"vexatious refiling"}"#;
    let (engine, ledger) = engine_with(FakeClient::new("fake").with_response(response));

    let decision = engine.submit(raw("narrative")).await.unwrap();
    assert!(!decision.accepted_formally);
    assert!(decision.manual_review);
    assert!(decision.policy_overrides.contains(&"malicious_flag".to_string()));

    let entries = ledger.list(&LedgerFilter::default()).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].classification.is_likely_malicious);
    assert_eq!(
        entries[0].classification.malicious_reason.as_deref(),
        Some("vexatious refiling")
    );
}

#[tokio::test]
async fn parser_warnings_are_persisted_for_audit() {
    let response = r#"{"case_type":"maritime","recommended_court":"labor",
        "urgency":"normal","confidence":1.4,"rationale":"r"}"#;
    let (engine, ledger) = engine_with(FakeClient::new("fake").with_response(response));

    engine.submit(raw("narrative")).await.unwrap();
    let entries = ledger.list(&LedgerFilter::default()).unwrap();
    let warnings = &entries[0].classification.warnings;
    assert!(warnings.iter().any(|w| w.contains("unrecognized_category")));
    assert!(warnings.iter().any(|w| w.contains("clamped")));
}

#[tokio::test]
async fn batch_submissions_get_unique_case_ids() {
    let (engine, ledger) = engine_with(FakeClient::new("fake").with_response(LABOR_JSON));

    let batch: Vec<_> = (0..16).map(|i| raw(&format!("narrative {i}"))).collect();
    let results = engine.submit_batch(batch).await;
    assert_eq!(results.len(), 16);
    assert!(results.iter().all(|r| r.is_ok()));

    let entries = ledger.list(&LedgerFilter::default()).unwrap();
    assert_eq!(entries.len(), 16);
    let ids: std::collections::HashSet<_> =
        entries.iter().map(|e| e.submission.case_id.clone()).collect();
    assert_eq!(ids.len(), 16);
}

#[tokio::test]
async fn dashboard_on_empty_ledger_is_all_zero() {
    let (engine, _ledger) = engine_with(FakeClient::new("fake").with_response(LABOR_JSON));

    let report = engine.dashboard().unwrap();
    assert_eq!(report.total_cases, 0);
    assert_eq!(report.urgent_cases, 0);
    assert_eq!(report.flagged_cases, 0);
    assert!(report.per_court.is_empty());
    assert!(report.auto_routed_fraction.abs() < f64::EPSILON);
}

#[tokio::test]
async fn dashboard_reflects_processed_cases() {
    let urgent = r#"{"case_type":"commercial","recommended_court":"commercial",
        "urgency":"urgent","confidence":0.9,"rationale":"r"}"#;
    let (engine, _ledger) = engine_with(
        FakeClient::new("fake")
            .push_ok(urgent)
            .with_response(LABOR_JSON),
    );

    engine.submit(raw("urgent commercial case")).await.unwrap();
    engine.submit(raw("labor case")).await.unwrap();

    let report = engine.dashboard().unwrap();
    assert_eq!(report.total_cases, 2);
    assert_eq!(report.urgent_cases, 1);
    assert_eq!(report.per_court["commercial"], 1);
    assert_eq!(report.per_court["labor"], 1);
    assert!((report.auto_routed_fraction - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn history_filter_narrows_by_court() {
    let (engine, _ledger) = engine_with(FakeClient::new("fake").with_response(LABOR_JSON));
    engine.submit(raw("one")).await.unwrap();
    engine.submit(raw("two")).await.unwrap();

    let labor = engine
        .history(&LedgerFilter {
            court: Some(Court::Labor),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(labor.len(), 2);

    let commercial = engine
        .history(&LedgerFilter {
            court: Some(Court::Commercial),
            ..Default::default()
        })
        .unwrap();
    assert!(commercial.is_empty());
}

#[tokio::test]
async fn unparseable_service_output_surfaces_as_malformed_response() {
    let (engine, ledger) =
        engine_with(FakeClient::new("fake").with_response("I refuse to answer."));

    let err = engine.submit(raw("narrative")).await.unwrap_err();
    assert_eq!(err.service_kind(), Some(ServiceErrorKind::MalformedResponse));
    assert!(ledger.is_empty().unwrap());
}

#[tokio::test]
async fn urgency_exempt_case_type_never_routes_urgent() {
    let response = r#"{"case_type":"other","recommended_court":"general",
        "urgency":"urgent","confidence":0.9,"rationale":"r"}"#;
    let (engine, _ledger) = engine_with(FakeClient::new("fake").with_response(response));

    let decision = engine.submit(raw("narrative")).await.unwrap();
    assert_eq!(decision.final_urgency, Urgency::Normal);
    assert_eq!(decision.policy_overrides, vec!["urgency_exempt"]);
}
