//! Public surface of the triage engine: `submit`, `history`, `dashboard`.
//!
//! Each submission runs as an independent unit of work; the only shared
//! state is the ledger and the classifier's outbound limiter. Nothing is
//! written to the ledger until classification and routing have both
//! succeeded, so a cancelled or failed submission leaves no trace.

use crate::classify::Classifier;
use crate::config::TriageConfig;
use crate::errors::TriageError;
use crate::intake::Normalizer;
use crate::ledger::Ledger;
use crate::model::{LedgerEntry, LedgerFilter, RawSubmission, RoutingDecision, SummaryReport};
use crate::policy::JurisdictionPolicy;
use crate::providers::llm::LlmClient;
use crate::report;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::info;

#[derive(Clone)]
pub struct TriageEngine {
    normalizer: Normalizer,
    classifier: Classifier,
    policy: JurisdictionPolicy,
    ledger: Ledger,
}

impl TriageEngine {
    pub fn new(config: &TriageConfig, client: Arc<dyn LlmClient>, ledger: Ledger) -> Self {
        Self {
            normalizer: Normalizer::new(config),
            classifier: Classifier::new(client, config),
            policy: JurisdictionPolicy::new(config),
            ledger,
        }
    }

    /// Full pipeline for one case: normalize, classify, route, persist.
    pub async fn submit(&self, raw: RawSubmission) -> Result<RoutingDecision, TriageError> {
        let started = Instant::now();
        let submission = self.normalizer.normalize(raw)?;
        let classification = self.classifier.classify(&submission).await?;
        let decision = self.policy.decide(&submission.case_id, &classification);

        let entry = LedgerEntry {
            submission,
            classification,
            decision: decision.clone(),
            latency_ms: started.elapsed().as_millis() as u64,
            supersedes: None,
        };
        self.ledger.append(&entry)?;

        info!(
            case_id = %decision.case_id,
            court = %decision.final_court,
            urgency = %decision.final_urgency,
            accepted = decision.accepted_formally,
            "case triaged"
        );
        Ok(decision)
    }

    /// Process submissions concurrently with no ordering guarantee between
    /// cases. Outbound service concurrency is bounded by the classifier's
    /// limiter; results come back in completion order.
    pub async fn submit_batch(
        &self,
        submissions: Vec<RawSubmission>,
    ) -> Vec<Result<RoutingDecision, TriageError>> {
        let mut join_set = JoinSet::new();
        for raw in submissions {
            let engine = self.clone();
            join_set.spawn(async move { engine.submit(raw).await });
        }

        let mut results = Vec::new();
        while let Some(res) = join_set.join_next().await {
            results.push(match res {
                Ok(r) => r,
                Err(e) => Err(TriageError::internal(format!("task join error: {}", e))),
            });
        }
        results
    }

    pub fn history(&self, filter: &LedgerFilter) -> Result<Vec<LedgerEntry>, TriageError> {
        self.ledger.list(filter)
    }

    pub fn dashboard(&self) -> Result<SummaryReport, TriageError> {
        let snapshot = self.ledger.list(&LedgerFilter::default())?;
        Ok(report::summarize(&snapshot))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}
