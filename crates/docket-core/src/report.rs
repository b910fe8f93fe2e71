use crate::model::{LedgerEntry, SummaryReport, Urgency};

/// Aggregate statistics over a consistent ledger snapshot. An empty
/// snapshot yields the zeroed report, never an error.
pub fn summarize(entries: &[LedgerEntry]) -> SummaryReport {
    let mut report = SummaryReport::default();
    if entries.is_empty() {
        return report;
    }

    let mut latency_total: u64 = 0;
    for entry in entries {
        report.total_cases += 1;
        *report
            .per_court
            .entry(entry.decision.final_court.as_str().to_string())
            .or_insert(0) += 1;
        *report
            .per_urgency
            .entry(entry.decision.final_urgency.as_str().to_string())
            .or_insert(0) += 1;
        if entry.decision.final_urgency == Urgency::Urgent {
            report.urgent_cases += 1;
        }
        if entry.decision.manual_review {
            report.flagged_cases += 1;
        }
        latency_total += entry.latency_ms;
    }

    let total = report.total_cases as f64;
    report.auto_routed_fraction = (report.total_cases - report.flagged_cases) as f64 / total;
    report.avg_latency_ms = latency_total as f64 / total;
    report
}
