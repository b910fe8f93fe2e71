use crate::errors::TriageError;
use crate::model::CaseType;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Process-wide triage configuration. Constructed once and passed to each
/// component explicitly; components never reach for ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    pub version: u32,

    // Intake limits
    pub max_subject_len: usize,
    pub max_name_len: usize,

    // Classification service
    pub model: String,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub request_timeout_secs: u64,
    pub max_concurrent_calls: usize,

    // Parser defaults
    pub neutral_confidence: f64,

    // Routing policy
    pub min_confidence: f64,
    pub urgency_exempt: Vec<CaseType>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            max_subject_len: 200,
            max_name_len: 120,
            model: "gpt-4o-mini".to_string(),
            max_attempts: 3,
            backoff_base_ms: 250,
            request_timeout_secs: 30,
            max_concurrent_calls: 4,
            neutral_confidence: 0.5,
            min_confidence: 0.5,
            urgency_exempt: vec![CaseType::Other],
        }
    }
}

pub fn load_config(path: &Path) -> Result<TriageConfig, TriageError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        TriageError::config(format!("failed to read config {}: {}", path.display(), e))
    })?;
    let cfg: TriageConfig = serde_yaml::from_str(&raw)
        .map_err(|e| TriageError::config(format!("failed to parse YAML: {}", e)))?;
    cfg.validate()?;
    Ok(cfg)
}

impl TriageConfig {
    pub fn validate(&self) -> Result<(), TriageError> {
        if self.version != SUPPORTED_CONFIG_VERSION {
            return Err(TriageError::config(format!(
                "unsupported config version {} (supported: {})",
                self.version, SUPPORTED_CONFIG_VERSION
            )));
        }
        if self.max_attempts == 0 {
            return Err(TriageError::config("max_attempts must be at least 1"));
        }
        if self.max_concurrent_calls == 0 {
            return Err(TriageError::config("max_concurrent_calls must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(TriageError::config("min_confidence must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.neutral_confidence) {
            return Err(TriageError::config("neutral_confidence must be within [0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        TriageConfig::default().validate().expect("default config");
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg: TriageConfig =
            serde_yaml::from_str("min_confidence: 0.7\nmax_attempts: 5\n").unwrap();
        assert_eq!(cfg.max_attempts, 5);
        assert!((cfg.min_confidence - 0.7).abs() < f64::EPSILON);
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.urgency_exempt, vec![CaseType::Other]);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let cfg = TriageConfig {
            min_confidence: 1.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
