//! Report/skip/sample verdicts for telemetry, independent of any backend.
//!
//! `decide` is the rule table; `ReportSampler` applies the configured sample
//! rate to verdicts flagged for sampling.

use std::fmt;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::classify::{ErrorClassification, ErrorSeverity, ErrorType};
use crate::config::ReportingConfig;
use crate::context::ErrorContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReportDecision {
    pub should_report: bool,
    /// Report only a sampled fraction (see `ReportSampler`).
    pub should_sample: bool,
    pub reason: String,
}

/// Which rule produced a verdict. Rules are checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    HighSeverity,
    InvestigateUnknown,
    MonitorServerHealth,
    LowSeverityTransient,
    UserInput,
    TrendSampling,
    BelowReportingBar,
}

impl ReportReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportReason::HighSeverity => "high/critical severity",
            ReportReason::InvestigateUnknown => "investigate unknown",
            ReportReason::MonitorServerHealth => "monitor server health",
            ReportReason::LowSeverityTransient => "low-severity transient",
            ReportReason::UserInput => "user input, not a system defect",
            ReportReason::TrendSampling => "sample for trend detection",
            ReportReason::BelowReportingBar => "does not meet reporting bar",
        }
    }

    fn decision(self) -> ErrorReportDecision {
        let (should_report, should_sample) = match self {
            ReportReason::HighSeverity
            | ReportReason::InvestigateUnknown
            | ReportReason::MonitorServerHealth => (true, false),
            ReportReason::TrendSampling => (true, true),
            ReportReason::LowSeverityTransient
            | ReportReason::UserInput
            | ReportReason::BelowReportingBar => (false, false),
        };
        ErrorReportDecision {
            should_report,
            should_sample,
            reason: self.as_str().to_string(),
        }
    }
}

impl fmt::Display for ReportReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First matching rule for a classification.
pub fn reason_for(classification: &ErrorClassification) -> ReportReason {
    let ty = classification.error_type;
    let severity = classification.severity;
    if severity.is_high() {
        ReportReason::HighSeverity
    } else if ty == ErrorType::Unknown {
        ReportReason::InvestigateUnknown
    } else if ty == ErrorType::ServerError {
        ReportReason::MonitorServerHealth
    } else if ty.is_network() && severity == ErrorSeverity::Low {
        ReportReason::LowSeverityTransient
    } else if ty == ErrorType::ValidationError && severity == ErrorSeverity::Low {
        ReportReason::UserInput
    } else if severity == ErrorSeverity::Medium {
        ReportReason::TrendSampling
    } else {
        ReportReason::BelowReportingBar
    }
}

/// Report/skip/sample verdict.
///
/// The context is accepted for parity with `plan`; the current rules depend
/// on the classification alone.
pub fn decide(classification: &ErrorClassification, _context: &ErrorContext) -> ErrorReportDecision {
    reason_for(classification).decision()
}

/// Applies a sample rate to verdicts with `should_sample` set.
#[derive(Debug)]
pub struct ReportSampler {
    sample_rate: f64,
    rng: Mutex<StdRng>,
}

impl ReportSampler {
    pub fn new(sample_rate: f64, rng: StdRng) -> Self {
        let sample_rate = if sample_rate.is_finite() {
            sample_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            sample_rate,
            rng: Mutex::new(rng),
        }
    }

    pub fn from_config(cfg: &ReportingConfig) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(cfg.sample_rate, rng)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Whether this verdict should actually be sent to telemetry.
    pub fn admit(&self, decision: &ErrorReportDecision) -> bool {
        if !decision.should_report {
            return false;
        }
        if !decision.should_sample {
            return true;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        rng.random_bool(self.sample_rate)
    }
}

impl Default for ReportSampler {
    fn default() -> Self {
        Self::from_config(&ReportingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, SuggestedAction};

    fn classification(error_type: ErrorType, severity: ErrorSeverity) -> ErrorClassification {
        ErrorClassification {
            error_code: "test".to_string(),
            error_type,
            severity,
            is_retryable: false,
            is_user_facing: false,
            suggested_action: SuggestedAction::Abort,
            user_message: String::new(),
        }
    }

    #[test]
    fn critical_is_always_reported() {
        let ctx = ErrorContext::new("sync");
        for ty in ErrorType::ALL {
            let d = decide(&classification(ty, ErrorSeverity::Critical), &ctx);
            assert!(d.should_report, "{ty}");
            assert!(!d.should_sample);
            assert_eq!(d.reason, "high/critical severity");
        }
    }

    #[test]
    fn rule_order() {
        use ErrorSeverity::*;
        let cases = [
            (ErrorType::Unknown, Medium, ReportReason::InvestigateUnknown),
            (ErrorType::Unknown, Low, ReportReason::InvestigateUnknown),
            (ErrorType::ServerError, Medium, ReportReason::MonitorServerHealth),
            (ErrorType::NetworkTimeout, Low, ReportReason::LowSeverityTransient),
            (ErrorType::ValidationError, Low, ReportReason::UserInput),
            (ErrorType::ConflictError, Medium, ReportReason::TrendSampling),
            (ErrorType::NetworkOffline, Medium, ReportReason::TrendSampling),
            (ErrorType::ResourceNotFound, Low, ReportReason::BelowReportingBar),
        ];
        for (ty, sev, want) in cases {
            assert_eq!(reason_for(&classification(ty, sev)), want, "{ty}/{sev}");
        }
    }

    #[test]
    fn medium_is_sampled() {
        let ctx = ErrorContext::new("fetch_feed");
        let c = classify("conflict", None, Some(409), &ctx);
        let d = decide(&c, &ctx);
        assert!(d.should_report);
        assert!(d.should_sample);
        assert_eq!(d.reason, "sample for trend detection");
    }

    #[test]
    fn validation_input_is_skipped() {
        let ctx = ErrorContext::new("create_listing");
        let c = classify("validation_failed", None, Some(400), &ctx);
        let d = decide(&c, &ctx);
        assert!(!d.should_report);
        assert_eq!(d.reason, "user input, not a system defect");
    }

    #[test]
    fn sampler_extremes() {
        let sampled = ReportReason::TrendSampling.decision();
        let always = ReportReason::HighSeverity.decision();
        let never = ReportReason::UserInput.decision();

        let none = ReportSampler::new(0.0, StdRng::seed_from_u64(1));
        let all = ReportSampler::new(1.0, StdRng::seed_from_u64(1));
        for _ in 0..20 {
            assert!(!none.admit(&sampled));
            assert!(all.admit(&sampled));
            assert!(none.admit(&always));
            assert!(!all.admit(&never));
        }
    }

    #[test]
    fn sampler_rate_is_roughly_honoured() {
        let s = ReportSampler::new(0.25, StdRng::seed_from_u64(2024));
        let d = ReportReason::TrendSampling.decision();
        let admitted = (0..4_000).filter(|_| s.admit(&d)).count();
        assert!((800..=1_200).contains(&admitted), "admitted {admitted}");
    }
}
