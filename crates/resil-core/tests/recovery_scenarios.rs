//! Integration tests: end-to-end failure scenarios driven through `RecoveryEngine`.
//!
//! Each test plays the caller: it records failures, classifies them, follows
//! the returned retry schedule on a fake clock, and consults the breaker.

mod common;

use common::harness::Harness;
use resil_core::{
    CircuitBreakerConfig, CircuitState, ErrorContext, ErrorSeverity, ErrorType, FallbackAction,
    SuggestedAction,
};

#[test]
fn offline_write_is_queued_and_retried() {
    let h = Harness::new();
    let ctx = ErrorContext::new("create_listing");
    let c = h.engine.classify("network_offline", None, None, &ctx);
    assert_eq!(c.error_type, ErrorType::NetworkOffline);
    assert_eq!(c.severity, ErrorSeverity::Medium);
    assert!(c.is_retryable);
    assert_eq!(c.suggested_action, SuggestedAction::Retry);

    let s = h.engine.plan(&c, &ctx);
    assert_eq!(s.fallback_action, Some(FallbackAction::QueueForLater));
    assert!(s.should_notify_user);
    let sched = s.retry_schedule.expect("offline is retryable");
    assert!((1_500..=2_500).contains(&sched.delay_ms), "delay {}", sched.delay_ms);
}

#[test]
fn rate_limited_read_on_sixth_attempt() {
    let h = Harness::new();
    let ctx = ErrorContext::new("fetch_feed").with_attempt(6);
    let c = h.engine.classify("rate_limited", None, Some(429), &ctx);
    assert!(!c.is_retryable);
    assert_eq!(c.severity, ErrorSeverity::High);
    assert_eq!(c.suggested_action, SuggestedAction::WaitAndRetry);

    let report = h.engine.decide_report(&c, &ctx);
    assert!(report.should_report);
    assert!(!report.should_sample);
}

#[test]
fn server_error_on_sync_is_reported() {
    let h = Harness::new();
    let ctx = ErrorContext::new("sync");
    let c = h.engine.classify("server_error", None, Some(503), &ctx);
    assert_eq!(c.error_type, ErrorType::ServerError);
    assert_eq!(c.severity, ErrorSeverity::High);
    let s = h.engine.plan(&c, &ctx);
    assert!(s.should_report);
    assert_eq!(s.fallback_action, Some(FallbackAction::UseCache));
}

#[test]
fn timeouts_exhaust_at_the_retry_ceiling() {
    let h = Harness::new();
    let seen = h.fail_until_exhausted("network_timeout", None, "fetch_feed");
    assert_eq!(seen.len(), 5, "attempts 1..=4 retry, attempt 5 stops");
    assert!(seen[..4].iter().all(|s| s.retry_schedule.is_some()));
    let last = seen.last().unwrap();
    assert!(last.retry_schedule.is_none());
    // Escalated to High by then, so the generic default is Escalate.
    assert_eq!(last.action, SuggestedAction::Escalate);
    assert!(last.should_report);
    assert!(last.should_notify_user);
}

#[test]
fn repeated_failures_trip_then_cool_down() {
    let h = Harness::new();
    let cfg = CircuitBreakerConfig::default();
    for attempt in 1..=4 {
        h.fail("server_error", Some(502), "sync", attempt);
        assert!(!h.engine.should_trip(&cfg).should_trip, "attempt {attempt}");
    }
    h.fail("server_error", Some(502), "sync", 5);
    let d = h.engine.should_trip(&cfg);
    assert!(d.should_trip);
    let reset_at = d.reset_at.expect("tripped decision carries reset_at");

    h.clock.advance_ms(cfg.trip_duration_ms as i64 - 1);
    assert!(matches!(h.engine.breaker().state(), CircuitState::Open { .. }));
    assert_eq!(h.engine.should_trip(&cfg).reset_at, Some(reset_at));

    // Past the cooldown and the window: failures have aged out.
    h.clock.advance_ms(cfg.window_duration_ms as i64);
    assert!(!h.engine.should_trip(&cfg).should_trip);
    assert_eq!(h.engine.breaker().state(), CircuitState::Closed);
}

#[test]
fn schedule_retry_follows_the_operation_history() {
    let h = Harness::new();
    h.engine.record_failure("rate_limited", "fetch_feed", None);
    let s = h.engine.schedule_retry("fetch_feed", 1);
    assert!((45_000..=75_000).contains(&s.delay_ms), "delay {}", s.delay_ms);
    assert_eq!(s.current_attempt, 2);
    assert_eq!(s.max_attempts, 5);
}

#[test]
fn auth_expiry_asks_for_refresh_once_retries_run_out() {
    let h = Harness::new();
    let ctx = ErrorContext::new("fetch_profile").with_attempt(5);
    let c = h.engine.classify("auth_expired", None, Some(401), &ctx);
    assert_eq!(c.error_type, ErrorType::AuthenticationExpired);
    assert_eq!(c.suggested_action, SuggestedAction::RefreshAuth);
    let s = h.engine.plan(&c, &ctx);
    assert!(s.retry_schedule.is_none());
    assert!(s.fallback_action.is_none());
}
