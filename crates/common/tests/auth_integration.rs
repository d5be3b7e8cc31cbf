//! Integration tests for the credential store
//!
//! Exercises renewal timing, failure isolation and concurrent access through
//! the public API only.

use std::sync::Arc;
use std::time::Duration;

use studylens_common::auth::{CredentialError, CredentialState, CredentialStore};
use studylens_common::testing::{MockClock, MockRenewalClient};
use studylens_common::Clock;

const MARGIN: Duration = Duration::from_secs(300);

fn store(renewal: &Arc<MockRenewalClient>, clock: &Arc<MockClock>) -> Arc<CredentialStore> {
    Arc::new(
        CredentialStore::new(renewal.clone(), Some("refresh".into()), MARGIN)
            .with_clock(clock.clone()),
    )
}

/// Validates that a renewed credential is served from cache until the
/// renewal margin is crossed.
///
/// # Test Steps
/// 1. Renew once with an expiry one hour out
/// 2. Call `get_token(false)` repeatedly while advancing time up to the
///    margin boundary
/// 3. Verify no further renewal happens until `now + margin >= expires_at`
#[tokio::test(flavor = "multi_thread")]
async fn test_cached_credential_served_until_margin() {
    let renewal = Arc::new(MockRenewalClient::new());
    let clock = Arc::new(MockClock::new());
    let store = store(&renewal, &clock);
    renewal.push_ok("hour-token", Some(clock.now() + chrono::Duration::hours(1)));

    let first = store.get_token(false).await.expect("initial renewal");
    for _ in 0..11 {
        clock.advance(Duration::from_secs(300));
        if !store.is_fresh(&first) {
            break;
        }
        let cached = store.get_token(false).await.expect("cached credential");
        assert_eq!(cached.token(), "hour-token");
    }
    assert_eq!(renewal.calls(), 1);

    // 55 minutes elapsed: exactly at the margin, so the next call renews.
    assert_eq!(store.state().await, CredentialState::Stale);
    let renewed = store.get_token(false).await.expect("renewal after margin");
    assert_eq!(renewed.token(), "token-2");
    assert_eq!(renewal.calls(), 2);
}

/// Validates that renewal failures never mutate the stored credential, both
/// from the empty state and from a populated one.
#[tokio::test(flavor = "multi_thread")]
async fn test_renewal_failure_preserves_state() {
    let renewal = Arc::new(MockRenewalClient::new());
    let clock = Arc::new(MockClock::new());
    let store = store(&renewal, &clock);

    renewal.push_err(CredentialError::RenewalFailed { status: 500, body: "boom".into() });
    let err = store.get_token(false).await.unwrap_err();
    assert!(matches!(err, CredentialError::RenewalFailed { status: 500, .. }));
    assert_eq!(store.state().await, CredentialState::Empty);
    assert!(store.snapshot().await.is_none());

    let good = store.get_token(false).await.expect("second renewal succeeds");

    renewal.push_err(CredentialError::Transport("connection reset".into()));
    assert!(store.get_token(true).await.is_err());
    assert_eq!(store.snapshot().await, Some(good));
}

/// Validates single-flight renewal: many concurrent callers on an empty
/// store trigger one network renewal and all receive the same token.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_renewal() {
    let renewal = Arc::new(MockRenewalClient::new().with_delay(Duration::from_millis(50)));
    let clock = Arc::new(MockClock::new());
    let store = store(&renewal, &clock);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.get_token(false).await })
        })
        .collect();

    let tokens: Vec<String> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task").expect("token").token().to_string())
        .collect();

    assert!(tokens.iter().all(|token| token == "token-1"));
    assert_eq!(renewal.calls(), 1);
}

/// Validates that concurrent forced renewals collapse onto one network call
/// when they queue behind the same in-flight renewal.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_forced_renewals_are_coalesced() {
    let renewal = Arc::new(MockRenewalClient::new().with_delay(Duration::from_millis(50)));
    let clock = Arc::new(MockClock::new());
    let store = store(&renewal, &clock);
    store.get_token(false).await.expect("warm-up");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.get_token(true).await })
        })
        .collect();
    for joined in futures::future::join_all(handles).await {
        let credential = joined.expect("task").expect("forced token");
        assert_ne!(credential.token(), "token-1");
    }

    // Warm-up plus at least one forced renewal; waiters reuse its result.
    assert!(renewal.calls() >= 2);
    assert!(renewal.calls() < 10);
}

/// Validates that readers never see a token paired with another token's
/// expiry while renewals run concurrently.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_token_and_expiry_swap_atomically() {
    let renewal = Arc::new(MockRenewalClient::new());
    let clock = Arc::new(MockClock::new());
    let store = store(&renewal, &clock);
    let base = clock.now();
    for n in 1..=20 {
        renewal.push_ok(format!("t{n}"), Some(base + chrono::Duration::hours(n)));
    }

    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for _ in 0..20 {
                store.renew().await.expect("renew");
            }
        })
    };
    let reader = {
        let store = store.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                if let Some(credential) = store.snapshot().await {
                    let n: i64 = credential.token()[1..].parse().expect("numeric suffix");
                    assert_eq!(credential.expires_at(), Some(base + chrono::Duration::hours(n)));
                }
                tokio::task::yield_now().await;
            }
        })
    };

    writer.await.expect("writer");
    reader.await.expect("reader");
    assert_eq!(store.renewal_count(), 20);
}
