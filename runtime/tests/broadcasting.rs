//! Integration tests for Store action broadcasting
//!
//! Covers the request-response pattern the lifecycle controller relies on:
//! send a command, then wait for the terminal action carrying the same
//! correlation id.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use formflow_core::{SmallVec, async_effect, effect::Effect, reducer::Reducer, smallvec};
use formflow_runtime::{Store, StoreError};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TestAction {
    /// Start a two-step exchange with correlation ID
    Start { id: u64 },
    /// Intermediate step finished
    Responded { id: u64 },
    /// Exchange finished (terminal action)
    Finished { id: u64 },
    /// Command with no follow-up
    Touch,
}

#[derive(Debug, Clone, Default)]
struct TestState {
    responded: Vec<u64>,
    touched: u32,
}

#[derive(Clone)]
struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TestAction::Start { id } => smallvec![async_effect! {
                tokio::time::sleep(Duration::from_millis(5 * id)).await;
                Some(TestAction::Responded { id })
            }],
            TestAction::Responded { id } => {
                state.responded.push(id);
                smallvec![async_effect! { Some(TestAction::Finished { id }) }]
            },
            TestAction::Finished { .. } => smallvec![Effect::None],
            TestAction::Touch => {
                state.touched += 1;
                smallvec![Effect::None]
            },
        }
    }
}

fn store() -> Store<TestState, TestAction, (), TestReducer> {
    formflow_testing::init_tracing();
    Store::new(TestState::default(), TestReducer, ())
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_send_and_wait_for_terminal_action() {
    let store = store();

    let result = store
        .send_and_wait_for(
            TestAction::Start { id: 1 },
            |action| matches!(action, TestAction::Finished { id: 1 }),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert_eq!(result, TestAction::Finished { id: 1 });
    assert_eq!(store.state(|s| s.responded.clone()).await, vec![1]);
}

#[tokio::test]
async fn test_observed_action_is_already_reduced() {
    let store = store();

    for id in 1..=5 {
        let result = store
            .send_and_wait_for(
                TestAction::Start { id },
                move |action| matches!(action, TestAction::Responded { id: done } if *done == id),
                Duration::from_secs(1),
            )
            .await
            .unwrap();

        assert_eq!(result, TestAction::Responded { id });
        let responded = store.state(|s| s.responded.clone()).await;
        assert!(responded.contains(&id), "state must include {id} once it is observed");
    }
}

#[tokio::test]
async fn test_correlation_ids_keep_flows_apart() {
    let store = Arc::new(store());
    let mut tasks = Vec::new();

    for id in [3, 1, 2] {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            store
                .send_and_wait_for(
                    TestAction::Start { id },
                    move |action| {
                        matches!(action, TestAction::Finished { id: done } if *done == id)
                    },
                    Duration::from_secs(1),
                )
                .await
        }));
    }

    for (task, id) in tasks.into_iter().zip([3, 1, 2]) {
        let action = task.await.unwrap().unwrap();
        assert_eq!(action, TestAction::Finished { id });
    }

    let mut responded = store.state(|s| s.responded.clone()).await;
    responded.sort_unstable();
    assert_eq!(responded, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_initial_actions_not_broadcast() {
    let store = store();
    let mut rx = store.subscribe_actions();

    store.send(TestAction::Touch).await.unwrap();

    let received = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
    assert!(received.is_err(), "commands sent directly must not be broadcast");
    assert_eq!(store.state(|s| s.touched).await, 1);
}

#[tokio::test]
async fn test_subscriber_sees_actions_in_order() {
    let store = store();
    let mut rx = store.subscribe_actions();

    let mut handle = store.send(TestAction::Start { id: 0 }).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    assert_eq!(rx.recv().await.unwrap(), TestAction::Responded { id: 0 });
    assert_eq!(rx.recv().await.unwrap(), TestAction::Finished { id: 0 });
}

#[tokio::test]
async fn test_wait_for_unmatched_action_times_out() {
    let store = store();

    let result = store
        .send_and_wait_for(
            TestAction::Start { id: 1 },
            |action| matches!(action, TestAction::Finished { id: 99 }),
            Duration::from_millis(50),
        )
        .await;

    assert!(matches!(result, Err(StoreError::Timeout)));
}
