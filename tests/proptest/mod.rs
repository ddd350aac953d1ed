// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::string_slice
)]

//! Property-based tests for rancher-e2e.
//!
//! Uses proptest to generate event sequences and cleanup outcomes and
//! verify the waiting and teardown invariants.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::StreamExt;
use futures::executor::block_on;
use futures::stream;
use proptest::prelude::*;

use rancher_e2e::wait::{MAX_WATCH_TIMEOUT, timeout_seconds};
use rancher_e2e::{Error, Session, WaitError, ignore_not_found, watch_wait};

/// What the predicate answers for one event.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Verdict {
    Continue,
    Done,
    Fail,
}

fn verdict() -> impl Strategy<Value = Verdict> {
    prop_oneof![
        6 => Just(Verdict::Continue),
        1 => Just(Verdict::Done),
        1 => Just(Verdict::Fail),
    ]
}

/// Outcome of one cleanup action.
#[derive(Clone, Copy, Debug)]
enum Outcome {
    Ok,
    NotFound,
    Fail,
}

fn outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![Just(Outcome::Ok), Just(Outcome::NotFound), Just(Outcome::Fail)]
}

proptest! {
    /// The wait resolves at the first non-Continue verdict, having pulled
    /// exactly that many events; with none it reports StreamClosed.
    #[test]
    fn wait_resolves_at_first_decisive_event(verdicts in prop::collection::vec(verdict(), 0..40)) {
        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulled);
        let events = stream::iter(verdicts.clone().into_iter().map(Ok::<_, WaitError>))
            .inspect(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let result = block_on(watch_wait(events, |v: &Verdict| match v {
            Verdict::Continue => Ok(false),
            Verdict::Done => Ok(true),
            Verdict::Fail => Err(WaitError::failed("fail")),
        }));

        match verdicts.iter().position(|v| *v != Verdict::Continue) {
            Some(index) => {
                prop_assert_eq!(pulled.load(Ordering::SeqCst), index + 1);
                match verdicts[index] {
                    Verdict::Done => prop_assert!(result.is_ok()),
                    _ => prop_assert!(matches!(result, Err(WaitError::OperationFailed(_)))),
                }
            }
            None => {
                prop_assert_eq!(pulled.load(Ordering::SeqCst), verdicts.len());
                prop_assert!(matches!(result, Err(WaitError::StreamClosed)));
            }
        }
    }

    /// Every registered action runs exactly once, newest first, and only
    /// genuine failures are reported.
    #[test]
    fn cleanups_run_lifo_and_report_failures(outcomes in prop::collection::vec(outcome(), 0..20)) {
        let session = Session::new();
        let ran = Arc::new(Mutex::new(Vec::new()));

        for (index, outcome) in outcomes.iter().copied().enumerate() {
            let ran = Arc::clone(&ran);
            session.register_cleanup(move || async move {
                ran.lock().unwrap().push(index);
                match outcome {
                    Outcome::Ok => Ok(()),
                    // Deletes absorb not-found at the call site
                    Outcome::NotFound => ignore_not_found(Err::<(), _>(Error::Api {
                        status: 404,
                        message: "gone".to_string(),
                    }))
                    .map(|_| ()),
                    Outcome::Fail => Err(Error::Config(format!("action {index} failed"))),
                }
            });
        }

        let result = block_on(session.run_cleanups());

        let expected_order: Vec<usize> = (0..outcomes.len()).rev().collect();
        prop_assert_eq!(ran.lock().unwrap().clone(), expected_order);
        prop_assert_eq!(session.pending(), 0);

        let expected_failures = outcomes.iter().filter(|o| matches!(o, Outcome::Fail)).count();
        match result {
            Ok(()) => prop_assert_eq!(expected_failures, 0),
            Err(e) => prop_assert_eq!(e.failures.len(), expected_failures),
        }
    }

    /// Watch timeouts are accepted exactly in 1..=294 seconds.
    #[test]
    fn watch_timeout_bounds(secs in 0u64..1000) {
        let result = timeout_seconds(Duration::from_secs(secs));
        if secs >= 1 && Duration::from_secs(secs) <= MAX_WATCH_TIMEOUT {
            prop_assert_eq!(result.unwrap() as u64, secs);
        } else {
            prop_assert!(matches!(result, Err(WaitError::InvalidTimeout(_))));
        }
    }
}
