//! Property tests for registry invariants
//!
//! Tests invariants that must hold for arbitrary registration and load
//! sequences.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;

use dynload::{loader, LoaderRegistry};

/// Small name alphabet so generated sequences collide often.
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-e]"
}

fn names_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(name_strategy(), 0..6)
}

proptest! {
    #[test]
    fn test_load_length_equals_registered_requested(
        regs in proptest::collection::vec((names_strategy(), any::<u32>()), 0..8),
        request in names_strategy(),
    ) {
        // Invariant: the result length always equals the number of
        // requested names that are registered, duplicates included.
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let registry = LoaderRegistry::new();
            for (names, value) in &regs {
                let value = *value;
                registry
                    .register(names.clone(), loader(move || async move { Ok(value) }))
                    .await;
            }

            let registered: HashSet<String> =
                registry.load_list().await.keys().cloned().collect();
            let expected = request.iter().filter(|n| registered.contains(*n)).count();

            let values = registry.load(request.clone()).await.unwrap();
            prop_assert_eq!(values.len(), expected);
            Ok(())
        })?;
    }

    #[test]
    fn test_first_registration_wins_for_every_name(
        regs in proptest::collection::vec((names_strategy(), any::<u32>()), 1..8),
    ) {
        // Invariant: a name's resolved value is the one from the first
        // registration that mentioned it, regardless of later bindings.
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let registry = LoaderRegistry::new();
            let mut expected: HashMap<String, u32> = HashMap::new();
            for (names, value) in &regs {
                let value = *value;
                for name in names {
                    expected.entry(name.clone()).or_insert(value);
                }
                registry
                    .register(names.clone(), loader(move || async move { Ok(value) }))
                    .await;
            }

            registry.load_all().await.unwrap();
            for (name, value) in &expected {
                let resolved = registry.get(name).await;
                prop_assert_eq!(resolved.as_deref(), Some(value));
            }
            Ok(())
        })?;
    }

    #[test]
    fn test_no_loader_runs_more_than_once(
        regs in proptest::collection::vec((names_strategy(), any::<u32>()), 1..6),
        requests in proptest::collection::vec(names_strategy(), 0..6),
    ) {
        // Invariant: across any sequence of successful loads, each
        // distinct loader is invoked at most once.
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let registry = LoaderRegistry::new();
            let mut counters = Vec::new();
            for (names, value) in &regs {
                let value = *value;
                let counter = Arc::new(AtomicUsize::new(0));
                let counter_in = counter.clone();
                counters.push(counter);
                registry
                    .register(
                        names.clone(),
                        loader(move || {
                            let counter = counter_in.clone();
                            async move {
                                counter.fetch_add(1, Ordering::SeqCst);
                                Ok(value)
                            }
                        }),
                    )
                    .await;
            }

            for request in &requests {
                registry.load(request.clone()).await.unwrap();
            }
            registry.load_all().await.unwrap();

            for counter in &counters {
                prop_assert!(counter.load(Ordering::SeqCst) <= 1);
            }
            Ok(())
        })?;
    }
}
