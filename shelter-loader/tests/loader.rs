use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use shelter_loader::{align_many, align_one, from_fn, group_by, LoadError, Loader};

#[derive(Debug, Clone, PartialEq)]
struct Photo {
    animal_id: String,
    url: String,
}

fn photo(animal_id: &str, url: &str) -> Photo {
    Photo {
        animal_id: animal_id.into(),
        url: url.into(),
    }
}

type Calls = Arc<Mutex<Vec<Vec<String>>>>;

/// A photos-by-animal loader over a fixed table, recording every bulk call.
fn photos_loader(
    calls: Calls,
) -> Loader<String, Vec<Photo>, impl shelter_loader::BatchFn<String, Vec<Photo>>> {
    let table = vec![
        photo("a1", "a1-front.jpg"),
        photo("a2", "a2-front.jpg"),
        photo("a1", "a1-back.jpg"),
    ];
    Loader::new(
        "photos-by-animal",
        from_fn(move |keys: Vec<String>| {
            let calls = calls.clone();
            let rows: Vec<Photo> = table
                .iter()
                .filter(|p| keys.contains(&p.animal_id))
                .cloned()
                .collect();
            async move {
                calls.lock().unwrap().push(keys.clone());
                Ok::<_, Infallible>(align_many(&keys, group_by(rows, |p| p.animal_id.clone())))
            }
        }),
    )
}

#[tokio::test]
async fn concurrent_loads_coalesce_into_one_deduplicated_call() {
    let calls = Calls::default();
    let loader = photos_loader(calls.clone());

    let (first, second, third) = tokio::join!(
        loader.load("a1".to_string()),
        loader.load("a2".to_string()),
        loader.load("a1".to_string()),
    );

    let recorded = calls.lock().unwrap().clone();
    assert_eq!(recorded, vec![vec!["a1".to_string(), "a2".to_string()]]);

    let first = first.unwrap();
    let third = third.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.unwrap().len(), 1);
    assert!(Arc::ptr_eq(&first, &third));
}

#[tokio::test]
async fn unmatched_key_yields_empty_collection() {
    let calls = Calls::default();
    let loader = photos_loader(calls.clone());

    let photos = loader.load("no-such-animal".to_string()).await.unwrap();
    assert!(photos.is_empty());
    assert_eq!(
        calls.lock().unwrap().clone(),
        vec![vec!["no-such-animal".to_string()]]
    );
}

#[tokio::test]
async fn resolved_keys_are_served_from_cache() {
    let calls = Calls::default();
    let loader = photos_loader(calls.clone());

    let before = loader.load("a1".to_string()).await.unwrap();
    assert!(loader.is_cached(&"a1".to_string()));
    let after = loader.load("a1".to_string()).await.unwrap();

    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(calls.lock().unwrap().len(), 1);

    loader.load("a2".to_string()).await.unwrap();
    let recorded = calls.lock().unwrap().clone();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[1], vec!["a2".to_string()]);
}

#[tokio::test]
async fn load_many_keeps_input_order() {
    let loader = photos_loader(Calls::default());
    let groups = loader
        .load_many(["a2".to_string(), "zzz".to_string(), "a1".to_string()])
        .await
        .unwrap();
    let sizes: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    assert_eq!(sizes, [1, 0, 2]);
}

#[tokio::test]
async fn separate_loaders_do_not_share_state() {
    let calls = Calls::default();
    let first = photos_loader(calls.clone());
    let second = photos_loader(calls.clone());

    let a = first.load("a1".to_string()).await.unwrap();
    let b = second.load("a1".to_string()).await.unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[derive(Debug)]
struct StoreDown;

impl std::fmt::Display for StoreDown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("store unavailable")
    }
}

impl std::error::Error for StoreDown {}

#[tokio::test]
async fn failure_reaches_every_waiter_and_is_not_cached() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let loader = Loader::new(
        "user-by-id",
        from_fn(move |keys: Vec<String>| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(StoreDown)
                } else {
                    Ok(keys.iter().map(|k| format!("user {k}")).collect::<Vec<_>>())
                }
            }
        }),
    );

    let (a, b) = tokio::join!(loader.load("u1".to_string()), loader.load("u2".to_string()));
    for result in [a, b] {
        match result {
            Err(LoadError::Batch { loader, source }) => {
                assert_eq!(loader, "user-by-id");
                assert_eq!(source.to_string(), "store unavailable");
            }
            other => panic!("expected batch failure, got {other:?}"),
        }
    }
    assert!(!loader.is_cached(&"u1".to_string()));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);

    let retried = loader.load("u1".to_string()).await.unwrap();
    assert_eq!(retried.as_str(), "user u1");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn misaligned_output_fails_the_batch() {
    let loader = Loader::new(
        "animal-by-id",
        from_fn(|_keys: Vec<String>| async { Ok::<Vec<Option<String>>, Infallible>(Vec::new()) }),
    );

    let (a, b) = tokio::join!(loader.load("a1".to_string()), loader.load("a2".to_string()));
    for result in [a, b] {
        match result {
            Err(LoadError::Misaligned {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 0);
            }
            other => panic!("expected misaligned failure, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn to_one_relation_reports_absent_rows() {
    let names = HashMap::from([("u1".to_string(), "Ada".to_string())]);
    let loader = Loader::new(
        "user-by-id",
        from_fn(move |keys: Vec<String>| {
            let aligned = align_one(&keys, names.clone());
            async move { Ok::<_, Infallible>(aligned) }
        }),
    );

    let (known, unknown) =
        tokio::join!(loader.load("u1".to_string()), loader.load("ghost".to_string()));
    assert_eq!(known.unwrap().as_deref(), Some("Ada"));
    assert!(unknown.unwrap().is_none());
}

#[tokio::test]
async fn loads_after_dispatch_open_a_new_window() {
    let calls = Calls::default();
    let loader = Arc::new(photos_loader(calls.clone()).with_yield_count(1));

    let early = loader.load("a1".to_string()).await.unwrap();
    let late = loader.load("a2".to_string()).await.unwrap();

    assert_eq!(early.len(), 2);
    assert_eq!(late.len(), 1);
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn spawned_tasks_share_one_window() {
    let calls = Calls::default();
    let loader = Arc::new(photos_loader(calls.clone()));

    let handles: Vec<_> = ["a1", "a2", "a1", "a9"]
        .into_iter()
        .map(|key| {
            let loader = loader.clone();
            tokio::spawn(async move { loader.load(key.to_string()).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let total_keys: usize = calls.lock().unwrap().iter().map(Vec::len).sum();
    assert_eq!(total_keys, 3);
}

#[tokio::test]
async fn dropped_driver_does_not_repeat_the_bulk_call() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let loader = Arc::new(Loader::new(
        "photos-by-animal",
        from_fn(move |keys: Vec<String>| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                Ok::<_, Infallible>(keys.iter().map(|k| format!("{k}.jpg")).collect::<Vec<_>>())
            }
        }),
    ));

    let driver = tokio::spawn({
        let loader = loader.clone();
        async move { loader.load("a1".to_string()).await }
    });
    while attempts.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    driver.abort();
    assert!(driver.await.unwrap_err().is_cancelled());

    let value = loader.load("a1".to_string()).await.unwrap();
    assert_eq!(value.as_str(), "a1.jpg");
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert!(loader.is_cached(&"a1".to_string()));
}
