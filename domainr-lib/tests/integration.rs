// domainr-lib/tests/integration.rs

//! Integration tests for domainr-lib exports and the search pipeline

use async_trait::async_trait;
use domainr_lib::{
    build_query, build_request, known_tlds, AvailabilityCache, AvailabilitySource,
    CachingChecker, DiskStorage, DomainrError, ManualClock, MemoryStorage, SearchEvent,
    SearchOptions, SearchRequest, SearchState, SearchSummary, Searcher, Session, Storage,
};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Answers "available" for a fixed set of domains.
struct SetSource {
    available: HashSet<String>,
    calls: AtomicUsize,
}

impl SetSource {
    fn new(available: &[&str]) -> Self {
        Self {
            available: available.iter().map(|d| d.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AvailabilitySource for SetSource {
    async fn is_available(&self, domain: &str) -> Result<bool, DomainrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.available.contains(domain))
    }

    fn name(&self) -> &'static str {
        "set"
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_query_examples() {
    assert_eq!(
        build_query(&strings(&["super"]), &[], &strings(&["com", "io"]), false),
        strings(&["super.com", "super.io"])
    );

    let substituted = build_query(&strings(&["superyachts"]), &[], &[], true);
    assert!(known_tlds().contains(&"yachts"));
    assert!(substituted.contains(&"super.yachts".to_string()));
    assert!(substituted.iter().all(|d| d.contains('.')));
}

#[test]
fn test_query_size_without_second_parts() {
    let first = strings(&["alpha", "beta", "gamma"]);
    let tlds = strings(&["com", "net", "org", "io"]);
    assert_eq!(build_query(&first, &[], &tlds, false).len(), first.len() * tlds.len());
}

#[tokio::test]
async fn test_search_end_to_end_on_disk() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(DiskStorage::open(dir.path()).unwrap());
    let source = Arc::new(SetSource::new(&["megayachts.io", "superboats.com"]));

    let request = SearchRequest::new(
        strings(&["super", "mega"]),
        strings(&["yachts", "boats"]),
        strings(&["com", "io"]),
    );
    request.validate().unwrap();
    let candidates = build_request(&request);
    assert_eq!(candidates.len(), 8);

    let searcher = Searcher::new(
        CachingChecker::new(AvailabilityCache::new(storage.clone()), source.clone()),
        SearchOptions::default().with_concurrency(3),
    );

    let (found, outcome) = searcher.search(candidates.clone()).finish().await;
    assert_eq!(found, strings(&["megayachts.io", "superboats.com"]));
    assert_eq!(
        outcome,
        SearchEvent::Completed(SearchSummary {
            scanned: 8,
            found: 2
        })
    );
    assert_eq!(source.calls.load(Ordering::SeqCst), 8);

    // Second run is served from the cache
    let (again, _) = searcher.search(candidates).finish().await;
    assert_eq!(again, found);
    assert_eq!(source.calls.load(Ordering::SeqCst), 8);
    assert_eq!(searcher.state(), SearchState::Completed);

    // Cache records survive as plain files
    let record = storage.read("megayachts.io").await.unwrap();
    assert!(record.ends_with(b":t"));
}

#[tokio::test]
async fn test_cache_round_trip_and_expiry() {
    let clock = Arc::new(ManualClock::new(1_700_000_000));
    let cache = AvailabilityCache::with_clock(Arc::new(MemoryStorage::new()), clock.clone());

    cache.save("x.com", b"payload", Duration::from_secs(10)).await.unwrap();
    assert_eq!(cache.get("x.com").await.unwrap(), b"payload");

    cache.save("x.com", b"newer", Duration::from_secs(10)).await.unwrap();
    assert_eq!(cache.get("x.com").await.unwrap(), b"newer");

    clock.advance(Duration::from_secs(10));
    assert!(cache.get("x.com").await.unwrap_err().is_cache_miss());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_save_get_keeps_entries_isolated() {
    let dir = TempDir::new().unwrap();
    let cache = AvailabilityCache::new(Arc::new(DiskStorage::open(dir.path()).unwrap()));

    // Random keys and payloads, generated up front since ThreadRng is not Send
    let mut rng = rand::thread_rng();
    let tasks = rng.gen_range(4..12);
    let mut plans: Vec<Vec<(String, Vec<Vec<u8>>)>> = Vec::new();
    let mut seen = HashSet::new();
    for t in 0..tasks {
        let mut plan = Vec::new();
        for _ in 0..rng.gen_range(5..20) {
            let stem_len = rng.gen_range(3..16);
            let stem: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(stem_len)
                .map(char::from)
                .collect();
            let key = format!("{}-{}.com", stem, t);
            if !seen.insert(key.clone()) {
                continue;
            }
            let writes = (0..rng.gen_range(1..4))
                .map(|_| {
                    let len = rng.gen_range(0..64);
                    (0..len).map(|_| rng.gen::<u8>()).collect::<Vec<u8>>()
                })
                .collect();
            plan.push((key, writes));
        }
        plans.push(plan);
    }

    let mut handles = Vec::new();
    for plan in plans.clone() {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for (key, writes) in plan {
                for payload in &writes {
                    cache.save(&key, payload, Duration::from_secs(3600)).await.unwrap();
                    assert_eq!(&cache.get(&key).await.unwrap(), payload);
                }
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let expected: HashMap<String, Vec<u8>> = plans
        .into_iter()
        .flatten()
        .filter_map(|(key, writes)| writes.last().cloned().map(|last| (key, last)))
        .collect();
    for (key, payload) in expected {
        assert_eq!(cache.get(&key).await.unwrap(), payload, "entry {} corrupted", key);
    }
}

#[test]
fn test_session_reproduces_request() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("yachts.json");

    let request = SearchRequest::new(
        strings(&["super", "mega"]),
        strings(&["yachts"]),
        strings(&["io", "com"]),
    )
    .with_tld_substitution(true);
    let session = Session::from_request(&request, strings(&["megayachts.io"]));
    session.save(&path).unwrap();

    let loaded = Session::load(&path).unwrap();
    assert_eq!(loaded, session);
    assert_eq!(loaded.to_request(), request);
}
