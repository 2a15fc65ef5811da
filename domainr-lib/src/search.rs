//! Concurrent search orchestration.
//!
//! A [`Searcher`] hands the candidate list to a bounded pool of workers
//! that share one pending queue. Workers report findings to a single
//! aggregator task, which keeps the sorted found-list and streams it back
//! to the caller as [`SearchEvent`]s.
//!
//! Starting a new search cancels the one still running. A worker that hits
//! a source error stops pulling work; the remaining workers keep draining
//! the shared queue. The first error to reach the aggregator is the one
//! reported. A worker that panics fails the search with an internal error.

use crate::checker::CachingChecker;
use crate::error::DomainrError;
use crate::types::{AvailabilityResult, SearchEvent, SearchOptions, SearchState, SearchSummary};
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Messages from workers to the aggregator.
#[derive(Debug)]
enum WorkerMessage {
    Found(AvailabilityResult),
    Error(DomainrError),
    Done,
}

/// State shared between the searcher and its aggregator tasks.
///
/// The generation lets a superseded aggregator finish without clobbering
/// the state of the search that replaced it.
#[derive(Debug)]
struct Lifecycle {
    generation: u64,
    state: SearchState,
    cancel: Option<CancellationToken>,
}

/// Runs availability searches over candidate lists.
///
/// # Example
///
/// ```rust,no_run
/// use domainr_lib::{
///     build_query, AvailabilityCache, CachingChecker, DnsConfig, DnsSource, MemoryStorage,
///     SearchEvent, SearchOptions, Searcher,
/// };
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cache = AvailabilityCache::new(Arc::new(MemoryStorage::new()));
///     let checker = CachingChecker::new(cache, Arc::new(DnsSource::new(&DnsConfig::default())?));
///     let searcher = Searcher::new(checker, SearchOptions::default());
///
///     let candidates = build_query(&["super".into()], &[], &["com".into(), "io".into()], false);
///     let mut search = searcher.search(candidates);
///     while let Some(event) = search.next_event().await {
///         match event {
///             SearchEvent::Found(list) => println!("{}", list.join(" ")),
///             SearchEvent::Completed(summary) => println!("{}", summary),
///             SearchEvent::Failed(e) => eprintln!("API error: {}", e),
///             SearchEvent::Cancelled => break,
///         }
///     }
///     Ok(())
/// }
/// ```
pub struct Searcher {
    checker: Arc<CachingChecker>,
    options: SearchOptions,
    lifecycle: Arc<Mutex<Lifecycle>>,
}

impl Searcher {
    /// Create a searcher. The checker's TTL is taken from `options`.
    pub fn new(checker: CachingChecker, options: SearchOptions) -> Self {
        let checker = checker.with_ttl(options.cache_ttl);
        Self {
            checker: Arc::new(checker),
            options,
            lifecycle: Arc::new(Mutex::new(Lifecycle {
                generation: 0,
                state: SearchState::Idle,
                cancel: None,
            })),
        }
    }

    /// Options this searcher sizes its pool with.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SearchState {
        lock(&self.lifecycle).state
    }

    /// Start checking `candidates`, cancelling any search still running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn search(&self, candidates: Vec<String>) -> SearchHandle {
        let cancel = CancellationToken::new();
        let generation = {
            let mut lifecycle = lock(&self.lifecycle);
            if let Some(previous) = lifecycle.cancel.replace(cancel.clone()) {
                if lifecycle.state == SearchState::Running {
                    debug!("superseding running search");
                }
                previous.cancel();
            }
            lifecycle.generation += 1;
            lifecycle.state = SearchState::Running;
            lifecycle.generation
        };

        let pool_size = self.options.pool_size(candidates.len());
        info!(
            candidates = candidates.len(),
            workers = pool_size,
            source = self.checker.source_name(),
            "starting search"
        );

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        tokio::spawn(aggregate(
            self.checker.clone(),
            candidates,
            pool_size,
            cancel.clone(),
            Arc::clone(&self.lifecycle),
            generation,
            events_tx,
        ));

        SearchHandle {
            events: events_rx,
            cancel,
        }
    }

    /// Cancel the running search, if any.
    pub fn cancel(&self) {
        if let Some(cancel) = &lock(&self.lifecycle).cancel {
            cancel.cancel();
        }
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("checker", &self.checker)
            .field("options", &self.options)
            .field("state", &self.state())
            .finish()
    }
}

/// Receiving end of one search.
#[derive(Debug)]
pub struct SearchHandle {
    events: mpsc::UnboundedReceiver<SearchEvent>,
    cancel: CancellationToken,
}

impl SearchHandle {
    /// Next event, or `None` once the terminal event has been consumed.
    pub async fn next_event(&mut self) -> Option<SearchEvent> {
        self.events.recv().await
    }

    /// Stop this search. Workers finish their in-flight check and exit.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Consume the handle as a stream of events.
    pub fn into_stream(self) -> impl Stream<Item = SearchEvent> + Send {
        stream::unfold(self.events, |mut events| async move {
            events.recv().await.map(|event| (event, events))
        })
    }

    /// Skip progress updates and wait for the terminal event.
    ///
    /// Returns the last found-list alongside it.
    pub async fn finish(mut self) -> (Vec<String>, SearchEvent) {
        let mut found = Vec::new();
        while let Some(event) = self.events.recv().await {
            match event {
                SearchEvent::Found(list) => found = list,
                terminal => return (found, terminal),
            }
        }
        // Aggregator went away without a terminal event
        (found, SearchEvent::Cancelled)
    }
}

/// Drive the worker pool for one search and publish its events.
async fn aggregate(
    checker: Arc<CachingChecker>,
    candidates: Vec<String>,
    pool_size: usize,
    cancel: CancellationToken,
    lifecycle: Arc<Mutex<Lifecycle>>,
    generation: u64,
    events: mpsc::UnboundedSender<SearchEvent>,
) {
    let scanned = candidates.len();
    let queue = Arc::new(Mutex::new(VecDeque::from(candidates)));
    let (tx, mut rx) = mpsc::channel(pool_size * 2);

    let mut workers = JoinSet::new();
    for id in 0..pool_size {
        workers.spawn(work(
            id,
            Arc::clone(&checker),
            Arc::clone(&queue),
            cancel.clone(),
            tx.clone(),
        ));
    }
    drop(tx);

    let mut found: Vec<String> = Vec::new();
    let mut first_error: Option<DomainrError> = None;
    let mut done = 0;

    while done < pool_size {
        match rx.recv().await {
            Some(WorkerMessage::Found(result)) => {
                found.push(result.domain);
                found.sort();
                let _ = events.send(SearchEvent::Found(found.clone()));
            }
            Some(WorkerMessage::Error(e)) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
            Some(WorkerMessage::Done) => done += 1,
            None => {
                warn!(done, pool_size, "workers exited without signalling completion");
                break;
            }
        }
    }

    let mut panicked = None;
    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            if e.is_panic() {
                warn!(error = %e, "search worker panicked");
                panicked.get_or_insert(e);
            }
        }
    }

    if first_error.is_none() && done < pool_size {
        first_error = Some(match panicked {
            Some(e) => DomainrError::internal(format!("search worker panicked: {}", e)),
            None => DomainrError::internal(format!(
                "{} of {} search workers stopped unexpectedly",
                pool_size - done,
                pool_size
            )),
        });
    }

    let (terminal, state) = if cancel.is_cancelled() {
        info!("search cancelled");
        (SearchEvent::Cancelled, SearchState::Cancelled)
    } else if let Some(e) = first_error {
        info!(error = %e, "search failed");
        (SearchEvent::Failed(e), SearchState::Failed)
    } else {
        let summary = SearchSummary {
            scanned,
            found: found.len(),
        };
        info!(scanned, found = summary.found, "search complete");
        (SearchEvent::Completed(summary), SearchState::Completed)
    };

    {
        let mut lifecycle = lock(&lifecycle);
        if lifecycle.generation == generation {
            lifecycle.state = state;
            lifecycle.cancel = None;
        }
    }

    let _ = events.send(terminal);
}

/// Pull candidates until the queue is empty, the search is cancelled, or
/// the source fails.
async fn work(
    id: usize,
    checker: Arc<CachingChecker>,
    queue: Arc<Mutex<VecDeque<String>>>,
    cancel: CancellationToken,
    tx: mpsc::Sender<WorkerMessage>,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }

        let Some(domain) = lock(&queue).pop_front() else {
            break;
        };

        match checker.check(&domain, &cancel).await {
            Ok(Some(result)) if result.available => {
                debug!(worker = id, %domain, "available");
                if tx.send(WorkerMessage::Found(result)).await.is_err() {
                    return;
                }
            }
            Ok(Some(_)) => debug!(worker = id, %domain, "taken"),
            Ok(None) => break,
            Err(e) => {
                warn!(worker = id, %domain, error = %e, "source error, worker stopping");
                let _ = tx.send(WorkerMessage::Error(e)).await;
                break;
            }
        }
    }

    let _ = tx.send(WorkerMessage::Done).await;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
