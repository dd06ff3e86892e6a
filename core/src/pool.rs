//! Fixed-size worker pool used by the probing and enrichment phases.
//!
//! `N` workers pull indices from a shared cursor, so the number of live tasks
//! never depends on the size of the input. Results land in slots indexed like
//! the input, which keeps output order independent of completion order.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Outcome of one pool run.
#[derive(Debug)]
pub struct PoolRun<T> {
    /// One slot per input item. `None` for items that were never finished.
    pub slots: Vec<Option<T>>,
    /// Number of items handed to a worker.
    pub dispatched: usize,
    /// True when the deadline or the cancellation token cut the run short.
    pub interrupted: bool,
}

impl<T> PoolRun<T> {
    pub fn completed(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Runs `task` over `items` on `workers` concurrent workers.
///
/// Once `deadline` passes or `cancel` fires, no further item is dispatched
/// and in-flight tasks are dropped.
pub async fn run_bounded<I, T, F, Fut>(
    items: Vec<I>,
    workers: usize,
    deadline: Option<Instant>,
    cancel: &CancellationToken,
    task: F,
) -> PoolRun<T>
where
    I: Send + Sync + 'static,
    T: Send + 'static,
    F: Fn(&I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let total = items.len();
    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
    if total == 0 {
        return PoolRun {
            slots,
            dispatched: 0,
            interrupted: false,
        };
    }

    let stop = cancel.child_token();
    let watchdog = deadline.map(|at| {
        let stop = stop.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(at).await;
            stop.cancel();
        })
    });

    let items = Arc::new(items);
    let task = Arc::new(task);
    let cursor = Arc::new(AtomicUsize::new(0));
    let dispatched = Arc::new(AtomicUsize::new(0));

    let mut set = JoinSet::new();
    for _ in 0..workers.clamp(1, total) {
        let items = Arc::clone(&items);
        let task = Arc::clone(&task);
        let cursor = Arc::clone(&cursor);
        let dispatched = Arc::clone(&dispatched);
        let stop = stop.clone();

        set.spawn(async move {
            let mut finished: Vec<(usize, T)> = Vec::new();
            loop {
                if stop.is_cancelled() || deadline.is_some_and(|at| Instant::now() >= at) {
                    break;
                }
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(item) = items.get(index) else {
                    break;
                };
                dispatched.fetch_add(1, Ordering::Relaxed);

                tokio::select! {
                    biased;
                    _ = stop.cancelled() => break,
                    output = task(item) => finished.push((index, output)),
                }
            }
            finished
        });
    }

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(finished) => {
                for (index, output) in finished {
                    slots[index] = Some(output);
                }
            }
            Err(e) => debug!("pool worker ended abnormally: {e}"),
        }
    }

    if let Some(watchdog) = watchdog {
        watchdog.abort();
    }

    let dispatched = dispatched.load(Ordering::Relaxed);
    let interrupted = stop.is_cancelled() || slots.iter().any(Option::is_none);
    PoolRun {
        slots,
        dispatched,
        interrupted,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
