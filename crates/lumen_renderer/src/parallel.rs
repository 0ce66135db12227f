//! Thread pool and 2D parallel-for scheduler.
//!
//! A fixed set of worker threads plus whichever thread enqueues a job share a
//! single job list behind one mutex and one condition variable. A job hands
//! out steps (closures) one at a time; the step runs with the lock released,
//! so the lock is only held to claim work and to retire finished jobs.
//!
//! The enqueuing thread works on the job list until its own job has been
//! fully executed, which makes [`parallel_for_2d`] a blocking call.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use lumen_math::{Bounds2i, Point2i};

/// Largest tile edge handed out by [`parallel_for_2d`].
const MAX_TILE_EDGE: i32 = 32;

/// Tiles generated per running thread, for load balancing.
const TILES_PER_THREAD: u64 = 8;

type JobId = u64;

/// A claimed unit of work, run without the pool lock held.
pub type JobStep = Box<dyn FnOnce() + Send>;

/// A job that can be split into steps executed by any pool thread.
///
/// Both methods are called with the pool lock held and must not block.
pub trait ParallelJob: Send {
    /// True while unclaimed steps remain.
    fn has_work(&self) -> bool;

    /// Claim the next step. Only called when `has_work` is true.
    fn claim_step(&mut self) -> JobStep;
}

struct JobEntry {
    id: JobId,
    job: Box<dyn ParallelJob>,
    /// Threads currently running a step of this job
    active_workers: usize,
}

#[derive(Default)]
struct PoolState {
    jobs: Vec<JobEntry>,
    shutdown: bool,
    disabled: bool,
    next_id: JobId,
}

struct Shared {
    state: Mutex<PoolState>,
    condvar: Condvar,
}

impl Shared {
    /// Steps run outside the lock, so poisoning can only come from a panic
    /// in the short bookkeeping sections; the state is still consistent.
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one step of the first job that has work, or wait for a change.
    ///
    /// Takes and returns the pool lock. While a step runs the lock is
    /// released.
    fn work_or_wait<'a>(
        &'a self,
        mut state: MutexGuard<'a, PoolState>,
        is_enqueuing: bool,
    ) -> MutexGuard<'a, PoolState> {
        let index = if state.disabled && !is_enqueuing {
            None
        } else {
            state.jobs.iter().position(|entry| entry.job.has_work())
        };

        let Some(index) = index else {
            return self
                .condvar
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        };

        let entry = &mut state.jobs[index];
        let id = entry.id;
        let step = entry.job.claim_step();
        entry.active_workers += 1;
        drop(state);

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(step)) {
            log::error!(
                "Parallel job step panicked: {}",
                panic_message(payload.as_ref())
            );
            std::process::abort();
        }

        let mut state = self.lock();
        if let Some(index) = state.jobs.iter().position(|entry| entry.id == id) {
            let entry = &mut state.jobs[index];
            entry.active_workers -= 1;
            if !entry.job.has_work() && entry.active_workers == 0 {
                state.jobs.remove(index);
                self.condvar.notify_all();
            }
        }
        state
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

/// Fixed-size pool of worker threads.
///
/// The thread that enqueues a job also works on it, so a pool of `n` threads
/// spawns `n - 1` workers.
pub struct ThreadPool {
    shared: Arc<Shared>,
    threads: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Create a pool running `n_threads` threads including the caller.
    pub fn new(n_threads: usize) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState::default()),
            condvar: Condvar::new(),
        });

        let mut threads = Vec::with_capacity(n_threads.saturating_sub(1));
        for index in 1..n_threads.max(1) {
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("lumen-worker-{index}"))
                .spawn(move || worker_loop(&worker_shared));

            match spawned {
                Ok(handle) => threads.push(handle),
                Err(err) => {
                    log::warn!("Could not spawn worker thread {index}: {err}");
                    break;
                }
            }
        }

        log::debug!("Thread pool started with {} workers", threads.len());
        Self { shared, threads }
    }

    /// Create a pool sized to the machine's available parallelism.
    pub fn with_available_parallelism() -> Self {
        let n_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(n_threads)
    }

    /// Threads that execute work: the workers plus the enqueuing thread.
    pub fn running_threads(&self) -> usize {
        self.threads.len() + 1
    }

    /// While disabled, workers sleep and jobs run on the enqueuing thread.
    pub fn set_disabled(&self, disabled: bool) {
        let mut state = self.shared.lock();
        state.disabled = disabled;
        drop(state);
        self.shared.condvar.notify_all();
    }

    pub fn is_disabled(&self) -> bool {
        self.shared.lock().disabled
    }

    /// Enqueue `job` and work until it has been fully executed.
    pub fn run(&self, job: Box<dyn ParallelJob>) {
        if !job.has_work() {
            return;
        }

        let mut state = self.shared.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.jobs.push(JobEntry {
            id,
            job,
            active_workers: 0,
        });
        self.shared.condvar.notify_all();

        while state.jobs.iter().any(|entry| entry.id == id) {
            state = self.shared.work_or_wait(state, true);
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.condvar.notify_all();

        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                log::error!("Worker thread exited with a panic");
            }
        }
        log::debug!("Thread pool shut down");
    }
}

fn worker_loop(shared: &Shared) {
    let mut state = shared.lock();
    while !state.shutdown {
        state = shared.work_or_wait(state, false);
    }
}

/// Hands out square tiles of a 2D extent in row-major order.
struct ParallelForLoop2D {
    extent: Bounds2i,
    next_start: Point2i,
    chunk_size: i32,
    func: Arc<dyn Fn(Bounds2i) + Send + Sync>,
}

impl ParallelForLoop2D {
    fn new(extent: Bounds2i, chunk_size: i32, func: Arc<dyn Fn(Bounds2i) + Send + Sync>) -> Self {
        Self {
            extent,
            next_start: extent.p_min,
            chunk_size: chunk_size.max(1),
            func,
        }
    }
}

impl ParallelJob for ParallelForLoop2D {
    fn has_work(&self) -> bool {
        self.next_start.y < self.extent.p_max.y
    }

    fn claim_step(&mut self) -> JobStep {
        let start = self.next_start;
        let end = (start + Point2i::splat(self.chunk_size)).min(self.extent.p_max);
        let tile = Bounds2i::new(start, end);

        self.next_start.x += self.chunk_size;
        if self.next_start.x >= self.extent.p_max.x {
            self.next_start.x = self.extent.p_min.x;
            self.next_start.y += self.chunk_size;
        }

        let func = Arc::clone(&self.func);
        Box::new(move || func(tile))
    }
}

/// Edge length of the square tiles for an extent of `area` points.
pub fn tile_edge(area: u64, running_threads: usize) -> i32 {
    let target_tiles = TILES_PER_THREAD * running_threads.max(1) as u64;
    let edge = ((area / target_tiles) as f64).sqrt().floor() as i32;
    edge.clamp(1, MAX_TILE_EDGE)
}

/// Call `func` on disjoint tiles covering `extent`, in parallel on `pool`.
///
/// Blocks until every tile has been processed. Tiles are visited in no
/// particular order. A single-point extent runs inline on the caller.
pub fn parallel_for_2d<F>(pool: &ThreadPool, extent: Bounds2i, func: F)
where
    F: Fn(Bounds2i) + Send + Sync + 'static,
{
    if extent.is_empty() {
        return;
    }
    if extent.area() == 1 {
        func(extent);
        return;
    }

    let chunk_size = tile_edge(extent.area(), pool.running_threads());
    pool.run(Box::new(ParallelForLoop2D::new(
        extent,
        chunk_size,
        Arc::new(func),
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn collect_tiles(pool: &ThreadPool, extent: Bounds2i) -> Vec<Bounds2i> {
        let tiles = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&tiles);
        parallel_for_2d(pool, extent, move |tile| sink.lock().unwrap().push(tile));
        let tiles = tiles.lock().unwrap().clone();
        tiles
    }

    #[test]
    fn test_tile_edge() {
        assert_eq!(tile_edge(1, 1), 1);
        assert_eq!(tile_edge(64 * 64, 1), 22);
        assert_eq!(tile_edge(4096 * 4096, 4), MAX_TILE_EDGE);
        assert_eq!(tile_edge(100, 64), 1);
    }

    #[test]
    fn test_single_thread_pool_covers_extent() {
        let pool = ThreadPool::new(1);
        assert_eq!(pool.running_threads(), 1);

        let extent = Bounds2i::from_size(37, 23);
        let tiles = collect_tiles(&pool, extent);

        let mut seen = HashSet::new();
        for tile in &tiles {
            assert!(!tile.is_empty());
            for p in tile.iter() {
                assert!(extent.contains(p));
                assert!(seen.insert(p), "point {p:?} covered twice");
            }
        }
        assert_eq!(seen.len() as u64, extent.area());
    }

    #[test]
    fn test_multi_thread_pool_runs_every_tile_once() {
        let pool = ThreadPool::new(4);
        let counter = Arc::new(AtomicUsize::new(0));

        let count = Arc::clone(&counter);
        let extent = Bounds2i::new(Point2i::new(-5, 3), Point2i::new(120, 77));
        parallel_for_2d(&pool, extent, move |tile| {
            count.fetch_add(tile.area() as usize, Ordering::Relaxed);
        });

        assert_eq!(counter.load(Ordering::Relaxed) as u64, extent.area());
    }

    #[test]
    fn test_empty_and_single_point_extents() {
        let pool = ThreadPool::new(2);

        assert!(collect_tiles(&pool, Bounds2i::from_size(0, 10)).is_empty());

        let one = Bounds2i::new(Point2i::new(4, 4), Point2i::new(5, 5));
        assert_eq!(collect_tiles(&pool, one), vec![one]);
    }

    #[test]
    fn test_disabled_pool_runs_on_caller() {
        let pool = ThreadPool::new(3);
        pool.set_disabled(true);
        assert!(pool.is_disabled());

        let caller = thread::current().id();
        let threads = Arc::new(Mutex::new(HashSet::new()));
        let sink = Arc::clone(&threads);
        parallel_for_2d(&pool, Bounds2i::from_size(64, 64), move |_| {
            sink.lock().unwrap().insert(thread::current().id());
        });

        let threads = threads.lock().unwrap();
        assert_eq!(threads.len(), 1);
        assert!(threads.contains(&caller));

        pool.set_disabled(false);
        assert!(!pool.is_disabled());
    }

    #[test]
    fn test_pool_is_reusable_and_drops_cleanly() {
        let pool = ThreadPool::new(3);
        for size in [1, 7, 40] {
            let extent = Bounds2i::from_size(size, size);
            let tiles = collect_tiles(&pool, extent);
            let covered: u64 = tiles.iter().map(|t| t.area()).sum();
            assert_eq!(covered, extent.area());
        }
        drop(pool);
    }
}
