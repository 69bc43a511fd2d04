//! Parallel render loop.
//!
//! A fixed pool of workers drains a shared bucket cursor: each worker
//! claims the next bucket index with an atomic increment, renders all of
//! its pixels, and repeats until the list is exhausted.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::bucket::Bucket;
use crate::CameraError;

/// Cores left free when the thread count is chosen automatically.
const SPARE_THREADS: usize = 2;

/// How many render threads to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadCount {
    /// Render on the calling thread.
    #[default]
    Single,
    /// Exactly this many worker threads.
    Fixed(usize),
    /// Available cores minus two spares, at least one.
    Auto,
}

impl ThreadCount {
    /// Number of worker threads, `0` meaning the calling thread.
    pub fn workers(self) -> usize {
        match self {
            ThreadCount::Single => 0,
            ThreadCount::Fixed(n) => n,
            ThreadCount::Auto => {
                let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
                cores.saturating_sub(SPARE_THREADS).max(1)
            }
        }
    }

    /// Create the worker pool, `None` for single-threaded rendering.
    pub(crate) fn build_pool(self) -> Result<Option<ThreadPool>, CameraError> {
        match self.workers() {
            0 => Ok(None),
            n => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("lumen-render-{i}"))
                    .build()?;
                Ok(Some(pool))
            }
        }
    }
}

impl std::str::FromStr for ThreadCount {
    type Err = String;

    /// Parse `auto`, `0` (calling thread) or a positive thread count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(ThreadCount::Auto);
        }
        match s.parse::<usize>() {
            Ok(0) => Ok(ThreadCount::Single),
            Ok(n) => Ok(ThreadCount::Fixed(n)),
            Err(_) => Err(format!("expected 'auto' or a thread count, got '{s}'")),
        }
    }
}

/// Logs progress every time the completed share crosses the next step.
///
/// Best effort: with several workers the messages may interleave.
pub(crate) struct Progress {
    total: usize,
    step: usize,
    done: AtomicUsize,
}

impl Progress {
    /// `interval` is a percentage; `0` disables logging.
    pub(crate) fn new(total: usize, interval: f64) -> Self {
        let step = if interval > 0.0 {
            ((total as f64 * interval / 100.0).ceil() as usize).max(1)
        } else {
            usize::MAX
        };
        Self {
            total,
            step,
            done: AtomicUsize::new(0),
        }
    }

    pub(crate) fn pixel_done(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.step == 0 || (done == self.total && self.step != usize::MAX) {
            log::info!(
                "Rendered {:.1}% ({}/{} pixels)",
                done as f64 * 100.0 / self.total as f64,
                done,
                self.total
            );
        }
    }

    pub(crate) fn completed(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}

/// Render every bucket exactly once, calling `render_pixel(x, y)` for each
/// of its pixels.
///
/// Without a pool the calling thread does all the work. With a pool every
/// pool thread runs the same claim loop until the cursor passes the end.
pub(crate) fn render_buckets<F>(
    buckets: &[Bucket],
    pool: Option<&ThreadPool>,
    progress: &Progress,
    render_pixel: F,
) where
    F: Fn(u32, u32) + Sync,
{
    let cursor = AtomicUsize::new(0);
    let worker = || {
        while let Some(bucket) = buckets.get(cursor.fetch_add(1, Ordering::Relaxed)) {
            for (x, y) in bucket.pixels() {
                render_pixel(x, y);
                progress.pixel_done();
            }
        }
    };

    match pool {
        None => worker(),
        Some(pool) => {
            pool.broadcast(|_| worker());
        }
    }
}
