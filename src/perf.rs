// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Opt-in performance counters for the render loop: trace counts bucketed by recursion
//! depth, and aggregate primitive/bounding-volume raycast attempt and hit counts.
//!
//! Thread-local to avoid cross-thread contention from the parallel capture loop. Each
//! thread registers its counters in a process-wide registry the first time it touches
//! them, so [`snapshot`] can read a still-running rayon worker's in-flight counts
//! directly rather than waiting for the thread to exit. A thread that does exit folds
//! its final counts into a process-wide total and drops out of the registry, so counts
//! are never lost and never double-counted. Disabled by default; [`set_enabled`] is
//! checked on every call site, so the cost when off is one relaxed load, never the
//! render output.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

pub const MAX_DEPTH: usize = 16;

static ENABLED: AtomicBool = AtomicBool::new(false);

pub fn set_enabled(on: bool) {
    ENABLED.store(on, Ordering::Relaxed);
}

pub fn enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

#[derive(Default, Clone, Copy, Debug)]
pub struct Totals {
    pub trace_all: [u64; MAX_DEPTH + 1],
    pub trace_hits: [u64; MAX_DEPTH + 1],
    pub object_raycasts: u64,
    pub object_raycast_hits: u64,
    pub bv_raycasts: u64,
    pub bv_raycast_hits: u64,
}

static GLOBAL_TOTALS: Mutex<Totals> = Mutex::new(Totals {
    trace_all: [0; MAX_DEPTH + 1],
    trace_hits: [0; MAX_DEPTH + 1],
    object_raycasts: 0,
    object_raycast_hits: 0,
    bv_raycasts: 0,
    bv_raycast_hits: 0,
});

struct ThreadCounters {
    trace_all: [AtomicU64; MAX_DEPTH + 1],
    trace_hits: [AtomicU64; MAX_DEPTH + 1],
    object_raycasts: AtomicU64,
    object_raycast_hits: AtomicU64,
    bv_raycasts: AtomicU64,
    bv_raycast_hits: AtomicU64,
}

impl Default for ThreadCounters {
    fn default() -> Self {
        ThreadCounters {
            trace_all: std::array::from_fn(|_| AtomicU64::new(0)),
            trace_hits: std::array::from_fn(|_| AtomicU64::new(0)),
            object_raycasts: AtomicU64::new(0),
            object_raycast_hits: AtomicU64::new(0),
            bv_raycasts: AtomicU64::new(0),
            bv_raycast_hits: AtomicU64::new(0),
        }
    }
}

impl ThreadCounters {
    fn fold_into(&self, totals: &mut Totals) {
        for depth in 0..=MAX_DEPTH {
            totals.trace_all[depth] += self.trace_all[depth].load(Ordering::Relaxed);
            totals.trace_hits[depth] += self.trace_hits[depth].load(Ordering::Relaxed);
        }
        totals.object_raycasts += self.object_raycasts.load(Ordering::Relaxed);
        totals.object_raycast_hits += self.object_raycast_hits.load(Ordering::Relaxed);
        totals.bv_raycasts += self.bv_raycasts.load(Ordering::Relaxed);
        totals.bv_raycast_hits += self.bv_raycast_hits.load(Ordering::Relaxed);
    }
}

impl Drop for ThreadCounters {
    fn drop(&mut self) {
        self.fold_into(&mut GLOBAL_TOTALS.lock().unwrap());
    }
}

/// Live threads' counters, registered the first time each thread touches `COUNTERS`.
/// Holds only `Weak` references so a thread's counters are freed on exit like normal;
/// `snapshot` prunes dead entries as it walks this list.
static REGISTRY: Mutex<Vec<Weak<ThreadCounters>>> = Mutex::new(Vec::new());

thread_local! {
    static COUNTERS: Arc<ThreadCounters> = {
        let counters = Arc::new(ThreadCounters::default());
        REGISTRY.lock().unwrap().push(Arc::downgrade(&counters));
        counters
    };
}

pub fn record_trace(depth: u32, hit: bool) {
    if !enabled() {
        return;
    }
    let depth = (depth as usize).min(MAX_DEPTH);
    COUNTERS.with(|c| {
        c.trace_all[depth].fetch_add(1, Ordering::Relaxed);
        if hit {
            c.trace_hits[depth].fetch_add(1, Ordering::Relaxed);
        }
    });
}

pub fn record_object_raycast(hit: bool) {
    if !enabled() {
        return;
    }
    COUNTERS.with(|c| {
        c.object_raycasts.fetch_add(1, Ordering::Relaxed);
        if hit {
            c.object_raycast_hits.fetch_add(1, Ordering::Relaxed);
        }
    });
}

pub fn record_bv_raycast(hit: bool) {
    if !enabled() {
        return;
    }
    COUNTERS.with(|c| {
        c.bv_raycasts.fetch_add(1, Ordering::Relaxed);
        if hit {
            c.bv_raycast_hits.fetch_add(1, Ordering::Relaxed);
        }
    });
}

/// The process-wide totals collected so far: every thread that has finished, already
/// folded into the global total, plus every still-running thread's live counters, read
/// directly off its registry entry rather than waiting for it to exit.
pub fn snapshot() -> Totals {
    COUNTERS.with(|_| ()); // ensure the calling thread is itself registered
    let mut totals = *GLOBAL_TOTALS.lock().unwrap();
    let mut registry = REGISTRY.lock().unwrap();
    registry.retain(|weak| match weak.upgrade() {
        Some(counters) => {
            counters.fold_into(&mut totals);
            true
        }
        None => false,
    });
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both behaviors are asserted in one test since `ENABLED` is process-global state
    // that other tests in this binary could otherwise race on.
    #[test]
    fn disabled_records_nothing_enabled_records_and_clamps_depth() {
        set_enabled(false);
        let before = snapshot().object_raycasts;
        record_object_raycast(true);
        assert_eq!(snapshot().object_raycasts, before);

        set_enabled(true);
        let before = snapshot();
        record_trace(MAX_DEPTH as u32 + 5, true);
        let after = snapshot();
        assert_eq!(after.trace_all[MAX_DEPTH], before.trace_all[MAX_DEPTH] + 1);
        assert_eq!(after.trace_hits[MAX_DEPTH], before.trace_hits[MAX_DEPTH] + 1);
        set_enabled(false);
    }
}
