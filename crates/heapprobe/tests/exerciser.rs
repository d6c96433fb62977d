//! Behaviour of the allocation exerciser against scripted allocators.

use heapprobe::{exercise, Exerciser, Lcg, Op, RawAllocator};
use std::collections::HashSet;

/// Records every call and checks that releases only target live handles.
#[derive(Default)]
struct Recorder {
    next: usize,
    live: HashSet<usize>,
    ever_allocated: HashSet<usize>,
    allocs: usize,
    releases: usize,
    sizes: Vec<usize>,
    /// When set, every allocation fails.
    exhausted: bool,
}

impl Recorder {
    fn exhausted() -> Self {
        Recorder {
            exhausted: true,
            ..Recorder::default()
        }
    }
}

impl RawAllocator for Recorder {
    type Handle = usize;

    fn allocate(&mut self, size: usize) -> Option<usize> {
        self.allocs += 1;
        self.sizes.push(size);
        if self.exhausted {
            return None;
        }
        self.next += 1;
        let handle = self.next * 16;
        self.live.insert(handle);
        self.ever_allocated.insert(handle);
        Some(handle)
    }

    unsafe fn release(&mut self, handle: usize) {
        assert!(
            self.ever_allocated.contains(&handle),
            "release of unknown handle {:#x}",
            handle
        );
        assert!(
            self.live.remove(&handle),
            "double release of handle {:#x}",
            handle
        );
        self.releases += 1;
    }
}

// ---------------------------------------------------------------------------
// n = 100, max = 16: exact iteration count, consistent calls
// ---------------------------------------------------------------------------

#[test]
fn hundred_iterations_bound_sixteen() {
    let mut rng = Lcg::default();
    let mut rec = Recorder::default();
    let summary = exercise(&mut rec, &mut rng, 100, 16).unwrap();

    assert_eq!(summary.iterations, 100);
    assert_eq!(rec.allocs, summary.allocated as usize);
    assert_eq!(rec.releases, summary.released as usize);
    assert_eq!(rec.live.len(), summary.live);
    assert!(rec.allocs > 0, "no allocations in 100 iterations");
    assert!(rec.releases > 0, "no releases in 100 iterations");
}

#[test]
fn sizes_stay_within_bound() {
    for max in [1u32, 2, 3, 16, 1024] {
        let mut rng = Lcg::new(max);
        let mut rec = Recorder::default();
        exercise(&mut rec, &mut rng, 1000, max).unwrap();
        for &size in &rec.sizes {
            assert!(
                size >= 1 && size <= max as usize,
                "size {} outside 1..={}",
                size,
                max
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Live count stays within [0, n] after every prefix
// ---------------------------------------------------------------------------

#[test]
fn live_count_never_exceeds_capacity() {
    for (seed, n, max) in [(1u32, 10u32, 16u32), (7, 50, 2), (99, 200, 1000), (5, 3, 100)] {
        let mut rng = Lcg::new(seed);
        let mut rec = Recorder::default();
        let mut ex = Exerciser::new(&mut rec, &mut rng, n, max).unwrap();
        let mut steps = 0;
        while let Some(_op) = ex.step() {
            steps += 1;
            let live = ex.live().len();
            assert!(live <= n as usize, "live {} > capacity {}", live, n);
            assert_eq!(ex.live().capacity(), n as usize);
        }
        assert_eq!(steps, n);
    }
}

#[test]
fn full_live_set_forces_release_or_idle() {
    // With capacity 2 the allocate branch is refused once two handles are
    // live, so no Allocated op may follow two net allocations.
    let mut rng = Lcg::default();
    let mut rec = Recorder::default();
    let mut ex = Exerciser::new(&mut rec, &mut rng, 2, 16).unwrap();
    let mut live = 0usize;
    while let Some(op) = ex.step() {
        match op {
            Op::Allocated { .. } => {
                assert!(live < 2);
                live += 1;
            }
            Op::Released { .. } => live -= 1,
            Op::Exhausted { .. } | Op::Idle => {}
        }
    }
}

#[test]
fn released_handles_were_live() {
    let mut rng = Lcg::new(2024);
    let mut rec = Recorder::default();
    let mut ex = Exerciser::new(&mut rec, &mut rng, 5000, 8).unwrap();
    let mut live = HashSet::new();
    while let Some(op) = ex.step() {
        match op {
            Op::Allocated { handle, .. } => assert!(live.insert(handle)),
            Op::Released { handle } => assert!(live.remove(&handle)),
            Op::Exhausted { .. } | Op::Idle => {}
        }
    }
    let mut remaining: Vec<_> = ex.live().as_slice().to_vec();
    let mut expected: Vec<_> = live.into_iter().collect();
    remaining.sort_unstable();
    expected.sort_unstable();
    assert_eq!(remaining, expected);
}

// ---------------------------------------------------------------------------
// Exhausted allocator: nothing becomes live, release is never attempted
// ---------------------------------------------------------------------------

#[test]
fn always_null_allocator_keeps_live_set_empty() {
    let mut rng = Lcg::default();
    let mut rec = Recorder::exhausted();
    let mut ex = Exerciser::new(&mut rec, &mut rng, 300, 16).unwrap();
    while let Some(op) = ex.step() {
        assert!(
            matches!(op, Op::Exhausted { .. } | Op::Idle),
            "unexpected op {:?}",
            op
        );
        assert_eq!(ex.live().len(), 0);
    }
    let summary = ex.summary();
    drop(ex);
    assert_eq!(summary.allocated, 0);
    assert_eq!(summary.released, 0);
    assert_eq!(summary.exhausted as usize, rec.allocs);
    assert_eq!(rec.releases, 0);
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn same_seed_same_trace() {
    let trace = |seed: u32| {
        let mut rng = Lcg::new(seed);
        let mut rec = Recorder::default();
        let mut ex = Exerciser::new(&mut rec, &mut rng, 400, 32).unwrap();
        let mut ops = Vec::new();
        while let Some(op) = ex.step() {
            ops.push(op);
        }
        (ops, rng.seed())
    };
    assert_eq!(trace(123_456_789), trace(123_456_789));
    assert_ne!(trace(1).0, trace(2).0);
}

#[test]
fn first_iteration_from_default_seed() {
    // First draw 920370032 % 16 == 0 < 8: allocate, size 3761641487 % 16 + 1.
    let mut rng = Lcg::default();
    let mut rec = Recorder::default();
    let mut ex = Exerciser::new(&mut rec, &mut rng, 1, 16).unwrap();
    assert_eq!(
        ex.step(),
        Some(Op::Allocated {
            size: 3_761_641_487 % 16 + 1,
            handle: 16
        })
    );
    assert_eq!(ex.step(), None);
}

#[test]
fn leftovers_can_be_released_by_caller() {
    let mut rng = Lcg::default();
    let mut ex = Exerciser::new(Recorder::default(), &mut rng, 64, 16).unwrap();
    ex.run();
    let (mut rec, leftovers) = ex.finish();
    assert_eq!(rec.live.len(), leftovers.len());
    for handle in leftovers {
        unsafe { rec.release(handle) };
    }
    assert!(rec.live.is_empty());
}
