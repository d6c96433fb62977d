//! Randomized allocate/release driver.
//!
//! Each iteration draws from the generator and either allocates a block of
//! `1..=max` bytes (about half the time, while the live set has room) or
//! releases a randomly chosen live block. Exhaustion is a soft failure: the
//! null result is dropped and the run continues.

use crate::allocator::RawAllocator;
use crate::error::ExerciseError;
use crate::rng::Lcg;

/// Upper bound on the live-set storage reserved up front. Larger capacities
/// grow on demand; the capacity itself is still enforced.
const PREALLOC_LIMIT: usize = 4096;

/// Fixed-capacity, unordered set of live handles.
#[derive(Debug, Clone)]
pub struct LiveSet<H> {
    slots: Vec<H>,
    capacity: usize,
}

impl<H: Copy> LiveSet<H> {
    pub fn with_capacity(capacity: usize) -> Self {
        LiveSet {
            slots: Vec::with_capacity(capacity.min(PREALLOC_LIMIT)),
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Adds `handle`, handing it back if the set is already full.
    pub fn insert(&mut self, handle: H) -> Result<(), H> {
        if self.is_full() {
            return Err(handle);
        }
        self.slots.push(handle);
        Ok(())
    }

    /// Removes the entry at `index`, moving the last entry into its slot.
    ///
    /// Panics if `index >= len()`.
    pub fn swap_remove(&mut self, index: usize) -> H {
        self.slots.swap_remove(index)
    }

    pub fn as_slice(&self) -> &[H] {
        &self.slots
    }

    pub fn into_vec(self) -> Vec<H> {
        self.slots
    }
}

/// What a single iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op<H> {
    Allocated { size: u32, handle: H },
    /// The allocator returned null for `size` bytes.
    Exhausted { size: u32 },
    Released { handle: H },
    Idle,
}

/// Per-run tallies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub iterations: u32,
    pub allocated: u32,
    pub exhausted: u32,
    pub released: u32,
    pub idle: u32,
    /// Handles still live when the summary was taken.
    pub live: usize,
}

pub struct Exerciser<'a, A: RawAllocator> {
    allocator: A,
    rng: &'a mut Lcg,
    live: LiveSet<A::Handle>,
    max: u32,
    budget: u32,
    summary: Summary,
}

impl<'a, A: RawAllocator> Exerciser<'a, A> {
    /// Prepares a run of exactly `n` iterations with sizes in `1..=max`.
    ///
    /// The live set holds at most `n` handles, so it can never overflow.
    pub fn new(allocator: A, rng: &'a mut Lcg, n: u32, max: u32) -> Result<Self, ExerciseError> {
        if max == 0 {
            return Err(ExerciseError::ZeroBound);
        }
        Ok(Exerciser {
            allocator,
            rng,
            live: LiveSet::with_capacity(n as usize),
            max,
            budget: n,
            summary: Summary::default(),
        })
    }

    /// Runs one iteration, or returns `None` once all `n` have run.
    pub fn step(&mut self) -> Option<Op<A::Handle>> {
        if self.summary.iterations == self.budget {
            return None;
        }
        self.summary.iterations += 1;

        let op = if self.rng.next_u32() % self.max < self.max / 2 && !self.live.is_full() {
            let size = self.rng.next_u32() % self.max + 1;
            match self.allocator.allocate(size as usize) {
                Some(handle) => {
                    let inserted = self.live.insert(handle);
                    debug_assert!(inserted.is_ok(), "live set overflow");
                    self.summary.allocated += 1;
                    Op::Allocated { size, handle }
                }
                None => {
                    self.summary.exhausted += 1;
                    Op::Exhausted { size }
                }
            }
        } else if !self.live.is_empty() {
            let index = self.rng.next_u32() % self.live.len() as u32;
            let handle = self.live.swap_remove(index as usize);
            // SAFETY: every handle in the live set came from `allocate` and is
            // removed from the set before it is released.
            unsafe { self.allocator.release(handle) };
            self.summary.released += 1;
            Op::Released { handle }
        } else {
            self.summary.idle += 1;
            Op::Idle
        };

        self.summary.live = self.live.len();
        Some(op)
    }

    /// Runs the remaining iterations.
    pub fn run(&mut self) -> Summary {
        while self.step().is_some() {}
        self.summary
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// The allocator being exercised, e.g. to inspect or fill live blocks.
    pub fn allocator_mut(&mut self) -> &mut A {
        &mut self.allocator
    }

    pub fn live(&self) -> &LiveSet<A::Handle> {
        &self.live
    }

    /// Ends the run and hands back the allocator and the still-live handles.
    /// Nothing is released on the caller's behalf.
    pub fn finish(self) -> (A, Vec<A::Handle>) {
        (self.allocator, self.live.into_vec())
    }
}

/// Runs `n` iterations against `allocator`. Blocks still live at the end
/// are left allocated.
pub fn exercise<A: RawAllocator>(
    allocator: A,
    rng: &mut Lcg,
    n: u32,
    max: u32,
) -> Result<Summary, ExerciseError> {
    Ok(Exerciser::new(allocator, rng, n, max)?.run())
}
