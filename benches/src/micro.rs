//! Microbenchmarks for heapprobe.
//!
//! Plain timing loops rather than a harness: the interesting numbers are
//! per-operation latencies of the block heap and the exerciser's overhead
//! over the allocator it drives.

use heapprobe::{exercise, nth_term, BlockHeap, Exerciser, Lcg, RawAllocator, SystemAllocator};
use std::hint::black_box;
use std::time::{Duration, Instant};

const HEAP_SIZE: usize = 1 << 20;

/// Measure block-heap malloc/free latency for a given size, N iterations.
fn bench_block_heap(size: u32, iterations: usize) -> f64 {
    let mut mem = vec![0u8; HEAP_SIZE];
    let mut heap = BlockHeap::new(&mut mem).expect("1 MiB region");
    // Warmup
    for _ in 0..1000 {
        let ptr = heap.malloc(black_box(size));
        heap.free(black_box(ptr));
    }
    let start = Instant::now();
    for _ in 0..iterations {
        let ptr = heap.malloc(black_box(size));
        heap.free(black_box(ptr));
    }
    start.elapsed().as_nanos() as f64 / iterations as f64
}

/// Measure a full exerciser run against the system allocator. Leftover
/// blocks are released after each run, outside the timed region.
fn bench_exerciser_system(n: u32, max: u32, runs: usize) -> f64 {
    let mut rng = Lcg::default();
    let mut elapsed = Duration::ZERO;
    for _ in 0..runs {
        let mut ex = Exerciser::new(SystemAllocator, &mut rng, black_box(n), max)
            .expect("non-zero bound");
        let start = Instant::now();
        black_box(ex.run());
        elapsed += start.elapsed();

        let (mut allocator, leftovers) = ex.finish();
        for handle in leftovers {
            unsafe { allocator.release(handle) };
        }
    }
    elapsed.as_nanos() as f64 / (runs as f64 * n as f64)
}

/// Measure a full exerciser run against a fresh block heap.
fn bench_exerciser_block_heap(n: u32, max: u32, runs: usize) -> f64 {
    let mut rng = Lcg::default();
    let mut mem = vec![0u8; HEAP_SIZE];
    let start = Instant::now();
    for _ in 0..runs {
        mem.fill(0);
        let mut heap = BlockHeap::new(&mut mem).expect("1 MiB region");
        black_box(exercise(&mut heap, &mut rng, black_box(n), max).ok());
    }
    start.elapsed().as_nanos() as f64 / (runs as f64 * n as f64)
}

fn bench_nth_term(iterations: usize) -> f64 {
    let start = Instant::now();
    for i in 0..iterations {
        black_box(nth_term(black_box((i % 90) as u32 + 3)));
    }
    start.elapsed().as_nanos() as f64 / iterations as f64
}

fn main() {
    let iterations: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(100_000);

    println!("heapprobe micro ({} iterations)", iterations);
    for size in [16u32, 64, 256, 1024] {
        println!(
            "  block heap malloc/free {:>5} B: {:>8.1} ns/op",
            size,
            bench_block_heap(size, iterations)
        );
    }
    println!(
        "  exerciser (system, n=1000, max=1024): {:>8.1} ns/iter",
        bench_exerciser_system(1000, 1024, iterations / 1000 + 1)
    );
    println!(
        "  exerciser (block heap, n=1000, max=1024): {:>8.1} ns/iter",
        bench_exerciser_block_heap(1000, 1024, iterations / 1000 + 1)
    );
    println!("  nth_term(3..93): {:>8.1} ns/call", bench_nth_term(iterations));
}
