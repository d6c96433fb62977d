#![no_main]

use heapprobe::{BlockHeap, Exerciser, Lcg};
use libfuzzer_sys::fuzz_target;

// Fuzz target that runs the exerciser over a block heap.
// Input layout: seed (u32 LE), iterations (u16 LE), bound (u16 LE),
// heap size in 256-byte pages (u8).

fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }
    let seed = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let n = u16::from_le_bytes([data[4], data[5]]) as u32;
    let max = u16::from_le_bytes([data[6], data[7]]) as u32;
    let pages = data[8] as usize + 1;

    let mut mem = vec![0u8; pages * 256];
    let mut heap = BlockHeap::new(&mut mem).unwrap();
    let mut rng = Lcg::new(seed);

    let mut ex = match Exerciser::new(&mut heap, &mut rng, n, max) {
        Ok(ex) => ex,
        Err(_) => {
            assert_eq!(max, 0);
            return;
        }
    };
    let mut steps = 0u32;
    while ex.step().is_some() {
        steps += 1;
        assert!(ex.live().len() <= n as usize);
    }
    assert_eq!(steps, n);

    let summary = ex.summary();
    let live = summary.live;
    drop(ex);
    assert_eq!(heap.blocks().filter(|b| b.used).count(), live);
});
