#![no_main]

use heapprobe::heap::NULL;
use heapprobe::BlockHeap;
use libfuzzer_sys::fuzz_target;

/// Fuzz target that interprets a byte slice as a sequence of block-heap
/// operations.
///
/// Each operation is encoded as:
///   byte 0: opcode (even = malloc, odd = free)
///   byte 1-2: size (little-endian u16)
///   byte 3: slot index (which tracked allocation to operate on)
///
/// We track up to 64 live allocations in an 8 KiB heap.
const MAX_SLOTS: usize = 64;
const HEAP_SIZE: usize = 8192;

fuzz_target!(|data: &[u8]| {
    let mut mem = vec![0u8; HEAP_SIZE];
    let mut heap = BlockHeap::new(&mut mem).unwrap();
    let mut slots: [(u32, u32); MAX_SLOTS] = [(NULL, 0); MAX_SLOTS];

    let mut i = 0;
    while i + 4 <= data.len() {
        let opcode = data[i] & 0x01;
        let size = u16::from_le_bytes([data[i + 1], data[i + 2]]) as u32;
        let slot = (data[i + 3] as usize) % MAX_SLOTS;
        i += 4;

        match opcode {
            0 => {
                if slots[slot].0 != NULL {
                    heap.free(slots[slot].0);
                }
                let ptr = heap.malloc(size);
                slots[slot] = (ptr, size);
                if ptr != NULL {
                    assert!(size > 0, "malloc(0) returned {:#x}", ptr);
                    let end = ptr as usize + size as usize;
                    assert!(end <= HEAP_SIZE, "allocation runs past the region");
                }
            }
            _ => {
                if slots[slot].0 != NULL {
                    heap.free(slots[slot].0);
                    slots[slot] = (NULL, 0);
                }
            }
        }

        // Live allocations never overlap.
        let mut live: Vec<(u32, u32)> = slots.iter().copied().filter(|s| s.0 != NULL).collect();
        live.sort_unstable();
        for pair in live.windows(2) {
            assert!(
                pair[0].0 + pair[0].1 <= pair[1].0,
                "allocations {:#x}+{} and {:#x} overlap",
                pair[0].0,
                pair[0].1,
                pair[1].0
            );
        }

        // The chain still tiles the region.
        let end = heap
            .blocks()
            .last()
            .map(|b| b.region() as usize + b.size as usize);
        assert_eq!(end, Some(HEAP_SIZE));
    }
});
