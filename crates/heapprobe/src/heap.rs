//! First-fit block heap over a linear byte region.
//!
//! Layout of the region:
//!
//! ```text
//! [0][2][hdr][...region...][hdr][...region...] ...
//!  |  |  |
//!  |  |  +- first block header at offset 2
//!  |  +---- "brk" marker: non-zero once the region is initialized
//!  +------- offset 0 is the null handle
//! ```
//!
//! Each header is 9 bytes: one flag byte (bit 0 = used), the block size and
//! the offset of the next header, both big-endian `u32`. A next offset of 0
//! ends the chain. Freed blocks are never merged with their neighbours.

use crate::allocator::RawAllocator;
use crate::error::HeapError;
use core::num::NonZeroU32;
use tracing::{trace, warn};

pub const HEADER_SIZE: u32 = 9;
/// Smallest remainder worth splitting off into its own free block.
pub const MIN_BLOCK_SIZE: u32 = 16;
pub const NULL: u32 = 0;

const SIZE_INDEX: usize = 1;
const NEXT_INDEX: usize = 5;
const BRK_INDEX: usize = 1;
const FIRST_BLOCK: u32 = 2;

const FLAG_USED: u8 = 0x01;

/// A decoded block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Offset of the header.
    pub offset: u32,
    pub used: bool,
    pub size: u32,
    pub next: u32,
}

impl Block {
    /// Offset of the first byte handed out to the caller.
    #[inline]
    pub fn region(&self) -> u32 {
        self.offset + HEADER_SIZE
    }
}

pub struct BlockHeap<'m> {
    memory: &'m mut [u8],
}

impl<'m> BlockHeap<'m> {
    /// Takes over `memory`. A region whose marker byte is still zero gets a
    /// single free block spanning everything after the reserved prefix; a
    /// region that already carries the marker is adopted as-is.
    pub fn new(memory: &'m mut [u8]) -> Result<Self, HeapError> {
        let len = memory.len();
        if len < (FIRST_BLOCK + HEADER_SIZE) as usize {
            return Err(HeapError::RegionTooSmall { len });
        }
        let len32 = u32::try_from(len).map_err(|_| HeapError::RegionTooLarge { len })?;

        let mut heap = BlockHeap { memory };
        if heap.memory[BRK_INDEX] == 0 {
            heap.memory[BRK_INDEX] = FIRST_BLOCK as u8;
            heap.write_header(&Block {
                offset: FIRST_BLOCK,
                used: false,
                size: len32 - FIRST_BLOCK - HEADER_SIZE,
                next: NULL,
            });
            trace!(len, "initialized block heap");
        }
        Ok(heap)
    }

    /// Allocates `size` bytes and returns the offset of the region, or
    /// [`NULL`] when `size` is zero or no free block fits.
    pub fn malloc(&mut self, size: u32) -> u32 {
        if size == 0 {
            trace!("malloc(0) -> null");
            return NULL;
        }
        let block = match self.find_block(size) {
            Some(block) => block,
            None => {
                trace!(size, "malloc -> null");
                return NULL;
            }
        };

        if block.size == size {
            self.write_header(&Block { used: true, ..block });
        } else {
            // find_block guarantees room for a header plus MIN_BLOCK_SIZE.
            let split = block.offset + HEADER_SIZE + size;
            self.write_header(&Block {
                offset: split,
                used: false,
                size: block.size - (size + HEADER_SIZE),
                next: block.next,
            });
            self.write_header(&Block {
                offset: block.offset,
                used: true,
                size,
                next: split,
            });
        }
        trace!(size, "malloc -> {:#010x}", block.region());
        block.region()
    }

    /// Marks the block owning `ptr` as free. Null is ignored.
    pub fn free(&mut self, ptr: u32) {
        if ptr == NULL {
            return;
        }
        trace!("free({:#010x})", ptr);
        let header = match ptr.checked_sub(HEADER_SIZE) {
            Some(h) if h >= FIRST_BLOCK && (ptr as usize) <= self.memory.len() => h as usize,
            _ => {
                warn!("free({:#010x}): not a block region", ptr);
                return;
            }
        };
        self.memory[header] &= !FLAG_USED;
    }

    /// Decodes the header at `offset`, if the header and the block it
    /// describes both fit inside the region.
    pub fn block_at(&self, offset: u32) -> Option<Block> {
        let start = offset as usize;
        if offset == NULL || start + HEADER_SIZE as usize > self.memory.len() {
            return None;
        }
        let block = Block {
            offset,
            used: self.memory[start] & FLAG_USED != 0,
            size: self.read_u32(start + SIZE_INDEX),
            next: self.read_u32(start + NEXT_INDEX),
        };
        if block.region() as u64 + block.size as u64 > self.memory.len() as u64 {
            return None;
        }
        Some(block)
    }

    /// Walks the block chain from the first header.
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks {
            heap: self,
            next: FIRST_BLOCK,
            remaining: self.max_blocks(),
        }
    }

    /// The caller-visible bytes of a live allocation.
    pub fn bytes_mut(&mut self, handle: NonZeroU32) -> Option<&mut [u8]> {
        let block = self.block_at(handle.get().checked_sub(HEADER_SIZE)?)?;
        if !block.used {
            return None;
        }
        let start = block.region() as usize;
        self.memory.get_mut(start..start + block.size as usize)
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    fn find_block(&self, size: u32) -> Option<Block> {
        let split_min = size as u64 + HEADER_SIZE as u64 + MIN_BLOCK_SIZE as u64;
        self.blocks()
            .find(|b| !b.used && (b.size == size || b.size as u64 >= split_min))
    }

    /// A chain longer than this has a cycle in it.
    fn max_blocks(&self) -> usize {
        self.memory.len() / HEADER_SIZE as usize + 1
    }

    fn write_header(&mut self, block: &Block) {
        let start = block.offset as usize;
        self.memory[start] = if block.used { FLAG_USED } else { 0 };
        self.memory[start + SIZE_INDEX..start + SIZE_INDEX + 4]
            .copy_from_slice(&block.size.to_be_bytes());
        self.memory[start + NEXT_INDEX..start + NEXT_INDEX + 4]
            .copy_from_slice(&block.next.to_be_bytes());
    }

    fn read_u32(&self, at: usize) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.memory[at..at + 4]);
        u32::from_be_bytes(bytes)
    }
}

pub struct Blocks<'h> {
    heap: &'h BlockHeap<'h>,
    next: u32,
    remaining: usize,
}

impl Iterator for Blocks<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let block = self.heap.block_at(self.next)?;
        self.next = block.next;
        Some(block)
    }
}

impl RawAllocator for BlockHeap<'_> {
    type Handle = NonZeroU32;

    fn allocate(&mut self, size: usize) -> Option<NonZeroU32> {
        NonZeroU32::new(self.malloc(u32::try_from(size).ok()?))
    }

    unsafe fn release(&mut self, handle: NonZeroU32) {
        self.free(handle.get());
    }
}
