// Shared with build.rs through include!, so no inner attributes here.

/// Heap size: one 240x240 RGB565 framebuffer plus slack
pub const HEAP_SIZE: usize = 120 * 1024;

/// Heap kept free for allocator bookkeeping
pub const HEAP_SLACK: usize = 4 * 1024;

/// Whether an RGB565 framebuffer of `pixels` pixels fits the heap
pub const fn framebuffer_fits(pixels: usize) -> bool {
    pixels.saturating_mul(2) <= HEAP_SIZE - HEAP_SLACK
}
