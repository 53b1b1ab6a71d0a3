// ATS engine: pure, synchronous scoring and section-gap detection.
// No I/O and no shared state; safe to call from any thread.

pub mod gaps;
pub mod scoring;
