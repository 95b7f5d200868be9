/// Seedable xorshift128 stream used for per-strip deviations.
pub mod xorshift;
