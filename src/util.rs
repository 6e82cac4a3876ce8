use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const JIGGLE_SPAN: f64 = 1e-6;

pub(crate) fn stable_hash(id: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    hasher.finish()
}

fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Tiny non-zero offset in `[-5e-7, 5e-7]`, fixed for a given seed.
pub(crate) fn jiggle(seed: u64) -> f64 {
    let unit = (splitmix64(seed) >> 11) as f64 / (1u64 << 53) as f64;
    let offset = (unit - 0.5) * JIGGLE_SPAN;
    if offset == 0.0 {
        JIGGLE_SPAN * 0.25
    } else {
        offset
    }
}

/// Order-sensitive seed for a pair of nodes, so `x` and `y` jitter differ.
pub(crate) fn pair_seed(a: u64, b: u64, axis: u64) -> u64 {
    a ^ b.rotate_left(23) ^ axis.wrapping_mul(0x2545_f491_4f6c_dd1d)
}
