/// In-place uniform random permutation of position buffers.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Permutation source for one shuffle pass. A fixed seed reproduces the same
/// permutation; without one, fresh host entropy is drawn per call.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(value) => StdRng::seed_from_u64(value),
        None => StdRng::from_entropy(),
    }
}

/// Fisher-Yates shuffle: each prefix position swaps with a uniformly chosen
/// index at or after it. O(n), no allocation beyond the swaps.
pub fn shuffle_in_place<T>(buffer: &mut [T], rng: &mut StdRng) {
    let n = buffer.len();
    if n < 2 {
        return;
    }
    for i in 0..n - 1 {
        let r = rng.gen_range(i..n);
        buffer.swap(i, r);
    }
}
