//! Random draw order for teams.

use rand::seq::SliceRandom;
use rand::Rng;

/// Uniformly random permutation of `items` (Fisher-Yates). The input is left as is.
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut rand::thread_rng())
}

/// Same as [`shuffle`] with a caller-supplied generator.
pub fn shuffle_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}
