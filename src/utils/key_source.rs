//! Random short key sampling.
//!
//! Sampling is separated from the uniqueness check so the generator can be
//! driven by a scripted source in tests.

use rand::Rng;

use crate::domain::short_key::{ALPHABET, KEY_LENGTH, ShortKey};

/// A source of candidate short keys.
///
/// Candidates carry no uniqueness guarantee; see
/// [`crate::application::services::KeyGenerator`].
pub trait KeySource: Send + Sync {
    fn next_key(&self) -> ShortKey;
}

/// Draws each character uniformly from the 52-letter alphabet using the
/// thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeySource;

impl KeySource for RandomKeySource {
    fn next_key(&self) -> ShortKey {
        random_key()
    }
}

/// Generates a random short key.
///
/// Not a security token: guessing resistance is not a goal, only a uniform
/// spread over 52^5 keys.
pub fn random_key() -> ShortKey {
    let mut rng = rand::rng();
    let mut indices = [0usize; KEY_LENGTH];
    for slot in indices.iter_mut() {
        *slot = rng.random_range(0..ALPHABET.len());
    }
    ShortKey::from_indices(indices)
}
