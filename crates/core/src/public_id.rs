//! Opaque share-token generation.
//!
//! A project's `public_id` is the only key usable without an owner match,
//! so it must not be guessable or derivable from the project id. Tokens are
//! drawn from the thread-local CSPRNG over the full alphanumeric alphabet
//! (62 symbols), 24 characters -- ~143 bits, collisions negligible at any
//! realistic project count.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of a generated share token in characters.
pub const PUBLIC_ID_LEN: usize = 24;

/// Generate a fresh share token.
pub fn generate() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(PUBLIC_ID_LEN)
        .map(char::from)
        .collect()
}
