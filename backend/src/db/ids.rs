//! Review identifier generation.
//!
//! Generators do not track what they handed out; uniqueness is decided by the
//! store's conditional insert. The trait exists so tests can script the
//! sequence of candidates, collisions included; the scripted generator is
//! only compiled for tests and under the `test-util` feature.

use rand::Rng;

use crate::api::{ReviewId, ID_ALPHABET, ID_LENGTH};

/// Source of candidate review identifiers.
///
/// # Thread Safety
/// - `Send + Sync` so one generator can serve concurrent requests
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> ReviewId;
}

/// Draw an identifier from `rng`, each symbol uniform over [`ID_ALPHABET`].
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> ReviewId {
    let id: String = (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    ReviewId(id)
}

/// Thread-local RNG backed generator used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> ReviewId {
        generate_with(&mut rand::thread_rng())
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedIdGenerator;

#[cfg(any(test, feature = "test-util"))]
mod scripted {
    use std::collections::VecDeque;

    use parking_lot::Mutex;

    use super::{IdGenerator, RandomIdGenerator};
    use crate::api::ReviewId;

    /// Hands out a fixed sequence of identifiers, then falls back to random ones.
    #[derive(Debug, Default)]
    pub struct ScriptedIdGenerator {
        script: Mutex<VecDeque<ReviewId>>,
    }

    impl ScriptedIdGenerator {
        pub fn new<I, S>(ids: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                script: Mutex::new(ids.into_iter().map(|id| ReviewId(id.into())).collect()),
            }
        }

        /// Scripted identifiers not handed out yet.
        pub fn remaining(&self) -> usize {
            self.script.lock().len()
        }
    }

    impl IdGenerator for ScriptedIdGenerator {
        fn generate(&self) -> ReviewId {
            let next = self.script.lock().pop_front();
            next.unwrap_or_else(|| RandomIdGenerator.generate())
        }
    }
}
