//! Active-Challenge Guard
//!
//! Single-slot mutual exclusion over the challenge UI. The slot keeps the
//! running transaction and its status receiver alive until the challenge
//! ends. All operations go through one mutex; a poisoned lock is recovered
//! because the slot is always left in a consistent state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::engine::ChallengeStatusReceiver;

struct ActiveChallenge<T> {
    _transaction: Arc<T>,
    _receiver: ChallengeStatusReceiver,
}

/// At most one challenge at a time
pub struct ActiveChallengeGuard<T> {
    slot: Mutex<Option<ActiveChallenge<T>>>,
}

impl<T> ActiveChallengeGuard<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveChallenge<T>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Occupy the slot
    ///
    /// ## Returns
    /// * `true` - The slot was empty and now holds this challenge
    /// * `false` - Another challenge is active; nothing changed
    pub fn try_acquire(&self, transaction: Arc<T>, receiver: ChallengeStatusReceiver) -> bool {
        let mut slot = self.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(ActiveChallenge {
            _transaction: transaction,
            _receiver: receiver,
        });
        true
    }

    /// Clear the slot. Idempotent; returns whether something was cleared.
    pub fn release(&self) -> bool {
        self.lock().take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }
}

impl<T> Default for ActiveChallengeGuard<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases an acquired slot exactly once, on drop at the latest
pub struct ChallengeLease<'a, T> {
    guard: &'a ActiveChallengeGuard<T>,
    released: bool,
}

impl<'a, T> ChallengeLease<'a, T> {
    /// Acquire the slot, returning a lease on success
    pub fn acquire(
        guard: &'a ActiveChallengeGuard<T>,
        transaction: Arc<T>,
        receiver: ChallengeStatusReceiver,
    ) -> Option<Self> {
        guard.try_acquire(transaction, receiver).then(|| Self {
            guard,
            released: false,
        })
    }

    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.guard.release();
        }
    }
}

impl<T> Drop for ChallengeLease<'_, T> {
    fn drop(&mut self) {
        self.release_once();
    }
}
