// src/evaluator/gate.rs

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Admits at most one in-flight submission per user.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGate {
    active: Arc<Mutex<HashSet<i64>>>,
}

/// Holds the user's slot until dropped.
#[derive(Debug)]
pub struct GateGuard {
    active: Arc<Mutex<HashSet<i64>>>,
    user_id: i64,
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another submission of the same user is being evaluated.
    pub fn try_acquire(&self, user_id: i64) -> Option<GateGuard> {
        if !lock(&self.active).insert(user_id) {
            return None;
        }
        Some(GateGuard {
            active: Arc::clone(&self.active),
            user_id,
        })
    }
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        lock(&self.active).remove(&self.user_id);
    }
}

// The set stays consistent even if a holder panicked, so poisoning is ignored.
fn lock(active: &Mutex<HashSet<i64>>) -> MutexGuard<'_, HashSet<i64>> {
    active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::SubmissionGate;

    #[test]
    fn second_acquire_for_same_user_is_refused_until_release() {
        let gate = SubmissionGate::new();

        let first = gate.try_acquire(7).expect("first submission admitted");
        assert!(gate.try_acquire(7).is_none());
        assert!(gate.try_acquire(8).is_some(), "other users are unaffected");

        drop(first);
        assert!(gate.try_acquire(7).is_some());
    }
}
