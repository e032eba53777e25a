//! Roster queue of external voter ids.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Voter id issued by the voter registry. Opaque here: never a foreign key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(pub i32);

/// Roster consumed front to back. The caller's order decides which table
/// each voter lands on and who becomes chair; nothing here reorders it.
#[derive(Debug, Default)]
pub struct RosterQueue {
    queue: VecDeque<VoterId>,
}

impl RosterQueue {
    pub fn new(voters: Vec<VoterId>) -> Self {
        Self {
            queue: voters.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Dequeue up to `n` voters; fewer are returned once the roster runs dry
    pub fn take(&mut self, n: usize) -> Vec<VoterId> {
        let n = n.min(self.queue.len());
        self.queue.drain(..n).collect()
    }
}

impl From<Vec<VoterId>> for RosterQueue {
    fn from(voters: Vec<VoterId>) -> Self {
        Self::new(voters)
    }
}
