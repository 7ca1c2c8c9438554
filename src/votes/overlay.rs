//! Pending votes: writes this process accepted but has not yet seen come back
//! from the Votes sheet.
//!
//! Tallies shown to callers are the confirmed snapshot plus this overlay. They
//! can drift from the stored aggregate when an optimistic write never lands;
//! the next read that contains the vote prunes it from here.

use std::collections::HashSet;

use super::guard::VoteKey;
use crate::models::Vote;

#[derive(Debug, Default)]
pub struct PendingVotes {
    votes: Vec<Vote>,
}

impl PendingVotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, vote: Vote) {
        let key = VoteKey::of(&vote);
        if !self.contains(&key) {
            self.votes.push(vote);
        }
    }

    pub fn contains(&self, key: &VoteKey) -> bool {
        self.votes.iter().any(|vote| key.matches(vote))
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    /// Drop pending votes that the confirmed snapshot now contains and return
    /// the snapshot with the remaining pending votes appended.
    pub fn merge(&mut self, confirmed: Vec<Vote>) -> Vec<Vote> {
        let seen: HashSet<VoteKey> = confirmed.iter().map(VoteKey::of).collect();

        let before = self.votes.len();
        self.votes.retain(|vote| !seen.contains(&VoteKey::of(vote)));
        if self.votes.len() != before {
            tracing::debug!(
                "{} pending vote(s) confirmed by the votes sheet",
                before - self.votes.len()
            );
        }

        let mut merged = confirmed;
        merged.extend(self.votes.iter().cloned());
        merged
    }
}
