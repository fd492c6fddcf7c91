//! Majority voting over neighbour labels.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy)]
struct Tally {
    count: usize,
    first_rank: usize, // position of the first vote for this label
}

/// Label -> vote count for a single classification.
///
/// The winner is the label with the most votes. Ties go to the label that received
/// its first vote earliest, so feeding neighbours nearest first makes the closest
/// tied label win regardless of hash-map iteration order.
#[derive(Debug, Clone)]
pub struct VoteTally<L> {
    tallies: HashMap<L, Tally>,
    votes: usize,
}

impl<L: Eq + Hash> VoteTally<L> {
    pub fn new() -> Self {
        VoteTally { tallies: HashMap::new(), votes: 0 }
    }

    pub fn record(&mut self, label: L) {
        let rank = self.votes;
        let tally = self.tallies.entry(label).or_insert(Tally { count: 0, first_rank: rank });
        tally.count += 1;
        self.votes += 1;
    }

    #[cfg(test)]
    fn count(&self, label: &L) -> usize {
        self.tallies.get(label).map_or(0, |t| t.count)
    }

    /// Total number of votes recorded.
    #[cfg(test)]
    fn votes(&self) -> usize {
        self.votes
    }

    /// The majority label, or `None` if no vote was recorded.
    pub fn winner(self) -> Option<L> {
        self.tallies
            .into_iter()
            .max_by(|(_, a), (_, b)| a.count.cmp(&b.count).then(b.first_rank.cmp(&a.first_rank)))
            .map(|(label, _)| label)
    }
}

impl<L: Eq + Hash> Default for VoteTally<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Eq + Hash> FromIterator<L> for VoteTally<L> {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        let mut tally = VoteTally::new();
        for label in iter {
            tally.record(label);
        }
        tally
    }
}
