use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Positions and beaching flags of every particle at one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub beached: Vec<bool>,
}

impl ParticleSnapshot {
    pub fn len(&self) -> usize {
        self.lat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }
}

/// How many per-step snapshots an ensemble keeps.
///
/// The initial state and the most recent step are always kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryRetention {
    /// Every step.
    #[default]
    Full,
    /// Every k-th step.
    Stride(usize),
    /// The last k steps (plus the initial state).
    Window(usize),
}

/// Step-indexed snapshot store, ordered by step.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryHistory {
    retention: HistoryRetention,
    entries: VecDeque<(usize, ParticleSnapshot)>,
}

impl TrajectoryHistory {
    pub fn new(retention: HistoryRetention, initial: ParticleSnapshot) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back((0, initial));
        Self { retention, entries }
    }

    pub fn retention(&self) -> HistoryRetention {
        self.retention
    }

    /// Append the snapshot for `step`, dropping whatever the policy no
    /// longer retains.
    pub fn record(&mut self, step: usize, snapshot: ParticleSnapshot) {
        match self.retention {
            HistoryRetention::Full => {}
            HistoryRetention::Stride(k) => {
                let k = k.max(1);
                // The previous tail was only kept as "latest"; drop it unless
                // it falls on the stride.
                if let Some(&(last, _)) = self.entries.back() {
                    if last != 0 && last % k != 0 {
                        self.entries.pop_back();
                    }
                }
            }
            HistoryRetention::Window(k) => {
                let k = k.max(1);
                // Entry 0 is pinned; the window covers the entries after it.
                while self.entries.len() > k {
                    self.entries.remove(1);
                }
            }
        }
        self.entries.push_back((step, snapshot));
    }

    pub fn get(&self, step: usize) -> Option<&ParticleSnapshot> {
        if self.retention == HistoryRetention::Full {
            return self.entries.get(step).map(|(_, s)| s);
        }
        self.entries
            .binary_search_by_key(&step, |(s, _)| *s)
            .ok()
            .map(|i| &self.entries[i].1)
    }

    pub fn latest(&self) -> Option<&ParticleSnapshot> {
        self.entries.back().map(|(_, s)| s)
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retained `(step, snapshot)` pairs in step order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ParticleSnapshot)> {
        self.entries.iter().map(|(step, s)| (*step, s))
    }

    /// Steps that currently have a snapshot.
    pub fn retained_steps(&self) -> Vec<usize> {
        self.entries.iter().map(|(step, _)| *step).collect()
    }
}
