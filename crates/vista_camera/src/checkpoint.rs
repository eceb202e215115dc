//! Checkpoint gating
//!
//! A checkpoint holds forward scrolling at a progress threshold until the
//! character it names has been talked to. Once passed, a checkpoint stays
//! passed for the rest of the session.

use crate::config::{validate_checkpoints, CheckpointConfig};
use crate::error::Result;
use smallvec::SmallVec;
use tracing::debug;

/// A single progress gate
#[derive(Clone, Debug, PartialEq)]
pub struct Checkpoint {
    pub progress: f32,
    pub character: String,
    passed: bool,
}

impl Checkpoint {
    pub fn is_passed(&self) -> bool {
        self.passed
    }
}

/// Ordered set of checkpoints, ascending by progress
#[derive(Clone, Debug, Default)]
pub struct Checkpoints {
    entries: SmallVec<[Checkpoint; 4]>,
}

impl Checkpoints {
    pub fn new(configs: &[CheckpointConfig]) -> Result<Self> {
        validate_checkpoints(configs)?;
        Ok(Self {
            entries: configs
                .iter()
                .map(|c| Checkpoint {
                    progress: c.progress,
                    character: c.character.clone(),
                    passed: false,
                })
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.entries.iter()
    }

    /// Index and threshold of the lowest checkpoint not yet passed
    pub fn next_locked(&self) -> Option<(usize, f32)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, c)| !c.passed)
            .map(|(i, c)| (i, c.progress))
    }

    pub fn is_passed(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(|c| c.passed)
    }

    pub fn all_passed(&self) -> bool {
        self.entries.iter().all(|c| c.passed)
    }

    /// Whether `character` gates any checkpoint still locked
    pub fn gates(&self, character: &str) -> bool {
        self.entries
            .iter()
            .any(|c| !c.passed && c.character == character)
    }

    /// Mark checkpoint `index` passed. Returns true only on the first call.
    pub fn unlock(&mut self, index: usize) -> bool {
        match self.entries.get_mut(index) {
            Some(checkpoint) if !checkpoint.passed => {
                checkpoint.passed = true;
                debug!(
                    "checkpoint {} at {} unlocked by {}",
                    index, checkpoint.progress, checkpoint.character
                );
                true
            }
            _ => false,
        }
    }

    /// Unlock every locked checkpoint gated by `character`
    ///
    /// Returns the indices that changed, ascending.
    pub fn unlock_character(&mut self, character: &str) -> SmallVec<[usize; 4]> {
        let locked: SmallVec<[usize; 4]> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.passed && c.character == character)
            .map(|(i, _)| i)
            .collect();

        for &index in &locked {
            self.unlock(index);
        }
        locked
    }
}
