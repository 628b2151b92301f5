//! Stage registry and sequencer - which stage is active, and moving between them.
//!
//! The sequencer only tracks the index. Re-initializing the newly active
//! stage is the engine's job, triggered by a `true` return from any of the
//! transition methods.

use serde::{Deserialize, Serialize};

use crate::catalog::{StageCatalog, StageInfo};
use crate::stages::{Stage, StageId};

/// A stage model paired with its display text
pub struct StageEntry {
    pub info: StageInfo,
    pub model: Box<dyn Stage>,
}

/// Navigation request from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Advance,
    Retreat,
    JumpTo(usize),
}

/// Ordered stage list plus the current index
pub struct Sequencer {
    entries: Vec<StageEntry>,
    current: usize,
}

impl Sequencer {
    /// Build the registry from a validated catalog, starting at the first stage
    pub fn new(catalog: StageCatalog) -> Self {
        let entries = catalog
            .into_entries()
            .into_iter()
            .map(|info| StageEntry {
                model: info.id.model(),
                info,
            })
            .collect();
        Self { entries, current: 0 }
    }

    /// Move to the next stage. No-op on the last stage.
    pub fn advance(&mut self) -> bool {
        self.jump_to(self.current + 1)
    }

    /// Move to the previous stage. No-op on the first stage.
    pub fn retreat(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.jump_to(index),
            None => false,
        }
    }

    /// Jump straight to `index`. Out-of-range requests are ignored.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            log::warn!("Ignoring jump to stage {} of {}", index, self.entries.len());
            return false;
        }
        if index == self.current {
            return false;
        }
        self.current = index;
        true
    }

    pub fn apply(&mut self, transition: Transition) -> bool {
        match transition {
            Transition::Advance => self.advance(),
            Transition::Retreat => self.retreat(),
            Transition::JumpTo(index) => self.jump_to(index),
        }
    }

    pub fn current(&self) -> &StageEntry {
        &self.entries[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_id(&self) -> StageId {
        self.current().info.id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.entries.len()
    }

    pub fn info(&self, index: usize) -> Option<&StageInfo> {
        self.entries.get(index).map(|e| &e.info)
    }

    pub fn infos(&self) -> impl Iterator<Item = &StageInfo> {
        self.entries.iter().map(|e| &e.info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Language;

    fn sequencer() -> Sequencer {
        Sequencer::new(StageCatalog::bundled(Language::English).unwrap())
    }

    #[test]
    fn test_starts_at_nebula() {
        let seq = sequencer();
        assert_eq!(seq.len(), 7);
        assert_eq!(seq.current_id(), StageId::Nebula);
        assert!(seq.is_first());
        assert!(!seq.is_last());
    }

    #[test]
    fn test_retreat_at_first_is_noop() {
        let mut seq = sequencer();
        assert!(!seq.retreat());
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn test_advance_at_last_is_noop() {
        let mut seq = sequencer();
        assert!(seq.jump_to(6));
        assert!(seq.is_last());
        assert!(!seq.advance());
        assert_eq!(seq.current_id(), StageId::WhiteDwarf);
    }

    #[test]
    fn test_out_of_range_jumps_ignored_from_any_index() {
        let mut seq = sequencer();
        for start in 0..seq.len() {
            seq.jump_to(start);
            assert!(!seq.jump_to(seq.len()));
            assert!(!seq.jump_to(usize::MAX));
            assert_eq!(seq.current_index(), start);
        }
    }

    #[test]
    fn test_models_follow_catalog() {
        let seq = sequencer();
        for (index, info) in seq.infos().enumerate() {
            assert_eq!(info.id.ordinal(), index);
            assert_eq!(seq.entries[index].model.id(), info.id);
        }
    }

    #[test]
    fn test_apply_transitions() {
        let mut seq = sequencer();
        assert!(seq.apply(Transition::Advance));
        assert!(seq.apply(Transition::JumpTo(4)));
        assert_eq!(seq.current_id(), StageId::RedGiant);
        assert!(seq.apply(Transition::Retreat));
        assert_eq!(seq.current_id(), StageId::MainSequence);
        assert!(!seq.apply(Transition::JumpTo(3)));
    }
}
