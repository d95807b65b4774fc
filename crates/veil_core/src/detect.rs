//! Change detection
//!
//! Compares a freshly assembled snapshot against the last published one and
//! decides whether it is worth publishing at all. Continuous channels are
//! compared with a per-channel epsilon so sub-pixel scroll jitter does not
//! cause redundant renders; boolean flips always count.
//!
//! Publishing is a filtering decision, not a scheduling one: every sample
//! is processed in order, some just produce no publication.

use smallvec::SmallVec;

use crate::channel::{ChannelName, ChannelTable};
use crate::state::ChromeState;

/// Channels that changed in one decision; sized for typical screens
pub type ChangedChannels = SmallVec<[ChannelName; 8]>;

// ============================================================================
// Decision
// ============================================================================

/// Outcome of comparing a new snapshot to the previously published one
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// True iff at least one channel changed
    pub publish: bool,
    /// Continuous channels whose values moved beyond their epsilon
    pub changed: ChangedChannels,
    /// Title visibility flipped
    pub title_flipped: bool,
    /// Sticky overlay visibility flipped
    pub sticky_flipped: bool,
}

impl Decision {
    /// A decision that publishes everything (first sample)
    fn initial(table: &ChannelTable, next: &ChromeState) -> Self {
        Self {
            publish: true,
            changed: table.iter().map(|c| c.name).collect(),
            // The overlay starts hidden, so visible booleans are flips
            title_flipped: next.title_visible,
            sticky_flipped: next.sticky_visible,
        }
    }

    /// True when nothing at all changed
    pub fn is_noop(&self) -> bool {
        !self.publish
    }
}

// ============================================================================
// Change Detector
// ============================================================================

/// Retains exactly one prior snapshot (the last published) for comparison
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    previous: Option<ChromeState>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last published snapshot, if any
    pub fn previous(&self) -> Option<&ChromeState> {
        self.previous.as_ref()
    }

    /// Compare `next` against the last published snapshot
    ///
    /// With no prior snapshot the decision is always to publish, with every
    /// channel marked changed.
    pub fn decide(&self, table: &ChannelTable, next: &ChromeState) -> Decision {
        let previous = match &self.previous {
            Some(previous) => previous,
            None => return Decision::initial(table, next),
        };

        let mut changed = ChangedChannels::new();
        for config in table.iter() {
            let old = previous.value_or(config.name, config.output.0);
            let new = next.value_or(config.name, config.output.0);
            if (new - old).abs() > config.epsilon {
                changed.push(config.name);
            }
        }

        let title_flipped = next.title_visible != previous.title_visible;
        let sticky_flipped = next.sticky_visible != previous.sticky_visible;

        Decision {
            publish: !changed.is_empty() || title_flipped || sticky_flipped,
            changed,
            title_flipped,
            sticky_flipped,
        }
    }

    /// Record `state` as the newly published snapshot
    pub fn commit(&mut self, state: ChromeState) {
        self.previous = Some(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{channels, ChannelTable};
    use crate::state::assemble;
    use rustc_hash::FxHashMap;

    fn snapshot(offset: f32, table: &ChannelTable) -> ChromeState {
        assemble(offset, table, &FxHashMap::default())
    }

    #[test]
    fn test_first_sample_always_publishes() {
        let table = ChannelTable::profile_screen();
        let detector = ChangeDetector::new();
        let decision = detector.decide(&table, &snapshot(0.0, &table));

        assert!(decision.publish);
        assert_eq!(decision.changed.len(), table.len());
        assert!(!decision.title_flipped);
        assert!(!decision.sticky_flipped);
    }

    #[test]
    fn test_first_sample_flags_visible_booleans() {
        let table = ChannelTable::profile_screen();
        let detector = ChangeDetector::new();
        let decision = detector.decide(&table, &snapshot(-300.0, &table));

        assert!(decision.title_flipped);
        assert!(decision.sticky_flipped);
    }

    #[test]
    fn test_jitter_below_epsilon_is_suppressed() {
        let table = ChannelTable::profile_screen();
        let mut detector = ChangeDetector::new();
        detector.commit(snapshot(-130.0, &table));

        // 0.3 units of offset moves background by 0.3/70 ≈ 0.004 < 0.01
        let decision = detector.decide(&table, &snapshot(-130.3, &table));
        assert!(decision.is_noop());
        assert!(decision.changed.is_empty());
    }

    #[test]
    fn test_movement_beyond_epsilon_publishes() {
        let table = ChannelTable::profile_screen();
        let mut detector = ChangeDetector::new();
        detector.commit(snapshot(-130.0, &table));

        let decision = detector.decide(&table, &snapshot(-140.0, &table));
        assert!(decision.publish);
        assert!(decision.changed.contains(&channels::BACKGROUND_OPACITY));
        assert!(!decision.title_flipped);
    }

    #[test]
    fn test_boolean_flip_always_publishes() {
        let table = ChannelTable::profile_screen();
        let mut detector = ChangeDetector::new();
        detector.commit(snapshot(-199.9, &table));

        // Continuous channels barely move but the sticky cutoff is crossed
        let decision = detector.decide(&table, &snapshot(-200.1, &table));
        assert!(decision.publish);
        assert!(decision.sticky_flipped);
    }

    #[test]
    fn test_identical_snapshot_is_noop() {
        let table = ChannelTable::profile_screen();
        let mut detector = ChangeDetector::new();
        detector.commit(snapshot(-130.0, &table));

        let decision = detector.decide(&table, &snapshot(-130.0, &table));
        assert!(decision.is_noop());
    }
}
