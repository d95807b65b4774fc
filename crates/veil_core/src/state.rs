//! Chrome state snapshot
//!
//! The aggregate output of one scroll sample: one scalar per configured
//! channel plus the two derived visibility booleans. A snapshot is a pure
//! function of `(offset, table, last-good values)` and has no identity
//! beyond the values it carries; it is recomputed per sample, never mutated
//! in place.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::channel::{ChannelName, ChannelTable};
use crate::evaluate::evaluate;

// ============================================================================
// Chrome State
// ============================================================================

/// One sample's worth of chrome outputs
///
/// Equality compares channel values and booleans; `sequence` is stamped by
/// the controller at publish time and is for debugging/ordering only.
#[derive(Debug, Clone)]
pub struct ChromeState {
    values: IndexMap<ChannelName, f32>,
    /// Centered navigation title visibility
    pub title_visible: bool,
    /// Sticky segment/tab-strip takeover
    pub sticky_visible: bool,
    /// Publish ordering stamp, 0 until published
    pub sequence: u64,
}

impl ChromeState {
    /// Value of a channel in this snapshot
    pub fn value(&self, name: ChannelName) -> Option<f32> {
        self.values.get(&name).copied()
    }

    /// Value of a channel, or a default when the channel is not configured
    pub fn value_or(&self, name: ChannelName, default: f32) -> f32 {
        self.value(name).unwrap_or(default)
    }

    /// Iterate `(name, value)` pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (ChannelName, f32)> + '_ {
        self.values.iter().map(|(name, value)| (*name, *value))
    }

    /// Number of channel values carried
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no channels were configured
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for ChromeState {
    fn eq(&self, other: &Self) -> bool {
        // Sequence is excluded: two snapshots with identical outputs are
        // the same state regardless of when they were published.
        self.values == other.values
            && self.title_visible == other.title_visible
            && self.sticky_visible == other.sticky_visible
    }
}

// ============================================================================
// Assembly
// ============================================================================

/// Assemble a snapshot for one scroll sample
///
/// Iterates the table in order, evaluating each channel with its last
/// known-good value as the fallback, then derives the booleans:
///
/// - `title_visible` uses the dedicated title cutoff, which deliberately
///   lags the background-fade band.
/// - `sticky_visible` uses the sticky cutoff (explicit, or the most
///   negative configured edge).
///
/// Idempotent: identical inputs yield identical output, with `sequence`
/// left at 0 for the controller to stamp.
pub fn assemble(
    offset: f32,
    table: &ChannelTable,
    last_good: &FxHashMap<ChannelName, f32>,
) -> ChromeState {
    let mut values = IndexMap::with_capacity(table.len());
    for config in table.iter() {
        let fallback = last_good
            .get(&config.name)
            .copied()
            .unwrap_or(config.output.0);
        values.insert(config.name, evaluate(offset, config, fallback));
    }

    ChromeState {
        values,
        title_visible: offset <= table.title_cutoff(),
        sticky_visible: offset <= table.sticky_cutoff(),
        sequence: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::channels;

    fn no_history() -> FxHashMap<ChannelName, f32> {
        FxHashMap::default()
    }

    #[test]
    fn test_assemble_at_top() {
        // Scenario: offset 0 at top of content
        let table = ChannelTable::profile_screen();
        let state = assemble(0.0, &table, &no_history());

        assert!(!state.title_visible);
        assert!(!state.sticky_visible);
        assert_eq!(state.value_or(channels::BACKGROUND_OPACITY, -1.0), 0.0);
        assert_eq!(state.value_or(channels::AVATAR_SCALE, -1.0), 1.0);
        assert_eq!(state.sequence, 0);
    }

    #[test]
    fn test_assemble_past_title_cutoff() {
        // Scenario: offset -130, title cutoff -120, background band [-80, -150]
        let table = ChannelTable::profile_screen();
        let state = assemble(-130.0, &table, &no_history());

        assert!(state.title_visible);
        assert!(!state.sticky_visible);
        let bg = state.value_or(channels::BACKGROUND_OPACITY, -1.0);
        assert!((bg - 50.0 / 70.0).abs() < 1e-6);
    }

    #[test]
    fn test_assemble_past_sticky_cutoff() {
        // Scenario: offset -300 with sticky cutoff -200
        let table = ChannelTable::profile_screen();
        let state = assemble(-300.0, &table, &no_history());

        assert!(state.title_visible);
        assert!(state.sticky_visible);
        assert_eq!(state.value_or(channels::BACKGROUND_OPACITY, -1.0), 1.0);
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let table = ChannelTable::profile_screen();
        let history = no_history();
        let a = assemble(-137.5, &table, &history);
        let b = assemble(-137.5, &table, &history);
        assert_eq!(a, b);
        for ((na, va), (nb, vb)) in a.iter().zip(b.iter()) {
            assert_eq!(na, nb);
            assert_eq!(va.to_bits(), vb.to_bits());
        }
    }

    #[test]
    fn test_assemble_uses_fallback_for_non_finite_offset() {
        let table = ChannelTable::profile_screen();
        let mut history = no_history();
        history.insert(channels::BACKGROUND_OPACITY, 0.6);

        let state = assemble(f32::NAN, &table, &history);
        assert_eq!(state.value_or(channels::BACKGROUND_OPACITY, -1.0), 0.6);
        // Channels without history fall back to their low output
        assert_eq!(state.value_or(channels::BLUR_INTENSITY, -1.0), 0.0);
    }

    #[test]
    fn test_equality_ignores_sequence() {
        let table = ChannelTable::profile_screen();
        let a = assemble(-100.0, &table, &no_history());
        let mut b = assemble(-100.0, &table, &no_history());
        b.sequence = 41;
        assert_eq!(a, b);
    }

    #[test]
    fn test_title_lags_background_fade() {
        // Between -80 and -120 the background is already fading in but
        // the title has not appeared yet.
        let table = ChannelTable::profile_screen();
        let state = assemble(-100.0, &table, &no_history());
        assert!(state.value_or(channels::BACKGROUND_OPACITY, 0.0) > 0.0);
        assert!(!state.title_visible);
    }
}
