//! Chrome controller
//!
//! The pipeline entry point. The scroll container pushes raw offsets in;
//! approved [`ChromeState`] snapshots come out. Data flows one way:
//!
//! ```text
//! offset ──► assemble ──► ChromeState ──► ChangeDetector ──► publish
//! ```
//!
//! Nothing downstream reads scroll position from shared state; the offset
//! is an explicit argument, and the compositor only ever sees published
//! snapshots. Samples are processed synchronously in delivery order on the
//! UI thread (`&mut self`, no locking). Each sample is O(number of
//! channels), so no buffering or throttling is needed; bursts may be
//! coalesced to the final sample without correctness loss because assembly
//! is memory-less per sample.
//!
//! # Example
//!
//! ```rust
//! use veil_core::prelude::*;
//!
//! let mut controller = ChromeController::new(ChannelTable::profile_screen());
//!
//! let published = controller.push(-130.0).expect("first sample publishes");
//! assert!(published.state.title_visible);
//! ```

use rustc_hash::FxHashMap;
use tracing::{trace, warn};

use crate::channel::{ChannelName, ChannelTable};
use crate::detect::{ChangeDetector, Decision};
use crate::state::{assemble, ChromeState};

// ============================================================================
// Sink Boundary
// ============================================================================

/// Where approved snapshots go
///
/// The rendering layer implements this; it receives the snapshot plus the
/// decision that approved it, and must not read the raw scroll offset.
pub trait ChromeSink {
    fn publish(&mut self, state: &ChromeState, decision: &Decision);
}

/// An approved publication
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub state: ChromeState,
    pub decision: Decision,
}

// ============================================================================
// Chrome Controller
// ============================================================================

/// Turns a stream of scroll offsets into a stream of chrome snapshots
#[derive(Debug, Clone)]
pub struct ChromeController {
    table: ChannelTable,
    detector: ChangeDetector,
    last_good: FxHashMap<ChannelName, f32>,
    sequence: u64,
}

impl ChromeController {
    /// Create a controller for a screen's channel table
    pub fn new(table: ChannelTable) -> Self {
        Self {
            table,
            detector: ChangeDetector::new(),
            last_good: FxHashMap::default(),
            sequence: 0,
        }
    }

    /// The table this controller was configured with
    pub fn table(&self) -> &ChannelTable {
        &self.table
    }

    /// The last published snapshot, if any
    pub fn latest(&self) -> Option<&ChromeState> {
        self.detector.previous()
    }

    /// Process one scroll sample
    ///
    /// Returns the publication if the change detector approved it. A
    /// non-finite offset is a no-op: the last valid snapshot stands.
    pub fn push(&mut self, offset: f32) -> Option<Published> {
        if !offset.is_finite() {
            warn!(offset, "ignoring non-finite scroll offset");
            return None;
        }

        let mut state = assemble(offset, &self.table, &self.last_good);
        for (name, value) in state.iter() {
            self.last_good.insert(name, value);
        }

        let decision = self.detector.decide(&self.table, &state);
        if !decision.publish {
            trace!(offset, "sample suppressed, no channel moved beyond epsilon");
            return None;
        }

        self.sequence += 1;
        state.sequence = self.sequence;
        trace!(
            offset,
            sequence = self.sequence,
            changed = decision.changed.len(),
            "publishing chrome state"
        );

        self.detector.commit(state.clone());
        Some(Published { state, decision })
    }

    /// Process a burst of samples, keeping only the final one
    ///
    /// When the source emits faster than one sample per frame only the
    /// latest matters; intermediate samples carry no state of their own.
    pub fn push_coalesced(&mut self, samples: &[f32]) -> Option<Published> {
        let last = samples.iter().rev().find(|s| s.is_finite())?;
        self.push(*last)
    }

    /// Process one sample and forward any publication to `sink`
    pub fn drive<S: ChromeSink>(&mut self, offset: f32, sink: &mut S) {
        if let Some(published) = self.push(offset) {
            sink.publish(&published.state, &published.decision);
        }
    }
}
