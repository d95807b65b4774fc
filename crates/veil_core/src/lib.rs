//! Veil Core
//!
//! The scroll-driven chrome pipeline: a pure mapping from a vertical scroll
//! offset to a coherent set of navigation-overlay outputs (title reveal,
//! background/blur fade-in, avatar shrink, sticky-segment takeover), plus
//! the policy for when a new snapshot is worth publishing.
//!
//! # Pipeline
//!
//! ```text
//! Scroll source ─► ChromeController::push(offset)
//!                    ├─ evaluate each ChannelConfig   (threshold bands)
//!                    ├─ assemble ChromeState          (scalars + booleans)
//!                    └─ ChangeDetector                (epsilon filtering)
//!                         └─► ChromeSink::publish     (rendering layer)
//! ```
//!
//! Offsets use the convention "more negative = scrolled further from the
//! top". Every numeric path is guarded: non-finite offsets fall back to the
//! last valid snapshot, degenerate bands disable their channel, and results
//! are clamped into their configured output range. The worst failure mode
//! is "chrome briefly does not update", never NaN styling.
//!
//! # Example
//!
//! ```rust
//! use veil_core::prelude::*;
//!
//! let mut controller = ChromeController::new(ChannelTable::profile_screen());
//!
//! // Top of content: nothing revealed yet
//! let published = controller.push(0.0).unwrap();
//! assert!(!published.state.title_visible);
//!
//! // Header scrolled away: title on, background fading in
//! let published = controller.push(-130.0).unwrap();
//! assert!(published.state.title_visible);
//! ```

pub mod channel;
pub mod controller;
pub mod detect;
pub mod evaluate;
pub mod state;

pub use channel::{
    channels, ChannelConfig, ChannelConfigError, ChannelName, ChannelTable, ChannelTableBuilder,
    DEFAULT_EPSILON,
};
pub use controller::{ChromeController, ChromeSink, Published};
pub use detect::{ChangeDetector, ChangedChannels, Decision};
pub use evaluate::{clamp01, evaluate, fill_width, guarded_ratio};
pub use state::{assemble, ChromeState};

/// Common imports for screens wiring up chrome
pub mod prelude {
    pub use crate::channel::{channels, ChannelConfig, ChannelName, ChannelTable};
    pub use crate::controller::{ChromeController, ChromeSink, Published};
    pub use crate::detect::Decision;
    pub use crate::state::ChromeState;
}
