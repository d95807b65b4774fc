//! Channel configuration
//!
//! A *channel* is one named, independently configured output of the chrome
//! controller (navigation background opacity, blur intensity, avatar scale,
//! title reveal progress). Each channel ramps from a low to a high output
//! value over a threshold band of scroll offsets.
//!
//! Offsets follow the scroll convention used throughout Veil: more negative
//! means scrolled further from the top. A band may run in either direction:
//! `start > end` ramps as the user scrolls away from the top (the common
//! case), `start < end` ramps on pull-down.
//!
//! # Example
//!
//! ```rust
//! use veil_core::channel::{ChannelConfig, ChannelTable, channels};
//!
//! let table = ChannelTable::builder()
//!     .channel(ChannelConfig::new(channels::BACKGROUND_OPACITY, -80.0, -150.0))
//!     .channel(ChannelConfig::new(channels::BLUR_INTENSITY, -100.0, -180.0).output(0.0, 0.8))
//!     .title_cutoff(-120.0)
//!     .build();
//!
//! assert_eq!(table.len(), 2);
//! ```

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::warn;

/// Default epsilon for change detection on a normalized output scale
pub const DEFAULT_EPSILON: f32 = 0.01;

// ============================================================================
// Channel Names
// ============================================================================

/// Identifier for a configured channel
///
/// Backed by a `&'static str` so tables stay cheap to copy around and
/// channel lookups are plain string comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelName(&'static str);

impl ChannelName {
    /// Create a channel name from a static string
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The underlying string
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Well-known channel names used by the navigation chrome
pub mod channels {
    use super::ChannelName;

    /// Navigation bar background fade-in
    pub const BACKGROUND_OPACITY: ChannelName = ChannelName::new("background_opacity");
    /// Frosted-glass blur behind the navigation bar
    pub const BLUR_INTENSITY: ChannelName = ChannelName::new("blur_intensity");
    /// Centered title reveal progress
    pub const TITLE_REVEAL: ChannelName = ChannelName::new("title_reveal");
    /// Header avatar shrink
    pub const AVATAR_SCALE: ChannelName = ChannelName::new("avatar_scale");
    /// Capsule background behind the floating back/action buttons
    pub const BUTTON_BACKDROP: ChannelName = ChannelName::new("button_backdrop");
}

// ============================================================================
// Channel Configuration
// ============================================================================

/// Immutable configuration for a single channel
///
/// Maps the threshold band `[start, end]` onto `[output.0, output.1]`.
/// A channel whose band is degenerate (`start == end`, or a non-finite
/// bound) is *disabled*: it always reports `output.0` and never divides
/// by the band width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelConfig {
    /// Channel identifier
    pub name: ChannelName,
    /// Offset at which the ramp begins (output is `output.0` here)
    pub start: f32,
    /// Offset at which the ramp completes (output is `output.1` here)
    pub end: f32,
    /// Output range `(low, high)` the normalized progress maps into
    pub output: (f32, f32),
    /// Minimum change on this channel worth re-publishing
    pub epsilon: f32,
}

impl ChannelConfig {
    /// Create a channel ramping over `[start, end]` into `[0, 1]`
    pub fn new(name: ChannelName, start: f32, end: f32) -> Self {
        Self {
            name,
            start,
            end,
            output: (0.0, 1.0),
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Set the output range
    pub fn output(mut self, low: f32, high: f32) -> Self {
        self.output = (low, high);
        self
    }

    /// Set the change-detection epsilon
    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// True when the band cannot produce a meaningful ramp
    ///
    /// Disabled channels always report `output.0`.
    pub fn is_disabled(&self) -> bool {
        !self.start.is_finite()
            || !self.end.is_finite()
            || !self.output.0.is_finite()
            || !self.output.1.is_finite()
            || self.start == self.end
    }

    /// The more negative edge of the threshold band
    pub fn band_min(&self) -> f32 {
        self.start.min(self.end)
    }

    /// The less negative edge of the threshold band
    pub fn band_max(&self) -> f32 {
        self.start.max(self.end)
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Strict-mode validation failures for a channel table
///
/// None of these are fatal at runtime: a table that fails validation still
/// assembles snapshots, with the offending channels disabled. `validate()`
/// exists so screens can surface misconfiguration during development.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChannelConfigError {
    /// `start == end` would divide by zero; the channel is disabled instead
    #[error("channel `{0}` has a degenerate threshold band at {1}")]
    DegenerateBand(ChannelName, f32),

    /// A threshold or output bound is NaN or infinite
    #[error("channel `{0}` has a non-finite threshold or output bound")]
    NonFiniteBound(ChannelName),

    /// The same channel name was configured twice
    #[error("channel `{0}` is configured more than once")]
    DuplicateChannel(ChannelName),

    /// A table with no channels drives nothing
    #[error("channel table is empty")]
    Empty,
}

// ============================================================================
// Channel Table
// ============================================================================

/// Per-screen table of channel configurations plus the two boolean cutoffs
///
/// Static for the life of a screen. Iteration order is insertion order so
/// snapshot assembly is deterministic.
#[derive(Debug, Clone)]
pub struct ChannelTable {
    channels: IndexMap<ChannelName, ChannelConfig>,
    title_cutoff: f32,
    sticky_cutoff: Option<f32>,
}

impl ChannelTable {
    /// Start building a table
    pub fn builder() -> ChannelTableBuilder {
        ChannelTableBuilder::default()
    }

    /// Number of configured channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True when no channels are configured
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Look up a channel's configuration
    pub fn get(&self, name: ChannelName) -> Option<&ChannelConfig> {
        self.channels.get(&name)
    }

    /// Iterate configurations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ChannelConfig> {
        self.channels.values()
    }

    /// Offset at or below which the centered title is visible
    ///
    /// Deliberately distinct from the background-fade band: the title
    /// reveal lags the background so the two never pop in together.
    pub fn title_cutoff(&self) -> f32 {
        self.title_cutoff
    }

    /// Offset at or below which the sticky overlay takes over
    ///
    /// When not set explicitly this is the most negative edge of every
    /// configured band (and the title cutoff): the sticky segment appears
    /// only after the full header has scrolled away.
    pub fn sticky_cutoff(&self) -> f32 {
        self.sticky_cutoff.unwrap_or_else(|| {
            self.channels
                .values()
                .map(|c| c.band_min())
                .fold(self.title_cutoff, f32::min)
        })
    }

    /// Strict validation for development-time feedback
    ///
    /// Runtime never needs this to succeed; degenerate channels are
    /// disabled rather than rejected.
    pub fn validate(&self) -> Result<(), ChannelConfigError> {
        if self.channels.is_empty() {
            return Err(ChannelConfigError::Empty);
        }
        for config in self.channels.values() {
            if !config.start.is_finite()
                || !config.end.is_finite()
                || !config.output.0.is_finite()
                || !config.output.1.is_finite()
            {
                return Err(ChannelConfigError::NonFiniteBound(config.name));
            }
            if config.start == config.end {
                return Err(ChannelConfigError::DegenerateBand(config.name, config.start));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Screen Presets
    // =========================================================================

    /// Chrome bands for the profile screen
    ///
    /// Banner header with avatar, title reveal lagging the background fade,
    /// sticky tab strip taking over once the header is gone.
    pub fn profile_screen() -> Self {
        Self::builder()
            .channel(ChannelConfig::new(channels::BACKGROUND_OPACITY, -80.0, -150.0))
            .channel(ChannelConfig::new(channels::BLUR_INTENSITY, -100.0, -180.0).output(0.0, 0.8))
            .channel(ChannelConfig::new(channels::AVATAR_SCALE, -50.0, -250.0).output(1.0, 0.8))
            .title_cutoff(-120.0)
            .sticky_cutoff(-200.0)
            .build()
    }

    /// Chrome bands for a detail screen
    ///
    /// Floating back/action buttons over a hero image; the capsule behind
    /// the buttons fades in slightly ahead of the bar background.
    pub fn detail_screen() -> Self {
        Self::builder()
            .channel(ChannelConfig::new(channels::BUTTON_BACKDROP, -50.0, -100.0))
            .channel(ChannelConfig::new(channels::BACKGROUND_OPACITY, -30.0, -80.0))
            .title_cutoff(-60.0)
            .build()
    }
}

/// Builder for [`ChannelTable`]
#[derive(Debug, Default)]
pub struct ChannelTableBuilder {
    channels: IndexMap<ChannelName, ChannelConfig>,
    title_cutoff: Option<f32>,
    sticky_cutoff: Option<f32>,
}

impl ChannelTableBuilder {
    /// Add a channel configuration
    ///
    /// Re-adding a name replaces the earlier configuration with a warning.
    pub fn channel(mut self, config: ChannelConfig) -> Self {
        if config.is_disabled() {
            warn!(
                channel = %config.name,
                start = config.start,
                end = config.end,
                "channel has a degenerate threshold band and will always report its low output"
            );
        }
        if self.channels.insert(config.name, config).is_some() {
            warn!(channel = %config.name, "channel configured twice, keeping the later config");
        }
        self
    }

    /// Set the title visibility cutoff (default: −120)
    pub fn title_cutoff(mut self, offset: f32) -> Self {
        self.title_cutoff = Some(offset);
        self
    }

    /// Set an explicit sticky overlay cutoff
    pub fn sticky_cutoff(mut self, offset: f32) -> Self {
        self.sticky_cutoff = Some(offset);
        self
    }

    /// Finish the table
    pub fn build(self) -> ChannelTable {
        ChannelTable {
            channels: self.channels,
            title_cutoff: self.title_cutoff.unwrap_or(-120.0),
            sticky_cutoff: self.sticky_cutoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_direction() {
        let down = ChannelConfig::new(channels::BACKGROUND_OPACITY, -80.0, -150.0);
        assert_eq!(down.band_min(), -150.0);
        assert_eq!(down.band_max(), -80.0);

        // Pull-down channel ramps the other way
        let up = ChannelConfig::new(channels::AVATAR_SCALE, 0.0, 500.0);
        assert_eq!(up.band_min(), 0.0);
        assert_eq!(up.band_max(), 500.0);
    }

    #[test]
    fn test_degenerate_band_is_disabled() {
        let config = ChannelConfig::new(channels::BLUR_INTENSITY, -100.0, -100.0);
        assert!(config.is_disabled());

        let config = ChannelConfig::new(channels::BLUR_INTENSITY, f32::NAN, -100.0);
        assert!(config.is_disabled());
    }

    #[test]
    fn test_validate_reports_degenerate_band() {
        let table = ChannelTable::builder()
            .channel(ChannelConfig::new(channels::BLUR_INTENSITY, -100.0, -100.0))
            .build();

        assert_eq!(
            table.validate(),
            Err(ChannelConfigError::DegenerateBand(
                channels::BLUR_INTENSITY,
                -100.0
            ))
        );
    }

    #[test]
    fn test_validate_empty_table() {
        let table = ChannelTable::builder().build();
        assert_eq!(table.validate(), Err(ChannelConfigError::Empty));
    }

    #[test]
    fn test_sticky_cutoff_derived_from_bands() {
        let table = ChannelTable::builder()
            .channel(ChannelConfig::new(channels::BACKGROUND_OPACITY, -80.0, -150.0))
            .channel(ChannelConfig::new(channels::BLUR_INTENSITY, -100.0, -180.0))
            .title_cutoff(-120.0)
            .build();

        // Most negative band edge wins
        assert_eq!(table.sticky_cutoff(), -180.0);
    }

    #[test]
    fn test_sticky_cutoff_explicit_override() {
        let table = ChannelTable::profile_screen();
        assert_eq!(table.sticky_cutoff(), -200.0);
        assert_eq!(table.title_cutoff(), -120.0);
    }

    #[test]
    fn test_presets_validate() {
        assert!(ChannelTable::profile_screen().validate().is_ok());
        assert!(ChannelTable::detail_screen().validate().is_ok());
    }

    #[test]
    fn test_iteration_order_is_insertion_order() {
        let table = ChannelTable::profile_screen();
        let names: Vec<_> = table.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                channels::BACKGROUND_OPACITY,
                channels::BLUR_INTENSITY,
                channels::AVATAR_SCALE,
            ]
        );
    }
}
