//! Threshold evaluation
//!
//! Pure mapping from a scroll offset and a channel configuration to the
//! channel's output value. Every derived-geometry computation in this crate
//! follows the same four-step guard: domain check, ratio finiteness check,
//! clamp to `[0, 1]`, final clamp to the output bound. A guard failure never
//! produces NaN or an out-of-range value; the caller's fallback (the last
//! known-good value) stands instead.
//!
//! The progress formula is direction-agnostic: for a band `[start, end]`
//! the ramp is `(start − offset) / (start − end)`, which covers both
//! channels that ramp as the offset grows more negative (`start > end`)
//! and pull-down channels (`start < end`).

use tracing::debug;

use crate::channel::ChannelConfig;

/// Clamp to the unit interval
#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Evaluate a channel at a scroll offset
///
/// `fallback` is the previous known-good value for this channel; it is
/// returned whenever the offset or any intermediate value is non-finite.
/// A disabled channel (degenerate band) always reports its low output.
///
/// Pure: no shared state, safe to call for every channel of a sample in
/// any order.
pub fn evaluate(offset: f32, config: &ChannelConfig, fallback: f32) -> f32 {
    // Domain check: a degenerate band would divide by zero
    if config.is_disabled() {
        return config.output.0;
    }
    if !offset.is_finite() {
        debug!(channel = %config.name, offset, "non-finite offset, keeping last value");
        return fallback;
    }

    // Ratio finiteness check after the divide
    let progress = (config.start - offset) / (config.start - config.end);
    if !progress.is_finite() {
        debug!(channel = %config.name, progress, "non-finite progress, keeping last value");
        return fallback;
    }

    // Clamp progress, then map into the output range
    let progress = clamp01(progress);
    let (low, high) = config.output;
    let value = low + progress * (high - low);
    if !value.is_finite() {
        return fallback;
    }

    // Final bound clamp; the output range may be descending (e.g. a scale
    // that shrinks from 1.0 to 0.8)
    if low <= high {
        value.clamp(low, high)
    } else {
        value.clamp(high, low)
    }
}

/// Guarded ratio of `part` to `whole`
///
/// Returns `None` unless `whole` is positive and finite and the ratio is
/// finite; the result is clamped to `[0, 1]`.
pub fn guarded_ratio(part: f32, whole: f32) -> Option<f32> {
    if !(whole.is_finite() && whole > 0.0) || !part.is_finite() {
        return None;
    }
    let ratio = part / whole;
    if !ratio.is_finite() {
        return None;
    }
    Some(clamp01(ratio))
}

/// Pixel width of a progress fill, guarded end to end
///
/// The classic derived-geometry case: `completed` of `total` items filling
/// a container of `container` pixels. Zero totals, non-finite geometry, and
/// overshooting ratios all collapse to a safe width of 0 or the container
/// bound, never a negative or NaN width.
pub fn fill_width(completed: u32, total: u32, container: f32) -> f32 {
    if !(container.is_finite() && container > 0.0) {
        debug!(container, "invalid container width for progress fill");
        return 0.0;
    }
    if total == 0 {
        return 0.0;
    }
    let ratio = match guarded_ratio(completed as f32, total as f32) {
        Some(r) => r,
        None => return 0.0,
    };
    let width = ratio * container;
    if !width.is_finite() || width < 0.0 {
        return 0.0;
    }
    width.min(container)
}
