//! Animated channel drivers
//!
//! The rendering-layer half of a transition: small interpolators that carry
//! a channel's on-screen value toward its latest published target. A new
//! publication *retargets* the running interpolation from wherever it
//! currently is; transitions are never queued, and a reversal mid-flight
//! simply redirects the remaining motion.

use crate::easing::Easing;
use crate::policy::Eased;
use crate::spring::{Spring, SpringSpec};

// ============================================================================
// Eased Driver
// ============================================================================

/// Timed interpolation toward the latest target
#[derive(Debug, Clone, Copy)]
pub struct AnimatedChannel {
    current: f32,
    from: f32,
    target: f32,
    duration_ms: f32,
    easing: Easing,
    elapsed_ms: f32,
}

impl AnimatedChannel {
    /// Create at rest on `initial`
    pub fn new(initial: f32, eased: Eased) -> Self {
        Self {
            current: initial,
            from: initial,
            target: initial,
            duration_ms: eased.duration_ms as f32,
            easing: eased.easing,
            elapsed_ms: eased.duration_ms as f32,
        }
    }

    /// Current on-screen value
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Latest published target
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Still between publication and settled
    pub fn is_animating(&self) -> bool {
        self.elapsed_ms < self.duration_ms
    }

    /// Restart the interpolation from the current in-flight value
    pub fn retarget(&mut self, to: f32) {
        self.from = self.current;
        self.target = to;
        self.elapsed_ms = 0.0;
    }

    /// Retarget and change the timing at the same time
    pub fn retarget_with(&mut self, to: f32, eased: Eased) {
        self.duration_ms = eased.duration_ms as f32;
        self.easing = eased.easing;
        self.retarget(to);
    }

    /// Snap to a value without animating
    pub fn snap(&mut self, to: f32) {
        self.current = to;
        self.from = to;
        self.target = to;
        self.elapsed_ms = self.duration_ms;
    }

    /// Advance by `dt_ms` and return the new on-screen value
    pub fn tick(&mut self, dt_ms: f32) -> f32 {
        if !self.is_animating() {
            self.current = self.target;
            return self.current;
        }

        self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            self.elapsed_ms / self.duration_ms
        };
        let eased = self.easing.apply(progress);
        self.current = self.from + (self.target - self.from) * eased;
        self.current
    }
}

// ============================================================================
// Spring Driver
// ============================================================================

/// Spring-driven value with the same driver surface
#[derive(Debug, Clone, Copy)]
pub struct SpringChannel {
    spring: Spring,
}

impl SpringChannel {
    pub fn new(spec: SpringSpec, initial: f32) -> Self {
        Self {
            spring: Spring::new(spec, initial),
        }
    }

    pub fn get(&self) -> f32 {
        self.spring.value()
    }

    pub fn target(&self) -> f32 {
        self.spring.target()
    }

    pub fn is_animating(&self) -> bool {
        !self.spring.is_settled()
    }

    /// Redirect toward a new target, keeping velocity
    pub fn retarget(&mut self, to: f32) {
        self.spring.set_target(to);
    }

    /// Advance by `dt` seconds and return the new value
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.spring.step(dt);
        self.spring.value()
    }
}
