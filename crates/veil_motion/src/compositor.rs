//! Overlay compositor adapter
//!
//! Consumes published chrome snapshots and turns them into per-frame style
//! inputs for the fixed overlay controls (back button, centered title,
//! trailing action, sticky tab strip). The adapter holds one driver per
//! continuous channel and one visibility driver per gated element; on each
//! publication it retargets the drivers per the transition policy, and on
//! each frame tick it samples them into an [`OverlayFrame`].
//!
//! The compositor never reads the raw scroll offset. Everything it knows
//! arrives through [`ChromeSink::publish`], which keeps the visual contract
//! testable independent of any rendering technology.

use indexmap::IndexMap;

use veil_core::channel::{channels, ChannelName};
use veil_core::controller::ChromeSink;
use veil_core::detect::Decision;
use veil_core::evaluate::clamp01;
use veil_core::state::ChromeState;

use crate::driver::{AnimatedChannel, SpringChannel};
use crate::policy::{
    direct, Directive, Eased, Edge, Effect, OverlayElement, StateTransitions, TransitionPolicy,
    VisibilityState,
};
use crate::policy::overlay_events::{DISMISS, REVEAL};

/// Blur radius in points when blur intensity is 1.0
pub const MAX_BLUR_RADIUS: f32 = 20.0;

// ============================================================================
// Overlay Frame
// ============================================================================

/// One frame's worth of style inputs for the fixed overlay
///
/// All values are sanitized: opacities in `[0, 1]`, radii and scales
/// non-negative. A renderer can apply these directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayFrame {
    /// Navigation bar background opacity
    pub background_opacity: f32,
    /// Frosted-glass blur radius in points
    pub blur_radius: f32,
    /// Header avatar scale factor
    pub avatar_scale: f32,
    /// Whether the centered title should be mounted at all
    pub title_visible: bool,
    /// Title opacity (reveal/dismiss progress)
    pub title_opacity: f32,
    /// Title vertical offset from its resting position
    pub title_offset_y: f32,
    /// Whether the sticky overlay should be mounted at all
    pub sticky_visible: bool,
    /// Sticky overlay entrance progress (springy, may overshoot 1.0)
    pub sticky_progress: f32,
}

// ============================================================================
// Visibility Driver
// ============================================================================

/// Reveal/dismiss progress driven by either timing or a spring
#[derive(Debug, Clone, Copy)]
enum GateDriver {
    Eased(AnimatedChannel),
    Spring(SpringChannel),
}

impl GateDriver {
    fn get(&self) -> f32 {
        match self {
            GateDriver::Eased(d) => d.get(),
            GateDriver::Spring(d) => d.get(),
        }
    }

    fn tick(&mut self, dt: f32) -> f32 {
        match self {
            GateDriver::Eased(d) => d.tick(dt * 1000.0),
            GateDriver::Spring(d) => d.tick(dt),
        }
    }

    fn is_animating(&self) -> bool {
        match self {
            GateDriver::Eased(d) => d.is_animating(),
            GateDriver::Spring(d) => d.is_animating(),
        }
    }
}

/// One gated element: FSM plus its progress and slide drivers
#[derive(Debug, Clone, Copy)]
struct VisibilityDriver {
    state: VisibilityState,
    progress: GateDriver,
    offset_y: AnimatedChannel,
}

impl VisibilityDriver {
    fn new() -> Self {
        Self {
            state: VisibilityState::Hidden,
            progress: GateDriver::Eased(AnimatedChannel::new(0.0, Eased::default())),
            offset_y: AnimatedChannel::new(0.0, Eased::default()),
        }
    }

    /// Apply a flip with its effect; retargets from the in-flight value
    fn apply(&mut self, visible: bool, effect: Effect) {
        let event = if visible { REVEAL } else { DISMISS };
        if let Some(next) = self.state.on_event(event) {
            self.state = next;
        }

        let target = if visible { 1.0 } else { 0.0 };
        let current = self.progress.get();

        match effect {
            Effect::Fade {
                duration_ms,
                easing,
            } => {
                let mut driver = match self.progress {
                    GateDriver::Eased(d) => d,
                    // Switching driver kinds keeps the in-flight value
                    GateDriver::Spring(_) => {
                        AnimatedChannel::new(current, Eased::new(duration_ms, easing))
                    }
                };
                driver.retarget_with(target, Eased::new(duration_ms, easing));
                self.progress = GateDriver::Eased(driver);
                // Fade-only: the element keeps its resting position
                self.offset_y.retarget(0.0);
            }
            Effect::FadeSlide {
                duration_ms,
                easing,
                from,
                distance,
            } => {
                let mut driver = match self.progress {
                    GateDriver::Eased(d) => d,
                    GateDriver::Spring(_) => {
                        AnimatedChannel::new(current, Eased::new(duration_ms, easing))
                    }
                };
                driver.retarget_with(target, Eased::new(duration_ms, easing));
                self.progress = GateDriver::Eased(driver);

                let resting_offset = Self::edge_offset(from, distance);
                if visible {
                    // Enter from the edge only when fully hidden; an
                    // in-flight reversal slides back from where it is
                    if !self.offset_y.is_animating() && current <= 0.001 {
                        self.offset_y.snap(resting_offset);
                    }
                    self.offset_y
                        .retarget_with(0.0, Eased::new(duration_ms, easing));
                } else {
                    self.offset_y
                        .retarget_with(resting_offset, Eased::new(duration_ms, easing));
                }
            }
            Effect::Spring(spec) => {
                let mut driver = match self.progress {
                    GateDriver::Spring(d) => d,
                    GateDriver::Eased(_) => SpringChannel::new(spec, current),
                };
                driver.retarget(target);
                self.progress = GateDriver::Spring(driver);
                self.offset_y.retarget(0.0);
            }
        }
    }

    fn edge_offset(edge: Edge, distance: f32) -> f32 {
        match edge {
            Edge::Top | Edge::Leading => -distance,
            Edge::Bottom | Edge::Trailing => distance,
        }
    }

    fn tick(&mut self, dt: f32) {
        self.progress.tick(dt);
        self.offset_y.tick(dt * 1000.0);
    }

    /// Mounted while shown or still fading out
    fn is_mounted(&self) -> bool {
        self.state.is_shown() || self.progress.get() > 0.001 || self.progress.is_animating()
    }
}

// ============================================================================
// Overlay Compositor
// ============================================================================

/// Renders the latest published chrome state into per-frame style inputs
#[derive(Debug, Clone)]
pub struct OverlayCompositor {
    policy: TransitionPolicy,
    channels: IndexMap<ChannelName, AnimatedChannel>,
    title: VisibilityDriver,
    sticky: VisibilityDriver,
    seen_first_publish: bool,
}

impl OverlayCompositor {
    /// Create with the standard chrome policy
    pub fn new() -> Self {
        Self::with_policy(TransitionPolicy::default_chrome())
    }

    /// Create with a custom transition policy
    pub fn with_policy(policy: TransitionPolicy) -> Self {
        Self {
            policy,
            channels: IndexMap::new(),
            title: VisibilityDriver::new(),
            sticky: VisibilityDriver::new(),
            seen_first_publish: false,
        }
    }

    /// Advance all drivers by `dt` seconds and sample a frame
    pub fn tick(&mut self, dt: f32) -> OverlayFrame {
        for driver in self.channels.values_mut() {
            driver.tick(dt * 1000.0);
        }
        self.title.tick(dt);
        self.sticky.tick(dt);
        self.frame()
    }

    /// Sample the current frame without advancing time
    pub fn frame(&self) -> OverlayFrame {
        let value = |name: ChannelName, default: f32| -> f32 {
            self.channels.get(&name).map(|d| d.get()).unwrap_or(default)
        };

        let blur = value(channels::BLUR_INTENSITY, 0.0).max(0.0);
        let scale = value(channels::AVATAR_SCALE, 1.0);

        OverlayFrame {
            background_opacity: clamp01(value(channels::BACKGROUND_OPACITY, 0.0)),
            blur_radius: blur * MAX_BLUR_RADIUS,
            avatar_scale: if scale.is_finite() { scale.max(0.0) } else { 1.0 },
            title_visible: self.title.is_mounted(),
            title_opacity: clamp01(self.title.progress.get()),
            title_offset_y: self.title.offset_y.get(),
            sticky_visible: self.sticky.is_mounted(),
            sticky_progress: self.sticky.progress.get().max(0.0),
        }
    }

    /// True while any driver is mid-transition
    pub fn is_animating(&self) -> bool {
        self.channels.values().any(|d| d.is_animating())
            || self.title.progress.is_animating()
            || self.title.offset_y.is_animating()
            || self.sticky.progress.is_animating()
    }

    fn apply_directive(&mut self, directive: &Directive) {
        match directive {
            Directive::Retarget { channel, to, eased } => {
                match self.channels.get_mut(channel) {
                    Some(driver) => driver.retarget_with(*to, *eased),
                    None => {
                        // First sight of a channel: start where it is, no
                        // entrance animation for a screen appearing mid-scroll
                        let mut driver = AnimatedChannel::new(0.0, *eased);
                        driver.snap(*to);
                        self.channels.insert(*channel, driver);
                    }
                }
            }
            Directive::SetVisibility {
                element,
                visible,
                effect,
            } => match element {
                OverlayElement::Title => self.title.apply(*visible, *effect),
                OverlayElement::StickyOverlay => self.sticky.apply(*visible, *effect),
            },
        }
    }
}

impl Default for OverlayCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl ChromeSink for OverlayCompositor {
    fn publish(&mut self, state: &ChromeState, decision: &Decision) {
        let directives = direct(decision, state, &self.policy);
        tracing::trace!(
            sequence = state.sequence,
            directives = directives.len(),
            "retargeting overlay drivers"
        );
        if !self.seen_first_publish {
            // Snap everything on the first publication; there is nothing
            // on screen yet to animate from
            self.seen_first_publish = true;
            for directive in &directives {
                match directive {
                    Directive::Retarget { channel, to, eased } => {
                        let mut driver = AnimatedChannel::new(0.0, *eased);
                        driver.snap(*to);
                        self.channels.insert(*channel, driver);
                    }
                    Directive::SetVisibility {
                        element, visible, ..
                    } => {
                        let driver = match element {
                            OverlayElement::Title => &mut self.title,
                            OverlayElement::StickyOverlay => &mut self.sticky,
                        };
                        if *visible {
                            driver.state = VisibilityState::Shown;
                            driver.progress =
                                GateDriver::Eased(AnimatedChannel::new(1.0, Eased::default()));
                        }
                    }
                }
            }
            return;
        }

        for directive in &directives {
            self.apply_directive(directive);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::channel::ChannelTable;
    use veil_core::controller::ChromeController;

    const FRAME: f32 = 1.0 / 60.0;

    fn rig() -> (ChromeController, OverlayCompositor) {
        (
            ChromeController::new(ChannelTable::profile_screen()),
            OverlayCompositor::new(),
        )
    }

    #[test]
    fn test_first_publish_snaps() {
        let (mut controller, mut compositor) = rig();
        controller.drive(-130.0, &mut compositor);

        let frame = compositor.frame();
        assert!((frame.background_opacity - 50.0 / 70.0).abs() < 1e-5);
        assert!(frame.title_visible);
        assert!((frame.title_opacity - 1.0).abs() < 1e-5);
        assert!(!compositor.is_animating());
    }

    #[test]
    fn test_continuous_channel_animates_between_publishes() {
        let (mut controller, mut compositor) = rig();
        controller.drive(-80.0, &mut compositor);
        controller.drive(-150.0, &mut compositor);

        // Background target jumped 0 → 1; halfway through the 200 ms ease
        // the on-screen value must be strictly between
        let mut frame = compositor.frame();
        assert_eq!(frame.background_opacity, 0.0);
        for _ in 0..6 {
            frame = compositor.tick(FRAME);
        }
        assert!(frame.background_opacity > 0.0 && frame.background_opacity < 1.0);

        for _ in 0..20 {
            frame = compositor.tick(FRAME);
        }
        assert!((frame.background_opacity - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_title_reveal_slides_and_fades() {
        let (mut controller, mut compositor) = rig();
        controller.drive(0.0, &mut compositor);
        controller.drive(-130.0, &mut compositor);

        // Mounted immediately, starting above its resting position
        let frame = compositor.frame();
        assert!(frame.title_visible);
        assert!(frame.title_offset_y < 0.0);
        assert!(frame.title_opacity < 1.0);

        let mut frame = compositor.frame();
        for _ in 0..30 {
            frame = compositor.tick(FRAME);
        }
        assert!((frame.title_opacity - 1.0).abs() < 1e-4);
        assert!(frame.title_offset_y.abs() < 1e-4);
    }

    #[test]
    fn test_title_hide_fades_without_slide() {
        let (mut controller, mut compositor) = rig();
        controller.drive(0.0, &mut compositor);
        controller.drive(-130.0, &mut compositor);
        for _ in 0..30 {
            compositor.tick(FRAME);
        }

        controller.drive(0.0, &mut compositor);
        let mut frame = compositor.frame();
        for _ in 0..6 {
            frame = compositor.tick(FRAME);
        }
        // Fading out in place: no slide back toward the edge
        assert!(frame.title_opacity < 1.0);
        assert!(frame.title_offset_y.abs() < 1e-4);
    }

    #[test]
    fn test_reversal_mid_flight_retargets() {
        let (mut controller, mut compositor) = rig();
        controller.drive(0.0, &mut compositor);
        controller.drive(-130.0, &mut compositor);

        // Partway through the reveal, scroll back above the cutoff
        for _ in 0..4 {
            compositor.tick(FRAME);
        }
        let in_flight = compositor.frame().title_opacity;
        assert!(in_flight > 0.0 && in_flight < 1.0);

        controller.drive(0.0, &mut compositor);
        // The dismiss starts from the in-flight opacity, not from 1.0
        assert!((compositor.frame().title_opacity - in_flight).abs() < 1e-4);

        let mut frame = compositor.frame();
        for _ in 0..60 {
            frame = compositor.tick(FRAME);
        }
        assert!(frame.title_opacity < 1e-3);
        assert!(!frame.title_visible);
    }

    #[test]
    fn test_sticky_takeover_springs_with_overshoot() {
        let (mut controller, mut compositor) = rig();
        controller.drive(0.0, &mut compositor);
        controller.drive(-300.0, &mut compositor);

        let mut peak = 0.0_f32;
        for _ in 0..240 {
            let frame = compositor.tick(FRAME);
            peak = peak.max(frame.sticky_progress);
        }

        let frame = compositor.frame();
        assert!(frame.sticky_visible);
        assert!(peak > 1.0, "sticky spring should overshoot, peak {peak}");
        assert!((frame.sticky_progress - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_blur_radius_mapping() {
        let (mut controller, mut compositor) = rig();
        controller.drive(-180.0, &mut compositor);

        // Blur band is saturated at -180; intensity 0.8 maps to radius
        let frame = compositor.frame();
        assert!((frame.blur_radius - 0.8 * MAX_BLUR_RADIUS).abs() < 1e-4);
    }

    #[test]
    fn test_frame_outputs_stay_sane() {
        let (mut controller, mut compositor) = rig();
        controller.drive(-40.0, &mut compositor);

        for i in 0..600 {
            // A jittery, reversing scroll, with garbage samples mixed in
            let offset = -150.0 + (i as f32 * 0.7).sin() * 160.0;
            controller.drive(offset, &mut compositor);
            if i % 97 == 0 {
                controller.drive(f32::NAN, &mut compositor);
            }
            let frame = compositor.tick(FRAME);

            assert!((0.0..=1.0).contains(&frame.background_opacity));
            assert!(frame.blur_radius >= 0.0);
            assert!(frame.avatar_scale > 0.0);
            assert!((0.0..=1.0).contains(&frame.title_opacity));
            assert!(frame.blur_radius.is_finite());
            assert!(frame.title_offset_y.is_finite());
        }
    }
}
