//! Transition policy
//!
//! The policy is data, not animation calls: each channel and each boolean
//! flip maps to a description of how the rendering layer should move
//! between the previously published and newly published values. Whatever
//! rendering technology consumes the chrome can interpret the table.
//!
//! Two deliberate choices are encoded here:
//!
//! - The title transition is **asymmetric**. On reveal it fades in while
//!   sliding down from the top edge; on hide it only fades. Sliding back
//!   out the way it slid in reads as the title "bouncing", which is why
//!   the exit drops the slide.
//! - The sticky overlay uses a spring, not an ease. It is a structural
//!   layout change (an element entering the view), and the slight
//!   overshoot of an underdamped spring sells that; a property fade would
//!   make it look like a repaint.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use veil_core::channel::ChannelName;
use veil_core::detect::Decision;
use veil_core::state::ChromeState;

use crate::easing::Easing;
use crate::spring::SpringSpec;

// ============================================================================
// Effects
// ============================================================================

/// Edge an element slides from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Leading,
    Trailing,
}

/// Timed interpolation parameters for a continuous channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eased {
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Eased {
    pub fn new(duration_ms: u32, easing: Easing) -> Self {
        Self {
            duration_ms,
            easing,
        }
    }
}

impl Default for Eased {
    // The chrome default: short enough to track the finger, long enough
    // to hide sample quantization
    fn default() -> Self {
        Self::new(200, Easing::EaseInOut)
    }
}

/// How a visibility flip is presented
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Opacity-only transition
    Fade { duration_ms: u32, easing: Easing },
    /// Fade combined with a slide from an edge
    FadeSlide {
        duration_ms: u32,
        easing: Easing,
        from: Edge,
        distance: f32,
    },
    /// Spring-driven reveal/dismiss
    Spring(SpringSpec),
}

/// Asymmetric enter/exit pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnterExit {
    pub enter: Effect,
    pub exit: Effect,
}

// ============================================================================
// Policy Table
// ============================================================================

/// Maps channels and boolean flips to their transitions
#[derive(Debug, Clone)]
pub struct TransitionPolicy {
    default_eased: Eased,
    per_channel: FxHashMap<ChannelName, Eased>,
    title: EnterExit,
    sticky: Effect,
}

impl TransitionPolicy {
    /// The in-repo chrome policy: 200 ms ease-in-out for continuous
    /// channels, asymmetric fade+slide/fade for the title, an underdamped
    /// spring for the sticky overlay.
    pub fn default_chrome() -> Self {
        Self {
            default_eased: Eased::default(),
            per_channel: FxHashMap::default(),
            title: EnterExit {
                enter: Effect::FadeSlide {
                    duration_ms: 250,
                    easing: Easing::EaseOut,
                    from: Edge::Top,
                    distance: 8.0,
                },
                exit: Effect::Fade {
                    duration_ms: 200,
                    easing: Easing::EaseIn,
                },
            },
            sticky: Effect::Spring(SpringSpec::sticky()),
        }
    }

    /// Override the transition for one channel
    pub fn channel(mut self, name: ChannelName, eased: Eased) -> Self {
        self.per_channel.insert(name, eased);
        self
    }

    /// Override the title enter/exit pair
    pub fn title(mut self, title: EnterExit) -> Self {
        self.title = title;
        self
    }

    /// Override the sticky overlay effect
    pub fn sticky(mut self, effect: Effect) -> Self {
        self.sticky = effect;
        self
    }

    /// Transition for a continuous channel
    pub fn eased_for(&self, name: ChannelName) -> Eased {
        self.per_channel
            .get(&name)
            .copied()
            .unwrap_or(self.default_eased)
    }

    /// Effect for a title flip in the given direction
    pub fn title_effect(&self, visible: bool) -> Effect {
        if visible {
            self.title.enter
        } else {
            self.title.exit
        }
    }

    /// Effect for a sticky overlay flip (symmetric)
    pub fn sticky_effect(&self) -> Effect {
        self.sticky
    }
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::default_chrome()
    }
}

// ============================================================================
// Director
// ============================================================================

/// Fixed overlay elements gated by the boolean channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayElement {
    Title,
    StickyOverlay,
}

/// One instruction to the rendering layer
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Redirect a continuous channel toward a new value
    Retarget {
        channel: ChannelName,
        to: f32,
        eased: Eased,
    },
    /// Flip a gated element with the given effect
    SetVisibility {
        element: OverlayElement,
        visible: bool,
        effect: Effect,
    },
}

/// Directives for one publication; sized for typical screens
pub type Directives = SmallVec<[Directive; 8]>;

/// Map an approved publication to transition directives
///
/// One `Retarget` per changed continuous channel, one `SetVisibility` per
/// boolean flip. Unchanged channels produce nothing: the rendering layer
/// keeps whatever it is already showing.
pub fn direct(decision: &Decision, state: &ChromeState, policy: &TransitionPolicy) -> Directives {
    let mut directives = Directives::new();

    for &channel in &decision.changed {
        if let Some(to) = state.value(channel) {
            directives.push(Directive::Retarget {
                channel,
                to,
                eased: policy.eased_for(channel),
            });
        }
    }

    if decision.title_flipped {
        directives.push(Directive::SetVisibility {
            element: OverlayElement::Title,
            visible: state.title_visible,
            effect: policy.title_effect(state.title_visible),
        });
    }

    if decision.sticky_flipped {
        directives.push(Directive::SetVisibility {
            element: OverlayElement::StickyOverlay,
            visible: state.sticky_visible,
            effect: policy.sticky_effect(),
        });
    }

    directives
}

// ============================================================================
// Visibility State Machine
// ============================================================================

/// Event-driven state transitions, in the house FSM shape
pub trait StateTransitions: Clone + Copy + PartialEq + std::fmt::Debug {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}

/// Events for the gated overlay elements
pub mod overlay_events {
    /// Change detector flagged a flip to visible
    pub const REVEAL: u32 = 20000;
    /// Change detector flagged a flip to hidden
    pub const DISMISS: u32 = 20001;
}

/// Two states, no intermediates
///
/// A transition is triggered solely by the change detector's boolean flag.
/// An opposite flip while a transition is still in flight retriggers the
/// opposite transition from wherever the drivers currently are; nothing is
/// queued or cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisibilityState {
    #[default]
    Hidden,
    Shown,
}

impl VisibilityState {
    pub fn is_shown(&self) -> bool {
        matches!(self, VisibilityState::Shown)
    }
}

impl StateTransitions for VisibilityState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use overlay_events::*;
        match (self, event) {
            (VisibilityState::Hidden, REVEAL) => Some(VisibilityState::Shown),
            (VisibilityState::Shown, DISMISS) => Some(VisibilityState::Hidden),
            _ => None,
        }
    }
}
