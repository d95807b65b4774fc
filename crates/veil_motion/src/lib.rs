//! Veil Motion
//!
//! The motion layer over `veil_core`: how published chrome states get onto
//! the screen.
//!
//! - **Easing curves** for the short eased transitions continuous channels
//!   use (opacity, blur, scale)
//! - **Spring physics** (response/damping-ratio parameterized, RK4) for
//!   structural transitions
//! - **Transition policy**: a data table mapping channels and visibility
//!   flips to their transitions, including the asymmetric title
//!   enter/exit pair
//! - **Drivers** with retarget semantics: a new publication redirects an
//!   in-flight transition instead of queueing behind it
//! - **Overlay compositor adapter**: a [`ChromeSink`] that consumes
//!   publications and produces per-frame [`OverlayFrame`] style inputs
//!
//! # Example
//!
//! ```rust
//! use veil_core::prelude::*;
//! use veil_motion::OverlayCompositor;
//!
//! let mut controller = ChromeController::new(ChannelTable::profile_screen());
//! let mut compositor = OverlayCompositor::new();
//!
//! // Scroll events push offsets; frames tick the compositor
//! controller.drive(-130.0, &mut compositor);
//! let frame = compositor.tick(1.0 / 60.0);
//! assert!(frame.title_visible);
//! ```
//!
//! [`ChromeSink`]: veil_core::ChromeSink

pub mod compositor;
pub mod driver;
pub mod easing;
pub mod policy;
pub mod spring;

pub use compositor::{OverlayCompositor, OverlayFrame, MAX_BLUR_RADIUS};
pub use driver::{AnimatedChannel, SpringChannel};
pub use easing::Easing;
pub use policy::{
    direct, overlay_events, Directive, Directives, Eased, Edge, Effect, EnterExit, OverlayElement,
    StateTransitions, TransitionPolicy, VisibilityState,
};
pub use spring::{Spring, SpringSpec};
