//! Spring physics
//!
//! RK4-integrated springs for the structural chrome transitions (sticky
//! overlay takeover, title flip). Parameterized by response and damping
//! ratio rather than raw stiffness/damping, because that is how the chrome
//! transitions are specified: response is the period of the undamped
//! oscillation in seconds, damping ratio 1.0 is critical damping.
//!
//! Retarget semantics: `set_target` mid-flight keeps the current value and
//! velocity, so a rapid scroll reversal smoothly redirects the running
//! transition instead of snapping or queueing.

/// Spring parameters in response/damping-ratio form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// Period of the undamped oscillation, seconds
    pub response: f32,
    /// 1.0 = critically damped, < 1.0 overshoots
    pub damping_ratio: f32,
}

impl SpringSpec {
    pub fn new(response: f32, damping_ratio: f32) -> Self {
        Self {
            response,
            damping_ratio,
        }
    }

    /// Title flip: quick with barely perceptible overshoot
    pub fn chrome() -> Self {
        Self::new(0.4, 0.8)
    }

    /// Sticky overlay takeover: a touch more overshoot, it is a structural
    /// layout change and should read as one
    pub fn sticky() -> Self {
        Self::new(0.35, 0.75)
    }

    /// Avatar shrink accents
    pub fn avatar() -> Self {
        Self::new(0.3, 0.8)
    }

    /// Equivalent stiffness for unit mass
    pub fn stiffness(&self) -> f32 {
        let omega = std::f32::consts::TAU / self.response;
        omega * omega
    }

    /// Equivalent damping coefficient for unit mass
    pub fn damping(&self) -> f32 {
        2.0 * self.damping_ratio * (std::f32::consts::TAU / self.response)
    }

    /// Whether this spring overshoots its target
    pub fn is_underdamped(&self) -> bool {
        self.damping_ratio < 1.0
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::chrome()
    }
}

// ============================================================================
// Spring Animator
// ============================================================================

/// A spring-driven scalar
///
/// Values here are normalized chrome outputs (opacity, progress), so the
/// settle thresholds are much tighter than they would be for pixel springs.
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    spec: SpringSpec,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    const SETTLE_EPSILON: f32 = 0.001;
    const SETTLE_VELOCITY: f32 = 0.01;

    pub fn new(spec: SpringSpec, initial: f32) -> Self {
        Self {
            spec,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Redirect toward a new target, keeping value and velocity
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Within the settle window of the target
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < Self::SETTLE_EPSILON
            && self.velocity.abs() < Self::SETTLE_VELOCITY
    }

    /// Advance the simulation by `dt` seconds (RK4)
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        -self.spec.stiffness() * (x - self.target) - self.spec.damping() * v
    }
}
