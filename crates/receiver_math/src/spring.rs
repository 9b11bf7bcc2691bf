//! Damped scalar spring

use serde::{Deserialize, Serialize};

/// A damped scalar oscillator pulled toward `target_state`.
///
/// Owners set `target_state` to move the spring to a new rest position and
/// add to `vel` for one-shot kicks that decay through damping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    /// Current value
    pub state: f32,
    /// Rest position
    pub target_state: f32,
    /// Current velocity
    pub vel: f32,
    /// Pull toward the target per unit of distance
    pub strength: f32,
    /// Fraction of velocity left after one second
    pub damping: f32,
}

impl Spring {
    /// Create a spring at rest
    pub fn new(state: f32, target_state: f32, strength: f32, damping: f32) -> Self {
        Self {
            state,
            target_state,
            vel: 0.0,
            strength,
            damping,
        }
    }

    /// Reset every field, zeroing velocity
    pub fn set(&mut self, state: f32, target_state: f32, strength: f32, damping: f32) {
        *self = Self::new(state, target_state, strength, damping);
    }

    /// Advance by `dt` seconds.
    ///
    /// Velocity is accelerated toward the target, then damped, then
    /// integrated; damping must come after acceleration.
    pub fn update(&mut self, dt: f32) {
        self.vel += (self.target_state - self.state) * self.strength * dt;
        self.vel *= self.damping.powf(dt);
        self.state += self.vel * dt;
    }

    /// Add a one-shot velocity kick
    #[inline]
    pub fn kick(&mut self, impulse: f32) {
        self.vel += impulse;
    }

    /// True when both position and velocity are within `epsilon` of zero
    pub fn is_settled_at_zero(&self, epsilon: f32) -> bool {
        self.vel.abs() <= epsilon && self.state <= epsilon
    }
}

impl Default for Spring {
    fn default() -> Self {
        Self::new(0.0, 0.0, 100.0, 0.00001)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_update_order() {
        let mut spring = Spring::new(0.0, 1.0, 100.0, 0.5);
        spring.update(0.1);
        // accelerate: 10, damp: 10 * 0.5^0.1, integrate
        let vel = 10.0 * 0.5f32.powf(0.1);
        assert_abs_diff_eq!(spring.vel, vel, epsilon = 1e-5);
        assert_abs_diff_eq!(spring.state, vel * 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_kick_decays() {
        let mut spring = Spring::new(0.0, 0.0, 800.0, 0.000001);
        spring.kick(-300.0);
        let mut peak = 0.0f32;
        for _ in 0..600 {
            spring.update(1.0 / 60.0);
            peak = peak.max(spring.state.abs());
        }
        assert!(peak > 0.0);
        assert_abs_diff_eq!(spring.state, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_settled() {
        let spring = Spring::new(0.005, 0.0, 100.0, 0.000001);
        assert!(spring.is_settled_at_zero(0.01));
        let moving = Spring { vel: 1.0, ..spring };
        assert!(!moving.is_settled_at_zero(0.01));
    }
}
