//! Per-agent walking session

use crate::config::WalkSettings;
use crate::navigation::planner::DirectionsProvider;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Bounds of a single random speed nudge, km/h
const NUDGE_MIN: f64 = 0.001;
const NUDGE_MAX: f64 = 0.02;

/// Session-scoped configuration and collaborators shared by walks of one agent
pub struct Session {
    settings: WalkSettings,
    directions: Arc<dyn DirectionsProvider>,
    variant_rng: Mutex<SmallRng>,
}

impl Session {
    /// Create a new session
    pub fn new(settings: WalkSettings, directions: Arc<dyn DirectionsProvider>) -> Self {
        Session {
            settings,
            directions,
            variant_rng: Mutex::new(SmallRng::from_os_rng()),
        }
    }

    /// Use a fixed seed for the speed variance
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.variant_rng = Mutex::new(SmallRng::seed_from_u64(seed));
        self
    }

    pub fn settings(&self) -> &WalkSettings {
        &self.settings
    }

    /// Routing service handle for this session
    pub fn directions_service(&self) -> Arc<dyn DirectionsProvider> {
        Arc::clone(&self.directions)
    }

    /// Randomized variant of `current_kmh`.
    ///
    /// With even odds the speed is nudged up or down by a small random amount, never leaving
    /// the configured speed plus or minus the configured variant.
    pub fn variant_speed(&self, current_kmh: f64) -> f64 {
        let mut rng = self
            .variant_rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let nudge = rng.random_range(NUDGE_MIN..NUDGE_MAX);
        let base = self.settings.walking_speed_kmh;
        let variant = self.settings.walking_speed_variant;

        if rng.random_bool(0.5) {
            let max = base + variant;
            let faster = current_kmh + nudge;
            if faster > max {
                return max;
            }
            faster
        } else {
            let min = (base - variant).max(0.0);
            let slower = current_kmh - nudge;
            if slower < min {
                return min;
            }
            slower
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::planner::StraightLinePlanner;

    fn session(speed: f64, variant: f64) -> Session {
        let settings = WalkSettings {
            walking_speed_kmh: speed,
            walking_speed_variant: variant,
            use_walking_speed_variant: true,
            ..WalkSettings::default()
        };
        Session::new(settings, Arc::new(StraightLinePlanner)).with_seed(42)
    }

    #[test]
    fn variant_stays_within_configured_band() {
        let session = session(5.0, 0.05);
        let mut speed = 5.0;
        for _ in 0..2_000 {
            speed = session.variant_speed(speed);
            assert!((4.95..=5.05).contains(&speed), "speed drifted to {speed}");
        }
    }

    #[test]
    fn variant_moves_in_small_nudges() {
        let session = session(5.0, 1.0);
        let mut speed = 5.0;
        for _ in 0..200 {
            let next = session.variant_speed(speed);
            assert!((next - speed).abs() < NUDGE_MAX);
            assert!(next != speed);
            speed = next;
        }
    }

    #[test]
    fn zero_variant_pins_the_speed() {
        let session = session(7.0, 0.0);
        assert_eq!(session.variant_speed(7.0), 7.0);
    }
}
