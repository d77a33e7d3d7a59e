//! Step length randomization

use rand::Rng;

/// Relative spread applied around the base step length
const STEP_SPREAD: f64 = 0.3;

/// Draw a step length uniformly from `[base * 0.7, base * 1.3]`, in whole millimetres.
///
/// Bases too short to hold a whole millimetre inside that window are returned unchanged,
/// so a positive base never yields a zero-length step.
pub fn randomize_step_length<R: Rng>(rng: &mut R, base: f64) -> f64 {
    let low = (base * 1000.0 * (1.0 - STEP_SPREAD)).ceil();
    let high = (base * 1000.0 * (1.0 + STEP_SPREAD)).floor();
    if low < 1.0 || low > high {
        return base;
    }
    let millimetres = rng.random_range(low as u64..=high as u64);
    millimetres as f64 / 1000.0
}
