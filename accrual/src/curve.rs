//! Cubic stake-duration multiplier.
//!
//! A fresh stake earns at 1.0x. The boost grows with the cube of the fraction
//! of `time_threshold` the stake has been held, reaching `multiplier_max` at
//! the threshold and staying there:
//!
//! ```text
//! m(t) = 1 + (max − 1) × (t / T)³      for t < T
//! m(t) = max                           for t ≥ T
//! ```
//!
//! All values are fixed point with scale [`MULTIPLIER_SCALE`] (1_000_000 = 1.0x).

use crate::math::mul_div;
use accrue_types::MULTIPLIER_SCALE;

const RATIO_CUBE_SCALE: u128 = MULTIPLIER_SCALE * MULTIPLIER_SCALE * MULTIPLIER_SCALE;

/// Multiplier for a stake held `time_staked` seconds in a pool whose boost
/// caps at `multiplier_max` after `time_threshold` seconds.
///
/// Total: a zero threshold counts as already at the cap, and a cap below 1.0x
/// is floored to 1.0x.
pub fn multiplier(multiplier_max: u128, time_threshold: u64, time_staked: u64) -> u128 {
    let max = multiplier_max.max(MULTIPLIER_SCALE);
    if time_staked >= time_threshold {
        return max;
    }
    // t < T, so ratio < MULTIPLIER_SCALE and ratio³ < 10^18.
    let ratio = time_staked as u128 * MULTIPLIER_SCALE / time_threshold as u128;
    let ratio_cubed = ratio * ratio * ratio;
    let boost = mul_div(max - MULTIPLIER_SCALE, ratio_cubed, RATIO_CUBE_SCALE)
        .unwrap_or(max - MULTIPLIER_SCALE);
    MULTIPLIER_SCALE + boost
}
