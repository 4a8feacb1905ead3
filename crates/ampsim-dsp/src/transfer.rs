//! Amplifier transfer-function model -- piecewise complex voltage gain.
//!
//! The amplifier is a fixed linear stage characterized by a fitted rational
//! transfer function H(omega), split into three frequency regions:
//!
//!   low band   (omega < 18 rad/s):    coupling-network rolloff dominates
//!   mid band   (18 <= omega < 2e9):   flat gain, magnitude -> 43.03
//!   high band  (omega >= 2e9):        parasitic poles take over
//!
//! The coefficients come from a circuit fit and are reproduced literally.
//! The branches are NOT continuous at the 18 and 2e9 rad/s edges; that is a
//! property of the fitted model, and results everywhere depend on the exact
//! thresholds and constants, so neither may be smoothed or rounded.

use num_complex::Complex64;

/// Low/mid band edge in rad/s. `omega < LOW_BAND_EDGE` selects the low-band
/// formula, so the edge itself evaluates in the mid band.
pub const LOW_BAND_EDGE: f64 = 18.0;

/// Mid/high band edge in rad/s. The edge itself evaluates in the high band.
pub const HIGH_BAND_EDGE: f64 = 2e9;

/// Complex voltage gain H(omega) of the amplifier, Vout/Vin as RMS phasors.
///
/// Defined for all `omega >= 0`; callers never pass negative frequencies.
pub fn gain(omega: f64) -> Complex64 {
    let j = Complex64::i();

    if omega < LOW_BAND_EDGE {
        // Low band: single zero at 0.6143 rad/s over a second-order pole pair.
        let num = -13.03 * (j * omega - 0.6143);
        let den = omega * omega - 23.55 * j * omega - 79.68;
        num / den
    } else if omega < HIGH_BAND_EDGE {
        // Mid band: |H| approaches 43.03 once omega clears the pole pair.
        let num = -43.03 * (omega * omega);
        let den = omega * omega - 22.94 * j * omega - 73.48;
        num / den
    } else {
        // High band: third-order denominator, gain collapses with frequency.
        let num = omega * omega * (0.4 * omega + 8.61e10 * j);
        let den =
            omega.powi(3) - 2e9 * j * (omega * omega) - 4.69e10 * omega + 1.41e11 * j;
        num / den
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_finite_across_domain() {
        // Includes both band edges, where the denominators must stay nonzero.
        let omegas = [
            0.0, 0.1, 1.0, 17.999, 18.0, 100.0, 2.0 * PI * 60.0, 1e6, 2e9 - 1.0, 2e9, 1e12,
        ];
        for &omega in &omegas {
            let h = gain(omega);
            assert!(
                h.re.is_finite() && h.im.is_finite(),
                "gain not finite at omega={omega}: {h}"
            );
        }
    }

    #[test]
    fn test_low_band_magnitude() {
        // At omega = 1: num = 8.004 - 13.03j, den = -78.68 - 23.55j,
        // |H| = 15.29 / 82.13 = 0.1862.
        let mag = gain(1.0).norm();
        assert!(
            (mag - 0.1862).abs() < 1e-3,
            "low-band magnitude off at omega=1: {mag}"
        );
    }

    #[test]
    fn test_mid_band_magnitude_at_60hz() {
        // Denominator is dominated by omega^2 at 60 Hz, so |H| ~ 43.03.
        let mag = gain(2.0 * PI * 60.0).norm();
        let rel = (mag - 43.03).abs() / 43.03;
        assert!(rel < 0.01, "mid-band magnitude off at 60 Hz: {mag}");
    }

    #[test]
    fn test_low_edge_is_exclusive() {
        // omega = 18 must use the mid-band formula. The fitted model jumps
        // there: ~0.48 just below the edge, ~28.9 at it.
        let below = gain(18.0 - 1e-9).norm();
        let at = gain(18.0).norm();
        assert!(below < 1.0, "expected low-band magnitude below edge: {below}");
        assert!(at > 10.0, "expected mid-band magnitude at edge: {at}");
    }

    #[test]
    fn test_high_edge_is_inclusive() {
        // omega = 2e9 must use the high-band formula: |H| drops from ~43.03
        // (mid band) to ~30.45.
        let below = gain(2e9 - 1.0).norm();
        let at = gain(2e9).norm();
        assert!(
            (below - 43.03).abs() / 43.03 < 0.01,
            "mid band should hold just below 2e9: {below}"
        );
        assert!(
            (at - 30.45).abs() / 30.45 < 0.01,
            "high band should apply at 2e9: {at}"
        );
    }

    #[test]
    fn test_mid_band_phase_near_inversion() {
        // -43.03 with a small reactive term: phase close to +/-180 degrees.
        let h = gain(2.0 * PI * 1000.0);
        assert!(
            h.arg().abs() > PI * 0.95,
            "mid-band gain should be inverting: arg={}",
            h.arg()
        );
    }
}
